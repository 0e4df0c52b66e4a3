//! Nearest-neighbour Ising Hamiltonian `H = -Σ s_i s_j` with unit coupling.

use crate::lattice::Lattice;

/// Energy change caused by flipping site `(i, j)`: `2 s_ij (s_left + s_right + s_up + s_down)`.
///
/// Flipping the site and evaluating again yields the negated value.
#[inline]
pub fn energy_change_upon_flip(lattice: &Lattice, i: usize, j: usize) -> i32 {
    let (si, sj) = (i as isize, j as isize);
    let neighbours = lattice.wrapped_value(si - 1, sj)
        + lattice.wrapped_value(si + 1, sj)
        + lattice.wrapped_value(si, sj - 1)
        + lattice.wrapped_value(si, sj + 1);
    2 * lattice.spin_value(i, j) * neighbours
}

/// Magnetization per spin `(2 N_up - L^2) / L^2`, in `[-1, 1]`.
pub fn magnetization(lattice: &Lattice) -> f64 {
    let sites = lattice.sites() as i64;
    let up = lattice.up_count() as i64;
    (2 * up - sites) as f64 / sites as f64
}

/// Energy per spin, counting every bond once through the forward neighbours.
pub fn energy(lattice: &Lattice) -> f64 {
    let size = lattice.size();
    let mut sum: i64 = 0;
    for i in 0..size {
        let down = lattice.periodic_index(i as isize + 1);
        for j in 0..size {
            let right = lattice.periodic_index(j as isize + 1);
            let bonds = lattice.spin_value(down, j) + lattice.spin_value(i, right);
            sum += i64::from(lattice.spin_value(i, j) * bonds);
        }
    }
    -(sum as f64) / lattice.sites() as f64
}
