use ising_core::{ErrorInfo, IsingError};

/// Expands the positional temperature arguments into the sweep order.
///
/// One value is a single temperature and exactly three values are a
/// `start end step` triple yielding `start + step * k` for every `k` with
/// `k < (end - start) / step + 1`. Any other count is an explicit list.
pub fn expand(values: &[f64]) -> Result<Vec<f64>, IsingError> {
    let temperatures = match values {
        [] => {
            return Err(IsingError::Config(
                ErrorInfo::new("missing-temperatures", "at least one temperature is required")
                    .with_hint("pass T, `start end step`, or an explicit list"),
            ))
        }
        &[start, end, step] => range(start, end, step)?,
        list => list.to_vec(),
    };
    if temperatures.is_empty() {
        return Err(IsingError::Config(
            ErrorInfo::new("empty-temperature-range", "the temperature range is empty")
                .with_hint("start must not exceed end"),
        ));
    }
    for &temperature in &temperatures {
        if !(temperature.is_finite() && temperature > 0.0) {
            return Err(IsingError::Config(
                ErrorInfo::new("invalid-temperature", "temperatures must be finite and positive")
                    .with_context("temperature", temperature.to_string()),
            ));
        }
    }
    Ok(temperatures)
}

fn range(start: f64, end: f64, step: f64) -> Result<Vec<f64>, IsingError> {
    if !(step.is_finite() && step > 0.0) {
        return Err(IsingError::Config(
            ErrorInfo::new("invalid-temperature-step", "the temperature step must be positive")
                .with_context("step", step.to_string())
                .with_hint("use an explicit list for three unrelated temperatures"),
        ));
    }
    let bound = (end - start) / step + 1.0;
    let mut temperatures = Vec::new();
    let mut k = 0u32;
    while f64::from(k) < bound {
        temperatures.push(start + step * f64::from(k));
        k += 1;
    }
    Ok(temperatures)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_value_is_one_temperature() {
        assert_eq!(expand(&[2.27]).unwrap(), vec![2.27]);
    }

    #[test]
    fn triple_is_a_range() {
        assert_eq!(
            expand(&[1.0, 3.0, 0.5]).unwrap(),
            vec![1.0, 1.5, 2.0, 2.5, 3.0]
        );
    }

    #[test]
    fn range_stops_before_bound() {
        // (2.2 - 2.0) / 0.15 + 1 = 2.33, so k runs over 0, 1 and 2.
        let temperatures = expand(&[2.0, 2.2, 0.15]).unwrap();
        assert_eq!(temperatures.len(), 3);
        assert!((temperatures[2] - 2.3).abs() < 1e-12);
    }

    #[test]
    fn other_counts_are_lists() {
        assert_eq!(expand(&[3.0, 1.0]).unwrap(), vec![3.0, 1.0]);
        assert_eq!(
            expand(&[1.0, 2.0, 3.0, 4.0]).unwrap(),
            vec![1.0, 2.0, 3.0, 4.0]
        );
    }

    #[test]
    fn rejects_degenerate_input() {
        assert_eq!(expand(&[]).unwrap_err().info().code, "missing-temperatures");
        assert_eq!(
            expand(&[1.0, 2.0, 0.0]).unwrap_err().info().code,
            "invalid-temperature-step"
        );
        assert_eq!(
            expand(&[2.0, -1.0]).unwrap_err().info().code,
            "invalid-temperature"
        );
        assert_eq!(
            expand(&[3.0, 1.0, 0.5]).unwrap_err().info().code,
            "empty-temperature-range"
        );
    }
}
