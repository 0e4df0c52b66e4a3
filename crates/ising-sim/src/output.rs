use std::fs::{self, File};
use std::path::{Path, PathBuf};

use ising_core::{ErrorInfo, IsingError};
use ising_mcmc::{BiasRun, TemperatureResult};

const DIST_HEADER: [&str; 11] = [
    "L", "T", "bias", "mag", "mag2", "mag4", "e", "e2", "x", "c", "U_L",
];

const STDEV_HEADER: [&str; 18] = [
    "L",
    "T",
    "avg_mag",
    "stdev_mag",
    "avg_mag2",
    "stdev_mag2",
    "avg_mag4",
    "stdev_mag4",
    "avg_e",
    "stdev_e",
    "avg_e2",
    "stdev_e2",
    "avg_x",
    "stdev_x",
    "avg_c",
    "stdev_c",
    "avg_U_L",
    "stdev_U_L",
];

pub(crate) fn csv_error(code: &str, err: csv::Error, path: &Path) -> IsingError {
    IsingError::Io(
        ErrorInfo::new(code, err.to_string()).with_context("path", path.display().to_string()),
    )
}

pub(crate) fn tsv_writer(path: &Path) -> Result<csv::Writer<File>, IsingError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .map_err(|err| IsingError::io("output-mkdir", err, parent.display()))?;
        }
    }
    csv::WriterBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .from_path(path)
        .map_err(|err| csv_error("output-create", err, path))
}

/// Per-run (`_dist.dat`) and per-temperature (`_stdev.dat`) result tables.
pub struct ResultTables {
    dist: csv::Writer<File>,
    dist_path: PathBuf,
    stdev: csv::Writer<File>,
    stdev_path: PathBuf,
}

impl ResultTables {
    /// Creates both tables next to `basename` and writes their headers.
    pub fn create(basename: &str) -> Result<Self, IsingError> {
        let dist_path = PathBuf::from(format!("{basename}_dist.dat"));
        let stdev_path = PathBuf::from(format!("{basename}_stdev.dat"));
        let mut tables = Self {
            dist: tsv_writer(&dist_path)?,
            dist_path,
            stdev: tsv_writer(&stdev_path)?,
            stdev_path,
        };
        tables
            .dist
            .write_record(DIST_HEADER)
            .map_err(|err| csv_error("dist-write", err, &tables.dist_path))?;
        tables
            .stdev
            .write_record(STDEV_HEADER)
            .map_err(|err| csv_error("stdev-write", err, &tables.stdev_path))?;
        tables.flush()?;
        Ok(tables)
    }

    /// Locations of the two tables.
    pub fn paths(&self) -> Vec<PathBuf> {
        vec![self.dist_path.clone(), self.stdev_path.clone()]
    }

    /// Appends one distribution row and flushes it to disk.
    pub fn write_run(&mut self, run: &BiasRun) -> Result<(), IsingError> {
        let o = &run.observables;
        let mut record = vec![run.label.size.to_string()];
        for value in [
            run.label.temperature,
            run.label.bias,
            o.mag,
            o.mag2,
            o.mag4,
            o.e,
            o.e2,
            o.susceptibility,
            o.heat_capacity,
            o.binder_cumulant,
        ] {
            record.push(value.to_string());
        }
        self.dist
            .write_record(&record)
            .map_err(|err| csv_error("dist-write", err, &self.dist_path))?;
        self.dist
            .flush()
            .map_err(|err| IsingError::io("dist-flush", err, self.dist_path.display()))
    }

    /// Appends the cross-bias mean and standard deviation of every observable at one temperature.
    pub fn write_summary(&mut self, size: usize, result: &TemperatureResult) -> Result<(), IsingError> {
        let s = &result.summary;
        let mut record = vec![size.to_string(), result.temperature.to_string()];
        for column in [
            s.mag,
            s.mag2,
            s.mag4,
            s.e,
            s.e2,
            s.susceptibility,
            s.heat_capacity,
            s.binder_cumulant,
        ] {
            record.push(column.mean.to_string());
            record.push(column.stdev.to_string());
        }
        self.stdev
            .write_record(&record)
            .map_err(|err| csv_error("stdev-write", err, &self.stdev_path))?;
        self.stdev
            .flush()
            .map_err(|err| IsingError::io("stdev-flush", err, self.stdev_path.display()))
    }

    fn flush(&mut self) -> Result<(), IsingError> {
        self.dist
            .flush()
            .map_err(|err| IsingError::io("dist-flush", err, self.dist_path.display()))?;
        self.stdev
            .flush()
            .map_err(|err| IsingError::io("stdev-flush", err, self.stdev_path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ising_mcmc::{run_temperature, CancelToken, RunConfig, RunHooks, SimulationConfig};
    use tempfile::tempdir;

    fn lines(path: &Path) -> Vec<String> {
        fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(str::to_owned)
            .collect()
    }

    #[test]
    fn headers_match_the_table_layout() {
        let dir = tempdir().unwrap();
        let base = dir.path().join("sweep");
        let tables = ResultTables::create(base.to_str().unwrap()).unwrap();
        let paths = tables.paths();
        let dist = lines(&paths[0]);
        let stdev = lines(&paths[1]);
        assert_eq!(dist, vec!["L\tT\tbias\tmag\tmag2\tmag4\te\te2\tx\tc\tU_L"]);
        assert_eq!(
            stdev,
            vec![
                "L\tT\tavg_mag\tstdev_mag\tavg_mag2\tstdev_mag2\tavg_mag4\tstdev_mag4\tavg_e\tstdev_e\tavg_e2\tstdev_e2\tavg_x\tstdev_x\tavg_c\tstdev_c\tavg_U_L\tstdev_U_L"
            ]
        );
    }

    #[test]
    fn rows_follow_each_run_and_temperature() {
        let dir = tempdir().unwrap();
        let base = dir.path().join("out").join("sweep");
        let mut tables = ResultTables::create(base.to_str().unwrap()).unwrap();

        let mut config = SimulationConfig::default();
        config.lattice_size = 6;
        config.biases.count = 2;
        config.seed_policy.master_seed = Some(12);
        config.run = RunConfig {
            min_cycles: 5,
            cycles: Some(20),
            eval_cycles: 1,
            frame_cycles: Some(100),
            window_base: 10,
            slope_threshold: 0.5,
        };
        let result = run_temperature(
            &config,
            1.0,
            0,
            &CancelToken::new(),
            |_| Ok(RunHooks::silent()),
            |run| tables.write_run(run),
        )
        .unwrap();
        tables.write_summary(6, &result).unwrap();

        let dist = lines(&tables.paths()[0]);
        assert_eq!(dist.len(), 3);
        let first: Vec<&str> = dist[1].split('\t').collect();
        assert_eq!(first.len(), 11);
        assert_eq!(first[0], "6");
        assert_eq!(first[1], "1");
        assert_eq!(first[3].parse::<f64>().unwrap(), result.runs[0].observables.mag);

        let stdev = lines(&tables.paths()[1]);
        assert_eq!(stdev.len(), 2);
        let summary: Vec<&str> = stdev[1].split('\t').collect();
        assert_eq!(summary.len(), 18);
        assert_eq!(summary[..2], ["6", "1"]);
        assert_eq!(summary[2].parse::<f64>().unwrap(), result.summary.mag.mean);
    }
}
