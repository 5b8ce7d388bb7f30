use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::EvalError;

/// The two numbers extracted from one measurement report.
#[derive(Serialize, Debug, Clone, Copy, PartialEq)]
pub struct Measurement {
    /// Mean wall-clock duration in nanoseconds
    pub runtime_ns: f64,
    /// Relative variability across the repeated runs, in percent
    pub uncertainty_pct: f64,
}

/// One C program under evaluation, identified by its source sub-directory name.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Benchmark {
    pub name: String,
    pub path: PathBuf,
    #[serde(flatten)]
    measurement: Option<Measurement>,
}

impl Benchmark {
    pub fn new(name: impl Into<String>, source_root: &Path) -> Self {
        let name = name.into();
        Self {
            path: source_root.join(&name),
            name,
            measurement: None,
        }
    }

    /// Record the measurement. A benchmark is measured at most once per run.
    pub fn record(&mut self, measurement: Measurement) {
        debug_assert!(
            self.measurement.is_none(),
            "benchmark `{}` measured twice",
            self.name
        );
        self.measurement = Some(measurement);
    }

    pub fn measurement(&self) -> Option<Measurement> {
        self.measurement
    }

    pub fn is_measured(&self) -> bool {
        self.measurement.is_some()
    }

    /// Runtime in nanoseconds, 0 until measured
    pub fn runtime(&self) -> f64 {
        self.measurement.map_or(0.0, |m| m.runtime_ns)
    }

    /// Uncertainty in percent, 0 until measured
    pub fn uncertainty(&self) -> f64 {
        self.measurement.map_or(0.0, |m| m.uncertainty_pct)
    }
}

/// The authoritative collection of benchmarks for one run.
#[derive(Debug, Default)]
pub struct Registry {
    benchmarks: Vec<Benchmark>,
}

impl Registry {
    /// Every immediate sub-directory of `source_root` becomes one benchmark.
    /// Plain files are skipped and nested directories are not visited.
    /// Benchmarks are sorted by name.
    pub fn discover(source_root: &Path) -> Result<Self, EvalError> {
        let read_err = |source| EvalError::DirectoryRead {
            path: source_root.to_owned(),
            source,
        };
        let mut benchmarks = Vec::new();
        for entry in std::fs::read_dir(source_root).map_err(read_err)? {
            let entry = entry.map_err(read_err)?;
            if !entry.path().is_dir() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            benchmarks.push(Benchmark::new(name, source_root));
        }
        benchmarks.sort_by(|a, b| a.name.cmp(&b.name));
        log::debug!(
            "Discovered {} benchmarks in {}",
            benchmarks.len(),
            source_root.display()
        );
        Ok(Self { benchmarks })
    }

    pub fn benchmarks(&self) -> &[Benchmark] {
        &self.benchmarks
    }

    pub fn benchmarks_mut(&mut self) -> &mut [Benchmark] {
        &mut self.benchmarks
    }

    pub fn into_benchmarks(self) -> Vec<Benchmark> {
        self.benchmarks
    }

    pub fn len(&self) -> usize {
        self.benchmarks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.benchmarks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use tempdir::TempDir;

    use super::*;

    #[test]
    fn discovery_takes_each_subdirectory_once() {
        let tmp = TempDir::new("registry").unwrap();
        let root = tmp.path();
        std::fs::create_dir(root.join("fft")).unwrap();
        std::fs::create_dir(root.join("add")).unwrap();
        std::fs::create_dir_all(root.join("add/nested")).unwrap();
        std::fs::create_dir(root.join("empty")).unwrap();
        std::fs::write(root.join("README.md"), "").unwrap();
        std::fs::write(root.join("add/add.c"), "int main(){}").unwrap();

        let registry = Registry::discover(root).unwrap();
        let names = registry
            .benchmarks()
            .iter()
            .map(|b| b.name.as_str())
            .collect::<Vec<_>>();
        assert_eq!(names, ["add", "empty", "fft"]);
        assert_eq!(registry.len(), 3);
        assert_eq!(registry.benchmarks()[0].path, root.join("add"));
        assert!(registry.benchmarks().iter().all(|b| !b.is_measured()));
        assert_eq!(registry.benchmarks()[0].runtime(), 0.0);
        assert_eq!(registry.benchmarks()[0].uncertainty(), 0.0);
    }

    #[test]
    fn discovery_fails_on_missing_root() {
        let tmp = TempDir::new("registry").unwrap();
        let err = Registry::discover(&tmp.path().join("nope")).unwrap_err();
        assert!(matches!(err, EvalError::DirectoryRead { .. }));
    }

    #[test]
    fn empty_root_discovers_nothing() {
        let tmp = TempDir::new("registry").unwrap();
        let registry = Registry::discover(tmp.path()).unwrap();
        assert!(registry.is_empty());
        assert_eq!(registry.len(), 0);
    }

    #[test]
    fn record_sets_both_values() {
        let mut bench = Benchmark::new("add", Path::new("src"));
        bench.record(Measurement {
            runtime_ns: 1234567.0,
            uncertainty_pct: 3.45,
        });
        assert_eq!(bench.runtime(), 1234567.0);
        assert_eq!(bench.uncertainty(), 3.45);
    }
}
