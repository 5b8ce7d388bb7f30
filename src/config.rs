//! The evaluation configs
//!
//! Loaded from `perfeval.toml` in the current directory, or from the file passed
//! with `--config`. Every key is optional; the defaults evaluate the TACLeBench
//! sequential suite with `cc` and `perf stat`.
//!
//! # Example:
//!
//! ```toml
//! # Keep evaluating sibling benchmarks after a failure. Default to "abort"
//! on-failure = "continue"
//!
//! [dirs]
//! source = "tacle-bench/bench/sequential" # One sub-directory per benchmark
//! results = "stats" # Cached `perf stat` reports, `<name>.txt`
//! binaries = "bin" # Compiled executables, `<name>`
//!
//! [compile]
//! compiler = "cc"
//! flags = ["-O2"] # Placed before `-o`
//! env = { CCACHE_DISABLE = "1" }
//!
//! [measure]
//! repeats = 10
//! # Prefix that elevates privilege and requests SCHED_FIFO priority 99
//! launcher = ["sudo", "chrt", "-f", "99"]
//! tool = "perf"
//! event = "duration_time"
//! ```
use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

/// Default config file name, looked up in the current directory.
pub const DEFAULT_CONFIG_FILE: &str = "perfeval.toml";

/// The three directories the pipeline works in.
///
/// Immutable once loaded and passed by reference to every component.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Directories {
    /// Benchmark sources. Every immediate sub-directory is one benchmark.
    pub source: PathBuf,
    /// Measurement reports, one `<name>.txt` per benchmark
    pub results: PathBuf,
    /// Compiled executables, one `<name>` per benchmark
    pub binaries: PathBuf,
}

impl Directories {
    pub fn new(
        source: impl Into<PathBuf>,
        results: impl Into<PathBuf>,
        binaries: impl Into<PathBuf>,
    ) -> Self {
        Self {
            source: source.into(),
            results: results.into(),
            binaries: binaries.into(),
        }
    }

    /// File name of a benchmark's report inside [`Directories::results`]
    pub fn report_name(name: &str) -> String {
        format!("{name}.txt")
    }

    pub fn report_path(&self, name: &str) -> PathBuf {
        self.results.join(Self::report_name(name))
    }

    pub fn executable_path(&self, name: &str) -> PathBuf {
        self.binaries.join(name)
    }
}

impl Default for Directories {
    fn default() -> Self {
        Self::new("tacle-bench/bench/sequential", "stats", "bin")
    }
}

/// How to build a benchmark's sources into an executable.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct CompileConfig {
    /// Compiler executable. Default to `cc`
    pub compiler: String,
    /// Extra arguments passed before `-o`. Default to none.
    pub flags: Vec<String>,
    /// Environment variables set on top of the inherited environment.
    pub env: HashMap<String, String>,
}

impl Default for CompileConfig {
    fn default() -> Self {
        Self {
            compiler: "cc".to_owned(),
            flags: Vec::new(),
            env: HashMap::new(),
        }
    }
}

/// How to run the measurement tool against an executable.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct MeasureConfig {
    /// Number of runs `perf stat` aggregates into one report. Default is 10
    pub repeats: usize,
    /// Command prefix for the measurement tool.
    /// Default to `sudo chrt -f 99`, i.e. root with SCHED_FIFO at the highest priority.
    pub launcher: Vec<String>,
    /// Measurement tool executable. Default to `perf`
    pub tool: String,
    /// The single event to record. Default to `duration_time`
    pub event: String,
    pub env: HashMap<String, String>,
}

impl Default for MeasureConfig {
    fn default() -> Self {
        Self {
            repeats: 10,
            launcher: ["sudo", "chrt", "-f", "99"]
                .into_iter()
                .map(|s| s.to_owned())
                .collect(),
            tool: "perf".to_owned(),
            event: "duration_time".to_owned(),
            env: HashMap::new(),
        }
    }
}

/// What to do with the remaining benchmarks once one of them fails.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Stop the whole run on the first failure
    #[default]
    Abort,
    /// Record the failure and evaluate the remaining benchmarks
    Continue,
}

/// The full evaluation config.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default, rename_all = "kebab-case")]
pub struct Config {
    pub on_failure: FailurePolicy,
    pub dirs: Directories,
    pub compile: CompileConfig,
    pub measure: MeasureConfig,
}

impl Config {
    pub fn from_toml_str(s: &str) -> anyhow::Result<Config> {
        let config = toml::from_str::<Config>(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Load the config from `path`, or from `./perfeval.toml` if no path is given.
    /// A missing default file yields the default config; a missing explicit file is an error.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Config> {
        let (path, explicit) = match path {
            Some(p) => (p.to_owned(), true),
            None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
        };
        if !path.is_file() {
            if explicit {
                anyhow::bail!("Failed to load config file {}", path.display());
            }
            log::debug!("No {} found, using default config", path.display());
            return Ok(Config::default());
        }
        let s = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&s)
            .map_err(|e| anyhow::anyhow!("Invalid config file {}: {}", path.display(), e))
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.measure.repeats == 0 {
            anyhow::bail!("`measure.repeats` must be at least 1");
        }
        if self.compile.compiler.is_empty() {
            anyhow::bail!("`compile.compiler` must not be empty");
        }
        if self.measure.tool.is_empty() {
            anyhow::bail!("`measure.tool` must not be empty");
        }
        Ok(())
    }
}
