use std::path::PathBuf;

use clap::Args;

use crate::config::Config;

pub mod report;
pub mod run;

/// Options shared by all sub-commands for locating the config and directories
#[derive(Args)]
pub struct ConfigArgs {
    /// Path to the config file. Default to `./perfeval.toml` if it exists
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Benchmark source directory (one sub-directory per benchmark)
    #[arg(long)]
    pub source: Option<PathBuf>,
    /// Directory holding the `perf stat` reports
    #[arg(long)]
    pub results: Option<PathBuf>,
    /// Directory holding the compiled executables
    #[arg(long)]
    pub binaries: Option<PathBuf>,
}

impl ConfigArgs {
    /// Load the config file and apply the directory overrides
    pub fn load(&self) -> anyhow::Result<Config> {
        let mut config = Config::load(self.config.as_deref())?;
        if let Some(source) = &self.source {
            config.dirs.source = source.clone();
        }
        if let Some(results) = &self.results {
            config.dirs.results = results.clone();
        }
        if let Some(binaries) = &self.binaries {
            config.dirs.binaries = binaries.clone();
        }
        Ok(config)
    }
}
