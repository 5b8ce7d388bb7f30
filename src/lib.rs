use clap::{Parser, Subcommand};

#[macro_use]
pub mod utils;
mod commands;
pub mod compiler;
pub mod config;
pub mod error;
pub mod measure;
pub mod pipeline;
pub mod probe;
pub mod registry;
pub mod report;

pub use config::{Config, Directories, FailurePolicy};
pub use error::{BenchmarkError, EvalError, PipelineError, Stage};
pub use pipeline::{Evaluation, Pipeline};
pub use registry::{Benchmark, Measurement, Registry};

/// Compile a directory of C benchmarks and measure them with `perf stat`
#[derive(Parser)]
#[command(name = "perfeval", version)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    Run(commands::run::RunArgs),
    Report(commands::report::ReportArgs),
}

#[doc(hidden)]
pub fn entry(cli: &Cli) -> anyhow::Result<()> {
    match &cli.command {
        Commands::Run(cmd) => cmd.run(),
        Commands::Report(cmd) => cmd.run(),
    }
}
