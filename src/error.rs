use std::{fmt, io, path::PathBuf, process::ExitStatus};

use thiserror::Error;

/// Errors raised by the individual pipeline components.
///
/// Components never terminate the process themselves; the orchestrator decides
/// whether a failure aborts the whole run.
#[derive(Error, Debug)]
pub enum EvalError {
    #[error("Unable to read directory \"{}\": {source}", .path.display())]
    DirectoryRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Unable to create directory \"{}\": {source}", .path.display())]
    DirectoryCreate {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("No source files found to compile in \"{}\"", .0.display())]
    NoSourceFiles(PathBuf),
    #[error("Compiler `{compiler}` {cause}")]
    Compile {
        compiler: String,
        #[source]
        cause: ProcessFailure,
    },
    #[error("Executable \"{name}\" not found in {}", .dir.display())]
    ExecutableNotFound { name: String, dir: PathBuf },
    #[error("Measurement command `{command}` {cause}")]
    Measure {
        command: String,
        #[source]
        cause: ProcessFailure,
    },
    #[error("Unable to open report \"{}\": {source}", .path.display())]
    ReportOpen {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Unable to read report \"{}\": {source}", .path.display())]
    ReportRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Unable to locate runtime and/or uncertainty in \"{}\"", .0.display())]
    IncompleteReport(PathBuf),
}

/// Why an external process did not succeed.
#[derive(Error, Debug)]
pub enum ProcessFailure {
    #[error("could not be started: {0}")]
    Spawn(#[from] io::Error),
    #[error("exited with {0}")]
    Exit(ExitStatus),
}

/// The phase of the per-benchmark pipeline that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Loading a pre-existing report during cache filtering
    Cache,
    Compile,
    Measure,
    /// Reading the report that the measurement just produced
    Parse,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Stage::Cache => "Unable to read results",
            Stage::Compile => "Problem compiling benchmark",
            Stage::Measure => "Problem evaluating benchmark",
            Stage::Parse => "Unable to read results for",
        };
        f.write_str(s)
    }
}

/// A component failure tagged with the benchmark and the phase it happened in.
#[derive(Error, Debug)]
#[error("{stage} \"{name}\": {source}")]
pub struct BenchmarkError {
    pub name: String,
    pub stage: Stage,
    #[source]
    pub source: EvalError,
}

impl BenchmarkError {
    pub fn new(name: impl Into<String>, stage: Stage, source: EvalError) -> Self {
        Self {
            name: name.into(),
            stage,
            source,
        }
    }
}

/// Errors that stop a whole pipeline run.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Directory bootstrap or benchmark discovery failed
    #[error(transparent)]
    Setup(#[from] EvalError),
    /// A benchmark failed while running with the `abort` policy
    #[error(transparent)]
    Benchmark(#[from] BenchmarkError),
}
