//! Runs `perf stat` against a compiled benchmark.
//!
//! With the default launcher the tool runs as root (`sudo`) under SCHED_FIFO at
//! priority 99 (`chrt -f 99`). While it runs it can starve every other process
//! on the host. Nothing here is sandboxed and nothing is retried.
use std::process::Command;

use crate::{
    config::{Directories, MeasureConfig},
    error::{EvalError, ProcessFailure},
    probe,
    registry::Benchmark,
    utils::command_line,
};

/// Build `<launcher..> <tool> stat -o <results>/<name>.txt -e <event> --repeat=<N> <binaries>/<name>`.
pub fn measure_command(config: &MeasureConfig, dirs: &Directories, name: &str) -> Command {
    let (program, prefix) = match config.launcher.split_first() {
        Some((program, rest)) => (program.as_str(), rest),
        None => (config.tool.as_str(), &[] as &[String]),
    };
    let mut cmd = Command::new(program);
    cmd.args(prefix);
    if !config.launcher.is_empty() {
        cmd.arg(&config.tool);
    }
    cmd.arg("stat")
        .arg("-o")
        .arg(dirs.report_path(name))
        .args(["-e", config.event.as_str()])
        .arg(format!("--repeat={}", config.repeats))
        .arg(dirs.executable_path(name))
        .envs(&config.env);
    cmd
}

/// Measure one compiled benchmark, writing its report to `<results>/<name>.txt`.
///
/// Fails with [`EvalError::ExecutableNotFound`] without spawning anything if
/// `<binaries>/<name>` does not exist.
pub fn measure(
    benchmark: &Benchmark,
    dirs: &Directories,
    config: &MeasureConfig,
) -> Result<(), EvalError> {
    if !probe::contains(&benchmark.name, &dirs.binaries)? {
        return Err(EvalError::ExecutableNotFound {
            name: benchmark.name.clone(),
            dir: dirs.binaries.clone(),
        });
    }
    let mut cmd = measure_command(config, dirs, &benchmark.name);
    let command = command_line(&cmd);
    log::debug!("{}", command);
    let status = cmd.status().map_err(|e| EvalError::Measure {
        command: command.clone(),
        cause: ProcessFailure::Spawn(e),
    })?;
    if !status.success() {
        return Err(EvalError::Measure {
            command,
            cause: ProcessFailure::Exit(status),
        });
    }
    Ok(())
}
