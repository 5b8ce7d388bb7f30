use std::{path::Path, process::Command};

use crate::{
    config::CompileConfig,
    error::{EvalError, ProcessFailure},
    probe,
    registry::Benchmark,
    utils::command_line,
};

/// Source file suffix collected for compilation
pub const SOURCE_SUFFIX: &str = ".c";

/// Build `<compiler> [flags..] -o <binaries>/<name> <sources..>` for one benchmark.
///
/// The command inherits the caller's environment, plus the configured extras.
pub fn compile_command(
    config: &CompileConfig,
    benchmark: &Benchmark,
    binaries: &Path,
) -> Result<Command, EvalError> {
    let sources = probe::files_with_suffix(&benchmark.path, SOURCE_SUFFIX)?;
    if sources.is_empty() {
        return Err(EvalError::NoSourceFiles(benchmark.path.clone()));
    }
    let mut cmd = Command::new(&config.compiler);
    cmd.args(&config.flags)
        .arg("-o")
        .arg(binaries.join(&benchmark.name))
        .args(&sources)
        .envs(&config.env);
    Ok(cmd)
}

/// Compile one benchmark into `<binaries>/<name>`. Blocks until the compiler exits.
pub fn compile(
    config: &CompileConfig,
    benchmark: &Benchmark,
    binaries: &Path,
) -> Result<(), EvalError> {
    let mut cmd = compile_command(config, benchmark, binaries)?;
    log::debug!("{}", command_line(&cmd));
    let fail = |cause| EvalError::Compile {
        compiler: config.compiler.clone(),
        cause,
    };
    let status = cmd.status().map_err(|e| fail(ProcessFailure::Spawn(e)))?;
    if !status.success() {
        return Err(fail(ProcessFailure::Exit(status)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::ffi::OsStr;

    use tempdir::TempDir;

    use super::*;

    fn bench_with_files(tmp: &TempDir, files: &[&str]) -> Benchmark {
        let bench = Benchmark::new("add", tmp.path());
        std::fs::create_dir_all(&bench.path).unwrap();
        for f in files {
            std::fs::write(bench.path.join(f), "").unwrap();
        }
        bench
    }

    #[test]
    fn command_lists_output_then_sources() {
        let tmp = TempDir::new("compile").unwrap();
        let bench = bench_with_files(&tmp, &["main.c", "add.c", "add.h"]);
        let config = CompileConfig::default();
        let cmd = compile_command(&config, &bench, Path::new("bin")).unwrap();
        assert_eq!(cmd.get_program(), "cc");
        let args = cmd.get_args().collect::<Vec<_>>();
        assert_eq!(
            args,
            [
                OsStr::new("-o"),
                OsStr::new("bin/add"),
                bench.path.join("add.c").as_os_str(),
                bench.path.join("main.c").as_os_str(),
            ]
        );
    }

    #[test]
    fn flags_and_env_are_applied() {
        let tmp = TempDir::new("compile").unwrap();
        let bench = bench_with_files(&tmp, &["add.c"]);
        let config = CompileConfig {
            compiler: "gcc".to_owned(),
            flags: vec!["-O2".to_owned()],
            env: [("LANG".to_owned(), "C".to_owned())].into_iter().collect(),
        };
        let cmd = compile_command(&config, &bench, Path::new("bin")).unwrap();
        assert_eq!(cmd.get_program(), "gcc");
        assert_eq!(cmd.get_args().next(), Some(OsStr::new("-O2")));
        let envs = cmd.get_envs().collect::<Vec<_>>();
        assert_eq!(envs, [(OsStr::new("LANG"), Some(OsStr::new("C")))]);
    }

    #[test]
    fn no_c_files_is_an_error_even_with_other_files() {
        let tmp = TempDir::new("compile").unwrap();
        let bench = bench_with_files(&tmp, &["add.h", "Makefile", "add.cpp"]);
        let err = compile(&CompileConfig::default(), &bench, tmp.path()).unwrap_err();
        assert!(matches!(err, EvalError::NoSourceFiles(_)));
    }

    #[test]
    fn missing_compiler_is_a_spawn_failure() {
        let tmp = TempDir::new("compile").unwrap();
        let bench = bench_with_files(&tmp, &["add.c"]);
        let config = CompileConfig {
            compiler: "/nonexistent/perfeval-cc".to_owned(),
            ..Default::default()
        };
        let err = compile(&config, &bench, tmp.path()).unwrap_err();
        assert!(matches!(
            err,
            EvalError::Compile {
                cause: ProcessFailure::Spawn(_),
                ..
            }
        ));
    }
}
