#![cfg(unix)]

use clap::Parser;
use perfeval::Cli;

use crate::helper::{TestWorkspace, ADD_C};


fn write_config(ws: &TestWorkspace) -> anyhow::Result<String> {
    let config = ws.config();
    let path = ws.path().join("perfeval.toml");
    std::fs::write(&path, toml::to_string(&config)?)?;
    Ok(path.display().to_string())
}

#[test]
fn test_run_with_config_file() -> anyhow::Result<()> {
    let _guard = helper::SYNC.lock().unwrap();
    let ws = TestWorkspace::new()?;
    ws.benchmark("add", &[("add.c", ADD_C)])?;
    let config = write_config(&ws)?;
    perfeval::entry(&Cli::parse_from(["perfeval", "run", "--config", &config]))?;
    assert_eq!(ws.compile_log().len(), 1);
    assert_eq!(ws.measure_log().len(), 1);
    assert!(ws.measure_log()[0].contains("--repeat=10"));
    Ok(())
}

#[test]
fn test_run_overrides_repeats() -> anyhow::Result<()> {
    let _guard = helper::SYNC.lock().unwrap();
    let ws = TestWorkspace::new()?;
    ws.benchmark("add", &[("add.c", ADD_C)])?;
    let config = write_config(&ws)?;
    perfeval::entry(&Cli::parse_from([
        "perfeval", "run", "--config", &config, "-r", "3",
    ]))?;
    assert!(ws.measure_log()[0].contains("--repeat=3"));
    Ok(())
}

#[test]
fn test_run_rejects_zero_repeats() -> anyhow::Result<()> {
    let _guard = helper::SYNC.lock().unwrap();
    let ws = TestWorkspace::new()?;
    let config = write_config(&ws)?;
    let result = perfeval::entry(&Cli::parse_from([
        "perfeval", "run", "--config", &config, "--repeats", "0",
    ]));
    assert!(result.is_err());
    assert!(ws.measure_log().is_empty());
    Ok(())
}

#[test]
fn test_keep_going_still_fails_the_command() -> anyhow::Result<()> {
    let _guard = helper::SYNC.lock().unwrap();
    let ws = TestWorkspace::new()?;
    ws.benchmark("add", &[("add.c", ADD_C)])?;
    ws.benchmark("broken", &[("broken.c", "")])?;
    let config = write_config(&ws)?;
    let result = perfeval::entry(&Cli::parse_from([
        "perfeval",
        "run",
        "--config",
        &config,
        "--keep-going",
    ]));
    assert!(result.is_err());
    assert!(ws.dirs().report_path("add").is_file());
    Ok(())
}

#[test]
fn test_report_never_runs_tools() -> anyhow::Result<()> {
    let _guard = helper::SYNC.lock().unwrap();
    let ws = TestWorkspace::new()?;
    ws.benchmark("add", &[("add.c", ADD_C)])?;
    ws.benchmark("fft", &[("fft.c", ADD_C)])?;
    std::fs::create_dir_all(ws.path().join("stats"))?;
    std::fs::write(ws.dirs().report_path("add"), helper::PERF_REPORT)?;
    let config = write_config(&ws)?;
    perfeval::entry(&Cli::parse_from([
        "perfeval", "report", "--config", &config, "--json",
    ]))?;
    assert!(ws.compile_log().is_empty());
    assert!(ws.measure_log().is_empty());
    assert!(!ws.path().join("bin").exists());
    Ok(())
}
