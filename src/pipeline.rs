//! The evaluation pipeline.
//!
//! Each benchmark moves through `Discovered → Compiled → Measured → Parsed`.
//! Any failure is terminal for that benchmark and is never retried. What happens
//! to the siblings is decided by the configured [`FailurePolicy`].
//!
//! Reports in the results directory double as a cache: a benchmark whose
//! `<name>.txt` already exists is parsed during filtering and never compiled or
//! measured again.
use crate::{
    compiler,
    config::{Config, Directories, FailurePolicy},
    error::{BenchmarkError, EvalError, PipelineError, Stage},
    measure, probe,
    registry::{Benchmark, Measurement, Registry},
    report,
};

/// Where a single benchmark is in the pipeline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum State {
    Discovered,
    Compiled,
    Measured,
    Parsed(Measurement),
}

/// Outcome of a pipeline run.
#[derive(Debug)]
pub struct Evaluation {
    /// All discovered benchmarks, in discovery order
    pub benchmarks: Vec<Benchmark>,
    /// Benchmarks served from existing reports
    pub cached: usize,
    /// Benchmarks compiled (if needed) and measured in this run
    pub evaluated: usize,
    /// Failures recorded under [`FailurePolicy::Continue`]
    pub failures: Vec<BenchmarkError>,
}

impl Evaluation {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// Benchmark, cached, evaluated and failed counts
    pub fn summary(&self) -> String {
        format!(
            "{} benchmarks: {} cached, {} evaluated, {} failed",
            self.benchmarks.len(),
            self.cached,
            self.evaluated,
            self.failures.len()
        )
    }

    /// Result lines for every measured benchmark
    pub fn result_lines(&self) -> impl Iterator<Item = String> + '_ {
        self.benchmarks
            .iter()
            .filter(|b| b.is_measured())
            .map(result_line)
    }
}

/// `name`, runtime in ns and uncertainty in %, both with two decimals.
pub fn result_line(benchmark: &Benchmark) -> String {
    format!(
        "{}\t\t\t\t{:.2} ns\t\t\t{:.2}%",
        benchmark.name,
        benchmark.runtime(),
        benchmark.uncertainty()
    )
}

/// Drives discovery, cache filtering and the per-benchmark state machine.
pub struct Pipeline<'a> {
    config: &'a Config,
}

impl<'a> Pipeline<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    /// Create the source, results and binaries directories if they are missing.
    pub fn prepare(&self) -> Result<(), EvalError> {
        let dirs = &self.config.dirs;
        if !dirs.source.is_dir() {
            log::warn!(
                "Benchmark directory {} does not exist and will be empty",
                dirs.source.display()
            );
        }
        probe::ensure_directories(&[&dirs.source, &dirs.results, &dirs.binaries])
    }

    pub fn discover(&self) -> Result<Registry, EvalError> {
        Registry::discover(&self.config.dirs.source)
    }

    /// If a report already exists, parse it into `benchmark` and return true.
    pub fn load_cached(&self, benchmark: &mut Benchmark) -> Result<bool, BenchmarkError> {
        let dirs = &self.config.dirs;
        let report_name = Directories::report_name(&benchmark.name);
        let fail = |e| BenchmarkError::new(&benchmark.name, Stage::Cache, e);
        if !probe::contains(&report_name, &dirs.results).map_err(fail)? {
            return Ok(false);
        }
        let measurement = report::parse(&dirs.report_path(&benchmark.name)).map_err(fail)?;
        log::info!("Using cached results for \"{}\"", benchmark.name);
        benchmark.record(measurement);
        Ok(true)
    }

    /// Advance one benchmark by one state.
    pub fn step(&self, benchmark: &Benchmark, state: State) -> Result<State, BenchmarkError> {
        let dirs = &self.config.dirs;
        let name = benchmark.name.as_str();
        match state {
            State::Discovered => {
                let compiled = probe::contains(name, &dirs.binaries)
                    .map_err(|e| BenchmarkError::new(name, Stage::Compile, e))?;
                if compiled {
                    log::info!("Executable for \"{}\" exists, skipping compilation", name);
                } else {
                    log::info!("Compiling benchmark \"{}\"...", name);
                    compiler::compile(&self.config.compile, benchmark, &dirs.binaries)
                        .map_err(|e| BenchmarkError::new(name, Stage::Compile, e))?;
                }
                Ok(State::Compiled)
            }
            State::Compiled => {
                log::info!("Evaluating benchmark \"{}\"...", name);
                measure::measure(benchmark, dirs, &self.config.measure)
                    .map_err(|e| BenchmarkError::new(name, Stage::Measure, e))?;
                Ok(State::Measured)
            }
            State::Measured => report::parse(&dirs.report_path(name))
                .map(State::Parsed)
                .map_err(|e| BenchmarkError::new(name, Stage::Parse, e)),
            State::Parsed(m) => Ok(State::Parsed(m)),
        }
    }

    /// Remove whatever report a failed benchmark left in the results directory.
    fn discard_report(&self, name: &str) {
        let path = self.config.dirs.report_path(name);
        match std::fs::remove_file(&path) {
            Ok(()) => log::info!(
                "Removed report {} of failed benchmark \"{}\"",
                path.display(),
                name
            ),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => log::warn!("Failed to remove report {}: {}", path.display(), e),
        }
    }

    /// Compile (unless already compiled), measure and parse one benchmark.
    /// A failed measure or parse leaves no report behind.
    pub fn evaluate(&self, benchmark: &mut Benchmark) -> Result<Measurement, BenchmarkError> {
        let mut state = State::Discovered;
        loop {
            state = match self.step(benchmark, state) {
                Ok(state) => state,
                Err(e) => {
                    if matches!(e.stage, Stage::Measure | Stage::Parse) {
                        self.discard_report(&benchmark.name);
                    }
                    return Err(e);
                }
            };
            if let State::Parsed(m) = state {
                benchmark.record(m);
                log::info!(
                    "\"{}\": {:.2} ns +- {:.2}%",
                    benchmark.name,
                    m.runtime_ns,
                    m.uncertainty_pct
                );
                return Ok(m);
            }
        }
    }

    fn handle_failure(
        &self,
        err: BenchmarkError,
        failures: &mut Vec<BenchmarkError>,
    ) -> Result<(), BenchmarkError> {
        match self.config.on_failure {
            FailurePolicy::Abort => Err(err),
            FailurePolicy::Continue => {
                log::warn!("{}", err);
                failures.push(err);
                Ok(())
            }
        }
    }

    /// Run the whole pipeline: bootstrap, discover, filter through the cache,
    /// then evaluate the remaining benchmarks one at a time in discovery order.
    pub fn run(&self) -> Result<Evaluation, PipelineError> {
        self.prepare()?;
        let mut registry = self.discover()?;
        if registry.is_empty() {
            log::warn!("No benchmarks found in {}", self.config.dirs.source.display());
        } else {
            log::info!("Found {} benchmarks", registry.len());
        }
        let mut failures = Vec::new();
        let mut cached = 0;
        let mut pending = Vec::new();
        for benchmark in registry.benchmarks_mut() {
            match self.load_cached(benchmark) {
                Ok(true) => cached += 1,
                Ok(false) => pending.push(benchmark),
                Err(e) => self.handle_failure(e, &mut failures)?,
            }
        }
        log::info!("{} cached, {} to evaluate", cached, pending.len());
        let mut evaluated = 0;
        for benchmark in pending {
            match self.evaluate(benchmark) {
                Ok(_) => evaluated += 1,
                Err(e) => self.handle_failure(e, &mut failures)?,
            }
        }
        Ok(Evaluation {
            benchmarks: registry.into_benchmarks(),
            cached,
            evaluated,
            failures,
        })
    }

    /// Read-only view of the cache: discover benchmarks and parse existing reports.
    /// Nothing is created, compiled or measured, and every failure is collected.
    pub fn inspect(&self) -> Result<Evaluation, PipelineError> {
        let mut registry = self.discover()?;
        let mut failures = Vec::new();
        let mut cached = 0;
        if self.config.dirs.results.is_dir() {
            for benchmark in registry.benchmarks_mut() {
                match self.load_cached(benchmark) {
                    Ok(true) => cached += 1,
                    Ok(false) => {}
                    Err(e) => failures.push(e),
                }
            }
        }
        Ok(Evaluation {
            benchmarks: registry.into_benchmarks(),
            cached,
            evaluated: 0,
            failures,
        })
    }
}
