use clap::Parser;
use colored::Colorize;

use super::ConfigArgs;
use crate::{
    config::{Config, FailurePolicy},
    pipeline::{Evaluation, Pipeline},
    print_md,
};

/// Compile and measure every benchmark that has no cached report yet
#[derive(Parser)]
pub struct RunArgs {
    #[command(flatten)]
    pub config: ConfigArgs,
    /// Number of runs `perf stat` aggregates per benchmark
    #[arg(short = 'r', long)]
    pub repeats: Option<usize>,
    /// C compiler used to build the benchmarks
    #[arg(long)]
    pub compiler: Option<String>,
    /// Keep evaluating the remaining benchmarks after a failure
    #[arg(long, default_value = "false")]
    pub keep_going: bool,
}

impl RunArgs {
    fn load_config(&self) -> anyhow::Result<Config> {
        let mut config = self.config.load()?;
        if let Some(repeats) = self.repeats {
            config.measure.repeats = repeats;
        }
        if let Some(compiler) = &self.compiler {
            config.compile.compiler = compiler.clone();
        }
        if self.keep_going {
            config.on_failure = FailurePolicy::Continue;
        }
        config.validate()?;
        Ok(config)
    }

    fn print_before_run(&self, config: &Config) {
        print_md!("# perfeval\n\n");
        print_md!("* benchmarks: `{}`", config.dirs.source.display());
        print_md!("* results: `{}`", config.dirs.results.display());
        print_md!("* binaries: `{}`", config.dirs.binaries.display());
        print_md!("* compiler: `{}`", config.compile.compiler);
        print_md!("* repeats: `{}`", config.measure.repeats);
        println!();
    }

    fn print_results(&self, evaluation: &Evaluation) {
        for line in evaluation.result_lines() {
            println!("{}", line);
        }
    }

    pub fn run(&self) -> anyhow::Result<()> {
        let config = self.load_config()?;
        self.print_before_run(&config);
        let evaluation = Pipeline::new(&config).run()?;
        self.print_results(&evaluation);
        println!();
        print_md!("**{}**", evaluation.summary());
        if !evaluation.is_success() {
            eprintln!();
            for err in &evaluation.failures {
                eprintln!("{} {}", "✘".red(), err.to_string().red());
            }
            anyhow::bail!(
                "{} of {} benchmarks failed",
                evaluation.failures.len(),
                evaluation.benchmarks.len()
            );
        }
        Ok(())
    }
}
