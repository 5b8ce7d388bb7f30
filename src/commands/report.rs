use clap::Parser;
use colored::Colorize;

use super::ConfigArgs;
use crate::{pipeline::Pipeline, utils::md::MarkdownPrinter};

/// Show cached results without compiling or measuring anything
#[derive(Parser)]
pub struct ReportArgs {
    #[command(flatten)]
    pub config: ConfigArgs,
    /// Print the results as JSON
    #[arg(long, default_value = "false")]
    pub json: bool,
}

impl ReportArgs {
    pub fn run(&self) -> anyhow::Result<()> {
        let config = self.config.load()?;
        let evaluation = Pipeline::new(&config).inspect()?;
        if self.json {
            println!("{}", serde_json::to_string_pretty(&evaluation.benchmarks)?);
        } else {
            let pending = evaluation.benchmarks.len() - evaluation.cached;
            let mut printer = MarkdownPrinter::new();
            printer.add("# Benchmark Results\n\n");
            printer.add(format!("* results: `{}`\n", config.dirs.results.display()));
            printer.add(format!("* evaluated: `{}`\n", evaluation.cached));
            printer.add(format!("* pending: `{}`\n\n", pending));
            printer.add_benchmark_table(&evaluation.benchmarks);
            printer.dump();
        }
        if !evaluation.is_success() {
            for err in &evaluation.failures {
                eprintln!("{} {}", "✘".red(), err.to_string().red());
            }
            anyhow::bail!("{} reports could not be read", evaluation.failures.len());
        }
        Ok(())
    }
}
