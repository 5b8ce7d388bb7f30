use clap::Parser;
use colored::Colorize;
use once_cell::sync::Lazy;

static CMD_ARGS: Lazy<perfeval::Cli> = Lazy::new(|| {
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info")
    }
    perfeval::Cli::parse()
});

fn main() -> anyhow::Result<()> {
    Lazy::force(&CMD_ARGS);
    env_logger::init();
    if let Err(err) = perfeval::entry(&CMD_ARGS) {
        eprintln!("❌ {}: {}", "ERROR".red().bold(), err.to_string().red());
        std::process::exit(1);
    }
    Ok(())
}
