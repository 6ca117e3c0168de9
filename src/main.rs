use anyhow::Result;
use clap::Parser;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod battery;
mod config;
mod discovery;
mod dmi;
mod error;
mod fallback;
mod report;
mod sysfs;
mod types;

use battery::BatteryReader;
use config::Config;
use fallback::{CommandRunner, SystemRunner};
use report::Reporter;
use sysfs::Sysfs;

#[derive(Parser, Debug, Default)]
#[command(name = "battery-cycle-count", version)]
#[command(about = "BatteryCycleCount - Read battery cycle count on ThinkPad laptops")]
#[command(after_help = "This tool is optimized for ThinkPad 14s Gen 3 on Ubuntu with Wayland support")]
struct Cli {
    /// Show detailed battery information
    #[arg(short, long)]
    verbose: bool,

    /// Check system compatibility
    #[arg(long)]
    check_system: bool,

    /// Print only `Bat:<count>`, for status bars
    #[arg(long, conflicts_with_all = ["verbose", "check_system"])]
    short: bool,

    /// Read configuration from this file instead of the default location
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

/// Performs one full run and reports whether a cycle count was found.
fn run<W: Write, R: CommandRunner>(cli: &Cli, config: &Config, runner: R, out: W) -> Result<bool> {
    let mut reporter = Reporter::new(out, config.wear.clone());
    let reader = BatteryReader::new(config, runner);

    if cli.short {
        let scan = reader.scan();
        reporter.short(scan.cycle_count)?;
        return Ok(scan.cycle_count.is_some());
    }

    reporter.header()?;

    if cli.check_system {
        let system = dmi::read_system_info(&Sysfs::new(&config.root));
        reporter.system(&system)?;
        reporter.blank_line()?;
    }

    let scan = reader.scan();
    reporter.scan(&scan)?;

    if cli.verbose {
        reporter.details(scan.info.as_ref())?;
    }

    reporter.summary(scan.cycle_count)?;
    Ok(scan.cycle_count.is_some())
}

fn main() -> Result<ExitCode> {
    // Diagnostics go to stderr; RUST_LOG controls verbosity (default: warn).
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref());
    tracing::debug!(?cli, root = ?config.root, "starting");

    let stdout = std::io::stdout();
    let found = run(&cli, &config, SystemRunner, stdout.lock())?;

    Ok(if found { ExitCode::SUCCESS } else { ExitCode::from(1) })
}
