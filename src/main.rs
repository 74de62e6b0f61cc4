//! fsvs-apt-hook - CLI entry point.

use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use fsvs_apt_hook::config::{ConfigOverrides, DEFAULT_MESSAGE_PREFIX};
use fsvs_apt_hook::hook::prompt::select_confirmer;
use fsvs_apt_hook::{DryRunReport, FsvsClient, HookConfig, HookOutcome, dry_run, run_hook};

/// Commit configuration changes to fsvs after an apt transaction.
#[derive(Parser, Debug)]
#[command(name = "fsvs-apt-hook")]
#[command(about = "Commit configuration changes to fsvs after an apt transaction")]
#[command(version)]
struct Cli {
    /// Config file (defaults to /etc/fsvs-apt-hook.toml if present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Apt transaction log to read
    #[arg(long)]
    log: Option<PathBuf>,

    /// Path under fsvs version control
    #[arg(long)]
    root: Option<PathBuf>,

    /// fsvs binary (absolute path or name on PATH)
    #[arg(long)]
    vcs: Option<String>,

    /// File the commit message is written to
    #[arg(long)]
    message_file: Option<PathBuf>,

    /// Commit without asking for confirmation
    #[arg(short, long)]
    yes: bool,

    /// Show what would be committed without prompting or committing
    #[arg(long)]
    dry_run: bool,

    /// Print the dry-run report as JSON
    #[arg(long, requires = "dry_run")]
    json: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            println!("{}error: {:#}", DEFAULT_MESSAGE_PREFIX, e);
            return ExitCode::FAILURE;
        }
    };

    match run(&cli, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            println!("{}error: {:#}", config.message_prefix, e);
            ExitCode::FAILURE
        }
    }
}

/// Log to stderr so stdout stays reserved for the operator dialogue.
/// Colour only when stderr is a terminal, so apt's term.log stays plain.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .with_ansi(std::io::stderr().is_terminal())
        .with_writer(std::io::stderr)
        .init();
}

/// Layer CLI flags over the file and environment configuration.
fn load_config(cli: &Cli) -> Result<HookConfig> {
    let overrides = ConfigOverrides {
        log_path: cli.log.clone(),
        vcs_binary: cli.vcs.clone(),
        tracked_root: cli.root.clone(),
        message_file: cli.message_file.clone(),
    };

    HookConfig::resolve(cli.config.as_deref(), &overrides).context("Failed to load configuration")
}

fn run(cli: &Cli, config: &HookConfig) -> Result<()> {
    let vcs = FsvsClient::new(config.vcs_binary.clone());

    if cli.dry_run {
        let report = dry_run(config, &vcs)?;
        if cli.json {
            let json = report
                .to_json()
                .context("Failed to serialize dry-run report")?;
            println!("{}", json);
        } else {
            print_dry_run(&report);
        }
        return Ok(());
    }

    let confirmer = select_confirmer(cli.yes);
    let mut stdout = std::io::stdout();

    match run_hook(config, &vcs, confirmer.as_ref(), &mut stdout)? {
        HookOutcome::NoChanges => {
            println!("No configuration changes under {}.", config.tracked_root.display())
        }
        HookOutcome::Declined => println!("Commit skipped."),
        HookOutcome::Committed => println!("✓ Committed {}", config.tracked_root.display()),
    }

    Ok(())
}

/// Print a human-readable dry-run report.
fn print_dry_run(report: &DryRunReport) {
    if let Some(started) = report.session.started_at {
        println!("Last apt session started {}", started);
    }

    println!("Commit message:");
    for line in &report.message {
        println!("  {}", line);
    }

    println!();
    if report.status.is_empty() {
        println!("No changed files. Nothing would be committed.");
    } else {
        println!("Changed files ({}):", report.status.len());
        for entry in &report.status {
            println!("  {}", entry);
        }
    }

    println!();
    println!("Dry run complete. No changes made.");
}
