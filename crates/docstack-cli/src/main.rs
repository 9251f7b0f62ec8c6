//! Docstack - Paperless-ngx host provisioner
//!
//! Usage:
//!   docstack install            # Provision this host interactively
//!   docstack install --dry-run  # Record commands, stage files in a temp root
//!   docstack steps              # List pipeline steps
//!   docstack units              # Render the service units
//!   docstack resolve            # Show the latest release

mod interactive;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use console::style;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use docstack_core::pipeline::{InstallReport, NoopObserver, StepObserver, StepOutcome};
use docstack_core::prelude::*;
use docstack_core::services::{WriteOutcome, paperless_units, write_unit};

use crate::interactive::{ConsoleProgress, TerminalPrompter};

#[derive(Parser)]
#[command(name = "docstack")]
#[command(about = "Paperless-ngx host provisioner", long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Provision Paperless-ngx on this host
    Install(Box<InstallArgs>),

    /// List pipeline steps in execution order
    Steps,

    /// Render the service unit files
    Units {
        /// Settings file (default: ~/.config/docstack/docstack.toml)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Write the units into this directory instead of printing them
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Resolve the latest release and its download URL
    Resolve {
        /// Settings file (default: ~/.config/docstack/docstack.toml)
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

#[derive(Args)]
struct InstallArgs {
    /// Settings file (default: ~/.config/docstack/docstack.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Stage every filesystem change under this directory
    #[arg(long)]
    root: Option<PathBuf>,

    /// Record external commands instead of running them
    ///
    /// Files are staged under a temporary root unless --root is given.
    /// Release resolution and downloads still use the network.
    #[arg(long)]
    dry_run: bool,

    /// Never prompt; unanswered prompts take their defaults
    #[arg(short, long)]
    yes: bool,

    /// Skip steps by id (repeatable or comma separated)
    #[arg(long, value_delimiter = ',')]
    skip: Vec<String>,

    /// Output format
    #[arg(short, long, default_value = "table")]
    format: OutputFormat,
}

#[derive(Clone, Copy, ValueEnum, Default)]
enum OutputFormat {
    /// Human-readable summary
    #[default]
    Table,
    /// Machine-readable JSON
    Json,
    /// Only print warnings
    Quiet,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "docstack=debug,info"
    } else {
        "docstack=info,warn"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Install(args) => run_install(*args),
        Commands::Steps => {
            print_steps();
            Ok(())
        }
        Commands::Units { config, out } => run_units(config, out),
        Commands::Resolve { config } => run_resolve(config),
    }
}

fn load_settings(config: Option<PathBuf>) -> Result<Settings> {
    let store = match config {
        Some(path) => SettingsStore::from_path(path),
        None => SettingsStore::from_default_location()?,
    };
    store.load()
}

fn parse_skip(ids: &[String]) -> Result<Vec<StepId>> {
    ids.iter()
        .map(|id| id.trim())
        .filter(|id| !id.is_empty())
        .map(str::parse)
        .collect()
}

fn run_install(args: InstallArgs) -> Result<()> {
    let settings = load_settings(args.config)?;
    let skip = parse_skip(&args.skip)?;

    let root = match (args.root, args.dry_run) {
        (Some(root), _) => root,
        (None, true) => tempfile::Builder::new()
            .prefix("docstack-dry-run-")
            .tempdir()
            .context("Failed to create staging directory")?
            .keep(),
        (None, false) => PathBuf::from("/"),
    };
    let layout = Layout::new(&root, &settings)?;
    if layout.is_staged() {
        info!(root = %root.display(), "staging filesystem changes");
    }

    let system_runner = SystemRunner::new();
    let recording_runner = RecordingRunner::new();
    let runner: &dyn CommandRunner = if args.dry_run {
        &recording_runner
    } else {
        &system_runner
    };
    let checkout: &dyn SourceCheckout = if args.dry_run {
        &NoopCheckout
    } else {
        &Git2Checkout
    };
    let releases = GitHubReleases::from_settings(&settings.release);

    let mut prompter = AnswerPrompter::new(settings.answers.clone());
    for key in prompter.unknown_keys() {
        warn!(key = %key, "ignoring answer for unknown prompt");
    }
    if !args.yes {
        prompter = prompter.with_fallback(Box::new(TerminalPrompter::new()));
    }

    let mut progress = ConsoleProgress::new();
    let mut noop = NoopObserver;
    let observer: &mut dyn StepObserver = match args.format {
        OutputFormat::Table => &mut progress,
        OutputFormat::Json | OutputFormat::Quiet => &mut noop,
    };

    let backends = Backends {
        runner,
        releases: &releases,
        checkout,
    };
    let report = Pipeline::new(&layout, &settings, backends)
        .skip(&skip)
        .run(&mut prompter, observer)?;

    match args.format {
        OutputFormat::Table => print_report(&report, args.dry_run.then_some(root.as_path())),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Quiet => {
            for warning in &report.warnings {
                println!("{warning}");
            }
        }
    }
    Ok(())
}

fn print_report(report: &InstallReport, staged: Option<&Path>) {
    println!();
    let version = report.version.as_deref().unwrap_or("(unchanged)");
    println!(
        "{} Paperless-ngx {}",
        style("Installed").green().bold(),
        style(version).cyan()
    );
    if let Some(mode) = report.database_mode {
        println!("  Database:     {mode}");
    }
    println!("  Credentials:  {}", report.credentials_file.display());
    for unit in &report.units {
        println!("  Unit:         {}", unit.display());
    }

    let skipped: Vec<_> = report
        .steps
        .iter()
        .filter(|r| r.outcome == StepOutcome::Skipped)
        .map(|r| r.step.as_str())
        .collect();
    if !skipped.is_empty() {
        println!("  Skipped:      {}", skipped.join(", "));
    }

    if !report.warnings.is_empty() {
        println!();
        for warning in &report.warnings {
            println!("{} {}", style("warning:").yellow().bold(), warning);
        }
    }

    if let Some(root) = staged {
        println!();
        println!("Dry run: files staged under {}", root.display());
    }
}

fn print_steps() {
    for (index, step) in StepId::ALL.iter().enumerate() {
        println!("{:>3}. {:<14} {}", index + 1, step.as_str(), step.title());
    }
}

fn run_units(config: Option<PathBuf>, out: Option<PathBuf>) -> Result<()> {
    let settings = load_settings(config)?;
    let units = paperless_units(&settings.paths.install_dir);

    match out {
        Some(dir) => {
            for unit in &units {
                let outcome = write_unit(&dir, unit)?;
                let status = match outcome {
                    WriteOutcome::Written => "written",
                    WriteOutcome::Unchanged => "unchanged",
                };
                println!("{} ({})", dir.join(unit.file_name()).display(), status);
            }
        }
        None => {
            for (index, unit) in units.iter().enumerate() {
                if index > 0 {
                    println!();
                }
                println!("# {}", unit.file_name());
                print!("{}", unit.render());
            }
        }
    }
    Ok(())
}

fn run_resolve(config: Option<PathBuf>) -> Result<()> {
    let settings = load_settings(config)?;
    let releases = GitHubReleases::from_settings(&settings.release);
    let release = releases.latest_release()?;

    println!("{}", release.tag);
    println!("{}", release.download_url(releases.repository())?);
    Ok(())
}
