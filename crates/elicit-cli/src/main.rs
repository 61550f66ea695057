//! elicit CLI
//!
//! Resolves configuration manifests interactively and creates notes from
//! templates.

mod cli;
mod commands;
mod error;
mod interactive;

use clap::{CommandFactory, Parser};
use colored::Colorize;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use cli::{Cli, Commands};
use error::Result;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    match cli.command {
        Some(cmd) => execute_command(cmd),
        None => {
            // No command provided - show help hint
            println!("{} interactive configuration resolver", "elicit".green().bold());
            println!();
            println!("Run {} for available commands.", "elicit --help".cyan());
            Ok(())
        }
    }
}

/// Log to stderr: `-v` enables debug output, otherwise `ELICIT_LOG` applies.
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env("ELICIT_LOG").unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(verbose)
        .finish();
    if tracing::subscriber::set_global_default(subscriber).is_ok() {
        tracing::debug!("Verbose mode enabled");
    }
}

fn execute_command(cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Resolve { args, json } => block_on(commands::run_resolve(&args, json)),
        Commands::Check { manifest } => commands::run_check(&manifest),
        Commands::Note {
            args,
            template,
            root,
            ext,
        } => block_on(commands::run_note(&args, &template, &root, &ext)),
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "elicit", &mut std::io::stdout());
            Ok(())
        }
    }
}

fn block_on<F>(future: F) -> Result<()>
where
    F: std::future::Future<Output = Result<()>>,
{
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?
        .block_on(future)
}
