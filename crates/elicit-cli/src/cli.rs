//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

/// elicit - Resolve interactive configurations and create notes from them
#[derive(Parser, Debug)]
#[command(name = "elicit")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Manifest location and value overrides shared by resolving commands.
#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct ResolveArgs {
    /// Path to the TOML manifest
    #[arg(env = "ELICIT_MANIFEST")]
    pub manifest: PathBuf,

    /// Replace the value of an element before resolving (repeatable)
    #[arg(long = "set", value_name = "KEY=VALUE", value_parser = parse_override)]
    pub overrides: Vec<(String, String)>,

    /// Accept every default without prompting
    #[arg(short, long)]
    pub yes: bool,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Resolve a manifest and print the values
    ///
    /// Examples:
    ///   elicit resolve note.toml
    ///   elicit resolve note.toml --set topic=Rust --yes
    ///   elicit resolve note.toml --json
    Resolve {
        #[command(flatten)]
        args: ResolveArgs,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Validate a manifest without prompting
    Check {
        /// Path to the TOML manifest
        #[arg(env = "ELICIT_MANIFEST")]
        manifest: PathBuf,
    },

    /// Resolve a manifest and create a note from a template
    ///
    /// The manifest must declare `path` and `filename` elements. The note is
    /// written to <ROOT>/<path>/<filename><EXT> with the template's
    /// placeholders replaced by the resolved values.
    Note {
        #[command(flatten)]
        args: ResolveArgs,

        /// Template file for the note body
        #[arg(short, long)]
        template: PathBuf,

        /// Directory notes are created under
        #[arg(short, long, default_value = ".")]
        root: PathBuf,

        /// Note file extension
        #[arg(long, default_value = elicit_core::DEFAULT_EXTENSION)]
        ext: String,
    },

    /// Generate shell completions
    ///
    /// Examples:
    ///   elicit completions bash > ~/.local/share/bash-completion/completions/elicit
    ///   elicit completions zsh > ~/.zfunc/_elicit
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Parse a `KEY=VALUE` override.
fn parse_override(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected KEY=VALUE, got '{}'", s)),
    }
}
