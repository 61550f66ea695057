//! Implementation of the `elicit note` command
//!
//! The template is staged inside the root directory, the note configuration
//! is resolved, and the staged file is moved into place. The placeholders of
//! the moved file are then rendered with the resolved values.

use std::fs;
use std::path::{Path, PathBuf};

use colored::Colorize;
use elicit_core::reference::render;
use elicit_core::{Configuration, FsNoteFiles, NoteCreator, Value};
use tracing::{debug, warn};

use super::{load_configuration, resolver};
use crate::cli::ResolveArgs;
use crate::error::{CliError, Result};

/// Base name of the staged template inside the root directory.
const STAGED_NAME: &str = ".elicit-note";

/// Resolve a note manifest and create the note from `template`.
pub async fn run_note(args: &ResolveArgs, template: &Path, root: &Path, ext: &str) -> Result<()> {
    let mut config = load_configuration(args)?;
    if !root.is_dir() {
        return Err(CliError::user(format!(
            "Root directory not found: {}",
            root.display()
        )));
    }
    let content = fs::read_to_string(template).map_err(|e| {
        CliError::user(format!("Cannot read template {}: {}", template.display(), e))
    })?;

    let staged = staged_path(root, ext);
    fs::write(&staged, content)?;
    debug!(staged = %staged.display(), "Staged template");

    let creator = NoteCreator::new(FsNoteFiles::new(root, &staged), resolver(args.yes))
        .with_extension(ext);
    let note = match creator.create(&mut config).await {
        Ok(note) => note,
        Err(e) => {
            if let Err(cleanup) = fs::remove_file(&staged) {
                warn!(error = %cleanup, "Failed to remove staged template");
            }
            return Err(e.into());
        }
    };

    let body = fs::read_to_string(&note)?;
    fs::write(&note, fill(&body, &config))?;

    println!("{} {}", "Created".green().bold(), note.display());
    Ok(())
}

fn staged_path(root: &Path, ext: &str) -> PathBuf {
    root.join(format!("{}{}", STAGED_NAME, ext))
}

/// Replace placeholders with the resolved values of `config`.
fn fill(body: &str, config: &Configuration) -> String {
    render(body, |name| config.value(name).map(Value::to_string))
}
