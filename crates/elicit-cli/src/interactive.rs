//! Terminal implementations of the prompting capabilities
//!
//! Uses dialoguer widgets, run on the blocking thread pool so the resolver
//! stays async.

use async_trait::async_trait;
use colored::Colorize;
use dialoguer::{Editor, Input, Select};
use elicit_core::{ChoicePrompt, NoticeSurface, PromptError, Prompter, TextPrompt};

/// Prompts on the terminal. Text prompts use an inline input, or the user's
/// editor when multiline; list values use a selection menu.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalPrompter;

#[async_trait]
impl Prompter for TerminalPrompter {
    async fn prompt(&self, request: &TextPrompt) -> Result<String, PromptError> {
        let request = request.clone();
        run_blocking(move || {
            if request.multiline {
                eprintln!("{}", request.message.bold());
                return match Editor::new().edit(&request.default) {
                    Ok(Some(text)) => Ok(text),
                    // Editor closed without saving
                    Ok(None) => Err(PromptError::Canceled),
                    Err(e) => Err(prompt_error(e)),
                };
            }
            Input::<String>::new()
                .with_prompt(&request.message)
                .with_initial_text(&request.default)
                .allow_empty(true)
                .interact_text()
                .map_err(prompt_error)
        })
        .await
    }

    async fn choose(&self, request: &ChoicePrompt) -> Result<String, PromptError> {
        let request = request.clone();
        run_blocking(move || {
            let mut select = Select::new()
                .with_prompt(&request.placeholder)
                .items(&request.labels)
                .default(0);
            if let Some(limit) = request.limit {
                select = select.max_length(limit);
            }
            match select.interact_opt().map_err(prompt_error)? {
                Some(idx) => request
                    .items
                    .get(idx)
                    .cloned()
                    .ok_or_else(|| PromptError::Failed(format!("no option at index {}", idx))),
                None => Err(PromptError::Canceled),
            }
        })
        .await
    }
}

async fn run_blocking<F>(f: F) -> Result<String, PromptError>
where
    F: FnOnce() -> Result<String, PromptError> + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| PromptError::Failed(e.to_string()))?
}

fn prompt_error(e: dialoguer::Error) -> PromptError {
    match e {
        dialoguer::Error::IO(io) if io.kind() == std::io::ErrorKind::Interrupted => {
            PromptError::Canceled
        }
        other => PromptError::Failed(other.to_string()),
    }
}

/// Prints the processing notice on stderr.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalNotice;

impl NoticeSurface for TerminalNotice {
    fn open(&self, title: &str, body: &str) {
        eprintln!("{} {}", title.cyan().bold(), body.dimmed());
    }

    fn close(&self) {}
}
