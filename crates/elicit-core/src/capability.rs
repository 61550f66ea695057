//! Interfaces to the user-facing collaborators
//!
//! Resolution never talks to a terminal or a window directly. It issues
//! [`TextPrompt`] and [`ChoicePrompt`] requests through a [`Prompter`] and
//! shows progress through a [`NoticeSurface`] while a `process` hook runs.

use async_trait::async_trait;

/// Free-text prompt request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextPrompt {
    /// Message shown to the user.
    pub message: String,
    /// Prefilled value.
    pub default: String,
    /// Whether the input spans multiple lines.
    pub multiline: bool,
}

/// Choice prompt request.
///
/// `labels` and `items` always have the same length; the prompter returns
/// the selected item, not its label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoicePrompt {
    /// Placeholder text shown above the options.
    pub placeholder: String,
    pub labels: Vec<String>,
    pub items: Vec<String>,
    /// Maximum number of visible options.
    pub limit: Option<usize>,
}

/// Why a prompt did not produce a value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PromptError {
    /// The user dismissed the prompt.
    #[error("prompt dismissed")]
    Canceled,

    /// The prompt could not be shown or answered.
    #[error("{0}")]
    Failed(String),
}

/// Asks the user for values.
///
/// Dismissing a prompt must be reported as an error; a prompter never
/// answers a dismissed prompt with a default.
#[async_trait]
pub trait Prompter: Send + Sync {
    async fn prompt(&self, request: &TextPrompt) -> Result<String, PromptError>;
    async fn choose(&self, request: &ChoicePrompt) -> Result<String, PromptError>;
}

/// Answers every prompt with its default: the prefilled text, or the first
/// choice item.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptDefaults;

#[async_trait]
impl Prompter for AcceptDefaults {
    async fn prompt(&self, request: &TextPrompt) -> Result<String, PromptError> {
        Ok(request.default.clone())
    }

    async fn choose(&self, request: &ChoicePrompt) -> Result<String, PromptError> {
        request
            .items
            .first()
            .cloned()
            .ok_or_else(|| PromptError::Failed("no options to choose from".to_string()))
    }
}

/// A transient indicator shown while a value is being processed.
pub trait NoticeSurface: Send + Sync {
    fn open(&self, title: &str, body: &str);
    fn close(&self);
}

/// A notice surface that shows nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentNotice;

impl NoticeSurface for SilentNotice {
    fn open(&self, _title: &str, _body: &str) {}
    fn close(&self) {}
}

/// Keeps a notice open for its lifetime and closes it on drop, whether the
/// guarded work succeeded or not.
pub struct NoticeGuard<'a> {
    surface: &'a dyn NoticeSurface,
}

impl<'a> NoticeGuard<'a> {
    pub fn open(surface: &'a dyn NoticeSurface, title: &str, body: &str) -> Self {
        surface.open(title, body);
        Self { surface }
    }
}

impl Drop for NoticeGuard<'_> {
    fn drop(&mut self) {
        self.surface.close();
    }
}
