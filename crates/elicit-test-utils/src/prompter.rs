//! [`ScriptedPrompter`] answers prompts from a queue and records every
//! request it receives.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use elicit_core::{ChoicePrompt, PromptError, Prompter, TextPrompt};

/// One scripted reaction to a prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    /// Reply with this text (or, for choices, this item).
    Reply(String),
    /// Reply with the prefilled default (or the first item).
    Default,
    /// Pick the choice item at this index.
    Pick(usize),
    /// Dismiss the prompt.
    Cancel,
}

/// A prompt the fake received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    Text(TextPrompt),
    Choice(ChoicePrompt),
}

impl Request {
    /// The message (text) or placeholder (choice) shown.
    pub fn display(&self) -> &str {
        match self {
            Self::Text(r) => &r.message,
            Self::Choice(r) => &r.placeholder,
        }
    }
}

/// Prompter driven by a script of [`Answer`]s.
///
/// Prompts beyond the end of the script fail with
/// `PromptError::Failed("unexpected prompt: ...")`.
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    script: Mutex<VecDeque<Answer>>,
    requests: Mutex<Vec<Request>>,
}

impl ScriptedPrompter {
    pub fn new<I>(answers: I) -> Self
    where
        I: IntoIterator<Item = Answer>,
    {
        Self {
            script: Mutex::new(answers.into_iter().collect()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Script plain text replies.
    pub fn replies<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(replies.into_iter().map(|r| Answer::Reply(r.into())))
    }

    /// A prompter that must never be asked anything.
    pub fn silent() -> Self {
        Self::default()
    }

    /// Every request received, in order.
    pub fn requests(&self) -> Vec<Request> {
        self.requests.lock().unwrap().clone()
    }

    pub fn prompt_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// Answers left unused.
    pub fn remaining(&self) -> usize {
        self.script.lock().unwrap().len()
    }

    fn next(&self, request: Request) -> Result<Answer, PromptError> {
        let display = request.display().to_string();
        self.requests.lock().unwrap().push(request);
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| PromptError::Failed(format!("unexpected prompt: {}", display)))
    }
}

#[async_trait]
impl Prompter for ScriptedPrompter {
    async fn prompt(&self, request: &TextPrompt) -> Result<String, PromptError> {
        match self.next(Request::Text(request.clone()))? {
            Answer::Reply(text) => Ok(text),
            Answer::Default => Ok(request.default.clone()),
            Answer::Pick(_) => Err(PromptError::Failed("cannot pick from a text prompt".into())),
            Answer::Cancel => Err(PromptError::Canceled),
        }
    }

    async fn choose(&self, request: &ChoicePrompt) -> Result<String, PromptError> {
        match self.next(Request::Choice(request.clone()))? {
            Answer::Reply(item) => Ok(item),
            Answer::Default => request
                .items
                .first()
                .cloned()
                .ok_or_else(|| PromptError::Failed("no options".into())),
            Answer::Pick(idx) => request
                .items
                .get(idx)
                .cloned()
                .ok_or_else(|| PromptError::Failed(format!("no option at index {}", idx))),
            Answer::Cancel => Err(PromptError::Canceled),
        }
    }
}
