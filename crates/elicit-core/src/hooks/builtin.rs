//! Built-in hooks available to manifests
//!
//! | Hook                 | Kind        | Behaviour                                  |
//! |----------------------|-------------|--------------------------------------------|
//! | [`EnvProducer`]      | producer    | Reads an environment variable              |
//! | [`TodayProducer`]    | producer    | Formats the current local date             |
//! | [`TransformChain`]   | processor   | Applies [`Transform`]s in order            |
//! | [`RuleCheck`]        | checker     | Length, pattern and membership rules       |
//!
//! List values are handled item by item: transforms map every item, and a
//! list passes a rule check only if every item does.

use std::fmt::Write;

use async_trait::async_trait;
use chrono::format::{Item, StrftimeItems};
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::{Checker, HookResult, Processor, Producer, ResolveContext};
use crate::value::Value;

/// Failures raised by built-in hooks.
#[derive(Debug, thiserror::Error)]
pub enum BuiltinError {
    #[error("environment variable '{0}' is not set")]
    MissingEnv(String),

    #[error("'{0}' is not a valid date format")]
    InvalidDateFormat(String),
}

/// Produces the value of an environment variable.
#[derive(Debug, Clone)]
pub struct EnvProducer {
    pub name: String,
    pub default: Option<String>,
}

#[async_trait]
impl Producer for EnvProducer {
    async fn produce(&self, _ctx: &ResolveContext<'_>) -> HookResult<Value> {
        match std::env::var(&self.name) {
            Ok(v) => Ok(Value::Text(v)),
            Err(_) => match &self.default {
                Some(d) => Ok(Value::Text(d.clone())),
                None => Err(BuiltinError::MissingEnv(self.name.clone()).into()),
            },
        }
    }
}

/// Produces today's date in a `chrono` strftime format.
#[derive(Debug, Clone)]
pub struct TodayProducer {
    pub format: String,
}

impl Default for TodayProducer {
    fn default() -> Self {
        Self {
            format: "%Y-%m-%d".to_string(),
        }
    }
}

impl TodayProducer {
    /// Whether every specifier in `format` is understood by `chrono`.
    pub fn is_valid_format(format: &str) -> bool {
        !StrftimeItems::new(format).any(|item| matches!(item, Item::Error))
    }
}

#[async_trait]
impl Producer for TodayProducer {
    async fn produce(&self, _ctx: &ResolveContext<'_>) -> HookResult<Value> {
        let mut date = String::new();
        write!(date, "{}", chrono::Local::now().format(&self.format))
            .map_err(|_| BuiltinError::InvalidDateFormat(self.format.clone()))?;
        Ok(Value::Text(date))
    }
}

/// A named text transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Transform {
    Trim,
    Lowercase,
    Uppercase,
    CollapseWhitespace,
    Slugify,
    TitleCase,
}

impl Transform {
    pub fn apply(self, input: &str) -> String {
        match self {
            Self::Trim => input.trim().to_string(),
            Self::Lowercase => input.to_lowercase(),
            Self::Uppercase => input.to_uppercase(),
            Self::CollapseWhitespace => input.split_whitespace().collect::<Vec<_>>().join(" "),
            Self::Slugify => slugify(input),
            Self::TitleCase => input
                .split_whitespace()
                .map(capitalize)
                .collect::<Vec<_>>()
                .join(" "),
        }
    }
}

fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    let mut pending_dash = false;
    for c in input.chars() {
        if c.is_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.extend(c.to_lowercase());
        } else {
            pending_dash = true;
        }
    }
    slug
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Applies a sequence of transforms.
#[derive(Debug, Clone, Default)]
pub struct TransformChain(pub Vec<Transform>);

impl TransformChain {
    fn apply(&self, input: &str) -> String {
        self.0
            .iter()
            .fold(input.to_string(), |acc, t| t.apply(&acc))
    }
}

#[async_trait]
impl Processor for TransformChain {
    async fn process(&self, value: &Value, _ctx: &ResolveContext<'_>) -> HookResult<Value> {
        Ok(match value {
            Value::Text(s) => Value::Text(self.apply(s)),
            Value::List(items) => Value::List(items.iter().map(|i| self.apply(i)).collect()),
        })
    }
}

/// Declarative value rules.
#[derive(Debug, Clone, Default)]
pub struct RuleCheck {
    pub non_empty: bool,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub pattern: Option<Regex>,
    pub one_of: Option<Vec<String>>,
    pub forbidden_chars: Option<String>,
}

impl RuleCheck {
    fn accepts(&self, s: &str) -> bool {
        let len = s.chars().count();
        if self.non_empty && s.trim().is_empty() {
            return false;
        }
        if self.min_length.is_some_and(|min| len < min) {
            return false;
        }
        if self.max_length.is_some_and(|max| len > max) {
            return false;
        }
        if self.pattern.as_ref().is_some_and(|re| !re.is_match(s)) {
            return false;
        }
        if self
            .one_of
            .as_ref()
            .is_some_and(|allowed| !allowed.iter().any(|a| a == s))
        {
            return false;
        }
        if self
            .forbidden_chars
            .as_ref()
            .is_some_and(|chars| s.chars().any(|c| chars.contains(c)))
        {
            return false;
        }
        true
    }
}

#[async_trait]
impl Checker for RuleCheck {
    async fn check(&self, value: &Value, _ctx: &ResolveContext<'_>) -> HookResult<bool> {
        Ok(match value {
            Value::Text(s) => self.accepts(s),
            Value::List(items) => {
                !(self.non_empty && items.is_empty()) && items.iter().all(|i| self.accepts(i))
            }
        })
    }
}
