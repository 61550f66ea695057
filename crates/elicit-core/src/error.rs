//! Error types for elicit-core

use std::path::PathBuf;

use crate::CANCELED_MESSAGE;
use crate::hooks::HookError;

/// Result type for elicit-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Shape violations found while validating a configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    /// The configuration has no elements at all.
    #[error("The configuration object is empty.")]
    Empty,

    /// A configuration element required by the caller is absent.
    #[error("Missing required '{key}' configuration element.")]
    MissingElement { key: String },

    /// An element lacks a required property.
    #[error("Missing required '{key}.{property}' property.")]
    MissingProperty { key: String, property: &'static str },

    /// An element property has an unusable value.
    #[error("Property '{key}.{property}' {reason}.")]
    InvalidProperty {
        key: String,
        property: &'static str,
        reason: String,
    },
}

impl SchemaError {
    /// The element key the violation is about, if any.
    pub fn key(&self) -> Option<&str> {
        match self {
            Self::Empty => None,
            Self::MissingElement { key }
            | Self::MissingProperty { key, .. }
            | Self::InvalidProperty { key, .. } => Some(key),
        }
    }
}

/// Errors that can occur while validating or resolving a configuration
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The configuration does not have the required shape.
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// A placeholder names a key that is not part of the configuration.
    #[error("Reference '{reference}' in '{key}' does not name a configuration element.")]
    DanglingReference { key: String, reference: String },

    /// Referencing elements depend on each other in a cycle.
    #[error("Cyclic reference between configuration elements: {}", participants.join(", "))]
    CyclicReference { participants: Vec<String> },

    /// The user dismissed a prompt.
    #[error("{}", message.as_deref().unwrap_or(CANCELED_MESSAGE))]
    PromptCanceled { message: Option<String> },

    /// A value producer failed.
    #[error("Failed producing '{key}' configuration value.")]
    Producing {
        key: String,
        #[source]
        source: HookError,
    },

    /// A `process` hook failed; the value was restored.
    #[error("Failed processing '{key}' configuration value.")]
    Processing {
        key: String,
        #[source]
        source: HookError,
    },

    /// A `check` hook rejected the value.
    #[error("Invalid value '{value}' for '{key}' configuration element.")]
    Validation { key: String, value: String },

    /// A `check` hook itself failed.
    #[error("Failed checking '{key}' configuration value.")]
    Checking {
        key: String,
        #[source]
        source: HookError,
    },

    /// The target note already exists.
    #[error("Note '{name}' already exists.")]
    FileConflict { name: String, path: String },

    /// Resolution aborted; wraps the failure that stopped it.
    #[error("{message}")]
    Canceled {
        message: String,
        #[source]
        source: Box<Error>,
    },

    /// Manifest file not found at the expected path.
    #[error("Manifest not found: {0}")]
    ManifestNotFound(PathBuf),

    /// Failed to parse a manifest.
    #[error("Failed to parse manifest: {0}")]
    ManifestParse(#[from] toml::de::Error),

    /// The same key is declared twice in a manifest.
    #[error("Duplicate configuration element '{key}' in manifest.")]
    DuplicateKey { key: String },

    /// A check pattern in a manifest is not a valid regular expression.
    #[error("Invalid pattern for '{key}': {source}")]
    InvalidPattern {
        key: String,
        #[source]
        source: regex::Error,
    },

    /// A `today` producer in a manifest has an unknown strftime specifier.
    #[error("Invalid date format '{format}' for '{key}'.")]
    InvalidDateFormat { key: String, format: String },

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Wrap a failure raised during resolution into the single cancellation
    /// error surfaced to callers.
    pub fn canceled(source: Error) -> Self {
        let message = match source.to_string() {
            m if m.trim().is_empty() => CANCELED_MESSAGE.to_string(),
            m => m,
        };
        Self::Canceled {
            message,
            source: Box::new(source),
        }
    }

    /// The failure underneath any cancellation wrapper.
    pub fn root_cause(&self) -> &Error {
        match self {
            Self::Canceled { source, .. } => source.root_cause(),
            other => other,
        }
    }

    /// Whether this error aborted an in-flight resolution.
    pub fn is_canceled(&self) -> bool {
        matches!(self, Self::Canceled { .. })
    }
}
