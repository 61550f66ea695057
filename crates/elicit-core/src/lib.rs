//! Interactive resolution engine for declarative configuration elements.
//!
//! A [`Configuration`] is an ordered set of named elements. Each element
//! declares how its value is obtained (a static value or a lazy
//! [`Producer`](hooks::Producer)), whether the user must confirm it through a
//! prompt, and optional `process`/`check` hooks. Values may reference each
//! other through `{{ name }}` placeholders.
//!
//! Resolution runs in two phases:
//!
//! 1. Elements without references resolve in configuration order.
//! 2. Referencing elements are ordered by a topological sort over their
//!    references, substituted, then run through their own pipeline.
//!
//! The user interface is injected through the [`Prompter`] and
//! [`NoticeSurface`] capabilities, so resolution is fully testable with
//! fakes.
//!
//! ```no_run
//! # async fn demo(prompter: std::sync::Arc<dyn elicit_core::Prompter>) -> elicit_core::Result<()> {
//! use elicit_core::{Configuration, ElementSpec, Resolver};
//!
//! let config = Configuration::new()
//!     .with("topic", ElementSpec::prompted("Topic?", "AI"))
//!     .with("filename", ElementSpec::silent("Notes on {{ topic }}"));
//!
//! let resolution = Resolver::new(prompter).resolve(&config).await?;
//! println!("{}", resolution.get("filename").unwrap());
//! # Ok(())
//! # }
//! ```

pub mod capability;
pub mod config;
pub mod dependency;
pub mod element;
pub mod error;
pub mod hooks;
pub mod manifest;
pub mod note;
pub mod orchestrator;
pub mod reference;
pub mod resolution;
pub mod resolver;
pub mod schema;
pub mod value;

/// Message used when a failure carries no message of its own.
pub const CANCELED_MESSAGE: &str = "Operation canceled.";

pub use capability::{
    AcceptDefaults, ChoicePrompt, NoticeGuard, NoticeSurface, PromptError, Prompter,
    SilentNotice, TextPrompt,
};
pub use config::Configuration;
pub use element::{Element, ElementSpec, Labels, PromptSettings, ValueSource};
pub use error::{Error, Result, SchemaError};
pub use hooks::{Checker, HookError, HookResult, Processor, Producer, ResolveContext};
pub use manifest::ConfigurationManifest;
pub use note::{DEFAULT_EXTENSION, FsNoteFiles, NoteCreator, NoteFiles};
pub use orchestrator::Resolver;
pub use resolution::Resolution;
pub use value::Value;
