//! Shared test utilities for the elicit workspace.
//!
//! This crate provides fakes for every capability the resolver consumes, so
//! resolution can be driven deterministically. It is a dev-dependency only.
//!
//! # Modules
//!
//! - [`prompter`] - [`ScriptedPrompter`] answering prompts from a script
//! - [`notice`] - [`RecordingNotice`] logging open/close calls
//! - [`files`] - [`MemoryFiles`] in-memory note files
//! - [`workspace`] - [`TestWorkspace`] temporary directory with a manifest

pub mod files;
pub mod notice;
pub mod prompter;
pub mod workspace;

pub use files::MemoryFiles;
pub use notice::{NoticeEvent, RecordingNotice};
pub use prompter::{Answer, Request, ScriptedPrompter};
pub use workspace::TestWorkspace;
