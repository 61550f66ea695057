//! User-supplied extension points
//!
//! An element may obtain its value from a [`Producer`], transform it with a
//! [`Processor`] and accept or reject it with a [`Checker`]. All three are
//! async and receive a [`ResolveContext`] describing the element being
//! resolved and every value recorded so far.
//!
//! Plain closures can be used through [`produce_with`], [`process_with`] and
//! [`check_with`]; the [`builtin`] module provides the hooks available from
//! manifests.

pub mod builtin;

use std::sync::Arc;

use async_trait::async_trait;

use crate::resolution::Resolution;
use crate::value::Value;

/// Failure raised by a hook.
pub type HookError = Box<dyn std::error::Error + Send + Sync>;

/// Result type for hooks
pub type HookResult<T> = std::result::Result<T, HookError>;

/// What a hook can see while an element is being resolved.
#[derive(Debug, Clone, Copy)]
pub struct ResolveContext<'a> {
    /// Key of the element being resolved.
    pub key: &'a str,
    /// Values recorded so far, including in-progress ones.
    pub resolved: &'a Resolution,
}

impl<'a> ResolveContext<'a> {
    pub fn new(key: &'a str, resolved: &'a Resolution) -> Self {
        Self { key, resolved }
    }

    pub fn get(&self, key: &str) -> Option<&'a Value> {
        self.resolved.get(key)
    }
}

/// Lazily computes the starting value of an element.
#[async_trait]
pub trait Producer: Send + Sync {
    async fn produce(&self, ctx: &ResolveContext<'_>) -> HookResult<Value>;
}

/// Transforms an element value after it has been prompted.
#[async_trait]
pub trait Processor: Send + Sync {
    async fn process(&self, value: &Value, ctx: &ResolveContext<'_>) -> HookResult<Value>;
}

/// Accepts (`true`) or rejects (`false`) a finalized element value.
#[async_trait]
pub trait Checker: Send + Sync {
    async fn check(&self, value: &Value, ctx: &ResolveContext<'_>) -> HookResult<bool>;
}

struct FnProducer<F>(F);

#[async_trait]
impl<F> Producer for FnProducer<F>
where
    F: Fn(&ResolveContext<'_>) -> HookResult<Value> + Send + Sync,
{
    async fn produce(&self, ctx: &ResolveContext<'_>) -> HookResult<Value> {
        (self.0)(ctx)
    }
}

struct FnProcessor<F>(F);

#[async_trait]
impl<F> Processor for FnProcessor<F>
where
    F: Fn(&Value, &ResolveContext<'_>) -> HookResult<Value> + Send + Sync,
{
    async fn process(&self, value: &Value, ctx: &ResolveContext<'_>) -> HookResult<Value> {
        (self.0)(value, ctx)
    }
}

struct FnChecker<F>(F);

#[async_trait]
impl<F> Checker for FnChecker<F>
where
    F: Fn(&Value, &ResolveContext<'_>) -> HookResult<bool> + Send + Sync,
{
    async fn check(&self, value: &Value, ctx: &ResolveContext<'_>) -> HookResult<bool> {
        (self.0)(value, ctx)
    }
}

/// Build a [`Producer`] from a synchronous closure.
pub fn produce_with<F>(f: F) -> Arc<dyn Producer>
where
    F: Fn(&ResolveContext<'_>) -> HookResult<Value> + Send + Sync + 'static,
{
    Arc::new(FnProducer(f))
}

/// Build a [`Processor`] from a synchronous closure.
pub fn process_with<F>(f: F) -> Arc<dyn Processor>
where
    F: Fn(&Value, &ResolveContext<'_>) -> HookResult<Value> + Send + Sync + 'static,
{
    Arc::new(FnProcessor(f))
}

/// Build a [`Checker`] from a synchronous closure.
pub fn check_with<F>(f: F) -> Arc<dyn Checker>
where
    F: Fn(&Value, &ResolveContext<'_>) -> HookResult<bool> + Send + Sync + 'static,
{
    Arc::new(FnChecker(f))
}
