//! Two-phase resolution of a configuration
//!
//! Phase 1 walks the configuration in order. Elements whose (produced)
//! value references other keys are deferred; every other element is
//! finalized immediately.
//!
//! Phase 2 orders the deferred elements with a topological sort over their
//! references, then substitutes and finalizes each one.
//!
//! Any failure after validation aborts resolution and is reported as a
//! single [`Error::Canceled`]. Values recorded before the failure are kept.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::capability::{NoticeSurface, Prompter, SilentNotice};
use crate::config::Configuration;
use crate::dependency::DependencyGraph;
use crate::element::Element;
use crate::error::{Error, Result};
use crate::reference::extract_references;
use crate::resolution::Resolution;
use crate::resolver::ValueResolver;
use crate::schema;
use crate::value::Value;

/// Resolves configurations using an injected prompter and notice surface.
#[derive(Clone)]
pub struct Resolver {
    prompter: Arc<dyn Prompter>,
    notice: Arc<dyn NoticeSurface>,
}

impl Resolver {
    /// Create a resolver that shows no processing notice.
    pub fn new(prompter: Arc<dyn Prompter>) -> Self {
        Self {
            prompter,
            notice: Arc::new(SilentNotice),
        }
    }

    /// Show `notice` while `process` hooks run.
    pub fn with_notice(mut self, notice: Arc<dyn NoticeSurface>) -> Self {
        self.notice = notice;
        self
    }

    /// Validate and resolve `config`, returning every finalized value.
    ///
    /// # Errors
    ///
    /// Schema and static reference errors are returned as-is, before any
    /// prompt is issued. Failures during resolution are returned as
    /// [`Error::Canceled`].
    pub async fn resolve(&self, config: &Configuration) -> Result<Resolution> {
        let mut resolution = Resolution::new();
        self.resolve_into(config, &mut resolution).await?;
        Ok(resolution)
    }

    /// Like [`resolve`](Self::resolve), recording values into `resolution`
    /// as they are obtained. After a failure `resolution` holds everything
    /// recorded up to that point.
    pub async fn resolve_into(
        &self,
        config: &Configuration,
        resolution: &mut Resolution,
    ) -> Result<()> {
        let elements = schema::validate(config)?;
        self.run(&elements, resolution).await
    }

    /// Resolve `config` in place: every recorded value is written back to
    /// its element, also when resolution fails part-way.
    pub async fn prompt(&self, config: &mut Configuration) -> Result<()> {
        let mut resolution = Resolution::new();
        let result = self.resolve_into(config, &mut resolution).await;
        config.apply(&resolution);
        result
    }

    /// Resolve already-validated elements.
    pub async fn run(&self, elements: &[Element], resolution: &mut Resolution) -> Result<()> {
        self.run_phases(elements, resolution).await.map_err(|e| {
            warn!(error = %e, "Resolution canceled");
            Error::canceled(e)
        })
    }

    async fn run_phases(&self, elements: &[Element], resolution: &mut Resolution) -> Result<()> {
        let resolver = ValueResolver::new(self.prompter.as_ref(), self.notice.as_ref());

        // Phase 1: independent elements, in configuration order
        let mut pending: Vec<(String, Vec<String>)> = Vec::new();
        for element in elements {
            let value = resolver.produce(element, resolution).await?;
            let references = extract_references(&value);
            if !references.is_empty() {
                debug!(key = %element.key, ?references, "Deferring referencing element");
                pending.push((element.key.clone(), references));
                continue;
            }
            resolver.finalize(element, value, resolution).await?;
        }

        if pending.is_empty() {
            debug!(count = elements.len(), "Resolved without references");
            return Ok(());
        }

        // Phase 2: referencing elements, dependencies first
        let graph = DependencyGraph::from_references(&pending, |k| {
            elements.iter().any(|e| e.key == k)
        })?;
        let order = graph.topological_sort()?;
        debug!(?order, "Resolving referencing elements");

        for key in order {
            let Some(element) = elements.iter().find(|e| e.key == key) else {
                continue;
            };
            let current = resolution.get(&key).cloned().unwrap_or_else(Value::default);
            let value = resolver.substitute(element, &current, resolution);
            resolver.finalize(element, value, resolution).await?;
        }

        Ok(())
    }
}
