//! Per-element resolution pipeline
//!
//! produce → (substitute) → prompt → process → check
//!
//! Every step records the element's current value in the [`Resolution`], so
//! that a failure leaves the last good value in place.

use tracing::{debug, warn};

use crate::capability::{
    ChoicePrompt, NoticeGuard, NoticeSurface, PromptError, Prompter, TextPrompt,
};
use crate::element::{Element, Labels, PromptSettings, ValueSource};
use crate::error::{Error, Result, SchemaError};
use crate::hooks::{HookError, ResolveContext};
use crate::reference::render;
use crate::resolution::Resolution;
use crate::value::Value;

/// Runs the pipeline for one element using the injected capabilities.
pub struct ValueResolver<'a> {
    prompter: &'a dyn Prompter,
    notice: &'a dyn NoticeSurface,
}

impl<'a> ValueResolver<'a> {
    pub fn new(prompter: &'a dyn Prompter, notice: &'a dyn NoticeSurface) -> Self {
        Self { prompter, notice }
    }

    /// Evaluate the element's value source and record the starting value.
    pub async fn produce(&self, element: &Element, resolution: &mut Resolution) -> Result<Value> {
        let value = match &element.source {
            ValueSource::Static(v) => v.clone(),
            ValueSource::Produced(producer) => {
                let ctx = ResolveContext::new(&element.key, resolution);
                producer
                    .produce(&ctx)
                    .await
                    .map_err(|source| Error::Producing {
                        key: element.key.clone(),
                        source,
                    })?
            }
        };
        resolution.insert(element.key.clone(), value.clone());
        Ok(value)
    }

    /// Replace placeholders with already-recorded values.
    pub fn substitute(
        &self,
        element: &Element,
        value: &Value,
        resolution: &mut Resolution,
    ) -> Value {
        let substituted = match value {
            Value::Text(s) => Value::Text(render(s, |name| {
                resolution.get(name).map(Value::to_string)
            })),
            list => list.clone(),
        };
        debug!(key = %element.key, value = %substituted, "Substituted references");
        resolution.insert(element.key.clone(), substituted.clone());
        substituted
    }

    /// Run prompt, process and check on the element's current value.
    pub async fn finalize(
        &self,
        element: &Element,
        value: Value,
        resolution: &mut Resolution,
    ) -> Result<Value> {
        let mut value = value;

        if let Some(settings) = &element.prompt {
            value = self.issue_prompt(&element.key, settings, &value).await?;
            resolution.insert(element.key.clone(), value.clone());
        }

        if element.process.is_some() {
            value = self.process(element, value, resolution).await?;
        }

        if element.check.is_some() {
            self.check(element, &value, resolution).await?;
        }

        debug!(key = %element.key, value = %value, "Finalized element");
        Ok(value)
    }

    /// Ask the user for a value: a choice for lists, free text otherwise.
    pub async fn issue_prompt(
        &self,
        key: &str,
        settings: &PromptSettings,
        value: &Value,
    ) -> Result<Value> {
        let answer = match value {
            Value::List(items) => {
                let labels = Labels::for_items(settings.labels.as_ref(), items);
                if labels.len() != items.len() {
                    return Err(SchemaError::InvalidProperty {
                        key: key.to_string(),
                        property: "text",
                        reason: "must have one label per value item".to_string(),
                    }
                    .into());
                }
                let request = ChoicePrompt {
                    placeholder: settings.display.clone(),
                    labels,
                    items: items.clone(),
                    limit: settings.limit,
                };
                debug!(key, options = items.len(), "Issuing choice prompt");
                self.prompter.choose(&request).await
            }
            Value::Text(default) => {
                let request = TextPrompt {
                    message: settings.display.clone(),
                    default: default.clone(),
                    multiline: settings.multiline,
                };
                debug!(key, "Issuing text prompt");
                self.prompter.prompt(&request).await
            }
        };

        answer.map(Value::Text).map_err(|e| Error::PromptCanceled {
            message: match e {
                PromptError::Canceled => None,
                PromptError::Failed(m) => Some(m),
            },
        })
    }

    /// Run the `process` hook behind a notice, re-prompting prompted elements
    /// with the processed value. Any failure restores the value recorded
    /// before processing.
    async fn process(
        &self,
        element: &Element,
        original: Value,
        resolution: &mut Resolution,
    ) -> Result<Value> {
        let Some(processor) = &element.process else {
            return Ok(original);
        };
        let key = &element.key;

        let processed = {
            let _notice = NoticeGuard::open(
                self.notice,
                &format!("Processing '{}' value.", key),
                &format!("Please wait while the '{}' value is being processed...", key),
            );
            let ctx = ResolveContext::new(key, resolution);
            processor.process(&original, &ctx).await
        };

        let outcome = match processed {
            Ok(value) => {
                resolution.insert(key.clone(), value.clone());
                match &element.prompt {
                    Some(settings) => self
                        .issue_prompt(key, settings, &value)
                        .await
                        .map_err(|e| Box::new(e) as HookError),
                    None => Ok(value),
                }
            }
            Err(e) => Err(e),
        };

        match outcome {
            Ok(value) => {
                resolution.insert(key.clone(), value.clone());
                Ok(value)
            }
            Err(source) => {
                warn!(key = %key, error = %source, "Processing failed, restoring value");
                resolution.insert(key.clone(), original);
                Err(Error::Processing {
                    key: key.clone(),
                    source,
                })
            }
        }
    }

    /// Run the `check` hook; a rejection echoes the value, a broken check
    /// does not.
    async fn check(&self, element: &Element, value: &Value, resolution: &Resolution) -> Result<()> {
        let Some(checker) = &element.check else {
            return Ok(());
        };
        let ctx = ResolveContext::new(&element.key, resolution);
        match checker.check(value, &ctx).await {
            Ok(true) => Ok(()),
            Ok(false) => Err(Error::Validation {
                key: element.key.clone(),
                value: value.to_string(),
            }),
            Err(source) => Err(Error::Checking {
                key: element.key.clone(),
                source,
            }),
        }
    }
}
