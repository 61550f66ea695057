//! Configuration elements
//!
//! [`ElementSpec`] is the declared form: every property is optional so that
//! shape violations can be reported by the schema validator with the key and
//! property that is wrong. [`Element`] is the validated form the resolver
//! works on.

use std::fmt;
use std::sync::Arc;

use crate::hooks::{Checker, Processor, Producer};
use crate::value::Value;

/// Where an element's starting value comes from.
#[derive(Clone)]
pub enum ValueSource {
    Static(Value),
    /// Evaluated once, when resolution reaches the element.
    Produced(Arc<dyn Producer>),
}

impl ValueSource {
    pub fn as_static(&self) -> Option<&Value> {
        match self {
            Self::Static(v) => Some(v),
            Self::Produced(_) => None,
        }
    }
}

impl fmt::Debug for ValueSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Static(v) => f.debug_tuple("Static").field(v).finish(),
            Self::Produced(_) => f.write_str("Produced(..)"),
        }
    }
}

/// Human-readable labels for choice items.
#[derive(Clone)]
pub enum Labels {
    /// One label per item, in item order.
    Items(Vec<String>),
    /// Derives a label from each item.
    Map(Arc<dyn Fn(&str) -> String + Send + Sync>),
}

impl Labels {
    /// Labels for `items`, falling back to the items themselves.
    pub fn for_items(labels: Option<&Labels>, items: &[String]) -> Vec<String> {
        match labels {
            Some(Self::Items(labels)) => labels.clone(),
            Some(Self::Map(f)) => items.iter().map(|i| f(i.as_str())).collect(),
            None => items.to_vec(),
        }
    }
}

impl fmt::Debug for Labels {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Items(items) => f.debug_tuple("Items").field(items).finish(),
            Self::Map(_) => f.write_str("Map(..)"),
        }
    }
}

/// A declared configuration element.
#[derive(Clone, Default)]
pub struct ElementSpec {
    pub prompt: Option<bool>,
    pub display: Option<String>,
    pub value: Option<ValueSource>,
    pub multiline: Option<bool>,
    pub limit: Option<usize>,
    pub text: Option<Labels>,
    pub check: Option<Arc<dyn Checker>>,
    pub process: Option<Arc<dyn Processor>>,
}

impl ElementSpec {
    /// An element with no properties set.
    pub fn new() -> Self {
        Self::default()
    }

    /// A non-prompted element with a static value.
    pub fn silent(value: impl Into<Value>) -> Self {
        Self::new().prompt(false).value(value)
    }

    /// A prompted element with a static default value.
    pub fn prompted(display: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new().prompt(true).display(display).value(value)
    }

    pub fn prompt(mut self, prompt: bool) -> Self {
        self.prompt = Some(prompt);
        self
    }

    pub fn display(mut self, display: impl Into<String>) -> Self {
        self.display = Some(display.into());
        self
    }

    pub fn value(mut self, value: impl Into<Value>) -> Self {
        self.value = Some(ValueSource::Static(value.into()));
        self
    }

    pub fn produced(mut self, producer: Arc<dyn Producer>) -> Self {
        self.value = Some(ValueSource::Produced(producer));
        self
    }

    pub fn multiline(mut self, multiline: bool) -> Self {
        self.multiline = Some(multiline);
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn labels<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.text = Some(Labels::Items(labels.into_iter().map(Into::into).collect()));
        self
    }

    pub fn label_with<F>(mut self, f: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        self.text = Some(Labels::Map(Arc::new(f)));
        self
    }

    pub fn check(mut self, check: Arc<dyn Checker>) -> Self {
        self.check = Some(check);
        self
    }

    pub fn process(mut self, process: Arc<dyn Processor>) -> Self {
        self.process = Some(process);
        self
    }
}

impl fmt::Debug for ElementSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ElementSpec")
            .field("prompt", &self.prompt)
            .field("display", &self.display)
            .field("value", &self.value)
            .field("multiline", &self.multiline)
            .field("limit", &self.limit)
            .field("text", &self.text)
            .field("check", &self.check.is_some())
            .field("process", &self.process.is_some())
            .finish()
    }
}

/// How a prompted element is presented.
#[derive(Debug, Clone)]
pub struct PromptSettings {
    pub display: String,
    pub multiline: bool,
    pub limit: Option<usize>,
    pub labels: Option<Labels>,
}

/// A validated configuration element.
#[derive(Clone)]
pub struct Element {
    pub key: String,
    pub source: ValueSource,
    /// `None` for silent elements.
    pub prompt: Option<PromptSettings>,
    pub check: Option<Arc<dyn Checker>>,
    pub process: Option<Arc<dyn Processor>>,
}

impl Element {
    pub fn is_prompted(&self) -> bool {
        self.prompt.is_some()
    }
}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Element")
            .field("key", &self.key)
            .field("source", &self.source)
            .field("prompt", &self.prompt)
            .field("check", &self.check.is_some())
            .field("process", &self.process.is_some())
            .finish()
    }
}
