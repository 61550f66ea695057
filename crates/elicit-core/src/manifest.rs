//! Configuration manifests loaded from TOML.
//!
//! A manifest declares the elements of a configuration in order, using the
//! built-in hooks of [`crate::hooks::builtin`] for producers, processing and
//! checks.
//!
//! # Example TOML
//!
//! ```toml
//! [[element]]
//! key = "path"
//! prompt = false
//! value = "Notes"
//!
//! [[element]]
//! key = "date"
//! prompt = false
//! value = { from = "today", format = "%Y-%m-%d" }
//!
//! [[element]]
//! key = "topic"
//! prompt = true
//! display = "Topic?"
//! value = "AI"
//! process = ["trim", "title_case"]
//! check = { non_empty = true, max_length = 60 }
//!
//! [[element]]
//! key = "filename"
//! prompt = true
//! display = "File name?"
//! value = "{{ date }} {{ topic }}"
//! check = { forbidden_chars = "/\\:" }
//! ```
//!
//! Properties are optional at the TOML level so that a missing `prompt`,
//! `display` or `value` is reported by the schema validator with the usual
//! message.

use std::path::Path;
use std::sync::Arc;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::config::Configuration;
use crate::element::{ElementSpec, Labels, ValueSource};
use crate::error::{Error, Result};
use crate::hooks::builtin::{EnvProducer, RuleCheck, TodayProducer, Transform, TransformChain};
use crate::hooks::{Checker, Processor};
use crate::value::Value;

/// A complete manifest: an ordered list of elements.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigurationManifest {
    #[serde(default, rename = "element")]
    pub elements: Vec<ElementManifest>,
}

/// One declared element.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ElementManifest {
    pub key: String,
    #[serde(default)]
    pub prompt: Option<bool>,
    #[serde(default)]
    pub display: Option<String>,
    #[serde(default)]
    pub value: Option<ValueManifest>,
    #[serde(default)]
    pub multiline: Option<bool>,
    #[serde(default)]
    pub limit: Option<usize>,
    #[serde(default)]
    pub text: Option<Vec<String>>,
    #[serde(default)]
    pub process: Vec<Transform>,
    #[serde(default)]
    pub check: Option<CheckManifest>,
}

/// A static value or a producer table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum ValueManifest {
    Text(String),
    List(Vec<String>),
    Producer(ProducerManifest),
}

/// Built-in producers, selected by `from`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "from", rename_all = "snake_case")]
pub enum ProducerManifest {
    /// `{ from = "env", name = "USER", default = "me" }`
    Env {
        name: String,
        #[serde(default)]
        default: Option<String>,
    },
    /// `{ from = "today", format = "%Y-%m-%d" }`
    Today {
        #[serde(default)]
        format: Option<String>,
    },
}

/// Declarative check rules.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CheckManifest {
    #[serde(default)]
    pub non_empty: bool,
    #[serde(default)]
    pub min_length: Option<usize>,
    #[serde(default)]
    pub max_length: Option<usize>,
    #[serde(default)]
    pub pattern: Option<String>,
    #[serde(default)]
    pub one_of: Option<Vec<String>>,
    #[serde(default)]
    pub forbidden_chars: Option<String>,
}

impl ConfigurationManifest {
    /// Parse a manifest from TOML content.
    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load a manifest from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(Error::ManifestNotFound(path.to_path_buf()));
            }
            Err(e) => return Err(Error::Io(e)),
        };
        Self::from_toml(&content)
    }

    /// Replace the static value of `key`.
    ///
    /// Returns `false` if no element has that key.
    pub fn set_value(&mut self, key: &str, value: impl Into<String>) -> bool {
        match self.elements.iter_mut().find(|e| e.key == key) {
            Some(element) => {
                element.value = Some(ValueManifest::Text(value.into()));
                true
            }
            None => false,
        }
    }

    /// Build the configuration this manifest declares.
    pub fn into_configuration(self) -> Result<Configuration> {
        let mut config = Configuration::new();
        for element in self.elements {
            if config.contains_key(&element.key) {
                return Err(Error::DuplicateKey { key: element.key });
            }
            let key = element.key.clone();
            config.insert(key, element.into_spec()?);
        }
        Ok(config)
    }
}

impl ElementManifest {
    fn into_spec(self) -> Result<ElementSpec> {
        let check = self
            .check
            .map(|c| c.into_rule_check(&self.key))
            .transpose()?;

        Ok(ElementSpec {
            prompt: self.prompt,
            display: self.display,
            value: self
                .value
                .map(|v| v.into_source(&self.key))
                .transpose()?,
            multiline: self.multiline,
            limit: self.limit,
            text: self.text.map(Labels::Items),
            check: check.map(|c| Arc::new(c) as Arc<dyn Checker>),
            process: (!self.process.is_empty())
                .then(|| Arc::new(TransformChain(self.process)) as Arc<dyn Processor>),
        })
    }
}

impl ValueManifest {
    fn into_source(self, key: &str) -> Result<ValueSource> {
        Ok(match self {
            Self::Text(s) => ValueSource::Static(Value::Text(s)),
            Self::List(items) => ValueSource::Static(Value::List(items)),
            Self::Producer(ProducerManifest::Env { name, default }) => {
                ValueSource::Produced(Arc::new(EnvProducer { name, default }))
            }
            Self::Producer(ProducerManifest::Today { format }) => {
                let producer = match format {
                    Some(format) if !TodayProducer::is_valid_format(&format) => {
                        return Err(Error::InvalidDateFormat {
                            key: key.to_string(),
                            format,
                        });
                    }
                    Some(format) => TodayProducer { format },
                    None => TodayProducer::default(),
                };
                ValueSource::Produced(Arc::new(producer))
            }
        })
    }
}

impl CheckManifest {
    fn into_rule_check(self, key: &str) -> Result<RuleCheck> {
        let pattern = self
            .pattern
            .as_deref()
            .map(Regex::new)
            .transpose()
            .map_err(|source| Error::InvalidPattern {
                key: key.to_string(),
                source,
            })?;

        Ok(RuleCheck {
            non_empty: self.non_empty,
            min_length: self.min_length,
            max_length: self.max_length,
            pattern,
            one_of: self.one_of,
            forbidden_chars: self.forbidden_chars,
        })
    }
}
