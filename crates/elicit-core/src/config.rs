//! Ordered configuration of named elements

use crate::element::{ElementSpec, ValueSource};
use crate::resolution::Resolution;
use crate::value::Value;

/// An ordered mapping from key to declared element.
///
/// Order is the default resolution order for elements without references.
/// Inserting an existing key replaces its element and keeps its position.
#[derive(Debug, Clone, Default)]
pub struct Configuration {
    elements: Vec<(String, ElementSpec)>,
}

impl Configuration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with(mut self, key: impl Into<String>, spec: ElementSpec) -> Self {
        self.insert(key, spec);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, spec: ElementSpec) {
        let key = key.into();
        match self.elements.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => *slot = spec,
            None => self.elements.push((key, spec)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&ElementSpec> {
        self.elements.iter().find(|(k, _)| k == key).map(|(_, s)| s)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut ElementSpec> {
        self.elements
            .iter_mut()
            .find(|(k, _)| k == key)
            .map(|(_, s)| s)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.elements.iter().any(|(k, _)| k == key)
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.elements.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ElementSpec)> {
        self.elements.iter().map(|(k, s)| (k.as_str(), s))
    }

    /// The static value of `key`, if it has one.
    pub fn value(&self, key: &str) -> Option<&Value> {
        self.get(key)
            .and_then(|s| s.value.as_ref())
            .and_then(ValueSource::as_static)
    }

    /// Overwrite element values with the recorded values of a resolution.
    ///
    /// Keys absent from the configuration are ignored.
    pub fn apply(&mut self, resolution: &Resolution) {
        for (key, value) in resolution.iter() {
            if let Some(spec) = self.get_mut(key) {
                spec.value = Some(ValueSource::Static(value.clone()));
            }
        }
    }
}
