//! Configuration shape validation
//!
//! Turns declared [`ElementSpec`]s into typed [`Element`]s, failing fast on
//! the first violation. Static values are also checked for references to
//! unknown keys and for reference cycles, so those surface before anything
//! is prompted.

use crate::config::Configuration;
use crate::dependency::DependencyGraph;
use crate::element::{Element, ElementSpec, Labels, PromptSettings, ValueSource};
use crate::error::{Result, SchemaError};
use crate::reference::extract_references;

/// Keys the note-creation wrapper requires, in checking order.
pub const NOTE_ELEMENTS: [&str; 2] = ["path", "filename"];

/// Validate a configuration for the free-standing prompting entry point.
///
/// Same as [`validate_elements`], but an empty configuration is rejected.
pub fn validate(config: &Configuration) -> Result<Vec<Element>> {
    if config.is_empty() {
        return Err(SchemaError::Empty.into());
    }
    validate_elements(config)
}

/// Validate every element and the static references between them.
pub fn validate_elements(config: &Configuration) -> Result<Vec<Element>> {
    let elements = config
        .iter()
        .map(|(key, spec)| validate_element(key, spec))
        .collect::<std::result::Result<Vec<_>, _>>()?;

    check_static_references(config, &elements)?;

    Ok(elements)
}

/// Ensure the keys required for note creation are present.
pub fn validate_note_elements(config: &Configuration) -> Result<()> {
    for key in NOTE_ELEMENTS {
        if !config.contains_key(key) {
            return Err(SchemaError::MissingElement {
                key: key.to_string(),
            }
            .into());
        }
    }
    Ok(())
}

/// Validate a single declared element.
pub fn validate_element(
    key: &str,
    spec: &ElementSpec,
) -> std::result::Result<Element, SchemaError> {
    let missing = |property| SchemaError::MissingProperty {
        key: key.to_string(),
        property,
    };
    let invalid = |property, reason: &str| SchemaError::InvalidProperty {
        key: key.to_string(),
        property,
        reason: reason.to_string(),
    };

    let prompted = spec.prompt.ok_or_else(|| missing("prompt"))?;

    let display = match (&spec.display, prompted) {
        (None, true) => return Err(missing("display")),
        (display, _) => display.clone(),
    };

    let source = spec.value.clone().ok_or_else(|| missing("value"))?;

    if spec.limit == Some(0) {
        return Err(invalid("limit", "must be a positive integer"));
    }

    if let (Some(Labels::Items(labels)), ValueSource::Static(value)) = (&spec.text, &source) {
        match value.as_list() {
            Some(items) if items.len() != labels.len() => {
                return Err(invalid("text", "must have one label per value item"));
            }
            None => return Err(invalid("text", "requires a list value")),
            _ => {}
        }
    }

    let prompt = prompted.then(|| PromptSettings {
        display: display.unwrap_or_default(),
        multiline: spec.multiline.unwrap_or(false),
        limit: spec.limit,
        labels: spec.text.clone(),
    });

    Ok(Element {
        key: key.to_string(),
        source,
        prompt,
        check: spec.check.clone(),
        process: spec.process.clone(),
    })
}

/// Reject static references to unknown keys and static reference cycles.
fn check_static_references(config: &Configuration, elements: &[Element]) -> Result<()> {
    let referencing: Vec<(String, Vec<String>)> = elements
        .iter()
        .filter_map(|element| {
            let value = element.source.as_static()?;
            let references = extract_references(value);
            (!references.is_empty()).then(|| (element.key.clone(), references))
        })
        .collect();

    if referencing.is_empty() {
        return Ok(());
    }

    let graph = DependencyGraph::from_references(&referencing, |k| config.contains_key(k))?;
    graph.topological_sort()?;
    Ok(())
}
