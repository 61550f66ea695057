//! Implementation of the `elicit check` command

use std::path::Path;

use colored::Colorize;
use elicit_core::reference::extract_references;
use elicit_core::{ConfigurationManifest, Element, ValueSource, schema};

use crate::error::Result;

/// Validate a manifest and describe its elements without prompting.
pub fn run_check(manifest: &Path) -> Result<()> {
    let config = ConfigurationManifest::load(manifest)?.into_configuration()?;
    let elements = schema::validate(&config)?;

    for element in &elements {
        println!("{}", describe(element));
    }
    println!(
        "{} {} elements valid",
        "OK".green().bold(),
        elements.len()
    );
    Ok(())
}

fn describe(element: &Element) -> String {
    let kind = if element.is_prompted() {
        "prompted".yellow()
    } else {
        "silent".normal()
    };
    let source = match &element.source {
        ValueSource::Static(value) => {
            let references = extract_references(value);
            if references.is_empty() {
                String::new()
            } else {
                format!(" <- {}", references.join(", "))
            }
        }
        ValueSource::Produced(_) => " (produced)".to_string(),
    };
    format!("{} {}{}", element.key.bold(), kind, source)
}
