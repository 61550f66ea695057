//! Command implementations for elicit-cli

pub mod check;
pub mod note;
pub mod resolve;

pub use check::run_check;
pub use note::run_note;
pub use resolve::run_resolve;

use std::sync::Arc;

use elicit_core::{AcceptDefaults, Configuration, ConfigurationManifest, Prompter, Resolver};
use tracing::debug;

use crate::cli::ResolveArgs;
use crate::error::{CliError, Result};
use crate::interactive::{TerminalNotice, TerminalPrompter};

/// Load the manifest, apply `--set` overrides and build the configuration.
pub(crate) fn load_configuration(args: &ResolveArgs) -> Result<Configuration> {
    let mut manifest = ConfigurationManifest::load(&args.manifest)?;
    for (key, value) in &args.overrides {
        if !manifest.set_value(key, value.as_str()) {
            return Err(CliError::user(format!(
                "Cannot set '{}': no such element in {}",
                key,
                args.manifest.display()
            )));
        }
        debug!(%key, %value, "Applied override");
    }
    Ok(manifest.into_configuration()?)
}

/// A resolver prompting on the terminal, or accepting defaults with `--yes`.
pub(crate) fn resolver(yes: bool) -> Resolver {
    let prompter: Arc<dyn Prompter> = if yes {
        Arc::new(AcceptDefaults)
    } else {
        Arc::new(TerminalPrompter)
    };
    Resolver::new(prompter).with_notice(Arc::new(TerminalNotice))
}
