//! Implementation of the `elicit resolve` command

use elicit_core::Resolution;

use super::{load_configuration, resolver};
use crate::cli::ResolveArgs;
use crate::error::Result;

/// Resolve a manifest and print the values in configuration order.
pub async fn run_resolve(args: &ResolveArgs, json: bool) -> Result<()> {
    let config = load_configuration(args)?;
    let resolution = resolver(args.yes).resolve(&config).await?;
    println!("{}", render(&resolution, json)?);
    Ok(())
}

fn render(resolution: &Resolution, json: bool) -> Result<String> {
    if json {
        return Ok(serde_json::to_string_pretty(resolution)?);
    }
    Ok(resolution
        .iter()
        .map(|(key, value)| format!("{} = {}", key, value))
        .collect::<Vec<_>>()
        .join("\n"))
}
