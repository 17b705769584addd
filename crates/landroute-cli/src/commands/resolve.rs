//! Resolve command handler for mapping raw identifiers to canonical codes.

use anyhow::{bail, Result};

use landroute_cli::output::{format_resolutions, OutputFormat, Resolution};

use super::GlobalOptions;

const SUGGESTION_LIMIT: usize = 3;

/// Handle the resolve subcommand.
///
/// Prints one line per input. Fails after printing when any input could not
/// be resolved.
pub fn handle_resolve(global: &GlobalOptions, inputs: &[String]) -> Result<()> {
    let dataset = global.load_dataset()?;
    let engine = global.open_engine(&dataset, false)?;
    let resolver = engine.resolver();

    let resolutions: Vec<Resolution> = inputs
        .iter()
        .map(|input| {
            let code = resolver.resolve(input);
            let suggestions = if code.is_none() {
                resolver.suggest(input, SUGGESTION_LIMIT)
            } else {
                Vec::new()
            };
            Resolution {
                input: input.clone(),
                code,
                suggestions,
            }
        })
        .collect();

    match global.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&resolutions)?),
        OutputFormat::Text => print!("{}", format_resolutions(&resolutions)),
    }

    let unresolved = resolutions.iter().filter(|r| r.code.is_none()).count();
    if unresolved > 0 {
        bail!("{unresolved} of {} identifiers could not be resolved", resolutions.len());
    }
    Ok(())
}
