//! Borders command handler for writing the compact borders file.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use landroute_lib::write_borders;

use landroute_cli::output::OutputFormat;

use super::GlobalOptions;

#[derive(Debug, Serialize)]
struct BordersOutput {
    output: String,
    countries: usize,
}

/// Handle the borders subcommand.
pub fn handle_borders(global: &GlobalOptions, output: &Path) -> Result<()> {
    let dataset = global.load_dataset()?;
    write_borders(&dataset, output)
        .with_context(|| format!("failed to write borders file to {}", output.display()))?;

    let summary = BordersOutput {
        output: output.display().to_string(),
        countries: dataset.len(),
    };

    match global.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
        OutputFormat::Text => println!(
            "Wrote {} countries to {}",
            summary.countries, summary.output
        ),
    }
    Ok(())
}
