//! Route command handler for the shortest land route between two countries.

use anyhow::Result;

use landroute_lib::Error as RouteError;

use landroute_cli::output::{format_route_text, OutputFormat, ShortestRouteBody};

use super::GlobalOptions;

/// Handle the route subcommand.
///
/// A pair of valid countries without a land connection is reported as
/// [`RouteError::RouteNotFound`].
pub fn handle_route(global: &GlobalOptions, from: &str, to: &str) -> Result<()> {
    let dataset = global.load_dataset()?;
    let engine = global.open_engine(&dataset, false)?;

    let origin = engine.resolve(from)?;
    let destination = engine.resolve(to)?;
    let route = engine
        .shortest_route(&origin, &destination)?
        .ok_or(RouteError::RouteNotFound {
            origin,
            destination,
        })?;

    match global.format {
        OutputFormat::Json => {
            let body = ShortestRouteBody { route: &route };
            println!("{}", serde_json::to_string_pretty(&body)?);
        }
        OutputFormat::Text => print!("{}", format_route_text(&route, &dataset)),
    }
    Ok(())
}
