//! Routes command handler for bounded enumeration of every simple route.

use anyhow::Result;

use landroute_lib::{EnumerationStrategy, RouteEnvelope};

use landroute_cli::output::{format_routes_text, AllRoutesBody, OutputFormat};

use super::GlobalOptions;

/// Arguments for the routes command.
#[derive(Debug, Clone)]
pub struct RoutesCommandArgs {
    /// Origin identifier as typed by the user.
    pub from: String,
    /// Destination identifier as typed by the user.
    pub to: String,
    pub max_depth: usize,
    pub max_routes: usize,
    /// `None` uses the configured default strategy.
    pub strategy: Option<EnumerationStrategy>,
    /// Skip the route cache entirely.
    pub no_cache: bool,
}

impl RoutesCommandArgs {
    pub fn envelope(&self) -> RouteEnvelope {
        RouteEnvelope::new(self.max_depth, self.max_routes)
    }
}

/// Handle the routes subcommand.
pub fn handle_routes(global: &GlobalOptions, args: &RoutesCommandArgs) -> Result<()> {
    let dataset = global.load_dataset()?;
    let engine = global.open_engine(&dataset, !args.no_cache)?;
    let envelope = args.envelope();
    let strategy = args.strategy.unwrap_or(engine.strategy());

    let origin = engine.resolve(&args.from)?;
    let destination = engine.resolve(&args.to)?;
    let routes = if args.no_cache {
        engine.enumerate_uncached(&origin, &destination, envelope, strategy)?
    } else {
        engine.all_routes_with(&origin, &destination, envelope, strategy)?
    };

    match global.format {
        OutputFormat::Json => {
            let body = AllRoutesBody {
                origin: &origin,
                destination: &destination,
                max_depth: envelope.max_depth,
                max_routes: envelope.max_routes,
                routes: &routes,
            };
            println!("{}", serde_json::to_string_pretty(&body)?);
        }
        OutputFormat::Text => print!(
            "{}",
            format_routes_text(&origin, &destination, envelope, &routes)
        ),
    }

    engine.close();
    Ok(())
}
