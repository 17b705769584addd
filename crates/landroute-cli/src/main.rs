mod commands;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use landroute_cli::output::OutputFormat;
use landroute_lib::EnumerationStrategy;

use commands::routes::RoutesCommandArgs;
use commands::GlobalOptions;

#[derive(Parser, Debug)]
#[command(author, version, about = "Country land-route utilities")]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug)]
struct GlobalArgs {
    /// Override the country dataset file or directory.
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    /// Store the route cache in this file instead of the platform cache directory.
    #[arg(long, global = true, conflicts_with = "no_cache_file")]
    cache_file: Option<PathBuf>,

    /// Keep the route cache in memory only.
    #[arg(long, global = true)]
    no_cache_file: bool,

    /// Output format.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

impl From<GlobalArgs> for GlobalOptions {
    fn from(args: GlobalArgs) -> Self {
        Self {
            data: args.data,
            cache_file: args.cache_file,
            no_cache_file: args.no_cache_file,
            format: args.format,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Resolve country names or codes to canonical three-letter codes.
    Resolve {
        /// Names, codes or abbreviations to resolve.
        #[arg(required = true)]
        inputs: Vec<String>,
    },
    /// Find the route with the fewest border crossings.
    Route {
        /// Origin country.
        #[arg(long = "from")]
        from: String,
        /// Destination country.
        #[arg(long = "to")]
        to: String,
    },
    /// List every simple land route within depth and count limits.
    Routes {
        /// Origin country.
        #[arg(long = "from")]
        from: String,
        /// Destination country.
        #[arg(long = "to")]
        to: String,
        /// Maximum number of border crossings per route.
        #[arg(long, default_value_t = 10)]
        max_depth: usize,
        /// Maximum number of routes returned.
        #[arg(long, default_value_t = 50)]
        max_routes: usize,
        /// Enumeration strategy (backtracking or explicit-stack).
        #[arg(long)]
        strategy: Option<EnumerationStrategy>,
        /// Bypass the route cache.
        #[arg(long)]
        no_cache: bool,
    },
    /// Write the dataset as a compact borders file.
    Borders {
        /// Destination file.
        #[arg(long)]
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let global = GlobalOptions::from(cli.global);

    match cli.command {
        Command::Resolve { inputs } => commands::resolve::handle_resolve(&global, &inputs),
        Command::Route { from, to } => commands::route::handle_route(&global, &from, &to),
        Command::Routes {
            from,
            to,
            max_depth,
            max_routes,
            strategy,
            no_cache,
        } => commands::routes::handle_routes(
            &global,
            &RoutesCommandArgs {
                from,
                to,
                max_depth,
                max_routes,
                strategy,
                no_cache,
            },
        ),
        Command::Borders { output } => commands::borders::handle_borders(&global, &output),
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}
