//! Landroute library entry points.
//!
//! This crate resolves loosely written country identifiers, finds shortest
//! land routes over the border graph, enumerates every simple route within a
//! depth and count envelope, and caches those enumerations on disk. Front ends
//! (the CLI today) should only depend on the items exported here instead of
//! reimplementing behavior.
//!

#![deny(warnings)]

pub mod cache;
pub mod dataset;
pub mod engine;
pub mod error;
pub mod graph;
pub mod path;
pub mod resolver;
pub mod routing;

pub use cache::{CacheEntry, CacheKey, CacheStore, RouteCache};
pub use dataset::{
    default_dataset_path, load_dataset, resolve_dataset_path, write_borders, CompactCountry,
    CountryDataset,
};
pub use engine::{
    default_cache_path, EngineConfig, RouteOutcome, RouteQuery, RouteRequest, RoutingEngine,
};
pub use error::{Error, Result};
pub use graph::{CountryCode, Graph, GraphProvider, Route};
pub use path::{
    enumerate_routes_backtracking, enumerate_routes_explicit_stack, find_route, hop_count,
    RouteEnvelope,
};
pub use resolver::{CountryMetadataProvider, CountryRecord, CountryResolver};
pub use routing::{
    select_enumerator, BacktrackingEnumerator, EnumerationStrategy, ExplicitStackEnumerator,
    RouteEnumerator,
};
