//! Request orchestration: identifier resolution, shortest routes and cached
//! enumeration behind one engine object.

use std::env;
use std::path::PathBuf;
use std::time::Instant;

use dashmap::DashMap;
use directories::ProjectDirs;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::cache::{CacheStore, RouteCache, CACHE_FILENAME, DEFAULT_CACHE_CAPACITY};
use crate::error::{Error, Result};
use crate::graph::{CountryCode, GraphProvider, Route};
use crate::path::{find_route, RouteEnvelope};
use crate::resolver::{CountryMetadataProvider, CountryResolver};
use crate::routing::{select_enumerator, EnumerationStrategy};

/// Environment variable overriding the durable cache location.
pub const CACHE_FILE_ENV_VAR: &str = "LANDROUTE_CACHE_FILE";
/// Environment variable overriding the cache capacity.
pub const CACHE_CAPACITY_ENV_VAR: &str = "LANDROUTE_CACHE_CAPACITY";
/// Environment variable overriding the default enumeration strategy.
pub const STRATEGY_ENV_VAR: &str = "LANDROUTE_STRATEGY";

const SUGGESTION_LIMIT: usize = 3;

/// Engine settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Durable cache file; `None` keeps the cache in memory only.
    pub cache_path: Option<PathBuf>,
    pub cache_capacity: usize,
    /// Strategy used when a request does not name one.
    pub strategy: EnumerationStrategy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            cache_path: default_cache_path().ok(),
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            strategy: EnumerationStrategy::default(),
        }
    }
}

impl EngineConfig {
    /// Defaults without a durable store.
    pub fn in_memory() -> Self {
        Self {
            cache_path: None,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            strategy: EnumerationStrategy::default(),
        }
    }

    /// Defaults overridden by `LANDROUTE_CACHE_FILE`, `LANDROUTE_CACHE_CAPACITY`
    /// and `LANDROUTE_STRATEGY`. Unparseable values are ignored with a warning.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(path) = lookup(CACHE_FILE_ENV_VAR) {
            let path = path.trim();
            config.cache_path = (!path.is_empty()).then(|| PathBuf::from(path));
        }

        if let Some(raw) = lookup(CACHE_CAPACITY_ENV_VAR) {
            match raw.trim().parse::<usize>() {
                Ok(capacity) if capacity > 0 => config.cache_capacity = capacity,
                _ => warn!(
                    variable = CACHE_CAPACITY_ENV_VAR,
                    value = %raw,
                    "ignoring invalid cache capacity"
                ),
            }
        }

        if let Some(raw) = lookup(STRATEGY_ENV_VAR) {
            match raw.parse::<EnumerationStrategy>() {
                Ok(strategy) => config.strategy = strategy,
                Err(err) => warn!(variable = STRATEGY_ENV_VAR, error = %err, "ignoring invalid strategy"),
            }
        }

        config
    }

    pub fn with_cache_path(mut self, cache_path: Option<PathBuf>) -> Self {
        self.cache_path = cache_path;
        self
    }

    pub fn with_cache_capacity(mut self, cache_capacity: usize) -> Self {
        self.cache_capacity = cache_capacity;
        self
    }

    pub fn with_strategy(mut self, strategy: EnumerationStrategy) -> Self {
        self.strategy = strategy;
        self
    }
}

/// Platform cache directory location of the durable route cache.
pub fn default_cache_path() -> Result<PathBuf> {
    let dirs =
        ProjectDirs::from("com", "landroute", "landroute").ok_or(Error::ProjectDirsUnavailable)?;
    Ok(dirs.cache_dir().join(CACHE_FILENAME))
}

/// What a [`RouteRequest`] asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteQuery {
    /// Fewest border crossings.
    Shortest,
    /// Every simple route within the envelope, served through the cache.
    AllRoutes {
        envelope: RouteEnvelope,
        /// `None` uses the engine's configured strategy.
        strategy: Option<EnumerationStrategy>,
    },
}

/// A route request between two raw, unresolved identifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteRequest {
    pub origin: String,
    pub destination: String,
    pub query: RouteQuery,
}

impl RouteRequest {
    pub fn shortest(origin: impl Into<String>, destination: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            destination: destination.into(),
            query: RouteQuery::Shortest,
        }
    }

    pub fn all_routes(
        origin: impl Into<String>,
        destination: impl Into<String>,
        envelope: RouteEnvelope,
    ) -> Self {
        Self {
            origin: origin.into(),
            destination: destination.into(),
            query: RouteQuery::AllRoutes {
                envelope,
                strategy: None,
            },
        }
    }

    /// Pin the enumeration strategy. Has no effect on shortest-route requests.
    pub fn with_strategy(mut self, strategy: EnumerationStrategy) -> Self {
        if let RouteQuery::AllRoutes { envelope, .. } = self.query {
            self.query = RouteQuery::AllRoutes {
                envelope,
                strategy: Some(strategy),
            };
        }
        self
    }
}

/// Result of [`RoutingEngine::plan`], carrying the resolved endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum RouteOutcome {
    Shortest {
        origin: CountryCode,
        destination: CountryCode,
        route: Option<Route>,
    },
    AllRoutes {
        origin: CountryCode,
        destination: CountryCode,
        #[serde(flatten)]
        envelope: RouteEnvelope,
        routes: Vec<Route>,
    },
}

impl RouteOutcome {
    pub fn origin(&self) -> &str {
        match self {
            RouteOutcome::Shortest { origin, .. } | RouteOutcome::AllRoutes { origin, .. } => {
                origin
            }
        }
    }

    pub fn destination(&self) -> &str {
        match self {
            RouteOutcome::Shortest { destination, .. }
            | RouteOutcome::AllRoutes { destination, .. } => destination,
        }
    }

    /// Every route in the outcome; empty when no land route exists.
    pub fn routes(&self) -> Vec<&Route> {
        match self {
            RouteOutcome::Shortest { route, .. } => route.iter().collect(),
            RouteOutcome::AllRoutes { routes, .. } => routes.iter().collect(),
        }
    }
}

/// Resolves identifiers and dispatches route queries.
///
/// The resolver index is built once in [`RoutingEngine::open`] and only read
/// afterwards. The engine owns its cache; call [`RoutingEngine::close`] for
/// the final save.
pub struct RoutingEngine<G> {
    graphs: G,
    resolver: CountryResolver,
    cache: RouteCache,
    shortest: DashMap<(CountryCode, CountryCode), Option<Route>>,
    strategy: EnumerationStrategy,
}

impl<G: GraphProvider> RoutingEngine<G> {
    /// Build the resolver from `metadata` and open the cache described by `config`.
    pub fn open<M>(graphs: G, metadata: &M, config: &EngineConfig) -> Result<Self>
    where
        M: CountryMetadataProvider + ?Sized,
    {
        let started = Instant::now();
        let resolver = CountryResolver::build(metadata)?;
        let cache = match &config.cache_path {
            Some(path) => RouteCache::open(CacheStore::new(path), config.cache_capacity),
            None => RouteCache::new(config.cache_capacity),
        };

        info!(
            countries = resolver.len(),
            cached_pairs = cache.len(),
            strategy = %config.strategy,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "routing engine ready"
        );
        Ok(Self::from_parts(graphs, resolver, cache, config.strategy))
    }

    /// Assemble an engine from prebuilt components.
    pub fn from_parts(
        graphs: G,
        resolver: CountryResolver,
        cache: RouteCache,
        strategy: EnumerationStrategy,
    ) -> Self {
        Self {
            graphs,
            resolver,
            cache,
            shortest: DashMap::new(),
            strategy,
        }
    }

    pub fn resolver(&self) -> &CountryResolver {
        &self.resolver
    }

    pub fn cache(&self) -> &RouteCache {
        &self.cache
    }

    pub fn strategy(&self) -> EnumerationStrategy {
        self.strategy
    }

    /// Resolve raw input to a canonical code.
    ///
    /// Fails with [`Error::UnresolvedIdentifier`], carrying up to three
    /// suggestions, when nothing matches.
    pub fn resolve(&self, input: &str) -> Result<CountryCode> {
        self.resolver
            .resolve(input)
            .ok_or_else(|| Error::UnresolvedIdentifier {
                input: input.trim().to_string(),
                suggestions: self.resolver.suggest(input, SUGGESTION_LIMIT),
            })
    }

    fn resolve_pair(&self, origin: &str, destination: &str) -> Result<(CountryCode, CountryCode)> {
        Ok((self.resolve(origin)?, self.resolve(destination)?))
    }

    /// Shortest land route between two raw identifiers.
    ///
    /// `Ok(None)` means both countries exist but no land route joins them.
    /// Successful searches are memoised per resolved pair.
    pub fn shortest_route(&self, origin: &str, destination: &str) -> Result<Option<Route>> {
        let (origin, destination) = self.resolve_pair(origin, destination)?;
        self.shortest_between(origin, destination)
    }

    /// Memoised BFS between two canonical codes.
    ///
    /// A miss computes while holding the memo shard's write lock, so other
    /// pairs in the same shard wait for the search to finish.
    fn shortest_between(
        &self,
        origin: CountryCode,
        destination: CountryCode,
    ) -> Result<Option<Route>> {
        let key = (origin, destination);

        if let Some(hit) = self.shortest.get(&key) {
            debug!(origin = %key.0, destination = %key.1, "shortest route memo hit");
            return Ok(hit.value().clone());
        }

        let started = Instant::now();
        let route = self
            .shortest
            .entry(key.clone())
            .or_try_insert_with(|| {
                let graph = self.graphs.build_graph()?;
                find_route(&graph, &key.0, &key.1)
            })?
            .value()
            .clone();

        debug!(
            origin = %key.0,
            destination = %key.1,
            hops = route.as_ref().map(|route| route.len().saturating_sub(1)),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "computed shortest route"
        );
        Ok(route)
    }

    /// Every simple route within `envelope`, using the configured strategy
    /// and the cache.
    pub fn all_routes(
        &self,
        origin: &str,
        destination: &str,
        envelope: RouteEnvelope,
    ) -> Result<Vec<Route>> {
        self.all_routes_with(origin, destination, envelope, self.strategy)
    }

    /// Like [`RoutingEngine::all_routes`] with an explicit strategy for misses.
    pub fn all_routes_with(
        &self,
        origin: &str,
        destination: &str,
        envelope: RouteEnvelope,
        strategy: EnumerationStrategy,
    ) -> Result<Vec<Route>> {
        let (origin, destination) = self.resolve_pair(origin, destination)?;
        self.all_routes_between(&origin, &destination, envelope, strategy)
    }

    fn all_routes_between(
        &self,
        origin: &str,
        destination: &str,
        envelope: RouteEnvelope,
        strategy: EnumerationStrategy,
    ) -> Result<Vec<Route>> {
        let enumerator = select_enumerator(strategy);
        self.cache
            .get_or_compute(origin, destination, envelope, &self.graphs, enumerator.as_ref())
    }

    /// Enumerate without reading or writing the cache.
    pub fn enumerate_uncached(
        &self,
        origin: &str,
        destination: &str,
        envelope: RouteEnvelope,
        strategy: EnumerationStrategy,
    ) -> Result<Vec<Route>> {
        let (origin, destination) = self.resolve_pair(origin, destination)?;
        let graph = self.graphs.build_graph()?;
        select_enumerator(strategy).enumerate(&graph, &origin, &destination, envelope)
    }

    /// Resolve a request and dispatch it to the matching search.
    pub fn plan(&self, request: &RouteRequest) -> Result<RouteOutcome> {
        let (origin, destination) = self.resolve_pair(&request.origin, &request.destination)?;

        match request.query {
            RouteQuery::Shortest => {
                let route = self.shortest_between(origin.clone(), destination.clone())?;
                Ok(RouteOutcome::Shortest {
                    origin,
                    destination,
                    route,
                })
            }
            RouteQuery::AllRoutes { envelope, strategy } => {
                let strategy = strategy.unwrap_or(self.strategy);
                let routes = self.all_routes_between(&origin, &destination, envelope, strategy)?;
                Ok(RouteOutcome::AllRoutes {
                    origin,
                    destination,
                    envelope,
                    routes,
                })
            }
        }
    }

    /// Persist the cache one last time and release the engine.
    pub fn close(self) {
        self.cache.close();
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::graph::Graph;
    use crate::resolver::CountryRecord;

    fn engine() -> RoutingEngine<Graph> {
        let graph: Graph = [
            ("CZE", vec!["AUT", "DEU"]),
            ("AUT", vec!["CZE", "DEU", "ITA"]),
            ("DEU", vec!["AUT", "CZE"]),
            ("ITA", vec!["AUT"]),
            ("USA", vec![]),
        ]
        .into_iter()
        .collect();
        let records = vec![
            CountryRecord::new("AUT").with_cca2("AT").with_names(["Austria"]),
            CountryRecord::new("CZE").with_cca2("CZ").with_names(["Czechia"]),
            CountryRecord::new("DEU").with_cca2("DE").with_names(["Germany"]),
            CountryRecord::new("ITA").with_cca2("IT").with_names(["Italy"]),
            CountryRecord::new("USA").with_cca2("US").with_names(["United States"]),
        ];
        RoutingEngine::open(graph, &records, &EngineConfig::in_memory()).unwrap()
    }

    #[test]
    fn config_reads_overrides() {
        let vars: HashMap<&str, &str> = [
            (CACHE_FILE_ENV_VAR, "/tmp/routes.json"),
            (CACHE_CAPACITY_ENV_VAR, "12"),
            (STRATEGY_ENV_VAR, "explicit-stack"),
        ]
        .into_iter()
        .collect();

        let config = EngineConfig::from_lookup(|name| vars.get(name).map(|v| v.to_string()));
        assert_eq!(config.cache_path, Some(PathBuf::from("/tmp/routes.json")));
        assert_eq!(config.cache_capacity, 12);
        assert_eq!(config.strategy, EnumerationStrategy::ExplicitStack);
    }

    #[test]
    fn config_ignores_invalid_values() {
        let vars: HashMap<&str, &str> = [
            (CACHE_FILE_ENV_VAR, "  "),
            (CACHE_CAPACITY_ENV_VAR, "lots"),
            (STRATEGY_ENV_VAR, "dijkstra"),
        ]
        .into_iter()
        .collect();

        let config = EngineConfig::from_lookup(|name| vars.get(name).map(|v| v.to_string()));
        assert_eq!(config.cache_path, None);
        assert_eq!(config.cache_capacity, DEFAULT_CACHE_CAPACITY);
        assert_eq!(config.strategy, EnumerationStrategy::Backtracking);
    }

    #[test]
    fn resolve_reports_suggestions() {
        let engine = engine();
        assert_eq!(engine.resolve("cz").unwrap(), "CZE");

        let err = engine.resolve("Qwertyuiop").expect_err("not a country");
        assert!(matches!(err, Error::UnresolvedIdentifier { ref input, .. } if input == "Qwertyuiop"));
        assert!(err.is_unknown_country());
    }

    #[test]
    fn shortest_route_is_memoised() {
        let engine = engine();
        let first = engine.shortest_route("CZ", "Italy").unwrap();
        assert_eq!(
            first,
            Some(vec!["CZE".to_string(), "AUT".to_string(), "ITA".to_string()])
        );
        assert_eq!(engine.shortest.len(), 1);
        assert_eq!(engine.shortest_route("CZE", "ITA").unwrap(), first);
        assert_eq!(engine.shortest.len(), 1);
    }

    #[test]
    fn unreachable_pair_is_not_an_error() {
        let engine = engine();
        assert_eq!(engine.shortest_route("USA", "ITA").unwrap(), None);
        assert!(engine
            .all_routes("USA", "ITA", RouteEnvelope::default())
            .unwrap()
            .is_empty());
    }

    #[test]
    fn plan_dispatches_by_query() {
        let engine = engine();

        let shortest = engine.plan(&RouteRequest::shortest("AT", "IT")).unwrap();
        assert_eq!(shortest.origin(), "AUT");
        assert_eq!(shortest.routes().len(), 1);

        let request = RouteRequest::all_routes("CZE", "ITA", RouteEnvelope::new(5, 10))
            .with_strategy(EnumerationStrategy::ExplicitStack);
        let outcome = engine.plan(&request).unwrap();
        assert_eq!(outcome.destination(), "ITA");
        assert_eq!(outcome.routes().len(), 2);
        assert_eq!(engine.cache().len(), 1);
    }

    #[test]
    fn plan_shares_the_shortest_route_memo() {
        let engine = engine();

        let outcome = engine.plan(&RouteRequest::shortest("Czechia", "IT")).unwrap();
        assert_eq!(outcome.origin(), "CZE");
        assert!(engine
            .shortest
            .contains_key(&("CZE".to_string(), "ITA".to_string())));
        assert_eq!(engine.shortest.len(), 1);

        let direct = engine.shortest_route("cz", "Italy").unwrap();
        assert_eq!(outcome.routes(), direct.iter().collect::<Vec<_>>());
        assert_eq!(engine.shortest.len(), 1);
    }

    #[test]
    fn uncached_enumeration_leaves_cache_untouched() {
        let engine = engine();
        let routes = engine
            .enumerate_uncached(
                "CZE",
                "ITA",
                RouteEnvelope::new(5, 10),
                EnumerationStrategy::Backtracking,
            )
            .unwrap();
        assert_eq!(routes.len(), 2);
        assert!(engine.cache().is_empty());
    }

    #[test]
    fn outcome_serializes_envelope_inline() {
        let outcome = RouteOutcome::AllRoutes {
            origin: "CZE".to_string(),
            destination: "ITA".to_string(),
            envelope: RouteEnvelope::new(3, 7),
            routes: Vec::new(),
        };
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["kind"], "all-routes");
        assert_eq!(json["maxDepth"], 3);
        assert_eq!(json["maxRoutes"], 7);
    }
}
