mod common;

use std::sync::Arc;

use landroute_lib::cache::CACHE_FILENAME;
use landroute_lib::{
    load_dataset, EngineConfig, EnumerationStrategy, Error, GraphProvider, RouteEnvelope,
    RouteOutcome, RouteRequest, RoutingEngine,
};

use common::{fixture_countries_path, fixture_dataset, route, CountingProvider};

fn counting_engine(config: &EngineConfig) -> RoutingEngine<Arc<CountingProvider>> {
    let dataset = fixture_dataset();
    let graphs = Arc::new(CountingProvider::new(
        dataset.build_graph().expect("graph builds"),
    ));
    RoutingEngine::open(graphs, &dataset, config).expect("engine opens")
}

#[test]
fn engine_resolves_before_searching() {
    let dataset = load_dataset(Some(fixture_countries_path().as_path())).expect("fixture loads");
    let engine =
        RoutingEngine::open(dataset.clone(), &dataset, &EngineConfig::in_memory()).unwrap();

    assert_eq!(
        engine.shortest_route("cz", "Italy").unwrap(),
        Some(route(&["CZE", "AUT", "ITA"]))
    );
    assert_eq!(engine.shortest_route("Spain", "SPN").unwrap(), Some(route(&["ESP"])));
}

#[test]
fn unresolved_identifier_skips_graph_access() {
    let engine = counting_engine(&EngineConfig::in_memory());

    let err = engine
        .all_routes("XYZ", "ITA", RouteEnvelope::default())
        .expect_err("XYZ is garbage");
    assert!(matches!(err, Error::UnresolvedIdentifier { ref input, .. } if input == "XYZ"));

    let err = engine.shortest_route("CZE", "12345").expect_err("digits");
    assert!(err.is_unknown_country());
    assert_eq!(engine.cache().len(), 0);
}

#[test]
fn unresolved_identifier_carries_suggestions() {
    let engine = counting_engine(&EngineConfig::in_memory());
    let err = engine.resolve("Qwertyuiop").expect_err("too far from any name");
    let message = err.to_string();
    assert!(message.starts_with("unknown country: Qwertyuiop"), "{message}");
    assert!(message.contains("Did you mean one of:"), "{message}");
}

#[test]
fn unreachable_pairs_return_empty_results() {
    let engine = counting_engine(&EngineConfig::in_memory());
    assert_eq!(engine.shortest_route("USA", "Australia").unwrap(), None);
    assert!(engine
        .all_routes("USA", "AUS", RouteEnvelope::new(10, 10))
        .unwrap()
        .is_empty());
}

#[test]
fn repeated_queries_reuse_cached_work() {
    let dataset = fixture_dataset();
    let graphs = Arc::new(CountingProvider::new(dataset.build_graph().unwrap()));
    let engine =
        RoutingEngine::open(Arc::clone(&graphs), &dataset, &EngineConfig::in_memory()).unwrap();

    engine.shortest_route("CZE", "ITA").unwrap();
    engine.shortest_route("Czechia", "IT").unwrap();
    assert_eq!(graphs.calls(), 1);

    let wide = engine
        .all_routes("DE", "HU", RouteEnvelope::new(6, 200))
        .unwrap();
    let narrow = engine
        .all_routes("Hungary", "Germany", RouteEnvelope::new(3, 5))
        .unwrap();
    assert_eq!(graphs.calls(), 2);
    assert!(narrow
        .iter()
        .all(|r| wide.contains(&r.iter().rev().cloned().collect())));
}

#[test]
fn plan_reports_resolved_endpoints() {
    let engine = counting_engine(&EngineConfig::in_memory());

    let outcome = engine
        .plan(
            &RouteRequest::all_routes("Portugal", "es", RouteEnvelope::new(1, 5))
                .with_strategy(EnumerationStrategy::ExplicitStack),
        )
        .unwrap();
    assert_eq!(
        outcome,
        RouteOutcome::AllRoutes {
            origin: "PRT".to_string(),
            destination: "ESP".to_string(),
            envelope: RouteEnvelope::new(1, 5),
            routes: vec![route(&["PRT", "ESP"])],
        }
    );

    let outcome = engine.plan(&RouteRequest::shortest("GBR", "FRA")).unwrap();
    assert!(outcome.routes().is_empty());
}

#[test]
fn uncached_strategies_agree() {
    let engine = counting_engine(&EngineConfig::in_memory());
    let envelope = RouteEnvelope::new(5, 30);

    let recursive = engine
        .enumerate_uncached("FRA", "HUN", envelope, EnumerationStrategy::Backtracking)
        .unwrap();
    let iterative = engine
        .enumerate_uncached("FRA", "HUN", envelope, EnumerationStrategy::ExplicitStack)
        .unwrap();
    assert_eq!(recursive, iterative);
    assert!(engine.cache().is_empty());
}

#[test]
fn close_persists_and_open_restores() {
    let dir = tempfile::tempdir().unwrap();
    let config = EngineConfig::in_memory()
        .with_cache_path(Some(dir.path().join(CACHE_FILENAME)))
        .with_cache_capacity(8);

    let engine = counting_engine(&config);
    let routes = engine
        .all_routes("CZE", "ITA", RouteEnvelope::new(3, 10))
        .unwrap();
    engine.close();

    let reopened = counting_engine(&config);
    assert_eq!(reopened.cache().len(), 1);
    assert_eq!(
        reopened
            .all_routes("CZE", "ITA", RouteEnvelope::new(3, 10))
            .unwrap(),
        routes
    );
}
