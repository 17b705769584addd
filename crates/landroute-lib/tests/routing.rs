mod common;

use std::collections::BTreeSet;

use landroute_lib::{
    find_route, select_enumerator, EnumerationStrategy, Error, Graph, GraphProvider,
    RouteEnvelope,
};

use common::{fixture_dataset, route};

fn fixture_graph() -> Graph {
    fixture_dataset().build_graph().expect("graph builds")
}

#[test]
fn shortest_route_through_alps() {
    let graph: Graph = [
        ("CZE", vec!["AUT"]),
        ("AUT", vec!["ITA"]),
        ("ITA", vec![]),
    ]
    .into_iter()
    .collect();
    assert_eq!(
        find_route(&graph, "CZE", "ITA").unwrap(),
        Some(route(&["CZE", "AUT", "ITA"]))
    );
}

#[test]
fn shortest_route_on_fixture_dataset() {
    let graph = fixture_graph();
    assert_eq!(
        find_route(&graph, "CZE", "ITA").unwrap(),
        Some(route(&["CZE", "AUT", "ITA"]))
    );
    assert_eq!(
        find_route(&graph, "PRT", "DNK").unwrap().map(|r| r.len()),
        Some(5)
    );
    assert_eq!(find_route(&graph, "ESP", "ESP").unwrap(), Some(route(&["ESP"])));
}

#[test]
fn islands_and_other_continents_are_unreachable() {
    let graph = fixture_graph();
    assert_eq!(find_route(&graph, "USA", "AUS").unwrap(), None);
    assert_eq!(find_route(&graph, "FRA", "GBR").unwrap(), None);
    assert_eq!(find_route(&graph, "ISL", "DEU").unwrap(), None);
}

#[test]
fn border_only_codes_are_unknown() {
    let graph = fixture_graph();
    let err = find_route(&graph, "ESP", "GIB").expect_err("GIB is not a dataset key");
    assert!(matches!(err, Error::UnknownCountry { code } if code == "GIB"));
}

#[test]
fn diamond_enumeration_is_exact() {
    let graph: Graph = [
        ("A", vec!["B", "C"]),
        ("B", vec!["D"]),
        ("C", vec!["D"]),
        ("D", vec![]),
    ]
    .into_iter()
    .collect();

    for strategy in [
        EnumerationStrategy::Backtracking,
        EnumerationStrategy::ExplicitStack,
    ] {
        let routes = select_enumerator(strategy)
            .enumerate(&graph, "A", "D", RouteEnvelope::new(10, 10))
            .unwrap();
        let routes: BTreeSet<_> = routes.into_iter().collect();
        assert_eq!(
            routes,
            BTreeSet::from([route(&["A", "B", "D"]), route(&["A", "C", "D"])]),
            "{strategy}"
        );
    }
}

#[test]
fn strategies_agree_on_fixture_dataset() {
    let graph = fixture_graph();
    let pairs = [("CZE", "ITA"), ("PRT", "POL"), ("FRA", "HUN"), ("USA", "MEX")];

    for (origin, destination) in pairs {
        for envelope in [RouteEnvelope::new(4, 500), RouteEnvelope::new(6, 25)] {
            let recursive = select_enumerator(EnumerationStrategy::Backtracking)
                .enumerate(&graph, origin, destination, envelope)
                .unwrap();
            let iterative = select_enumerator(EnumerationStrategy::ExplicitStack)
                .enumerate(&graph, origin, destination, envelope)
                .unwrap();
            assert_eq!(recursive, iterative, "{origin}->{destination}");
            assert!(recursive.len() <= envelope.max_routes);
        }
    }
}

#[test]
fn enumeration_includes_shortest_route() {
    let graph = fixture_graph();
    let shortest = find_route(&graph, "FRA", "HUN").unwrap().expect("connected");
    let routes = select_enumerator(EnumerationStrategy::Backtracking)
        .enumerate(&graph, "FRA", "HUN", RouteEnvelope::new(shortest.len() - 1, 1000))
        .unwrap();

    assert!(routes.iter().all(|r| r.len() >= shortest.len()));
    assert!(routes.iter().any(|r| r.len() == shortest.len()));
}
