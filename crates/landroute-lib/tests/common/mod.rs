//! Common test utilities and fixture helpers.
//!
//! Shared by the integration tests: fixture paths, the loaded fixture
//! dataset and a graph provider that counts how often it is asked for a graph.

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

use landroute_lib::{CountryDataset, Graph, GraphProvider, Result, Route};

/// Path to fixtures directory used by tests.
#[allow(dead_code)]
pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../docs/fixtures")
}

/// Path to the raw countries fixture.
#[allow(dead_code)]
pub fn fixture_countries_path() -> PathBuf {
    fixtures_dir().join("countries.json")
}

/// Load the raw countries fixture.
#[allow(dead_code)]
pub fn fixture_dataset() -> CountryDataset {
    CountryDataset::load(&fixture_countries_path()).expect("fixture dataset loads")
}

#[allow(dead_code)]
pub fn route(codes: &[&str]) -> Route {
    codes.iter().map(|code| code.to_string()).collect()
}

/// Graph provider that records every `build_graph` call.
#[allow(dead_code)]
pub struct CountingProvider {
    graph: Graph,
    calls: AtomicUsize,
}

#[allow(dead_code)]
impl CountingProvider {
    pub fn new(graph: Graph) -> Self {
        Self {
            graph,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl GraphProvider for CountingProvider {
    fn build_graph(&self) -> Result<Graph> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.graph.clone())
    }
}
