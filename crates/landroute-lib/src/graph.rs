use std::collections::HashMap;
use std::sync::Arc;

use crate::error::Result;

/// Canonical three-letter country code (`cca3`), used as the graph node key.
pub type CountryCode = String;

/// Ordered sequence of country codes, origin first and destination last.
pub type Route = Vec<CountryCode>;

/// Land-border graph used by the search algorithms.
///
/// The adjacency is not required to be symmetric. A code that only ever
/// appears as a neighbour is treated as a dead end with no outgoing edges.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    adjacency: Arc<HashMap<CountryCode, Vec<CountryCode>>>,
}

impl Graph {
    /// Wrap an adjacency map without modifying neighbour order.
    pub fn from_adjacency(adjacency: HashMap<CountryCode, Vec<CountryCode>>) -> Self {
        Self {
            adjacency: Arc::new(adjacency),
        }
    }

    /// Whether `code` is a key of the graph.
    pub fn contains(&self, code: &str) -> bool {
        self.adjacency.contains_key(code)
    }

    /// Return the neighbours for a given country code.
    pub fn neighbours(&self, code: &str) -> &[CountryCode] {
        self.adjacency
            .get(code)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Number of keyed countries.
    pub fn len(&self) -> usize {
        self.adjacency.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adjacency.is_empty()
    }

    /// Iterate over keyed country codes in arbitrary order.
    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.adjacency.keys().map(String::as_str)
    }
}

impl<K, V, N> FromIterator<(K, V)> for Graph
where
    K: Into<CountryCode>,
    V: IntoIterator<Item = N>,
    N: Into<CountryCode>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let adjacency = iter
            .into_iter()
            .map(|(code, neighbours)| {
                (
                    code.into(),
                    neighbours.into_iter().map(Into::into).collect(),
                )
            })
            .collect();
        Self::from_adjacency(adjacency)
    }
}

/// Source of the routing graph.
///
/// Implementations may build a fresh graph on every call or hand out a cached
/// snapshot; callers treat the result as immutable for the duration of a query.
pub trait GraphProvider: Send + Sync {
    fn build_graph(&self) -> Result<Graph>;
}

impl GraphProvider for Graph {
    fn build_graph(&self) -> Result<Graph> {
        Ok(self.clone())
    }
}

impl<T: GraphProvider + ?Sized> GraphProvider for Arc<T> {
    fn build_graph(&self) -> Result<Graph> {
        (**self).build_graph()
    }
}

impl<T: GraphProvider + ?Sized> GraphProvider for &T {
    fn build_graph(&self) -> Result<Graph> {
        (**self).build_graph()
    }
}
