//! Enumerator implementations behind the [`RouteEnumerator`] strategy trait.

use std::time::Instant;

use tracing::debug;

use crate::error::Result;
use crate::graph::{Graph, Route};
use crate::path::{enumerate_routes_backtracking, enumerate_routes_explicit_stack, RouteEnvelope};

use super::EnumerationStrategy;

/// Trait for bounded route enumeration strategies.
pub trait RouteEnumerator: Send + Sync {
    /// The strategy identifier for this enumerator.
    fn strategy(&self) -> EnumerationStrategy;

    /// Enumerate simple routes from `origin` to `destination` within `envelope`.
    ///
    /// Routes come back in depth-first order over each country's neighbours.
    /// A `max_routes` cut keeps a prefix of that order, so which routes
    /// survive it depends on neighbour order.
    ///
    /// Fails with [`Error::UnknownCountry`](crate::Error::UnknownCountry) when
    /// either endpoint is not a graph key.
    fn enumerate(
        &self,
        graph: &Graph,
        origin: &str,
        destination: &str,
        envelope: RouteEnvelope,
    ) -> Result<Vec<Route>>;
}

/// Recursive enumerator sharing one mutable path across the walk.
#[derive(Debug, Clone, Default)]
pub struct BacktrackingEnumerator;

impl RouteEnumerator for BacktrackingEnumerator {
    fn strategy(&self) -> EnumerationStrategy {
        EnumerationStrategy::Backtracking
    }

    fn enumerate(
        &self,
        graph: &Graph,
        origin: &str,
        destination: &str,
        envelope: RouteEnvelope,
    ) -> Result<Vec<Route>> {
        timed(self.strategy(), origin, destination, envelope, || {
            enumerate_routes_backtracking(graph, origin, destination, envelope)
        })
    }
}

/// Iterative enumerator whose branches own their path and visited set.
#[derive(Debug, Clone, Default)]
pub struct ExplicitStackEnumerator;

impl RouteEnumerator for ExplicitStackEnumerator {
    fn strategy(&self) -> EnumerationStrategy {
        EnumerationStrategy::ExplicitStack
    }

    fn enumerate(
        &self,
        graph: &Graph,
        origin: &str,
        destination: &str,
        envelope: RouteEnvelope,
    ) -> Result<Vec<Route>> {
        timed(self.strategy(), origin, destination, envelope, || {
            enumerate_routes_explicit_stack(graph, origin, destination, envelope)
        })
    }
}

fn timed<F>(
    strategy: EnumerationStrategy,
    origin: &str,
    destination: &str,
    envelope: RouteEnvelope,
    run: F,
) -> Result<Vec<Route>>
where
    F: FnOnce() -> Result<Vec<Route>>,
{
    let started = Instant::now();
    let routes = run()?;
    debug!(
        %strategy,
        origin,
        destination,
        max_depth = envelope.max_depth,
        max_routes = envelope.max_routes,
        routes = routes.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "enumerated routes"
    );
    Ok(routes)
}

/// Select the enumerator for a strategy.
pub fn select_enumerator(strategy: EnumerationStrategy) -> Box<dyn RouteEnumerator> {
    match strategy {
        EnumerationStrategy::Backtracking => Box::new(BacktrackingEnumerator),
        EnumerationStrategy::ExplicitStack => Box::new(ExplicitStackEnumerator),
    }
}
