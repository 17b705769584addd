//! Route enumeration strategies.
//!
//! This module provides:
//! - [`EnumerationStrategy`] - Supported ways of enumerating every simple route
//! - [`RouteEnumerator`] - Strategy trait shared by all enumerators
//! - [`select_enumerator`] - Factory returning the enumerator for a strategy
//!
//! # Strategy Pattern
//!
//! Both enumerators honour the same contract: given a graph, two endpoints and
//! a [`RouteEnvelope`](crate::path::RouteEnvelope), return every simple route
//! of at most `max_depth` edges, stopping after `max_routes`. They visit
//! branches in the same order, so even truncated results agree; the recursive
//! form is easier to audit while the explicit stack never grows the call
//! stack on deep searches.
//!
//! That order is the neighbour order of the graph. When `max_routes` is
//! smaller than the number of admissible routes, the routes kept depend on
//! it and are not necessarily the shortest ones.
//!
//! # Example
//!
//! ```ignore
//! use landroute_lib::{select_enumerator, EnumerationStrategy, Graph, RouteEnvelope};
//!
//! let graph: Graph = [("A", vec!["B"]), ("B", vec![])].into_iter().collect();
//! let enumerator = select_enumerator(EnumerationStrategy::ExplicitStack);
//! let routes = enumerator.enumerate(&graph, "A", "B", RouteEnvelope::new(5, 10))?;
//! ```

mod enumerator;

pub use enumerator::{
    select_enumerator, BacktrackingEnumerator, ExplicitStackEnumerator, RouteEnumerator,
};

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Supported enumeration strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum EnumerationStrategy {
    /// Recursive depth-first walk sharing one path buffer.
    #[default]
    Backtracking,
    /// Iterative walk over an explicit stack of independent branches.
    ExplicitStack,
}

impl fmt::Display for EnumerationStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            EnumerationStrategy::Backtracking => "backtracking",
            EnumerationStrategy::ExplicitStack => "explicit-stack",
        };
        f.write_str(value)
    }
}

impl FromStr for EnumerationStrategy {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "backtracking" | "recursive" => Ok(EnumerationStrategy::Backtracking),
            "explicit-stack" | "iterative" => Ok(EnumerationStrategy::ExplicitStack),
            other => Err(format!("unknown enumeration strategy: {other}")),
        }
    }
}
