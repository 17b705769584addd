use std::collections::{HashMap, HashSet, VecDeque};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::graph::{Graph, Route};

/// Bounds applied to an exhaustive route enumeration.
///
/// `max_depth` limits the number of edges (borders crossed) per route and
/// `max_routes` caps the number of routes collected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteEnvelope {
    pub max_depth: usize,
    pub max_routes: usize,
}

impl RouteEnvelope {
    pub fn new(max_depth: usize, max_routes: usize) -> Self {
        Self {
            max_depth,
            max_routes,
        }
    }

    /// Whether every route admissible under `other` is also admissible here,
    /// i.e. both bounds are at least as large.
    pub fn dominates(&self, other: &RouteEnvelope) -> bool {
        self.max_depth >= other.max_depth && self.max_routes >= other.max_routes
    }

    /// Keep routes of at most `max_depth` edges, then truncate to `max_routes`.
    pub fn apply<'a, I>(&self, routes: I) -> Vec<Route>
    where
        I: IntoIterator<Item = &'a Route>,
    {
        routes
            .into_iter()
            .filter(|route| hop_count(route.as_slice()) <= self.max_depth)
            .take(self.max_routes)
            .cloned()
            .collect()
    }
}

impl Default for RouteEnvelope {
    fn default() -> Self {
        Self {
            max_depth: 10,
            max_routes: 50,
        }
    }
}

/// Number of edges in a route.
pub fn hop_count<T>(route: &[T]) -> usize {
    route.len().saturating_sub(1)
}

fn ensure_known(graph: &Graph, origin: &str, destination: &str) -> Result<()> {
    for code in [origin, destination] {
        if !graph.contains(code) {
            return Err(Error::UnknownCountry {
                code: code.to_string(),
            });
        }
    }
    Ok(())
}

/// Find the route with the fewest border crossings using breadth-first search.
///
/// Returns `Ok(None)` when both countries exist but no land route connects
/// them, and [`Error::UnknownCountry`] when either code is not a graph key.
pub fn find_route(graph: &Graph, origin: &str, destination: &str) -> Result<Option<Route>> {
    ensure_known(graph, origin, destination)?;

    if origin == destination {
        return Ok(Some(vec![origin.to_string()]));
    }

    let mut parents: HashMap<&str, Option<&str>> = HashMap::new();
    let mut queue = VecDeque::new();

    parents.insert(origin, None);
    queue.push_back(origin);

    while let Some(current) = queue.pop_front() {
        for next in graph.neighbours(current) {
            let next = next.as_str();
            if parents.contains_key(next) {
                continue;
            }

            parents.insert(next, Some(current));
            if next == destination {
                return Ok(Some(reconstruct_path(&parents, origin, destination)));
            }
            queue.push_back(next);
        }
    }

    Ok(None)
}

fn reconstruct_path(parents: &HashMap<&str, Option<&str>>, origin: &str, goal: &str) -> Route {
    let mut path = Vec::new();
    let mut current = Some(goal);
    while let Some(node) = current {
        path.push(node.to_string());
        if node == origin {
            break;
        }
        current = parents.get(node).copied().flatten();
    }
    path.reverse();
    path
}

/// Enumerate simple routes with a recursive depth-first walk.
///
/// A single path buffer and visited set are shared across the traversal;
/// nodes are pushed before descending and popped on the way back.
///
/// Routes are collected in depth-first order following each country's
/// neighbour order. When more routes fit the depth bound than `max_routes`
/// allows, the ones kept are the first in that order, so a different
/// neighbour order can keep a different subset.
pub fn enumerate_routes_backtracking(
    graph: &Graph,
    origin: &str,
    destination: &str,
    envelope: RouteEnvelope,
) -> Result<Vec<Route>> {
    ensure_known(graph, origin, destination)?;

    let mut walk = Backtrack {
        graph,
        destination,
        envelope,
        path: Vec::new(),
        visited: HashSet::new(),
        results: Vec::new(),
    };
    walk.visit(origin);
    Ok(walk.results)
}

struct Backtrack<'g> {
    graph: &'g Graph,
    destination: &'g str,
    envelope: RouteEnvelope,
    path: Vec<&'g str>,
    visited: HashSet<&'g str>,
    results: Vec<Route>,
}

impl<'g> Backtrack<'g> {
    fn visit(&mut self, current: &'g str) {
        if self.results.len() >= self.envelope.max_routes {
            return;
        }

        self.visited.insert(current);
        self.path.push(current);

        if current == self.destination {
            self.results
                .push(self.path.iter().map(|code| code.to_string()).collect());
        } else if self.path.len() <= self.envelope.max_depth {
            let graph = self.graph;
            for next in graph.neighbours(current) {
                if !self.visited.contains(next.as_str()) {
                    self.visit(next);
                }
            }
        }

        self.path.pop();
        self.visited.remove(current);
    }
}

/// Enumerate simple routes with an explicit work stack.
///
/// Every pushed branch owns its own copy of the path and visited set, so no
/// mutable state is shared between branches. Neighbours are pushed in reverse
/// so branches pop in the same order the recursive walk would visit them.
///
/// As with [`enumerate_routes_backtracking`], a `max_routes` cut keeps the
/// first routes in neighbour order, not the shortest ones.
pub fn enumerate_routes_explicit_stack(
    graph: &Graph,
    origin: &str,
    destination: &str,
    envelope: RouteEnvelope,
) -> Result<Vec<Route>> {
    ensure_known(graph, origin, destination)?;

    let mut results = Vec::new();
    let mut stack = vec![Branch {
        node: origin,
        path: vec![origin],
        visited: HashSet::from([origin]),
    }];

    while let Some(branch) = stack.pop() {
        if results.len() >= envelope.max_routes {
            break;
        }

        if branch.node == destination {
            results.push(branch.path.iter().map(|code| code.to_string()).collect());
            continue;
        }

        if hop_count(&branch.path) >= envelope.max_depth {
            continue;
        }

        for next in graph.neighbours(branch.node).iter().rev() {
            let next = next.as_str();
            if branch.visited.contains(next) {
                continue;
            }

            let mut path = branch.path.clone();
            path.push(next);
            let mut visited = branch.visited.clone();
            visited.insert(next);

            stack.push(Branch {
                node: next,
                path,
                visited,
            });
        }
    }

    Ok(results)
}

struct Branch<'g> {
    node: &'g str,
    path: Vec<&'g str>,
    visited: HashSet<&'g str>,
}
