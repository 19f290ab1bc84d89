//! Dependency-first ordering.
//!
//! # Algorithm
//!
//! 1. Loops are rejected up front (see [`super::cycles`]).
//! 2. Every node with indegree 0, taken in first-discovery order, starts a
//!    depth-first walk unless an earlier walk already reached it.
//! 3. Walking `v` marks it seen and walks each unseen dependency of `v` in
//!    edge order before the next one.
//! 4. After its dependencies, `v` is appended to the order.
//!
//! A chain `a → b → c` yields `[c, b, a]`; every header lands after all of
//! its dependencies. The relative order of independent siblings follows edge
//! insertion order and is otherwise unspecified.
//!
//! The walk keeps its own stack, so include depth is not bounded by the
//! thread stack.

use std::collections::HashSet;

use petgraph::graph::NodeIndex;
use tracing::{instrument, trace};

use super::{GraphError, IncludeGraph};

struct Walk {
    node: NodeIndex,
    deps: Vec<NodeIndex>,
    next: usize,
}

impl IncludeGraph {
    /// Order every header so that dependencies precede dependents.
    ///
    /// The vertex labelled `root` (the synthetic root source) is walked like
    /// any other node but left out of the result.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::Cycle`] listing every include loop when the graph
    /// is not acyclic.
    #[instrument(skip(self), fields(nodes = self.node_count()))]
    pub fn order(&self, root: &str) -> Result<Vec<String>, GraphError> {
        if self.is_cyclic() {
            return Err(GraphError::Cycle {
                members: self.cycles(),
            });
        }

        let mut seen: HashSet<NodeIndex> = HashSet::with_capacity(self.node_count());
        let mut order: Vec<NodeIndex> = Vec::with_capacity(self.node_count());

        for start in self.graph.node_indices() {
            if self.indegree(start) == 0 && !seen.contains(&start) {
                self.walk(start, &mut seen, &mut order);
            }
        }

        Ok(order
            .into_iter()
            .filter_map(|idx| self.label(idx))
            .filter(|label| *label != root)
            .map(str::to_string)
            .collect())
    }

    fn walk(&self, start: NodeIndex, seen: &mut HashSet<NodeIndex>, order: &mut Vec<NodeIndex>) {
        seen.insert(start);
        let mut stack = vec![Walk {
            node: start,
            deps: self.dependency_indices(start),
            next: 0,
        }];

        while let Some(top) = stack.last_mut() {
            let Some(&dep) = top.deps.get(top.next) else {
                trace!(header = ?self.label(top.node), "emit");
                order.push(top.node);
                stack.pop();
                continue;
            };
            top.next += 1;

            if seen.insert(dep) {
                stack.push(Walk {
                    node: dep,
                    deps: self.dependency_indices(dep),
                    next: 0,
                });
            }
        }
    }
}
