//! Include loop reporting.
//!
//! The extractor's visited guard keeps loops out of extracted edge lists, so
//! a cycle only reaches the graph through a hand-built edge list. When it
//! does, [`crate::graph::IncludeGraph::order`] reports the loops found here.

#![allow(clippy::module_name_repetitions)]

use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};

use super::IncludeGraph;

/// Find all cycles currently present in `graph`.
///
/// Each entry is a sorted list of header paths in one strongly connected
/// component (SCC). Self-loops are reported as a one-element cycle.
#[must_use]
pub fn find_all_cycles(graph: &DiGraph<String, ()>) -> Vec<Vec<String>> {
    let mut cycles: Vec<Vec<String>> = tarjan_scc(graph)
        .into_iter()
        .filter(|component| {
            component.len() > 1 || component.first().is_some_and(|node| has_self_loop(graph, *node))
        })
        .map(|component| {
            let mut ids: Vec<String> = component.into_iter().map(|idx| node_label(graph, idx)).collect();
            ids.sort_unstable();
            ids
        })
        .collect();

    cycles.sort_unstable();
    cycles
}

impl IncludeGraph {
    /// All include loops, sorted.
    #[must_use]
    pub fn cycles(&self) -> Vec<Vec<String>> {
        find_all_cycles(&self.graph)
    }

    /// True when at least one include loop exists.
    #[must_use]
    pub fn is_cyclic(&self) -> bool {
        petgraph::algo::toposort(&self.graph, None).is_err()
    }
}

fn has_self_loop(graph: &DiGraph<String, ()>, node: NodeIndex) -> bool {
    graph.find_edge(node, node).is_some()
}

fn node_label(graph: &DiGraph<String, ()>, idx: NodeIndex) -> String {
    graph
        .node_weight(idx)
        .cloned()
        .unwrap_or_else(|| format!("#{}", idx.index()))
}
