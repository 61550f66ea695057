//! Dependency graph and topological ordering for referencing elements.
//!
//! When an element's value contains `{{ other }}`, `other` must be final
//! before the element is substituted. This module provides the graph and a
//! topological sort so the resolver can substitute referencing elements in
//! the correct order, including multi-hop chains, and reject cycles.
//!
//! # Example
//!
//! ```
//! use elicit_core::dependency::DependencyGraph;
//!
//! let mut graph = DependencyGraph::new();
//! graph.add_node("filename");
//! graph.add_node("title");
//! graph.add_edge("filename", "title");
//!
//! let order = graph.topological_sort().unwrap();
//! assert_eq!(order, vec!["title", "filename"]);
//! ```

use std::collections::{BTreeSet, HashMap};

use crate::error::{Error, Result};

/// Directed graph of references between element keys.
///
/// Edges point from dependent to dependency: if A references B, the edge is
/// `A -> B`. Topological sort returns keys in dependency-first order (B
/// before A). Ties are broken by insertion order.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    /// Keys in insertion order.
    nodes: Vec<String>,
    index: HashMap<String, usize>,
    /// Adjacency list: key depends on each value.
    edges: HashMap<usize, BTreeSet<usize>>,
}

impl DependencyGraph {
    /// Create an empty dependency graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the graph for referencing elements.
    ///
    /// `pending` lists each referencing key with the keys it references.
    /// References to other pending keys become edges; references to keys
    /// that are already final need no ordering. `is_known` tells whether a
    /// key exists at all.
    ///
    /// # Errors
    ///
    /// Returns `Error::DanglingReference` for a reference to an unknown key.
    pub fn from_references<F>(pending: &[(String, Vec<String>)], is_known: F) -> Result<Self>
    where
        F: Fn(&str) -> bool,
    {
        let mut graph = Self::new();
        for (key, _) in pending {
            graph.add_node(key);
        }

        for (key, references) in pending {
            for reference in references {
                if graph.contains(reference) {
                    graph.add_edge(key, reference);
                } else if !is_known(reference) {
                    return Err(Error::DanglingReference {
                        key: key.clone(),
                        reference: reference.clone(),
                    });
                }
            }
        }

        Ok(graph)
    }

    /// Add a node. Adding an existing key is a no-op.
    pub fn add_node(&mut self, id: impl Into<String>) {
        let id = id.into();
        if self.index.contains_key(&id) {
            return;
        }
        let idx = self.nodes.len();
        self.index.insert(id.clone(), idx);
        self.nodes.push(id);
        self.edges.entry(idx).or_default();
    }

    /// Declare that `from` depends on `to`, adding missing nodes.
    pub fn add_edge(&mut self, from: &str, to: &str) {
        self.add_node(from);
        self.add_node(to);
        let (from, to) = (self.index[from], self.index[to]);
        self.edges.entry(from).or_default().insert(to);
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Perform a topological sort using Kahn's algorithm.
    ///
    /// Returns keys in dependency-first order: if A depends on B, B appears
    /// before A in the result. Among keys that are ready at the same time,
    /// the one inserted first comes first.
    ///
    /// # Errors
    ///
    /// Returns `Error::CyclicReference` if the graph contains a cycle
    /// (including a key that references itself).
    pub fn topological_sort(&self) -> Result<Vec<String>> {
        // Number of unresolved dependencies per node
        let mut remaining: Vec<usize> = (0..self.nodes.len())
            .map(|idx| self.edges.get(&idx).map_or(0, BTreeSet::len))
            .collect();

        // Reverse adjacency: dependency -> dependents
        let mut dependents: HashMap<usize, Vec<usize>> = HashMap::new();
        for (&from, deps) in &self.edges {
            for &to in deps {
                dependents.entry(to).or_default().push(from);
            }
        }

        let mut ready: BTreeSet<usize> = remaining
            .iter()
            .enumerate()
            .filter(|&(_, &count)| count == 0)
            .map(|(idx, _)| idx)
            .collect();

        let mut result = Vec::with_capacity(self.nodes.len());

        while let Some(current) = ready.pop_first() {
            result.push(self.nodes[current].clone());

            for &dependent in dependents.get(&current).into_iter().flatten() {
                remaining[dependent] -= 1;
                if remaining[dependent] == 0 {
                    ready.insert(dependent);
                }
            }
        }

        if result.len() != self.nodes.len() {
            // Everything not emitted is in, or behind, a cycle
            let participants = remaining
                .iter()
                .enumerate()
                .filter(|&(_, &count)| count > 0)
                .map(|(idx, _)| self.nodes[idx].clone())
                .collect();
            return Err(Error::CyclicReference { participants });
        }

        Ok(result)
    }
}
