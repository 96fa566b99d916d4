//! Annotation Graph - in-memory view of the reference graph
//!
//! Built from an [`Annotations`] aggregate for read-only traversal by the
//! cycle check and the connectivity computation.

use std::collections::{BTreeSet, HashMap};
use crate::annotation::Annotations;

/// Reference graph over annotation ids.
///
/// Nodes are kept ordered so every traversal is deterministic. Edges may
/// point at ids that are not nodes; the referential check reports those.
#[derive(Debug, Default)]
pub struct AnnotationGraph<'a> {
    /// All annotation ids
    nodes: BTreeSet<&'a str>,
    /// Outgoing references, in the order they were written
    edges_from: HashMap<&'a str, Vec<&'a str>>,
    /// Number of incoming references per id
    in_degree: HashMap<&'a str, usize>,
    text_nodes: usize,
    code_nodes: usize,
}

impl<'a> AnnotationGraph<'a> {
    /// Create a new empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the graph of an annotation set
    pub fn from_annotations(annotations: &'a Annotations) -> Self {
        let mut graph = Self::new();
        for annotation in &annotations.text_annotations {
            graph.add_node(&annotation.id);
            graph.text_nodes += 1;
        }
        for annotation in &annotations.code_annotations {
            graph.add_node(&annotation.id);
            graph.code_nodes += 1;
        }
        for (from, to) in annotations.edges() {
            graph.add_edge(from, to);
        }
        graph
    }

    /// Add a node
    pub fn add_node(&mut self, id: &'a str) {
        self.nodes.insert(id);
    }

    /// Add a directed reference edge
    pub fn add_edge(&mut self, from: &'a str, to: &'a str) {
        self.edges_from.entry(from).or_default().push(to);
        *self.in_degree.entry(to).or_default() += 1;
    }

    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains(id)
    }

    /// Get the outgoing references of a node
    pub fn references(&self, id: &str) -> &[&'a str] {
        self.edges_from.get(id).map(|v| v.as_slice()).unwrap_or(&[])
    }

    /// Get the number of incoming references of a node
    pub fn in_degree(&self, id: &str) -> usize {
        self.in_degree.get(id).copied().unwrap_or(0)
    }

    /// Nodes nobody references, in id order
    pub fn roots(&self) -> Vec<&'a str> {
        self.nodes
            .iter()
            .copied()
            .filter(|id| self.in_degree(id) == 0)
            .collect()
    }

    /// Get all nodes in id order
    pub fn nodes(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.nodes.iter().copied()
    }

    /// Every node reachable from `start` through one or more references.
    ///
    /// `start` itself is only included when it lies on a cycle.
    pub fn descendants(&self, start: &str) -> BTreeSet<&'a str> {
        let mut found = BTreeSet::new();
        let mut stack: Vec<&'a str> = self.references(start).to_vec();

        while let Some(current) = stack.pop() {
            if !self.contains(current) || !found.insert(current) {
                continue;
            }
            stack.extend(self.references(current).iter().copied());
        }

        found
    }

    /// Roots plus everything reachable from them
    pub fn reachable_from_roots(&self) -> BTreeSet<&'a str> {
        let mut reached = BTreeSet::new();
        for root in self.roots() {
            reached.insert(root);
            reached.extend(self.descendants(root));
        }
        reached
    }

    /// Get statistics about the graph
    pub fn stats(&self) -> GraphStats {
        GraphStats {
            text_annotations: self.text_nodes,
            code_annotations: self.code_nodes,
            references: self.edges_from.values().map(|v| v.len()).sum(),
            roots: self.roots().len(),
        }
    }
}

/// Statistics about an annotation graph
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphStats {
    pub text_annotations: usize,
    pub code_annotations: usize,
    pub references: usize,
    pub roots: usize,
}

impl std::fmt::Display for GraphStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Annotation Graph Statistics:")?;
        writeln!(f, "  Text annotations: {}", self.text_annotations)?;
        writeln!(f, "  Code annotations: {}", self.code_annotations)?;
        writeln!(f, "  References: {}", self.references)?;
        writeln!(f, "  Roots: {}", self.roots)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::{CodeAnnotation, TextAnnotation};

    fn text(id: &str, refs: &[&str]) -> TextAnnotation {
        TextAnnotation::new(id, id, "", refs.iter().map(|r| r.to_string()).collect())
    }

    #[test]
    fn test_roots_and_in_degree() {
        let annotations = Annotations::new(
            vec![text("root", &["mid"]), text("mid", &["leaf", "leaf"]), text("leaf", &[])],
            vec![CodeAnnotation::new("orphan-src", "Orphan", "int x;", "a.cpp", 0)],
        );
        let graph = AnnotationGraph::from_annotations(&annotations);

        assert_eq!(graph.roots(), vec!["orphan-src", "root"]);
        assert_eq!(graph.in_degree("leaf"), 2);
        assert_eq!(graph.references("mid"), &["leaf", "leaf"]);
    }

    #[test]
    fn test_descendants() {
        let annotations = Annotations::new(
            vec![text("a", &["b"]), text("b", &["c"]), text("c", &[]), text("d", &[])],
            vec![],
        );
        let graph = AnnotationGraph::from_annotations(&annotations);

        assert_eq!(graph.descendants("a").into_iter().collect::<Vec<_>>(), vec!["b", "c"]);
        assert!(graph.descendants("d").is_empty());
    }

    #[test]
    fn test_descendants_ignore_unknown_targets() {
        let annotations = Annotations::new(vec![text("a", &["ghost"])], vec![]);
        let graph = AnnotationGraph::from_annotations(&annotations);

        assert!(graph.descendants("a").is_empty());
    }

    #[test]
    fn test_stats() {
        let annotations = Annotations::new(
            vec![text("a", &["x"])],
            vec![CodeAnnotation::new("x", "X", "int x;", "a.cpp", 0)],
        );
        let stats = AnnotationGraph::from_annotations(&annotations).stats();

        assert_eq!(
            stats,
            GraphStats { text_annotations: 1, code_annotations: 1, references: 1, roots: 1 }
        );
    }
}
