//! Connectivity grouping
//!
//! Two annotations are connected when they lie on a common path that starts
//! at a root. For an upper node reachable from a root, that is exactly every
//! node below it, so the relation is built from root-reachable nodes and
//! their descendants. Every node is connected to itself.
//!
//! The relation only drives visual grouping; no check depends on it.

use crate::graph::AnnotationGraph;
use std::collections::{BTreeMap, BTreeSet};

/// Connected ids per node, including the node itself
pub fn connectivity<'a>(graph: &AnnotationGraph<'a>) -> BTreeMap<&'a str, BTreeSet<&'a str>> {
    let mut connected: BTreeMap<&'a str, BTreeSet<&'a str>> = graph
        .nodes()
        .map(|id| (id, BTreeSet::from([id])))
        .collect();

    for upper in graph.reachable_from_roots() {
        for lower in graph.descendants(upper) {
            connected.entry(upper).or_default().insert(lower);
            connected.entry(lower).or_default().insert(upper);
        }
    }

    connected
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::{Annotations, CodeAnnotation, TextAnnotation};

    fn text(id: &str, refs: &[&str]) -> TextAnnotation {
        TextAnnotation::new(id, id, "body", refs.iter().map(|r| r.to_string()).collect())
    }

    fn set<'a>(ids: &[&'a str]) -> BTreeSet<&'a str> {
        ids.iter().copied().collect()
    }

    #[test]
    fn test_chain_is_mutually_connected() {
        let annotations = Annotations::new(
            vec![text("root", &["mid"]), text("mid", &["leaf"]), text("leaf", &[])],
            vec![],
        );
        let graph = AnnotationGraph::from_annotations(&annotations);
        let connected = connectivity(&graph);

        for id in ["root", "mid", "leaf"] {
            assert_eq!(connected[id], set(&["root", "mid", "leaf"]));
        }
    }

    #[test]
    fn test_isolated_node_is_connected_to_itself() {
        let annotations = Annotations::new(vec![text("root", &["leaf"]), text("leaf", &[]), text("alone", &[])], vec![]);
        let graph = AnnotationGraph::from_annotations(&annotations);

        assert_eq!(connectivity(&graph)["alone"], set(&["alone"]));
    }

    #[test]
    fn test_siblings_are_not_connected_to_each_other() {
        let annotations = Annotations::new(
            vec![text("hub", &["left", "right-src"]), text("left", &[])],
            vec![CodeAnnotation::new("right-src", "Right", "int r;", "r.cpp", 0)],
        );
        let graph = AnnotationGraph::from_annotations(&annotations);
        let connected = connectivity(&graph);

        assert_eq!(connected["hub"], set(&["hub", "left", "right-src"]));
        assert_eq!(connected["left"], set(&["hub", "left"]));
        assert_eq!(connected["right-src"], set(&["hub", "right-src"]));
    }

    #[test]
    fn test_shared_child_links_both_parents_paths() {
        let annotations = Annotations::new(
            vec![
                text("a", &["shared"]),
                text("b", &["shared"]),
                text("shared", &["deep"]),
                text("deep", &[]),
            ],
            vec![],
        );
        let graph = AnnotationGraph::from_annotations(&annotations);
        let connected = connectivity(&graph);

        assert_eq!(connected["deep"], set(&["a", "b", "shared", "deep"]));
        assert_eq!(connected["a"], set(&["a", "shared", "deep"]));
    }
}
