//! Reference cycle detection
//!
//! Depth-first search from every root, carrying the current path. Nodes
//! that no root reaches are searched afterwards so cycles hanging off no
//! root are still found.

use super::{Check, IntegrityError};
use crate::annotation::Annotations;
use crate::graph::AnnotationGraph;
use std::collections::HashSet;

/// The reference graph is acyclic and has at least one root
pub struct CycleCheck;

impl Check for CycleCheck {
    fn name(&self) -> &str {
        "cycles"
    }

    fn check(&self, annotations: &Annotations) -> Result<(), IntegrityError> {
        let graph = AnnotationGraph::from_annotations(annotations);
        let mut search = CycleSearch::new(&graph);

        let roots = graph.roots();
        if roots.is_empty() {
            // Without roots every node has a referrer, so any non-empty
            // graph holds a cycle; name one.
            let cycle = graph
                .nodes()
                .find_map(|id| search.from(id).err())
                .unwrap_or_default();
            return Err(IntegrityError::NoRoots { cycle });
        }

        for root in roots {
            search.from(root).map_err(|path| IntegrityError::Cycle { path })?;
        }
        for id in graph.nodes() {
            search.from(id).map_err(|path| IntegrityError::Cycle { path })?;
        }

        Ok(())
    }
}

struct CycleSearch<'g, 'a> {
    graph: &'g AnnotationGraph<'a>,
    /// Nodes whose descendants are known to be acyclic
    finished: HashSet<&'a str>,
}

impl<'g, 'a> CycleSearch<'g, 'a> {
    fn new(graph: &'g AnnotationGraph<'a>) -> Self {
        Self {
            graph,
            finished: HashSet::new(),
        }
    }

    /// Search from `start`; a cycle comes back as the full traversal path
    /// ending with the repeated node.
    fn from(&mut self, start: &'a str) -> Result<(), Vec<String>> {
        let mut path = Vec::new();
        self.visit(start, &mut path)
    }

    fn visit(&mut self, current: &'a str, path: &mut Vec<&'a str>) -> Result<(), Vec<String>> {
        if path.contains(&current) {
            return Err(path
                .iter()
                .chain(std::iter::once(&current))
                .map(|id| id.to_string())
                .collect());
        }
        if self.finished.contains(current) || !self.graph.contains(current) {
            return Ok(());
        }

        let graph = self.graph;
        path.push(current);
        for &next in graph.references(current) {
            self.visit(next, path)?;
        }
        path.pop();

        self.finished.insert(current);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::{CodeAnnotation, TextAnnotation};

    fn text(id: &str, refs: &[&str]) -> TextAnnotation {
        TextAnnotation::new(id, id, "body", refs.iter().map(|r| r.to_string()).collect())
    }

    fn run(text_annotations: Vec<TextAnnotation>) -> Result<(), IntegrityError> {
        CycleCheck.check(&Annotations::new(text_annotations, vec![]))
    }

    fn path(ids: &[&str]) -> Vec<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_acyclic_chain_passes() {
        assert_eq!(run(vec![text("a", &["b"]), text("b", &["c"]), text("c", &[])]), Ok(()));
    }

    #[test]
    fn test_diamond_passes() {
        assert_eq!(
            run(vec![
                text("top", &["left", "right"]),
                text("left", &["bottom"]),
                text("right", &["bottom"]),
                text("bottom", &[]),
            ]),
            Ok(())
        );
    }

    #[test]
    fn test_cycle_without_roots() {
        let err = run(vec![text("a", &["b"]), text("b", &["c"]), text("c", &["a"])]).unwrap_err();
        assert_eq!(err, IntegrityError::NoRoots { cycle: path(&["a", "b", "c", "a"]) });
        assert!(err.to_string().contains("a > b > c > a"));
    }

    #[test]
    fn test_cycle_below_a_root() {
        let err = run(vec![
            text("root", &["a"]),
            text("a", &["b"]),
            text("b", &["a"]),
        ])
        .unwrap_err();
        assert_eq!(err, IntegrityError::Cycle { path: path(&["root", "a", "b", "a"]) });
    }

    #[test]
    fn test_cycle_unreachable_from_roots() {
        let err = run(vec![
            text("root", &[]),
            text("x", &["y"]),
            text("y", &["x"]),
        ])
        .unwrap_err();
        assert_eq!(err, IntegrityError::Cycle { path: path(&["x", "y", "x"]) });
    }

    #[test]
    fn test_self_reference() {
        let err = run(vec![text("root", &["me"]), text("me", &["me"])]).unwrap_err();
        assert_eq!(err, IntegrityError::Cycle { path: path(&["root", "me", "me"]) });
    }

    #[test]
    fn test_empty_set_has_no_roots() {
        assert_eq!(run(vec![]), Err(IntegrityError::NoRoots { cycle: vec![] }));
    }

    #[test]
    fn test_unreferenced_code_annotation_is_a_root() {
        let annotations = Annotations::new(
            vec![text("a", &["b"]), text("b", &["a"])],
            vec![CodeAnnotation::new("lonely-src", "Lonely", "int x;", "a.cpp", 0)],
        );
        assert_eq!(
            CycleCheck.check(&annotations),
            Err(IntegrityError::Cycle { path: path(&["a", "b", "a"]) })
        );
    }
}
