use std::collections::HashSet;

use super::graph::GraphModel;

/// Hover neighborhood. Both sets are empty whenever nothing is hovered.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(in crate::app) struct HighlightState {
    hovered: Option<usize>,
    nodes: HashSet<usize>,
    edges: HashSet<usize>,
}

impl HighlightState {
    /// Full recomputation with a single scan over the edge list.
    pub(in crate::app) fn on_hover(model: &GraphModel, hovered: Option<usize>) -> Self {
        let Some(hovered) = hovered.filter(|&index| index < model.nodes.len()) else {
            return Self::default();
        };

        let mut nodes = HashSet::from([hovered]);
        let mut edges = HashSet::new();
        for (edge_index, edge) in model.edges.iter().enumerate() {
            if edge.touches(hovered) {
                edges.insert(edge_index);
                nodes.insert(edge.source);
                nodes.insert(edge.target);
            }
        }

        Self {
            hovered: Some(hovered),
            nodes,
            edges,
        }
    }

    pub(in crate::app) fn hovered(&self) -> Option<usize> {
        self.hovered
    }

    pub(in crate::app) fn nodes(&self) -> &HashSet<usize> {
        &self.nodes
    }

    pub(in crate::app) fn edges(&self) -> &HashSet<usize> {
        &self.edges
    }

    pub(in crate::app) fn is_active(&self) -> bool {
        self.hovered.is_some()
    }

    pub(in crate::app) fn contains_node(&self, index: usize) -> bool {
        self.nodes.contains(&index)
    }

    pub(in crate::app) fn contains_edge(&self, edge_index: usize) -> bool {
        self.edges.contains(&edge_index)
    }
}
