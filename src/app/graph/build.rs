use std::collections::{HashMap, HashSet};

use crate::project::GraphDocument;

use super::{Edge, GraphModel, ModelNode};

impl GraphModel {
    /// Builds the node arena and derived edge list. Deterministic for a given
    /// document: node order follows the document, edges follow node order
    /// then link order.
    pub(in crate::app) fn build(document: &GraphDocument) -> Self {
        let mut index_by_id = HashMap::with_capacity(document.nodes.len());
        for (index, node) in document.nodes.iter().enumerate() {
            index_by_id.insert(node.id.clone(), index);
        }

        let (edges, dangling_references) = Self::collect_edges(document, &index_by_id);

        let mut connectivity = vec![0usize; document.nodes.len()];
        for edge in &edges {
            connectivity[edge.source] += 1;
            if edge.target != edge.source {
                connectivity[edge.target] += 1;
            }
        }
        let max_connectivity = connectivity.iter().copied().max().unwrap_or(0).max(1);

        let nodes = document
            .nodes
            .iter()
            .zip(connectivity)
            .map(|(node, connectivity)| ModelNode {
                id: node.id.clone(),
                aliases: node.aliases.clone(),
                payload: node.payload.clone(),
                connectivity,
                normalized_connectivity: connectivity as f32 / max_connectivity as f32,
            })
            .collect();

        Self {
            nodes,
            edges,
            index_by_id,
            dangling_references,
        }
    }

    fn collect_edges(
        document: &GraphDocument,
        index_by_id: &HashMap<String, usize>,
    ) -> (Vec<Edge>, usize) {
        let mut edges = Vec::new();
        let mut emitted = HashSet::new();
        let mut dangling = 0usize;

        for (source, node) in document.nodes.iter().enumerate() {
            for target_id in &node.outbound_links {
                let Some(&target) = index_by_id.get(target_id) else {
                    dangling += 1;
                    continue;
                };
                let edge = Edge { source, target };
                emitted.insert(edge);
                edges.push(edge);
            }
        }

        // Inbound lists only contribute edges the outbound pass missed.
        for (target, node) in document.nodes.iter().enumerate() {
            for source_id in &node.inbound_links {
                let Some(&source) = index_by_id.get(source_id) else {
                    dangling += 1;
                    continue;
                };
                let edge = Edge { source, target };
                if emitted.insert(edge) {
                    edges.push(edge);
                }
            }
        }

        (edges, dangling)
    }
}
