use std::collections::BTreeSet;

use eframe::egui::{self, RichText, Ui};

use crate::project::{NoteSegment, split_references};

use super::super::graph::GraphModel;
use super::super::{NoteContent, ViewModel};

struct Neighbors {
    links_to: BTreeSet<String>,
    linked_from: BTreeSet<String>,
}

fn neighbors_of(model: &GraphModel, index: usize) -> Neighbors {
    let mut neighbors = Neighbors {
        links_to: BTreeSet::new(),
        linked_from: BTreeSet::new(),
    };
    for edge in &model.edges {
        if edge.source == index && edge.target != index {
            neighbors.links_to.insert(model.nodes[edge.target].id.clone());
        } else if edge.target == index && edge.source != index {
            neighbors.linked_from.insert(model.nodes[edge.source].id.clone());
        }
    }
    neighbors
}

fn neighbor_list(ui: &mut Ui, title: &str, ids: &BTreeSet<String>, clicked: &mut Option<String>) {
    ui.label(RichText::new(format!("{title} ({})", ids.len())).strong());
    if ids.is_empty() {
        ui.weak("none");
        return;
    }
    ui.horizontal_wrapped(|ui| {
        for id in ids {
            if ui.link(id.as_str()).clicked() {
                *clicked = Some(id.clone());
            }
        }
    });
}

impl ViewModel {
    pub(in crate::app) fn draw_details(&mut self, ui: &mut Ui) {
        ui.heading("Concept");
        ui.add_space(6.0);

        let Some(selected_id) = self.selected.clone() else {
            ui.label("Select a concept in the graph or search for one.");
            return;
        };

        let model = self.graph.model();
        let Some(index) = model.index_of(&selected_id) else {
            ui.label("Selected concept is not part of this project.");
            return;
        };
        let node = &model.nodes[index];
        let mut clicked = None;

        ui.label(RichText::new(node.id.as_str()).strong().size(16.0));
        if !node.aliases.is_empty() {
            ui.small(format!("also: {}", node.aliases.join(", ")));
        }
        ui.add_space(4.0);
        if let Some(description) = &node.payload.description {
            ui.label(description.as_str());
        }
        ui.label(format!("Connections: {}", node.connectivity));

        if let Some(metadata) = &node.payload.metadata
            && let Ok(pretty) = serde_json::to_string_pretty(metadata)
        {
            egui::CollapsingHeader::new("Metadata")
                .id_salt("node_metadata")
                .show(ui, |ui| ui.monospace(pretty));
        }

        ui.separator();
        let neighbors = neighbors_of(model, index);
        neighbor_list(ui, "Links to", &neighbors.links_to, &mut clicked);
        ui.add_space(4.0);
        neighbor_list(ui, "Linked from", &neighbors.linked_from, &mut clicked);

        ui.separator();
        ui.label(RichText::new("Notes").strong());
        egui::ScrollArea::vertical()
            .id_salt("note_scroll")
            .auto_shrink([false, false])
            .show(ui, |ui| match &self.note {
                NoteContent::Idle => {}
                NoteContent::Loading => {
                    ui.spinner();
                }
                NoteContent::Unavailable(error) => {
                    ui.weak(format!("No note available: {error}"));
                }
                NoteContent::Loaded(text) => {
                    ui.horizontal_wrapped(|ui| {
                        ui.spacing_mut().item_spacing.x = 0.0;
                        for segment in split_references(text) {
                            match segment {
                                NoteSegment::Text(text) => {
                                    ui.label(text);
                                }
                                NoteSegment::Reference(target) if model.contains(target) => {
                                    if ui.link(target).clicked() {
                                        clicked = Some(target.to_owned());
                                    }
                                }
                                NoteSegment::Reference(target) => {
                                    ui.label(format!("[[{target}]]"))
                                        .on_hover_text("Not a concept in this project.");
                                }
                            }
                        }
                    });
                }
            });

        if let Some(node_id) = clicked {
            let ctx = ui.ctx().clone();
            self.select_and_focus(&ctx, &node_id);
        }
    }
}
