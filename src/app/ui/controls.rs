use eframe::egui::{self, Key, Modifiers, RichText, Ui};

use super::super::ViewModel;

impl ViewModel {
    pub(in crate::app) fn draw_controls(&mut self, ui: &mut Ui) {
        ui.heading("Explore");
        ui.separator();
        ui.add_space(4.0);

        ui.label("Search concepts")
            .on_hover_text("Fuzzy match over concept ids and aliases.");

        let search_id = ui.make_persistent_id("concept_search");
        if ui.memory(|memory| memory.has_focus(search_id)) && self.search.is_open() {
            let (down, up) = ui.input_mut(|input| {
                (
                    input.consume_key(Modifiers::NONE, Key::ArrowDown),
                    input.consume_key(Modifiers::NONE, Key::ArrowUp),
                )
            });
            if down {
                self.search.move_next();
            }
            if up {
                self.search.move_previous();
            }
        }

        let response = ui.add(
            egui::TextEdit::singleline(&mut self.search.query)
                .id(search_id)
                .hint_text("e.g. derivative"),
        );
        if response.changed() {
            self.search.refresh(self.graph.model());
        }
        if response.gained_focus() {
            self.search.reopen();
        }

        let mut chosen = None;
        if response.lost_focus() {
            let (enter, escape) =
                ui.input(|input| (input.key_pressed(Key::Enter), input.key_pressed(Key::Escape)));
            if enter {
                chosen = self.search.confirm();
            } else if escape {
                self.search.dismiss();
            }
        }

        if self.search.is_open() {
            let mut hovered_row = None;
            let mut clicked_row = None;

            if self.search.results().is_empty() {
                ui.weak("No matching concepts.");
            }
            for (index, hit) in self.search.results().iter().enumerate() {
                let label = if hit.aliases.is_empty() {
                    hit.id.clone()
                } else {
                    format!("{}  ({})", hit.id, hit.aliases.join(", "))
                };
                let row = ui.selectable_label(self.search.cursor() == Some(index), label);
                if row.hovered() {
                    hovered_row = Some(index);
                }
                if row.clicked() {
                    clicked_row = Some(index);
                }
            }

            if let Some(index) = hovered_row {
                self.search.hover(index);
            }
            if let Some(index) = clicked_row {
                chosen = self.search.choose(index);
            }
        }

        if !self.search.query.is_empty() && ui.small_button("Clear").clicked() {
            self.search.clear();
        }

        if let Some(node_id) = chosen {
            let ctx = ui.ctx().clone();
            self.select_and_focus(&ctx, &node_id);
        }

        ui.separator();
        ui.label(RichText::new("Layout").strong());
        let layout = self.graph.layout();
        if layout.is_running() {
            ui.label(format!(
                "Simulating, tick {} (alpha {:.3})",
                layout.ticks(),
                layout.alpha()
            ));
        } else {
            ui.label(format!("Settled after {} ticks", layout.ticks()));
        }
        if ui
            .button("Reheat")
            .on_hover_text("Restart the force simulation from the current positions.")
            .clicked()
        {
            self.graph.reheat_layout();
        }

        ui.separator();
        ui.label(RichText::new("View").strong());
        let tuning = *self.graph.tuning();
        let camera = self.graph.camera();
        ui.label(format!(
            "Zoom {:.2} at ({:.0}, {:.0})",
            camera.zoom(),
            camera.center().x,
            camera.center().y
        ));
        ui.label(format!("Labels from zoom {:.1}", tuning.label_zoom));
        ui.label(format!(
            "Click focus: zoom {:.1} over {} ms",
            tuning.click_zoom, tuning.click_duration_ms
        ));
        ui.label(format!(
            "Search focus: zoom {:.1} over {} ms",
            tuning.focus_zoom, tuning.focus_duration_ms
        ));
        ui.add_space(4.0);
        ui.weak("Scroll to zoom. Drag with the right or middle button to pan.");
    }
}
