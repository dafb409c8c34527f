use eframe::egui::{self, Align, Context, Layout};
use tracing::info;

use super::super::graph::GraphEvent;
use super::super::theme::ThemeMode;
use super::super::ViewModel;

impl ViewModel {
    pub(in crate::app) fn show(
        &mut self,
        ctx: &Context,
        theme: &mut ThemeMode,
        reload_requested: &mut bool,
        is_loading: bool,
    ) {
        self.sample_frame_rate(ctx);
        self.poll_notes();
        self.poll_focus_acks();

        egui::TopBottomPanel::top("top_bar")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("concept-atlas");
                    ui.separator();
                    ui.label(format!("project: {}", self.project_id));
                    ui.label(format!("nodes: {}", self.graph.model().nodes.len()));
                    ui.label(format!("links: {}", self.graph.model().edges.len()));
                    ui.label(if self.graph.layout().is_running() {
                        "layout: running"
                    } else {
                        "layout: settled"
                    });
                    if let Some(pending) = &self.pending_focus_label {
                        ui.spinner();
                        ui.label(format!("focusing {pending}"));
                    } else if let Some(focused) = &self.last_focused {
                        ui.weak(format!("focused {focused}"));
                    }

                    let reload_button = ui.add_enabled(!is_loading, egui::Button::new("Reload"));
                    if reload_button.clicked() {
                        *reload_requested = true;
                    }
                    if ui
                        .button(format!("Theme: {}", theme.label()))
                        .on_hover_text("Switch between light and dark palettes.")
                        .clicked()
                    {
                        *theme = theme.toggled();
                        ctx.set_visuals(theme.visuals());
                        info!(theme = theme.label(), "theme changed");
                    }

                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        ui.label(self.frame_rate.readout());
                    });
                });
            });

        egui::SidePanel::left("controls")
            .resizable(true)
            .default_width(300.0)
            .show(ctx, |ui| self.draw_controls(ui));

        egui::SidePanel::right("details")
            .resizable(true)
            .default_width(360.0)
            .show(ctx, |ui| self.draw_details(ui));

        let palette = theme.palette();
        let mut event = None;
        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                if is_loading {
                    ui.vertical_centered(|ui| {
                        ui.add_space(120.0);
                        ui.heading(format!("Reloading project {}...", self.project_id));
                        ui.add_space(8.0);
                        ui.spinner();
                    });
                } else {
                    event = self.graph.draw_graph(ui, &palette);
                }
            });

        if let Some(GraphEvent::Selected(selected)) = event {
            self.set_selected(ctx, selected);
        }
    }
}
