use eframe::egui::{self, Align2, FontId, Pos2, Sense, Stroke, Ui, vec2};

use super::super::render_utils::{
    ARROW_LENGTH, arrow_head, label_opacity, link_color, node_color, node_radius,
    segment_maybe_visible, with_opacity,
};
use super::super::theme::Palette;
use super::interaction::{hovered_index, visible_indices};
use super::{GraphEvent, GraphView};

const LABEL_FONT_SIZE: f32 = 10.0;
const LINK_WIDTH: f32 = 1.0;

impl GraphView {
    /// Steps the engine for this frame and paints links, nodes, then labels.
    pub(in crate::app) fn draw_graph(&mut self, ui: &mut Ui, palette: &Palette) -> Option<GraphEvent> {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        let painter = ui.painter_at(rect);
        painter.rect_filled(rect, 0.0, palette.background);

        if self.torn_down {
            return None;
        }

        self.handle_zoom(ui, rect, &response);
        self.handle_pan(&response);

        let (now, frame_delta_seconds) = ui.input(|input| (input.time, input.stable_dt));
        let frame_delta_seconds = frame_delta_seconds.clamp(1.0 / 240.0, 1.0 / 20.0);
        let animating = self.advance(now, frame_delta_seconds);

        let zoom = self.camera.zoom();
        let screen_positions = (0..self.model.nodes.len())
            .map(|index| {
                self.layout
                    .position(index)
                    .map(|world| self.camera.world_to_screen(rect, world))
            })
            .collect::<Vec<Option<Pos2>>>();
        let screen_radii = self
            .model
            .nodes
            .iter()
            .map(|node| node_radius(node.normalized_connectivity) * zoom)
            .collect::<Vec<_>>();
        let visible = visible_indices(rect, &screen_positions, &screen_radii);

        let pointer = ui.input(|input| input.pointer.hover_pos()).filter(|_| response.hovered());
        let hovered = hovered_index(pointer, &visible, &screen_positions, &screen_radii);
        self.set_hovered(hovered);
        if animating || self.transition.is_scheduled() {
            ui.ctx().request_repaint();
        }
        if hovered.is_some() {
            ui.output_mut(|output| output.cursor_icon = egui::CursorIcon::PointingHand);
        }

        let level = self.transition_level();
        let link_width = (LINK_WIDTH * zoom.sqrt()).clamp(0.5, 2.5);
        let arrow_length = ARROW_LENGTH * zoom;
        for (edge_index, edge) in self.model.edges.iter().enumerate() {
            let (Some(start), Some(end)) = (screen_positions[edge.source], screen_positions[edge.target])
            else {
                continue;
            };
            if !segment_maybe_visible(rect, start, end) {
                continue;
            }
            let color = link_color(palette, &self.highlight, edge_index, level);
            match arrow_head(start, end, screen_radii[edge.target], arrow_length) {
                Some((triangle, shaft_end)) => {
                    painter.line_segment([start, shaft_end], Stroke::new(link_width, color));
                    painter.add(egui::Shape::convex_polygon(
                        triangle.to_vec(),
                        color,
                        Stroke::NONE,
                    ));
                }
                None => {
                    painter.line_segment([start, end], Stroke::new(link_width, color));
                }
            }
        }

        for &index in &visible {
            let Some(position) = screen_positions[index] else {
                continue;
            };
            let color = node_color(palette, &self.highlight, index, level);
            painter.circle_filled(position, screen_radii[index], color);
        }

        for &index in &visible {
            let Some(position) = screen_positions[index] else {
                continue;
            };
            let Some(opacity) =
                label_opacity(&self.highlight, index, zoom, self.tuning.label_zoom, level)
            else {
                continue;
            };
            painter.text(
                position + vec2(0.0, screen_radii[index] + 2.0),
                Align2::CENTER_TOP,
                &self.model.nodes[index].id,
                FontId::proportional(LABEL_FONT_SIZE),
                with_opacity(palette.foreground, opacity),
            );
        }

        if let Some(index) = self.highlight().hovered() {
            let caption = format!(
                "{}  |  {} neighbors  |  {} links",
                self.model.nodes[index].id,
                self.highlight().nodes().len().saturating_sub(1),
                self.highlight().edges().len()
            );
            painter.text(
                rect.left_top() + vec2(10.0, 10.0),
                Align2::LEFT_TOP,
                caption,
                FontId::proportional(13.0),
                palette.foreground,
            );
        }

        if !response.clicked_by(egui::PointerButton::Primary) {
            return None;
        }

        match hovered {
            Some(index) => {
                self.focus_on_click(index, now);
                Some(GraphEvent::Selected(Some(self.model.nodes[index].id.clone())))
            }
            None => Some(GraphEvent::Selected(None)),
        }
    }
}
