use eframe::egui::{self, Pos2, Rect, Ui};

use super::super::render_utils::circle_visible;
use super::GraphView;

impl GraphView {
    /// Wheel zoom about the pointer. Cancels any running camera tween.
    pub(in crate::app) fn handle_zoom(&mut self, ui: &Ui, rect: Rect, response: &egui::Response) {
        if self.torn_down || !response.hovered() {
            return;
        }

        let scroll = ui.input(|input| input.raw_scroll_delta.y);
        if scroll.abs() <= f32::EPSILON {
            return;
        }

        let pointer = ui
            .input(|input| input.pointer.hover_pos())
            .unwrap_or_else(|| rect.center());
        let zoom_factor = (1.0 + (scroll * 0.0018)).clamp(0.85, 1.15);
        self.camera.zoom_about(rect, pointer, zoom_factor);
    }

    pub(in crate::app) fn handle_pan(&mut self, response: &egui::Response) {
        if self.torn_down {
            return;
        }
        if response.dragged_by(egui::PointerButton::Secondary)
            || response.dragged_by(egui::PointerButton::Middle)
        {
            self.camera.pan_by_screen(response.drag_delta());
        }
    }

    pub(in crate::app) fn reheat_layout(&mut self) {
        if !self.torn_down {
            self.layout.reheat();
        }
    }
}

pub(super) fn visible_indices(rect: Rect, screen_positions: &[Option<Pos2>], screen_radii: &[f32]) -> Vec<usize> {
    screen_positions
        .iter()
        .zip(screen_radii)
        .enumerate()
        .filter_map(|(index, (position, radius))| {
            position
                .filter(|position| circle_visible(rect, *position, *radius))
                .map(|_| index)
        })
        .collect()
}

/// Closest node whose disc contains `pointer`.
pub(super) fn hovered_index(
    pointer: Option<Pos2>,
    visible_indices: &[usize],
    screen_positions: &[Option<Pos2>],
    screen_radii: &[f32],
) -> Option<usize> {
    let pointer = pointer?;
    visible_indices
        .iter()
        .filter_map(|&index| {
            let distance = screen_positions[index]?.distance(pointer);
            (distance <= screen_radii[index]).then_some((index, distance))
        })
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(index, _)| index)
}
