use eframe::egui::{Color32, Pos2, Rect, vec2};

use super::highlight::HighlightState;
use super::theme::Palette;

pub(super) const NODE_RADIUS_BASE: f32 = 3.0;
pub(super) const NODE_RADIUS_EXTRA: f32 = 5.0;
const RESTING_LABEL_OPACITY: f32 = 0.6;
pub(super) const ARROW_LENGTH: f32 = 3.5;

/// Linear RGB(A) interpolation; `amount` is clamped to [0, 1].
pub(super) fn lerp_color(from: Color32, to: Color32, amount: f32) -> Color32 {
    let amount = amount.clamp(0.0, 1.0);
    let channel = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * amount).round() as u8;

    Color32::from_rgba_unmultiplied(
        channel(from.r(), to.r()),
        channel(from.g(), to.g()),
        channel(from.b(), to.b()),
        channel(from.a(), to.a()),
    )
}

pub(super) fn with_opacity(color: Color32, opacity: f32) -> Color32 {
    let alpha = (opacity.clamp(0.0, 1.0) * 255.0).round() as u8;
    Color32::from_rgba_unmultiplied(color.r(), color.g(), color.b(), alpha)
}

/// World-space radius; sqrt keeps a few hubs from dwarfing everything else.
pub(super) fn node_radius(normalized_connectivity: f32) -> f32 {
    NODE_RADIUS_BASE + NODE_RADIUS_EXTRA * normalized_connectivity.clamp(0.0, 1.0).sqrt()
}

pub(super) fn node_target_color(palette: &Palette, highlight: &HighlightState, index: usize) -> Color32 {
    match highlight.hovered() {
        None => palette.muted_foreground,
        Some(hovered) if hovered == index => palette.primary,
        Some(_) if highlight.contains_node(index) => palette.muted_foreground,
        Some(_) => palette.border,
    }
}

pub(super) fn node_color(palette: &Palette, highlight: &HighlightState, index: usize, level: f32) -> Color32 {
    lerp_color(
        palette.muted_foreground,
        node_target_color(palette, highlight, index),
        level,
    )
}

pub(super) fn link_color(palette: &Palette, highlight: &HighlightState, edge_index: usize, level: f32) -> Color32 {
    let target = if !highlight.is_active() {
        palette.border
    } else if highlight.contains_edge(edge_index) {
        palette.primary
    } else {
        palette.background
    };
    lerp_color(palette.border, target, level)
}

/// Label opacity for a node, or `None` when its label is hidden.
pub(super) fn label_opacity(
    highlight: &HighlightState,
    index: usize,
    zoom: f32,
    label_zoom: f32,
    level: f32,
) -> Option<f32> {
    let is_hovered = highlight.hovered() == Some(index);
    let is_neighbor = highlight.contains_node(index);

    let visible = if zoom >= label_zoom {
        !highlight.is_active() || is_hovered || is_neighbor
    } else {
        is_hovered
    };

    if !visible {
        return None;
    }
    Some(if is_hovered || is_neighbor {
        level
    } else {
        RESTING_LABEL_OPACITY
    })
}

pub(super) fn circle_visible(rect: Rect, position: Pos2, radius: f32) -> bool {
    rect.expand(radius).contains(position)
}

pub(super) fn segment_maybe_visible(rect: Rect, start: Pos2, end: Pos2) -> bool {
    Rect::from_two_pos(start, end).expand(1.0).intersects(rect)
}

/// Arrowhead touching the target disc: `(triangle, shaft_end)`, where the
/// shaft should stop at `shaft_end` so it does not poke through the tip.
/// `None` when the link is too short to carry one, which covers self-loops.
pub(super) fn arrow_head(start: Pos2, end: Pos2, target_radius: f32, length: f32) -> Option<([Pos2; 3], Pos2)> {
    let delta = end - start;
    let distance = delta.length();
    if !distance.is_finite() || distance <= target_radius + length {
        return None;
    }

    let unit = delta / distance;
    let tip = end - unit * target_radius;
    let back = tip - unit * length;
    let wing = vec2(-unit.y, unit.x) * length * 0.5;
    Some(([tip, back + wing, back - wing], back))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::app::graph::tests::chain_model;

    const PALETTE: Palette = Palette::DARK;

    #[test]
    fn lerp_endpoints_and_midpoint() {
        let black = Color32::from_rgb(0, 0, 0);
        let white = Color32::from_rgb(255, 255, 255);
        assert_eq!(lerp_color(black, white, 0.0), black);
        assert_eq!(lerp_color(black, white, 1.0), white);
        assert_eq!(lerp_color(black, white, 0.5), Color32::from_rgb(128, 128, 128));
        assert_eq!(lerp_color(black, white, 7.0), white);
        assert_eq!(lerp_color(black, white, -1.0), black);
    }

    #[test]
    fn lerp_moves_each_channel_independently() {
        let from = Color32::from_rgb(0x9c, 0xa3, 0xaf);
        let to = Color32::from_rgb(0x07, 0xb7, 0xd6);
        let mid = lerp_color(from, to, 0.25);
        assert_eq!(mid, Color32::from_rgb(0x77, 0xa8, 0xb9));
    }

    #[test]
    fn radius_grows_with_sqrt_of_connectivity() {
        assert_eq!(node_radius(0.0), 3.0);
        assert_eq!(node_radius(1.0), 8.0);
        assert_eq!(node_radius(0.25), 5.5);
        assert_eq!(node_radius(4.0), 8.0);
    }

    #[test]
    fn without_hover_every_node_uses_default_color() {
        let highlight = HighlightState::default();
        for index in 0..3 {
            assert_eq!(node_color(&PALETTE, &highlight, index, 1.0), PALETTE.muted_foreground);
        }
        assert_eq!(link_color(&PALETTE, &highlight, 0, 1.0), PALETTE.border);
    }

    #[test]
    fn hover_targets_highlight_neighbors_and_dims_rest() {
        let model = chain_model();
        let highlight = HighlightState::on_hover(&model, Some(0));

        assert_eq!(node_target_color(&PALETTE, &highlight, 0), PALETTE.primary);
        assert_eq!(node_target_color(&PALETTE, &highlight, 1), PALETTE.muted_foreground);
        assert_eq!(node_target_color(&PALETTE, &highlight, 2), PALETTE.border);

        assert_eq!(link_color(&PALETTE, &highlight, 0, 1.0), PALETTE.primary);
        assert_eq!(link_color(&PALETTE, &highlight, 1, 1.0), PALETTE.background);
    }

    #[test]
    fn colors_fade_with_transition_level() {
        let model = chain_model();
        let highlight = HighlightState::on_hover(&model, Some(0));
        assert_eq!(node_color(&PALETTE, &highlight, 0, 0.0), PALETTE.muted_foreground);
        assert_eq!(
            node_color(&PALETTE, &highlight, 2, 0.5),
            lerp_color(PALETTE.muted_foreground, PALETTE.border, 0.5)
        );
    }

    #[test]
    fn labels_follow_zoom_and_hover_policy() {
        let model = chain_model();
        let idle = HighlightState::default();
        let hovering_a = HighlightState::on_hover(&model, Some(0));

        assert_eq!(label_opacity(&idle, 2, 2.5, 2.0, 0.0), Some(0.6));
        assert_eq!(label_opacity(&idle, 2, 1.0, 2.0, 0.0), None);

        assert_eq!(label_opacity(&hovering_a, 0, 2.5, 2.0, 0.8), Some(0.8));
        assert_eq!(label_opacity(&hovering_a, 1, 2.5, 2.0, 0.8), Some(0.8));
        assert_eq!(label_opacity(&hovering_a, 2, 2.5, 2.0, 0.8), None);

        assert_eq!(label_opacity(&hovering_a, 0, 1.0, 2.0, 0.8), Some(0.8));
        assert_eq!(label_opacity(&hovering_a, 1, 1.0, 2.0, 0.8), None);
    }

    #[test]
    fn arrow_sits_on_target_rim() {
        let (triangle, shaft_end) =
            arrow_head(Pos2::new(0.0, 0.0), Pos2::new(100.0, 0.0), 5.0, 4.0).unwrap();
        assert_eq!(
            triangle,
            [Pos2::new(95.0, 0.0), Pos2::new(91.0, 2.0), Pos2::new(91.0, -2.0)]
        );
        assert_eq!(shaft_end, Pos2::new(91.0, 0.0));

        let (triangle, _) = arrow_head(Pos2::new(0.0, 0.0), Pos2::new(0.0, -50.0), 0.0, 2.0).unwrap();
        assert_eq!(triangle[0], Pos2::new(0.0, -50.0));
        assert_eq!(triangle[1], Pos2::new(1.0, -48.0));
    }

    #[test]
    fn short_links_and_self_loops_get_no_arrow() {
        let origin = Pos2::new(10.0, 10.0);
        assert_eq!(arrow_head(origin, origin, 3.0, ARROW_LENGTH), None);
        assert_eq!(arrow_head(origin, Pos2::new(15.0, 10.0), 3.0, ARROW_LENGTH), None);
        assert!(arrow_head(origin, Pos2::new(17.0, 10.0), 3.0, ARROW_LENGTH).is_some());
    }

    #[test]
    fn culling_keeps_partially_visible_shapes() {
        let rect = Rect::from_min_max(Pos2::new(0.0, 0.0), Pos2::new(100.0, 100.0));
        assert!(circle_visible(rect, Pos2::new(-3.0, 50.0), 5.0));
        assert!(!circle_visible(rect, Pos2::new(-30.0, 50.0), 5.0));
        assert!(segment_maybe_visible(rect, Pos2::new(-50.0, 50.0), Pos2::new(150.0, 50.0)));
        assert!(!segment_maybe_visible(rect, Pos2::new(-50.0, -50.0), Pos2::new(-10.0, -5.0)));
    }
}
