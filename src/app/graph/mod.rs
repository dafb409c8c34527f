use std::collections::HashMap;

use tracing::debug;

use crate::project::NodePayload;

use super::camera::{Camera, FocusStyle};
use super::focus::FocusRequest;
use super::highlight::HighlightState;
use super::physics::{Layout, LayoutConfig};
use super::transition::Transition;

mod build;
mod interaction;
mod view;

pub(in crate::app) struct ModelNode {
    pub(in crate::app) id: String,
    pub(in crate::app) aliases: Vec<String>,
    pub(in crate::app) payload: NodePayload,
    pub(in crate::app) connectivity: usize,
    pub(in crate::app) normalized_connectivity: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(in crate::app) struct Edge {
    pub(in crate::app) source: usize,
    pub(in crate::app) target: usize,
}

impl Edge {
    pub(in crate::app) fn touches(self, index: usize) -> bool {
        self.source == index || self.target == index
    }
}

/// Node arena built once per loaded document. Never mutated afterwards;
/// positions live in [`Layout`].
pub(in crate::app) struct GraphModel {
    pub(in crate::app) nodes: Vec<ModelNode>,
    pub(in crate::app) edges: Vec<Edge>,
    pub(in crate::app) index_by_id: HashMap<String, usize>,
    pub(in crate::app) dangling_references: usize,
}

impl GraphModel {
    pub(in crate::app) fn index_of(&self, id: &str) -> Option<usize> {
        self.index_by_id.get(id).copied()
    }

    pub(in crate::app) fn contains(&self, id: &str) -> bool {
        self.index_by_id.contains_key(id)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewTuning {
    pub click_zoom: f32,
    pub click_duration_ms: u32,
    pub focus_zoom: f32,
    pub focus_duration_ms: u32,
    pub label_zoom: f32,
}

impl Default for ViewTuning {
    fn default() -> Self {
        Self {
            click_zoom: 2.0,
            click_duration_ms: 1000,
            focus_zoom: 5.0,
            focus_duration_ms: 400,
            label_zoom: 2.0,
        }
    }
}

impl ViewTuning {
    fn click_style(&self) -> FocusStyle {
        FocusStyle {
            zoom: self.click_zoom,
            duration_secs: self.click_duration_ms as f64 / 1000.0,
        }
    }

    fn request_style(&self) -> FocusStyle {
        FocusStyle {
            zoom: self.focus_zoom,
            duration_secs: self.focus_duration_ms as f64 / 1000.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(in crate::app) enum GraphEvent {
    Selected(Option<String>),
}

/// Interaction engine for one loaded graph: layout, hover highlight,
/// fade transition, and camera. Dropping it tears everything down.
pub(in crate::app) struct GraphView {
    model: GraphModel,
    layout: Layout,
    highlight: HighlightState,
    transition: Transition,
    camera: Camera,
    pending_focus: Option<FocusRequest>,
    tuning: ViewTuning,
    torn_down: bool,
}

impl GraphView {
    pub(in crate::app) fn new(model: GraphModel, tuning: ViewTuning) -> Self {
        let layout = Layout::new(model.nodes.len(), LayoutConfig::default());
        Self {
            model,
            layout,
            highlight: HighlightState::default(),
            transition: Transition::default(),
            camera: Camera::default(),
            pending_focus: None,
            tuning,
            torn_down: false,
        }
    }

    pub(in crate::app) fn model(&self) -> &GraphModel {
        &self.model
    }

    pub(in crate::app) fn layout(&self) -> &Layout {
        &self.layout
    }

    pub(in crate::app) fn highlight(&self) -> &HighlightState {
        &self.highlight
    }

    pub(in crate::app) fn transition_level(&self) -> f32 {
        self.transition.level()
    }

    pub(in crate::app) fn camera(&self) -> &Camera {
        &self.camera
    }

    pub(in crate::app) fn tuning(&self) -> &ViewTuning {
        &self.tuning
    }

    pub(in crate::app) fn has_pending_focus(&self) -> bool {
        self.pending_focus.is_some()
    }

    /// Recomputes the highlight synchronously and retargets the fade.
    pub(in crate::app) fn set_hovered(&mut self, hovered: Option<usize>) {
        if self.torn_down || self.highlight.hovered() == hovered {
            return;
        }

        self.highlight = HighlightState::on_hover(&self.model, hovered);
        self.transition.set_active(self.highlight.hovered().is_some());
    }

    pub(in crate::app) fn focus_on_click(&mut self, index: usize, now: f64) -> bool {
        if self.torn_down {
            return false;
        }
        let position = self.layout.position(index);
        self.camera
            .focus(position, self.tuning.click_style(), now)
    }

    /// Queues an external focus request; it is issued on the next frame
    /// where the node has a position.
    pub(in crate::app) fn request_focus(&mut self, request: FocusRequest) {
        if self.torn_down {
            return;
        }
        self.pending_focus = Some(request);
    }

    pub(in crate::app) fn issue_pending_focus(&mut self, now: f64) {
        let Some(request) = self.pending_focus.take() else {
            return;
        };

        let Some(index) = self.model.index_of(request.node_id()) else {
            debug!(node = request.node_id(), "dropping focus request for unknown node");
            return;
        };

        let position = self.layout.position(index);
        if self
            .camera
            .focus(position, self.tuning.request_style(), now)
        {
            debug!(node = request.node_id(), "focus issued");
            request.complete();
        } else {
            self.pending_focus = Some(request);
        }
    }

    /// Advances the layout, the fade, pending focus and camera tweens.
    /// Returns whether another frame should be scheduled.
    pub(in crate::app) fn advance(&mut self, now: f64, delta_seconds: f32) -> bool {
        if self.torn_down {
            return false;
        }

        let was_running = self.layout.is_running();
        self.layout.step(&self.model, delta_seconds);
        if was_running && !self.layout.is_running() {
            debug!(ticks = self.layout.ticks(), "layout settled");
        }

        let fading = self.transition.tick();
        self.issue_pending_focus(now);
        let camera_moving = self.camera.advance(now);

        self.layout.is_running() || fading || camera_moving || self.pending_focus.is_some()
    }

    pub(in crate::app) fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.torn_down = true;
        self.transition.cancel();
        self.layout.stop();
        self.camera.cancel_tweens();
        self.pending_focus = None;
        self.highlight = HighlightState::default();
        debug!(nodes = self.model.nodes.len(), "graph view torn down");
    }
}

impl Drop for GraphView {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
pub(in crate::app) mod tests {
    use std::sync::mpsc;

    use eframe::egui::{Vec2, vec2};

    use super::*;
    use crate::project::GraphDocument;

    pub(in crate::app) fn model_from(json: &str) -> GraphModel {
        GraphModel::build(&GraphDocument::from_json_str(json).unwrap())
    }

    pub(in crate::app) fn chain_model() -> GraphModel {
        model_from(
            r#"{"nodes": [
                {"id": "A", "outbound_links": ["B"]},
                {"id": "B", "outbound_links": ["C"]},
                {"id": "C", "outbound_links": []}
            ]}"#,
        )
    }

    fn settle(view: &mut GraphView) {
        let mut now = 0.0;
        while view.layout.is_running() {
            now += 1.0 / 60.0;
            view.advance(now, 1.0 / 60.0);
        }
    }

    #[test]
    fn hover_fades_in_and_unhover_fades_out() {
        let mut view = GraphView::new(chain_model(), ViewTuning::default());
        view.set_hovered(Some(1));
        assert_eq!(view.highlight().nodes().len(), 3);

        for frame in 0..200 {
            view.advance(frame as f64 / 60.0, 1.0 / 60.0);
        }
        assert_eq!(view.transition_level(), 1.0);

        view.set_hovered(None);
        assert!(view.highlight().nodes().is_empty());
        for frame in 200..400 {
            view.advance(frame as f64 / 60.0, 1.0 / 60.0);
        }
        assert_eq!(view.transition_level(), 0.0);
    }

    #[test]
    fn frames_keep_coming_until_layout_cools_down() {
        let solo = model_from(r#"{"nodes": [{"id": "Solo"}]}"#);
        let mut view = GraphView::new(solo, ViewTuning::default());
        let mut now = 0.0;
        let mut frames = 0;
        while view.advance(now, 1.0 / 60.0) {
            now += 1.0 / 60.0;
            frames += 1;
            assert!(frames < 1_000);
        }
        assert!(!view.layout().is_running());
        assert_eq!(view.layout().ticks(), LayoutConfig::default().cooldown_ticks);
    }

    #[test]
    fn external_focus_waits_for_positions_then_acknowledges_once() {
        let mut view = GraphView::new(chain_model(), ViewTuning::default());
        let (tx, rx) = mpsc::channel();
        view.request_focus(FocusRequest::new("C").on_issued(move |id| {
            let _ = tx.send(id.to_owned());
        }));

        view.issue_pending_focus(0.0);
        assert!(view.has_pending_focus());
        assert!(rx.try_recv().is_err());
        assert_eq!(view.camera().zoom(), 1.0);

        view.advance(0.016, 0.016);
        assert!(!view.has_pending_focus());
        assert_eq!(rx.try_recv().unwrap(), "C");
        assert!(rx.try_recv().is_err());
        let target = view.layout().position(2).unwrap();

        view.advance(10.0, 0.016);
        assert_eq!(view.camera().zoom(), ViewTuning::default().focus_zoom);
        assert!((view.camera().center() - target).length() < 0.001);
    }

    #[test]
    fn focus_on_unknown_node_is_dropped_without_ack() {
        let mut view = GraphView::new(chain_model(), ViewTuning::default());
        let (tx, rx) = mpsc::channel::<String>();
        view.request_focus(FocusRequest::new("Z").on_issued(move |id| {
            let _ = tx.send(id.to_owned());
        }));
        view.advance(0.016, 0.016);
        assert!(!view.has_pending_focus());
        assert!(rx.try_recv().is_err());
        assert_eq!(view.camera().center(), vec2(0.0, 0.0));
    }

    #[test]
    fn click_focus_on_unpositioned_node_leaves_camera_alone() {
        let mut view = GraphView::new(chain_model(), ViewTuning::default());
        assert!(!view.focus_on_click(0, 0.0));
        assert_eq!(view.camera().zoom(), 1.0);
        assert_eq!(view.camera().center(), Vec2::ZERO);
    }

    #[test]
    fn click_focus_uses_click_tuning() {
        let mut view = GraphView::new(chain_model(), ViewTuning::default());
        settle(&mut view);
        assert!(view.focus_on_click(2, 100.0));
        view.advance(200.0, 0.016);
        assert_eq!(view.camera().zoom(), ViewTuning::default().click_zoom);
    }

    #[test]
    fn teardown_stops_everything_and_drops_pending_focus() {
        let mut view = GraphView::new(chain_model(), ViewTuning::default());
        let (tx, rx) = mpsc::channel::<String>();
        view.set_hovered(Some(0));
        view.request_focus(FocusRequest::new("A").on_issued(move |id| {
            let _ = tx.send(id.to_owned());
        }));

        view.teardown();
        assert!(!view.advance(1.0, 0.016));
        assert!(!view.layout().is_running());
        assert!(!view.has_pending_focus());
        assert!(view.highlight().hovered().is_none());

        view.set_hovered(Some(1));
        assert!(view.highlight().hovered().is_none());
        drop(view);
        assert!(rx.try_recv().is_err());
    }
}
