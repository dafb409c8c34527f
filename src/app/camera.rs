use eframe::egui::{Pos2, Rect, Vec2};

pub(in crate::app) const MIN_ZOOM: f32 = 0.05;
pub(in crate::app) const MAX_ZOOM: f32 = 12.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub(in crate::app) struct FocusStyle {
    pub(in crate::app) zoom: f32,
    pub(in crate::app) duration_secs: f64,
}

#[derive(Clone, Copy, Debug)]
struct Tween<T> {
    from: T,
    to: T,
    start: f64,
    duration: f64,
}

fn ease_out_quad(t: f32) -> f32 {
    t * (2.0 - t)
}

impl<T> Tween<T>
where
    T: Copy + std::ops::Add<Output = T> + std::ops::Sub<Output = T> + std::ops::Mul<f32, Output = T>,
{
    fn progress(&self, now: f64) -> f32 {
        if self.duration <= 0.0 {
            return 1.0;
        }
        ((now - self.start) / self.duration).clamp(0.0, 1.0) as f32
    }

    fn sample(&self, now: f64) -> (T, bool) {
        let t = self.progress(now);
        let value = self.from + (self.to - self.from) * ease_out_quad(t);
        (value, t >= 1.0)
    }
}

/// World-space camera: `center` is the world point drawn at the middle of
/// the viewport. Pan and zoom tweens run independently of each other.
#[derive(Clone, Debug)]
pub(in crate::app) struct Camera {
    center: Vec2,
    zoom: f32,
    pan_tween: Option<Tween<Vec2>>,
    zoom_tween: Option<Tween<f32>>,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            center: Vec2::ZERO,
            zoom: 1.0,
            pan_tween: None,
            zoom_tween: None,
        }
    }
}

impl Camera {
    pub(in crate::app) fn center(&self) -> Vec2 {
        self.center
    }

    pub(in crate::app) fn zoom(&self) -> f32 {
        self.zoom
    }

    pub(in crate::app) fn is_animating(&self) -> bool {
        self.pan_tween.is_some() || self.zoom_tween.is_some()
    }

    /// Starts an animated pan to `target` and zoom to `style.zoom`.
    /// Without a target position nothing changes and `false` is returned.
    pub(in crate::app) fn focus(&mut self, target: Option<Vec2>, style: FocusStyle, now: f64) -> bool {
        let Some(target) = target.filter(|target| target.x.is_finite() && target.y.is_finite())
        else {
            return false;
        };

        self.pan_tween = Some(Tween {
            from: self.center,
            to: target,
            start: now,
            duration: style.duration_secs,
        });
        self.zoom_tween = Some(Tween {
            from: self.zoom,
            to: style.zoom.clamp(MIN_ZOOM, MAX_ZOOM),
            start: now,
            duration: style.duration_secs,
        });
        true
    }

    /// Applies running tweens at time `now`; returns whether any is still running.
    pub(in crate::app) fn advance(&mut self, now: f64) -> bool {
        if let Some(tween) = self.pan_tween {
            let (center, finished) = tween.sample(now);
            self.center = center;
            if finished {
                self.pan_tween = None;
            }
        }

        if let Some(tween) = self.zoom_tween {
            let (zoom, finished) = tween.sample(now);
            self.zoom = zoom;
            if finished {
                self.zoom_tween = None;
            }
        }

        self.is_animating()
    }

    pub(in crate::app) fn cancel_tweens(&mut self) {
        self.pan_tween = None;
        self.zoom_tween = None;
    }

    pub(in crate::app) fn pan_by_screen(&mut self, delta: Vec2) {
        self.cancel_tweens();
        self.center -= delta / self.zoom;
    }

    /// Zooms by `factor`, keeping the world point under `anchor` fixed.
    pub(in crate::app) fn zoom_about(&mut self, rect: Rect, anchor: Pos2, factor: f32) {
        self.cancel_tweens();
        let world_before = self.screen_to_world(rect, anchor);
        self.zoom = (self.zoom * factor).clamp(MIN_ZOOM, MAX_ZOOM);
        self.center = world_before - (anchor - rect.center()) / self.zoom;
    }

    pub(in crate::app) fn world_to_screen(&self, rect: Rect, world: Vec2) -> Pos2 {
        rect.center() + (world - self.center) * self.zoom
    }

    pub(in crate::app) fn screen_to_world(&self, rect: Rect, screen: Pos2) -> Vec2 {
        self.center + (screen - rect.center()) / self.zoom
    }
}

#[cfg(test)]
mod tests {
    use eframe::egui::{pos2, vec2};

    use super::*;

    const STYLE: FocusStyle = FocusStyle {
        zoom: 2.0,
        duration_secs: 1.0,
    };

    #[test]
    fn focus_without_position_is_a_no_op() {
        let mut camera = Camera::default();
        assert!(!camera.focus(None, STYLE, 0.0));
        assert!(!camera.is_animating());
        assert_eq!(camera.center(), Vec2::ZERO);
        assert_eq!(camera.zoom(), 1.0);
    }

    #[test]
    fn non_finite_position_is_ignored() {
        let mut camera = Camera::default();
        assert!(!camera.focus(Some(vec2(f32::NAN, 0.0)), STYLE, 0.0));
        assert!(!camera.is_animating());
    }

    #[test]
    fn pan_and_zoom_run_together_and_finish() {
        let mut camera = Camera::default();
        assert!(camera.focus(Some(vec2(100.0, -50.0)), STYLE, 10.0));

        assert!(camera.advance(10.5));
        let halfway = camera.center();
        assert!(halfway.x > 0.0 && halfway.x < 100.0);
        assert!(camera.zoom() > 1.0 && camera.zoom() < 2.0);

        assert!(!camera.advance(11.0));
        assert_eq!(camera.center(), vec2(100.0, -50.0));
        assert_eq!(camera.zoom(), 2.0);
    }

    #[test]
    fn tween_never_overshoots() {
        let mut camera = Camera::default();
        camera.focus(Some(vec2(10.0, 0.0)), STYLE, 0.0);
        let mut previous = 0.0;
        for step in 0..=20 {
            camera.advance(step as f64 * 0.05);
            assert!(camera.center().x >= previous);
            assert!(camera.center().x <= 10.0);
            previous = camera.center().x;
        }
    }

    #[test]
    fn manual_input_cancels_tweens() {
        let mut camera = Camera::default();
        camera.focus(Some(vec2(10.0, 0.0)), STYLE, 0.0);
        camera.pan_by_screen(vec2(4.0, 0.0));
        assert!(!camera.is_animating());
        assert_eq!(camera.center(), vec2(-4.0, 0.0));
    }

    #[test]
    fn zoom_about_keeps_anchor_fixed() {
        let rect = Rect::from_min_size(Pos2::ZERO, vec2(800.0, 600.0));
        let anchor = pos2(600.0, 200.0);
        let mut camera = Camera::default();
        let before = camera.screen_to_world(rect, anchor);
        camera.zoom_about(rect, anchor, 1.5);
        let after = camera.screen_to_world(rect, anchor);
        assert!((before - after).length() < 1e-3);
        assert_eq!(camera.zoom(), 1.5);
    }

    #[test]
    fn screen_and_world_round_trip() {
        let rect = Rect::from_min_size(Pos2::ZERO, vec2(400.0, 400.0));
        let mut camera = Camera::default();
        camera.focus(Some(vec2(20.0, 30.0)), FocusStyle { zoom: 3.0, duration_secs: 0.0 }, 0.0);
        camera.advance(0.0);
        let screen = camera.world_to_screen(rect, vec2(20.0, 30.0));
        assert_eq!(screen, rect.center());
    }
}
