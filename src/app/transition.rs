const SETTLE_EPSILON: f32 = 0.01;
const APPROACH_RATE: f32 = 0.1;

/// Per-frame fade between "nothing hovered" (0) and "something hovered" (1).
///
/// The host schedules a frame whenever [`Transition::is_scheduled`] is true
/// and calls [`Transition::tick`] once per frame. [`Transition::cancel`] is the
/// teardown handle: after it, ticks are no-ops and nothing is rescheduled.
#[derive(Clone, Debug, Default)]
pub(in crate::app) struct Transition {
    level: f32,
    target: f32,
    scheduled: bool,
    cancelled: bool,
}

impl Transition {
    pub(in crate::app) fn level(&self) -> f32 {
        self.level
    }

    pub(in crate::app) fn is_scheduled(&self) -> bool {
        self.scheduled
    }

    pub(in crate::app) fn set_active(&mut self, active: bool) {
        if self.cancelled {
            return;
        }
        self.target = if active { 1.0 } else { 0.0 };
        self.scheduled = self.level != self.target;
    }

    /// Returns whether another tick is wanted.
    pub(in crate::app) fn tick(&mut self) -> bool {
        if self.cancelled || !self.scheduled {
            return false;
        }

        let delta = self.target - self.level;
        if delta.abs() < SETTLE_EPSILON {
            self.level = self.target;
            self.scheduled = false;
        } else {
            self.level = (self.level + delta * APPROACH_RATE).clamp(0.0, 1.0);
        }
        self.scheduled
    }

    pub(in crate::app) fn cancel(&mut self) {
        self.cancelled = true;
        self.scheduled = false;
    }
}
