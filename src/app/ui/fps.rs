use std::collections::VecDeque;

use eframe::egui::Context;

use super::super::ViewModel;

const WINDOW_FRAMES: usize = 180;
const MAX_RATE: f32 = 1000.0;

/// Rolling frame-rate readout over the last few seconds of frames.
#[derive(Default)]
pub(in crate::app) struct FrameRate {
    rates: VecDeque<f32>,
    latest: f32,
}

impl FrameRate {
    /// Zero or negative deltas (first frame, paused input) are skipped.
    pub(in crate::app) fn record(&mut self, delta_seconds: f32) {
        if delta_seconds <= f32::EPSILON {
            return;
        }
        self.latest = (1.0 / delta_seconds).min(MAX_RATE);
        if self.rates.len() == WINDOW_FRAMES {
            self.rates.pop_front();
        }
        self.rates.push_back(self.latest);
    }

    pub(in crate::app) fn average(&self) -> Option<f32> {
        if self.rates.is_empty() {
            return None;
        }
        Some(self.rates.iter().sum::<f32>() / self.rates.len() as f32)
    }

    pub(in crate::app) fn readout(&self) -> String {
        match self.average() {
            None => "FPS --".to_owned(),
            Some(average) => format!(
                "FPS {:.0} (avg {average:.1}, {:.1} ms)",
                self.latest,
                1000.0 / self.latest
            ),
        }
    }
}

impl ViewModel {
    pub(in crate::app) fn sample_frame_rate(&mut self, ctx: &Context) {
        let delta_seconds = ctx.input(|input| input.stable_dt);
        self.frame_rate.record(delta_seconds);
    }
}
