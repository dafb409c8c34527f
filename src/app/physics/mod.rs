mod forces;
mod quadtree;

use eframe::egui::{Vec2, vec2};

use super::graph::GraphModel;
use forces::Repulsion;
use quadtree::QuadTree;

const BARNES_HUT_THETA: f32 = 0.72;
const SEED_RADIUS: f32 = 10.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub(in crate::app) struct LayoutConfig {
    pub(in crate::app) repulsion: f32,
    pub(in crate::app) link_distance: f32,
    pub(in crate::app) link_strength: f32,
    pub(in crate::app) center_pull: f32,
    pub(in crate::app) velocity_decay: f32,
    pub(in crate::app) alpha_decay: f32,
    pub(in crate::app) alpha_min: f32,
    pub(in crate::app) cooldown_ticks: usize,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            repulsion: 6_000.0,
            link_distance: 60.0,
            link_strength: 0.1,
            center_pull: 0.01,
            velocity_decay: 0.4,
            alpha_decay: 0.05,
            alpha_min: 0.001,
            cooldown_ticks: 100,
        }
    }
}

struct PhysicsScratch {
    forces: Vec<Vec2>,
    positions: Vec<Vec2>,
}

/// Force-directed layout. The only writer of node positions; everything
/// else reads them through [`Layout::position`].
pub(in crate::app) struct Layout {
    positions: Vec<Option<Vec2>>,
    velocities: Vec<Vec2>,
    alpha: f32,
    ticks: usize,
    running: bool,
    config: LayoutConfig,
    scratch: PhysicsScratch,
}

fn seed_position(index: usize) -> Vec2 {
    let golden_angle = std::f32::consts::PI * (3.0 - 5.0_f32.sqrt());
    let radius = SEED_RADIUS * (0.5 + index as f32).sqrt();
    let angle = index as f32 * golden_angle;
    vec2(angle.cos(), angle.sin()) * radius
}

impl Layout {
    pub(in crate::app) fn new(node_count: usize, config: LayoutConfig) -> Self {
        Self {
            positions: vec![None; node_count],
            velocities: vec![Vec2::ZERO; node_count],
            alpha: 1.0,
            ticks: 0,
            running: node_count > 0,
            config,
            scratch: PhysicsScratch {
                forces: Vec::new(),
                positions: Vec::new(),
            },
        }
    }

    pub(in crate::app) fn position(&self, index: usize) -> Option<Vec2> {
        self.positions.get(index).copied().flatten()
    }

    pub(in crate::app) fn is_running(&self) -> bool {
        self.running
    }

    pub(in crate::app) fn ticks(&self) -> usize {
        self.ticks
    }

    pub(in crate::app) fn alpha(&self) -> f32 {
        self.alpha
    }

    pub(in crate::app) fn stop(&mut self) {
        self.running = false;
    }

    pub(in crate::app) fn reheat(&mut self) {
        if self.positions.is_empty() {
            return;
        }
        self.alpha = 1.0;
        self.ticks = 0;
        self.running = true;
    }

    fn seed_unpositioned(&mut self) {
        for (index, position) in self.positions.iter_mut().enumerate() {
            if position.is_none() {
                *position = Some(seed_position(index));
            }
        }
    }

    /// One simulation tick. Returns whether any node moved.
    pub(in crate::app) fn step(&mut self, model: &GraphModel, delta_seconds: f32) -> bool {
        if !self.running {
            return false;
        }

        let node_count = self.positions.len().min(model.nodes.len());
        self.seed_unpositioned();

        self.alpha += (0.0 - self.alpha) * self.config.alpha_decay;
        let time_step_scale = (delta_seconds * 60.0).clamp(0.25, 3.0);
        let alpha = self.alpha;
        let config = self.config;

        let scratch = &mut self.scratch;
        scratch.forces.clear();
        scratch.forces.resize(node_count, Vec2::ZERO);
        scratch.positions.clear();
        scratch
            .positions
            .extend(self.positions.iter().take(node_count).map(|p| p.unwrap_or(Vec2::ZERO)));
        let forces = &mut scratch.forces;
        let positions = &scratch.positions;

        if node_count > 1
            && let Some(tree) = QuadTree::build(positions)
        {
            let repulsion = Repulsion {
                strength: config.repulsion,
                softening: 25.0,
                theta: BARNES_HUT_THETA,
            };
            for (index, force) in forces.iter_mut().enumerate() {
                repulsion.accumulate(&tree, index, positions, force);
            }
        }

        for edge in &model.edges {
            let (from, to) = (edge.source, edge.target);
            if from >= node_count || to >= node_count || from == to {
                continue;
            }

            let delta = positions[to] - positions[from];
            let distance = delta.length();
            if distance <= 1e-4 {
                continue;
            }
            let pull = delta / distance * ((distance - config.link_distance) * config.link_strength);
            forces[from] += pull;
            forces[to] -= pull;
        }

        for (force, position) in forces.iter_mut().zip(positions) {
            *force -= *position * config.center_pull;
        }

        let damping = (1.0 - config.velocity_decay).clamp(0.0, 1.0);
        let mut any_motion = false;
        for index in 0..node_count {
            let velocity = (self.velocities[index] + forces[index] * (alpha * time_step_scale)) * damping;
            self.velocities[index] = velocity;
            if velocity.length_sq() > 1e-6 {
                any_motion = true;
            }
            if let Some(position) = self.positions[index].as_mut() {
                *position += velocity;
            }
        }

        self.ticks += 1;
        if self.ticks >= config.cooldown_ticks || self.alpha < config.alpha_min {
            self.running = false;
        }
        any_motion
    }
}
