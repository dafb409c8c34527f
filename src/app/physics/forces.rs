use eframe::egui::{Vec2, vec2};

use super::quadtree::{Cell, QuadTree};

#[derive(Clone, Copy, Debug)]
pub(super) struct Repulsion {
    pub(super) strength: f32,
    pub(super) softening: f32,
    pub(super) theta: f32,
}

impl Repulsion {
    fn between(self, point: Vec2, other: Vec2, mass: f32, fallback_seed: usize) -> Vec2 {
        let delta = point - other;
        let distance_sq = delta.length_sq();
        let direction = if distance_sq > 1e-8 {
            delta / distance_sq.sqrt()
        } else {
            let angle = (fallback_seed as f32 * 0.618_034) * std::f32::consts::TAU;
            vec2(angle.cos(), angle.sin())
        };
        direction * (self.strength * mass / (distance_sq + self.softening))
    }

    /// Adds the repulsion felt by `index` from every other node, approximating
    /// distant cells by their centroid.
    pub(super) fn accumulate(self, tree: &QuadTree, index: usize, positions: &[Vec2], force: &mut Vec2) {
        if tree.mass <= 0.0 {
            return;
        }

        let point = positions[index];
        match &tree.cell {
            Cell::Leaf(indices) => {
                for &other in indices {
                    if other != index {
                        *force += self.between(point, positions[other], 1.0, index + other);
                    }
                }
            }
            Cell::Branch(children) => {
                let distance = (point - tree.centroid).length().max(1e-2);
                let far_enough = !tree.bounds.contains(point) && tree.bounds.side() / distance < self.theta;
                if far_enough {
                    *force += self.between(point, tree.centroid, tree.mass, index);
                    return;
                }

                for child in children.iter().flatten() {
                    self.accumulate(child, index, positions, force);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const REPULSION: Repulsion = Repulsion {
        strength: 1000.0,
        softening: 10.0,
        theta: 0.7,
    };

    #[test]
    fn pair_pushes_apart() {
        let positions = vec![vec2(-5.0, 0.0), vec2(5.0, 0.0)];
        let tree = QuadTree::build(&positions).unwrap();

        let mut left = Vec2::ZERO;
        let mut right = Vec2::ZERO;
        REPULSION.accumulate(&tree, 0, &positions, &mut left);
        REPULSION.accumulate(&tree, 1, &positions, &mut right);

        assert!(left.x < 0.0);
        assert!(right.x > 0.0);
        assert!((left + right).length() < 1e-4);
    }

    #[test]
    fn approximation_tracks_exact_sum_for_distant_cluster() {
        let mut positions = vec![vec2(0.0, 0.0)];
        for i in 0..40 {
            positions.push(vec2(1000.0 + (i % 5) as f32, (i / 5) as f32));
        }
        let tree = QuadTree::build(&positions).unwrap();

        let mut approximate = Vec2::ZERO;
        REPULSION.accumulate(&tree, 0, &positions, &mut approximate);

        let exact = positions[1..]
            .iter()
            .fold(Vec2::ZERO, |sum, other| sum + REPULSION.between(positions[0], *other, 1.0, 0));

        assert!((approximate - exact).length() / exact.length() < 0.05);
    }

    #[test]
    fn coincident_points_still_separate() {
        let positions = vec![vec2(1.0, 1.0), vec2(1.0, 1.0)];
        let tree = QuadTree::build(&positions).unwrap();
        let mut force = Vec2::ZERO;
        REPULSION.accumulate(&tree, 0, &positions, &mut force);
        assert!(force.length() > 0.0);
    }
}
