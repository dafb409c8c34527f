use eframe::egui::{Vec2, vec2};

const LEAF_CAPACITY: usize = 8;
const MAX_DEPTH: usize = 12;

#[derive(Clone, Copy, Debug)]
pub(super) struct Square {
    pub(super) center: Vec2,
    pub(super) half_side: f32,
}

impl Square {
    fn enclosing(points: &[Vec2]) -> Option<Self> {
        let (min, max) = points.iter().fold(
            (vec2(f32::INFINITY, f32::INFINITY), vec2(f32::NEG_INFINITY, f32::NEG_INFINITY)),
            |(min, max), point| (min.min(*point), max.max(*point)),
        );
        if !(min.x.is_finite() && min.y.is_finite() && max.x.is_finite() && max.y.is_finite()) {
            return None;
        }

        let span = (max - min).max_elem().max(1.0);
        Some(Self {
            center: (min + max) * 0.5,
            half_side: span * 0.5 + 1.0,
        })
    }

    pub(super) fn contains(self, point: Vec2) -> bool {
        (point.x - self.center.x).abs() <= self.half_side
            && (point.y - self.center.y).abs() <= self.half_side
    }

    pub(super) fn side(self) -> f32 {
        self.half_side * 2.0
    }

    fn quadrant_of(self, point: Vec2) -> usize {
        usize::from(point.x >= self.center.x) | (usize::from(point.y >= self.center.y) << 1)
    }

    fn quadrant(self, quadrant: usize) -> Self {
        let quarter = self.half_side * 0.5;
        let dx = if quadrant & 1 == 1 { quarter } else { -quarter };
        let dy = if quadrant & 2 == 2 { quarter } else { -quarter };
        Self {
            center: self.center + vec2(dx, dy),
            half_side: quarter,
        }
    }
}

pub(super) enum Cell {
    Leaf(Vec<usize>),
    Branch(Box<[Option<QuadTree>; 4]>),
}

/// Barnes-Hut tree over node positions; every node has unit mass.
pub(super) struct QuadTree {
    pub(super) bounds: Square,
    pub(super) centroid: Vec2,
    pub(super) mass: f32,
    pub(super) cell: Cell,
}

impl QuadTree {
    pub(super) fn build(positions: &[Vec2]) -> Option<Self> {
        let bounds = Square::enclosing(positions)?;
        Some(Self::subdivide(bounds, (0..positions.len()).collect(), positions, 0))
    }

    fn subdivide(bounds: Square, indices: Vec<usize>, positions: &[Vec2], depth: usize) -> Self {
        let mass = indices.len() as f32;
        let centroid = if indices.is_empty() {
            bounds.center
        } else {
            indices.iter().fold(Vec2::ZERO, |sum, &index| sum + positions[index]) / mass
        };

        if depth >= MAX_DEPTH || indices.len() <= LEAF_CAPACITY {
            return Self {
                bounds,
                centroid,
                mass,
                cell: Cell::Leaf(indices),
            };
        }

        let mut buckets: [Vec<usize>; 4] = Default::default();
        for &index in &indices {
            buckets[bounds.quadrant_of(positions[index])].push(index);
        }

        // Coincident points would recurse to MAX_DEPTH for nothing.
        if buckets.iter().filter(|bucket| !bucket.is_empty()).count() <= 1 {
            return Self {
                bounds,
                centroid,
                mass,
                cell: Cell::Leaf(indices),
            };
        }

        let mut children: [Option<QuadTree>; 4] = Default::default();
        for (quadrant, bucket) in buckets.into_iter().enumerate() {
            if !bucket.is_empty() {
                children[quadrant] = Some(Self::subdivide(
                    bounds.quadrant(quadrant),
                    bucket,
                    positions,
                    depth + 1,
                ));
            }
        }

        Self {
            bounds,
            centroid,
            mass,
            cell: Cell::Branch(Box::new(children)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf_indices(tree: &QuadTree, out: &mut Vec<usize>) {
        match &tree.cell {
            Cell::Leaf(indices) => out.extend(indices),
            Cell::Branch(children) => {
                for child in children.iter().flatten() {
                    leaf_indices(child, out);
                }
            }
        }
    }

    #[test]
    fn every_point_lands_in_exactly_one_leaf() {
        let positions = (0..50)
            .map(|i| vec2((i % 7) as f32 * 13.0, (i / 7) as f32 * 9.0))
            .collect::<Vec<_>>();
        let tree = QuadTree::build(&positions).unwrap();
        assert_eq!(tree.mass, 50.0);

        let mut seen = Vec::new();
        leaf_indices(&tree, &mut seen);
        seen.sort_unstable();
        assert_eq!(seen, (0..50).collect::<Vec<_>>());
    }

    #[test]
    fn coincident_points_stay_in_one_leaf() {
        let positions = vec![vec2(3.0, 3.0); 20];
        let tree = QuadTree::build(&positions).unwrap();
        assert!(matches!(&tree.cell, Cell::Leaf(indices) if indices.len() == 20));
    }

    #[test]
    fn empty_input_has_no_tree() {
        assert!(QuadTree::build(&[]).is_none());
    }
}
