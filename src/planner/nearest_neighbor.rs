//! Greedy nearest-neighbor heuristic, grounded on
//! `examples/original_source/.../planners/nearest_neighbor_planner.py`.

use super::PathPlanner;
use crate::point::Point2D;

pub struct NearestNeighborPlanner;

impl PathPlanner for NearestNeighborPlanner {
    fn plan_path(&self, start: Point2D, points: &[Point2D]) -> Vec<Point2D> {
        if points.is_empty() {
            return Vec::new();
        }

        let mut remaining: Vec<Point2D> = points.to_vec();
        let mut path = Vec::with_capacity(points.len());
        let mut current = start;

        while !remaining.is_empty() {
            let (idx, _) = remaining
                .iter()
                .enumerate()
                .min_by(|(_, a), (_, b)| {
                    current
                        .euclid_distance(a)
                        .partial_cmp(&current.euclid_distance(b))
                        .unwrap_or(std::cmp::Ordering::Equal)
                })
                .expect("remaining is non-empty");
            let next = remaining.swap_remove(idx);
            current = next;
            path.push(next);
        }

        path
    }
}
