//! Path planner contract (spec.md §4.B), grounded on
//! `examples/original_source/.../interfaces/interfaces.py::IPathPlanner`.

mod exact;
mod nearest_neighbor;

pub use exact::ExactPlanner;
pub use nearest_neighbor::NearestNeighborPlanner;

use crate::config::PlannerKind;
use crate::point::Point2D;

/// Turns a start point plus an unordered point set into a visiting order.
///
/// Contract (spec.md §4.B): input order of `points` is not significant; the
/// returned list is a permutation of `points` (no additions, no drops);
/// empty `points` yields an empty result; `start` is never included.
pub trait PathPlanner: Send + Sync {
    fn plan_path(&self, start: Point2D, points: &[Point2D]) -> Vec<Point2D>;
}

/// Builds the configured planner implementation.
pub fn build_planner(kind: PlannerKind) -> Box<dyn PathPlanner> {
    match kind {
        PlannerKind::NearestNeighbor => Box::new(NearestNeighborPlanner),
        PlannerKind::Exact => Box::new(ExactPlanner),
    }
}

#[cfg(test)]
mod tests;
