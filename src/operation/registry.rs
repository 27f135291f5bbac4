//! The global point registry (spec.md §3 `DetectedPoint`, §9 "Shared mutable
//! registry"): a single owned map guarded by one lock, keyed by the
//! synthetic [`PointId`] rather than by point coordinates.

use crate::point::{Point2D, PointId};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;

#[derive(Debug, Clone)]
pub struct DetectedPoint {
    pub point: Point2D,
    pub mission_id: usize,
    pub inspected: bool,
    pub detected_at: DateTime<Utc>,
    pub inspected_at: Option<DateTime<Utc>>,
    pub temperature: Option<f64>,
}

impl DetectedPoint {
    pub fn new(point: Point2D, mission_id: usize, detected_at: DateTime<Utc>) -> Self {
        Self { point, mission_id, inspected: false, detected_at, inspected_at: None, temperature: None }
    }
}

/// Guarded by a single `RwLock`: inserts from the exploration driver,
/// mutations from the inspection driver, read-only iteration for the
/// metrics snapshot once both drivers have finished (spec.md §5).
pub type PointRegistry = RwLock<HashMap<PointId, DetectedPoint>>;

pub fn new_registry() -> PointRegistry {
    RwLock::new(HashMap::new())
}
