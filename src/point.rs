//! 2D point type and the synthetic identifier used to track detected points
//! across the exploration/inspection boundary without relying on
//! floating-point structural equality (see DESIGN.md, Open Question 3).

use std::sync::atomic::{AtomicU64, Ordering};

/// A point in the operation's shared 2D coordinate space.
///
/// Value type with `f64` components, matching the source's structural model.
/// Never used as a map key — see [`PointId`] for that role.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub const fn new(x: f64, y: f64) -> Self { Self { x, y } }

    pub const fn zero() -> Self { Self { x: 0.0, y: 0.0 } }

    /// Vector sum, used to translate an explorer-relative point to absolute
    /// coordinates: `base + relative`.
    pub fn translated_by(&self, other: Self) -> Self {
        Self::new(self.x + other.x, self.y + other.y)
    }

    pub fn euclid_distance(&self, other: &Self) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

impl std::fmt::Display for Point2D {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.3}, {:.3})", self.x, self.y)
    }
}

/// Synthetic identifier assigned to every point the moment it is detected.
///
/// Carried alongside [`Point2D`] through the queue and the planner so that
/// the inspector's `onPoint` callback can match against the global registry
/// by id rather than by float-bit equality across threads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize)]
pub struct PointId(pub u64);

#[derive(Debug, Default)]
pub struct PointIdAllocator {
    next: AtomicU64,
}

impl PointIdAllocator {
    pub const fn new() -> Self { Self { next: AtomicU64::new(0) } }

    pub fn allocate(&self) -> PointId {
        PointId(self.next.fetch_add(1, Ordering::Relaxed))
    }
}
