//! Uniform interface to a robot collaborator (spec.md §4.A), reformulated
//! per the Design Notes (spec.md §9) as a channel of typed events read by
//! the driver's own task, instead of stored callbacks — callbacks fire on
//! the agent's own task in the source; a channel makes that handoff
//! explicit and avoids re-entrancy across threads.

mod explorer;
mod inspector;

pub use explorer::SimulatedExplorer;
pub use inspector::SimulatedInspector;

use crate::point::Point2D;
use std::collections::HashMap;
use tokio::sync::{mpsc, Mutex};

/// Event emitted by an agent's own task while a routine is running.
#[derive(Debug, Clone, PartialEq)]
pub enum AgentEvent {
    /// The agent detected (explorer) or reached (inspector) a point.
    Point(Point2D),
    /// The current routine completed of its own accord. Fired exactly once
    /// per `start_routine` call; always follows every `Point` event it
    /// produced, though no ordering is promised beyond that (spec.md §4.A).
    Finish,
}

/// A robot collaborator. The explorer reports points relative to its
/// mission's base; the inspector reports absolute coordinates (spec.md §4.A).
///
/// `start_routine` takes `self: Arc<Self>` rather than `&self` so
/// implementations can spawn a `'static` background task for the routine
/// without requiring callers to manage a second handle.
pub trait Agent: Send + Sync + 'static {
    /// Begins activity. `waypoints` is `None` for the explorer; for the
    /// inspector it is the ordered sequence to visit.
    fn start_routine(self: std::sync::Arc<Self>, waypoints: Option<Vec<Point2D>>);

    /// Idempotent; requests cessation of the current routine.
    fn stop_routine(&self);

    /// The receiving end of this agent's event channel. Drivers hold this
    /// for the agent's whole lifetime and drain it from their own task.
    fn events(&self) -> &Mutex<mpsc::Receiver<AgentEvent>>;

    fn current_position(&self) -> Option<Point2D>;

    fn telemetry(&self) -> Option<HashMap<String, f64>>;
}
