//! The operation orchestrator (spec.md §2 components C, D, E): exploration
//! and inspection drivers coordinated by an event bus and a shared point
//! registry, wired together by [`OperationController`].

mod controller;
mod error;
mod events;
mod exploration_driver;
mod inspection_driver;
mod registry;
mod status;

pub use controller::OperationController;
pub use error::OperationError;
pub use events::EventBus;
pub use registry::DetectedPoint;
pub use status::OperationStatus;

#[cfg(test)]
mod tests;
