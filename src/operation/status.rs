//! Operation/driver lifecycle state (spec.md §3 `OperationStatus`).

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationStatus {
    NotStarted,
    Running,
    Finished,
}
