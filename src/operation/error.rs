//! Fail-fast construction errors (spec.md §7 "Configuration errors").

use crate::basepositions::ConfigError;

#[derive(Debug, thiserror::Error)]
pub enum OperationError {
    #[error(transparent)]
    Config(#[from] ConfigError),
}
