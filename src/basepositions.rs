//! Loader for the base-positions document (spec.md §6), grounded on
//! `examples/original_source/.../operation_controller.py::_load_base_positions`.
//!
//! [`ConfigError`] doubles as the crate's general fail-fast
//! construction-error type (spec.md §7 "Configuration errors"): besides the
//! base-positions document it also covers an unrecognized `PLANNER`
//! selector (spec.md §6 "path-planner implementation selector"), which has
//! no driver-local recovery path and must fail construction the same way a
//! malformed base-positions file does.

use crate::point::Point2D;
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read base positions file {path}: {source}")]
    Io { path: String, source: std::io::Error },
    #[error("failed to parse base positions file {path}: {source}")]
    Parse { path: String, source: serde_json::Error },
    #[error("base positions file {path} contains zero missions")]
    Empty { path: String },
    #[error("unknown planner strategy {value:?}, expected \"nearest-neighbor\" or \"exact\"")]
    UnknownPlanner { value: String },
}

#[derive(Debug, serde::Deserialize)]
struct RawPoint {
    x: f64,
    y: f64,
}

#[derive(Debug, serde::Deserialize)]
struct BasePositionsDocument {
    base_positions: Vec<RawPoint>,
}

/// Loads the ordered list of base stations from a JSON file shaped like
/// `{ "base_positions": [ {"x": .., "y": ..}, ... ] }`.
///
/// A missing file or malformed JSON is a fail-fast configuration error
/// (spec.md §7); at least one base position is required since `N` (the
/// mission count) must be positive.
pub fn load_base_positions(path: impl AsRef<Path>) -> Result<Vec<Point2D>, ConfigError> {
    let path_ref = path.as_ref();
    let path_str = path_ref.display().to_string();
    let contents = std::fs::read_to_string(path_ref).map_err(|source| ConfigError::Io {
        path: path_str.clone(),
        source,
    })?;
    let doc: BasePositionsDocument =
        serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path_str.clone(),
            source,
        })?;
    if doc.base_positions.is_empty() {
        return Err(ConfigError::Empty { path: path_str });
    }
    Ok(doc
        .base_positions
        .into_iter()
        .map(|p| Point2D::new(p.x, p.y))
        .collect())
}
