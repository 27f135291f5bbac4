//! Terminal metrics snapshot (spec.md §6 "Metrics output"), grounded on
//! `examples/original_source/.../operation_controller.py::_save_metrics`.
//! Byte-exact layout is not a compatibility point (spec.md §6); field names
//! below mirror the original's `operation_data` dict.

use crate::config::METRICS_OUTPUT_FOLDER;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum MetricsError {
    #[error("could not create metrics output folder {folder}: {source}")]
    CreateFolder { folder: String, #[source] source: std::io::Error },
    #[error("could not write metrics snapshot to {path}: {source}")]
    Write { path: String, #[source] source: std::io::Error },
    #[error("could not serialize metrics snapshot: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Serialize)]
pub struct MissionMetrics {
    pub mission_id: usize,
    pub base_x: f64,
    pub base_y: f64,
    pub explorer_start: DateTime<Utc>,
    pub explorer_finish: DateTime<Utc>,
    pub explorer_duration_secs: f64,
    pub inspector_start: DateTime<Utc>,
    pub inspector_finish: DateTime<Utc>,
    pub inspector_duration_secs: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct PointMetrics {
    pub point_id: u64,
    pub x: f64,
    pub y: f64,
    pub mission_id: usize,
    pub detected_at: DateTime<Utc>,
    pub detected_offset_secs: f64,
    pub inspected_at: Option<DateTime<Utc>>,
    pub inspected_offset_secs: Option<f64>,
    pub temperature: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub duration_secs: f64,
    pub mission_count: usize,
    pub point_count: usize,
    pub missions: Vec<MissionMetrics>,
    pub points: Vec<PointMetrics>,
}

/// Writes `snapshot` as pretty-printed JSON into `METRICS_OUTPUT_FOLDER`,
/// filename timestamped `%Y_%m_%d_%H_%M_%S.json`.
pub fn write_snapshot(snapshot: &MetricsSnapshot) -> Result<(), MetricsError> {
    let folder = PathBuf::from(METRICS_OUTPUT_FOLDER);
    std::fs::create_dir_all(&folder)
        .map_err(|source| MetricsError::CreateFolder { folder: folder.display().to_string(), source })?;

    let filename = snapshot.finished_at.format("%Y_%m_%d_%H_%M_%S.json").to_string();
    let path = folder.join(filename);
    let body = serde_json::to_string_pretty(snapshot)?;
    std::fs::write(&path, body)
        .map_err(|source| MetricsError::Write { path: path.display().to_string(), source })
}
