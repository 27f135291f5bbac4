//! Operation controller (spec.md §4.E): construction, lifecycle, and the
//! final metrics snapshot.

use super::error::OperationError;
use super::events::EventBus;
use super::exploration_driver::ExplorationDriver;
use super::inspection_driver::InspectionDriver;
use super::registry::new_registry;
use super::status::OperationStatus;
use crate::agent::Agent;
use crate::basepositions::load_base_positions;
use crate::config::PlannerKind;
use crate::metrics::{MetricsSnapshot, MissionMetrics, PointMetrics};
use crate::planner::build_planner;
use crate::point::PointIdAllocator;
use crate::{error, info};
use chrono::Utc;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};

pub struct OperationController {
    bus: Arc<EventBus>,
    pub(crate) registry: Arc<crate::operation::registry::PointRegistry>,
    exploration: Arc<ExplorationDriver>,
    inspection: Arc<InspectionDriver>,
    base_positions: Vec<crate::point::Point2D>,
    status: Mutex<OperationStatus>,
    started_at: Mutex<Option<chrono::DateTime<Utc>>>,
    finished_at: Mutex<Option<chrono::DateTime<Utc>>>,
}

impl OperationController {
    /// Loads base positions and wires both drivers. A missing or malformed
    /// base-positions document fails fast (spec.md §7).
    pub async fn new(
        base_positions_path: &Path,
        explorer: Arc<dyn Agent>,
        inspector: Arc<dyn Agent>,
        planner_kind: PlannerKind,
    ) -> Result<Arc<Self>, OperationError> {
        let base_positions = load_base_positions(base_positions_path)?;
        let mission_count = base_positions.len();

        let bus = Arc::new(EventBus::new());
        let registry = Arc::new(new_registry());
        let ids = Arc::new(PointIdAllocator::new());
        let (queue_tx, queue_rx) = mpsc::channel(mission_count.max(1));
        let planner = build_planner(planner_kind);

        let exploration = Arc::new(ExplorationDriver::new(
            explorer,
            base_positions.clone(),
            Arc::clone(&bus),
            Arc::clone(&registry),
            ids,
            queue_tx,
        ));
        let inspection = Arc::new(InspectionDriver::new(
            inspector,
            planner,
            Arc::clone(&bus),
            Arc::clone(&registry),
            queue_rx,
            mission_count,
        ));

        Ok(Arc::new(Self {
            bus,
            registry,
            exploration,
            inspection,
            base_positions,
            status: Mutex::new(OperationStatus::NotStarted),
            started_at: Mutex::new(None),
            finished_at: Mutex::new(None),
        }))
    }

    /// Launches both drivers and arms mission 0. Returns once the drivers
    /// are spawned; the operation itself keeps running in the background
    /// until mission `N-1` finishes on both sides, at which point a
    /// metrics snapshot is written and status becomes `Finished`.
    pub async fn start(self: &Arc<Self>) {
        *self.status.lock().await = OperationStatus::Running;
        *self.started_at.lock().await = Some(Utc::now());
        info!("operation starting, {} mission(s) armed for exploration", self.base_positions.len());

        let exploration_task = tokio::spawn(Arc::clone(&self.exploration).run());
        let inspection_task = tokio::spawn(Arc::clone(&self.inspection).run());

        let this = Arc::clone(self);
        tokio::spawn(async move {
            let _ = tokio::join!(exploration_task, inspection_task);
            *this.status.lock().await = OperationStatus::Finished;
            *this.finished_at.lock().await = Some(Utc::now());
            info!("operation finished, writing metrics snapshot");
            let snapshot = this.build_snapshot().await;
            if let Err(err) = crate::metrics::write_snapshot(&snapshot) {
                error!("failed to write metrics snapshot: {err}");
            }
        });

        self.bus.start_next_exploration.set();
    }

    /// Arms the next exploration mission (spec.md §4.E `nextMission`).
    pub async fn next_mission(&self) {
        self.exploration.start_next_exploration().await;
    }

    /// Ends the current exploration phase (spec.md §4.E `stopInspection`,
    /// named for the operator action it drives, not its effect).
    pub async fn stop_inspection(&self) {
        self.bus.stop_exploration.set();
    }

    pub async fn status(&self) -> OperationStatus {
        *self.status.lock().await
    }

    async fn build_snapshot(&self) -> MetricsSnapshot {
        let started_at = self.started_at.lock().await.unwrap_or_else(Utc::now);
        let finished_at = self.finished_at.lock().await.unwrap_or_else(Utc::now);

        let exploration_timings = self.exploration.timings.lock().await;
        let inspection_timings = self.inspection.timings.lock().await;

        let missions = (0..self.base_positions.len())
            .filter_map(|mission_id| {
                let e = exploration_timings.iter().find(|t| t.mission_id == mission_id)?;
                let i = inspection_timings.iter().find(|t| t.mission_id == mission_id)?;
                let base = self.base_positions[mission_id];
                Some(MissionMetrics {
                    mission_id,
                    base_x: base.x,
                    base_y: base.y,
                    explorer_start: e.start,
                    explorer_finish: e.finish,
                    explorer_duration_secs: (e.finish - e.start).num_milliseconds() as f64 / 1000.0,
                    inspector_start: i.start,
                    inspector_finish: i.finish,
                    inspector_duration_secs: (i.finish - i.start).num_milliseconds() as f64 / 1000.0,
                })
            })
            .collect::<Vec<_>>();

        let registry = self.registry.read().await;
        let mut points: Vec<PointMetrics> = registry
            .iter()
            .map(|(id, detected)| PointMetrics {
                point_id: id.0,
                x: detected.point.x,
                y: detected.point.y,
                mission_id: detected.mission_id,
                detected_at: detected.detected_at,
                detected_offset_secs: (detected.detected_at - started_at).num_milliseconds() as f64 / 1000.0,
                inspected_at: detected.inspected_at,
                inspected_offset_secs: detected
                    .inspected_at
                    .map(|t| (t - started_at).num_milliseconds() as f64 / 1000.0),
                temperature: detected.temperature,
            })
            .collect();
        points.sort_by_key(|p| p.point_id);

        MetricsSnapshot {
            started_at,
            finished_at,
            duration_secs: (finished_at - started_at).num_milliseconds() as f64 / 1000.0,
            mission_count: self.base_positions.len(),
            point_count: points.len(),
            missions,
            points,
        }
    }
}
