//! Per-mission inspection (spec.md §4.D).

use super::events::EventBus;
use super::registry::PointRegistry;
use super::status::OperationStatus;
use crate::agent::{Agent, AgentEvent};
use crate::planner::PathPlanner;
use crate::point::{Point2D, PointId};
use crate::{event, warn};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};

pub struct MissionTiming {
    pub mission_id: usize,
    pub start: DateTime<Utc>,
    pub finish: DateTime<Utc>,
}

struct DriverState {
    status: OperationStatus,
    mission_id: usize,
}

pub struct InspectionDriver {
    inspector: Arc<dyn Agent>,
    planner: Box<dyn PathPlanner>,
    bus: Arc<EventBus>,
    registry: Arc<PointRegistry>,
    queue_rx: Mutex<mpsc::Receiver<Option<Vec<(PointId, Point2D)>>>>,
    mission_count: usize,
    state: Mutex<DriverState>,
    pub timings: Mutex<Vec<MissionTiming>>,
}

impl InspectionDriver {
    pub fn new(
        inspector: Arc<dyn Agent>,
        planner: Box<dyn PathPlanner>,
        bus: Arc<EventBus>,
        registry: Arc<PointRegistry>,
        queue_rx: mpsc::Receiver<Option<Vec<(PointId, Point2D)>>>,
        mission_count: usize,
    ) -> Self {
        Self {
            inspector,
            planner,
            bus,
            registry,
            queue_rx: Mutex::new(queue_rx),
            mission_count,
            state: Mutex::new(DriverState { status: OperationStatus::NotStarted, mission_id: 0 }),
            timings: Mutex::new(Vec::new()),
        }
    }

    pub async fn status(&self) -> OperationStatus {
        self.state.lock().await.status
    }

    /// Runs until mission `N-1`'s point list has been fully inspected.
    /// Meant to be `tokio::spawn`'d once by the controller.
    pub async fn run(self: Arc<Self>) {
        loop {
            let dequeued = self.queue_rx.lock().await.recv().await;
            let points = match dequeued {
                Some(Some(points)) => points,
                Some(None) | None => break, // null sentinel, or producer gone
            };

            let mission_id = { self.state.lock().await.mission_id };
            {
                let mut state = self.state.lock().await;
                state.status = OperationStatus::Running;
            }
            let start_time = Utc::now();

            let start = self.inspector.current_position().unwrap_or_else(Point2D::zero);
            let coords: Vec<Point2D> = points.iter().map(|(_, p)| *p).collect();
            let path = self.planner.plan_path(start, &coords);

            self.bus.inspector_done.clear();
            Arc::clone(&self.inspector).start_routine(Some(path));

            loop {
                let event = self.inspector.events().lock().await.recv().await;
                match event {
                    Some(AgentEvent::Point(abs)) => {
                        if let Some((id, _)) = points.iter().find(|(_, p)| *p == abs) {
                            let temperature = self
                                .inspector
                                .telemetry()
                                .and_then(|t| t.get("temperature").copied());
                            let mut registry = self.registry.write().await;
                            if let Some(detected) = registry.get_mut(id) {
                                if detected.mission_id == mission_id {
                                    detected.inspected = true;
                                    detected.inspected_at = Some(Utc::now());
                                    detected.temperature = temperature;
                                    event!("mission {mission_id}: inspector completed point {abs} (id {})", id.0);
                                } else {
                                    warn!("mission {mission_id}: inspector point {abs} matched mission {}, skipping", detected.mission_id);
                                }
                            }
                        } else {
                            warn!("mission {mission_id}: inspector reported unknown point {abs}");
                        }
                    }
                    Some(AgentEvent::Finish) => {
                        self.bus.inspector_done.set();
                        break;
                    }
                    None => {
                        warn!("mission {mission_id}: inspector event channel closed early");
                        self.bus.inspector_done.set();
                        break;
                    }
                }
            }

            self.bus.inspector_done.wait().await;
            self.inspector.stop_routine();
            let finish_time = Utc::now();

            {
                let mut state = self.state.lock().await;
                state.status = OperationStatus::Finished;
                state.mission_id += 1;
            }
            self.timings.lock().await.push(MissionTiming { mission_id, start: start_time, finish: finish_time });

            if mission_id + 1 >= self.mission_count {
                break;
            }
        }
    }
}
