//! Per-mission exploration (spec.md §4.C).
//!
//! `missionId` advancement resolves spec.md §9's two linked Open Questions
//! (off-by-one loop bound, pre/post increment) the same way: the driver is
//! the sole owner of `mission_id` and post-increments it once a phase's
//! points have been pushed to the queue. `mission_id` therefore always
//! names "the next mission not yet armed"; `start_next_exploration()`
//! (the controller-facing arm call) only validates and signals, it never
//! increments. See DESIGN.md for the full rationale.

use super::events::EventBus;
use super::registry::{DetectedPoint, PointRegistry};
use super::status::OperationStatus;
use crate::agent::{Agent, AgentEvent};
use crate::config::DRONE_VISIBILITY;
use crate::point::{Point2D, PointId, PointIdAllocator};
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

pub struct ExplorationDriver {
    explorer: Arc<dyn Agent>,
    base_positions: Vec<Point2D>,
    bus: Arc<EventBus>,
    registry: Arc<PointRegistry>,
    ids: Arc<PointIdAllocator>,
    queue_tx: mpsc::Sender<Option<Vec<(PointId, Point2D)>>>,
    state: Mutex<DriverState>,
    pub timings: Mutex<Vec<MissionTiming>>,
}

impl ExplorationDriver {
    pub fn new(
        explorer: Arc<dyn Agent>,
        base_positions: Vec<Point2D>,
        bus: Arc<EventBus>,
        registry: Arc<PointRegistry>,
        ids: Arc<PointIdAllocator>,
        queue_tx: mpsc::Sender<Option<Vec<(PointId, Point2D)>>>,
    ) -> Self {
        Self {
            explorer,
            base_positions,
            bus,
            registry,
            ids,
            queue_tx,
            state: Mutex::new(DriverState { status: OperationStatus::NotStarted, mission_id: 0 }),
            timings: Mutex::new(Vec::new()),
        }
    }

    pub async fn status(&self) -> OperationStatus {
        self.state.lock().await.status
    }

    /// The controller-facing arm call (spec.md §4.C "Advancement").
    /// Validates `status != Running` and that an un-armed mission remains,
    /// then signals `startNextExploration`. A no-op (logged) otherwise.
    pub async fn start_next_exploration(&self) {
        let state = self.state.lock().await;
        if state.status == OperationStatus::Running {
            warn!("exploration driver: nextMission() ignored, mission {} still running", state.mission_id);
            return;
        }
        if state.mission_id >= self.base_positions.len() {
            warn!("exploration driver: nextMission() ignored, no missions remain");
            return;
        }
        drop(state);
        self.bus.start_next_exploration.set();
    }

    /// Runs until mission `N-1` has handed its points to the queue. Meant
    /// to be `tokio::spawn`'d once by the controller.
    pub async fn run(self: Arc<Self>) {
        let n = self.base_positions.len();
        loop {
            self.bus.start_next_exploration.wait().await;

            let mission_id = {
                let mut state = self.state.lock().await;
                state.status = OperationStatus::Running;
                state.mission_id
            };
            let start_time = Utc::now();
            let base = self.base_positions[mission_id];

            Arc::clone(&self.explorer).start_routine(None);

            let mut accepted: Vec<(PointId, Point2D)> = Vec::new();
            loop {
                tokio::select! {
                    biased;
                    _ = self.bus.stop_exploration.wait() => break,
                    maybe_event = Self::next_event(&self.explorer) => {
                        match maybe_event {
                            Some(AgentEvent::Point(rel)) => {
                                let abs = base.translated_by(rel);
                                let too_close = accepted
                                    .iter()
                                    .any(|(_, p)| p.euclid_distance(&abs) < DRONE_VISIBILITY);
                                if too_close {
                                    continue;
                                }
                                let id = self.ids.allocate();
                                event!("mission {mission_id}: explorer detected point {abs} (id {})", id.0);
                                self.registry
                                    .write()
                                    .await
                                    .insert(id, DetectedPoint::new(abs, mission_id, Utc::now()));
                                accepted.push((id, abs));
                            }
                            Some(AgentEvent::Finish) => {
                                // The explorer may finish its own routine before the
                                // controller signals stopExploration; the driver still
                                // waits for the explicit signal (spec.md §4.C step 5).
                            }
                            None => {
                                warn!("mission {mission_id}: explorer event channel closed early");
                                break;
                            }
                        }
                    }
                }
            }

            self.explorer.stop_routine();
            let finish_time = Utc::now();

            {
                let mut state = self.state.lock().await;
                state.status = OperationStatus::Finished;
                state.mission_id += 1;
            }
            self.timings.lock().await.push(MissionTiming { mission_id, start: start_time, finish: finish_time });

            if self.queue_tx.send(Some(accepted)).await.is_err() {
                warn!("mission {mission_id}: inspection queue closed, dropping point list");
            }

            if mission_id + 1 >= n {
                break;
            }
        }
    }

    async fn next_event(explorer: &Arc<dyn Agent>) -> Option<AgentEvent> {
        explorer.events().lock().await.recv().await
    }
}
