//! End-to-end scenarios from spec.md §8, driven by scripted test agents
//! instead of the timer-driven simulators in `agent/`, so mission outcomes
//! are deterministic without sleeping on real wall-clock cadence.

use super::*;
use crate::agent::{Agent, AgentEvent};
use crate::config::PlannerKind;
use crate::point::Point2D;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex as StdMutex};
use std::time::Duration;
use tokio::sync::{mpsc, Mutex};

/// Reports a fixed, per-mission list of relative points as soon as
/// `start_routine` is called. Ignores `stop_routine`; the exploration
/// driver only relies on the bus signal to end a phase, not agent Finish.
struct ScriptedExplorer {
    tx: mpsc::Sender<AgentEvent>,
    rx: Mutex<mpsc::Receiver<AgentEvent>>,
    missions: Vec<Vec<Point2D>>,
    call_count: AtomicUsize,
}

impl ScriptedExplorer {
    fn new(missions: Vec<Vec<Point2D>>) -> Self {
        let (tx, rx) = mpsc::channel(64);
        Self { tx, rx: Mutex::new(rx), missions, call_count: AtomicUsize::new(0) }
    }
}

impl Agent for ScriptedExplorer {
    fn start_routine(self: Arc<Self>, _waypoints: Option<Vec<Point2D>>) {
        let idx = self.call_count.fetch_add(1, Ordering::SeqCst);
        let points = self.missions.get(idx).cloned().unwrap_or_default();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            for p in points {
                if tx.send(AgentEvent::Point(p)).await.is_err() {
                    break;
                }
            }
        });
    }

    fn stop_routine(&self) {}

    fn events(&self) -> &Mutex<mpsc::Receiver<AgentEvent>> { &self.rx }

    fn current_position(&self) -> Option<Point2D> { Some(Point2D::zero()) }

    fn telemetry(&self) -> Option<HashMap<String, f64>> { None }
}

/// Walks the given waypoints instantly, reporting each then `Finish`.
struct ScriptedInspector {
    tx: mpsc::Sender<AgentEvent>,
    rx: Mutex<mpsc::Receiver<AgentEvent>>,
    position: StdMutex<Point2D>,
}

impl ScriptedInspector {
    fn new() -> Self {
        let (tx, rx) = mpsc::channel(64);
        Self { tx, rx: Mutex::new(rx), position: StdMutex::new(Point2D::zero()) }
    }
}

impl Agent for ScriptedInspector {
    fn start_routine(self: Arc<Self>, waypoints: Option<Vec<Point2D>>) {
        let tx = self.tx.clone();
        let this = Arc::clone(&self);
        tokio::spawn(async move {
            for p in waypoints.unwrap_or_default() {
                *this.position.lock().expect("position mutex poisoned") = p;
                if tx.send(AgentEvent::Point(p)).await.is_err() {
                    return;
                }
            }
            let _ = tx.send(AgentEvent::Finish).await;
        });
    }

    fn stop_routine(&self) {}

    fn events(&self) -> &Mutex<mpsc::Receiver<AgentEvent>> { &self.rx }

    fn current_position(&self) -> Option<Point2D> {
        Some(*self.position.lock().expect("position mutex poisoned"))
    }

    fn telemetry(&self) -> Option<HashMap<String, f64>> {
        let mut map = HashMap::new();
        map.insert("temperature".to_string(), 22.5);
        Some(map)
    }
}

fn write_base_positions(dir: &std::path::Path, bases: &[Point2D]) -> std::path::PathBuf {
    let path = dir.join(format!("bases_{:?}.json", std::thread::current().id()));
    let entries: Vec<String> = bases.iter().map(|b| format!("{{\"x\": {}, \"y\": {}}}", b.x, b.y)).collect();
    let body = format!("{{\"base_positions\": [{}]}}", entries.join(","));
    std::fs::write(&path, body).expect("write scratch base-positions file");
    path
}

async fn wait_for_status(controller: &Arc<OperationController>, target: OperationStatus) {
    tokio::time::timeout(Duration::from_secs(2), async {
        loop {
            if controller.status().await == target {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("operation did not reach expected status in time");
}

async fn build_controller(
    bases: Vec<Point2D>,
    explorer_missions: Vec<Vec<Point2D>>,
) -> (Arc<OperationController>, std::path::PathBuf) {
    let dir = std::env::temp_dir();
    let path = write_base_positions(&dir, &bases);
    let explorer = Arc::new(ScriptedExplorer::new(explorer_missions));
    let inspector = Arc::new(ScriptedInspector::new());
    let controller = OperationController::new(&path, explorer, inspector, PlannerKind::NearestNeighbor)
        .await
        .expect("controller construction should succeed with a valid base-positions file");
    (controller, path)
}

#[tokio::test(flavor = "multi_thread")]
async fn scenario_1_empty_missions_still_finish() {
    let bases = vec![Point2D::new(0.0, 0.0), Point2D::new(10.0, 10.0)];
    let (controller, path) = build_controller(bases, vec![vec![], vec![]]).await;

    controller.start().await;
    tokio::time::sleep(Duration::from_millis(20)).await;
    controller.stop_inspection().await;
    tokio::time::sleep(Duration::from_millis(20)).await;
    controller.next_mission().await;
    tokio::time::sleep(Duration::from_millis(20)).await;
    controller.stop_inspection().await;

    wait_for_status(&controller, OperationStatus::Finished).await;
    let _ = std::fs::remove_file(&path);
}

#[tokio::test(flavor = "multi_thread")]
async fn scenario_2_duplicate_suppression_within_a_mission() {
    let bases = vec![Point2D::new(0.0, 0.0), Point2D::new(10.0, 10.0)];
    let mission0 = vec![Point2D::new(0.2, 0.0), Point2D::new(0.5, 0.0), Point2D::new(3.0, 0.0)];
    let (controller, path) = build_controller(bases, vec![mission0, vec![]]).await;

    controller.start().await;
    tokio::time::sleep(Duration::from_millis(30)).await;
    controller.stop_inspection().await;
    tokio::time::sleep(Duration::from_millis(20)).await;
    controller.next_mission().await;
    tokio::time::sleep(Duration::from_millis(20)).await;
    controller.stop_inspection().await;
    wait_for_status(&controller, OperationStatus::Finished).await;

    let registry = controller.registry.read().await;
    let mut retained: Vec<Point2D> = registry.values().map(|d| d.point).collect();
    retained.sort_by(|a, b| a.x.partial_cmp(&b.x).unwrap());
    assert_eq!(retained, vec![Point2D::new(0.2, 0.0), Point2D::new(3.0, 0.0)]);
    drop(registry);
    let _ = std::fs::remove_file(&path);
}

#[tokio::test(flavor = "multi_thread")]
async fn scenario_6_stop_without_points_advances_cleanly() {
    let bases = vec![Point2D::new(0.0, 0.0), Point2D::new(10.0, 10.0)];
    let (controller, path) = build_controller(bases, vec![vec![], vec![]]).await;

    controller.start().await;
    controller.stop_inspection().await;
    tokio::time::sleep(Duration::from_millis(20)).await;
    controller.next_mission().await;
    tokio::time::sleep(Duration::from_millis(20)).await;
    controller.stop_inspection().await;

    wait_for_status(&controller, OperationStatus::Finished).await;
    assert!(controller.registry.read().await.is_empty());
    let _ = std::fs::remove_file(&path);
}

#[tokio::test(flavor = "multi_thread")]
async fn scenario_3_cross_mission_identity_is_independent() {
    // Both missions' explorers report the same base-relative offset, but
    // with different bases the absolute points differ; each must land in
    // the registry as its own entry under its own mission id.
    let bases = vec![Point2D::new(0.0, 0.0), Point2D::new(10.0, 10.0)];
    let mission0 = vec![Point2D::new(5.0, 5.0)];
    let mission1 = vec![Point2D::new(5.0, 5.0)];
    let (controller, path) = build_controller(bases, vec![mission0, mission1]).await;

    controller.start().await;
    tokio::time::sleep(Duration::from_millis(20)).await;
    controller.stop_inspection().await;
    tokio::time::sleep(Duration::from_millis(20)).await;
    controller.next_mission().await;
    tokio::time::sleep(Duration::from_millis(20)).await;
    controller.stop_inspection().await;
    wait_for_status(&controller, OperationStatus::Finished).await;

    let registry = controller.registry.read().await;
    assert_eq!(registry.len(), 2, "mission 0's (5,5) and mission 1's (15,15) are distinct points");
    let mut by_mission: Vec<(usize, Point2D)> =
        registry.values().map(|d| (d.mission_id, d.point)).collect();
    by_mission.sort_by_key(|(m, _)| *m);
    assert_eq!(by_mission, vec![(0, Point2D::new(5.0, 5.0)), (1, Point2D::new(15.0, 15.0))]);
    assert!(registry.values().all(|d| d.inspected), "both points should have been inspected in their own mission");
    drop(registry);
    let _ = std::fs::remove_file(&path);
}

/// Like [`ScriptedInspector`] but pauses between waypoints long enough for
/// the next mission's exploration to finish and enqueue while this one is
/// still being inspected (spec.md §8 Scenario 4).
struct SlowScriptedInspector {
    tx: mpsc::Sender<AgentEvent>,
    rx: Mutex<mpsc::Receiver<AgentEvent>>,
    position: StdMutex<Point2D>,
}

impl SlowScriptedInspector {
    fn new() -> Self {
        let (tx, rx) = mpsc::channel(64);
        Self { tx, rx: Mutex::new(rx), position: StdMutex::new(Point2D::zero()) }
    }
}

impl Agent for SlowScriptedInspector {
    fn start_routine(self: Arc<Self>, waypoints: Option<Vec<Point2D>>) {
        let tx = self.tx.clone();
        let this = Arc::clone(&self);
        tokio::spawn(async move {
            for p in waypoints.unwrap_or_default() {
                tokio::time::sleep(Duration::from_millis(15)).await;
                *this.position.lock().expect("position mutex poisoned") = p;
                if tx.send(AgentEvent::Point(p)).await.is_err() {
                    return;
                }
            }
            let _ = tx.send(AgentEvent::Finish).await;
        });
    }

    fn stop_routine(&self) {}

    fn events(&self) -> &Mutex<mpsc::Receiver<AgentEvent>> { &self.rx }

    fn current_position(&self) -> Option<Point2D> {
        Some(*self.position.lock().expect("position mutex poisoned"))
    }

    fn telemetry(&self) -> Option<HashMap<String, f64>> { None }
}

#[tokio::test(flavor = "multi_thread")]
async fn scenario_4_ordering_under_slow_inspector_never_misattributes() {
    let bases = vec![Point2D::new(0.0, 0.0), Point2D::new(10.0, 10.0)];
    let mission0 = vec![Point2D::new(1.0, 0.0), Point2D::new(2.0, 0.0)];
    let mission1 = vec![Point2D::new(11.0, 10.0)];

    let dir = std::env::temp_dir();
    let path = write_base_positions(&dir, &bases);
    let explorer = Arc::new(ScriptedExplorer::new(vec![mission0, mission1]));
    let inspector = Arc::new(SlowScriptedInspector::new());
    let controller = OperationController::new(&path, explorer, inspector, PlannerKind::NearestNeighbor)
        .await
        .expect("controller construction should succeed");

    controller.start().await;
    tokio::time::sleep(Duration::from_millis(10)).await;
    controller.stop_inspection().await; // ends mission 0 exploration, enqueues it
    tokio::time::sleep(Duration::from_millis(5)).await;
    controller.next_mission().await; // arms mission 1 while inspector still walks mission 0
    tokio::time::sleep(Duration::from_millis(10)).await;
    controller.stop_inspection().await; // ends mission 1 exploration, enqueues it
    wait_for_status(&controller, OperationStatus::Finished).await;

    let registry = controller.registry.read().await;
    for detected in registry.values() {
        if detected.inspected {
            assert_eq!(
                detected.point.x < 10.0,
                detected.mission_id == 0,
                "point {:?} inspected under the wrong mission id {}",
                detected.point,
                detected.mission_id
            );
        }
    }
    drop(registry);
    let _ = std::fs::remove_file(&path);
}
