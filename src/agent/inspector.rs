//! Deterministic ground-robot simulator: walks a planned waypoint list at a
//! fixed speed and reports a synthetic `temperature` telemetry reading.
//! Grounded on `examples/original_source/.../robotDog/robot_dog_simulator.py`;
//! the real robot-dog kinematics are out of scope (spec.md §1).

use super::{Agent, AgentEvent};
use crate::config::{ROBOT_DOG_MEAN_TEMPERATURE, ROBOT_DOG_REACHED_TOLERANCE, ROBOT_DOG_SPEED, ROBOT_DOG_TEMPERATURE_STDDEV, ROBOT_SLEEP_TIME};
use crate::point::Point2D;
use crate::telemetry::TelemetryState;
use rand::Rng;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex as StdMutex};
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;

pub struct SimulatedInspector {
    tx: mpsc::Sender<AgentEvent>,
    rx: Mutex<mpsc::Receiver<AgentEvent>>,
    stop_requested: Arc<AtomicBool>,
    handle: StdMutex<Option<JoinHandle<()>>>,
    position: Mutex<Point2D>,
    /// Component F's latest reading (spec.md §4.E construction note), merged
    /// into this agent's `telemetry()` alongside the synthetic temperature.
    external_telemetry: Option<Arc<TelemetryState>>,
}

impl SimulatedInspector {
    pub fn new() -> Self { Self::with_telemetry(None) }

    pub fn with_telemetry(external_telemetry: Option<Arc<TelemetryState>>) -> Self {
        let (tx, rx) = mpsc::channel(64);
        Self {
            tx,
            rx: Mutex::new(rx),
            stop_requested: Arc::new(AtomicBool::new(false)),
            handle: StdMutex::new(None),
            position: Mutex::new(Point2D::zero()),
            external_telemetry,
        }
    }
}

impl Default for SimulatedInspector {
    fn default() -> Self { Self::new() }
}

impl Agent for SimulatedInspector {
    fn start_routine(self: Arc<Self>, waypoints: Option<Vec<Point2D>>) {
        self.stop_requested.store(false, Ordering::SeqCst);
        let stop_requested = Arc::clone(&self.stop_requested);
        let tx = self.tx.clone();
        let this = Arc::clone(&self);
        let waypoints = waypoints.unwrap_or_default();

        let task = tokio::spawn(async move {
            'targets: for target in waypoints {
                if stop_requested.load(Ordering::SeqCst) {
                    break;
                }
                loop {
                    if stop_requested.load(Ordering::SeqCst) {
                        break 'targets;
                    }
                    let current = *this.position.lock().await;
                    let dist = current.euclid_distance(&target);
                    if dist < ROBOT_DOG_REACHED_TOLERANCE {
                        *this.position.lock().await = target;
                        if tx.send(AgentEvent::Point(target)).await.is_err() {
                            break 'targets;
                        }
                        break;
                    }
                    let step = (ROBOT_DOG_SPEED * ROBOT_SLEEP_TIME.as_secs_f64()).min(dist);
                    let ratio = step / dist;
                    let next = Point2D::new(
                        current.x + (target.x - current.x) * ratio,
                        current.y + (target.y - current.y) * ratio,
                    );
                    *this.position.lock().await = next;
                    tokio::time::sleep(ROBOT_SLEEP_TIME).await;
                }
            }
            let _ = tx.send(AgentEvent::Finish).await;
        });

        *self.handle.lock().expect("[FATAL] inspector handle mutex poisoned") = Some(task);
    }

    fn stop_routine(&self) {
        self.stop_requested.store(true, Ordering::SeqCst);
    }

    fn events(&self) -> &Mutex<mpsc::Receiver<AgentEvent>> { &self.rx }

    fn current_position(&self) -> Option<Point2D> {
        self.position.try_lock().ok().map(|g| *g)
    }

    fn telemetry(&self) -> Option<HashMap<String, f64>> {
        let mut map = self
            .external_telemetry
            .as_ref()
            .map_or_else(HashMap::new, |state| state.snapshot());
        map.insert("temperature".to_string(), sample_temperature());
        Some(map)
    }
}

/// Samples a synthetic ambient-temperature reading via Box-Muller, so the
/// crate doesn't need to pull in `rand_distr` for one telemetry field.
fn sample_temperature() -> f64 {
    let mut rng = rand::rng();
    let u1: f64 = rng.random_range(f64::EPSILON..1.0);
    let u2: f64 = rng.random_range(0.0..1.0);
    let z0 = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
    ROBOT_DOG_MEAN_TEMPERATURE + ROBOT_DOG_TEMPERATURE_STDDEV * z0
}
