//! Deterministic explorer simulator: sweeps an Archimedean spiral around the
//! origin and reports points (relative to that origin) at a fixed cadence
//! until stopped. Grounded on
//! `examples/original_source/.../drone/spiral_movement_simulator.py`; the
//! real drone kinematics are out of scope (spec.md §1).

use super::{Agent, AgentEvent};
use crate::config::{SPIRAL_GROWTH, SPIRAL_STEP};
use crate::point::Point2D;
use std::collections::HashMap;
use std::f64::consts::PI;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex as StdMutex};
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;

pub struct SimulatedExplorer {
    tx: mpsc::Sender<AgentEvent>,
    rx: Mutex<mpsc::Receiver<AgentEvent>>,
    stop_requested: Arc<AtomicBool>,
    handle: StdMutex<Option<JoinHandle<()>>>,
    position: Mutex<Point2D>,
}

impl SimulatedExplorer {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel(64);
        Self {
            tx,
            rx: Mutex::new(rx),
            stop_requested: Arc::new(AtomicBool::new(false)),
            handle: StdMutex::new(None),
            position: Mutex::new(Point2D::zero()),
        }
    }

    /// Analytic spiral position at angle `theta`, matching the original's
    /// `r = (growth / 2pi) * theta`.
    fn spiral_point(theta: f64) -> Point2D {
        let dr_dtheta = SPIRAL_GROWTH / (2.0 * PI);
        let r = dr_dtheta * theta;
        Point2D::new(r * theta.cos(), r * theta.sin())
    }
}

impl Default for SimulatedExplorer {
    fn default() -> Self { Self::new() }
}

impl Agent for SimulatedExplorer {
    fn start_routine(self: Arc<Self>, _waypoints: Option<Vec<Point2D>>) {
        self.stop_requested.store(false, Ordering::SeqCst);
        let stop_requested = Arc::clone(&self.stop_requested);
        let tx = self.tx.clone();
        let this = Arc::clone(&self);

        let task = tokio::spawn(async move {
            let mut theta: f64 = 0.0;
            loop {
                if stop_requested.load(Ordering::SeqCst) {
                    break;
                }
                theta += SPIRAL_STEP;
                let point = Self::spiral_point(theta);
                *this.position.lock().await = point;
                if tx.send(AgentEvent::Point(point)).await.is_err() {
                    break;
                }
                tokio::time::sleep(crate::config::ROBOT_SLEEP_TIME).await;
            }
            let _ = tx.send(AgentEvent::Finish).await;
        });

        *self.handle.lock().expect("[FATAL] explorer handle mutex poisoned") = Some(task);
    }

    fn stop_routine(&self) {
        self.stop_requested.store(true, Ordering::SeqCst);
    }

    fn events(&self) -> &Mutex<mpsc::Receiver<AgentEvent>> { &self.rx }

    fn current_position(&self) -> Option<Point2D> {
        self.position.try_lock().ok().map(|g| *g)
    }

    fn telemetry(&self) -> Option<HashMap<String, f64>> { None }
}
