//! Frame/telemetry fan-out (spec.md §4.G), interface-level only — no
//! image-processing logic lives here (spec.md §1). Grounded on
//! `examples/original_source/Kapi_Flie/src/drone/matcher.py` and
//! `examples/original_source/drone/drone_detector/camera_red_detector.py`'s
//! bounded drop-oldest queue.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex as StdMutex};
use tokio::sync::Mutex;

/// An opaque camera frame. The encoding/decoding of the payload is outside
/// this crate's scope; only the byte buffer and its capture timestamp
/// matter to the matcher.
#[derive(Debug, Clone)]
pub struct Frame {
    pub data: Arc<[u8]>,
    pub captured_at: chrono::DateTime<chrono::Utc>,
}

/// A frame paired with the telemetry snapshot taken at capture time.
#[derive(Debug, Clone)]
pub struct FrameWithTelemetry {
    pub frame: Frame,
    pub telemetry: std::collections::HashMap<String, f64>,
}

/// Source of camera frames, polled by the [`Matcher`]. No capture/codec
/// logic is specified here (spec.md §1).
pub trait Camera: Send + Sync {
    fn get_frame(&self) -> Option<Frame>;
}

/// Source of the latest telemetry snapshot, polled by the [`Matcher`].
pub trait Telemetry: Send + Sync {
    fn get_telemetry(&self) -> std::collections::HashMap<String, f64>;
}

/// A sink for matched frames, e.g. the color-detection consumer (spec.md
/// §1: its internal image-processing is out of scope). `enqueue` must
/// never block the matcher's poll loop; a bounded implementation should
/// drop the oldest entry when full, as the original's camera consumers do.
pub trait FrameConsumer: Send + Sync {
    fn enqueue(&self, fwt: FrameWithTelemetry);
}

/// A fixed-capacity ring buffer that drops the oldest frame when full,
/// matching `camera_red_detector.py`'s `Queue.put` / `Full` / `get_nowait`
/// drop-oldest pattern. Reference [`FrameConsumer`] implementation; the
/// color-detection logic that would drain it is out of scope.
pub struct RingBufferConsumer {
    capacity: usize,
    buffer: StdMutex<VecDeque<FrameWithTelemetry>>,
}

impl RingBufferConsumer {
    pub fn new(capacity: usize) -> Self {
        Self { capacity: capacity.max(1), buffer: StdMutex::new(VecDeque::new()) }
    }

    pub fn drain_oldest(&self) -> Option<FrameWithTelemetry> {
        self.buffer.lock().expect("ring buffer mutex poisoned").pop_front()
    }

    pub fn len(&self) -> usize { self.buffer.lock().expect("ring buffer mutex poisoned").len() }
}

impl FrameConsumer for RingBufferConsumer {
    fn enqueue(&self, fwt: FrameWithTelemetry) {
        let mut buffer = self.buffer.lock().expect("ring buffer mutex poisoned");
        if buffer.len() >= self.capacity {
            buffer.pop_front();
        }
        buffer.push_back(fwt);
    }
}

/// Pairs camera frames with telemetry snapshots and fans each pair out to
/// every registered consumer (spec.md §4.G). Polls at a fixed cadence;
/// matching only, no frame processing.
pub struct Matcher {
    camera: Arc<dyn Camera>,
    telemetry: Arc<dyn Telemetry>,
    consumers: Mutex<Vec<Arc<dyn FrameConsumer>>>,
    poll_interval: std::time::Duration,
}

impl Matcher {
    pub fn new(camera: Arc<dyn Camera>, telemetry: Arc<dyn Telemetry>, poll_interval: std::time::Duration) -> Self {
        Self { camera, telemetry, consumers: Mutex::new(Vec::new()), poll_interval }
    }

    pub async fn register_consumer(&self, consumer: Arc<dyn FrameConsumer>) {
        self.consumers.lock().await.push(consumer);
    }

    /// Runs until `cancel` fires, polling the camera and fanning matched
    /// frames out to every registered consumer.
    pub async fn run(&self, cancel: tokio_util::sync::CancellationToken) {
        loop {
            if cancel.is_cancelled() {
                break;
            }
            let Some(frame) = self.camera.get_frame() else {
                tokio::time::sleep(self.poll_interval).await;
                continue;
            };
            let telemetry = self.telemetry.get_telemetry();
            let fwt = FrameWithTelemetry { frame, telemetry };
            for consumer in self.consumers.lock().await.iter() {
                consumer.enqueue(fwt.clone());
            }
            tokio::time::sleep(self.poll_interval).await;
        }
    }
}
