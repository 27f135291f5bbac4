//! Telemetry ingest (spec.md §6, component F), contract-level only — the
//! listener's internal image/vision pipeline is out of scope (spec.md §1).
//! Grounded on `examples/original_source/Kapi_Flie/src/drone/drone_telemetry.py`.

pub mod error;
pub mod wire;

pub use error::TelemetryError;
pub use wire::{decode, Pose, TelemetryPacket};

use crate::config::{
    HANDSHAKE_PACKET, HANDSHAKE_RETRIES, HANDSHAKE_RETRY_DELAY, TELEMETRY_BUFFER_SIZE,
    TELEMETRY_RECV_TIMEOUT,
};
use crate::{error, info, warn};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tokio::net::UdpSocket;
use tokio_util::sync::CancellationToken;

/// The latest telemetry reading, kept as a flat `name -> value` map so the
/// inspector agent can expose it through [`crate::agent::Agent::telemetry`]
/// (a synchronous trait method) without the core depending on the wire
/// format directly. A `std::sync::RwLock` rather than `tokio::sync::RwLock`
/// since it's read from that synchronous call.
#[derive(Debug, Default)]
pub struct TelemetryState {
    latest: RwLock<HashMap<String, f64>>,
}

impl TelemetryState {
    pub fn new() -> Arc<Self> { Arc::new(Self::default()) }

    pub fn snapshot(&self) -> HashMap<String, f64> {
        self.latest.read().expect("telemetry state lock poisoned").clone()
    }

    fn apply(&self, packet: TelemetryPacket) {
        let mut map = self.latest.write().expect("telemetry state lock poisoned");
        match packet {
            TelemetryPacket::Battery { voltage } => {
                map.insert("battery_voltage".to_string(), f64::from(voltage));
            }
            TelemetryPacket::Pose(pose) => {
                map.insert("x".to_string(), f64::from(pose.x));
                map.insert("y".to_string(), f64::from(pose.y));
                map.insert("z".to_string(), f64::from(pose.z));
                map.insert("roll".to_string(), f64::from(pose.roll));
                map.insert("pitch".to_string(), f64::from(pose.pitch));
                map.insert("yaw".to_string(), f64::from(pose.yaw));
            }
        }
    }
}

/// Sends the two-byte handshake to the drone's UDP endpoint, retrying
/// `HANDSHAKE_RETRIES` times with `HANDSHAKE_RETRY_DELAY` between attempts
/// (spec.md §6).
async fn send_handshake(socket: &UdpSocket, drone_addr: std::net::SocketAddr) {
    for attempt in 1..=HANDSHAKE_RETRIES {
        match socket.send_to(&HANDSHAKE_PACKET, drone_addr).await {
            Ok(_) => info!("telemetry: handshake sent to {drone_addr} (attempt {attempt})"),
            Err(err) => warn!("telemetry: handshake send failed (attempt {attempt}): {err}"),
        }
        tokio::time::sleep(HANDSHAKE_RETRY_DELAY).await;
    }
}

/// Binds a UDP listener, performs the handshake, and updates `state` with
/// every decoded packet until `cancel` fires. Unknown ids and short
/// payloads are logged and dropped (spec.md §7 "Transient I/O"); a fatal
/// socket error after bind is logged critical and ends the listener while
/// the rest of the core continues on stale telemetry (spec.md §7).
pub async fn run_listener(
    local_port: u16,
    drone_addr: std::net::SocketAddr,
    state: Arc<TelemetryState>,
    cancel: CancellationToken,
) {
    let socket = match UdpSocket::bind(("0.0.0.0", local_port)).await {
        Ok(socket) => socket,
        Err(err) => {
            error!("telemetry: fatal bind error on port {local_port}: {err}");
            return;
        }
    };
    info!("telemetry: listening on port {local_port}");

    send_handshake(&socket, drone_addr).await;

    let mut buf = vec![0u8; TELEMETRY_BUFFER_SIZE];
    loop {
        if cancel.is_cancelled() {
            break;
        }
        let recv = tokio::time::timeout(TELEMETRY_RECV_TIMEOUT, socket.recv_from(&mut buf)).await;
        match recv {
            Ok(Ok((len, _addr))) => match decode(&buf[..len]) {
                Ok(packet) => state.apply(packet),
                Err(err) => warn!("telemetry: dropping datagram: {err}"),
            },
            Ok(Err(err)) => {
                error!("telemetry: fatal socket error: {err}");
                break;
            }
            Err(_elapsed) => continue,
        }
    }
    info!("telemetry: listener stopped");
}
