//! Operation-wide constants, grounded on
//! `examples/original_source/.../configuration/operation.py`,
//! `configuration/drone_telemetry.py` and `configuration/robot_dog.py`.

use std::time::Duration;

/// Minimum allowed distance between two points retained in the same
/// exploration phase (spec.md §3, Invariant 3).
pub const DRONE_VISIBILITY: f64 = 1.0;

/// Folder into which `metrics::write_snapshot` writes the terminal JSON file.
pub const METRICS_OUTPUT_FOLDER: &str = "results";

/// Default base-positions document path, overridable via the
/// `BASE_POSITIONS_PATH` environment variable.
pub const DEFAULT_BASE_POSITIONS_PATH: &str = "base_positions.json";

/// Default IP address of the drone sending telemetry, overridable via the
/// `DRONE_IP` environment variable at startup.
pub const DEFAULT_DRONE_IP: &str = "127.0.0.1";
/// UDP port on the drone used for the telemetry handshake and outgoing packets.
pub const DRONE_PORT: u16 = 2390;
/// Local UDP port the telemetry listener binds to.
pub const LOCAL_TELEMETRY_PORT: u16 = 2391;

pub const PACKET_ID_BATTERY: u8 = 0x01;
pub const PACKET_ID_POSE: u8 = 0x02;

/// Two-byte handshake packet sent to the drone to start telemetry streaming.
pub const HANDSHAKE_PACKET: [u8; 2] = [0x01, 0x01];
pub const HANDSHAKE_RETRIES: u32 = 3;
pub const HANDSHAKE_RETRY_DELAY: Duration = Duration::from_millis(500);

/// Max UDP datagram size accepted by the telemetry listener.
pub const TELEMETRY_BUFFER_SIZE: usize = 128;
/// Socket receive timeout, short enough to permit cooperative shutdown.
pub const TELEMETRY_RECV_TIMEOUT: Duration = Duration::from_millis(500);

/// Default explorer simulator spiral parameters.
pub const SPIRAL_STEP: f64 = 0.35;
pub const SPIRAL_GROWTH: f64 = 0.12;

/// Inspector (robot-dog) simulator parameters.
pub const ROBOT_DOG_SPEED: f64 = 0.5;
pub const ROBOT_DOG_REACHED_TOLERANCE: f64 = 0.05;
pub const ROBOT_SLEEP_TIME: Duration = Duration::from_millis(100);
pub const ROBOT_DOG_MEAN_TEMPERATURE: f64 = 25.0;
pub const ROBOT_DOG_TEMPERATURE_STDDEV: f64 = 5.0;

/// Selects which [`crate::planner::PathPlanner`] implementation the
/// inspection driver is built with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum PlannerKind {
    NearestNeighbor,
    Exact,
}

impl PlannerKind {
    /// Parses the `PLANNER` selector (spec.md §6 "path-planner
    /// implementation selector"). An unrecognized value is a fail-fast
    /// configuration error (spec.md §7 "planner referring to an unknown
    /// strategy"), never a silent default.
    pub fn parse(value: &str) -> Result<Self, crate::basepositions::ConfigError> {
        match value {
            "nearest-neighbor" => Ok(Self::NearestNeighbor),
            "exact" => Ok(Self::Exact),
            other => Err(crate::basepositions::ConfigError::UnknownPlanner { value: other.to_string() }),
        }
    }
}
