//! Binary framing for the telemetry UDP channel (spec.md §6), grounded on
//! `examples/original_source/.../drone/drone_telemetry.py` and
//! `configuration/drone_telemetry.py`. One UDP datagram is one frame; the
//! first byte is the packet id, the rest is a little-endian float payload.

use super::error::TelemetryError;
use crate::config::{PACKET_ID_BATTERY, PACKET_ID_POSE};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub roll: f32,
    pub pitch: f32,
    pub yaw: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TelemetryPacket {
    Battery { voltage: f32 },
    Pose(Pose),
}

const BATTERY_PAYLOAD_LEN: usize = 4;
const POSE_PAYLOAD_LEN: usize = 24;

/// Decodes one UDP datagram's worth of bytes into a packet.
pub fn decode(datagram: &[u8]) -> Result<TelemetryPacket, TelemetryError> {
    let (packet_id, payload) = datagram.split_first().ok_or(TelemetryError::EmptyDatagram)?;

    match *packet_id {
        PACKET_ID_BATTERY => {
            if payload.len() < BATTERY_PAYLOAD_LEN {
                return Err(TelemetryError::ShortPayload {
                    packet_id: *packet_id,
                    len: payload.len(),
                    expected: BATTERY_PAYLOAD_LEN,
                });
            }
            let voltage = f32::from_le_bytes(payload[0..4].try_into().expect("checked length"));
            Ok(TelemetryPacket::Battery { voltage })
        }
        PACKET_ID_POSE => {
            if payload.len() < POSE_PAYLOAD_LEN {
                return Err(TelemetryError::ShortPayload {
                    packet_id: *packet_id,
                    len: payload.len(),
                    expected: POSE_PAYLOAD_LEN,
                });
            }
            let read_f32 = |offset: usize| {
                f32::from_le_bytes(payload[offset..offset + 4].try_into().expect("checked length"))
            };
            Ok(TelemetryPacket::Pose(Pose {
                x: read_f32(0),
                y: read_f32(4),
                z: read_f32(8),
                roll: read_f32(12),
                pitch: read_f32(16),
                yaw: read_f32(20),
            }))
        }
        other => Err(TelemetryError::UnknownPacketId(other)),
    }
}
