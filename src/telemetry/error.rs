//! Transient telemetry errors (spec.md §7 "Transient I/O"). Never
//! propagated past the listener loop — logged and swallowed.

#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    #[error("payload too short for packet id {packet_id:#04x}: got {len} bytes, need {expected}")]
    ShortPayload { packet_id: u8, len: usize, expected: usize },
    #[error("unknown packet id {0:#04x}")]
    UnknownPacketId(u8),
    #[error("empty datagram")]
    EmptyDatagram,
}
