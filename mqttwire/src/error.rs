//! Custom error types used throughout the crate.

use thiserror::Error;

use crate::packet::PacketType;

/// Every failure the packet engine can report.
///
/// All of them are local and synchronous: nothing is retried or recovered inside the crate, and a failing
/// operation never leaves a half-built packet behind.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MqttError {

    /// The caller supplied a structurally invalid value, such as an empty topic name.
    #[error("Illegal argument: {0}")]
    IllegalArgument(String),

    /// A value exceeds a size limit fixed by the protocol, e.g. a string longer than 65,535 bytes.
    #[error("Out of bounds: {0}")]
    OutOfBounds(String),

    /// Quality of service outside of `0..=2`.
    #[error("Invalid QoS level: {0}")]
    InvalidQoSLevel(i64),

    /// A value cannot be represented in the wire format, such as a remaining length above 268,435,455.
    #[error("Encoding error: {0}")]
    EncodingError(String),

    /// Received bytes do not conform to the structure of the declared packet type.
    #[error("Malformed Packet: {0}")]
    MalformedPacket(String),

    /// A `CONNECT` packet was serialized before its parameters were attached.
    #[error("No connection parameters defined, they must be set before connecting")]
    NoConnectionParametersDefined,

    /// No readable packet is registered for this control packet type code.
    #[error("Unknown packet type: {0}")]
    UnknownPacketType(u8),

    /// An answer was requested from a packet that the protocol never answers.
    #[error("No answer expected for {0}")]
    NoAnswerExpected(PacketType),
}

impl MqttError {
    pub fn invalid_first_byte(packet_type: PacketType, first_byte: u8) -> Self {
        MqttError::MalformedPacket(format!("Invalid first byte for {}: {:08b}", packet_type, first_byte))
    }
}

/// Shorthand used by every fallible function of this crate.
pub type Result<T> = std::result::Result<T, MqttError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display() {
        assert_eq!("Invalid QoS level: -1", MqttError::InvalidQoSLevel(-1).to_string());
        assert_eq!("Unknown packet type: 15", MqttError::UnknownPacketType(15).to_string());
        assert_eq!(
            "Invalid first byte for CONNACK: 00100001",
            MqttError::invalid_first_byte(PacketType::CONNACK, 0b00100001).to_string());
    }
}
