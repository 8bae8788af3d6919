use crate::error::{MqttError, Result};
use crate::types::ConnectReturnCode;

use super::{expect_body_len, FixedHeader, PacketType, ReadablePacket};

const SESSION_PRESENT: u8 = 0b00000001;

/// A `CONNACK` MQTT control packet, the server's answer to a [Connect](super::Connect).
///
/// ```text
/// byte 1 | 0010 0000
/// byte 2 | remaining length, always 2
/// byte 3 | 0000 000x, x = session present
/// byte 4 | return code
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Connack {
    session_present: bool,
    return_code: ConnectReturnCode,
}

impl Connack {

    /// Whether the server resumes a session stored from an earlier connection.
    pub fn session_present(&self) -> bool {
        self.session_present
    }

    /// Indicates whether the connection attempt was successful, and if not why.
    pub fn return_code(&self) -> ConnectReturnCode {
        self.return_code
    }
}

impl ReadablePacket for Connack {

    fn populate(src: &[u8]) -> Result<Self> {
        let (_, body) = FixedHeader::split(src, PacketType::CONNACK, 0)?;
        expect_body_len(PacketType::CONNACK, body, 2)?;

        let acknowledge_flags = body[0];
        if acknowledge_flags & !SESSION_PRESENT != 0 {
            return Err(MqttError::MalformedPacket(
                format!("Reserved bits of the CONNACK acknowledge flags are set: {:08b}", acknowledge_flags)))
        }
        let session_present = acknowledge_flags == SESSION_PRESENT;

        let return_code = ConnectReturnCode::try_from(body[1])?;

        // MQTT-3.2.2-4
        if session_present && return_code.is_err() {
            return Err(MqttError::MalformedPacket(
                format!("Session present must not be set together with return code {}", u8::from(return_code))))
        }

        Ok(Connack { session_present, return_code })
    }

    fn packet_type(&self) -> PacketType {
        PacketType::CONNACK
    }
}
