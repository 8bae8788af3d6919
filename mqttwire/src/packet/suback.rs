use crate::error::{MqttError, Result};
use crate::types::{decode_u16, SubscribeReturnCode};

use super::{FixedHeader, PacketType, ReadablePacket};

/// The server's answer to a [Subscribe](super::Subscribe): one return code per requested topic, in the same order.
///
/// ```text
/// byte 1   | 1001 0000
/// byte 2.. | remaining length
///
/// Variable Header:
///     Packet Identifier
///
/// Payload:
///     return codes, one byte each
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suback {
    packet_identifier: u16,
    return_codes: Vec<SubscribeReturnCode>,
}

impl Suback {

    pub fn packet_identifier(&self) -> u16 {
        self.packet_identifier
    }

    pub fn return_codes(&self) -> &[SubscribeReturnCode] {
        &self.return_codes
    }
}

impl ReadablePacket for Suback {

    fn populate(src: &[u8]) -> Result<Self> {
        let (_, body) = FixedHeader::split(src, PacketType::SUBACK, 0)?;

        let packet_identifier = decode_u16(body)?;
        let codes = &body[2..];
        if codes.is_empty() {
            return Err(MqttError::MalformedPacket("SUBACK must contain at least one return code".into()))
        }

        let return_codes = codes.iter()
            .map(|c| SubscribeReturnCode::try_from(*c))
            .collect::<Result<Vec<SubscribeReturnCode>>>()?;

        Ok(Suback { packet_identifier, return_codes })
    }

    fn packet_type(&self) -> PacketType {
        PacketType::SUBACK
    }
}
