use mqttwire_derive::IdentifierAck;

use crate::error::Result;
use crate::types::encode_u16;

use super::{check_answer_identifier, PacketType, Pubcomp, ReadablePacket, WritablePacket};

/// `PUBREL` is the response to a [`PUBREC`](crate::packet::Pubrec).
/// Applies only to messages published with [crate::types::QoS::ExactlyOnce].
///
/// Its fixed header flags are always `0010`, anything else is a malformed packet (MQTT-3.6.1-1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, IdentifierAck)]
#[ack(packet_type = PUBREL, flags = 0b0010)]
pub struct Pubrel {
    packet_identifier: u16,
}

impl WritablePacket for Pubrel {
    type Answer = Pubcomp;

    const PACKET_TYPE: PacketType = PacketType::PUBREL;

    fn flags(&self) -> u8 {
        Self::FLAGS
    }

    fn create_variable_header(&self) -> Result<Vec<u8>> {
        Ok(encode_u16(self.packet_identifier as usize)?.to_vec())
    }

    fn create_payload(&self) -> Result<Vec<u8>> {
        Ok(Vec::new())
    }

    fn expected_answer(&self) -> Option<PacketType> {
        Some(PacketType::PUBCOMP)
    }

    fn expect_answer(&self, src: &[u8]) -> Result<Pubcomp> {
        let pubcomp = Pubcomp::populate(src)?;
        check_answer_identifier(
            PacketType::PUBREL, self.packet_identifier, PacketType::PUBCOMP, pubcomp.packet_identifier())?;
        Ok(pubcomp)
    }
}
