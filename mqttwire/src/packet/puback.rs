use mqttwire_derive::IdentifierAck;

use crate::error::Result;
use crate::types::encode_u16;

use super::{NoAnswer, PacketType, WritablePacket};

/// `PUBACK` is the response to a `PUBLISH` that was sent with [crate::types::QoS::AtLeastOnce].
///
/// The client receives it for its own QoS 1 messages and sends it for QoS 1 messages delivered by the server.
/// Nothing answers a `PUBACK`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, IdentifierAck)]
#[ack(packet_type = PUBACK)]
pub struct Puback {
    packet_identifier: u16,
}

impl WritablePacket for Puback {
    type Answer = NoAnswer;

    const PACKET_TYPE: PacketType = PacketType::PUBACK;

    fn create_variable_header(&self) -> Result<Vec<u8>> {
        Ok(encode_u16(self.packet_identifier as usize)?.to_vec())
    }

    fn create_payload(&self) -> Result<Vec<u8>> {
        Ok(Vec::new())
    }

    fn expected_answer(&self) -> Option<PacketType> {
        None
    }
}
