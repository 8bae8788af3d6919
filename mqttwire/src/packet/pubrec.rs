use mqttwire_derive::IdentifierAck;

use crate::error::Result;
use crate::types::encode_u16;

use super::{check_answer_identifier, PacketType, Pubrel, ReadablePacket, WritablePacket};

/// `PUBREC` is the first response to a `PUBLISH` with [crate::types::QoS::ExactlyOnce].
///
/// The sequence of messages for QoS 2 is as follows:
/// - `PUBLISH` -->
/// - `PUBREC` <--
/// - `PUBREL` -->
/// - `PUBCOMP` <--
///
/// When the server delivers a QoS 2 message the roles are reversed, which is why the client can also send a
/// `PUBREC` and then expects a [Pubrel].
#[derive(Debug, Clone, Copy, PartialEq, Eq, IdentifierAck)]
#[ack(packet_type = PUBREC)]
pub struct Pubrec {
    packet_identifier: u16,
}

impl WritablePacket for Pubrec {
    type Answer = Pubrel;

    const PACKET_TYPE: PacketType = PacketType::PUBREC;

    fn create_variable_header(&self) -> Result<Vec<u8>> {
        Ok(encode_u16(self.packet_identifier as usize)?.to_vec())
    }

    fn create_payload(&self) -> Result<Vec<u8>> {
        Ok(Vec::new())
    }

    fn expected_answer(&self) -> Option<PacketType> {
        Some(PacketType::PUBREL)
    }

    /// The [Pubrel] must release the message this packet acknowledged.
    fn expect_answer(&self, src: &[u8]) -> Result<Pubrel> {
        let pubrel = Pubrel::populate(src)?;
        check_answer_identifier(
            PacketType::PUBREC, self.packet_identifier, PacketType::PUBREL, pubrel.packet_identifier())?;
        Ok(pubrel)
    }
}
