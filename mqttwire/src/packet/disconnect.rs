use crate::error::Result;

use super::{NoAnswer, PacketType, WritablePacket};

/// The last packet a client sends before closing the network connection. Has no variable header, no payload,
/// and is never answered.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Disconnect;

impl WritablePacket for Disconnect {
    type Answer = NoAnswer;

    const PACKET_TYPE: PacketType = PacketType::DISCONNECT;

    fn create_variable_header(&self) -> Result<Vec<u8>> {
        Ok(Vec::new())
    }

    fn create_payload(&self) -> Result<Vec<u8>> {
        Ok(Vec::new())
    }

    fn expected_answer(&self) -> Option<PacketType> {
        None
    }
}
