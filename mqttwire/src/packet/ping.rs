use crate::error::Result;

use super::{expect_body_len, FixedHeader, PacketType, ReadablePacket, WritablePacket};

/// Keeps the connection alive, the server answers with a [Pingresp]. Always exactly `[0xC0, 0x00]`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Pingreq;

/// The server's answer to a [Pingreq]. Always exactly `[0xD0, 0x00]`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Pingresp;

impl WritablePacket for Pingreq {
    type Answer = Pingresp;

    const PACKET_TYPE: PacketType = PacketType::PINGREQ;

    fn create_variable_header(&self) -> Result<Vec<u8>> {
        Ok(Vec::new())
    }

    fn create_payload(&self) -> Result<Vec<u8>> {
        Ok(Vec::new())
    }

    fn expected_answer(&self) -> Option<PacketType> {
        Some(PacketType::PINGRESP)
    }
}

impl ReadablePacket for Pingresp {

    fn populate(src: &[u8]) -> Result<Self> {
        let (_, body) = FixedHeader::split(src, PacketType::PINGRESP, 0)?;
        expect_body_len(PacketType::PINGRESP, body, 0)?;
        Ok(Pingresp)
    }

    fn packet_type(&self) -> PacketType {
        PacketType::PINGRESP
    }
}
