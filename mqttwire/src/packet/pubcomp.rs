use mqttwire_derive::IdentifierAck;

use crate::error::Result;
use crate::types::encode_u16;

use super::{NoAnswer, PacketType, WritablePacket};

/// `PUBCOMP` is the final packet of a [crate::types::QoS::ExactlyOnce] delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, IdentifierAck)]
#[ack(packet_type = PUBCOMP)]
pub struct Pubcomp {
    packet_identifier: u16,
}

impl WritablePacket for Pubcomp {
    type Answer = NoAnswer;

    const PACKET_TYPE: PacketType = PacketType::PUBCOMP;

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

#[cfg(test)]
mod tests {
    use crate::error::MqttError;
    use crate::packet::ReadablePacket;

    use super::*;

    #[test]
    fn encode() -> Result<()> {
        let pubcomp = Pubcomp::new(3);
        assert_eq!(vec![0b01110000, 2, 0, 3], pubcomp.encode()?);
        assert!(!pubcomp.should_expect_answer());
        Ok(())
    }

    #[test]
    fn decode() -> Result<()> {
        assert_eq!(Pubcomp::new(3), Pubcomp::populate(&[0b01110000, 2, 0, 3])?);
        assert!(matches!(Pubcomp::populate(&[0b01110000, 0]), Err(MqttError::MalformedPacket(_))));
        Ok(())
    }
}
