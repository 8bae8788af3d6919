use crate::error::{MqttError, Result};
use crate::types::{push_be_u16, push_utf8, TopicName};

use super::{check_answer_identifier, check_packet_identifier, PacketType, ReadablePacket, Unsuback, WritablePacket};

const FLAGS: u8 = 0b0010;

/// Removes one or more subscriptions. Topic filters are sent without QoS.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unsubscribe {
    packet_identifier: u16,
    topics: Vec<TopicName>,
}

impl Unsubscribe {

    /// Fails with [MqttError::IllegalArgument] if `packet_identifier` is `0` or `topics` is empty.
    pub fn new(packet_identifier: u16, topics: Vec<TopicName>) -> Result<Self> {
        check_packet_identifier(PacketType::UNSUBSCRIBE, packet_identifier)?;
        if topics.is_empty() {
            return Err(MqttError::IllegalArgument("UNSUBSCRIBE needs at least one topic".into()))
        }
        Ok(Unsubscribe { packet_identifier, topics })
    }

    pub fn packet_identifier(&self) -> u16 {
        self.packet_identifier
    }

    pub fn topics(&self) -> &[TopicName] {
        &self.topics
    }
}

impl WritablePacket for Unsubscribe {
    type Answer = Unsuback;

    const PACKET_TYPE: PacketType = PacketType::UNSUBSCRIBE;

    fn flags(&self) -> u8 {
        FLAGS
    }

    fn create_variable_header(&self) -> Result<Vec<u8>> {
        let mut header = Vec::with_capacity(2);
        push_be_u16(self.packet_identifier, &mut header);
        Ok(header)
    }

    fn create_payload(&self) -> Result<Vec<u8>> {
        let mut payload = Vec::new();
        for topic in &self.topics {
            push_utf8(topic.as_str(), &mut payload)?;
        }
        Ok(payload)
    }

    fn expected_answer(&self) -> Option<PacketType> {
        Some(PacketType::UNSUBACK)
    }

    fn expect_answer(&self, src: &[u8]) -> Result<Unsuback> {
        let unsuback = Unsuback::populate(src)?;
        check_answer_identifier(
            PacketType::UNSUBSCRIBE, self.packet_identifier, PacketType::UNSUBACK, unsuback.packet_identifier())?;
        Ok(unsuback)
    }
}
