use tracing::debug;

use crate::error::{MqttError, Result};
use crate::types::{push_be_u16, push_utf8, Topic};

use super::{check_packet_identifier, PacketType, ReadablePacket, Suback, WritablePacket};

/// Packet Type 1000 | Reserved 0010
const FLAGS: u8 = 0b0010;

/// Asks the server to deliver messages published to one or more topic filters.
///
/// Variable Header:
///     Packet Identifier
///
/// Payload:
///     for every topic: Topic Filter, requested QoS (1 byte)
///
/// # Examples
///
/// ```
/// use mqttwire::packet::{Subscribe, WritablePacket};
/// use mqttwire::types::{QoS, Topic};
///
/// let subscribe = Subscribe::new(1, vec![
///     Topic::new("sensors/#").unwrap(),
///     Topic::with_qos("alerts", QoS::AtMostOnce).unwrap(),
/// ]).unwrap();
///
/// assert_eq!(0b10000010, subscribe.encode().unwrap()[0]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subscribe {
    packet_identifier: u16,
    topics: Vec<Topic>,
}

impl Subscribe {

    /// Fails with [MqttError::IllegalArgument] if `packet_identifier` is `0` or `topics` is empty.
    pub fn new(packet_identifier: u16, topics: Vec<Topic>) -> Result<Self> {
        check_packet_identifier(PacketType::SUBSCRIBE, packet_identifier)?;
        if topics.is_empty() {
            return Err(MqttError::IllegalArgument("SUBSCRIBE needs at least one topic".into()))
        }
        Ok(Subscribe { packet_identifier, topics })
    }

    pub fn packet_identifier(&self) -> u16 {
        self.packet_identifier
    }

    /// In the order they are sent, which is also the order of the return codes in the [Suback].
    pub fn topics(&self) -> &[Topic] {
        &self.topics
    }
}

impl WritablePacket for Subscribe {
    type Answer = Suback;

    const PACKET_TYPE: PacketType = PacketType::SUBSCRIBE;

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
            push_utf8(topic.topic_name(), &mut payload)?;
            payload.push(topic.topic_qos_level());
        }
        Ok(payload)
    }

    fn expected_answer(&self) -> Option<PacketType> {
        Some(PacketType::SUBACK)
    }

    /// The [Suback] must acknowledge this packet identifier with one return code per topic.
    fn expect_answer(&self, src: &[u8]) -> Result<Suback> {
        let suback = Suback::populate(src)?;

        if suback.packet_identifier() != self.packet_identifier {
            return Err(MqttError::MalformedPacket(format!(
                "SUBACK for packet identifier {} does not match SUBSCRIBE {}",
                suback.packet_identifier(), self.packet_identifier)))
        }

        if suback.return_codes().len() != self.topics.len() {
            return Err(MqttError::MalformedPacket(format!(
                "SUBACK has {} return codes for {} topics", suback.return_codes().len(), self.topics.len())))
        }

        debug!(packet_identifier = self.packet_identifier, return_codes = ?suback.return_codes(), "SUBSCRIBE acknowledged");
        Ok(suback)
    }
}
