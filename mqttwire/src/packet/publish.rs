use tracing::debug;

use crate::error::{MqttError, Result};
use crate::types::{decode_u16, push_be_u16, push_utf8, Decodeable, QoS, TopicName, UTF8String};

use super::{check_packet_identifier, FixedHeader, PacketType, Puback, Pubrec, ReadablePacket, WritablePacket};

const DUP_FLAG: u8 = 0b1000;
const QOS_MASK: u8 = 0b0110;
const QOS_SHIFT: u8 = 1;
const RETAIN_FLAG: u8 = 0b0001;

/// An application message, sent by either side.
///
/// ```text
/// byte 1   | 0011 dqqr  (d = DUP, qq = QoS, r = RETAIN)
/// byte 2.. | remaining length
///
/// Variable Header:
///     Topic Name
///     Packet Identifier (only for QoS 1 and 2)
///
/// Payload:
///     the message, everything up to the end of the packet
/// ```
///
/// # Examples
///
/// ```
/// use mqttwire::packet::{Publish, WritablePacket};
/// use mqttwire::types::QoS;
///
/// let publish = Publish::new("sensors/kitchen", b"21.5".to_vec()).unwrap()
///     .with_qos(QoS::AtLeastOnce, 10).unwrap()
///     .retain(true);
///
/// assert_eq!(0b00110011, publish.encode().unwrap()[0]);
/// assert!(publish.should_expect_answer());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Publish {
    topic_name: TopicName,
    qos: QoS,
    packet_identifier: Option<u16>,
    dup: bool,
    retain: bool,
    payload: Vec<u8>,
}

impl Publish {

    /// A QoS 0 message. Fails with [MqttError::IllegalArgument] if the topic is empty or contains wildcards.
    pub fn new<S: Into<String>>(topic_name: S, payload: Vec<u8>) -> Result<Self> {
        Ok(Publish {
            topic_name: TopicName::for_publish(topic_name)?,
            qos: QoS::AtMostOnce,
            packet_identifier: None,
            dup: false,
            retain: false,
            payload,
        })
    }

    /// Sets the delivery QoS. For QoS 1 and 2 `packet_identifier` must be non-zero, for QoS 0 it is ignored.
    pub fn with_qos(mut self, qos: QoS, packet_identifier: u16) -> Result<Self> {
        if qos == QoS::AtMostOnce {
            if self.dup {
                return Err(MqttError::IllegalArgument("DUP must not be set for QoS 0 messages".into()))
            }
            self.packet_identifier = None;
        } else {
            check_packet_identifier(PacketType::PUBLISH, packet_identifier)?;
            self.packet_identifier = Some(packet_identifier);
        }
        self.qos = qos;
        Ok(self)
    }

    pub fn retain(mut self, retain: bool) -> Self {
        self.retain = retain;
        self
    }

    /// Marks the message as a redelivery. Only allowed for QoS 1 and 2, MQTT-3.3.1-2.
    pub fn dup(mut self, dup: bool) -> Result<Self> {
        if dup && self.qos == QoS::AtMostOnce {
            return Err(MqttError::IllegalArgument("DUP must not be set for QoS 0 messages".into()))
        }
        self.dup = dup;
        Ok(self)
    }

    pub fn topic_name(&self) -> &str {
        self.topic_name.as_str()
    }

    pub fn qos(&self) -> QoS {
        self.qos
    }

    /// `None` for QoS 0.
    pub fn packet_identifier(&self) -> Option<u16> {
        self.packet_identifier
    }

    pub fn is_dup(&self) -> bool {
        self.dup
    }

    pub fn is_retained(&self) -> bool {
        self.retain
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    fn fixed_header_flags(&self) -> u8 {
        let mut flags = self.qos.level() << QOS_SHIFT;
        if self.dup {
            flags |= DUP_FLAG;
        }
        if self.retain {
            flags |= RETAIN_FLAG;
        }
        flags
    }
}

/// The acknowledgement of a [Publish], depending on its QoS.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishAck {
    /// QoS 1
    Puback(Puback),
    /// QoS 2, first step
    Pubrec(Pubrec),
}

impl PublishAck {

    pub fn packet_identifier(&self) -> u16 {
        match self {
            PublishAck::Puback(p) => p.packet_identifier(),
            PublishAck::Pubrec(p) => p.packet_identifier(),
        }
    }
}

impl ReadablePacket for PublishAck {

    /// Accepts either a `PUBACK` or a `PUBREC`.
    fn populate(src: &[u8]) -> Result<Self> {
        match src.first().map(|b| PacketType::try_from(*b)) {
            Some(Ok(PacketType::PUBREC)) => Ok(PublishAck::Pubrec(Pubrec::populate(src)?)),
            _=> Ok(PublishAck::Puback(Puback::populate(src)?)),
        }
    }

    fn packet_type(&self) -> PacketType {
        match self {
            PublishAck::Puback(p) => p.packet_type(),
            PublishAck::Pubrec(p) => p.packet_type(),
        }
    }
}

impl WritablePacket for Publish {
    type Answer = PublishAck;

    const PACKET_TYPE: PacketType = PacketType::PUBLISH;

    fn flags(&self) -> u8 {
        self.fixed_header_flags()
    }

    fn create_variable_header(&self) -> Result<Vec<u8>> {
        let mut header = Vec::with_capacity(self.topic_name.as_str().len() + 4);
        push_utf8(self.topic_name.as_str(), &mut header)?;
        if let Some(id) = self.packet_identifier {
            push_be_u16(id, &mut header);
        }
        Ok(header)
    }

    fn create_payload(&self) -> Result<Vec<u8>> {
        Ok(self.payload.clone())
    }

    fn expected_answer(&self) -> Option<PacketType> {
        match self.qos {
            QoS::AtMostOnce => None,
            QoS::AtLeastOnce => Some(PacketType::PUBACK),
            QoS::ExactlyOnce => Some(PacketType::PUBREC),
        }
    }

    /// Only the acknowledgement matching the QoS is accepted, and it has to carry the same packet identifier.
    fn expect_answer(&self, src: &[u8]) -> Result<PublishAck> {
        let answer = match self.qos {
            QoS::AtMostOnce => return Err(MqttError::NoAnswerExpected(PacketType::PUBLISH)),
            QoS::AtLeastOnce => PublishAck::Puback(Puback::populate(src)?),
            QoS::ExactlyOnce => PublishAck::Pubrec(Pubrec::populate(src)?),
        };

        if Some(answer.packet_identifier()) != self.packet_identifier {
            return Err(MqttError::MalformedPacket(format!(
                "{} for packet identifier {} does not match PUBLISH {:?}",
                answer.packet_type(), answer.packet_identifier(), self.packet_identifier)))
        }

        debug!(packet_type = %answer.packet_type(), packet_identifier = answer.packet_identifier(), "PUBLISH acknowledged");
        Ok(answer)
    }
}

impl ReadablePacket for Publish {

    fn populate(src: &[u8]) -> Result<Self> {
        let (header, body) = FixedHeader::split_any_flags(src, PacketType::PUBLISH)?;
        let flags = header.flags();

        let qos = QoS::try_from((flags & QOS_MASK) >> QOS_SHIFT)
            .map_err(|_| MqttError::invalid_first_byte(PacketType::PUBLISH, src[0]))?;
        let dup = flags & DUP_FLAG != 0;
        if dup && qos == QoS::AtMostOnce {
            return Err(MqttError::invalid_first_byte(PacketType::PUBLISH, src[0]))
        }
        let retain = flags & RETAIN_FLAG != 0;

        let (topic, mut cursor) = UTF8String::decode(body)?.into_parts();
        let topic_name = TopicName::for_publish(String::from(topic))
            .map_err(|e| MqttError::MalformedPacket(format!("Invalid PUBLISH topic name: {}", e)))?;

        let packet_identifier = if qos == QoS::AtMostOnce {
            None
        } else {
            let id = decode_u16(&body[cursor..])?;
            if id == 0 {
                return Err(MqttError::MalformedPacket("PUBLISH with QoS > 0 has packet identifier 0".into()))
            }
            cursor += 2;
            Some(id)
        };

        Ok(Publish {
            topic_name,
            qos,
            packet_identifier,
            dup,
            retain,
            payload: body[cursor..].to_vec(),
        })
    }

    fn packet_type(&self) -> PacketType {
        PacketType::PUBLISH
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_qos0() -> Result<()> {
        let publish = Publish::new("a/b", b"hi".to_vec())?;
        let expect: Vec<u8> = vec![
            0b00110000,
            7,
            0, 3, 97, 47, 98, // a/b
            104, 105, // hi
        ];
        assert_eq!(expect, publish.encode()?);
        assert!(!publish.should_expect_answer());
        assert_eq!(Err(MqttError::NoAnswerExpected(PacketType::PUBLISH)), publish.expect_answer(&[0b01000000, 2, 0, 1]));
        Ok(())
    }

    #[test]
    fn encode_qos2_dup_retain() -> Result<()> {
        let publish = Publish::new("a", vec![])?
            .with_qos(QoS::ExactlyOnce, 513)?
            .dup(true)?
            .retain(true);
        assert_eq!(vec![0b00111101, 5, 0, 1, 97, 2, 1], publish.encode()?);
        assert_eq!(Some(PacketType::PUBREC), publish.expected_answer());
        Ok(())
    }

    #[test]
    fn invalid_construction() -> Result<()> {
        assert!(matches!(Publish::new("", vec![]), Err(MqttError::IllegalArgument(_))));
        assert!(matches!(Publish::new("a/#", vec![]), Err(MqttError::IllegalArgument(_))));
        assert!(matches!(Publish::new("a", vec![])?.with_qos(QoS::AtLeastOnce, 0), Err(MqttError::IllegalArgument(_))));
        assert!(matches!(Publish::new("a", vec![])?.dup(true), Err(MqttError::IllegalArgument(_))));
        Ok(())
    }

    #[test]
    fn expect_matching_ack() -> Result<()> {
        let publish = Publish::new("a", vec![1])?.with_qos(QoS::AtLeastOnce, 5)?;
        assert_eq!(PublishAck::Puback(Puback::new(5)), publish.expect_answer(&[0b01000000, 2, 0, 5])?);

        // wrong identifier
        assert!(matches!(publish.expect_answer(&[0b01000000, 2, 0, 6]), Err(MqttError::MalformedPacket(_))));
        // PUBREC for a QoS 1 message
        assert!(matches!(publish.expect_answer(&[0b01010000, 2, 0, 5]), Err(MqttError::MalformedPacket(_))));

        let publish = Publish::new("a", vec![1])?.with_qos(QoS::ExactlyOnce, 5)?;
        assert_eq!(PublishAck::Pubrec(Pubrec::new(5)), publish.expect_answer(&[0b01010000, 2, 0, 5])?);
        Ok(())
    }

    #[test]
    fn decode() -> Result<()> {
        let publish = Publish::populate(&[0b00110011, 8, 0, 3, 97, 47, 98, 0, 10, 42])?;
        assert_eq!("a/b", publish.topic_name());
        assert_eq!(QoS::AtLeastOnce, publish.qos());
        assert_eq!(Some(10), publish.packet_identifier());
        assert!(publish.is_retained());
        assert!(!publish.is_dup());
        assert_eq!(&[42_u8], publish.payload());

        let publish = Publish::populate(&[0b00110000, 3, 0, 1, 97])?;
        assert_eq!(None, publish.packet_identifier());
        assert!(publish.payload().is_empty());
        Ok(())
    }

    #[test]
    fn decode_malformed() {
        // QoS 3
        do_test_malformed(&[0b00110110, 5, 0, 1, 97, 0, 1]);
        // DUP with QoS 0
        do_test_malformed(&[0b00111000, 3, 0, 1, 97]);
        // topic longer than the packet
        do_test_malformed(&[0b00110000, 3, 0, 5, 97]);
        // missing packet identifier
        do_test_malformed(&[0b00110010, 4, 0, 1, 97, 0]);
        // zero packet identifier
        do_test_malformed(&[0b00110010, 5, 0, 1, 97, 0, 0]);
        // wildcard in topic
        do_test_malformed(&[0b00110000, 3, 0, 1, 35]);
        // invalid UTF-8 in topic
        do_test_malformed(&[0b00110000, 4, 0, 2, 0xC0, 0xAF]);
        // remaining length mismatch
        do_test_malformed(&[0b00110000, 9, 0, 1, 97]);
    }

    #[test]
    fn encode_then_populate() -> Result<()> {
        let publish = Publish::new("/Föllinge/𠜎", vec![0, 255, 7])?.with_qos(QoS::ExactlyOnce, 65535)?;
        assert_eq!(publish, Publish::populate(&publish.encode()?)?);
        Ok(())
    }

    fn do_test_malformed(src: &[u8]) {
        let res = Publish::populate(src);
        assert!(matches!(res, Err(MqttError::MalformedPacket(_))), "{:?}: {:?}", src, res);
    }
}
