//! Representations of MQTT v3.1.1 control packets.
//! Includes serialization and deserialization of packets into and from binary.
//!
//! Every packet a client sends implements [WritablePacket]: it produces its variable header and payload, the fixed
//! header is computed from those, and it declares which answer (if any) the server owes for it. Every packet a
//! client receives implements [ReadablePacket] and is built exactly once from the raw bytes, validating as it goes.
//! Some packets, like [Puback], travel in both directions and implement both. A packet is an immutable value either
//! way: the one built with `new` for sending and the one returned by [ReadablePacket::populate] are the same type,
//! and nothing turns a received packet into one being sent or back.
//!
//! Unsolicited traffic from the server is resolved to the right packet type through [dispatch()].

mod connack;
mod connect;
mod disconnect;
mod ping;
mod puback;
mod pubcomp;
mod publish;
mod pubrec;
mod pubrel;
mod registry;
mod suback;
mod subscribe;
mod unsuback;
mod unsubscribe;

use std::fmt::Display;

use tracing::trace;

use crate::error::{MqttError, Result};
use crate::types::{Decodeable, MqttDataType, VariableByteInteger};

pub use self::connack::Connack;
pub use self::connect::{Connect, ConnectParameters, LastWill, PROTOCOL_LEVEL, PROTOCOL_NAME};
pub use self::disconnect::Disconnect;
pub use self::ping::{Pingreq, Pingresp};
pub use self::puback::Puback;
pub use self::pubcomp::Pubcomp;
pub use self::publish::{Publish, PublishAck};
pub use self::pubrec::Pubrec;
pub use self::pubrel::Pubrel;
pub use self::registry::{dispatch, Incoming};
pub use self::suback::Suback;
pub use self::subscribe::Subscribe;
pub use self::unsuback::Unsuback;
pub use self::unsubscribe::Unsubscribe;

/// MQTT control packet types, the upper four bits of the first byte.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum PacketType {
    CONNECT = 1,
    CONNACK = 2,
    PUBLISH = 3,
    PUBACK = 4,
    PUBREC = 5,
    PUBREL = 6,
    PUBCOMP = 7,
    SUBSCRIBE = 8,
    SUBACK = 9,
    UNSUBSCRIBE = 10,
    UNSUBACK = 11,
    PINGREQ = 12,
    PINGRESP = 13,
    DISCONNECT = 14,
}

impl PacketType {

    /// The numeric type code, `1..=14`.
    pub fn code(&self) -> u8 {
        *self as u8
    }
}

impl TryFrom<u8> for PacketType {
    type Error = MqttError;

    /// Expects the full first byte of a packet, the last four bits (flags) are ignored.
    fn try_from(value: u8) -> Result<Self> {
        let shifted = value >> 4;

        match shifted {
            1 => Ok(PacketType::CONNECT),
            2 => Ok(PacketType::CONNACK),
            3 => Ok(PacketType::PUBLISH),
            4 => Ok(PacketType::PUBACK),
            5 => Ok(PacketType::PUBREC),
            6 => Ok(PacketType::PUBREL),
            7 => Ok(PacketType::PUBCOMP),
            8 => Ok(PacketType::SUBSCRIBE),
            9 => Ok(PacketType::SUBACK),
            10 => Ok(PacketType::UNSUBSCRIBE),
            11 => Ok(PacketType::UNSUBACK),
            12 => Ok(PacketType::PINGREQ),
            13 => Ok(PacketType::PINGRESP),
            14 => Ok(PacketType::DISCONNECT),
            _=> Err(MqttError::UnknownPacketType(shifted)),
        }
    }
}

impl Display for PacketType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match *self {
            PacketType::CONNECT => write!(f, "CONNECT"),
            PacketType::CONNACK => write!(f, "CONNACK"),
            PacketType::PUBLISH => write!(f, "PUBLISH"),
            PacketType::PUBACK => write!(f, "PUBACK"),
            PacketType::PUBREC => write!(f, "PUBREC"),
            PacketType::PUBREL => write!(f, "PUBREL"),
            PacketType::PUBCOMP => write!(f, "PUBCOMP"),
            PacketType::SUBSCRIBE => write!(f, "SUBSCRIBE"),
            PacketType::SUBACK => write!(f, "SUBACK"),
            PacketType::UNSUBSCRIBE => write!(f, "UNSUBSCRIBE"),
            PacketType::UNSUBACK => write!(f, "UNSUBACK"),
            PacketType::PINGREQ => write!(f, "PINGREQ"),
            PacketType::PINGRESP => write!(f, "PINGRESP"),
            PacketType::DISCONNECT => write!(f, "DISCONNECT"),
        }
    }
}

const FLAGS_MASK: u8 = 0b00001111;

/// The fixed header present in every MQTT control packet, MQTT-2.2.
///
/// ```text
/// bit    | 7 6 5 4          | 3 2 1 0 |
/// byte 1 | packet type      | flags   |
/// byte 2 | remaining length (1-4 bytes)
/// ```
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct FixedHeader {
    packet_type: PacketType,
    flags: u8,
    remaining_length: VariableByteInteger,
}

impl FixedHeader {

    /// Fails with [MqttError::EncodingError] if `remaining_length` cannot be represented in four bytes.
    pub fn new(packet_type: PacketType, flags: u8, remaining_length: usize) -> Result<Self> {
        Ok(Self {
            packet_type,
            flags: flags & FLAGS_MASK,
            remaining_length: VariableByteInteger::try_from(remaining_length)?,
        })
    }

    pub fn packet_type(&self) -> PacketType {
        self.packet_type
    }

    pub fn flags(&self) -> u8 {
        self.flags
    }

    /// Number of bytes of variable header and payload following the fixed header.
    pub fn remaining_length(&self) -> usize {
        self.remaining_length.value() as usize
    }

    pub fn first_byte(&self) -> u8 {
        self.packet_type.code() << 4 | self.flags
    }

    /// Returns the total length of the first packet in `src` if all of its bytes are present, or `None` if more
    /// bytes are needed to tell or to complete it. Meant for transports reading from a stream.
    pub fn frame_len(src: &[u8]) -> Result<Option<usize>> {
        if src.len() < 2 {
            return Ok(None)
        }

        match VariableByteInteger::decode(&src[1..]) {
            Ok(res) => {
                let total = 1 + res.bytes_read() + res.value().value() as usize;
                if src.len() >= total { Ok(Some(total)) } else { Ok(None) }
            },
            // still waiting for the rest of the remaining length
            Err(_) if src.len() < 5 && src[1..].iter().all(|b| b & 0b10000000 != 0) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Parses the fixed header of a packet that must be of type `expected` with exactly `flags` set, and returns it
    /// along with the variable header and payload.
    ///
    /// `src` must hold exactly one packet: the remaining length has to match the number of bytes that follow.
    pub(crate) fn split(src: &[u8], expected: PacketType, flags: u8) -> Result<(FixedHeader, &[u8])> {
        let (header, body) = FixedHeader::split_any_flags(src, expected)?;
        if header.flags != flags {
            return Err(MqttError::invalid_first_byte(expected, src[0]))
        }
        Ok((header, body))
    }

    /// Same as [FixedHeader::split()] but leaves checking the flags to the caller.
    pub(crate) fn split_any_flags(src: &[u8], expected: PacketType) -> Result<(FixedHeader, &[u8])> {
        let first_byte = match src.first() {
            Some(b) => *b,
            None => return Err(MqttError::MalformedPacket(format!("Empty buffer for {}", expected))),
        };

        match PacketType::try_from(first_byte) {
            Ok(t) if t == expected => {},
            _=> return Err(MqttError::invalid_first_byte(expected, first_byte)),
        }

        let (remaining_length, length_bytes) = VariableByteInteger::decode(&src[1..])?.into_parts();
        let header = FixedHeader {
            packet_type: expected,
            flags: first_byte & FLAGS_MASK,
            remaining_length,
        };
        trace!(packet_type = %expected, remaining_length = header.remaining_length(), "decoded fixed header");

        let body = &src[1 + length_bytes..];
        if body.len() != header.remaining_length() {
            return Err(MqttError::MalformedPacket(format!(
                "{} declares a remaining length of {} but {} bytes follow", expected, header.remaining_length(), body.len())))
        }

        Ok((header, body))
    }
}

impl MqttDataType for FixedHeader {
    fn encoded_len(&self) -> usize {
        1 + self.remaining_length.encoded_len()
    }
}

impl From<FixedHeader> for Vec<u8> {
    fn from(header: FixedHeader) -> Self {
        let mut result = Vec::with_capacity(header.encoded_len());
        result.push(header.first_byte());
        result.append(&mut header.remaining_length.into());
        result
    }
}

/// A packet sent by the client.
///
/// Implementations only describe their own variable header and payload, the complete binary form is assembled by
/// [WritablePacket::encode()] as fixed header, variable header and payload in that order.
pub trait WritablePacket {

    /// The packet the server answers with, or [NoAnswer].
    type Answer: ReadablePacket;

    /// Which packet this is.
    const PACKET_TYPE: PacketType;

    /// The lower four bits of the first byte.
    fn flags(&self) -> u8 {
        0
    }

    fn create_variable_header(&self) -> Result<Vec<u8>>;

    fn create_payload(&self) -> Result<Vec<u8>>;

    /// Type and flags byte followed by the remaining length of variable header and payload.
    fn fixed_header(&self) -> Result<Vec<u8>> {
        let length = self.create_variable_header()?.len() + self.create_payload()?.len();
        Ok(FixedHeader::new(Self::PACKET_TYPE, self.flags(), length)?.into())
    }

    /// Which packet type the server must reply with, `None` if the protocol mandates no reply.
    fn expected_answer(&self) -> Option<PacketType>;

    fn should_expect_answer(&self) -> bool {
        self.expected_answer().is_some()
    }

    /// Builds the reply to this packet out of the bytes received from the server.
    ///
    /// Fails with [MqttError::NoAnswerExpected] if [WritablePacket::should_expect_answer()] is `false`, and with
    /// [MqttError::MalformedPacket] if `src` is not a well-formed packet of the expected type.
    fn expect_answer(&self, src: &[u8]) -> Result<Self::Answer> {
        if !self.should_expect_answer() {
            return Err(MqttError::NoAnswerExpected(Self::PACKET_TYPE))
        }
        Self::Answer::populate(src)
    }

    /// The complete packet, ready to be written to the wire.
    fn encode(&self) -> Result<Vec<u8>> {
        let mut variable_header = self.create_variable_header()?;
        let mut payload = self.create_payload()?;

        let header = FixedHeader::new(Self::PACKET_TYPE, self.flags(), variable_header.len() + payload.len())?;
        let mut packet: Vec<u8> = Vec::with_capacity(header.encoded_len() + header.remaining_length());
        packet.append(&mut header.into());
        packet.append(&mut variable_header);
        packet.append(&mut payload);

        Ok(packet)
    }
}

/// A packet received from the server.
///
/// There is no empty intermediate state: a value only exists once it was successfully parsed, and it is never
/// changed afterwards.
pub trait ReadablePacket: Sized {

    /// Parses fixed header, variable header and payload from `src`, which must contain exactly one packet.
    fn populate(src: &[u8]) -> Result<Self>;

    fn packet_type(&self) -> PacketType;
}

/// The [WritablePacket::Answer] of packets the server never replies to. It has no values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoAnswer {}

impl ReadablePacket for NoAnswer {
    fn populate(_: &[u8]) -> Result<Self> {
        Err(MqttError::MalformedPacket("No answer is defined for this packet".into()))
    }

    fn packet_type(&self) -> PacketType {
        match *self {}
    }
}

/// Fails with [MqttError::MalformedPacket] unless `body` (everything after the fixed header) is exactly `len` bytes.
fn expect_body_len(packet_type: PacketType, body: &[u8], len: usize) -> Result<()> {
    if body.len() != len {
        return Err(MqttError::MalformedPacket(
            format!("{} must have a remaining length of {}, got {}", packet_type, len, body.len())))
    }
    Ok(())
}

/// Packet identifiers of `SUBSCRIBE`, `UNSUBSCRIBE` and `PUBLISH` with QoS > 0 must be non-zero, MQTT-2.3.1-1.
fn check_packet_identifier(packet_type: PacketType, packet_identifier: u16) -> Result<()> {
    if packet_identifier == 0 {
        return Err(MqttError::IllegalArgument(format!("{} requires a non-zero packet identifier", packet_type)))
    }
    Ok(())
}

/// Fails with [MqttError::MalformedPacket] unless an answer acknowledges the packet identifier of its request.
fn check_answer_identifier(request: PacketType, expected: u16, answer: PacketType, actual: u16) -> Result<()> {
    if expected != actual {
        return Err(MqttError::MalformedPacket(
            format!("{} for packet identifier {} does not match {} {}", answer, actual, request, expected)))
    }
    Ok(())
}
