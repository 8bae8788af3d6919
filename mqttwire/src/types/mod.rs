//! MQTT data types and representations.
//!
//! These types all map more or less to rust data types directly,
//! and exist as a bridge to the binary-level protocol.
//!
//! | MQTT type | rust type | Crate type | Description |
//! | --------- | --------- | ---------- | ----------- |
//! | Bits | [u8] | - | Big-Endian single byte |
//! | 2 Byte Int | [u16] | - | Unsigned 16-bit integer (Big-Endian), see [encode_u16] and [decode_u16] |
//! | Remaining Length | [u32] | [VariableByteInteger] | Unsigned integer represented in one to four bytes, depending on the value |
//! | Binary Data | `Vec<u8>` | [BinaryData] | A sequence of bytes, max length is 65,535 |
//! | UTF-8 String | [String] | [UTF8String] | Max length 65,535 bytes (not characters!) |
//!
//! On top of the wire primitives sit the validated value types [QoS], [TopicName] and [Topic]. They can only be
//! created through constructors that check every protocol constraint, so an existing value is always valid.
//!
//! # Integers
//! The simpler integer types (`u8`, `u16`) will use whatever Endianness the platform is using, however they
//! will always be Big-Endian in their encoded form.

mod bytes;
mod codes;
mod integer;
mod qos;
mod string;
mod topic;

pub use self::bytes::BinaryData;
pub use self::codes::{ConnectReturnCode, SubscribeReturnCode};
pub use self::integer::{decode_u16, encode_u16, push_be_u16, VariableByteInteger, MAX_REMAINING_LENGTH};
pub use self::qos::QoS;
pub use self::string::{UTF8String, MAX_STRING_LENGTH};
pub(crate) use self::string::push_utf8;
pub use self::topic::{Topic, TopicName};

use crate::error::Result;

/// A data type as defined by the MQTT standard.
pub trait MqttDataType {

    /// Returns the size in number of bytes that this type will use in a binary MQTT packet.
    fn encoded_len(&self) -> usize;
}

/// Contains a decoded value along with the number of bytes "used" during decoding.
#[derive(Debug, PartialEq)]
pub struct DecodingResult<T> {
    pub(crate) bytes_read: usize,
    pub(crate) value: T,
}

impl <T>DecodingResult<T> {

    pub fn bytes_read(&self) -> usize {
        self.bytes_read
    }

    pub fn value(self) -> T {
        self.value
    }

    /// Splits into `(value, bytes_read)`.
    pub fn into_parts(self) -> (T, usize) {
        (self.value, self.bytes_read)
    }
}

/// Essentially an extended version of `TryFrom<&[u8]>` that also tells the caller how many bytes of `src` were
/// consumed. `src` may be longer than the encoded value, anything after it is left untouched.
pub trait Decodeable: Sized {

    /// Reads one value from the start of `src`.
    fn decode(src: &[u8]) -> Result<DecodingResult<Self>>;
}
