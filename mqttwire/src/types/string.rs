use std::fmt::Display;

use crate::error::{MqttError, Result};

use super::{Decodeable, DecodingResult, MqttDataType};

/// Max number of bytes (not characters!) of an encoded string, limited by its 16-bit length field.
pub const MAX_STRING_LENGTH: usize = u16::MAX as usize;

const LENGTH_FIELD_SIZE: usize = 2;

/// A String with a max length of 65,535 bytes (not characters!).
/// The encoded value also includes the length in two bytes.
/// See MQTT-1.5.3.
#[derive(Debug, Clone, PartialEq, Hash, Eq)]
pub struct UTF8String {
    value: String,
}

impl UTF8String {

    /// Creates a new, empty UTF8String that will consist in binary form only of two bytes representing a length of 0.
    pub fn new() -> Self {
        UTF8String { value: String::new() }
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }
}

impl Default for UTF8String {
    fn default() -> Self {
        Self::new()
    }
}

impl TryFrom<String> for UTF8String {
    type Error = MqttError;

    /// Fails with [MqttError::EncodingError] if the string is longer than [MAX_STRING_LENGTH] bytes.
    fn try_from(value: String) -> Result<Self> {
        if value.len() > MAX_STRING_LENGTH {
            return Err(MqttError::EncodingError(
                format!("String of {} bytes exceeds maximum of {}", value.len(), MAX_STRING_LENGTH)))
        }
        Ok(UTF8String { value })
    }
}

impl TryFrom<&str> for UTF8String {
    type Error = MqttError;

    fn try_from(value: &str) -> Result<Self> {
        UTF8String::try_from(value.to_string())
    }
}

impl MqttDataType for UTF8String {
    fn encoded_len(&self) -> usize {
        LENGTH_FIELD_SIZE + self.value.len()
    }
}

impl From<UTF8String> for Vec<u8> {
    fn from(src: UTF8String) -> Self {
        let bytes = src.value.as_bytes();
        let mut result = Vec::with_capacity(LENGTH_FIELD_SIZE + bytes.len());
        // length was checked on creation
        result.extend_from_slice(&(bytes.len() as u16).to_be_bytes());
        result.extend_from_slice(bytes);
        result
    }
}

impl From<UTF8String> for String {
    fn from(src: UTF8String) -> Self {
        src.value
    }
}

impl Decodeable for UTF8String {

    /// Reads the two length bytes and then exactly that many bytes, which must be well-formed UTF-8.
    fn decode(src: &[u8]) -> Result<DecodingResult<Self>> {
        if src.len() < LENGTH_FIELD_SIZE {
            return Err(MqttError::MalformedPacket(
                format!("String needs at least {} bytes for its length, got {}", LENGTH_FIELD_SIZE, src.len())))
        }

        let (len_slice, remain) = src.split_at(LENGTH_FIELD_SIZE);
        let length = u16::from_be_bytes([len_slice[0], len_slice[1]]) as usize;
        if length > remain.len() {
            return Err(MqttError::MalformedPacket(
                format!("String length of {} exceeds the remaining {} bytes", length, remain.len())))
        }

        match std::str::from_utf8(&remain[..length]) {
            Ok(s) => Ok(DecodingResult {
                bytes_read: LENGTH_FIELD_SIZE + length,
                value: UTF8String { value: s.to_string() },
            }),
            Err(e) => Err(MqttError::MalformedPacket(format!("Error decoding bytes to String: {}", e))),
        }
    }
}

impl PartialEq<UTF8String> for String {
    fn eq(&self, other: &UTF8String) -> bool {
        self.eq(&other.value)
    }
}

impl PartialEq<&str> for UTF8String {
    fn eq(&self, other: &&str) -> bool {
        self.value.eq(other)
    }
}

impl Display for UTF8String {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.value.fmt(f)
    }
}

/// Encodes `val` as an MQTT string and appends it to `vec`.
pub(crate) fn push_utf8(val: &str, vec: &mut Vec<u8>) -> Result<()> {
    let encoded: Vec<u8> = UTF8String::try_from(val)?.into();
    vec.extend(encoded);
    Ok(())
}
