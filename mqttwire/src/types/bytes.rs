use crate::error::{MqttError, Result};

use super::MqttDataType;

const MAX_LENGTH: usize = u16::MAX as usize;

/// A simple wrapper around a vector of bytes, prefixed by its length in two bytes on the wire.
///
/// Used for the will message and the password of a `CONNECT`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryData {
    inner: Vec<u8>,
}

impl BinaryData {

    /// Returns [MqttError::OutOfBounds] if the vector exceeds the maximum allowed number of bytes (65535).
    pub fn new(bytes: Vec<u8>) -> Result<Self> {
        if bytes.len() > MAX_LENGTH {
            return Err(MqttError::OutOfBounds(
                format!("Max length for binary elements is {}, got {}", MAX_LENGTH, bytes.len())));
        }

        Ok(BinaryData { inner: bytes })
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.inner
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl MqttDataType for BinaryData {
    /// The length of the binary data plus 2 bytes for the full binary representation in an MQTT packet.
    fn encoded_len(&self) -> usize {
        self.inner.len() + 2
    }
}

impl From<BinaryData> for Vec<u8> {
    fn from(src: BinaryData) -> Self {
        let mut result = Vec::with_capacity(src.encoded_len());
        result.extend_from_slice(&(src.inner.len() as u16).to_be_bytes());
        result.extend(src.inner);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_limit() {
        assert!(BinaryData::new(vec![7; MAX_LENGTH]).is_ok());
        assert!(matches!(BinaryData::new(vec![7; MAX_LENGTH + 1]), Err(MqttError::OutOfBounds(_))));
    }

    #[test]
    fn encode_password() -> Result<()> {
        let password = BinaryData::new(b"s3cr3t".to_vec())?;
        assert_eq!(8, password.encoded_len());

        let encoded: Vec<u8> = password.into();
        assert_eq!(vec![0, 6, 115, 51, 99, 114, 51, 116], encoded);
        Ok(())
    }

    #[test]
    fn encode_empty() -> Result<()> {
        let empty = BinaryData::new(Vec::new())?;
        assert!(empty.is_empty());
        assert_eq!(vec![0, 0], Vec::from(empty));
        Ok(())
    }
}
