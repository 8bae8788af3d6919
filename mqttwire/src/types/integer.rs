use crate::error::{MqttError, Result};

use super::{Decodeable, DecodingResult, MqttDataType};

/// The largest value a remaining length can hold: four bytes of seven bits each.
pub const MAX_REMAINING_LENGTH: u32 = 268_435_455;

/// No more than four bytes may be used for the remaining length.
const MAX_ENCODED_LEN: usize = 4;

const CONTINUATION_BIT: u8 = 0b10000000;
const VALUE_MASK: u8 = 0b01111111;

/// The "remaining length" of the fixed header, MQTT-2.2.3.
///
/// Each encoded byte holds seven bits of the value with the least significant group first, the high bit signals
/// that another byte follows.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct VariableByteInteger {
    value: u32,
}

impl VariableByteInteger {

    /// Fails with [MqttError::EncodingError] if `value` exceeds [MAX_REMAINING_LENGTH].
    pub fn new(value: u32) -> Result<Self> {
        if value > MAX_REMAINING_LENGTH {
            return Err(MqttError::EncodingError(
                format!("Remaining length {} exceeds maximum of {}", value, MAX_REMAINING_LENGTH)))
        }
        Ok(VariableByteInteger { value })
    }

    pub fn value(&self) -> u32 {
        self.value
    }
}

impl TryFrom<usize> for VariableByteInteger {
    type Error = MqttError;

    fn try_from(value: usize) -> Result<Self> {
        match u32::try_from(value) {
            Ok(v) => VariableByteInteger::new(v),
            Err(_) => Err(MqttError::EncodingError(
                format!("Remaining length {} exceeds maximum of {}", value, MAX_REMAINING_LENGTH))),
        }
    }
}

impl MqttDataType for VariableByteInteger {
    fn encoded_len(&self) -> usize {
        match self.value {
            x if x <= 127 => 1,
            x if x <= 16_383 => 2,
            x if x <= 2_097_151 => 3,
            _=> 4,
        }
    }
}

impl From<VariableByteInteger> for Vec<u8> {

    /// Converts the value into its one to four byte representation. Zero is a single `0x00`.
    fn from(vbi: VariableByteInteger) -> Self {
        let mut res: Vec<u8> = Vec::with_capacity(vbi.encoded_len());
        let mut val = vbi.value;

        loop {
            let mut byte = (val % 128) as u8;
            val /= 128;
            if val > 0 {
                byte |= CONTINUATION_BIT;
            }
            res.push(byte);

            if val == 0 {
                break
            }
        }
        res
    }
}

impl Decodeable for VariableByteInteger {

    /// Reads up to four bytes, stopping at the first one without the continuation bit.
    fn decode(src: &[u8]) -> Result<DecodingResult<Self>> {
        let mut value: u32 = 0;

        for (index, byte) in src.iter().take(MAX_ENCODED_LEN).enumerate() {
            value += ((byte & VALUE_MASK) as u32) << (7 * index);

            if byte & CONTINUATION_BIT == 0 {
                return Ok(DecodingResult { bytes_read: index + 1, value: VariableByteInteger { value } })
            }
        }

        // four bytes read, all of them continued
        if src.len() >= MAX_ENCODED_LEN {
            return Err(MqttError::MalformedPacket("Remaining length uses more than four bytes".into()))
        }
        Err(MqttError::MalformedPacket("Remaining length ends prematurely".into()))
    }
}

/// Converts a length or count into two Big-Endian bytes.
///
/// Fails with [MqttError::EncodingError] if `val` does not fit into 16 bits.
pub fn encode_u16(val: usize) -> Result<[u8; 2]> {
    match u16::try_from(val) {
        Ok(v) => Ok(v.to_be_bytes()),
        Err(_) => Err(MqttError::EncodingError(format!("Value {} does not fit into two bytes", val))),
    }
}

/// Converts `val` into two Big-Endian bytes and appends them to `vec`.
pub fn push_be_u16(val: u16, vec: &mut Vec<u8>) {
    vec.extend_from_slice(&val.to_be_bytes())
}

/// Reads a Big-Endian `u16` from the first two bytes of `src`.
pub fn decode_u16(src: &[u8]) -> Result<u16> {
    match src {
        [high, low, ..] => Ok(u16::from_be_bytes([*high, *low])),
        _=> Err(MqttError::MalformedPacket(format!("Need two bytes for an integer, got {}", src.len()))),
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn encode_vbi() {
        do_test_encode_vbi(0, vec![0]);
        do_test_encode_vbi(16, vec![16]);
        do_test_encode_vbi(127, vec![0x7F]);
        do_test_encode_vbi(128, vec![128, 1]);
        do_test_encode_vbi(129, vec![129, 1]);
        do_test_encode_vbi(16_383, vec![0xFF, 0x7F]);
        do_test_encode_vbi(2_097_151, vec![0xFF, 0xFF, 0x7F]);
        do_test_encode_vbi(MAX_REMAINING_LENGTH, vec![0xFF, 0xFF, 0xFF, 0x7F]);
    }

    #[test]
    fn decode_vbi() {
        do_test_decode_vbi(&[0], 0, 1);
        do_test_decode_vbi(&[78], 78, 1);
        do_test_decode_vbi(&[129, 1], 129, 2);
        do_test_decode_vbi(&[0x80, 0x80, 0x80, 0x01], 2_097_152, 4);
        // trailing bytes are not part of the value
        do_test_decode_vbi(&[0x05, 0xFF, 0xFF], 5, 1);
    }

    #[test]
    fn encode_too_large() {
        assert!(matches!(VariableByteInteger::new(MAX_REMAINING_LENGTH + 1), Err(MqttError::EncodingError(_))));
        assert!(matches!(VariableByteInteger::try_from(usize::MAX), Err(MqttError::EncodingError(_))));
    }

    #[test]
    fn decode_fifth_byte() {
        let res = VariableByteInteger::decode(&[0xFF, 0xFF, 0xFF, 0xFF, 0x01]);
        assert!(matches!(res, Err(MqttError::MalformedPacket(_))));
    }

    #[test]
    fn decode_four_continued_bytes() {
        let too_long: Result<DecodingResult<VariableByteInteger>> =
            Err(MqttError::MalformedPacket("Remaining length uses more than four bytes".into()));
        assert_eq!(too_long, VariableByteInteger::decode(&[0x80, 0x80, 0x80, 0x80]));
        assert_eq!(too_long, VariableByteInteger::decode(&[0x80, 0x80, 0x80, 0x80, 0x01]));

        let short: Result<DecodingResult<VariableByteInteger>> =
            Err(MqttError::MalformedPacket("Remaining length ends prematurely".into()));
        assert_eq!(short, VariableByteInteger::decode(&[0x80, 0x80, 0x80]));
    }

    #[test]
    fn decode_truncated() {
        assert!(matches!(VariableByteInteger::decode(&[]), Err(MqttError::MalformedPacket(_))));
        assert!(matches!(VariableByteInteger::decode(&[0x80, 0x80]), Err(MqttError::MalformedPacket(_))));
    }

    #[test]
    fn vbi_size() {
        assert_eq!(1, vbi(0).encoded_len());
        assert_eq!(1, vbi(127).encoded_len());
        assert_eq!(2, vbi(128).encoded_len());
        assert_eq!(2, vbi(16_383).encoded_len());
        assert_eq!(3, vbi(16_384).encoded_len());
        assert_eq!(3, vbi(2_097_151).encoded_len());
        assert_eq!(4, vbi(2_097_152).encoded_len());
        assert_eq!(4, vbi(MAX_REMAINING_LENGTH).encoded_len());
    }

    #[test]
    fn two_byte_integers() {
        assert_eq!([0, 60], encode_u16(60).unwrap());
        assert_eq!([0xFF, 0xFF], encode_u16(65_535).unwrap());
        assert!(matches!(encode_u16(65_536), Err(MqttError::EncodingError(_))));

        assert_eq!(8123, decode_u16(&[31, 187]).unwrap());
        assert_eq!(1, decode_u16(&[0, 1, 99]).unwrap());
        assert!(matches!(decode_u16(&[1]), Err(MqttError::MalformedPacket(_))));

        let mut vec = vec![7];
        push_be_u16(258, &mut vec);
        assert_eq!(vec![7, 1, 2], vec);
    }

    proptest! {
        #[test]
        fn remaining_length_roundtrip(n in 0u32..=MAX_REMAINING_LENGTH) {
            let encoded: Vec<u8> = vbi(n).into();
            let decoded = VariableByteInteger::decode(&encoded).unwrap();
            prop_assert_eq!(encoded.len(), decoded.bytes_read());
            prop_assert_eq!(n, decoded.value().value());
        }

        #[test]
        fn remaining_length_overflow(n in (MAX_REMAINING_LENGTH + 1)..=u32::MAX) {
            prop_assert!(VariableByteInteger::new(n).is_err());
        }
    }

    fn vbi(value: u32) -> VariableByteInteger {
        VariableByteInteger::new(value).unwrap()
    }

    fn do_test_encode_vbi(value: u32, expect: Vec<u8>) {
        let actual: Vec<u8> = vbi(value).into();
        assert_eq!(expect, actual, "error trying to encode {}", value);
    }

    fn do_test_decode_vbi(bytes: &[u8], expect: u32, bytes_read: usize) {
        let actual = VariableByteInteger::decode(bytes).unwrap();
        assert_eq!(bytes_read, actual.bytes_read());
        assert_eq!(expect, actual.value().value(), "error trying to decode into {}", expect);
    }
}
