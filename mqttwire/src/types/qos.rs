use std::fmt::Display;

use crate::error::MqttError;

/// Quality of Service levels.
/// See MQTT-4.3.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Copy, Clone, Hash)]
pub enum QoS {
    /// 0
    AtMostOnce = 0,
    /// 1
    AtLeastOnce = 1,
    /// 2
    ExactlyOnce = 2,
}

impl QoS {

    /// The numeric level, `0`, `1` or `2`.
    pub fn level(&self) -> u8 {
        *self as u8
    }
}

impl Default for QoS {
    /// Subscriptions and topics ask for the highest level unless told otherwise.
    fn default() -> Self {
        QoS::ExactlyOnce
    }
}

impl TryFrom<i64> for QoS {
    type Error = MqttError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(QoS::AtMostOnce),
            1 => Ok(QoS::AtLeastOnce),
            2 => Ok(QoS::ExactlyOnce),
            _=> Err(MqttError::InvalidQoSLevel(value)),
        }
    }
}

impl TryFrom<u8> for QoS {
    type Error = MqttError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        QoS::try_from(value as i64)
    }
}

impl From<QoS> for u8 {
    fn from(qos: QoS) -> Self {
        qos as u8
    }
}

impl Display for QoS {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.level())
    }
}
