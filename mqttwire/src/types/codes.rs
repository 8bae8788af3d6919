use std::fmt::Display;

use crate::error::MqttError;

use super::QoS;

/// MQTT-3.2.2.3: the `CONNACK` return code, a single byte numeric value.
/// Anything other than `0` means the server refused the connection.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum ConnectReturnCode {
    /// 0x00
    Accepted = 0x00,
    /// 0x01
    UnacceptableProtocolVersion = 0x01,
    /// 0x02
    IdentifierRejected = 0x02,
    /// 0x03
    ServerUnavailable = 0x03,
    /// 0x04
    BadUserNameOrPassword = 0x04,
    /// 0x05
    NotAuthorized = 0x05,
}

impl ConnectReturnCode {

    /// Returns `true` for every code that refuses the connection.
    pub fn is_err(&self) -> bool {
        *self != ConnectReturnCode::Accepted
    }
}

impl From<ConnectReturnCode> for u8 {
    fn from(code: ConnectReturnCode) -> Self {
        code as u8
    }
}

impl TryFrom<u8> for ConnectReturnCode {
    type Error = MqttError;

    /// Converts numeric values to a return code, or returns an error if the code is reserved.
    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Accepted),
            1 => Ok(Self::UnacceptableProtocolVersion),
            2 => Ok(Self::IdentifierRejected),
            3 => Ok(Self::ServerUnavailable),
            4 => Ok(Self::BadUserNameOrPassword),
            5 => Ok(Self::NotAuthorized),
            _=> Err(MqttError::MalformedPacket(format!("Reserved CONNACK return code: {}", value))),
        }
    }
}

impl Display for ConnectReturnCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Accepted => write!(f, "Connection Accepted"),
            Self::UnacceptableProtocolVersion => write!(f, "Connection Refused, unacceptable protocol version"),
            Self::IdentifierRejected => write!(f, "Connection Refused, identifier rejected"),
            Self::ServerUnavailable => write!(f, "Connection Refused, Server unavailable"),
            Self::BadUserNameOrPassword => write!(f, "Connection Refused, bad user name or password"),
            Self::NotAuthorized => write!(f, "Connection Refused, not authorized"),
        }
    }
}

/// MQTT-3.9.3: one per requested topic in a `SUBACK`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SubscribeReturnCode {
    /// The subscription was accepted with this maximum QoS, which may be lower than requested.
    Granted(QoS),
    /// 0x80
    Failure,
}

const SUBSCRIBE_FAILURE: u8 = 0x80;

impl From<SubscribeReturnCode> for u8 {
    fn from(code: SubscribeReturnCode) -> Self {
        match code {
            SubscribeReturnCode::Granted(qos) => qos.into(),
            SubscribeReturnCode::Failure => SUBSCRIBE_FAILURE,
        }
    }
}

impl TryFrom<u8> for SubscribeReturnCode {
    type Error = MqttError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0..=2 => Ok(Self::Granted(QoS::try_from(value)?)),
            SUBSCRIBE_FAILURE => Ok(Self::Failure),
            _=> Err(MqttError::MalformedPacket(format!("Invalid SUBACK return code: {:#04x}", value))),
        }
    }
}

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn connect_return_code_conversions() {
        assert_eq!(Ok(ConnectReturnCode::Accepted), ConnectReturnCode::try_from(0));
        assert_eq!(Ok(ConnectReturnCode::ServerUnavailable), ConnectReturnCode::try_from(3));
        assert_eq!(Ok(ConnectReturnCode::NotAuthorized), ConnectReturnCode::try_from(5));
        assert_eq!(4_u8, ConnectReturnCode::BadUserNameOrPassword.into());

        let err = ConnectReturnCode::try_from(6);
        assert_eq!(Some(MqttError::MalformedPacket("Reserved CONNACK return code: 6".to_string())), err.err());

        assert!(!ConnectReturnCode::Accepted.is_err());
        assert!(ConnectReturnCode::IdentifierRejected.is_err());
    }

    #[test]
    fn subscribe_return_code_conversions() {
        assert_eq!(Ok(SubscribeReturnCode::Granted(QoS::AtMostOnce)), SubscribeReturnCode::try_from(0));
        assert_eq!(Ok(SubscribeReturnCode::Granted(QoS::ExactlyOnce)), SubscribeReturnCode::try_from(2));
        assert_eq!(Ok(SubscribeReturnCode::Failure), SubscribeReturnCode::try_from(0x80));
        assert!(matches!(SubscribeReturnCode::try_from(3), Err(MqttError::MalformedPacket(_))));
        assert!(matches!(SubscribeReturnCode::try_from(0x81), Err(MqttError::MalformedPacket(_))));

        assert_eq!(0x80_u8, SubscribeReturnCode::Failure.into());
        assert_eq!(1_u8, SubscribeReturnCode::Granted(QoS::AtLeastOnce).into());
    }
}
