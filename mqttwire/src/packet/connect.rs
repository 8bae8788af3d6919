use tracing::debug;

use crate::error::{MqttError, Result};
use crate::types::{encode_u16, push_utf8, BinaryData, Topic, MAX_STRING_LENGTH};

use super::{Connack, PacketType, ReadablePacket, WritablePacket};

/// Every `CONNECT` starts with this protocol name.
pub const PROTOCOL_NAME: &str = "MQTT";

/// Protocol level of MQTT v3.1.1.
pub const PROTOCOL_LEVEL: u8 = 4;

const USERNAME_FLAG: u8 = 0b10000000;
const PASSWORD_FLAG: u8 = 0b01000000;
const WILL_RETAIN_FLAG: u8 = 0b00100000;
const WILL_QOS_SHIFT: u8 = 3;
const WILL_FLAG: u8 = 0b00000100;
const CLEAN_SESSION_FLAG: u8 = 0b00000010;

/// The message the server publishes on behalf of the client if the connection is lost unexpectedly.
///
/// The QoS the will is published with is the QoS of its [Topic].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LastWill {
    topic: Topic,
    message: BinaryData,
    retain: bool,
}

impl LastWill {

    /// Fails with [MqttError::OutOfBounds] if the message is longer than 65,535 bytes.
    pub fn new(topic: Topic, message: Vec<u8>) -> Result<Self> {
        Ok(LastWill { topic, message: BinaryData::new(message)?, retain: false })
    }

    /// Whether the server should retain the will once it is published. Defaults to `false`.
    pub fn retain(mut self, retain: bool) -> Self {
        self.retain = retain;
        self
    }

    pub fn topic(&self) -> &Topic {
        &self.topic
    }

    pub fn message(&self) -> &[u8] {
        self.message.as_slice()
    }

    pub fn is_retained(&self) -> bool {
        self.retain
    }
}

/// Everything a client tells the server when connecting.
///
/// Built once by the caller and then handed to a [Connect] packet, which only ever reads it.
///
/// # Examples
///
/// ```
/// use mqttwire::packet::ConnectParameters;
///
/// let parameters = ConnectParameters::new("my-rust-mqtt-client-0").unwrap()
///     .keep_alive(30)
///     .clean_session(true)
///     .credentials("user", Some(b"secret".to_vec())).unwrap();
///
/// assert_eq!(0b11000010, parameters.flags());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectParameters {
    client_id: String,
    keep_alive: u16,
    clean_session: bool,
    will: Option<LastWill>,
    username: Option<String>,
    password: Option<BinaryData>,
}

impl ConnectParameters {

    /// Default keep alive, in seconds.
    pub const DEFAULT_KEEP_ALIVE: u16 = 60;

    /// An empty `client_id` asks the server to assign one, it is then left out of the payload.
    ///
    /// Fails with [MqttError::OutOfBounds] if `client_id` is longer than 65,535 bytes.
    pub fn new<S: Into<String>>(client_id: S) -> Result<Self> {
        let client_id = client_id.into();
        if client_id.len() > MAX_STRING_LENGTH {
            return Err(MqttError::OutOfBounds(format!("Client identifier of {} bytes is too long", client_id.len())))
        }

        Ok(ConnectParameters {
            client_id,
            keep_alive: Self::DEFAULT_KEEP_ALIVE,
            clean_session: false,
            will: None,
            username: None,
            password: None,
        })
    }

    /// Maximum interval in seconds between two control packets sent by the client. `0` turns keep alive off.
    pub fn keep_alive(mut self, seconds: u16) -> Self {
        self.keep_alive = seconds;
        self
    }

    /// Whether the server should discard any previous session. Defaults to `false`.
    pub fn clean_session(mut self, clean_session: bool) -> Self {
        self.clean_session = clean_session;
        self
    }

    pub fn will(mut self, will: LastWill) -> Self {
        self.will = Some(will);
        self
    }

    /// Sets the username and optionally a password. Empty values are treated as not set, and a password is only
    /// ever sent along with a username (MQTT-3.1.2-22).
    ///
    /// Fails with [MqttError::OutOfBounds] if either of them is longer than 65,535 bytes.
    pub fn credentials<S: Into<String>>(mut self, username: S, password: Option<Vec<u8>>) -> Result<Self> {
        let username = username.into();
        if username.is_empty() {
            if password.as_ref().map(|p| !p.is_empty()).unwrap_or(false) {
                return Err(MqttError::IllegalArgument("A password requires a username".into()))
            }
            self.username = None;
            self.password = None;
            return Ok(self)
        }

        if username.len() > MAX_STRING_LENGTH {
            return Err(MqttError::OutOfBounds(format!("Username of {} bytes is too long", username.len())))
        }

        self.password = match password {
            Some(p) if !p.is_empty() => Some(BinaryData::new(p)?),
            _=> None,
        };
        self.username = Some(username);
        Ok(self)
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub fn keep_alive_period(&self) -> u16 {
        self.keep_alive
    }

    pub fn last_will(&self) -> Option<&LastWill> {
        self.will.as_ref()
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    pub fn password(&self) -> Option<&[u8]> {
        self.password.as_ref().map(|p| p.as_slice())
    }

    /// The connect flags byte, derived from which optional fields are set.
    ///
    /// ```text
    /// bit | 7        | 6        | 5           | 4 3      | 2         | 1             | 0        |
    ///     | username | password | will retain | will QoS | will flag | clean session | reserved |
    /// ```
    pub fn flags(&self) -> u8 {
        let mut flags = 0;

        if self.username.is_some() {
            flags |= USERNAME_FLAG;
        }

        if self.password.is_some() {
            flags |= PASSWORD_FLAG;
        }

        if let Some(will) = &self.will {
            flags |= WILL_FLAG;
            flags |= will.topic.topic_qos_level() << WILL_QOS_SHIFT;
            if will.retain {
                flags |= WILL_RETAIN_FLAG;
            }
        }

        if self.clean_session {
            flags |= CLEAN_SESSION_FLAG;
        }

        flags
    }
}

/// The first packet a client sends after opening a network connection.
///
/// Fixed Header (packet type (1) | reserved (0)):
/// 0001 0000
/// [remaining length] (len(variable_header) + len(payload))
///
/// Variable Header:
///     Protocol Name ('MQTT')
///     Protocol Level (4)
///     Connect Flags (username, pwd, will retain, will qos (2 bits), will flag, clean session, reserved)
///     Keep Alive (2 byte, KA interval in seconds)
///
/// Payload:
/// ClientID, Will Topic, Will Message, username, password
///
/// # Examples
///
/// ```
/// use mqttwire::packet::{Connect, ConnectParameters, WritablePacket};
///
/// let connect = Connect::new().with_parameters(ConnectParameters::new("abc").unwrap());
/// let binary = connect.encode().unwrap();
/// assert_eq!(0b00010000, binary[0]);
/// assert!(connect.should_expect_answer());
/// ```
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Connect {
    parameters: Option<ConnectParameters>,
}

impl Connect {

    /// A packet without parameters, which cannot be encoded until [Connect::with_parameters()] is called.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attaches the connection parameters.
    pub fn with_parameters(mut self, parameters: ConnectParameters) -> Self {
        self.parameters = Some(parameters);
        self
    }

    /// Fails with [MqttError::NoConnectionParametersDefined] if no parameters were attached yet.
    pub fn connection_parameters(&self) -> Result<&ConnectParameters> {
        self.parameters.as_ref().ok_or(MqttError::NoConnectionParametersDefined)
    }
}

impl WritablePacket for Connect {
    type Answer = Connack;

    const PACKET_TYPE: PacketType = PacketType::CONNECT;

    fn create_variable_header(&self) -> Result<Vec<u8>> {
        let parameters = self.connection_parameters()?;

        let mut header = Vec::with_capacity(10);
        push_utf8(PROTOCOL_NAME, &mut header)?;
        header.push(PROTOCOL_LEVEL);
        header.push(parameters.flags());
        header.extend_from_slice(&encode_u16(parameters.keep_alive as usize)?);

        Ok(header)
    }

    fn create_payload(&self) -> Result<Vec<u8>> {
        let parameters = self.connection_parameters()?;
        debug!(client_id = parameters.client_id.as_str(), flags = parameters.flags(), "encoding CONNECT payload");

        // every field only contributes bytes if it is not empty
        let mut payload = Vec::new();
        if !parameters.client_id.is_empty() {
            push_utf8(&parameters.client_id, &mut payload)?;
        }

        if let Some(will) = &parameters.will {
            push_utf8(will.topic.topic_name(), &mut payload)?;
            if !will.message.is_empty() {
                payload.append(&mut will.message.clone().into());
            }
        }

        if let Some(username) = &parameters.username {
            push_utf8(username, &mut payload)?;
        }

        if let Some(password) = &parameters.password {
            payload.append(&mut password.clone().into());
        }

        Ok(payload)
    }

    fn expected_answer(&self) -> Option<PacketType> {
        Some(PacketType::CONNACK)
    }

    fn expect_answer(&self, src: &[u8]) -> Result<Connack> {
        let connack = Connack::populate(src)?;
        debug!(return_code = %connack.return_code(), session_present = connack.session_present(), "received CONNACK");
        Ok(connack)
    }
}
