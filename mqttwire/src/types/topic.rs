use std::fmt::Display;

use crate::error::{MqttError, Result};

use super::{QoS, MAX_STRING_LENGTH};

const WILDCARDS: [char; 2] = ['+', '#'];

/// A validated topic name or filter: never empty and at most 65,535 bytes long.
///
/// # Examples
///
/// ```
/// use mqttwire::types::TopicName;
///
/// let name = TopicName::new("/Föllinge/sensors/𠜎𠜱𠝹𠱓").unwrap();
/// assert_eq!("/Föllinge/sensors/𠜎𠜱𠝹𠱓", name.as_str());
///
/// assert!(TopicName::new("").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TopicName {
    name: String,
}

impl TopicName {

    /// Fails with [MqttError::IllegalArgument] if `name` is empty, or with [MqttError::OutOfBounds] if it is longer
    /// than 65,535 bytes.
    pub fn new<S: Into<String>>(name: S) -> Result<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(MqttError::IllegalArgument("Topic name must be set".into()))
        }

        if name.len() > MAX_STRING_LENGTH {
            return Err(MqttError::OutOfBounds(
                format!("Topic name of {} bytes exceeds maximum of {}", name.len(), MAX_STRING_LENGTH)))
        }

        Ok(TopicName { name })
    }

    /// Like [TopicName::new()], but also rejects the wildcards `+` and `#` which are only allowed in filters.
    /// See MQTT-3.3.2-2.
    pub fn for_publish<S: Into<String>>(name: S) -> Result<Self> {
        let topic_name = TopicName::new(name)?;
        if topic_name.name.contains(WILDCARDS) {
            return Err(MqttError::IllegalArgument(
                format!("Topic name [{}] must not contain wildcards", topic_name.name)))
        }
        Ok(topic_name)
    }

    pub fn as_str(&self) -> &str {
        &self.name
    }
}

impl Display for TopicName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.name.fmt(f)
    }
}

/// A topic together with the maximum QoS at which the server may deliver its messages.
///
/// Immutable once created. The QoS defaults to [QoS::ExactlyOnce].
///
/// # Examples
///
/// ```
/// use mqttwire::types::{QoS, Topic};
///
/// let topic = Topic::new("a topic").unwrap();
/// assert_eq!("a topic", topic.topic_name());
/// assert_eq!(2, topic.topic_qos_level());
///
/// let topic = Topic::with_qos("a topic", QoS::AtMostOnce).unwrap();
/// assert_eq!(0, topic.topic_qos_level());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Topic {
    name: TopicName,
    qos: QoS,
}

impl Topic {

    /// Creates a topic with the default QoS of `2`.
    pub fn new<S: Into<String>>(name: S) -> Result<Self> {
        Topic::with_qos(name, QoS::default())
    }

    pub fn with_qos<S: Into<String>>(name: S, qos: QoS) -> Result<Self> {
        Ok(Topic { name: TopicName::new(name)?, qos })
    }

    pub fn topic_name(&self) -> &str {
        self.name.as_str()
    }

    pub fn topic_qos_level(&self) -> u8 {
        self.qos.level()
    }

    pub fn qos(&self) -> QoS {
        self.qos
    }

    pub fn name(&self) -> &TopicName {
        &self.name
    }
}

impl From<TopicName> for Topic {
    fn from(name: TopicName) -> Self {
        Topic { name, qos: QoS::default() }
    }
}
