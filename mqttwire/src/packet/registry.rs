use tracing::trace;

use crate::error::{MqttError, Result};

use super::{
    Connack, PacketType, Pingresp, Puback, Pubcomp, Publish, Pubrec, Pubrel, ReadablePacket, Suback, Unsuback,
};

/// Any packet a client can receive from the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Incoming {
    Connack(Connack),
    Publish(Publish),
    Puback(Puback),
    Pubrec(Pubrec),
    Pubrel(Pubrel),
    Pubcomp(Pubcomp),
    Suback(Suback),
    Unsuback(Unsuback),
    Pingresp(Pingresp),
}

impl Incoming {

    pub fn packet_type(&self) -> PacketType {
        match self {
            Incoming::Connack(p) => p.packet_type(),
            Incoming::Publish(p) => p.packet_type(),
            Incoming::Puback(p) => p.packet_type(),
            Incoming::Pubrec(p) => p.packet_type(),
            Incoming::Pubrel(p) => p.packet_type(),
            Incoming::Pubcomp(p) => p.packet_type(),
            Incoming::Suback(p) => p.packet_type(),
            Incoming::Unsuback(p) => p.packet_type(),
            Incoming::Pingresp(p) => p.packet_type(),
        }
    }
}

macro_rules! incoming_from {
    ($($packet:ident),*) => {
        $(
            impl From<$packet> for Incoming {
                fn from(packet: $packet) -> Self {
                    Incoming::$packet(packet)
                }
            }
        )*
    };
}

incoming_from!(Connack, Publish, Puback, Pubrec, Pubrel, Pubcomp, Suback, Unsuback, Pingresp);

type Reader = fn(&[u8]) -> Result<Incoming>;

fn read<P: ReadablePacket + Into<Incoming>>(src: &[u8]) -> Result<Incoming> {
    Ok(P::populate(src)?.into())
}

/// Indexed by packet type code. Packets only a client sends have no reader.
static READERS: [Option<Reader>; 16] = [
    None,                       // 0, reserved
    None,                       // CONNECT
    Some(read::<Connack>),
    Some(read::<Publish>),
    Some(read::<Puback>),
    Some(read::<Pubrec>),
    Some(read::<Pubrel>),
    Some(read::<Pubcomp>),
    None,                       // SUBSCRIBE
    Some(read::<Suback>),
    None,                       // UNSUBSCRIBE
    Some(read::<Unsuback>),
    None,                       // PINGREQ
    Some(read::<Pingresp>),
    None,                       // DISCONNECT
    None,                       // 15, reserved
];

/// Parses one complete packet received from the server, whatever its type.
///
/// The first byte selects the packet, which then validates its own flags and layout. Fails with
/// [MqttError::UnknownPacketType] if no packet a server may send has that type code, and with
/// [MqttError::MalformedPacket] if the buffer is empty or the packet is invalid.
///
/// # Examples
///
/// ```
/// use mqttwire::packet::{dispatch, Incoming, PacketType};
///
/// let incoming = dispatch(&[0b11010000, 0]).unwrap();
/// assert_eq!(PacketType::PINGRESP, incoming.packet_type());
/// ```
pub fn dispatch(src: &[u8]) -> Result<Incoming> {
    let first_byte = match src.first() {
        Some(b) => *b,
        None => return Err(MqttError::MalformedPacket("Cannot dispatch an empty buffer".into())),
    };

    let code = first_byte >> 4;
    trace!(code, len = src.len(), "dispatching incoming packet");

    match READERS[code as usize] {
        Some(reader) => reader(src),
        None => Err(MqttError::UnknownPacketType(code)),
    }
}
