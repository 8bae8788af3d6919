use mqttwire_derive::IdentifierAck;

/// The server's confirmation of an [Unsubscribe](super::Unsubscribe), carrying nothing but the packet identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, IdentifierAck)]
#[ack(packet_type = UNSUBACK)]
pub struct Unsuback {
    packet_identifier: u16,
}
