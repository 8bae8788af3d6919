//! Macros internal to the `mqttwire` library
use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, DeriveInput};
use utils::AckMeta;

mod decode;
mod inherent;
mod utils;

/// Generates the receiving half of an acknowledgement packet that consists of nothing but a packet identifier:
/// `PUBACK`, `PUBREC`, `PUBREL`, `PUBCOMP` and `UNSUBACK`.
///
/// The annotated struct must have a named field `packet_identifier: u16` and an `ack` attribute naming the
/// `mqttwire::packet::PacketType` variant and the fixed header flags:
///
/// ```ignore
/// #[derive(IdentifierAck)]
/// #[ack(packet_type = PUBREL, flags = 0b0010)]
/// pub struct Pubrel {
///     packet_identifier: u16,
/// }
/// ```
///
/// This generates:
/// - `new(packet_identifier)`, a `packet_identifier()` getter and a `FLAGS` constant
/// - an `impl ReadablePacket` that accepts exactly the first byte, a remaining length of `2` and the identifier
///
/// Only works for structs located within the mqttwire::packet module.
#[proc_macro_derive(IdentifierAck, attributes(ack))]
pub fn identifier_ack_derive(input: TokenStream) -> TokenStream {
    let ast = parse_macro_input!(input as DeriveInput);

    let meta = match AckMeta::try_from(&ast) {
        Ok(m) => m,
        Err(e) => return e.to_compile_error().into(),
    };

    let inherent_impl = inherent::generate_inherent(&meta);
    let readable_impl = decode::generate_readable(&meta);

    quote! {
        #inherent_impl

        #readable_impl
    }.into()
}
