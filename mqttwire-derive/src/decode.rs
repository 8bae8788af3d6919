use quote::quote;

use crate::utils::AckMeta;

/// Generates an `impl crate::packet::ReadablePacket for #name`.
///
/// The packet is exactly four bytes: first byte, a remaining length of `2`, and the identifier.
pub fn generate_readable(meta: &AckMeta) -> proc_macro2::TokenStream {
    let name = &meta.name;
    let packet_type = meta.packet_type_as_path();
    let flags = &meta.flags;

    quote! {
        impl crate::packet::ReadablePacket for #name {
            fn populate(src: &[u8]) -> crate::error::Result<Self> {
                let (_, body) = crate::packet::FixedHeader::split(src, #packet_type, #flags)?;
                super::expect_body_len(#packet_type, body, 2)?;
                let packet_identifier = crate::types::decode_u16(body)?;

                Ok(Self { packet_identifier })
            }

            fn packet_type(&self) -> crate::packet::PacketType {
                #packet_type
            }
        }
    }
}
