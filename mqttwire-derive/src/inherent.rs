use quote::quote;

use crate::utils::AckMeta;

/// Generates the constructor, getter and flags constant shared by the sending and receiving side.
pub fn generate_inherent(meta: &AckMeta) -> proc_macro2::TokenStream {
    let name = &meta.name;
    let flags = &meta.flags;

    quote! {
        impl #name {

            /// The lower four bits of the first byte.
            pub const FLAGS: u8 = #flags;

            pub fn new(packet_identifier: u16) -> Self {
                Self { packet_identifier }
            }

            /// The identifier of the packet this one acknowledges.
            pub fn packet_identifier(&self) -> u16 {
                self.packet_identifier
            }
        }
    }
}
