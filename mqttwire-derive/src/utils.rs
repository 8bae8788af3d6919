use quote::format_ident;

/// The field every identifier-only acknowledgement must have.
pub const IDENTIFIER_FIELD: &str = "packet_identifier";

/// Everything the generators need to know about the annotated struct.
pub struct AckMeta {
    pub name: syn::Ident,
    pub packet_type: syn::Ident,
    pub flags: syn::LitInt,
}

impl AckMeta {

    pub fn packet_type_as_path(&self) -> syn::ExprPath {
        build_path(vec![
            "crate",
            "packet",
            "PacketType",
            self.packet_type.to_string().as_str(),
        ])
    }
}

impl TryFrom<&syn::DeriveInput> for AckMeta {
    type Error = syn::Error;

    fn try_from(ast: &syn::DeriveInput) -> Result<Self, Self::Error> {
        let name = ast.ident.clone();

        // we're only interested in named fields, and the identifier has to be one of them
        let named = if let syn::Data::Struct(
            syn::DataStruct {fields: syn::Fields::Named(syn::FieldsNamed { ref named, .. }),..}
        ) = ast.data
        {
            named
        } else {
            return Err(syn::Error::new_spanned(&ast.ident, "IdentifierAck needs a struct with named fields"))
        };

        let has_identifier = named.iter().any(|f| {
            f.ident.as_ref().map(|i| i == IDENTIFIER_FIELD).unwrap_or(false)
        });
        if !has_identifier || named.len() != 1 {
            return Err(syn::Error::new_spanned(
                &ast.ident,
                format!("IdentifierAck needs exactly one field: `{}: u16`", IDENTIFIER_FIELD)))
        }

        let mut packet_type: Option<syn::Ident> = None;
        let mut flags: Option<syn::LitInt> = None;

        for attr in ast.attrs.iter().filter(|a| a.path().is_ident("ack")) {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("packet_type") {
                    packet_type = Some(meta.value()?.parse()?);
                    Ok(())
                } else if meta.path.is_ident("flags") {
                    flags = Some(meta.value()?.parse()?);
                    Ok(())
                } else {
                    Err(meta.error("unsupported ack attribute, expected `packet_type` or `flags`"))
                }
            })?;
        }

        let packet_type = packet_type.ok_or_else(|| {
            syn::Error::new_spanned(&ast.ident, "missing #[ack(packet_type = ...)]")
        })?;

        Ok(AckMeta {
            name,
            packet_type,
            flags: flags.unwrap_or_else(|| syn::LitInt::new("0", proc_macro2::Span::call_site())),
        })
    }
}

fn build_path(segments: Vec<&str>) -> syn::ExprPath {
    let mut path: syn::punctuated::Punctuated<syn::PathSegment, syn::token::PathSep> = syn::punctuated::Punctuated::new();
    for s in segments {
        path.push(syn::PathSegment::from(format_ident!("{}", s)));
    }

    syn::ExprPath {
        attrs: Vec::new(),
        qself: None,
        path: syn::Path {
            leading_colon: None,
            segments: path,
        }
    }
}
