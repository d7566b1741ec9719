// Derive both halves of the wire codec for a struct by delegating to each
// field in declaration order. Every field must implement ToNetworkOrder and
// FromNetworkOrder itself; both traits are resolved at the call site.
use proc_macro::TokenStream;
use quote::quote;
use syn::{Data, DataStruct, DeriveInput};

// verify if the derive macro is applied to a structure
fn get_struct(ast: &DeriveInput) -> &DataStruct {
    if let Data::Struct(struct_token) = &ast.data {
        struct_token
    } else {
        panic!("<{}> is not a struct!", ast.ident);
    }
}

// create the impl methods for traits ToNetworkOrder & FromNetworkOrder
pub fn dns_struct(ast: &DeriveInput) -> TokenStream {
    // get struct data or panic
    let struct_token = get_struct(ast);

    // save structure name because we're gonna use it soon
    let structure_name = &ast.ident;

    // to_network_bytes() call for each field
    let to_method_calls = struct_token.fields.iter().map(|f| {
        // get name of the field as TokenStream
        let field_name = f.ident.as_ref().unwrap();

        quote! {
            length += ToNetworkOrder::to_network_bytes(&self.#field_name, wtr)?;
        }
    });

    // from_network_bytes() call for each field
    let from_method_calls = struct_token.fields.iter().map(|f| {
        // get name of the field as TokenStream
        let field_name = f.ident.as_ref().unwrap();

        quote! {
            FromNetworkOrder::from_network_bytes(&mut self.#field_name, rdr)?;
        }
    });

    let new_code = quote! {
        // the generated impl.
        impl ToNetworkOrder for #structure_name {
            fn to_network_bytes(&self, wtr: &mut MessageWriter) -> std::io::Result<usize> {
                let mut length = 0usize;
                #( #to_method_calls)*
                Ok(length)
            }
        }

        impl FromNetworkOrder for #structure_name {
            fn from_network_bytes(&mut self, rdr: &mut std::io::Cursor<&[u8]>) -> DNSResult<()> {
                #( #from_method_calls)*
                Ok(())
            }
        }
    };

    // Hand the output tokens back to the compiler
    TokenStream::from(new_code)
}
