use proc_macro::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, parse_macro_input, spanned::Spanned};

pub fn derive_bundle(input: TokenStream) -> TokenStream {
    // Parse the input tokens into a syntax tree
    let ast = parse_macro_input!(input as DeriveInput);

    // Get the struct name we are annotating
    let struct_name = &ast.ident;
    let (impl_generics, ty_generics, where_clause) = ast.generics.split_for_impl();

    // Bundles are structs; the field types become the component types.
    let fields = match &ast.data {
        Data::Struct(data) => data.fields.iter().collect::<Vec<_>>(),
        _ => {
            return syn::Error::new(ast.span(), "Bundle can only be derived for structs")
                .to_compile_error()
                .into();
        }
    };
    let field_types: Vec<_> = fields.iter().map(|field| &field.ty).collect();

    // Use ::strata_ecs paths, which work both inside and outside the crate.
    // Inside the crate this resolves through `extern crate self as strata_ecs;`
    // in lib.rs; outside it resolves to the strata-ecs dependency.
    TokenStream::from(quote! {
        impl #impl_generics ::strata_ecs::component::Bundle for #struct_name #ty_generics #where_clause {
            fn type_hashes() -> ::std::vec::Vec<::strata_ecs::hash::TypeHash> {
                ::std::vec![
                    #(::strata_ecs::hash::hash_type::<#field_types>()),*
                ]
            }

            fn infos(
                world: &::strata_ecs::world::World,
            ) -> ::std::vec::Vec<::strata_ecs::component::Info> {
                ::std::vec![
                    #(::strata_ecs::component::Info::of::<#field_types>(world)),*
                ]
            }
        }
    })
}
