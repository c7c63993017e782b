mod bundle;

use proc_macro::TokenStream;

/// Derive `Bundle` for a named struct: the bundle's component types are the
/// struct's field types, in declaration order.
#[proc_macro_derive(Bundle)]
pub fn derive_bundle(item: TokenStream) -> TokenStream {
    bundle::derive_bundle(item)
}
