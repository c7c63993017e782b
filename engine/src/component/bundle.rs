//! Compile-time lists of component types ("bundles").
//!
//! A bundle names the component types of a new entity; the world hashes it
//! to find or create the matching archetype. Tuples of components are
//! bundles out of the box, and `#[derive(Bundle)]` turns a named struct
//! into a bundle whose component types are its field types in declaration
//! order.

use crate::{
    component::{Component, Info},
    hash::{TypeHash, hash_type},
    world::World,
};

/// A compile-time list of component types describing a new entity's
/// components.
///
/// The order of types is significant: it determines both the archetype hash
/// and the order columns are laid out in.
pub trait Bundle: 'static {
    /// The component type hashes, in the bundle's declared order.
    fn type_hashes() -> Vec<TypeHash>;

    /// The component infos, resolved against the world's hook table, in the
    /// bundle's declared order.
    fn infos(world: &World) -> Vec<Info>;
}

impl Bundle for () {
    fn type_hashes() -> Vec<TypeHash> {
        Vec::new()
    }

    fn infos(_world: &World) -> Vec<Info> {
        Vec::new()
    }
}

/// Implement Bundle for tuples of component types.
macro_rules! tuple_bundle_impl {
    ($($name: ident),*) => {
        impl<$($name: Component),*> Bundle for ($($name,)*) {
            fn type_hashes() -> Vec<TypeHash> {
                vec![$(hash_type::<$name>()),*]
            }

            fn infos(world: &World) -> Vec<Info> {
                vec![$(Info::of::<$name>(world)),*]
            }
        }
    }
}

/// Implement Bundle for tuples of component types recursively.
macro_rules! tuple_bundle {
    ($head_ty:ident) => {
        tuple_bundle_impl!($head_ty);
    };
    ($head_ty:ident, $( $tail_ty:ident ),*) => (
        tuple_bundle_impl!($head_ty, $( $tail_ty ),*);
        tuple_bundle!($( $tail_ty ),*);
    );
}

// Generate implementations for tuples up to 26 elements (A-Z)
tuple_bundle! {
    A, B, C, D, E, F, G, H, I, J, K, L, M, N, O, P, Q, R, S, T, U, V, W, X, Y, Z
}
