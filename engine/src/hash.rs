//! Deterministic hashing of component types and compounds of types.
//!
//! Archetypes are keyed by a 64-bit hash folded over the hashes of their
//! component types, so both halves of this module are ABI-sensitive:
//! [`hash_type`] values are stable for a given build of the library but are
//! not guaranteed stable across library versions, and archetype hashes must
//! therefore never be persisted.
//!
//! The fold is order-sensitive on purpose. A permutation-insensitive fold
//! (XOR of element hashes, say) collides far too readily to key archetypes.

use std::any::type_name;

use wyhash::wyhash;

use crate::component::{Bundle, Info};

/// The deterministic hash of a single component type.
///
/// Two logically identical types hash equal; distinct types hash distinct
/// with overwhelming probability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TypeHash(u64);

impl TypeHash {
    /// Wrap a raw hash value. Primarily useful for tests and for folding
    /// hashes produced elsewhere.
    #[inline]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Get the raw 64-bit hash value.
    #[inline]
    pub const fn value(&self) -> u64 {
        self.0
    }
}

/// Initial accumulator for compound folds.
///
/// `mix2` alone is commutative (`a * b == b * a`), so a fold that started
/// from the first element hash would make two-element compounds
/// order-insensitive. Seeding the accumulator with a constant keeps the
/// composition order-sensitive for every arity.
pub const COMPOUND_SEED: u64 = 0x9E37_79B9_7F4A_7C15;

/// Hash a component type by its canonical name, Wyhash seed 0.
#[inline]
pub fn hash_type<T: 'static>() -> TypeHash {
    TypeHash(wyhash(type_name::<T>().as_bytes(), 0))
}

/// Combine two hashes via 128-bit multiplication, folding the high half
/// into the low half.
#[inline]
pub fn mix2(a: u64, b: u64) -> u64 {
    let product = (a as u128).wrapping_mul(b as u128);
    (product as u64) ^ ((product >> 64) as u64)
}

/// Fold an ordered sequence of type hashes into a compound hash.
///
/// The empty compound hashes to 0, which is the key of the empty-bundle
/// archetype every world starts with.
pub fn hash_compound_hashes<I>(hashes: I) -> u64
where
    I: IntoIterator<Item = TypeHash>,
{
    let mut iter = hashes.into_iter();
    let Some(first) = iter.next() else {
        return 0;
    };
    let mut acc = mix2(COMPOUND_SEED, first.value());
    for hash in iter {
        acc = mix2(acc, hash.value());
    }
    acc
}

/// Hash the component types of a bundle, in the bundle's declared order.
#[inline]
pub fn hash_compound<B: Bundle>() -> u64 {
    hash_compound_hashes(B::type_hashes())
}

/// Runtime variant of [`hash_compound`] folding already-resolved
/// [`Info`] values with the same mix.
#[inline]
pub fn hash_compound_info(infos: &[Info]) -> u64 {
    hash_compound_hashes(infos.iter().map(|info| info.hash()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Bundle;

    #[test]
    fn type_hash_is_deterministic() {
        // Given
        struct Position;

        // When
        let first = hash_type::<Position>();
        let second = hash_type::<Position>();

        // Then
        assert_eq!(first, second);
    }

    #[test]
    fn distinct_types_hash_distinct() {
        // Given
        struct Position;
        struct Velocity;

        // When / Then
        assert_ne!(hash_type::<Position>(), hash_type::<Velocity>());
        assert_ne!(hash_type::<u32>(), hash_type::<f32>());
    }

    #[test]
    fn compound_matches_manual_fold() {
        // Given
        struct CompA;
        struct CompB;
        struct CompC;

        let a = hash_type::<CompA>();
        let b = hash_type::<CompB>();
        let c = hash_type::<CompC>();

        // When
        let compound = hash_compound::<(CompA, CompB, CompC)>();

        // Then - folding mix2 over the element hashes yields the same value
        let mut acc = mix2(COMPOUND_SEED, a.value());
        acc = mix2(acc, b.value());
        acc = mix2(acc, c.value());
        assert_eq!(compound, acc);
        assert_eq!(compound, hash_compound_hashes([a, b, c]));
    }

    #[test]
    fn compound_is_order_sensitive() {
        // Given
        struct CompA;
        struct CompB;

        // When
        let ab = hash_compound::<(CompA, CompB)>();
        let ba = hash_compound::<(CompB, CompA)>();

        // Then
        assert_ne!(ab, ba);
    }

    #[test]
    fn empty_compound_hashes_to_zero() {
        assert_eq!(hash_compound::<()>(), 0);
        assert_eq!(hash_compound_hashes(Vec::<TypeHash>::new()), 0);
        assert_eq!(hash_compound_info(&[]), 0);
    }

    #[test]
    fn struct_bundle_matches_tuple_bundle() {
        // Given - a named struct whose field types mirror a tuple bundle
        #[derive(Bundle)]
        struct Movement {
            _position: u32,
            _velocity: f32,
        }

        // When / Then - field types are taken in declaration order
        assert_eq!(hash_compound::<Movement>(), hash_compound::<(u32, f32)>());
    }

    #[test]
    fn compound_info_matches_compound() {
        // Given
        let world = crate::world::World::default();
        let infos = <(u32, f32) as Bundle>::infos(&world);

        // When / Then
        assert_eq!(hash_compound_info(&infos), hash_compound::<(u32, f32)>());
    }
}
