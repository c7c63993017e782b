//! Entity identifiers and the entity handle.

use crate::{archetype::Archetype, world::World};

/// An entity identifier. Unique per world, monotonically increasing, never
/// reused within a world's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Id(u64);

impl Id {
    /// Construct an id from its raw value.
    #[inline]
    pub(crate) const fn new(value: u64) -> Self {
        Self(value)
    }

    /// The raw 64-bit id value.
    #[inline]
    pub const fn value(&self) -> u64 {
        self.0
    }
}

/// A handle pairing an entity id with its archetype and world.
///
/// Pure value object: upper layers use it to locate the entity's component
/// rows. It borrows the world, so it is invalidated by the borrow checker
/// before the world can be mutated or dropped.
#[derive(Clone, Copy)]
pub struct Entity<'w> {
    /// The entity's unique id.
    id: Id,

    /// The archetype holding the entity's components.
    archetype: &'w Archetype,

    /// The world that issued the entity.
    world: &'w World,
}

impl<'w> Entity<'w> {
    #[inline]
    pub(crate) fn new(id: Id, archetype: &'w Archetype, world: &'w World) -> Self {
        Self {
            id,
            archetype,
            world,
        }
    }

    /// The entity's unique id.
    #[inline]
    pub fn id(&self) -> Id {
        self.id
    }

    /// The archetype holding the entity's components.
    #[inline]
    pub fn archetype(&self) -> &'w Archetype {
        self.archetype
    }

    /// The world that issued the entity.
    #[inline]
    pub fn world(&self) -> &'w World {
        self.world
    }
}

impl std::fmt::Debug for Entity<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Entity")
            .field("id", &self.id)
            .field("archetype", &format_args!("{:#018x}", self.archetype.hash()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_order_by_value() {
        // Given
        let first = Id::new(0);
        let second = Id::new(1);

        // Then
        assert!(first < second);
        assert_eq!(first.value(), 0);
        assert_eq!(second.value(), 1);
    }
}
