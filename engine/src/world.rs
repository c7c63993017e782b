//! The world: owner of all archetypes, custodian of per-type hooks, and
//! issuer of entity ids.

use std::{collections::HashMap, sync::Arc};

use log::{debug, warn};

use crate::{
    archetype::Archetype,
    component::{Bundle, Component, Hook},
    entity::{self, Entity},
    error::{Error, Result},
    hash::{TypeHash, hash_compound, hash_type},
    storage::{RawAllocator, SystemAllocator},
};

/// The key of the empty-bundle archetype every world starts with.
pub const EMPTY_ARCHETYPE_HASH: u64 = 0;

/// The top-level container owning all archetypes and hooks.
///
/// The world exclusively owns its allocator handle, archetype map entries,
/// and hook map entries. Every column buffer allocated through the world's
/// allocator is released again when the world drops.
pub struct World {
    /// The allocator all column buffers flow through.
    alloc: Arc<dyn RawAllocator>,

    /// The next entity id to issue. Ids start at 0 and are never reused.
    next_entity_id: u64,

    /// All archetypes, keyed by their compound hash.
    archetypes: HashMap<u64, Archetype>,

    /// Per-type hook overrides, keyed by component type hash.
    hooks: HashMap<TypeHash, Hook>,
}

impl World {
    /// Create a world operating against the given allocator, containing the
    /// empty-bundle archetype at key 0.
    pub fn new(alloc: Arc<dyn RawAllocator>) -> Self {
        let empty = Archetype::new(Box::new([]))
            .expect("the empty archetype performs no allocation");
        debug_assert_eq!(empty.hash(), EMPTY_ARCHETYPE_HASH);

        let mut archetypes = HashMap::new();
        archetypes.insert(EMPTY_ARCHETYPE_HASH, empty);

        Self {
            alloc,
            next_entity_id: 0,
            archetypes,
            hooks: HashMap::new(),
        }
    }

    /// The allocator this world's columns operate against.
    #[inline]
    pub fn allocator(&self) -> &dyn RawAllocator {
        &*self.alloc
    }

    /// The id the next created entity will receive.
    #[inline]
    pub fn next_entity_id(&self) -> u64 {
        self.next_entity_id
    }

    /// Number of archetypes in the world, the empty one included.
    #[inline]
    pub fn archetype_count(&self) -> usize {
        self.archetypes.len()
    }

    /// Get an archetype by its compound hash.
    #[inline]
    pub fn archetype(&self, hash: u64) -> Option<&Archetype> {
        self.archetypes.get(&hash)
    }

    /// Mutable variant of [`archetype`](Self::archetype), for populating
    /// component rows through the column casts.
    #[inline]
    pub fn archetype_mut(&mut self, hash: u64) -> Option<&mut Archetype> {
        self.archetypes.get_mut(&hash)
    }

    /// The hook that columns of type `C` are erased with: the registered
    /// override if one was installed, the per-type default otherwise.
    pub fn get_hook<C: Component>(&self) -> Hook {
        self.hooks
            .get(&hash_type::<C>())
            .copied()
            .unwrap_or_else(Hook::for_type::<C>)
    }

    /// Install or overwrite the hook for type `C`.
    ///
    /// Must be called before any column of `C` is erased: hooks bind early,
    /// so columns erased before this call keep the hook they were resolved
    /// with.
    pub fn set_hook<C: Component>(&mut self, hook: Hook) -> Result<()> {
        self.hooks.try_reserve(1).map_err(|_| Error::OutOfMemory)?;
        if self.hooks.insert(hash_type::<C>(), hook).is_some() {
            warn!(
                "hook for {} overwritten; columns erased earlier keep the previous hook",
                std::any::type_name::<C>()
            );
        }
        Ok(())
    }

    /// Look up a registered hook by type hash. Resolution happens here so
    /// [`Info::of`](crate::component::Info::of) binds whatever is installed
    /// at the moment the info is computed.
    pub(crate) fn registered_hook(&self, hash: TypeHash) -> Option<Hook> {
        self.hooks.get(&hash).copied()
    }

    /// Create an entity whose components are the types of `B`.
    ///
    /// Resolves the archetype by the bundle's compound hash, creating it on
    /// first use, then records the entity and grows every column to cover
    /// the new roster length. The returned ids strictly increase from 0.
    ///
    /// The entity's component rows are allocated but not written; the caller
    /// populates them through the archetype's column casts. Rows whose
    /// hooks run destructors must be initialized before the world is
    /// dropped.
    pub fn create_entity<B: Bundle>(&mut self) -> Result<Entity<'_>> {
        let hash = hash_compound::<B>();

        if !self.archetypes.contains_key(&hash) {
            let infos = B::infos(self).into_boxed_slice();
            let archetype = Archetype::new(infos)?;
            debug_assert_eq!(archetype.hash(), hash);
            self.archetypes
                .try_reserve(1)
                .map_err(|_| Error::OutOfMemory)?;
            debug!(
                "created archetype {hash:#018x} with {} component(s)",
                archetype.infos().len()
            );
            self.archetypes.insert(hash, archetype);
        }

        let id = entity::Id::new(self.next_entity_id);
        let archetype = self
            .archetypes
            .get_mut(&hash)
            .expect("archetype resolved above");
        archetype.append_entity(&*self.alloc, id)?;
        self.next_entity_id += 1;

        let this = &*self;
        let archetype = this.archetypes.get(&hash).expect("archetype resolved above");
        Ok(Entity::new(id, archetype, this))
    }
}

impl Default for World {
    /// A world operating against the system allocator.
    fn default() -> Self {
        Self::new(Arc::new(SystemAllocator))
    }
}

impl Drop for World {
    fn drop(&mut self) {
        for archetype in self.archetypes.values_mut() {
            archetype.deinit(&*self.alloc);
        }
    }
}
