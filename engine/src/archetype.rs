//! An archetype: one unique combination of component types and the parallel
//! columns holding its entities' data.

use std::collections::{HashMap, HashSet};

use crate::{
    component::Info,
    entity,
    error::{Error, Result},
    hash::{TypeHash, hash_compound_info},
    storage::{ErasedColumn, RawAllocator},
};

/// A set of component type descriptions plus one erased column per
/// non-zero-sized component, a tag set for the zero-sized ones, and the
/// roster of entities stored here.
///
/// # Invariants
/// - `hash == hash_compound_info(infos)`.
/// - Every non-zero-sized info's hash appears exactly once in
///   `column_index`, mapping to the column carrying that info.
/// - Every zero-sized info's hash appears in `tags` and owns no column.
/// - Every column's capacity covers `len()`; the roster length is the
///   shared length of all columns.
pub struct Archetype {
    /// The compound hash of the component types, in creation order.
    hash: u64,

    /// The component descriptions, in the order given at creation.
    infos: Box<[Info]>,

    /// Hashes of the zero-sized components. Presence only; no storage.
    tags: HashSet<TypeHash>,

    /// Maps each stored component's hash to its index in `columns`.
    column_index: HashMap<TypeHash, usize>,

    /// One erased column per non-zero-sized component.
    columns: Vec<ErasedColumn>,

    /// The entities stored in this archetype (one per row).
    entities: Vec<entity::Id>,
}

impl Archetype {
    /// Build an archetype from component descriptions, partitioning them
    /// into tags (zero-sized) and columns (everything else). Columns start
    /// empty; both maps are preallocated to their final size.
    ///
    /// # Panics
    /// Panics if the same component type appears twice. The column index
    /// would silently collapse the duplicates, losing one of the two values
    /// the user supplied.
    pub fn new(infos: Box<[Info]>) -> Result<Self> {
        let hash = hash_compound_info(&infos);
        let tag_count = infos.iter().filter(|info| info.is_zero_sized()).count();
        let column_count = infos.len() - tag_count;

        let mut tags = HashSet::new();
        tags.try_reserve(tag_count).map_err(|_| Error::OutOfMemory)?;
        let mut column_index = HashMap::new();
        column_index
            .try_reserve(column_count)
            .map_err(|_| Error::OutOfMemory)?;
        let mut columns = Vec::new();
        columns
            .try_reserve_exact(column_count)
            .map_err(|_| Error::OutOfMemory)?;

        for info in infos.iter() {
            if info.is_zero_sized() {
                assert!(
                    tags.insert(info.hash()),
                    "duplicate component {:?} in archetype",
                    info.hash()
                );
            } else {
                let index = columns.len();
                columns.push(ErasedColumn::new(*info));
                assert!(
                    column_index.insert(info.hash(), index).is_none(),
                    "duplicate component {:?} in archetype",
                    info.hash()
                );
            }
        }

        Ok(Self {
            hash,
            infos,
            tags,
            column_index,
            columns,
            entities: Vec::new(),
        })
    }

    /// The compound hash this archetype is keyed by.
    #[inline]
    pub fn hash(&self) -> u64 {
        self.hash
    }

    /// The component descriptions, in creation order.
    #[inline]
    pub fn infos(&self) -> &[Info] {
        &self.infos
    }

    /// Number of entities (rows) stored here. This is the shared length of
    /// every column.
    #[inline]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Whether the archetype holds no entities.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// The entities stored in this archetype, in row order.
    #[inline]
    pub fn entities(&self) -> &[entity::Id] {
        &self.entities
    }

    /// Whether a zero-sized component with this hash is part of the
    /// archetype.
    #[inline]
    pub fn has_tag(&self, hash: TypeHash) -> bool {
        self.tags.contains(&hash)
    }

    /// Whether a component with this hash is part of the archetype, stored
    /// or tag.
    #[inline]
    pub fn contains(&self, hash: TypeHash) -> bool {
        self.column_index.contains_key(&hash) || self.tags.contains(&hash)
    }

    /// Get the column storing the component with this hash. Tags have no
    /// column; query [`has_tag`](Self::has_tag) instead.
    #[inline]
    pub fn column(&self, hash: TypeHash) -> Option<&ErasedColumn> {
        self.column_index
            .get(&hash)
            .map(|&index| &self.columns[index])
    }

    /// Mutable variant of [`column`](Self::column).
    #[inline]
    pub fn column_mut(&mut self, hash: TypeHash) -> Option<&mut ErasedColumn> {
        self.column_index
            .get(&hash)
            .map(|&index| &mut self.columns[index])
    }

    /// Record an entity and grow every column to cover the new roster
    /// length. The row's component values are not written here; the caller
    /// populates them through the typed column cast.
    pub(crate) fn append_entity(
        &mut self,
        alloc: &dyn RawAllocator,
        id: entity::Id,
    ) -> Result<()> {
        let len = self.entities.len();
        let new_len = len.checked_add(1).ok_or(Error::OutOfMemory)?;
        for column in &mut self.columns {
            column.ensure_total_capacity(alloc, new_len, len)?;
        }
        self.entities.try_reserve(1).map_err(|_| Error::OutOfMemory)?;
        self.entities.push(id);
        Ok(())
    }

    /// Tear down every column: run destructor hooks for the roster length
    /// and release the buffers. The maps and roster are dropped normally.
    pub(crate) fn deinit(&mut self, alloc: &dyn RawAllocator) {
        let len = self.entities.len();
        for column in &mut self.columns {
            column.deinit(alloc, len);
        }
        self.entities.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        component::Bundle,
        hash::hash_type,
        storage::{CountingAllocator, SystemAllocator},
        world::World,
    };

    #[test]
    fn partitions_tags_from_stored_components() {
        // Given
        struct Position {
            _x: f32,
        }
        struct Frozen;

        let world = World::default();
        let infos = <(Position, Frozen)>::infos(&world).into_boxed_slice();

        // When
        let archetype = Archetype::new(infos).unwrap();

        // Then
        assert!(archetype.has_tag(hash_type::<Frozen>()));
        assert!(archetype.column(hash_type::<Frozen>()).is_none());
        assert!(archetype.column(hash_type::<Position>()).is_some());
        assert!(archetype.contains(hash_type::<Position>()));
        assert!(archetype.contains(hash_type::<Frozen>()));
        assert_eq!(archetype.len(), 0);
    }

    #[test]
    fn hash_matches_the_compound_of_its_infos() {
        // Given
        let world = World::default();
        let infos = <(u32, f32)>::infos(&world).into_boxed_slice();

        // When
        let archetype = Archetype::new(infos).unwrap();

        // Then
        assert_eq!(archetype.hash(), hash_compound_info(archetype.infos()));
        assert_eq!(archetype.hash(), crate::hash::hash_compound::<(u32, f32)>());
    }

    #[test]
    #[should_panic(expected = "duplicate component")]
    fn duplicate_components_panic() {
        let world = World::default();
        let infos = <(u32, u32)>::infos(&world).into_boxed_slice();
        let _ = Archetype::new(infos);
    }

    #[test]
    #[should_panic(expected = "duplicate component")]
    fn duplicate_tags_panic() {
        struct Frozen;

        let world = World::default();
        let infos = <(Frozen, Frozen)>::infos(&world).into_boxed_slice();
        let _ = Archetype::new(infos);
    }

    #[test]
    fn append_entity_grows_every_column() {
        // Given
        let allocator = CountingAllocator::new(SystemAllocator);
        let world = World::default();
        let infos = <(u32, u64)>::infos(&world).into_boxed_slice();
        let mut archetype = Archetype::new(infos).unwrap();

        // When
        for id in 0..3 {
            archetype
                .append_entity(&allocator, entity::Id::new(id))
                .unwrap();
        }

        // Then - the roster and every column cover the new length
        assert_eq!(archetype.len(), 3);
        assert_eq!(
            archetype.entities(),
            &[entity::Id::new(0), entity::Id::new(1), entity::Id::new(2)]
        );
        for hash in [hash_type::<u32>(), hash_type::<u64>()] {
            assert!(archetype.column(hash).unwrap().capacity() >= 3);
        }
        // One allocation per column; growth was covered by the seed.
        assert_eq!(allocator.allocs(), 2);

        archetype.deinit(&allocator);
        assert_eq!(allocator.frees(), 2);
    }

    #[test]
    fn empty_info_list_builds_the_empty_archetype() {
        // Given / When
        let archetype = Archetype::new(Box::new([])).unwrap();

        // Then
        assert_eq!(archetype.hash(), 0);
        assert!(archetype.is_empty());
        assert!(archetype.infos().is_empty());
    }
}
