//! Columnar, type-erased storage core for an archetype ECS.
//!
//! Entities are opaque ids associated with a set of component values.
//! Components of the same combination (an archetype) are stored together in
//! tightly packed, parallel columnar arrays, so iterating entities that
//! share a component set is cache-friendly. The containers are type-erased;
//! the access boundary is type-safe.
//!
//! The layers, bottom up:
//!
//! - [`storage`]: the growth policy, the raw allocator seam, and the two
//!   column containers — [`storage::TypedColumn`] for a known `T`,
//!   [`storage::ErasedColumn`] for a runtime [`component::Info`]. Columns
//!   do not track their own length; the archetype owns one shared length
//!   for all of its parallel columns.
//! - [`component`]: type descriptions ([`component::Info`]), per-type
//!   destructor/copy hooks, and compile-time type lists ([`Bundle`]).
//! - [`archetype`]: one unique component combination — descriptions, tag
//!   set, column index, columns, and the entity roster.
//! - [`world`]: the registry owning all archetypes keyed by compound hash,
//!   the per-type hook table, and the entity id counter.
//!
//! # Example
//!
//! ```
//! use strata_ecs::{World, hash::hash_type};
//!
//! let mut world = World::default();
//! let entity = world.create_entity::<(u32, f32)>()?;
//! let hash = entity.archetype().hash();
//! assert_eq!(entity.id().value(), 0);
//!
//! // Rows are allocated but not populated; values are written through the
//! // typed column cast.
//! let archetype = world.archetype_mut(hash).unwrap();
//! let column = archetype.column_mut(hash_type::<u32>()).unwrap();
//! unsafe { column.write(0, 42u32) };
//! # Ok::<(), strata_ecs::Error>(())
//! ```
//!
//! Single-threaded by design: the world serializes all mutation. There are
//! no stable element pointers across growth.

// Allows the derive macros to emit ::strata_ecs paths that resolve both
// inside and outside this crate.
extern crate self as strata_ecs;

pub mod archetype;
pub mod component;
pub mod entity;
pub mod error;
pub mod hash;
pub mod storage;
pub mod world;

pub use component::{Bundle, Component, Hook, Info};
pub use error::{Error, Result};
pub use strata_macros::Bundle;
pub use world::World;
