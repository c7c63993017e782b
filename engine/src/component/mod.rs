//! Component types and their runtime descriptions.
//!
//! A component is any `'static + Send + Sync` value attached to an entity.
//! The storage layer never stores a component's type; it stores an [`Info`]
//! (hash, layout, hook vtable) and drives the bytes through it. The pieces:
//!
//! - [`Component`]: the bound every stored type satisfies
//! - [`Info`]: runtime description of a component type
//! - [`Hook`]: per-type destructor/copy callbacks, overridable per world
//! - [`Bundle`]: a compile-time list of component types

mod bundle;
mod hook;
mod info;

pub use bundle::Bundle;
pub use hook::{CopyFn, DtorFn, Hook};
pub use info::Info;

/// The bound for types that can be attached to entities.
///
/// Blanket-implemented: any `'static` thread-safe type is a component,
/// including primitives. Zero-sized components act as tags and occupy no
/// storage.
pub trait Component: Send + Sync + 'static {}

impl<T: Send + Sync + 'static> Component for T {}
