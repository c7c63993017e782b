use std::alloc::Layout;

use crate::{
    component::{Component, Hook},
    hash::{TypeHash, hash_type},
    world::World,
};

/// Runtime description of a component type: stable hash, memory layout, and
/// the hook vtable driving erased elements.
///
/// Infos are value-copied freely. Resolution against a world happens once,
/// when the info is computed (early binding); installing a hook afterwards
/// does not change infos resolved earlier.
#[derive(Debug, Clone, Copy)]
pub struct Info {
    /// The deterministic hash of the component type.
    hash: TypeHash,

    /// The memory layout of one element.
    layout: Layout,

    /// Destructor and copy callbacks for erased elements.
    hook: Hook,
}

impl Info {
    /// Describe type `C` with its per-type default hook, ignoring any world
    /// registrations.
    pub fn new<C: Component>() -> Self {
        Self {
            hash: hash_type::<C>(),
            layout: Layout::new::<C>(),
            hook: Hook::for_type::<C>(),
        }
    }

    /// Describe type `C`, resolving the hook against `world`: a hook
    /// registered for `C` wins, otherwise the per-type default applies.
    pub fn of<C: Component>(world: &World) -> Self {
        let hash = hash_type::<C>();
        Self {
            hash,
            layout: Layout::new::<C>(),
            hook: world
                .registered_hook(hash)
                .unwrap_or_else(Hook::for_type::<C>),
        }
    }

    /// The component type hash.
    #[inline]
    pub fn hash(&self) -> TypeHash {
        self.hash
    }

    /// The memory layout of one element.
    #[inline]
    pub fn layout(&self) -> Layout {
        self.layout
    }

    /// The hook vtable.
    #[inline]
    pub fn hook(&self) -> &Hook {
        &self.hook
    }

    /// Byte distance between consecutive elements of this type.
    #[inline]
    pub fn stride(&self) -> usize {
        self.layout.pad_to_align().size()
    }

    /// Whether the component occupies no storage (a tag).
    #[inline]
    pub fn is_zero_sized(&self) -> bool {
        self.layout.size() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn info_describes_the_type() {
        // Given
        struct Position {
            _x: f32,
            _y: f32,
        }

        // When
        let info = Info::new::<Position>();

        // Then
        assert_eq!(info.hash(), hash_type::<Position>());
        assert_eq!(info.layout(), Layout::new::<Position>());
        assert_eq!(info.stride(), std::mem::size_of::<Position>());
        assert!(!info.is_zero_sized());
    }

    #[test]
    fn zero_sized_types_are_tags() {
        // Given
        struct Frozen;

        // When
        let info = Info::new::<Frozen>();

        // Then
        assert!(info.is_zero_sized());
        assert_eq!(info.stride(), 0);
    }

    #[test]
    fn of_prefers_the_registered_hook() {
        // Given
        use std::ptr::NonNull;
        use std::sync::atomic::{AtomicUsize, Ordering};

        use crate::storage::RawAllocator;

        static CALLS: AtomicUsize = AtomicUsize::new(0);

        unsafe fn counting_dtor(_ptr: NonNull<u8>, _alloc: &dyn RawAllocator) {
            CALLS.fetch_add(1, Ordering::SeqCst);
        }

        let mut world = World::default();
        world
            .set_hook::<u32>(Hook::with_dtor(counting_dtor))
            .unwrap();

        // When
        let info = Info::of::<u32>(&world);

        // Then - the registered dtor is embedded in the info
        let allocator = crate::storage::SystemAllocator;
        let mut value = 0u32;
        unsafe { (info.hook().dtor())(NonNull::from(&mut value).cast(), &allocator) };
        assert_eq!(CALLS.load(Ordering::SeqCst), 1);
    }
}
