//! Per-type destructor and copy callbacks for erased values.

use std::{mem, ptr, ptr::NonNull};

use crate::storage::RawAllocator;

/// Destructor callback. Receives a pointer to one live element and the
/// allocator the owning column operates against.
pub type DtorFn = unsafe fn(NonNull<u8>, &dyn RawAllocator);

/// Copy callback: `(dst, src, byte_len, allocator)`.
pub type CopyFn = unsafe fn(NonNull<u8>, NonNull<u8>, usize, &dyn RawAllocator);

/// The callback pair a column drives erased elements with.
///
/// Hooks are plain function pointers and copy freely; an [`Info`](super::Info)
/// embeds its hook by value, so a column never outlives the callbacks it was
/// erased with. A per-type override may be installed in the world before any
/// column of that type is erased; columns erased earlier keep the hook they
/// were resolved with.
///
/// The copy callback is carried for upper layers (cross-archetype moves);
/// no operation in this core invokes it.
#[derive(Debug, Clone, Copy)]
pub struct Hook {
    dtor: DtorFn,
    copy: CopyFn,
}

impl Hook {
    /// The type-agnostic default: no-op destructor, byte-wise copy.
    pub const DEFAULT: Self = Self {
        dtor: dtor_noop,
        copy: copy_bytes,
    };

    /// Construct a hook from both callbacks.
    #[inline]
    pub const fn new(dtor: DtorFn, copy: CopyFn) -> Self {
        Self { dtor, copy }
    }

    /// Construct a hook with a custom destructor and the default copy.
    #[inline]
    pub const fn with_dtor(dtor: DtorFn) -> Self {
        Self {
            dtor,
            copy: copy_bytes,
        }
    }

    /// The default hook for a concrete type: drops in place when `C` has a
    /// destructor, otherwise a no-op. Copy stays byte-wise.
    pub fn for_type<C: 'static>() -> Self {
        let dtor: DtorFn = if mem::needs_drop::<C>() {
            drop_impl::<C>
        } else {
            dtor_noop
        };
        Self {
            dtor,
            copy: copy_bytes,
        }
    }

    /// The destructor callback.
    #[inline]
    pub fn dtor(&self) -> DtorFn {
        self.dtor
    }

    /// The copy callback.
    #[inline]
    pub fn copy(&self) -> CopyFn {
        self.copy
    }
}

impl Default for Hook {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Drop implementation for types that need drop.
unsafe fn drop_impl<C>(ptr: NonNull<u8>, _alloc: &dyn RawAllocator) {
    // SAFETY: the column guarantees ptr denotes a live, initialized C.
    unsafe { ptr::drop_in_place(ptr.as_ptr() as *mut C) };
}

/// No-op destructor for types without drop glue.
unsafe fn dtor_noop(_ptr: NonNull<u8>, _alloc: &dyn RawAllocator) {}

/// Byte-wise copy, the default for all types.
unsafe fn copy_bytes(dst: NonNull<u8>, src: NonNull<u8>, byte_len: usize, _alloc: &dyn RawAllocator) {
    // SAFETY: caller guarantees both buffers are valid for byte_len bytes.
    unsafe { ptr::copy_nonoverlapping(src.as_ptr(), dst.as_ptr(), byte_len) };
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};

    use super::*;
    use crate::storage::SystemAllocator;

    #[test]
    fn for_type_picks_a_real_dtor_when_needed() {
        // Given
        static DROPPED: AtomicBool = AtomicBool::new(false);

        struct Tracked;
        impl Drop for Tracked {
            fn drop(&mut self) {
                DROPPED.store(true, Ordering::SeqCst);
            }
        }

        let allocator = SystemAllocator;
        let hook = Hook::for_type::<Tracked>();

        // When
        let mut value = std::mem::ManuallyDrop::new(Tracked);
        let ptr = NonNull::from(&mut *value).cast::<u8>();
        unsafe { (hook.dtor())(ptr, &allocator) };

        // Then
        assert!(DROPPED.load(Ordering::SeqCst));
    }

    #[test]
    fn default_copy_is_byte_wise() {
        // Given
        let allocator = SystemAllocator;
        let hook = Hook::DEFAULT;
        let src = [1u8, 2, 3, 4];
        let mut dst = [0u8; 4];

        // When
        unsafe {
            (hook.copy())(
                NonNull::from(&mut dst).cast(),
                NonNull::from(&src).cast(),
                4,
                &allocator,
            )
        };

        // Then
        assert_eq!(dst, src);
    }
}
