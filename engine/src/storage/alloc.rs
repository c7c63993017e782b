//! The raw allocator seam the storage layer funnels every buffer through.
//!
//! Columns do not own an allocator; the world does, and threads it into each
//! allocating call. That keeps columns plain `(pointer, capacity)` pairs and
//! makes allocation observable: wrap the world's allocator in
//! [`CountingAllocator`] and every column-level `alloc`/`resize`/`remap`/
//! `free` is visible to the caller. Tests use this to assert exact
//! allocation counts.
//!
//! Only column buffers flow through this seam. Map and roster bookkeeping
//! uses the global allocator via the standard collections (with
//! `try_reserve` where fallibility matters).

use std::{
    alloc::{self, Layout},
    ptr::NonNull,
    sync::atomic::{AtomicUsize, Ordering},
};

/// A minimal raw allocation interface.
///
/// All methods operate on raw byte buffers described by a [`Layout`]. A
/// conforming implementation may be a decorator over another allocator; see
/// [`CountingAllocator`].
pub trait RawAllocator: Send + Sync {
    /// Allocate a buffer for `layout`. Returns `None` on failure.
    ///
    /// `layout.size()` is never zero; zero-sized element types bypass the
    /// allocator entirely.
    fn alloc(&self, layout: Layout) -> Option<NonNull<u8>>;

    /// Try to grow or shrink the buffer in place to `new_size` bytes.
    /// Returns `false` if the allocation cannot be resized without moving.
    ///
    /// # Safety
    /// `ptr` must denote a live buffer previously returned by this allocator
    /// for `old_layout`.
    unsafe fn resize(&self, ptr: NonNull<u8>, old_layout: Layout, new_size: usize) -> bool;

    /// Re-map the buffer to `new_size` bytes, moving it if necessary.
    /// Returns the (possibly relocated) buffer, or `None` if the request
    /// cannot be satisfied; on `None` the original buffer is untouched.
    ///
    /// # Safety
    /// `ptr` must denote a live buffer previously returned by this allocator
    /// for `old_layout`, and `new_size` must not be zero.
    unsafe fn remap(&self, ptr: NonNull<u8>, old_layout: Layout, new_size: usize)
    -> Option<NonNull<u8>>;

    /// Release a buffer previously returned by this allocator.
    ///
    /// # Safety
    /// `ptr` must denote a live buffer previously returned by this allocator
    /// for `layout`, and must not be used afterwards.
    unsafe fn free(&self, ptr: NonNull<u8>, layout: Layout);
}

/// The default allocator: delegates to `std::alloc`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemAllocator;

impl RawAllocator for SystemAllocator {
    fn alloc(&self, layout: Layout) -> Option<NonNull<u8>> {
        debug_assert!(layout.size() > 0, "zero-sized allocation request");
        // SAFETY: layout has non-zero size.
        NonNull::new(unsafe { alloc::alloc(layout) })
    }

    unsafe fn resize(&self, _ptr: NonNull<u8>, _old_layout: Layout, _new_size: usize) -> bool {
        // The global allocator offers no in-place guarantee.
        false
    }

    unsafe fn remap(
        &self,
        ptr: NonNull<u8>,
        old_layout: Layout,
        new_size: usize,
    ) -> Option<NonNull<u8>> {
        debug_assert!(new_size > 0, "zero-sized remap request");
        // SAFETY: caller guarantees ptr/old_layout describe a live buffer.
        NonNull::new(unsafe { alloc::realloc(ptr.as_ptr(), old_layout, new_size) })
    }

    unsafe fn free(&self, ptr: NonNull<u8>, layout: Layout) {
        // SAFETY: caller guarantees ptr/layout describe a live buffer.
        unsafe { alloc::dealloc(ptr.as_ptr(), layout) };
    }
}

/// A decorator that counts every allocator operation before delegating.
///
/// Counters are atomics so the handle can be shared with a world via
/// `Arc<CountingAllocator>` and read back afterwards.
#[derive(Debug, Default)]
pub struct CountingAllocator<A: RawAllocator = SystemAllocator> {
    inner: A,
    allocs: AtomicUsize,
    resizes: AtomicUsize,
    remaps: AtomicUsize,
    frees: AtomicUsize,
}

impl<A: RawAllocator> CountingAllocator<A> {
    /// Wrap an allocator, starting all counters at zero.
    pub fn new(inner: A) -> Self {
        Self {
            inner,
            allocs: AtomicUsize::new(0),
            resizes: AtomicUsize::new(0),
            remaps: AtomicUsize::new(0),
            frees: AtomicUsize::new(0),
        }
    }

    /// Number of `alloc` calls observed.
    pub fn allocs(&self) -> usize {
        self.allocs.load(Ordering::SeqCst)
    }

    /// Number of `resize` calls observed.
    pub fn resizes(&self) -> usize {
        self.resizes.load(Ordering::SeqCst)
    }

    /// Number of `remap` calls observed.
    pub fn remaps(&self) -> usize {
        self.remaps.load(Ordering::SeqCst)
    }

    /// Number of `free` calls observed.
    pub fn frees(&self) -> usize {
        self.frees.load(Ordering::SeqCst)
    }
}

impl<A: RawAllocator> RawAllocator for CountingAllocator<A> {
    fn alloc(&self, layout: Layout) -> Option<NonNull<u8>> {
        self.allocs.fetch_add(1, Ordering::SeqCst);
        self.inner.alloc(layout)
    }

    unsafe fn resize(&self, ptr: NonNull<u8>, old_layout: Layout, new_size: usize) -> bool {
        self.resizes.fetch_add(1, Ordering::SeqCst);
        // SAFETY: forwarded under the caller's contract.
        unsafe { self.inner.resize(ptr, old_layout, new_size) }
    }

    unsafe fn remap(
        &self,
        ptr: NonNull<u8>,
        old_layout: Layout,
        new_size: usize,
    ) -> Option<NonNull<u8>> {
        self.remaps.fetch_add(1, Ordering::SeqCst);
        // SAFETY: forwarded under the caller's contract.
        unsafe { self.inner.remap(ptr, old_layout, new_size) }
    }

    unsafe fn free(&self, ptr: NonNull<u8>, layout: Layout) {
        self.frees.fetch_add(1, Ordering::SeqCst);
        // SAFETY: forwarded under the caller's contract.
        unsafe { self.inner.free(ptr, layout) }
    }
}
