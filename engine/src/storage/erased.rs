//! The type-erased column: the same buffer as [`TypedColumn`], driven by a
//! runtime [`Info`] instead of a compile-time `T`.
//!
//! An archetype owns one erased column per non-zero-sized component, so the
//! columns of one archetype can live in a single homogeneous `Vec`. All byte
//! arithmetic uses the element stride (`layout.pad_to_align().size()`);
//! element `i` begins at byte offset `i * stride`.
//!
//! Typed access goes through the `ensure_type` boundary: the generic entry
//! points assert that the caller's `C` matches the column's [`Info`] in both
//! hash and layout, in every build profile. Driving a column with a type it
//! was not created for is a programmer error, not a recoverable one.

use std::{
    alloc::Layout,
    ptr::{self, NonNull},
};

use crate::{
    component::{Component, Info},
    error::{Error, Result},
    hash::hash_type,
    storage::{RawAllocator, TypedColumn, grow_capacity},
    world::World,
};

/// A growable byte buffer of uniformly laid out elements, with externally
/// tracked length.
///
/// Carries the same invariants as [`TypedColumn`]: dangling pointer at
/// capacity 0, capacity `usize::MAX` and no allocations for zero-sized
/// layouts, and a buffer of exactly `capacity * stride` bytes otherwise.
pub struct ErasedColumn {
    /// Pointer to the start of the buffer; dangling until the first growth.
    ptr: NonNull<u8>,

    /// Number of elements the buffer can hold.
    capacity: usize,

    /// Element description: hash, layout, and the hook vtable.
    info: Info,
}

// SAFETY: everything that enters a column is bounded by `Component`
// (Send + Sync); the column itself owns its buffer.
unsafe impl Send for ErasedColumn {}
unsafe impl Sync for ErasedColumn {}

impl ErasedColumn {
    /// Construct an empty column for the given element description.
    #[inline]
    pub fn new(info: Info) -> Self {
        let capacity = if info.is_zero_sized() { usize::MAX } else { 0 };
        Self {
            ptr: NonNull::dangling(),
            capacity,
            info,
        }
    }

    /// Assemble a column from its raw parts.
    ///
    /// # Safety
    /// The buffer must hold exactly `capacity` elements of `info`'s layout
    /// and must have been allocated by the allocator later passed into the
    /// column's allocating and releasing operations.
    pub(crate) unsafe fn from_raw_parts(ptr: NonNull<u8>, capacity: usize, info: Info) -> Self {
        Self { ptr, capacity, info }
    }

    /// Bridge a typed buffer into an erased column. The element description
    /// is derived from `C` itself (against `world`'s hook table when given),
    /// so a mismatched [`Info`] cannot be forged.
    pub fn from_owned<C: Component>(items: Box<[C]>, world: Option<&World>) -> Self {
        let info = match world {
            Some(world) => Info::of::<C>(world),
            None => Info::new::<C>(),
        };
        TypedColumn::from_owned(items).erase_with(info)
    }

    /// Adopt a raw byte buffer whose length is an exact multiple of the
    /// element stride. The capacity is `byte_len / stride`.
    ///
    /// # Panics
    /// Panics if `byte_len` is not a multiple of the stride.
    ///
    /// # Safety
    /// The buffer must be aligned for `info.layout()` and must have been
    /// allocated by the allocator later passed into the column's allocating
    /// and releasing operations.
    pub unsafe fn from_erased_slice(ptr: NonNull<u8>, byte_len: usize, info: Info) -> Self {
        let stride = info.stride();
        if stride == 0 {
            assert!(byte_len == 0, "byte buffer for a zero-sized element type");
            return Self::new(info);
        }
        assert!(
            byte_len % stride == 0,
            "byte length {byte_len} is not a multiple of the element stride {stride}"
        );
        // SAFETY: forwarded under the caller's contract.
        unsafe { Self::from_raw_parts(ptr, byte_len / stride, info) }
    }

    /// The element description this column was created with.
    #[inline]
    pub fn info(&self) -> &Info {
        &self.info
    }

    /// Number of elements the column can hold without growing.
    #[inline]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Byte distance between consecutive elements.
    #[inline]
    pub fn stride(&self) -> usize {
        self.info.stride()
    }

    /// Pointer to the element at `index`.
    #[inline]
    pub fn ptr_at(&self, index: usize) -> NonNull<u8> {
        debug_assert!(
            index < self.capacity,
            "index {} out of bounds (capacity: {})",
            index,
            self.capacity
        );
        // SAFETY: add of a multiple of the stride inside the allocation
        // cannot wrap or leave the buffer.
        unsafe { NonNull::new_unchecked(self.ptr.as_ptr().add(index * self.stride())) }
    }

    /// Assert that `C` is the type this column stores.
    ///
    /// # Panics
    /// Panics, in all build profiles, if `C`'s hash or layout differs from
    /// the column's [`Info`].
    #[inline]
    pub fn ensure_type<C: Component>(&self) {
        assert!(
            hash_type::<C>() == self.info.hash(),
            "Type mismatch: attempted to use type {} with column storing {:?}",
            std::any::type_name::<C>(),
            self.info
        );
        assert!(
            Layout::new::<C>() == self.info.layout(),
            "Layout mismatch: element layout does not match column layout"
        );
    }

    /// Append `value` at index `*len`, growing if needed, and increment the
    /// length. This is the typed insertion boundary over the erased buffer.
    ///
    /// # Panics
    /// Panics if `C` does not match the column's element type.
    pub fn append<C: Component>(
        &mut self,
        alloc: &dyn RawAllocator,
        value: C,
        len: &mut usize,
    ) -> Result<()> {
        self.ensure_type::<C>();
        let needed = len.checked_add(1).ok_or(Error::OutOfMemory)?;
        self.ensure_total_capacity(alloc, needed, *len)?;
        // SAFETY: capacity covers *len and the type was just validated.
        unsafe { self.write(*len, value) };
        *len += 1;
        Ok(())
    }

    /// Write `value` into the (possibly uninitialized) slot at `index`.
    /// Used to populate rows reserved by archetype growth.
    ///
    /// # Panics
    /// Panics if `C` does not match the column's element type.
    ///
    /// # Safety
    /// `index` must be within capacity, and any previous value in the slot
    /// is overwritten without being dropped.
    pub unsafe fn write<C: Component>(&mut self, index: usize, value: C) {
        self.ensure_type::<C>();
        // SAFETY: index is within capacity per the caller's contract.
        unsafe { self.ptr_at(index).as_ptr().cast::<C>().write(value) };
    }

    /// View the first `len` elements as a typed slice.
    ///
    /// # Panics
    /// Panics if `C` does not match the column's element type.
    ///
    /// # Safety
    /// The caller must ensure the first `len` elements are initialized.
    pub unsafe fn as_slice<C: Component>(&self, len: usize) -> &[C] {
        self.ensure_type::<C>();
        // SAFETY: type validated; caller attests len initialized elements.
        unsafe { std::slice::from_raw_parts(self.ptr.as_ptr().cast::<C>(), len) }
    }

    /// View the first `len` elements as a mutable typed slice.
    ///
    /// # Panics
    /// Panics if `C` does not match the column's element type.
    ///
    /// # Safety
    /// The caller must ensure the first `len` elements are initialized.
    pub unsafe fn as_mut_slice<C: Component>(&mut self, len: usize) -> &mut [C] {
        self.ensure_type::<C>();
        // SAFETY: type validated; caller attests len initialized elements.
        unsafe { std::slice::from_raw_parts_mut(self.ptr.as_ptr().cast::<C>(), len) }
    }

    /// Copy the last element's bytes into `dst` and decrement the length.
    /// Returns `false` when the column is empty.
    ///
    /// The value now lives in `dst`; the vacated slot is released without
    /// running the destructor hook.
    ///
    /// # Safety
    /// `dst` must be valid for `layout().size()` bytes and the first `*len`
    /// elements must be initialized.
    pub unsafe fn pop(&mut self, dst: NonNull<u8>, len: &mut usize) -> bool {
        if *len == 0 {
            return false;
        }
        *len -= 1;
        // SAFETY: the old last element is initialized; dst is valid per the
        // caller's contract.
        unsafe {
            ptr::copy_nonoverlapping(
                self.ptr_at(*len).as_ptr(),
                dst.as_ptr(),
                self.info.layout().size(),
            );
        }
        true
    }

    /// Copy element `index` into `dst`, overwrite the slot byte-wise with
    /// the last element, and decrement the length. Returns `false` when the
    /// column is empty. O(stride).
    ///
    /// The moved-out value is not dropped here; the caller owns what lands
    /// in `dst`. Trailing pad bytes are not copied.
    ///
    /// # Panics
    /// Panics if the column is non-empty and `index >= *len`.
    ///
    /// # Safety
    /// `dst` must be valid for `layout().size()` bytes and the first `*len`
    /// elements must be initialized.
    pub unsafe fn swap_remove(&mut self, dst: NonNull<u8>, index: usize, len: &mut usize) -> bool {
        if *len == 0 {
            return false;
        }
        assert!(
            index < *len,
            "swap_remove index {index} out of bounds (len: {len})"
        );
        *len -= 1;
        let last = *len;
        let size = self.info.layout().size();
        // SAFETY: index and last are both below the old length, hence
        // initialized; dst is valid per the caller's contract.
        unsafe {
            ptr::copy_nonoverlapping(self.ptr_at(index).as_ptr(), dst.as_ptr(), size);
            if index != last {
                ptr::copy_nonoverlapping(self.ptr_at(last).as_ptr(), self.ptr_at(index).as_ptr(), size);
            }
        }
        true
    }

    /// Ensure the column can hold at least `new_capacity` elements, growing
    /// by the cache-line-seeded policy. No-op for zero-sized layouts and
    /// when the capacity is already sufficient.
    pub fn ensure_total_capacity(
        &mut self,
        alloc: &dyn RawAllocator,
        new_capacity: usize,
        len: usize,
    ) -> Result<()> {
        if self.info.is_zero_sized() || new_capacity <= self.capacity {
            return Ok(());
        }
        let grown = grow_capacity(self.stride(), self.capacity, new_capacity);
        self.ensure_total_capacity_precise(alloc, grown, len)
    }

    /// Ensure the column can hold exactly `new_capacity` elements. Same
    /// remap-then-copy strategy as the typed column; on allocation failure
    /// the column keeps its previous buffer unchanged.
    pub fn ensure_total_capacity_precise(
        &mut self,
        alloc: &dyn RawAllocator,
        new_capacity: usize,
        len: usize,
    ) -> Result<()> {
        if self.info.is_zero_sized() || new_capacity <= self.capacity {
            return Ok(());
        }
        let new_layout = self.buffer_layout(new_capacity)?;

        if self.capacity == 0 {
            let ptr = alloc.alloc(new_layout).ok_or(Error::OutOfMemory)?;
            self.ptr = ptr;
            self.capacity = new_capacity;
            return Ok(());
        }

        let old_layout = self
            .buffer_layout(self.capacity)
            .expect("layout overflow");
        // SAFETY: the buffer is live and was allocated with old_layout.
        if let Some(ptr) = unsafe { alloc.remap(self.ptr, old_layout, new_layout.size()) } {
            self.ptr = ptr;
            self.capacity = new_capacity;
            return Ok(());
        }

        let fresh = alloc.alloc(new_layout).ok_or(Error::OutOfMemory)?;
        // SAFETY: both buffers are live and disjoint; the old buffer is
        // released only after the new one is populated.
        unsafe {
            ptr::copy_nonoverlapping(self.ptr.as_ptr(), fresh.as_ptr(), len * self.stride());
            alloc.free(self.ptr, old_layout);
        }
        self.ptr = fresh;
        self.capacity = new_capacity;
        Ok(())
    }

    /// Run the destructor hook once per live element, then release the
    /// buffer. Safe to call on a column that never allocated.
    pub fn deinit(&mut self, alloc: &dyn RawAllocator, len: usize) {
        let dtor = self.info.hook().dtor();
        for index in 0..len {
            // SAFETY: each of the first len elements is initialized and the
            // hook runs exactly once per element.
            unsafe { dtor(self.ptr_at(index), alloc) };
        }
        if !self.info.is_zero_sized() && self.capacity > 0 {
            let layout = self
                .buffer_layout(self.capacity)
                .expect("layout overflow");
            // SAFETY: the buffer is live and was allocated with this layout.
            unsafe { alloc.free(self.ptr, layout) };
        }
        self.ptr = NonNull::dangling();
        self.capacity = if self.info.is_zero_sized() { usize::MAX } else { 0 };
    }

    /// Layout for a buffer of `capacity` elements at the column alignment.
    fn buffer_layout(&self, capacity: usize) -> Result<Layout> {
        let size = self
            .stride()
            .checked_mul(capacity)
            .ok_or(Error::OutOfMemory)?;
        Layout::from_size_align(size, self.info.layout().align()).map_err(|_| Error::OutOfMemory)
    }
}
