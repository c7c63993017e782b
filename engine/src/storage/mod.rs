//! Columnar storage: growth policy, typed columns, and type-erased columns.
//!
//! A column is a growable buffer that deliberately does not track its own
//! length. Many parallel columns in an archetype share a single length (the
//! entity roster length), so the length is owned by the archetype and passed
//! into every column operation. Embedding a length per column would let the
//! columns of one archetype drift apart.

pub mod alloc;
pub mod erased;
pub mod typed;

pub use alloc::{CountingAllocator, RawAllocator, SystemAllocator};
pub use erased::ErasedColumn;
pub use typed::TypedColumn;

/// The cache line size the growth policy is tuned for.
///
/// The first allocation of a column is sized so that at least one cache line
/// of elements fits, tying the initial step to the target architecture.
pub const CACHE_LINE_BYTES: usize = 64;

/// Compute the capacity a column should grow to.
///
/// Starting from `current`, repeatedly applies `new = new + new/2 + seed`
/// (saturating) until the result covers `minimum`, where
/// `seed = max(1, CACHE_LINE_BYTES / elem_size)`. This yields roughly 1.5x
/// growth with a cache-line-derived initial step; saturation guarantees the
/// loop terminates, and the resulting `usize::MAX` capacity fails cleanly at
/// allocation time.
pub fn grow_capacity(elem_size: usize, current: usize, minimum: usize) -> usize {
    debug_assert!(elem_size > 0, "growth is undefined for zero-sized elements");
    let seed = std::cmp::max(1, CACHE_LINE_BYTES / elem_size);
    let mut new = current;
    while new < minimum {
        new = new.saturating_add(new / 2).saturating_add(seed);
    }
    new
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grow_from_empty_fills_a_cache_line() {
        // A 4-byte element gets a 16-element first step on a 64-byte line.
        assert_eq!(grow_capacity(4, 0, 1), 16);
        // One-byte elements get a whole line.
        assert_eq!(grow_capacity(1, 0, 1), 64);
        // Oversized elements still grow by at least one.
        assert_eq!(grow_capacity(128, 0, 1), 1);
    }

    #[test]
    fn grow_is_roughly_one_and_a_half_times() {
        // Given a current capacity of 64 u32 elements
        let grown = grow_capacity(4, 64, 65);

        // Then one growth step lands at 64 + 32 + 16
        assert_eq!(grown, 112);
    }

    #[test]
    fn grow_keeps_stepping_until_minimum_is_covered() {
        let grown = grow_capacity(4, 0, 1000);
        assert!(grown >= 1000);
    }

    #[test]
    fn grow_saturates_instead_of_overflowing() {
        let grown = grow_capacity(1, usize::MAX - 1, usize::MAX);
        assert_eq!(grown, usize::MAX);
    }

    #[test]
    fn grow_is_a_no_op_when_minimum_is_covered() {
        assert_eq!(grow_capacity(4, 32, 16), 32);
        assert_eq!(grow_capacity(4, 32, 32), 32);
    }
}
