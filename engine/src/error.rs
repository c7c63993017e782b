use thiserror::Error;

/// Errors surfaced by allocating storage operations.
///
/// This is deliberately narrow: allocation failure is the only recoverable
/// failure mode at this layer. Everything else (out-of-bounds removal,
/// duplicate bundle components, typed/erased mismatches) is a programmer
/// error and panics at the call site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Error {
    /// An allocation could not be satisfied. The column or map that raised
    /// this retains its pre-call capacity and contents.
    #[error("allocation failed: out of memory")]
    OutOfMemory,
}

/// Convenience alias used throughout the storage core.
pub type Result<T> = std::result::Result<T, Error>;
