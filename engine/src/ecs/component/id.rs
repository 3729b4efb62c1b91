use std::sync::atomic::{AtomicU32, Ordering};

/// A component type identifier. This is a non-zero unique identifier for a
/// registered component kind, valid for the lifetime of the process.
///
/// Ids are assigned in registration order starting at 1 and are never reused
/// or reclaimed, so downstream storage can use them to index dense per-type
/// arrays and keep 0 as a sentinel.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Id(u32);

impl Id {
    /// Construct a component Id from a raw u32 value.
    #[inline]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the index of this id if it were to live in indexable storage (e.g. Vec)
    #[inline]
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

impl From<u32> for Id {
    #[inline]
    fn from(value: u32) -> Self {
        Self::new(value)
    }
}

impl From<usize> for Id {
    #[inline]
    fn from(value: usize) -> Self {
        Self::new(value as u32)
    }
}

/// The first id handed out by a fresh [`Allocator`].
const FIRST_ID: u32 = 1;

/// Hands out fresh component type [`Id`]s, strictly increasing.
///
/// The counter is atomic, so concurrent registration cannot mint duplicate
/// ids, though registration is still intended to be confined to a single
/// bootstrap phase before systems start running. The counter is never exposed
/// for direct mutation; [`Allocator::next`] is the only operation.
#[derive(Debug)]
pub struct Allocator {
    /// Next available component type identifier.
    next: AtomicU32,
}

impl Default for Allocator {
    fn default() -> Self {
        Self::new()
    }
}

impl Allocator {
    /// Create a new allocator whose first id is 1.
    #[inline]
    pub const fn new() -> Self {
        Self {
            next: AtomicU32::new(FIRST_ID),
        }
    }

    /// Hand out a fresh id, strictly greater than every id previously
    /// returned by this allocator. No error conditions.
    #[inline]
    pub fn next(&self) -> Id {
        Id(self.next.fetch_add(1, Ordering::Relaxed))
    }
}

/// The process-wide allocator consulted by descriptor registration.
static ALLOCATOR: Allocator = Allocator::new();

/// Get the process-wide id allocator.
#[inline]
pub(crate) fn allocator() -> &'static Allocator {
    &ALLOCATOR
}
