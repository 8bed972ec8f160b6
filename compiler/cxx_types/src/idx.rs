//! Registry entry handle.
//!
//! `Idx` addresses one slot of the registry arena. Handles are only
//! meaningful for the registry that produced them; the arena never
//! shrinks, so a handle stays valid for the registry's lifetime.

use std::fmt;

/// A 32-bit index into a [`Registry`](crate::Registry) arena.
#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct Idx(u32);

impl Idx {
    /// Position in the arena.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    #[allow(clippy::expect_used, reason = "an arena past u32::MAX entries is a bug")]
    pub(crate) fn from_len(len: usize) -> Self {
        Self(u32::try_from(len).expect("registry exceeded u32::MAX entries"))
    }
}

impl fmt::Debug for Idx {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Idx({})", self.0)
    }
}
