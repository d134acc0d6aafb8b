//! # Process-unique subsystem identifiers.
//!
//! Every subsystem is assigned a [`Tag`] at construction from a process-wide
//! monotonic counter. Tags are never reused; peers address each other through
//! the registry by tag, never by direct reference.

use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};

/// High byte folded into every tag so they stand out in logs and dumps.
const TAG_PREFIX: u32 = 0x5500_0000;

/// Counter values at or above this would clobber the prefix byte.
const TAG_LIMIT: u32 = 0x0100_0000;

static TAG_SEQ: AtomicU32 = AtomicU32::new(0);

/// Opaque process-unique identifier of a subsystem.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Tag(u32);

impl Tag {
    /// Allocates the next tag.
    ///
    /// Exhausting the 24-bit counter space would make tags ambiguous, so it
    /// is treated as a fatal programming error.
    pub(crate) fn next() -> Tag {
        let seq = TAG_SEQ.fetch_add(1, Ordering::Relaxed) + 1;
        assert!(seq < TAG_LIMIT, "subsystem tag space exhausted");
        Tag(TAG_PREFIX | seq)
    }

    /// Raw numeric value, prefix included.
    pub fn as_u32(self) -> u32 {
        self.0
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#010x}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_are_unique_and_ascending() {
        let a = Tag::next();
        let b = Tag::next();
        assert_ne!(a, b);
        assert!(b > a);
    }

    #[test]
    fn tags_carry_the_prefix() {
        let tag = Tag::next();
        assert_eq!(tag.as_u32() & 0xff00_0000, TAG_PREFIX);
        assert!(format!("{tag}").starts_with("0x55"));
    }
}
