//! Stretch factor for the hash mixer.

use std::num::NonZeroUsize;

/// How many digest lengths of raw entropy are hashed per output segment.
///
/// Always between 1 and [`StretchFactor::MAX`]. Fixed for the lifetime of a
/// mixer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StretchFactor(NonZeroUsize);

impl StretchFactor {
    /// Largest accepted factor.
    ///
    /// Keeps the per-segment pull `F * D` far below `usize::MAX` for any
    /// fixed-output hash.
    pub const MAX: usize = 1024;

    /// The default factor of 5.
    pub const DEFAULT: Self = match Self::new(5) {
        Some(factor) => factor,
        None => panic!("default stretch factor must be in range"),
    };

    /// Returns `None` for zero or anything above [`StretchFactor::MAX`].
    pub const fn new(factor: usize) -> Option<Self> {
        if factor > Self::MAX {
            return None;
        }
        match NonZeroUsize::new(factor) {
            Some(n) => Some(Self(n)),
            None => None,
        }
    }

    /// Returns the factor as a plain integer.
    #[inline]
    pub const fn get(self) -> usize {
        self.0.get()
    }
}

impl Default for StretchFactor {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl std::fmt::Display for StretchFactor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}
