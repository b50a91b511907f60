//! Search configuration

use crate::encoding::DEFAULT_FILLER;

/// How alignment candidates are trimmed before searching.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TrimPolicy {
    /// Keep exactly the characters whose bits all belong to the needle.
    #[default]
    Exact,
    /// Phase 0 untouched; phases 1 and 2 lose 4 characters at each end.
    ///
    /// Removes a superset of the unstable characters, so it never misses
    /// on alignment grounds, but short needles trim to nothing and phase 0
    /// keeps its `=` padding.
    Fixed,
}

/// Number of characters [`TrimPolicy::Fixed`] drops from each end.
pub const FIXED_TRIM: usize = 4;

/// Parameters for [`AlignmentSearch`](crate::AlignmentSearch)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SearchConfig {
    /// Byte used to shift the needle into phases 1..=3
    pub filler: u8,
    /// Candidate trimming rule
    pub trim: TrimPolicy,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            filler: DEFAULT_FILLER,
            trim: TrimPolicy::default(),
        }
    }
}

impl SearchConfig {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_filler(mut self, filler: u8) -> Self {
        self.filler = filler;
        self
    }

    #[must_use]
    pub fn with_trim(mut self, trim: TrimPolicy) -> Self {
        self.trim = trim;
        self
    }
}
