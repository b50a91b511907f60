//! Alignment Search
//!
//! **Problem**: a needle embedded in a haystack does not encode to
//! `base64(needle)` inside `base64(haystack)` unless it starts on a 3-byte
//! group boundary. Two offsets out of three, every character changes.
//!
//! **Approach**:
//! - Build the needle's encoding at all three phases (see [`crate::candidate`])
//! - Search the encoded haystack for each trimmed candidate
//! - Accept only occurrences that put the candidate on a 4-character group
//!   boundary, which pins down the needle's byte offset
//! - Decode the covering groups and compare bytes before reporting anything

extern crate alloc;
use alloc::format;
use core::ops::Range;

use log::{debug, trace};
use memchr::memmem;

use crate::candidate::{CandidateSet, EncodedCandidate, Phase};
use crate::config::SearchConfig;
use crate::encoding::{
    covering_chars, covering_groups, decode, decoded_len, encode, GROUP_BYTES, GROUP_CHARS,
};
use crate::error::{LocateError, Result};

/// Where a needle's bits sit inside an encoded haystack
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MatchResult {
    /// Character offset of the first encoded character carrying needle bits
    pub offset: usize,
    /// Number of encoded characters carrying needle bits
    pub length: usize,
    /// Alignment phase the needle was found at
    pub phase: Phase,
    /// Byte offset of the needle in the raw haystack
    pub byte_offset: usize,
    /// Needle length in bytes
    pub byte_len: usize,
}

impl MatchResult {
    fn new(byte_offset: usize, byte_len: usize) -> Self {
        let chars = covering_chars(byte_offset..byte_offset + byte_len);
        Self {
            offset: chars.start,
            length: chars.len(),
            phase: Phase::from_residue(byte_offset),
            byte_offset,
            byte_len,
        }
    }

    /// Encoded character range `[offset, offset + length)`
    #[inline]
    pub fn span(&self) -> Range<usize> {
        self.offset..self.offset + self.length
    }

    /// Raw byte range of the needle in the haystack
    #[inline]
    pub fn byte_span(&self) -> Range<usize> {
        self.byte_offset..self.byte_offset + self.byte_len
    }

    /// Slice of `encoded` this match covers.
    ///
    /// `None` if `encoded` is not the text the match was taken from.
    #[inline]
    pub fn extract<'a>(&self, encoded: &'a str) -> Option<&'a str> {
        encoded.get(self.span())
    }
}

/// Locates needles inside base64-encoded haystacks
///
/// Stateless apart from its configuration; share freely across threads.
///
/// # Example
/// ```
/// use alice_span::AlignmentSearch;
///
/// let search = AlignmentSearch::new();
/// let m = search.locate(b"abc", b"xxabcyy").unwrap();
///
/// assert_eq!(m.byte_offset, 2);
/// assert_eq!(m.extract("eHhhYmN5eQ=="), Some("hhYmN"));
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AlignmentSearch {
    config: SearchConfig,
}

impl AlignmentSearch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: SearchConfig) -> Self {
        Self { config }
    }

    #[inline]
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Locate `needle` inside `base64(haystack)`.
    ///
    /// # Errors
    /// - `NotFound` if no alignment phase matches
    /// - `Integrity` if aligned textual matches exist but none decodes to `needle`
    /// - `MalformedInput` for empty inputs or needles too short to trim
    pub fn locate(&self, needle: &[u8], haystack: &[u8]) -> Result<MatchResult> {
        self.find(needle, haystack)?
            .ok_or(LocateError::NotFound {
                needle_len: needle.len(),
            })
    }

    /// Like [`locate`](Self::locate), with absence reported as `Ok(None)`.
    pub fn find(&self, needle: &[u8], haystack: &[u8]) -> Result<Option<MatchResult>> {
        if haystack.is_empty() {
            return Err(LocateError::malformed("empty haystack"));
        }
        let encoded = encode(haystack);
        self.search(needle, encoded.as_bytes(), haystack.len())
    }

    /// Locate `needle` inside text that is already standard base64.
    pub fn locate_in_encoded(&self, needle: &[u8], encoded: &str) -> Result<MatchResult> {
        self.find_in_encoded(needle, encoded)?
            .ok_or(LocateError::NotFound {
                needle_len: needle.len(),
            })
    }

    /// Like [`locate_in_encoded`](Self::locate_in_encoded), with absence
    /// reported as `Ok(None)`.
    pub fn find_in_encoded(&self, needle: &[u8], encoded: &str) -> Result<Option<MatchResult>> {
        let encoded = encoded.as_bytes();
        if encoded.is_empty() {
            return Err(LocateError::malformed("empty haystack"));
        }
        let raw_len = decoded_len(encoded).ok_or_else(|| {
            LocateError::malformed(format!(
                "encoded haystack length {} is not a multiple of {}",
                encoded.len(),
                GROUP_CHARS
            ))
        })?;
        self.search(needle, encoded, raw_len)
    }

    fn search(&self, needle: &[u8], encoded: &[u8], raw_len: usize) -> Result<Option<MatchResult>> {
        let candidates = CandidateSet::build(needle, &self.config)?;
        candidates.check_periodicity()?;

        let mut rejected = None;
        for candidate in candidates.searched() {
            trace!(
                "phase {}: searching for {:?}",
                candidate.phase().filler_len(),
                candidate.trimmed()
            );
            for found in Self::aligned_hits(candidate, needle.len(), encoded, raw_len) {
                match verify(needle, encoded, &found) {
                    Ok(()) => {
                        debug!(
                            "needle ({} bytes) matched at phase {}: byte offset {}, encoded span {:?}",
                            needle.len(),
                            found.phase.filler_len(),
                            found.byte_offset,
                            found.span()
                        );
                        return Ok(Some(found));
                    }
                    Err(e) => {
                        debug!("hit at byte offset {} rejected: {e}", found.byte_offset);
                        if rejected.is_none() {
                            rejected = Some(e);
                        }
                    }
                }
            }
        }

        // Only textual look-alikes were seen: surface the first failed check.
        if let Some(e) = rejected {
            return Err(e);
        }
        debug!("needle ({} bytes) not found at any phase", needle.len());
        Ok(None)
    }

    /// Occurrences of `candidate` that land on a group boundary and keep
    /// the needle inside the raw haystack.
    fn aligned_hits<'a>(
        candidate: &'a EncodedCandidate,
        needle_len: usize,
        encoded: &'a [u8],
        raw_len: usize,
    ) -> impl Iterator<Item = MatchResult> + 'a {
        let phase = candidate.phase();
        memmem::find_iter(encoded, candidate.trimmed().as_bytes()).filter_map(move |pos| {
            let start = pos.checked_sub(candidate.trim_start())?;
            if start % GROUP_CHARS != 0 {
                trace!("phase {}: skipping unaligned hit at {}", phase.filler_len(), pos);
                return None;
            }
            let byte_offset = start / GROUP_CHARS * GROUP_BYTES + phase.residue();
            if byte_offset + needle_len > raw_len {
                return None;
            }
            Some(MatchResult::new(byte_offset, needle_len))
        })
    }
}

/// Decode the groups covering the match and compare them with `needle`.
///
/// The trimmed run leaves up to 4 needle bits at each end unchecked, so a
/// textual hit alone does not prove the bytes are there.
fn verify(needle: &[u8], encoded: &[u8], found: &MatchResult) -> Result<()> {
    let groups = covering_groups(found.byte_span());
    let span = encoded.get(groups.clone()).ok_or_else(|| {
        LocateError::integrity(found.offset, "covering groups run past the encoded haystack")
    })?;

    let decoded = decode(span).map_err(|e| {
        LocateError::integrity(found.offset, format!("covering groups do not decode: {e}"))
    })?;

    let local = found.byte_offset - groups.start / GROUP_CHARS * GROUP_BYTES;
    if decoded.get(local..local + needle.len()) != Some(needle) {
        return Err(LocateError::integrity(
            found.offset,
            "decoded bytes differ from the needle",
        ));
    }

    if encode(&decoded).as_bytes() != span {
        return Err(LocateError::integrity(
            found.offset,
            "covering groups are not a canonical encoding",
        ));
    }

    Ok(())
}

/// Locate `needle` inside `base64(haystack)` with the default configuration.
pub fn locate(needle: &[u8], haystack: &[u8]) -> Result<MatchResult> {
    AlignmentSearch::new().locate(needle, haystack)
}
