//! Alignment Candidates
//!
//! The same needle encodes to three different character runs depending
//! on its byte offset modulo 3. Prefixing `k` filler bytes reproduces
//! phase `k`; trimming away every character that carries filler bits
//! (or bits of whatever follows the needle) leaves a run that appears
//! verbatim in any encoding where the needle sits at that phase.
//!
//! Phase 3 is congruent to phase 0. It is built only to check that
//! periodicity, never searched.

extern crate alloc;
use alloc::string::String;
use alloc::vec::Vec;
use core::ops::Range;

use crate::config::{SearchConfig, TrimPolicy, FIXED_TRIM};
use crate::encoding::{encode, inner_chars, GROUP_BYTES, GROUP_CHARS};
use crate::error::{LocateError, Result};

/// Number of filler bytes in front of the needle
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Phase {
    Zero = 0,
    One = 1,
    Two = 2,
    Three = 3,
}

impl Phase {
    /// Every computed phase
    pub const ALL: [Phase; 4] = [Phase::Zero, Phase::One, Phase::Two, Phase::Three];
    /// Phases covering the three residues, in search priority order
    pub const SEARCHED: [Phase; 3] = [Phase::Zero, Phase::One, Phase::Two];

    #[inline]
    pub const fn filler_len(self) -> usize {
        self as usize
    }

    /// Byte offset modulo 3 this phase stands for
    #[inline]
    pub const fn residue(self) -> usize {
        self as usize % GROUP_BYTES
    }

    /// Searched phase for a byte offset residue
    #[inline]
    pub const fn from_residue(byte_offset: usize) -> Phase {
        match byte_offset % GROUP_BYTES {
            0 => Phase::Zero,
            1 => Phase::One,
            _ => Phase::Two,
        }
    }
}

/// Encoding of `filler * phase ++ needle` plus its trustworthy interior
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncodedCandidate {
    phase: Phase,
    text: String,
    trimmed: Range<usize>,
}

impl EncodedCandidate {
    /// Build the candidate for one phase.
    ///
    /// Fails with `MalformedInput` when trimming leaves nothing to search for.
    pub fn build(phase: Phase, needle: &[u8], config: &SearchConfig) -> Result<Self> {
        if needle.is_empty() {
            return Err(LocateError::malformed("empty needle"));
        }

        let fill = phase.filler_len();
        let mut padded = Vec::with_capacity(fill + needle.len());
        padded.resize(fill, config.filler);
        padded.extend_from_slice(needle);
        let text = encode(&padded);

        let trimmed = match config.trim {
            TrimPolicy::Exact => inner_chars(fill..padded.len()),
            TrimPolicy::Fixed => match phase {
                Phase::One | Phase::Two => {
                    if text.len() <= 2 * FIXED_TRIM {
                        return Err(LocateError::malformed(alloc::format!(
                            "phase {} encoding has {} characters, fixed trimming needs more than {}",
                            fill,
                            text.len(),
                            2 * FIXED_TRIM
                        )));
                    }
                    FIXED_TRIM..text.len() - FIXED_TRIM
                }
                Phase::Zero | Phase::Three => 0..text.len(),
            },
        };

        if trimmed.is_empty() {
            return Err(LocateError::malformed(alloc::format!(
                "{}-byte needle leaves no filler-independent characters at phase {}",
                needle.len(),
                fill
            )));
        }

        Ok(Self {
            phase,
            text,
            trimmed,
        })
    }

    #[inline]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Full encoding, filler characters included
    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Interior run that is searched for
    #[inline]
    pub fn trimmed(&self) -> &str {
        &self.text[self.trimmed.clone()]
    }

    /// Characters cut from the front of `text()`
    #[inline]
    pub fn trim_start(&self) -> usize {
        self.trimmed.start
    }
}

/// All four candidates for one needle
#[derive(Clone, Debug)]
pub struct CandidateSet {
    candidates: [EncodedCandidate; 4],
}

impl CandidateSet {
    pub fn build(needle: &[u8], config: &SearchConfig) -> Result<Self> {
        let [zero, one, two, three] = Phase::ALL;
        Ok(Self {
            candidates: [
                EncodedCandidate::build(zero, needle, config)?,
                EncodedCandidate::build(one, needle, config)?,
                EncodedCandidate::build(two, needle, config)?,
                EncodedCandidate::build(three, needle, config)?,
            ],
        })
    }

    #[inline]
    pub fn get(&self, phase: Phase) -> &EncodedCandidate {
        &self.candidates[phase as usize]
    }

    /// Candidates for phases 0, 1, 2 in priority order
    pub fn searched(&self) -> impl Iterator<Item = &EncodedCandidate> {
        Phase::SEARCHED.into_iter().map(move |p| self.get(p))
    }

    /// Three filler bytes form a whole group, so phase 3 must be phase 0
    /// behind exactly one group of filler characters.
    pub fn check_periodicity(&self) -> Result<()> {
        let zero = self.get(Phase::Zero).text();
        let three = self.get(Phase::Three).text();
        if three.get(GROUP_CHARS..) != Some(zero) {
            return Err(LocateError::integrity(
                0,
                alloc::format!("phase 3 encoding {three:?} does not end with phase 0 encoding {zero:?}"),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exact() -> SearchConfig {
        SearchConfig::default()
    }

    fn fixed() -> SearchConfig {
        SearchConfig::default().with_trim(TrimPolicy::Fixed)
    }

    #[test]
    fn test_phase_residue() {
        assert_eq!(Phase::Three.residue(), Phase::Zero.residue());
        assert_eq!(Phase::from_residue(5), Phase::Two);
        assert_eq!(Phase::from_residue(9), Phase::Zero);
        for p in Phase::SEARCHED {
            assert_eq!(Phase::from_residue(p.filler_len()), p);
        }
    }

    #[test]
    fn test_exact_candidates_abc() {
        let set = CandidateSet::build(b"abc", &exact()).unwrap();

        assert_eq!(set.get(Phase::Zero).text(), "YWJj");
        assert_eq!(set.get(Phase::Zero).trimmed(), "YWJj");

        assert_eq!(set.get(Phase::One).text(), "QGFiYw==");
        assert_eq!(set.get(Phase::One).trimmed(), "FiY");
        assert_eq!(set.get(Phase::One).trim_start(), 2);

        assert_eq!(set.get(Phase::Two).text(), "QEBhYmM=");
        assert_eq!(set.get(Phase::Two).trimmed(), "hYm");
        assert_eq!(set.get(Phase::Two).trim_start(), 3);

        assert_eq!(set.get(Phase::Three).text(), "QEBAYWJj");
    }

    #[test]
    fn test_exact_drops_padding_and_partial_tail() {
        // "ab" -> "YWI=": only "YW" carries needle bits alone
        let c = EncodedCandidate::build(Phase::Zero, b"ab", &exact()).unwrap();
        assert_eq!(c.text(), "YWI=");
        assert_eq!(c.trimmed(), "YW");
    }

    #[test]
    fn test_fixed_candidates() {
        let needle = b"\"sub\":\"user-42\"";
        let set = CandidateSet::build(needle, &fixed()).unwrap();
        for p in [Phase::One, Phase::Two] {
            let c = set.get(p);
            assert_eq!(c.trim_start(), FIXED_TRIM);
            assert_eq!(c.trimmed().len(), c.text().len() - 2 * FIXED_TRIM);
            assert_eq!(c.trimmed(), &c.text()[4..c.text().len() - 4]);
        }
        assert_eq!(set.get(Phase::Zero).trimmed(), set.get(Phase::Zero).text());
    }

    #[test]
    fn test_fixed_rejects_short_needle() {
        // "@abc" encodes to 8 characters: nothing left after trimming
        let err = CandidateSet::build(b"abc", &fixed()).unwrap_err();
        assert!(matches!(err, LocateError::MalformedInput { .. }));
    }

    #[test]
    fn test_single_byte_needle() {
        // Phase 1: bits 8..16 never fill a whole character
        let err = EncodedCandidate::build(Phase::One, b"a", &exact()).unwrap_err();
        assert!(matches!(err, LocateError::MalformedInput { .. }));

        // Phase 2: bits 16..24 fill exactly one character
        let c = EncodedCandidate::build(Phase::Two, b"a", &exact()).unwrap();
        assert_eq!(c.trimmed().len(), 1);

        for p in [Phase::One, Phase::Two] {
            let err = EncodedCandidate::build(p, b"a", &fixed()).unwrap_err();
            assert!(matches!(err, LocateError::MalformedInput { .. }));
        }

        assert!(CandidateSet::build(b"a", &exact()).is_err());
    }

    #[test]
    fn test_empty_needle() {
        let err = CandidateSet::build(b"", &exact()).unwrap_err();
        assert!(matches!(err, LocateError::MalformedInput { .. }));
    }

    #[test]
    fn test_periodicity() {
        let mut seed = 0x2545_f491_u32;
        for len in 2..40 {
            let needle: Vec<u8> = (0..len)
                .map(|_| {
                    seed ^= seed << 13;
                    seed ^= seed >> 17;
                    seed ^= seed << 5;
                    seed as u8
                })
                .collect();
            let set = CandidateSet::build(&needle, &exact()).unwrap();
            set.check_periodicity().unwrap();
            assert!(set
                .get(Phase::Three)
                .text()
                .contains(set.get(Phase::Zero).text()));
        }
    }

    #[test]
    fn test_trimmed_independent_of_filler() {
        let needle = b"some_user_id";
        let a = CandidateSet::build(needle, &exact().with_filler(0x40)).unwrap();
        let b = CandidateSet::build(needle, &exact().with_filler(0xff)).unwrap();
        for p in Phase::SEARCHED {
            assert_eq!(a.get(p).trimmed(), b.get(p).trimmed());
        }
        assert_ne!(a.get(Phase::One).text(), b.get(Phase::One).text());
    }
}
