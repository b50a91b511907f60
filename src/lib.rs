//! # ALICE-Span
//!
//! **Locate raw bytes inside base64 text, at any alignment**
//!
//! > "A needle has three faces in base64. Search all of them, trust none until decoded."
//!
//! Base64 encodes 3-byte groups into 4 characters, so the characters a
//! needle produces depend on its byte offset modulo 3. Encoding the needle
//! once and searching for it fails two times out of three.
//!
//! ## Architecture
//!
//! - **Candidates**: needle encoded behind 0, 1, 2 (and 3) filler bytes
//! - **Trimming**: only characters whose bits all belong to the needle are kept
//! - **Aligned search**: a hit counts only if it sits on a 4-character group boundary
//! - **Verification**: covering groups are decoded and compared byte for byte
//!
//! | Operation | Time | Space |
//! |-----------|------|-------|
//! | Candidates | O(M) | O(M) |
//! | Search | O(N + M) per phase | O(N) encoded haystack |
//! | Verify | O(M) | O(M) |
//!
//! ## Example
//!
//! ```
//! use alice_span::{locate, Phase};
//!
//! // "abc" starts at byte 2 of "xxabcyy", whose encoding is "eHhhYmN5eQ=="
//! let m = locate(b"abc", b"xxabcyy").unwrap();
//!
//! assert_eq!(m.phase, Phase::Two);
//! assert_eq!(m.byte_offset, 2);
//! assert_eq!((m.offset, m.length), (2, 5));
//! assert_eq!(m.extract("eHhhYmN5eQ=="), Some("hhYmN"));
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod candidate;
pub mod config;
pub mod encoding;
pub mod error;
pub mod search;

pub use candidate::{CandidateSet, EncodedCandidate, Phase};
pub use config::{SearchConfig, TrimPolicy};
pub use encoding::DEFAULT_FILLER;
pub use error::{LocateError, Result};
pub use search::{locate, AlignmentSearch, MatchResult};

/// Version
pub const VERSION: &str = "0.1.0";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_locate() {
        let m = locate(b"abc", b"xxabcyy").unwrap();
        assert_eq!(m.byte_offset, 2);
        assert_eq!(m.span(), 2..7);
    }

    #[test]
    fn test_token_payload() {
        let payload = br#"{"sub":"1234567890","name":"John Doe","iat":1516239022}"#;
        let needle = br#""sub":"1234567890""#;
        let m = locate(needle, payload).unwrap();
        assert_eq!(m.byte_offset, 1);
        assert_eq!(m.phase, Phase::One);
    }

    #[test]
    fn test_not_found() {
        let err = locate(b"nowhere", b"somewhere else entirely").unwrap_err();
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_configured_search() {
        let search = AlignmentSearch::with_config(SearchConfig::new().with_filler(b'#'));
        assert_eq!(search.config().filler, b'#');
        assert_eq!(
            search.locate(b"abc", b"xxabcyy").unwrap(),
            locate(b"abc", b"xxabcyy").unwrap()
        );
    }
}
