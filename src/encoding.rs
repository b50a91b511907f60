//! Base64 Grid Arithmetic
//!
//! Standard base64 (RFC 4648, `=` padded) maps every 3-byte group to
//! 4 characters of 6 bits each. Byte `k` of the input therefore occupies
//! bits `[8k, 8k + 8)` of the bit stream and character `i` of the output
//! carries bits `[6i, 6i + 6)`. Everything in this crate that translates
//! between byte positions and character positions goes through here.

extern crate alloc;
use alloc::string::String;
use alloc::vec::Vec;
use core::ops::Range;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

/// Bytes per base64 group
pub const GROUP_BYTES: usize = 3;
/// Characters per base64 group
pub const GROUP_CHARS: usize = 4;

const BITS_PER_BYTE: usize = 8;
const BITS_PER_CHAR: usize = 6;

/// Filler byte prepended to shift a needle into phases 1 and 2.
///
/// `@` (64). Any value works: only characters carrying no filler bits
/// are ever compared.
pub const DEFAULT_FILLER: u8 = 0x40;

/// Encode raw bytes with the standard padded alphabet.
#[inline]
pub fn encode(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// Decode standard padded base64.
#[inline]
pub fn decode(text: &[u8]) -> Result<Vec<u8>, base64::DecodeError> {
    STANDARD.decode(text)
}

/// Characters whose 6 bits lie entirely inside the bytes `bytes`.
///
/// Characters straddling the boundary also carry bits of whatever sits
/// next to the range, so they are excluded.
#[inline]
pub fn inner_chars(bytes: Range<usize>) -> Range<usize> {
    let start_bit = bytes.start * BITS_PER_BYTE;
    let end_bit = bytes.end * BITS_PER_BYTE;
    let start = start_bit.div_ceil(BITS_PER_CHAR);
    let end = end_bit / BITS_PER_CHAR;
    start..end.max(start)
}

/// Characters carrying at least one bit of the bytes `bytes`.
#[inline]
pub fn covering_chars(bytes: Range<usize>) -> Range<usize> {
    let start_bit = bytes.start * BITS_PER_BYTE;
    let end_bit = bytes.end * BITS_PER_BYTE;
    (start_bit / BITS_PER_CHAR)..end_bit.div_ceil(BITS_PER_CHAR)
}

/// Whole groups covering the bytes `bytes`, in characters.
#[inline]
pub fn covering_groups(bytes: Range<usize>) -> Range<usize> {
    let first = bytes.start / GROUP_BYTES;
    let last = bytes.end.div_ceil(GROUP_BYTES);
    (first * GROUP_CHARS)..(last * GROUP_CHARS)
}

/// Raw length behind a padded encoding, or `None` if `text` is not a
/// whole number of groups.
#[inline]
pub fn decoded_len(text: &[u8]) -> Option<usize> {
    if text.len() % GROUP_CHARS != 0 {
        return None;
    }
    let padding = text.iter().rev().take(2).take_while(|&&c| c == b'=').count();
    Some(text.len() / GROUP_CHARS * GROUP_BYTES - padding)
}
