//! Token Span Demo
//!
//! Finds a user id inside the base64 payload of a token, at each of the
//! three byte alignments, and masks the characters that carry it.
//!
//! ```bash
//! RUST_LOG=debug cargo run --example locate_token
//! ```

use alice_span::{encoding, AlignmentSearch, LocateError};

fn main() -> Result<(), LocateError> {
    env_logger::init();

    println!("=== ALICE-Span Demo ===\n");

    let needle = br#""sub":"some_user_id""#;
    let search = AlignmentSearch::new();

    for pad in 0..3 {
        let mut payload = Vec::new();
        payload.extend_from_slice(br#"{"alg":"HS256""#);
        payload.extend(std::iter::repeat(b' ').take(pad));
        payload.push(b',');
        payload.extend_from_slice(needle);
        payload.extend_from_slice(br#","iat":1516239022}"#);

        let encoded = encoding::encode(&payload);
        let m = search.locate(needle, &payload)?;

        let mut masked = encoded.clone();
        masked.replace_range(m.span(), &"*".repeat(m.length));

        println!("payload  : {}", String::from_utf8_lossy(&payload));
        println!("encoded  : {encoded}");
        println!("masked   : {masked}");
        println!(
            "  phase {:?}, byte offset {}, chars {}..{} ({:?})\n",
            m.phase,
            m.byte_offset,
            m.offset,
            m.offset + m.length,
            m.extract(&encoded).unwrap_or_default()
        );
    }

    match search.locate(br#""sub":"someone_else""#, br#"{"sub":"some_user_id"}"#) {
        Err(e) if e.is_recoverable() => println!("absent needle -> {e}"),
        other => println!("unexpected: {other:?}"),
    }

    Ok(())
}
