//! Sequential catalog codes for artworks (`AA000` .. `ZZ999`).
//!
//! A code is two uppercase letters followed by three digits. Codes map
//! bijectively onto the integer range `0..CODE_SPACE` via
//! `l1 * 26_000 + l2 * 1_000 + n`, which lets the generator continue from the
//! highest code in use and step forward past any that are already taken.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

const LETTERS: &[u8; 26] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Number of slots per leading letter (`26 * 1000`).
const PER_FIRST_LETTER: u32 = 26 * 1000;

/// Total number of representable codes (676,000).
pub const CODE_SPACE: u32 = 26 * PER_FIRST_LETTER;

/// Index of the first code handed out on an empty catalog (`AA001`).
pub const FIRST_INDEX: u32 = 1;

static CODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z]{2}\d{3}$").expect("valid code regex"));

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum CodeError {
    #[error("Invalid artwork code '{0}'. Expected two letters and three digits (e.g. AB123)")]
    InvalidFormat(String),

    #[error("Artwork code space exhausted (maximum ZZ999)")]
    Exhausted,
}

/// Whether `code` has the `AA000` shape.
pub fn is_valid_code(code: &str) -> bool {
    CODE_RE.is_match(code)
}

/// Convert a code into its integer index.
pub fn decode(code: &str) -> Result<u32, CodeError> {
    if !is_valid_code(code) {
        return Err(CodeError::InvalidFormat(code.to_string()));
    }
    let bytes = code.as_bytes();
    let l1 = u32::from(bytes[0] - b'A');
    let l2 = u32::from(bytes[1] - b'A');
    let n: u32 = code[2..]
        .parse()
        .map_err(|_| CodeError::InvalidFormat(code.to_string()))?;
    Ok(l1 * PER_FIRST_LETTER + l2 * 1000 + n)
}

/// Convert an integer index into its code.
pub fn encode(index: u32) -> Result<String, CodeError> {
    let l1 = index / PER_FIRST_LETTER;
    if l1 >= 26 {
        return Err(CodeError::Exhausted);
    }
    let l2 = (index % PER_FIRST_LETTER) / 1000;
    let n = index % 1000;
    Ok(format!(
        "{}{}{n:03}",
        LETTERS[l1 as usize] as char,
        LETTERS[l2 as usize] as char
    ))
}

/// Pick the next free code given every code currently in use.
///
/// Starts one past the highest valid code (or at `AA001` when none exist)
/// and skips forward over taken slots. Codes that do not have the `AA000`
/// shape are ignored when computing the starting point but still count as
/// taken.
pub fn next_code(existing: &[String]) -> Result<String, CodeError> {
    let taken: HashSet<&str> = existing.iter().map(String::as_str).collect();
    let start = existing
        .iter()
        .filter_map(|c| decode(c).ok())
        .max()
        .map(|max| max + 1)
        .unwrap_or(FIRST_INDEX);

    let mut index = start;
    loop {
        let candidate = encode(index)?;
        if !taken.contains(candidate.as_str()) {
            return Ok(candidate);
        }
        index += 1;
    }
}

/// Like [`next_code`], but falls back to a millisecond-timestamp suffix once
/// the sequential space is exhausted.
pub fn next_code_or_fallback(existing: &[String], now_millis: i64) -> String {
    next_code(existing).unwrap_or_else(|_| format!("ZZ-{now_millis}"))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn codes(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    // -- encode / decode ----------------------------------------------------

    #[test]
    fn encode_known_points() {
        assert_eq!(encode(0).unwrap(), "AA000");
        assert_eq!(encode(1).unwrap(), "AA001");
        assert_eq!(encode(999).unwrap(), "AA999");
        assert_eq!(encode(1000).unwrap(), "AB000");
        assert_eq!(encode(26_000).unwrap(), "BA000");
        assert_eq!(encode(CODE_SPACE - 1).unwrap(), "ZZ999");
    }

    #[test]
    fn encode_past_end_is_exhausted() {
        assert_eq!(encode(CODE_SPACE), Err(CodeError::Exhausted));
    }

    #[test]
    fn decode_inverts_encode_across_the_space() {
        for i in (0..CODE_SPACE).step_by(997) {
            let code = encode(i).unwrap();
            assert_eq!(decode(&code).unwrap(), i, "round trip failed for {code}");
        }
        assert_eq!(decode("ZZ999").unwrap(), CODE_SPACE - 1);
    }

    #[test]
    fn decode_rejects_bad_shapes() {
        assert_matches!(decode("A1234"), Err(CodeError::InvalidFormat(_)));
        assert_matches!(decode("ab123"), Err(CodeError::InvalidFormat(_)));
        assert_matches!(decode("AB12"), Err(CodeError::InvalidFormat(_)));
        assert_matches!(decode("AB1234"), Err(CodeError::InvalidFormat(_)));
    }

    // -- next_code ----------------------------------------------------------

    #[test]
    fn empty_catalog_starts_at_aa001() {
        assert_eq!(next_code(&[]).unwrap(), "AA001");
    }

    #[test]
    fn continues_after_highest_code() {
        let existing = codes(&["AA001", "AC017", "AB500"]);
        assert_eq!(next_code(&existing).unwrap(), "AC018");
    }

    #[test]
    fn rolls_over_letter_boundary() {
        assert_eq!(next_code(&codes(&["AZ999"])).unwrap(), "BA000");
    }

    #[test]
    fn ignores_malformed_codes_for_starting_point() {
        let existing = codes(&["legacy-7", "AA004"]);
        assert_eq!(next_code(&existing).unwrap(), "AA005");
    }

    #[test]
    fn repeated_generation_never_duplicates() {
        let mut existing = codes(&["AA003", "AA001"]);
        for _ in 0..50 {
            let code = next_code(&existing).unwrap();
            assert!(!existing.contains(&code), "duplicate code {code}");
            existing.push(code);
        }
    }

    #[test]
    fn exhausted_space_errors_and_falls_back() {
        let existing = codes(&["ZZ999"]);
        assert_eq!(next_code(&existing), Err(CodeError::Exhausted));
        assert_eq!(next_code_or_fallback(&existing, 1_700_000_000_000), "ZZ-1700000000000");
    }
}
