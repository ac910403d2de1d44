//! National-ID checksum validation
//!
//! ROC national IDs are one uppercase letter (region of first issue),
//! a gender digit (1 or 2), then eight digits ending in a check digit.
//! The letter maps to a two-digit code; the code digits plus the nine
//! numeric digits are weighted and summed, and the ID is valid iff the
//! sum is divisible by 10. Single-digit transcription errors always
//! break the sum.

use once_cell::sync::Lazy;
use regex::Regex;

static ID_SHAPE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z][12]\d{8}$").unwrap());

/// Positional weights for the two code digits and nine ID digits.
const WEIGHTS: [u32; 11] = [1, 9, 8, 7, 6, 5, 4, 3, 2, 1, 1];

/// Region-letter to two-digit code, A through Z.
fn letter_code(letter: char) -> Option<u32> {
    let code = match letter {
        'A' => 10,
        'B' => 11,
        'C' => 12,
        'D' => 13,
        'E' => 14,
        'F' => 15,
        'G' => 16,
        'H' => 17,
        'I' => 34,
        'J' => 18,
        'K' => 19,
        'L' => 20,
        'M' => 21,
        'N' => 22,
        'O' => 35,
        'P' => 23,
        'Q' => 24,
        'R' => 25,
        'S' => 26,
        'T' => 27,
        'U' => 28,
        'V' => 29,
        'W' => 32,
        'X' => 30,
        'Y' => 31,
        'Z' => 33,
        _ => return None,
    };
    Some(code)
}

/// Validate a national-ID string against the weighted checksum.
///
/// The shape must match exactly (full match, not substring); anything
/// else is invalid without further computation. Pure function, no I/O.
pub fn is_valid_tw_id(id: &str) -> bool {
    if !ID_SHAPE_RE.is_match(id) {
        return false;
    }

    let mut chars = id.chars();
    let Some(code) = chars.next().and_then(letter_code) else {
        return false;
    };

    let mut digits = Vec::with_capacity(11);
    digits.push(code / 10);
    digits.push(code % 10);
    for ch in chars {
        // Shape check guarantees ASCII digits from here on.
        digits.push(ch.to_digit(10).unwrap_or(0));
    }

    let sum: u32 = WEIGHTS.iter().zip(&digits).map(|(w, d)| w * d).sum();
    sum % 10 == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_valid_ids() {
        assert!(is_valid_tw_id("A123456789"));
        assert!(is_valid_tw_id("F131104093"));
    }

    #[test]
    fn test_checksum_rejects_bad_ids() {
        assert!(!is_valid_tw_id("A123456780"));
        assert!(!is_valid_tw_id("A223456789"));
    }

    #[test]
    fn test_off_by_one_digit_errors_are_caught() {
        // An off-by-one at any digit position perturbs the weighted sum by
        // an amount coprime to 10, so it can never stay divisible.
        let valid = "A123456789";
        for pos in 2..valid.len() {
            let original = valid.as_bytes()[pos] - b'0';
            let mut flipped = valid.as_bytes().to_vec();
            flipped[pos] = b'0' + (original + 1) % 10;
            let flipped = String::from_utf8(flipped).unwrap();
            assert!(!is_valid_tw_id(&flipped), "flip at {pos} not caught: {flipped}");
        }
    }

    #[test]
    fn test_shape_is_enforced_before_checksum() {
        assert!(!is_valid_tw_id(""));
        assert!(!is_valid_tw_id("A12345678"));
        assert!(!is_valid_tw_id("A1234567890"));
        assert!(!is_valid_tw_id("a123456789"));
        assert!(!is_valid_tw_id("A323456789"));
        assert!(!is_valid_tw_id("AB23456789"));
        assert!(!is_valid_tw_id(" A123456789"));
    }

    #[test]
    fn test_substring_never_matches() {
        assert!(!is_valid_tw_id("身分證A123456789號"));
    }
}
