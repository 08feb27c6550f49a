//! Postal-code distance proxy.
//!
//! Not a geographic distance: the numeric difference between two codes is
//! only good enough to order candidates relative to each other.

/// Distance reported when either code cannot be read as a number.
///
/// Larger than any difference between two five-digit codes.
pub const INVALID_DISTANCE: u32 = 999_999;

/// Number of leading characters that make up an area code.
pub const AREA_CODE_LEN: usize = 3;

/// Leading characters compared by the proxy.
const CODE_LEN: usize = 5;

/// Ordering-only distance between two postal codes.
pub fn distance(a: &str, b: &str) -> u32 {
    match (code_value(a), code_value(b)) {
        (Some(a), Some(b)) => a.abs_diff(b),
        _ => INVALID_DISTANCE,
    }
}

/// Numeric value of the leading five characters. Surrounding whitespace
/// counts toward those five, so callers pass codes through [`clean_code`]
/// first.
fn code_value(code: &str) -> Option<u32> {
    let leading = prefix(code, CODE_LEN).trim();
    if leading.is_empty() || !leading.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    leading.parse().ok()
}

/// First `len` characters of `code` (the whole code when shorter).
pub fn prefix(code: &str, len: usize) -> &str {
    match code.char_indices().nth(len) {
        Some((end, _)) => &code[..end],
        None => code,
    }
}

/// Trims the code and drops anything after the first whitespace.
pub fn clean_code(code: &str) -> &str {
    code.split_whitespace().next().unwrap_or("")
}

/// Five-character postal code of a possibly noisy code ("68137-4410 NE").
pub fn postal_code(code: &str) -> &str {
    prefix(clean_code(code), CODE_LEN)
}

/// Coarse clustering key for a code.
pub fn area_code(code: &str) -> &str {
    prefix(code, AREA_CODE_LEN)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_code_is_zero() {
        assert_eq!(distance("68137", "68137"), 0);
    }

    #[test]
    fn test_absolute_difference() {
        assert_eq!(distance("68137", "68104"), 33);
        assert_eq!(distance("68104", "68137"), 33);
    }

    #[test]
    fn test_only_leading_five_characters_count() {
        assert_eq!(distance("68137-1234", "68137"), 0);
    }

    #[test]
    fn test_leading_whitespace_takes_a_digit_slot() {
        assert_eq!(distance(" 68137", "68137"), 61324);
        assert_eq!(distance(clean_code(" 68137"), "68137"), 0);
    }

    #[test]
    fn test_postal_code() {
        assert_eq!(postal_code(" 68137-4410 NE"), "68137");
        assert_eq!(postal_code("515"), "515");
        assert_eq!(postal_code("  "), "");
    }

    #[test]
    fn test_invalid_code_is_sentinel() {
        assert_eq!(distance("ABCDE", "68137"), INVALID_DISTANCE);
        assert_eq!(distance("68137", ""), INVALID_DISTANCE);
        assert_eq!(distance("681a7", "68137"), INVALID_DISTANCE);
        assert!(INVALID_DISTANCE > distance("00000", "99999"));
    }

    #[test]
    fn test_clean_code_strips_noise() {
        assert_eq!(clean_code("  68137 NE "), "68137");
        assert_eq!(clean_code("   "), "");
    }

    #[test]
    fn test_area_code_short_codes() {
        assert_eq!(area_code("68137"), "681");
        assert_eq!(area_code("68"), "68");
    }
}
