//! Parsing of the free-text counter fields.

/// Parse a counter field the way a lenient integer-prefix parser would.
///
/// Leading whitespace and an optional sign are accepted, then as many ASCII
/// digits as follow; anything after them is ignored. Text without digits and
/// negative values become 0. Values past `u32::MAX` saturate.
#[must_use]
pub fn parse_counter(text: &str) -> u32 {
    let trimmed = text.trim_start();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let mut value: u32 = 0;
    let mut seen_digit = false;
    for byte in digits.bytes() {
        if !byte.is_ascii_digit() {
            break;
        }
        seen_digit = true;
        value = value
            .saturating_mul(10)
            .saturating_add(u32::from(byte - b'0'));
    }

    if !seen_digit || negative { 0 } else { value }
}
