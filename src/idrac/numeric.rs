/// Loose numeric check used by the poller: optional surrounding whitespace,
/// optional sign, digits with an optional fraction, optional exponent.
/// Hex, binary and empty strings are not numeric.
pub fn is_numeric(raw: &str) -> bool {
    let s = raw.trim_matches(|c: char| c.is_ascii_whitespace()).as_bytes();
    let mut i = 0;

    if matches!(s.first(), Some(b'+' | b'-')) {
        i += 1;
    }

    let int_start = i;
    while i < s.len() && s[i].is_ascii_digit() {
        i += 1;
    }
    let mut digits = i - int_start;

    if i < s.len() && s[i] == b'.' {
        i += 1;
        let frac_start = i;
        while i < s.len() && s[i].is_ascii_digit() {
            i += 1;
        }
        digits += i - frac_start;
    }
    if digits == 0 {
        return false;
    }

    if i < s.len() && matches!(s[i], b'e' | b'E') {
        i += 1;
        if matches!(s.get(i), Some(b'+' | b'-')) {
            i += 1;
        }
        let exp_start = i;
        while i < s.len() && s[i].is_ascii_digit() {
            i += 1;
        }
        if i == exp_start {
            return false;
        }
    }

    i == s.len()
}
