//! Wall-clock helpers for lesson times.

/// Minutes since midnight for an `H:MM` / `HH:MM` string.
///
/// Malformed input yields 0 rather than an error; records must be checked
/// with [`is_valid_hhmm`] before they reach the conflict detector.
pub fn parse_time_to_minutes(time: &str) -> u32 {
    let Some((h, m)) = time.split_once(':') else {
        return 0;
    };
    if h.is_empty() || h.len() > 2 || m.len() != 2 {
        return 0;
    }
    if !h.bytes().chain(m.bytes()).all(|b| b.is_ascii_digit()) {
        return 0;
    }
    match (h.parse::<u32>(), m.parse::<u32>()) {
        (Ok(h), Ok(m)) if h < 24 && m < 60 => h * 60 + m,
        _ => 0,
    }
}

/// Strict `HH:MM` check, two digits each.
pub fn is_valid_hhmm(time: &str) -> bool {
    let b = time.as_bytes();
    if b.len() != 5 || b[2] != b':' || !b[..2].iter().chain(&b[3..]).all(u8::is_ascii_digit) {
        return false;
    }
    let d = |i: usize| u32::from(b[i] - b'0');
    d(0) * 10 + d(1) < 24 && d(3) * 10 + d(4) < 60
}

/// Half-open overlap: touching intervals do not overlap.
pub fn intervals_overlap(start_a: u32, end_a: u32, start_b: u32, end_b: u32) -> bool {
    start_a < end_b && start_b < end_a
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn parses_wall_clock() {
        assert_eq!(parse_time_to_minutes("00:00"), 0);
        assert_eq!(parse_time_to_minutes("08:30"), 510);
        assert_eq!(parse_time_to_minutes("7:05"), 425);
        assert_eq!(parse_time_to_minutes("23:59"), 1439);
    }

    #[test]
    fn malformed_time_falls_back_to_zero() {
        for bad in [
            "", "8", "ab:cd", "25:00", "10:60", "10:5", "10:00:00", "-1:00", "+7:05", "07:+5",
            " 7:05",
        ] {
            assert_eq!(parse_time_to_minutes(bad), 0, "{bad}");
        }
    }

    #[test]
    fn strict_format_check() {
        assert!(is_valid_hhmm("07:00"));
        assert!(is_valid_hhmm("23:59"));
        assert!(!is_valid_hhmm("7:00"));
        assert!(!is_valid_hhmm("24:00"));
        assert!(!is_valid_hhmm("12:60"));
        assert!(!is_valid_hhmm("12-30"));
        assert!(!is_valid_hhmm("1a:30"));
    }

    #[test]
    fn back_to_back_intervals_do_not_overlap() {
        assert!(!intervals_overlap(480, 540, 540, 600));
        assert!(intervals_overlap(480, 541, 540, 600));
        assert!(intervals_overlap(480, 600, 500, 510));
    }

    proptest! {
        #[test]
        fn overlap_is_symmetric(a in 0u32..1440, b in 0u32..1440, c in 0u32..1440, d in 0u32..1440) {
            prop_assert_eq!(intervals_overlap(a, b, c, d), intervals_overlap(c, d, a, b));
        }
    }
}
