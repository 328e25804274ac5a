//! Roman-numeral repeat markers.
//!
//! Registry column names may end with a Roman numeral marking a repeated
//! measurement, without any separator. A name like `colonbioptiii` could
//! therefore be `colonbiopt` + `III`, `colonbiopti` + `II` or
//! `colonbioptii` + `I`. Matching collects every numeral that is a suffix
//! of the name and orders them longest first, so the most specific marker
//! is tried against the codebook before the shorter ones.

/// The first twenty Roman numerals, the highest repeat seen in exports.
pub const ROMANS: [&str; 20] = [
    "I", "II", "III", "IV", "V", "VI", "VII", "VIII", "IX", "X", "XI", "XII", "XIII", "XIV", "XV",
    "XVI", "XVII", "XVIII", "XIX", "XX",
];

const RENDERED: [&str; 20] = [
    "", "2", "3", "4", "5", "6", "7", "8", "9", "10", "11", "12", "13", "14", "15", "16", "17",
    "18", "19", "20",
];

/// Every Roman numeral that is an ASCII case-insensitive suffix of
/// `name`, longest first. Matching is byte-wise, so stripping a matched
/// suffix from `name` always lands on a character boundary.
pub fn suffix_matches(name: &str) -> Vec<&'static str> {
    let mut matches: Vec<&'static str> = ROMANS
        .iter()
        .copied()
        .filter(|roman| is_ascii_suffix(name, roman))
        .collect();
    matches.sort_by_key(|roman| std::cmp::Reverse(roman.len()));
    matches
}

fn is_ascii_suffix(name: &str, roman: &str) -> bool {
    let bytes = name.as_bytes();
    bytes.len() >= roman.len()
        && bytes[bytes.len() - roman.len()..].eq_ignore_ascii_case(roman.as_bytes())
}

/// Arabic rendering of a marker. A first occurrence carries no suffix in
/// the output, so `I` renders empty; an unknown or empty marker renders
/// empty as well.
pub fn render(roman: &str) -> &'static str {
    ROMANS
        .iter()
        .position(|candidate| candidate.eq_ignore_ascii_case(roman))
        .map_or("", |index| RENDERED[index])
}

#[cfg(test)]
mod tests {
    use super::{render, suffix_matches};

    #[test]
    fn longest_suffix_first() {
        assert_eq!(suffix_matches("colonbioptiii"), ["III", "II", "I"]);
        assert_eq!(suffix_matches("colonbioptii"), ["II", "I"]);
        assert_eq!(suffix_matches("colonbioptxiv"), ["XIV", "IV", "V"]);
    }

    #[test]
    fn matching_is_case_insensitive() {
        assert_eq!(suffix_matches("COLONBIOPTIX"), ["IX", "X"]);
    }

    #[test]
    fn no_match_for_plain_names() {
        assert!(suffix_matches("depvenr").is_empty());
    }

    #[test]
    fn non_ascii_lookalikes_do_not_match() {
        // U+0131 uppercases to "I" but is not an ASCII suffix
        assert!(suffix_matches("colonbiopt\u{131}").is_empty());
    }

    #[test]
    fn first_repeat_renders_empty() {
        assert_eq!(render("I"), "");
        assert_eq!(render("i"), "");
    }

    #[test]
    fn later_repeats_render_arabic() {
        assert_eq!(render("II"), "2");
        assert_eq!(render("iii"), "3");
        assert_eq!(render("XX"), "20");
    }

    #[test]
    fn unknown_marker_renders_empty() {
        assert_eq!(render(""), "");
        assert_eq!(render("L"), "");
    }
}
