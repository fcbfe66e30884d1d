//! Canonical comparison form for award and category names.

use unicode_normalization::UnicodeNormalization;

/// Normalizes a free-text name for comparison: NFKC, lowercase, straight
/// apostrophes, ASCII parentheses and single-spaced, trimmed whitespace.
///
/// Deliberately naive: no stemming, no transliteration, no locale rules.
pub fn normalize(name: &str) -> String {
    let folded: String = name
        .nfkc()
        .flat_map(char::to_lowercase)
        .map(|c| match c {
            '\u{2018}' | '\u{2019}' => '\'',
            '\u{FF08}' => '(',
            '\u{FF09}' => ')',
            other => other,
        })
        .collect();

    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// True when either string contains the other.
pub fn contains_either(a: &str, b: &str) -> bool {
    a.contains(b) || b.contains(a)
}

/// Length in characters, which is what match scores are measured in.
pub fn char_len(s: &str) -> usize {
    s.chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercases_and_collapses_whitespace() {
        assert_eq!(normalize("  Best\t  Motion\nPicture  "), "best motion picture");
    }

    #[test]
    fn folds_full_width_parentheses() {
        assert_eq!(normalize("作品賞（邦画）"), normalize("作品賞(邦画)"));
        assert_eq!(normalize("作品賞（邦画）"), "作品賞(邦画)");
    }

    #[test]
    fn folds_curly_apostrophes() {
        assert_eq!(normalize("Director\u{2019}s Award"), "director's award");
        assert_eq!(normalize("\u{2018}Best\u{2019}"), "'best'");
    }

    #[test]
    fn folds_full_width_latin_and_decomposed_forms() {
        assert_eq!(normalize("ＢＥＳＴ　ＦＩＬＭ"), "best film");
        assert_eq!(normalize("Ame\u{0301}lie"), normalize("Am\u{00E9}lie"));
    }

    #[test]
    fn is_idempotent() {
        for raw in [
            "Academy Award for Best Picture",
            "  最優秀作品賞（日本映画） ",
            "Director\u{2019}s  Fortnight",
            "ＢＥＳＴ　ＦＩＬＭ",
            "",
        ] {
            let once = normalize(raw);
            assert_eq!(normalize(&once), once, "not idempotent for {raw:?}");
        }
    }

    #[test]
    fn containment_is_symmetric() {
        assert!(contains_either("best film editing", "best film"));
        assert!(contains_either("best film", "best film editing"));
        assert!(!contains_either("best picture", "best film"));
    }
}
