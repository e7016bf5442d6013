/// Normalized Levenshtein similarity between two strings, in `[0, 1]`.
///
/// `(max_len - distance) / max_len`, lengths counted in chars. Callers
/// lowercase and trim both sides first. Two empty strings are identical.
pub fn similarity(a: &str, b: &str) -> f64 {
    let max_len = a.chars().count().max(b.chars().count());
    if max_len == 0 {
        return 1.0;
    }
    let distance = strsim::levenshtein(a, b);
    (max_len - distance) as f64 / max_len as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_is_one() {
        assert_eq!(similarity("diesel", "diesel"), 1.0);
        assert_eq!(similarity("", ""), 1.0);
    }

    #[test]
    fn test_symmetric() {
        let pairs = [
            ("diesel", "dieesel"),
            ("gás natural", "gas natural"),
            ("lenha", "carvão vegetal"),
            ("", "glp"),
        ];
        for (a, b) in pairs {
            assert_eq!(similarity(a, b), similarity(b, a));
        }
    }

    #[test]
    fn test_one_char_typo() {
        // distance 1 over 7 chars
        let s = similarity("diesel", "dieesel");
        assert!((s - 6.0 / 7.0).abs() < 1e-12);
        assert!(s > 0.85);
    }

    #[test]
    fn test_completely_different() {
        assert_eq!(similarity("abc", "xyz"), 0.0);
        assert_eq!(similarity("", "glp"), 0.0);
    }

    #[test]
    fn test_counts_chars_not_bytes() {
        // "ã" vs "a" is one substitution over 11 chars
        let s = similarity("gás natural", "gas natural");
        assert!((s - 10.0 / 11.0).abs() < 1e-12);
    }

    #[test]
    fn test_transposition_costs_two() {
        // plain Levenshtein: swapping adjacent chars is two edits
        assert!((similarity("ab", "ba") - 0.0).abs() < 1e-12);
    }
}
