//! Title normalization.
//!
//! Book titles double as output file stems, so everything outside a small
//! allowed set is dropped: ASCII letters and digits, Latin-1 letters
//! (`À`..=`ÿ`), hyphens, parentheses and whitespace.

/// Strip every disallowed character from a raw title.
///
/// Total and idempotent; may return an empty string.
pub fn normalize_title(raw: &str) -> String {
    raw.chars().filter(|&c| is_allowed(c)).collect()
}

fn is_allowed(c: char) -> bool {
    c.is_ascii_alphanumeric()
        || ('\u{C0}'..='\u{FF}').contains(&c)
        || matches!(c, '-' | '(' | ')')
        || c.is_whitespace()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_punctuation() {
        assert_eq!(
            normalize_title("Thinking, Fast and Slow: A Study (Kahneman, Daniel)"),
            "Thinking Fast and Slow A Study (Kahneman Daniel)"
        );
    }

    #[test]
    fn test_keeps_extended_latin() {
        assert_eq!(normalize_title("Cien años de soledad"), "Cien años de soledad");
        assert_eq!(normalize_title("Crème brûlée—à la carte"), "Crème brûléeà la carte");
    }

    #[test]
    fn test_drops_path_separators() {
        assert_eq!(normalize_title("../etc/passwd"), "etcpasswd");
        assert_eq!(normalize_title("C:\\Books\\Dune"), "CBooksDune");
    }

    #[test]
    fn test_titles_collapse_to_same_key() {
        assert_eq!(normalize_title("Dune!"), normalize_title("Dune?"));
    }

    #[test]
    fn test_pathological_input_is_empty() {
        assert_eq!(normalize_title("!!!???"), "");
        assert_eq!(normalize_title(""), "");
    }

    #[test]
    fn test_idempotent() {
        for raw in [
            "Dune: Messiah",
            "Ñandú — el ave",
            "(2nd ed.) Rust in Action",
            "文字 mixed ascii",
        ] {
            let once = normalize_title(raw);
            assert_eq!(normalize_title(&once), once, "not idempotent for {:?}", raw);
        }
    }
}
