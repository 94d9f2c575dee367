//! Slug derivation
//!
//! Turns titles and names into URL-safe identifiers. Used by the admin
//! surface to prepopulate the slug field of categories, tags, and posts.

/// Generate a URL-friendly slug from a title or name.
///
/// Lowercases the input, maps spaces, underscores, and ASCII punctuation to
/// hyphens, keeps non-ASCII characters as-is, then collapses consecutive
/// hyphens and trims them from both ends.
pub fn generate(source: &str) -> String {
    let mapped: String = source
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || !c.is_ascii() {
                c
            } else {
                '-'
            }
        })
        .collect();

    let mut result = String::with_capacity(mapped.len());
    let mut prev_hyphen = false;

    for c in mapped.chars() {
        if c == '-' {
            if !prev_hyphen && !result.is_empty() {
                result.push(c);
                prev_hyphen = true;
            }
        } else {
            result.push(c);
            prev_hyphen = false;
        }
    }

    result.trim_end_matches('-').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_simple() {
        assert_eq!(generate("Hello World"), "hello-world");
    }

    #[test]
    fn test_uppercase() {
        assert_eq!(generate("UPPERCASE"), "uppercase");
    }

    #[test]
    fn test_punctuation_becomes_hyphen() {
        assert_eq!(generate("Hello, World!"), "hello-world");
    }

    #[test]
    fn test_underscores_and_multiple_spaces() {
        assert_eq!(generate("snake_case   title"), "snake-case-title");
    }

    #[test]
    fn test_leading_trailing_noise() {
        assert_eq!(generate("  --Trimmed--  "), "trimmed");
    }

    #[test]
    fn test_non_ascii_kept() {
        assert_eq!(generate("Café re:découverte"), "café-re-découverte");
    }

    #[test]
    fn test_empty() {
        assert_eq!(generate(""), "");
        assert_eq!(generate("!!!"), "");
    }

    proptest! {
        #[test]
        fn prop_idempotent(input in ".{0,64}") {
            let once = generate(&input);
            prop_assert_eq!(generate(&once), once.clone());
        }

        #[test]
        fn prop_no_edge_or_double_hyphens(input in ".{0,64}") {
            let slug = generate(&input);
            prop_assert!(!slug.starts_with('-'));
            prop_assert!(!slug.ends_with('-'));
            prop_assert!(!slug.contains("--"));
        }

        #[test]
        fn prop_ascii_output_is_url_safe(input in "[ -~]{0,64}") {
            let slug = generate(&input);
            prop_assert!(slug
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'));
        }
    }
}
