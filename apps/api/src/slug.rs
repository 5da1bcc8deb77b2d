use std::sync::LazyLock;

use regex::Regex;

static NON_SLUG_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9]+").expect("static slug regex"));

/// Lower-cases `text` and collapses every run of non `[a-z0-9]` characters
/// into a single dash. Leading and trailing dashes are removed.
pub fn slugify(text: &str) -> String {
    let lowered = text.to_lowercase();
    NON_SLUG_CHARS
        .replace_all(&lowered, "-")
        .trim_matches('-')
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_collapses_runs() {
        assert_eq!(slugify("Acme & Sons, Ltd."), "acme-sons-ltd");
    }

    #[test]
    fn test_slugify_keeps_digits() {
        assert_eq!(slugify("Web3 Labs 2024"), "web3-labs-2024");
    }

    #[test]
    fn test_slugify_non_ascii_becomes_separator() {
        assert_eq!(slugify("Café Zürich"), "caf-z-rich");
    }

    #[test]
    fn test_slugify_only_symbols_is_empty() {
        assert_eq!(slugify("!!!"), "");
    }
}
