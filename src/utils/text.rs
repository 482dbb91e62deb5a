/// Collapses all whitespace runs (including newlines) into single spaces.
pub fn squash_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Truncates to at most `max` characters, appending an ellipsis when cut.
pub fn truncate_chars(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let cut: String = text.chars().take(max.saturating_sub(1)).collect();
    format!("{}…", cut.trim_end())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_squash_whitespace() {
        assert_eq!(squash_whitespace("a  b\n\nc\t d"), "a b c d");
        assert_eq!(squash_whitespace("  single  "), "single");
        assert_eq!(squash_whitespace(""), "");
    }

    #[test]
    fn test_truncate_chars_short_input() {
        assert_eq!(truncate_chars("hello", 10), "hello");
        assert_eq!(truncate_chars("hello", 5), "hello");
    }

    #[test]
    fn test_truncate_chars_cuts_with_ellipsis() {
        let result = truncate_chars("hello world", 6);
        assert!(result.ends_with('…'));
        assert!(result.chars().count() <= 6);
    }

    #[test]
    fn test_truncate_chars_multibyte() {
        let result = truncate_chars("Близнюки сьогодні", 9);
        assert!(result.chars().count() <= 9);
    }
}
