//! Text cleanup helpers applied by the string primitive before any
//! length or pattern check runs.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Control characters (except newline and tab)
    static ref CONTROL_CHARS: Regex = Regex::new(r"[\x00-\x08\x0B\x0C\x0E-\x1F\x7F]").unwrap();

    /// Pattern to detect HTML tags
    static ref HTML_TAG: Regex = Regex::new(r"<[^>]+>").unwrap();
}

/// Trim leading and trailing whitespace from a string
pub fn trim(value: &str) -> String {
    value.trim().to_string()
}

/// Remove control characters from a string
pub fn remove_control_chars(value: &str) -> String {
    CONTROL_CHARS.replace_all(value, "").to_string()
}

/// Standard cleanup for incoming text: trim, then drop control characters.
pub fn clean_text(value: &str) -> String {
    remove_control_chars(value.trim())
}

/// True if the value contains anything that looks like an HTML tag
pub fn contains_html(value: &str) -> bool {
    HTML_TAG.is_match(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trim() {
        assert_eq!(trim("  hello  "), "hello");
        assert_eq!(trim("\n\tspaces\t\n"), "spaces");
    }

    #[test]
    fn test_remove_control_chars() {
        assert_eq!(remove_control_chars("hello\x00world"), "helloworld");
        // Newlines and tabs are preserved
        assert_eq!(remove_control_chars("hello\nworld"), "hello\nworld");
        assert_eq!(remove_control_chars("a\tb"), "a\tb");
    }

    #[test]
    fn test_clean_text_is_idempotent() {
        let once = clean_text("  API \x07Gateway  ");
        assert_eq!(once, "API Gateway");
        assert_eq!(clean_text(&once), once);
    }

    #[test]
    fn test_contains_html() {
        assert!(contains_html("<b>bold</b>"));
        assert!(contains_html("<script>alert(1)</script>"));
        assert!(!contains_html("plain text"));
        assert!(!contains_html("5 < 6"));
    }
}
