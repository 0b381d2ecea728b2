//! Metacharacter escaping and validity checks.

use std::sync::LazyLock;

use regex::bytes::Regex;

use crate::pattern::template;

/// Any single metacharacter.
static METACHAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[\\^$.|?*+()\[\]{}%]").expect("metacharacter pattern is valid")
});

/// Escape every regex metacharacter in `text` with a backslash.
///
/// The escaped set is `\ ^ $ . | ? * + ( ) [ ] { } %`. `%` is included so
/// escaped text never forms a positional placeholder.
///
/// ```
/// assert_eq!(regcache::escape("1+1=2?"), r"1\+1=2\?");
/// ```
pub fn escape(text: &str) -> String {
    let escaped = template::replace_with(&METACHAR, text.as_bytes(), |m| {
        let mut out = Vec::with_capacity(2);
        out.push(b'\\');
        out.extend_from_slice(m.whole());
        Some(out)
    });
    template::into_text(escaped)
}

/// Returns true if `pattern` compiles as written.
///
/// No preprocessing is applied and nothing is cached.
pub fn is_valid_pattern(pattern: &[u8]) -> bool {
    std::str::from_utf8(pattern)
        .map(|p| Regex::new(p).is_ok())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_metacharacters() {
        assert_eq!(escape("a.b"), r"a\.b");
        assert_eq!(escape(r"\^$.|?*+()[]{}%"), r"\\\^\$\.\|\?\*\+\(\)\[\]\{\}\%");
        assert_eq!(escape("plain text"), "plain text");
        assert_eq!(escape(""), "");
    }

    #[test]
    fn test_escape_keeps_unicode() {
        assert_eq!(escape("héllo (wörld)"), r"héllo \(wörld\)");
    }

    #[test]
    fn test_escaped_text_matches_itself() {
        for text in ["a.b", "(x)", "[0-9]+", "50% off", r"C:\path", "$1.00 ^_^", "{a|b}"] {
            let re = Regex::new(&format!("^{}$", escape(text))).unwrap();
            assert!(re.is_match(text.as_bytes()), "escaped {:?} should match itself", text);
        }
    }

    #[test]
    fn test_is_valid_pattern() {
        assert!(is_valid_pattern(br"\d+"));
        assert!(!is_valid_pattern(b"(unclosed"));
        assert!(!is_valid_pattern(&[0xff, 0xfe]));
    }
}
