// src/utils/html.rs

/// Escapes text for interpolation into an HTML fragment.
///
/// Uses ammonia's text escaping rather than sanitizing: every character that could
/// open markup or break out of an attribute is entity-encoded, including spaces.
pub fn escape(text: &str) -> String {
    ammonia::clean_text(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn markup_is_neutralized() {
        let out = escape("<script>alert('x')</script>");
        assert!(!out.contains('<'));
        assert!(!out.contains('\''));
    }

    #[test]
    fn plain_words_pass_through() {
        assert_eq!(escape("Alex"), "Alex");
    }
}
