pub mod metadata;
pub mod prompts;
pub mod script;
pub mod thumbnail;

pub use metadata::{MetadataGenerator, VideoMetadata};
pub use script::ScriptGenerator;
pub use thumbnail::ThumbnailGenerator;

/// Keep at most `max_chars` leading characters of `text`
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => {
            tracing::debug!(
                "Truncating input from {} to {} characters",
                text.chars().count(),
                max_chars
            );
            &text[..idx]
        }
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("hello", 10), "hello");
        assert_eq!(truncate_chars("hello", 5), "hello");
        assert_eq!(truncate_chars("hello", 3), "hel");
        assert_eq!(truncate_chars("안녕하세요", 2), "안녕");
        assert_eq!(truncate_chars("abc", 0), "");
    }
}
