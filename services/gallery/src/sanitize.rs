//! Markup stripping for user-supplied text.
//!
//! Album names, dates, descriptions, and captions are rendered by the front
//! end with `innerHTML`, so every tag is removed and the remaining text is
//! HTML-escaped. Script and style elements are dropped together with their
//! content.
use std::collections::HashSet;

pub fn sanitize_text(input: &str) -> String {
    ammonia::Builder::empty()
        .clean_content_tags(HashSet::from(["script", "style"]))
        .clean(input)
        .to_string()
}
