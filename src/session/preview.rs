use std::sync::LazyLock;

use regex::Regex;
use rust_i18n::t;
use thiserror::Error;

static BODY: LazyLock<Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(r"(?is)<body\b[^>]*>(.*?)(?:</body\s*>|\z)"));
static HEAD: LazyLock<Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(r"(?is)<head\b[^>]*>.*?(?:</head\s*>|\z)|<!doctype[^>]*>"));

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PreviewError {
    #[error("tag opened at byte {0} is never closed")]
    UnterminatedTag(usize),
    #[error("preview pattern failed to compile: {0}")]
    Pattern(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Preview {
    Empty,
    Text(String),
}

/// Byte offset of a `<` that starts a tag but has no closing `>` after it.
fn unterminated_tag(input: &str) -> Option<usize> {
    let open = input.rfind('<')?;
    if input[open..].contains('>') {
        return None;
    }
    let next = input[open + 1..].chars().next()?;
    (next.is_ascii_alphabetic() || next == '/' || next == '!').then_some(open)
}

fn pattern(re: &'static LazyLock<Result<Regex, regex::Error>>) -> Result<&'static Regex, PreviewError> {
    re.as_ref().map_err(|err| PreviewError::Pattern(err.to_string()))
}

/// Render what the learner typed as terminal text: the `<body>` contents when
/// present, otherwise the whole fragment minus doctype and `<head>`.
pub fn render_preview(input: &str) -> Result<Preview, PreviewError> {
    if let Some(offset) = unterminated_tag(input) {
        return Err(PreviewError::UnterminatedTag(offset));
    }

    let fragment = match pattern(&BODY)?.captures(input).and_then(|c| c.get(1)) {
        Some(body) => body.as_str().to_string(),
        None => pattern(&HEAD)?.replace_all(input, "").into_owned(),
    };

    let mut sanitizer = ammonia::Builder::default();
    sanitizer.add_clean_content_tags(&["head", "title"]);
    let clean = sanitizer.clean(&fragment).to_string();

    let text = html2md::parse_html(&clean);
    let text = text.trim();
    if text.is_empty() {
        Ok(Preview::Empty)
    } else {
        Ok(Preview::Text(text.to_string()))
    }
}

/// Preview with the placeholders shown in place of empty or broken markup.
pub fn preview_text(input: &str) -> String {
    match render_preview(input) {
        Ok(Preview::Text(text)) => text,
        Ok(Preview::Empty) => t!("preview.empty").into_owned(),
        Err(err) => {
            log::debug!("preview failed: {err}");
            t!("preview.error").into_owned()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_contents_are_rendered() {
        let preview =
            render_preview("<html><head><title>T</title></head><body><p>Hello</p></body></html>")
                .unwrap();
        assert_eq!(preview, Preview::Text("Hello".to_string()));
    }

    #[test]
    fn test_fragment_without_body() {
        let preview = render_preview("<!DOCTYPE html><h1>Title</h1>").unwrap();
        match preview {
            Preview::Text(text) => {
                assert!(text.contains("Title"));
                assert!(!text.to_lowercase().contains("doctype"));
            }
            Preview::Empty => panic!("expected text"),
        }
    }

    #[test]
    fn test_head_only_is_empty() {
        assert_eq!(
            render_preview("<head><title>Only</title></head>").unwrap(),
            Preview::Empty
        );
        assert_eq!(render_preview("").unwrap(), Preview::Empty);
        assert_eq!(render_preview("<body>  </body>").unwrap(), Preview::Empty);
    }

    #[test]
    fn test_scripts_are_dropped() {
        let preview = render_preview("<p>safe</p><script>alert(1)</script>").unwrap();
        assert_eq!(preview, Preview::Text("safe".to_string()));
    }

    #[test]
    fn test_unterminated_tag_is_an_error() {
        assert_eq!(
            render_preview("<p>text</p><di"),
            Err(PreviewError::UnterminatedTag(11))
        );
        assert!(render_preview("a < b").is_ok());
    }

    #[test]
    fn test_placeholders() {
        assert_eq!(preview_text(""), "(Empty page)");
        assert_eq!(preview_text("<p"), "(Error parsing your code)");
    }
}
