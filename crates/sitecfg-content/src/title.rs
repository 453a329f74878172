//! Page title extraction.
//!
//! Precedence: front-matter `title`, then the first level-one heading, then
//! the caller's fallback (file or directory name).

use pulldown_cmark::{Event, HeadingLevel, Parser, Tag, TagEnd};
use serde::Deserialize;

/// Front-matter fields used during the scan.
#[derive(Deserialize)]
struct FrontMatter {
    title: Option<String>,
}

/// Split a leading `---` fenced YAML block off the content.
///
/// Returns `(front_matter, body)`; `front_matter` is `None` when the file does
/// not start with a fence or the fence is never closed.
fn split_front_matter(content: &str) -> (Option<&str>, &str) {
    let Some(rest) = content
        .strip_prefix("---\n")
        .or_else(|| content.strip_prefix("---\r\n"))
    else {
        return (None, content);
    };

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == "---" {
            return (Some(&rest[..offset]), &rest[offset + line.len()..]);
        }
        offset += line.len();
    }
    (None, content)
}

/// Parse the `title` field from YAML front matter.
///
/// Returns `None` for empty or malformed YAML; a broken header should not hide
/// the heading fallback.
fn front_matter_title(yaml: &str) -> Option<String> {
    let trimmed = yaml.trim();
    if trimmed.is_empty() {
        return None;
    }
    serde_yaml::from_str::<FrontMatter>(trimmed)
        .ok()
        .and_then(|fm| fm.title)
        .map(|title| title.trim().to_owned())
        .filter(|title| !title.is_empty())
}

/// Text of the first non-empty level-one heading (ATX or setext).
fn first_heading(body: &str) -> Option<String> {
    let mut heading: Option<String> = None;
    for event in Parser::new(body) {
        match event {
            Event::Start(Tag::Heading {
                level: HeadingLevel::H1,
                ..
            }) => heading = Some(String::new()),
            Event::End(TagEnd::Heading(HeadingLevel::H1)) => {
                if let Some(text) = heading.take() {
                    let text = text.trim();
                    if !text.is_empty() {
                        return Some(text.to_owned());
                    }
                }
            }
            Event::Text(text) | Event::Code(text) => {
                if let Some(buf) = heading.as_mut() {
                    buf.push_str(&text);
                }
            }
            Event::SoftBreak | Event::HardBreak => {
                if let Some(buf) = heading.as_mut() {
                    buf.push(' ');
                }
            }
            _ => {}
        }
    }
    None
}

/// Extract a page title from markdown content.
pub(crate) fn extract_title(content: &str) -> Option<String> {
    let (front_matter, body) = split_front_matter(content);
    front_matter
        .and_then(front_matter_title)
        .or_else(|| first_heading(body))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_from_heading() {
        assert_eq!(
            extract_title("intro\n\n# Koa2 源码解析\n\ntext"),
            Some("Koa2 源码解析".to_owned())
        );
    }

    #[test]
    fn test_front_matter_wins_over_heading() {
        let content = "---\ntitle: 发布订阅\nsidebarDepth: 2\n---\n# Subscribe\n";
        assert_eq!(extract_title(content), Some("发布订阅".to_owned()));
    }

    #[test]
    fn test_front_matter_without_title_falls_back_to_heading() {
        let content = "---\nlang: zh-CN\n---\n# CSS Houdini\n";
        assert_eq!(extract_title(content), Some("CSS Houdini".to_owned()));
    }

    #[test]
    fn test_malformed_front_matter_falls_back_to_heading() {
        let content = "---\ntitle: [unclosed\n---\n# AOP\n";
        assert_eq!(extract_title(content), Some("AOP".to_owned()));
    }

    #[test]
    fn test_unclosed_front_matter_is_body() {
        let content = "---\ntitle: x\n# Vue\n";
        assert_eq!(extract_title(content), Some("Vue".to_owned()));
    }

    #[test]
    fn test_heading_inside_code_fence_ignored() {
        let content = "```sh\n# install\n```\n\n# React\n";
        assert_eq!(extract_title(content), Some("React".to_owned()));
    }

    #[test]
    fn test_heading_inside_indented_code_ignored() {
        let content = "Install:\n\n    # npm install koa\n\n# Koa2 源码解析\n";
        assert_eq!(extract_title(content), Some("Koa2 源码解析".to_owned()));
    }

    #[test]
    fn test_setext_heading() {
        assert_eq!(
            extract_title("Koa2 源码解析\n======\n\ntext\n"),
            Some("Koa2 源码解析".to_owned())
        );
        // Level-two setext headings are not titles
        assert_eq!(extract_title("Subtitle\n--------\n"), None);
    }

    #[test]
    fn test_inline_markup_stripped() {
        assert_eq!(
            extract_title("# The `koa-compose` *middleware*\n"),
            Some("The koa-compose middleware".to_owned())
        );
    }

    #[test]
    fn test_closing_hashes_trimmed() {
        assert_eq!(extract_title("# node ##\n"), Some("node".to_owned()));
    }

    #[test]
    fn test_no_title() {
        assert_eq!(extract_title("## only a subheading\n"), None);
        assert_eq!(extract_title(""), None);
    }

    #[test]
    fn test_crlf_front_matter() {
        let content = "---\r\ntitle: Windows\r\n---\r\nbody\r\n";
        assert_eq!(extract_title(content), Some("Windows".to_owned()));
    }
}
