//! Markdown to HTML for the notes page.

use pulldown_cmark::{CowStr, Event, Options, Parser, Tag, html};

const SAFE_SCHEMES: [&str; 3] = ["http", "https", "mailto"];

fn options() -> Options {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TASKLISTS);
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_FOOTNOTES);
    options
}

/// Relative links and the schemes in `SAFE_SCHEMES` pass; anything else,
/// `javascript:` included, is unsafe.
fn is_safe_url(url: &str) -> bool {
    // Browsers ignore whitespace and control characters inside a scheme.
    let cleaned: String = url
        .chars()
        .filter(|ch| !ch.is_ascii_whitespace() && !ch.is_control())
        .collect();
    let scheme_end = cleaned.find(|ch: char| matches!(ch, ':' | '/' | '?' | '#'));
    match scheme_end {
        Some(end) if cleaned[end..].starts_with(':') => {
            let scheme = cleaned[..end].to_ascii_lowercase();
            SAFE_SCHEMES.contains(&scheme.as_str())
        }
        _ => true,
    }
}

fn sanitize_url(url: CowStr<'_>) -> CowStr<'_> {
    if is_safe_url(&url) {
        url
    } else {
        CowStr::Borrowed("")
    }
}

/// Renders GitHub-flavoured markdown. Raw HTML in the source is shown as
/// text rather than passed through, and link or image targets with an
/// unsafe scheme are blanked.
pub fn render(source: &str) -> String {
    let parser = Parser::new_ext(source, options()).map(|event| match event {
        Event::Html(raw) => Event::Text(raw),
        Event::Start(Tag::Link(kind, url, title)) => {
            Event::Start(Tag::Link(kind, sanitize_url(url), title))
        }
        Event::Start(Tag::Image(kind, url, title)) => {
            Event::Start(Tag::Image(kind, sanitize_url(url), title))
        }
        other => other,
    });

    let mut output = String::with_capacity(source.len() * 3 / 2);
    html::push_html(&mut output, parser);
    output
}

#[cfg(test)]
mod tests {
    use super::render;

    #[test]
    fn renders_headings_and_emphasis() {
        let html = render("# Plan\n\nSome *light* reading");
        assert!(html.contains("<h1>Plan</h1>"));
        assert!(html.contains("<em>light</em>"));
    }

    #[test]
    fn renders_task_list_checkboxes() {
        let html = render("- [x] ship it\n- [ ] tell people\n");
        assert_eq!(html.matches("type=\"checkbox\"").count(), 2);
        assert_eq!(html.matches("checked").count(), 1);
    }

    #[test]
    fn renders_tables_and_strikethrough() {
        let html = render("| a | b |\n|---|---|\n| 1 | 2 |\n\n~~gone~~");
        assert!(html.contains("<table>"));
        assert!(html.contains("<del>gone</del>"));
    }

    #[test]
    fn raw_html_is_escaped() {
        let html = render("<script>alert(1)</script>\n\nok <b>x</b>");
        assert!(!html.contains("<script>"));
        assert!(!html.contains("<b>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn unsafe_link_targets_are_blanked() {
        let html = render("[click](javascript:alert(1)) ![pic](JavaScript:x) [up](JAVASCRIPT:y)");
        assert!(!html.to_ascii_lowercase().contains("script:"));
        assert!(html.contains("<a href=\"\">click</a>"));
        assert!(html.contains("<img src=\"\" alt=\"pic\""));
    }

    #[test]
    fn safe_link_targets_are_kept() {
        let html = render(
            "[site](https://example.com/a?b=1) [mail](mailto:me@example.com) [rel](docs/plan.md) [anchor](#top)",
        );
        assert!(html.contains("href=\"https://example.com/a?b=1\""));
        assert!(html.contains("href=\"mailto:me@example.com\""));
        assert!(html.contains("href=\"docs/plan.md\""));
        assert!(html.contains("href=\"#top\""));
    }

    #[test]
    fn empty_source_renders_nothing() {
        assert_eq!(render(""), "");
    }
}
