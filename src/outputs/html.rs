//! Markdown to HTML page conversion for the web server.

use crate::models::Category;
use pulldown_cmark::{CowStr, Event, Options, Parser, Tag, html};
use url::Url;

const STYLE: &str = "body{font-family:system-ui,sans-serif;max-width:60rem;margin:0 auto;padding:1rem;color:#111}\
a{color:#4d8fdb}img{max-width:100%;height:auto;border-radius:.5rem}\
blockquote{margin:0 0 1rem;padding-left:1rem;border-left:3px solid #ddd;color:#444}";

/// Whether a link or image destination may be emitted as-is.
///
/// Site-relative paths, fragments and `http`/`https` URLs pass.
fn is_safe_destination(dest: &str) -> bool {
    if dest.starts_with('#') || (dest.starts_with('/') && !dest.starts_with("//")) {
        return true;
    }
    Url::parse(dest).is_ok_and(|url| matches!(url.scheme(), "http" | "https"))
}

fn sanitize_destination(dest: CowStr<'_>) -> CowStr<'_> {
    if is_safe_destination(&dest) {
        dest
    } else {
        CowStr::Borrowed("#")
    }
}

/// Convert Markdown to an HTML fragment.
///
/// Raw HTML in the input is emitted as escaped text, never as markup. Link
/// and image destinations outside [`is_safe_destination`] become `#`.
pub fn render_markdown(content: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_STRIKETHROUGH);

    let parser = Parser::new_ext(content, options).map(|event| match event {
        Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
        Event::Start(Tag::Link {
            link_type,
            dest_url,
            title,
            id,
        }) => Event::Start(Tag::Link {
            link_type,
            dest_url: sanitize_destination(dest_url),
            title,
            id,
        }),
        Event::Start(Tag::Image {
            link_type,
            dest_url,
            title,
            id,
        }) => Event::Start(Tag::Image {
            link_type,
            dest_url: sanitize_destination(dest_url),
            title,
            id,
        }),
        other => other,
    });
    let mut html_output = String::new();
    html::push_html(&mut html_output, parser);
    html_output
}

/// Escape plain text for use inside HTML.
fn escape_text(text: &str) -> String {
    let mut out = String::new();
    html::push_html(&mut out, std::iter::once(Event::Text(CowStr::from(text))));
    out
}

/// Escape text for use inside a double-quoted attribute.
fn escape_attr(text: &str) -> String {
    escape_text(text).replace('"', "&quot;")
}

/// GET form submitting `search` (and the active category) to the landing page.
pub fn search_form(category: Category, query: &str) -> String {
    let category_field = match category.filter() {
        Some(c) => format!("<input type=\"hidden\" name=\"category\" value=\"{}\">", c.as_str()),
        None => String::new(),
    };
    format!(
        "<form action=\"/\" method=\"get\" role=\"search\">\
         <input type=\"search\" name=\"search\" value=\"{}\" placeholder=\"Search for news, topics...\">\
         {category_field}<button type=\"submit\">Search</button></form>\n",
        escape_attr(query)
    )
}

/// A complete HTML document: optional raw `header` followed by `markdown`.
pub fn page(title: &str, header: &str, markdown: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>{}</title>\n<style>{STYLE}</style>\n</head>\n<body>\n{header}{}</body>\n</html>\n",
        escape_text(title),
        render_markdown(markdown)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_markdown_basic() {
        let html = render_markdown("# Title\n\n[Link](/article/a)");
        assert!(html.contains("<h1>Title</h1>"));
        assert!(html.contains("<a href=\"/article/a\">Link</a>"));
    }

    #[test]
    fn test_render_markdown_neutralizes_raw_html() {
        let html = render_markdown("<script>alert(1)</script>\n\ninline <b>x</b>");
        assert!(!html.contains("<script>"));
        assert!(!html.contains("<b>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_render_markdown_drops_unsafe_destinations() {
        let html = render_markdown(
            "[a](javascript:alert(1)) [b](/article/b) [c](<https://example.com/c>) [d](//evil.example)\n\n![i](data:image/png;base64,AAAA)",
        );
        assert!(!html.contains("javascript:"));
        assert!(!html.contains("data:"));
        assert!(!html.contains("//evil.example"));
        assert!(html.contains("<a href=\"#\">a</a>"));
        assert!(html.contains("<a href=\"/article/b\">b</a>"));
        assert!(html.contains("<a href=\"https://example.com/c\">c</a>"));
    }

    #[test]
    fn test_search_form_escapes_query() {
        let form = search_form(Category::Technology, "\"><script>");
        assert!(form.contains("value=\"&quot;&gt;&lt;script&gt;\""));
        assert!(form.contains("name=\"category\" value=\"technology\""));
        assert!(!search_form(Category::All, "").contains("name=\"category\""));
    }

    #[test]
    fn test_page_escapes_title() {
        let doc = page("A & <B>", "", "body");
        assert!(doc.contains("<title>A &amp; &lt;B&gt;</title>"));
        assert!(doc.starts_with("<!DOCTYPE html>"));
        assert!(doc.contains("<p>body</p>"));
    }
}
