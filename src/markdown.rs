//! Converts post bodies from markdown to HTML.

use crate::htmlrenderer::push_html;
use pulldown_cmark::{Options, Parser};
use std::io;

/// Converts `markdown` to HTML. Malformed constructs degrade to literal text
/// per CommonMark; errors only come from writing the output.
pub fn to_html(markdown: &str) -> io::Result<String> {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_FOOTNOTES);
    options.insert(Options::ENABLE_SMART_PUNCTUATION);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_TASKLISTS);

    let mut html = String::with_capacity(markdown.len() * 3 / 2);
    push_html(&mut html, Parser::new_ext(markdown, options))?;
    Ok(html)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_fenced_code_block() -> io::Result<()> {
        let html = to_html("```\nhello\n```")?;
        assert!(
            html.contains("<div class='highlight'><pre class='highlight'><code>hello\n</code></pre></div>"),
            "found: {}",
            html
        );
        Ok(())
    }

    #[test]
    fn test_fenced_code_block_with_language() -> io::Result<()> {
        let html = to_html("```rust\nfn main() {}\n```\n")?;
        assert!(html.contains(
            "<div class='highlight'><pre class='highlight'><code>fn main() {}\n</code></pre></div>"
        ));
        assert!(!html.contains("language-rust"));
        Ok(())
    }

    #[test]
    fn test_code_block_text_is_verbatim() -> io::Result<()> {
        let html = to_html("```\na && b\n```\n")?;
        assert!(html.contains("<code>a && b\n</code>"), "found: {}", html);
        Ok(())
    }

    #[test]
    fn test_paragraph_text_is_escaped() -> io::Result<()> {
        assert_eq!("<p>a &lt; b</p>\n", to_html("a < b")?);
        Ok(())
    }

    #[test]
    fn test_heading_ids() -> io::Result<()> {
        let html = to_html("# Hello World\n\n## Hello World\n")?;
        assert!(html.contains(r#"<h1 id="hello-world">Hello World</h1>"#));
        assert!(html.contains(r#"<h2 id="hello-world-1">Hello World</h2>"#));
        Ok(())
    }

    #[test]
    fn test_absolute_links_open_in_new_tab() -> io::Result<()> {
        assert_eq!(
            "<p><a href=\"https://example.org\" target=\"_blank\">site</a></p>\n",
            to_html("[site](https://example.org)")?
        );
        Ok(())
    }

    #[test]
    fn test_relative_links_stay_in_tab() -> io::Result<()> {
        assert_eq!(
            "<p><a href=\"/blog/hello\">post</a></p>\n",
            to_html("[post](/blog/hello)")?
        );
        Ok(())
    }

    #[test]
    fn test_list_without_blank_line() -> io::Result<()> {
        let html = to_html("Things:\n- one\n- two\n")?;
        assert!(html.contains("<ul>\n<li>one</li>\n<li>two</li>\n</ul>"), "found: {}", html);
        Ok(())
    }

    #[test]
    fn test_image_alt_text() -> io::Result<()> {
        assert_eq!(
            "<p><img src=\"cat.png\" alt=\"a cat\" /></p>\n",
            to_html("![a cat](cat.png)")?
        );
        Ok(())
    }

    #[test]
    fn test_image_alt_text_drops_markup() -> io::Result<()> {
        assert_eq!(
            "<p><img src=\"c.png\" alt=\"a cat\" /></p>\n",
            to_html("![a *cat*](c.png)")?
        );
        assert_eq!(
            "<p><img src=\"cat.png\" alt=\"a cat and link &lt;3\" /></p>\n",
            to_html("![a **cat** and [link](https://x.org) <3](cat.png)")?
        );
        Ok(())
    }

    #[test]
    fn test_unclosed_emphasis_is_literal() -> io::Result<()> {
        assert_eq!("<p>*oops</p>\n", to_html("*oops")?);
        Ok(())
    }
}
