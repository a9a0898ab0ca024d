//! Renders markdown [`Event`]s into HTML. This is largely modeled after
//! [`pulldown_cmark`]'s private `HtmlWriter`, with three differences:
//!
//! 1. Code blocks are wrapped in `<div class='highlight'><pre
//!    class='highlight'><code>` and their text is written verbatim.
//! 2. Links to non-relative destinations open in a new tab.
//! 3. Headings get an `id` derived from their text.

use pulldown_cmark::escape::{escape_href, escape_html, StrWrite};
use pulldown_cmark::{Alignment, CowStr, Event, LinkType, Tag};
use std::collections::HashMap;
use std::fmt::{self, Display};
use std::io;

const CODE_BLOCK_START: &str = "<div class='highlight'><pre class='highlight'><code>";
const CODE_BLOCK_END: &str = "</code></pre></div>";

struct Adaptor<'a, T> {
    formatter: &'a mut T,
    result: fmt::Result,
}

impl<T> Adaptor<'_, T> {
    fn handle_result(&mut self, result: fmt::Result) -> io::Result<()> {
        match result {
            Ok(_) => Ok(()),
            Err(e) => {
                self.result = result;
                Err(io::Error::new(io::ErrorKind::Other, e))
            }
        }
    }
}

impl<T: fmt::Write> StrWrite for Adaptor<'_, T> {
    fn write_str(&mut self, s: &str) -> io::Result<()> {
        let result = self.formatter.write_str(s);
        self.handle_result(result)
    }

    fn write_fmt(&mut self, args: fmt::Arguments) -> io::Result<()> {
        let result = self.formatter.write_fmt(args);
        self.handle_result(result)
    }
}

struct EscapeHref<'a>(&'a str);

impl Display for EscapeHref<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut adaptor = Adaptor {
            formatter: f,
            result: Ok(()),
        };
        let _ = escape_href(&mut adaptor, self.0);
        adaptor.result
    }
}

struct EscapeHtml<'a>(&'a str);

impl Display for EscapeHtml<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut adaptor = Adaptor {
            formatter: f,
            result: Ok(()),
        };
        let _ = escape_html(&mut adaptor, self.0);
        adaptor.result
    }
}

enum TableState {
    Head,
    Body,
}

struct HtmlRenderer {
    table_alignments: Vec<Alignment>,
    table_state: TableState,
    table_cell_index: usize,

    /// True between the start and end of a code block. Text in a code block
    /// is written as-is.
    in_code_block: bool,

    /// Nesting depth of images. Text inside an image becomes its alt text.
    image_depth: usize,

    /// Heading IDs handed out so far, mapped to the number of times each was
    /// requested.
    heading_ids: HashMap<String, usize>,
}

impl<'a> HtmlRenderer {
    fn new() -> Self {
        HtmlRenderer {
            table_alignments: Vec::default(),
            table_state: TableState::Head,
            table_cell_index: usize::default(),
            in_code_block: false,
            image_depth: 0,
            heading_ids: HashMap::new(),
        }
    }

    fn run<W: StrWrite>(&mut self, w: &mut W, events: &[Event<'a>]) -> io::Result<()> {
        for (i, event) in events.iter().enumerate() {
            match event {
                Event::Start(Tag::Heading(level)) => {
                    let id = self.heading_id(&events[i + 1..]);
                    match id.is_empty() {
                        true => write!(w, "<h{}>", level)?,
                        false => write!(w, r#"<h{} id="{}">"#, level, EscapeHtml(&id))?,
                    }
                }
                _ => self.on_event(w, event.clone())?,
            }
        }
        Ok(())
    }

    fn on_event<W: StrWrite>(&mut self, w: &mut W, event: Event<'a>) -> io::Result<()> {
        // Inside an image only text reaches the alt attribute.
        if self.image_depth > 0 {
            return match event {
                Event::Start(tag @ Tag::Image(..)) => self.on_start(w, tag),
                Event::End(tag @ Tag::Image(..)) => self.on_end(w, tag),
                Event::Text(text) | Event::Code(text) => escape_html(w, &text),
                Event::SoftBreak | Event::HardBreak => w.write_str(" "),
                _ => Ok(()),
            };
        }
        match event {
            Event::Start(tag) => self.on_start(w, tag),
            Event::End(tag) => self.on_end(w, tag),
            Event::Code(code) => self.on_code(w, code),
            Event::FootnoteReference(name) => write!(
                w,
                r##"<sup class="footnote-reference"><a href="#{}">{}</a></sup>"##,
                EscapeHtml(&name),
                EscapeHtml(&name),
            ),
            Event::HardBreak => w.write_str("<br />\n"),
            Event::Html(html) => w.write_str(&html),
            Event::Rule => w.write_str("<hr />\n"),
            Event::SoftBreak => w.write_str("\n"),
            Event::TaskListMarker(checked) => write!(
                w,
                r#"<input disabled="" type="checkbox" {}/>"#,
                match checked {
                    true => r#"checked="" "#,
                    false => "",
                }
            ),
            Event::Text(text) => self.on_text(w, text),
        }
    }

    fn on_start<W: StrWrite>(&mut self, w: &mut W, tag: Tag<'a>) -> io::Result<()> {
        match tag {
            Tag::BlockQuote => w.write_str("<blockquote>\n"),
            Tag::CodeBlock(_) => {
                self.in_code_block = true;
                w.write_str(CODE_BLOCK_START)
            }
            Tag::Emphasis => w.write_str("<em>"),
            Tag::FootnoteDefinition(name) => {
                let name = EscapeHtml(&name);
                write!(
                    w,
                    r#"<div class="footnote-definition" id="{}"><sup class="footnote-definition-label">{}</sup>"#,
                    &name, &name,
                )
            }
            Tag::Heading(level) => write!(w, "<h{}>", level),
            Tag::Image(_link_type, dest, _title) => {
                self.image_depth += 1;
                if self.image_depth > 1 {
                    return Ok(());
                }
                write!(w, r#"<img src="{}" alt=""#, EscapeHref(&dest))
            }
            Tag::Item => w.write_str("<li>"),
            Tag::Link(LinkType::Email, dest, title) => {
                write!(w, r#"<a href="mailto:{}""#, EscapeHref(&dest))?;
                write_title(w, &title)?;
                w.write_str(">")
            }
            Tag::Link(_link_type, dest, title) => {
                write!(w, r#"<a href="{}""#, EscapeHref(&dest))?;
                write_title(w, &title)?;
                if !is_relative_link(&dest) {
                    w.write_str(r#" target="_blank""#)?;
                }
                w.write_str(">")
            }
            Tag::List(None) => w.write_str("<ul>\n"),
            Tag::List(Some(1)) => w.write_str("<ol>\n"),
            Tag::List(Some(start)) => write!(w, "<ol start=\"{}\">\n", start),
            Tag::Paragraph => w.write_str("<p>"),
            Tag::Strikethrough => w.write_str("<del>"),
            Tag::Strong => w.write_str("<strong>"),
            Tag::Table(alignments) => {
                self.table_alignments = alignments;
                w.write_str("<table>")
            }
            Tag::TableHead => {
                self.table_state = TableState::Head;
                self.table_cell_index = 0;
                w.write_str("<thead><tr>")
            }
            Tag::TableRow => {
                self.table_cell_index = 0;
                w.write_str("<tr>")
            }
            Tag::TableCell => write!(
                w,
                "<{}{}>",
                match self.table_state {
                    TableState::Head => "th",
                    TableState::Body => "td",
                },
                match self.table_alignments.get(self.table_cell_index) {
                    Some(Alignment::Left) => r#" align="left""#,
                    Some(Alignment::Right) => r#" align="right""#,
                    Some(Alignment::Center) => r#" align="center""#,
                    _ => "",
                }
            ),
        }
    }

    fn on_end<W: StrWrite>(&mut self, w: &mut W, tag: Tag) -> io::Result<()> {
        match tag {
            Tag::BlockQuote => w.write_str("</blockquote>\n"),
            Tag::CodeBlock(_) => {
                self.in_code_block = false;
                w.write_str(CODE_BLOCK_END)?;
                w.write_str("\n")
            }
            Tag::Emphasis => w.write_str("</em>"),
            Tag::FootnoteDefinition(_) => w.write_str("</div>\n"),
            Tag::Heading(level) => write!(w, "</h{}>\n", level),
            Tag::Image(_, _, title) => {
                self.image_depth -= 1;
                if self.image_depth > 0 {
                    return Ok(());
                }
                w.write_str("\"")?;
                write_title(w, &title)?;
                w.write_str(" />")
            }
            Tag::Item => w.write_str("</li>\n"),
            Tag::Link(_, _, _) => w.write_str("</a>"),
            Tag::List(Some(_)) => w.write_str("</ol>\n"),
            Tag::List(None) => w.write_str("</ul>\n"),
            Tag::Paragraph => w.write_str("</p>\n"),
            Tag::Strikethrough => w.write_str("</del>"),
            Tag::Strong => w.write_str("</strong>"),
            Tag::Table(_) => w.write_str("</tbody></table>\n"),
            Tag::TableHead => {
                self.table_state = TableState::Body;
                w.write_str("</tr></thead><tbody>\n")
            }
            Tag::TableRow => w.write_str("</tr>\n"),
            Tag::TableCell => {
                self.table_cell_index += 1;
                w.write_str(match self.table_state {
                    TableState::Head => "</th>",
                    TableState::Body => "</td>",
                })
            }
        }
    }

    fn on_text<W: StrWrite>(&mut self, w: &mut W, s: CowStr) -> io::Result<()> {
        match self.in_code_block {
            true => w.write_str(&s),
            false => escape_html(w, &s),
        }
    }

    fn on_code<W: StrWrite>(&mut self, w: &mut W, s: CowStr) -> io::Result<()> {
        write!(w, "<code>{}</code>", EscapeHtml(&s))
    }

    // Computes the ID for a heading whose events (after its start tag) are
    // `rest`. The ID is made unique among the headings rendered so far.
    fn heading_id(&mut self, rest: &[Event]) -> String {
        let mut text = String::new();
        for event in rest {
            match event {
                Event::End(Tag::Heading(_)) => break,
                Event::Text(s) | Event::Code(s) => text.push_str(s),
                _ => {}
            }
        }

        let base = anchor_name(&text);
        if base.is_empty() {
            return base;
        }

        let mut id = base.clone();
        while let Some(count) = self.heading_ids.get(&id).copied() {
            self.heading_ids.insert(id.clone(), count + 1);
            id = format!("{}-{}", base, count + 1);
        }
        self.heading_ids.insert(id.clone(), 0);
        id
    }
}

fn write_title<W: StrWrite>(w: &mut W, title: &str) -> io::Result<()> {
    match title.is_empty() {
        true => Ok(()),
        false => write!(w, r#" title="{}""#, EscapeHtml(title)),
    }
}

/// Converts heading text into an anchor name: letters and digits are kept
/// (lowercased) and every other run of characters between them becomes a
/// single `-`.
pub fn anchor_name(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut dash = false;
    for c in text.chars() {
        if c.is_alphanumeric() {
            if dash && !out.is_empty() {
                out.push('-');
            }
            dash = false;
            out.extend(c.to_lowercase());
        } else {
            dash = true;
        }
    }
    out
}

/// Reports whether `dest` is a link within the current site: a fragment, a
/// root-relative path (but not a protocol-relative `//host` URL), or a
/// `./`/`../` relative path.
pub fn is_relative_link(dest: &str) -> bool {
    dest.starts_with('#')
        || dest == "/"
        || (dest.starts_with('/') && !dest.starts_with("//"))
        || dest.starts_with("./")
        || dest.starts_with("../")
}

/// Converts [`Event`]s into an HTML string much like
/// `pulldown_cmark::html::push_html`. See the module description for the
/// differences.
pub fn push_html<'a, I>(out: &mut String, events: I) -> io::Result<()>
where
    I: Iterator<Item = Event<'a>>,
{
    let events: Vec<Event<'a>> = events.collect();
    HtmlRenderer::new().run(out, &events)
}
