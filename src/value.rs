//! Conversions from the site's data types into template [`Value`]s, and the
//! functions templates can call.
//!
//! Templates see lowercase field names matching the JSON keys, e.g.
//! `{{ .site.title }}`, `{{ .post.root_name }}`, `{{ .tag.slug }}`.

use crate::config::{Link, SiteConfig};
use crate::post::Post;
use crate::tag::Tag;
use gtmpl_value::Value;
use pulldown_cmark::escape::escape_html;
use std::collections::HashMap;

/// Builds a [`Value::Object`] from `(key, value)` pairs.
pub fn object<I>(fields: I) -> Value
where
    I: IntoIterator<Item = (&'static str, Value)>,
{
    Value::Object(
        fields
            .into_iter()
            .map(|(k, v)| (k.to_owned(), v))
            .collect::<HashMap<String, Value>>(),
    )
}

fn string(s: &str) -> Value {
    Value::String(s.to_owned())
}

fn post_fields(p: &Post) -> Vec<(&'static str, Value)> {
    vec![
        ("title", string(&p.title)),
        ("date", string(&p.date)),
        ("description", string(&p.description)),
        ("tags", Value::Array(p.tags.iter().map(|t| string(t)).collect())),
        ("layout", string(&p.layout)),
        ("root_name", string(&p.root_name)),
    ]
}

impl From<&Post> for Value {
    /// Converts a [`Post`] for templating. The markdown source is left out;
    /// the rendered body is available as `html`.
    fn from(p: &Post) -> Value {
        let mut fields = post_fields(p);
        fields.push(("html", string(&p.html)));
        object(fields)
    }
}

/// Converts a [`Post`] for listings (`.site.posts`): the metadata without the
/// rendered body, which is only available to the post's own page.
pub fn post_summary(p: &Post) -> Value {
    object(post_fields(p))
}

impl From<&Tag> for Value {
    /// Converts a [`Tag`] for templating. `name` falls back to the slug and
    /// `layout` to the effective layout name.
    fn from(t: &Tag) -> Value {
        object(vec![
            ("slug", string(&t.slug)),
            ("name", string(t.name.as_deref().unwrap_or(&t.slug))),
            ("layout", string(t.layout())),
        ])
    }
}

impl From<&Link> for Value {
    fn from(l: &Link) -> Value {
        object(vec![
            ("url", string(&l.url)),
            ("display_text", string(&l.display_text)),
        ])
    }
}

impl From<&SiteConfig> for Value {
    fn from(c: &SiteConfig) -> Value {
        object(vec![
            ("title", string(&c.title)),
            ("description", string(&c.description)),
            ("url", string(&c.url)),
            (
                "special_links",
                Value::Array(c.special_links.iter().map(Value::from).collect()),
            ),
            ("paths", object(vec![("blog", string(&c.paths.blog))])),
            (
                "google_analytics",
                object(vec![("tracking_id", string(&c.analytics.tracking_id))]),
            ),
            ("tags", Value::Array(c.tags.iter().map(Value::from).collect())),
            ("posts", Value::Array(c.posts.iter().map(post_summary).collect())),
        ])
    }
}

/// Template function reporting whether a post has a tag:
/// `{{ if contains_tag . $.tag.slug }}`. The first argument is a post value
/// and the second a tag slug; see [`Post::contains_tag`].
pub fn contains_tag(args: &[Value]) -> Result<Value, String> {
    match args {
        [Value::Object(post), Value::String(slug)] => Ok(Value::Bool(match post.get("tags") {
            Some(Value::Array(tags)) => tags
                .iter()
                .any(|t| matches!(t, Value::String(s) if s == slug)),
            _ => false,
        })),
        _ => Err(format!(
            "contains_tag: wanted a post and a tag slug; found {} argument(s)",
            args.len()
        )),
    }
}

/// Template function escaping a string for HTML text and attribute values:
/// `{{ .post.title | html }}`. Nil is treated as the empty string.
pub fn html(args: &[Value]) -> Result<Value, String> {
    let s = match args {
        [Value::String(s)] => s.as_str(),
        [Value::Nil] => "",
        _ => return Err(format!("html: wanted one string; found {} argument(s)", args.len())),
    };
    let mut out = String::with_capacity(s.len());
    escape_html(&mut out, s).map_err(|e| format!("html: {}", e))?;
    Ok(Value::String(out))
}
