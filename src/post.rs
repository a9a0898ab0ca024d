//! Defines the [`Post`] type, the page record for posts and special pages.

use serde::{Deserialize, Deserializer, Serialize};
use std::path::Path;

/// A page parsed from a source document. Posts, the home page, and the blog
/// listing are all [`Post`]s; tag pages are rendered from a synthetic [`Post`]
/// (see [`crate::tag::Tag::page`]).
///
/// The serialized form is the frontmatter shape. `markdown` and `html` are
/// never (de)serialized; they're filled in after the frontmatter is parsed.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Post {
    /// The name of the layout the page is rendered with.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub layout: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub title: String,

    /// The publish date. This is a pre-formatted display string (e.g.,
    /// `Dec 24th, 2024`), not a parsed date.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub date: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,

    /// Tag slugs in the order they were written. Duplicates are kept.
    #[serde(default, deserialize_with = "deserialize_tags")]
    pub tags: Vec<String>,

    /// The source file name less its extensions. The page is written to
    /// `{root_name}.html`.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub root_name: String,

    /// The markdown body.
    #[serde(skip)]
    pub markdown: String,

    /// The body rendered as HTML.
    #[serde(skip)]
    pub html: String,
}

impl Post {
    /// Reports whether `tag` is one of the post's tags. The comparison is
    /// exact and case-sensitive.
    pub fn contains_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

/// Returns the file name of `path` with every extension removed, e.g.,
/// `bbc/cbc/abc.md` becomes `abc` and `abc.md.json` becomes `abc`.
pub fn root_name<P: AsRef<Path>>(path: P) -> String {
    match path.as_ref().file_name() {
        None => String::new(),
        Some(file_name) => file_name
            .to_string_lossy()
            .split('.')
            .next()
            .unwrap_or_default()
            .to_owned(),
    }
}

// `tags` may be `null` in documents written by older tooling.
fn deserialize_tags<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}
