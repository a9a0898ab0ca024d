//! Defines the [`Tag`] type, which represents a [`crate::post::Post`] tag.

use crate::post::Post;
use crate::template::TAGGED_LAYOUT;
use serde::{Deserialize, Serialize};

/// A tag descriptor, parsed from `{slug}.json` in the tags directory. Posts
/// refer to tags by slug.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    /// The lowercase identifier for the tag. It's also the name of the tag's
    /// output directory, so it must be safe to use as a file name.
    pub slug: String,

    /// An optional display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// The layout for the tag's page. Defaults to [`TAGGED_LAYOUT`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout: Option<String>,
}

impl Tag {
    /// Creates a [`Tag`] from user input by lowercasing it.
    pub fn new(input: &str) -> Tag {
        Tag {
            slug: input.to_lowercase(),
            name: None,
            layout: None,
        }
    }

    /// The name of the layout the tag's page is rendered with.
    pub fn layout(&self) -> &str {
        match self.layout.as_deref() {
            Some(layout) if !layout.is_empty() => layout,
            _ => TAGGED_LAYOUT,
        }
    }

    /// Builds the synthetic page record a tag page is rendered from. It has
    /// no body; its root name is the slug.
    pub fn page(&self) -> Post {
        Post {
            layout: self.layout().to_owned(),
            root_name: self.slug.clone(),
            title: self.name.clone().unwrap_or_default(),
            ..Post::default()
        }
    }
}
