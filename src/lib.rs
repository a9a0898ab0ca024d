//! The library code for the `ezssg` static site generator, which builds a
//! personal blog from a directory of markdown. A build can be broken down
//! into two distinct steps:
//!
//! 1. Parsing content from source files on disk ([`crate::parser`]): posts
//!    and the two special pages (home and blog listing) are markdown
//!    documents with a JSON frontmatter block ([`crate::frontmatter`]), and
//!    tags are small JSON descriptors.
//! 2. Converting the content into pages on disk ([`crate::write`]).
//!
//! The second step composes every page in two stages. First the theme's
//! partials (head, header, footer, post footer) are rendered against the
//! site and the page ([`crate::fragments`]); then the page's layout is
//! rendered with the partials' output and the page's HTML body.
//!
//! [`crate::build::build_site`] runs the whole thing, one stage at a time.
//! [`crate::scaffold`] creates new projects, posts, and tags, and
//! [`crate::serve`] previews the output.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]

pub mod assets;
pub mod build;
pub mod config;
pub mod fragments;
pub mod frontmatter;
pub mod htmlrenderer;
pub mod markdown;
pub mod parser;
pub mod post;
pub mod scaffold;
pub mod serve;
pub mod tag;
pub mod template;
pub mod util;
pub mod value;
pub mod write;
