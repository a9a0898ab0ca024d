//! Loads and executes the theme's templates.
//!
//! Pages are composed in two stages. First every [`Partial`] is executed
//! against the site and the current page (see [`crate::fragments`]); then a
//! layout is executed with the partials' output available under
//! `.includes` (see [`crate::write`]). The set of partials is closed; layouts
//! are open and addressed by name as `layouts/{name}.html`.

use crate::assets::AssetProvider;
use crate::value::{contains_tag, html};
use gtmpl::{Context, Template, Value};
use std::collections::HashMap;
use std::fmt;
use std::io;

/// The layout for the home page.
pub const DEFAULT_LAYOUT: &str = "default";

/// The layout for the blog listing page.
pub const BLOG_LAYOUT: &str = "blog";

/// The layout for post pages.
pub const POST_LAYOUT: &str = "post";

/// The layout for tag pages when the tag doesn't name one.
pub const TAGGED_LAYOUT: &str = "tagged";

/// The shared fragments rendered for every page.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Partial {
    Head,
    Header,
    Footer,
    FooterPost,
}

impl Partial {
    pub const ALL: [Partial; 4] = [
        Partial::Head,
        Partial::Header,
        Partial::Footer,
        Partial::FooterPost,
    ];

    /// The name of the partial's asset, e.g. `includes/footer-post.html`.
    pub fn asset_name(self) -> &'static str {
        match self {
            Partial::Head => "includes/head.html",
            Partial::Header => "includes/header.html",
            Partial::Footer => "includes/footer.html",
            Partial::FooterPost => "includes/footer-post.html",
        }
    }

    /// The key under which layouts find the partial's output, e.g.
    /// `{{ .includes.FooterPost }}`.
    pub fn key(self) -> &'static str {
        match self {
            Partial::Head => "Head",
            Partial::Header => "Header",
            Partial::Footer => "Footer",
            Partial::FooterPost => "FooterPost",
        }
    }
}

/// The asset name for the layout `name`.
pub fn layout_asset_name(name: &str) -> String {
    format!("layouts/{}.html", name)
}

/// Every template a build needs, parsed once up front.
pub struct Templates {
    partials: HashMap<Partial, Template>,
    layouts: HashMap<String, Template>,
}

impl Templates {
    /// Parses all partials and the named layouts from `assets`. Loading fails
    /// if any of them is missing or doesn't parse, so a build with a bad
    /// theme fails before it renders anything.
    pub fn load<'a, I>(assets: &dyn AssetProvider, layouts: I) -> Result<Templates>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut partials = HashMap::with_capacity(Partial::ALL.len());
        for partial in Partial::ALL.iter().copied() {
            partials.insert(partial, parse(assets, partial.asset_name())?);
        }

        let mut parsed = HashMap::new();
        for name in layouts {
            if !parsed.contains_key(name) {
                let template = parse(assets, &layout_asset_name(name))?;
                parsed.insert(name.to_owned(), template);
            }
        }

        Ok(Templates {
            partials,
            layouts: parsed,
        })
    }

    /// Executes a partial against `data`.
    pub fn render_partial(&self, partial: Partial, data: Value) -> Result<String> {
        match self.partials.get(&partial) {
            Some(template) => execute(partial.asset_name(), template, data),
            None => Err(Error::UnknownTemplate(partial.asset_name().to_owned())),
        }
    }

    /// Executes the layout `name` against `data`.
    pub fn render_layout(&self, name: &str, data: Value) -> Result<String> {
        let asset_name = layout_asset_name(name);
        match self.layouts.get(name) {
            Some(template) => execute(&asset_name, template, data),
            None => Err(Error::UnknownTemplate(asset_name)),
        }
    }
}

fn parse(assets: &dyn AssetProvider, name: &str) -> Result<Template> {
    let contents = assets.read(name).map_err(|err| Error::Read {
        name: name.to_owned(),
        err,
    })?;
    let mut template = Template::default();
    template.add_func("contains_tag", contains_tag);
    template.add_func("html", html);
    template
        .parse(String::from_utf8_lossy(&contents).into_owned())
        .map_err(|err| Error::Parse {
            name: name.to_owned(),
            err,
        })?;
    Ok(template)
}

fn execute(name: &str, template: &Template, data: Value) -> Result<String> {
    let context = Context::from(data).map_err(|err| Error::Execute {
        name: name.to_owned(),
        err,
    })?;
    let mut out: Vec<u8> = Vec::new();
    template
        .execute(&mut out, &context)
        .map_err(|err| Error::Execute {
            name: name.to_owned(),
            err,
        })?;
    Ok(String::from_utf8_lossy(&out).into_owned())
}

/// The result of a template operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error loading or executing a template.
#[derive(Debug)]
pub enum Error {
    /// Returned when a template asset can't be read (including when it
    /// doesn't exist).
    Read { name: String, err: io::Error },

    /// Returned when a template doesn't parse.
    Parse { name: String, err: String },

    /// Returned when executing a template fails.
    Execute { name: String, err: String },

    /// Returned when rendering with a template that wasn't loaded.
    UnknownTemplate(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Read { name, err } if err.kind() == io::ErrorKind::NotFound => {
                write!(f, "missing template `{}`", name)
            }
            Error::Read { name, err } => {
                write!(f, "reading template `{}`: {}", name, err)
            }
            Error::Parse { name, err } => {
                write!(f, "parsing template `{}`: {}", name, err)
            }
            Error::Execute { name, err } => {
                write!(f, "executing template `{}`: {}", name, err)
            }
            Error::UnknownTemplate(name) => {
                write!(f, "template `{}` was not loaded", name)
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Read { name: _, err } => Some(err),
            _ => None,
        }
    }
}
