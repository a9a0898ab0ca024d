//! Exports the [`build_site`] function which stitches together the high-level
//! steps of building the output static site. The steps run strictly in order
//! and the first failure ends the build:
//!
//! 1. [`Stage::Reset`]: delete the output directory and recreate it with the
//!    theme's static files and the project's own assets
//! 2. [`Stage::LoadConfig`]: read `config.json`
//! 3. [`Stage::DiscoverPosts`] and [`Stage::DiscoverTags`]: parse content
//!    ([`crate::parser`])
//! 4. [`Stage::LoadTemplates`]: parse every partial and layout the build needs
//! 5. [`Stage::RenderSpecialPages`], [`Stage::RenderPosts`], and
//!    [`Stage::RenderTagPages`]: template and write pages ([`crate::write`])
//!
//! Pages written before a failure are left in place.

use crate::assets::AssetProvider;
use crate::config::{self, Project, SiteConfig, TagPolicy};
use crate::parser::{self, list_posts, list_tags, parse_post};
use crate::template::{self, Templates, BLOG_LAYOUT, DEFAULT_LAYOUT, POST_LAYOUT, TAGGED_LAYOUT};
use crate::util::{copy_dir, rmdir};
use crate::write::{self, Writer};
use gtmpl::Value;
use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::io;
use std::path::PathBuf;

/// Builds the site for `project` using the templates and static files from
/// `assets`.
pub fn build_site(project: &Project, assets: &dyn AssetProvider) -> Result<()> {
    log::info!("building `{}`", project.root.display());

    stage(Stage::Reset, || reset(project, assets))?;

    let mut site = stage(Stage::LoadConfig, || Ok(SiteConfig::load(&project.config_file())?))?;

    site.posts = stage(Stage::DiscoverPosts, || Ok(list_posts(&project.posts_directory())?))?;
    log::info!("found {} post(s)", site.posts.len());

    site.tags = stage(Stage::DiscoverTags, || Ok(list_tags(&project.tags_directory())?))?;
    log::info!("found {} tag(s)", site.tags.len());

    stage(Stage::DiscoverTags, || check_tag_references(&site, project.tag_policy))?;

    let templates = stage(Stage::LoadTemplates, || {
        let mut layouts = vec![DEFAULT_LAYOUT, BLOG_LAYOUT, POST_LAYOUT, TAGGED_LAYOUT];
        layouts.extend(site.tags.iter().map(|t| t.layout()));
        Ok(Templates::load(assets, layouts)?)
    })?;

    let site_value = Value::from(&site);
    let writer = Writer {
        templates: &templates,
        site: &site_value,
    };

    stage(Stage::RenderSpecialPages, || {
        let output = project.output_directory();
        for (path, layout) in &[
            (project.index_file(), DEFAULT_LAYOUT),
            (project.blog_file(), BLOG_LAYOUT),
        ] {
            let mut page = parse_post(path)?;
            page.layout = layout.to_string();
            writer.render(&page, None, &output)?;
        }
        Ok(())
    })?;

    stage(Stage::RenderPosts, || {
        let output = project.posts_output_directory();
        let mut seen = HashSet::new();
        for post in &site.posts {
            if !seen.insert(post.root_name.as_str()) {
                log::warn!(
                    "more than one post is named `{}`; the last one wins",
                    post.root_name
                );
            }
            let mut page = post.clone();
            page.layout = POST_LAYOUT.to_owned();
            writer.render(&page, None, &output)?;
        }
        log::info!("rendered {} post(s)", site.posts.len());
        Ok(())
    })?;

    stage(Stage::RenderTagPages, || {
        for tag in &site.tags {
            let output = project.tags_output_directory().join(&tag.slug);
            fs::create_dir_all(&output).map_err(|err| Error::Io {
                path: output.clone(),
                err,
            })?;
            writer.render(&tag.page(), Some(tag), &output)?;
        }
        log::info!("rendered {} tag page(s)", site.tags.len());
        Ok(())
    })?;

    log::info!("wrote `{}`", project.output_directory().display());
    Ok(())
}

/// Deletes the output directory and recreates it with the post and tag
/// subdirectories, the theme's static files, and the contents of the
/// project's assets directory (if it has one). Running it twice leaves the
/// same tree.
pub fn reset(project: &Project, assets: &dyn AssetProvider) -> Result<()> {
    let output = project.output_directory();
    rmdir(&output).map_err(|err| Error::Clean {
        path: output.clone(),
        err,
    })?;

    for dir in &[project.posts_output_directory(), project.tags_output_directory()] {
        fs::create_dir_all(dir).map_err(|err| Error::Io {
            path: dir.clone(),
            err,
        })?;
    }

    assets.copy_static(&output).map_err(|err| Error::CopyAssets {
        path: output.clone(),
        err,
    })?;

    let user_assets = project.assets_directory();
    if user_assets.is_dir() {
        copy_dir(&user_assets, &output).map_err(|err| Error::CopyAssets {
            path: user_assets.clone(),
            err,
        })?;
    }
    Ok(())
}

// Finds post tags that have no descriptor. Under the lenient policy they're
// logged; under the strict policy the first one is an error.
fn check_tag_references(site: &SiteConfig, policy: TagPolicy) -> Result<()> {
    for post in &site.posts {
        for slug in &post.tags {
            if site.find_tag(slug).is_some() {
                continue;
            }
            match policy {
                TagPolicy::Strict => {
                    return Err(Error::UnresolvedTag {
                        post: post.root_name.clone(),
                        tag: slug.clone(),
                    })
                }
                TagPolicy::Lenient => log::warn!(
                    "post `{}` has tag `{}` which has no descriptor; it won't get a tag page",
                    post.root_name,
                    slug
                ),
            }
        }
    }
    Ok(())
}

fn stage<T, F>(stage: Stage, f: F) -> Result<T>
where
    F: FnOnce() -> Result<T>,
{
    log::debug!("stage: {}", stage);
    f().map_err(|err| Error::Stage(stage, Box::new(err)))
}

/// The steps of a build, in order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    Reset,
    LoadConfig,
    DiscoverPosts,
    DiscoverTags,
    LoadTemplates,
    RenderSpecialPages,
    RenderPosts,
    RenderTagPages,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            Stage::Reset => "resetting output directory",
            Stage::LoadConfig => "loading configuration",
            Stage::DiscoverPosts => "discovering posts",
            Stage::DiscoverTags => "discovering tags",
            Stage::LoadTemplates => "loading templates",
            Stage::RenderSpecialPages => "rendering special pages",
            Stage::RenderPosts => "rendering posts",
            Stage::RenderTagPages => "rendering tag pages",
        })
    }
}

/// The broad category of a build failure.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Kind {
    /// Reading, writing, creating, or removing files failed.
    Io,

    /// A configuration file, frontmatter block, or tag descriptor is
    /// malformed.
    Decode,

    /// A template is missing, doesn't parse, or failed to execute.
    Template,

    /// A post refers to a tag that has no descriptor.
    Reference,
}

type Result<T> = std::result::Result<T, Error>;

/// The error type for building a site.
#[derive(Debug)]
pub enum Error {
    /// Returned for errors loading the configuration.
    Config(config::Error),

    /// Returned for errors parsing content.
    Parse(parser::Error),

    /// Returned for errors loading templates.
    Template(template::Error),

    /// Returned for errors rendering or writing pages.
    Write(write::Error),

    /// Returned for I/O problems while cleaning the output directory.
    Clean { path: PathBuf, err: io::Error },

    /// Returned for I/O problems while copying static files.
    CopyAssets { path: PathBuf, err: io::Error },

    /// Returned for other I/O errors.
    Io { path: PathBuf, err: io::Error },

    /// Returned under [`TagPolicy::Strict`] when a post lists a tag that has
    /// no descriptor.
    UnresolvedTag { post: String, tag: String },

    /// An error annotated with the stage it happened in.
    Stage(Stage, Box<Error>),
}

impl Error {
    /// Classifies the error.
    pub fn kind(&self) -> Kind {
        match self {
            Error::Config(config::Error::Io { .. }) => Kind::Io,
            Error::Config(config::Error::Decode { .. }) => Kind::Decode,
            Error::Parse(err) => match err.is_decode() {
                true => Kind::Decode,
                false => Kind::Io,
            },
            Error::Template(_) | Error::Write(write::Error::Template(_)) => Kind::Template,
            Error::Write(write::Error::Io { .. }) => Kind::Io,
            Error::Clean { .. } | Error::CopyAssets { .. } | Error::Io { .. } => Kind::Io,
            Error::UnresolvedTag { .. } => Kind::Reference,
            Error::Stage(_, err) => err.kind(),
        }
    }

    /// The stage the error happened in, if known.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            Error::Stage(stage, _) => Some(*stage),
            _ => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Config(err) => err.fmt(f),
            Error::Parse(err) => err.fmt(f),
            Error::Template(err) => err.fmt(f),
            Error::Write(err) => err.fmt(f),
            Error::Clean { path, err } => {
                write!(f, "cleaning directory `{}`: {}", path.display(), err)
            }
            Error::CopyAssets { path, err } => {
                write!(f, "copying static files from `{}`: {}", path.display(), err)
            }
            Error::Io { path, err } => write!(f, "`{}`: {}", path.display(), err),
            Error::UnresolvedTag { post, tag } => write!(
                f,
                "post `{}` has tag `{}` but there is no tag descriptor for it",
                post, tag
            ),
            Error::Stage(stage, err) => write!(f, "{}: {}", stage, err),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Config(err) => Some(err),
            Error::Parse(err) => Some(err),
            Error::Template(err) => Some(err),
            Error::Write(err) => Some(err),
            Error::Clean { path: _, err } => Some(err),
            Error::CopyAssets { path: _, err } => Some(err),
            Error::Io { path: _, err } => Some(err),
            Error::UnresolvedTag { .. } => None,
            Error::Stage(_, err) => Some(err),
        }
    }
}

impl From<config::Error> for Error {
    fn from(err: config::Error) -> Error {
        Error::Config(err)
    }
}

impl From<parser::Error> for Error {
    fn from(err: parser::Error) -> Error {
        Error::Parse(err)
    }
}

impl From<template::Error> for Error {
    fn from(err: template::Error) -> Error {
        Error::Template(err)
    }
}

impl From<write::Error> for Error {
    fn from(err: write::Error) -> Error {
        Error::Write(err)
    }
}
