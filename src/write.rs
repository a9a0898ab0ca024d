//! Renders pages through their layouts and writes them to disk.

use crate::fragments::Fragments;
use crate::post::Post;
use crate::tag::Tag;
use crate::template::{self, Templates};
use crate::value::object;
use gtmpl::Value;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

/// Responsible for templating pages and writing them to disk.
pub struct Writer<'a> {
    /// The parsed partials and layouts.
    pub templates: &'a Templates,

    /// The template value of the site configuration, including every post
    /// and tag. It's converted once and shared by all pages.
    pub site: &'a Value,
}

impl Writer<'_> {
    /// Renders the partials for `page` and then writes the page with
    /// [`Writer::write_page`].
    pub fn render(&self, page: &Post, tag: Option<&Tag>, directory: &Path) -> Result<PathBuf> {
        let post = Value::from(page);
        let fragments = Fragments::compose(self.templates, self.site, &post)?;
        self.write_page(page, &post, tag, &fragments, directory)
    }

    /// Executes the layout named by `page.layout` and writes the result to
    /// `{directory}/{page.root_name}.html`, replacing any existing file.
    /// Returns the path of the written file.
    ///
    /// The layout sees:
    ///
    /// * `content`: the page's rendered body (empty for tag pages)
    /// * `site`: the site configuration, including every post and tag
    /// * `post`: the page itself
    /// * `tag`: the tag for tag pages, an empty tag otherwise
    /// * `includes`: the rendered partials (see [`Fragments::to_value`])
    pub fn write_page(
        &self,
        page: &Post,
        post: &Value,
        tag: Option<&Tag>,
        fragments: &Fragments,
        directory: &Path,
    ) -> Result<PathBuf> {
        let tag = match tag {
            Some(tag) => Value::from(tag),
            None => Value::from(&Tag::default()),
        };
        let data = object(vec![
            ("content", Value::String(page.html.clone())),
            ("site", self.site.clone()),
            ("post", post.clone()),
            ("tag", tag),
            ("includes", fragments.to_value()),
        ]);
        let html = self.templates.render_layout(&page.layout, data)?;

        let path = directory.join(format!("{}.html", page.root_name));
        std::fs::write(&path, html).map_err(|err| Error::Io {
            path: path.clone(),
            err,
        })?;
        log::debug!("wrote `{}`", path.display());
        Ok(path)
    }
}

/// The result of a fallible page-writing operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error in a page-writing operation.
#[derive(Debug)]
pub enum Error {
    /// An error during templating.
    Template(template::Error),

    /// An error writing the output file.
    Io { path: PathBuf, err: io::Error },
}

impl From<template::Error> for Error {
    /// Converts a [`template::Error`] into an [`Error`]. This allows us to
    /// use the `?` operator for fallible template operations.
    fn from(err: template::Error) -> Error {
        Error::Template(err)
    }
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as presentable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Template(err) => err.fmt(f),
            Error::Io { path, err } => {
                write!(f, "writing `{}`: {}", path.display(), err)
            }
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Template(err) => Some(err),
            Error::Io { path: _, err } => Some(err),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::assets::DirectoryAssets;
    use crate::config::SiteConfig;
    use std::fs;

    fn templates(dir: &Path, layouts: &[(&str, &str)]) -> std::result::Result<Templates, Box<dyn std::error::Error>> {
        fs::create_dir_all(dir.join("includes"))?;
        fs::create_dir_all(dir.join("layouts"))?;
        fs::write(dir.join("includes/head.html"), "<title>{{ .post.title }}</title>")?;
        fs::write(dir.join("includes/header.html"), "<h1>{{ .site.title }}</h1>")?;
        fs::write(dir.join("includes/footer.html"), "<footer/>")?;
        fs::write(dir.join("includes/footer-post.html"), "<hr/>")?;
        for (name, contents) in layouts {
            fs::write(dir.join(format!("layouts/{}.html", name)), contents)?;
        }
        let names: Vec<&str> = layouts.iter().map(|(name, _)| *name).collect();
        Ok(Templates::load(&DirectoryAssets::new(dir), names)?)
    }

    #[test]
    fn test_write_post_page() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let theme = tempfile::tempdir()?;
        let out = tempfile::tempdir()?;
        let templates = templates(
            theme.path(),
            &[(
                "post",
                "{{ .includes.Head }}{{ .includes.Header }}{{ .content }}{{ .includes.FooterPost }}",
            )],
        )?;
        let site = Value::from(&SiteConfig {
            title: "Site".to_owned(),
            ..SiteConfig::default()
        });
        let writer = Writer {
            templates: &templates,
            site: &site,
        };
        let post = Post {
            title: "Hello".to_owned(),
            layout: "post".to_owned(),
            root_name: "hello".to_owned(),
            html: "<p>hi</p>".to_owned(),
            ..Post::default()
        };

        let path = writer.render(&post, None, out.path())?;
        assert_eq!(out.path().join("hello.html"), path);
        assert_eq!(
            "<title>Hello</title><h1>Site</h1><p>hi</p><hr/>",
            fs::read_to_string(path)?
        );
        Ok(())
    }

    #[test]
    fn test_write_tag_page_filters_posts() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let theme = tempfile::tempdir()?;
        let out = tempfile::tempdir()?;
        let templates = templates(
            theme.path(),
            &[(
                "tagged",
                "{{ .tag.slug }}:{{ range .site.posts }}{{ if contains_tag . $.tag.slug }}[{{ .root_name }}]{{ end }}{{ end }}",
            )],
        )?;
        let tag = Tag::new("rust");
        let site = Value::from(&SiteConfig {
            posts: vec![
                Post {
                    root_name: "a".to_owned(),
                    tags: vec!["rust".to_owned()],
                    ..Post::default()
                },
                Post {
                    root_name: "b".to_owned(),
                    tags: vec!["go".to_owned()],
                    ..Post::default()
                },
            ],
            tags: vec![tag.clone()],
            ..SiteConfig::default()
        });
        let writer = Writer {
            templates: &templates,
            site: &site,
        };

        let path = writer.render(&tag.page(), Some(&tag), out.path())?;
        assert_eq!(out.path().join("rust.html"), path);
        assert_eq!("rust:[a]", fs::read_to_string(path)?);
        Ok(())
    }

    #[test]
    fn test_write_overwrites_existing_file() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let theme = tempfile::tempdir()?;
        let out = tempfile::tempdir()?;
        let templates = templates(theme.path(), &[("post", "{{ .post.title }}")])?;
        let site = Value::from(&SiteConfig::default());
        let writer = Writer {
            templates: &templates,
            site: &site,
        };
        fs::write(out.path().join("dup.html"), "a much longer stale page")?;

        for title in &["first", "second"] {
            let post = Post {
                title: title.to_string(),
                layout: "post".to_owned(),
                root_name: "dup".to_owned(),
                ..Post::default()
            };
            writer.render(&post, None, out.path())?;
        }
        assert_eq!("second", fs::read_to_string(out.path().join("dup.html"))?);
        Ok(())
    }

    #[test]
    fn test_write_missing_directory() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let theme = tempfile::tempdir()?;
        let out = tempfile::tempdir()?;
        let templates = templates(theme.path(), &[("post", "x")])?;
        let site = Value::from(&SiteConfig::default());
        let writer = Writer {
            templates: &templates,
            site: &site,
        };
        let post = Post {
            layout: "post".to_owned(),
            root_name: "x".to_owned(),
            ..Post::default()
        };
        let result = writer.render(&post, None, &out.path().join("missing"));
        assert!(matches!(result, Err(Error::Io { .. })));
        Ok(())
    }

    #[test]
    fn test_write_unknown_layout() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let theme = tempfile::tempdir()?;
        let out = tempfile::tempdir()?;
        let templates = templates(theme.path(), &[("post", "x")])?;
        let site = Value::from(&SiteConfig::default());
        let writer = Writer {
            templates: &templates,
            site: &site,
        };
        let post = Post {
            layout: "gallery".to_owned(),
            root_name: "x".to_owned(),
            ..Post::default()
        };
        let result = writer.render(&post, None, out.path());
        assert!(matches!(result, Err(Error::Template(_))));
        assert!(!out.path().join("x.html").exists());
        Ok(())
    }
}
