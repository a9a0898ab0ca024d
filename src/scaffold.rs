//! Creates project files: the initial layout of a new project, new posts, and
//! new tag descriptors.

use crate::config::{Project, SiteConfig};
use crate::frontmatter;
use crate::post::Post;
use crate::tag::Tag;
use chrono::{Datelike, Local, NaiveDate};
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Creates the content directories (`markdown/posts`, `markdown/tags`, and
/// `markdown/assets/images`), a sample `config.json`, and home and blog pages
/// holding placeholder frontmatter. Existing files are overwritten.
pub fn init(project: &Project) -> Result<()> {
    for dir in &[
        project.posts_directory(),
        project.tags_directory(),
        project.assets_directory().join("images"),
    ] {
        fs::create_dir_all(dir).map_err(|err| Error::Io {
            path: dir.clone(),
            err,
        })?;
    }

    write_json(&project.config_file(), &SiteConfig::sample())?;

    let pages = [
        (
            project.index_file(),
            "(enter title for homepage; it's shown in the browser tab)",
            "(enter description for homepage; it's page metadata, not displayed content)",
        ),
        (
            project.blog_file(),
            "(enter title for blog page; it's shown in the browser tab)",
            "(enter description for blog page; it's page metadata, not displayed content)",
        ),
    ];
    for (path, title, description) in &pages {
        let page = Post {
            title: title.to_string(),
            description: description.to_string(),
            ..Post::default()
        };
        write_frontmatter(path, &page)?;
    }

    log::info!("initialized `{}`", project.root.display());
    Ok(())
}

/// Creates `markdown/posts/{title}.md` (with spaces in the title replaced by
/// underscores) holding frontmatter with the title, today's date, and `tags`.
/// Tags are written as given; each one needs a descriptor (see
/// [`create_tags`]) before it gets a page. Returns the path of the new file.
pub fn create_post(project: &Project, title: &str, tags: &[String]) -> Result<PathBuf> {
    if title.trim().is_empty() {
        return Err(Error::EmptyTitle);
    }

    let path = project
        .posts_directory()
        .join(format!("{}.md", title.replace(' ', "_")));
    let post = Post {
        title: title.to_owned(),
        date: format_date(Local::now().naive_local().date()),
        tags: tags.to_vec(),
        ..Post::default()
    };
    write_frontmatter(&path, &post)?;
    log::info!("created post `{}`", path.display());
    Ok(path)
}

/// Creates `markdown/tags/{slug}.json` for each of `tags`, where the slug is
/// the lowercased tag. Returns the paths of the new files.
pub fn create_tags<S: AsRef<str>>(project: &Project, tags: &[S]) -> Result<Vec<PathBuf>> {
    let directory = project.tags_directory();
    let mut paths = Vec::with_capacity(tags.len());
    for input in tags {
        let tag = Tag::new(input.as_ref());
        let path = directory.join(format!("{}.json", tag.slug));
        write_json(&path, &tag)?;
        log::info!("created tag `{}`", tag.slug);
        paths.push(path);
    }
    Ok(paths)
}

/// Formats `date` like `Feb 21st, 2024`.
pub fn format_date(date: NaiveDate) -> String {
    let day = date.day();
    let suffix = match day {
        1 | 21 | 31 => "st",
        2 | 22 => "nd",
        3 | 23 => "rd",
        _ => "th",
    };
    format!("{} {}{}, {}", date.format("%b"), day, suffix, date.year())
}

fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_vec_pretty(value).map_err(|err| Error::Encode {
        path: path.to_owned(),
        err,
    })?;
    fs::write(path, json).map_err(|err| Error::Io {
        path: path.to_owned(),
        err,
    })
}

fn write_frontmatter(path: &Path, page: &Post) -> Result<()> {
    frontmatter::write(path, page).map_err(|err| Error::Frontmatter {
        path: path.to_owned(),
        err,
    })
}

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
    /// Returned when creating a post without a title.
    EmptyTitle,

    /// Returned when a JSON document can't be encoded.
    Encode { path: PathBuf, err: serde_json::Error },

    /// Returned when a frontmatter document can't be written.
    Frontmatter { path: PathBuf, err: frontmatter::Error },

    /// Returned for other I/O errors.
    Io { path: PathBuf, err: io::Error },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::EmptyTitle => write!(f, "no title provided"),
            Error::Encode { path, err } => {
                write!(f, "encoding `{}`: {}", path.display(), err)
            }
            Error::Frontmatter { path, err } => {
                write!(f, "writing `{}`: {}", path.display(), err)
            }
            Error::Io { path, err } => {
                write!(f, "creating `{}`: {}", path.display(), err)
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::EmptyTitle => None,
            Error::Encode { path: _, err } => Some(err),
            Error::Frontmatter { path: _, err } => Some(err),
            Error::Io { path: _, err } => Some(err),
        }
    }
}
