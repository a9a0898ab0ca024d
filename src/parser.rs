//! Discovers and parses content: posts (and the special pages, which are
//! posts too) from markdown documents, and tags from JSON descriptors.
//!
//! Listing is fail-fast: the first file that can't be read or parsed aborts
//! the whole listing and nothing is returned.

use crate::frontmatter;
use crate::markdown;
use crate::post::{root_name, Post};
use crate::tag::Tag;
use std::fmt;
use std::fs::{self, read_dir};
use std::io;
use std::path::{Path, PathBuf};

/// The extension of post source files.
pub const MARKDOWN_EXTENSION: &str = ".md";

/// The extension of tag descriptor files.
pub const JSON_EXTENSION: &str = ".json";

/// Parses a single [`Post`] from the document at `path`: the frontmatter
/// becomes the post's metadata, the body is converted to HTML, and the root
/// name is derived from the file name.
pub fn parse_post(path: &Path) -> Result<Post> {
    match _parse_post(path) {
        Ok(post) => Ok(post),
        Err(e) => Err(Error::Annotated(path.to_owned(), Box::new(e))),
    }
}

fn _parse_post(path: &Path) -> Result<Post> {
    let (metadata, body) = frontmatter::read(path)?;
    let mut post: Post = frontmatter::parse_metadata(&metadata)?;
    post.markdown = String::from_utf8_lossy(&body).into_owned();
    post.html = markdown::to_html(&post.markdown)?;
    post.root_name = root_name(path);
    Ok(post)
}

/// Parses a single [`Tag`] from the JSON descriptor at `path`.
pub fn parse_tag(path: &Path) -> Result<Tag> {
    let parse = || -> Result<Tag> { Ok(serde_json::from_slice(&fs::read(path)?)?) };
    parse().map_err(|e| Error::Annotated(path.to_owned(), Box::new(e)))
}

/// Parses every `.md` file directly inside `directory` into a [`Post`].
/// Posts are returned in file-name order.
///
/// Each file must be structured as follows:
///
/// ```md
/// ------------------
/// {"title": "Hello, world!", "date": "Apr 16th, 2021", "tags": ["greet"]}
/// ------------------
/// # Hello
///
/// World
/// ```
pub fn list_posts(directory: &Path) -> Result<Vec<Post>> {
    list(directory, MARKDOWN_EXTENSION)?
        .iter()
        .map(|path| {
            log::debug!("parsing post `{}`", path.display());
            parse_post(path)
        })
        .collect()
}

/// Parses every `.json` file directly inside `directory` into a [`Tag`].
/// Tags are returned in file-name order.
pub fn list_tags(directory: &Path) -> Result<Vec<Tag>> {
    list(directory, JSON_EXTENSION)?
        .iter()
        .map(|path| {
            log::debug!("parsing tag `{}`", path.display());
            parse_tag(path)
        })
        .collect()
}

// Returns the paths of the files in `directory` whose names end with
// `extension`, sorted by file name. Subdirectories are not searched.
fn list(directory: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    let annotate = |e| directory_error(directory, e);

    let mut paths = Vec::new();
    for result in read_dir(directory).map_err(annotate)? {
        let entry = result.map_err(annotate)?;
        if entry.file_type().map_err(annotate)?.is_dir() {
            continue;
        }
        if entry.file_name().to_string_lossy().ends_with(extension) {
            paths.push(entry.path());
        }
    }
    paths.sort();
    Ok(paths)
}

// Every I/O failure while listing names the directory being listed.
fn directory_error(directory: &Path, err: io::Error) -> Error {
    Error::Annotated(directory.to_owned(), Box::new(Error::Io(err)))
}

/// Represents the result of a content-parsing operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error parsing content.
#[derive(Debug)]
pub enum Error {
    /// Returned when a document's frontmatter can't be read or decoded.
    Frontmatter(frontmatter::Error),

    /// Returned when a tag descriptor isn't valid JSON of the expected shape.
    Decode(serde_json::Error),

    /// Returned for other I/O errors.
    Io(io::Error),

    /// An error annotated with the path it concerns.
    Annotated(PathBuf, Box<Error>),
}

impl Error {
    /// Reports whether the underlying error is a decoding error (as opposed
    /// to an I/O error).
    pub fn is_decode(&self) -> bool {
        match self {
            Error::Frontmatter(frontmatter::Error::Decode(_)) | Error::Decode(_) => true,
            Error::Frontmatter(frontmatter::Error::Io(_)) | Error::Io(_) => false,
            Error::Annotated(_, err) => err.is_decode(),
        }
    }
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Frontmatter(err) => err.fmt(f),
            Error::Decode(err) => err.fmt(f),
            Error::Io(err) => err.fmt(f),
            Error::Annotated(path, err) => {
                write!(f, "parsing `{}`: {}", path.display(), err)
            }
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Frontmatter(err) => Some(err),
            Error::Decode(err) => Some(err),
            Error::Io(err) => Some(err),
            Error::Annotated(_, err) => Some(err),
        }
    }
}

impl From<frontmatter::Error> for Error {
    fn from(err: frontmatter::Error) -> Error {
        Error::Frontmatter(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Error {
        Error::Decode(err)
    }
}

impl From<io::Error> for Error {
    /// Converts a [`std::io::Error`] into an [`Error`]. It allows us to
    /// use the `?` operator for fallible I/O functions.
    fn from(err: io::Error) -> Error {
        Error::Io(err)
    }
}
