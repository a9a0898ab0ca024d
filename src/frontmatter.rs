//! Splits source documents into a JSON frontmatter block and a markdown body
//! and writes new documents with a frontmatter block.
//!
//! A document looks like this:
//!
//! ```md
//! ------------------
//! {"title": "Hello, world!", "date": "Apr 16th, 2021", "tags": ["greet"]}
//! ------------------
//! # Hello
//!
//! World
//! ```
//!
//! The boundary lines must match [`BOUNDARY`] exactly. Only the first two
//! boundary lines are significant; any later ones are ordinary body text.

use serde::de::DeserializeOwned;
use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

/// The line which opens and closes the frontmatter block.
pub const BOUNDARY: &str = "------------------";

/// Splits `input` into its `(metadata, body)` parts.
///
/// Lines before the second boundary are metadata and are concatenated with
/// their line terminators dropped. Every line after the second boundary is
/// body and keeps exactly one trailing `\n`. If the input has fewer than two
/// boundaries, the body is empty.
pub fn decode(input: &[u8]) -> (Vec<u8>, Vec<u8>) {
    let mut metadata = Vec::new();
    let mut body = Vec::new();
    let mut boundaries = 0;

    for line in lines(input) {
        if boundaries < 2 {
            if line == BOUNDARY.as_bytes() {
                boundaries += 1;
            } else {
                metadata.extend_from_slice(line);
            }
            continue;
        }
        body.extend_from_slice(line);
        body.push(b'\n');
    }

    (metadata, body)
}

/// Wraps `metadata` between two boundary lines. The result is a complete
/// document with an empty body.
pub fn encode(metadata: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(metadata.len() + 2 * (BOUNDARY.len() + 1) + 1);
    out.extend_from_slice(BOUNDARY.as_bytes());
    out.push(b'\n');
    out.extend_from_slice(metadata);
    out.push(b'\n');
    out.extend_from_slice(BOUNDARY.as_bytes());
    out.push(b'\n');
    out
}

/// Reads the document at `path` and splits it with [`decode`].
pub fn read(path: &Path) -> Result<(Vec<u8>, Vec<u8>)> {
    let contents = fs::read(path)?;
    Ok(decode(&contents))
}

/// Deserializes a metadata block produced by [`decode`].
pub fn parse_metadata<T: DeserializeOwned>(metadata: &[u8]) -> Result<T> {
    Ok(serde_json::from_slice(metadata)?)
}

/// Serializes `metadata` as pretty-printed JSON and writes it to `path` as a
/// frontmatter-only document, creating or truncating the file.
pub fn write<T: serde::Serialize>(path: &Path, metadata: &T) -> Result<()> {
    let raw = serde_json::to_vec_pretty(metadata)?;
    fs::write(path, encode(&raw))?;
    Ok(())
}

// Yields the lines of `input` the way a line scanner does: the terminator
// (`\n` or `\r\n`) is removed and a trailing newline does not produce a final
// empty line.
fn lines(input: &[u8]) -> impl Iterator<Item = &[u8]> {
    let trimmed = match input.last() {
        Some(b'\n') => &input[..input.len() - 1],
        _ => input,
    };
    let empty = input.is_empty();
    trimmed
        .split(|b| *b == b'\n')
        .filter(move |_| !empty)
        .map(|line| match line.last() {
            Some(b'\r') => &line[..line.len() - 1],
            _ => line,
        })
}

/// The result of a fallible frontmatter operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error reading, writing, or decoding frontmatter.
#[derive(Debug)]
pub enum Error {
    /// Returned when the document can't be read or written.
    Io(io::Error),

    /// Returned when the metadata block isn't valid JSON of the expected
    /// shape.
    Decode(serde_json::Error),
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Io(err) => err.fmt(f),
            Error::Decode(err) => write!(f, "decoding frontmatter: {}", err),
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            Error::Decode(err) => Some(err),
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Error {
        Error::Io(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Error {
        Error::Decode(err)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::{json, Value};

    #[test]
    fn test_decode_splits_metadata_and_body() {
        let input = b"------------------\n{\"title\":\"A\"}\n------------------\nBody text\n";
        let (metadata, body) = decode(input);
        assert_eq!(br#"{"title":"A"}"#.to_vec(), metadata);
        assert_eq!(b"Body text\n".to_vec(), body);
    }

    #[test]
    fn test_decode_restores_one_newline_per_body_line() {
        let input = b"------------------\n{}\n------------------\none\n\nthree";
        let (_, body) = decode(input);
        assert_eq!(b"one\n\nthree\n".to_vec(), body);
    }

    #[test]
    fn test_decode_keeps_later_boundaries_in_body() {
        let input = b"------------------\n{}\n------------------\nabove\n------------------\nbelow\n";
        let (metadata, body) = decode(input);
        assert_eq!(b"{}".to_vec(), metadata);
        assert_eq!(b"above\n------------------\nbelow\n".to_vec(), body);
    }

    #[test]
    fn test_decode_single_boundary_has_no_body() {
        let input = b"------------------\n{\"title\":\"A\"}\nnot body\n";
        let (metadata, body) = decode(input);
        assert_eq!(br#"{"title":"A"}not body"#.to_vec(), metadata);
        assert!(body.is_empty());
    }

    #[test]
    fn test_decode_nothing_after_second_boundary() {
        let (metadata, body) = decode(b"------------------\n{}\n------------------\n");
        assert_eq!(b"{}".to_vec(), metadata);
        assert!(body.is_empty());
    }

    #[test]
    fn test_decode_boundary_must_be_whole_line() {
        let input = b" ------------------\n{}\n------------------ \n";
        let (metadata, body) = decode(input);
        assert_eq!(
            b" ------------------{}------------------ ".to_vec(),
            metadata
        );
        assert!(body.is_empty());
    }

    #[test]
    fn test_decode_crlf() {
        let input = b"------------------\r\n{}\r\n------------------\r\nbody\r\n";
        let (metadata, body) = decode(input);
        assert_eq!(b"{}".to_vec(), metadata);
        assert_eq!(b"body\n".to_vec(), body);
    }

    #[test]
    fn test_encode_then_decode_preserves_metadata() -> Result<()> {
        let wanted = json!({
            "title": "chettriyuvraj",
            "description": "A personal blog",
            "URL": "https://example.org",
            "special_links": [
                {"URL": "https://github.com/example", "display_text": "Github"}
            ],
            "paths": {"blog": "/blog"},
            "google_analytics": {"tracking_id": "1234567"}
        });
        let raw = serde_json::to_vec_pretty(&wanted)?;
        let (metadata, body) = decode(&encode(&raw));
        let found: Value = parse_metadata(&metadata)?;
        assert_eq!(wanted, found);
        assert!(body.is_empty());
        Ok(())
    }

    #[test]
    fn test_parse_metadata_rejects_malformed_json() {
        let result: Result<Value> = parse_metadata(b"{\"title\": ");
        assert!(matches!(result, Err(Error::Decode(_))));
    }

    #[test]
    fn test_write_then_read() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("post.md");
        write(&path, &json!({"title": "A"}))?;
        let (metadata, body) = read(&path)?;
        let found: Value = parse_metadata(&metadata)?;
        assert_eq!(json!({"title": "A"}), found);
        assert!(body.is_empty());
        Ok(())
    }

    #[test]
    fn test_read_missing_file() {
        let result = read(Path::new("./does/not/exist.md"));
        assert!(matches!(result, Err(Error::Io(_))));
    }
}
