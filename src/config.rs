//! Site configuration (`config.json`) and the layout of a project on disk.

use crate::post::Post;
use crate::tag::Tag;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

/// A link shown in the site header, e.g. to a social profile.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Link {
    #[serde(rename = "URL", default)]
    pub url: String,

    #[serde(default)]
    pub display_text: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Paths {
    /// The URL path prefix for posts, e.g. `/blog`.
    #[serde(default)]
    pub blog: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GoogleAnalytics {
    #[serde(default)]
    pub tracking_id: String,
}

/// The site-wide configuration. It's loaded once per build; `tags` and
/// `posts` are then filled in from the content directory and the config is
/// not modified again.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SiteConfig {
    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub description: String,

    /// The canonical URL of the site.
    #[serde(rename = "URL", default)]
    pub url: String,

    #[serde(default)]
    pub special_links: Vec<Link>,

    #[serde(default)]
    pub paths: Paths,

    #[serde(rename = "google_analytics", default)]
    pub analytics: GoogleAnalytics,

    /// Every tag descriptor. Populated during the build.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<Tag>,

    /// Every post. Populated during the build.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub posts: Vec<Post>,
}

impl SiteConfig {
    /// Loads the configuration from a JSON file. Any `tags` or `posts` in the
    /// file are discarded since they're derived from content.
    pub fn load(path: &Path) -> Result<SiteConfig> {
        let contents = std::fs::read(path).map_err(|err| Error::Io {
            path: path.to_owned(),
            err,
        })?;
        let mut config: SiteConfig =
            serde_json::from_slice(&contents).map_err(|err| Error::Decode {
                path: path.to_owned(),
                err,
            })?;
        config.tags.clear();
        config.posts.clear();
        Ok(config)
    }

    /// The configuration `init` writes for a new project.
    pub fn sample() -> SiteConfig {
        SiteConfig {
            title: "My blog".to_owned(),
            description: "A personal blog".to_owned(),
            url: "http://localhost:3000".to_owned(),
            special_links: vec![Link {
                url: "https://github.com/".to_owned(),
                display_text: "Github".to_owned(),
            }],
            paths: Paths {
                blog: "/blog".to_owned(),
            },
            analytics: GoogleAnalytics {
                tracking_id: "1234567".to_owned(),
            },
            tags: Vec::new(),
            posts: Vec::new(),
        }
    }

    /// Finds the tag descriptor for `slug`. Slugs are compared exactly.
    pub fn find_tag(&self, slug: &str) -> Option<&Tag> {
        self.tags.iter().find(|t| t.slug == slug)
    }
}

/// What to do when a post lists a tag slug that has no tag descriptor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TagPolicy {
    /// Log a warning and render the post anyway. The tag simply has no page.
    Lenient,

    /// Fail the build.
    Strict,
}

impl Default for TagPolicy {
    fn default() -> Self {
        TagPolicy::Lenient
    }
}

/// The locations of a project's inputs and outputs. Every path is relative to
/// the project root:
///
/// ```text
/// config.json
/// markdown/
///     index.md        home page
///     blog.md         blog listing
///     posts/*.md
///     tags/*.json
///     assets/         copied into the output root
/// docs/               output
/// ```
#[derive(Clone, Debug)]
pub struct Project {
    pub root: PathBuf,
    pub tag_policy: TagPolicy,
}

pub const CONFIG_FILE: &str = "config.json";
pub const CONTENT_DIRECTORY: &str = "markdown";
pub const OUTPUT_DIRECTORY: &str = "docs";
pub const INDEX_FILE: &str = "index.md";
pub const BLOG_FILE: &str = "blog.md";

/// The output subdirectory for post pages.
pub const POSTS_OUTPUT: &str = "blog";

/// The output subdirectory for tag pages.
pub const TAGS_OUTPUT: &str = "tagged";

impl Project {
    pub fn new<P: Into<PathBuf>>(root: P) -> Project {
        Project {
            root: root.into(),
            tag_policy: TagPolicy::default(),
        }
    }

    pub fn with_tag_policy(mut self, tag_policy: TagPolicy) -> Project {
        self.tag_policy = tag_policy;
        self
    }

    pub fn config_file(&self) -> PathBuf {
        self.root.join(CONFIG_FILE)
    }

    pub fn content_directory(&self) -> PathBuf {
        self.root.join(CONTENT_DIRECTORY)
    }

    pub fn posts_directory(&self) -> PathBuf {
        self.content_directory().join("posts")
    }

    pub fn tags_directory(&self) -> PathBuf {
        self.content_directory().join("tags")
    }

    /// The user's static files, copied over the theme's static files.
    pub fn assets_directory(&self) -> PathBuf {
        self.content_directory().join("assets")
    }

    pub fn index_file(&self) -> PathBuf {
        self.content_directory().join(INDEX_FILE)
    }

    pub fn blog_file(&self) -> PathBuf {
        self.content_directory().join(BLOG_FILE)
    }

    pub fn output_directory(&self) -> PathBuf {
        self.root.join(OUTPUT_DIRECTORY)
    }

    pub fn posts_output_directory(&self) -> PathBuf {
        self.output_directory().join(POSTS_OUTPUT)
    }

    pub fn tags_output_directory(&self) -> PathBuf {
        self.output_directory().join(TAGS_OUTPUT)
    }
}

/// The result of loading the configuration.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error loading the configuration file.
#[derive(Debug)]
pub enum Error {
    /// Returned when the configuration file can't be read.
    Io { path: PathBuf, err: io::Error },

    /// Returned when the configuration file isn't valid JSON of the expected
    /// shape.
    Decode { path: PathBuf, err: serde_json::Error },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Io { path, err } => {
                write!(f, "reading config file `{}`: {}", path.display(), err)
            }
            Error::Decode { path, err } => {
                write!(f, "decoding config file `{}`: {}", path.display(), err)
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io { path: _, err } => Some(err),
            Error::Decode { path: _, err } => Some(err),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_load() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(
            &path,
            r#"{
                "title": "chettriyuvraj",
                "description": "A personal blog",
                "URL": "https://example.org",
                "special_links": [
                    {"URL": "https://github.com/example", "display_text": "Github"}
                ],
                "paths": {"blog": "/blog"},
                "google_analytics": {"tracking_id": "1234567"},
                "tags": [{"slug": "stale"}]
            }"#,
        )?;

        let config = SiteConfig::load(&path)?;
        assert_eq!("chettriyuvraj", config.title);
        assert_eq!("https://example.org", config.url);
        assert_eq!("Github", config.special_links[0].display_text);
        assert_eq!("/blog", config.paths.blog);
        assert_eq!("1234567", config.analytics.tracking_id);
        assert!(config.tags.is_empty());
        assert!(config.posts.is_empty());
        Ok(())
    }

    #[test]
    fn test_load_malformed() -> io::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "{\"title\": [")?;
        assert!(matches!(SiteConfig::load(&path), Err(Error::Decode { .. })));
        Ok(())
    }

    #[test]
    fn test_load_missing() {
        let result = SiteConfig::load(Path::new("./no/such/config.json"));
        assert!(matches!(result, Err(Error::Io { .. })));
    }

    #[test]
    fn test_sample_round_trips() -> serde_json::Result<()> {
        let sample = SiteConfig::sample();
        let found: SiteConfig = serde_json::from_str(&serde_json::to_string_pretty(&sample)?)?;
        assert_eq!(sample, found);
        Ok(())
    }

    #[test]
    fn test_find_tag_is_case_sensitive() {
        let config = SiteConfig {
            tags: vec![Tag::new("rust")],
            ..SiteConfig::default()
        };
        assert!(config.find_tag("rust").is_some());
        assert!(config.find_tag("Rust").is_none());
    }

    #[test]
    fn test_project_paths() {
        let project = Project::new("/site");
        assert_eq!(PathBuf::from("/site/config.json"), project.config_file());
        assert_eq!(PathBuf::from("/site/markdown/posts"), project.posts_directory());
        assert_eq!(PathBuf::from("/site/docs/tagged"), project.tags_output_directory());
    }
}
