//! Theme assets: partial templates (`includes/*.html`), layout templates
//! (`layouts/*.html`), and static files (`assets/**`). The build reads them
//! through [`AssetProvider`], so it doesn't care whether they're compiled into
//! the binary ([`BundledAssets`]) or live in a directory ([`DirectoryAssets`]).

use crate::util::copy_dir;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// The directory (in a theme) whose contents are copied into the output.
pub const STATIC_DIRECTORY: &str = "assets";

/// Read-only access to a theme's files by name.
pub trait AssetProvider {
    /// Returns the contents of the asset `name`, e.g. `layouts/post.html`.
    /// Missing assets are reported as [`io::ErrorKind::NotFound`].
    fn read(&self, name: &str) -> io::Result<Vec<u8>>;

    /// Copies the static files into `dst`, keeping them under
    /// [`STATIC_DIRECTORY`] (so `assets/style.css` is written to
    /// `{dst}/assets/style.css`).
    fn copy_static(&self, dst: &Path) -> io::Result<()>;
}

struct Bundled {
    name: &'static str,
    contents: &'static [u8],
}

const BUNDLED: &[Bundled] = &[
    Bundled {
        name: "includes/head.html",
        contents: include_bytes!("../theme/includes/head.html"),
    },
    Bundled {
        name: "includes/header.html",
        contents: include_bytes!("../theme/includes/header.html"),
    },
    Bundled {
        name: "includes/footer.html",
        contents: include_bytes!("../theme/includes/footer.html"),
    },
    Bundled {
        name: "includes/footer-post.html",
        contents: include_bytes!("../theme/includes/footer-post.html"),
    },
    Bundled {
        name: "layouts/default.html",
        contents: include_bytes!("../theme/layouts/default.html"),
    },
    Bundled {
        name: "layouts/blog.html",
        contents: include_bytes!("../theme/layouts/blog.html"),
    },
    Bundled {
        name: "layouts/post.html",
        contents: include_bytes!("../theme/layouts/post.html"),
    },
    Bundled {
        name: "layouts/tagged.html",
        contents: include_bytes!("../theme/layouts/tagged.html"),
    },
    Bundled {
        name: "assets/style.css",
        contents: include_bytes!("../theme/assets/style.css"),
    },
];

/// The default theme, compiled into the binary.
#[derive(Clone, Copy, Debug, Default)]
pub struct BundledAssets;

impl AssetProvider for BundledAssets {
    fn read(&self, name: &str) -> io::Result<Vec<u8>> {
        BUNDLED
            .iter()
            .find(|asset| asset.name == name)
            .map(|asset| asset.contents.to_vec())
            .ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::NotFound,
                    format!("no bundled asset named `{}`", name),
                )
            })
    }

    fn copy_static(&self, dst: &Path) -> io::Result<()> {
        let prefix = format!("{}/", STATIC_DIRECTORY);
        for asset in BUNDLED.iter().filter(|a| a.name.starts_with(&prefix)) {
            let target = dst.join(asset.name);
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&target, asset.contents)?;
        }
        Ok(())
    }
}

/// A theme directory laid out like the bundled theme.
#[derive(Clone, Debug)]
pub struct DirectoryAssets {
    root: PathBuf,
}

impl DirectoryAssets {
    pub fn new<P: Into<PathBuf>>(root: P) -> DirectoryAssets {
        DirectoryAssets { root: root.into() }
    }
}

impl AssetProvider for DirectoryAssets {
    fn read(&self, name: &str) -> io::Result<Vec<u8>> {
        fs::read(self.root.join(name))
    }

    fn copy_static(&self, dst: &Path) -> io::Result<()> {
        let src = self.root.join(STATIC_DIRECTORY);
        if !src.is_dir() {
            return Ok(());
        }
        copy_dir(&src, &dst.join(STATIC_DIRECTORY))
    }
}
