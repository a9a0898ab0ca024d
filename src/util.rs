//! File system helpers shared by the build and scaffolding steps.

use std::fs;
use std::io;
use std::path::Path;
use walkdir::WalkDir;

/// Removes `dir` and everything in it. A missing directory is not an error.
pub fn rmdir(dir: &Path) -> io::Result<()> {
    match fs::remove_dir_all(dir) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}

/// Recursively copies the contents of `src` into `dst`, creating directories
/// as needed and overwriting files that already exist.
pub fn copy_dir(src: &Path, dst: &Path) -> io::Result<()> {
    for result in WalkDir::new(src).min_depth(1) {
        let entry = result?;
        // strip_prefix() can't fail; every entry is beneath `src`.
        let relative = match entry.path().strip_prefix(src) {
            Ok(relative) => relative,
            Err(_) => continue,
        };
        let target = dst.join(relative);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
        } else {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_rmdir_missing_is_ok() -> io::Result<()> {
        let dir = tempfile::tempdir()?;
        rmdir(&dir.path().join("missing"))
    }

    #[test]
    fn test_copy_dir() -> io::Result<()> {
        let src = tempfile::tempdir()?;
        let dst = tempfile::tempdir()?;
        fs::create_dir_all(src.path().join("images"))?;
        fs::write(src.path().join("style.css"), "body {}")?;
        fs::write(src.path().join("images/cat.png"), [1u8, 2, 3])?;
        fs::write(dst.path().join("style.css"), "old")?;

        copy_dir(src.path(), dst.path())?;

        assert_eq!("body {}", fs::read_to_string(dst.path().join("style.css"))?);
        assert_eq!(vec![1u8, 2, 3], fs::read(dst.path().join("images/cat.png"))?);
        Ok(())
    }
}
