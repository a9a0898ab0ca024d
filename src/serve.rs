//! A small HTTP server for previewing the generated site, built on
//! `tiny_http`.
//!
//! Requests resolve against the output directory (see [`resolve`]) so that
//! the extensionless links the theme writes (`/blog/hello`) reach the
//! `.html` files the build writes (`blog/hello.html`).

use anyhow::{anyhow, Context, Result};
use std::fs;
use std::io::Cursor;
use std::net::SocketAddr;
use std::path::{Component, Path, PathBuf};
use tiny_http::{Header, Request, Response, Server, StatusCode};

/// The port `serve` listens on by default.
pub const DEFAULT_PORT: u16 = 3000;

/// Serves `root` on `127.0.0.1:{port}` until the process is killed.
pub fn serve(root: &Path, port: u16) -> Result<()> {
    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    let server = Server::http(addr).map_err(|e| anyhow!("binding {}: {}", addr, e))?;
    log::info!("serving `{}` at http://{}", root.display(), addr);

    for request in server.incoming_requests() {
        if let Err(e) = handle_request(request, root) {
            log::warn!("request error: {:#}", e);
        }
    }
    Ok(())
}

/// Maps a request path to the file that answers it, trying in order:
///
/// 1. `/blog` and `/blog/` map to `blog.html`, since `blog/` is the posts
///    directory
/// 2. `{path}.html`
/// 3. `{path}` itself, if it's a file
/// 4. `{path}/index.html`, if `{path}` is a directory
///
/// Query strings are ignored and the rest is percent-decoded before any
/// lookup. Paths that don't decode to UTF-8 or that try to climb out of
/// `root` resolve to nothing.
pub fn resolve(root: &Path, url_path: &str) -> Option<PathBuf> {
    let raw = url_path.split('?').next().unwrap_or_default();
    let path = urlencoding::decode(raw).ok()?;
    if path == "/blog" || path == "/blog/" {
        return Some(root.join("blog.html")).filter(|p| p.is_file());
    }

    let relative = path.trim_matches('/');
    let escapes = Path::new(relative)
        .components()
        .any(|c| !matches!(c, Component::Normal(_)));
    if escapes {
        return None;
    }

    let html = root.join(format!("{}.html", relative));
    if !relative.is_empty() && html.is_file() {
        return Some(html);
    }

    let local = root.join(relative);
    if local.is_file() {
        return Some(local);
    }
    let index = local.join("index.html");
    if local.is_dir() && index.is_file() {
        return Some(index);
    }
    None
}

fn handle_request(request: Request, root: &Path) -> Result<()> {
    log::debug!("{} {}", request.method(), request.url());
    match resolve(root, request.url()) {
        Some(path) => serve_file(request, &path),
        None => serve_not_found(request),
    }
}

fn serve_file(request: Request, path: &Path) -> Result<()> {
    let content = fs::read(path).with_context(|| format!("reading `{}`", path.display()))?;
    let response = Response::from_data(content).with_header(header(content_type(path))?);
    request.respond(response)?;
    Ok(())
}

fn serve_not_found(request: Request) -> Result<()> {
    let body = "404 Not Found";
    let response = Response::new(
        StatusCode(404),
        vec![header("text/plain; charset=utf-8")?],
        Cursor::new(body),
        Some(body.len()),
        None,
    );
    request.respond(response)?;
    Ok(())
}

fn header(content_type: &str) -> Result<Header> {
    Header::from_bytes("Content-Type", content_type)
        .map_err(|()| anyhow!("invalid content type `{}`", content_type))
}

fn content_type(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some("html") | Some("htm") => "text/html; charset=utf-8",
        Some("css") => "text/css; charset=utf-8",
        Some("js") => "application/javascript; charset=utf-8",
        Some("json") => "application/json; charset=utf-8",
        Some("xml") => "application/xml; charset=utf-8",
        Some("txt") => "text/plain; charset=utf-8",
        Some("svg") => "image/svg+xml",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("ico") => "image/x-icon",
        Some("woff2") => "font/woff2",
        Some("pdf") => "application/pdf",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn site() -> std::io::Result<tempfile::TempDir> {
        let dir = tempfile::tempdir()?;
        fs::create_dir_all(dir.path().join("blog"))?;
        fs::create_dir_all(dir.path().join("tagged/rust"))?;
        fs::create_dir_all(dir.path().join("assets"))?;
        fs::write(dir.path().join("index.html"), "home")?;
        fs::write(dir.path().join("blog.html"), "listing")?;
        fs::write(dir.path().join("blog/hello.html"), "post")?;
        fs::write(dir.path().join("tagged/rust/rust.html"), "tag")?;
        fs::write(dir.path().join("assets/style.css"), "css")?;
        fs::create_dir_all(dir.path().join("images"))?;
        fs::write(dir.path().join("images/my photo.png"), "png")?;
        Ok(dir)
    }

    #[test]
    fn test_resolve() -> std::io::Result<()> {
        let dir = site()?;
        let root = dir.path();
        let cases = [
            ("/", Some("index.html")),
            ("/blog", Some("blog.html")),
            ("/blog/", Some("blog.html")),
            ("/blog/hello", Some("blog/hello.html")),
            ("/blog/hello.html", Some("blog/hello.html")),
            ("/tagged/rust/rust", Some("tagged/rust/rust.html")),
            ("/assets/style.css", Some("assets/style.css")),
            ("/assets/style.css?v=2", Some("assets/style.css")),
            ("/index", Some("index.html")),
            ("/blog/missing", None),
            ("/tagged", None),
            ("/../etc/passwd", None),
            ("/images/my%20photo.png", Some("images/my photo.png")),
            ("/blog/hell%6F", Some("blog/hello.html")),
            ("/%62log", Some("blog.html")),
            ("/images/my photo.png", Some("images/my photo.png")),
            ("/%2E%2E/etc/passwd", None),
            ("/%FF", None),
        ];
        for (url, wanted) in cases.iter() {
            assert_eq!(
                wanted.map(|p| root.join(p)),
                resolve(root, url),
                "resolving `{}`",
                url
            );
        }
        Ok(())
    }

    #[test]
    fn test_resolve_blog_without_listing() -> std::io::Result<()> {
        let dir = site()?;
        fs::remove_file(dir.path().join("blog.html"))?;
        assert_eq!(None, resolve(dir.path(), "/blog"));
        Ok(())
    }

    #[test]
    fn test_content_type() {
        assert_eq!("text/html; charset=utf-8", content_type(Path::new("a/b.html")));
        assert_eq!("text/css; charset=utf-8", content_type(Path::new("style.css")));
        assert_eq!("application/octet-stream", content_type(Path::new("blob")));
    }
}
