//! Static file serving module
//!
//! Maps request paths onto the served root, then answers with the file, a
//! directory index, a generated listing, or an error page.

use crate::handler::listing;
use crate::handler::router::RequestContext;
use crate::http::{self, encoding, mime, RangeParseResult};
use crate::logger;
use chrono::{DateTime, Utc};
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};
use std::fs::Metadata;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tokio::fs;

/// A request path translated onto the filesystem
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPath {
    pub fs_path: PathBuf,
    /// The request path ended with `/`
    pub trailing_slash: bool,
}

/// Translate a raw request path into a filesystem path under `root`
///
/// The path is percent-decoded and normalized; `.`/`..` and empty segments
/// can never climb above `root`.
pub fn translate_path(root: &Path, request_path: &str) -> ResolvedPath {
    // Query and fragment never name files
    let path = request_path
        .split(['?', '#'])
        .next()
        .unwrap_or_default();
    let decoded = encoding::percent_decode(path);
    let trailing_slash = decoded.trim_end().ends_with('/');

    let mut segments: Vec<&str> = Vec::new();
    for segment in decoded.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            // `\` is a separator only on Windows; elsewhere it is part of a name
            s if cfg!(windows) && s.contains('\\') => {}
            s => segments.push(s),
        }
    }

    let mut fs_path = root.to_path_buf();
    fs_path.extend(segments);

    ResolvedPath {
        fs_path,
        trailing_slash,
    }
}

/// Serve whatever `ctx.path` resolves to under `root`
pub async fn serve_path(
    ctx: &RequestContext<'_>,
    root: &Path,
    index_files: &[String],
) -> Response<Full<Bytes>> {
    let resolved = translate_path(root, ctx.path);

    let Ok(metadata) = fs::metadata(&resolved.fs_path).await else {
        return not_found(ctx, "File not found");
    };

    if metadata.is_dir() {
        if !resolved.trailing_slash {
            return http::build_redirect_response(&directory_location(ctx));
        }
        if let Some((index, index_meta)) = find_index_file(&resolved.fs_path, index_files).await {
            return serve_file(ctx, &index, &index_meta).await;
        }
        return serve_listing(ctx, &resolved.fs_path).await;
    }

    if resolved.trailing_slash {
        return not_found(ctx, "File not found");
    }

    serve_file(ctx, &resolved.fs_path, &metadata).await
}

/// Serve a single file, honoring a `Range` header
///
/// `metadata` is the stat already taken for `path`. HEAD requests and
/// unsatisfiable ranges are answered from it without reading the file.
pub async fn serve_file(
    ctx: &RequestContext<'_>,
    path: &Path,
    metadata: &Metadata,
) -> Response<Full<Bytes>> {
    let content_type = mime::guess_content_type(path);
    let last_modified = metadata.modified().ok().map(http_date);
    let size = metadata.len();

    let range = http::parse_range_header(ctx.range_header, size);
    if range == RangeParseResult::NotSatisfiable {
        return http::build_416_response(size);
    }

    if ctx.is_head {
        // Open failures are still reported as 404, as for GET
        if let Err(e) = fs::File::open(path).await {
            logger::log_debug(&format!("Failed to open '{}': {e}", path.display()));
            return not_found(ctx, "File not found");
        }
        return match range {
            RangeParseResult::Valid(range) => http::build_partial_response(
                Bytes::new(),
                content_type,
                last_modified.as_deref(),
                range,
                size,
                true,
            ),
            _ => http::build_file_response(
                Bytes::new(),
                size,
                content_type,
                last_modified.as_deref(),
                true,
            ),
        };
    }

    let data = match fs::read(path).await {
        Ok(d) => Bytes::from(d),
        Err(e) => {
            logger::log_debug(&format!("Failed to read '{}': {e}", path.display()));
            return not_found(ctx, "File not found");
        }
    };

    // The file may have changed since the stat; ranges follow what was read
    let total_size = u64::try_from(data.len()).unwrap_or(u64::MAX);
    match http::parse_range_header(ctx.range_header, total_size) {
        RangeParseResult::Valid(range) => {
            let start = usize::try_from(range.start).unwrap_or(usize::MAX);
            let end = usize::try_from(range.end).unwrap_or(usize::MAX);
            let body = data.slice(start..=end);
            http::build_partial_response(
                body,
                content_type,
                last_modified.as_deref(),
                range,
                total_size,
                false,
            )
        }
        RangeParseResult::NotSatisfiable => http::build_416_response(total_size),
        RangeParseResult::None => http::build_file_response(
            data,
            total_size,
            content_type,
            last_modified.as_deref(),
            false,
        ),
    }
}

async fn serve_listing(ctx: &RequestContext<'_>, dir: &Path) -> Response<Full<Bytes>> {
    let display_path = encoding::percent_decode(ctx.path);
    match listing::render_listing(dir, &display_path).await {
        Ok(html) => http::build_listing_response(html, ctx.is_head),
        Err(e) => {
            logger::log_warning(&format!("Cannot list '{}': {e}", dir.display()));
            not_found(ctx, "No permission to list directory")
        }
    }
}

/// First configured index file that exists as a regular file
async fn find_index_file(dir: &Path, index_files: &[String]) -> Option<(PathBuf, Metadata)> {
    for name in index_files {
        let candidate = dir.join(name);
        if let Ok(meta) = fs::metadata(&candidate).await {
            if meta.is_file() {
                return Some((candidate, meta));
            }
        }
    }
    None
}

/// Same URL with `/` appended to the path, query preserved
fn directory_location(ctx: &RequestContext<'_>) -> String {
    match ctx.query {
        Some(q) => format!("{}/?{q}", ctx.path),
        None => format!("{}/", ctx.path),
    }
}

fn not_found(ctx: &RequestContext<'_>, message: &str) -> Response<Full<Bytes>> {
    http::build_error_response(StatusCode::NOT_FOUND, Some(message), ctx.is_head)
}

/// RFC 7231 IMF-fixdate, e.g. `Sun, 06 Nov 1994 08:49:37 GMT`
pub fn http_date(time: SystemTime) -> String {
    DateTime::<Utc>::from(time)
        .format("%a, %d %b %Y %H:%M:%S GMT")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use hyper::body::Body;
    use std::time::Duration;

    fn ctx<'a>(path: &'a str, range: Option<&'a str>) -> RequestContext<'a> {
        RequestContext {
            path,
            query: None,
            is_head: false,
            range_header: range,
        }
    }

    fn index_files() -> Vec<String> {
        vec!["index.html".to_string(), "index.htm".to_string()]
    }

    fn header<'a>(resp: &'a Response<Full<Bytes>>, name: &str) -> Option<&'a str> {
        resp.headers().get(name).and_then(|v| v.to_str().ok())
    }

    #[test]
    fn test_translate_simple() {
        let root = Path::new("/srv");
        let r = translate_path(root, "/roms/pong.ch8");
        assert_eq!(r.fs_path, PathBuf::from("/srv/roms/pong.ch8"));
        assert!(!r.trailing_slash);
    }

    #[test]
    fn test_translate_traversal_is_clamped() {
        let root = Path::new("/srv");
        assert_eq!(
            translate_path(root, "/../../etc/passwd").fs_path,
            PathBuf::from("/srv/etc/passwd")
        );
        assert_eq!(
            translate_path(root, "/a/%2e%2e/%2E%2E/b").fs_path,
            PathBuf::from("/srv/b")
        );
    }

    #[test]
    fn test_translate_decodes_and_keeps_trailing_slash() {
        let root = Path::new("/srv");
        let r = translate_path(root, "/my%20dir/?x=1");
        assert_eq!(r.fs_path, PathBuf::from("/srv/my dir"));
        assert!(r.trailing_slash);

        let r = translate_path(root, "/");
        assert_eq!(r.fs_path, PathBuf::from("/srv"));
        assert!(r.trailing_slash);
    }

    #[cfg(not(windows))]
    #[test]
    fn test_translate_keeps_backslash_in_names() {
        let root = Path::new("/srv");
        assert_eq!(
            translate_path(root, "/a%5Cb.txt").fs_path,
            PathBuf::from("/srv/a\\b.txt")
        );
    }

    #[test]
    fn test_http_date() {
        let t = SystemTime::UNIX_EPOCH + Duration::from_secs(784_111_777);
        assert_eq!(http_date(t), "Sun, 06 Nov 1994 08:49:37 GMT");
    }

    #[tokio::test]
    async fn test_serve_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("hello.txt"), "hello world").unwrap();

        let resp = serve_path(&ctx("/hello.txt", None), dir.path(), &index_files()).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(header(&resp, "content-length"), Some("11"));
        assert!(header(&resp, "last-modified").is_some());
        assert!(header(&resp, "etag").is_none());
    }

    #[tokio::test]
    async fn test_range_request() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("data.bin"), b"0123456789").unwrap();

        let resp = serve_path(&ctx("/data.bin", Some("bytes=2-5")), dir.path(), &index_files()).await;
        assert_eq!(resp.status(), StatusCode::PARTIAL_CONTENT);
        assert_eq!(header(&resp, "content-range"), Some("bytes 2-5/10"));
        assert_eq!(resp.body().size_hint().exact(), Some(4));

        let resp = serve_path(&ctx("/data.bin", Some("bytes=50-")), dir.path(), &index_files()).await;
        assert_eq!(resp.status(), StatusCode::RANGE_NOT_SATISFIABLE);
    }

    #[tokio::test]
    async fn test_head_answers_from_metadata() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("data.bin"), b"0123456789").unwrap();

        let mut c = ctx("/data.bin", None);
        c.is_head = true;
        let resp = serve_path(&c, dir.path(), &index_files()).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(header(&resp, "content-length"), Some("10"));
        assert!(header(&resp, "last-modified").is_some());
        assert_eq!(resp.body().size_hint().exact(), Some(0));

        c.range_header = Some("bytes=-3");
        let resp = serve_path(&c, dir.path(), &index_files()).await;
        assert_eq!(resp.status(), StatusCode::PARTIAL_CONTENT);
        assert_eq!(header(&resp, "content-range"), Some("bytes 7-9/10"));
        assert_eq!(header(&resp, "content-length"), Some("3"));
        assert_eq!(resp.body().size_hint().exact(), Some(0));

        c.range_header = Some("bytes=10-");
        let resp = serve_path(&c, dir.path(), &index_files()).await;
        assert_eq!(resp.status(), StatusCode::RANGE_NOT_SATISFIABLE);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_unsatisfiable_range_skips_read() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("locked.bin");
        std::fs::write(&file, b"0123456789").unwrap();
        std::fs::set_permissions(&file, std::fs::Permissions::from_mode(0o000)).unwrap();

        // Answered from the stat alone, even though the file cannot be read
        let resp = serve_path(&ctx("/locked.bin", Some("bytes=50-")), dir.path(), &index_files()).await;
        assert_eq!(resp.status(), StatusCode::RANGE_NOT_SATISFIABLE);
        assert_eq!(header(&resp, "content-range"), Some("bytes */10"));

        std::fs::set_permissions(&file, std::fs::Permissions::from_mode(0o644)).unwrap();
    }

    #[tokio::test]
    async fn test_directory_redirect() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("docs")).unwrap();

        let mut c = ctx("/docs", None);
        c.query = Some("a=1");
        let resp = serve_path(&c, dir.path(), &index_files()).await;
        assert_eq!(resp.status(), StatusCode::MOVED_PERMANENTLY);
        assert_eq!(header(&resp, "location"), Some("/docs/?a=1"));
    }

    #[tokio::test]
    async fn test_directory_index_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.htm"), "<p>home</p>").unwrap();

        let resp = serve_path(&ctx("/", None), dir.path(), &index_files()).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(header(&resp, "content-type"), Some("text/html; charset=utf-8"));
        assert_eq!(header(&resp, "content-length"), Some("11"));
    }

    #[tokio::test]
    async fn test_directory_listing_without_index() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.txt"), "a").unwrap();

        let resp = serve_path(&ctx("/", None), dir.path(), &index_files()).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(header(&resp, "accept-ranges").is_none());
    }

    #[tokio::test]
    async fn test_file_with_trailing_slash_is_404() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.txt"), "a").unwrap();

        let resp = serve_path(&ctx("/a.txt/", None), dir.path(), &index_files()).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_missing_file_is_404() {
        let dir = tempfile::tempdir().unwrap();
        let resp = serve_path(&ctx("/missing.png", None), dir.path(), &index_files()).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
