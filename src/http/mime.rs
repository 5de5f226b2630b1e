//! MIME type detection module
//!
//! Returns the corresponding Content-Type based on file extension.

use std::path::Path;

/// Fallback for unknown or missing extensions
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Guess the Content-Type of a file from its extension (case-insensitive)
///
/// # Examples
/// ```
/// use std::path::Path;
/// use cors_serve::http::mime::guess_content_type;
/// assert_eq!(guess_content_type(Path::new("index.HTML")), "text/html; charset=utf-8");
/// assert_eq!(guess_content_type(Path::new("game.wasm")), "application/wasm");
/// assert_eq!(guess_content_type(Path::new("README")), "application/octet-stream");
/// ```
pub fn guess_content_type(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    content_type_for_extension(ext.as_deref())
}

/// Get MIME Content-Type for an already lower-cased extension
pub fn content_type_for_extension(extension: Option<&str>) -> &'static str {
    match extension {
        // Text
        Some("html" | "htm") => "text/html; charset=utf-8",
        Some("css") => "text/css",
        Some("txt" | "md" | "log") => "text/plain; charset=utf-8",
        Some("csv") => "text/csv",
        Some("xml") => "application/xml",

        // Scripts and data
        Some("js" | "mjs") => "text/javascript",
        Some("json" | "map") => "application/json",
        Some("wasm") => "application/wasm",

        // Images
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        Some("ico") => "image/vnd.microsoft.icon",
        Some("webp") => "image/webp",
        Some("avif") => "image/avif",
        Some("bmp") => "image/bmp",

        // Video
        Some("mp4") => "video/mp4",
        Some("webm") => "video/webm",
        Some("ogv") => "video/ogg",
        Some("mov") => "video/quicktime",

        // Audio
        Some("mp3") => "audio/mpeg",
        Some("wav") => "audio/wav",
        Some("ogg" | "oga") => "audio/ogg",
        Some("flac") => "audio/flac",

        // Fonts
        Some("woff") => "font/woff",
        Some("woff2") => "font/woff2",
        Some("ttf") => "font/ttf",
        Some("otf") => "font/otf",

        // Archives and binaries
        Some("pdf") => "application/pdf",
        Some("zip") => "application/zip",
        Some("gz") => "application/gzip",
        Some("tar") => "application/x-tar",

        _ => DEFAULT_CONTENT_TYPE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_common_types() {
        assert_eq!(guess_content_type(Path::new("a.html")), "text/html; charset=utf-8");
        assert_eq!(guess_content_type(Path::new("a.css")), "text/css");
        assert_eq!(guess_content_type(Path::new("a.js")), "text/javascript");
        assert_eq!(guess_content_type(Path::new("a.json")), "application/json");
        assert_eq!(guess_content_type(Path::new("a.png")), "image/png");
        assert_eq!(guess_content_type(Path::new("dir/b.wasm")), "application/wasm");
    }

    #[test]
    fn test_extension_case_insensitive() {
        assert_eq!(guess_content_type(Path::new("LOGO.PNG")), "image/png");
    }

    #[test]
    fn test_unknown_extension() {
        assert_eq!(guess_content_type(Path::new("a.xyz")), DEFAULT_CONTENT_TYPE);
        assert_eq!(guess_content_type(Path::new("Makefile")), DEFAULT_CONTENT_TYPE);
        assert_eq!(content_type_for_extension(None), DEFAULT_CONTENT_TYPE);
    }
}
