//! Extension → media type / content encoding table.

use std::collections::HashMap;
use std::path::Path;

use once_cell::sync::Lazy;

/// Fallback for unknown extensions.
pub const DEFAULT_MEDIA_TYPE: &str = "application/octet-stream";

static MEDIA_TYPES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        // Text
        ("html", "text/html"),
        ("htm", "text/html"),
        ("css", "text/css"),
        ("js", "text/javascript"),
        ("mjs", "text/javascript"),
        ("txt", "text/plain"),
        ("text", "text/plain"),
        ("csv", "text/csv"),
        ("md", "text/markdown"),
        ("xml", "text/xml"),
        ("ics", "text/calendar"),
        // Application
        ("json", "application/json"),
        ("map", "application/json"),
        ("webmanifest", "application/manifest+json"),
        ("wasm", "application/wasm"),
        ("pdf", "application/pdf"),
        ("zip", "application/zip"),
        ("tar", "application/x-tar"),
        ("rtf", "application/rtf"),
        ("xhtml", "application/xhtml+xml"),
        // Images
        ("png", "image/png"),
        ("jpg", "image/jpeg"),
        ("jpeg", "image/jpeg"),
        ("gif", "image/gif"),
        ("webp", "image/webp"),
        ("avif", "image/avif"),
        ("svg", "image/svg+xml"),
        ("ico", "image/vnd.microsoft.icon"),
        ("bmp", "image/bmp"),
        ("tif", "image/tiff"),
        ("tiff", "image/tiff"),
        // Fonts
        ("woff", "font/woff"),
        ("woff2", "font/woff2"),
        ("ttf", "font/ttf"),
        ("otf", "font/otf"),
        // Audio
        ("mp3", "audio/mpeg"),
        ("wav", "audio/x-wav"),
        ("ogg", "audio/ogg"),
        ("flac", "audio/flac"),
        ("aac", "audio/aac"),
        ("m4a", "audio/mp4"),
        // Video
        ("mp4", "video/mp4"),
        ("webm", "video/webm"),
        ("mov", "video/quicktime"),
        ("avi", "video/x-msvideo"),
    ])
});

/// Extensions that imply a content encoding on top of the inner type.
static ENCODINGS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("gz", "gzip"),
        ("br", "br"),
        ("bz2", "bzip2"),
        ("xz", "xz"),
        ("Z", "compress"),
    ])
});

/// Shorthand extensions expanded before lookup.
static SUFFIXES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("tgz", ".tar.gz"),
        ("taz", ".tar.gz"),
        ("tz", ".tar.gz"),
        ("tbz2", ".tar.bz2"),
        ("txz", ".tar.xz"),
        ("svgz", ".svg.gz"),
    ])
});

/// Media type and optional content encoding guessed from a file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Guess {
    pub media_type: Option<&'static str>,
    pub encoding: Option<&'static str>,
}

impl Guess {
    pub fn media_type_or_default(&self) -> &'static str {
        self.media_type.unwrap_or(DEFAULT_MEDIA_TYPE)
    }
}

/// Guess from the final path component's extensions.
pub fn guess(path: &Path) -> Guess {
    let mut name = match path.file_name().and_then(|n| n.to_str()) {
        Some(name) => name.to_owned(),
        None => {
            return Guess {
                media_type: None,
                encoding: None,
            }
        }
    };

    if let Some((stem, ext)) = split_extension(&name) {
        if let Some(expanded) = SUFFIXES.get(ext.to_ascii_lowercase().as_str()) {
            name = format!("{stem}{expanded}");
        }
    }

    let mut encoding = None;
    if let Some((stem, ext)) = split_extension(&name) {
        let found = ENCODINGS
            .get(ext)
            .or_else(|| ENCODINGS.get(ext.to_ascii_lowercase().as_str()))
            .copied();
        if found.is_some() {
            encoding = found;
            name = stem.to_owned();
        }
    }

    let media_type = split_extension(&name)
        .and_then(|(_, ext)| MEDIA_TYPES.get(ext.to_ascii_lowercase().as_str()).copied());

    Guess {
        media_type,
        encoding,
    }
}

/// `("archive.tar", "gz")` for `"archive.tar.gz"`. Dotfiles have no extension.
fn split_extension(name: &str) -> Option<(&str, &str)> {
    name.rsplit_once('.')
        .filter(|(stem, ext)| !stem.is_empty() && !ext.is_empty())
}
