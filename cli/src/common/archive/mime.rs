//! # MIME Type Lookup (`common::archive::mime`)
//!
//! File: cli/src/common/archive/mime.rs
//!
//! Static extension table used to label extracted files.

/// MIME type given to produced archives.
pub const SEVEN_Z_MIME: &str = "application/x-7z-compressed";

/// Fallback for unrecognized extensions.
pub const OCTET_STREAM: &str = "application/octet-stream";

const MIME_TYPES: &[(&str, &str)] = &[
    ("txt", "text/plain"),
    ("json", "application/json"),
    ("xml", "application/xml"),
    ("html", "text/html"),
    ("css", "text/css"),
    ("js", "application/javascript"),
    ("pdf", "application/pdf"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("png", "image/png"),
    ("gif", "image/gif"),
    ("zip", "application/zip"),
    ("7z", SEVEN_Z_MIME),
];

/// Looks up the MIME type for `file_name` by its lower-cased extension.
pub fn mime_type_for(file_name: &str) -> &'static str {
    let extension = match file_name.rsplit_once('.') {
        Some((_, ext)) => ext.to_ascii_lowercase(),
        None => return OCTET_STREAM,
    };
    MIME_TYPES
        .iter()
        .find(|(ext, _)| *ext == extension)
        .map(|(_, mime)| *mime)
        .unwrap_or(OCTET_STREAM)
}
