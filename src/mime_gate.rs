use thiserror::Error;

/// MIME types the tool is willing to send to the model.
///
/// Aliases for the same real-world format are listed side by side; lookup is
/// exact and case-sensitive.
pub const ALLOWED_MIME_TYPES: &[&str] = &[
    // Documents & text
    "application/pdf",
    "text/plain",
    // Code & markup
    "text/x-python",
    "text/javascript",
    "application/json",
    "text/html",
    "text/css",
    "text/xml",
    "application/xml",
    "text/markdown",
    "text/md",
    "text/x-markdown",
    "text/csv",
    // Images
    "image/png",
    "image/jpeg",
    "image/webp",
    "image/heic",
    "image/heif",
    // Video
    "video/mp4",
    "video/mpeg",
    "video/mov",
    "video/quicktime",
    "video/avi",
    "video/x-msvideo",
    "video/x-flv",
    "video/mpg",
    "video/webm",
    "video/wmv",
    "video/x-ms-wmv",
    "video/3gpp",
    // Audio
    "audio/wav",
    "audio/x-wav",
    "audio/mp3",
    "audio/mpeg",
    "audio/aiff",
    "audio/x-aiff",
    "audio/aac",
    "audio/ogg",
    "audio/flac",
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported file type: {0}. Supported categories: Documents, Code, Images, Video, Audio")]
pub struct UnsupportedType(pub String);

/// Drops `; key=value` parameters and surrounding whitespace.
pub fn base_mime_type(mime_type: &str) -> &str {
    mime_type.split(';').next().unwrap_or_default().trim()
}

pub fn is_allowed(mime_type: &str) -> Result<(), UnsupportedType> {
    let base = base_mime_type(mime_type);
    if ALLOWED_MIME_TYPES.contains(&base) {
        Ok(())
    } else {
        Err(UnsupportedType(mime_type.to_string()))
    }
}

/// Text-like payloads are sent to the model inline rather than as a blob.
pub fn is_textual(mime_type: &str) -> bool {
    let base = base_mime_type(mime_type);
    base.starts_with("text/") || base == "application/json" || base.contains("xml")
}
