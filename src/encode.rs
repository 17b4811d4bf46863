//! Data-URI encoding and media type inference

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use std::path::Path;
use url::Url;

use crate::constants::FALLBACK_MEDIA_TYPE;
use crate::fetch::is_remote;

/// Guess a media type from a location's file extension.
///
/// Covers the web asset types the tool handles; anything else falls back
/// to `application/octet-stream`.
#[must_use]
pub fn media_type_for(location: &str) -> &'static str {
    let Some(ext) = extension_of(location) else {
        return FALLBACK_MEDIA_TYPE;
    };

    match ext.as_str() {
        "css" => "text/css",
        "js" | "mjs" => "text/javascript",
        "html" | "htm" => "text/html",
        "json" => "application/json",
        "xml" => "application/xml",
        "txt" => "text/plain",
        "svg" => "image/svg+xml",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "avif" => "image/avif",
        "bmp" => "image/bmp",
        "ico" => "image/vnd.microsoft.icon",
        "woff" => "font/woff",
        "woff2" => "font/woff2",
        "ttf" => "font/ttf",
        "otf" => "font/otf",
        "eot" => "application/vnd.ms-fontobject",
        "mp3" => "audio/mpeg",
        "ogg" => "audio/ogg",
        "wav" => "audio/wav",
        "flac" => "audio/flac",
        "mp4" => "video/mp4",
        "webm" => "video/webm",
        "vtt" => "text/vtt",
        _ => FALLBACK_MEDIA_TYPE,
    }
}

/// Extract the lowercased file extension from a location.
///
/// Remote URLs are parsed so query strings and fragments never leak into
/// the extension; local paths get the same treatment textually.
fn extension_of(location: &str) -> Option<String> {
    let path = if is_remote(location) {
        Url::parse(location).ok()?.path().to_string()
    } else {
        location
            .split(['?', '#'])
            .next()
            .unwrap_or(location)
            .to_string()
    };

    Path::new(&path)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
}

/// Encode bytes as a `data:<mime>;base64,<payload>` URI.
///
/// The media type is inferred from `location`. Encoding is always
/// standard-alphabet base64; no compression or size limits are applied.
#[must_use]
pub fn to_data_uri(bytes: &[u8], location: &str) -> String {
    let media_type = media_type_for(location);

    // Pre-size the output: "data:" + mime + ";base64," + payload.
    let encoded_capacity = base64::encoded_len(bytes.len(), true).unwrap_or(0);
    let mut out = String::with_capacity(encoded_capacity + media_type.len() + 13);

    out.push_str("data:");
    out.push_str(media_type);
    out.push_str(";base64,");
    STANDARD.encode_string(bytes, &mut out);

    out
}
