//! Asset resolution
//!
//! Resolves a reference location to raw bytes: data URIs are left alone,
//! HTTP(S) URLs are fetched over the network, everything else is read from
//! the filesystem relative to the base directory. Failures are logged and
//! reported as absence, never raised to the caller; each asset gets exactly
//! one attempt.

use reqwest::blocking::Client;

use crate::config::InlineOptions;
use crate::encode;

/// Check whether a location is an absolute HTTP(S) URL.
#[must_use]
pub fn is_remote(location: &str) -> bool {
    location.starts_with("http://") || location.starts_with("https://")
}

/// Check whether a location is already an inline data URI.
#[must_use]
pub fn is_data_uri(location: &str) -> bool {
    location.trim_start().starts_with("data:")
}

/// Build the blocking HTTP client shared by every remote fetch in a run.
pub fn build_client(options: &InlineOptions) -> reqwest::Result<Client> {
    Client::builder()
        .user_agent(&options.user_agent)
        .timeout(options.http_timeout)
        .build()
}

/// Resolve a reference location to raw bytes.
///
/// Returns `None` when there is nothing to fetch: the location is already
/// a data URI, the remote fetch failed, or the local file is missing or
/// unreadable.
pub fn read_asset_bytes(
    location: &str,
    options: &InlineOptions,
    client: &Client,
) -> Option<Vec<u8>> {
    let location = location.trim();

    if is_data_uri(location) {
        // Already inlined
        return None;
    }

    if is_remote(location) {
        return fetch_remote(location, client);
    }

    let path = options.base_dir.join(location);
    if !path.exists() {
        log::warn!("Local asset not found: {}", path.display());
        return None;
    }

    match std::fs::read(&path) {
        Ok(bytes) => Some(bytes),
        Err(e) => {
            log::warn!("Failed to read {}: {e}", path.display());
            None
        }
    }
}

/// Fetch a location and encode it as a data URI.
///
/// `None` carries the same meaning as in [`read_asset_bytes`].
pub fn as_data_uri(location: &str, options: &InlineOptions, client: &Client) -> Option<String> {
    let bytes = read_asset_bytes(location, options, client)?;
    Some(encode::to_data_uri(&bytes, location))
}

fn fetch_remote(url: &str, client: &Client) -> Option<Vec<u8>> {
    let response = match client.get(url).send() {
        Ok(response) => response,
        Err(e) => {
            log::warn!("Failed to fetch remote asset {url}: {e}");
            return None;
        }
    };

    if !response.status().is_success() {
        log::warn!(
            "Failed to fetch remote asset {url}: status {}",
            response.status()
        );
        return None;
    }

    match response.bytes() {
        Ok(bytes) => Some(bytes.to_vec()),
        Err(e) => {
            log::warn!("Failed to read remote asset {url}: {e}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn options_in(dir: &std::path::Path) -> InlineOptions {
        InlineOptions::with_base_dir(dir)
    }

    #[test]
    fn data_uris_are_never_fetched() {
        let temp = tempfile::tempdir().expect("tempdir");
        let options = options_in(temp.path());
        let client = build_client(&options).expect("client");

        assert!(read_asset_bytes("data:image/png;base64,AAAA", &options, &client).is_none());
    }

    #[test]
    fn local_files_resolve_against_the_base_dir() {
        let temp = tempfile::tempdir().expect("tempdir");
        fs::create_dir(temp.path().join("css")).expect("mkdir");
        fs::write(temp.path().join("css/site.css"), b"body {}").expect("write");

        let options = options_in(temp.path());
        let client = build_client(&options).expect("client");

        let bytes = read_asset_bytes("css/site.css", &options, &client).expect("bytes");
        assert_eq!(bytes, b"body {}");
    }

    #[test]
    fn missing_local_files_signal_absence() {
        let temp = tempfile::tempdir().expect("tempdir");
        let options = options_in(temp.path());
        let client = build_client(&options).expect("client");

        assert!(read_asset_bytes("nope/missing.png", &options, &client).is_none());
    }

    #[test]
    fn as_data_uri_composes_fetch_and_encode() {
        let temp = tempfile::tempdir().expect("tempdir");
        fs::write(temp.path().join("note.txt"), b"hi").expect("write");

        let options = options_in(temp.path());
        let client = build_client(&options).expect("client");

        let uri = as_data_uri("note.txt", &options, &client).expect("uri");
        assert_eq!(uri, "data:text/plain;base64,aGk=");
    }
}
