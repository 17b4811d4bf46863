//! CSS `url(...)` rewriting
//!
//! Matching is textual: every substring matching `url(...)` is processed
//! independently. Nested or malformed CSS is not specially handled.

use lazy_static::lazy_static;
use regex::{Captures, Regex};
use reqwest::blocking::Client;
use std::path::Path;

use crate::config::InlineOptions;
use crate::fetch::{self, is_remote};
use crate::report::{AssetKind, InlineReport};

lazy_static! {
    static ref CSS_URL: Regex = Regex::new(r"(?i)url\(([^)]+)\)")
        .expect("BUG: hardcoded CSS url() pattern is invalid");
}

/// Rewrite every `url(...)` occurrence in a stylesheet to a data URI.
///
/// `css_dir` is the directory containing the stylesheet itself; bare
/// relative targets resolve against it before being re-expressed relative
/// to the base directory. Targets that cannot be fetched keep their
/// original `url(...)` text.
pub fn rewrite_css_urls(
    css: &str,
    css_dir: &Path,
    options: &InlineOptions,
    client: &Client,
    report: &mut InlineReport,
) -> String {
    CSS_URL
        .replace_all(css, |caps: &Captures<'_>| {
            let original = caps[0].to_string();
            let raw = caps[1].trim().trim_matches('"').trim_matches('\'');

            if raw.starts_with("data:") {
                return original;
            }

            // Absolute HTTP(S) targets are fetched directly.
            if is_remote(raw) {
                return match fetch::as_data_uri(raw, options, client) {
                    Some(data) => {
                        report.success();
                        format!("url('{data}')")
                    }
                    None => {
                        log::warn!("Could not inline remote CSS url({raw})");
                        report.failure(raw, AssetKind::CssUrl, "remote fetch failed");
                        original
                    }
                };
            }

            let location = resolve_target(raw, css_dir, options);
            match fetch::as_data_uri(&location, options, client) {
                Some(data) => {
                    report.success();
                    format!("url('{data}')")
                }
                None => {
                    log::warn!("Could not inline CSS url({raw})");
                    report.failure(raw, AssetKind::CssUrl, "asset missing or unreadable");
                    original
                }
            }
        })
        .into_owned()
}

/// Resolve a non-remote `url(...)` target to a fetchable location.
///
/// A leading `/` means base-directory-relative. Anything else resolves
/// against the stylesheet's directory, then is re-expressed relative to
/// the base directory when it lies inside it; otherwise the resolved form
/// is used as-is.
fn resolve_target(raw: &str, css_dir: &Path, options: &InlineOptions) -> String {
    if let Some(stripped) = raw.strip_prefix('/') {
        return stripped.trim_start_matches('/').to_string();
    }

    let resolved = css_dir.join(raw);
    let local = resolved
        .strip_prefix(&options.base_dir)
        .unwrap_or(&resolved);

    local.to_string_lossy().replace('\\', "/")
}
