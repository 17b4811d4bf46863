//! Shared configuration constants for htmlfuse
//!
//! This module contains default values used throughout the codebase to
//! ensure consistency and avoid magic numbers.

/// User agent sent with every remote asset fetch
///
/// Identifies the tool to servers so inlining traffic can be
/// distinguished from browser traffic in access logs.
pub const USER_AGENT: &str = concat!("htmlfuse/", env!("CARGO_PKG_VERSION"));

/// Default HTTP request timeout for remote assets: 30 seconds
///
/// Applied to the whole request (connect plus body). Remote stylesheets
/// and images are usually well under a megabyte; anything slower than
/// this is better left as an external reference.
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Default output path, relative to the working directory
pub const DEFAULT_OUTPUT: &str = "dist/single.html";

/// Media type used when a location's extension is unknown
pub const FALLBACK_MEDIA_TYPE: &str = "application/octet-stream";
