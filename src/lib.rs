//! Bundle an HTML document and its referenced assets into a single
//! self-contained file.
//!
//! The whole tool is one linear transformation: parse the document, locate
//! stylesheet/script/media/icon references, fetch or read each asset, and
//! re-embed it inline as `<style>`/`<script>` content or a `data:` URI.
//! Per-asset failures never abort a run; the original reference is left
//! unchanged and the failure is recorded in the returned [`InlineReport`].

pub mod config;
pub mod constants;
pub mod encode;
pub mod fetch;
pub mod report;
pub mod rewrite;
pub mod transform;

pub use config::InlineOptions;
pub use report::{AssetKind, InlineFailure, InlineReport};
pub use transform::fallback::RegexTransformer;
pub use transform::{DocumentTransform, TransformContext, default_transformer};

#[cfg(feature = "dom")]
pub use transform::dom::DomTransformer;

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Fatal errors for one inlining run.
///
/// Per-asset fetch failures are not errors; they are downgraded to
/// warnings and collected in the [`InlineReport`].
#[derive(Debug, Error)]
pub enum InlineError {
    #[error("input file not found: {}", .0.display())]
    InputMissing(PathBuf),

    #[error("failed to read input {}: {source}", .path.display())]
    ReadInput {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write output {}: {source}", .path.display())]
    WriteOutput {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("transform failed: {0}")]
    Transform(#[from] anyhow::Error),
}

/// Inline every reference in an HTML document, in memory.
///
/// Uses the strongest transformation strategy the crate was built with.
pub fn inline_document(
    html: &str,
    options: &InlineOptions,
) -> Result<(String, InlineReport), InlineError> {
    let transformer = default_transformer();
    log::info!("Using {} transformer", transformer.name());

    let ctx = TransformContext::new(options)?;
    let mut report = InlineReport::default();
    let output = transformer.transform(html, &ctx, &mut report)?;

    Ok((output, report))
}

/// Read `input`, inline every reference, and write the result to
/// `output`, creating parent directories as needed.
pub fn inline_file(
    input: &Path,
    output: &Path,
    options: &InlineOptions,
) -> Result<InlineReport, InlineError> {
    if !input.exists() {
        return Err(InlineError::InputMissing(input.to_path_buf()));
    }

    let html = std::fs::read_to_string(input).map_err(|source| InlineError::ReadInput {
        path: input.to_path_buf(),
        source,
    })?;

    let (result, report) = inline_document(&html, options)?;

    if let Some(parent) = output.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|source| InlineError::WriteOutput {
            path: output.to_path_buf(),
            source,
        })?;
    }
    std::fs::write(output, result).map_err(|source| InlineError::WriteOutput {
        path: output.to_path_buf(),
        source,
    })?;

    Ok(report)
}
