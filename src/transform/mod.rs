//! Document transformation strategies
//!
//! Two interchangeable strategies implement the same substitution passes:
//! a structural DOM strategy (feature `dom`, default) and a regex fallback
//! with looser matching. [`default_transformer`] picks the strongest
//! strategy the crate was built with; the fallback's reduced coverage is
//! documented on [`fallback::RegexTransformer`].

#[cfg(feature = "dom")]
pub mod apply;
#[cfg(feature = "dom")]
pub mod dom;
#[cfg(feature = "dom")]
pub mod extract;
pub mod fallback;

use anyhow::{Context, Result};
use reqwest::blocking::Client;

use crate::config::InlineOptions;
use crate::report::InlineReport;

/// Shared state for one transformation run.
pub struct TransformContext<'a> {
    pub options: &'a InlineOptions,
    pub client: Client,
}

impl<'a> TransformContext<'a> {
    /// Build the run context, including the HTTP client used for every
    /// remote fetch.
    pub fn new(options: &'a InlineOptions) -> Result<Self> {
        let client = crate::fetch::build_client(options).context("Failed to build HTTP client")?;
        Ok(Self { options, client })
    }
}

/// A document transformation strategy.
///
/// Implementations perform the substitution passes in a fixed order:
/// stylesheets, then scripts, then generic `src`-bearing tags, then icon
/// links. A single forward pass; no backtracking, no retries.
pub trait DocumentTransform {
    /// Strategy name for diagnostics.
    fn name(&self) -> &'static str;

    /// Run the substitution passes and return the serialized document.
    fn transform(
        &self,
        html: &str,
        ctx: &TransformContext<'_>,
        report: &mut InlineReport,
    ) -> Result<String>;
}

/// Select the strongest strategy available in this build.
#[must_use]
pub fn default_transformer() -> Box<dyn DocumentTransform> {
    #[cfg(feature = "dom")]
    {
        Box::new(dom::DomTransformer)
    }
    #[cfg(not(feature = "dom"))]
    {
        Box::new(fallback::RegexTransformer)
    }
}
