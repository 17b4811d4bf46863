//! Structural DOM transformation strategy

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use super::apply::{self, Replacements, ScriptBlock, StyleBlock};
use super::extract;
use super::{DocumentTransform, TransformContext};
use crate::fetch;
use crate::report::{AssetKind, InlineReport};
use crate::rewrite;

/// Transformation over a parsed tag tree.
///
/// References are extracted in one synchronous pass, resolved one at a
/// time, then all replacements are applied in a single parse/serialize
/// cycle.
pub struct DomTransformer;

impl DocumentTransform for DomTransformer {
    fn name(&self) -> &'static str {
        "dom"
    }

    fn transform(
        &self,
        html: &str,
        ctx: &TransformContext<'_>,
        report: &mut InlineReport,
    ) -> Result<String> {
        let refs = extract::extract_references(html);
        let mut replacements = Replacements::default();

        // Pass order is fixed: stylesheets, scripts, generic src tags,
        // icon links.
        for stylesheet in &refs.stylesheets {
            log::info!("Inlining CSS: {}", stylesheet.href);
            let Some(bytes) = fetch::read_asset_bytes(&stylesheet.href, ctx.options, &ctx.client)
            else {
                report.failure(&stylesheet.href, AssetKind::Stylesheet, "fetch failed");
                continue;
            };
            let css = String::from_utf8(bytes).context("Stylesheet content is not valid UTF-8")?;
            let css_dir = stylesheet_dir(&stylesheet.href, ctx.options.base_dir.as_path());
            let css =
                rewrite::rewrite_css_urls(&css, &css_dir, ctx.options, &ctx.client, report);

            report.success();
            replacements.styles.push(StyleBlock {
                href: stylesheet.href.clone(),
                media: stylesheet.media.clone(),
                css,
            });
        }

        for script in &refs.scripts {
            log::info!("Inlining JS: {}", script.src);
            let Some(bytes) = fetch::read_asset_bytes(&script.src, ctx.options, &ctx.client)
            else {
                report.failure(&script.src, AssetKind::Script, "fetch failed");
                continue;
            };
            let text = String::from_utf8(bytes).context("Script content is not valid UTF-8")?;

            if script.is_deferred {
                // Inlined scripts execute immediately; defer no longer applies.
                log::info!("Dropping defer attribute for inlined script: {}", script.src);
            }

            report.success();
            replacements.scripts.push(ScriptBlock {
                src: script.src.clone(),
                script_type: script.script_type.clone(),
                is_async: script.is_async,
                text,
            });
        }

        for src in &refs.srcs {
            log::info!("Inlining tag src: {src}");
            match fetch::as_data_uri(src, ctx.options, &ctx.client) {
                Some(data_uri) => {
                    report.success();
                    replacements.srcs.push((src.clone(), data_uri));
                }
                None => report.failure(src, AssetKind::Media, "fetch failed"),
            }
        }

        for href in &refs.icons {
            log::info!("Inlining link asset: {href}");
            match fetch::as_data_uri(href, ctx.options, &ctx.client) {
                Some(data_uri) => {
                    report.success();
                    replacements.icons.push((href.clone(), data_uri));
                }
                None => report.failure(href, AssetKind::Icon, "fetch failed"),
            }
        }

        apply::apply_replacements(html, replacements)
    }
}

/// Directory containing a stylesheet, for resolving its `url(...)`
/// targets.
fn stylesheet_dir(href: &str, base_dir: &Path) -> PathBuf {
    base_dir
        .join(href)
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| base_dir.to_path_buf())
}
