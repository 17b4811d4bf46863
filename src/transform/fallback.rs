//! Regex fallback transformation strategy
//!
//! Approximates the DOM passes with textual matching. Known gaps, kept
//! deliberately rather than papered over: scripts are only matched when
//! they carry an explicit closing tag, the original script attributes are
//! not preserved, and icon links are not inlined at all.

use anyhow::{Context, Result};
use lazy_static::lazy_static;
use regex::Regex;
use std::path::{Path, PathBuf};

use super::{DocumentTransform, TransformContext};
use crate::fetch;
use crate::report::{AssetKind, InlineReport};
use crate::rewrite;

lazy_static! {
    static ref STYLESHEET_LINK: Regex = Regex::new(r#"(?i)<link[^>]+rel=["']stylesheet["'][^>]*>"#)
        .expect("BUG: hardcoded stylesheet link pattern is invalid");
    static ref HREF_ATTR: Regex = Regex::new(r#"(?i)href=["']([^"']+)["']"#)
        .expect("BUG: hardcoded href pattern is invalid");
    static ref MEDIA_ATTR: Regex = Regex::new(r#"(?i)media=["']([^"']+)["']"#)
        .expect("BUG: hardcoded media pattern is invalid");
    static ref SCRIPT_SRC: Regex =
        Regex::new(r#"(?i)<script[^>]+src=["']([^"']+)["'][^>]*></script>"#)
            .expect("BUG: hardcoded script pattern is invalid");
    static ref SRC_TAG: Regex =
        Regex::new(r#"(?i)<(?:img|audio|video|source|track)\b[^>]*\bsrc=["']([^"']+)["'][^>]*>"#)
            .expect("BUG: hardcoded src tag pattern is invalid");
}

/// Textual transformation with looser matching than the DOM strategy.
///
/// Always compiled; it is the selected strategy when the crate is built
/// without the `dom` feature, and stays available for direct use
/// otherwise.
pub struct RegexTransformer;

impl DocumentTransform for RegexTransformer {
    fn name(&self) -> &'static str {
        "regex"
    }

    fn transform(
        &self,
        html: &str,
        ctx: &TransformContext<'_>,
        report: &mut InlineReport,
    ) -> Result<String> {
        let text = inline_stylesheets(html, ctx, report)?;
        let text = inline_scripts(&text, ctx, report)?;
        let text = inline_src_tags(&text, ctx, report);
        // Icon links are not handled in this mode.
        Ok(text)
    }
}

fn inline_stylesheets(
    html: &str,
    ctx: &TransformContext<'_>,
    report: &mut InlineReport,
) -> Result<String> {
    let tags: Vec<String> = STYLESHEET_LINK
        .find_iter(html)
        .map(|m| m.as_str().to_string())
        .collect();

    let mut text = html.to_string();
    for tag in tags {
        let Some(href_caps) = HREF_ATTR.captures(&tag) else {
            continue;
        };
        let href = href_caps[1].to_string();
        if fetch::is_data_uri(&href) {
            continue;
        }
        let media = MEDIA_ATTR.captures(&tag).map(|caps| caps[1].to_string());

        log::info!("Inlining CSS: {href}");
        let Some(bytes) = fetch::read_asset_bytes(&href, ctx.options, &ctx.client) else {
            report.failure(&href, AssetKind::Stylesheet, "fetch failed");
            continue;
        };
        let css = String::from_utf8(bytes).context("Stylesheet content is not valid UTF-8")?;
        let css_dir = stylesheet_dir(&href, ctx.options.base_dir.as_path());
        let css = rewrite::rewrite_css_urls(&css, &css_dir, ctx.options, &ctx.client, report);

        let media_attr = media
            .map(|media| format!(" media=\"{media}\""))
            .unwrap_or_default();
        let style_tag = format!("<style{media_attr}>\n{css}\n</style>");

        report.success();
        text = text.replace(&tag, &style_tag);
    }

    Ok(text)
}

fn inline_scripts(
    html: &str,
    ctx: &TransformContext<'_>,
    report: &mut InlineReport,
) -> Result<String> {
    let matches: Vec<(String, String)> = SCRIPT_SRC
        .captures_iter(html)
        .map(|caps| (caps[0].to_string(), caps[1].to_string()))
        .collect();

    let mut text = html.to_string();
    for (tag, src) in matches {
        if fetch::is_data_uri(&src) {
            continue;
        }

        log::info!("Inlining JS: {src}");
        let Some(bytes) = fetch::read_asset_bytes(&src, ctx.options, &ctx.client) else {
            report.failure(&src, AssetKind::Script, "fetch failed");
            continue;
        };
        let js = String::from_utf8(bytes).context("Script content is not valid UTF-8")?;

        report.success();
        text = text.replace(&tag, &format!("<script>\n{js}\n</script>"));
    }

    Ok(text)
}

fn inline_src_tags(html: &str, ctx: &TransformContext<'_>, report: &mut InlineReport) -> String {
    // (tag text, src span within the tag, src value)
    let matches: Vec<(String, std::ops::Range<usize>, String)> = SRC_TAG
        .captures_iter(html)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let group = caps.get(1)?;
            let span = group.start() - whole.start()..group.end() - whole.start();
            Some((whole.as_str().to_string(), span, group.as_str().to_string()))
        })
        .collect();

    let mut text = html.to_string();
    for (tag, span, src) in matches {
        if fetch::is_data_uri(&src) {
            continue;
        }

        log::info!("Inlining tag src: {src}");
        match fetch::as_data_uri(&src, ctx.options, &ctx.client) {
            Some(data_uri) => {
                report.success();
                let mut new_tag = tag.clone();
                new_tag.replace_range(span, &data_uri);
                text = text.replace(&tag, &new_tag);
            }
            None => report.failure(&src, AssetKind::Media, "fetch failed"),
        }
    }

    text
}

fn stylesheet_dir(href: &str, base_dir: &Path) -> PathBuf {
    base_dir
        .join(href)
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| base_dir.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::InlineOptions;
    use std::fs;

    fn context_in(options: &InlineOptions) -> TransformContext<'_> {
        TransformContext::new(options).expect("context")
    }

    #[test]
    fn stylesheet_link_becomes_style_block_with_media() {
        let temp = tempfile::tempdir().expect("tempdir");
        fs::write(temp.path().join("print.css"), "body { color: black }").expect("write");

        let options = InlineOptions::with_base_dir(temp.path());
        let ctx = context_in(&options);
        let mut report = InlineReport::default();

        let out = RegexTransformer
            .transform(
                r#"<html><head><link rel="stylesheet" href="print.css" media="print"></head></html>"#,
                &ctx,
                &mut report,
            )
            .expect("transform");

        assert!(out.contains(r#"<style media="print">"#));
        assert!(out.contains("body { color: black }"));
        assert!(!out.contains("<link"));
        assert_eq!(report.successes, 1);
    }

    #[test]
    fn only_closing_tag_scripts_are_inlined() {
        let temp = tempfile::tempdir().expect("tempdir");
        fs::write(temp.path().join("app.js"), "var n = 1;").expect("write");

        let options = InlineOptions::with_base_dir(temp.path());
        let ctx = context_in(&options);
        let mut report = InlineReport::default();

        let out = RegexTransformer
            .transform(
                r#"<body><script src="app.js"></script><script src="app.js"/></body>"#,
                &ctx,
                &mut report,
            )
            .expect("transform");

        assert!(out.contains("<script>\nvar n = 1;\n</script>"));
        // The self-closing variant is outside this strategy's coverage.
        assert!(out.contains(r#"<script src="app.js"/>"#));
    }

    #[test]
    fn src_tags_are_rewritten_to_data_uris() {
        let temp = tempfile::tempdir().expect("tempdir");
        fs::write(temp.path().join("logo.png"), b"png").expect("write");

        let options = InlineOptions::with_base_dir(temp.path());
        let ctx = context_in(&options);
        let mut report = InlineReport::default();

        let out = RegexTransformer
            .transform(
                r#"<body><img src="logo.png" alt="logo"></body>"#,
                &ctx,
                &mut report,
            )
            .expect("transform");

        assert!(out.contains(r#"src="data:image/png;base64,"#));
        assert!(out.contains(r#"alt="logo""#));
    }

    #[test]
    fn icon_links_are_left_untouched() {
        let temp = tempfile::tempdir().expect("tempdir");
        fs::write(temp.path().join("favicon.ico"), b"ico").expect("write");

        let options = InlineOptions::with_base_dir(temp.path());
        let ctx = context_in(&options);
        let mut report = InlineReport::default();

        let html = r#"<head><link rel="icon" href="favicon.ico"></head>"#;
        let out = RegexTransformer
            .transform(html, &ctx, &mut report)
            .expect("transform");

        assert_eq!(out, html);
        assert_eq!(report.total(), 0);
    }

    #[test]
    fn missing_assets_leave_tags_unchanged() {
        let temp = tempfile::tempdir().expect("tempdir");
        let options = InlineOptions::with_base_dir(temp.path());
        let ctx = context_in(&options);
        let mut report = InlineReport::default();

        let html = r#"<head><link rel="stylesheet" href="gone.css"></head>"#;
        let out = RegexTransformer
            .transform(html, &ctx, &mut report)
            .expect("transform");

        assert_eq!(out, html);
        assert_eq!(report.failures.len(), 1);
    }
}
