//! Replacement application over a DOM tree
//!
//! All replacement kinds are applied in a single parse/mutate/serialize
//! cycle rather than one parse per kind.

use anyhow::{Context, Result};
use kuchiki::NodeRef;
use kuchiki::traits::TendrilSink;
use std::collections::HashMap;

use super::extract::{is_icon_rel, is_stylesheet_rel};

/// Inline `<style>` replacement for a stylesheet link.
#[derive(Debug)]
pub struct StyleBlock {
    pub href: String,
    pub media: Option<String>,
    pub css: String,
}

/// Inline `<script>` replacement for a script tag.
#[derive(Debug)]
pub struct ScriptBlock {
    pub src: String,
    pub script_type: Option<String>,
    pub is_async: bool,
    pub text: String,
}

/// The full replacement set for one run.
#[derive(Debug, Default)]
pub struct Replacements {
    pub styles: Vec<StyleBlock>,
    pub scripts: Vec<ScriptBlock>,
    /// (original src, data URI) pairs for generic src-bearing tags.
    pub srcs: Vec<(String, String)>,
    /// (original href, data URI) pairs for icon links.
    pub icons: Vec<(String, String)>,
}

impl Replacements {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
            && self.scripts.is_empty()
            && self.srcs.is_empty()
            && self.icons.is_empty()
    }
}

/// Apply all replacements in a single DOM parse/serialize cycle.
pub fn apply_replacements(html: &str, replacements: Replacements) -> Result<String> {
    if replacements.is_empty() {
        return Ok(html.to_string());
    }

    let document = kuchiki::parse_html().one(html);

    let style_map: HashMap<String, StyleBlock> = replacements
        .styles
        .into_iter()
        .map(|block| (block.href.clone(), block))
        .collect();
    let script_map: HashMap<String, ScriptBlock> = replacements
        .scripts
        .into_iter()
        .map(|block| (block.src.clone(), block))
        .collect();
    let src_map: HashMap<String, String> = replacements.srcs.into_iter().collect();
    let icon_map: HashMap<String, String> = replacements.icons.into_iter().collect();

    replace_stylesheet_links(&document, &style_map)?;
    replace_script_tags(&document, &script_map)?;
    rewrite_src_attributes(&document, &src_map)?;
    rewrite_icon_links(&document, &icon_map)?;

    let mut out = Vec::new();
    document
        .serialize(&mut out)
        .context("Failed to serialize HTML after applying replacements")?;
    String::from_utf8(out).context("Serialized HTML is not valid UTF-8")
}

fn replace_stylesheet_links(
    document: &NodeRef,
    styles: &HashMap<String, StyleBlock>,
) -> Result<()> {
    if styles.is_empty() {
        return Ok(());
    }

    // Collect before iterating: detaching during iteration would
    // invalidate the selection.
    let matches: Vec<_> = document
        .select("link[href]")
        .map_err(|()| anyhow::anyhow!("Invalid link selector"))?
        .collect();

    for node_ref in matches {
        let (href, rel) = {
            let attrs = node_ref.attributes.borrow();
            (
                attrs.get("href").map(ToString::to_string),
                attrs.get("rel").unwrap_or("").to_string(),
            )
        };
        let Some(href) = href else { continue };
        if !is_stylesheet_rel(&rel) {
            continue;
        }
        let Some(block) = styles.get(&href) else {
            continue;
        };

        let node = node_ref.as_node();
        node.insert_before(build_style_node(block)?);
        node.detach();

        log::debug!("Replaced stylesheet link with inline style: {href}");
    }

    Ok(())
}

fn replace_script_tags(document: &NodeRef, scripts: &HashMap<String, ScriptBlock>) -> Result<()> {
    if scripts.is_empty() {
        return Ok(());
    }

    let matches: Vec<_> = document
        .select("script[src]")
        .map_err(|()| anyhow::anyhow!("Invalid script selector"))?
        .collect();

    for node_ref in matches {
        let src = {
            let attrs = node_ref.attributes.borrow();
            attrs.get("src").map(ToString::to_string)
        };
        let Some(src) = src else { continue };
        let Some(block) = scripts.get(&src) else {
            continue;
        };

        let node = node_ref.as_node();
        node.insert_before(build_script_node(block)?);
        node.detach();

        log::debug!("Replaced script tag with inline script: {src}");
    }

    Ok(())
}

fn rewrite_src_attributes(document: &NodeRef, srcs: &HashMap<String, String>) -> Result<()> {
    if srcs.is_empty() {
        return Ok(());
    }

    // Attribute updates don't invalidate the selection; no collect needed.
    for node_ref in document
        .select("[src]")
        .map_err(|()| anyhow::anyhow!("Invalid src selector"))?
    {
        if &*node_ref.name.local == "script" {
            continue;
        }
        let current = {
            let attrs = node_ref.attributes.borrow();
            attrs.get("src").map(ToString::to_string)
        };
        if let Some(src) = current
            && let Some(data_uri) = srcs.get(&src)
        {
            node_ref
                .attributes
                .borrow_mut()
                .insert("src", data_uri.clone());
            log::debug!("Replaced tag src with data URI: {src}");
        }
    }

    Ok(())
}

fn rewrite_icon_links(document: &NodeRef, icons: &HashMap<String, String>) -> Result<()> {
    if icons.is_empty() {
        return Ok(());
    }

    for node_ref in document
        .select("link[href]")
        .map_err(|()| anyhow::anyhow!("Invalid link selector"))?
    {
        let (href, rel) = {
            let attrs = node_ref.attributes.borrow();
            (
                attrs.get("href").map(ToString::to_string),
                attrs.get("rel").unwrap_or("").to_string(),
            )
        };
        if let Some(href) = href
            && is_icon_rel(&rel)
            && let Some(data_uri) = icons.get(&href)
        {
            node_ref
                .attributes
                .borrow_mut()
                .insert("href", data_uri.clone());
            log::debug!("Replaced icon link href with data URI: {href}");
        }
    }

    Ok(())
}

/// Build a `<style>` node by parsing a fragment and lifting the element
/// out of it.
fn build_style_node(block: &StyleBlock) -> Result<NodeRef> {
    let media_attr = block
        .media
        .as_deref()
        .map(|media| {
            format!(
                " media=\"{}\"",
                html_escape::encode_double_quoted_attribute(media)
            )
        })
        .unwrap_or_default();

    let fragment = kuchiki::parse_html().one(format!(
        "<style{media_attr}>\n{}\n</style>",
        block.css
    ));
    let style = fragment
        .select_first("style")
        .map_err(|()| anyhow::anyhow!("Generated style fragment did not parse"))?;

    Ok(style.as_node().clone())
}

fn build_script_node(block: &ScriptBlock) -> Result<NodeRef> {
    let mut attrs = String::new();
    if let Some(script_type) = &block.script_type {
        attrs.push_str(&format!(
            " type=\"{}\"",
            html_escape::encode_double_quoted_attribute(script_type)
        ));
    }
    if block.is_async {
        attrs.push_str(" async");
    }

    let fragment =
        kuchiki::parse_html().one(format!("<script{attrs}>\n{}\n</script>", block.text));
    let script = fragment
        .select_first("script")
        .map_err(|()| anyhow::anyhow!("Generated script fragment did not parse"))?;

    Ok(script.as_node().clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_replacement_set_returns_input_unchanged() {
        let html = "<html><head><link rel=\"stylesheet\" href=\"a.css\"></head></html>";
        let out = apply_replacements(html, Replacements::default()).expect("apply");
        assert_eq!(out, html);
    }

    #[test]
    fn stylesheet_link_becomes_style_block_with_media() {
        let replacements = Replacements {
            styles: vec![StyleBlock {
                href: "print.css".to_string(),
                media: Some("print".to_string()),
                css: "body { color: black }".to_string(),
            }],
            ..Replacements::default()
        };

        let out = apply_replacements(
            r#"<html><head><link rel="stylesheet" href="print.css" media="print"></head></html>"#,
            replacements,
        )
        .expect("apply");

        assert!(out.contains(r#"<style media="print">"#));
        assert!(out.contains("body { color: black }"));
        assert!(!out.contains("<link"));
    }

    #[test]
    fn non_stylesheet_links_with_matching_href_are_left_alone() {
        let replacements = Replacements {
            styles: vec![StyleBlock {
                href: "a.css".to_string(),
                media: None,
                css: "p {}".to_string(),
            }],
            ..Replacements::default()
        };

        let out = apply_replacements(
            r#"<html><head>
                <link rel="stylesheet" href="a.css">
                <link rel="preload" href="a.css">
            </head></html>"#,
            replacements,
        )
        .expect("apply");

        assert!(out.contains(r#"<link rel="preload" href="a.css">"#));
        assert_eq!(out.matches("<style>").count(), 1);
    }

    #[test]
    fn script_replacement_preserves_type_and_async_only() {
        let replacements = Replacements {
            scripts: vec![ScriptBlock {
                src: "app.js".to_string(),
                script_type: Some("module".to_string()),
                is_async: true,
                text: "console.log(1);".to_string(),
            }],
            ..Replacements::default()
        };

        let out = apply_replacements(
            r#"<html><body><script src="app.js" type="module" defer async></script></body></html>"#,
            replacements,
        )
        .expect("apply");

        assert!(out.contains(r#"type="module""#));
        assert!(out.contains("async"));
        assert!(!out.contains("defer"));
        assert!(!out.contains("src="));
        assert!(out.contains("console.log(1);"));
    }

    #[test]
    fn src_attributes_are_rewritten_in_place() {
        let replacements = Replacements {
            srcs: vec![("logo.png".to_string(), "data:image/png;base64,AA==".to_string())],
            ..Replacements::default()
        };

        let out = apply_replacements(
            r#"<html><body><img src="logo.png" alt="logo"></body></html>"#,
            replacements,
        )
        .expect("apply");

        assert!(out.contains(r#"src="data:image/png;base64,AA==""#));
        assert!(out.contains(r#"alt="logo""#));
    }

    #[test]
    fn icon_link_href_is_rewritten() {
        let replacements = Replacements {
            icons: vec![(
                "favicon.ico".to_string(),
                "data:image/vnd.microsoft.icon;base64,AA==".to_string(),
            )],
            ..Replacements::default()
        };

        let out = apply_replacements(
            r#"<html><head><link rel="icon" href="favicon.ico"></head></html>"#,
            replacements,
        )
        .expect("apply");

        assert!(out.contains(r#"href="data:image/vnd.microsoft.icon;base64,AA==""#));
    }
}
