//! Reference extraction over a parsed document
//!
//! One synchronous pass per reference kind; references already in data-URI
//! form are skipped here so repeated runs stay idempotent.

use lazy_static::lazy_static;
use scraper::{Html, Selector};

lazy_static! {
    // These selectors are hardcoded and syntactically valid. If they fail
    // to parse, the selector strings themselves are wrong.
    static ref LINK_SELECTOR: Selector =
        Selector::parse("link[href]").expect("BUG: hardcoded selector 'link[href]' is invalid");
    static ref SCRIPT_SELECTOR: Selector =
        Selector::parse("script[src]").expect("BUG: hardcoded selector 'script[src]' is invalid");
    static ref SRC_SELECTOR: Selector =
        Selector::parse("[src]").expect("BUG: hardcoded selector '[src]' is invalid");
}

/// A `<link rel="stylesheet">` reference.
#[derive(Debug, Clone)]
pub struct StylesheetRef {
    pub href: String,
    pub media: Option<String>,
}

/// A `<script src>` reference.
#[derive(Debug, Clone)]
pub struct ScriptRef {
    pub src: String,
    pub script_type: Option<String>,
    pub is_async: bool,
    pub is_deferred: bool,
}

/// Extracted references, in document order per kind.
#[derive(Debug, Default)]
pub struct References {
    pub stylesheets: Vec<StylesheetRef>,
    pub scripts: Vec<ScriptRef>,
    /// `src` values of non-script tags (img, audio, video, source, track).
    pub srcs: Vec<String>,
    /// `href` values of icon-type links.
    pub icons: Vec<String>,
}

/// True when a `rel` value carries a stylesheet token.
pub(crate) fn is_stylesheet_rel(rel: &str) -> bool {
    rel.split_whitespace()
        .any(|token| token.eq_ignore_ascii_case("stylesheet"))
}

/// True when a `rel` value names an icon link.
pub(crate) fn is_icon_rel(rel: &str) -> bool {
    rel.split_whitespace().any(|token| {
        token.eq_ignore_ascii_case("icon") || token.eq_ignore_ascii_case("apple-touch-icon")
    })
}

/// Extract every inlinable reference from the document.
#[must_use]
pub fn extract_references(html: &str) -> References {
    let document = Html::parse_document(html);
    let mut refs = References::default();

    for element in document.select(&LINK_SELECTOR) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };
        if href.starts_with("data:") {
            continue;
        }
        let rel = element.value().attr("rel").unwrap_or("");

        if is_stylesheet_rel(rel) {
            refs.stylesheets.push(StylesheetRef {
                href: href.to_string(),
                media: element.value().attr("media").map(str::to_string),
            });
        } else if is_icon_rel(rel) {
            refs.icons.push(href.to_string());
        }
    }

    for element in document.select(&SCRIPT_SELECTOR) {
        let Some(src) = element.value().attr("src") else {
            continue;
        };
        if src.starts_with("data:") {
            continue;
        }
        refs.scripts.push(ScriptRef {
            src: src.to_string(),
            script_type: element.value().attr("type").map(str::to_string),
            is_async: element.value().attr("async").is_some(),
            is_deferred: element.value().attr("defer").is_some(),
        });
    }

    for element in document.select(&SRC_SELECTOR) {
        // Scripts are handled by their own pass.
        if element.value().name() == "script" {
            continue;
        }
        let Some(src) = element.value().attr("src") else {
            continue;
        };
        if src.starts_with("data:") {
            continue;
        }
        refs.srcs.push(src.to_string());
    }

    refs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_stylesheets_with_media() {
        let refs = extract_references(
            r#"<html><head>
                <link rel="stylesheet" href="a.css">
                <link rel="stylesheet" href="print.css" media="print">
                <link rel="preload" href="b.css">
            </head></html>"#,
        );

        assert_eq!(refs.stylesheets.len(), 2);
        assert_eq!(refs.stylesheets[0].href, "a.css");
        assert_eq!(refs.stylesheets[0].media, None);
        assert_eq!(refs.stylesheets[1].media.as_deref(), Some("print"));
    }

    #[test]
    fn captures_script_attributes() {
        let refs = extract_references(
            r#"<html><body>
                <script src="app.js" type="module" defer></script>
                <script src="other.js" async></script>
                <script>var inline = 1;</script>
            </body></html>"#,
        );

        assert_eq!(refs.scripts.len(), 2);
        assert_eq!(refs.scripts[0].script_type.as_deref(), Some("module"));
        assert!(refs.scripts[0].is_deferred);
        assert!(!refs.scripts[0].is_async);
        assert!(refs.scripts[1].is_async);
    }

    #[test]
    fn src_pass_skips_scripts_and_data_uris() {
        let refs = extract_references(
            r#"<html><body>
                <img src="logo.png">
                <img src="data:image/png;base64,AAAA">
                <audio src="intro.mp3"></audio>
                <script src="app.js"></script>
            </body></html>"#,
        );

        assert_eq!(refs.srcs, vec!["logo.png", "intro.mp3"]);
    }

    #[test]
    fn icon_links_match_by_rel_token() {
        let refs = extract_references(
            r#"<html><head>
                <link rel="icon" href="favicon.ico">
                <link rel="shortcut icon" href="legacy.ico">
                <link rel="apple-touch-icon" href="touch.png">
                <link rel="canonical" href="https://example.com/">
            </head></html>"#,
        );

        assert_eq!(refs.icons, vec!["favicon.ico", "legacy.ico", "touch.png"]);
    }
}
