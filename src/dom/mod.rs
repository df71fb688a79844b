//! The document tree: an arena DOM that html5ever parses into.
//!
//! # Example
//!
//! ```
//! use jenius_dom::dom::{Selector, parse_html};
//!
//! let dom = parse_html(r#"<div class="exercise">One</div><div class="exercise">Two</div>"#);
//! let exercises = dom.select(&Selector::parse(".exercise").unwrap());
//! assert_eq!(exercises.len(), 2);
//! ```

mod arena;
mod element_ref;
mod select;
mod serialize;
mod tree_sink;

pub use arena::{ArenaDom, ArenaNode, ArenaNodeData, ArenaNodeId, Attribute, html_name};
pub use element_ref::{ElementRef, PageSelectors};
pub use select::Selector;
pub use serialize::SerializableNode;

use html5ever::driver::ParseOpts;
use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use html5ever::tree_builder::TreeBuilderOpts;

use tree_sink::ArenaSink;

/// Parse a full HTML document.
///
/// Parsing never fails: malformed markup is repaired the way browsers do.
pub fn parse_html(html: &str) -> ArenaDom {
    let opts = ParseOpts {
        tree_builder: TreeBuilderOpts {
            drop_doctype: false,
            ..Default::default()
        },
        ..Default::default()
    };

    parse_document(ArenaSink::new(), opts)
        .from_utf8()
        .one(html.as_bytes())
        .into_dom()
}

/// Parse HTML bytes, detecting the encoding from a `<meta charset>` or XML
/// declaration and falling back to Windows-1252.
///
/// The tree holds decoded text and always serializes as UTF-8, so charset
/// declarations naming another encoding are rewritten to `utf-8`.
pub fn parse_html_bytes(html: &[u8]) -> ArenaDom {
    let hint_encoding = crate::util::extract_charset(html);
    let html_str = crate::util::decode_text(html, hint_encoding);

    let mut dom = parse_html(&html_str);
    let rewritten = declare_utf8(&mut dom);
    if rewritten > 0 {
        tracing::debug!(
            declared = hint_encoding.unwrap_or_default(),
            rewritten,
            "Rewrote charset declaration to utf-8"
        );
    }
    dom
}

/// Point `<meta charset>` and `<meta http-equiv="Content-Type">` at UTF-8.
/// Returns how many declarations changed.
fn declare_utf8(dom: &mut ArenaDom) -> usize {
    let mut rewritten = 0;
    for meta in dom.find_all_by_tag("meta") {
        match dom.get_attr(meta, "charset").map(crate::util::is_utf8_label) {
            Some(true) => continue,
            Some(false) => {
                dom.set_attr(meta, "charset", "utf-8");
                rewritten += 1;
                continue;
            }
            None => {}
        }

        let content_type = dom
            .get_attr(meta, "http-equiv")
            .is_some_and(|v| v.trim().eq_ignore_ascii_case("content-type"));
        if !content_type {
            continue;
        }
        if let Some(content) = dom
            .get_attr(meta, "content")
            .and_then(crate::util::with_utf8_charset)
        {
            dom.set_attr(meta, "content", &content);
            rewritten += 1;
        }
    }
    rewritten
}

/// Serialize a whole document back to HTML.
pub fn serialize_html(dom: &ArenaDom) -> String {
    dom.to_html()
}
