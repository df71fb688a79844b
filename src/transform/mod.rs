//! Document-ready passes over a parsed exercise page.
//!
//! [`on_ready`] runs the two passes once, the way the page script did when
//! the browser finished loading:
//!
//! 1. [`build_navbar`]: number the exercise sections and link them as tabs.
//! 2. [`normalize_tags`]: rewrite `<tt>` to `<code>`.
//!
//! The passes touch disjoint nodes, so their order does not affect the
//! result.
//!
//! # Example
//!
//! ```
//! use jenius_dom::{Config, transform_html};
//!
//! let page = r#"<ul class="nav"></ul><div class="exercise"><tt>ls</tt></div>"#;
//! let html = transform_html(page, &Config::default()).unwrap();
//!
//! assert!(html.contains(r##"href="#exercise1""##));
//! assert!(html.contains("<code>ls</code>"));
//! ```

mod navbar;
mod tt;

pub use navbar::{NavbarReport, build_navbar};
pub use tt::normalize_tags;

use std::fs;
use std::path::Path;

use crate::config::Config;
use crate::dom::{ArenaDom, parse_html, parse_html_bytes};
use crate::error::Result;

/// Summary of one document-ready run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "cli", derive(serde::Serialize))]
pub struct Report {
    pub navbar: NavbarReport,
    /// Elements rewritten by tag normalization.
    pub tags_replaced: usize,
}

/// Run both passes on a parsed page.
///
/// The configuration is validated first, so on error the page is untouched.
pub fn on_ready(dom: &mut ArenaDom, config: &Config) -> Result<Report> {
    config.validate()?;

    let navbar = build_navbar(dom, &config.navbar)?;
    let tags_replaced = normalize_tags(dom, &config.tags)?;

    tracing::info!(
        sections = navbar.sections,
        entries = navbar.entries,
        tags_replaced,
        "Page ready"
    );
    Ok(Report {
        navbar,
        tags_replaced,
    })
}

/// Parse, transform and serialize an HTML page.
pub fn transform_html(html: &str, config: &Config) -> Result<String> {
    let mut dom = parse_html(html);
    on_ready(&mut dom, config)?;
    Ok(dom.to_html())
}

/// Like [`transform_html`], for undecoded bytes.
pub fn transform_html_bytes(html: &[u8], config: &Config) -> Result<String> {
    let mut dom = parse_html_bytes(html);
    on_ready(&mut dom, config)?;
    Ok(dom.to_html())
}

/// Transform the page at `input` and write the result to `output`.
///
/// Nothing is written if the transformation fails.
pub fn process_file(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    config: &Config,
) -> Result<Report> {
    let input = input.as_ref();
    let output = output.as_ref();

    let bytes = fs::read(input)?;
    let mut dom = parse_html_bytes(&bytes);
    let report = on_ready(&mut dom, config)?;
    fs::write(output, dom.to_html())?;

    tracing::debug!(input = %input.display(), output = %output.display(), "Wrote page");
    Ok(report)
}
