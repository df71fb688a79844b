//! # jenius-dom
//!
//! Document-ready transformations for generated exercise pages.
//!
//! Course pages come out of the generator as a flat list of exercise
//! sections, an empty navigation list and legacy `<tt>` markup. This crate
//! turns them into Bootstrap tab pages:
//!
//! - every `.exercise` section becomes a tab pane `exerciseN`, the first one
//!   active, with a matching entry in the `.nav` list
//! - a page without exercises loses its `.nav` list
//! - every `<tt>` becomes a `<code>` with the same attributes and content
//!
//! ## Quick Start
//!
//! ```
//! use jenius_dom::{Config, transform_html};
//!
//! let page = r#"<ul class="nav"></ul>
//! <div class="exercise">Run <tt>make</tt>.</div>
//! <div class="exercise">Run <tt>make test</tt>.</div>"#;
//!
//! let html = transform_html(page, &Config::default()).unwrap();
//! assert!(html.contains(r#"<div class="exercise tab-pane fade show active" id="exercise1">"#));
//! assert!(html.contains("<code>make test</code>"));
//! ```
//!
//! ## Working with the tree
//!
//! The passes are also available on a parsed [`dom::ArenaDom`]:
//!
//! ```
//! use jenius_dom::dom::parse_html;
//! use jenius_dom::{Config, on_ready};
//!
//! let mut dom = parse_html(r#"<ul class="nav"></ul><p>No exercises today.</p>"#);
//! let report = on_ready(&mut dom, &Config::default()).unwrap();
//!
//! assert_eq!(report.navbar.removed_navs, 1);
//! assert!(dom.find_by_tag("ul").is_none());
//! ```

pub mod config;
pub mod dom;
pub mod error;
pub mod transform;
pub(crate) mod util;

pub use config::{Config, MissingNavPolicy, NavbarConfig, TagConfig};
pub use error::{Error, Result};
pub use transform::{
    NavbarReport, Report, build_navbar, normalize_tags, on_ready, process_file, transform_html,
    transform_html_bytes,
};
