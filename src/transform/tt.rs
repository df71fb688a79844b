//! Tag normalization: legacy `<tt>` becomes `<code>`.
//!
//! The replacement keeps the attributes (same order, same namespaces) and
//! takes over the original children, so the serialized content of every
//! rewritten element is unchanged.

use crate::config::TagConfig;
use crate::dom::{ArenaDom, Selector};
use crate::error::Result;

/// Replace every element matching `config.source` with a `config.target`
/// element at the same position. Returns how many were replaced.
///
/// Nested matches are replaced too. Running the pass again finds nothing
/// left to do.
pub fn normalize_tags(dom: &mut ArenaDom, config: &TagConfig) -> Result<usize> {
    let selector = Selector::parse(&config.source)?;
    let matches = dom.select(&selector);

    for &old in &matches {
        let attrs = dom.attrs(old).to_vec();
        let new = dom.create_html_element(&config.target, attrs);
        dom.move_children(old, new);
        dom.replace(old, new);
    }

    if !matches.is_empty() {
        tracing::debug!(
            count = matches.len(),
            source = %config.source,
            target = %config.target,
            "Normalized tags"
        );
    }
    Ok(matches.len())
}
