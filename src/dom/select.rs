//! Compiled CSS selectors and document-order queries.

use std::fmt;

use selectors::context::{MatchingContext, SelectorCaches};
use selectors::parser::{ParseRelative, SelectorList};

use super::arena::{ArenaDom, ArenaNodeId};
use super::element_ref::{ElementRef, PageSelectors};
use crate::error::{Error, Result};

/// A parsed selector list such as `.nav` or `div.exercise, section.exercise`.
#[derive(Clone)]
pub struct Selector {
    source: String,
    selectors: Vec<selectors::parser::Selector<PageSelectors>>,
}

impl Selector {
    /// Parse a comma-separated selector list.
    pub fn parse(source: &str) -> Result<Self> {
        let mut input = cssparser::ParserInput::new(source);
        let mut parser = cssparser::Parser::new(&mut input);
        let list = SelectorList::parse(&PageSelectors, &mut parser, ParseRelative::No).map_err(
            |e| Error::InvalidSelector {
                selector: source.to_string(),
                reason: format!("{:?}", e.kind),
            },
        )?;

        Ok(Self {
            source: source.to_string(),
            selectors: list.slice().to_vec(),
        })
    }

    /// The selector text this was parsed from.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Check a single node against the selector. Non-elements never match.
    pub fn matches(&self, dom: &ArenaDom, id: ArenaNodeId) -> bool {
        if !dom.is_element(id) {
            return false;
        }
        let mut caches = SelectorCaches::default();
        let mut context = new_context(&mut caches);
        self.matches_in(dom, id, &mut context)
    }

    fn matches_in(
        &self,
        dom: &ArenaDom,
        id: ArenaNodeId,
        context: &mut MatchingContext<'_, PageSelectors>,
    ) -> bool {
        let elem = ElementRef::new(dom, id);
        self.selectors.iter().any(|selector| {
            selectors::matching::matches_selector(selector, 0, None, &elem, context)
        })
    }
}

impl fmt::Debug for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Selector").field(&self.source).finish()
    }
}

fn new_context(caches: &mut SelectorCaches) -> MatchingContext<'_, PageSelectors> {
    MatchingContext::new(
        selectors::matching::MatchingMode::Normal,
        None,
        caches,
        selectors::context::QuirksMode::NoQuirks,
        selectors::matching::NeedsSelectorFlags::No,
        selectors::matching::MatchingForInvalidation::No,
    )
}

impl ArenaDom {
    /// Every attached element matching `selector`, in document order.
    pub fn select(&self, selector: &Selector) -> Vec<ArenaNodeId> {
        let mut caches = SelectorCaches::default();
        let mut context = new_context(&mut caches);
        self.descendants(self.document())
            .filter(|&id| self.is_element(id) && selector.matches_in(self, id, &mut context))
            .collect()
    }

    /// First attached element matching `selector`.
    pub fn select_first(&self, selector: &Selector) -> Option<ArenaNodeId> {
        let mut caches = SelectorCaches::default();
        let mut context = new_context(&mut caches);
        self.descendants(self.document())
            .find(|&id| self.is_element(id) && selector.matches_in(self, id, &mut context))
    }
}
