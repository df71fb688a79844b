//! Arena-based DOM for rendered course pages.
//!
//! html5ever parses into this tree, selectors match against it, and the
//! transformers mutate it in place. Nodes are never freed: detaching a node
//! only unlinks it, so ids handed out earlier stay valid for the whole pass.

use std::collections::HashMap;

use html5ever::{LocalName, Namespace, QualName, ns};

/// Unique identifier for a node in the arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ArenaNodeId(pub u32);

impl ArenaNodeId {
    /// Sentinel value for no node.
    pub const NONE: ArenaNodeId = ArenaNodeId(u32::MAX);

    /// Check if this is a valid node ID.
    pub fn is_some(&self) -> bool {
        self.0 != u32::MAX
    }

    /// Check if this is the sentinel value.
    pub fn is_none(&self) -> bool {
        self.0 == u32::MAX
    }
}

/// Node type in the arena DOM.
#[derive(Debug, Clone)]
pub enum ArenaNodeData {
    /// Document root.
    Document,
    /// Element with name and attributes.
    Element {
        name: QualName,
        attrs: Vec<Attribute>,
        /// Cached `id` attribute, kept in sync by every attribute write.
        id: Option<String>,
        /// Cached `class` tokens, kept in sync by every attribute write.
        classes: Vec<String>,
    },
    /// Text content.
    Text(String),
    /// Comment.
    Comment(String),
    /// Document type declaration.
    Doctype {
        name: String,
        public_id: String,
        system_id: String,
    },
}

/// HTML attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: QualName,
    pub value: String,
}

impl Attribute {
    /// Build a plain (no namespace) attribute.
    pub fn new(name: &str, value: impl Into<String>) -> Self {
        Self {
            name: QualName::new(None, ns!(), LocalName::from(name)),
            value: value.into(),
        }
    }
}

/// A node in the arena DOM.
#[derive(Debug)]
pub struct ArenaNode {
    pub data: ArenaNodeData,
    pub parent: ArenaNodeId,
    pub first_child: ArenaNodeId,
    pub last_child: ArenaNodeId,
    pub prev_sibling: ArenaNodeId,
    pub next_sibling: ArenaNodeId,
}

impl ArenaNode {
    fn new(data: ArenaNodeData) -> Self {
        Self {
            data,
            parent: ArenaNodeId::NONE,
            first_child: ArenaNodeId::NONE,
            last_child: ArenaNodeId::NONE,
            prev_sibling: ArenaNodeId::NONE,
            next_sibling: ArenaNodeId::NONE,
        }
    }
}

/// Arena-based DOM tree.
///
/// All nodes are stored in a contiguous vector. Parent/child/sibling links
/// use indices into this vector.
pub struct ArenaDom {
    nodes: Vec<ArenaNode>,
    document: ArenaNodeId,
    /// Map from id attribute to node ID for fast lookup.
    id_map: HashMap<String, ArenaNodeId>,
}

impl ArenaDom {
    /// Create a new empty DOM with a document root.
    pub fn new() -> Self {
        let mut dom = Self {
            nodes: Vec::new(),
            document: ArenaNodeId::NONE,
            id_map: HashMap::new(),
        };
        dom.document = dom.alloc(ArenaNode::new(ArenaNodeData::Document));
        dom
    }

    fn alloc(&mut self, node: ArenaNode) -> ArenaNodeId {
        let id = ArenaNodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Get the document root ID.
    pub fn document(&self) -> ArenaNodeId {
        self.document
    }

    /// Get a node by ID.
    pub fn get(&self, id: ArenaNodeId) -> Option<&ArenaNode> {
        if id.is_none() {
            return None;
        }
        self.nodes.get(id.0 as usize)
    }

    /// Get a mutable node by ID.
    pub fn get_mut(&mut self, id: ArenaNodeId) -> Option<&mut ArenaNode> {
        if id.is_none() {
            return None;
        }
        self.nodes.get_mut(id.0 as usize)
    }

    /// Create a new element node.
    pub fn create_element(&mut self, name: QualName, attrs: Vec<Attribute>) -> ArenaNodeId {
        let (id, classes) = extract_id_and_classes(&attrs);

        let node_id = self.alloc(ArenaNode::new(ArenaNodeData::Element {
            name,
            attrs,
            id: id.clone(),
            classes,
        }));

        if let Some(id_str) = id {
            self.id_map.insert(id_str, node_id);
        }

        node_id
    }

    /// Create a new element in the HTML namespace.
    pub fn create_html_element(&mut self, local: &str, attrs: Vec<Attribute>) -> ArenaNodeId {
        self.create_element(html_name(local), attrs)
    }

    /// Create a new text node.
    pub fn create_text(&mut self, text: String) -> ArenaNodeId {
        self.alloc(ArenaNode::new(ArenaNodeData::Text(text)))
    }

    /// Create a new comment node.
    pub fn create_comment(&mut self, text: String) -> ArenaNodeId {
        self.alloc(ArenaNode::new(ArenaNodeData::Comment(text)))
    }

    /// Create a doctype node.
    pub fn create_doctype(
        &mut self,
        name: String,
        public_id: String,
        system_id: String,
    ) -> ArenaNodeId {
        self.alloc(ArenaNode::new(ArenaNodeData::Doctype {
            name,
            public_id,
            system_id,
        }))
    }

    /// Append a child to a parent node.
    ///
    /// The child must not currently be linked anywhere; call [`detach`](Self::detach) first.
    pub fn append(&mut self, parent: ArenaNodeId, child: ArenaNodeId) {
        let last_child = self
            .get(parent)
            .map(|n| n.last_child)
            .unwrap_or(ArenaNodeId::NONE);

        if let Some(child_node) = self.get_mut(child) {
            child_node.parent = parent;
            child_node.prev_sibling = last_child;
            child_node.next_sibling = ArenaNodeId::NONE;
        }

        if last_child.is_some()
            && let Some(last_node) = self.get_mut(last_child)
        {
            last_node.next_sibling = child;
        }

        if let Some(parent_node) = self.get_mut(parent) {
            if parent_node.first_child.is_none() {
                parent_node.first_child = child;
            }
            parent_node.last_child = child;
        }
    }

    /// Insert a node before a sibling.
    pub fn insert_before(&mut self, sibling: ArenaNodeId, new_node: ArenaNodeId) {
        let parent = self
            .get(sibling)
            .map(|n| n.parent)
            .unwrap_or(ArenaNodeId::NONE);
        let prev = self
            .get(sibling)
            .map(|n| n.prev_sibling)
            .unwrap_or(ArenaNodeId::NONE);

        if let Some(new) = self.get_mut(new_node) {
            new.parent = parent;
            new.prev_sibling = prev;
            new.next_sibling = sibling;
        }

        if let Some(sib) = self.get_mut(sibling) {
            sib.prev_sibling = new_node;
        }

        if prev.is_some() {
            if let Some(p) = self.get_mut(prev) {
                p.next_sibling = new_node;
            }
        } else if let Some(par) = self.get_mut(parent) {
            par.first_child = new_node;
        }
    }

    /// Append text to an existing text node, or create new if last child isn't text.
    pub fn append_text(&mut self, parent: ArenaNodeId, text: &str) {
        let last_child = self
            .get(parent)
            .map(|n| n.last_child)
            .unwrap_or(ArenaNodeId::NONE);

        if let Some(last) = self.get_mut(last_child)
            && let ArenaNodeData::Text(ref mut existing) = last.data
        {
            existing.push_str(text);
            return;
        }

        let text_node = self.create_text(text.to_string());
        self.append(parent, text_node);
    }

    /// Unlink a node (and with it, its subtree) from its parent.
    ///
    /// The node stays allocated and can be re-inserted elsewhere.
    pub fn detach(&mut self, target: ArenaNodeId) {
        let (parent, prev, next) = match self.get(target) {
            Some(n) => (n.parent, n.prev_sibling, n.next_sibling),
            None => return,
        };

        if prev.is_some() {
            if let Some(p) = self.get_mut(prev) {
                p.next_sibling = next;
            }
        } else if let Some(p) = self.get_mut(parent) {
            p.first_child = next;
        }

        if next.is_some() {
            if let Some(n) = self.get_mut(next) {
                n.prev_sibling = prev;
            }
        } else if let Some(p) = self.get_mut(parent) {
            p.last_child = prev;
        }

        if let Some(node) = self.get_mut(target) {
            node.parent = ArenaNodeId::NONE;
            node.prev_sibling = ArenaNodeId::NONE;
            node.next_sibling = ArenaNodeId::NONE;
        }
    }

    /// Put `new_node` at the position of `old`, detaching `old`.
    pub fn replace(&mut self, old: ArenaNodeId, new_node: ArenaNodeId) {
        if self.get(old).is_none_or(|n| n.parent.is_none()) {
            return;
        }
        self.detach(new_node);
        self.insert_before(old, new_node);
        self.detach(old);
    }

    /// Move every child of `from` to the end of `to`, preserving order.
    pub fn move_children(&mut self, from: ArenaNodeId, to: ArenaNodeId) {
        let children: Vec<_> = self.children(from).collect();
        for child in children {
            self.detach(child);
            self.append(to, child);
        }
    }

    /// Check whether a node is reachable from the document root.
    pub fn is_attached(&self, id: ArenaNodeId) -> bool {
        let mut current = id;
        while let Some(node) = self.get(current) {
            if current == self.document {
                return true;
            }
            current = node.parent;
        }
        false
    }

    /// Get node by id attribute.
    ///
    /// Only attached nodes whose current id still matches are returned.
    pub fn get_by_id(&self, id: &str) -> Option<ArenaNodeId> {
        self.id_map
            .get(id)
            .copied()
            .filter(|&node| self.element_id(node) == Some(id) && self.is_attached(node))
    }

    /// Get the number of allocated nodes, including detached ones.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the DOM is empty (only has document root).
    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    /// Iterate over children of a node.
    pub fn children(&self, parent: ArenaNodeId) -> ChildrenIter<'_> {
        let first = self
            .get(parent)
            .map(|n| n.first_child)
            .unwrap_or(ArenaNodeId::NONE);
        ChildrenIter {
            dom: self,
            current: first,
        }
    }

    /// Iterate over all nodes below `root` in document (pre-)order.
    ///
    /// `root` itself is not yielded.
    pub fn descendants(&self, root: ArenaNodeId) -> Descendants<'_> {
        let mut stack: Vec<_> = self.children(root).collect();
        stack.reverse();
        Descendants { dom: self, stack }
    }

    /// Find the first element matching a predicate (DFS).
    pub fn find<F>(&self, predicate: F) -> Option<ArenaNodeId>
    where
        F: Fn(&ArenaNode) -> bool,
    {
        self.descendants(self.document)
            .find(|&id| self.get(id).is_some_and(&predicate))
    }

    /// Find element by tag name (first match).
    pub fn find_by_tag(&self, tag: &str) -> Option<ArenaNodeId> {
        self.find(|node| {
            if let ArenaNodeData::Element { name, .. } = &node.data {
                name.local.as_ref() == tag
            } else {
                false
            }
        })
    }

    /// All attached elements with the given tag name, in document order.
    pub fn find_all_by_tag(&self, tag: &str) -> Vec<ArenaNodeId> {
        self.descendants(self.document)
            .filter(|&id| self.element_name(id).is_some_and(|n| n.as_ref() == tag))
            .collect()
    }
}

impl Default for ArenaDom {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over children of a node.
pub struct ChildrenIter<'a> {
    dom: &'a ArenaDom,
    current: ArenaNodeId,
}

impl<'a> Iterator for ChildrenIter<'a> {
    type Item = ArenaNodeId;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current.is_none() {
            return None;
        }
        let id = self.current;
        self.current = self
            .dom
            .get(id)
            .map(|n| n.next_sibling)
            .unwrap_or(ArenaNodeId::NONE);
        Some(id)
    }
}

/// Pre-order iterator over a subtree.
pub struct Descendants<'a> {
    dom: &'a ArenaDom,
    stack: Vec<ArenaNodeId>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = ArenaNodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        let start = self.stack.len();
        self.stack.extend(self.dom.children(id));
        self.stack[start..].reverse();
        Some(id)
    }
}

/// Convenience methods for element nodes.
impl ArenaDom {
    /// Get element's local name (tag).
    pub fn element_name(&self, id: ArenaNodeId) -> Option<&LocalName> {
        self.get(id).and_then(|n| match &n.data {
            ArenaNodeData::Element { name, .. } => Some(&name.local),
            _ => None,
        })
    }

    /// Get element's namespace.
    pub fn element_namespace(&self, id: ArenaNodeId) -> Option<&Namespace> {
        self.get(id).and_then(|n| match &n.data {
            ArenaNodeData::Element { name, .. } => Some(&name.ns),
            _ => None,
        })
    }

    /// Get all attributes of an element, in source order.
    pub fn attrs(&self, id: ArenaNodeId) -> &[Attribute] {
        static EMPTY: &[Attribute] = &[];
        self.get(id)
            .and_then(|n| match &n.data {
                ArenaNodeData::Element { attrs, .. } => Some(attrs.as_slice()),
                _ => None,
            })
            .unwrap_or(EMPTY)
    }

    /// Get an attribute value.
    pub fn get_attr(&self, id: ArenaNodeId, attr_name: &str) -> Option<&str> {
        self.attrs(id)
            .iter()
            .find(|a| a.name.local.as_ref() == attr_name)
            .map(|a| a.value.as_str())
    }

    /// Set an attribute, overwriting an existing value or appending a new one.
    ///
    /// Keeps the cached id/classes and the id index in sync.
    pub fn set_attr(&mut self, id: ArenaNodeId, attr_name: &str, value: &str) {
        let Some(node) = self.get_mut(id) else {
            return;
        };
        let ArenaNodeData::Element {
            attrs,
            id: cached_id,
            classes,
            ..
        } = &mut node.data
        else {
            return;
        };

        match attrs.iter_mut().find(|a| a.name.local.as_ref() == attr_name) {
            Some(existing) => existing.value = value.to_string(),
            None => attrs.push(Attribute::new(attr_name, value)),
        }

        let (new_id, new_classes) = extract_id_and_classes(attrs);
        *cached_id = new_id.clone();
        *classes = new_classes;

        if let Some(id_str) = new_id {
            self.id_map.insert(id_str, id);
        }
    }

    /// Add a class token unless the element already has it.
    pub fn add_class(&mut self, id: ArenaNodeId, class: &str) {
        if !self.is_element(id) || self.has_class(id, class) {
            return;
        }
        let mut tokens: Vec<&str> = self
            .element_classes(id)
            .iter()
            .map(String::as_str)
            .collect();
        tokens.push(class);
        let joined = tokens.join(" ");
        self.set_attr(id, "class", &joined);
    }

    /// Remove a class token if present. The `class` attribute is kept, possibly empty.
    pub fn remove_class(&mut self, id: ArenaNodeId, class: &str) {
        if !self.has_class(id, class) {
            return;
        }
        let joined = self
            .element_classes(id)
            .iter()
            .filter(|c| *c != class)
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(" ");
        self.set_attr(id, "class", &joined);
    }

    /// Check if an element carries a class token.
    pub fn has_class(&self, id: ArenaNodeId, class: &str) -> bool {
        self.element_classes(id).iter().any(|c| c == class)
    }

    /// Get element's id attribute.
    pub fn element_id(&self, id: ArenaNodeId) -> Option<&str> {
        self.get(id).and_then(|n| match &n.data {
            ArenaNodeData::Element { id, .. } => id.as_deref(),
            _ => None,
        })
    }

    /// Get element's classes.
    pub fn element_classes(&self, id: ArenaNodeId) -> &[String] {
        static EMPTY: &[String] = &[];
        self.get(id)
            .and_then(|n| match &n.data {
                ArenaNodeData::Element { classes, .. } => Some(classes.as_slice()),
                _ => None,
            })
            .unwrap_or(EMPTY)
    }

    /// Check if node is an element.
    pub fn is_element(&self, id: ArenaNodeId) -> bool {
        self.get(id)
            .is_some_and(|n| matches!(n.data, ArenaNodeData::Element { .. }))
    }

    /// Check if node is a text node.
    pub fn is_text(&self, id: ArenaNodeId) -> bool {
        self.get(id)
            .is_some_and(|n| matches!(n.data, ArenaNodeData::Text(_)))
    }

    /// Get text content of a text node.
    pub fn text_content(&self, id: ArenaNodeId) -> Option<&str> {
        self.get(id).and_then(|n| match &n.data {
            ArenaNodeData::Text(s) => Some(s.as_str()),
            _ => None,
        })
    }
}

/// Build a QualName in the HTML namespace.
pub fn html_name(local: &str) -> QualName {
    QualName::new(None, ns!(html), LocalName::from(local))
}

fn extract_id_and_classes(attrs: &[Attribute]) -> (Option<String>, Vec<String>) {
    let mut id = None;
    let mut classes = Vec::new();

    for attr in attrs {
        if attr.name.local.as_ref() == "id" {
            id = Some(attr.value.clone());
        } else if attr.name.local.as_ref() == "class" {
            classes = attr
                .value
                .split_whitespace()
                .map(|s| s.to_string())
                .collect();
        }
    }

    (id, classes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_elements() {
        let mut dom = ArenaDom::new();

        let div = dom.create_html_element("div", vec![Attribute::new("id", "main")]);
        dom.append(dom.document(), div);

        assert_eq!(dom.element_name(div).unwrap().as_ref(), "div");
        assert_eq!(dom.element_id(div), Some("main"));
        assert_eq!(dom.get_by_id("main"), Some(div));
    }

    #[test]
    fn test_append_children() {
        let mut dom = ArenaDom::new();

        let parent = dom.create_html_element("div", vec![]);
        let child1 = dom.create_html_element("p", vec![]);
        let child2 = dom.create_html_element("p", vec![]);

        dom.append(dom.document(), parent);
        dom.append(parent, child1);
        dom.append(parent, child2);

        let children: Vec<_> = dom.children(parent).collect();
        assert_eq!(children, vec![child1, child2]);
    }

    #[test]
    fn test_text_merging() {
        let mut dom = ArenaDom::new();

        let p = dom.create_html_element("p", vec![]);
        dom.append(dom.document(), p);

        dom.append_text(p, "Hello, ");
        dom.append_text(p, "World!");

        let children: Vec<_> = dom.children(p).collect();
        assert_eq!(children.len(), 1);
        assert_eq!(dom.text_content(children[0]), Some("Hello, World!"));
    }

    #[test]
    fn test_detach_middle_child() {
        let mut dom = ArenaDom::new();
        let ul = dom.create_html_element("ul", vec![]);
        dom.append(dom.document(), ul);
        let a = dom.create_html_element("li", vec![]);
        let b = dom.create_html_element("li", vec![]);
        let c = dom.create_html_element("li", vec![]);
        dom.append(ul, a);
        dom.append(ul, b);
        dom.append(ul, c);

        dom.detach(b);

        assert_eq!(dom.children(ul).collect::<Vec<_>>(), vec![a, c]);
        assert!(!dom.is_attached(b));
        assert!(dom.is_attached(c));
    }

    #[test]
    fn test_detach_only_child_clears_parent() {
        let mut dom = ArenaDom::new();
        let div = dom.create_html_element("div", vec![]);
        dom.append(dom.document(), div);
        let span = dom.create_html_element("span", vec![]);
        dom.append(div, span);

        dom.detach(span);

        assert_eq!(dom.children(div).count(), 0);
        let node = dom.get(div).unwrap();
        assert!(node.first_child.is_none());
        assert!(node.last_child.is_none());
    }

    #[test]
    fn test_replace_keeps_position() {
        let mut dom = ArenaDom::new();
        let p = dom.create_html_element("p", vec![]);
        dom.append(dom.document(), p);
        let first = dom.create_text("a".to_string());
        let old = dom.create_html_element("tt", vec![]);
        let last = dom.create_text("b".to_string());
        dom.append(p, first);
        dom.append(p, old);
        dom.append(p, last);

        let new_node = dom.create_html_element("code", vec![]);
        dom.replace(old, new_node);

        assert_eq!(dom.children(p).collect::<Vec<_>>(), vec![first, new_node, last]);
        assert!(!dom.is_attached(old));
    }

    #[test]
    fn test_move_children_preserves_order() {
        let mut dom = ArenaDom::new();
        let from = dom.create_html_element("div", vec![]);
        let to = dom.create_html_element("div", vec![]);
        dom.append(dom.document(), from);
        dom.append(dom.document(), to);
        let a = dom.create_text("a".to_string());
        let b = dom.create_html_element("b", vec![]);
        dom.append(from, a);
        dom.append(from, b);

        dom.move_children(from, to);

        assert_eq!(dom.children(from).count(), 0);
        assert_eq!(dom.children(to).collect::<Vec<_>>(), vec![a, b]);
    }

    #[test]
    fn test_descendants_document_order() {
        let mut dom = ArenaDom::new();
        let div = dom.create_html_element("div", vec![]);
        let p1 = dom.create_html_element("p", vec![]);
        let span = dom.create_html_element("span", vec![]);
        let p2 = dom.create_html_element("p", vec![]);
        dom.append(dom.document(), div);
        dom.append(div, p1);
        dom.append(p1, span);
        dom.append(div, p2);

        let order: Vec<_> = dom.descendants(dom.document()).collect();
        assert_eq!(order, vec![div, p1, span, p2]);
    }

    #[test]
    fn test_set_attr_updates_caches() {
        let mut dom = ArenaDom::new();
        let div = dom.create_html_element("div", vec![Attribute::new("id", "old")]);
        dom.append(dom.document(), div);

        dom.set_attr(div, "id", "new");

        assert_eq!(dom.element_id(div), Some("new"));
        assert_eq!(dom.get_by_id("new"), Some(div));
        assert_eq!(dom.get_by_id("old"), None);
        assert_eq!(dom.attrs(div).len(), 1);
    }

    #[test]
    fn test_add_class_no_duplicates() {
        let mut dom = ArenaDom::new();
        let div = dom.create_html_element("div", vec![Attribute::new("class", "exercise")]);

        dom.add_class(div, "tab-pane");
        dom.add_class(div, "exercise");

        assert_eq!(dom.get_attr(div, "class"), Some("exercise tab-pane"));
        assert!(dom.has_class(div, "tab-pane"));
    }

    #[test]
    fn test_remove_class() {
        let mut dom = ArenaDom::new();
        let div = dom.create_html_element("div", vec![Attribute::new("class", "tab-pane active fade")]);

        dom.remove_class(div, "active");
        dom.remove_class(div, "missing");

        assert_eq!(dom.get_attr(div, "class"), Some("tab-pane fade"));
        assert!(!dom.has_class(div, "active"));
    }

    #[test]
    fn test_add_class_ignores_non_elements() {
        let mut dom = ArenaDom::new();
        let text = dom.create_text("x".to_string());

        dom.add_class(text, "active");

        assert!(dom.element_classes(text).is_empty());
    }
}
