//! HTML serialization of the arena DOM via html5ever's serializer.

use std::io;

use html5ever::QualName;
use html5ever::serialize::{Serialize, SerializeOpts, Serializer, TraversalScope, serialize};

use super::arena::{ArenaDom, ArenaNodeData, ArenaNodeId};

/// A node paired with its DOM, serializable by html5ever.
pub struct SerializableNode<'a> {
    dom: &'a ArenaDom,
    id: ArenaNodeId,
}

impl<'a> SerializableNode<'a> {
    pub fn new(dom: &'a ArenaDom, id: ArenaNodeId) -> Self {
        Self { dom, id }
    }
}

enum SerializeOp {
    Open(ArenaNodeId),
    Close(QualName),
}

impl Serialize for SerializableNode<'_> {
    fn serialize<S>(&self, serializer: &mut S, traversal_scope: TraversalScope) -> io::Result<()>
    where
        S: Serializer,
    {
        let dom = self.dom;
        let mut ops: Vec<SerializeOp> = match traversal_scope {
            TraversalScope::IncludeNode => vec![SerializeOp::Open(self.id)],
            TraversalScope::ChildrenOnly(_) => {
                dom.children(self.id).map(SerializeOp::Open).collect()
            }
        };
        // Used as a stack: next op to run is at the end.
        ops.reverse();

        while let Some(op) = ops.pop() {
            match op {
                SerializeOp::Open(id) => {
                    let Some(node) = dom.get(id) else {
                        continue;
                    };
                    match &node.data {
                        ArenaNodeData::Element { name, attrs, .. } => {
                            serializer.start_elem(
                                name.clone(),
                                attrs.iter().map(|a| (&a.name, a.value.as_str())),
                            )?;
                            ops.push(SerializeOp::Close(name.clone()));
                            let start = ops.len();
                            ops.extend(dom.children(id).map(SerializeOp::Open));
                            ops[start..].reverse();
                        }
                        ArenaNodeData::Document => {
                            let start = ops.len();
                            ops.extend(dom.children(id).map(SerializeOp::Open));
                            ops[start..].reverse();
                        }
                        ArenaNodeData::Text(text) => serializer.write_text(text)?,
                        ArenaNodeData::Comment(text) => serializer.write_comment(text)?,
                        ArenaNodeData::Doctype { name, .. } => serializer.write_doctype(name)?,
                    }
                }
                SerializeOp::Close(name) => serializer.end_elem(name)?,
            }
        }

        Ok(())
    }
}

fn to_html(dom: &ArenaDom, id: ArenaNodeId, scope: TraversalScope) -> String {
    let mut bytes = Vec::new();
    let opts = SerializeOpts {
        traversal_scope: scope,
        ..Default::default()
    };
    // Writing into a Vec cannot fail.
    let _ = serialize(&mut bytes, &SerializableNode::new(dom, id), opts);
    String::from_utf8(bytes).unwrap_or_default()
}

impl ArenaDom {
    /// Serialize the whole document, doctype included.
    pub fn to_html(&self) -> String {
        to_html(self, self.document(), TraversalScope::ChildrenOnly(None))
    }

    /// Serialize a node's children (the equivalent of `innerHTML`).
    pub fn inner_html(&self, id: ArenaNodeId) -> String {
        to_html(self, id, TraversalScope::ChildrenOnly(None))
    }

    /// Serialize a node including its own tag (the equivalent of `outerHTML`).
    pub fn outer_html(&self, id: ArenaNodeId) -> String {
        to_html(self, id, TraversalScope::IncludeNode)
    }
}
