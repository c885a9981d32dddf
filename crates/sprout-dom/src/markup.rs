//! HTML-like serialization

use std::fmt::Write;

use sprout_core::PropValue;

use crate::{DomTree, NodeData, NodeId};

fn escape(text: &str, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            c => out.push(c),
        }
    }
}

impl DomTree {
    /// Serialize `id` and its subtree. Properties render as attributes in
    /// name order; listeners are omitted.
    pub fn to_markup(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.write_markup(id, &mut out);
        out
    }

    /// Serialize only the children of `id`
    pub fn inner_markup(&self, id: NodeId) -> String {
        let mut out = String::new();
        for (child, _) in self.children(id) {
            self.write_markup(child, &mut out);
        }
        out
    }

    fn write_markup(&self, id: NodeId, out: &mut String) {
        let Some(node) = self.get(id) else { return };
        match &node.data {
            NodeData::Document => {
                for (child, _) in self.children(id) {
                    self.write_markup(child, out);
                }
            }
            NodeData::Text(text) => escape(&text.content, out),
            NodeData::Element(element) => {
                out.push('<');
                out.push_str(&element.tag);
                for (name, value) in &element.properties {
                    match value {
                        PropValue::Handler(_) => continue,
                        PropValue::Bool(false) => continue,
                        PropValue::Bool(true) => {
                            let _ = write!(out, " {name}");
                        }
                        other => {
                            let _ = write!(out, " {name}=\"");
                            escape(&other.to_string(), out);
                            out.push('"');
                        }
                    }
                }
                out.push('>');
                for (child, _) in self.children(id) {
                    self.write_markup(child, out);
                }
                let _ = write!(out, "</{}>", element.tag);
            }
        }
    }
}
