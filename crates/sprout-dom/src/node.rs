//! DOM Node
//!
//! Links are stored as [`NodeId`]s with [`NodeId::NONE`] for "absent", which
//! keeps a node to five indices plus its payload.

use std::collections::BTreeMap;

use sprout_core::{EventHandler, PropValue};

use crate::NodeId;

/// DOM Node - Core structure
#[derive(Debug)]
pub struct Node {
    /// Parent node (NONE if detached or root)
    pub parent: NodeId,
    /// First child
    pub first_child: NodeId,
    /// Last child (for O(1) append)
    pub last_child: NodeId,
    /// Previous sibling
    pub prev_sibling: NodeId,
    /// Next sibling
    pub next_sibling: NodeId,
    /// Node-specific data
    pub data: NodeData,
}

impl Node {
    fn with_data(data: NodeData) -> Self {
        Self {
            parent: NodeId::NONE,
            first_child: NodeId::NONE,
            last_child: NodeId::NONE,
            prev_sibling: NodeId::NONE,
            next_sibling: NodeId::NONE,
            data,
        }
    }

    /// Create a new element node
    pub fn element(tag: &str) -> Self {
        Self::with_data(NodeData::Element(ElementData::new(tag)))
    }

    /// Create a new text node
    pub fn text(content: String) -> Self {
        Self::with_data(NodeData::Text(TextData { content }))
    }

    /// Create a document node
    pub fn document() -> Self {
        Self::with_data(NodeData::Document)
    }

    #[inline]
    pub fn is_element(&self) -> bool {
        matches!(self.data, NodeData::Element(_))
    }

    #[inline]
    pub fn is_text(&self) -> bool {
        matches!(self.data, NodeData::Text(_))
    }

    #[inline]
    pub fn as_element(&self) -> Option<&ElementData> {
        match &self.data {
            NodeData::Element(e) => Some(e),
            _ => None,
        }
    }

    #[inline]
    pub fn as_element_mut(&mut self) -> Option<&mut ElementData> {
        match &mut self.data {
            NodeData::Element(e) => Some(e),
            _ => None,
        }
    }

    #[inline]
    pub fn as_text(&self) -> Option<&str> {
        match &self.data {
            NodeData::Text(t) => Some(&t.content),
            _ => None,
        }
    }
}

/// Node-specific data
#[derive(Debug)]
pub enum NodeData {
    /// Document root
    Document,
    Element(ElementData),
    Text(TextData),
}

/// Registered event listener
#[derive(Debug, Clone)]
pub struct Listener {
    pub event: String,
    pub handler: EventHandler,
}

/// Element-specific data
#[derive(Debug)]
pub struct ElementData {
    pub tag: String,
    pub properties: BTreeMap<String, PropValue>,
    pub listeners: Vec<Listener>,
}

impl ElementData {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            properties: BTreeMap::new(),
            listeners: Vec::new(),
        }
    }

    pub fn get_property(&self, name: &str) -> Option<&PropValue> {
        self.properties.get(name)
    }

    /// Listeners for `event`, in registration order
    pub fn listeners_for<'a>(
        &'a self,
        event: &'a str,
    ) -> impl Iterator<Item = &'a EventHandler> + 'a {
        self.listeners
            .iter()
            .filter(move |l| l.event == event)
            .map(|l| &l.handler)
    }
}

/// Text node data
#[derive(Debug)]
pub struct TextData {
    pub content: String,
}
