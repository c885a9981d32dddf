//! Recording host used by the unit tests

use std::collections::BTreeMap;

use crate::{EventHandler, HostBinding, HostError, PropValue};

#[derive(Debug, Default)]
pub(crate) struct FakeNode {
    pub tag: String,
    pub parent: Option<usize>,
    pub children: Vec<usize>,
    pub props: BTreeMap<String, String>,
    pub listeners: Vec<(String, EventHandler)>,
}

/// Host that keeps nodes in a vector and logs every call
#[derive(Debug, Default)]
pub(crate) struct RecordingHost {
    pub nodes: Vec<FakeNode>,
    pub log: Vec<String>,
}

impl RecordingHost {
    pub fn with_container() -> (Self, usize) {
        let mut host = Self::default();
        let root = host.push("#container");
        (host, root)
    }

    fn push(&mut self, tag: &str) -> usize {
        self.nodes.push(FakeNode {
            tag: tag.to_string(),
            ..Default::default()
        });
        self.nodes.len() - 1
    }

    /// `tag(child,child)` rendering of the subtree below `node`
    pub fn shape(&self, node: usize) -> String {
        let n = &self.nodes[node];
        let label = match n.props.get("nodeValue") {
            Some(text) if n.tag == "#text" => format!("'{text}'"),
            _ => n.tag.clone(),
        };
        if n.children.is_empty() {
            return label;
        }
        let kids: Vec<String> = n.children.iter().map(|c| self.shape(*c)).collect();
        format!("{label}({})", kids.join(","))
    }

    pub fn listener_count(&self, node: usize) -> usize {
        self.nodes[node].listeners.len()
    }

    pub fn clear_log(&mut self) {
        self.log.clear();
    }
}

impl HostBinding for RecordingHost {
    type Node = usize;

    fn create_node(&mut self, tag: &str) -> Result<usize, HostError> {
        if tag == "fail" {
            return Err(HostError::Create {
                tag: tag.to_string(),
                reason: "refused by test host".to_string(),
            });
        }
        let id = self.push(tag);
        self.log.push(format!("create {id} {tag}"));
        Ok(id)
    }

    fn create_text_node(&mut self) -> Result<usize, HostError> {
        let id = self.push("#text");
        self.log.push(format!("create {id} #text"));
        Ok(id)
    }

    fn set_property(
        &mut self,
        node: &usize,
        name: &str,
        value: &PropValue,
    ) -> Result<(), HostError> {
        self.nodes[*node].props.insert(name.to_string(), value.to_string());
        self.log.push(format!("set {node} {name}={value}"));
        Ok(())
    }

    fn clear_property(&mut self, node: &usize, name: &str) -> Result<(), HostError> {
        self.nodes[*node].props.remove(name);
        self.log.push(format!("clear {node} {name}"));
        Ok(())
    }

    fn add_listener(
        &mut self,
        node: &usize,
        event: &str,
        handler: &EventHandler,
    ) -> Result<(), HostError> {
        self.nodes[*node].listeners.push((event.to_string(), handler.clone()));
        self.log.push(format!("add_listener {node} {event}"));
        Ok(())
    }

    fn remove_listener(
        &mut self,
        node: &usize,
        event: &str,
        handler: &EventHandler,
    ) -> Result<(), HostError> {
        self.nodes[*node]
            .listeners
            .retain(|(e, h)| !(e == event && h.ptr_eq(handler)));
        self.log.push(format!("remove_listener {node} {event}"));
        Ok(())
    }

    fn append_child(&mut self, parent: &usize, child: &usize) -> Result<(), HostError> {
        if self.nodes[*child].tag == "reject-append" {
            return Err(HostError::Operation {
                op: "append_child",
                reason: "refused by test host".to_string(),
            });
        }
        self.nodes[*parent].children.push(*child);
        self.nodes[*child].parent = Some(*parent);
        self.log.push(format!("append {parent} {child}"));
        Ok(())
    }

    fn remove_child(&mut self, parent: &usize, child: &usize) -> Result<(), HostError> {
        let kids = &mut self.nodes[*parent].children;
        let Some(pos) = kids.iter().position(|c| c == child) else {
            return Err(HostError::Operation {
                op: "remove_child",
                reason: format!("{child} is not a child of {parent}"),
            });
        };
        kids.remove(pos);
        self.nodes[*child].parent = None;
        self.log.push(format!("remove {parent} {child}"));
        Ok(())
    }
}
