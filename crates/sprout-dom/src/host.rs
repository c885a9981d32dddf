//! Host binding for the in-memory DOM

use sprout_core::{EventHandler, HostBinding, HostError, PropValue, NODE_VALUE};

use crate::{DomError, DomTree, Listener, MutationRecord, NodeData, NodeId};

fn valid_tag(tag: &str) -> bool {
    !tag.is_empty()
        && tag
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == ':')
}

impl DomTree {
    fn element_mut(&mut self, node: NodeId) -> Result<&mut crate::ElementData, DomError> {
        self.get_mut(node)
            .ok_or(DomError::NotFound(node))?
            .as_element_mut()
            .ok_or(DomError::InvalidNodeType)
    }
}

impl HostBinding for DomTree {
    type Node = NodeId;

    fn create_node(&mut self, tag: &str) -> Result<NodeId, HostError> {
        if !valid_tag(tag) {
            return Err(DomError::InvalidTagName(tag.to_string()).into());
        }
        Ok(self.create_element(tag))
    }

    fn create_text_node(&mut self) -> Result<NodeId, HostError> {
        Ok(self.create_text(""))
    }

    fn set_property(
        &mut self,
        node: &NodeId,
        name: &str,
        value: &PropValue,
    ) -> Result<(), HostError> {
        let target = self.get_mut(*node).ok_or(DomError::NotFound(*node))?;
        match &mut target.data {
            NodeData::Text(text) if name == NODE_VALUE => {
                text.content = value.to_string();
                self.record(MutationRecord::TextChanged { node: *node });
            }
            NodeData::Element(element) => {
                element.properties.insert(name.to_string(), value.clone());
                self.record(MutationRecord::PropertySet {
                    node: *node,
                    name: name.to_string(),
                });
            }
            _ => return Err(DomError::InvalidNodeType.into()),
        }
        Ok(())
    }

    fn clear_property(&mut self, node: &NodeId, name: &str) -> Result<(), HostError> {
        let target = self.get_mut(*node).ok_or(DomError::NotFound(*node))?;
        match &mut target.data {
            NodeData::Text(text) if name == NODE_VALUE => {
                text.content.clear();
                self.record(MutationRecord::TextChanged { node: *node });
            }
            NodeData::Element(element) => {
                element.properties.remove(name);
                self.record(MutationRecord::PropertyCleared {
                    node: *node,
                    name: name.to_string(),
                });
            }
            _ => return Err(DomError::InvalidNodeType.into()),
        }
        Ok(())
    }

    fn add_listener(
        &mut self,
        node: &NodeId,
        event: &str,
        handler: &EventHandler,
    ) -> Result<(), HostError> {
        self.element_mut(*node)?.listeners.push(Listener {
            event: event.to_string(),
            handler: handler.clone(),
        });
        self.record(MutationRecord::ListenerAdded {
            node: *node,
            event: event.to_string(),
        });
        Ok(())
    }

    fn remove_listener(
        &mut self,
        node: &NodeId,
        event: &str,
        handler: &EventHandler,
    ) -> Result<(), HostError> {
        let listeners = &mut self.element_mut(*node)?.listeners;
        let before = listeners.len();
        listeners.retain(|l| !(l.event == event && l.handler.ptr_eq(handler)));
        if listeners.len() != before {
            self.record(MutationRecord::ListenerRemoved {
                node: *node,
                event: event.to_string(),
            });
        }
        Ok(())
    }

    fn append_child(&mut self, parent: &NodeId, child: &NodeId) -> Result<(), HostError> {
        Ok(DomTree::append_child(self, *parent, *child)?)
    }

    fn remove_child(&mut self, parent: &NodeId, child: &NodeId) -> Result<(), HostError> {
        Ok(DomTree::remove_child(self, *parent, *child)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sprout_core::Event;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn test_invalid_tag_is_a_create_error() {
        let mut tree = DomTree::new();
        let err = tree.create_node("not a tag").unwrap_err();
        assert!(matches!(err, HostError::Create { .. }));
        assert!(tree.create_node("my-widget").is_ok());
    }

    #[test]
    fn test_text_node_value() {
        let mut tree = DomTree::with_mutation_log();
        let text = tree.create_text_node().unwrap();
        tree.set_property(&text, NODE_VALUE, &PropValue::Number(2.0)).unwrap();

        assert_eq!(tree.text_content(text), "2");
        assert_eq!(tree.take_mutations(), vec![MutationRecord::TextChanged { node: text }]);
        assert!(tree.set_property(&text, "id", &"x".into()).is_err());
    }

    #[test]
    fn test_listener_roundtrip_and_dispatch() {
        let mut tree = DomTree::new();
        let outer = tree.create_node("div").unwrap();
        let button = tree.create_node("button").unwrap();
        DomTree::append_child(&mut tree, outer, button).unwrap();

        let hits = Rc::new(Cell::new(0));
        let counter = Rc::clone(&hits);
        let handler = EventHandler::new(move |_| counter.set(counter.get() + 1));
        tree.add_listener(&button, "click", &handler).unwrap();
        tree.add_listener(&outer, "click", &handler).unwrap();

        assert_eq!(tree.dispatch_event(button, &Event::new("click")), 2);
        assert_eq!(tree.dispatch_event(button, &Event::new("keydown")), 0);
        assert_eq!(hits.get(), 2);

        tree.remove_listener(&button, "click", &handler).unwrap();
        assert_eq!(tree.listener_count(button), 0);
        assert_eq!(tree.listener_count(outer), 1);
    }
}
