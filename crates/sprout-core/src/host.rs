//! Host binding
//!
//! The renderer never touches host nodes directly. Everything goes through a
//! [`HostBinding`], which owns the concrete node storage (a DOM, a test
//! recorder, ...) and hands out cloneable node handles.

use std::fmt;

use crate::{EventHandler, HostError, PropValue, Props, CHILDREN};

/// Prefix marking a property as an event listener
pub const EVENT_PREFIX: &str = "on";

/// Host environment primitives used by the renderer
pub trait HostBinding {
    /// Handle to a host node
    type Node: Clone + PartialEq + fmt::Debug;

    /// Create an element node for `tag`
    fn create_node(&mut self, tag: &str) -> Result<Self::Node, HostError>;

    /// Create an empty text node
    fn create_text_node(&mut self) -> Result<Self::Node, HostError>;

    fn set_property(
        &mut self,
        node: &Self::Node,
        name: &str,
        value: &PropValue,
    ) -> Result<(), HostError>;

    fn clear_property(&mut self, node: &Self::Node, name: &str) -> Result<(), HostError>;

    fn add_listener(
        &mut self,
        node: &Self::Node,
        event: &str,
        handler: &EventHandler,
    ) -> Result<(), HostError>;

    fn remove_listener(
        &mut self,
        node: &Self::Node,
        event: &str,
        handler: &EventHandler,
    ) -> Result<(), HostError>;

    fn append_child(&mut self, parent: &Self::Node, child: &Self::Node) -> Result<(), HostError>;

    fn remove_child(&mut self, parent: &Self::Node, child: &Self::Node) -> Result<(), HostError>;
}

/// Property names routed to listener registration
#[inline]
pub fn is_event(name: &str) -> bool {
    name.starts_with(EVENT_PREFIX)
}

/// Property names applied as plain host properties
#[inline]
pub fn is_property(name: &str) -> bool {
    name != CHILDREN && !is_event(name)
}

/// Event type for a listener property: `onClick` -> `click`
pub fn event_type(name: &str) -> String {
    name.strip_prefix(EVENT_PREFIX).unwrap_or(name).to_lowercase()
}

fn changed(prev: &Props, next: &Props, name: &str) -> bool {
    prev.get(name) != next.get(name)
}

/// Bring a host node from `prev` to `next`.
///
/// Stale or changed listeners go first, then removed properties are cleared,
/// added or changed properties are set, and new listeners are attached last.
/// Returns the number of host mutations issued.
pub(crate) fn update_properties<H: HostBinding>(
    host: &mut H,
    node: &H::Node,
    prev: &Props,
    next: &Props,
) -> Result<usize, HostError> {
    let mut mutations = 0;

    for (name, value) in prev.iter().filter(|(k, _)| is_event(k)) {
        if !next.contains_key(name) || changed(prev, next, name) {
            if let Some(handler) = value.as_handler() {
                host.remove_listener(node, &event_type(name), handler)?;
                mutations += 1;
            }
        }
    }

    for name in prev.keys().filter(|k| is_property(k)) {
        if !next.contains_key(name) {
            host.clear_property(node, name)?;
            mutations += 1;
        }
    }

    for (name, value) in next.iter().filter(|(k, _)| is_property(k)) {
        if changed(prev, next, name) {
            host.set_property(node, name, value)?;
            mutations += 1;
        }
    }

    for (name, value) in next.iter().filter(|(k, _)| is_event(k)) {
        if !changed(prev, next, name) {
            continue;
        }
        match value.as_handler() {
            Some(handler) => {
                host.add_listener(node, &event_type(name), handler)?;
                mutations += 1;
            }
            None => tracing::warn!("Ignoring non-handler value for listener property `{}`", name),
        }
    }

    Ok(mutations)
}

/// Detach every listener registered from `props`
pub(crate) fn remove_listeners<H: HostBinding>(
    host: &mut H,
    node: &H::Node,
    props: &Props,
) -> Result<(), HostError> {
    for (name, value) in props.iter().filter(|(k, _)| is_event(k)) {
        if let Some(handler) = value.as_handler() {
            host.remove_listener(node, &event_type(name), handler)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingHost;

    #[test]
    fn test_classification() {
        assert!(is_event("onClick"));
        assert!(!is_property("onClick"));
        assert!(!is_property(CHILDREN));
        assert!(is_property("id"));
        assert_eq!(event_type("onClick"), "click");
        assert_eq!(event_type("oninput"), "input");
    }

    #[test]
    fn test_update_properties_order() {
        let mut host = RecordingHost::default();
        let node = host.create_node("div").unwrap();
        let old_click = EventHandler::new(|_| {});
        let new_click = EventHandler::new(|_| {});

        let mut prev = Props::new();
        prev.insert("id".into(), "a".into());
        prev.insert("title".into(), "t".into());
        prev.insert("onClick".into(), old_click.into());

        let mut next = Props::new();
        next.insert("id".into(), "b".into());
        next.insert("onClick".into(), new_click.into());

        host.log.clear();
        let count = update_properties(&mut host, &node, &prev, &next).unwrap();

        assert_eq!(count, 4);
        assert_eq!(
            host.log,
            vec![
                "remove_listener 0 click",
                "clear 0 title",
                "set 0 id=b",
                "add_listener 0 click",
            ]
        );
    }

    #[test]
    fn test_update_properties_noop() {
        let mut host = RecordingHost::default();
        let node = host.create_node("div").unwrap();
        let click = EventHandler::new(|_| {});

        let mut props = Props::new();
        props.insert("id".into(), "a".into());
        props.insert("onClick".into(), click.into());

        host.log.clear();
        assert_eq!(update_properties(&mut host, &node, &props, &props.clone()).unwrap(), 0);
        assert!(host.log.is_empty());
    }
}
