//! Element descriptions
//!
//! Immutable description nodes handed to the renderer. An [`Element`] is a
//! reference-counted handle, so cloning one (or a whole subtree) is cheap.

use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use crate::hooks::RenderScope;

/// Property holding the content of a text element
pub const NODE_VALUE: &str = "nodeValue";

/// Reserved property name for the child list; never applied to host nodes
pub const CHILDREN: &str = "children";

/// Ordered property map
pub type Props = BTreeMap<String, PropValue>;

/// Event delivered to listeners
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    /// Event type, e.g. `click`
    pub event_type: String,
    /// Payload for value-carrying events such as `input`
    pub value: Option<String>,
}

impl Event {
    pub fn new(event_type: impl Into<String>) -> Self {
        Self {
            event_type: event_type.into(),
            value: None,
        }
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }
}

/// Event listener closure
///
/// Handlers compare by identity: two handlers are equal only if they are
/// clones of the same closure.
#[derive(Clone)]
pub struct EventHandler(Rc<dyn Fn(&Event)>);

impl EventHandler {
    pub fn new(f: impl Fn(&Event) + 'static) -> Self {
        Self(Rc::new(f))
    }

    pub fn call(&self, event: &Event) {
        (self.0)(event)
    }

    pub fn ptr_eq(&self, other: &EventHandler) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl PartialEq for EventHandler {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Debug for EventHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EventHandler({:p})", Rc::as_ptr(&self.0) as *const ())
    }
}

/// Property value
#[derive(Debug, Clone, PartialEq)]
pub enum PropValue {
    Str(String),
    Number(f64),
    Bool(bool),
    Handler(EventHandler),
}

impl PropValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropValue::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_handler(&self) -> Option<&EventHandler> {
        match self {
            PropValue::Handler(h) => Some(h),
            _ => None,
        }
    }
}

impl fmt::Display for PropValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropValue::Str(s) => f.write_str(s),
            PropValue::Number(n) if n.fract() == 0.0 && n.is_finite() => write!(f, "{}", *n as i64),
            PropValue::Number(n) => write!(f, "{n}"),
            PropValue::Bool(b) => write!(f, "{b}"),
            PropValue::Handler(_) => f.write_str("[handler]"),
        }
    }
}

impl From<&str> for PropValue {
    fn from(s: &str) -> Self {
        PropValue::Str(s.to_string())
    }
}

impl From<String> for PropValue {
    fn from(s: String) -> Self {
        PropValue::Str(s)
    }
}

impl From<bool> for PropValue {
    fn from(b: bool) -> Self {
        PropValue::Bool(b)
    }
}

impl From<f64> for PropValue {
    fn from(n: f64) -> Self {
        PropValue::Number(n)
    }
}

impl From<i32> for PropValue {
    fn from(n: i32) -> Self {
        PropValue::Number(n.into())
    }
}

impl From<i64> for PropValue {
    fn from(n: i64) -> Self {
        PropValue::Number(n as f64)
    }
}

impl From<EventHandler> for PropValue {
    fn from(h: EventHandler) -> Self {
        PropValue::Handler(h)
    }
}

type RenderFn = dyn Fn(&mut RenderScope<'_>, &Props) -> Element;

/// Function component
///
/// Identity is the render closure allocation: clone a `Component` to reuse it
/// across renders, otherwise the reconciler sees a different kind.
#[derive(Clone)]
pub struct Component {
    name: Rc<str>,
    render: Rc<RenderFn>,
}

impl Component {
    pub fn new<F>(name: &str, render: F) -> Self
    where
        F: Fn(&mut RenderScope<'_>, &Props) -> Element + 'static,
    {
        Self {
            name: Rc::from(name),
            render: Rc::new(render),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Same render function
    pub fn same(&self, other: &Component) -> bool {
        Rc::ptr_eq(&self.render, &other.render)
    }

    pub(crate) fn render(&self, scope: &mut RenderScope<'_>, props: &Props) -> Element {
        (self.render)(scope, props)
    }
}

impl fmt::Debug for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Component").field("name", &self.name).finish()
    }
}

/// What an element describes
#[derive(Debug, Clone)]
pub enum ElementKind {
    Text,
    Tagged(String),
    Component(Component),
}

impl ElementKind {
    /// Identity key used by the reconciler
    pub fn same_kind(&self, other: &ElementKind) -> bool {
        match (self, other) {
            (ElementKind::Text, ElementKind::Text) => true,
            (ElementKind::Tagged(a), ElementKind::Tagged(b)) => a == b,
            (ElementKind::Component(a), ElementKind::Component(b)) => a.same(b),
            _ => false,
        }
    }
}

impl From<&str> for ElementKind {
    fn from(tag: &str) -> Self {
        ElementKind::Tagged(tag.to_string())
    }
}

impl From<String> for ElementKind {
    fn from(tag: String) -> Self {
        ElementKind::Tagged(tag)
    }
}

impl From<Component> for ElementKind {
    fn from(c: Component) -> Self {
        ElementKind::Component(c)
    }
}

impl From<&Component> for ElementKind {
    fn from(c: &Component) -> Self {
        ElementKind::Component(c.clone())
    }
}

#[derive(Debug, Clone)]
struct ElementData {
    kind: ElementKind,
    props: Props,
    children: Vec<Element>,
}

/// Immutable element description
#[derive(Debug, Clone)]
pub struct Element(Rc<ElementData>);

impl Element {
    pub fn new(kind: impl Into<ElementKind>) -> Self {
        Self(Rc::new(ElementData {
            kind: kind.into(),
            props: Props::new(),
            children: Vec::new(),
        }))
    }

    /// Text element carrying `value` as its `nodeValue`
    pub fn text(value: impl Into<String>) -> Self {
        let mut props = Props::new();
        props.insert(NODE_VALUE.to_string(), PropValue::Str(value.into()));
        Self(Rc::new(ElementData {
            kind: ElementKind::Text,
            props,
            children: Vec::new(),
        }))
    }

    /// Set a property
    pub fn prop(mut self, name: impl Into<String>, value: impl Into<PropValue>) -> Self {
        Rc::make_mut(&mut self.0).props.insert(name.into(), value.into());
        self
    }

    /// Register a listener for `event` (stored under the `on` prefix)
    pub fn on(self, event: &str, handler: impl Fn(&Event) + 'static) -> Self {
        self.prop(format!("on{event}"), EventHandler::new(handler))
    }

    /// Append a child; literals become text elements
    pub fn child(mut self, child: impl Into<Element>) -> Self {
        Rc::make_mut(&mut self.0).children.push(child.into());
        self
    }

    pub fn children<I>(mut self, children: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Element>,
    {
        Rc::make_mut(&mut self.0)
            .children
            .extend(children.into_iter().map(Into::into));
        self
    }

    pub fn kind(&self) -> &ElementKind {
        &self.0.kind
    }

    pub fn props(&self) -> &Props {
        &self.0.props
    }

    pub fn child_elements(&self) -> &[Element] {
        &self.0.children
    }

    pub fn node_value(&self) -> Option<&str> {
        self.0.props.get(NODE_VALUE).and_then(PropValue::as_str)
    }

    pub fn ptr_eq(&self, other: &Element) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl From<&str> for Element {
    fn from(s: &str) -> Self {
        Element::text(s)
    }
}

impl From<String> for Element {
    fn from(s: String) -> Self {
        Element::text(s)
    }
}

impl From<&String> for Element {
    fn from(s: &String) -> Self {
        Element::text(s.as_str())
    }
}

impl From<i32> for Element {
    fn from(n: i32) -> Self {
        Element::text(n.to_string())
    }
}

impl From<i64> for Element {
    fn from(n: i64) -> Self {
        Element::text(n.to_string())
    }
}

impl From<u32> for Element {
    fn from(n: u32) -> Self {
        Element::text(n.to_string())
    }
}

impl From<usize> for Element {
    fn from(n: usize) -> Self {
        Element::text(n.to_string())
    }
}

impl From<f64> for Element {
    fn from(n: f64) -> Self {
        Element::text(PropValue::Number(n).to_string())
    }
}

/// Build an element from a kind, a property list and children
pub fn create_element<K, P, N, V, C>(kind: K, props: P, children: C) -> Element
where
    K: Into<ElementKind>,
    P: IntoIterator<Item = (N, V)>,
    N: Into<String>,
    V: Into<PropValue>,
    C: IntoIterator,
    C::Item: Into<Element>,
{
    let mut element = Element::new(kind);
    for (name, value) in props {
        element = element.prop(name, value);
    }
    element.children(children)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literals_become_text() {
        let el = Element::new("p").child("hi").child(3);
        let kids = el.child_elements();

        assert_eq!(kids.len(), 2);
        assert!(matches!(kids[0].kind(), ElementKind::Text));
        assert_eq!(kids[0].node_value(), Some("hi"));
        assert_eq!(kids[1].node_value(), Some("3"));
        assert!(kids[0].child_elements().is_empty());
    }

    #[test]
    fn test_create_element() {
        let el = create_element(
            "div",
            [("id", "foo")],
            [Element::new("a").child("bar"), Element::new("b")],
        );

        assert!(matches!(el.kind(), ElementKind::Tagged(t) if t == "div"));
        assert_eq!(el.props().get("id"), Some(&PropValue::from("foo")));
        assert_eq!(el.child_elements().len(), 2);
    }

    #[test]
    fn test_builder_does_not_mutate_shared_clone() {
        let base = Element::new("div");
        let shared = base.clone();
        let extended = base.child("x");

        assert!(shared.child_elements().is_empty());
        assert_eq!(extended.child_elements().len(), 1);
    }

    #[test]
    fn test_kind_identity() {
        let counter = Component::new("Counter", |_, _| Element::new("div"));
        let twin = Component::new("Counter", |_, _| Element::new("div"));

        assert!(ElementKind::from(&counter).same_kind(&ElementKind::from(counter.clone())));
        assert!(!ElementKind::from(&counter).same_kind(&ElementKind::from(&twin)));
        assert!(ElementKind::from("a").same_kind(&ElementKind::from("a")));
        assert!(!ElementKind::from("a").same_kind(&ElementKind::Text));
    }

    #[test]
    fn test_handler_equality_is_identity() {
        let h = EventHandler::new(|_| {});
        assert_eq!(PropValue::Handler(h.clone()), PropValue::Handler(h));
        assert_ne!(
            PropValue::Handler(EventHandler::new(|_| {})),
            PropValue::Handler(EventHandler::new(|_| {}))
        );
    }

    #[test]
    fn test_number_display() {
        assert_eq!(PropValue::Number(2.0).to_string(), "2");
        assert_eq!(PropValue::Number(2.5).to_string(), "2.5");
    }
}
