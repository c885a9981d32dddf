//! Renderer driving the in-memory DOM
//!
//! Exercises the host binding end to end through `sprout_core::Renderer`.

use sprout_core::{Element, Renderer};
use sprout_dom::{DomTree, MutationRecord, NodeId};

fn mount(element: Element) -> (Renderer<DomTree>, NodeId) {
    let mut dom = DomTree::with_mutation_log();
    let container = dom.create_element("main");
    dom.append_child(dom.root(), container).unwrap();
    dom.take_mutations();

    let mut renderer = Renderer::new(dom);
    renderer.render(element, container);
    renderer.flush().unwrap();
    (renderer, container)
}

#[test]
fn test_mount_serializes() {
    let (renderer, container) = mount(
        Element::new("ul")
            .prop("class", "list")
            .children(["one", "two"].map(|t| Element::new("li").child(t))),
    );

    assert_eq!(
        renderer.host().inner_markup(container),
        "<ul class=\"list\"><li>one</li><li>two</li></ul>"
    );
}

#[test]
fn test_property_removal_and_change() {
    let (mut renderer, container) =
        mount(Element::new("p").prop("id", "a").prop("title", "t").child("x"));
    renderer.host_mut().take_mutations();

    renderer.render(Element::new("p").prop("id", "b").child("y"), container);
    renderer.flush().unwrap();

    let p = renderer.host().find_by_tag(container, "p").unwrap();
    let text = renderer.host().child_ids(p)[0];
    let mutations = renderer.host_mut().take_mutations();
    assert_eq!(
        mutations,
        vec![
            MutationRecord::PropertyCleared { node: p, name: "title".into() },
            MutationRecord::PropertySet { node: p, name: "id".into() },
            MutationRecord::TextChanged { node: text },
        ]
    );
    assert_eq!(renderer.host().inner_markup(container), "<p id=\"b\">y</p>");
}

#[test]
fn test_shrinking_list_removes_tail() {
    let list = |n: i32| Element::new("ul").children((0..n).map(|i| Element::new("li").child(i)));
    let (mut renderer, container) = mount(list(4));
    let ul = renderer.host().find_by_tag(container, "ul").unwrap();
    let before = renderer.host().child_ids(ul);
    let allocated = renderer.host().len();

    renderer.render(list(2), container);
    renderer.flush().unwrap();

    assert_eq!(renderer.host().child_ids(ul), before[..2].to_vec());
    assert!(!renderer.host().is_connected(before[2]));
    assert!(!renderer.host().is_connected(before[3]));
    // Detached nodes keep their slots.
    assert_eq!(renderer.host().len(), allocated);
    assert_eq!(renderer.host().tag_name(before[3]), Some("li"));
}

#[test]
fn test_invalid_tag_aborts_render() {
    let (mut renderer, container) = mount(Element::new("div").child("kept"));

    renderer.render(Element::new("div").child(Element::new("bad tag")), container);
    assert!(renderer.flush().is_err());

    assert_eq!(renderer.host().inner_markup(container), "<div>kept</div>");
}
