//! Tests for LayoutParser: tree construction and round-trip serialization.

use std::sync::Arc;

use rstest::{fixture, rstest};
use serde_json::{json, Value};

use jslayout::util::testing::init_test_setup;
use jslayout::{
    Attributes, Component, ComponentFactory, ComponentKind, LayoutError, LayoutParser,
    VIRTUAL_ROOT_NAME,
};

#[fixture]
fn checkout_layout() -> Value {
    init_test_setup();
    json!({
        "components": {
            "checkout": {
                "component": "uiComponent",
                "provider": "checkoutProvider",
                "children": {
                    "steps": {
                        "component": "uiComponent",
                        "sortOrder": "10",
                        "children": {
                            "shipping-step": {
                                "component": "uiComponent",
                                "label": "Shipping",
                                "validation": { "required-entry": true }
                            },
                            "billing-step": {
                                "component": "uiComponent",
                                "visible": false
                            }
                        }
                    },
                    "sidebar": {
                        "component": "uiComponent",
                        "displayArea": "summary",
                        "config": { "template": "checkout/sidebar" }
                    }
                }
            },
            "messages": {
                "component": "uiMessages",
                "deps": ["checkout"]
            }
        }
    })
}

// ============================================================
// Root selection
// ============================================================

#[rstest]
fn given_no_root_component_when_parsing_then_virtual_root_spans_top_level(
    checkout_layout: Value,
) {
    let tree = LayoutParser::new().parse(checkout_layout, None).unwrap();

    let root_id = tree.root().unwrap();
    let root = tree.get(root_id).unwrap();
    assert_eq!(root.name(), VIRTUAL_ROOT_NAME);
    assert!(root.is_virtual());
    assert_eq!(tree.child_names(root_id), vec!["checkout", "messages"]);
}

#[rstest]
fn given_root_component_when_parsing_then_tree_rooted_there(checkout_layout: Value) {
    let tree = LayoutParser::new()
        .parse(checkout_layout, Some("checkout"))
        .unwrap();

    let root_id = tree.root().unwrap();
    let root = tree.get(root_id).unwrap();
    assert_eq!(root.name(), "checkout");
    assert!(!root.is_virtual());
    assert_eq!(root.attributes().provider(), Some("checkoutProvider"));
    assert_eq!(tree.child_names(root_id), vec!["steps", "sidebar"]);
}

#[rstest]
fn given_unknown_root_component_when_parsing_then_missing_root_error(checkout_layout: Value) {
    let err = LayoutParser::new()
        .parse(checkout_layout, Some("cart"))
        .unwrap_err();

    assert!(matches!(err, LayoutError::MissingRootComponent(name) if name == "cart"));
}

// ============================================================
// Malformed input
// ============================================================

#[rstest]
#[case(json!([]))]
#[case(json!({ "layout": {} }))]
#[case(json!({ "components": [] }))]
#[case(json!({ "components": { "a": "not-an-object" } }))]
#[case(json!({ "components": { "a": { "children": [] } } }))]
#[case(json!({ "components": { "a": { "children": { "b": 5 } } } }))]
fn given_malformed_layout_when_parsing_then_malformed_error(#[case] layout: Value) {
    let err = LayoutParser::new().parse(layout, None).unwrap_err();
    assert!(matches!(err, LayoutError::MalformedLayout { .. }));
}

#[rstest]
fn given_wrongly_typed_attribute_when_parsing_then_invalid_attributes_error() {
    let layout = json!({
        "components": {
            "bad": { "visible": "yes" }
        }
    });

    let err = LayoutParser::new().parse(layout, None).unwrap_err();

    assert!(matches!(
        err,
        LayoutError::InvalidAttributes { component, .. } if component == "bad"
    ));
}

// ============================================================
// Round-trip serialization
// ============================================================

#[rstest]
fn given_named_root_when_serializing_then_reproduces_input_subtree(checkout_layout: Value) {
    let expected = checkout_layout["components"]["checkout"].clone();

    let tree = LayoutParser::new()
        .parse(checkout_layout, Some("checkout"))
        .unwrap();
    let serialized = tree.to_map(tree.root().unwrap()).unwrap();

    assert_eq!(Value::Object(serialized), expected);
}

#[rstest]
fn given_virtual_root_when_serializing_then_no_wrapper_appears(checkout_layout: Value) {
    let expected = checkout_layout["components"].clone();

    let tree = LayoutParser::new().parse(checkout_layout, None).unwrap();
    let serialized = tree.to_map(tree.root().unwrap()).unwrap();

    assert_eq!(Value::Object(serialized), expected);
}

#[rstest]
fn given_children_when_serializing_then_insertion_order_is_kept(checkout_layout: Value) {
    let tree = LayoutParser::new()
        .parse(checkout_layout, Some("checkout"))
        .unwrap();

    let serialized = tree.to_map(tree.root().unwrap()).unwrap();
    let children = serialized["children"].as_object().unwrap();
    let order: Vec<&str> = children.keys().map(String::as_str).collect();
    assert_eq!(order, vec!["steps", "sidebar"]);

    let steps = children["steps"].as_object().unwrap();
    let step_order: Vec<&str> = steps["children"].as_object().unwrap().keys().map(String::as_str).collect();
    assert_eq!(step_order, vec!["shipping-step", "billing-step"]);
}

#[rstest]
fn given_childless_component_when_serializing_then_children_key_absent(checkout_layout: Value) {
    let tree = LayoutParser::new()
        .parse(checkout_layout, Some("checkout"))
        .unwrap();
    let root = tree.root().unwrap();
    let sidebar = tree.nested_child(root, "sidebar").unwrap();

    let serialized = tree.to_map(sidebar).unwrap();

    assert!(!serialized.contains_key("children"));
    assert_eq!(serialized["displayArea"], json!("summary"));
}

#[rstest]
fn given_empty_components_when_parsing_virtual_then_serializes_to_empty_map() {
    let tree = LayoutParser::new()
        .parse(json!({ "components": {} }), None)
        .unwrap();

    let root = tree.root().unwrap();
    assert!(!tree.get(root).unwrap().has_children());
    assert!(tree.to_map(root).unwrap().is_empty());
}

#[rstest]
fn given_unrecognized_attributes_when_round_tripping_then_passed_through(
    checkout_layout: Value,
) {
    let tree = LayoutParser::new().parse(checkout_layout, None).unwrap();
    let root = tree.root().unwrap();
    let messages = tree.nested_child(root, "messages").unwrap();

    let attributes = tree.get(messages).unwrap().attributes();
    assert_eq!(attributes.get("deps"), Some(json!(["checkout"])));

    let serialized = tree.to_map(messages).unwrap();
    assert_eq!(serialized["deps"], json!(["checkout"]));
}

#[rstest]
fn given_mutated_tree_when_serializing_then_changes_are_reflected(checkout_layout: Value) {
    let mut tree = LayoutParser::new()
        .parse(checkout_layout, Some("checkout"))
        .unwrap();
    let root = tree.root().unwrap();

    tree.move_nested_child(root, "steps.shipping-step", "sidebar")
        .unwrap();
    tree.remove_nested_child(root, "steps.billing-step").unwrap();

    let serialized = tree.to_map(root).unwrap();
    let children = serialized["children"].as_object().unwrap();
    // steps lost both children and serializes as a leaf again
    assert!(!children["steps"].as_object().unwrap().contains_key("children"));
    assert_eq!(
        children["sidebar"]["children"]["shipping-step"]["label"],
        json!("Shipping")
    );
}

// ============================================================
// Factory injection
// ============================================================

/// Stamps a provider on every normal component that lacks one.
struct ProviderStampingFactory;

impl ComponentFactory for ProviderStampingFactory {
    fn create(&self, name: &str, mut attributes: Attributes, kind: ComponentKind) -> Component {
        if kind == ComponentKind::Normal && attributes.provider().is_none() {
            attributes.set_provider("checkoutProvider");
        }
        Component::new(name, attributes, kind)
    }
}

#[rstest]
fn given_custom_factory_when_parsing_then_nodes_go_through_it(checkout_layout: Value) {
    let parser = LayoutParser::with_factory(Arc::new(ProviderStampingFactory));
    let tree = parser.parse(checkout_layout, None).unwrap();

    for (_, node) in tree.iter() {
        if !node.is_virtual() {
            assert_eq!(node.attributes().provider(), Some("checkoutProvider"));
        }
    }
}
