//! Component construction seam.
//!
//! The parser never constructs nodes directly; it goes through this trait so
//! the embedding environment can swap in its own construction logic.

use crate::attributes::Attributes;
use crate::tree::{Component, ComponentKind};

/// Injected construction capability: builds the node for one layout entry.
///
/// Implementations may normalize or enrich attributes before the node enters
/// the tree; attachment to a parent stays the tree's concern.
pub trait ComponentFactory: Send + Sync {
    fn create(&self, name: &str, attributes: Attributes, kind: ComponentKind) -> Component;
}

/// Plain-constructor factory used unless the caller injects its own.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultComponentFactory;

impl ComponentFactory for DefaultComponentFactory {
    fn create(&self, name: &str, attributes: Attributes, kind: ComponentKind) -> Component {
        Component::new(name, attributes, kind)
    }
}
