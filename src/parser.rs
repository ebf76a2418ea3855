//! Layout parser: builds a component tree from a decoded layout mapping.
//!
//! Input is an already-decoded `serde_json::Value` of the shape
//! `{ "components": { <name>: { "children"?: {...}, ...attributes } } }`.
//! Construction is a pure recursive build: each node's raw mapping is split
//! into attributes and children, the node comes from the injected factory,
//! and children are built top-down under it.

use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::instrument;

use crate::attributes::{json_type, keys, Attributes};
use crate::error::{LayoutError, LayoutResult};
use crate::factory::{ComponentFactory, DefaultComponentFactory};
use crate::tree::{ComponentId, ComponentKind, ComponentTree};

/// Name given to the synthetic root spanning all top-level components.
pub const VIRTUAL_ROOT_NAME: &str = "root";

const COMPONENTS_KEY: &str = "components";

/// Entry point turning layout mappings into [`ComponentTree`]s.
pub struct LayoutParser {
    factory: Arc<dyn ComponentFactory>,
}

impl Default for LayoutParser {
    fn default() -> Self {
        Self::new()
    }
}

impl LayoutParser {
    pub fn new() -> Self {
        Self::with_factory(Arc::new(DefaultComponentFactory))
    }

    pub fn with_factory(factory: Arc<dyn ComponentFactory>) -> Self {
        Self { factory }
    }

    /// Build a tree from `layout`.
    ///
    /// With `root_component` given, the tree is rooted at that entry of the
    /// `components` mapping (`MissingRootComponent` if absent). Without it, a
    /// virtual root named `"root"` spans all top-level components and elides
    /// itself on serialization.
    #[instrument(level = "debug", skip(self, layout))]
    pub fn parse(
        &self,
        layout: Value,
        root_component: Option<&str>,
    ) -> LayoutResult<ComponentTree> {
        let mut layout = into_object(layout, "layout")?;
        let components = layout
            .shift_remove(COMPONENTS_KEY)
            .ok_or_else(|| LayoutError::MalformedLayout {
                reason: format!("missing '{COMPONENTS_KEY}' key"),
            })?;
        let mut components = into_object(components, COMPONENTS_KEY)?;

        let mut tree = ComponentTree::new();
        match root_component {
            Some(name) => {
                let data = components
                    .shift_remove(name)
                    .ok_or_else(|| LayoutError::MissingRootComponent(name.to_string()))?;
                let data = into_object(data, name)?;
                self.build_component(&mut tree, name, data, None, ComponentKind::Normal)?;
            }
            None => {
                let root =
                    self.factory
                        .create(VIRTUAL_ROOT_NAME, Attributes::default(), ComponentKind::Virtual);
                let root_id = tree.insert(root, None)?;
                self.build_children(&mut tree, root_id, components)?;
            }
        }
        Ok(tree)
    }

    fn build_component(
        &self,
        tree: &mut ComponentTree,
        name: &str,
        mut data: Map<String, Value>,
        parent: Option<ComponentId>,
        kind: ComponentKind,
    ) -> LayoutResult<ComponentId> {
        let children = match data.shift_remove(keys::CHILDREN) {
            Some(children) => Some(into_object(children, name)?),
            None => None,
        };

        let attributes =
            Attributes::from_map(data).map_err(|source| LayoutError::InvalidAttributes {
                component: name.to_string(),
                source,
            })?;
        let component = self.factory.create(name, attributes, kind);
        let id = tree.insert(component, parent)?;

        if let Some(children) = children {
            self.build_children(tree, id, children)?;
        }
        Ok(id)
    }

    fn build_children(
        &self,
        tree: &mut ComponentTree,
        parent: ComponentId,
        children: Map<String, Value>,
    ) -> LayoutResult<()> {
        for (name, data) in children {
            let data = into_object(data, &name)?;
            self.build_component(tree, &name, data, Some(parent), ComponentKind::Normal)?;
        }
        Ok(())
    }
}

fn into_object(value: Value, context: &str) -> LayoutResult<Map<String, Value>> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(LayoutError::MalformedLayout {
            reason: format!("'{context}' must be an object, got {}", json_type(&other)),
        }),
    }
}
