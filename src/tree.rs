//! Arena-based component tree.
//!
//! Nodes live in a generational arena; parent links are plain indices, so the
//! only owning edge is parent -> children and a removed subtree leaves no
//! dangling back-pointer behind, just stale handles that resolve to absent.

use generational_arena::{Arena, Index};
use serde_json::{Map, Value};
use tracing::instrument;

use crate::attributes::{keys, Attributes};
use crate::error::{LayoutError, LayoutResult};

/// Handle to a node in a [`ComponentTree`].
///
/// Generational: after the node is removed, the handle no longer resolves.
pub type ComponentId = Index;

/// Node flavor, matched exhaustively during serialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentKind {
    /// Regular component: emits its attributes, plus children when present.
    Normal,
    /// Structural container holding top-level components; contributes no
    /// attributes and is invisible in serialized output.
    Virtual,
}

/// A single addressable component: name, attribute bag, and tree links.
///
/// Links are managed by [`ComponentTree`]; the children list and the parent
/// pointers of its members are kept mutually consistent by the tree's
/// operations (`set_parent` being the documented exception).
#[derive(Debug)]
pub struct Component {
    name: String,
    kind: ComponentKind,
    attributes: Attributes,
    parent: Option<ComponentId>,
    children: Vec<ComponentId>,
}

impl Component {
    pub fn new(name: impl Into<String>, attributes: Attributes, kind: ComponentKind) -> Self {
        Self {
            name: name.into(),
            kind,
            attributes,
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ComponentKind {
        self.kind
    }

    pub fn is_virtual(&self) -> bool {
        self.kind == ComponentKind::Virtual
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    pub fn attributes_mut(&mut self) -> &mut Attributes {
        &mut self.attributes
    }

    /// Non-owning back-reference; `None` for an unattached or root node.
    pub fn parent(&self) -> Option<ComponentId> {
        self.parent
    }

    /// Child handles in insertion order.
    pub fn children(&self) -> &[ComponentId] {
        &self.children
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }
}

/// Mutable tree of named components with path-addressed navigation.
#[derive(Debug)]
pub struct ComponentTree {
    arena: Arena<Component>,
    root: Option<ComponentId>,
}

impl Default for ComponentTree {
    fn default() -> Self {
        Self::new()
    }
}

impl ComponentTree {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            root: None,
        }
    }

    /// Handle of the root node, `None` for an empty tree.
    pub fn root(&self) -> Option<ComponentId> {
        self.root
    }

    pub fn get(&self, id: ComponentId) -> Option<&Component> {
        self.arena.get(id)
    }

    pub fn get_mut(&mut self, id: ComponentId) -> Option<&mut Component> {
        self.arena.get_mut(id)
    }

    /// Admit a node into the tree. With a parent, this is
    /// [`add_child`](ComponentTree::add_child) semantics; without, the node
    /// becomes the root.
    #[instrument(level = "trace", skip(self, component), fields(name = component.name()))]
    pub fn insert(
        &mut self,
        component: Component,
        parent: Option<ComponentId>,
    ) -> LayoutResult<ComponentId> {
        match parent {
            Some(parent_id) => {
                let parent_node = self.get(parent_id).ok_or(LayoutError::StaleComponent)?;
                if self.has_child(parent_id, component.name()) {
                    return Err(LayoutError::DuplicateChild {
                        parent: parent_node.name().to_string(),
                        name: component.name().to_string(),
                    });
                }
                let mut component = component;
                component.parent = Some(parent_id);
                let id = self.arena.insert(component);
                if let Some(parent_node) = self.arena.get_mut(parent_id) {
                    parent_node.children.push(id);
                }
                Ok(id)
            }
            None => {
                let id = self.arena.insert(component);
                self.root = Some(id);
                Ok(id)
            }
        }
    }

    /// Attach a freshly built component at the end of `parent`'s children,
    /// keyed by the component's own name.
    ///
    /// Fails with `DuplicateChild` if the name is taken, in which case
    /// nothing is inserted.
    pub fn add_child(
        &mut self,
        parent: ComponentId,
        component: Component,
    ) -> LayoutResult<ComponentId> {
        self.insert(component, Some(parent))
    }

    /// Detach the named child and delete its whole subtree from the arena.
    ///
    /// Fails with `NoSuchChild` if absent. Handles into the removed subtree
    /// become stale and no longer resolve.
    #[instrument(level = "trace", skip(self))]
    pub fn remove_child(&mut self, parent: ComponentId, name: &str) -> LayoutResult<()> {
        let parent_name = self
            .get(parent)
            .ok_or(LayoutError::StaleComponent)?
            .name()
            .to_string();
        let child = self
            .child(parent, name)
            .ok_or_else(|| LayoutError::NoSuchChild {
                parent: parent_name,
                name: name.to_string(),
            })?;
        self.detach(child);
        self.remove_subtree(child);
        Ok(())
    }

    pub fn has_child(&self, id: ComponentId, name: &str) -> bool {
        self.child(id, name).is_some()
    }

    /// Handle of the named direct child. Absence is `None`, never an error.
    pub fn child(&self, id: ComponentId, name: &str) -> Option<ComponentId> {
        let node = self.get(id)?;
        node.children
            .iter()
            .copied()
            .find(|&child| self.get(child).is_some_and(|node| node.name() == name))
    }

    /// Walk a `.`-separated path of child names starting below `id`.
    pub fn nested_child(&self, id: ComponentId, path: &str) -> Option<ComponentId> {
        self.nested_child_sep(id, path, '.')
    }

    #[instrument(level = "trace", skip(self))]
    pub fn nested_child_sep(&self, id: ComponentId, path: &str, sep: char) -> Option<ComponentId> {
        let mut current = id;
        for segment in path.split(sep) {
            current = self.child(current, segment)?;
        }
        Some(current)
    }

    pub fn has_nested_child(&self, id: ComponentId, path: &str) -> bool {
        self.nested_child(id, path).is_some()
    }

    pub fn has_nested_child_sep(&self, id: ComponentId, path: &str, sep: char) -> bool {
        self.nested_child_sep(id, path, sep).is_some()
    }

    /// Re-parent the node at `source_path` under the node at
    /// `destination_path`, both resolved from `id`, keeping the source's name.
    ///
    /// The destination is checked before anything is detached, so a failed
    /// move leaves the tree exactly as it was. Moving a node back under its
    /// current parent re-appends it at the end of the children list.
    pub fn move_nested_child(
        &mut self,
        id: ComponentId,
        source_path: &str,
        destination_path: &str,
    ) -> LayoutResult<()> {
        self.move_nested_child_sep(id, source_path, destination_path, '.')
    }

    #[instrument(level = "trace", skip(self))]
    pub fn move_nested_child_sep(
        &mut self,
        id: ComponentId,
        source_path: &str,
        destination_path: &str,
        sep: char,
    ) -> LayoutResult<()> {
        let source = self
            .nested_child_sep(id, source_path, sep)
            .ok_or_else(|| LayoutError::UnresolvedPath {
                path: source_path.to_string(),
            })?;
        let destination = self
            .nested_child_sep(id, destination_path, sep)
            .ok_or_else(|| LayoutError::UnresolvedPath {
                path: destination_path.to_string(),
            })?;

        let source_name = self
            .get(source)
            .ok_or(LayoutError::StaleComponent)?
            .name()
            .to_string();
        if let Some(existing) = self.child(destination, &source_name) {
            if existing != source {
                let destination_name = self
                    .get(destination)
                    .ok_or(LayoutError::StaleComponent)?
                    .name()
                    .to_string();
                return Err(LayoutError::DuplicateChild {
                    parent: destination_name,
                    name: source_name,
                });
            }
        }

        self.detach(source);
        self.attach(destination, source);
        Ok(())
    }

    /// Resolve `path` from `id` and remove that node's subtree via its
    /// parent. Fails with `UnresolvedPath` if the path misses.
    pub fn remove_nested_child(&mut self, id: ComponentId, path: &str) -> LayoutResult<()> {
        self.remove_nested_child_sep(id, path, '.')
    }

    #[instrument(level = "trace", skip(self))]
    pub fn remove_nested_child_sep(
        &mut self,
        id: ComponentId,
        path: &str,
        sep: char,
    ) -> LayoutResult<()> {
        let target = self
            .nested_child_sep(id, path, sep)
            .ok_or_else(|| LayoutError::UnresolvedPath {
                path: path.to_string(),
            })?;
        let node = self.get(target).ok_or(LayoutError::StaleComponent)?;
        let name = node.name().to_string();
        let parent = node.parent().ok_or_else(|| LayoutError::UnresolvedPath {
            path: path.to_string(),
        })?;
        self.remove_child(parent, &name)
    }

    /// Identity check against the child's parent handle.
    pub fn is_child_of(&self, child: ComponentId, parent: ComponentId) -> bool {
        self.get(child)
            .is_some_and(|node| node.parent() == Some(parent))
    }

    /// Pure pointer update: rewrites the child's back-reference without
    /// touching any children list. Callers must keep both sides consistent
    /// themselves; `add_child` does so in one step.
    #[instrument(level = "trace", skip(self))]
    pub fn set_parent(&mut self, child: ComponentId, parent: ComponentId) -> LayoutResult<()> {
        if self.get(parent).is_none() {
            return Err(LayoutError::StaleComponent);
        }
        let node = self.get_mut(child).ok_or(LayoutError::StaleComponent)?;
        node.parent = Some(parent);
        Ok(())
    }

    /// Names of `id`'s children in insertion order.
    pub fn child_names(&self, id: ComponentId) -> Vec<&str> {
        self.get(id)
            .map(|node| {
                node.children
                    .iter()
                    .filter_map(|&child| self.get(child).map(Component::name))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Pre-order traversal from the root.
    pub fn iter(&self) -> TreeIter<'_> {
        TreeIter::new(self)
    }

    /// Post-order traversal from the root.
    pub fn iter_postorder(&self) -> PostOrderIter<'_> {
        PostOrderIter::new(self)
    }

    /// Serialize the subtree at `id` back to its nested-mapping form.
    ///
    /// A childless normal node is its attribute map verbatim; children are
    /// recursively serialized under the `children` key, overwriting any
    /// attribute held under that name; a virtual node is replaced by its
    /// children map. Returns `None` only for a stale handle.
    #[instrument(level = "trace", skip(self))]
    pub fn to_map(&self, id: ComponentId) -> Option<Map<String, Value>> {
        let node = self.get(id)?;
        if !node.has_children() {
            return match node.kind {
                ComponentKind::Virtual => Some(Map::new()),
                ComponentKind::Normal => Some(node.attributes.to_map()),
            };
        }

        let mut children = Map::new();
        for &child in &node.children {
            let name = self.get(child)?.name().to_string();
            children.insert(name, Value::Object(self.to_map(child)?));
        }

        match node.kind {
            ComponentKind::Virtual => Some(children),
            ComponentKind::Normal => {
                let mut map = node.attributes.to_map();
                map.insert(keys::CHILDREN.to_string(), Value::Object(children));
                Some(map)
            }
        }
    }

    /// Unlink `id` from its parent's children list and clear its
    /// back-reference. The subtree stays in the arena.
    fn detach(&mut self, id: ComponentId) {
        let parent = self.get(id).and_then(Component::parent);
        if let Some(parent_id) = parent {
            if let Some(parent_node) = self.arena.get_mut(parent_id) {
                parent_node.children.retain(|&child| child != id);
            }
        }
        if let Some(node) = self.arena.get_mut(id) {
            node.parent = None;
        }
    }

    /// Link an already-admitted node under `parent`. Duplicate names are the
    /// caller's responsibility.
    fn attach(&mut self, parent: ComponentId, child: ComponentId) {
        if let Some(node) = self.arena.get_mut(child) {
            node.parent = Some(parent);
        }
        if let Some(parent_node) = self.arena.get_mut(parent) {
            parent_node.children.push(child);
        }
    }

    fn remove_subtree(&mut self, id: ComponentId) {
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.arena.remove(current) {
                stack.extend(node.children);
            }
        }
    }
}

pub struct TreeIter<'a> {
    tree: &'a ComponentTree,
    stack: Vec<ComponentId>,
}

impl<'a> TreeIter<'a> {
    fn new(tree: &'a ComponentTree) -> Self {
        let mut stack = Vec::new();
        if let Some(root) = tree.root() {
            stack.push(root);
        }
        Self { tree, stack }
    }
}

impl<'a> Iterator for TreeIter<'a> {
    type Item = (ComponentId, &'a Component);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current) = self.stack.pop() {
            if let Some(node) = self.tree.get(current) {
                // Push children in reverse order for left-to-right traversal
                for &child in node.children.iter().rev() {
                    self.stack.push(child);
                }
                return Some((current, node));
            }
        }
        None
    }
}

pub struct PostOrderIter<'a> {
    tree: &'a ComponentTree,
    stack: Vec<(ComponentId, bool)>,
}

impl<'a> PostOrderIter<'a> {
    fn new(tree: &'a ComponentTree) -> Self {
        let mut stack = Vec::new();
        if let Some(root) = tree.root() {
            stack.push((root, false));
        }
        Self { tree, stack }
    }
}

impl<'a> Iterator for PostOrderIter<'a> {
    type Item = (ComponentId, &'a Component);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((current, visited)) = self.stack.pop() {
            if let Some(node) = self.tree.get(current) {
                if !visited {
                    self.stack.push((current, true));
                    for &child in node.children.iter().rev() {
                        self.stack.push((child, false));
                    }
                } else {
                    return Some((current, node));
                }
            }
        }
        None
    }
}
