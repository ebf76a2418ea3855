//! Component tree model and parser for nested declarative layout definitions.
//!
//! A layout arrives as an already-decoded nested mapping of named components
//! (`{ "components": { <name>: { "children"?: {...}, ...attributes } } }`).
//! [`LayoutParser`] turns it into a mutable [`tree::ComponentTree`] that
//! supports lookup, insertion, removal and relocation of nodes by dotted
//! hierarchical path, and serializes back to the same mapping shape.
//!
//! ```
//! use jslayout::LayoutParser;
//! use serde_json::json;
//!
//! # fn main() -> Result<(), jslayout::LayoutError> {
//! let layout = json!({
//!     "components": {
//!         "checkout": {
//!             "component": "uiComponent",
//!             "children": {
//!                 "shipping": { "label": "Shipping", "sortOrder": "10" }
//!             }
//!         }
//!     }
//! });
//!
//! let tree = LayoutParser::new().parse(layout, Some("checkout"))?;
//! let root = tree.root().expect("parsed tree has a root");
//! assert!(tree.has_nested_child(root, "shipping"));
//! # Ok(())
//! # }
//! ```

pub mod attributes;
pub mod error;
pub mod factory;
pub mod parser;
pub mod tree;
pub mod util;

pub use attributes::Attributes;
pub use error::{LayoutError, LayoutResult};
pub use factory::{ComponentFactory, DefaultComponentFactory};
pub use parser::{LayoutParser, VIRTUAL_ROOT_NAME};
pub use tree::{Component, ComponentId, ComponentKind, ComponentTree};
