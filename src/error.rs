//! Crate errors for tree mutation and layout parsing.

use thiserror::Error;

/// Errors raised by tree mutation and layout parsing.
///
/// All variants describe caller-input violations, not internal faults. They
/// are raised synchronously at the point of violation; no operation retries
/// or leaves the tree partially mutated.
#[derive(Error, Debug)]
pub enum LayoutError {
    #[error("component '{parent}' already has a child named '{name}'")]
    DuplicateChild { parent: String, name: String },

    #[error("component '{name}' does not exist in '{parent}'")]
    NoSuchChild { parent: String, name: String },

    #[error("path '{path}' does not resolve to a component")]
    UnresolvedPath { path: String },

    #[error("root component '{0}' not found in layout")]
    MissingRootComponent(String),

    #[error("malformed layout: {reason}")]
    MalformedLayout { reason: String },

    #[error("invalid attributes for component '{component}'")]
    InvalidAttributes {
        component: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("attribute '{key}' expects {expected}, got {actual}")]
    TypeMismatch {
        key: String,
        expected: &'static str,
        actual: String,
    },

    #[error("component handle no longer refers to a node in the tree")]
    StaleComponent,
}

/// Result type for tree and parser operations.
pub type LayoutResult<T> = Result<T, LayoutError>;
