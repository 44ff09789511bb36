//! Error types for article widgets.
//!
//! Most operations in this crate cannot fail: a container with incomplete
//! markup is skipped rather than reported. Errors exist for the places where
//! a caller asked for something explicit, such as strict attribute parsing,
//! options validation, or starting a timer.
//!
//! # Usage
//!
//! ```ignore
//! use article_widgets::{Enhancer, Result};
//!
//! fn example(dom: Arc<MemoryDom>) -> Result<()> {
//!     let enhancer = Enhancer::builder().dom(dom).build()?;
//!     enhancer.on_ready();
//!     Ok(())
//! }
//! ```
//!
//! # Error Categories
//!
//! | Category | Variants |
//! |----------|----------|
//! | Configuration | [`Error::Config`], [`Error::InvalidAttribute`] |
//! | Document | [`Error::NodeNotFound`] |
//! | Scheduling | [`Error::NoRuntime`] |
//! | External | [`Error::Json`], [`Error::Url`] |

// ============================================================================
// Imports
// ============================================================================

use std::result::Result as StdResult;

use thiserror::Error;

use crate::identifiers::NodeId;

// ============================================================================
// Result Alias
// ============================================================================

/// Result type alias using crate [`enum@Error`].
pub type Result<T> = StdResult<T, Error>;

// ============================================================================
// Error Enum
// ============================================================================

/// Main error type for the crate.
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// Configuration error.
    ///
    /// Returned when enhancer options are invalid.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration error.
        message: String,
    },

    /// A container attribute could not be parsed into its typed form.
    #[error("Invalid attribute {name}={value:?}")]
    InvalidAttribute {
        /// Attribute name, e.g. `data-interval`.
        name: String,
        /// Raw attribute value.
        value: String,
    },

    // ========================================================================
    // Document Errors
    // ========================================================================
    /// Node is not (or no longer) part of the document.
    #[error("Node not found: {node}")]
    NodeNotFound {
        /// The missing node.
        node: NodeId,
    },

    // ========================================================================
    // Scheduling Errors
    // ========================================================================
    /// A timer was requested outside of a tokio runtime.
    #[error("No async runtime available for {operation}")]
    NoRuntime {
        /// The operation that needed the runtime.
        operation: String,
    },

    // ========================================================================
    // External Errors
    // ========================================================================
    /// JSON deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parse error.
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),
}

// ============================================================================
// Error Constructors
// ============================================================================

impl Error {
    /// Creates a configuration error.
    #[inline]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Creates an invalid attribute error.
    #[inline]
    pub fn invalid_attribute(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::InvalidAttribute {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Creates a node not found error.
    #[inline]
    pub fn node_not_found(node: NodeId) -> Self {
        Self::NodeNotFound { node }
    }

    /// Creates a missing runtime error.
    #[inline]
    pub fn no_runtime(operation: impl Into<String>) -> Self {
        Self::NoRuntime {
            operation: operation.into(),
        }
    }
}

// ============================================================================
// Error Predicates
// ============================================================================

impl Error {
    /// Returns `true` if this is a configuration or attribute error.
    #[inline]
    #[must_use]
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            Self::Config { .. } | Self::InvalidAttribute { .. } | Self::Json(_) | Self::Url(_)
        )
    }

    /// Returns `true` if this error concerns the document tree.
    #[inline]
    #[must_use]
    pub fn is_dom_error(&self) -> bool {
        matches!(self, Self::NodeNotFound { .. })
    }
}

// ============================================================================
// Tests
// ============================================================================
