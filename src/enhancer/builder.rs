//! Builder pattern for enhancer configuration.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use article_widgets::{Enhancer, EnhancerOptions, dom::MemoryDom};
//!
//! let enhancer = Enhancer::builder()
//!     .dom(Arc::new(MemoryDom::new()))
//!     .options(EnhancerOptions::new().with_article_root(".post"))
//!     .build()?;
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;

use crate::dom::Dom;
use crate::error::{Error, Result};

use super::core::Enhancer;
use super::options::EnhancerOptions;

// ============================================================================
// EnhancerBuilder
// ============================================================================

/// Builder for an [`Enhancer`].
///
/// Use [`Enhancer::builder()`] to create one.
#[derive(Default, Clone)]
pub struct EnhancerBuilder {
    /// Document the widgets operate on.
    dom: Option<Arc<dyn Dom>>,
    /// Site-level options.
    options: EnhancerOptions,
}

impl fmt::Debug for EnhancerBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnhancerBuilder")
            .field("dom", &self.dom.is_some())
            .field("options", &self.options)
            .finish()
    }
}

// ============================================================================
// EnhancerBuilder Implementation
// ============================================================================

impl EnhancerBuilder {
    /// Creates a builder with default options and no document.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the document.
    #[inline]
    #[must_use]
    pub fn dom(mut self, dom: Arc<dyn Dom>) -> Self {
        self.dom = Some(dom);
        self
    }

    /// Replaces the options.
    #[inline]
    #[must_use]
    pub fn options(mut self, options: EnhancerOptions) -> Self {
        self.options = options;
        self
    }

    /// Builds the enhancer with validation.
    ///
    /// # Errors
    ///
    /// - [`Error::Config`] if no document was set
    /// - [`Error::Config`] if the options fail validation
    pub fn build(self) -> Result<Enhancer> {
        let dom = self.dom.ok_or_else(|| {
            Error::config(
                "A document is required. Use .dom() to set it.\n\
                 Example: Enhancer::builder().dom(Arc::new(MemoryDom::new()))",
            )
        })?;
        self.options.validate()?;

        Ok(Enhancer::new(dom, self.options))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::MemoryDom;

    #[test]
    fn test_new_creates_empty_builder() {
        let builder = EnhancerBuilder::new();
        assert!(builder.dom.is_none());
        assert_eq!(builder.options, EnhancerOptions::default());
    }

    #[test]
    fn test_build_without_dom_fails() {
        let err = EnhancerBuilder::new().build().unwrap_err();
        assert!(err.is_config_error());
        assert!(err.to_string().contains(".dom()"));
    }

    #[test]
    fn test_build_rejects_invalid_options() {
        let options = EnhancerOptions::new().with_article_root("  ");
        let result = EnhancerBuilder::new()
            .dom(Arc::new(MemoryDom::new()))
            .options(options)
            .build();
        assert!(result.unwrap_err().is_config_error());
    }

    #[test]
    fn test_build_succeeds() {
        let enhancer = EnhancerBuilder::new()
            .dom(Arc::new(MemoryDom::new()))
            .options(EnhancerOptions::new().with_article_root(".post"))
            .build()
            .unwrap();
        assert_eq!(enhancer.options().article_root, ".post");
    }
}
