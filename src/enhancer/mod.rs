//! Page-level entry point.
//!
//! # Components
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Enhancer`] | Registry of every widget on the page |
//! | [`EnhancerBuilder`] | Fluent configuration builder |
//! | [`EnhancerOptions`] | Class names, labels and timings |
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use article_widgets::{Enhancer, dom::MemoryDom};
//!
//! let enhancer = Enhancer::builder()
//!     .dom(Arc::new(MemoryDom::new()))
//!     .build()?;
//! enhancer.on_ready();
//! ```

// ============================================================================
// Submodules
// ============================================================================

/// Fluent builder for the enhancer.
pub mod builder;

/// Registry, scans and event dispatch.
pub mod core;

/// Site-level options.
pub mod options;

// ============================================================================
// Re-exports
// ============================================================================

pub use builder::EnhancerBuilder;
pub use crate::config::INITIALIZED_ATTR;
pub use core::{Enhancer, ReadySummary};
pub use options::{CarouselClasses, CompareClasses, EnhancerOptions, GalleryOptions, Labels};
