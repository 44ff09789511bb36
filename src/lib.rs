//! Article widgets - interactive enhancements for blog article pages.
//!
//! This library drives three page behaviors over an abstract document:
//!
//! - **Gallery wrap**: inline article images become lightbox links
//! - **Compare slider**: a draggable split over stacked before/after images
//! - **Carousel**: auto-advancing slides with pagination and pause controls
//!
//! # Architecture
//!
//! The widgets never talk to a browser directly. They read and write through
//! the [`Dom`](dom::Dom) trait and receive input as [`UiEvent`]s:
//!
//! - A host binding implements [`Dom`](dom::Dom) and forwards native events
//! - [`Enhancer`] owns one controller per container, keyed by [`NodeId`]
//! - Timers (autoplay, debounce) are cancellable tokio tasks
//!
//! [`MemoryDom`](dom::MemoryDom) is a complete in-memory implementation used
//! for tests and headless rendering.
//!
//! # Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//! use article_widgets::{Enhancer, Result, UiEvent, dom::MemoryDom};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let dom = Arc::new(MemoryDom::new());
//!     // ... populate the document ...
//!
//!     let enhancer = Enhancer::builder().dom(dom.clone()).build()?;
//!     enhancer.on_ready();
//!
//!     enhancer.dispatch(&UiEvent::WindowResize);
//!     Ok(())
//! }
//! ```
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`carousel`] | Carousel controller |
//! | [`compare`] | Compare-slider controller |
//! | [`config`] | Per-container `data-*` configuration |
//! | [`dom`] | Document abstraction and in-memory backend |
//! | [`enhancer`] | Registry, options and entry points |
//! | [`error`] | Error types and [`Result`] alias |
//! | [`events`] | Input events and dispatch outcome |
//! | [`gallery`] | Lightbox auto-linking pass |
//! | [`identifiers`] | Node identifiers |
//! | [`timer`] | Cancellable scheduled tasks |

// ============================================================================
// Modules
// ============================================================================

/// Auto-advancing carousel.
pub mod carousel;

/// Before/after compare slider.
pub mod compare;

/// Per-container configuration parsed from `data-*` attributes.
pub mod config;

/// Document abstraction.
///
/// Widgets only see the document through [`dom::Dom`].
pub mod dom;

/// Registry and page entry points.
///
/// Use [`Enhancer::builder()`] to create a configured instance.
pub mod enhancer;

/// Error types and result aliases.
pub mod error;

/// Input events.
pub mod events;

/// Lightbox auto-linking.
pub mod gallery;

/// Type-safe identifiers.
pub mod identifiers;

/// Cancellable timers.
pub mod timer;

// ============================================================================
// Re-exports
// ============================================================================

// Widgets
pub use carousel::Carousel;
pub use compare::CompareSlider;

// Configuration
pub use config::{CarouselConfig, CompareConfig, ViewportHeight};
pub use enhancer::{Enhancer, EnhancerBuilder, EnhancerOptions, ReadySummary};

// Events
pub use events::{Dispatch, PointerKind, UiEvent};

// Error types
pub use error::{Error, Result};

// Identifier types
pub use identifiers::NodeId;
