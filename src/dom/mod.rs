//! Document abstraction.
//!
//! Widgets never talk to a concrete DOM. They go through the [`Dom`] trait,
//! which exposes the handful of operations they need: tree navigation,
//! attributes, class lists, inline styles, text and layout geometry.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Dom`] | Trait implemented by document backends |
//! | [`MemoryDom`] | Arena-backed document for headless rendering and tests |
//! | [`ElementSpec`] | Builder used to assemble [`MemoryDom`] trees |
//! | [`Selector`] | Class / tag / id locator |
//! | [`Rect`] | Layout box in CSS pixels |
//!
//! Attribute, class and style setters are infallible: writing to a detached
//! node is silently ignored, matching how a browser treats writes to an
//! element that has been removed from the page. Structural operations report
//! [`Error::NodeNotFound`](crate::Error::NodeNotFound).

// ============================================================================
// Submodules
// ============================================================================

/// In-memory document implementation.
pub mod memory;

/// Element locator strategies.
pub mod selector;

// ============================================================================
// Imports
// ============================================================================

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::identifiers::NodeId;

// ============================================================================
// Re-exports
// ============================================================================

pub use memory::{ElementSpec, MemoryDom};
pub use selector::Selector;

// ============================================================================
// Rect
// ============================================================================

/// Rendered layout box of a node, in CSS pixels relative to the viewport.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Rendered width.
    pub width: f64,
    /// Rendered height.
    pub height: f64,
}

impl Rect {
    /// Creates a rect from its edges and size.
    #[inline]
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Top edge.
    #[inline]
    #[must_use]
    pub const fn top(&self) -> f64 {
        self.y
    }
}

// ============================================================================
// Dom Trait
// ============================================================================

/// Operations the widgets need from a document.
///
/// Implementations must be shareable across the timer tasks that drive
/// autoplay, hence `Send + Sync`.
pub trait Dom: Send + Sync {
    /// The document root.
    fn root(&self) -> NodeId;

    /// Returns `true` while `node` is attached to this document.
    fn contains(&self, node: NodeId) -> bool;

    /// Parent of `node`, if any.
    fn parent(&self, node: NodeId) -> Option<NodeId>;

    /// Element children of `node`, in document order.
    fn children(&self, node: NodeId) -> Vec<NodeId>;

    /// Tag name as stored by the backend.
    fn tag_name(&self, node: NodeId) -> Option<String>;

    /// Attribute value, `None` if absent.
    fn attribute(&self, node: NodeId, name: &str) -> Option<String>;

    /// Sets an attribute.
    fn set_attribute(&self, node: NodeId, name: &str, value: &str);

    /// Classes of `node`, in attribute order.
    fn class_list(&self, node: NodeId) -> Vec<String>;

    /// Adds a class if not already present.
    fn add_class(&self, node: NodeId, class: &str);

    /// Removes a class if present.
    fn remove_class(&self, node: NodeId, class: &str);

    /// Inline style property value.
    fn style(&self, node: NodeId, property: &str) -> Option<String>;

    /// Sets an inline style property.
    fn set_style(&self, node: NodeId, property: &str, value: &str);

    /// Text content of `node` and its descendants.
    fn text(&self, node: NodeId) -> String;

    /// Replaces the content of `node` with `text`.
    fn set_text(&self, node: NodeId, text: &str);

    /// Creates a detached element.
    fn create_element(&self, tag: &str) -> NodeId;

    /// Appends `child` to `parent`, detaching it from its old parent first.
    fn append_child(&self, parent: NodeId, child: NodeId) -> Result<()>;

    /// Inserts `child` into `parent` right before `reference`.
    fn insert_before(&self, parent: NodeId, child: NodeId, reference: NodeId) -> Result<()>;

    /// Removes every child of `node`.
    fn clear_children(&self, node: NodeId);

    /// Rendered bounding box.
    fn bounding_rect(&self, node: NodeId) -> Rect;

    /// Rendered height including borders (`offsetHeight`).
    fn offset_height(&self, node: NodeId) -> f64;

    /// Returns `true` once an image has finished loading.
    fn is_image_complete(&self, node: NodeId) -> bool;

    // ------------------------------------------------------------------------
    // Provided
    // ------------------------------------------------------------------------

    /// Returns `true` if `node` carries `class`.
    fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.class_list(node).iter().any(|c| c == class)
    }

    /// Descendants of `root` matching `selector`, in document order.
    ///
    /// `root` itself is never part of the result.
    fn query_all(&self, root: NodeId, selector: &Selector) -> Vec<NodeId> {
        let mut found = Vec::new();
        let mut stack: Vec<NodeId> = self.children(root).into_iter().rev().collect();

        while let Some(node) = stack.pop() {
            if selector.matches(self, node) {
                found.push(node);
            }
            stack.extend(self.children(node).into_iter().rev());
        }

        found
    }

    /// First descendant of `root` matching `selector`.
    fn query(&self, root: NodeId, selector: &Selector) -> Option<NodeId> {
        self.query_all(root, selector).into_iter().next()
    }

    /// `node` itself or its nearest ancestor matching `selector`.
    fn closest(&self, node: NodeId, selector: &Selector) -> Option<NodeId> {
        let mut current = Some(node);
        while let Some(candidate) = current {
            if selector.matches(self, candidate) {
                return Some(candidate);
            }
            current = self.parent(candidate);
        }
        None
    }

    /// Returns `true` if `node` is `ancestor` or one of its descendants.
    fn is_within(&self, node: NodeId, ancestor: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(candidate) = current {
            if candidate == ancestor {
                return true;
            }
            current = self.parent(candidate);
        }
        false
    }
}

// ============================================================================
// Tests
// ============================================================================
