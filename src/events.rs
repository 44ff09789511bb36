//! Input events delivered to the widgets.
//!
//! The host (a browser binding, a test, a replay tool) translates its native
//! events into [`UiEvent`]s and feeds them to
//! [`Enhancer::dispatch`](crate::Enhancer::dispatch) in delivery order.
//!
//! # Event Types
//!
//! | Source | Events |
//! |--------|--------|
//! | pointer | `PointerDown`, `PointerMove`, `PointerUp` |
//! | element | `Click`, `PointerEnter`, `PointerLeave` |
//! | layout | `WindowResize`, `ElementResize`, `ImageLoad` |
//!
//! Move and release events are document-level, like `mousemove` and
//! `mouseup` listeners on `document`: they carry no target and every
//! controller decides for itself whether it is dragging.

// ============================================================================
// Imports
// ============================================================================

use serde::{Deserialize, Serialize};

use crate::identifiers::NodeId;

// ============================================================================
// PointerKind
// ============================================================================

/// Input device behind a pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PointerKind {
    /// Mouse (`mousedown` / `mousemove` / `mouseup`).
    Mouse,
    /// Touch (`touchstart` / `touchmove` / `touchend`), first touch point.
    Touch,
}

// ============================================================================
// UiEvent
// ============================================================================

/// An input or layout notification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum UiEvent {
    /// Pointer pressed on `target`.
    PointerDown {
        /// Element under the pointer.
        target: NodeId,
        /// Client X coordinate.
        x: f64,
        /// Input device.
        kind: PointerKind,
    },

    /// Pointer moved anywhere in the document.
    PointerMove {
        /// Client X coordinate.
        x: f64,
        /// Input device.
        kind: PointerKind,
    },

    /// Pointer released anywhere in the document.
    PointerUp {
        /// Input device.
        kind: PointerKind,
    },

    /// Click on `target`.
    Click {
        /// Clicked element, possibly a descendant of a control.
        target: NodeId,
    },

    /// Pointer entered `target` (`mouseenter`, does not bubble).
    PointerEnter {
        /// Entered element.
        target: NodeId,
    },

    /// Pointer left `target` (`mouseleave`, does not bubble).
    PointerLeave {
        /// Left element.
        target: NodeId,
    },

    /// The window was resized.
    WindowResize,

    /// An observed element changed size.
    ElementResize {
        /// Resized element.
        target: NodeId,
    },

    /// An image finished loading.
    ImageLoad {
        /// Loaded image.
        target: NodeId,
    },
}

impl UiEvent {
    /// Returns the event name in DOM terms, for logs.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::PointerDown {
                kind: PointerKind::Mouse,
                ..
            } => "mousedown",
            Self::PointerDown {
                kind: PointerKind::Touch,
                ..
            } => "touchstart",
            Self::PointerMove {
                kind: PointerKind::Mouse,
                ..
            } => "mousemove",
            Self::PointerMove {
                kind: PointerKind::Touch,
                ..
            } => "touchmove",
            Self::PointerUp {
                kind: PointerKind::Mouse,
            } => "mouseup",
            Self::PointerUp {
                kind: PointerKind::Touch,
            } => "touchend",
            Self::Click { .. } => "click",
            Self::PointerEnter { .. } => "mouseenter",
            Self::PointerLeave { .. } => "mouseleave",
            Self::WindowResize => "resize",
            Self::ElementResize { .. } => "resizeobserver",
            Self::ImageLoad { .. } => "load",
        }
    }
}

// ============================================================================
// Dispatch
// ============================================================================

/// Outcome of dispatching one event.
///
/// A host can use [`Dispatch::Handled`] to decide on `preventDefault`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// At least one controller reacted.
    Handled,
    /// No controller was interested.
    Ignored,
}

impl Dispatch {
    /// Returns `true` for [`Dispatch::Handled`].
    #[inline]
    #[must_use]
    pub const fn is_handled(self) -> bool {
        matches!(self, Self::Handled)
    }

    /// Combines two outcomes; handled wins.
    #[inline]
    #[must_use]
    pub const fn or(self, other: Self) -> Self {
        match (self, other) {
            (Self::Ignored, Self::Ignored) => Self::Ignored,
            _ => Self::Handled,
        }
    }
}

impl From<bool> for Dispatch {
    fn from(handled: bool) -> Self {
        if handled { Self::Handled } else { Self::Ignored }
    }
}

// ============================================================================
// Tests
// ============================================================================
