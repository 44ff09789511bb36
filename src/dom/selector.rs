//! Element locator strategies.
//!
//! The widgets only ever look nodes up by class, tag or id, so the locator
//! is a small closed enum instead of a full CSS selector engine.
//!
//! # Example
//!
//! ```ignore
//! use article_widgets::dom::Selector;
//!
//! let handle = dom.query(container, &Selector::class("jx-handle"));
//! let image = dom.query(slide, &Selector::tag("img"));
//! let article = dom.query(dom.root(), &"#article".into());
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::identifiers::NodeId;

use super::Dom;

// ============================================================================
// Selector Enum
// ============================================================================

/// Element locator strategy.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "strategy", content = "value")]
pub enum Selector {
    /// Single class name, like `.carousel-slide`.
    #[serde(rename = "class")]
    Class(String),

    /// Tag name, compared case-insensitively.
    #[serde(rename = "tag")]
    Tag(String),

    /// Element `id` attribute.
    #[serde(rename = "id")]
    Id(String),
}

impl Selector {
    /// Creates a class selector.
    #[inline]
    pub fn class(name: impl Into<String>) -> Self {
        Self::Class(name.into())
    }

    /// Creates a tag selector.
    #[inline]
    pub fn tag(name: impl Into<String>) -> Self {
        Self::Tag(name.into())
    }

    /// Creates an id selector.
    #[inline]
    pub fn id(id: impl Into<String>) -> Self {
        Self::Id(id.into())
    }

    /// Returns the strategy name.
    #[must_use]
    pub fn strategy(&self) -> &'static str {
        match self {
            Self::Class(_) => "class",
            Self::Tag(_) => "tag",
            Self::Id(_) => "id",
        }
    }

    /// Returns the selector value.
    #[must_use]
    pub fn value(&self) -> &str {
        match self {
            Self::Class(v) | Self::Tag(v) | Self::Id(v) => v,
        }
    }

    /// Returns `true` if `node` matches this selector.
    pub fn matches<D: Dom + ?Sized>(&self, dom: &D, node: NodeId) -> bool {
        match self {
            Self::Class(class) => dom.has_class(node, class),
            Self::Tag(tag) => dom
                .tag_name(node)
                .is_some_and(|name| name.eq_ignore_ascii_case(tag)),
            Self::Id(id) => dom.attribute(node, "id").as_deref() == Some(id.as_str()),
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Class(v) => write!(f, ".{v}"),
            Self::Tag(v) => write!(f, "{v}"),
            Self::Id(v) => write!(f, "#{v}"),
        }
    }
}

// ============================================================================
// From implementations for ergonomics
// ============================================================================

impl From<&str> for Selector {
    /// Parses `.class`, `#id`, or a bare tag name.
    fn from(s: &str) -> Self {
        if let Some(class) = s.strip_prefix('.') {
            Self::Class(class.to_string())
        } else if let Some(id) = s.strip_prefix('#') {
            Self::Id(id.to_string())
        } else {
            Self::Tag(s.to_string())
        }
    }
}

impl From<String> for Selector {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{ElementSpec, MemoryDom};

    #[test]
    fn test_from_str() {
        assert_eq!(Selector::from(".fancybox"), Selector::class("fancybox"));
        assert_eq!(Selector::from("#article"), Selector::id("article"));
        assert_eq!(Selector::from("img"), Selector::tag("img"));
    }

    #[test]
    fn test_display_round_trips_prefix() {
        assert_eq!(Selector::class("jx-handle").to_string(), ".jx-handle");
        assert_eq!(Selector::id("article").to_string(), "#article");
        assert_eq!(Selector::tag("img").to_string(), "img");
    }

    #[test]
    fn test_strategy_and_value() {
        let selector = Selector::class("carousel-dot");
        assert_eq!(selector.strategy(), "class");
        assert_eq!(selector.value(), "carousel-dot");
    }

    #[test]
    fn test_matches() {
        let dom = MemoryDom::new();
        let img = dom.build(dom.root(), ElementSpec::new("IMG").id("hero").class("nofancybox"));

        assert!(Selector::tag("img").matches(&dom, img));
        assert!(Selector::id("hero").matches(&dom, img));
        assert!(Selector::class("nofancybox").matches(&dom, img));
        assert!(!Selector::class("fancybox").matches(&dom, img));
    }
}
