//! Per-container configuration.
//!
//! Containers carry their options as `data-*` attributes. They are read once,
//! when the controller is created, and turned into typed structs. Parsing is
//! lenient the way the page scripts always were: a number with trailing junk
//! keeps its numeric prefix, and anything unusable falls back to the default
//! with a warning.
//!
//! | Widget | Attribute | Field | Default |
//! |--------|-----------|-------|---------|
//! | compare | `data-position` | [`CompareConfig::position`] | 50 |
//! | carousel | `data-height` | [`CarouselConfig::height`] | none |
//! | carousel | `data-interval` | [`CarouselConfig::interval`] | 2000 ms |

// ============================================================================
// Imports
// ============================================================================

use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::dom::Dom;
use crate::error::{Error, Result};
use crate::identifiers::NodeId;

// ============================================================================
// Constants
// ============================================================================

/// Attribute holding the initial compare split.
pub const POSITION_ATTR: &str = "data-position";

/// Attribute holding the carousel viewport height.
pub const HEIGHT_ATTR: &str = "data-height";

/// Attribute holding the autoplay period in milliseconds.
pub const INTERVAL_ATTR: &str = "data-interval";

/// Marker written on every container a controller has taken over.
pub const INITIALIZED_ATTR: &str = "data-initialized";

/// Initial split when none is configured.
pub const DEFAULT_POSITION: f64 = 50.0;

/// Autoplay period when none is configured.
pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(2000);

/// Leading decimal number, as accepted by `parseFloat`.
static LEADING_FLOAT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*([+-]?(?:\d+(?:\.\d*)?|\.\d+)(?:[eE][+-]?\d+)?)")
        .expect("leading float pattern is valid")
});

/// Leading integer, as accepted by `parseInt(_, 10)`.
static LEADING_INT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*([+-]?\d+)").expect("leading int pattern is valid"));

/// Bare digits: a pixel height.
static PIXELS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+$").expect("pixel pattern is valid"));

// ============================================================================
// Number Parsing
// ============================================================================

/// Parses the numeric prefix of `raw` as a float.
#[must_use]
pub fn parse_leading_float(raw: &str) -> Option<f64> {
    LEADING_FLOAT
        .captures(raw)
        .and_then(|caps| caps[1].parse::<f64>().ok())
        .filter(|value| value.is_finite())
}

/// Parses the numeric prefix of `raw` as an integer.
#[must_use]
pub fn parse_leading_int(raw: &str) -> Option<i64> {
    LEADING_INT
        .captures(raw)
        .and_then(|caps| caps[1].parse::<i64>().ok())
}

// ============================================================================
// Initialized Marker
// ============================================================================

/// Returns `true` if a controller already manages `container`.
#[must_use]
pub fn is_initialized<D: Dom + ?Sized>(dom: &D, container: NodeId) -> bool {
    dom.attribute(container, INITIALIZED_ATTR).as_deref() == Some("true")
}

/// Sets or clears the initialized marker of `container`.
pub fn mark_initialized<D: Dom + ?Sized>(dom: &D, container: NodeId, initialized: bool) {
    let value = if initialized { "true" } else { "false" };
    dom.set_attribute(container, INITIALIZED_ATTR, value);
}

// ============================================================================
// CompareConfig
// ============================================================================

/// Options of one compare-slider container.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CompareConfig {
    /// Initial split percentage. Clamped to [0, 100] when applied.
    pub position: f64,
}

impl Default for CompareConfig {
    fn default() -> Self {
        Self {
            position: DEFAULT_POSITION,
        }
    }
}

impl CompareConfig {
    /// Reads the container's attributes, falling back to defaults.
    pub fn from_container<D: Dom + ?Sized>(dom: &D, container: NodeId) -> Self {
        Self::try_from_container(dom, container).unwrap_or_else(|err| {
            warn!(node = %container, error = %err, "Ignoring compare attribute");
            Self::default()
        })
    }

    /// Reads the container's attributes strictly.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidAttribute`] if `data-position` has no numeric prefix
    pub fn try_from_container<D: Dom + ?Sized>(dom: &D, container: NodeId) -> Result<Self> {
        let Some(raw) = dom.attribute(container, POSITION_ATTR) else {
            return Ok(Self::default());
        };
        let position = parse_leading_float(&raw)
            .ok_or_else(|| Error::invalid_attribute(POSITION_ATTR, raw.as_str()))?;
        Ok(Self { position })
    }
}

// ============================================================================
// ViewportHeight
// ============================================================================

/// Fixed height of the carousel viewport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViewportHeight {
    /// Bare integer, in pixels.
    Pixels(u32),
    /// Any other CSS size expression, used verbatim.
    Raw(String),
}

impl ViewportHeight {
    /// Parses an attribute value. Empty values yield `None`.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        if raw.is_empty() {
            return None;
        }
        if PIXELS.is_match(raw)
            && let Ok(pixels) = raw.parse::<u32>()
        {
            return Some(Self::Pixels(pixels));
        }
        Some(Self::Raw(raw.to_string()))
    }

    /// Value for the CSS `height` property.
    #[must_use]
    pub fn css_value(&self) -> String {
        match self {
            Self::Pixels(pixels) => format!("{pixels}px"),
            Self::Raw(raw) => raw.clone(),
        }
    }
}

// ============================================================================
// CarouselConfig
// ============================================================================

/// Options of one carousel container.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarouselConfig {
    /// Viewport height override.
    pub height: Option<ViewportHeight>,

    /// Autoplay period.
    pub interval: Duration,
}

impl Default for CarouselConfig {
    fn default() -> Self {
        Self {
            height: None,
            interval: DEFAULT_INTERVAL,
        }
    }
}

impl CarouselConfig {
    /// Reads the container's attributes, falling back per field.
    pub fn from_container<D: Dom + ?Sized>(dom: &D, container: NodeId) -> Self {
        let height = dom
            .attribute(container, HEIGHT_ATTR)
            .and_then(|raw| ViewportHeight::parse(&raw));

        let interval = match Self::interval_from(dom, container) {
            Ok(interval) => interval,
            Err(err) => {
                warn!(node = %container, error = %err, "Using default autoplay interval");
                DEFAULT_INTERVAL
            }
        };

        Self { height, interval }
    }

    /// Reads the container's attributes strictly.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidAttribute`] if `data-interval` is not a positive integer
    pub fn try_from_container<D: Dom + ?Sized>(dom: &D, container: NodeId) -> Result<Self> {
        let height = dom
            .attribute(container, HEIGHT_ATTR)
            .and_then(|raw| ViewportHeight::parse(&raw));
        let interval = Self::interval_from(dom, container)?;
        Ok(Self { height, interval })
    }

    fn interval_from<D: Dom + ?Sized>(dom: &D, container: NodeId) -> Result<Duration> {
        let Some(raw) = dom.attribute(container, INTERVAL_ATTR) else {
            return Ok(DEFAULT_INTERVAL);
        };
        match parse_leading_int(&raw) {
            Some(millis) if millis > 0 => Ok(Duration::from_millis(millis.unsigned_abs())),
            _ => Err(Error::invalid_attribute(INTERVAL_ATTR, raw.as_str())),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
