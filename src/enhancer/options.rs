//! Site-level enhancer options.
//!
//! Class names, the article root, timings and labels. Everything has a
//! default matching the stock theme markup, so most sites never touch this.
//!
//! # Example
//!
//! ```ignore
//! use article_widgets::EnhancerOptions;
//!
//! let options = EnhancerOptions::new()
//!     .with_article_root("#post-body")
//!     .with_resize_debounce(Duration::from_millis(150))
//!     .with_base_url("https://blog.example.com/posts/")?;
//!
//! // Or from the theme's JSON config
//! let options = EnhancerOptions::from_json(r#"{"articleRoot": "main"}"#)?;
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::dom::Selector;
use crate::error::{Error, Result};

// ============================================================================
// Constants
// ============================================================================

/// Delay before re-laying out carousels after the last resize event.
pub const DEFAULT_RESIZE_DEBOUNCE: Duration = Duration::from_millis(100);

/// Delay before carousels re-apply their position after initialization.
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_millis(100);

// ============================================================================
// CompareClasses
// ============================================================================

/// Class names of the compare-slider markup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CompareClasses {
    /// Container root.
    pub container: String,
    /// Draggable handle.
    pub handle: String,
    /// Layer clipped by the split ("before").
    pub before: String,
    /// Layer underneath ("after").
    pub after: String,
}

impl Default for CompareClasses {
    fn default() -> Self {
        Self {
            container: "image-compare-container".into(),
            handle: "jx-handle".into(),
            before: "image-before".into(),
            after: "image-after".into(),
        }
    }
}

// ============================================================================
// CarouselClasses
// ============================================================================

/// Class names of the carousel markup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CarouselClasses {
    /// Container root.
    pub container: String,
    /// Viewport whose width defines one slide step.
    pub wrapper: String,
    /// Translated strip holding the slides.
    pub track: String,
    /// One slide.
    pub slide: String,
    /// Title element inside a slide.
    pub slide_title: String,
    /// "Previous" control.
    pub prev: String,
    /// "Next" control.
    pub next: String,
    /// Play/pause toggle.
    pub play_pause: String,
    /// Pagination container.
    pub dots: String,
    /// One pagination dot.
    pub dot: String,
    /// Marker of the current dot.
    pub active: String,
    /// Marker on the toggle while paused.
    pub paused: String,
}

impl Default for CarouselClasses {
    fn default() -> Self {
        Self {
            container: "image-carousel-container".into(),
            wrapper: "carousel-wrapper".into(),
            track: "carousel-track".into(),
            slide: "carousel-slide".into(),
            slide_title: "carousel-slide-title".into(),
            prev: "carousel-prev".into(),
            next: "carousel-next".into(),
            play_pause: "carousel-play-pause".into(),
            dots: "carousel-dots".into(),
            dot: "carousel-dot".into(),
            active: "active".into(),
            paused: "paused".into(),
        }
    }
}

// ============================================================================
// GalleryOptions
// ============================================================================

/// Markup produced by the gallery wrap pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GalleryOptions {
    /// Class of the generated anchor; also marks already-wrapped images.
    pub link_class: String,
    /// Class that opts an image out of wrapping.
    pub opt_out_class: String,
    /// `data-fancybox` group name.
    pub group: String,
    /// `rel` value shared by every gallery link.
    pub rel: String,
    /// Image attribute holding the full-resolution source.
    pub full_source_attr: String,
}

impl Default for GalleryOptions {
    fn default() -> Self {
        Self {
            link_class: "fancybox".into(),
            opt_out_class: "nofancybox".into(),
            group: "fancybox-gallery-img".into(),
            rel: "article".into(),
            full_source_attr: "data-src".into(),
        }
    }
}

// ============================================================================
// Labels
// ============================================================================

/// Accessible labels written by the carousel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Labels {
    /// Toggle label while paused.
    pub play: String,
    /// Toggle label while playing.
    pub pause: String,
    /// Dot label; `{n}` is replaced with the 1-based slide number.
    pub go_to_slide: String,
}

impl Default for Labels {
    fn default() -> Self {
        Self {
            play: "Play".into(),
            pause: "Pause".into(),
            go_to_slide: "Go to slide {n}".into(),
        }
    }
}

impl Labels {
    /// Label of the dot for the zero-based `index`.
    #[must_use]
    pub fn dot(&self, index: usize) -> String {
        self.go_to_slide.replace("{n}", &(index + 1).to_string())
    }
}

// ============================================================================
// EnhancerOptions
// ============================================================================

/// Configuration of an [`Enhancer`](crate::Enhancer).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EnhancerOptions {
    /// Region whose images the gallery pass wraps (`#id`, `.class` or tag).
    pub article_root: String,

    /// Compare-slider class names.
    pub compare: CompareClasses,

    /// Carousel class names.
    pub carousel: CarouselClasses,

    /// Gallery wrap markup.
    pub gallery: GalleryOptions,

    /// Carousel labels.
    pub labels: Labels,

    /// Resize debounce in milliseconds.
    pub resize_debounce_ms: u64,

    /// Post-initialization layout settle in milliseconds.
    pub settle_delay_ms: u64,

    /// Document URL used to resolve relative image sources.
    pub base_url: Option<Url>,
}

impl Default for EnhancerOptions {
    fn default() -> Self {
        Self {
            article_root: "#article".into(),
            compare: CompareClasses::default(),
            carousel: CarouselClasses::default(),
            gallery: GalleryOptions::default(),
            labels: Labels::default(),
            resize_debounce_ms: DEFAULT_RESIZE_DEBOUNCE.as_millis() as u64,
            settle_delay_ms: DEFAULT_SETTLE_DELAY.as_millis() as u64,
            base_url: None,
        }
    }
}

// ============================================================================
// Constructors
// ============================================================================

impl EnhancerOptions {
    /// Creates options with the stock theme defaults.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses options from JSON; missing fields keep their defaults.
    ///
    /// # Errors
    ///
    /// - [`Error::Json`] on malformed input
    /// - [`Error::Config`] if the result fails [`validate`](Self::validate)
    pub fn from_json(json: &str) -> Result<Self> {
        let options: Self = serde_json::from_str(json)?;
        options.validate()?;
        Ok(options)
    }
}

// ============================================================================
// Builder Methods
// ============================================================================

impl EnhancerOptions {
    /// Sets the article root selector.
    #[inline]
    #[must_use]
    pub fn with_article_root(mut self, selector: impl Into<String>) -> Self {
        self.article_root = selector.into();
        self
    }

    /// Sets the compare-slider class names.
    #[inline]
    #[must_use]
    pub fn with_compare_classes(mut self, classes: CompareClasses) -> Self {
        self.compare = classes;
        self
    }

    /// Sets the carousel class names.
    #[inline]
    #[must_use]
    pub fn with_carousel_classes(mut self, classes: CarouselClasses) -> Self {
        self.carousel = classes;
        self
    }

    /// Sets the gallery markup options.
    #[inline]
    #[must_use]
    pub fn with_gallery(mut self, gallery: GalleryOptions) -> Self {
        self.gallery = gallery;
        self
    }

    /// Sets the carousel labels.
    #[inline]
    #[must_use]
    pub fn with_labels(mut self, labels: Labels) -> Self {
        self.labels = labels;
        self
    }

    /// Sets the resize debounce.
    #[inline]
    #[must_use]
    pub fn with_resize_debounce(mut self, delay: Duration) -> Self {
        self.resize_debounce_ms = delay.as_millis() as u64;
        self
    }

    /// Sets the post-initialization settle delay.
    #[inline]
    #[must_use]
    pub fn with_settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay_ms = delay.as_millis() as u64;
        self
    }

    /// Sets the document URL used to resolve relative image sources.
    ///
    /// # Errors
    ///
    /// - [`Error::Url`] if `url` does not parse
    pub fn with_base_url(mut self, url: &str) -> Result<Self> {
        self.base_url = Some(Url::parse(url)?);
        Ok(self)
    }
}

// ============================================================================
// Accessors
// ============================================================================

impl EnhancerOptions {
    /// Article root as a selector.
    #[must_use]
    pub fn article_selector(&self) -> Selector {
        Selector::from(self.article_root.as_str())
    }

    /// Resize debounce as a duration.
    #[inline]
    #[must_use]
    pub fn resize_debounce(&self) -> Duration {
        Duration::from_millis(self.resize_debounce_ms)
    }

    /// Settle delay as a duration.
    #[inline]
    #[must_use]
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    /// Validates the options.
    ///
    /// # Errors
    ///
    /// - [`Error::Config`] if a class name or the article root is blank
    pub fn validate(&self) -> Result<()> {
        if self.article_root.trim().is_empty() {
            return Err(Error::config("article root selector must not be empty"));
        }
        if self.resize_debounce_ms == 0 {
            return Err(Error::config("resize debounce must be at least 1 ms"));
        }

        let class_names = [
            ("compare.container", &self.compare.container),
            ("compare.handle", &self.compare.handle),
            ("compare.before", &self.compare.before),
            ("compare.after", &self.compare.after),
            ("carousel.container", &self.carousel.container),
            ("carousel.track", &self.carousel.track),
            ("carousel.slide", &self.carousel.slide),
            ("carousel.dot", &self.carousel.dot),
            ("carousel.active", &self.carousel.active),
            ("gallery.linkClass", &self.gallery.link_class),
        ];
        for (field, value) in class_names {
            if value.trim().is_empty() || value.contains(char::is_whitespace) {
                return Err(Error::config(format!(
                    "{field} must be a single class name, got {value:?}"
                )));
            }
        }

        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
