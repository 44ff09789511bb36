//! Widget registry and page entry points.
//!
//! The [`Enhancer`] owns every controller on a page, keyed by container
//! node. Scans are create-if-absent: running one again only picks up
//! containers that appeared since, and drops controllers whose containers
//! left the document.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use article_widgets::{Enhancer, UiEvent, dom::MemoryDom};
//!
//! let dom = Arc::new(MemoryDom::new());
//! let enhancer = Enhancer::builder().dom(dom.clone()).build()?;
//!
//! let summary = enhancer.on_ready();
//! println!("{} carousels", summary.carousels);
//!
//! enhancer.dispatch(&UiEvent::WindowResize);
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use serde::Serialize;
use tracing::{debug, info, trace};

use crate::carousel::{Carousel, CarouselSettings};
use crate::compare::CompareSlider;
use crate::config::mark_initialized;
use crate::dom::{Dom, Selector};
use crate::events::{Dispatch, UiEvent};
use crate::gallery;
use crate::identifiers::NodeId;

use super::builder::EnhancerBuilder;
use super::options::EnhancerOptions;

// ============================================================================
// Types
// ============================================================================

/// Internal shared state for the enhancer.
pub(crate) struct EnhancerInner {
    /// Document the widgets operate on.
    pub dom: Arc<dyn Dom>,

    /// Site-level options.
    pub options: EnhancerOptions,

    /// Compare sliders by container.
    pub compares: RwLock<FxHashMap<NodeId, Arc<CompareSlider>>>,

    /// Carousels by container.
    pub carousels: RwLock<FxHashMap<NodeId, Carousel>>,
}

/// Result of [`Enhancer::on_ready`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadySummary {
    /// Images wrapped by the gallery pass.
    pub gallery_images: usize,
    /// Compare sliders created.
    pub compare_sliders: usize,
    /// Carousels created.
    pub carousels: usize,
}

// ============================================================================
// Enhancer
// ============================================================================

/// Registry and entry point for the article widgets.
#[derive(Clone)]
pub struct Enhancer {
    /// Shared inner state.
    pub(crate) inner: Arc<EnhancerInner>,
}

// ============================================================================
// Enhancer - Display
// ============================================================================

impl fmt::Debug for Enhancer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Enhancer")
            .field("article_root", &self.inner.options.article_root)
            .field("compare_count", &self.compare_count())
            .field("carousel_count", &self.carousel_count())
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Enhancer - Constructor
// ============================================================================

impl Enhancer {
    /// Creates a configuration builder.
    #[inline]
    #[must_use]
    pub fn builder() -> EnhancerBuilder {
        EnhancerBuilder::new()
    }

    /// Creates an enhancer over `dom`. Options are assumed valid.
    pub(crate) fn new(dom: Arc<dyn Dom>, options: EnhancerOptions) -> Self {
        let inner = EnhancerInner {
            dom,
            options,
            compares: RwLock::new(FxHashMap::default()),
            carousels: RwLock::new(FxHashMap::default()),
        };
        Self {
            inner: Arc::new(inner),
        }
    }

    /// Options in effect.
    #[inline]
    #[must_use]
    pub fn options(&self) -> &EnhancerOptions {
        &self.inner.options
    }

    /// The document.
    #[inline]
    #[must_use]
    pub fn dom(&self) -> &Arc<dyn Dom> {
        &self.inner.dom
    }
}

// ============================================================================
// Enhancer - Scans
// ============================================================================

impl Enhancer {
    /// Runs the gallery pass and both widget scans.
    pub fn on_ready(&self) -> ReadySummary {
        let summary = ReadySummary {
            gallery_images: self.wrap_gallery_images(),
            compare_sliders: self.init_image_compare(),
            carousels: self.init_image_carousel(),
        };
        info!(
            gallery_images = summary.gallery_images,
            compare_sliders = summary.compare_sliders,
            carousels = summary.carousels,
            "Article widgets ready"
        );
        summary
    }

    /// Wraps article images for the lightbox. Returns the number wrapped.
    pub fn wrap_gallery_images(&self) -> usize {
        gallery::wrap_gallery_images(&*self.inner.dom, &self.inner.options)
    }

    /// Creates a compare slider for every new container.
    ///
    /// Returns the number created by this call.
    pub fn init_image_compare(&self) -> usize {
        let dom = &self.inner.dom;
        let classes = &self.inner.options.compare;
        let mut compares = self.inner.compares.write();

        compares.retain(|&container, _| {
            let attached = dom.contains(container);
            if !attached {
                debug!(node = %container, "Dropping detached compare slider");
            }
            attached
        });

        let mut created = 0;
        for container in self.candidates(&classes.container) {
            if compares.contains_key(&container) {
                continue;
            }
            if let Some(slider) = CompareSlider::initialize(Arc::clone(dom), container, classes) {
                compares.insert(container, Arc::new(slider));
                created += 1;
            }
        }

        if created > 0 {
            info!(created, total = compares.len(), "Compare sliders initialized");
        }
        created
    }

    /// Creates a carousel for every new container.
    ///
    /// Returns the number created by this call.
    pub fn init_image_carousel(&self) -> usize {
        let dom = &self.inner.dom;
        let options = &self.inner.options;
        let mut carousels = self.inner.carousels.write();

        carousels.retain(|&container, carousel| {
            let attached = dom.contains(container);
            if !attached {
                debug!(node = %container, "Dropping detached carousel");
                carousel.shutdown();
            }
            attached
        });

        let settings = CarouselSettings {
            classes: options.carousel.clone(),
            labels: options.labels.clone(),
            resize_debounce: options.resize_debounce(),
            settle_delay: options.settle_delay(),
        };

        let mut created = 0;
        for container in self.candidates(&options.carousel.container) {
            if carousels.contains_key(&container) {
                continue;
            }
            if let Some(carousel) = Carousel::initialize(Arc::clone(dom), container, settings.clone())
            {
                carousels.insert(container, carousel);
                created += 1;
            }
        }

        if created > 0 {
            info!(created, total = carousels.len(), "Carousels initialized");
        }
        created
    }

    /// Containers carrying `class`, in document order.
    ///
    /// Containers marked by an earlier scan, or by another script, are
    /// rejected by the controllers' own initialized check.
    fn candidates(&self, class: &str) -> Vec<NodeId> {
        let dom = &self.inner.dom;
        dom.query_all(dom.root(), &Selector::class(class))
    }
}

// ============================================================================
// Enhancer - Events
// ============================================================================

impl Enhancer {
    /// Delivers `event` to every controller.
    ///
    /// Controllers are snapshotted first, so a handler may rescan or
    /// dispose without deadlocking.
    pub fn dispatch(&self, event: &UiEvent) -> Dispatch {
        let compares: Vec<_> = self.inner.compares.read().values().cloned().collect();
        let carousels: Vec<_> = self.inner.carousels.read().values().cloned().collect();

        let outcome = compares
            .iter()
            .map(|slider| slider.handle_event(event))
            .chain(carousels.iter().map(|carousel| carousel.handle_event(event)))
            .fold(Dispatch::Ignored, Dispatch::or);

        trace!(event = event.name(), handled = outcome.is_handled(), "Event dispatched");
        outcome
    }
}

// ============================================================================
// Enhancer - Registry
// ============================================================================

impl Enhancer {
    /// Compare slider managing `container`.
    #[must_use]
    pub fn compare(&self, container: NodeId) -> Option<Arc<CompareSlider>> {
        self.inner.compares.read().get(&container).cloned()
    }

    /// Carousel managing `container`.
    #[must_use]
    pub fn carousel(&self, container: NodeId) -> Option<Carousel> {
        self.inner.carousels.read().get(&container).cloned()
    }

    /// Number of live compare sliders.
    #[inline]
    #[must_use]
    pub fn compare_count(&self) -> usize {
        self.inner.compares.read().len()
    }

    /// Number of live carousels.
    #[inline]
    #[must_use]
    pub fn carousel_count(&self) -> usize {
        self.inner.carousels.read().len()
    }

    /// Tears down the controller of `container`, if any.
    ///
    /// The container's marker is cleared so a later scan can pick it up
    /// again. Returns `true` if a controller was removed.
    pub fn dispose(&self, container: NodeId) -> bool {
        let compare = self.inner.compares.write().remove(&container);
        let carousel = self.inner.carousels.write().remove(&container);

        if let Some(carousel) = &carousel {
            carousel.shutdown();
        }

        let removed = compare.is_some() || carousel.is_some();
        if removed {
            mark_initialized(&*self.inner.dom, container, false);
            debug!(node = %container, "Widget disposed");
        }
        removed
    }

    /// Tears down every controller.
    pub fn dispose_all(&self) {
        let containers: Vec<NodeId> = {
            let compares = self.inner.compares.read();
            let carousels = self.inner.carousels.read();
            compares.keys().chain(carousels.keys()).copied().collect()
        };

        let count = containers
            .into_iter()
            .filter(|&container| self.dispose(container))
            .count();
        info!(count, "All widgets disposed");
    }
}

// ============================================================================
// Tests
// ============================================================================
