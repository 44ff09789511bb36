//! Auto-advancing image carousel.
//!
//! One [`Carousel`] drives one container: it translates the slide track,
//! keeps the pagination dots in sync, and advances on a timer unless the
//! user paused it or the pointer is over it.
//!
//! Expected markup (class names configurable through
//! [`CarouselClasses`]):
//!
//! ```text
//! div.image-carousel-container[data-height][data-interval]
//! ├── div.carousel-wrapper
//! │   └── div.carousel-track
//! │       ├── div.carousel-slide > img[alt]
//! │       └── ...
//! ├── button.carousel-prev
//! ├── button.carousel-next
//! ├── button.carousel-play-pause
//! └── div.carousel-dots
//! ```
//!
//! # Autoplay
//!
//! At most one autoplay timer is live per carousel. Two independent
//! suppressors stop it: the explicit pause toggle and pointer hover. The
//! timer runs only while neither is active. Every timer carries a generation
//! number; a tick from a superseded timer is discarded under the state lock,
//! so replacing a timer can never produce a double advance.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::ops::ControlFlow;
use std::sync::{Arc, Weak};
use std::time::Duration;

use parking_lot::Mutex;
use tracing::{debug, trace, warn};

use crate::config::{CarouselConfig, is_initialized, mark_initialized};
use crate::dom::{Dom, Selector};
use crate::enhancer::options::{CarouselClasses, Labels};
use crate::error::Result;
use crate::events::{Dispatch, UiEvent};
use crate::identifiers::NodeId;
use crate::timer::{self, TaskHandle};

// ============================================================================
// Index Math
// ============================================================================

/// Wraps `index` circularly into `[0, len)`. `len` must be non-zero.
#[inline]
#[must_use]
pub fn wrap_index(index: isize, len: usize) -> usize {
    index.rem_euclid(len as isize) as usize
}

// ============================================================================
// Types
// ============================================================================

/// Mutable state, guarded by [`CarouselInner::state`].
#[derive(Debug, Default)]
struct CarouselState {
    current: usize,
    paused: bool,
    hovered: bool,
    /// Bumped on every start/stop; ticks from older timers are dropped.
    generation: u64,
    autoplay: Option<TaskHandle>,
    resize: Option<TaskHandle>,
    settle: Option<TaskHandle>,
}

/// Located markup of one container.
#[derive(Debug, Clone)]
struct Parts {
    container: NodeId,
    wrapper: Option<NodeId>,
    track: NodeId,
    slides: Vec<NodeId>,
    prev: Option<NodeId>,
    next: Option<NodeId>,
    play_pause: Option<NodeId>,
    dots_container: Option<NodeId>,
}

/// Settings copied out of the enhancer options.
#[derive(Debug, Clone)]
pub struct CarouselSettings {
    /// Class names of the markup.
    pub classes: CarouselClasses,
    /// Labels for the toggle and dots.
    pub labels: Labels,
    /// Quiet period before a resize re-layout.
    pub resize_debounce: Duration,
    /// Delay of the one-off re-layout after initialization.
    pub settle_delay: Duration,
}

/// Shared controller internals.
struct CarouselInner {
    this: Weak<CarouselInner>,
    dom: Arc<dyn Dom>,
    parts: Parts,
    dots: Vec<NodeId>,
    config: CarouselConfig,
    settings: CarouselSettings,
    state: Mutex<CarouselState>,
}

// ============================================================================
// Carousel
// ============================================================================

/// Controller of one carousel container.
///
/// Cheap to clone; clones share the same state.
#[derive(Clone)]
pub struct Carousel {
    inner: Arc<CarouselInner>,
}

// ============================================================================
// Carousel - Display
// ============================================================================

impl fmt::Debug for Carousel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.state.lock();
        f.debug_struct("Carousel")
            .field("container", &self.inner.parts.container)
            .field("slides", &self.inner.parts.slides.len())
            .field("current", &state.current)
            .field("paused", &state.paused)
            .field("hovered", &state.hovered)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Carousel - Constructor
// ============================================================================

impl Carousel {
    /// Takes control of `container`.
    ///
    /// Returns `None` when the container has no track or no slides, or when
    /// it is already managed. On success the container is marked
    /// `data-initialized="true"`. When no tokio runtime is available the
    /// carousel still works for manual navigation; autoplay stays off.
    pub fn initialize(
        dom: Arc<dyn Dom>,
        container: NodeId,
        settings: CarouselSettings,
    ) -> Option<Self> {
        if is_initialized(&*dom, container) {
            trace!(node = %container, "Carousel container already initialized");
            return None;
        }

        let parts = Self::locate(&*dom, container, &settings.classes)?;
        let config = CarouselConfig::from_container(&*dom, container);

        if let (Some(wrapper), Some(height)) = (parts.wrapper, &config.height) {
            dom.set_style(wrapper, "height", &height.css_value());
        }

        Self::write_titles(&*dom, &parts, &settings.classes);
        let dots = Self::build_dots(&*dom, &parts, &settings);

        if let Some(toggle) = parts.play_pause {
            dom.set_attribute(toggle, "aria-label", &settings.labels.pause);
        }

        let inner = Arc::new_cyclic(|this| CarouselInner {
            this: this.clone(),
            dom,
            parts,
            dots,
            config,
            settings,
            state: Mutex::new(CarouselState::default()),
        });
        let carousel = Self { inner };

        {
            let mut state = carousel.inner.state.lock();
            carousel.inner.apply_index(&mut state, 0);
            if let Err(err) = carousel.inner.restart_autoplay(&mut state) {
                warn!(node = %container, error = %err, "Autoplay unavailable");
            }
            carousel.inner.schedule_settle(&mut state);
        }
        mark_initialized(&*carousel.inner.dom, container, true);

        debug!(
            node = %container,
            slides = carousel.slide_count(),
            interval_ms = carousel.inner.config.interval.as_millis() as u64,
            "Carousel initialized"
        );
        Some(carousel)
    }

    fn locate<D: Dom + ?Sized>(
        dom: &D,
        container: NodeId,
        classes: &CarouselClasses,
    ) -> Option<Parts> {
        let find = |class: &str| dom.query(container, &Selector::class(class));

        let Some(track) = find(classes.track.as_str()) else {
            debug!(node = %container, "Carousel has no track, skipping");
            return None;
        };
        let slides = dom.query_all(container, &Selector::class(&classes.slide));
        if slides.is_empty() {
            debug!(node = %container, "Carousel has no slides, skipping");
            return None;
        }

        Some(Parts {
            container,
            wrapper: find(classes.wrapper.as_str()),
            track,
            slides,
            prev: find(classes.prev.as_str()),
            next: find(classes.next.as_str()),
            play_pause: find(classes.play_pause.as_str()),
            dots_container: find(classes.dots.as_str()),
        })
    }

    /// Writes each slide image's `alt` into the slide's title element.
    fn write_titles<D: Dom + ?Sized>(dom: &D, parts: &Parts, classes: &CarouselClasses) {
        let image = Selector::tag("img");
        let title_selector = Selector::class(&classes.slide_title);

        for &slide in &parts.slides {
            let Some(alt) = dom
                .query(slide, &image)
                .and_then(|img| dom.attribute(img, "alt"))
                .filter(|alt| !alt.is_empty())
            else {
                continue;
            };

            let title = match dom.query(slide, &title_selector) {
                Some(title) => title,
                None => {
                    let title = dom.create_element("div");
                    dom.add_class(title, &classes.slide_title);
                    if let Err(err) = dom.append_child(slide, title) {
                        warn!(node = %slide, error = %err, "Could not attach slide title");
                        continue;
                    }
                    title
                }
            };
            dom.set_text(title, &alt);
        }
    }

    /// Replaces the pagination content with one dot per slide.
    fn build_dots<D: Dom + ?Sized>(
        dom: &D,
        parts: &Parts,
        settings: &CarouselSettings,
    ) -> Vec<NodeId> {
        let Some(dots_container) = parts.dots_container else {
            return Vec::new();
        };
        if parts.slides.len() <= 1 {
            return Vec::new();
        }

        dom.clear_children(dots_container);
        let mut dots = Vec::with_capacity(parts.slides.len());
        for index in 0..parts.slides.len() {
            let dot = dom.create_element("button");
            dom.add_class(dot, &settings.classes.dot);
            if index == 0 {
                dom.add_class(dot, &settings.classes.active);
            }
            dom.set_attribute(dot, "aria-label", &settings.labels.dot(index));
            match dom.append_child(dots_container, dot) {
                Ok(()) => dots.push(dot),
                Err(err) => warn!(node = %dots_container, error = %err, "Could not attach dot"),
            }
        }
        dots
    }
}

// ============================================================================
// Carousel - Accessors
// ============================================================================

impl Carousel {
    /// The container this controller manages.
    #[inline]
    #[must_use]
    pub fn container(&self) -> NodeId {
        self.inner.parts.container
    }

    /// The translated track.
    #[inline]
    #[must_use]
    pub fn track(&self) -> NodeId {
        self.inner.parts.track
    }

    /// Slides in order.
    #[inline]
    #[must_use]
    pub fn slides(&self) -> &[NodeId] {
        &self.inner.parts.slides
    }

    /// Number of slides.
    #[inline]
    #[must_use]
    pub fn slide_count(&self) -> usize {
        self.inner.parts.slides.len()
    }

    /// Pagination dots created at initialization.
    #[inline]
    #[must_use]
    pub fn dots(&self) -> &[NodeId] {
        &self.inner.dots
    }

    /// Options read at initialization.
    #[inline]
    #[must_use]
    pub fn config(&self) -> &CarouselConfig {
        &self.inner.config
    }

    /// Index of the visible slide.
    #[must_use]
    pub fn current_index(&self) -> usize {
        self.inner.state.lock().current
    }

    /// Returns `true` if the explicit toggle is paused.
    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.inner.state.lock().paused
    }

    /// Returns `true` while the pointer is over the container.
    #[must_use]
    pub fn is_hovered(&self) -> bool {
        self.inner.state.lock().hovered
    }

    /// Returns `true` if an autoplay timer is live.
    #[must_use]
    pub fn is_autoplaying(&self) -> bool {
        self.inner
            .state
            .lock()
            .autoplay
            .as_ref()
            .is_some_and(TaskHandle::is_active)
    }
}

// ============================================================================
// Carousel - Navigation
// ============================================================================

impl Carousel {
    /// Shows slide `index`, wrapped circularly.
    ///
    /// Returns the index actually shown.
    pub fn go_to_slide(&self, index: isize) -> usize {
        let mut state = self.inner.state.lock();
        self.inner.apply_index(&mut state, index)
    }

    /// Shows the next slide.
    pub fn next(&self) -> usize {
        let mut state = self.inner.state.lock();
        let target = state.current as isize + 1;
        self.inner.apply_index(&mut state, target)
    }

    /// Shows the previous slide.
    pub fn prev(&self) -> usize {
        let mut state = self.inner.state.lock();
        let target = state.current as isize - 1;
        self.inner.apply_index(&mut state, target)
    }

    /// Steps by `delta` as a user action: the autoplay timer restarts so
    /// the next automatic advance is a full interval away.
    pub fn navigate(&self, delta: isize) -> usize {
        let mut state = self.inner.state.lock();
        let target = state.current as isize + delta;
        let index = self.inner.apply_index(&mut state, target);
        if !state.paused && !state.hovered {
            self.inner.restart_or_warn(&mut state);
        }
        index
    }
}

// ============================================================================
// Carousel - Autoplay
// ============================================================================

impl Carousel {
    /// Starts (or restarts) autoplay. No-op with a single slide.
    ///
    /// # Errors
    ///
    /// - [`Error::NoRuntime`](crate::Error::NoRuntime) outside a tokio runtime
    pub fn start_autoplay(&self) -> Result<()> {
        let mut state = self.inner.state.lock();
        self.inner.restart_autoplay(&mut state)
    }

    /// Stops autoplay. Idempotent.
    pub fn stop_autoplay(&self) {
        let mut state = self.inner.state.lock();
        self.inner.stop_autoplay(&mut state);
    }

    /// Flips the explicit pause toggle. Returns the new paused state.
    ///
    /// Pausing stops the timer. Resuming starts a fresh one unless the
    /// pointer is still over the container.
    pub fn toggle_play_pause(&self) -> bool {
        let mut state = self.inner.state.lock();
        state.paused = !state.paused;
        let paused = state.paused;

        if let Some(toggle) = self.inner.parts.play_pause {
            let dom = &self.inner.dom;
            let (label, classes) = (&self.inner.settings.labels, &self.inner.settings.classes);
            if paused {
                dom.add_class(toggle, &classes.paused);
                dom.set_attribute(toggle, "aria-label", &label.play);
            } else {
                dom.remove_class(toggle, &classes.paused);
                dom.set_attribute(toggle, "aria-label", &label.pause);
            }
        }

        if paused {
            self.inner.stop_autoplay(&mut state);
        } else if !state.hovered {
            self.inner.restart_or_warn(&mut state);
        }

        debug!(node = %self.container(), paused, "Play/pause toggled");
        paused
    }

    /// Pointer entered the container.
    pub fn hover_enter(&self) {
        let mut state = self.inner.state.lock();
        state.hovered = true;
        if !state.paused {
            self.inner.stop_autoplay(&mut state);
        }
    }

    /// Pointer left the container. Resumes unless explicitly paused.
    pub fn hover_leave(&self) {
        let mut state = self.inner.state.lock();
        state.hovered = false;
        if !state.paused {
            self.inner.restart_or_warn(&mut state);
        }
    }

    /// Schedules a re-layout once resizing has been quiet for the debounce
    /// period. Index and autoplay are left alone.
    pub fn on_window_resize(&self) {
        let mut state = self.inner.state.lock();
        let this = self.inner.this.clone();
        let delay = self.inner.settings.resize_debounce;

        match timer::spawn_timeout("carousel-resize", delay, move || {
            if let Some(inner) = this.upgrade() {
                inner.relayout();
            }
        }) {
            Ok(handle) => state.resize = Some(handle),
            Err(err) => {
                trace!(error = %err, "No runtime for debounce, re-laying out now");
                state.resize = None;
                let current = state.current as isize;
                self.inner.apply_index(&mut state, current);
            }
        }
    }

    /// Cancels every scheduled task of this carousel.
    pub fn shutdown(&self) {
        let mut state = self.inner.state.lock();
        self.inner.stop_autoplay(&mut state);
        state.resize = None;
        state.settle = None;
        debug!(node = %self.container(), "Carousel shut down");
    }
}

// ============================================================================
// Carousel - Events
// ============================================================================

impl Carousel {
    fn control_hit(&self, target: NodeId, control: Option<NodeId>) -> bool {
        control.is_some_and(|control| self.inner.dom.is_within(target, control))
    }

    /// Reacts to one event.
    pub fn handle_event(&self, event: &UiEvent) -> Dispatch {
        let container = self.container();
        match *event {
            UiEvent::Click { target } => {
                if !self.inner.dom.is_within(target, container) {
                    return Dispatch::Ignored;
                }
                let parts = &self.inner.parts;
                if self.control_hit(target, parts.next) {
                    self.navigate(1);
                } else if self.control_hit(target, parts.prev) {
                    self.navigate(-1);
                } else if self.control_hit(target, parts.play_pause) {
                    self.toggle_play_pause();
                } else if let Some(index) = self
                    .inner
                    .dots
                    .iter()
                    .position(|&dot| self.inner.dom.is_within(target, dot))
                {
                    self.go_to_slide(index as isize);
                } else {
                    return Dispatch::Ignored;
                }
                Dispatch::Handled
            }
            UiEvent::PointerEnter { target } if target == container => {
                self.hover_enter();
                Dispatch::Handled
            }
            UiEvent::PointerLeave { target } if target == container => {
                self.hover_leave();
                Dispatch::Handled
            }
            UiEvent::WindowResize => {
                self.on_window_resize();
                Dispatch::Handled
            }
            _ => Dispatch::Ignored,
        }
    }
}

// ============================================================================
// CarouselInner
// ============================================================================

impl CarouselInner {
    /// Moves to `index` (wrapped) and renders it. Caller holds the lock.
    fn apply_index(&self, state: &mut CarouselState, index: isize) -> usize {
        let len = self.parts.slides.len();
        if len == 0 {
            return 0;
        }
        let index = wrap_index(index, len);
        state.current = index;

        let viewport = self.parts.wrapper.unwrap_or(self.parts.container);
        let offset = index as f64 * self.dom.bounding_rect(viewport).width;
        self.dom.set_style(
            self.parts.track,
            "transform",
            &format!("translateX(-{offset}px)"),
        );

        for (position, &dot) in self.dots.iter().enumerate() {
            if position == index {
                self.dom.add_class(dot, &self.settings.classes.active);
            } else {
                self.dom.remove_class(dot, &self.settings.classes.active);
            }
        }

        trace!(node = %self.parts.container, index, offset, "Slide shown");
        index
    }

    fn relayout(&self) {
        let mut state = self.state.lock();
        let current = state.current as isize;
        self.apply_index(&mut state, current);
    }

    fn stop_autoplay(&self, state: &mut CarouselState) {
        if let Some(mut handle) = state.autoplay.take() {
            handle.cancel();
            trace!(node = %self.parts.container, "Autoplay stopped");
        }
        state.generation += 1;
    }

    fn restart_autoplay(&self, state: &mut CarouselState) -> Result<()> {
        self.stop_autoplay(state);
        if self.parts.slides.len() <= 1 {
            return Ok(());
        }

        let generation = state.generation;
        let this = self.this.clone();
        let handle = timer::spawn_interval("carousel-autoplay", self.config.interval, move || {
            match this.upgrade() {
                Some(inner) => inner.autoplay_tick(generation),
                None => ControlFlow::Break(()),
            }
        })?;

        state.autoplay = Some(handle);
        trace!(node = %self.parts.container, generation, "Autoplay started");
        Ok(())
    }

    fn restart_or_warn(&self, state: &mut CarouselState) {
        if let Err(err) = self.restart_autoplay(state) {
            warn!(node = %self.parts.container, error = %err, "Autoplay unavailable");
        }
    }

    fn autoplay_tick(&self, generation: u64) -> ControlFlow<()> {
        let mut state = self.state.lock();
        if state.generation != generation {
            return ControlFlow::Break(());
        }
        if !state.paused {
            let target = state.current as isize + 1;
            self.apply_index(&mut state, target);
        }
        ControlFlow::Continue(())
    }

    fn schedule_settle(&self, state: &mut CarouselState) {
        let this = self.this.clone();
        state.settle = timer::spawn_timeout("carousel-settle", self.settings.settle_delay, move || {
            if let Some(inner) = this.upgrade() {
                inner.relayout();
            }
        })
        .ok();
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{ElementSpec, MemoryDom, Rect};

    use proptest::prelude::*;
    use tokio::time::sleep;

    fn settings() -> CarouselSettings {
        CarouselSettings {
            classes: CarouselClasses::default(),
            labels: Labels::default(),
            resize_debounce: Duration::from_millis(100),
            settle_delay: Duration::from_millis(100),
        }
    }

    fn markup(slides: usize, attrs: &[(&str, &str)]) -> (Arc<MemoryDom>, NodeId) {
        let dom = Arc::new(MemoryDom::new());
        let mut track = ElementSpec::new("div").class("carousel-track");
        for i in 0..slides {
            track = track.child(
                ElementSpec::new("div").class("carousel-slide").child(
                    ElementSpec::new("img")
                        .attr("src", &format!("/s{i}.jpg"))
                        .attr("alt", &format!("Slide {i}")),
                ),
            );
        }
        let container = attrs.iter().fold(
            ElementSpec::new("div").class("image-carousel-container"),
            |spec, (name, value)| spec.attr(name, value),
        );
        let container = dom.build(
            dom.root(),
            container
                .child(
                    ElementSpec::new("div")
                        .class("carousel-wrapper")
                        .rect(Rect::new(0.0, 0.0, 400.0, 300.0))
                        .child(track),
                )
                .child(ElementSpec::new("button").class("carousel-prev"))
                .child(ElementSpec::new("button").class("carousel-next"))
                .child(ElementSpec::new("button").class("carousel-play-pause"))
                .child(ElementSpec::new("div").class("carousel-dots")),
        );
        (dom, container)
    }

    fn carousel(slides: usize) -> (Arc<MemoryDom>, Carousel) {
        let (dom, container) = markup(slides, &[]);
        let carousel = Carousel::initialize(dom.clone(), container, settings()).unwrap();
        (dom, carousel)
    }

    fn find(dom: &MemoryDom, root: NodeId, class: &str) -> NodeId {
        dom.query(root, &Selector::class(class)).unwrap()
    }

    fn transform(dom: &MemoryDom, carousel: &Carousel) -> String {
        dom.style(carousel.track(), "transform").unwrap_or_default()
    }

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    #[tokio::test(start_paused = true)]
    async fn test_initial_state() {
        let (dom, carousel) = carousel(3);

        assert_eq!(carousel.current_index(), 0);
        assert_eq!(transform(&dom, &carousel), "translateX(-0px)");
        assert!(carousel.is_autoplaying());
        assert!(!carousel.is_paused());

        assert_eq!(carousel.dots().len(), 3);
        assert!(dom.has_class(carousel.dots()[0], "active"));
        assert_eq!(
            dom.attribute(carousel.dots()[2], "aria-label").as_deref(),
            Some("Go to slide 3")
        );

        let toggle = find(&dom, carousel.container(), "carousel-play-pause");
        assert_eq!(dom.attribute(toggle, "aria-label").as_deref(), Some("Pause"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_titles_from_alt() {
        let (dom, carousel) = carousel(2);
        for (i, &slide) in carousel.slides().iter().enumerate() {
            let title = find(&dom, slide, "carousel-slide-title");
            assert_eq!(dom.text(title), format!("Slide {i}"));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_existing_title_reused() {
        let (dom, container) = markup(1, &[]);
        let slide = find(&dom, container, "carousel-slide");
        let existing = dom.build(slide, ElementSpec::new("div").class("carousel-slide-title"));

        Carousel::initialize(dom.clone(), container, settings()).unwrap();

        let titles = dom.query_all(slide, &Selector::class("carousel-slide-title"));
        assert_eq!(titles, vec![existing]);
        assert_eq!(dom.text(existing), "Slide 0");
    }

    #[tokio::test(start_paused = true)]
    async fn test_natural_tick_advances() {
        let (dom, carousel) = carousel(3);

        sleep(ms(1990)).await;
        assert_eq!(carousel.current_index(), 0);

        sleep(ms(20)).await;
        assert_eq!(carousel.current_index(), 1);
        assert_eq!(transform(&dom, &carousel), "translateX(-400px)");
        assert!(dom.has_class(carousel.dots()[1], "active"));
        assert!(!dom.has_class(carousel.dots()[0], "active"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_prev_wraps_from_end_scenario() {
        let (dom, carousel) = carousel(3);
        let prev = find(&dom, carousel.container(), "carousel-prev");

        sleep(ms(2010)).await;
        assert_eq!(carousel.current_index(), 1);

        carousel.handle_event(&UiEvent::Click { target: prev });
        assert_eq!(carousel.current_index(), 0);
        carousel.handle_event(&UiEvent::Click { target: prev });
        assert_eq!(carousel.current_index(), 2);
        carousel.handle_event(&UiEvent::Click { target: prev });
        assert_eq!(carousel.current_index(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_custom_interval() {
        let (dom, container) = markup(3, &[("data-interval", "500")]);
        let carousel = Carousel::initialize(dom, container, settings()).unwrap();

        sleep(ms(1010)).await;
        assert_eq!(carousel.current_index(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_single_slide_never_autoplays() {
        let (dom, carousel) = carousel(1);

        assert!(!carousel.is_autoplaying());
        assert!(carousel.dots().is_empty());
        let dots = find(&dom, carousel.container(), "carousel-dots");
        assert!(dom.children(dots).is_empty());

        assert_eq!(carousel.next(), 0);
        assert_eq!(carousel.prev(), 0);
        assert!(carousel.start_autoplay().is_ok());
        assert!(!carousel.is_autoplaying());

        carousel.hover_leave();
        sleep(ms(10_000)).await;
        assert_eq!(carousel.current_index(), 0);
        assert!(!carousel.is_autoplaying());
    }

    #[tokio::test(start_paused = true)]
    async fn test_manual_navigation_resets_timer() {
        let (dom, carousel) = carousel(4);
        let next = find(&dom, carousel.container(), "carousel-next");

        sleep(ms(1500)).await;
        carousel.handle_event(&UiEvent::Click { target: next });
        assert_eq!(carousel.current_index(), 1);

        // The original schedule would have ticked at 2000.
        sleep(ms(1000)).await;
        assert_eq!(carousel.current_index(), 1);

        sleep(ms(1010)).await;
        assert_eq!(carousel.current_index(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_pause_suppresses_advance() {
        let (dom, carousel) = carousel(3);
        let toggle = find(&dom, carousel.container(), "carousel-play-pause");

        carousel.handle_event(&UiEvent::Click { target: toggle });
        assert!(carousel.is_paused());
        assert!(dom.has_class(toggle, "paused"));
        assert_eq!(dom.attribute(toggle, "aria-label").as_deref(), Some("Play"));

        sleep(ms(10_000)).await;
        assert_eq!(carousel.current_index(), 0);

        // Manual navigation still works while paused, without a timer.
        let next = find(&dom, carousel.container(), "carousel-next");
        carousel.handle_event(&UiEvent::Click { target: next });
        assert_eq!(carousel.current_index(), 1);
        assert!(!carousel.is_autoplaying());
    }

    #[tokio::test(start_paused = true)]
    async fn test_pause_resume_does_not_skip() {
        let (_dom, carousel) = carousel(5);

        sleep(ms(1000)).await;
        assert!(carousel.toggle_play_pause());
        sleep(ms(500)).await;
        assert!(!carousel.toggle_play_pause());

        sleep(ms(1990)).await;
        assert_eq!(carousel.current_index(), 0);

        sleep(ms(20)).await;
        assert_eq!(carousel.current_index(), 1);

        sleep(ms(2000)).await;
        assert_eq!(carousel.current_index(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_hover_pauses_and_resumes() {
        let (_dom, carousel) = carousel(3);
        let container = carousel.container();

        carousel.handle_event(&UiEvent::PointerEnter { target: container });
        assert!(carousel.is_hovered());
        assert!(!carousel.is_autoplaying());

        sleep(ms(10_000)).await;
        assert_eq!(carousel.current_index(), 0);

        carousel.handle_event(&UiEvent::PointerLeave { target: container });
        assert!(carousel.is_autoplaying());
        sleep(ms(2010)).await;
        assert_eq!(carousel.current_index(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_hover_leave_respects_pause() {
        let (_dom, carousel) = carousel(3);
        let container = carousel.container();

        carousel.handle_event(&UiEvent::PointerEnter { target: container });
        carousel.toggle_play_pause();
        carousel.handle_event(&UiEvent::PointerLeave { target: container });
        assert!(!carousel.is_autoplaying());

        sleep(ms(5000)).await;
        assert_eq!(carousel.current_index(), 0);

        carousel.toggle_play_pause();
        assert!(carousel.is_autoplaying());
        sleep(ms(2010)).await;
        assert_eq!(carousel.current_index(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_resume_while_hovered_waits_for_leave() {
        let (_dom, carousel) = carousel(3);
        let container = carousel.container();

        carousel.toggle_play_pause();
        carousel.handle_event(&UiEvent::PointerEnter { target: container });
        carousel.toggle_play_pause();
        assert!(!carousel.is_autoplaying());

        sleep(ms(5000)).await;
        assert_eq!(carousel.current_index(), 0);

        carousel.handle_event(&UiEvent::PointerLeave { target: container });
        assert!(carousel.is_autoplaying());
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_keeps_single_timer() {
        let (_dom, carousel) = carousel(10);

        for _ in 0..5 {
            carousel.start_autoplay().unwrap();
        }
        sleep(ms(2010)).await;
        assert_eq!(carousel.current_index(), 1);

        carousel.stop_autoplay();
        carousel.stop_autoplay();
        assert!(!carousel.is_autoplaying());
    }

    #[tokio::test(start_paused = true)]
    async fn test_dot_click_jumps() {
        let (dom, carousel) = carousel(4);
        let third = carousel.dots()[2];

        let outcome = carousel.handle_event(&UiEvent::Click { target: third });
        assert!(outcome.is_handled());
        assert_eq!(carousel.current_index(), 2);
        assert_eq!(transform(&dom, &carousel), "translateX(-800px)");
        assert!(dom.has_class(third, "active"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_click_on_unrelated_node_ignored() {
        let (dom, carousel) = carousel(3);
        let stranger = dom.build(dom.root(), ElementSpec::new("button").class("carousel-next"));

        let outcome = carousel.handle_event(&UiEvent::Click { target: stranger });
        assert_eq!(outcome, Dispatch::Ignored);
        assert_eq!(carousel.current_index(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_resize_is_debounced() {
        let (dom, carousel) = carousel(3);
        let wrapper = find(&dom, carousel.container(), "carousel-wrapper");

        // Let the post-init settle pass first.
        sleep(ms(150)).await;
        carousel.go_to_slide(1);

        dom.set_rect(wrapper, Rect::new(0.0, 0.0, 500.0, 300.0));
        for _ in 0..3 {
            carousel.handle_event(&UiEvent::WindowResize);
            sleep(ms(50)).await;
        }
        assert_eq!(transform(&dom, &carousel), "translateX(-400px)");

        sleep(ms(60)).await;
        assert_eq!(transform(&dom, &carousel), "translateX(-500px)");
        assert_eq!(carousel.current_index(), 1);
        assert!(carousel.is_autoplaying());

        // Autoplay schedule untouched: first tick still at 2000.
        sleep(ms(1650)).await;
        assert_eq!(carousel.current_index(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fixed_height_applied() {
        let (dom, container) = markup(2, &[("data-height", "360")]);
        Carousel::initialize(dom.clone(), container, settings()).unwrap();
        let wrapper = find(&dom, container, "carousel-wrapper");
        assert_eq!(dom.style(wrapper, "height").as_deref(), Some("360px"));

        let (dom, container) = markup(2, &[("data-height", "50vh")]);
        Carousel::initialize(dom.clone(), container, settings()).unwrap();
        let wrapper = find(&dom, container, "carousel-wrapper");
        assert_eq!(dom.style(wrapper, "height").as_deref(), Some("50vh"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_cancels_timers() {
        let (_dom, carousel) = carousel(3);
        carousel.shutdown();
        assert!(!carousel.is_autoplaying());

        sleep(ms(10_000)).await;
        assert_eq!(carousel.current_index(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_controller_stops_ticks() {
        let (dom, carousel) = carousel(3);
        let track = carousel.track();
        drop(carousel);

        sleep(ms(10_000)).await;
        assert_eq!(
            dom.style(track, "transform").as_deref(),
            Some("translateX(-0px)")
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_initialize_is_noop() {
        let (dom, container) = markup(5, &[]);
        let carousel = Carousel::initialize(dom.clone(), container, settings()).unwrap();
        assert_eq!(
            dom.attribute(container, "data-initialized").as_deref(),
            Some("true")
        );

        sleep(ms(1000)).await;
        assert!(Carousel::initialize(dom.clone(), container, settings()).is_none());

        sleep(ms(3100)).await;
        assert_eq!(carousel.current_index(), 2);
        assert_eq!(transform(&dom, &carousel), "translateX(-800px)");

        let dots = find(&dom, container, "carousel-dots");
        assert_eq!(dom.children(dots).len(), 5);
    }

    #[test]
    fn test_missing_track_or_slides_skips() {
        let dom = Arc::new(MemoryDom::new());
        let no_track = dom.build(
            dom.root(),
            ElementSpec::new("div")
                .class("image-carousel-container")
                .child(ElementSpec::new("div").class("carousel-slide")),
        );
        assert!(Carousel::initialize(dom.clone(), no_track, settings()).is_none());

        let no_slides = dom.build(
            dom.root(),
            ElementSpec::new("div")
                .class("image-carousel-container")
                .child(ElementSpec::new("div").class("carousel-track")),
        );
        assert!(Carousel::initialize(dom.clone(), no_slides, settings()).is_none());
    }

    #[test]
    fn test_without_runtime_manual_only() {
        let (dom, carousel) = carousel(3);
        assert!(!carousel.is_autoplaying());
        assert!(carousel.start_autoplay().is_err());

        assert_eq!(carousel.next(), 1);
        carousel.on_window_resize();
        assert_eq!(transform(&dom, &carousel), "translateX(-400px)");
    }

    #[test]
    fn test_wrap_index() {
        assert_eq!(wrap_index(-1, 3), 2);
        assert_eq!(wrap_index(3, 3), 0);
        assert_eq!(wrap_index(7, 3), 1);
        assert_eq!(wrap_index(-7, 3), 2);
        assert_eq!(wrap_index(5, 1), 0);
    }

    proptest! {
        #[test]
        fn prop_go_to_slide_lands_in_range(n in 1usize..8, i in -50isize..50) {
            let (_dom, carousel) = carousel(n);
            let shown = carousel.go_to_slide(i);
            prop_assert_eq!(shown, i.rem_euclid(n as isize) as usize);
            prop_assert_eq!(carousel.current_index(), shown);
            prop_assert!(shown < n);
        }

        #[test]
        fn prop_next_prev_are_inverse(n in 1usize..8, start in 0isize..8) {
            let (_dom, carousel) = carousel(n);
            let from = carousel.go_to_slide(start);
            carousel.next();
            prop_assert_eq!(carousel.prev(), from);
        }
    }
}
