//! Image comparison slider.
//!
//! A compare container stacks two layers: the "after" image underneath and
//! the "before" image on top. The before layer is clipped from the right so
//! only its left `position`% shows, and a handle sits on the boundary. The
//! user drags the handle with a mouse or a finger to move the boundary.
//!
//! Expected markup (class names configurable through
//! [`CompareClasses`]):
//!
//! ```text
//! div.image-compare-container[data-position]
//! ├── div.image-after  > img
//! ├── div.image-before > img
//! └── div.jx-handle
//! ```
//!
//! The split is never cached: [`CompareSlider::position`] reads the applied
//! `clip-path` back, so the controller and the rendered page cannot disagree.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::sync::{Arc, LazyLock};

use parking_lot::Mutex;
use regex::Regex;
use tracing::{debug, trace};

use crate::config::{CompareConfig, DEFAULT_POSITION, is_initialized, mark_initialized};
use crate::dom::{Dom, Selector};
use crate::enhancer::options::CompareClasses;
use crate::events::{Dispatch, PointerKind, UiEvent};
use crate::identifiers::NodeId;

// ============================================================================
// Constants
// ============================================================================

/// Lower bound of the split.
pub const MIN_POSITION: f64 = 0.0;

/// Upper bound of the split.
pub const MAX_POSITION: f64 = 100.0;

/// Applied reveal boundary: `inset(0 <hidden>% 0 0)`.
static INSET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"inset\(0\s+(\d+(?:\.\d+)?)%\s+0\s+0\)").expect("inset pattern is valid")
});

// ============================================================================
// Position Math
// ============================================================================

/// Clamps a split percentage into [0, 100].
///
/// Non-finite input yields `None`; there is nothing sensible to render.
#[must_use]
pub fn clamp_position(percentage: f64) -> Option<f64> {
    percentage
        .is_finite()
        .then(|| percentage.clamp(MIN_POSITION, MAX_POSITION))
}

/// CSS `clip-path` revealing the left `position`% of a layer.
#[must_use]
pub fn reveal_clip_path(position: f64) -> String {
    format!("inset(0 {}% 0 0)", MAX_POSITION - position)
}

/// Inverse of [`reveal_clip_path`].
#[must_use]
pub fn parse_reveal_clip_path(clip_path: &str) -> Option<f64> {
    INSET
        .captures(clip_path)
        .and_then(|caps| caps[1].parse::<f64>().ok())
        .map(|hidden| MAX_POSITION - hidden)
}

/// Split after dragging from `start_position` by `delta_x` pixels.
#[must_use]
pub fn dragged_position(start_position: f64, delta_x: f64, container_width: f64) -> f64 {
    start_position + (delta_x / container_width) * 100.0
}

// ============================================================================
// Types
// ============================================================================

/// Transient state of one drag gesture.
#[derive(Debug, Clone, Copy, Default)]
struct DragState {
    active: bool,
    start_x: f64,
    start_position: f64,
}

// ============================================================================
// CompareSlider
// ============================================================================

/// Controller of one compare container.
pub struct CompareSlider {
    dom: Arc<dyn Dom>,
    container: NodeId,
    handle: NodeId,
    before: NodeId,
    after: NodeId,
    before_image: Option<NodeId>,
    after_image: Option<NodeId>,
    config: CompareConfig,
    drag: Mutex<DragState>,
}

// ============================================================================
// CompareSlider - Display
// ============================================================================

impl fmt::Debug for CompareSlider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompareSlider")
            .field("container", &self.container)
            .field("position", &self.position())
            .field("dragging", &self.is_dragging())
            .finish_non_exhaustive()
    }
}

// ============================================================================
// CompareSlider - Constructor
// ============================================================================

impl CompareSlider {
    /// Takes control of `container`.
    ///
    /// Returns `None` when the handle or either layer is missing, or when
    /// the container is already managed. On success the container is
    /// marked `data-initialized="true"`.
    pub fn initialize(
        dom: Arc<dyn Dom>,
        container: NodeId,
        classes: &CompareClasses,
    ) -> Option<Self> {
        if is_initialized(&*dom, container) {
            trace!(node = %container, "Compare container already initialized");
            return None;
        }

        let handle = dom.query(container, &Selector::class(&classes.handle));
        let before = dom.query(container, &Selector::class(&classes.before));
        let after = dom.query(container, &Selector::class(&classes.after));

        let (Some(handle), Some(before), Some(after)) = (handle, before, after) else {
            debug!(node = %container, "Compare container incomplete, skipping");
            return None;
        };

        let image = Selector::tag("img");
        let before_image = dom.query(before, &image);
        let after_image = dom.query(after, &image);
        let config = CompareConfig::from_container(&*dom, container);

        let slider = Self {
            dom,
            container,
            handle,
            before,
            after,
            before_image,
            after_image,
            config,
            drag: Mutex::new(DragState::default()),
        };

        if let (Some(before_img), Some(after_img)) = (before_image, after_image)
            && slider.dom.is_image_complete(before_img)
            && slider.dom.is_image_complete(after_img)
        {
            slider.sync_handle();
        }

        let applied = slider.set_position(config.position);
        mark_initialized(&*slider.dom, container, true);
        debug!(node = %container, position = applied, "Compare slider initialized");

        Some(slider)
    }
}

// ============================================================================
// CompareSlider - Accessors
// ============================================================================

impl CompareSlider {
    /// The container this controller manages.
    #[inline]
    #[must_use]
    pub fn container(&self) -> NodeId {
        self.container
    }

    /// The draggable handle.
    #[inline]
    #[must_use]
    pub fn handle(&self) -> NodeId {
        self.handle
    }

    /// The clipped "before" layer.
    #[inline]
    #[must_use]
    pub fn before_layer(&self) -> NodeId {
        self.before
    }

    /// The "after" layer.
    #[inline]
    #[must_use]
    pub fn after_layer(&self) -> NodeId {
        self.after
    }

    /// Options read at initialization.
    #[inline]
    #[must_use]
    pub fn config(&self) -> CompareConfig {
        self.config
    }

    /// Returns `true` while a drag gesture is in progress.
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.drag.lock().active
    }
}

// ============================================================================
// CompareSlider - Position
// ============================================================================

impl CompareSlider {
    /// Moves the boundary to `percentage`, clamped to [0, 100].
    ///
    /// Returns the applied value. Non-finite input leaves the split alone.
    pub fn set_position(&self, percentage: f64) -> f64 {
        let Some(position) = clamp_position(percentage) else {
            trace!(node = %self.container, percentage, "Ignoring non-finite position");
            return self.position();
        };

        self.dom
            .set_style(self.before, "clip-path", &reveal_clip_path(position));
        self.dom
            .set_style(self.handle, "left", &format!("{position}%"));
        position
    }

    /// Current split, read back from the before layer's `clip-path`.
    ///
    /// Falls back to 50 when no boundary has been applied.
    #[must_use]
    pub fn position(&self) -> f64 {
        self.dom
            .style(self.before, "clip-path")
            .and_then(|clip| parse_reveal_clip_path(&clip))
            .unwrap_or(DEFAULT_POSITION)
    }

    /// Aligns the handle's vertical extent with the rendered after image.
    ///
    /// Returns `false` when there is no image or it has no height yet.
    pub fn sync_handle(&self) -> bool {
        let Some(image) = self.after_image else {
            return false;
        };
        let height = self.dom.offset_height(image);
        if height <= 0.0 {
            return false;
        }

        let container_rect = self.dom.bounding_rect(self.container);
        let image_rect = self.dom.bounding_rect(image);
        let top = image_rect.top() - container_rect.top();

        self.dom.set_style(self.handle, "top", &format!("{top}px"));
        self.dom
            .set_style(self.handle, "height", &format!("{height}px"));
        trace!(node = %self.container, top, height, "Handle synced");
        true
    }
}

// ============================================================================
// CompareSlider - Drag Gesture
// ============================================================================

impl CompareSlider {
    /// Starts a drag at client X `x`.
    pub fn begin_drag(&self, x: f64, kind: PointerKind) {
        let start_position = self.position();
        *self.drag.lock() = DragState {
            active: true,
            start_x: x,
            start_position,
        };

        if kind == PointerKind::Mouse {
            self.dom.set_style(self.container, "cursor", "grabbing");
        }
        debug!(node = %self.container, x, start_position, "Drag started");
    }

    /// Follows the pointer to client X `x`. Returns `false` when idle.
    pub fn drag_to(&self, x: f64) -> bool {
        let drag = *self.drag.lock();
        if !drag.active {
            return false;
        }

        let width = self.dom.bounding_rect(self.container).width;
        if width <= 0.0 {
            return true;
        }

        self.set_position(dragged_position(drag.start_position, x - drag.start_x, width));
        true
    }

    /// Ends the gesture. Returns `false` if no drag was active.
    pub fn end_drag(&self, kind: PointerKind) -> bool {
        let was_active = std::mem::take(&mut self.drag.lock().active);
        if was_active {
            if kind == PointerKind::Mouse {
                self.dom.set_style(self.container, "cursor", "grab");
            }
            debug!(node = %self.container, position = self.position(), "Drag ended");
        }
        was_active
    }
}

// ============================================================================
// CompareSlider - Events
// ============================================================================

impl CompareSlider {
    fn is_own_image(&self, node: NodeId) -> bool {
        Some(node) == self.before_image || Some(node) == self.after_image
    }

    /// Reacts to one event.
    pub fn handle_event(&self, event: &UiEvent) -> Dispatch {
        match *event {
            UiEvent::PointerDown { target, x, kind } => {
                if !self.dom.is_within(target, self.handle) {
                    return Dispatch::Ignored;
                }
                self.begin_drag(x, kind);
                Dispatch::Handled
            }
            UiEvent::PointerMove { x, .. } => self.drag_to(x).into(),
            UiEvent::PointerUp { kind } => self.end_drag(kind).into(),
            UiEvent::ImageLoad { target } if self.is_own_image(target) => {
                self.sync_handle().into()
            }
            UiEvent::ElementResize { target }
                if target == self.container || Some(target) == self.after_image =>
            {
                self.sync_handle().into()
            }
            _ => Dispatch::Ignored,
        }
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

    struct Fixture {
        dom: Arc<MemoryDom>,
        container: NodeId,
    }

    impl Fixture {
        fn new(attrs: &[(&str, &str)]) -> Self {
            let dom = Arc::new(MemoryDom::new());
            let container = attrs.iter().fold(
                ElementSpec::new("div")
                    .class("image-compare-container")
                    .rect(Rect::new(0.0, 100.0, 400.0, 300.0)),
                |spec, (name, value)| spec.attr(name, value),
            );
            let container = dom.build(
                dom.root(),
                container
                    .child(
                        ElementSpec::new("div").class("image-after").child(
                            ElementSpec::new("img")
                                .attr("src", "/after.jpg")
                                .rect(Rect::new(0.0, 120.0, 400.0, 260.0)),
                        ),
                    )
                    .child(
                        ElementSpec::new("div")
                            .class("image-before")
                            .child(ElementSpec::new("img").attr("src", "/before.jpg")),
                    )
                    .child(ElementSpec::new("div").class("jx-handle")),
            );
            Self { dom, container }
        }

        fn slider(&self) -> CompareSlider {
            CompareSlider::initialize(
                self.dom.clone(),
                self.container,
                &CompareClasses::default(),
            )
            .expect("complete markup")
        }
    }

    #[test]
    fn test_initializes_at_fifty_without_attribute() {
        let fixture = Fixture::new(&[]);
        let slider = fixture.slider();

        assert_eq!(slider.position(), 50.0);
        assert_eq!(
            fixture.dom.style(slider.before_layer(), "clip-path").as_deref(),
            Some("inset(0 50% 0 0)")
        );
        assert_eq!(
            fixture.dom.style(slider.handle(), "left").as_deref(),
            Some("50%")
        );
    }

    #[test]
    fn test_initial_position_from_attribute() {
        let fixture = Fixture::new(&[("data-position", "30")]);
        assert_eq!(fixture.slider().position(), 30.0);

        let fixture = Fixture::new(&[("data-position", "140")]);
        assert_eq!(fixture.slider().position(), 100.0);
    }

    #[test]
    fn test_second_initialize_is_noop() {
        let fixture = Fixture::new(&[]);
        let slider = fixture.slider();
        assert_eq!(
            fixture.dom.attribute(fixture.container, "data-initialized").as_deref(),
            Some("true")
        );

        slider.set_position(20.0);
        let again = CompareSlider::initialize(
            fixture.dom.clone(),
            fixture.container,
            &CompareClasses::default(),
        );
        assert!(again.is_none());
        assert_eq!(slider.position(), 20.0);
    }

    #[test]
    fn test_missing_structure_skips() {
        let dom = Arc::new(MemoryDom::new());
        let container = dom.build(
            dom.root(),
            ElementSpec::new("div")
                .class("image-compare-container")
                .child(ElementSpec::new("div").class("image-before"))
                .child(ElementSpec::new("div").class("jx-handle")),
        );

        assert!(CompareSlider::initialize(dom.clone(), container, &CompareClasses::default()).is_none());
        assert!(dom.style(container, "cursor").is_none());
    }

    #[test]
    fn test_set_position_clamps() {
        let fixture = Fixture::new(&[]);
        let slider = fixture.slider();

        assert_eq!(slider.set_position(-20.0), 0.0);
        assert_eq!(slider.position(), 0.0);
        assert_eq!(slider.set_position(250.0), 100.0);
        assert_eq!(slider.position(), 100.0);
        assert_eq!(
            fixture.dom.style(slider.before_layer(), "clip-path").as_deref(),
            Some("inset(0 0% 0 0)")
        );
    }

    #[test]
    fn test_non_finite_position_ignored() {
        let fixture = Fixture::new(&[]);
        let slider = fixture.slider();
        slider.set_position(25.0);

        assert_eq!(slider.set_position(f64::NAN), 25.0);
        assert_eq!(slider.set_position(f64::INFINITY), 25.0);
        assert_eq!(slider.position(), 25.0);
    }

    #[test]
    fn test_position_falls_back_when_unparsable() {
        let fixture = Fixture::new(&[]);
        let slider = fixture.slider();
        fixture
            .dom
            .set_style(slider.before_layer(), "clip-path", "none");
        assert_eq!(slider.position(), 50.0);
    }

    #[test]
    fn test_drag_by_ten_percent() {
        let fixture = Fixture::new(&[]);
        let slider = fixture.slider();

        slider.begin_drag(200.0, PointerKind::Mouse);
        assert!(slider.is_dragging());
        assert!(slider.drag_to(240.0));
        assert!((slider.position() - 60.0).abs() < 1e-9);

        assert!(slider.end_drag(PointerKind::Mouse));
        assert!(!slider.is_dragging());
        assert!(!slider.drag_to(0.0));
        assert!((slider.position() - 60.0).abs() < 1e-9);
    }

    #[test]
    fn test_drag_uses_most_recent_sample() {
        let fixture = Fixture::new(&[]);
        let slider = fixture.slider();

        slider.begin_drag(100.0, PointerKind::Touch);
        for x in [120.0, 90.0, 60.0] {
            slider.drag_to(x);
        }
        assert!((slider.position() - 40.0).abs() < 1e-9);
        slider.end_drag(PointerKind::Touch);
    }

    #[test]
    fn test_second_drag_starts_from_applied_position() {
        let fixture = Fixture::new(&[]);
        let slider = fixture.slider();

        slider.begin_drag(0.0, PointerKind::Mouse);
        slider.drag_to(-1000.0);
        slider.end_drag(PointerKind::Mouse);
        assert_eq!(slider.position(), 0.0);

        slider.begin_drag(0.0, PointerKind::Mouse);
        slider.drag_to(100.0);
        assert!((slider.position() - 25.0).abs() < 1e-9);
    }

    #[test]
    fn test_mouse_drag_sets_cursor() {
        let fixture = Fixture::new(&[]);
        let slider = fixture.slider();

        slider.begin_drag(10.0, PointerKind::Mouse);
        assert_eq!(
            fixture.dom.style(fixture.container, "cursor").as_deref(),
            Some("grabbing")
        );
        slider.end_drag(PointerKind::Mouse);
        assert_eq!(
            fixture.dom.style(fixture.container, "cursor").as_deref(),
            Some("grab")
        );
    }

    #[test]
    fn test_zero_width_container_does_not_move() {
        let fixture = Fixture::new(&[]);
        let slider = fixture.slider();
        fixture.dom.set_rect(fixture.container, Rect::default());

        slider.begin_drag(0.0, PointerKind::Mouse);
        assert!(slider.drag_to(50.0));
        assert_eq!(slider.position(), 50.0);
    }

    #[test]
    fn test_handle_synced_to_loaded_image() {
        let fixture = Fixture::new(&[]);
        let slider = fixture.slider();

        assert_eq!(
            fixture.dom.style(slider.handle(), "top").as_deref(),
            Some("20px")
        );
        assert_eq!(
            fixture.dom.style(slider.handle(), "height").as_deref(),
            Some("260px")
        );
    }

    #[test]
    fn test_handle_sync_waits_for_load() {
        let fixture = Fixture::new(&[]);
        let after_img = fixture
            .dom
            .query(fixture.container, &"img".into())
            .unwrap();
        fixture.dom.set_complete(after_img, false);

        let slider = fixture.slider();
        assert!(fixture.dom.style(slider.handle(), "height").is_none());

        fixture.dom.set_complete(after_img, true);
        let outcome = slider.handle_event(&UiEvent::ImageLoad { target: after_img });
        assert!(outcome.is_handled());
        assert_eq!(
            fixture.dom.style(slider.handle(), "height").as_deref(),
            Some("260px")
        );
    }

    #[test]
    fn test_resize_resyncs_handle() {
        let fixture = Fixture::new(&[]);
        let slider = fixture.slider();
        let after_img = fixture
            .dom
            .query(slider.after_layer(), &"img".into())
            .unwrap();

        fixture
            .dom
            .set_rect(after_img, Rect::new(0.0, 110.0, 200.0, 130.0));
        slider.handle_event(&UiEvent::ElementResize {
            target: fixture.container,
        });

        assert_eq!(
            fixture.dom.style(slider.handle(), "top").as_deref(),
            Some("10px")
        );
        assert_eq!(
            fixture.dom.style(slider.handle(), "height").as_deref(),
            Some("130px")
        );
    }

    #[test]
    fn test_zero_height_image_not_synced() {
        let fixture = Fixture::new(&[]);
        let slider = fixture.slider();
        let after_img = fixture
            .dom
            .query(slider.after_layer(), &"img".into())
            .unwrap();
        fixture.dom.set_offset_height(after_img, 0.0);

        assert!(!slider.sync_handle());
    }

    #[test]
    fn test_pointer_down_outside_handle_ignored() {
        let fixture = Fixture::new(&[]);
        let slider = fixture.slider();

        let outcome = slider.handle_event(&UiEvent::PointerDown {
            target: slider.before_layer(),
            x: 0.0,
            kind: PointerKind::Mouse,
        });
        assert_eq!(outcome, Dispatch::Ignored);
        assert!(!slider.is_dragging());
    }

    #[test]
    fn test_event_driven_gesture() {
        let fixture = Fixture::new(&[]);
        let slider = fixture.slider();

        let events = [
            UiEvent::PointerDown {
                target: slider.handle(),
                x: 200.0,
                kind: PointerKind::Touch,
            },
            UiEvent::PointerMove {
                x: 160.0,
                kind: PointerKind::Touch,
            },
            UiEvent::PointerUp {
                kind: PointerKind::Touch,
            },
        ];
        for event in &events {
            assert!(slider.handle_event(event).is_handled());
        }
        assert!((slider.position() - 40.0).abs() < 1e-9);
        assert_eq!(
            slider.handle_event(&UiEvent::PointerUp {
                kind: PointerKind::Touch
            }),
            Dispatch::Ignored
        );
    }

    #[test]
    fn test_clip_path_round_trip() {
        assert_eq!(parse_reveal_clip_path(&reveal_clip_path(37.5)), Some(37.5));
        assert_eq!(parse_reveal_clip_path("inset(0 12% 0 0)"), Some(88.0));
        assert_eq!(parse_reveal_clip_path("circle(50%)"), None);
    }

    proptest! {
        #[test]
        fn prop_position_always_clamped(p in -1.0e6f64..1.0e6) {
            let applied = clamp_position(p).unwrap();
            prop_assert!((MIN_POSITION..=MAX_POSITION).contains(&applied));
            if (MIN_POSITION..=MAX_POSITION).contains(&p) {
                prop_assert_eq!(applied, p);
            }
        }

        #[test]
        fn prop_applied_position_reads_back(p in -500.0f64..500.0) {
            let fixture = Fixture::new(&[]);
            let slider = fixture.slider();
            let applied = slider.set_position(p);
            prop_assert!((slider.position() - applied).abs() < 1e-9);
        }
    }
}
