//! Interactive resize engine.
//!
//! Translates live pointer movement into a new widget size that stays
//! inside the container, keeps a padding gap to every sibling, and never
//! drops below the minimum size. The engine reads geometry through the
//! injected [`CanvasLayout`] query — live bounds are authoritative for
//! *position* (layout is container-flow), the gesture-start snapshot for
//! *size* — and never touches the store until the gesture ends.
//!
//! Each move recomputes from the gesture-start snapshot plus the current
//! pointer, not from the previous frame's output, so a long gesture cannot
//! accumulate drift.

use crate::handle::ResizeHandle;
use deck_core::WidgetId;
use deck_core::geometry::{Point, Rect};
use deck_core::model::{MIN_WIDGET_HEIGHT, MIN_WIDGET_WIDTH, Size};
use deck_core::store::{WidgetPatch, WidgetStore};

/// Gap kept between a widget and its container edge or any sibling,
/// in layout units (the canvas gutter).
pub const RESIZE_PADDING: f32 = 24.0;

/// Live geometry the engine consults on every move. Implemented by the
/// rendering layer over the actually rendered elements, and by plain
/// structs in tests.
pub trait CanvasLayout {
    /// Bounding box of the visible canvas area.
    fn container_bounds(&self) -> Rect;

    /// Current bounding box of a widget, absent if it is not rendered
    /// (e.g. it was deleted mid-gesture).
    fn widget_bounds(&self, id: WidgetId) -> Option<Rect>;

    /// Every widget currently on the canvas, in display order.
    fn rendered_widgets(&self) -> Vec<WidgetId>;
}

/// Tunable clamps. Defaults match the canvas gutter and the model's
/// minimum widget size.
#[derive(Debug, Clone)]
pub struct ResizeOptions {
    pub padding: f32,
    pub min_width: f32,
    pub min_height: f32,
}

impl Default for ResizeOptions {
    fn default() -> Self {
        Self {
            padding: RESIZE_PADDING,
            min_width: MIN_WIDGET_WIDTH,
            min_height: MIN_WIDGET_HEIGHT,
        }
    }
}

/// The snapshot captured when a handle is pressed. Every move resolves
/// against this, never against intermediate results.
#[derive(Debug, Clone)]
pub struct ResizeGesture {
    pub widget: WidgetId,
    pub handle: ResizeHandle,
    pub start_pointer: Point,
    pub start_size: Size,
}

/// A per-frame size update for the rendering layer to apply to the
/// on-screen element. Carries no store mutation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResizeUpdate {
    pub widget: WidgetId,
    pub size: Size,
}

enum ResizeState {
    Idle,
    Resizing(ResizeGesture),
}

/// Gesture state machine: `Idle → Resizing` on handle press, back to
/// `Idle` on release (with a single store commit) or cancel (without).
pub struct ResizeEngine {
    state: ResizeState,
    options: ResizeOptions,
}

impl Default for ResizeEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ResizeEngine {
    pub fn new() -> Self {
        Self::with_options(ResizeOptions::default())
    }

    pub fn with_options(options: ResizeOptions) -> Self {
        Self {
            state: ResizeState::Idle,
            options,
        }
    }

    pub fn is_resizing(&self) -> bool {
        matches!(self.state, ResizeState::Resizing(_))
    }

    /// The widget under gesture, if any.
    pub fn active_widget(&self) -> Option<WidgetId> {
        match &self.state {
            ResizeState::Resizing(gesture) => Some(gesture.widget),
            ResizeState::Idle => None,
        }
    }

    /// Cursor hint for the UI while a gesture is live.
    pub fn cursor(&self) -> Option<&'static str> {
        match &self.state {
            ResizeState::Resizing(gesture) => Some(gesture.handle.cursor()),
            ResizeState::Idle => None,
        }
    }

    /// Handle press: capture the gesture-start snapshot. `start_size` comes
    /// from the stored model — the model is authoritative for size.
    pub fn begin(
        &mut self,
        widget: WidgetId,
        handle: ResizeHandle,
        pointer: Point,
        start_size: Size,
    ) {
        self.state = ResizeState::Resizing(ResizeGesture {
            widget,
            handle,
            start_pointer: pointer,
            start_size,
        });
    }

    /// Pointer move: resolve a fresh size for the live view. Returns `None`
    /// when idle or when the widget is no longer rendered. Never mutates
    /// the store.
    pub fn update(&self, pointer: Point, layout: &dyn CanvasLayout) -> Option<ResizeUpdate> {
        let ResizeState::Resizing(gesture) = &self.state else {
            return None;
        };
        let size = resolve_resize(gesture, pointer, layout, &self.options)?;
        Some(ResizeUpdate {
            widget: gesture.widget,
            size,
        })
    }

    /// Pointer release: resolve the final size, commit it to the store
    /// exactly once, and return to idle. A widget deleted mid-gesture
    /// commits nothing but the drag state still clears — no gesture may be
    /// left stuck.
    pub fn release(
        &mut self,
        pointer: Point,
        layout: &dyn CanvasLayout,
        store: &mut WidgetStore,
    ) -> Option<ResizeUpdate> {
        let state = std::mem::replace(&mut self.state, ResizeState::Idle);
        let ResizeState::Resizing(gesture) = state else {
            return None;
        };
        let size = resolve_resize(&gesture, pointer, layout, &self.options)?;
        store.update_widget(gesture.widget, WidgetPatch::size(size));
        Some(ResizeUpdate {
            widget: gesture.widget,
            size,
        })
    }

    /// Abandon the gesture without committing. The live view snaps back to
    /// the stored size on the next render.
    pub fn cancel(&mut self) {
        self.state = ResizeState::Idle;
    }
}

/// Resolve the size a gesture yields at the given pointer position.
///
/// Clamp priority, strongest last: requested delta, then container bounds,
/// then sibling collisions (most restrictive sibling wins), then the
/// minimum-size floor, which overrides everything.
pub fn resolve_resize(
    gesture: &ResizeGesture,
    pointer: Point,
    layout: &dyn CanvasLayout,
    options: &ResizeOptions,
) -> Option<Size> {
    let container = layout.container_bounds();
    let rect = layout.widget_bounds(gesture.widget)?;

    // Offsets of the widget's top-left within the container.
    let left = rect.x - container.x;
    let top = rect.y - container.y;
    let pad = options.padding;

    let mut width = gesture.start_size.width;
    let mut height = gesture.start_size.height;
    if gesture.handle.affects_east() {
        width += pointer.x - gesture.start_pointer.x;
    }
    if gesture.handle.affects_south() {
        height += pointer.y - gesture.start_pointer.y;
    }

    // Far edges stop `pad` short of the container.
    width = width.min(container.width - left - pad);
    height = height.min(container.height - top - pad);

    // Sibling collisions, per axis independently. The cross-axis probe uses
    // the gesture-start extent, so a shrinking tentative size cannot
    // oscillate in and out of overlap across frames. Each clamp only ever
    // reduces the running dimension, making the order of siblings
    // irrelevant.
    for other_id in layout.rendered_widgets() {
        if other_id == gesture.widget {
            continue;
        }
        let Some(other) = layout.widget_bounds(other_id) else {
            continue;
        };
        let other_left = other.x - container.x;
        let other_top = other.y - container.y;

        if gesture.handle.affects_east() {
            let vertical_overlap = !(top + gesture.start_size.height <= other_top
                || top >= other_top + other.height);
            if vertical_overlap && left + width > other_left - pad && left < other_left {
                width = other_left - pad - left;
                log::trace!("east growth of {} clamped by {other_id}", gesture.widget);
            }
        }
        if gesture.handle.affects_south() {
            let horizontal_overlap = !(left + gesture.start_size.width <= other_left
                || left >= other_left + other.width);
            if horizontal_overlap && top + height > other_top - pad && top < other_top {
                height = other_top - pad - top;
                log::trace!("south growth of {} clamped by {other_id}", gesture.widget);
            }
        }
    }

    // The floor wins over every clamp — a widget is never squeezed to
    // nothing against a neighbor or an undersized container.
    Some(Size::new(
        width.max(options.min_width),
        height.max(options.min_height),
    ))
}
