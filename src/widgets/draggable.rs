// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Floating panels that can be dragged by their title strip.
//!
//! Every position a widget ever takes is clamped so the whole panel stays
//! inside the container, below the top chrome bar.

use super::store::{self, PositionStore};
use crate::models::space::{ScreenPoint, Size};
use serde::{Deserialize, Serialize};

/// Top-left corner of a widget in screen pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WidgetPosition {
    pub x: f64,
    pub y: f64,
}

/// Keep-out distances from the container edges.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClampBounds {
    pub margin: f64,
    /// Minimum `y`, leaving room for the fixed chrome bar.
    pub top_offset: f64,
}

impl Default for ClampBounds {
    fn default() -> Self {
        Self {
            margin: 16.0,
            top_offset: 96.0,
        }
    }
}

/// Clamp a widget so it lies within the container.
///
/// If the container is too small for the widget, it is pinned to the
/// top-left limits.
pub fn clamp_position(pos: WidgetPosition, size: Size, container: Size, bounds: ClampBounds) -> WidgetPosition {
    let clamp_axis = |v: f64, min: f64, max: f64| {
        if !v.is_finite() || max < min {
            min
        } else {
            v.clamp(min, max)
        }
    };
    WidgetPosition {
        x: clamp_axis(pos.x, bounds.margin, container.width - size.width - bounds.margin),
        y: clamp_axis(pos.y, bounds.top_offset, container.height - size.height - bounds.margin),
    }
}

/// Which corner a widget starts in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WidgetSpec {
    pub id: String,
    pub size: Size,
    /// Height of the grab strip at the top of the widget.
    pub handle_height: f64,
    pub anchor: Anchor,
}

impl WidgetSpec {
    pub fn new(id: impl Into<String>, size: Size, anchor: Anchor) -> Self {
        Self {
            id: id.into(),
            size,
            handle_height: 28.0,
            anchor,
        }
    }

    /// Computed safe position for this widget in a container.
    pub fn default_position(&self, container: Size, bounds: ClampBounds) -> WidgetPosition {
        let left = bounds.margin;
        let right = container.width - self.size.width - bounds.margin;
        let top = bounds.top_offset;
        let bottom = container.height - self.size.height - bounds.margin;
        let pos = match self.anchor {
            Anchor::TopLeft => WidgetPosition { x: left, y: top },
            Anchor::TopRight => WidgetPosition { x: right, y: top },
            Anchor::BottomLeft => WidgetPosition { x: left, y: bottom },
            Anchor::BottomRight => WidgetPosition { x: right, y: bottom },
        };
        clamp_position(pos, self.size, container, bounds)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum DragState {
    Idle,
    Dragging { offset_x: f64, offset_y: f64 },
}

#[derive(Debug, Clone)]
pub struct DraggableWidget {
    spec: WidgetSpec,
    position: WidgetPosition,
    drag: DragState,
}

impl DraggableWidget {
    pub fn new(spec: WidgetSpec, position: WidgetPosition) -> Self {
        Self {
            spec,
            position,
            drag: DragState::Idle,
        }
    }

    pub fn id(&self) -> &str {
        &self.spec.id
    }

    pub fn spec(&self) -> &WidgetSpec {
        &self.spec
    }

    pub fn position(&self) -> WidgetPosition {
        self.position
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.drag, DragState::Dragging { .. })
    }

    /// Whether a pointer is over the grab strip.
    pub fn handle_contains(&self, pointer: ScreenPoint) -> bool {
        pointer.x >= self.position.x
            && pointer.x <= self.position.x + self.spec.size.width
            && pointer.y >= self.position.y
            && pointer.y <= self.position.y + self.spec.handle_height
    }

    /// Start dragging if the pointer is on the handle.
    pub fn on_pointer_down(&mut self, pointer: ScreenPoint) -> bool {
        if !self.handle_contains(pointer) {
            return false;
        }
        self.drag = DragState::Dragging {
            offset_x: pointer.x - self.position.x,
            offset_y: pointer.y - self.position.y,
        };
        true
    }

    /// Follow the pointer while dragging. Returns true if the widget moved.
    pub fn on_pointer_move(&mut self, pointer: ScreenPoint, container: Size, bounds: ClampBounds) -> bool {
        let DragState::Dragging { offset_x, offset_y } = self.drag else {
            return false;
        };
        let raw = WidgetPosition {
            x: pointer.x - offset_x,
            y: pointer.y - offset_y,
        };
        let next = clamp_position(raw, self.spec.size, container, bounds);
        let moved = next != self.position;
        self.position = next;
        moved
    }

    /// Stop dragging and persist the final position.
    pub fn on_pointer_up(&mut self, store: &mut dyn PositionStore) -> bool {
        if !self.is_dragging() {
            return false;
        }
        self.drag = DragState::Idle;
        store::save_position(store, &self.spec.id, self.position);
        log::debug!(
            "Widget {} dropped at ({:.0}, {:.0})",
            self.spec.id,
            self.position.x,
            self.position.y
        );
        true
    }

    fn reclamp(&mut self, container: Size, bounds: ClampBounds) {
        self.position = clamp_position(self.position, self.spec.size, container, bounds);
    }
}

/// All floating widgets in one container.
#[derive(Debug, Clone)]
pub struct WidgetLayout {
    bounds: ClampBounds,
    container: Size,
    widgets: Vec<DraggableWidget>,
}

impl WidgetLayout {
    pub fn new(container: Size, bounds: ClampBounds) -> Self {
        Self {
            bounds,
            container,
            widgets: Vec::new(),
        }
    }

    pub fn bounds(&self) -> ClampBounds {
        self.bounds
    }

    pub fn container(&self) -> Size {
        self.container
    }

    /// Add a widget at its saved position, or its default if none was saved.
    ///
    /// Mounting an id twice replaces the earlier widget.
    pub fn mount(&mut self, spec: WidgetSpec, store: &dyn PositionStore) -> WidgetPosition {
        let position = store::load_position(store, &spec.id)
            .map(|saved| clamp_position(saved, spec.size, self.container, self.bounds))
            .unwrap_or_else(|| spec.default_position(self.container, self.bounds));
        self.widgets.retain(|w| w.spec.id != spec.id);
        self.widgets.push(DraggableWidget::new(spec, position));
        position
    }

    pub fn widget(&self, id: &str) -> Option<&DraggableWidget> {
        self.widgets.iter().find(|w| w.spec.id == id)
    }

    pub fn position(&self, id: &str) -> Option<WidgetPosition> {
        self.widget(id).map(DraggableWidget::position)
    }

    pub fn widgets(&self) -> &[DraggableWidget] {
        &self.widgets
    }

    /// Begin a drag on the topmost widget whose handle is under the pointer.
    pub fn on_pointer_down(&mut self, pointer: ScreenPoint) -> Option<&str> {
        let widget = self.widgets.iter_mut().rev().find(|w| w.handle_contains(pointer))?;
        widget.on_pointer_down(pointer);
        Some(widget.id())
    }

    pub fn on_pointer_move(&mut self, pointer: ScreenPoint) -> bool {
        let (container, bounds) = (self.container, self.bounds);
        self.widgets
            .iter_mut()
            .filter(|w| w.is_dragging())
            .fold(false, |moved, w| w.on_pointer_move(pointer, container, bounds) | moved)
    }

    pub fn on_pointer_up(&mut self, store: &mut dyn PositionStore) -> bool {
        self.widgets
            .iter_mut()
            .fold(false, |done, w| w.on_pointer_up(store) | done)
    }

    /// Re-clamp every widget against a new container size.
    ///
    /// Widgets that still fit are left where they are.
    pub fn on_container_resize(&mut self, container: Size) {
        if container == self.container {
            return;
        }
        self.container = container;
        for widget in &mut self.widgets {
            widget.reclamp(container, self.bounds);
        }
    }

    /// Put every widget back at its default position, overwriting saved state.
    pub fn emergency_reset(&mut self, store: &mut dyn PositionStore) {
        for widget in &mut self.widgets {
            widget.drag = DragState::Idle;
            widget.position = widget.spec.default_position(self.container, self.bounds);
            store::save_position(store, &widget.spec.id, widget.position);
        }
        log::info!("Reset {} widget position(s)", self.widgets.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widgets::store::MemoryStore;

    fn toolbox() -> WidgetSpec {
        WidgetSpec::new("toolbox", Size::new(288.0, 400.0), Anchor::TopLeft)
    }

    fn minimap() -> WidgetSpec {
        WidgetSpec::new("minimap", Size::new(240.0, 180.0), Anchor::TopRight)
    }

    fn assert_inside(layout: &WidgetLayout) {
        let b = layout.bounds();
        let c = layout.container();
        for w in layout.widgets() {
            let p = w.position();
            let s = w.spec().size;
            assert!(p.x >= b.margin && p.x <= c.width - s.width - b.margin, "{} x={}", w.id(), p.x);
            assert!(p.y >= b.top_offset && p.y <= c.height - s.height - b.margin, "{} y={}", w.id(), p.y);
        }
    }

    #[test]
    fn toolbox_dragged_off_screen_clamps_to_corner() {
        let mut store = MemoryStore::new();
        let mut layout = WidgetLayout::new(Size::new(1200.0, 800.0), ClampBounds::default());
        layout.mount(toolbox(), &store);
        assert_eq!(layout.position("toolbox"), Some(WidgetPosition { x: 16.0, y: 96.0 }));

        // Grab 20px into the title strip, then fling to (-50, -50).
        assert_eq!(layout.on_pointer_down(ScreenPoint::new(36.0, 106.0)), Some("toolbox"));
        layout.on_pointer_move(ScreenPoint::new(-30.0, -40.0));
        assert!(layout.on_pointer_up(&mut store));

        assert_eq!(layout.position("toolbox"), Some(WidgetPosition { x: 16.0, y: 96.0 }));
        assert_eq!(
            store::load_position(&store, "toolbox"),
            Some(WidgetPosition { x: 16.0, y: 96.0 })
        );
    }

    #[test]
    fn clamp_matches_known_corner() {
        let pos = clamp_position(
            WidgetPosition { x: -50.0, y: -50.0 },
            Size::new(288.0, 400.0),
            Size::new(1200.0, 800.0),
            ClampBounds::default(),
        );
        assert_eq!(pos, WidgetPosition { x: 16.0, y: 96.0 });
    }

    #[test]
    fn drag_outside_handle_does_nothing() {
        let mut layout = WidgetLayout::new(Size::new(1200.0, 800.0), ClampBounds::default());
        layout.mount(toolbox(), &MemoryStore::new());
        // Inside the widget body, below the handle strip.
        assert_eq!(layout.on_pointer_down(ScreenPoint::new(40.0, 300.0)), None);
        assert!(!layout.on_pointer_move(ScreenPoint::new(500.0, 500.0)));
    }

    #[test]
    fn drag_moves_by_pointer_delta() {
        let mut store = MemoryStore::new();
        let mut layout = WidgetLayout::new(Size::new(1200.0, 800.0), ClampBounds::default());
        layout.mount(toolbox(), &store);
        layout.on_pointer_down(ScreenPoint::new(30.0, 100.0));
        assert!(layout.on_pointer_move(ScreenPoint::new(230.0, 200.0)));
        layout.on_pointer_up(&mut store);
        assert_eq!(layout.position("toolbox"), Some(WidgetPosition { x: 216.0, y: 196.0 }));
        assert!(!layout.widget("toolbox").unwrap().is_dragging());
    }

    #[test]
    fn saved_position_is_restored_and_clamped() {
        let mut store = MemoryStore::new();
        store::save_position(&mut store, "toolbox", WidgetPosition { x: 500.0, y: 300.0 });
        store::save_position(&mut store, "minimap", WidgetPosition { x: 5000.0, y: 0.0 });

        let mut layout = WidgetLayout::new(Size::new(1200.0, 800.0), ClampBounds::default());
        assert_eq!(layout.mount(toolbox(), &store), WidgetPosition { x: 500.0, y: 300.0 });
        assert_eq!(layout.mount(minimap(), &store), WidgetPosition { x: 944.0, y: 96.0 });
    }

    #[test]
    fn resize_sequence_keeps_every_widget_inside() {
        let mut store = MemoryStore::new();
        let mut layout = WidgetLayout::new(Size::new(1600.0, 1000.0), ClampBounds::default());
        layout.mount(toolbox(), &store);
        layout.mount(minimap(), &store);
        layout.on_pointer_down(ScreenPoint::new(30.0, 100.0));
        layout.on_pointer_move(ScreenPoint::new(1200.0, 560.0));
        layout.on_pointer_up(&mut store);

        for (w, h) in [(1200.0, 800.0), (700.0, 560.0), (1920.0, 1080.0), (600.0, 520.0), (1024.0, 768.0)] {
            layout.on_container_resize(Size::new(w, h));
            assert_inside(&layout);
        }
    }

    #[test]
    fn resize_leaves_fitting_widgets_alone() {
        let mut layout = WidgetLayout::new(Size::new(1200.0, 800.0), ClampBounds::default());
        layout.mount(toolbox(), &MemoryStore::new());
        layout.on_container_resize(Size::new(1000.0, 700.0));
        assert_eq!(layout.position("toolbox"), Some(WidgetPosition { x: 16.0, y: 96.0 }));
    }

    #[test]
    fn emergency_reset_overwrites_saved_positions() {
        let mut store = MemoryStore::new();
        let mut layout = WidgetLayout::new(Size::new(1200.0, 800.0), ClampBounds::default());
        layout.mount(toolbox(), &store);
        layout.mount(minimap(), &store);
        layout.on_pointer_down(ScreenPoint::new(30.0, 100.0));
        layout.on_pointer_move(ScreenPoint::new(400.0, 300.0));
        layout.on_pointer_up(&mut store);

        layout.emergency_reset(&mut store);
        assert_eq!(layout.position("toolbox"), Some(WidgetPosition { x: 16.0, y: 96.0 }));
        assert_eq!(layout.position("minimap"), Some(WidgetPosition { x: 944.0, y: 96.0 }));
        assert_eq!(
            store::load_position(&store, "toolbox"),
            Some(WidgetPosition { x: 16.0, y: 96.0 })
        );
    }

    #[test]
    fn topmost_widget_wins_overlapping_handles() {
        let mut layout = WidgetLayout::new(Size::new(1200.0, 800.0), ClampBounds::default());
        let store = MemoryStore::new();
        layout.mount(toolbox(), &store);
        layout.mount(WidgetSpec::new("navigator", Size::new(200.0, 120.0), Anchor::TopLeft), &store);
        assert_eq!(layout.on_pointer_down(ScreenPoint::new(20.0, 100.0)), Some("navigator"));
    }
}
