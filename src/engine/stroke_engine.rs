// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Freehand stroke capture and replay.
//!
//! Pointer positions are converted to normalized image space the moment they
//! arrive; screen pixels are only ever produced on the way out, by
//! re-projecting stored points through the viewer's current viewport. That
//! is what keeps strokes glued to the image while it pans and zooms.

use super::history::History;
use crate::models::annotation::{NormalizedPoint, Stroke, StrokeMode, StrokeStyle};
use crate::models::space::ScreenPoint;
use crate::render::Surface;
use crate::util::geometry;
use crate::viewer::Viewer;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use uuid::Uuid;

/// Current pointer tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tool {
    /// Dragging pans the viewer.
    #[default]
    Pan,
    Draw,
    Erase,
}

impl Tool {
    /// Check if pointer drags should capture strokes.
    pub fn is_drawing(&self) -> bool {
        matches!(self, Tool::Draw | Tool::Erase)
    }
}

/// A stroke still being drawn.
#[derive(Debug, Clone)]
pub struct InProgressStroke {
    id: String,
    points: Vec<NormalizedPoint>,
    style: StrokeStyle,
    started_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub enum CaptureState {
    #[default]
    Idle,
    Capturing(InProgressStroke),
}

/// What happened when a stroke ended.
#[derive(Debug, Clone, PartialEq)]
pub enum StrokeOutcome {
    Committed(Stroke),
    /// Too short to keep; nothing was stored.
    Discarded,
    /// No stroke was being captured.
    NotCapturing,
}

/// Owns the stroke collection, the capture state machine, and undo history.
pub struct StrokeEngine {
    tool: Tool,
    capture: CaptureState,
    strokes: Vec<Stroke>,
    history: History,
    /// Local stroke id to the identifier returned by the persistence backend.
    submitted: HashMap<String, String>,
}

impl Default for StrokeEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl StrokeEngine {
    pub fn new() -> Self {
        Self {
            tool: Tool::default(),
            capture: CaptureState::Idle,
            strokes: Vec::new(),
            history: History::new(History::DEFAULT_DEPTH),
            submitted: HashMap::new(),
        }
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }

    /// Switch tools. Any stroke in progress is abandoned.
    pub fn set_tool(&mut self, tool: Tool) {
        if tool != self.tool {
            self.cancel_stroke();
            self.tool = tool;
        }
    }

    pub fn is_capturing(&self) -> bool {
        matches!(self.capture, CaptureState::Capturing(_))
    }

    pub fn in_progress(&self) -> Option<&InProgressStroke> {
        match &self.capture {
            CaptureState::Capturing(stroke) => Some(stroke),
            CaptureState::Idle => None,
        }
    }

    pub fn strokes(&self) -> &[Stroke] {
        &self.strokes
    }

    /// Start capturing at a screen position.
    ///
    /// Returns false, leaving the engine idle, when the tool does not draw or
    /// the position is not on the image.
    pub fn begin_stroke<V: Viewer + ?Sized>(
        &mut self,
        viewer: &V,
        screen: ScreenPoint,
        style: StrokeStyle,
    ) -> bool {
        if !self.tool.is_drawing() {
            return false;
        }
        let Some(point) = geometry::screen_to_normalized(viewer, screen) else {
            return false;
        };
        if self.is_capturing() {
            log::debug!("Dropping unfinished stroke, new one started");
        }

        let mut style = style.sanitized();
        if self.tool == Tool::Erase {
            style = style.with_mode(StrokeMode::Erase);
        }
        self.capture = CaptureState::Capturing(InProgressStroke {
            id: Uuid::new_v4().to_string(),
            points: vec![point],
            style,
            started_at: Utc::now(),
        });
        true
    }

    /// Append a point and draw the new segment.
    ///
    /// Points off the image are skipped. Returns true if a point was added.
    pub fn extend_stroke<V, S>(&mut self, viewer: &V, screen: ScreenPoint, surface: &mut S) -> bool
    where
        V: Viewer + ?Sized,
        S: Surface + ?Sized,
    {
        let CaptureState::Capturing(stroke) = &mut self.capture else {
            return false;
        };
        let Some(point) = geometry::screen_to_normalized(viewer, screen) else {
            return false;
        };
        let previous = stroke.points.last().copied();
        stroke.points.push(point);

        if let Some(previous) = previous {
            let from = geometry::normalized_to_screen(viewer, previous);
            let to = geometry::normalized_to_screen(viewer, point);
            if let (Some(from), Some(to)) = (from, to) {
                surface.draw_segment(from, to, &stroke.style);
            }
        }
        true
    }

    /// Finish the current stroke, keeping it if it has at least two points.
    pub fn end_stroke(&mut self) -> StrokeOutcome {
        let CaptureState::Capturing(stroke) = std::mem::take(&mut self.capture) else {
            return StrokeOutcome::NotCapturing;
        };
        if stroke.points.len() < 2 {
            log::debug!("Discarded stroke with {} point(s)", stroke.points.len());
            return StrokeOutcome::Discarded;
        }

        let stroke = Stroke {
            id: stroke.id,
            points: stroke.points,
            style: stroke.style,
            created_at: stroke.started_at,
        };
        self.history.push(self.strokes.clone());
        self.strokes.push(stroke.clone());
        log::info!(
            "Committed stroke {} ({} points), total: {}",
            stroke.id,
            stroke.point_count(),
            self.strokes.len()
        );
        StrokeOutcome::Committed(stroke)
    }

    /// Abandon the current stroke without storing it.
    pub fn cancel_stroke(&mut self) {
        self.capture = CaptureState::Idle;
    }

    /// Redraw every committed stroke, plus the one in progress.
    pub fn replay<V, S>(&self, viewer: &V, surface: &mut S)
    where
        V: Viewer + ?Sized,
        S: Surface + ?Sized,
    {
        replay_all(viewer, &self.strokes, surface);
        if let Some(stroke) = self.in_progress() {
            draw_polyline(viewer, &stroke.points, &stroke.style, surface);
        }
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn undo(&mut self) -> bool {
        match self.history.undo(self.strokes.clone()) {
            Some(previous) => {
                self.strokes = previous;
                log::info!("Undo, total: {}", self.strokes.len());
                true
            }
            None => false,
        }
    }

    pub fn redo(&mut self) -> bool {
        match self.history.redo(self.strokes.clone()) {
            Some(next) => {
                self.strokes = next;
                log::info!("Redo, total: {}", self.strokes.len());
                true
            }
            None => false,
        }
    }

    /// Remove every stroke. Undoable.
    pub fn clear(&mut self) {
        self.cancel_stroke();
        if self.strokes.is_empty() {
            return;
        }
        self.history.push(std::mem::take(&mut self.strokes));
        log::info!("Cleared all strokes");
    }

    /// Replace the collection, e.g. after opening a project file.
    ///
    /// Strokes that would break the normalized-point invariant are dropped.
    pub fn load_strokes(&mut self, strokes: Vec<Stroke>) {
        let total = strokes.len();
        self.strokes = strokes
            .into_iter()
            .filter(|s| s.points.len() >= 2 && s.points.iter().all(NormalizedPoint::is_valid))
            .map(|s| Stroke {
                style: s.style.sanitized(),
                ..s
            })
            .collect();
        if self.strokes.len() != total {
            log::warn!("Skipped {} invalid stroke(s)", total - self.strokes.len());
        }
        self.cancel_stroke();
        self.history.clear();
        self.submitted.clear();
    }

    /// Committed strokes the backend has not acknowledged yet.
    pub fn pending_submission(&self) -> Vec<&Stroke> {
        self.strokes
            .iter()
            .filter(|s| !self.submitted.contains_key(&s.id))
            .collect()
    }

    pub fn mark_submitted(&mut self, stroke_id: &str, remote_id: String) {
        self.submitted.insert(stroke_id.to_string(), remote_id);
    }

    pub fn remote_id(&self, stroke_id: &str) -> Option<&str> {
        self.submitted.get(stroke_id).map(String::as_str)
    }
}

/// Clear `surface` and draw every stroke through the viewer's current viewport.
///
/// Strokes are drawn in order, so an erase stroke only removes what was
/// painted before it. Does nothing beyond the clear if the viewer is
/// unavailable.
pub fn replay_all<V, S>(viewer: &V, strokes: &[Stroke], surface: &mut S)
where
    V: Viewer + ?Sized,
    S: Surface + ?Sized,
{
    surface.clear();
    for stroke in strokes {
        draw_polyline(viewer, &stroke.points, &stroke.style, surface);
    }
}

fn draw_polyline<V, S>(viewer: &V, points: &[NormalizedPoint], style: &StrokeStyle, surface: &mut S)
where
    V: Viewer + ?Sized,
    S: Surface + ?Sized,
{
    let projected: Option<Vec<ScreenPoint>> = points
        .iter()
        .map(|p| geometry::normalized_to_screen(viewer, *p))
        .collect();
    let Some(projected) = projected else {
        return;
    };
    for pair in projected.windows(2) {
        surface.draw_segment(pair[0], pair[1], style);
    }
}
