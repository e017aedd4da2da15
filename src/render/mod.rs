// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Overlay drawing surfaces.
//!
//! The stroke engine only knows the [`Surface`] trait. The desktop front end
//! draws into a [`PixmapSurface`] that is uploaded as a texture, while
//! [`RecordingSurface`] keeps a plain display list.

mod pixmap;

pub use pixmap::PixmapSurface;

use crate::models::annotation::StrokeStyle;
use crate::models::space::ScreenPoint;

/// Something line segments can be drawn onto, in screen pixels.
pub trait Surface {
    /// Erase everything drawn so far.
    fn clear(&mut self);

    /// Draw one segment with the given style, honoring its compositing mode.
    fn draw_segment(&mut self, from: ScreenPoint, to: ScreenPoint, style: &StrokeStyle);
}

/// A recorded drawing operation.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear,
    Segment {
        from: ScreenPoint,
        to: ScreenPoint,
        style: StrokeStyle,
    },
}

/// Display-list surface that records every call.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Segments drawn since the last clear.
    pub fn segments(&self) -> Vec<(ScreenPoint, ScreenPoint, StrokeStyle)> {
        let start = self
            .commands
            .iter()
            .rposition(|c| matches!(c, DrawCommand::Clear))
            .map_or(0, |i| i + 1);
        self.commands[start..]
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Segment { from, to, style } => Some((*from, *to, *style)),
                DrawCommand::Clear => None,
            })
            .collect()
    }
}

impl Surface for RecordingSurface {
    fn clear(&mut self) {
        self.commands.push(DrawCommand::Clear);
    }

    fn draw_segment(&mut self, from: ScreenPoint, to: ScreenPoint, style: &StrokeStyle) {
        self.commands.push(DrawCommand::Segment {
            from,
            to,
            style: *style,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segments_start_after_last_clear() {
        let mut surface = RecordingSurface::new();
        let style = StrokeStyle::default();
        surface.draw_segment(ScreenPoint::new(0.0, 0.0), ScreenPoint::new(1.0, 1.0), &style);
        surface.clear();
        surface.draw_segment(ScreenPoint::new(2.0, 2.0), ScreenPoint::new(3.0, 3.0), &style);
        let segments = surface.segments();
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].0, ScreenPoint::new(2.0, 2.0));
        assert_eq!(surface.commands().len(), 3);
    }
}
