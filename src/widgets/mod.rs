// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Draggable floating panels and their persisted positions.

pub mod draggable;
pub mod store;

pub use draggable::{clamp_position, Anchor, ClampBounds, DraggableWidget, WidgetLayout, WidgetPosition, WidgetSpec};
pub use store::{MemoryStore, PositionStore};
