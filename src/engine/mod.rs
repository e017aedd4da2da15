// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Stroke capture, storage, and replay.

mod history;
pub mod stroke_engine;

pub use stroke_engine::{replay_all, CaptureState, InProgressStroke, StrokeEngine, StrokeOutcome, Tool};
