// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! deepink - freehand annotation for deep-zoom images
//!
//! Strokes are captured in screen space, stored in normalized image space,
//! and re-projected through the viewer's current viewport whenever it pans
//! or zooms, so they stay glued to the image at any magnification.

pub mod app;
pub mod config;
pub mod engine;
pub mod io;
pub mod minimap;
pub mod models;
pub mod render;
pub mod sync;
pub mod ui;
pub mod util;
pub mod viewer;
pub mod widgets;
