// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! UI components for the deepink application.

pub mod canvas;
pub mod floating;
pub mod minimap;
pub mod navigator;
pub mod toolbar;
