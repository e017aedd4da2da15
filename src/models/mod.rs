// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Data model: strokes, projects, and coordinate space types.

pub mod annotation;
pub mod project;
pub mod space;
