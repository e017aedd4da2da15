// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Keeping overlays in step with the viewer.

pub mod load_guard;
pub mod viewport_sync;

pub use load_guard::{LoadGuard, LoadStatus};
pub use viewport_sync::{FrameHandle, FrameScheduler, Listeners, Subscription, ViewportSync};
