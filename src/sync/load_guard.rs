// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Loading indicator with a hard timeout.
//!
//! The indicator clears when the viewer reports an open image or when the
//! timeout lapses, whichever comes first. It never cancels the load itself.

use std::time::{Duration, Instant};

pub const DEFAULT_LOAD_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStatus {
    Idle,
    Loading,
    /// The viewer never reported ready; the indicator was dropped.
    TimedOut,
}

#[derive(Debug)]
pub struct LoadGuard {
    timeout: Duration,
    started: Option<Instant>,
    timed_out: bool,
}

impl LoadGuard {
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            started: None,
            timed_out: false,
        }
    }

    pub fn start(&mut self, now: Instant) {
        self.started = Some(now);
        self.timed_out = false;
    }

    /// The viewer signalled that the image is open.
    pub fn finish(&mut self) {
        self.started = None;
        self.timed_out = false;
    }

    /// Current status; flips to `TimedOut` once the deadline has passed.
    pub fn poll(&mut self, now: Instant) -> LoadStatus {
        match self.started {
            Some(started) if now.saturating_duration_since(started) >= self.timeout => {
                log::warn!("Image did not open within {:?}, clearing loading indicator", self.timeout);
                self.started = None;
                self.timed_out = true;
                LoadStatus::TimedOut
            }
            Some(_) => LoadStatus::Loading,
            None if self.timed_out => LoadStatus::TimedOut,
            None => LoadStatus::Idle,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.started.is_some()
    }
}

impl Default for LoadGuard {
    fn default() -> Self {
        Self::new(DEFAULT_LOAD_TIMEOUT)
    }
}
