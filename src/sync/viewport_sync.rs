// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Frame-rate bounded viewport change notifications.
//!
//! A viewer can fire dozens of pan/zoom/animation events per frame. This
//! module drains them from the viewer's channel, asks the host for a single
//! animation frame, and when that frame runs recomputes the
//! [`ViewportState`] once and hands it to every listener. Intermediate states
//! are skipped under load; the state delivered is always the latest one.

use crate::models::space::ViewportState;
use crate::util::geometry;
use crate::viewer::{Viewer, ViewerEvent};
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::sync::mpsc::{Receiver, TryRecvError};

/// Identifies one requested animation frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub u64);

/// The host's "call me on the next animation frame" primitive.
pub trait FrameScheduler {
    fn request_frame(&mut self) -> FrameHandle;

    fn cancel_frame(&mut self, handle: FrameHandle);
}

type Listener = Rc<dyn Fn(&ViewportState)>;

#[derive(Default)]
struct Registry {
    next_id: u64,
    listeners: Vec<(u64, Listener)>,
}

impl Registry {
    fn contains(&self, id: u64) -> bool {
        self.listeners.iter().any(|(i, _)| *i == id)
    }
}

/// Keeps a listener registered. Dropping it unsubscribes.
#[must_use = "dropping a Subscription unsubscribes the listener"]
pub struct Subscription {
    registry: Weak<RefCell<Registry>>,
    id: u64,
}

impl Subscription {
    pub fn unsubscribe(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            registry.borrow_mut().listeners.retain(|(id, _)| *id != self.id);
        }
    }
}

/// Cloneable registration handle for viewport listeners.
///
/// Safe to use from inside a listener; a listener added during a
/// notification first runs on the next frame.
#[derive(Clone)]
pub struct Listeners {
    registry: Rc<RefCell<Registry>>,
}

impl Listeners {
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&ViewportState) + 'static,
    {
        let mut registry = self.registry.borrow_mut();
        let id = registry.next_id;
        registry.next_id += 1;
        let listener: Listener = Rc::new(listener);
        registry.listeners.push((id, listener));
        Subscription {
            registry: Rc::downgrade(&self.registry),
            id,
        }
    }
}

/// Coalesces viewer events into at most one recomputation per frame.
pub struct ViewportSync {
    events: Receiver<ViewerEvent>,
    registry: Rc<RefCell<Registry>>,
    pending: Option<FrameHandle>,
    current: Option<ViewportState>,
    ready: bool,
    detached: bool,
}

impl ViewportSync {
    /// Start listening on a viewer's event channel.
    pub fn new(events: Receiver<ViewerEvent>) -> Self {
        Self {
            events,
            registry: Rc::new(RefCell::new(Registry::default())),
            pending: None,
            current: None,
            ready: false,
            detached: false,
        }
    }

    /// Shorthand for subscribing to `viewer` and wrapping the channel.
    pub fn attach<V: Viewer + ?Sized>(viewer: &mut V) -> Self {
        let mut sync = Self::new(viewer.subscribe());
        // An image may already be open, in which case no Open event will come.
        sync.ready = viewer.image_dimensions().is_some();
        sync
    }

    /// Register a listener for new viewport states.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&ViewportState) + 'static,
    {
        self.listeners().subscribe(listener)
    }

    /// Handle for registering listeners without borrowing the sync itself.
    pub fn listeners(&self) -> Listeners {
        Listeners {
            registry: self.registry.clone(),
        }
    }

    pub fn listener_count(&self) -> usize {
        self.registry.borrow().listeners.len()
    }

    /// Drain viewer events and schedule a frame if anything changed.
    ///
    /// Returns true if a frame is pending afterwards.
    pub fn pump(&mut self, scheduler: &mut dyn FrameScheduler) -> bool {
        let mut changed = false;
        loop {
            match self.events.try_recv() {
                Ok(ViewerEvent::Destroyed) | Err(TryRecvError::Disconnected) => {
                    self.detach(scheduler);
                    return false;
                }
                Ok(ViewerEvent::Open(dims)) => {
                    log::debug!("Viewport sync ready for {}x{} image", dims.width, dims.height);
                    self.ready = true;
                    changed = true;
                }
                Ok(event) => changed |= event.affects_viewport(),
                Err(TryRecvError::Empty) => break,
            }
        }
        if changed {
            self.schedule(scheduler);
        }
        self.pending.is_some()
    }

    /// Ask for a recomputation even though the viewer did not move.
    pub fn request_refresh(&mut self, scheduler: &mut dyn FrameScheduler) {
        self.schedule(scheduler);
    }

    fn schedule(&mut self, scheduler: &mut dyn FrameScheduler) {
        if self.detached || self.pending.is_some() {
            return;
        }
        self.pending = Some(scheduler.request_frame());
    }

    /// Drop a pending frame request. A later `pump` can schedule again.
    pub fn cancel(&mut self, scheduler: &mut dyn FrameScheduler) {
        if let Some(handle) = self.pending.take() {
            scheduler.cancel_frame(handle);
        }
    }

    pub fn pending_frame(&self) -> Option<FrameHandle> {
        self.pending
    }

    /// Animation-frame callback. Recomputes the state and notifies listeners.
    ///
    /// Handles other than the pending one are stale and ignored.
    pub fn run_frame<V: Viewer + ?Sized>(
        &mut self,
        handle: FrameHandle,
        viewer: &V,
    ) -> Option<ViewportState> {
        if self.pending != Some(handle) {
            return None;
        }
        self.pending = None;
        if self.detached {
            return None;
        }

        let state = geometry::viewport_state(viewer)?;
        self.current = Some(state);

        // Snapshot so listeners can (un)subscribe while we iterate.
        let snapshot: Vec<(u64, Listener)> = self.registry.borrow().listeners.clone();
        for (id, listener) in snapshot {
            if self.registry.borrow().contains(id) {
                listener(&state);
            }
        }
        Some(state)
    }

    /// Most recently computed state.
    pub fn current(&self) -> Option<ViewportState> {
        self.current
    }

    /// Whether the viewer has reported an open image.
    pub fn is_ready(&self) -> bool {
        self.ready && !self.detached
    }


    fn detach(&mut self, scheduler: &mut dyn FrameScheduler) {
        if !self.detached {
            log::debug!("Viewer gone, detaching viewport sync");
        }
        self.cancel(scheduler);
        self.detached = true;
        self.current = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::space::{ImageDimensions, Size, ViewportPoint};
    use crate::viewer::FlatViewer;
    use std::cell::Cell;

    #[derive(Default)]
    struct ManualScheduler {
        next: u64,
        requested: Vec<FrameHandle>,
        cancelled: Vec<FrameHandle>,
    }

    impl FrameScheduler for ManualScheduler {
        fn request_frame(&mut self) -> FrameHandle {
            self.next += 1;
            let handle = FrameHandle(self.next);
            self.requested.push(handle);
            handle
        }

        fn cancel_frame(&mut self, handle: FrameHandle) {
            self.cancelled.push(handle);
        }
    }

    fn setup() -> (FlatViewer, ViewportSync, ManualScheduler) {
        let mut viewer = FlatViewer::new(Size::new(800.0, 600.0));
        let sync = ViewportSync::attach(&mut viewer);
        viewer.open(ImageDimensions::new(4000, 3000).unwrap());
        (viewer, sync, ManualScheduler::default())
    }

    fn run_pending(sync: &mut ViewportSync, viewer: &FlatViewer) -> Option<ViewportState> {
        let handle = sync.pending_frame()?;
        sync.run_frame(handle, viewer)
    }

    #[test]
    fn many_events_coalesce_into_one_frame() {
        let (mut viewer, mut sync, mut scheduler) = setup();
        let calls = Rc::new(Cell::new(0));
        let seen = calls.clone();
        let _sub = sync.subscribe(move |_| seen.set(seen.get() + 1));

        for _ in 0..25 {
            viewer.pan_by_screen(3.0, 1.0);
            viewer.zoom_by(1.01, None);
        }
        assert!(sync.pump(&mut scheduler));
        assert!(sync.pump(&mut scheduler));
        assert_eq!(scheduler.requested.len(), 1);

        run_pending(&mut sync, &viewer);
        assert_eq!(calls.get(), 1);
        assert!(sync.pending_frame().is_none());
    }

    #[test]
    fn listeners_see_latest_state() {
        let (mut viewer, mut sync, mut scheduler) = setup();
        let last_zoom = Rc::new(Cell::new(0.0));
        let seen = last_zoom.clone();
        let _sub = sync.subscribe(move |state| seen.set(state.zoom));

        viewer.zoom_by(2.0, None);
        sync.pump(&mut scheduler);
        // More events arrive before the frame fires.
        viewer.zoom_by(2.0, None);
        sync.pump(&mut scheduler);
        run_pending(&mut sync, &viewer);

        assert_eq!(last_zoom.get(), 4.0);
        assert_eq!(sync.current().map(|s| s.zoom), Some(4.0));
    }

    #[test]
    fn stale_and_cancelled_frames_are_ignored() {
        let (mut viewer, mut sync, mut scheduler) = setup();
        viewer.pan_by_screen(10.0, 0.0);
        sync.pump(&mut scheduler);
        let first = sync.pending_frame().unwrap();

        sync.cancel(&mut scheduler);
        assert_eq!(scheduler.cancelled, vec![first]);
        assert!(sync.run_frame(first, &viewer).is_none());

        viewer.pan_by_screen(10.0, 0.0);
        sync.pump(&mut scheduler);
        let second = sync.pending_frame().unwrap();
        assert_ne!(first, second);
        assert!(sync.run_frame(second, &viewer).is_some());
    }

    #[test]
    fn unsubscribe_during_notification_is_safe() {
        let (mut viewer, mut sync, mut scheduler) = setup();
        let second_calls = Rc::new(Cell::new(0));

        // The first listener drops the second one's subscription mid-notification.
        let victim: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));
        let victim_handle = victim.clone();
        let _first = sync.subscribe(move |_| {
            victim_handle.borrow_mut().take();
        });
        let counter = second_calls.clone();
        *victim.borrow_mut() = Some(sync.subscribe(move |_| counter.set(counter.get() + 1)));

        viewer.pan_by_screen(1.0, 1.0);
        sync.pump(&mut scheduler);
        run_pending(&mut sync, &viewer);

        assert_eq!(second_calls.get(), 0);
        assert_eq!(sync.listener_count(), 1);
    }

    #[test]
    fn subscribe_during_notification_is_safe() {
        let (mut viewer, mut sync, mut scheduler) = setup();
        let late_calls = Rc::new(Cell::new(0));
        let held: Rc<RefCell<Vec<Subscription>>> = Rc::new(RefCell::new(Vec::new()));

        let listeners = sync.listeners();
        let inner_held = held.clone();
        let inner_calls = late_calls.clone();
        let _first = sync.subscribe(move |_| {
            let calls = inner_calls.clone();
            let sub = listeners.subscribe(move |_| calls.set(calls.get() + 1));
            inner_held.borrow_mut().push(sub);
        });

        viewer.pan_by_screen(1.0, 0.0);
        sync.pump(&mut scheduler);
        run_pending(&mut sync, &viewer);
        // Added during the pass, so not called in it.
        assert_eq!(late_calls.get(), 0);
        assert_eq!(sync.listener_count(), 2);

        viewer.pan_by_screen(1.0, 0.0);
        sync.pump(&mut scheduler);
        run_pending(&mut sync, &viewer);
        assert_eq!(late_calls.get(), 1);
    }

    #[test]
    fn destroy_detaches_and_cancels() {
        let (mut viewer, mut sync, mut scheduler) = setup();
        viewer.pan_by_screen(1.0, 0.0);
        sync.pump(&mut scheduler);
        assert!(sync.is_ready());

        viewer.destroy();
        assert!(!sync.pump(&mut scheduler));
        assert!(!sync.is_ready());
        assert_eq!(scheduler.cancelled.len(), 1);
        assert!(sync.current().is_none());

        sync.request_refresh(&mut scheduler);
        assert!(sync.pending_frame().is_none());
    }

    #[test]
    fn animated_pan_ticks_each_frame() {
        let (mut viewer, mut sync, mut scheduler) = setup();
        viewer.pan_to(ViewportPoint::new(0.9, 0.6), false);
        let mut frames = 0;
        while viewer.update(1.0 / 60.0) {
            assert!(sync.pump(&mut scheduler));
            run_pending(&mut sync, &viewer);
            frames += 1;
        }
        sync.pump(&mut scheduler);
        let final_state = run_pending(&mut sync, &viewer).unwrap();
        assert!(frames > 1);
        assert!((final_state.center.x - 0.9).abs() < 1e-9);
        assert!((final_state.center.y - 0.8).abs() < 1e-9);
    }

    #[test]
    fn not_ready_until_open() {
        let mut viewer = FlatViewer::new(Size::new(100.0, 100.0));
        let mut sync = ViewportSync::attach(&mut viewer);
        let mut scheduler = ManualScheduler::default();
        assert!(!sync.is_ready());
        viewer.open(ImageDimensions::new(10, 10).unwrap());
        sync.pump(&mut scheduler);
        assert!(sync.is_ready());
    }
}
