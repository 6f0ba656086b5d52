//! Host capabilities and the cooperative event loop.
//!
//! Components never talk to the terminal directly. They ask a host for frame
//! callbacks, resize notifications, drawing surfaces and intersection
//! notifications, and give every handle back when they are torn down.

use std::collections::BTreeSet;

use tracing::trace;

use crate::{CapabilityError, Surface, Viewport};

/// Handle of a pending frame callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FrameRequest(u64);

/// Handle of a resize notification subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ResizeSubscription(u64);

/// Handle of an element being watched for viewport intersection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObservationId(pub u64);

/// Identifier of a rendered page element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ElementId(pub usize);

/// Intersection notification for an observed element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntersectionEntry {
    pub observation: ObservationId,
    pub element: ElementId,
    /// Fraction of the element currently inside the viewport (0.0 - 1.0).
    pub ratio: f32,
}

/// Frame scheduling and viewport notifications.
pub trait Host {
    /// Current viewport size.
    fn viewport(&self) -> Viewport;

    /// Schedule a callback for the next frame.
    fn request_frame(&mut self) -> FrameRequest;

    /// Cancel a pending frame callback. Unknown requests are ignored.
    fn cancel_frame(&mut self, request: FrameRequest);

    /// Subscribe to viewport resize notifications.
    fn subscribe_resize(&mut self) -> ResizeSubscription;

    /// Remove a resize subscription. Unknown subscriptions are ignored.
    fn unsubscribe_resize(&mut self, subscription: ResizeSubscription);
}

/// Source of 2D drawing surfaces.
pub trait SurfaceProvider {
    type Surface: Surface;

    /// Acquire a drawing surface covering `viewport`.
    fn acquire_surface(&mut self, viewport: Viewport) -> Result<Self::Surface, CapabilityError>;
}

/// Viewport intersection notifications.
pub trait IntersectionHost {
    /// Start watching `element`. Entries are delivered whenever the visible
    /// fraction of the element changes.
    fn observe(
        &mut self,
        element: ElementId,
        threshold: f32,
    ) -> Result<ObservationId, CapabilityError>;

    /// Stop watching. Unknown observations are ignored.
    fn unobserve(&mut self, observation: ObservationId);
}

/// Single-threaded cooperative event loop.
///
/// Frame callbacks requested while a batch is being dispatched land in the
/// next batch, so frame N+1 never runs before frame N has completed.
#[derive(Debug, Default)]
pub struct EventLoop {
    viewport: Viewport,
    next_id: u64,
    pending_frames: BTreeSet<FrameRequest>,
    resize_subscribers: BTreeSet<ResizeSubscription>,
}

impl EventLoop {
    /// Create an event loop for the given viewport.
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            ..Self::default()
        }
    }

    /// Take every pending frame request, in request order.
    pub fn take_frames(&mut self) -> Vec<FrameRequest> {
        std::mem::take(&mut self.pending_frames).into_iter().collect()
    }

    /// Record a new viewport size and return the subscribers to notify.
    /// Returns nothing when the size did not change.
    pub fn resize(&mut self, viewport: Viewport) -> Vec<ResizeSubscription> {
        if viewport == self.viewport {
            return Vec::new();
        }
        trace!(?viewport, "viewport resized");
        self.viewport = viewport;
        self.resize_subscribers.iter().copied().collect()
    }

    /// Number of frame callbacks waiting for the next batch.
    pub fn pending_frame_count(&self) -> usize {
        self.pending_frames.len()
    }

    /// Number of live resize subscriptions.
    pub fn resize_subscriber_count(&self) -> usize {
        self.resize_subscribers.len()
    }

    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

impl Host for EventLoop {
    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn request_frame(&mut self) -> FrameRequest {
        let request = FrameRequest(self.next_id());
        self.pending_frames.insert(request);
        request
    }

    fn cancel_frame(&mut self, request: FrameRequest) {
        self.pending_frames.remove(&request);
    }

    fn subscribe_resize(&mut self) -> ResizeSubscription {
        let subscription = ResizeSubscription(self.next_id());
        self.resize_subscribers.insert(subscription);
        subscription
    }

    fn unsubscribe_resize(&mut self, subscription: ResizeSubscription) {
        self.resize_subscribers.remove(&subscription);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frames_are_batched() {
        let mut host = EventLoop::new(Viewport::new(800, 600));
        let first = host.request_frame();
        assert_eq!(host.take_frames(), vec![first]);

        // Requests made after a drain belong to the next batch.
        let second = host.request_frame();
        assert_ne!(first, second);
        assert_eq!(host.pending_frame_count(), 1);
        assert_eq!(host.take_frames(), vec![second]);
        assert!(host.take_frames().is_empty());
    }

    #[test]
    fn test_cancel_frame() {
        let mut host = EventLoop::new(Viewport::new(800, 600));
        let request = host.request_frame();
        host.cancel_frame(request);
        assert!(host.take_frames().is_empty());
        // Cancelling twice is harmless.
        host.cancel_frame(request);
    }

    #[test]
    fn test_resize_notifies_subscribers() {
        let mut host = EventLoop::new(Viewport::new(800, 600));
        let subscription = host.subscribe_resize();

        assert!(host.resize(Viewport::new(800, 600)).is_empty());
        assert_eq!(host.resize(Viewport::new(1024, 768)), vec![subscription]);
        assert_eq!(host.viewport(), Viewport::new(1024, 768));

        host.unsubscribe_resize(subscription);
        assert_eq!(host.resize_subscriber_count(), 0);
        assert!(host.resize(Viewport::new(640, 480)).is_empty());
    }
}
