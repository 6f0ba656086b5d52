//! Core types for the folio terminal portfolio.
//!
//! This crate describes the boundary between the page components and the
//! environment hosting them: viewport geometry, frame and resize scheduling,
//! viewport intersection and 2D drawing surfaces. It also provides the
//! cooperative [`EventLoop`] that implements frame and resize scheduling.

mod error;
mod host;
mod settings;
mod surface;
mod theme;
mod viewport;

pub use error::CapabilityError;
pub use host::{
    ElementId, EventLoop, FrameRequest, Host, IntersectionEntry, IntersectionHost, ObservationId,
    ResizeSubscription, SurfaceProvider,
};
pub use settings::{RainConfig, RevealConfig};
pub use surface::{Fill, Font, Surface};
pub use theme::ColorTheme;
pub use viewport::Viewport;
