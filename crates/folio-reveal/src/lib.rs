//! Scroll-triggered reveal of page sections.
//!
//! A [`RevealSection`] wraps one page section and owns a
//! [`VisibilityObserver`], which subscribes to intersection notifications from
//! an [`IntersectionHost`](folio_core::IntersectionHost) and flips to revealed
//! the first time enough of the section is on screen. The
//! [`IntersectionTracker`] is the host implementation used by the terminal
//! page: it measures element rows against the scrolled viewport.

mod observer;
mod section;
mod tracker;

pub use observer::VisibilityObserver;
pub use section::{HIDDEN_OPACITY, Presentation, RevealSection};
pub use tracker::{IntersectionTracker, RowSpan};
