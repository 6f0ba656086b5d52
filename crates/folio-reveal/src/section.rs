//! Reveal wrapper for page sections.

use folio_core::{ElementId, IntersectionEntry, IntersectionHost, RevealConfig};

use crate::VisibilityObserver;

/// Opacity of a section that has not been revealed yet.
///
/// Hidden sections are still rendered, only dimmed.
pub const HIDDEN_OPACITY: f32 = 0.15;

/// Presentation state of a wrapped section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presentation {
    Hidden,
    /// Revealed at the given time, or shown without a transition (`None`).
    Visible { since_ms: Option<u64> },
}

impl Presentation {
    /// Style class name for the state.
    pub fn class(self) -> &'static str {
        match self {
            Presentation::Hidden => "fade-in-section",
            Presentation::Visible { .. } => "fade-in-section visible",
        }
    }
}

/// A page section that fades in the first time it scrolls into view.
#[derive(Debug)]
pub struct RevealSection {
    observer: VisibilityObserver,
    presentation: Presentation,
    transition_ms: u64,
}

impl RevealSection {
    pub fn mount(host: &mut impl IntersectionHost, element: ElementId, config: RevealConfig) -> Self {
        let observer = VisibilityObserver::mount(host, element, config);
        let presentation = if observer.is_revealed() {
            Presentation::Visible { since_ms: None }
        } else {
            Presentation::Hidden
        };
        Self {
            observer,
            presentation,
            transition_ms: config.transition_ms,
        }
    }

    /// Forward an intersection entry. `now_ms` timestamps the reveal.
    pub fn on_intersection(
        &mut self,
        host: &mut impl IntersectionHost,
        entry: &IntersectionEntry,
        now_ms: u64,
    ) -> bool {
        let revealed = self.observer.on_intersection(host, entry);
        if revealed {
            self.presentation = Presentation::Visible {
                since_ms: Some(now_ms),
            };
        }
        revealed
    }

    pub fn presentation(&self) -> Presentation {
        self.presentation
    }

    /// Opacity at `now_ms`, easing out from [`HIDDEN_OPACITY`] to 1.0.
    pub fn opacity(&self, now_ms: u64) -> f32 {
        match self.presentation {
            Presentation::Hidden => HIDDEN_OPACITY,
            Presentation::Visible { since_ms: None } => 1.0,
            Presentation::Visible {
                since_ms: Some(since),
            } => {
                if self.transition_ms == 0 {
                    return 1.0;
                }
                let t = now_ms.saturating_sub(since) as f32 / self.transition_ms as f32;
                if t >= 1.0 {
                    return 1.0;
                }
                let eased = 1.0 - (1.0 - t) * (1.0 - t);
                HIDDEN_OPACITY + (1.0 - HIDDEN_OPACITY) * eased
            }
        }
    }

    pub fn is_revealed(&self) -> bool {
        self.observer.is_revealed()
    }

    pub fn element(&self) -> ElementId {
        self.observer.element()
    }

    pub fn unmount(self, host: &mut impl IntersectionHost) {
        self.observer.unmount(host);
    }
}
