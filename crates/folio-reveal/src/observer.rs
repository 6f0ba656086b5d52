//! One-shot visibility observer.

use folio_core::{ElementId, IntersectionEntry, IntersectionHost, ObservationId, RevealConfig};
use tracing::{debug, warn};

/// Watches one element and reports the first time enough of it is visible.
///
/// The flag only ever goes from false to true. The subscription is released
/// as soon as it does, or on [`VisibilityObserver::unmount`] if it never does.
#[derive(Debug)]
pub struct VisibilityObserver {
    element: ElementId,
    threshold: f32,
    revealed: bool,
    observation: Option<ObservationId>,
}

impl VisibilityObserver {
    /// Start observing `element`.
    ///
    /// Without an intersection capability the element is revealed right away.
    pub fn mount(host: &mut impl IntersectionHost, element: ElementId, config: RevealConfig) -> Self {
        let threshold = config.visibility_threshold;
        match host.observe(element, threshold) {
            Ok(observation) => Self {
                element,
                threshold,
                revealed: false,
                observation: Some(observation),
            },
            Err(err) => {
                warn!(%err, ?element, "revealing without intersection observation");
                Self {
                    element,
                    threshold,
                    revealed: true,
                    observation: None,
                }
            }
        }
    }

    /// Consume an intersection entry. Returns `true` only for the entry that
    /// reveals the element.
    pub fn on_intersection(
        &mut self,
        host: &mut impl IntersectionHost,
        entry: &IntersectionEntry,
    ) -> bool {
        let Some(observation) = self.observation else {
            return false;
        };
        if entry.observation != observation || !self.reaches_threshold(entry.ratio) {
            return false;
        }
        self.revealed = true;
        self.observation = None;
        host.unobserve(observation);
        debug!(element = ?self.element, ratio = entry.ratio, "element revealed");
        true
    }

    /// Release the subscription if it is still held.
    pub fn unmount(self, host: &mut impl IntersectionHost) {
        if let Some(observation) = self.observation {
            host.unobserve(observation);
        }
    }

    pub fn is_revealed(&self) -> bool {
        self.revealed
    }

    pub fn element(&self) -> ElementId {
        self.element
    }

    /// Whether a subscription is still held.
    pub fn is_observing(&self) -> bool {
        self.observation.is_some()
    }

    fn reaches_threshold(&self, ratio: f32) -> bool {
        ratio > 0.0 && ratio >= self.threshold
    }
}
