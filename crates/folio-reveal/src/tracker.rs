//! Viewport intersection for a vertically scrolling page.

use std::collections::{BTreeMap, HashMap};

use folio_core::{CapabilityError, ElementId, IntersectionEntry, IntersectionHost, ObservationId};

/// A vertical span of page rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RowSpan {
    pub top: u32,
    pub height: u32,
}

impl RowSpan {
    pub const fn new(top: u32, height: u32) -> Self {
        Self { top, height }
    }

    pub const fn bottom(&self) -> u32 {
        self.top + self.height
    }

    /// Fraction of this span inside `window`.
    pub fn visible_ratio(&self, window: RowSpan) -> f32 {
        if self.height == 0 {
            // Zero-height elements count as fully visible when on screen.
            let inside = self.top >= window.top && self.top < window.bottom();
            return if inside { 1.0 } else { 0.0 };
        }
        let overlap = self
            .bottom()
            .min(window.bottom())
            .saturating_sub(self.top.max(window.top));
        overlap as f32 / self.height as f32
    }
}

#[derive(Debug, Clone, Copy)]
struct Observation {
    element: ElementId,
    last_ratio: Option<f32>,
}

/// Intersection host measuring element row spans against the scrolled
/// viewport.
///
/// Entries are produced by [`IntersectionTracker::update`] for every
/// observation whose visible fraction changed since the previous update,
/// including the first update after it was registered. Observers apply their
/// own threshold.
#[derive(Debug)]
pub struct IntersectionTracker {
    available: bool,
    next_id: u64,
    observations: BTreeMap<ObservationId, Observation>,
    bounds: HashMap<ElementId, RowSpan>,
}

impl Default for IntersectionTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl IntersectionTracker {
    pub fn new() -> Self {
        Self {
            available: true,
            next_id: 0,
            observations: BTreeMap::new(),
            bounds: HashMap::new(),
        }
    }

    /// A tracker that refuses every observation.
    pub fn unavailable() -> Self {
        Self {
            available: false,
            ..Self::new()
        }
    }

    /// Record where `element` sits on the page.
    pub fn set_bounds(&mut self, element: ElementId, span: RowSpan) {
        self.bounds.insert(element, span);
    }

    /// Measure every observed element against `window`.
    pub fn update(&mut self, window: RowSpan) -> Vec<IntersectionEntry> {
        let mut entries = Vec::new();
        for (&id, observation) in &mut self.observations {
            let Some(span) = self.bounds.get(&observation.element) else {
                continue;
            };
            let ratio = span.visible_ratio(window);
            if observation.last_ratio == Some(ratio) {
                continue;
            }
            observation.last_ratio = Some(ratio);
            entries.push(IntersectionEntry {
                observation: id,
                element: observation.element,
                ratio,
            });
        }
        entries
    }

    /// Number of live observations.
    pub fn observation_count(&self) -> usize {
        self.observations.len()
    }
}

impl IntersectionHost for IntersectionTracker {
    fn observe(
        &mut self,
        element: ElementId,
        _threshold: f32,
    ) -> Result<ObservationId, CapabilityError> {
        if !self.available {
            return Err(CapabilityError::unavailable(
                "intersection observation",
                "disabled for this session",
            ));
        }
        self.next_id += 1;
        let id = ObservationId(self.next_id);
        self.observations.insert(
            id,
            Observation {
                element,
                last_ratio: None,
            },
        );
        Ok(id)
    }

    fn unobserve(&mut self, observation: ObservationId) {
        self.observations.remove(&observation);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visible_ratio() {
        let window = RowSpan::new(10, 20);
        assert_eq!(RowSpan::new(0, 5).visible_ratio(window), 0.0);
        assert_eq!(RowSpan::new(12, 5).visible_ratio(window), 1.0);
        assert_eq!(RowSpan::new(25, 10).visible_ratio(window), 0.5);
        assert_eq!(RowSpan::new(0, 40).visible_ratio(window), 0.5);
        assert_eq!(RowSpan::new(30, 10).visible_ratio(window), 0.0);
        assert_eq!(RowSpan::new(15, 0).visible_ratio(window), 1.0);
        assert_eq!(RowSpan::new(30, 0).visible_ratio(window), 0.0);
    }

    #[test]
    fn test_entries_only_on_change() {
        let mut tracker = IntersectionTracker::new();
        let element = ElementId(0);
        tracker.set_bounds(element, RowSpan::new(20, 10));
        let id = tracker.observe(element, 0.1).unwrap();

        let entries = tracker.update(RowSpan::new(0, 10));
        assert_eq!(
            entries,
            vec![IntersectionEntry {
                observation: id,
                element,
                ratio: 0.0
            }]
        );
        assert!(tracker.update(RowSpan::new(1, 10)).is_empty());

        let entries = tracker.update(RowSpan::new(15, 10));
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].ratio, 0.5);
    }

    #[test]
    fn test_unobserve_stops_entries() {
        let mut tracker = IntersectionTracker::new();
        let element = ElementId(3);
        tracker.set_bounds(element, RowSpan::new(0, 10));
        let id = tracker.observe(element, 0.1).unwrap();
        tracker.unobserve(id);
        assert_eq!(tracker.observation_count(), 0);
        assert!(tracker.update(RowSpan::new(0, 10)).is_empty());
    }

    #[test]
    fn test_unavailable_refuses() {
        let mut tracker = IntersectionTracker::unavailable();
        assert!(tracker.observe(ElementId(0), 0.1).is_err());
    }
}
