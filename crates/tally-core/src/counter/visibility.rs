//! Viewport visibility detection
//!
//! A [`ViewportVisibilityPort`] watches host elements and flips a write-once
//! [`VisibilityLatch`] the first time an element becomes visible enough. The
//! latch outlives the observation, so releasing an element never resets it.

use std::cell::Cell;
use std::collections::HashMap;
use std::rc::Rc;

/// Identity of a host element known to a visibility port
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub u32);

/// Write-once visibility flag (false → true, never back)
#[derive(Debug, Clone, Default)]
pub struct VisibilityLatch {
    visible: Rc<Cell<bool>>,
}

impl VisibilityLatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the latch, returning `true` only on the false → true transition
    pub fn trigger(&self) -> bool {
        !self.visible.replace(true)
    }

    #[inline]
    pub fn is_visible(&self) -> bool {
        self.visible.get()
    }
}

/// Source of one-shot "became visible" notifications
pub trait ViewportVisibilityPort {
    /// Start watching `element`; the returned latch is set once its visible
    /// fraction first reaches `threshold`. An absent element yields a latch
    /// that never fires.
    fn observe(&mut self, element: Option<ElementId>, threshold: f64) -> VisibilityLatch;

    /// Stop watching `element`. Safe to call for absent or unknown elements.
    fn release(&mut self, element: Option<ElementId>);
}

#[derive(Debug)]
struct Observation {
    threshold: f64,
    latch: VisibilityLatch,
}

/// Visibility port driven by polled element bounds
///
/// The host measures each element against the viewport and reports the
/// visible fraction; this port turns those samples into one-shot triggers.
#[derive(Debug, Default)]
pub struct PollingViewport {
    observations: HashMap<ElementId, Observation>,
}

impl PollingViewport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the visible fraction of `element`
    ///
    /// Returns `true` when this sample triggered the element's latch. Later
    /// samples for an already visible element are ignored.
    pub fn report(&mut self, element: ElementId, visible_fraction: f64) -> bool {
        let Some(observation) = self.observations.get(&element) else {
            return false;
        };
        if observation.latch.is_visible() {
            return false;
        }
        if visible_fraction > 0.0 && visible_fraction >= observation.threshold {
            let fired = observation.latch.trigger();
            if fired {
                tracing::debug!(
                    element = element.0,
                    fraction = visible_fraction,
                    "Element became visible"
                );
            }
            return fired;
        }
        false
    }

    /// Whether `element` is currently observed
    pub fn is_observing(&self, element: ElementId) -> bool {
        self.observations.contains_key(&element)
    }

    /// Number of elements currently observed
    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }
}

impl ViewportVisibilityPort for PollingViewport {
    fn observe(&mut self, element: Option<ElementId>, threshold: f64) -> VisibilityLatch {
        let latch = VisibilityLatch::new();
        if let Some(element) = element {
            self.observations.insert(
                element,
                Observation {
                    threshold: threshold.clamp(0.0, 1.0),
                    latch: latch.clone(),
                },
            );
        }
        latch
    }

    fn release(&mut self, element: Option<ElementId>) {
        if let Some(element) = element {
            if self.observations.remove(&element).is_some() {
                tracing::debug!(element = element.0, "Released visibility observation");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latch_is_write_once() {
        let latch = VisibilityLatch::new();
        assert!(!latch.is_visible());
        assert!(latch.trigger());
        assert!(!latch.trigger());
        assert!(latch.is_visible());
    }

    #[test]
    fn test_report_below_threshold_does_not_fire() {
        let mut port = PollingViewport::new();
        let latch = port.observe(Some(ElementId(1)), 0.1);

        assert!(!port.report(ElementId(1), 0.0));
        assert!(!port.report(ElementId(1), 0.05));
        assert!(!latch.is_visible());
    }

    #[test]
    fn test_report_fires_exactly_once() {
        let mut port = PollingViewport::new();
        let latch = port.observe(Some(ElementId(1)), 0.1);

        assert!(port.report(ElementId(1), 0.5));
        assert!(latch.is_visible());
        assert!(!port.report(ElementId(1), 1.0));
        assert!(!port.report(ElementId(1), 0.0));
        assert!(latch.is_visible());
    }

    #[test]
    fn test_zero_threshold_needs_some_visibility() {
        let mut port = PollingViewport::new();
        let latch = port.observe(Some(ElementId(3)), 0.0);

        assert!(!port.report(ElementId(3), 0.0));
        assert!(port.report(ElementId(3), 0.01));
        assert!(latch.is_visible());
    }

    #[test]
    fn test_absent_element_is_noop() {
        let mut port = PollingViewport::new();
        let latch = port.observe(None, 0.1);
        port.release(None);

        assert!(port.is_empty());
        assert!(!latch.is_visible());
    }

    #[test]
    fn test_release_stops_observation_and_keeps_latch() {
        let mut port = PollingViewport::new();
        let latch = port.observe(Some(ElementId(2)), 0.1);
        assert!(port.report(ElementId(2), 1.0));

        port.release(Some(ElementId(2)));
        assert!(!port.is_observing(ElementId(2)));
        assert!(latch.is_visible());

        // Unknown elements are ignored
        assert!(!port.report(ElementId(2), 1.0));
        port.release(Some(ElementId(2)));
    }
}
