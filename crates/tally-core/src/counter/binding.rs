//! Counter binding: host element + visibility + animation loop
//!
//! A [`Counter`] registers its element with a visibility port at mount, starts
//! one [`AnimationLoop`] when the latch first reads visible, and renders the
//! current value with its prefix and suffix. Every loop it starts carries its
//! own [`CancelToken`], and the previous token is invalidated before any
//! restart, so a counter never has two live loops. The counter also drops the
//! old loop when it cancels, so the token only matters to callers that keep a
//! loop of their own.

use std::rc::Rc;
use std::time::Duration;

use super::animation::{AnimationLoop, TickOutcome};
use super::cancel::CancelToken;
use super::clock::Clock;
use super::easing::EasingType;
use super::format::NumberFormatter;
use super::visibility::{ElementId, ViewportVisibilityPort, VisibilityLatch};

/// Immutable per-counter configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CounterSpec {
    pub end_value: u64,
    pub duration: Duration,
    pub prefix: String,
    pub suffix: String,
}

impl CounterSpec {
    pub const DEFAULT_DURATION: Duration = Duration::from_millis(2000);

    pub fn new(end_value: u64) -> Self {
        Self {
            end_value,
            duration: Self::DEFAULT_DURATION,
            prefix: String::new(),
            suffix: String::new(),
        }
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }
}

/// Active run and the token that can invalidate it
#[derive(Debug)]
struct ActiveRun {
    animation: AnimationLoop,
    token: CancelToken,
}

#[derive(Debug)]
pub struct Counter {
    spec: CounterSpec,
    easing: EasingType,
    element: Option<ElementId>,
    /// Present between mount and teardown
    latch: Option<VisibilityLatch>,
    /// Set once the visibility trigger has been consumed
    triggered: bool,
    run: Option<ActiveRun>,
    /// Value shown when no run exists
    display: u64,
}

impl Counter {
    pub fn new(spec: CounterSpec, element: Option<ElementId>) -> Self {
        Self {
            spec,
            easing: EasingType::default(),
            element,
            latch: None,
            triggered: false,
            run: None,
            display: 0,
        }
    }

    pub fn with_easing(mut self, easing: EasingType) -> Self {
        self.easing = easing;
        self
    }

    pub fn spec(&self) -> &CounterSpec {
        &self.spec
    }

    pub fn is_mounted(&self) -> bool {
        self.latch.is_some()
    }

    /// Whether the visibility latch has fired
    pub fn is_visible(&self) -> bool {
        self.latch.as_ref().is_some_and(VisibilityLatch::is_visible)
    }

    /// Whether a run is active and wants another frame
    pub fn is_animating(&self) -> bool {
        self.run.as_ref().is_some_and(|run| run.animation.is_pending())
    }

    /// Register the host element with `port`
    ///
    /// A fresh mount starts from the pre-visibility state: value 0, waiting for
    /// the new latch. Mounting an already mounted counter is a no-op.
    pub fn mount(&mut self, port: &mut dyn ViewportVisibilityPort, threshold: f64) {
        if self.latch.is_some() {
            return;
        }
        self.cancel_run();
        self.triggered = false;
        self.display = 0;
        self.latch = Some(port.observe(self.element, threshold));
    }

    /// Advance the counter by one frame
    ///
    /// Starts the run on the first frame after the latch fires, then ticks it.
    /// Returns `true` while another frame is needed.
    pub fn on_frame(&mut self, clock: &Rc<dyn Clock>) -> bool {
        if !self.triggered && self.is_visible() {
            self.triggered = true;
            self.start_run(clock);
        }

        let Some(run) = self.run.as_mut() else {
            return false;
        };
        let report = run.animation.tick();
        if let Some(value) = report.committed {
            self.display = value;
        }
        if report.outcome == TickOutcome::Cancelled {
            self.run = None;
            return false;
        }
        report.outcome.needs_frame()
    }

    /// Change the target or duration
    ///
    /// The running loop, if any, is invalidated first. When the counter has
    /// already been triggered a fresh run starts from zero.
    pub fn reconfigure(&mut self, end_value: u64, duration: Duration, clock: &Rc<dyn Clock>) {
        if self.spec.end_value == end_value && self.spec.duration == duration {
            return;
        }
        self.spec.end_value = end_value;
        self.spec.duration = duration;
        self.cancel_run();
        if self.triggered {
            self.start_run(clock);
        }
    }

    /// Reset to the pre-visibility state and observe the element again
    pub fn replay(&mut self, port: &mut dyn ViewportVisibilityPort, threshold: f64) {
        self.teardown(port);
        self.mount(port, threshold);
    }

    /// Release the visibility subscription and invalidate any running loop
    ///
    /// Safe to call whether or not visibility ever fired, and more than once.
    pub fn teardown(&mut self, port: &mut dyn ViewportVisibilityPort) {
        self.cancel_run();
        if self.latch.take().is_some() {
            port.release(self.element);
        }
    }

    /// Currently displayed value
    pub fn display_value(&self) -> u64 {
        self.display
    }

    /// `prefix + formatted value + suffix`
    pub fn render(&self, formatter: &dyn NumberFormatter) -> String {
        format!(
            "{}{}{}",
            self.spec.prefix,
            formatter.format(self.display),
            self.spec.suffix
        )
    }

    fn start_run(&mut self, clock: &Rc<dyn Clock>) {
        self.cancel_run();
        let token = CancelToken::new();
        let animation = AnimationLoop::start(
            self.spec.end_value,
            self.spec.duration,
            self.easing,
            Rc::clone(clock),
            token.clone(),
        );
        self.display = animation.value();
        self.run = Some(ActiveRun { animation, token });
    }

    fn cancel_run(&mut self) {
        if let Some(run) = self.run.take() {
            run.token.cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::counter::clock::ManualClock;
    use crate::counter::format::GroupingFormatter;
    use crate::counter::visibility::PollingViewport;

    const ELEMENT: ElementId = ElementId(7);

    fn setup(spec: CounterSpec) -> (Counter, PollingViewport, ManualClock, Rc<dyn Clock>) {
        let manual = ManualClock::new();
        let clock: Rc<dyn Clock> = Rc::new(manual.clone());
        let mut port = PollingViewport::new();
        let mut counter = Counter::new(spec, Some(ELEMENT));
        counter.mount(&mut port, 0.1);
        (counter, port, manual, clock)
    }

    fn run_to_end(counter: &mut Counter, manual: &ManualClock, clock: &Rc<dyn Clock>) -> Vec<u64> {
        let mut seen = vec![counter.display_value()];
        let mut frames = 0;
        while counter.on_frame(clock) {
            seen.push(counter.display_value());
            manual.advance(Duration::from_millis(16));
            frames += 1;
            assert!(frames < 10_000);
        }
        seen.push(counter.display_value());
        seen
    }

    #[test]
    fn test_no_frames_before_visibility() {
        let (mut counter, mut port, manual, clock) = setup(CounterSpec::new(117));
        assert!(port.is_observing(ELEMENT));

        for _ in 0..10 {
            assert!(!counter.on_frame(&clock));
            manual.advance(Duration::from_millis(500));
        }
        assert_eq!(counter.display_value(), 0);
        assert!(!counter.is_animating());

        // Below threshold still does nothing
        port.report(ELEMENT, 0.05);
        assert!(!counter.on_frame(&clock));
        assert_eq!(counter.display_value(), 0);
    }

    #[test]
    fn test_reference_scenario_through_binding() {
        let (mut counter, mut port, manual, clock) =
            setup(CounterSpec::new(117).with_suffix("+"));
        let fmt = GroupingFormatter::default();

        assert!(port.report(ELEMENT, 0.4));
        assert!(counter.on_frame(&clock));
        assert_eq!(counter.display_value(), 0);
        assert_eq!(counter.render(&fmt), "0+");

        manual.advance(Duration::from_millis(1000));
        assert!(counter.on_frame(&clock));
        assert_eq!(counter.display_value(), 109);

        manual.advance(Duration::from_millis(1000));
        assert!(!counter.on_frame(&clock));
        assert_eq!(counter.display_value(), 117);
        assert_eq!(counter.render(&fmt), "117+");
    }

    #[test]
    fn test_values_non_decreasing_and_final() {
        let (mut counter, mut port, manual, clock) = setup(CounterSpec::new(12000));
        port.report(ELEMENT, 1.0);

        let seen = run_to_end(&mut counter, &manual, &clock);
        assert!(seen.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(*seen.last().unwrap(), 12000);
        assert_eq!(counter.render(&GroupingFormatter::default()), "12,000");
    }

    #[test]
    fn test_second_notification_does_not_restart() {
        let (mut counter, mut port, manual, clock) = setup(CounterSpec::new(117));
        assert!(port.report(ELEMENT, 0.5));
        counter.on_frame(&clock);
        manual.advance(Duration::from_millis(1000));
        counter.on_frame(&clock);
        assert_eq!(counter.display_value(), 109);

        // Element scrolls out and back in
        assert!(!port.report(ELEMENT, 0.0));
        assert!(!port.report(ELEMENT, 1.0));
        manual.advance(Duration::from_millis(16));
        counter.on_frame(&clock);
        assert!(counter.display_value() >= 109);

        let seen = run_to_end(&mut counter, &manual, &clock);
        assert!(seen.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(counter.display_value(), 117);
    }

    #[test]
    fn test_zero_duration_immediate() {
        let (mut counter, mut port, _manual, clock) =
            setup(CounterSpec::new(27).with_duration(Duration::ZERO));
        port.report(ELEMENT, 1.0);

        assert!(!counter.on_frame(&clock));
        assert_eq!(counter.display_value(), 27);
    }

    #[test]
    fn test_zero_end_value() {
        let (mut counter, mut port, manual, clock) = setup(CounterSpec::new(0));
        port.report(ELEMENT, 1.0);
        let seen = run_to_end(&mut counter, &manual, &clock);
        assert!(seen.iter().all(|&v| v == 0));
    }

    #[test]
    fn test_reconfigure_cancels_previous_run() {
        let (mut counter, mut port, manual, clock) = setup(CounterSpec::new(117));
        port.report(ELEMENT, 1.0);
        counter.on_frame(&clock);
        manual.advance(Duration::from_millis(1000));
        counter.on_frame(&clock);
        assert_eq!(counter.display_value(), 109);

        counter.reconfigure(50, Duration::from_millis(1000), &clock);
        assert_eq!(counter.display_value(), 0);
        assert!(counter.is_animating());

        let seen = run_to_end(&mut counter, &manual, &clock);
        assert!(seen.windows(2).all(|w| w[0] <= w[1]));
        assert!(seen.iter().all(|&v| v <= 50));
        assert_eq!(counter.display_value(), 50);
    }

    #[test]
    fn test_reconfigure_before_visibility_waits() {
        let (mut counter, mut port, manual, clock) = setup(CounterSpec::new(117));
        counter.reconfigure(10, Duration::from_millis(100), &clock);
        assert!(!counter.on_frame(&clock));
        assert_eq!(counter.display_value(), 0);

        port.report(ELEMENT, 1.0);
        run_to_end(&mut counter, &manual, &clock);
        assert_eq!(counter.display_value(), 10);
    }

    #[test]
    fn test_teardown_releases_without_visibility() {
        let (mut counter, mut port, _manual, _clock) = setup(CounterSpec::new(117));
        counter.teardown(&mut port);
        assert!(!port.is_observing(ELEMENT));
        assert!(!counter.is_mounted());

        // Second teardown is harmless
        counter.teardown(&mut port);
    }

    #[test]
    fn test_teardown_mid_flight_stops_frames() {
        let (mut counter, mut port, manual, clock) = setup(CounterSpec::new(117));
        port.report(ELEMENT, 1.0);
        assert!(counter.on_frame(&clock));
        manual.advance(Duration::from_millis(500));
        counter.on_frame(&clock);
        let frozen = counter.display_value();

        counter.teardown(&mut port);
        assert!(!port.is_observing(ELEMENT));
        manual.advance(Duration::from_millis(5000));
        assert!(!counter.on_frame(&clock));
        assert_eq!(counter.display_value(), frozen);
    }

    #[test]
    fn test_absent_element_never_animates() {
        let manual = ManualClock::new();
        let clock: Rc<dyn Clock> = Rc::new(manual.clone());
        let mut port = PollingViewport::new();
        let mut counter = Counter::new(CounterSpec::new(117), None);
        counter.mount(&mut port, 0.1);
        assert!(port.is_empty());

        manual.advance(Duration::from_secs(5));
        assert!(!counter.on_frame(&clock));
        assert_eq!(counter.display_value(), 0);
        counter.teardown(&mut port);
    }

    #[test]
    fn test_remount_after_teardown_counts_again() {
        let (mut counter, mut port, manual, clock) =
            setup(CounterSpec::new(27).with_duration(Duration::ZERO));
        port.report(ELEMENT, 1.0);
        assert!(!counter.on_frame(&clock));
        assert_eq!(counter.display_value(), 27);

        counter.teardown(&mut port);
        counter.mount(&mut port, 0.1);
        assert!(port.is_observing(ELEMENT));
        assert!(!counter.is_visible());
        assert_eq!(counter.display_value(), 0);

        // Nothing runs until the new latch fires
        manual.advance(Duration::from_millis(100));
        assert!(!counter.on_frame(&clock));
        assert_eq!(counter.display_value(), 0);

        assert!(port.report(ELEMENT, 1.0));
        counter.on_frame(&clock);
        assert_eq!(counter.display_value(), 27);
    }

    #[test]
    fn test_remount_mid_flight_restarts_from_zero() {
        let (mut counter, mut port, manual, clock) = setup(CounterSpec::new(117));
        port.report(ELEMENT, 1.0);
        counter.on_frame(&clock);
        manual.advance(Duration::from_millis(1000));
        counter.on_frame(&clock);
        assert_eq!(counter.display_value(), 109);

        counter.teardown(&mut port);
        counter.mount(&mut port, 0.1);
        assert!(port.report(ELEMENT, 1.0));
        assert!(counter.on_frame(&clock));
        assert_eq!(counter.display_value(), 0);

        let seen = run_to_end(&mut counter, &manual, &clock);
        assert!(seen.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(counter.display_value(), 117);
    }

    #[test]
    fn test_replay_restarts_after_next_visibility() {
        let (mut counter, mut port, manual, clock) = setup(CounterSpec::new(27));
        port.report(ELEMENT, 1.0);
        run_to_end(&mut counter, &manual, &clock);
        assert_eq!(counter.display_value(), 27);

        counter.replay(&mut port, 0.1);
        assert_eq!(counter.display_value(), 0);
        assert!(!counter.on_frame(&clock));

        assert!(port.report(ELEMENT, 1.0));
        run_to_end(&mut counter, &manual, &clock);
        assert_eq!(counter.display_value(), 27);
    }

    #[test]
    fn test_render_prefix_and_suffix() {
        let (mut counter, mut port, _manual, clock) = setup(
            CounterSpec::new(12000)
                .with_prefix("$")
                .with_suffix("+")
                .with_duration(Duration::ZERO),
        );
        port.report(ELEMENT, 1.0);
        counter.on_frame(&clock);
        assert_eq!(counter.render(&GroupingFormatter::default()), "$12,000+");
    }
}
