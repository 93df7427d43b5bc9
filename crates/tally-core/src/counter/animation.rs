//! Count-up animation loop
//!
//! Combines the clock, timing and easing atoms into one self-rescheduling run:
//! each [`AnimationLoop::tick`] samples the clock, commits a new display value
//! when it changed, and reports whether another frame is needed.

use std::rc::Rc;
use std::time::Duration;

use super::cancel::CancelToken;
use super::clock::Clock;
use super::easing::EasingType;
use super::timing::{progress, scaled_value};

/// Parameters of one count-up run, fixed once the run starts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnimationRequest {
    /// Value displayed when the run completes
    pub end_value: u64,
    /// Total run time
    pub duration: Duration,
    /// Clock reading when the run started
    pub start_time: Duration,
}

/// What the owner should do after a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Progress is below 1; schedule another frame
    Pending,
    /// The end value was reached; no further frames
    Complete,
    /// The run was invalidated through its token; no further frames
    Cancelled,
}

impl TickOutcome {
    #[inline]
    pub fn needs_frame(self) -> bool {
        matches!(self, TickOutcome::Pending)
    }
}

/// Result of a single tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickReport {
    /// Newly committed display value, if it changed this tick
    pub committed: Option<u64>,
    pub outcome: TickOutcome,
}

/// One count-up run from zero to `end_value`
///
/// The loop exclusively owns the display value and the last committed value.
/// Once complete or cancelled it never commits again.
pub struct AnimationLoop {
    request: AnimationRequest,
    easing: EasingType,
    clock: Rc<dyn Clock>,
    token: CancelToken,
    /// Last committed display value
    value: u64,
    /// Number of commits since start
    commits: usize,
    state: TickOutcome,
}

impl std::fmt::Debug for AnimationLoop {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnimationLoop")
            .field("request", &self.request)
            .field("easing", &self.easing)
            .field("value", &self.value)
            .field("commits", &self.commits)
            .field("state", &self.state)
            .finish()
    }
}

impl AnimationLoop {
    /// Start a run now, as read from `clock`
    pub fn start(
        end_value: u64,
        duration: Duration,
        easing: EasingType,
        clock: Rc<dyn Clock>,
        token: CancelToken,
    ) -> Self {
        let request = AnimationRequest {
            end_value,
            duration,
            start_time: clock.now(),
        };
        tracing::debug!(
            end_value,
            duration_ms = duration.as_millis() as u64,
            "Starting count-up"
        );
        Self {
            request,
            easing,
            clock,
            token,
            value: 0,
            commits: 0,
            state: TickOutcome::Pending,
        }
    }

    pub fn request(&self) -> &AnimationRequest {
        &self.request
    }

    /// Currently displayed value
    #[inline]
    pub fn value(&self) -> u64 {
        self.value
    }

    /// Number of display updates committed so far
    pub fn commits(&self) -> usize {
        self.commits
    }

    /// Whether another frame should be scheduled
    #[inline]
    pub fn is_pending(&self) -> bool {
        self.state == TickOutcome::Pending && !self.token.is_cancelled()
    }

    /// Advance the run to the clock's current time
    pub fn tick(&mut self) -> TickReport {
        if self.state != TickOutcome::Pending {
            return TickReport {
                committed: None,
                outcome: self.state,
            };
        }
        if self.token.is_cancelled() {
            tracing::debug!(value = self.value, "Count-up cancelled");
            self.state = TickOutcome::Cancelled;
            return TickReport {
                committed: None,
                outcome: self.state,
            };
        }

        let elapsed = self.clock.now().saturating_sub(self.request.start_time);
        let t = progress(elapsed, self.request.duration);
        let candidate = if t >= 1.0 {
            self.request.end_value
        } else {
            scaled_value(self.request.end_value, self.easing.apply(t))
        };

        // Skip redundant updates when rounding lands on the same integer
        let committed = if candidate != self.value {
            self.value = candidate;
            self.commits += 1;
            tracing::trace!(value = candidate, progress = t, "Committed display value");
            Some(candidate)
        } else {
            None
        };

        if t >= 1.0 {
            self.state = TickOutcome::Complete;
            tracing::debug!(
                value = self.value,
                commits = self.commits,
                "Count-up complete"
            );
        }

        TickReport {
            committed,
            outcome: self.state,
        }
    }
}
