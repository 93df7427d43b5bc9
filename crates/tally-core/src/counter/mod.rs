//! Visibility-triggered count-up engine
//!
//! # Layers
//!
//! ## Atoms
//! - `easing` - Pure ease-out curves
//! - `timing` - Progress and value scaling
//! - `clock` - Injectable monotonic clocks
//! - `cancel` - Loop invalidation token
//! - `visibility` - Write-once latch and the viewport port
//! - `format` - Number rendering
//!
//! ## Molecules
//! - `animation` - The per-frame count-up loop
//! - `binding` - Counter tying an element, a port and a loop together
//!
//! # Usage
//!
//! ```ignore
//! use std::rc::Rc;
//! use tally_core::counter::*;
//!
//! let clock: Rc<dyn Clock> = Rc::new(SystemClock::new());
//! let mut port = PollingViewport::new();
//! let mut counter = Counter::new(CounterSpec::new(117).with_suffix("+"), Some(ElementId(0)));
//! counter.mount(&mut port, 0.1);
//!
//! // Each frame: report bounds, then advance
//! port.report(ElementId(0), visible_fraction);
//! let needs_frame = counter.on_frame(&clock);
//! let text = counter.render(&GroupingFormatter::default());
//! ```

pub mod cancel;
pub mod clock;
pub mod easing;
pub mod format;
pub mod timing;
pub mod visibility;

pub mod animation;
pub mod binding;

pub use animation::{AnimationLoop, AnimationRequest, TickOutcome, TickReport};
pub use binding::{Counter, CounterSpec};
pub use cancel::CancelToken;
pub use clock::{Clock, ManualClock, SystemClock};
pub use easing::{ease_out_quart, EasingType};
pub use format::{GroupingFormatter, NumberFormatter};
pub use visibility::{ElementId, PollingViewport, ViewportVisibilityPort, VisibilityLatch};
