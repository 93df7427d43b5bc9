pub mod config;
pub mod counter;
pub mod error;
pub mod stats;

pub use config::{AppConfig, EasingType, StatEntry};
pub use error::{Error, Result};
pub use stats::{StatCard, StatsBoard};
