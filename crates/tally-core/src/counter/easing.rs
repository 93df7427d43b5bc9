//! Pure easing functions for count-up animations
//!
//! Every curve maps progress in [0, 1] to eased progress in [0, 1] and is an
//! ease-out: strictly increasing, concave, `f(0) = 0` and `f(1) = 1`.

pub use crate::config::EasingType;

impl EasingType {
    /// Apply the easing function to a progress value
    ///
    /// # Arguments
    /// * `t` - Progress value, clamped to [0, 1]
    ///
    /// # Returns
    /// Eased value in range [0, 1]
    #[inline]
    pub fn apply(&self, t: f64) -> f64 {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        match self {
            EasingType::Cubic => ease_out_pow(t, 3),
            EasingType::Quartic => ease_out_quart(t),
            EasingType::Quintic => ease_out_pow(t, 5),
        }
    }
}

/// Quartic ease-out: f(t) = 1 - (1-t)⁴
#[inline]
pub fn ease_out_quart(t: f64) -> f64 {
    ease_out_pow(t, 4)
}

#[inline]
fn ease_out_pow(t: f64, exp: i32) -> f64 {
    1.0 - (1.0 - t).powi(exp)
}
