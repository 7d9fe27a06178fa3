//! crates/birthday_card_core/src/tween.rs
//!
//! Easing curves and a start-anchored tween.
//!
//! Tweens are evaluated against an absolute `now` rather than ticked, so a
//! projection can be recomputed for any frame without mutating state.

use std::time::Duration;

// ---------------------------------------------------------------------------
// Easing functions
// ---------------------------------------------------------------------------

/// Maps `t` in [0, 1] to an eased output.
pub type EasingFn = fn(f32) -> f32;

#[inline]
pub fn linear(t: f32) -> f32 {
    t.clamp(0.0, 1.0)
}

/// Quadratic ease-out.
#[inline]
pub fn ease_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t) * (1.0 - t)
}

/// Cubic ease-out, slower end than quadratic.
#[inline]
pub fn ease_out_cubic(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t).powi(3)
}

/// Sinusoidal ease-in-out, for gentle looping drifts.
#[inline]
pub fn sine_in_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    -((std::f32::consts::PI * t).cos() - 1.0) / 2.0
}

/// Ease-out with overshoot. Output exceeds 1.0 briefly before settling.
#[inline]
pub fn ease_out_back(t: f32) -> f32 {
    const C1: f32 = 3.0;
    const C3: f32 = C1 + 1.0;
    let t = t.clamp(0.0, 1.0);
    1.0 + C3 * (t - 1.0).powi(3) + C1 * (t - 1.0).powi(2)
}

// ---------------------------------------------------------------------------
// Tween
// ---------------------------------------------------------------------------

/// Interpolates `from → to` over `duration`, beginning at `start`.
#[derive(Debug, Clone, Copy)]
pub struct Tween {
    start: Duration,
    duration: Duration,
    from: f32,
    to: f32,
    easing: EasingFn,
}

impl Tween {
    pub fn new(start: Duration, duration: Duration, from: f32, to: f32) -> Self {
        Self {
            start,
            duration,
            from,
            to,
            easing: linear,
        }
    }

    /// Set the easing function (builder).
    pub fn easing(mut self, easing: EasingFn) -> Self {
        self.easing = easing;
        self
    }

    pub fn end(&self) -> Duration {
        self.start + self.duration
    }

    pub fn is_complete(&self, now: Duration) -> bool {
        now >= self.end()
    }

    /// Raw linear progress (before easing), in [0.0, 1.0].
    pub fn progress(&self, now: Duration) -> f32 {
        if now <= self.start {
            return 0.0;
        }
        if self.duration.is_zero() {
            return 1.0;
        }
        let t = (now - self.start).as_secs_f64() / self.duration.as_secs_f64();
        (t as f32).clamp(0.0, 1.0)
    }

    /// The interpolated value at `now`.
    pub fn value_at(&self, now: Duration) -> f32 {
        let t = (self.easing)(self.progress(now));
        self.from + (self.to - self.from) * t
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-4;

    #[test]
    fn easings_hit_their_endpoints() {
        for f in [linear, ease_out, ease_out_cubic, sine_in_out, ease_out_back] {
            assert!(f(0.0).abs() < EPS);
            assert!((f(1.0) - 1.0).abs() < EPS);
        }
    }

    #[test]
    fn back_easing_overshoots() {
        assert!(ease_out_back(0.6) > 1.0);
    }

    #[test]
    fn tween_is_clamped_outside_its_window() {
        let tw = Tween::new(Duration::from_millis(100), Duration::from_millis(200), 1.03, 1.0);
        assert!((tw.value_at(Duration::ZERO) - 1.03).abs() < EPS);
        assert!((tw.value_at(Duration::from_millis(200)) - 1.015).abs() < EPS);
        assert!((tw.value_at(Duration::from_secs(5)) - 1.0).abs() < EPS);
        assert!(tw.is_complete(Duration::from_millis(300)));
    }

    #[test]
    fn zero_length_tween_jumps_to_target() {
        let tw = Tween::new(Duration::from_millis(10), Duration::ZERO, 0.0, 1.0);
        assert_eq!(tw.value_at(Duration::from_millis(10)), 0.0);
        assert_eq!(tw.value_at(Duration::from_millis(11)), 1.0);
    }
}
