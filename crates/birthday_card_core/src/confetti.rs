//! crates/birthday_card_core/src/confetti.rs
//!
//! Fire-and-forget confetti bursts.
//!
//! Particles are plain records; a renderer projects [`ConfettiEmitter::frame`]
//! onto whatever surface it owns. Each particle carries its own expiry timer
//! and is dropped as soon as its animation finishes.

use crate::timer::TimerQueue;
use crate::tween::{ease_out_cubic, Tween};
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::time::Duration;

/// Pastel colours a particle may take.
pub const PALETTE: [&str; 6] = [
    "#FFB3C6", "#FFD6A5", "#FDE68A", "#C7F9CC", "#D6E4FF", "#FFB7E6",
];

/// Ranges every burst draws from.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfettiConfig {
    /// Animation length of a single particle, excluding its start delay.
    pub lifetime: Duration,
    pub max_delay: Duration,
    /// Origin x is centred at 50 % and spread by ± half of this.
    pub origin_spread_pct: f32,
    pub origin_top_pct: f32,
    pub origin_top_jitter_pct: f32,
    pub min_size_px: f32,
    pub size_jitter_px: f32,
    /// Horizontal travel is ± half of this.
    pub spread_px: f32,
    pub min_fall_px: f32,
    pub fall_jitter_px: f32,
    /// Rotation is ± half of this.
    pub rotation_deg: f32,
}

impl Default for ConfettiConfig {
    fn default() -> Self {
        Self {
            lifetime: Duration::from_millis(1300),
            max_delay: Duration::from_millis(200),
            origin_spread_pct: 60.0,
            origin_top_pct: 10.0,
            origin_top_jitter_pct: 10.0,
            min_size_px: 6.0,
            size_jitter_px: 8.0,
            spread_px: 350.0,
            min_fall_px: 180.0,
            fall_jitter_px: 160.0,
            rotation_deg: 480.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConfettiParticle {
    pub id: u64,
    pub origin_x_pct: f32,
    pub origin_y_pct: f32,
    pub size_px: f32,
    pub color: &'static str,
    pub dx_px: f32,
    pub dy_px: f32,
    pub rotation_deg: f32,
    pub delay: Duration,
    pub born_at: Duration,
}

/// Where a particle is drawn at a given instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleFrame {
    pub id: u64,
    pub x_px: f32,
    pub y_px: f32,
    pub rotation_deg: f32,
    pub scale: f32,
    pub opacity: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Expire(u64);

pub struct ConfettiEmitter {
    config: ConfettiConfig,
    rng: StdRng,
    next_id: u64,
    particles: Vec<ConfettiParticle>,
    timers: TimerQueue<Expire>,
}

impl ConfettiEmitter {
    pub fn new(config: ConfettiConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Reproducible bursts, mainly for tests.
    pub fn with_seed(config: ConfettiConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: ConfettiConfig, rng: StdRng) -> Self {
        Self {
            config,
            rng,
            next_id: 0,
            particles: Vec::new(),
            timers: TimerQueue::new(),
        }
    }

    /// Replaces any in-flight burst with `count` fresh particles.
    pub fn burst(&mut self, now: Duration, count: usize) {
        self.teardown();
        for _ in 0..count {
            let particle = self.spawn(now);
            self.timers
                .schedule_once(now, particle.delay + self.config.lifetime, Expire(particle.id));
            self.particles.push(particle);
        }
    }

    /// Drops every particle whose animation has finished by `now`.
    pub fn advance(&mut self, now: Duration) {
        while let Some(fired) = self.timers.pop_due(now) {
            let Expire(id) = fired.event;
            self.particles.retain(|p| p.id != id);
        }
    }

    /// Removes all particles and their timers immediately.
    pub fn teardown(&mut self) {
        self.timers.clear();
        self.particles.clear();
    }

    pub fn particles(&self) -> &[ConfettiParticle] {
        &self.particles
    }

    pub fn live_count(&self) -> usize {
        self.particles.len()
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    pub fn frame(&self, now: Duration) -> Vec<ParticleFrame> {
        self.particles
            .iter()
            .map(|p| {
                let start = p.born_at + p.delay;
                let t = Tween::new(start, self.config.lifetime, 0.0, 1.0)
                    .easing(ease_out_cubic)
                    .value_at(now);
                ParticleFrame {
                    id: p.id,
                    x_px: p.dx_px * t,
                    y_px: -10.0 + (p.dy_px + 10.0) * t,
                    rotation_deg: p.rotation_deg * t,
                    scale: 0.6 + 0.4 * t,
                    opacity: t,
                }
            })
            .collect()
    }

    fn spawn(&mut self, now: Duration) -> ConfettiParticle {
        let c = &self.config;
        let rng = &mut self.rng;
        let id = self.next_id;
        self.next_id += 1;

        let max_delay_ms = c.max_delay.as_millis() as u64;
        ConfettiParticle {
            id,
            origin_x_pct: 50.0 + (rng.gen::<f32>() - 0.5) * c.origin_spread_pct,
            origin_y_pct: c.origin_top_pct + rng.gen::<f32>() * c.origin_top_jitter_pct,
            size_px: c.min_size_px + rng.gen::<f32>() * c.size_jitter_px,
            color: PALETTE[rng.gen_range(0..PALETTE.len())],
            dx_px: (rng.gen::<f32>() - 0.5) * c.spread_px,
            dy_px: c.min_fall_px + rng.gen::<f32>() * c.fall_jitter_px,
            rotation_deg: (rng.gen::<f32>() - 0.5) * c.rotation_deg,
            delay: Duration::from_millis(rng.gen_range(0..=max_delay_ms)),
            born_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn burst_returns_to_zero_within_the_window() {
        let mut emitter = ConfettiEmitter::with_seed(ConfettiConfig::default(), 1);
        emitter.burst(ms(0), 16);
        assert_eq!(emitter.live_count(), 16);
        assert_eq!(emitter.pending_timers(), 16);

        emitter.advance(ms(1299));
        assert_eq!(emitter.live_count(), 16);

        emitter.advance(ms(1500));
        assert_eq!(emitter.live_count(), 0);
        assert_eq!(emitter.pending_timers(), 0);
    }

    #[test]
    fn particles_stay_inside_their_ranges() {
        let mut emitter = ConfettiEmitter::with_seed(ConfettiConfig::default(), 42);
        emitter.burst(ms(0), 200);
        for p in emitter.particles() {
            assert!((20.0..=80.0).contains(&p.origin_x_pct));
            assert!((10.0..=20.0).contains(&p.origin_y_pct));
            assert!((6.0..=14.0).contains(&p.size_px));
            assert!((-175.0..=175.0).contains(&p.dx_px));
            assert!((180.0..=340.0).contains(&p.dy_px));
            assert!((-240.0..=240.0).contains(&p.rotation_deg));
            assert!(p.delay <= ms(200));
            assert!(PALETTE.contains(&p.color));
        }
    }

    #[test]
    fn retrigger_mid_burst_replaces_everything() {
        let mut emitter = ConfettiEmitter::with_seed(ConfettiConfig::default(), 3);
        emitter.burst(ms(0), 10);
        emitter.advance(ms(700));
        emitter.burst(ms(700), 4);
        assert_eq!(emitter.live_count(), 4);
        assert_eq!(emitter.pending_timers(), 4);
        assert!(emitter.particles().iter().all(|p| p.born_at == ms(700)));
    }

    #[test]
    fn teardown_leaves_nothing_behind() {
        let mut emitter = ConfettiEmitter::with_seed(ConfettiConfig::default(), 9);
        emitter.burst(ms(0), 16);
        emitter.teardown();
        assert_eq!(emitter.live_count(), 0);
        assert_eq!(emitter.pending_timers(), 0);
        assert!(emitter.frame(ms(100)).is_empty());
    }

    #[test]
    fn frame_moves_particles_toward_their_targets() {
        let mut emitter = ConfettiEmitter::with_seed(ConfettiConfig::default(), 5);
        emitter.burst(ms(0), 1);
        let p = emitter.particles()[0].clone();

        let start = emitter.frame(ms(0))[0];
        assert_eq!(start.opacity, 0.0);
        assert_eq!(start.y_px, -10.0);

        let end = emitter.frame(p.delay + ms(1300))[0];
        assert!((end.x_px - p.dx_px).abs() < 1e-3);
        assert!((end.y_px - p.dy_px).abs() < 1e-3);
        assert!((end.opacity - 1.0).abs() < 1e-6);
    }
}
