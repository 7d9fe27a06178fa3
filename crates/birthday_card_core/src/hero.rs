//! crates/birthday_card_core/src/hero.rs
//!
//! Ambient motion around the card: the staggered entrance, the idle float of
//! the card front, drifting petals and pointer parallax.
//!
//! None of this gates interaction. Reduced motion settles the entrance at
//! once and skips the petals entirely.

use crate::timer::{TimerId, TimerQueue};
use crate::tween::{ease_out, ease_out_cubic, sine_in_out, Tween};
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::time::Duration;

//=========================================================================================
// Entrance
//=========================================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct EntranceConfig {
    pub root_duration: Duration,
    pub root_from_y_px: f32,
    /// Headline elements revealed one after another.
    pub item_count: usize,
    pub item_from_y_px: f32,
    pub item_duration: Duration,
    pub item_stagger: Duration,
    /// How far before the root finishes the first item starts.
    pub item_overlap: Duration,
    pub float_px: f32,
    /// One leg of the card front's yoyo float.
    pub float_leg: Duration,
}

impl Default for EntranceConfig {
    fn default() -> Self {
        Self {
            root_duration: Duration::from_millis(800),
            root_from_y_px: 16.0,
            item_count: 3,
            item_from_y_px: 14.0,
            item_duration: Duration::from_millis(700),
            item_stagger: Duration::from_millis(80),
            item_overlap: Duration::from_millis(550),
            float_px: -6.0,
            float_leg: Duration::from_secs(6),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reveal {
    pub opacity: f32,
    pub y_px: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EntranceView {
    pub root: Reveal,
    pub items: Vec<Reveal>,
    /// Vertical offset of the card front, added to whatever the card does.
    pub front_float_px: f32,
}

/// The one-time page entrance plus the endless front float.
#[derive(Debug, Clone)]
pub struct Entrance {
    config: EntranceConfig,
    started_at: Option<Duration>,
    animated: bool,
}

impl Entrance {
    pub fn new(config: EntranceConfig) -> Self {
        Self {
            config,
            started_at: None,
            animated: false,
        }
    }

    pub fn start(&mut self, now: Duration, reduced_motion: bool) {
        self.started_at = Some(now);
        self.animated = !reduced_motion;
    }

    pub fn view(&self, now: Duration) -> EntranceView {
        let c = &self.config;
        let Some(start) = self.started_at else {
            let hidden = |from_y_px| Reveal {
                opacity: 0.0,
                y_px: from_y_px,
            };
            return EntranceView {
                root: hidden(c.root_from_y_px),
                items: vec![hidden(c.item_from_y_px); c.item_count],
                front_float_px: 0.0,
            };
        };
        if !self.animated {
            let shown = Reveal {
                opacity: 1.0,
                y_px: 0.0,
            };
            return EntranceView {
                root: shown,
                items: vec![shown; c.item_count],
                front_float_px: 0.0,
            };
        }

        let reveal = |at: Duration, length: Duration, from_y_px: f32| {
            let t = Tween::new(at, length, 0.0, 1.0)
                .easing(ease_out_cubic)
                .value_at(now);
            Reveal {
                opacity: t,
                y_px: from_y_px * (1.0 - t),
            }
        };
        let first_item = start + c.root_duration.saturating_sub(c.item_overlap);
        EntranceView {
            root: reveal(start, c.root_duration, c.root_from_y_px),
            items: (0..c.item_count)
                .map(|i| {
                    let at = first_item + c.item_stagger * i as u32;
                    reveal(at, c.item_duration, c.item_from_y_px)
                })
                .collect(),
            front_float_px: c.float_px * self.float_phase(now.saturating_sub(start)),
        }
    }

    /// 0 → 1 → 0 ... with one leg per `float_leg`, eased at both ends.
    fn float_phase(&self, elapsed: Duration) -> f32 {
        let leg = self.config.float_leg.as_secs_f64();
        if leg <= 0.0 {
            return 0.0;
        }
        let legs = elapsed.as_secs_f64() / leg;
        let frac = legs.fract() as f32;
        let t = if (legs as u64) % 2 == 0 { frac } else { 1.0 - frac };
        sine_in_out(t)
    }
}

//=========================================================================================
// Petals
//=========================================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct PetalConfig {
    pub count: usize,
    pub min_size_px: f32,
    pub size_jitter_px: f32,
    pub min_left_pct: f32,
    pub left_spread_pct: f32,
    pub min_top_pct: f32,
    pub top_spread_pct: f32,
    pub min_opacity: f32,
    pub opacity_jitter: f32,
    pub min_drop_px: f32,
    pub drop_jitter_px: f32,
    /// Horizontal drift is ± half of this.
    pub drift_px: f32,
    pub max_rotation_deg: f32,
    pub min_duration: Duration,
    pub duration_jitter: Duration,
    pub stagger: Duration,
}

impl Default for PetalConfig {
    fn default() -> Self {
        Self {
            count: 8,
            min_size_px: 14.0,
            size_jitter_px: 16.0,
            min_left_pct: 10.0,
            left_spread_pct: 80.0,
            min_top_pct: 8.0,
            top_spread_pct: 28.0,
            min_opacity: 0.28,
            opacity_jitter: 0.6,
            min_drop_px: 26.0,
            drop_jitter_px: 24.0,
            drift_px: 28.0,
            max_rotation_deg: 360.0,
            min_duration: Duration::from_secs(6),
            duration_jitter: Duration::from_secs(8),
            stagger: Duration::from_millis(200),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Petal {
    pub id: usize,
    pub size_px: f32,
    pub left_pct: f32,
    pub top_pct: f32,
    pub opacity: f32,
    pub dx_px: f32,
    pub dy_px: f32,
    pub rotation_deg: f32,
    /// Offset of this petal's drift inside one loop.
    pub offset: Duration,
    pub duration: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PetalFrame {
    pub id: usize,
    pub x_px: f32,
    pub y_px: f32,
    pub rotation_deg: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Restart;

/// Decorative petals drifting on one shared loop. Every loop replays the
/// same drifts from the petals' resting places.
pub struct PetalField {
    config: PetalConfig,
    rng: StdRng,
    petals: Vec<Petal>,
    loop_start: Duration,
    loop_timer: Option<TimerId>,
    timers: TimerQueue<Restart>,
}

impl PetalField {
    pub fn new(config: PetalConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }

    pub fn with_seed(config: PetalConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: PetalConfig, rng: StdRng) -> Self {
        Self {
            config,
            rng,
            petals: Vec::new(),
            loop_start: Duration::ZERO,
            loop_timer: None,
            timers: TimerQueue::new(),
        }
    }

    /// Scatters a fresh set of petals and starts their loop.
    pub fn mount(&mut self, now: Duration) {
        self.teardown();
        let petals: Vec<Petal> = (0..self.config.count).map(|i| self.spawn(i)).collect();
        self.petals = petals;
        self.loop_start = now;
        let period = self.loop_length();
        if !period.is_zero() {
            self.loop_timer = Some(self.timers.schedule_every(now, period, Restart));
        }
    }

    pub fn advance(&mut self, now: Duration) {
        while let Some(fired) = self.timers.pop_due(now) {
            self.loop_start = fired.at;
        }
    }

    /// Removes every petal and stops the loop.
    pub fn teardown(&mut self) {
        if let Some(id) = self.loop_timer.take() {
            self.timers.cancel(id);
        }
        self.timers.clear();
        self.petals.clear();
    }

    pub fn petals(&self) -> &[Petal] {
        &self.petals
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// The longest drift, which is when the loop starts over.
    pub fn loop_length(&self) -> Duration {
        self.petals
            .iter()
            .map(|p| p.offset + p.duration)
            .max()
            .unwrap_or(Duration::ZERO)
    }

    pub fn frame(&self, now: Duration) -> Vec<PetalFrame> {
        self.petals
            .iter()
            .map(|p| {
                let t = Tween::new(self.loop_start + p.offset, p.duration, 0.0, 1.0)
                    .easing(ease_out)
                    .value_at(now);
                PetalFrame {
                    id: p.id,
                    x_px: p.dx_px * t,
                    y_px: p.dy_px * t,
                    rotation_deg: p.rotation_deg * t,
                }
            })
            .collect()
    }

    fn spawn(&mut self, id: usize) -> Petal {
        let c = &self.config;
        let rng = &mut self.rng;
        let jitter_ms = c.duration_jitter.as_millis() as u64;
        Petal {
            id,
            size_px: (c.min_size_px + rng.gen::<f32>() * c.size_jitter_px).round(),
            left_pct: c.min_left_pct + rng.gen::<f32>() * c.left_spread_pct,
            top_pct: c.min_top_pct + rng.gen::<f32>() * c.top_spread_pct,
            opacity: c.min_opacity + rng.gen::<f32>() * c.opacity_jitter,
            dx_px: (rng.gen::<f32>() - 0.5) * c.drift_px,
            dy_px: c.min_drop_px + rng.gen::<f32>() * c.drop_jitter_px,
            rotation_deg: rng.gen::<f32>() * c.max_rotation_deg,
            offset: c.stagger * id as u32,
            duration: c.min_duration + Duration::from_millis(rng.gen_range(0..=jitter_ms)),
        }
    }
}

//=========================================================================================
// Parallax
//=========================================================================================

/// The page's on-screen box, in the same coordinates as pointer events.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Tilt {
    pub rx_deg: f32,
    pub ry_deg: f32,
}

/// Tilts the page toward the pointer. Each move retargets from wherever the
/// tilt currently is.
#[derive(Debug, Clone)]
pub struct Parallax {
    max_deg: f32,
    duration: Duration,
    rx: Tween,
    ry: Tween,
}

impl Default for Parallax {
    fn default() -> Self {
        Self::new(6.0, Duration::from_millis(800))
    }
}

impl Parallax {
    pub fn new(max_deg: f32, duration: Duration) -> Self {
        let rest = Tween::new(Duration::ZERO, Duration::ZERO, 0.0, 0.0);
        Self {
            max_deg,
            duration,
            rx: rest,
            ry: rest,
        }
    }

    /// A pointer moved to (`x`, `y`). Ignored for a degenerate box.
    pub fn pointer_move(&mut self, now: Duration, x: f32, y: f32, bounds: Bounds) {
        if bounds.width <= 0.0 || bounds.height <= 0.0 {
            return;
        }
        let cx = bounds.left + bounds.width / 2.0;
        let cy = bounds.top + bounds.height / 2.0;
        let target_rx = (x - cx) / bounds.width * self.max_deg;
        let target_ry = (y - cy) / bounds.height * self.max_deg;

        let current = self.tilt(now);
        self.rx = Tween::new(now, self.duration, current.rx_deg, target_rx).easing(ease_out);
        self.ry = Tween::new(now, self.duration, current.ry_deg, target_ry).easing(ease_out);
    }

    pub fn tilt(&self, now: Duration) -> Tilt {
        Tilt {
            rx_deg: self.rx.value_at(now),
            ry_deg: self.ry.value_at(now),
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
    fn entrance_staggers_items_after_the_root() {
        let mut e = Entrance::new(EntranceConfig::default());
        assert_eq!(e.view(ms(0)).root.opacity, 0.0);

        e.start(ms(0), false);
        let early = e.view(ms(250));
        assert!(early.root.opacity > 0.0 && early.root.opacity < 1.0);
        assert_eq!(early.items[0].opacity, 0.0);
        assert!((early.items[0].y_px - 14.0).abs() < 1e-6);

        let mid = e.view(ms(400));
        assert!(mid.items[0].opacity > mid.items[1].opacity);
        assert!(mid.items[1].opacity > mid.items[2].opacity);

        let done = e.view(ms(1200));
        assert!((done.root.opacity - 1.0).abs() < 1e-6);
        assert!(done.items.iter().all(|r| (r.opacity - 1.0).abs() < 1e-6 && r.y_px.abs() < 1e-4));
    }

    #[test]
    fn front_floats_up_and_back() {
        let mut e = Entrance::new(EntranceConfig::default());
        e.start(ms(0), false);
        assert!(e.view(ms(0)).front_float_px.abs() < 1e-6);
        assert!((e.view(ms(6000)).front_float_px + 6.0).abs() < 1e-3);
        assert!((e.view(ms(3000)).front_float_px + 3.0).abs() < 1e-3);
        assert!(e.view(ms(12_000)).front_float_px.abs() < 1e-3);
    }

    #[test]
    fn reduced_motion_entrance_is_settled_and_still() {
        let mut e = Entrance::new(EntranceConfig::default());
        e.start(ms(0), true);
        let v = e.view(ms(0));
        assert_eq!(v.root.opacity, 1.0);
        assert!(v.items.iter().all(|r| r.opacity == 1.0));
        assert_eq!(e.view(ms(6000)).front_float_px, 0.0);
    }

    #[test]
    fn petals_land_inside_their_ranges() {
        let mut field = PetalField::with_seed(PetalConfig::default(), 4);
        field.mount(ms(0));
        assert_eq!(field.petals().len(), 8);
        for p in field.petals() {
            assert!((14.0..=30.0).contains(&p.size_px));
            assert!((10.0..=90.0).contains(&p.left_pct));
            assert!((8.0..=36.0).contains(&p.top_pct));
            assert!((0.28..=0.88).contains(&p.opacity));
            assert!((-14.0..=14.0).contains(&p.dx_px));
            assert!((26.0..=50.0).contains(&p.dy_px));
            assert!(p.duration >= ms(6000) && p.duration <= ms(14_000));
            assert_eq!(p.offset, ms(200) * p.id as u32);
        }
    }

    #[test]
    fn petal_loop_replays_from_rest() {
        let mut field = PetalField::with_seed(PetalConfig::default(), 8);
        field.mount(ms(0));
        let period = field.loop_length();
        assert_eq!(field.pending_timers(), 1);

        let before = field.frame(period - ms(1));
        assert!(before.iter().any(|f| f.y_px > 0.0));

        field.advance(period);
        let restarted = field.frame(period);
        assert!(restarted.iter().all(|f| f.y_px == 0.0 && f.x_px == 0.0));
        assert_eq!(field.pending_timers(), 1);
    }

    #[test]
    fn petal_teardown_removes_everything() {
        let mut field = PetalField::with_seed(PetalConfig::default(), 1);
        field.mount(ms(0));
        field.teardown();
        assert!(field.petals().is_empty());
        assert_eq!(field.pending_timers(), 0);
        assert!(field.frame(ms(500)).is_empty());
    }

    #[test]
    fn parallax_eases_toward_the_pointer() {
        let bounds = Bounds {
            left: 0.0,
            top: 0.0,
            width: 200.0,
            height: 100.0,
        };
        let mut p = Parallax::default();
        p.pointer_move(ms(0), 200.0, 0.0, bounds);

        let mid = p.tilt(ms(400));
        assert!(mid.rx_deg > 0.0 && mid.rx_deg < 3.0);
        let end = p.tilt(ms(800));
        assert!((end.rx_deg - 3.0).abs() < 1e-5);
        assert!((end.ry_deg + 3.0).abs() < 1e-5);
    }

    #[test]
    fn parallax_retargets_from_the_current_tilt() {
        let bounds = Bounds {
            left: 0.0,
            top: 0.0,
            width: 100.0,
            height: 100.0,
        };
        let mut p = Parallax::default();
        p.pointer_move(ms(0), 100.0, 50.0, bounds);
        let at_switch = p.tilt(ms(400));

        p.pointer_move(ms(400), 50.0, 50.0, bounds);
        assert!((p.tilt(ms(400)).rx_deg - at_switch.rx_deg).abs() < 1e-6);
        assert!(p.tilt(ms(1200)).rx_deg.abs() < 1e-5);

        p.pointer_move(ms(1300), 10.0, 10.0, Bounds { width: 0.0, ..bounds });
        assert!(p.tilt(ms(5000)).rx_deg.abs() < 1e-5);
    }
}
