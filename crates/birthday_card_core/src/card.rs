//! crates/birthday_card_core/src/card.rs
//!
//! The one-shot "open the card" choreography.
//!
//! `Closed → Opening → Open`. The first `open` wins; later calls are ignored.
//! Opening fires the confetti burst and a best-effort audio start in both the
//! animated and the reduced-motion branch.

use crate::confetti::{ConfettiConfig, ConfettiEmitter, ParticleFrame};
use crate::domain::CardOpenState;
use crate::ports::{AudioTrack, FocusTarget, MotionPreference};
use crate::timer::TimerQueue;
use crate::tween::{ease_out_back, ease_out_cubic, Tween};
use crate::typewriter::{Typewriter, TypingPace};
use std::rc::Rc;
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Clone, PartialEq)]
pub struct CardConfig {
    pub flap_duration: Duration,
    pub flap_angle_deg: f32,
    pub flap_lift_px: f32,
    /// How long before the flap finishes the inner reveal starts.
    pub reveal_overlap: Duration,
    pub reveal_duration: Duration,
    pub reveal_from_y_px: f32,
    pub reveal_from_scale: f32,
    pub front_dim_opacity: f32,
    pub front_dim_duration: Duration,
    /// Gap between the last tween ending and the focus shift.
    pub focus_delay: Duration,
    pub confetti_count: usize,
    pub confetti_window: Duration,
    /// Decorative hearts on the front that pop in when the card opens.
    pub heart_count: usize,
    pub heart_pop: Duration,
    pub heart_stagger: Duration,
    pub heart_from_scale: f32,
    pub greeting: String,
    pub greeting_pace: TypingPace,
}

impl Default for CardConfig {
    fn default() -> Self {
        Self {
            flap_duration: Duration::from_millis(800),
            flap_angle_deg: -150.0,
            flap_lift_px: -8.0,
            reveal_overlap: Duration::from_millis(300),
            reveal_duration: Duration::from_millis(700),
            reveal_from_y_px: 18.0,
            reveal_from_scale: 0.994,
            front_dim_opacity: 0.95,
            front_dim_duration: Duration::from_millis(800),
            focus_delay: Duration::from_millis(60),
            confetti_count: 16,
            confetti_window: Duration::from_millis(1500),
            heart_count: 1,
            heart_pop: Duration::from_millis(450),
            heart_stagger: Duration::from_millis(60),
            heart_from_scale: 0.2,
            greeting: "Happy birthday! Even though we're far, I'm right there in the memories."
                .to_string(),
            greeting_pace: TypingPace::greeting(),
        }
    }
}

impl CardConfig {
    pub fn reveal_start(&self) -> Duration {
        self.flap_duration.saturating_sub(self.reveal_overlap)
    }

    /// When the last tween of the animated sequence ends, relative to `open`.
    pub fn sequence_end(&self) -> Duration {
        let start = self.reveal_start();
        self.flap_duration
            .max(start + self.reveal_duration)
            .max(start + self.front_dim_duration)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CardEvent {
    Settled,
    ConfettiReset,
}

/// How one face of the card should be drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaceVisual {
    pub opacity: f32,
    pub rotate_x_deg: f32,
    pub translate_y_px: f32,
    pub scale: f32,
    pub visible: bool,
    pub interactive: bool,
}

/// One popping heart. Scale overshoots 1.0 briefly on the way in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeartVisual {
    pub scale: f32,
    pub opacity: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CardView<'a> {
    pub state: CardOpenState,
    pub front: FaceVisual,
    pub inner: FaceVisual,
    pub hearts: Vec<HeartVisual>,
    pub greeting: &'a str,
    pub status: &'static str,
    pub confetti: Vec<ParticleFrame>,
    pub backdrop: bool,
}

pub struct CardChoreographer {
    config: CardConfig,
    motion: Rc<dyn MotionPreference>,
    audio: Rc<dyn AudioTrack>,
    focus: Rc<dyn FocusTarget>,
    state: CardOpenState,
    opened_at: Option<Duration>,
    animated: bool,
    confetti_active: bool,
    confetti: ConfettiEmitter,
    greeting: Typewriter,
    timers: TimerQueue<CardEvent>,
}

impl CardChoreographer {
    pub fn new(
        config: CardConfig,
        motion: Rc<dyn MotionPreference>,
        audio: Rc<dyn AudioTrack>,
        focus: Rc<dyn FocusTarget>,
    ) -> Self {
        Self::with_confetti(
            config,
            motion,
            audio,
            focus,
            ConfettiEmitter::new(ConfettiConfig::default()),
        )
    }

    pub fn with_confetti(
        config: CardConfig,
        motion: Rc<dyn MotionPreference>,
        audio: Rc<dyn AudioTrack>,
        focus: Rc<dyn FocusTarget>,
        confetti: ConfettiEmitter,
    ) -> Self {
        let greeting = Typewriter::new(config.greeting_pace);
        Self {
            config,
            motion,
            audio,
            focus,
            state: CardOpenState::Closed,
            opened_at: None,
            animated: false,
            confetti_active: false,
            confetti,
            greeting,
            timers: TimerQueue::new(),
        }
    }

    /// Opens the card. Returns `false` (and does nothing) unless it was closed.
    pub fn open(&mut self, now: Duration) -> bool {
        if self.state != CardOpenState::Closed {
            return false;
        }
        self.state = CardOpenState::Opening;
        self.opened_at = Some(now);

        if self.motion.prefers_reduced_motion() {
            self.animated = false;
            self.finish();
        } else {
            self.animated = true;
            let settle_after = self.config.sequence_end() + self.config.focus_delay;
            self.timers.schedule_once(now, settle_after, CardEvent::Settled);
        }

        self.fire_confetti(now);
        self.try_play_audio();
        self.greeting.start(now, &self.config.greeting);
        true
    }

    /// Runs everything due at or before `now`.
    pub fn advance(&mut self, now: Duration) {
        while let Some(fired) = self.timers.pop_due(now) {
            self.greeting.advance(fired.at);
            self.confetti.advance(fired.at);
            match fired.event {
                CardEvent::Settled => self.finish(),
                CardEvent::ConfettiReset => self.confetti_active = false,
            }
        }
        self.greeting.advance(now);
        self.confetti.advance(now);
    }

    /// Cancels every outstanding timer and drops live confetti.
    pub fn teardown(&mut self) {
        self.timers.clear();
        self.confetti.teardown();
        self.greeting.cancel();
        self.confetti_active = false;
    }

    pub fn state(&self) -> CardOpenState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state != CardOpenState::Closed
    }

    pub fn confetti_active(&self) -> bool {
        self.confetti_active
    }

    pub fn confetti(&self) -> &ConfettiEmitter {
        &self.confetti
    }

    pub fn greeting(&self) -> &str {
        self.greeting.text()
    }

    pub fn greeting_done(&self) -> bool {
        self.is_open() && self.greeting.is_done()
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len() + self.confetti.pending_timers() + self.greeting.pending_timers()
    }

    pub fn view(&self, now: Duration) -> CardView<'_> {
        CardView {
            state: self.state,
            front: self.front_visual(now),
            inner: self.inner_visual(now),
            hearts: self.heart_visuals(now),
            greeting: self.greeting.text(),
            status: if self.greeting_done() {
                "Sent with love"
            } else {
                "Reading..."
            },
            confetti: self.confetti.frame(now),
            backdrop: self.is_open(),
        }
    }

    fn finish(&mut self) {
        self.state = CardOpenState::Open;
        if !self.focus.focus_first_interactive() {
            debug!("No interactive element to focus inside the opened card");
        }
    }

    fn fire_confetti(&mut self, now: Duration) {
        self.confetti_active = true;
        self.confetti.burst(now, self.config.confetti_count);
        self.timers
            .schedule_once(now, self.config.confetti_window, CardEvent::ConfettiReset);
    }

    /// Best effort only; a rejected start leaves the music control in charge.
    fn try_play_audio(&self) {
        self.audio.seek(Duration::ZERO);
        if let Err(e) = self.audio.play() {
            debug!("Card audio did not start: {}", e);
        }
    }

    fn front_visual(&self, now: Duration) -> FaceVisual {
        let closed = FaceVisual {
            opacity: 1.0,
            rotate_x_deg: 0.0,
            translate_y_px: 0.0,
            scale: 1.0,
            visible: true,
            interactive: true,
        };
        let Some(opened_at) = self.opened_at else {
            return closed;
        };
        if !self.animated {
            return FaceVisual {
                visible: false,
                interactive: false,
                ..closed
            };
        }

        let c = &self.config;
        let flap = Tween::new(opened_at, c.flap_duration, 0.0, 1.0)
            .easing(ease_out_cubic)
            .value_at(now);
        let dim = Tween::new(
            opened_at + c.reveal_start(),
            c.front_dim_duration,
            1.0,
            c.front_dim_opacity,
        )
        .easing(ease_out_cubic)
        .value_at(now);
        FaceVisual {
            opacity: dim,
            rotate_x_deg: c.flap_angle_deg * flap,
            translate_y_px: c.flap_lift_px * flap,
            interactive: false,
            ..closed
        }
    }

    /// Hearts only pop in the animated branch; otherwise they stay hidden.
    fn heart_visuals(&self, now: Duration) -> Vec<HeartVisual> {
        let c = &self.config;
        (0..c.heart_count)
            .map(|i| {
                let opened_at = match self.opened_at {
                    Some(at) if self.animated => at,
                    _ => {
                        return HeartVisual {
                            scale: c.heart_from_scale,
                            opacity: 0.0,
                        }
                    }
                };
                let start = opened_at + c.heart_stagger * i as u32;
                let t = Tween::new(start, c.heart_pop, 0.0, 1.0)
                    .easing(ease_out_back)
                    .value_at(now);
                HeartVisual {
                    scale: c.heart_from_scale + (1.0 - c.heart_from_scale) * t,
                    opacity: t.clamp(0.0, 1.0),
                }
            })
            .collect()
    }

    fn inner_visual(&self, now: Duration) -> FaceVisual {
        let hidden = FaceVisual {
            opacity: 0.0,
            rotate_x_deg: 0.0,
            translate_y_px: self.config.reveal_from_y_px,
            scale: self.config.reveal_from_scale,
            visible: false,
            interactive: false,
        };
        let Some(opened_at) = self.opened_at else {
            return hidden;
        };
        if !self.animated {
            return FaceVisual {
                opacity: 1.0,
                translate_y_px: 0.0,
                scale: 1.0,
                visible: true,
                interactive: true,
                ..hidden
            };
        }

        let c = &self.config;
        let t = Tween::new(opened_at + c.reveal_start(), c.reveal_duration, 0.0, 1.0)
            .easing(ease_out_cubic)
            .value_at(now);
        FaceVisual {
            opacity: t,
            translate_y_px: c.reveal_from_y_px * (1.0 - t),
            scale: c.reveal_from_scale + (1.0 - c.reveal_from_scale) * t,
            visible: true,
            interactive: true,
            ..hidden
        }
    }
}
