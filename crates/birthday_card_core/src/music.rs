//! crates/birthday_card_core/src/music.rs
//!
//! The "our little tune" player: play/pause with volume fades, mute and
//! click-to-seek.

use crate::ports::{AudioTrack, MotionPreference};
use crate::timer::{TimerId, TimerQueue};
use crate::tween::{ease_out, Tween};
use std::rc::Rc;
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    Stopped,
    FadingIn,
    Playing,
    FadingOut,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MusicConfig {
    pub fade_in: Duration,
    pub fade_out: Duration,
    /// Replaces both fades when motion is reduced.
    pub reduced_fade: Duration,
}

impl Default for MusicConfig {
    fn default() -> Self {
        Self {
            fade_in: Duration::from_millis(1100),
            fade_out: Duration::from_millis(500),
            reduced_fade: Duration::from_millis(80),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MusicEvent {
    FadedIn,
    FadedOut,
}

#[derive(Debug, Clone, Copy)]
struct VolumeFade {
    tween: Tween,
    timer: TimerId,
}

pub struct MusicPlayer {
    config: MusicConfig,
    audio: Rc<dyn AudioTrack>,
    motion: Rc<dyn MotionPreference>,
    state: PlaybackState,
    fade: Option<VolumeFade>,
    progress: f32,
    timers: TimerQueue<MusicEvent>,
}

impl MusicPlayer {
    pub fn new(config: MusicConfig, audio: Rc<dyn AudioTrack>, motion: Rc<dyn MotionPreference>) -> Self {
        Self {
            config,
            audio,
            motion,
            state: PlaybackState::Stopped,
            fade: None,
            progress: 0.0,
            timers: TimerQueue::new(),
        }
    }

    /// Starts playback with a fade-in, or fades out and rewinds.
    pub fn toggle(&mut self, now: Duration) {
        self.cancel_fade();
        match self.state {
            PlaybackState::Stopped | PlaybackState::FadingOut => self.fade_in(now),
            PlaybackState::FadingIn | PlaybackState::Playing => self.fade_out(now),
        }
    }

    pub fn toggle_mute(&mut self) {
        let muted = !self.audio.is_muted();
        self.audio.set_muted(muted);
    }

    /// Jumps to `fraction` of the track (clamped to [0, 1]).
    pub fn seek(&mut self, fraction: f32) {
        let pos = if fraction.is_nan() { 0.0 } else { fraction.clamp(0.0, 1.0) };
        let total = self.audio.duration().unwrap_or(Duration::ZERO);
        self.audio.seek(total.mul_f32(pos));
        self.progress = pos * 100.0;
    }

    /// Seek from a click at `x` on a bar starting at `left` and `width` wide.
    pub fn seek_to_click(&mut self, x: f32, left: f32, width: f32) {
        if width <= 0.0 {
            return;
        }
        self.seek((x - left) / width);
    }

    /// Refreshes progress from the track's clock. Ignored until the duration is known.
    pub fn on_time_update(&mut self) {
        let Some(total) = self.audio.duration().filter(|d| !d.is_zero()) else {
            return;
        };
        let ratio = self.audio.position().as_secs_f64() / total.as_secs_f64().max(0.0001);
        self.progress = (ratio * 100.0).clamp(0.0, 100.0) as f32;
    }

    /// The track reached its end on its own.
    pub fn on_ended(&mut self) {
        self.cancel_fade();
        self.state = PlaybackState::Stopped;
    }

    /// Applies the current fade volume and runs due timers.
    pub fn advance(&mut self, now: Duration) {
        while let Some(fired) = self.timers.pop_due(now) {
            if let Some(fade) = self.fade.take() {
                self.audio.set_volume(fade.tween.value_at(fired.at));
            }
            match fired.event {
                MusicEvent::FadedIn => self.state = PlaybackState::Playing,
                MusicEvent::FadedOut => {
                    self.audio.pause();
                    self.audio.seek(Duration::ZERO);
                    self.progress = 0.0;
                    self.state = PlaybackState::Stopped;
                }
            }
        }
        if let Some(fade) = self.fade {
            self.audio.set_volume(fade.tween.value_at(now));
        }
    }

    pub fn teardown(&mut self) {
        self.cancel_fade();
        self.timers.clear();
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Whether the control should show "Pause".
    pub fn is_playing(&self) -> bool {
        self.state != PlaybackState::Stopped
    }

    pub fn is_muted(&self) -> bool {
        self.audio.is_muted()
    }

    /// Progress in percent.
    pub fn progress(&self) -> f32 {
        self.progress
    }

    pub fn play_label(&self) -> &'static str {
        if self.is_playing() {
            "Pause"
        } else {
            "Play"
        }
    }

    pub fn mute_label(&self) -> &'static str {
        if self.is_muted() {
            "Muted"
        } else {
            "Sound"
        }
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    fn fade_in(&mut self, now: Duration) {
        let from = if self.state == PlaybackState::Stopped {
            self.audio.set_volume(0.0);
            0.0
        } else {
            self.audio.volume()
        };
        if let Err(e) = self.audio.play() {
            debug!("Music playback refused: {}", e);
            self.state = PlaybackState::Stopped;
            return;
        }
        let target = if self.audio.is_muted() { 0.0 } else { 1.0 };
        let length = self.fade_length(self.config.fade_in);
        self.start_fade(now, length, from, target, MusicEvent::FadedIn);
        self.state = PlaybackState::FadingIn;
    }

    fn fade_out(&mut self, now: Duration) {
        let length = self.fade_length(self.config.fade_out);
        let from = self.audio.volume();
        self.start_fade(now, length, from, 0.0, MusicEvent::FadedOut);
        self.state = PlaybackState::FadingOut;
    }

    fn start_fade(&mut self, now: Duration, length: Duration, from: f32, to: f32, done: MusicEvent) {
        let tween = Tween::new(now, length, from, to).easing(ease_out);
        let timer = self.timers.schedule_once(now, length, done);
        self.fade = Some(VolumeFade { tween, timer });
    }

    fn cancel_fade(&mut self) {
        if let Some(fade) = self.fade.take() {
            self.timers.cancel(fade.timer);
        }
    }

    fn fade_length(&self, normal: Duration) -> Duration {
        if self.motion.prefers_reduced_motion() {
            self.config.reduced_fade
        } else {
            normal
        }
    }
}
