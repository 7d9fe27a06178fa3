//! crates/birthday_card_core/src/slideshow.rs
//!
//! The memory slideshow: crossfading slides, typed captions, autoplay and
//! swipe navigation.
//!
//! All timing is owned here. Navigation that interrupts a running crossfade
//! cancels its settle timer before starting the next one, so a stale timer
//! can never touch the new transition.

use crate::domain::Slide;
use crate::ports::MotionPreference;
use crate::timer::{TimerId, TimerQueue};
use crate::tween::{ease_out, ease_out_cubic, Tween};
use crate::typewriter::{Typewriter, TypingPace};
use std::rc::Rc;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub struct SlideshowConfig {
    pub autoplay: bool,
    pub interval: Duration,
    /// Horizontal travel, in pixels, a touch must exceed to count as a swipe.
    pub swipe_threshold_px: f32,
    pub fade_out: Duration,
    pub settle: Duration,
    /// Scale the incoming slide starts from before settling at 1.0.
    pub settle_from_scale: f32,
    pub caption_pace: TypingPace,
}

impl Default for SlideshowConfig {
    fn default() -> Self {
        Self {
            autoplay: true,
            interval: Duration::from_millis(4800),
            swipe_threshold_px: 30.0,
            fade_out: Duration::from_millis(600),
            settle: Duration::from_millis(900),
            settle_from_scale: 1.03,
            caption_pace: TypingPace::caption(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SlideshowEvent {
    Autoplay,
    Settled,
}

#[derive(Debug, Clone, Copy)]
struct Crossfade {
    from: usize,
    to: usize,
    fade_out: Tween,
    settle: Tween,
    timer: TimerId,
}

/// How one slide should be drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlideVisual {
    pub opacity: f32,
    pub scale: f32,
    /// Stacking layer; the current slide sits above the rest.
    pub layer: u8,
    /// Hidden from assistive technology.
    pub hidden: bool,
}

/// A pagination dot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Indicator {
    pub index: usize,
    pub active: bool,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SlideshowView<'a> {
    pub slides: Vec<SlideVisual>,
    pub caption: &'a str,
    pub indicators: Vec<Indicator>,
}

pub struct Slideshow {
    slides: Vec<Slide>,
    config: SlideshowConfig,
    motion: Rc<dyn MotionPreference>,
    index: usize,
    caption: Typewriter,
    crossfade: Option<Crossfade>,
    autoplay_enabled: bool,
    autoplay_timer: Option<TimerId>,
    touch_start_x: Option<f32>,
    now: Duration,
    timers: TimerQueue<SlideshowEvent>,
}

impl Slideshow {
    pub fn new(slides: Vec<Slide>, config: SlideshowConfig, motion: Rc<dyn MotionPreference>) -> Self {
        let caption = Typewriter::new(config.caption_pace);
        let autoplay_enabled = config.autoplay;
        Self {
            slides,
            config,
            motion,
            index: 0,
            caption,
            crossfade: None,
            autoplay_enabled,
            autoplay_timer: None,
            touch_start_x: None,
            now: Duration::ZERO,
            timers: TimerQueue::new(),
        }
    }

    /// Shows the first slide, starts its caption and arms autoplay.
    pub fn mount(&mut self, now: Duration) {
        self.now = now;
        if self.slides.is_empty() {
            return;
        }
        self.start_caption();
        self.restart_autoplay();
    }

    /// Cancels every outstanding timer, including the caption's.
    pub fn teardown(&mut self) {
        self.timers.clear();
        self.autoplay_timer = None;
        self.crossfade = None;
        self.touch_start_x = None;
        self.caption.cancel();
    }

    /// Runs everything due at or before `now`.
    pub fn advance(&mut self, now: Duration) {
        while let Some(fired) = self.timers.pop_due(now) {
            self.now = fired.at;
            self.caption.advance(fired.at);
            match fired.event {
                SlideshowEvent::Autoplay => self.next(fired.at),
                SlideshowEvent::Settled => {
                    if self.crossfade.is_some_and(|c| c.timer == fired.id) {
                        self.crossfade = None;
                    }
                }
            }
        }
        self.now = self.now.max(now);
        self.caption.advance(now);
    }

    /// Moves to slide `i`. A no-op for the current index or an index out of range.
    pub fn go_to(&mut self, now: Duration, i: usize) {
        self.sync(now);
        if i == self.index || i >= self.slides.len() {
            return;
        }
        let from = self.index;
        if let Some(prev) = self.crossfade.take() {
            self.timers.cancel(prev.timer);
        }

        if !self.reduced_motion() {
            let fade_out = Tween::new(self.now, self.config.fade_out, 1.0, 0.0).easing(ease_out);
            let settle = Tween::new(self.now, self.config.settle, self.config.settle_from_scale, 1.0)
                .easing(ease_out_cubic);
            let settle_after = self.config.fade_out.max(self.config.settle);
            let timer = self
                .timers
                .schedule_once(self.now, settle_after, SlideshowEvent::Settled);
            self.crossfade = Some(Crossfade {
                from,
                to: i,
                fade_out,
                settle,
                timer,
            });
        }

        self.index = i;
        self.start_caption();
        self.restart_autoplay();
    }

    pub fn next(&mut self, now: Duration) {
        let n = self.slides.len();
        if n == 0 {
            return;
        }
        self.go_to(now, (self.index + 1) % n);
    }

    pub fn prev(&mut self, now: Duration) {
        let n = self.slides.len();
        if n == 0 {
            return;
        }
        self.go_to(now, (self.index + n - 1) % n);
    }

    /// Enables or disables autoplay at runtime.
    pub fn set_autoplay(&mut self, now: Duration, enabled: bool) {
        self.sync(now);
        self.autoplay_enabled = enabled;
        self.restart_autoplay();
    }

    /// A finger went down; autoplay pauses until the gesture ends.
    pub fn touch_start(&mut self, now: Duration, x: f32) {
        self.sync(now);
        self.touch_start_x = Some(x);
        self.stop_autoplay();
    }

    /// A finger lifted at `x`. Drags past the threshold navigate one slide.
    pub fn touch_end(&mut self, now: Duration, x: f32) {
        self.sync(now);
        let Some(start) = self.touch_start_x.take() else {
            return;
        };
        let dx = x - start;
        let threshold = self.config.swipe_threshold_px;
        if dx > threshold {
            self.prev(now);
        } else if dx < -threshold {
            self.next(now);
        }
        self.restart_autoplay();
    }

    /// The gesture was interrupted by the platform.
    pub fn touch_cancel(&mut self, now: Duration) {
        self.sync(now);
        if self.touch_start_x.take().is_some() {
            self.restart_autoplay();
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.slides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }

    pub fn slides(&self) -> &[Slide] {
        &self.slides
    }

    pub fn caption(&self) -> &str {
        self.caption.text()
    }

    pub fn is_transitioning(&self) -> bool {
        self.crossfade.is_some()
    }

    /// Whether the autoplay timer is currently armed.
    pub fn autoplay_active(&self) -> bool {
        self.autoplay_timer.is_some()
    }

    /// Outstanding timers across the slideshow and its caption.
    pub fn pending_timers(&self) -> usize {
        self.timers.len() + self.caption.pending_timers()
    }

    pub fn indicators(&self) -> Vec<Indicator> {
        (0..self.slides.len())
            .map(|i| Indicator {
                index: i,
                active: i == self.index,
                label: format!("Go to slide {}", i + 1),
            })
            .collect()
    }

    /// Projects every slide at `now`. Empty when there are no slides.
    pub fn view(&self, now: Duration) -> SlideshowView<'_> {
        let slides = (0..self.slides.len()).map(|i| self.slide_visual(i, now)).collect();
        SlideshowView {
            slides,
            caption: self.caption.text(),
            indicators: self.indicators(),
        }
    }

    fn slide_visual(&self, i: usize, now: Duration) -> SlideVisual {
        let current = i == self.index;
        let resting = SlideVisual {
            opacity: if current { 1.0 } else { 0.0 },
            scale: 1.0,
            layer: if current { 20 } else { 10 },
            hidden: !current,
        };
        match self.crossfade {
            Some(c) if i == c.from => SlideVisual {
                opacity: c.fade_out.value_at(now),
                layer: 10,
                ..resting
            },
            Some(c) if i == c.to => SlideVisual {
                scale: c.settle.value_at(now),
                ..resting
            },
            _ => resting,
        }
    }

    /// Input can arrive between `advance` calls; the clock never runs backwards.
    fn sync(&mut self, now: Duration) {
        self.now = self.now.max(now);
    }

    fn reduced_motion(&self) -> bool {
        self.motion.prefers_reduced_motion()
    }

    fn start_caption(&mut self) {
        let text = self.slides[self.index].caption.clone().unwrap_or_default();
        self.caption.start(self.now, &text);
    }

    fn stop_autoplay(&mut self) {
        if let Some(id) = self.autoplay_timer.take() {
            self.timers.cancel(id);
        }
    }

    /// Re-arms the countdown from now, or leaves it off when autoplay is
    /// disabled, motion is reduced, a touch is in progress or there is
    /// nothing to advance to.
    fn restart_autoplay(&mut self) {
        self.stop_autoplay();
        if !self.autoplay_enabled
            || self.reduced_motion()
            || self.touch_start_x.is_some()
            || self.slides.len() < 2
        {
            return;
        }
        self.autoplay_timer = Some(self.timers.schedule_every(
            self.now,
            self.config.interval,
            SlideshowEvent::Autoplay,
        ));
    }
}
