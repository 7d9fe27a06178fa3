//! crates/birthday_card_core/src/typewriter.rs
//!
//! Reveals a string one glyph at a time on a repeating timer.

use crate::timer::{TimerId, TimerQueue};
use std::time::Duration;

/// Per-glyph cadence of a [`Typewriter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypingPace {
    /// The same interval regardless of length.
    Fixed(Duration),
    /// `max(floor, base - len / divisor)`, so long strings type faster.
    Adaptive {
        base: Duration,
        floor: Duration,
        divisor: u32,
    },
}

impl TypingPace {
    /// The card greeting's pace.
    pub const fn greeting() -> Self {
        TypingPace::Fixed(Duration::from_millis(26))
    }

    /// The slideshow caption pace.
    pub const fn caption() -> Self {
        TypingPace::Adaptive {
            base: Duration::from_millis(28),
            floor: Duration::from_millis(10),
            divisor: 6,
        }
    }

    pub fn interval_for(&self, text: &str) -> Duration {
        match *self {
            TypingPace::Fixed(interval) => interval,
            TypingPace::Adaptive {
                base,
                floor,
                divisor,
            } => {
                let len = text.chars().count() as u64;
                let speedup = Duration::from_millis(len / u64::from(divisor.max(1)));
                base.saturating_sub(speedup).max(floor)
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Tick;

/// A restartable glyph-by-glyph reveal.
///
/// Starting a new string cancels the running one before anything else
/// happens, so two reveals can never interleave.
#[derive(Debug, Clone)]
pub struct Typewriter {
    pace: TypingPace,
    target: String,
    /// Byte length of the revealed prefix, always on a char boundary.
    revealed: usize,
    tick: Option<TimerId>,
    timers: TimerQueue<Tick>,
}

impl Typewriter {
    pub fn new(pace: TypingPace) -> Self {
        Self {
            pace,
            target: String::new(),
            revealed: 0,
            tick: None,
            timers: TimerQueue::new(),
        }
    }

    /// Begins revealing `text` from an empty prefix.
    pub fn start(&mut self, now: Duration, text: &str) {
        self.cancel();
        self.target = text.to_owned();
        self.revealed = 0;
        if self.target.is_empty() {
            return;
        }
        let interval = self.pace.interval_for(&self.target);
        self.tick = Some(self.timers.schedule_every(now, interval, Tick));
    }

    /// Runs every tick due at or before `now`.
    pub fn advance(&mut self, now: Duration) {
        while let Some(_fired) = self.timers.pop_due(now) {
            if let Some(c) = self.target[self.revealed..].chars().next() {
                self.revealed += c.len_utf8();
            }
            if self.revealed >= self.target.len() {
                self.cancel();
                break;
            }
        }
    }

    /// Stops the reveal where it is and drops its timer.
    pub fn cancel(&mut self) {
        if let Some(id) = self.tick.take() {
            self.timers.cancel(id);
        }
        self.timers.clear();
    }

    /// Clears both the timer and the text.
    pub fn reset(&mut self) {
        self.cancel();
        self.target.clear();
        self.revealed = 0;
    }

    /// The currently visible prefix.
    pub fn text(&self) -> &str {
        &self.target[..self.revealed]
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    /// True once the whole target is visible (immediately for empty text).
    pub fn is_done(&self) -> bool {
        self.revealed >= self.target.len()
    }

    pub fn is_running(&self) -> bool {
        self.tick.is_some()
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn reveals_one_glyph_per_interval() {
        let mut tw = Typewriter::new(TypingPace::Fixed(ms(26)));
        tw.start(ms(0), "Hey");
        assert_eq!(tw.text(), "");
        tw.advance(ms(26));
        assert_eq!(tw.text(), "H");
        tw.advance(ms(52));
        assert_eq!(tw.text(), "He");
        assert!(!tw.is_done());
        tw.advance(ms(78));
        assert_eq!(tw.text(), "Hey");
        assert!(tw.is_done());
        assert!(!tw.is_running());
        assert_eq!(tw.pending_timers(), 0);
    }

    #[test]
    fn restart_mid_reveal_never_mixes_strings() {
        let mut tw = Typewriter::new(TypingPace::caption());
        tw.start(ms(0), "Hi");
        tw.advance(ms(28));
        assert_eq!(tw.text(), "H");

        tw.start(ms(30), "Bye");
        assert_eq!(tw.text(), "");
        for t in (30..400).step_by(7) {
            tw.advance(ms(t));
            assert!("Bye".starts_with(tw.text()), "saw {:?}", tw.text());
        }
        assert_eq!(tw.text(), "Bye");
    }

    #[test]
    fn empty_text_is_done_without_a_timer() {
        let mut tw = Typewriter::new(TypingPace::caption());
        tw.start(ms(0), "");
        assert!(tw.is_done());
        assert_eq!(tw.pending_timers(), 0);
    }

    #[test]
    fn adaptive_pace_speeds_up_and_respects_floor() {
        let pace = TypingPace::caption();
        assert_eq!(pace.interval_for("short"), ms(28));
        assert_eq!(pace.interval_for(&"x".repeat(60)), ms(18));
        assert_eq!(pace.interval_for(&"x".repeat(600)), ms(10));
    }

    #[test]
    fn multibyte_glyphs_are_revealed_whole() {
        let mut tw = Typewriter::new(TypingPace::Fixed(ms(10)));
        tw.start(ms(0), "é💖");
        tw.advance(ms(10));
        assert_eq!(tw.text(), "é");
        tw.advance(ms(20));
        assert_eq!(tw.text(), "é💖");
    }
}
