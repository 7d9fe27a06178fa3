//! crates/birthday_card_core/src/page.rs
//!
//! The whole card page: greeting card, ambient hero motion, memory slideshow
//! and music player, driven from one clock and torn down together.

use crate::card::{CardChoreographer, CardConfig};
use crate::domain::Slide;
use crate::hero::{Bounds, Entrance, EntranceConfig, Parallax, PetalConfig, PetalField, Tilt};
use crate::music::{MusicConfig, MusicPlayer};
use crate::ports::{AudioTrack, FocusTarget, MotionPreference};
use crate::slideshow::{Slideshow, SlideshowConfig};
use std::rc::Rc;
use std::time::Duration;

/// Capabilities the host hands to the page.
#[derive(Clone)]
pub struct PageHost {
    pub motion: Rc<dyn MotionPreference>,
    /// Hidden element used for the play attempt when the card opens.
    pub card_audio: Rc<dyn AudioTrack>,
    /// The element behind the visible music control.
    pub player_audio: Rc<dyn AudioTrack>,
    pub focus: Rc<dyn FocusTarget>,
}

pub struct BirthdayPage {
    pub card: CardChoreographer,
    pub entrance: Entrance,
    pub petals: PetalField,
    pub slideshow: Slideshow,
    pub music: MusicPlayer,
    parallax: Parallax,
    motion: Rc<dyn MotionPreference>,
}

impl BirthdayPage {
    pub fn new(host: PageHost, slides: Vec<Slide>, card: CardConfig) -> Self {
        Self {
            card: CardChoreographer::new(card, host.motion.clone(), host.card_audio, host.focus),
            entrance: Entrance::new(EntranceConfig::default()),
            petals: PetalField::new(PetalConfig::default()),
            slideshow: Slideshow::new(slides, SlideshowConfig::default(), host.motion.clone()),
            music: MusicPlayer::new(MusicConfig::default(), host.player_audio, host.motion.clone()),
            parallax: Parallax::default(),
            motion: host.motion,
        }
    }

    /// Swaps in a seeded petal layer, for reproducible frames.
    pub fn with_petals(mut self, petals: PetalField) -> Self {
        self.petals = petals;
        self
    }

    pub fn mount(&mut self, now: Duration) {
        let reduced = self.motion.prefers_reduced_motion();
        self.entrance.start(now, reduced);
        if reduced {
            self.petals.teardown();
        } else {
            self.petals.mount(now);
        }
        self.slideshow.mount(now);
    }

    pub fn advance(&mut self, now: Duration) {
        self.card.advance(now);
        self.petals.advance(now);
        self.slideshow.advance(now);
        self.music.advance(now);
    }

    pub fn pointer_move(&mut self, now: Duration, x: f32, y: f32, bounds: Bounds) {
        self.parallax.pointer_move(now, x, y, bounds);
    }

    pub fn tilt(&self, now: Duration) -> Tilt {
        self.parallax.tilt(now)
    }

    pub fn teardown(&mut self) {
        self.card.teardown();
        self.petals.teardown();
        self.slideshow.teardown();
        self.music.teardown();
    }

    pub fn pending_timers(&self) -> usize {
        self.card.pending_timers()
            + self.petals.pending_timers()
            + self.slideshow.pending_timers()
            + self.music.pending_timers()
    }
}

/// The greeting the card types out for `name`.
pub fn greeting_for(name: &str) -> String {
    format!("Happy birthday {name}! Even though we're far, I'm right there in the memories.")
}
