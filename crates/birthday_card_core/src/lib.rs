pub mod card;
pub mod confetti;
pub mod domain;
pub mod hero;
pub mod music;
pub mod note_form;
pub mod page;
pub mod ports;
pub mod recent_notes;
pub mod slideshow;
pub mod timer;
pub mod tween;
pub mod typewriter;

pub use card::{CardChoreographer, CardConfig, CardView, FaceVisual, HeartVisual};
pub use confetti::{ConfettiConfig, ConfettiEmitter, ConfettiParticle, ParticleFrame};
pub use domain::{CardOpenState, Note, NoteDraft, Slide, SubmissionReceipt, ValidationError};
pub use hero::{
    Bounds, Entrance, EntranceConfig, EntranceView, Parallax, Petal, PetalConfig, PetalField,
    PetalFrame, Reveal, Tilt,
};
pub use music::{MusicConfig, MusicPlayer, PlaybackState};
pub use note_form::{FormStatus, NoteForm};
pub use page::{BirthdayPage, PageHost};
pub use ports::{
    AudioTrack, FocusTarget, MotionPreference, NoteRepository, NotesClient, NotificationService,
    PlaybackError, PortError, PortResult, ReducedMotion,
};
pub use recent_notes::{NoteSummary, RecentNotes};
pub use slideshow::{Indicator, SlideVisual, Slideshow, SlideshowConfig, SlideshowView};
pub use timer::{Fired, TimerId, TimerQueue};
pub use typewriter::{Typewriter, TypingPace};
