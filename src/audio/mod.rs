//! Sound cues
//!
//! The game only names what happened; an [`AudioSink`] decides how it sounds.
//! Playback is fire-and-forget and sinks swallow their own failures.

#[cfg(target_arch = "wasm32")]
pub mod web;

use std::cell::RefCell;
use std::rc::Rc;

/// Named sound cues
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cue {
    /// Player fired
    Shoot,
    /// Bullet destroyed an enemy
    Hit,
    /// Run started
    GameStart,
    /// Run ended
    GameOver,
}

impl Cue {
    pub fn as_str(&self) -> &'static str {
        match self {
            Cue::Shoot => "shoot",
            Cue::Hit => "hit",
            Cue::GameStart => "game-start",
            Cue::GameOver => "game-over",
        }
    }
}

/// Audio output collaborator
pub trait AudioSink {
    /// Start a cue from the beginning. Ignored while muted.
    fn play(&mut self, cue: Cue);
    /// Silence everything currently playing
    fn stop_all(&mut self);
    /// Global mute flag
    fn set_muted(&mut self, muted: bool);
}

/// Sink that plays nothing
#[derive(Debug, Default)]
pub struct NullAudio;

impl AudioSink for NullAudio {
    fn play(&mut self, _cue: Cue) {}
    fn stop_all(&mut self) {}
    fn set_muted(&mut self, _muted: bool) {}
}

/// What a [`CueLog`] saw, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioCall {
    Play(Cue),
    StopAll,
}

/// Sink that records audible calls. Clones share the same log.
#[derive(Debug, Clone, Default)]
pub struct CueLog {
    calls: Rc<RefCell<Vec<AudioCall>>>,
    muted: Rc<RefCell<bool>>,
}

impl CueLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<AudioCall> {
        self.calls.borrow().clone()
    }

    /// Cues actually played (muted ones are not recorded)
    pub fn played(&self) -> Vec<Cue> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|c| match c {
                AudioCall::Play(cue) => Some(*cue),
                AudioCall::StopAll => None,
            })
            .collect()
    }

    pub fn count(&self, cue: Cue) -> usize {
        self.played().iter().filter(|c| **c == cue).count()
    }

    pub fn is_muted(&self) -> bool {
        *self.muted.borrow()
    }
}

impl AudioSink for CueLog {
    fn play(&mut self, cue: Cue) {
        if *self.muted.borrow() {
            return;
        }
        log::trace!("cue: {}", cue.as_str());
        self.calls.borrow_mut().push(AudioCall::Play(cue));
    }

    fn stop_all(&mut self) {
        self.calls.borrow_mut().push(AudioCall::StopAll);
    }

    fn set_muted(&mut self, muted: bool) {
        *self.muted.borrow_mut() = muted;
    }
}
