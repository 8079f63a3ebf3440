//! Playback cursor over a frame trail
//!
//! Every control here is a cursor move over frames that already exist;
//! nothing re-runs the engine. The cursor may sit "before the first frame"
//! (`position() == None`), which is where an empty session starts.

use std::time::Duration;

use crate::recorder::AnimationStep;
use crate::SessionError;

/// Current state of playback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    /// Not advancing
    Paused,
    /// Advancing one frame per tick
    Playing,
    /// Reached the last frame while playing
    Finished,
}

/// Frame trail plus cursor
#[derive(Debug, Clone)]
pub struct Playback {
    frames: Vec<AnimationStep>,
    position: Option<usize>,
    state: PlaybackState,
    interval: Duration,
}

impl Playback {
    /// Create an empty playback with the given frame interval
    pub fn new(interval: Duration) -> Self {
        Self {
            frames: Vec::new(),
            position: None,
            state: PlaybackState::Paused,
            interval,
        }
    }

    /// All frames
    pub fn frames(&self) -> &[AnimationStep] {
        &self.frames
    }

    /// Total number of frames
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// True if there are no frames
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Cursor index, `None` before the first frame
    pub fn position(&self) -> Option<usize> {
        self.position
    }

    /// Frame under the cursor
    pub fn current(&self) -> Option<&AnimationStep> {
        self.frames.get(self.position?)
    }

    /// Get the current playback state
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Whether ticks advance the cursor
    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing
    }

    /// Time between frames while playing
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Change the time between frames
    pub fn set_interval(&mut self, interval: Duration) {
        self.interval = interval;
    }

    /// Append frames; returns the index of the first appended frame
    pub(crate) fn append(&mut self, frames: Vec<AnimationStep>) -> usize {
        let start = self.frames.len();
        self.frames.extend(frames);
        start
    }

    /// Drop every frame from `len` on and pull the cursor back inside
    pub(crate) fn truncate(&mut self, len: usize) {
        self.frames.truncate(len);
        self.position = self.position.filter(|_| len > 0).map(|p| p.min(len - 1));
    }

    /// Place the cursor on a frame
    pub fn seek(&mut self, index: usize) -> Result<(), SessionError> {
        if index >= self.frames.len() {
            return Err(SessionError::StepOutOfRange {
                index,
                len: self.frames.len(),
            });
        }
        self.position = Some(index);
        Ok(())
    }

    /// Put the cursor before the first frame
    pub fn rewind(&mut self) {
        self.position = None;
        self.state = PlaybackState::Paused;
    }

    /// Move the cursor by `delta`, clamped to [before-first, last]
    pub fn step(&mut self, delta: isize) -> Option<&AnimationStep> {
        // Before-first is encoded as -1 for the arithmetic
        let current = self.position.map_or(-1, |p| p as isize);
        let last = self.frames.len() as isize - 1;
        let target = current.saturating_add(delta).clamp(-1, last.max(-1));
        self.position = usize::try_from(target).ok();
        self.current()
    }

    /// Step forward one frame
    pub fn step_forward(&mut self) -> Option<&AnimationStep> {
        self.state = PlaybackState::Paused;
        self.step(1)
    }

    /// Step backward one frame
    pub fn step_backward(&mut self) -> Option<&AnimationStep> {
        self.state = PlaybackState::Paused;
        self.step(-1)
    }

    /// Whether stepping back would move the cursor
    pub fn can_prev(&self) -> bool {
        self.position.is_some()
    }

    /// Whether stepping forward would move the cursor
    pub fn can_next(&self) -> bool {
        self.position.map_or(!self.frames.is_empty(), |p| p + 1 < self.frames.len())
    }

    /// Start playback
    pub fn play(&mut self) {
        self.state = PlaybackState::Playing;
    }

    /// Pause playback
    pub fn pause(&mut self) {
        self.state = PlaybackState::Paused;
    }

    /// Flip between playing and paused
    pub fn toggle(&mut self) {
        if self.is_playing() {
            self.pause();
        } else {
            self.play();
        }
    }

    /// One timer tick
    ///
    /// While playing, advances one frame and returns it. At the last frame
    /// playback stops in `Finished` and nothing is returned.
    pub fn tick(&mut self) -> Option<&AnimationStep> {
        if !self.is_playing() {
            return None;
        }
        if !self.can_next() {
            self.state = PlaybackState::Finished;
            return None;
        }
        self.step(1)
    }

    /// Calculate progress as a fraction (0.0 - 1.0)
    pub fn progress(&self) -> f64 {
        match self.position {
            Some(p) if !self.frames.is_empty() => (p + 1) as f64 / self.frames.len() as f64,
            _ => 0.0,
        }
    }
}
