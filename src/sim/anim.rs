//! Sprite animation state machines
//!
//! Each entity kind has an animation enum that maps to an `AnimSpec` (sheet
//! row, frame range, rate). The generic `Animator` tracks the current state,
//! time spent in it and the frame cursor. States with a minimum duration are
//! "committed": automatic transitions wait until the duration elapses.

/// Frame range and timing of one animation state
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimSpec {
    /// Label looked up in sheet metadata before falling back to `start`/`count`
    pub label: &'static str,
    /// Sheet row the sequence is cut from
    pub row: u8,
    pub start: u16,
    pub count: u16,
    pub fps: f32,
    /// Seconds a state must play before automatic transitions may replace it
    pub min_duration: f32,
}

impl AnimSpec {
    pub const fn new(label: &'static str, row: u8, start: u16, count: u16, fps: f32) -> Self {
        Self {
            label,
            row,
            start,
            count,
            fps,
            min_duration: 0.0,
        }
    }

    pub const fn committed(mut self, min_duration: f32) -> Self {
        self.min_duration = min_duration;
        self
    }

    pub fn frame_time(&self) -> f32 {
        if self.fps > 0.0 { 1.0 / self.fps } else { f32::INFINITY }
    }
}

/// An animation state enum that knows its frame spec
pub trait AnimState: Copy + PartialEq + std::fmt::Debug {
    /// Extra lookup context (e.g. the enemy kind owning the sheet)
    type Context: Copy;

    fn spec(self, cx: Self::Context) -> AnimSpec;
}

/// Current state plus timers for one entity
#[derive(Debug, Clone, PartialEq)]
pub struct Animator<S: AnimState> {
    state: S,
    time_in_state: f32,
    frame: u16,
    frame_timer: f32,
}

impl<S: AnimState> Animator<S> {
    pub fn new(state: S) -> Self {
        Self {
            state,
            time_in_state: 0.0,
            frame: 0,
            frame_timer: 0.0,
        }
    }

    pub fn state(&self) -> S {
        self.state
    }

    pub fn time_in_state(&self) -> f32 {
        self.time_in_state
    }

    /// Frame offset within the current sequence
    pub fn frame(&self) -> u16 {
        self.frame
    }

    /// Change state; timers reset only when the state actually changes
    pub fn set(&mut self, state: S) -> bool {
        if self.state == state {
            return false;
        }
        self.state = state;
        self.restart();
        true
    }

    /// Change state and restart its clock even if already in it
    pub fn force(&mut self, state: S) {
        self.state = state;
        self.restart();
    }

    fn restart(&mut self) {
        self.time_in_state = 0.0;
        self.frame = 0;
        self.frame_timer = 0.0;
    }

    /// Whether the current state is still inside its minimum duration
    pub fn is_committed(&self, cx: S::Context) -> bool {
        self.time_in_state < self.state.spec(cx).min_duration
    }

    /// Advance the state clock and step frames at the sequence rate
    pub fn advance(&mut self, dt: f32, cx: S::Context) {
        self.time_in_state += dt;
        let spec = self.state.spec(cx);
        if spec.count <= 1 {
            self.frame = 0;
            return;
        }
        self.frame_timer += dt;
        if self.frame_timer >= spec.frame_time() {
            self.frame_timer = 0.0;
            self.frame = (self.frame + 1) % spec.count;
        }
    }

    /// Absolute frame index in the sheet row (fallback slicing)
    pub fn sheet_frame(&self, cx: S::Context) -> u16 {
        let spec = self.state.spec(cx);
        spec.start + self.frame.min(spec.count.saturating_sub(1))
    }
}
