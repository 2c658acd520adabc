//! Input snapshots and edge detection
//!
//! The host samples which keys are held once per rendered frame. The simulation
//! needs both "held" and "newly pressed this tick"; `EdgeDetector` derives the
//! latter by comparing against the previous snapshot.

/// Logical game keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    MoveLeft,
    MoveRight,
    /// Jump (up arrow)
    Jump,
    /// Crouch (down arrow)
    Crouch,
    AimUp,
    AimLeft,
    AimDown,
    AimRight,
    Vacuum,
    Shoot,
    Burst,
    Restart,
    /// Ends the session (escape)
    Quit,
    SelectYellow,
    SelectGreen,
    Confirm,
}

impl Key {
    pub const ALL: [Key; 16] = [
        Key::MoveLeft,
        Key::MoveRight,
        Key::Jump,
        Key::Crouch,
        Key::AimUp,
        Key::AimLeft,
        Key::AimDown,
        Key::AimRight,
        Key::Vacuum,
        Key::Shoot,
        Key::Burst,
        Key::Restart,
        Key::Quit,
        Key::SelectYellow,
        Key::SelectGreen,
        Key::Confirm,
    ];

    fn bit(self) -> u32 {
        1 << (self as u32)
    }
}

/// Set of keys held at one instant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KeyState(u32);

impl KeyState {
    pub fn with(keys: &[Key]) -> Self {
        let mut state = Self::default();
        for &key in keys {
            state.press(key);
        }
        state
    }

    pub fn press(&mut self, key: Key) {
        self.0 |= key.bit();
    }

    pub fn is_down(&self, key: Key) -> bool {
        self.0 & key.bit() != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }
}

/// Held keys plus the keys that went down since the previous tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InputFrame {
    pub held: KeyState,
    pub pressed: KeyState,
}

impl InputFrame {
    pub fn held(&self, key: Key) -> bool {
        self.held.is_down(key)
    }

    pub fn pressed(&self, key: Key) -> bool {
        self.pressed.is_down(key)
    }
}

/// Turns successive snapshots into press edges
#[derive(Debug, Clone, Copy, Default)]
pub struct EdgeDetector {
    previous: KeyState,
}

impl EdgeDetector {
    pub fn sample(&mut self, now: KeyState) -> InputFrame {
        let pressed = KeyState(now.0 & !self.previous.0);
        self.previous = now;
        InputFrame { held: now, pressed }
    }

    /// Forget history (a key held across a reset does not re-fire)
    pub fn reset(&mut self, now: KeyState) {
        self.previous = now;
    }
}
