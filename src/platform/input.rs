//! Input event tracking
//!
//! Browser events are folded into an `InputState`, which hands the simulation
//! one `FrameInput` snapshot per step. Only the movement keys are tracked;
//! anything else is ignored.

use glam::Vec2;

use crate::sim::{FrameInput, MoveKeys};

/// A recognized movement key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveKey {
    Up,
    Down,
    Left,
    Right,
}

impl MoveKey {
    /// Map a `KeyboardEvent.key` value (WASD or arrows)
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "w" | "W" | "ArrowUp" => Some(MoveKey::Up),
            "s" | "S" | "ArrowDown" => Some(MoveKey::Down),
            "a" | "A" | "ArrowLeft" => Some(MoveKey::Left),
            "d" | "D" | "ArrowRight" => Some(MoveKey::Right),
            _ => None,
        }
    }
}

/// Accumulated input between simulation steps
#[derive(Debug, Clone, Default)]
pub struct InputState {
    keys: MoveKeys,
    pointer: Vec2,
    fire_held: bool,
    fire_pressed: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if the key is a movement key
    pub fn key_down(&mut self, key: &str) -> bool {
        self.set_key(key, true)
    }

    pub fn key_up(&mut self, key: &str) -> bool {
        self.set_key(key, false)
    }

    fn set_key(&mut self, key: &str, down: bool) -> bool {
        let Some(key) = MoveKey::from_key(key) else {
            return false;
        };
        match key {
            MoveKey::Up => self.keys.up = down,
            MoveKey::Down => self.keys.down = down,
            MoveKey::Left => self.keys.left = down,
            MoveKey::Right => self.keys.right = down,
        }
        true
    }

    pub fn pointer_moved(&mut self, pos: Vec2) {
        self.pointer = pos;
    }

    pub fn pointer_down(&mut self, pos: Vec2) {
        self.pointer = pos;
        self.fire_held = true;
        self.fire_pressed = true;
    }

    pub fn pointer_up(&mut self) {
        self.fire_held = false;
    }

    /// Input for the next step
    pub fn snapshot(&self) -> FrameInput {
        FrameInput {
            keys: self.keys,
            pointer: self.pointer,
            fire_pressed: self.fire_pressed,
            fire_held: self.fire_held,
        }
    }

    /// Clear one-shot inputs after a step consumed them
    pub fn clear_one_shots(&mut self) {
        self.fire_pressed = false;
    }

    /// Drop everything held (window blur, restart)
    pub fn release_all(&mut self) {
        self.keys = MoveKeys::default();
        self.fire_held = false;
        self.fire_pressed = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_keys_ignored() {
        let mut input = InputState::new();
        assert!(!input.key_down("q"));
        assert!(!input.key_down("Shift"));
        assert_eq!(input.snapshot().keys, MoveKeys::default());
    }

    #[test]
    fn test_keys_track_down_and_up() {
        let mut input = InputState::new();
        assert!(input.key_down("d"));
        assert!(input.key_down("ArrowUp"));
        let keys = input.snapshot().keys;
        assert!(keys.right && keys.up);

        input.key_up("d");
        assert!(!input.snapshot().keys.right);
    }

    #[test]
    fn test_press_is_one_shot_hold_persists() {
        let mut input = InputState::new();
        input.pointer_down(Vec2::new(10.0, 20.0));
        let first = input.snapshot();
        assert!(first.fire_pressed && first.fire_held);
        assert_eq!(first.pointer, Vec2::new(10.0, 20.0));

        input.clear_one_shots();
        let second = input.snapshot();
        assert!(!second.fire_pressed);
        assert!(second.fire_held);

        input.pointer_up();
        assert!(!input.snapshot().fire_held);
    }

    #[test]
    fn test_release_all() {
        let mut input = InputState::new();
        input.key_down("w");
        input.pointer_down(Vec2::ZERO);
        input.release_all();
        let frame = input.snapshot();
        assert_eq!(frame.keys, MoveKeys::default());
        assert!(!frame.fire_held && !frame.fire_pressed);
    }
}
