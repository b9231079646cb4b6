//! Device-independent control intents
//!
//! The host feeds raw keyboard/joystick events into an `InputSource` and hands
//! the resulting `InputState` snapshot to the simulation once per tick.

use serde::{Deserialize, Serialize};

/// Joystick button indices (Xbox-style layout)
pub const JOY_BUTTON_Y: u8 = 0x00;
pub const JOY_BUTTON_B: u8 = 0x01;
pub const JOY_BUTTON_A: u8 = 0x02;
pub const JOY_BUTTON_X: u8 = 0x03;
pub const JOY_BUTTON_LB: u8 = 0x04;
pub const JOY_BUTTON_RB: u8 = 0x05;
pub const JOY_BUTTON_LT: u8 = 0x06;
pub const JOY_BUTTON_RT: u8 = 0x07;

/// Intents held during a tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputState {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
    pub fire: bool,
}

/// Keys the ship responds to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    Space,
    Other,
}

/// Raw device events
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    KeyDown(Key),
    KeyUp(Key),
    JoyButtonDown(u8),
    JoyButtonUp(u8),
    /// Left stick position, each axis in [-1, 1] (negative y is up)
    JoyAxis { x: f32, y: f32 },
}

/// Translates device events into intents
///
/// Constructed once at startup and owned by whoever drives the active
/// controller; handing control over means handing over this object.
#[derive(Debug, Clone)]
pub struct InputSource {
    state: InputState,
    deadzone: f32,
}

impl Default for InputSource {
    fn default() -> Self {
        Self::new(0.5)
    }
}

impl InputSource {
    pub fn new(deadzone: f32) -> Self {
        Self {
            state: InputState::default(),
            deadzone,
        }
    }

    /// Apply one device event
    pub fn handle(&mut self, event: InputEvent) {
        match event {
            InputEvent::KeyDown(key) => self.set_key(key, true),
            InputEvent::KeyUp(key) => self.set_key(key, false),
            InputEvent::JoyButtonDown(button) => self.set_trigger(button, true),
            InputEvent::JoyButtonUp(button) => self.set_trigger(button, false),
            InputEvent::JoyAxis { x, y } => self.set_axes(x, y),
        }
    }

    /// Apply a batch of events in order
    pub fn handle_all(&mut self, events: impl IntoIterator<Item = InputEvent>) {
        for event in events {
            self.handle(event);
        }
    }

    /// Intents for this tick
    pub fn snapshot(&self) -> InputState {
        self.state
    }

    /// Drop every held intent (focus loss, controller handoff)
    pub fn release_all(&mut self) {
        self.state = InputState::default();
    }

    fn set_key(&mut self, key: Key, held: bool) {
        match key {
            Key::Up => self.state.forward = held,
            Key::Down => self.state.backward = held,
            Key::Left => self.state.left = held,
            Key::Right => self.state.right = held,
            Key::Space => self.state.fire = held,
            Key::Other => {}
        }
    }

    fn set_trigger(&mut self, button: u8, held: bool) {
        if button == JOY_BUTTON_LT || button == JOY_BUTTON_RT {
            self.state.fire = held;
        }
    }

    fn set_axes(&mut self, x: f32, y: f32) {
        self.state.right = x >= self.deadzone;
        self.state.left = x <= -self.deadzone;
        self.state.forward = y <= -self.deadzone;
        self.state.backward = y >= self.deadzone;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyboard_press_release() {
        let mut source = InputSource::default();
        source.handle_all([InputEvent::KeyDown(Key::Up), InputEvent::KeyDown(Key::Space)]);
        let state = source.snapshot();
        assert!(state.forward && state.fire);
        assert!(!state.backward && !state.left && !state.right);

        source.handle(InputEvent::KeyUp(Key::Up));
        assert!(!source.snapshot().forward);
        assert!(source.snapshot().fire);
    }

    #[test]
    fn test_triggers_fire_other_buttons_ignored() {
        let mut source = InputSource::default();
        source.handle(InputEvent::JoyButtonDown(JOY_BUTTON_A));
        assert!(!source.snapshot().fire);
        source.handle(InputEvent::JoyButtonDown(JOY_BUTTON_RT));
        assert!(source.snapshot().fire);
        source.handle(InputEvent::JoyButtonUp(JOY_BUTTON_RT));
        assert!(!source.snapshot().fire);
        source.handle(InputEvent::JoyButtonDown(JOY_BUTTON_LT));
        assert!(source.snapshot().fire);
    }

    #[test]
    fn test_axis_maps_to_same_intents_as_keys() {
        let mut joy = InputSource::default();
        joy.handle(InputEvent::JoyAxis { x: 0.9, y: -1.0 });

        let mut keys = InputSource::default();
        keys.handle_all([InputEvent::KeyDown(Key::Right), InputEvent::KeyDown(Key::Up)]);

        assert_eq!(joy.snapshot(), keys.snapshot());
    }

    #[test]
    fn test_axis_center_releases_both_directions() {
        let mut source = InputSource::default();
        source.handle(InputEvent::JoyAxis { x: -1.0, y: 1.0 });
        assert!(source.snapshot().left && source.snapshot().backward);

        source.handle(InputEvent::JoyAxis { x: 0.2, y: -0.3 });
        let state = source.snapshot();
        assert!(!state.left && !state.right && !state.forward && !state.backward);
    }

    #[test]
    fn test_release_all() {
        let mut source = InputSource::default();
        source.handle_all([InputEvent::KeyDown(Key::Left), InputEvent::KeyDown(Key::Space)]);
        source.release_all();
        assert_eq!(source.snapshot(), InputState::default());
    }
}
