//! Input translation
//!
//! Raw key presses arrive as [`InputEvent`]s. The director keeps an
//! [`InputState`] of held keys for movement, and scenes turn key-down edges
//! into [`GameAction`]s with [`InputSystem::translate`], filtered by the
//! [`InputContext`] they run in.

use std::collections::HashSet;

use crate::geometry::Vec2;

/// Keys the game reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    W,
    A,
    S,
    D,
    Space,
    Enter,
    Escape,
    E,
    M,
}

/// A single input occurrence. `KeyDown` is only sent on the press edge, never for auto-repeat.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    KeyDown(Key),
    KeyUp(Key),
    Quit,
}

/// Actions the player can perform in the game
///
/// This enum represents all possible high-level game actions that can be
/// triggered by input. It decouples input handling from action execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameAction {
    // === Combat ===
    Attack,
    ActivateShield,

    // === Playing ===
    Pause,
    ToggleMinimap,

    // === Menu Navigation ===
    MenuUp,
    MenuDown,
    MenuLeft,
    MenuRight,
    MenuConfirm,
    MenuBack,
}

/// Input context determines which actions are available
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputContext {
    /// Normal gameplay - movement, combat
    Playing,
    /// Any menu scene
    Menu,
}

/// Translates key presses into game actions for a given context
pub struct InputSystem;

impl InputSystem {
    /// Key-down edge to action; key-up and unmapped keys yield `None`.
    pub fn translate(event: &InputEvent, context: InputContext) -> Option<GameAction> {
        let InputEvent::KeyDown(key) = event else {
            return None;
        };
        match context {
            InputContext::Playing => Self::playing_action(*key),
            InputContext::Menu => Self::menu_action(*key),
        }
    }

    /// Handle keys during normal gameplay
    fn playing_action(key: Key) -> Option<GameAction> {
        match key {
            Key::Space => Some(GameAction::Attack),
            Key::E => Some(GameAction::ActivateShield),
            Key::Escape => Some(GameAction::Pause),
            Key::M => Some(GameAction::ToggleMinimap),
            _ => None,
        }
    }

    /// Handle keys in menus
    fn menu_action(key: Key) -> Option<GameAction> {
        match key {
            Key::Up | Key::W => Some(GameAction::MenuUp),
            Key::Down | Key::S => Some(GameAction::MenuDown),
            Key::Left | Key::A => Some(GameAction::MenuLeft),
            Key::Right | Key::D => Some(GameAction::MenuRight),
            Key::Enter | Key::Space => Some(GameAction::MenuConfirm),
            Key::Escape => Some(GameAction::MenuBack),
            _ => None,
        }
    }
}

/// Keys currently held down
#[derive(Debug, Clone, Default)]
pub struct InputState {
    held: HashSet<Key>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tracks press/release; other events are ignored
    pub fn apply(&mut self, event: &InputEvent) {
        match event {
            InputEvent::KeyDown(key) => {
                self.held.insert(*key);
            }
            InputEvent::KeyUp(key) => {
                self.held.remove(key);
            }
            InputEvent::Quit => {}
        }
    }

    pub fn is_held(&self, key: Key) -> bool {
        self.held.contains(&key)
    }

    /// Movement intent from arrows/WASD, not normalized. Opposite keys cancel out.
    pub fn movement_vector(&self) -> Vec2 {
        let axis = |neg: [Key; 2], pos: [Key; 2]| -> f32 {
            let n = neg.iter().any(|k| self.is_held(*k)) as i32;
            let p = pos.iter().any(|k| self.is_held(*k)) as i32;
            (p - n) as f32
        };
        Vec2::new(
            axis([Key::Left, Key::A], [Key::Right, Key::D]),
            axis([Key::Up, Key::W], [Key::Down, Key::S]),
        )
    }
}

#[cfg(feature = "sdl")]
pub mod sdl {
    //! SDL2 keycode mapping and event polling
    use super::{InputEvent, Key};
    use sdl2::EventPump;
    use sdl2::event::Event;
    use sdl2::keyboard::Keycode;

    pub fn key_from_keycode(keycode: Keycode) -> Option<Key> {
        match keycode {
            Keycode::Up => Some(Key::Up),
            Keycode::Down => Some(Key::Down),
            Keycode::Left => Some(Key::Left),
            Keycode::Right => Some(Key::Right),
            Keycode::W => Some(Key::W),
            Keycode::A => Some(Key::A),
            Keycode::S => Some(Key::S),
            Keycode::D => Some(Key::D),
            Keycode::Space => Some(Key::Space),
            Keycode::Return | Keycode::KpEnter => Some(Key::Enter),
            Keycode::Escape => Some(Key::Escape),
            Keycode::E => Some(Key::E),
            Keycode::M => Some(Key::M),
            _ => None,
        }
    }

    /// Drains the SDL event queue into input events, dropping key repeats
    pub fn poll_events(event_pump: &mut EventPump) -> Vec<InputEvent> {
        let mut events = Vec::new();

        for event in event_pump.poll_iter() {
            match event {
                Event::Quit { .. } => events.push(InputEvent::Quit),
                Event::KeyDown {
                    keycode: Some(keycode),
                    repeat: false,
                    ..
                } => {
                    if let Some(key) = key_from_keycode(keycode) {
                        events.push(InputEvent::KeyDown(key));
                    }
                }
                Event::KeyUp {
                    keycode: Some(keycode),
                    ..
                } => {
                    if let Some(key) = key_from_keycode(keycode) {
                        events.push(InputEvent::KeyUp(key));
                    }
                }
                _ => {}
            }
        }

        events
    }
}
