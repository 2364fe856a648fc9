//! Scene capability trait and the per-frame context handed to scenes.
//!
//! Scenes never touch the stack directly. They queue [`StackCommand`]s and
//! [`AudioCue`]s on the [`SceneContext`]; the director applies the commands
//! in FIFO order once the scene's update has returned, so no frame ever sees
//! a half-applied transition.

use std::fmt;
use std::time::Duration;

use crate::audio::AudioCue;
use crate::config::Settings;
use crate::error::GameError;
use crate::input_system::{InputEvent, InputState};
use crate::player::PlayerStateSnapshot;
use crate::render::Painter;
use crate::resources::ResourceManager;

/// Scene kinds registered by the game
pub mod kinds {
    pub const MENU: &str = "menu";
    pub const PAUSE: &str = "pause";
    pub const SETTINGS: &str = "settings";
    pub const INSTRUCTIONS: &str = "instructions";
    pub const PHASE: &str = "phase";
    pub const GAME_OVER: &str = "game_over";
    pub const VICTORY: &str = "victory";
}

/// Monotonic game time, advanced by real frame time
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameClock {
    /// Time since the game started
    pub now: Duration,
    /// Length of the current frame
    pub dt: Duration,
}

impl FrameClock {
    pub fn advance(&mut self, dt: Duration) {
        self.dt = dt;
        self.now += dt;
    }
}

/// Identifies a scene on the stack: a registered kind plus an optional
/// instance key, written `kind` or `kind:instance` (`phase:level_2`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SceneHandle {
    kind: String,
    instance: Option<String>,
}

impl SceneHandle {
    pub fn new(kind: &str) -> Self {
        SceneHandle {
            kind: kind.to_string(),
            instance: None,
        }
    }

    pub fn with_instance(kind: &str, instance: &str) -> Self {
        SceneHandle {
            kind: kind.to_string(),
            instance: Some(instance.to_string()),
        }
    }

    /// Parses `kind` or `kind:instance`
    pub fn parse(text: &str) -> Self {
        match text.split_once(':') {
            Some((kind, instance)) => SceneHandle::with_instance(kind, instance),
            None => SceneHandle::new(text),
        }
    }

    pub fn menu() -> Self {
        SceneHandle::new(kinds::MENU)
    }

    pub fn pause() -> Self {
        SceneHandle::new(kinds::PAUSE)
    }

    pub fn settings() -> Self {
        SceneHandle::new(kinds::SETTINGS)
    }

    pub fn instructions() -> Self {
        SceneHandle::new(kinds::INSTRUCTIONS)
    }

    pub fn victory() -> Self {
        SceneHandle::new(kinds::VICTORY)
    }

    pub fn phase(level: &str) -> Self {
        SceneHandle::with_instance(kinds::PHASE, level)
    }

    pub fn game_over(level: &str) -> Self {
        SceneHandle::with_instance(kinds::GAME_OVER, level)
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn instance(&self) -> Option<&str> {
        self.instance.as_deref()
    }
}

impl fmt::Display for SceneHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.instance {
            Some(instance) => write!(f, "{}:{}", self.kind, instance),
            None => write!(f, "{}", self.kind),
        }
    }
}

/// Stack mutation requested by a scene, applied between frames
#[derive(Debug, Clone, PartialEq)]
pub enum StackCommand {
    Push(SceneHandle),
    Pop,
    /// Pop and push; the outgoing player snapshot is handed to the incoming scene
    Replace(SceneHandle),
    /// Fresh instance of the top scene under the same handle
    RestartCurrent,
    ReturnToRoot,
    /// Drop a cached instance that is not on the stack
    Discard(SceneHandle),
    /// Persist settings and apply them
    SaveSettings(Settings),
    Quit,
}

/// Services available to a scene during one callback
pub struct SceneContext<'a> {
    pub clock: FrameClock,
    pub input: &'a InputState,
    pub settings: &'a Settings,
    pub resources: &'a mut ResourceManager,
    pub screen: (u32, u32),
    commands: &'a mut Vec<StackCommand>,
    audio: &'a mut Vec<AudioCue>,
}

impl<'a> SceneContext<'a> {
    pub fn new(
        clock: FrameClock,
        input: &'a InputState,
        settings: &'a Settings,
        resources: &'a mut ResourceManager,
        screen: (u32, u32),
        commands: &'a mut Vec<StackCommand>,
        audio: &'a mut Vec<AudioCue>,
    ) -> Self {
        SceneContext {
            clock,
            input,
            settings,
            resources,
            screen,
            commands,
            audio,
        }
    }

    pub fn now(&self) -> Duration {
        self.clock.now
    }

    pub fn command(&mut self, command: StackCommand) {
        self.commands.push(command);
    }

    pub fn play(&mut self, cue: AudioCue) {
        self.audio.push(cue);
    }

    /// Plays a sound effect by file name; a missing file is logged and skipped
    pub fn play_sound(&mut self, name: &str) {
        match self.resources.load_sound(name) {
            Ok(sound) => self.audio.push(AudioCue::Sound(sound)),
            Err(err) => log::warn!("{}", err),
        }
    }

    /// Starts a music track by file name; a missing file is logged and skipped
    pub fn play_music(&mut self, name: &str) {
        match self.resources.load_music(name) {
            Ok(track) => self.audio.push(AudioCue::Music(track)),
            Err(err) => log::warn!("{}", err),
        }
    }
}

/// What a scene factory gets to build an instance
pub struct BuildContext<'a> {
    pub resources: &'a mut ResourceManager,
    pub settings: &'a Settings,
    pub screen: (u32, u32),
}

/// Builds a scene instance for a handle of the kind it was registered for
pub type SceneFactory = Box<dyn Fn(&SceneHandle, &mut BuildContext) -> Result<Box<dyn Scene>, GameError>>;

/// Capability trait every scene implements.
///
/// Only input handling, update and render are required; every lifecycle hook
/// defaults to doing nothing.
pub trait Scene {
    /// Became the top of the stack (pushed, or re-pushed from the cache)
    fn on_enter(&mut self, _ctx: &mut SceneContext) {}

    /// Removed from the stack
    fn on_exit(&mut self, _ctx: &mut SceneContext) {}

    /// Another scene was pushed on top
    fn on_pause(&mut self, _ctx: &mut SceneContext) {}

    /// The scene above was popped
    fn on_resume(&mut self, _ctx: &mut SceneContext) {}

    fn on_resolution_change(&mut self, _size: (u32, u32)) {}

    fn handle_event(&mut self, event: &InputEvent, ctx: &mut SceneContext);

    fn update(&mut self, ctx: &mut SceneContext);

    fn render(&self, painter: &mut dyn Painter) -> Result<(), String>;

    /// Translucent scenes are drawn over the scene below them
    fn is_translucent(&self) -> bool {
        false
    }

    /// State carried to the next scene on `Replace`
    fn player_snapshot(&self) -> Option<PlayerStateSnapshot> {
        None
    }

    fn apply_snapshot(&mut self, _snapshot: &PlayerStateSnapshot) {}
}


#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::input_system::Key;

    /// Owns everything a `SceneContext` borrows, for driving one scene by hand
    pub(crate) struct SceneHarness {
        pub clock: FrameClock,
        pub input: InputState,
        pub settings: Settings,
        pub resources: ResourceManager,
        pub screen: (u32, u32),
        pub commands: Vec<StackCommand>,
        pub audio: Vec<AudioCue>,
    }

    impl SceneHarness {
        pub fn new() -> Self {
            SceneHarness {
                clock: FrameClock::default(),
                input: InputState::new(),
                settings: Settings::default(),
                resources: ResourceManager::unchecked(),
                screen: (800, 600),
                commands: Vec::new(),
                audio: Vec::new(),
            }
        }

        pub fn build_context(&mut self) -> BuildContext<'_> {
            BuildContext {
                resources: &mut self.resources,
                settings: &self.settings,
                screen: self.screen,
            }
        }

        pub fn with_ctx<R>(&mut self, f: impl FnOnce(&mut SceneContext) -> R) -> R {
            let mut ctx = SceneContext::new(
                self.clock,
                &self.input,
                &self.settings,
                &mut self.resources,
                self.screen,
                &mut self.commands,
                &mut self.audio,
            );
            f(&mut ctx)
        }

        pub fn press(&mut self, scene: &mut dyn Scene, key: Key) {
            let event = InputEvent::KeyDown(key);
            self.input.apply(&event);
            self.with_ctx(|ctx| scene.handle_event(&event, ctx));
        }

        /// Names of the music tracks started so far
        pub fn music(&self) -> Vec<String> {
            self.audio
                .iter()
                .filter_map(|cue| match cue {
                    AudioCue::Music(track) => Some(track.name.clone()),
                    _ => None,
                })
                .collect()
        }

        pub fn take_commands(&mut self) -> Vec<StackCommand> {
            std::mem::take(&mut self.commands)
        }
    }
}
