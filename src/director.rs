//! Director: owner of the scene stack
//!
//! The director is the only component that creates or destroys scene
//! instances. Scenes ask for stack changes by queueing [`StackCommand`]s; the
//! director applies them in FIFO order at the end of the tick, calling the
//! lifecycle hooks (`on_enter`, `on_exit`, `on_pause`, `on_resume`) as scenes
//! come and go.
//!
//! Instances are keyed by [`SceneHandle`]. A popped scene stays cached and is
//! reused by the next push of the same handle; `replace`, `restart_current`
//! and `return_to_root` discard the instances they remove.
//!
//! # Example
//!
//! ```ignore
//! let mut director = Director::new(SceneHandle::menu(), resources, settings, (800, 600), Box::new(LogAudio::default()));
//! director.register(kinds::MENU, |_handle, ctx| Ok(Box::new(MainMenu::new("level_1", ctx))));
//! director.start()?;
//!
//! while director.is_running() {
//!     director.tick(&events, frame_time);
//!     director.render(&mut painter)?;
//! }
//! ```

use log::{debug, error, info, warn};
use std::collections::HashMap;
use std::time::Duration;

use crate::audio::{AudioCue, AudioSink};
use crate::config::{Resolution, Settings, SettingsStore};
use crate::error::{DirectorError, GameError};
use crate::input_system::{InputEvent, InputState};
use crate::render::Painter;
use crate::resources::ResourceManager;
use crate::scene::{BuildContext, FrameClock, Scene, SceneContext, SceneFactory, SceneHandle, StackCommand};

/// Commands queued while applying commands are processed in further rounds, up to this many
const MAX_COMMAND_ROUNDS: usize = 8;

/// Everything the director lends to scenes during a callback
struct Services {
    clock: FrameClock,
    input: InputState,
    settings: Settings,
    resources: ResourceManager,
    screen: (u32, u32),
    commands: Vec<StackCommand>,
    audio: Vec<AudioCue>,
}

impl Services {
    fn context(&mut self) -> SceneContext<'_> {
        SceneContext::new(
            self.clock,
            &self.input,
            &self.settings,
            &mut self.resources,
            self.screen,
            &mut self.commands,
            &mut self.audio,
        )
    }

    fn build_context(&mut self) -> BuildContext<'_> {
        BuildContext {
            resources: &mut self.resources,
            settings: &self.settings,
            screen: self.screen,
        }
    }
}

struct Entry {
    handle: SceneHandle,
    scene: Box<dyn Scene>,
}

pub struct Director {
    factories: HashMap<String, SceneFactory>,
    stack: Vec<Entry>,
    cache: HashMap<SceneHandle, Box<dyn Scene>>,
    services: Services,
    root: SceneHandle,
    store: Option<SettingsStore>,
    audio_sink: Box<dyn AudioSink>,
    desktop: (u32, u32),
    window_request: Option<Resolution>,
    running: bool,
}

impl Director {
    pub fn new(
        root: SceneHandle,
        resources: ResourceManager,
        settings: Settings,
        screen: (u32, u32),
        audio_sink: Box<dyn AudioSink>,
    ) -> Self {
        Director {
            factories: HashMap::new(),
            stack: Vec::new(),
            cache: HashMap::new(),
            services: Services {
                clock: FrameClock::default(),
                input: InputState::new(),
                settings,
                resources,
                screen,
                commands: Vec::new(),
                audio: Vec::new(),
            },
            root,
            store: None,
            audio_sink,
            desktop: (1920, 1080),
            window_request: None,
            running: false,
        }
    }

    /// Persists settings saved from the settings scene
    pub fn with_settings_store(mut self, store: SettingsStore) -> Self {
        self.store = Some(store);
        self
    }

    /// Size used for the fullscreen resolution
    pub fn set_desktop_size(&mut self, size: (u32, u32)) {
        self.desktop = size;
    }

    /// Registers the factory for a scene kind; re-registering replaces it.
    pub fn register<F>(&mut self, kind: &str, factory: F)
    where
        F: Fn(&SceneHandle, &mut BuildContext) -> Result<Box<dyn Scene>, GameError> + 'static,
    {
        if self.factories.insert(kind.to_string(), Box::new(factory)).is_some() {
            warn!("scene kind '{}' was already registered and has been replaced", kind);
        }
    }

    /// Pushes the root scene and starts the frame loop
    pub fn start(&mut self) -> Result<(), DirectorError> {
        let root = self.root.clone();
        self.push(root)?;
        self.running = true;
        self.flush_audio();
        Ok(())
    }

    //--- Queries -----------------------------------------------------------

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn top(&self) -> Option<&SceneHandle> {
        self.stack.last().map(|e| &e.handle)
    }

    pub fn stack_handles(&self) -> Vec<&SceneHandle> {
        self.stack.iter().map(|e| &e.handle).collect()
    }

    pub fn len(&self) -> usize {
        self.stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    pub fn is_cached(&self, handle: &SceneHandle) -> bool {
        self.cache.contains_key(handle)
    }

    pub fn settings(&self) -> &Settings {
        &self.services.settings
    }

    pub fn screen_size(&self) -> (u32, u32) {
        self.services.screen
    }

    pub fn now(&self) -> Duration {
        self.services.clock.now
    }

    /// Resolution the window should switch to, set when settings change it
    pub fn take_window_request(&mut self) -> Option<Resolution> {
        self.window_request.take()
    }

    //--- Stack operations ----------------------------------------------------

    fn build(&mut self, handle: &SceneHandle) -> Result<Box<dyn Scene>, DirectorError> {
        let factory = self
            .factories
            .get(handle.kind())
            .ok_or_else(|| DirectorError::UnregisteredScene(handle.kind().to_string()))?;
        let mut ctx = self.services.build_context();
        let scene = factory(handle, &mut ctx).map_err(|source| DirectorError::SceneBuild {
            handle: handle.clone(),
            source,
        })?;
        debug!("built scene {}", handle);
        Ok(scene)
    }

    /// Cached instance for `handle`, or a fresh one
    fn obtain(&mut self, handle: &SceneHandle) -> Result<Box<dyn Scene>, DirectorError> {
        match self.cache.remove(handle) {
            Some(scene) => {
                debug!("reusing cached scene {}", handle);
                Ok(scene)
            }
            None => self.build(handle),
        }
    }

    fn ensure_not_on_stack(&self, handle: &SceneHandle, entries: &[Entry]) -> Result<(), DirectorError> {
        if entries.iter().any(|e| &e.handle == handle) {
            return Err(DirectorError::AlreadyOnStack(handle.clone()));
        }
        Ok(())
    }

    /// Puts `scene` on top, pausing the previous top when `pause_below` is set
    fn enter(&mut self, handle: SceneHandle, mut scene: Box<dyn Scene>, pause_below: bool) {
        let mut ctx = self.services.context();
        if pause_below && let Some(top) = self.stack.last_mut() {
            top.scene.on_pause(&mut ctx);
        }
        scene.on_resolution_change(ctx.screen);
        scene.on_enter(&mut ctx);
        info!("enter {}", handle);
        self.stack.push(Entry { handle, scene });
    }

    /// Removes the top entry and calls its `on_exit`
    fn take_top(&mut self) -> Option<Entry> {
        let mut entry = self.stack.pop()?;
        entry.scene.on_exit(&mut self.services.context());
        info!("exit {}", entry.handle);
        Some(entry)
    }

    fn resume_top(&mut self) {
        let mut ctx = self.services.context();
        if let Some(top) = self.stack.last_mut() {
            top.scene.on_resume(&mut ctx);
        }
    }

    /// Pushes the scene for `handle`, reusing its cached instance if any.
    pub fn push(&mut self, handle: SceneHandle) -> Result<SceneHandle, DirectorError> {
        self.ensure_not_on_stack(&handle, &self.stack)?;
        let scene = self.obtain(&handle)?;
        self.enter(handle.clone(), scene, true);
        Ok(handle)
    }

    /// Pops the top scene into the cache and resumes the one below.
    ///
    /// The root scene is never popped.
    pub fn pop(&mut self) -> Result<SceneHandle, DirectorError> {
        match self.stack.len() {
            0 => return Err(DirectorError::EmptyStack),
            1 => return Err(DirectorError::RootPop),
            _ => {}
        }
        let entry = self.take_top().ok_or(DirectorError::EmptyStack)?;
        let handle = entry.handle.clone();
        self.cache.insert(entry.handle, entry.scene);
        self.resume_top();
        Ok(handle)
    }

    /// Swaps the top scene for `handle`, handing over the player snapshot.
    ///
    /// The incoming scene is built before anything is removed, so a failed
    /// build leaves the stack untouched. The outgoing instance is discarded.
    pub fn replace(&mut self, handle: SceneHandle) -> Result<SceneHandle, DirectorError> {
        let Some((_, below)) = self.stack.split_last() else {
            return Err(DirectorError::EmptyStack);
        };
        self.ensure_not_on_stack(&handle, below)?;

        let scene = self.obtain(&handle)?;
        let outgoing = self.take_top().ok_or(DirectorError::EmptyStack)?;
        let snapshot = outgoing.scene.player_snapshot();
        drop(outgoing);

        self.enter(handle.clone(), scene, false);
        if let (Some(snapshot), Some(top)) = (snapshot, self.stack.last_mut()) {
            debug!("carrying {:?} into {}", snapshot, handle);
            top.scene.apply_snapshot(&snapshot);
        }
        Ok(handle)
    }

    /// Replaces the top scene with a fresh instance of the same handle
    pub fn restart_current(&mut self) -> Result<SceneHandle, DirectorError> {
        let handle = self.top().cloned().ok_or(DirectorError::EmptyStack)?;
        self.cache.remove(&handle);
        let fresh = self.build(&handle)?;
        self.take_top();
        self.enter(handle.clone(), fresh, false);
        Ok(handle)
    }

    /// Pops and discards everything above the root scene
    pub fn return_to_root(&mut self) {
        if self.stack.len() <= 1 {
            return;
        }
        while self.stack.len() > 1 {
            self.take_top();
        }
        self.resume_top();
    }

    /// Drops a cached instance; returns whether one existed.
    pub fn discard(&mut self, handle: &SceneHandle) -> Result<bool, DirectorError> {
        self.ensure_not_on_stack(handle, &self.stack)?;
        Ok(self.cache.remove(handle).is_some())
    }

    /// Exits every scene top-down and stops the frame loop
    pub fn quit(&mut self) {
        while self.take_top().is_some() {}
        self.running = false;
        self.flush_audio();
        info!("director stopped");
    }

    /// Tells every scene on the stack and in the cache about a new screen size
    pub fn set_resolution(&mut self, size: (u32, u32)) {
        info!("resolution {}x{}", size.0, size.1);
        self.services.screen = size;
        for entry in &mut self.stack {
            entry.scene.on_resolution_change(size);
        }
        for scene in self.cache.values_mut() {
            scene.on_resolution_change(size);
        }
    }

    //--- Frame loop --------------------------------------------------------------

    /// One frame: dispatch events and update to the top scene, then apply
    /// queued stack commands and play queued audio.
    pub fn tick(&mut self, events: &[InputEvent], dt: Duration) {
        self.services.clock.advance(dt);

        for event in events {
            if *event == InputEvent::Quit {
                self.quit();
                return;
            }
            self.services.input.apply(event);
        }

        let mut ctx = self.services.context();
        if let Some(top) = self.stack.last_mut() {
            for event in events {
                top.scene.handle_event(event, &mut ctx);
            }
            top.scene.update(&mut ctx);
        }

        self.apply_commands();
        self.flush_audio();
    }

    fn apply_commands(&mut self) {
        for _ in 0..MAX_COMMAND_ROUNDS {
            if self.services.commands.is_empty() {
                return;
            }
            let batch: Vec<StackCommand> = self.services.commands.drain(..).collect();
            for command in batch {
                debug!("applying {:?}", command);
                if let Err(err) = self.apply(command) {
                    error!("scene stack command failed: {}", err);
                    self.services.commands.clear();
                    self.recover();
                    return;
                }
                if !self.running {
                    self.services.commands.clear();
                    return;
                }
            }
        }
        if !self.services.commands.is_empty() {
            warn!(
                "dropping {} scene commands queued during transitions",
                self.services.commands.len()
            );
            self.services.commands.clear();
        }
    }

    fn apply(&mut self, command: StackCommand) -> Result<(), DirectorError> {
        match command {
            StackCommand::Push(handle) => self.push(handle).map(|_| ()),
            StackCommand::Pop => self.pop().map(|_| ()),
            StackCommand::Replace(handle) => self.replace(handle).map(|_| ()),
            StackCommand::RestartCurrent => self.restart_current().map(|_| ()),
            StackCommand::ReturnToRoot => {
                self.return_to_root();
                Ok(())
            }
            StackCommand::Discard(handle) => self.discard(&handle).map(|_| ()),
            StackCommand::SaveSettings(settings) => {
                self.save_settings(settings);
                Ok(())
            }
            StackCommand::Quit => {
                self.quit();
                Ok(())
            }
        }
    }

    /// Clears the stack and pushes a fresh root scene.
    ///
    /// Panics if the root itself cannot be built: without it the game has no
    /// scene left to take input.
    fn recover(&mut self) {
        warn!("recovering to root scene {}", self.root);
        while self.take_top().is_some() {}
        let root = self.root.clone();
        self.cache.remove(&root);
        if let Err(err) = self.push(root) {
            panic!("cannot rebuild root scene {}: {}", self.root, err);
        }
    }

    fn save_settings(&mut self, settings: Settings) {
        let settings = settings.normalized();
        let resolution_changed = settings.resolution != self.services.settings.resolution;
        self.services.settings = settings;

        if let Some(store) = &self.store
            && let Err(err) = store.save(&self.services.settings)
        {
            error!("could not save settings: {}", err);
        }

        if resolution_changed {
            let resolution = self.services.settings.resolution;
            self.window_request = Some(resolution);
            self.set_resolution(resolution.size(self.desktop));
        }
    }

    fn flush_audio(&mut self) {
        let settings = &self.services.settings;
        for cue in self.services.audio.drain(..) {
            match cue {
                AudioCue::Sound(sound) => self.audio_sink.play_sound(&sound, settings.fx_volume),
                AudioCue::Music(track) => self.audio_sink.play_music(&track, settings.music_volume),
                AudioCue::StopMusic => self.audio_sink.stop_music(),
            }
        }
    }

    /// Renders the visible part of the stack bottom-up: the top scene and,
    /// while scenes are translucent, the ones beneath them.
    pub fn render(&self, painter: &mut dyn Painter) -> Result<(), String> {
        let Some(mut first) = self.stack.len().checked_sub(1) else {
            return Ok(());
        };
        while first > 0 && self.stack[first].scene.is_translucent() {
            first -= 1;
        }
        for entry in &self.stack[first..] {
            entry.scene.render(painter)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::LogAudio;
    use crate::player::PlayerStateSnapshot;
    use crate::render::{Color, DrawCall, RecordingPainter, ScreenRect};
    use crate::scene::kinds;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    type Log = Rc<RefCell<Vec<String>>>;
    type Outbox = Rc<RefCell<Vec<StackCommand>>>;

    /// Scene that records its lifecycle and sends whatever is in the outbox
    struct Probe {
        name: String,
        log: Log,
        outbox: Outbox,
        translucent: bool,
        color: u8,
    }

    impl Probe {
        fn note(&self, what: &str) {
            self.log.borrow_mut().push(format!("{} {}", what, self.name));
        }
    }

    impl Scene for Probe {
        fn on_enter(&mut self, _ctx: &mut SceneContext) {
            self.note("enter");
        }
        fn on_exit(&mut self, _ctx: &mut SceneContext) {
            self.note("exit");
        }
        fn on_pause(&mut self, _ctx: &mut SceneContext) {
            self.note("pause");
        }
        fn on_resume(&mut self, _ctx: &mut SceneContext) {
            self.note("resume");
        }
        fn on_resolution_change(&mut self, size: (u32, u32)) {
            self.log.borrow_mut().push(format!("resize {} {}x{}", self.name, size.0, size.1));
        }
        fn handle_event(&mut self, _event: &InputEvent, _ctx: &mut SceneContext) {}
        fn update(&mut self, ctx: &mut SceneContext) {
            for command in self.outbox.borrow_mut().drain(..) {
                ctx.command(command);
            }
        }
        fn render(&self, painter: &mut dyn Painter) -> Result<(), String> {
            painter.fill_rect(ScreenRect::new(0, 0, 1, 1), Color::rgb(self.color, 0, 0))
        }
        fn is_translucent(&self) -> bool {
            self.translucent
        }
        fn player_snapshot(&self) -> Option<PlayerStateSnapshot> {
            self.name.starts_with("phase").then_some(PlayerStateSnapshot {
                health: 3,
                max_health: 5,
                coins: 2,
            })
        }
        fn apply_snapshot(&mut self, snapshot: &PlayerStateSnapshot) {
            self.log
                .borrow_mut()
                .push(format!("snapshot {} coins={}", self.name, snapshot.coins));
        }
    }

    struct Harness {
        director: Director,
        log: Log,
        outbox: Outbox,
        builds: Rc<Cell<u32>>,
    }

    fn harness() -> Harness {
        let log: Log = Rc::new(RefCell::new(Vec::new()));
        let outbox: Outbox = Rc::new(RefCell::new(Vec::new()));
        let builds = Rc::new(Cell::new(0));
        let mut director = Director::new(
            SceneHandle::menu(),
            ResourceManager::unchecked(),
            Settings::default(),
            (800, 600),
            Box::new(LogAudio::default()),
        );

        let colors = [kinds::MENU, kinds::PAUSE, kinds::PHASE, kinds::SETTINGS, kinds::VICTORY];
        for (i, kind) in colors.iter().enumerate() {
            let (log, outbox, builds) = (log.clone(), outbox.clone(), builds.clone());
            director.register(kind, move |handle, _ctx| {
                builds.set(builds.get() + 1);
                Ok(Box::new(Probe {
                    name: handle.to_string(),
                    log: log.clone(),
                    outbox: outbox.clone(),
                    translucent: handle.kind() == kinds::PAUSE,
                    color: i as u8 + 1,
                }))
            });
        }
        director.start().unwrap();
        log.borrow_mut().clear();
        Harness {
            director,
            log,
            outbox,
            builds,
        }
    }

    fn tick(h: &mut Harness) {
        h.director.tick(&[], Duration::from_millis(16));
    }

    #[test]
    fn test_push_then_pop_restores_top_and_size() {
        let mut h = harness();
        h.director.push(SceneHandle::phase("level_1")).unwrap();
        h.director.push(SceneHandle::pause()).unwrap();
        assert_eq!(h.director.len(), 3);

        assert_eq!(h.director.pop().unwrap(), SceneHandle::pause());
        assert_eq!(h.director.len(), 2);
        assert_eq!(h.director.top(), Some(&SceneHandle::phase("level_1")));

        let log = h.log.borrow();
        assert_eq!(
            *log,
            vec![
                "pause menu",
                "resize phase:level_1 800x600",
                "enter phase:level_1",
                "pause phase:level_1",
                "resize pause 800x600",
                "enter pause",
                "exit pause",
                "resume phase:level_1",
            ]
            .into_iter()
            .map(String::from)
            .collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_root_never_pops() {
        let mut h = harness();
        assert!(matches!(h.director.pop(), Err(DirectorError::RootPop)));
        assert_eq!(h.director.len(), 1);
    }

    #[test]
    fn test_pop_on_empty_stack() {
        let mut director = Director::new(
            SceneHandle::menu(),
            ResourceManager::unchecked(),
            Settings::default(),
            (800, 600),
            Box::new(LogAudio::default()),
        );
        assert!(matches!(director.pop(), Err(DirectorError::EmptyStack)));
        assert!(matches!(director.replace(SceneHandle::menu()), Err(DirectorError::EmptyStack)));
    }

    #[test]
    fn test_push_errors() {
        let mut h = harness();
        assert!(matches!(
            h.director.push(SceneHandle::new("cutscene")),
            Err(DirectorError::UnregisteredScene(kind)) if kind == "cutscene"
        ));
        assert!(matches!(
            h.director.push(SceneHandle::menu()),
            Err(DirectorError::AlreadyOnStack(_))
        ));
    }

    #[test]
    fn test_popped_scene_is_cached_and_reused() {
        let mut h = harness();
        let before = h.builds.get();
        h.director.push(SceneHandle::settings()).unwrap();
        h.director.pop().unwrap();
        assert!(h.director.is_cached(&SceneHandle::settings()));

        h.director.push(SceneHandle::settings()).unwrap();
        assert_eq!(h.builds.get(), before + 1);
        assert!(!h.director.is_cached(&SceneHandle::settings()));
    }

    #[test]
    fn test_replace_carries_snapshot_and_discards_outgoing() {
        let mut h = harness();
        h.director.push(SceneHandle::phase("level_1")).unwrap();
        h.log.borrow_mut().clear();

        h.director.replace(SceneHandle::phase("level_2")).unwrap();
        assert_eq!(h.director.len(), 2);
        assert_eq!(h.director.top(), Some(&SceneHandle::phase("level_2")));
        assert!(!h.director.is_cached(&SceneHandle::phase("level_1")));

        let log = h.log.borrow();
        assert!(log.contains(&"exit phase:level_1".to_string()));
        assert_eq!(log.last(), Some(&"snapshot phase:level_2 coins=2".to_string()));
        // The menu below was already paused
        assert!(!log.iter().any(|l| l == "pause menu"));
    }

    #[test]
    fn test_restart_current_builds_fresh_instance() {
        let mut h = harness();
        h.director.push(SceneHandle::phase("level_1")).unwrap();
        let before = h.builds.get();
        h.director.restart_current().unwrap();
        assert_eq!(h.builds.get(), before + 1);
        assert_eq!(h.director.len(), 2);
        assert_eq!(h.director.top(), Some(&SceneHandle::phase("level_1")));
    }

    #[test]
    fn test_commands_apply_in_order_at_tick_end() {
        let mut h = harness();
        h.outbox.borrow_mut().extend([
            StackCommand::Push(SceneHandle::phase("level_1")),
            StackCommand::Push(SceneHandle::pause()),
        ]);
        tick(&mut h);
        assert_eq!(
            h.director.stack_handles(),
            vec![&SceneHandle::menu(), &SceneHandle::phase("level_1"), &SceneHandle::pause()]
        );

        h.outbox
            .borrow_mut()
            .extend([StackCommand::Pop, StackCommand::RestartCurrent]);
        tick(&mut h);
        assert_eq!(h.director.len(), 2);

        h.outbox.borrow_mut().push(StackCommand::ReturnToRoot);
        tick(&mut h);
        assert_eq!(h.director.stack_handles(), vec![&SceneHandle::menu()]);
    }

    #[test]
    fn test_failed_command_recovers_to_root() {
        let mut h = harness();
        h.director.push(SceneHandle::phase("level_1")).unwrap();
        h.outbox.borrow_mut().extend([
            StackCommand::Push(SceneHandle::new("missing")),
            StackCommand::Push(SceneHandle::pause()),
        ]);
        tick(&mut h);
        assert_eq!(h.director.stack_handles(), vec![&SceneHandle::menu()]);
        assert!(h.director.is_running());
    }

    #[test]
    fn test_render_translucent_slice() {
        let mut h = harness();
        h.director.push(SceneHandle::phase("level_1")).unwrap();
        let mut painter = RecordingPainter::new(800, 600);
        h.director.render(&mut painter).unwrap();
        // Only the opaque phase
        assert_eq!(painter.calls.len(), 1);

        h.director.push(SceneHandle::pause()).unwrap();
        painter.clear();
        h.director.render(&mut painter).unwrap();
        assert_eq!(
            painter.calls,
            vec![
                DrawCall::Fill(ScreenRect::new(0, 0, 1, 1), Color::rgb(3, 0, 0)),
                DrawCall::Fill(ScreenRect::new(0, 0, 1, 1), Color::rgb(2, 0, 0)),
            ]
        );
    }

    #[test]
    fn test_quit_clears_stack() {
        let mut h = harness();
        h.director.push(SceneHandle::phase("level_1")).unwrap();
        h.log.borrow_mut().clear();
        h.director.tick(&[InputEvent::Quit], Duration::from_millis(16));

        assert!(h.director.is_empty());
        assert!(!h.director.is_running());
        assert_eq!(*h.log.borrow(), vec!["exit phase:level_1".to_string(), "exit menu".to_string()]);
    }

    #[test]
    fn test_save_settings_broadcasts_resolution() {
        let mut h = harness();
        h.director.push(SceneHandle::settings()).unwrap();
        h.log.borrow_mut().clear();

        let settings = Settings {
            resolution: Resolution::Windowed(1280, 720),
            ..Settings::default()
        };
        h.outbox
            .borrow_mut()
            .extend([StackCommand::SaveSettings(settings.clone()), StackCommand::Pop]);
        tick(&mut h);

        assert_eq!(h.director.settings(), &settings);
        assert_eq!(h.director.screen_size(), (1280, 720));
        assert_eq!(h.director.take_window_request(), Some(Resolution::Windowed(1280, 720)));
        assert!(h.log.borrow().contains(&"resize menu 1280x720".to_string()));
        assert_eq!(h.director.len(), 1);
    }

    #[test]
    fn test_discard_cached_instance() {
        let mut h = harness();
        h.director.push(SceneHandle::settings()).unwrap();
        assert!(matches!(
            h.director.discard(&SceneHandle::settings()),
            Err(DirectorError::AlreadyOnStack(_))
        ));
        h.director.pop().unwrap();
        assert!(h.director.discard(&SceneHandle::settings()).unwrap());
        assert!(!h.director.discard(&SceneHandle::settings()).unwrap());
    }
}
