//! Phase: one playable level
//!
//! A phase owns everything alive in a level: the player, enemies, turrets,
//! bullets and pickups, plus the camera and overlays that look at them.
//!
//! # Lifecycle
//!
//! ```text
//! on_enter / on_resume ──> Countdown (3 s, nothing moves)
//!                              │
//!                              v
//!                           Active ──coins reach threshold──> Won  ─> replace(next phase | victory)
//!                              └────player death played────> Lost ─> replace(game_over)
//! ```
//!
//! The end of a level is never handled here: the phase queues exactly one
//! stack command and the director carries it out.
//!
//! # Module layout
//!
//! - `assets.rs`: sprites loaded at construction
//! - `update.rs`: the per-tick simulation
//! - `rendering.rs`: world, overlays and the countdown reveal

mod assets;
mod rendering;
mod update;

pub use assets::PhaseAssets;

use log::info;
use std::rc::Rc;
use std::time::Duration;

use crate::camera::Camera;
use crate::combat::{EntityId, MeleeTracker};
use crate::config::{LevelCatalog, LevelConfig, StatTable};
use crate::director::Director;
use crate::enemy::Enemy;
use crate::error::{ConfigError, GameError};
use crate::input_system::{GameAction, InputContext, InputEvent, InputSystem};
use crate::items::{Pickup, PickupKind};
use crate::level::{LevelGeometry, TileLevel};
use crate::player::{Player, PlayerStateSnapshot};
use crate::render::Painter;
use crate::scene::{BuildContext, Scene, SceneContext, SceneHandle, StackCommand, kinds};
use crate::turret::{Bullet, Turret};
use crate::ui::{HealthBar, Hud, Minimap};

/// Registers the `phase:<level id>` factory
pub fn register(director: &mut Director, catalog: Rc<LevelCatalog>, stats: Rc<StatTable>) {
    director.register(kinds::PHASE, move |handle, ctx| {
        let level = handle
            .instance()
            .ok_or_else(|| ConfigError::UnknownLevel(handle.to_string()))?;
        Ok(Box::new(Phase::load(level, &catalog, &stats, ctx)?))
    });
}

/// Immobilizing grace period after entering or resuming a level
pub const COUNTDOWN: Duration = Duration::from_millis(3000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseState {
    Countdown { started: Duration },
    Active,
    Won,
    Lost,
}

pub struct Phase {
    level_id: String,
    next_level: Option<String>,
    music: Option<String>,
    coins_required: u32,
    level: Box<dyn LevelGeometry>,
    player: Player,
    enemies: Vec<Enemy>,
    turrets: Vec<Turret>,
    bullets: Vec<Bullet>,
    pickups: Vec<Pickup>,
    melee: MeleeTracker,
    camera: Camera,
    hud: Hud,
    minimap: Minimap,
    enemy_bar: HealthBar,
    state: PhaseState,
    /// Clock value of the latest callback, used when drawing timers
    now: Duration,
}

impl Phase {
    /// Builds the phase for `level_id` from the catalog, loading its LDtk file
    /// and sprites.
    pub fn load(
        level_id: &str,
        catalog: &LevelCatalog,
        stats: &StatTable,
        ctx: &mut BuildContext,
    ) -> Result<Self, GameError> {
        let config = catalog.get(level_id)?;
        let spawns = config.enemy_spawns(level_id)?;
        let level = TileLevel::load(&config.level_file, ctx.resources)?;

        let kinds: Vec<_> = spawns.iter().map(|(kind, _)| *kind).collect();
        let assets = PhaseAssets::load(ctx.resources, stats, &kinds, !config.turrets.positions.is_empty())?;

        Ok(Phase::new(level_id, config, Box::new(level), stats, assets, ctx.screen)?)
    }

    /// Builds a phase from an already loaded level
    pub fn new(
        level_id: &str,
        config: &LevelConfig,
        level: Box<dyn LevelGeometry>,
        stats: &StatTable,
        mut assets: PhaseAssets,
        screen: (u32, u32),
    ) -> Result<Self, ConfigError> {
        let spawns = config.enemy_spawns(level_id)?;
        config.check_coin_threshold(level_id)?;
        let mut next_id = 1u32;
        let mut allocate = move || {
            let id = EntityId(next_id);
            next_id += 1;
            id
        };

        let player = Player::new(&stats.player, config.player_start(), &assets.player);

        let enemies = spawns
            .into_iter()
            .map(|(kind, center)| {
                Ok(Enemy::new(allocate(), kind, stats.enemy(kind)?, center, assets.enemy(kind)))
            })
            .collect::<Result<Vec<Enemy>, ConfigError>>()?;

        let turrets: Vec<Turret> = config
            .turrets
            .points()
            .map(|center| {
                let turret = Turret::new(allocate(), center, &stats.turret);
                match &assets.turret {
                    Some((base, bullet)) => turret.with_images(Rc::clone(base), Rc::clone(bullet)),
                    None => turret,
                }
            })
            .collect();

        let mut pickups = Vec::new();
        for (kind, positions) in [(PickupKind::Coin, &config.coins), (PickupKind::Tortilla, &config.tortillas)] {
            for position in positions.points() {
                let pickup = Pickup::new(allocate(), kind, position);
                pickups.push(match assets.pickups.get(&kind) {
                    Some(image) => pickup.with_image(Rc::clone(image)),
                    None => pickup,
                });
            }
        }

        let mut camera = Camera::new(level.width(), level.height(), screen.0, screen.1);
        camera.update(player.character.center());
        let minimap = Minimap::new(level.width(), level.height(), level.collision_rects(), screen);

        info!(
            "phase {} built: {} enemies, {} turrets, {} pickups, {} coins to win",
            level_id,
            enemies.len(),
            turrets.len(),
            pickups.len(),
            config.coin_threshold()
        );

        Ok(Phase {
            level_id: level_id.to_string(),
            next_level: config.next_level.clone(),
            music: config.music.clone(),
            coins_required: config.coin_threshold(),
            level,
            player,
            enemies,
            turrets,
            bullets: Vec::new(),
            pickups,
            melee: MeleeTracker::new(),
            camera,
            hud: Hud::new(),
            minimap,
            enemy_bar: HealthBar::new(),
            state: PhaseState::Countdown {
                started: Duration::ZERO,
            },
            now: Duration::ZERO,
        })
    }

    pub fn level_id(&self) -> &str {
        &self.level_id
    }

    pub fn state(&self) -> PhaseState {
        self.state
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut Player {
        &mut self.player
    }

    pub fn enemies(&self) -> &[Enemy] {
        &self.enemies
    }

    pub fn enemies_mut(&mut self) -> &mut [Enemy] {
        &mut self.enemies
    }

    pub fn bullets(&self) -> &[Bullet] {
        &self.bullets
    }

    pub fn pickups(&self) -> &[Pickup] {
        &self.pickups
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn coins_required(&self) -> u32 {
        self.coins_required
    }

    fn start_countdown(&mut self, now: Duration) {
        self.now = now;
        self.state = PhaseState::Countdown { started: now };
    }

    fn is_finished(&self) -> bool {
        matches!(self.state, PhaseState::Won | PhaseState::Lost)
    }

    /// Queues the single end-of-level transition
    fn finish(&mut self, state: PhaseState, ctx: &mut SceneContext) {
        self.state = state;
        let target = match state {
            PhaseState::Lost => SceneHandle::game_over(&self.level_id),
            _ => match &self.next_level {
                Some(next) => SceneHandle::phase(next),
                None => SceneHandle::victory(),
            },
        };
        info!("phase {} ends {:?}, next {}", self.level_id, state, target);
        ctx.command(StackCommand::Replace(target));
    }
}

impl Scene for Phase {
    fn on_enter(&mut self, ctx: &mut SceneContext) {
        self.start_countdown(ctx.now());
        self.camera.update(self.player.character.center());
        if let Some(track) = self.music.clone() {
            ctx.play_music(&track);
        }
    }

    fn on_resume(&mut self, ctx: &mut SceneContext) {
        if !self.is_finished() {
            self.start_countdown(ctx.now());
        }
    }

    fn on_resolution_change(&mut self, size: (u32, u32)) {
        self.camera.resize(size.0, size.1);
        self.camera.update(self.player.character.center());
        self.minimap.set_screen_size(size.0, size.1);
    }

    fn handle_event(&mut self, event: &InputEvent, ctx: &mut SceneContext) {
        if self.is_finished() {
            return;
        }
        let now = ctx.now();
        match InputSystem::translate(event, InputContext::Playing) {
            Some(GameAction::Pause) => ctx.command(StackCommand::Push(SceneHandle::pause())),
            Some(GameAction::ToggleMinimap) => {
                self.minimap.toggle(now);
            }
            Some(GameAction::Attack) if self.state == PhaseState::Active => {
                self.player.character.start_attack();
            }
            Some(GameAction::ActivateShield) if self.state == PhaseState::Active => {
                self.player.activate_shield(now);
            }
            _ => {}
        }
    }

    fn update(&mut self, ctx: &mut SceneContext) {
        self.now = ctx.now();
        match self.state {
            PhaseState::Countdown { started } => {
                if self.now.saturating_sub(started) >= COUNTDOWN {
                    info!("phase {} active", self.level_id);
                    self.state = PhaseState::Active;
                }
            }
            PhaseState::Active => self.step(ctx),
            PhaseState::Won | PhaseState::Lost => {}
        }
    }

    fn render(&self, painter: &mut dyn Painter) -> Result<(), String> {
        self.draw(painter)
    }

    fn player_snapshot(&self) -> Option<PlayerStateSnapshot> {
        Some(self.player.snapshot())
    }

    fn apply_snapshot(&mut self, snapshot: &PlayerStateSnapshot) {
        self.player.apply_snapshot(snapshot);
    }
}

#[cfg(test)]
mod tests;
