use super::*;
use crate::audio::AudioCue;
use crate::collision::{CONTACT_EPSILON, aabb_intersect};
use crate::config::Settings;
use crate::input_system::{InputState, Key};
use crate::geometry::Vec2;
use crate::render::{Color, DrawCall, RecordingPainter, ScreenRect};
use crate::resources::ResourceManager;
use crate::scene::FrameClock;

/// A phase plus the services the director would lend it
struct World {
    phase: Phase,
    clock: FrameClock,
    input: InputState,
    settings: Settings,
    resources: ResourceManager,
    commands: Vec<StackCommand>,
    audio: Vec<AudioCue>,
}

impl World {
    fn new(config_json: &str) -> Self {
        World::with_level(config_json, TileLevel::walled(640, 480))
    }

    fn with_level(config_json: &str, level: TileLevel) -> Self {
        let config: LevelConfig = serde_json::from_str(config_json).unwrap();
        let phase = Phase::new(
            "level_1",
            &config,
            Box::new(level),
            &StatTable::default(),
            PhaseAssets::placeholder(),
            (800, 600),
        )
        .unwrap();

        let mut world = World {
            phase,
            clock: FrameClock::default(),
            input: InputState::new(),
            settings: Settings::default(),
            resources: ResourceManager::unchecked(),
            commands: Vec::new(),
            audio: Vec::new(),
        };
        world.with_ctx(|phase, ctx| phase.on_enter(ctx));
        world
    }

    fn with_ctx<R>(&mut self, f: impl FnOnce(&mut Phase, &mut SceneContext) -> R) -> R {
        let mut ctx = SceneContext::new(
            self.clock,
            &self.input,
            &self.settings,
            &mut self.resources,
            (800, 600),
            &mut self.commands,
            &mut self.audio,
        );
        f(&mut self.phase, &mut ctx)
    }

    fn tick(&mut self, millis: u64) {
        self.clock.advance(Duration::from_millis(millis));
        self.with_ctx(|phase, ctx| phase.update(ctx));
    }

    fn run(&mut self, total_ms: u64, step_ms: u64) {
        for _ in 0..(total_ms / step_ms) {
            self.tick(step_ms);
        }
    }

    fn press(&mut self, key: Key) {
        let event = InputEvent::KeyDown(key);
        self.input.apply(&event);
        self.with_ctx(|phase, ctx| phase.handle_event(&event, ctx));
    }

    fn skip_countdown(&mut self) {
        self.run(3000, 100);
        assert_eq!(self.phase.state(), PhaseState::Active);
    }

    fn health(&self) -> i32 {
        self.phase.player().health().current()
    }

    fn sounds(&self) -> Vec<String> {
        self.audio
            .iter()
            .filter_map(|cue| match cue {
                AudioCue::Sound(sound) => Some(sound.name.clone()),
                _ => None,
            })
            .collect()
    }
}

const SCENARIO: &str = r#"{
    "level_file": "level_1.ldtk",
    "player_start": [100, 100],
    "enemies": { "types": ["Rat"], "positions": [[200, 100]] },
    "coins": { "positions": [[50, 50]] },
    "coins_required": 1,
    "next_level": "level_2"
}"#;

/// A rat whose body overlaps the player's by 60% along X
const OVERLAPPING_RAT: &str = r#"{
    "level_file": "level_1.ldtk",
    "player_start": [100, 100],
    "enemies": { "types": ["Rat"], "positions": [[109.6, 100]] },
    "coins": { "positions": [[500, 400]] }
}"#;

#[test]
fn test_countdown_freezes_everything() {
    let mut world = World::new(OVERLAPPING_RAT);
    world.press(Key::Right);
    world.press(Key::Space);
    world.run(2900, 100);

    assert!(matches!(world.phase.state(), PhaseState::Countdown { .. }));
    assert_eq!(world.phase.player().character.center(), Vec2::new(100.0, 100.0));
    assert!(!world.phase.player().character.is_attacking());
    let rat = world.phase.enemies()[0].character.center();
    assert!((rat.x - 109.6).abs() < 0.01 && (rat.y - 100.0).abs() < 0.01);
    assert_eq!(world.health(), 5);

    world.tick(100);
    assert_eq!(world.phase.state(), PhaseState::Active);
}

#[test]
fn test_walk_into_coin_wins_once() {
    let mut world = World::new(SCENARIO);
    world.skip_countdown();

    world.press(Key::Up);
    world.press(Key::Left);
    for _ in 0..10 {
        world.tick(16);
    }

    assert_eq!(world.phase.player().coins_this_level(), 1);
    assert_eq!(world.health(), 5);
    assert_eq!(
        world.commands,
        vec![StackCommand::Replace(SceneHandle::phase("level_2"))]
    );
    assert_eq!(world.phase.state(), PhaseState::Won);
    assert_eq!(world.sounds(), vec!["objeto.mp3".to_string()]);

    world.run(500, 16);
    assert_eq!(world.commands.len(), 1);
}

#[test]
fn test_last_level_goes_to_victory() {
    let mut world = World::new(
        r#"{
            "level_file": "level_3.ldtk",
            "player_start": [100, 100],
            "coins": { "positions": [[90, 90]] }
        }"#,
    );
    world.skip_countdown();
    world.tick(16);
    assert_eq!(world.commands, vec![StackCommand::Replace(SceneHandle::victory())]);
}

#[test]
fn test_contact_damage_once_per_cooldown() {
    let mut world = World::new(OVERLAPPING_RAT);
    world.skip_countdown();

    for _ in 0..5 {
        world.tick(16);
    }
    assert_eq!(world.health(), 4);

    // Cooldown over and hurt clip finished: the rat bites again
    world.run(1000, 10);
    assert_eq!(world.health(), 3);
}

#[test]
fn test_pursuing_enemies_reach_a_standing_player() {
    let mut world = World::new(
        r#"{
            "level_file": "level_1.ldtk",
            "player_start": [100, 100],
            "enemies": { "types": ["Rat", "Alien"], "positions": [[200, 100], [100, 220]] },
            "coins": { "positions": [[500, 400]] }
        }"#,
    );
    world.skip_countdown();

    world.run(1000, 16);
    assert_eq!(world.health(), 5);

    // Rat needs ~1.6s to close in, the alien ~1.3s
    world.run(2000, 16);
    assert!(world.health() < 5, "never bitten");
}

#[test]
fn test_enemies_block_each_other_without_snapping() {
    let mut world = World::new(
        r#"{
            "level_file": "level_1.ldtk",
            "player_start": [100, 100],
            "enemies": { "types": ["Rat", "Rat"], "positions": [[160, 100], [200, 118]] },
            "coins": { "positions": [[500, 400]] }
        }"#,
    );
    world.skip_countdown();

    let step = 60.0 * 0.016 + 1e-3;
    let mut last = world.phase.enemies()[1].character.center();
    for _ in 0..150 {
        world.tick(16);
        let front = world.phase.enemies()[0].character.body();
        let back = world.phase.enemies()[1].character.body();

        assert!(!aabb_intersect(&front.scaled_about_center(0.99), &back), "{:?} inside {:?}", back, front);
        let now = back.center();
        assert!(now.distance(last) <= step, "jumped from {:?} to {:?}", last, now);
        last = now;
    }

    // The rear rat is still pushing, flush against the front one
    let front = world.phase.enemies()[0].character.body();
    let back = &world.phase.enemies()[1].character;
    assert!((back.body().left() - front.right()).abs() <= CONTACT_EPSILON);
    assert!(!back.velocity().is_zero());
}

#[test]
fn test_shield_blocks_contact_damage() {
    let mut world = World::new(OVERLAPPING_RAT);
    world.skip_countdown();
    world.press(Key::E);
    world.run(2000, 10);
    assert_eq!(world.health(), 5);
    assert!(!world.phase.player().character.is_hurt());
}

#[test]
fn test_melee_hits_each_enemy_once_per_attack() {
    let mut world = World::new(
        r#"{
            "level_file": "level_1.ldtk",
            "player_start": [100, 100],
            "enemies": { "types": ["Rat", "Rat"], "positions": [[90, 128], [114, 128]] },
            "coins": { "positions": [[500, 400]] }
        }"#,
    );
    world.skip_countdown();
    world.press(Key::E);

    world.press(Key::Space);
    world.run(300, 10);
    assert!(!world.phase.player().character.is_attacking());
    let health: Vec<i32> = world
        .phase
        .enemies()
        .iter()
        .map(|e| e.character.health().current())
        .collect();
    assert_eq!(health, vec![1, 1]);

    // Second swing kills both; they stay until the death clip has played
    world.press(Key::Space);
    world.run(100, 10);
    assert_eq!(world.phase.enemies().len(), 2);
    assert!(world.phase.enemies().iter().all(|e| e.character.health().current() == 0));

    world.run(1000, 10);
    assert!(world.phase.enemies().is_empty());
}

#[test]
fn test_player_death_goes_to_game_over_after_animation() {
    let mut world = World::new(OVERLAPPING_RAT);
    world.phase.apply_snapshot(&PlayerStateSnapshot {
        health: 1,
        max_health: 5,
        coins: 0,
    });
    world.skip_countdown();

    world.tick(10);
    assert_eq!(world.health(), 0);
    assert!(world.commands.is_empty());

    // hurt clip (480ms) then death clip (900ms)
    world.run(1300, 10);
    assert!(world.commands.is_empty());
    world.run(200, 10);
    assert_eq!(
        world.commands,
        vec![StackCommand::Replace(SceneHandle::game_over("level_1"))]
    );
    assert_eq!(world.phase.state(), PhaseState::Lost);

    world.run(500, 10);
    assert_eq!(world.commands.len(), 1);
}

#[test]
fn test_turret_bullet_damages_player() {
    let mut world = World::new(
        r#"{
            "level_file": "level_1.ldtk",
            "player_start": [100, 100],
            "turrets": { "positions": [[300, 100]] },
            "coins": { "positions": [[500, 400]] }
        }"#,
    );
    world.skip_countdown();
    world.tick(10);
    assert_eq!(world.phase.bullets().len(), 1);

    world.run(1000, 10);
    assert_eq!(world.health(), 4);
    assert!(world.phase.bullets().is_empty());
}

#[test]
fn test_tortilla_heals_once() {
    let mut world = World::new(
        r#"{
            "level_file": "level_1.ldtk",
            "player_start": [100, 100],
            "tortillas": { "positions": [[90, 90]] },
            "coins": { "positions": [[500, 400]] }
        }"#,
    );
    world.phase.apply_snapshot(&PlayerStateSnapshot {
        health: 3,
        max_health: 5,
        coins: 4,
    });
    world.skip_countdown();
    world.run(100, 10);

    assert_eq!(world.health(), 4);
    assert_eq!(world.phase.pickups().len(), 1);
    assert_eq!(world.sounds(), vec!["glup.mp3".to_string()]);
}

#[test]
fn test_escape_pauses_and_resume_restarts_countdown() {
    let mut world = World::new(SCENARIO);
    world.skip_countdown();

    world.press(Key::Escape);
    assert_eq!(world.commands, vec![StackCommand::Push(SceneHandle::pause())]);

    world.clock.advance(Duration::from_millis(5000));
    world.with_ctx(|phase, ctx| phase.on_resume(ctx));
    assert_eq!(
        world.phase.state(),
        PhaseState::Countdown {
            started: Duration::from_millis(8000)
        }
    );
}

#[test]
fn test_snapshot_round_trip_through_phase() {
    let mut world = World::new(SCENARIO);
    world.phase.apply_snapshot(&PlayerStateSnapshot {
        health: 2,
        max_health: 5,
        coins: 6,
    });
    let snapshot = world.phase.player_snapshot().unwrap();
    assert_eq!(snapshot.health, 2);
    assert_eq!(snapshot.coins, 6);
    assert_eq!(world.phase.player().coins_this_level(), 0);
}

#[test]
fn test_mismatched_enemy_config_fails_construction() {
    let config: LevelConfig = serde_json::from_str(
        r#"{
            "level_file": "level_1.ldtk",
            "player_start": [100, 100],
            "enemies": { "types": ["Rat", "Ghost"], "positions": [[200, 100]] }
        }"#,
    )
    .unwrap();
    let result = Phase::new(
        "level_1",
        &config,
        Box::new(TileLevel::walled(640, 480)),
        &StatTable::default(),
        PhaseAssets::placeholder(),
        (800, 600),
    );
    assert!(matches!(
        result,
        Err(ConfigError::ConfigMismatch { types: 2, positions: 1, .. })
    ));
}

#[test]
fn test_unreachable_coin_threshold_fails_construction() {
    let config: LevelConfig = serde_json::from_str(
        r#"{
            "level_file": "level_1.ldtk",
            "player_start": [100, 100],
            "coins": { "positions": [[50, 50]] },
            "coins_required": 2
        }"#,
    )
    .unwrap();
    let result = Phase::new(
        "level_1",
        &config,
        Box::new(TileLevel::walled(640, 480)),
        &StatTable::default(),
        PhaseAssets::placeholder(),
        (800, 600),
    );
    assert!(matches!(
        result,
        Err(ConfigError::UnreachableThreshold { required: 2, placed: 1, .. })
    ));
}

#[test]
fn test_player_blocked_by_wall() {
    let mut world = World::new(
        r#"{
            "level_file": "level_1.ldtk",
            "player_start": [30, 100],
            "coins": { "positions": [[500, 400]] }
        }"#,
    );
    world.skip_countdown();
    world.press(Key::Left);
    world.run(500, 10);

    // Left wall is one tile wide
    assert_eq!(world.phase.player().character.body().left(), 16.0);
}

#[test]
fn test_camera_follows_player_within_level() {
    let mut world = World::with_level(
        r#"{
            "level_file": "big.ldtk",
            "player_start": [1000, 1000],
            "coins": { "positions": [[100, 100]] }
        }"#,
        TileLevel::walled(2000, 2000),
    );
    assert_eq!(world.phase.camera().view().x, 600.0);
    assert_eq!(world.phase.camera().view().y, 700.0);

    world.skip_countdown();
    world.press(Key::Right);
    world.run(1000, 10);
    let view = world.phase.camera().view();
    let player = world.phase.player().character.center();
    assert!((view.x + 400.0 - player.x).abs() < 0.01);
}

#[test]
fn test_render_draws_hud_and_countdown() {
    let mut world = World::new(SCENARIO);
    world.tick(1500);
    let mut painter = RecordingPainter::new(800, 600);
    world.phase.render(&mut painter).unwrap();

    // Per-row spans of the half-open reveal
    assert!(painter.count_fills(Color::BLACK) > 100);
    // Player health bar
    assert!(painter.count_fills(Color::GREEN) >= 1);
}

fn covers(rect: &ScreenRect, (x, y): (i32, i32)) -> bool {
    x >= rect.x && x < rect.x + rect.w as i32 && y >= rect.y && y < rect.y + rect.h as i32
}

#[test]
fn test_reveal_leaves_circle_open() {
    let mut painter = RecordingPainter::new(200, 100);
    super::rendering::draw_reveal(&mut painter, (200, 100), (100, 50), 20).unwrap();

    let fills: Vec<ScreenRect> = painter
        .calls
        .iter()
        .filter_map(|call| match call {
            DrawCall::Fill(rect, _) => Some(*rect),
            _ => None,
        })
        .collect();

    for inside in [(100, 50), (115, 50), (100, 35), (88, 62)] {
        assert!(!fills.iter().any(|r| covers(r, inside)), "{:?} covered", inside);
    }
    for outside in [(0, 0), (199, 99), (125, 50), (100, 75)] {
        assert!(fills.iter().any(|r| covers(r, outside)), "{:?} open", outside);
    }
}

#[test]
fn test_reveal_with_zero_radius_covers_screen() {
    let mut painter = RecordingPainter::new(40, 30);
    super::rendering::draw_reveal(&mut painter, (40, 30), (20, 15), 0).unwrap();
    let covered: u32 = painter
        .calls
        .iter()
        .map(|call| match call {
            DrawCall::Fill(rect, _) => rect.w * rect.h,
            _ => 0,
        })
        .sum();
    // Only the single centre pixel stays open
    assert_eq!(covered, 40 * 30 - 1);
}
