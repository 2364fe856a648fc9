//! Stat table for every character kind.
//!
//! Enemies are not separate types: one `Character` record carries a kind tag
//! and a copy of the stats for that kind. The built-in table can be overridden
//! per kind from `entities.json`.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use super::read_json;
use crate::error::ConfigError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyKind {
    Rat,
    Alien,
    Ghost,
}

impl EnemyKind {
    pub const ALL: [EnemyKind; 3] = [EnemyKind::Rat, EnemyKind::Alien, EnemyKind::Ghost];

    /// Parses the tag used in level files (`"rat"`, `"Rat"`, ...)
    pub fn from_tag(tag: &str) -> Option<EnemyKind> {
        EnemyKind::ALL
            .into_iter()
            .find(|kind| kind.tag().eq_ignore_ascii_case(tag))
    }

    pub fn tag(&self) -> &'static str {
        match self {
            EnemyKind::Rat => "rat",
            EnemyKind::Alien => "alien",
            EnemyKind::Ghost => "ghost",
        }
    }
}

/// Stats shared by the player and every enemy kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterStats {
    /// Movement speed in pixels per second
    pub speed: f32,
    pub max_health: i32,
    /// Damage dealt per hit (melee for the player, contact for enemies)
    pub damage: i32,
    /// Directory under `sprites/` holding walk.png, slash.png, hurt.png
    pub sprite_prefix: String,
    /// Collision box size
    pub body_size: [f32; 2],
    /// On-screen sprite size
    pub draw_size: [f32; 2],
    /// Minimum time between two contact hits from the same enemy
    #[serde(default = "default_contact_cooldown_ms")]
    pub contact_cooldown_ms: u64,
    /// Side length of the melee hitbox in front of the character
    #[serde(default = "default_attack_range")]
    pub attack_range: f32,
}

fn default_contact_cooldown_ms() -> u64 {
    1000
}

fn default_attack_range() -> f32 {
    32.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurretStats {
    pub fire_interval_ms: u64,
    /// Turrets only fire while the player is closer than this
    pub range: f32,
    pub bullet_speed: f32,
    pub bullet_max_distance: f32,
    pub bullet_damage: i32,
    pub bullet_hit_radius: f32,
    pub body_size: [f32; 2],
    pub image: String,
    pub bullet_image: String,
}

impl Default for TurretStats {
    fn default() -> Self {
        TurretStats {
            fire_interval_ms: 1500,
            range: 350.0,
            bullet_speed: 240.0,
            bullet_max_distance: 400.0,
            bullet_damage: 1,
            bullet_hit_radius: 16.0,
            body_size: [32.0, 32.0],
            image: "turret/turret.png".to_string(),
            bullet_image: "turret/bullet.png".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatTable {
    pub player: CharacterStats,
    pub enemies: HashMap<EnemyKind, CharacterStats>,
    #[serde(default)]
    pub turret: TurretStats,
}

impl Default for StatTable {
    fn default() -> Self {
        let enemy = |speed, max_health, prefix: &str, size: f32| CharacterStats {
            speed,
            max_health,
            damage: 1,
            sprite_prefix: prefix.to_string(),
            body_size: [size, size],
            draw_size: [size * 2.0, size * 2.0],
            contact_cooldown_ms: default_contact_cooldown_ms(),
            attack_range: default_attack_range(),
        };

        let mut enemies = HashMap::new();
        enemies.insert(EnemyKind::Rat, enemy(60.0, 2, "enemies/enemy_rat", 24.0));
        enemies.insert(EnemyKind::Alien, enemy(90.0, 3, "enemies/enemy_alien", 28.0));
        enemies.insert(EnemyKind::Ghost, enemy(45.0, 4, "enemies/enemy_ghost", 28.0));

        StatTable {
            player: CharacterStats {
                speed: 180.0,
                max_health: 5,
                damage: 1,
                sprite_prefix: "player".to_string(),
                body_size: [24.0, 24.0],
                draw_size: [64.0, 64.0],
                contact_cooldown_ms: default_contact_cooldown_ms(),
                attack_range: default_attack_range(),
            },
            enemies,
            turret: TurretStats::default(),
        }
    }
}

impl StatTable {
    /// Loads overrides from `path`; a missing file means the built-in table.
    ///
    /// Kinds absent from the file keep their built-in stats.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            log::info!("no stat table at {}, using built-in stats", path.display());
            return Ok(StatTable::default());
        }
        let overrides: StatOverrides = read_json(path)?;
        let table = StatTable::default().merged(overrides);
        table.validate()?;
        Ok(table)
    }

    /// Fails with `MissingStats` for the first enemy kind without a row
    pub fn validate(&self) -> Result<(), ConfigError> {
        match EnemyKind::ALL.into_iter().find(|kind| !self.enemies.contains_key(kind)) {
            Some(kind) => Err(ConfigError::MissingStats(kind)),
            None => Ok(()),
        }
    }

    fn merged(mut self, overrides: StatOverrides) -> Self {
        if let Some(player) = overrides.player {
            self.player = player;
        }
        self.enemies.extend(overrides.enemies);
        if let Some(turret) = overrides.turret {
            self.turret = turret;
        }
        self
    }

    pub fn enemy(&self, kind: EnemyKind) -> Result<&CharacterStats, ConfigError> {
        self.enemies.get(&kind).ok_or(ConfigError::MissingStats(kind))
    }
}

#[derive(Debug, Default, Deserialize)]
struct StatOverrides {
    player: Option<CharacterStats>,
    #[serde(default)]
    enemies: HashMap<EnemyKind, CharacterStats>,
    turret: Option<TurretStats>,
}
