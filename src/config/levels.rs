//! Level catalog.
//!
//! `levels.json` maps a level id to the declarative record used to build a
//! phase: which LDtk file to load, where everyone spawns, how many coins win
//! the level and what comes next.
//!
//! ```json
//! {
//!   "first_level": "level_1",
//!   "levels": {
//!     "level_1": {
//!       "level_file": "level_1.ldtk",
//!       "player_start": [100, 100],
//!       "enemies": { "types": ["rat"], "positions": [[200, 100]] },
//!       "coins": { "positions": [[50, 50]] },
//!       "next_level": "level_2",
//!       "music": "level_1.ogg"
//!     }
//!   }
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use super::entities::EnemyKind;
use super::{parse_json, read_json};
use crate::error::ConfigError;
use crate::geometry::Vec2;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnemySpawns {
    #[serde(default)]
    pub types: Vec<String>,
    #[serde(default)]
    pub positions: Vec<[f32; 2]>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Positions {
    #[serde(default)]
    pub positions: Vec<[f32; 2]>,
}

impl Positions {
    pub fn points(&self) -> impl Iterator<Item = Vec2> + '_ {
        self.positions.iter().map(|p| Vec2::from(*p))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelConfig {
    /// LDtk file under `assets/levels/`
    pub level_file: String,
    /// Player spawn (centre of the body)
    pub player_start: [f32; 2],
    #[serde(default)]
    pub enemies: EnemySpawns,
    /// Coin top-left corners
    #[serde(default)]
    pub coins: Positions,
    /// Healing tortilla top-left corners
    #[serde(default)]
    pub tortillas: Positions,
    /// Turret centres
    #[serde(default)]
    pub turrets: Positions,
    /// Coins needed to clear the level; defaults to every coin placed
    #[serde(default)]
    pub coins_required: Option<u32>,
    #[serde(default)]
    pub next_level: Option<String>,
    #[serde(default)]
    pub music: Option<String>,
}

impl LevelConfig {
    /// Pairs enemy kinds with spawn points.
    ///
    /// Fails with `ConfigMismatch` when the two lists differ in length and with
    /// `UnknownEnemyType` for a tag missing from the stat table.
    pub fn enemy_spawns(&self, level_id: &str) -> Result<Vec<(EnemyKind, Vec2)>, ConfigError> {
        if self.enemies.types.len() != self.enemies.positions.len() {
            return Err(ConfigError::ConfigMismatch {
                level: level_id.to_string(),
                types: self.enemies.types.len(),
                positions: self.enemies.positions.len(),
            });
        }

        self.enemies
            .types
            .iter()
            .zip(&self.enemies.positions)
            .map(|(tag, pos)| {
                let kind = EnemyKind::from_tag(tag).ok_or_else(|| ConfigError::UnknownEnemyType {
                    level: level_id.to_string(),
                    kind: tag.clone(),
                })?;
                Ok((kind, Vec2::from(*pos)))
            })
            .collect()
    }

    pub fn coin_threshold(&self) -> u32 {
        self.coins_required
            .unwrap_or(self.coins.positions.len() as u32)
    }

    /// Fails with `UnreachableThreshold` when the level places fewer coins than it requires
    pub fn check_coin_threshold(&self, level_id: &str) -> Result<(), ConfigError> {
        let placed = self.coins.positions.len();
        if self.coin_threshold() as usize > placed {
            return Err(ConfigError::UnreachableThreshold {
                level: level_id.to_string(),
                required: self.coin_threshold(),
                placed,
            });
        }
        Ok(())
    }

    pub fn player_start(&self) -> Vec2 {
        Vec2::from(self.player_start)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelCatalog {
    pub first_level: String,
    pub levels: HashMap<String, LevelConfig>,
}

impl LevelCatalog {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        read_json(path.as_ref())
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        parse_json(json, Path::new("<inline>"))
    }

    pub fn get(&self, id: &str) -> Result<&LevelConfig, ConfigError> {
        self.levels
            .get(id)
            .ok_or_else(|| ConfigError::UnknownLevel(id.to_string()))
    }

    /// Checks every level up front so a bad file is reported at startup.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.get(&self.first_level)?;
        for (id, level) in &self.levels {
            level.enemy_spawns(id)?;
            level.check_coin_threshold(id)?;
            if let Some(next) = &level.next_level {
                self.get(next)?;
            }
        }
        Ok(())
    }
}
