//! Sprites a phase loads when it is built
//!
//! Every image is loaded eagerly at construction; a missing sheet fails the
//! build with a `ResourceError` instead of showing up mid-level.

use std::collections::HashMap;
use std::rc::Rc;

use crate::animation::{AnimationConfig, SpriteSet};
use crate::character::CharacterAssets;
use crate::config::{EnemyKind, StatTable};
use crate::error::GameError;
use crate::items::PickupKind;
use crate::resources::{ImageHandle, ResourceManager};

pub struct PhaseAssets {
    pub player: CharacterAssets,
    pub enemies: HashMap<EnemyKind, CharacterAssets>,
    pub pickups: HashMap<PickupKind, Rc<ImageHandle>>,
    /// Turret base and bullet
    pub turret: Option<(Rc<ImageHandle>, Rc<ImageHandle>)>,
}

impl PhaseAssets {
    /// Loads the sheets for the player, the given enemy kinds and, when
    /// `with_turrets` is set, the turret sprites.
    pub fn load(
        resources: &mut ResourceManager,
        stats: &StatTable,
        enemy_kinds: &[EnemyKind],
        with_turrets: bool,
    ) -> Result<Self, GameError> {
        let player = load_character(resources, &stats.player.sprite_prefix, AnimationConfig::player_default())?;

        let mut enemies = HashMap::new();
        for kind in enemy_kinds {
            if enemies.contains_key(kind) {
                continue;
            }
            let prefix = &stats.enemy(*kind)?.sprite_prefix;
            enemies.insert(*kind, load_character(resources, prefix, AnimationConfig::enemy_default())?);
        }

        let mut pickups = HashMap::new();
        for kind in [PickupKind::Coin, PickupKind::Tortilla] {
            pickups.insert(kind, resources.load_image(kind.sprite())?);
        }

        let turret = if with_turrets {
            Some((
                resources.load_image(&stats.turret.image)?,
                resources.load_image(&stats.turret.bullet_image)?,
            ))
        } else {
            None
        };

        Ok(PhaseAssets {
            player,
            enemies,
            pickups,
            turret,
        })
    }

    /// No images at all; everything is drawn as flat shapes
    pub fn placeholder() -> Self {
        PhaseAssets {
            player: CharacterAssets::new(AnimationConfig::player_default(), SpriteSet::default()),
            enemies: HashMap::new(),
            pickups: HashMap::new(),
            turret: None,
        }
    }

    /// Assets for an enemy kind; kinds that were not loaded get bare clips
    pub fn enemy(&mut self, kind: EnemyKind) -> &CharacterAssets {
        self.enemies
            .entry(kind)
            .or_insert_with(|| CharacterAssets::new(AnimationConfig::enemy_default(), SpriteSet::default()))
    }
}

/// `<prefix>/animation.json` overrides the built-in clip layout when present
fn load_character(
    resources: &mut ResourceManager,
    prefix: &str,
    fallback: AnimationConfig,
) -> Result<CharacterAssets, GameError> {
    let config_path = resources.path_for("sprites", &format!("{}/animation.json", prefix));
    let animations = AnimationConfig::load_or(config_path, fallback)?;
    let sprites = SpriteSet::load(resources, prefix, &animations)?;
    Ok(CharacterAssets::new(animations, sprites))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_only_requested_kinds() {
        let mut resources = ResourceManager::unchecked();
        let assets = PhaseAssets::load(
            &mut resources,
            &StatTable::default(),
            &[EnemyKind::Rat, EnemyKind::Rat],
            false,
        )
        .unwrap();

        assert_eq!(assets.enemies.len(), 1);
        assert!(assets.player.sprites.get("slash.png").is_some());
        assert!(assets.pickups.contains_key(&PickupKind::Coin));
        assert!(assets.turret.is_none());
    }

    #[test]
    fn test_missing_sprite_fails_build() {
        let mut resources = ResourceManager::new("/nonexistent/assets");
        let result = PhaseAssets::load(&mut resources, &StatTable::default(), &[], false);
        assert!(matches!(result, Err(GameError::Resource(_))));
    }
}
