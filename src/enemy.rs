//! Enemy pursuit and contact damage

use log::debug;
use std::time::Duration;

use crate::character::{Character, CharacterAssets, CharacterKind};
use crate::collision::collide_rect_ratio;
use crate::combat::{Cooldown, DamageEvent, DamageSource, EntityId};
use crate::config::{CharacterStats, EnemyKind};
use crate::geometry::{Rect, Vec2};

/// Upper bound on the centre distance at which an enemy stops walking toward the player
pub const MIN_PURSUIT_DISTANCE: f32 = 20.0;
/// Distances are clamped to at least this before normalizing
pub const DISTANCE_EPSILON: f32 = 1.0;
/// Both bodies are shrunk to this ratio for the contact test
pub const CONTACT_RATIO: f32 = 0.5;

/// Unit vector from `from` toward `to`, or zero when closer than `stop_distance`.
pub fn pursuit_direction(from: Vec2, to: Vec2, stop_distance: f32) -> Vec2 {
    let offset = to - from;
    let distance = offset.length().max(DISTANCE_EPSILON);
    if distance < stop_distance {
        Vec2::ZERO
    } else {
        Vec2::new(offset.x / distance, offset.y / distance)
    }
}

/// Centre distance at which an enemy stops short of `target`.
///
/// Half the smaller axis reach of the contact test, capped at
/// [`MIN_PURSUIT_DISTANCE`]: close enough that the shrunk bodies overlap from
/// any approach angle.
pub fn stop_distance(body: &Rect, target: &Rect) -> f32 {
    let reach_x = (body.w + target.w) * CONTACT_RATIO / 2.0;
    let reach_y = (body.h + target.h) * CONTACT_RATIO / 2.0;
    (reach_x.min(reach_y) / 2.0).min(MIN_PURSUIT_DISTANCE)
}

#[derive(Debug)]
pub struct Enemy {
    pub character: Character,
    contact: Cooldown,
}

impl Enemy {
    pub fn new(
        id: EntityId,
        kind: EnemyKind,
        stats: &CharacterStats,
        center: Vec2,
        assets: &CharacterAssets,
    ) -> Self {
        Enemy {
            character: Character::new(id, CharacterKind::Enemy(kind), stats, center, assets),
            contact: Cooldown::new(Duration::from_millis(stats.contact_cooldown_ms)),
        }
    }

    pub fn id(&self) -> EntityId {
        self.character.id
    }

    pub fn kind(&self) -> Option<EnemyKind> {
        match self.character.kind {
            CharacterKind::Enemy(kind) => Some(kind),
            CharacterKind::Player => None,
        }
    }

    /// Points the enemy at the player's body
    pub fn pursue(&mut self, target: &Rect) {
        let body = self.character.body();
        let direction = pursuit_direction(body.center(), target.center(), stop_distance(&body, target));
        self.character.set_movement(direction);
    }

    /// Contact attack against the player's body.
    ///
    /// Returns the damage to apply when the bodies overlap under the relaxed
    /// test and this enemy's cooldown has elapsed. Hurt or dead enemies do not bite.
    pub fn try_contact(&mut self, player_body: &Rect, now: Duration) -> Option<DamageEvent> {
        if self.character.is_hurt() || self.character.is_dead() {
            return None;
        }
        if !collide_rect_ratio(&self.character.body(), player_body, CONTACT_RATIO) {
            return None;
        }
        if !self.contact.try_trigger(now) {
            return None;
        }
        self.character.start_attack();
        debug!("enemy {} bites the player", self.id());
        Some(DamageEvent::new(
            self.character.damage(),
            DamageSource::Contact(self.id()),
        ))
    }
}
