//! Combat bookkeeping
//!
//! This module sits between the character state machine and the phase:
//! - Damage sources and events (who hurt whom, for logging and sound cues)
//! - Melee hitboxes built from the attacker's body and facing
//! - `MeleeTracker`: guarantees one attack activation damages each target once
//! - `Cooldown`: timestamp-based gate used for contact damage and turret fire

use std::collections::HashSet;
use std::fmt;
use std::time::Duration;

use crate::animation::Direction;
use crate::geometry::Rect;

/// Identifier of an entity, unique within one phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub u32);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Source of damage for tracking and game logic
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageSource {
    /// The player's sword
    Melee(EntityId),
    /// An enemy touching the player
    Contact(EntityId),
    /// A bullet fired by the given turret
    Bullet(EntityId),
}

/// A damage application request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DamageEvent {
    pub amount: i32,
    pub source: DamageSource,
}

impl DamageEvent {
    pub fn new(amount: i32, source: DamageSource) -> Self {
        DamageEvent { amount, source }
    }
}

/// Identifies one attack activation of one attacker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AttackId {
    pub attacker: EntityId,
    pub sequence: u64,
}

/// Attack event information
///
/// Created from the attacker's state every tick its attack is active.
#[derive(Debug, Clone)]
pub struct AttackEvent {
    pub id: AttackId,
    pub damage: i32,
    /// Attacker's collision box
    pub origin: Rect,
    pub direction: Direction,
    /// Side length of the square hitbox
    pub range: f32,
}

impl AttackEvent {
    /// Square hitbox adjacent to the side of the attacker it is facing,
    /// centred on that side. `Idle` facing strikes downward.
    pub fn get_hitbox(&self) -> Rect {
        let r = self.range;
        let c = self.origin.center();

        match self.direction {
            Direction::Up => Rect::new(c.x - r / 2.0, self.origin.top() - r, r, r),
            Direction::Down | Direction::Idle => Rect::new(c.x - r / 2.0, self.origin.bottom(), r, r),
            Direction::Left => Rect::new(self.origin.left() - r, c.y - r / 2.0, r, r),
            Direction::Right => Rect::new(self.origin.right(), c.y - r / 2.0, r, r),
        }
    }

    pub fn to_damage_event(&self) -> DamageEvent {
        DamageEvent::new(self.damage, DamageSource::Melee(self.id.attacker))
    }
}

/// Remembers who an attack activation already hit
#[derive(Debug, Default)]
pub struct MeleeTracker {
    current: Option<AttackId>,
    already_hit: HashSet<EntityId>,
}

impl MeleeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true the first time `target` is hit by `attack`.
    ///
    /// A new attack id clears the record of the previous activation.
    pub fn register_hit(&mut self, attack: AttackId, target: EntityId) -> bool {
        if self.current != Some(attack) {
            self.current = Some(attack);
            self.already_hit.clear();
        }
        self.already_hit.insert(target)
    }
}

/// Gate that opens again `duration` after being triggered.
///
/// Works on frame timestamps (time since the game started), not wall-clock reads.
#[derive(Debug, Clone, Copy)]
pub struct Cooldown {
    duration: Duration,
    ready_at: Duration,
}

impl Cooldown {
    /// A cooldown that is ready immediately
    pub fn new(duration: Duration) -> Self {
        Cooldown {
            duration,
            ready_at: Duration::ZERO,
        }
    }

    pub fn is_ready(&self, now: Duration) -> bool {
        now >= self.ready_at
    }

    pub fn trigger(&mut self, now: Duration) {
        self.ready_at = now + self.duration;
    }

    /// Triggers and returns true when ready; false otherwise
    pub fn try_trigger(&mut self, now: Duration) -> bool {
        if self.is_ready(now) {
            self.trigger(now);
            true
        } else {
            false
        }
    }

    pub fn remaining(&self, now: Duration) -> Duration {
        self.ready_at.saturating_sub(now)
    }
}
