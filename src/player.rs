//! The player character
//!
//! A [`Character`] plus what only the player has: the once-per-level shield
//! and the coin counters. Crossing into the next level hands a
//! [`PlayerStateSnapshot`] from the old phase to the new one.

use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::character::{Character, CharacterAssets, CharacterKind};
use crate::combat::EntityId;
use crate::config::CharacterStats;
use crate::geometry::Vec2;
use crate::stats::{DamageResult, Health};

/// How long the shield blocks damage once activated
pub const SHIELD_DURATION: Duration = Duration::from_millis(3000);

/// Player id inside a phase; enemies, turrets and pickups count up from 1
pub const PLAYER_ID: EntityId = EntityId(0);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShieldStatus {
    Ready,
    Active { remaining: Duration },
    Used,
}

/// Invincibility that can be triggered once per level
#[derive(Debug, Clone, Copy)]
pub struct Shield {
    duration: Duration,
    activated_at: Option<Duration>,
}

impl Shield {
    pub fn new(duration: Duration) -> Self {
        Shield {
            duration,
            activated_at: None,
        }
    }

    /// Activates the shield; false if it was already used this level
    pub fn activate(&mut self, now: Duration) -> bool {
        if self.activated_at.is_some() {
            return false;
        }
        self.activated_at = Some(now);
        true
    }

    pub fn is_active(&self, now: Duration) -> bool {
        matches!(self.status(now), ShieldStatus::Active { .. })
    }

    pub fn status(&self, now: Duration) -> ShieldStatus {
        match self.activated_at {
            None => ShieldStatus::Ready,
            Some(start) => {
                let end = start + self.duration;
                if now < end {
                    ShieldStatus::Active {
                        remaining: end - now,
                    }
                } else {
                    ShieldStatus::Used
                }
            }
        }
    }
}

/// What survives a level change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerStateSnapshot {
    pub health: i32,
    pub max_health: i32,
    pub coins: u32,
}

#[derive(Debug)]
pub struct Player {
    pub character: Character,
    shield: Shield,
    coins_total: u32,
    coins_level: u32,
}

impl Player {
    pub fn new(stats: &CharacterStats, start: Vec2, assets: &CharacterAssets) -> Self {
        Player {
            character: Character::new(PLAYER_ID, CharacterKind::Player, stats, start, assets),
            shield: Shield::new(SHIELD_DURATION),
            coins_total: 0,
            coins_level: 0,
        }
    }

    /// Damage from an enemy or bullet; blocked entirely while the shield is up
    pub fn take_damage(&mut self, amount: i32, now: Duration) -> Option<DamageResult> {
        if self.shield.is_active(now) {
            debug!("shield blocked {} damage", amount);
            return None;
        }
        let result = self.character.take_damage(amount)?;
        info!(
            "player took {} damage ({}/{})",
            result.damage_dealt,
            self.character.health().current(),
            self.character.health().max()
        );
        Some(result)
    }

    pub fn activate_shield(&mut self, now: Duration) -> bool {
        if self.character.is_dead() || !self.character.health().is_alive() {
            return false;
        }
        let activated = self.shield.activate(now);
        if activated {
            info!("shield up for {}ms", SHIELD_DURATION.as_millis());
        }
        activated
    }

    pub fn shield_status(&self, now: Duration) -> ShieldStatus {
        self.shield.status(now)
    }

    pub fn add_coins(&mut self, amount: u32) {
        self.coins_total += amount;
        self.coins_level += amount;
    }

    /// Heals up to max health; returns the amount actually restored
    pub fn heal(&mut self, amount: i32) -> i32 {
        self.character.health_mut().heal(amount)
    }

    pub fn coins_total(&self) -> u32 {
        self.coins_total
    }

    pub fn coins_this_level(&self) -> u32 {
        self.coins_level
    }

    pub fn health(&self) -> &Health {
        self.character.health()
    }

    pub fn snapshot(&self) -> PlayerStateSnapshot {
        let health = self.character.health();
        PlayerStateSnapshot {
            health: health.current(),
            max_health: health.max(),
            coins: self.coins_total,
        }
    }

    /// Carries health and total coins over; the level counter starts from zero.
    pub fn apply_snapshot(&mut self, snapshot: &PlayerStateSnapshot) {
        *self.character.health_mut() = Health::with_current(snapshot.health, snapshot.max_health);
        self.coins_total = snapshot.coins;
        self.coins_level = 0;
    }
}
