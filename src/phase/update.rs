//! Per-tick simulation of an active phase
//!
//! Order within a tick:
//! 1. intent: player input, enemy pursuit
//! 2. movement with axis-separated collision
//! 3. animation clocks and state-machine transitions
//! 4. turrets and bullets
//! 5. melee, enemy contact
//! 6. deferred removal of finished deaths
//! 7. pickups
//! 8. lose / win checks, camera and minimap

use log::{debug, info};
use std::time::Duration;

use super::{Phase, PhaseState};
use crate::collision::{aabb_intersect, move_and_collide, overlapping_indices};
use crate::combat::EntityId;
use crate::geometry::{Rect, Vec2};
use crate::items::PickupEffect;
use crate::scene::SceneContext;

impl Phase {
    pub(super) fn step(&mut self, ctx: &mut SceneContext) {
        let now = ctx.now();
        let dt = ctx.clock.dt;

        self.steer(ctx.input.movement_vector());
        self.move_entities(dt);
        self.animate(dt);
        self.update_turrets(now, dt);
        self.resolve_melee();
        self.resolve_contact(now);
        self.remove_finished_deaths();
        self.collect_pickups(ctx);

        if self.player.character.death_finished() {
            self.finish(PhaseState::Lost, ctx);
            return;
        }
        if self.player.coins_this_level() >= self.coins_required {
            self.finish(PhaseState::Won, ctx);
            return;
        }

        self.camera.update(self.player.character.center());
        self.minimap
            .refresh_enemies(now, self.enemies.iter().map(|e| e.character.center()));
    }

    fn steer(&mut self, input: Vec2) {
        self.player.character.set_movement(input);

        let target = self.player.character.body();
        for enemy in &mut self.enemies {
            if enemy.character.is_dead() {
                enemy.character.set_movement(Vec2::ZERO);
            } else {
                enemy.pursue(&target);
            }
        }
    }

    fn move_entities(&mut self, dt: Duration) {
        let seconds = dt.as_secs_f32();
        let walls = self.level.collision_rects();

        let player = &mut self.player.character;
        let delta = player.velocity() * seconds;
        if !delta.is_zero() {
            player.set_body(move_and_collide(player.body(), delta, walls.iter()));
        }

        // Enemies move one after another, each against where the others are now
        for i in 0..self.enemies.len() {
            let delta = self.enemies[i].character.velocity() * seconds;
            if delta.is_zero() {
                continue;
            }
            let others: Vec<Rect> = self
                .enemies
                .iter()
                .enumerate()
                .filter(|(j, other)| *j != i && !other.character.is_dead())
                .map(|(_, other)| other.character.body())
                .collect();

            let body = self.enemies[i].character.body();
            let moved = move_and_collide(body, delta, walls.iter().chain(others.iter()));
            self.enemies[i].character.set_body(moved);
        }
    }

    fn animate(&mut self, dt: Duration) {
        self.player.character.update(dt);
        for enemy in &mut self.enemies {
            enemy.character.update(dt);
        }
    }

    fn update_turrets(&mut self, now: Duration, dt: Duration) {
        let target = self.player.character.center();
        let player_down = !self.player.health().is_alive();

        for turret in &mut self.turrets {
            if let Some(bullet) = turret.update(target, now)
                && !player_down
            {
                self.bullets.push(bullet);
            }
        }

        let walls = self.level.collision_rects();
        self.bullets.retain_mut(|bullet| bullet.advance(dt, walls));

        let mut hits = Vec::new();
        for (index, bullet) in self.bullets.iter().enumerate() {
            if bullet.hits(target) {
                hits.push(index);
            }
        }
        for index in hits.iter().rev() {
            let bullet = self.bullets.remove(*index);
            if !player_down {
                self.player.take_damage(bullet.damage_event().amount, now);
            }
        }
    }

    /// One attack activation damages each enemy it overlaps at most once
    fn resolve_melee(&mut self) {
        let Some(attack) = self.player.character.attack_event() else {
            return;
        };
        let hitbox = attack.get_hitbox();

        for enemy in &mut self.enemies {
            if enemy.character.is_dead() || !aabb_intersect(&hitbox, &enemy.character.body()) {
                continue;
            }
            if !self.melee.register_hit(attack.id, enemy.id()) {
                continue;
            }
            let event = attack.to_damage_event();
            if let Some(result) = enemy.character.take_damage(event.amount) {
                debug!(
                    "enemy {} hit for {} ({} left)",
                    enemy.id(),
                    result.damage_dealt,
                    enemy.character.health().current()
                );
            }
        }
    }

    fn resolve_contact(&mut self, now: Duration) {
        if !self.player.health().is_alive() {
            return;
        }
        let body = self.player.character.body();
        for enemy in &mut self.enemies {
            if let Some(event) = enemy.try_contact(&body, now) {
                self.player.take_damage(event.amount, now);
            }
        }
    }

    fn remove_finished_deaths(&mut self) {
        let finished: Vec<EntityId> = self
            .enemies
            .iter()
            .filter(|e| e.character.death_finished())
            .map(|e| e.id())
            .collect();
        if finished.is_empty() {
            return;
        }
        self.enemies.retain(|e| !finished.contains(&e.id()));
        info!("{} enemies removed, {} left", finished.len(), self.enemies.len());
    }

    fn collect_pickups(&mut self, ctx: &mut SceneContext) {
        if !self.player.health().is_alive() {
            return;
        }
        let body = self.player.character.body();
        for index in overlapping_indices(&body, &self.pickups) {
            let pickup = &mut self.pickups[index];
            let Some(effect) = pickup.collect() else {
                continue;
            };
            match effect {
                PickupEffect::Coins(amount) => self.player.add_coins(amount),
                PickupEffect::Heal(amount) => {
                    self.player.heal(amount);
                }
            }
            ctx.play_sound(pickup.kind.sound());
        }
        self.pickups.retain(|p| !p.is_collected());
    }
}
