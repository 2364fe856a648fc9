//! Shared character record
//!
//! The player and every enemy kind are the same [`Character`] record tagged
//! with a [`CharacterKind`]; kind-specific numbers come from the stat table.
//!
//! # State machine
//!
//! ```text
//!   Idle <──movement──> Walking
//!     │                    │
//!     └──attack edge──> Attacking ──clip done──> Idle/Walking
//!
//!   any non-Dead ──damage──> Hurt ──clip done──> Dead        (health <= 0)
//!                                            └─> Idle/Walking (health > 0)
//! ```
//!
//! Attacking and Hurt never hold together, and desired movement is ignored
//! while either is active. Dead is terminal; the phase removes the character
//! once the death clip has played.

use std::rc::Rc;
use std::time::Duration;

use crate::animation::{AnimationConfig, AnimationController, AnimationState, Direction, SpriteSet};
use crate::camera::Camera;
use crate::collision::Collidable;
use crate::combat::{AttackEvent, AttackId, EntityId};
use crate::config::{CharacterStats, EnemyKind};
use crate::geometry::{Rect, Vec2};
use crate::render::{Color, DepthSortable, Painter};
use crate::stats::{DamageResult, Health};

/// Which stat row a character uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CharacterKind {
    Player,
    Enemy(EnemyKind),
}

/// Animation clips and sheet images for one character kind
#[derive(Debug, Clone)]
pub struct CharacterAssets {
    pub animations: Rc<AnimationConfig>,
    pub sprites: Rc<SpriteSet>,
}

impl CharacterAssets {
    pub fn new(animations: AnimationConfig, sprites: SpriteSet) -> Self {
        CharacterAssets {
            animations: Rc::new(animations),
            sprites: Rc::new(sprites),
        }
    }
}

#[derive(Debug)]
pub struct Character {
    pub id: EntityId,
    pub kind: CharacterKind,
    body: Rect,
    draw_size: Vec2,
    speed: f32,
    damage: i32,
    attack_range: f32,
    health: Health,
    state: AnimationState,
    facing: Direction,
    movement: Vec2,
    attack_sequence: u64,
    animation: AnimationController,
    sprites: Rc<SpriteSet>,
}

impl Character {
    /// Creates a character whose body is centred on `center`
    pub fn new(
        id: EntityId,
        kind: CharacterKind,
        stats: &CharacterStats,
        center: Vec2,
        assets: &CharacterAssets,
    ) -> Self {
        let [w, h] = stats.body_size;
        let [dw, dh] = stats.draw_size;
        Character {
            id,
            kind,
            body: Rect::from_center(center, w, h),
            draw_size: Vec2::new(dw, dh),
            speed: stats.speed,
            damage: stats.damage,
            attack_range: stats.attack_range,
            health: Health::new(stats.max_health),
            state: AnimationState::Idle,
            facing: Direction::Down,
            movement: Vec2::ZERO,
            attack_sequence: 0,
            animation: AnimationController::new(Rc::clone(&assets.animations)),
            sprites: Rc::clone(&assets.sprites),
        }
    }

    pub fn state(&self) -> AnimationState {
        self.state
    }

    pub fn facing(&self) -> Direction {
        self.facing
    }

    pub fn health(&self) -> &Health {
        &self.health
    }

    pub fn health_mut(&mut self) -> &mut Health {
        &mut self.health
    }

    pub fn body(&self) -> Rect {
        self.body
    }

    /// Puts the body at a resolved position, keeping its size
    pub fn set_body(&mut self, body: Rect) {
        self.body = body;
    }

    pub fn center(&self) -> Vec2 {
        self.body.center()
    }

    pub fn damage(&self) -> i32 {
        self.damage
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn is_attacking(&self) -> bool {
        self.state == AnimationState::Attacking
    }

    pub fn is_hurt(&self) -> bool {
        self.state == AnimationState::Hurt
    }

    pub fn is_dead(&self) -> bool {
        self.state == AnimationState::Dead
    }

    /// True once the death clip has played to the end
    pub fn death_finished(&self) -> bool {
        self.is_dead() && self.animation.is_finished()
    }

    /// Sets the desired movement direction; normalized, zero means stand still.
    pub fn set_movement(&mut self, direction: Vec2) {
        self.movement = direction.normalized();
        if !self.movement.is_zero() && self.can_move() {
            self.facing = Direction::from_vector(self.movement);
        }
    }

    fn can_move(&self) -> bool {
        matches!(self.state, AnimationState::Idle | AnimationState::Walking)
    }

    /// Velocity in px/s; zero while attacking, hurt or dead.
    pub fn velocity(&self) -> Vec2 {
        if self.can_move() {
            self.movement * self.speed
        } else {
            Vec2::ZERO
        }
    }

    /// Starts an attack on the attack-input edge.
    ///
    /// Refused while already attacking, hurt or dead. Each accepted call is a
    /// new activation with its own [`AttackId`].
    pub fn start_attack(&mut self) -> bool {
        if !self.can_move() {
            return false;
        }
        self.attack_sequence += 1;
        self.enter(AnimationState::Attacking);
        true
    }

    /// The active attack, if the character is attacking
    pub fn attack_event(&self) -> Option<AttackEvent> {
        if !self.is_attacking() {
            return None;
        }
        Some(AttackEvent {
            id: AttackId {
                attacker: self.id,
                sequence: self.attack_sequence,
            },
            damage: self.damage,
            origin: self.body,
            direction: self.facing,
            range: self.attack_range,
        })
    }

    /// Applies damage and enters Hurt.
    ///
    /// Returns `None` (no effect) while already hurt or dead.
    pub fn take_damage(&mut self, amount: i32) -> Option<DamageResult> {
        if self.is_hurt() || self.is_dead() {
            return None;
        }
        let result = self.health.take_damage(amount);
        self.enter(AnimationState::Hurt);
        Some(result)
    }

    /// Advances the current clip and applies clip-completion transitions
    pub fn update(&mut self, dt: Duration) {
        self.animation.update(dt);

        match self.state {
            AnimationState::Dead => {}
            AnimationState::Hurt if self.animation.is_finished() => {
                if self.health.is_alive() {
                    self.enter(self.locomotion_state());
                } else {
                    self.enter(AnimationState::Dead);
                }
            }
            AnimationState::Attacking if self.animation.is_finished() => {
                self.enter(self.locomotion_state());
            }
            AnimationState::Idle | AnimationState::Walking => {
                let next = self.locomotion_state();
                if next != self.state {
                    self.enter(next);
                }
            }
            _ => {}
        }
    }

    fn locomotion_state(&self) -> AnimationState {
        if self.movement.is_zero() {
            AnimationState::Idle
        } else {
            AnimationState::Walking
        }
    }

    fn enter(&mut self, state: AnimationState) {
        self.state = state;
        self.animation.restart(state);
    }

    /// Where the sprite is drawn: centred on the body horizontally, feet on the body's bottom edge
    pub fn draw_rect(&self) -> Rect {
        let c = self.body.center();
        Rect::new(
            c.x - self.draw_size.x / 2.0,
            self.body.bottom() - self.draw_size.y,
            self.draw_size.x,
            self.draw_size.y,
        )
    }
}

impl Collidable for Character {
    fn get_bounds(&self) -> Rect {
        self.body
    }
}

impl DepthSortable for Character {
    fn get_depth_y(&self) -> f32 {
        self.body.bottom()
    }

    fn render(&self, painter: &mut dyn Painter, camera: &Camera) -> Result<(), String> {
        let dest = camera.apply(&self.draw_rect());

        let frame = self
            .animation
            .frame_source(self.facing)
            .and_then(|(image, src)| self.sprites.get(image).map(|handle| (handle, src)));

        match frame {
            Some((image, src)) => painter.draw_image(image, Some(src), dest),
            None => {
                // No sheet loaded for this clip
                let color = match self.kind {
                    CharacterKind::Player => Color::rgb(60, 120, 220),
                    CharacterKind::Enemy(_) => Color::rgb(200, 60, 60),
                };
                painter.fill_rect(camera.apply(&self.body), color)
            }
        }
    }
}
