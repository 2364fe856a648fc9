//! Stationary turrets and their bullets
//!
//! Turrets turn their gun toward the player every tick but the bullets they
//! fire are fire-and-forget: each flies in a straight line toward where the
//! player was at the moment of firing.

use log::debug;
use std::rc::Rc;
use std::time::Duration;

use crate::camera::Camera;
use crate::collision::{Collidable, any_overlap, within_radius};
use crate::combat::{Cooldown, DamageEvent, DamageSource, EntityId};
use crate::config::TurretStats;
use crate::geometry::{Rect, Vec2};
use crate::render::{Color, DepthSortable, Painter};
use crate::resources::ImageHandle;

const BULLET_SIZE: f32 = 8.0;
const BARREL_LENGTH: f32 = 20.0;

#[derive(Debug)]
pub struct Turret {
    pub id: EntityId,
    body: Rect,
    aim: Vec2,
    range: f32,
    fire: Cooldown,
    bullet: BulletSpec,
    image: Option<Rc<ImageHandle>>,
    bullet_image: Option<Rc<ImageHandle>>,
}

#[derive(Debug, Clone, Copy)]
struct BulletSpec {
    speed: f32,
    max_distance: f32,
    damage: i32,
    hit_radius: f32,
}

impl Turret {
    pub fn new(id: EntityId, center: Vec2, stats: &TurretStats) -> Self {
        let [w, h] = stats.body_size;
        Turret {
            id,
            body: Rect::from_center(center, w, h),
            aim: Vec2::new(0.0, 1.0),
            range: stats.range,
            fire: Cooldown::new(Duration::from_millis(stats.fire_interval_ms)),
            bullet: BulletSpec {
                speed: stats.bullet_speed,
                max_distance: stats.bullet_max_distance,
                damage: stats.bullet_damage,
                hit_radius: stats.bullet_hit_radius,
            },
            image: None,
            bullet_image: None,
        }
    }

    /// Sprites for the base and the bullets; without them plain shapes are drawn
    pub fn with_images(mut self, image: Rc<ImageHandle>, bullet_image: Rc<ImageHandle>) -> Self {
        self.image = Some(image);
        self.bullet_image = Some(bullet_image);
        self
    }

    pub fn body(&self) -> Rect {
        self.body
    }

    /// Unit vector the gun points along
    pub fn aim(&self) -> Vec2 {
        self.aim
    }

    /// Tracks `target` and fires when it is in range and the gun has reloaded.
    pub fn update(&mut self, target: Vec2, now: Duration) -> Option<Bullet> {
        let origin = self.body.center();
        let to_target = (target - origin).normalized();
        if !to_target.is_zero() {
            self.aim = to_target;
        }

        if origin.distance(target) > self.range || !self.fire.try_trigger(now) {
            return None;
        }

        debug!("turret {} fires", self.id);
        Some(Bullet {
            source: self.id,
            position: origin,
            direction: self.aim,
            speed: self.bullet.speed,
            travelled: 0.0,
            max_distance: self.bullet.max_distance,
            damage: self.bullet.damage,
            hit_radius: self.bullet.hit_radius,
            image: self.bullet_image.clone(),
        })
    }
}

impl Collidable for Turret {
    fn get_bounds(&self) -> Rect {
        self.body
    }
}

impl DepthSortable for Turret {
    fn get_depth_y(&self) -> f32 {
        self.body.bottom()
    }

    fn render(&self, painter: &mut dyn Painter, camera: &Camera) -> Result<(), String> {
        let dest = camera.apply(&self.body);
        match &self.image {
            Some(image) => painter.draw_image(image, None, dest)?,
            None => painter.fill_rect(dest, Color::rgb(90, 90, 100))?,
        }

        // Barrel as a short run of squares along the aim
        let center = self.body.center();
        for step in 1..=4 {
            let point = center + self.aim * (BARREL_LENGTH * step as f32 / 4.0);
            let (x, y) = camera.apply_point(point);
            painter.fill_rect(crate::render::ScreenRect::centered(x, y, 4, 4), Color::rgb(40, 40, 40))?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct Bullet {
    pub source: EntityId,
    position: Vec2,
    direction: Vec2,
    speed: f32,
    travelled: f32,
    max_distance: f32,
    damage: i32,
    hit_radius: f32,
    image: Option<Rc<ImageHandle>>,
}

impl Bullet {
    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn rect(&self) -> Rect {
        Rect::from_center(self.position, BULLET_SIZE, BULLET_SIZE)
    }

    /// Moves along the firing line; returns false once the bullet should be
    /// destroyed (range exhausted or a tile hit).
    pub fn advance(&mut self, dt: Duration, walls: &[Rect]) -> bool {
        let step = self.speed * dt.as_secs_f32();
        self.position += self.direction * step;
        self.travelled += step;
        self.travelled < self.max_distance && !any_overlap(&self.rect(), walls)
    }

    /// Centre-distance hit test against the player
    pub fn hits(&self, target: Vec2) -> bool {
        within_radius(self.position, target, self.hit_radius)
    }

    pub fn damage_event(&self) -> DamageEvent {
        DamageEvent::new(self.damage, DamageSource::Bullet(self.source))
    }

    pub fn render(&self, painter: &mut dyn Painter, camera: &Camera) -> Result<(), String> {
        match &self.image {
            Some(image) => painter.draw_image(image, None, camera.apply(&self.rect())),
            None => {
                let (x, y) = camera.apply_point(self.position);
                painter.fill_circle(x, y, (BULLET_SIZE / 2.0) as i32, Color::YELLOW)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn turret() -> Turret {
        Turret::new(EntityId(3), Vec2::new(100.0, 100.0), &TurretStats::default())
    }

    #[test]
    fn test_turret_aims_at_player_every_tick() {
        let mut t = turret();
        t.update(Vec2::new(100.0, 0.0), Duration::ZERO);
        assert_eq!(t.aim(), Vec2::new(0.0, -1.0));
        t.update(Vec2::new(1000.0, 100.0), Duration::from_millis(10));
        assert_eq!(t.aim(), Vec2::new(1.0, 0.0));
    }

    #[test]
    fn test_turret_fires_on_interval_within_range() {
        let mut t = turret();
        let player = Vec2::new(300.0, 100.0);

        assert!(t.update(player, Duration::ZERO).is_some());
        assert!(t.update(player, Duration::from_millis(1000)).is_none());
        assert!(t.update(player, Duration::from_millis(1500)).is_some());

        // out of range (350)
        assert!(t.update(Vec2::new(500.0, 100.0), Duration::from_millis(5000)).is_none());
    }

    #[test]
    fn test_bullet_keeps_firing_line() {
        let mut t = turret();
        let mut bullet = t.update(Vec2::new(200.0, 100.0), Duration::ZERO).unwrap();

        // The player moving away does not steer the bullet
        t.update(Vec2::new(100.0, 300.0), Duration::from_millis(10));
        assert!(bullet.advance(Duration::from_millis(500), &[]));
        assert_eq!(bullet.position(), Vec2::new(220.0, 100.0));
    }

    #[test]
    fn test_bullet_expires_after_max_distance() {
        let mut t = turret();
        let mut bullet = t.update(Vec2::new(200.0, 100.0), Duration::ZERO).unwrap();
        assert!(bullet.advance(Duration::from_millis(1000), &[]));
        assert!(!bullet.advance(Duration::from_millis(700), &[]));
    }

    #[test]
    fn test_bullet_destroyed_by_wall() {
        let mut t = turret();
        let mut bullet = t.update(Vec2::new(200.0, 100.0), Duration::ZERO).unwrap();
        let walls = [Rect::new(120.0, 0.0, 16.0, 200.0)];
        assert!(!bullet.advance(Duration::from_millis(100), &walls));
    }

    #[test]
    fn test_bullet_hit_radius() {
        let mut t = turret();
        let bullet = t.update(Vec2::new(200.0, 100.0), Duration::ZERO).unwrap();
        assert!(bullet.hits(Vec2::new(110.0, 110.0)));
        assert!(!bullet.hits(Vec2::new(120.0, 100.0)));
        assert_eq!(bullet.damage_event().source, DamageSource::Bullet(EntityId(3)));
    }
}
