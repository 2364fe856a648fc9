//! Collectible pickups: coins and tortillas

use log::debug;
use std::rc::Rc;

use crate::camera::Camera;
use crate::collision::Collidable;
use crate::combat::EntityId;
use crate::geometry::{Rect, Vec2};
use crate::render::{Color, DepthSortable, Painter};
use crate::resources::ImageHandle;

/// Pickups are drawn and collided as squares of this size
pub const PICKUP_SIZE: f32 = 32.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PickupKind {
    Coin,
    Tortilla,
}

/// What collecting a pickup does to the player
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickupEffect {
    Coins(u32),
    Heal(i32),
}

impl PickupKind {
    pub fn sprite(&self) -> &'static str {
        match self {
            PickupKind::Coin => "Icono Moneda.png",
            PickupKind::Tortilla => "spanish_tortilla_sprite.png",
        }
    }

    pub fn sound(&self) -> &'static str {
        match self {
            PickupKind::Coin => "objeto.mp3",
            PickupKind::Tortilla => "glup.mp3",
        }
    }

    pub fn effect(&self) -> PickupEffect {
        match self {
            PickupKind::Coin => PickupEffect::Coins(1),
            PickupKind::Tortilla => PickupEffect::Heal(1),
        }
    }

    fn fallback_color(&self) -> Color {
        match self {
            PickupKind::Coin => Color::YELLOW,
            PickupKind::Tortilla => Color::rgb(230, 190, 110),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Pickup {
    pub id: EntityId,
    pub kind: PickupKind,
    rect: Rect,
    collected: bool,
    image: Option<Rc<ImageHandle>>,
}

impl Pickup {
    /// A pickup whose top-left corner is at `position`
    pub fn new(id: EntityId, kind: PickupKind, position: Vec2) -> Self {
        Pickup {
            id,
            kind,
            rect: Rect::new(position.x, position.y, PICKUP_SIZE, PICKUP_SIZE),
            collected: false,
            image: None,
        }
    }

    pub fn with_image(mut self, image: Rc<ImageHandle>) -> Self {
        self.image = Some(image);
        self
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn is_collected(&self) -> bool {
        self.collected
    }

    /// Collects the pickup; only the first call yields an effect.
    pub fn collect(&mut self) -> Option<PickupEffect> {
        if self.collected {
            return None;
        }
        self.collected = true;
        debug!("collected {:?} {}", self.kind, self.id);
        Some(self.kind.effect())
    }
}

impl Collidable for Pickup {
    fn get_bounds(&self) -> Rect {
        self.rect
    }
}

impl DepthSortable for Pickup {
    fn get_depth_y(&self) -> f32 {
        self.rect.bottom()
    }

    fn render(&self, painter: &mut dyn Painter, camera: &Camera) -> Result<(), String> {
        let dest = camera.apply(&self.rect);
        match &self.image {
            Some(image) => painter.draw_image(image, None, dest),
            None => painter.fill_rect(dest, self.kind.fallback_color()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collect_is_idempotent() {
        let mut coin = Pickup::new(EntityId(9), PickupKind::Coin, Vec2::new(50.0, 50.0));
        assert_eq!(coin.collect(), Some(PickupEffect::Coins(1)));
        assert_eq!(coin.collect(), None);
        assert!(coin.is_collected());
    }

    #[test]
    fn test_pickup_rect_uses_top_left() {
        let tortilla = Pickup::new(EntityId(1), PickupKind::Tortilla, Vec2::new(50.0, 60.0));
        assert_eq!(tortilla.rect(), Rect::new(50.0, 60.0, 32.0, 32.0));
        assert_eq!(tortilla.kind.effect(), PickupEffect::Heal(1));
        assert_eq!(tortilla.kind.sound(), "glup.mp3");
    }
}
