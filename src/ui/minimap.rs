//! Minimap overlay
//!
//! A scaled-down view of the whole level in the top-right corner: walls,
//! the player, the camera's field of view, enemies and pickups.
//!
//! Walls never move so they are scaled once and cached. Enemy dots are
//! refreshed on a slower cadence than the frame rate, and large maps draw a
//! sample of walls and a capped number of dots.

use log::debug;
use std::time::Duration;

use crate::combat::Cooldown;
use crate::geometry::{Rect, Vec2};
use crate::render::{Color, Painter, ScreenRect};

/// Maps wider or taller than this are "large"
pub const LARGE_MAP_SIZE: f32 = 3000.0;
/// Enemy dot positions are refreshed this often
pub const ENEMY_REFRESH: Duration = Duration::from_millis(250);
/// Minimum time between two visibility toggles
pub const TOGGLE_COOLDOWN: Duration = Duration::from_millis(100);

const LARGE_MAP_WALL_STEP: usize = 3;
const LARGE_MAP_ENEMY_CAP: usize = 20;
const LARGE_MAP_PICKUP_CAP: usize = 10;

#[derive(Debug, Clone)]
pub struct MinimapStyle {
    /// Longest side of the minimap in pixels
    pub size: u32,
    pub margin: i32,
    pub background: Color,
    pub border: Color,
    pub wall: Color,
    pub player: Color,
    pub enemy: Color,
    pub pickup: Color,
    pub view: Color,
    pub dot_size: u32,
}

impl Default for MinimapStyle {
    fn default() -> Self {
        MinimapStyle {
            size: 160,
            margin: 10,
            background: Color::rgba(0, 0, 0, 160),
            border: Color::WHITE,
            wall: Color::rgb(140, 140, 140),
            player: Color::GREEN,
            enemy: Color::RED,
            pickup: Color::YELLOW,
            view: Color::rgb(200, 200, 255),
            dot_size: 4,
        }
    }
}

#[derive(Debug)]
pub struct Minimap {
    style: MinimapStyle,
    visible: bool,
    level_w: f32,
    level_h: f32,
    scale: f32,
    placement: ScreenRect,
    /// Walls in minimap-local pixels
    walls: Vec<ScreenRect>,
    enemy_dots: Vec<Vec2>,
    last_refresh: Option<Duration>,
    toggle: Cooldown,
}

impl Minimap {
    pub fn new(level_w: f32, level_h: f32, walls: &[Rect], screen: (u32, u32)) -> Self {
        let style = MinimapStyle::default();
        let longest = level_w.max(level_h).max(1.0);
        let scale = style.size as f32 / longest;

        let mut minimap = Minimap {
            style,
            visible: true,
            level_w,
            level_h,
            scale,
            placement: ScreenRect::new(0, 0, 0, 0),
            walls: Vec::new(),
            enemy_dots: Vec::new(),
            last_refresh: None,
            toggle: Cooldown::new(TOGGLE_COOLDOWN),
        };
        minimap.cache_walls(walls);
        minimap.set_screen_size(screen.0, screen.1);
        minimap
    }

    pub fn is_large(&self) -> bool {
        self.level_w > LARGE_MAP_SIZE || self.level_h > LARGE_MAP_SIZE
    }

    fn cache_walls(&mut self, walls: &[Rect]) {
        let step = if self.is_large() { LARGE_MAP_WALL_STEP } else { 1 };
        self.walls = walls
            .iter()
            .step_by(step)
            .map(|wall| {
                ScreenRect::new(
                    (wall.x * self.scale) as i32,
                    (wall.y * self.scale) as i32,
                    ((wall.w * self.scale).ceil() as u32).max(1),
                    ((wall.h * self.scale).ceil() as u32).max(1),
                )
            })
            .collect();
        debug!("minimap cached {} of {} walls", self.walls.len(), walls.len());
    }

    /// Re-anchors the minimap to the top-right corner
    pub fn set_screen_size(&mut self, screen_w: u32, _screen_h: u32) {
        let w = (self.level_w * self.scale).round() as u32;
        let h = (self.level_h * self.scale).round() as u32;
        let x = screen_w as i32 - w as i32 - self.style.margin;
        self.placement = ScreenRect::new(x, self.style.margin, w, h);
    }

    pub fn placement(&self) -> ScreenRect {
        self.placement
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Flips visibility unless toggled less than [`TOGGLE_COOLDOWN`] ago
    pub fn toggle(&mut self, now: Duration) -> bool {
        if !self.toggle.try_trigger(now) {
            return false;
        }
        self.visible = !self.visible;
        true
    }

    pub fn cached_wall_count(&self) -> usize {
        self.walls.len()
    }

    /// Takes fresh enemy positions if the refresh interval has elapsed
    pub fn refresh_enemies<I>(&mut self, now: Duration, positions: I)
    where
        I: IntoIterator<Item = Vec2>,
    {
        if let Some(last) = self.last_refresh
            && now < last + ENEMY_REFRESH
        {
            return;
        }
        self.last_refresh = Some(now);
        let cap = if self.is_large() { LARGE_MAP_ENEMY_CAP } else { usize::MAX };
        self.enemy_dots = positions.into_iter().take(cap).collect();
    }

    pub fn enemy_dots(&self) -> &[Vec2] {
        &self.enemy_dots
    }

    /// World point to screen pixel inside the minimap
    pub fn to_minimap(&self, point: Vec2) -> (i32, i32) {
        (
            self.placement.x + (point.x * self.scale) as i32,
            self.placement.y + (point.y * self.scale) as i32,
        )
    }

    fn dot(&self, painter: &mut dyn Painter, point: Vec2, color: Color) -> Result<(), String> {
        let (x, y) = self.to_minimap(point);
        let size = self.style.dot_size;
        painter.fill_rect(ScreenRect::centered(x, y, size, size), color)
    }

    pub fn render(
        &self,
        painter: &mut dyn Painter,
        player: Vec2,
        view: Rect,
        pickups: &[Vec2],
    ) -> Result<(), String> {
        if !self.visible {
            return Ok(());
        }
        let origin = self.placement;
        painter.fill_rect(origin, self.style.background)?;

        for wall in &self.walls {
            let placed = ScreenRect::new(origin.x + wall.x, origin.y + wall.y, wall.w, wall.h);
            painter.fill_rect(placed, self.style.wall)?;
        }

        let cap = if self.is_large() { LARGE_MAP_PICKUP_CAP } else { usize::MAX };
        for pickup in pickups.iter().take(cap) {
            self.dot(painter, *pickup, self.style.pickup)?;
        }
        for enemy in &self.enemy_dots {
            self.dot(painter, *enemy, self.style.enemy)?;
        }

        let (vx, vy) = self.to_minimap(Vec2::new(view.x, view.y));
        let fov = ScreenRect::new(
            vx,
            vy,
            (view.w * self.scale) as u32,
            (view.h * self.scale) as u32,
        );
        painter.draw_rect(fov, self.style.view)?;

        self.dot(painter, player, self.style.player)?;
        painter.draw_rect(origin, self.style.border)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{DrawCall, RecordingPainter};

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    #[test]
    fn test_placed_top_right() {
        let mut minimap = Minimap::new(1600.0, 800.0, &[], (800, 600));
        // 160 / 1600 = 0.1 scale
        assert_eq!(minimap.placement(), ScreenRect::new(630, 10, 160, 80));

        minimap.set_screen_size(1280, 720);
        assert_eq!(minimap.placement(), ScreenRect::new(1110, 10, 160, 80));
    }

    #[test]
    fn test_large_maps_sample_walls() {
        let walls: Vec<Rect> = (0..30).map(|i| Rect::new(i as f32 * 16.0, 0.0, 16.0, 16.0)).collect();

        let small = Minimap::new(1000.0, 1000.0, &walls, (800, 600));
        assert_eq!(small.cached_wall_count(), 30);

        let large = Minimap::new(4000.0, 1000.0, &walls, (800, 600));
        assert_eq!(large.cached_wall_count(), 10);
    }

    #[test]
    fn test_enemy_dots_refresh_cadence() {
        let mut minimap = Minimap::new(1000.0, 1000.0, &[], (800, 600));
        minimap.refresh_enemies(ms(0), [Vec2::new(10.0, 10.0)]);
        minimap.refresh_enemies(ms(100), [Vec2::new(20.0, 20.0)]);
        assert_eq!(minimap.enemy_dots(), &[Vec2::new(10.0, 10.0)]);

        minimap.refresh_enemies(ms(250), [Vec2::new(30.0, 30.0)]);
        assert_eq!(minimap.enemy_dots(), &[Vec2::new(30.0, 30.0)]);
    }

    #[test]
    fn test_enemy_dots_capped_on_large_maps() {
        let mut minimap = Minimap::new(5000.0, 5000.0, &[], (800, 600));
        minimap.refresh_enemies(ms(0), (0..50).map(|i| Vec2::new(i as f32, 0.0)));
        assert_eq!(minimap.enemy_dots().len(), 20);
    }

    #[test]
    fn test_toggle_cooldown() {
        let mut minimap = Minimap::new(1000.0, 1000.0, &[], (800, 600));
        assert!(minimap.toggle(ms(0)));
        assert!(!minimap.is_visible());
        assert!(!minimap.toggle(ms(50)));
        assert!(minimap.toggle(ms(100)));
        assert!(minimap.is_visible());
    }

    #[test]
    fn test_hidden_minimap_draws_nothing() {
        let mut minimap = Minimap::new(1000.0, 1000.0, &[], (800, 600));
        minimap.toggle(ms(0));
        let mut painter = RecordingPainter::new(800, 600);
        minimap
            .render(&mut painter, Vec2::ZERO, Rect::new(0.0, 0.0, 800.0, 600.0), &[])
            .unwrap();
        assert!(painter.calls.is_empty());
    }

    #[test]
    fn test_render_draws_player_dot() {
        let minimap = Minimap::new(1600.0, 800.0, &[], (800, 600));
        let mut painter = RecordingPainter::new(800, 600);
        minimap
            .render(&mut painter, Vec2::new(100.0, 100.0), Rect::new(0.0, 0.0, 800.0, 600.0), &[])
            .unwrap();
        assert!(
            painter
                .calls
                .contains(&DrawCall::Fill(ScreenRect::centered(640, 20, 4, 4), Color::GREEN))
        );
    }
}
