//! Camera follow for the level view.
//!
//! The camera is a viewport rectangle in world space. Every Active tick the
//! phase re-centres it on the player; the viewport is then clamped so it never
//! shows past the level edges. Levels smaller than the screen pin the view to 0.

use crate::geometry::{Rect, Vec2};
use crate::render::ScreenRect;

#[derive(Debug, Clone)]
pub struct Camera {
    /// World position of the top-left visible pixel
    x: f32,
    y: f32,
    screen_w: u32,
    screen_h: u32,
    level_w: f32,
    level_h: f32,
}

impl Camera {
    pub fn new(level_w: f32, level_h: f32, screen_w: u32, screen_h: u32) -> Self {
        Camera {
            x: 0.0,
            y: 0.0,
            screen_w,
            screen_h,
            level_w,
            level_h,
        }
    }

    /// Centres the view on `target`, clamped to `[0, level - screen]` per axis.
    pub fn update(&mut self, target: Vec2) {
        let max_x = (self.level_w - self.screen_w as f32).max(0.0);
        let max_y = (self.level_h - self.screen_h as f32).max(0.0);

        self.x = (target.x - self.screen_w as f32 / 2.0).clamp(0.0, max_x);
        self.y = (target.y - self.screen_h as f32 / 2.0).clamp(0.0, max_y);
    }

    /// Called when the window resolution changes; the next `update` re-clamps.
    pub fn resize(&mut self, screen_w: u32, screen_h: u32) {
        self.screen_w = screen_w;
        self.screen_h = screen_h;
    }

    /// World rect to screen rect
    pub fn apply(&self, rect: &Rect) -> ScreenRect {
        ScreenRect::new(
            (rect.x - self.x).round() as i32,
            (rect.y - self.y).round() as i32,
            rect.w.round().max(0.0) as u32,
            rect.h.round().max(0.0) as u32,
        )
    }

    pub fn apply_point(&self, point: Vec2) -> (i32, i32) {
        ((point.x - self.x).round() as i32, (point.y - self.y).round() as i32)
    }

    /// Visible part of the world
    pub fn view(&self) -> Rect {
        Rect::new(self.x, self.y, self.screen_w as f32, self.screen_h as f32)
    }

    pub fn screen_size(&self) -> (u32, u32) {
        (self.screen_w, self.screen_h)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camera_centres_on_target() {
        let mut camera = Camera::new(2000.0, 2000.0, 800, 600);
        camera.update(Vec2::new(1000.0, 1000.0));
        assert_eq!(camera.view(), Rect::new(600.0, 700.0, 800.0, 600.0));
    }

    #[test]
    fn test_camera_clamps_to_level_edges() {
        let mut camera = Camera::new(2000.0, 1000.0, 800, 600);

        camera.update(Vec2::new(10.0, 10.0));
        assert_eq!((camera.view().x, camera.view().y), (0.0, 0.0));

        camera.update(Vec2::new(1990.0, 990.0));
        assert_eq!((camera.view().x, camera.view().y), (1200.0, 400.0));
    }

    #[test]
    fn test_small_level_pins_view_at_origin() {
        let mut camera = Camera::new(400.0, 300.0, 800, 600);
        camera.update(Vec2::new(300.0, 200.0));
        assert_eq!((camera.view().x, camera.view().y), (0.0, 0.0));
    }

    #[test]
    fn test_apply_translates_into_screen_space() {
        let mut camera = Camera::new(2000.0, 2000.0, 800, 600);
        camera.update(Vec2::new(1000.0, 1000.0));
        let screen = camera.apply(&Rect::new(650.0, 720.0, 32.0, 16.0));
        assert_eq!(screen, ScreenRect::new(50, 20, 32, 16));
    }

    #[test]
    fn test_resize_changes_clamp_range() {
        let mut camera = Camera::new(1280.0, 720.0, 800, 600);
        camera.update(Vec2::new(1280.0, 720.0));
        assert_eq!(camera.view().x, 480.0);

        camera.resize(1280, 720);
        camera.update(Vec2::new(1280.0, 720.0));
        assert_eq!(camera.view().x, 0.0);
    }
}
