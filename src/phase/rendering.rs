//! Drawing a phase
//!
//! Back to front: level tiles, depth-sorted entities, bullets, enemy health
//! bars, HUD, minimap and, during the countdown, the reveal overlay.

use super::{COUNTDOWN, Phase, PhaseState};
use crate::render::{Color, DepthSortable, Painter, ScreenRect, render_with_depth_sorting};
use crate::text::draw_centered_text;
use crate::ui::HudState;
use crate::ui::hud::ceil_seconds;

const REVEAL_COLOR: Color = Color::rgb(0, 0, 0);
const COUNTDOWN_SCALE: u32 = 8;

impl Phase {
    pub(super) fn draw(&self, painter: &mut dyn Painter) -> Result<(), String> {
        painter.fill_screen(Color::BLACK)?;
        self.level.draw(painter, &self.camera)?;

        let mut renderables: Vec<&dyn DepthSortable> = Vec::new();
        renderables.extend(self.pickups.iter().map(|p| p as &dyn DepthSortable));
        renderables.extend(self.turrets.iter().map(|t| t as &dyn DepthSortable));
        renderables.extend(self.enemies.iter().map(|e| &e.character as &dyn DepthSortable));
        renderables.push(&self.player.character);
        render_with_depth_sorting(painter, &self.camera, &mut renderables)?;

        for bullet in &self.bullets {
            bullet.render(painter, &self.camera)?;
        }

        for enemy in self.enemies.iter().filter(|e| !e.character.is_dead()) {
            let anchor = self.camera.apply(&enemy.character.draw_rect());
            self.enemy_bar
                .render(painter, anchor.x, anchor.y, anchor.w, enemy.character.health().percentage())?;
        }

        let health = self.player.health();
        self.hud.render(
            painter,
            &HudState {
                health: health.current(),
                max_health: health.max(),
                coins: self.player.coins_this_level(),
                coins_required: self.coins_required,
                shield: self.player.shield_status(self.now),
            },
        )?;

        let pickups: Vec<_> = self.pickups.iter().map(|p| p.rect().center()).collect();
        self.minimap
            .render(painter, self.player.character.center(), self.camera.view(), &pickups)?;

        if let PhaseState::Countdown { started } = self.state {
            self.draw_countdown(painter, started)?;
        }
        Ok(())
    }

    /// Darkness with a circular hole around the player that widens as the
    /// countdown runs, and the remaining whole seconds above it.
    fn draw_countdown(&self, painter: &mut dyn Painter, started: std::time::Duration) -> Result<(), String> {
        let elapsed = self.now.saturating_sub(started).min(COUNTDOWN);
        let progress = elapsed.as_secs_f32() / COUNTDOWN.as_secs_f32();

        let (w, h) = painter.screen_size();
        let (cx, cy) = self.camera.apply_point(self.player.character.center());
        let max_radius = (w as f32).hypot(h as f32);
        let radius = (max_radius * progress) as i32;

        draw_reveal(painter, (w, h), (cx, cy), radius)?;

        let seconds = ceil_seconds(COUNTDOWN - elapsed).max(1);
        draw_centered_text(
            painter,
            &seconds.to_string(),
            w as i32 / 2,
            h as i32 / 4,
            Color::WHITE,
            COUNTDOWN_SCALE,
        )
    }
}

/// Fills the screen except a circle of `radius` around `center`
pub(super) fn draw_reveal(
    painter: &mut dyn Painter,
    (w, h): (u32, u32),
    (cx, cy): (i32, i32),
    radius: i32,
) -> Result<(), String> {
    let (w_i, h_i) = (w as i32, h as i32);
    let top = (cy - radius).clamp(0, h_i);
    let bottom = (cy + radius + 1).clamp(0, h_i);

    if top > 0 {
        painter.fill_rect(ScreenRect::new(0, 0, w, top as u32), REVEAL_COLOR)?;
    }
    if bottom < h_i {
        painter.fill_rect(ScreenRect::new(0, bottom, w, (h_i - bottom) as u32), REVEAL_COLOR)?;
    }

    for y in top..bottom {
        let dy = y - cy;
        let half = (((radius * radius - dy * dy).max(0)) as f32).sqrt() as i32;
        let left = (cx - half).clamp(0, w_i);
        let right = (cx + half + 1).clamp(0, w_i);
        if left > 0 {
            painter.fill_rect(ScreenRect::new(0, y, left as u32, 1), REVEAL_COLOR)?;
        }
        if right < w_i {
            painter.fill_rect(ScreenRect::new(right, y, (w_i - right) as u32, 1), REVEAL_COLOR)?;
        }
    }
    Ok(())
}
