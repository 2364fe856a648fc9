//! Screen-space HUD: player health, coin counter and shield status.
//!
//! Drawn after the world, pinned to the top-left corner.

use std::time::Duration;

use crate::player::ShieldStatus;
use crate::render::{Color, Painter};
use crate::text::draw_simple_text;
use crate::ui::health_bar::{HealthBar, HealthBarStyle};

#[derive(Debug, Clone)]
pub struct HudStyle {
    /// Distance from the screen edges
    pub margin: i32,
    pub text_scale: u32,
    pub line_height: i32,
    pub text_color: Color,
    pub coin_color: Color,
    pub shield_ready_color: Color,
    pub shield_active_color: Color,
    pub shield_used_color: Color,
}

impl Default for HudStyle {
    fn default() -> Self {
        HudStyle {
            margin: 10,
            text_scale: 2,
            line_height: 22,
            text_color: Color::WHITE,
            coin_color: Color::YELLOW,
            shield_ready_color: Color::rgb(120, 200, 255),
            shield_active_color: Color::rgb(80, 160, 255),
            shield_used_color: Color::rgb(120, 120, 120),
        }
    }
}

/// Everything the HUD shows for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HudState {
    pub health: i32,
    pub max_health: i32,
    pub coins: u32,
    pub coins_required: u32,
    pub shield: ShieldStatus,
}

pub struct Hud {
    style: HudStyle,
    health_bar: HealthBar,
}

impl Default for Hud {
    fn default() -> Self {
        Hud::new()
    }
}

impl Hud {
    pub fn new() -> Self {
        Hud {
            style: HudStyle::default(),
            health_bar: HealthBar::with_style(HealthBarStyle::player()),
        }
    }

    pub fn render(&self, painter: &mut dyn Painter, state: &HudState) -> Result<(), String> {
        let s = &self.style;
        let x = s.margin;
        let mut y = s.margin;

        let bar_width = self.health_bar.style().width;
        let pct = if state.max_health > 0 {
            state.health as f32 / state.max_health as f32
        } else {
            0.0
        };
        self.health_bar.render(painter, x, y, bar_width, pct)?;
        draw_simple_text(
            painter,
            &format!("{}/{}", state.health.max(0), state.max_health),
            x + bar_width as i32 + 8,
            y + 1,
            s.text_color,
            s.text_scale,
        )?;

        y += s.line_height;
        draw_simple_text(
            painter,
            &coin_label(state.coins, state.coins_required),
            x,
            y,
            s.coin_color,
            s.text_scale,
        )?;

        y += s.line_height;
        let color = match state.shield {
            ShieldStatus::Ready => s.shield_ready_color,
            ShieldStatus::Active { .. } => s.shield_active_color,
            ShieldStatus::Used => s.shield_used_color,
        };
        draw_simple_text(painter, &shield_label(state.shield), x, y, color, s.text_scale)
    }
}

pub fn coin_label(coins: u32, required: u32) -> String {
    format!("COINS {}/{}", coins, required)
}

/// Remaining time is shown in whole seconds, rounded up
pub fn shield_label(status: ShieldStatus) -> String {
    match status {
        ShieldStatus::Ready => "SHIELD READY (E)".to_string(),
        ShieldStatus::Active { remaining } => format!("SHIELD {}S", ceil_seconds(remaining)),
        ShieldStatus::Used => "SHIELD USED".to_string(),
    }
}

pub(crate) fn ceil_seconds(d: Duration) -> u64 {
    d.as_millis().div_ceil(1000) as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::RecordingPainter;

    #[test]
    fn test_labels() {
        assert_eq!(coin_label(2, 5), "COINS 2/5");
        assert_eq!(shield_label(ShieldStatus::Ready), "SHIELD READY (E)");
        assert_eq!(
            shield_label(ShieldStatus::Active {
                remaining: Duration::from_millis(2100)
            }),
            "SHIELD 3S"
        );
        assert_eq!(shield_label(ShieldStatus::Used), "SHIELD USED");
    }

    #[test]
    fn test_ceil_seconds() {
        assert_eq!(ceil_seconds(Duration::from_millis(0)), 0);
        assert_eq!(ceil_seconds(Duration::from_millis(1)), 1);
        assert_eq!(ceil_seconds(Duration::from_millis(3000)), 3);
    }

    #[test]
    fn test_hud_draws_health_and_coins() {
        let mut painter = RecordingPainter::new(800, 600);
        let hud = Hud::new();
        hud.render(
            &mut painter,
            &HudState {
                health: 5,
                max_health: 5,
                coins: 1,
                coins_required: 3,
                shield: ShieldStatus::Ready,
            },
        )
        .unwrap();

        assert_eq!(painter.count_fills(Color::rgb(0, 200, 0)), 1);
        assert!(painter.count_fills(Color::YELLOW) > 0);
    }
}
