//! Health bars
//!
//! Two uses share one component: the player's bar pinned to the top-left of
//! the screen, and small bars floating above damaged enemies.
//!
//! # Example
//!
//! ```ignore
//! use crate::ui::{HealthBar, HealthBarStyle};
//!
//! let enemy_bar = HealthBar::new();
//! for enemy in &enemies {
//!     let top = camera.apply(&enemy.character.draw_rect());
//!     enemy_bar.render(painter, top.x, top.y, top.w, enemy.character.health().percentage())?;
//! }
//! ```

use crate::render::{Color, Painter, ScreenRect};

/// Configuration for health bar appearance
///
/// # Example
///
/// ```ignore
/// let player_style = HealthBarStyle {
///     width: 200,
///     height: 16,
///     show_when_full: true,
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone)]
pub struct HealthBarStyle {
    /// Bar width in pixels
    pub width: u32,

    /// Bar height in pixels
    pub height: u32,

    /// Vertical offset from the anchor (negative = above)
    pub offset_y: i32,

    /// Background bar color (shown when health is depleted)
    pub background_color: Color,

    /// Fill color above 30% health
    pub health_color: Color,

    /// Fill color below 30% health
    pub low_health_color: Color,

    pub border_color: Color,

    /// Border thickness in pixels (0 = no border)
    pub border_thickness: u32,

    /// Show bar even when at full health?
    pub show_when_full: bool,
}

impl Default for HealthBarStyle {
    fn default() -> Self {
        HealthBarStyle {
            width: 32,
            height: 6,
            offset_y: -8,
            background_color: Color::rgb(50, 50, 50),
            health_color: Color::rgb(0, 200, 0),
            low_health_color: Color::rgb(200, 0, 0),
            border_color: Color::BLACK,
            border_thickness: 1,
            show_when_full: false,
        }
    }
}

impl HealthBarStyle {
    /// Screen-space bar for the player
    pub fn player() -> Self {
        HealthBarStyle {
            width: 200,
            height: 16,
            offset_y: 0,
            show_when_full: true,
            ..Default::default()
        }
    }
}

/// Stateless health bar; create once and call `render()` per entity.
#[derive(Debug, Clone, Default)]
pub struct HealthBar {
    style: HealthBarStyle,
}

impl HealthBar {
    pub fn new() -> Self {
        HealthBar {
            style: HealthBarStyle::default(),
        }
    }

    pub fn with_style(style: HealthBarStyle) -> Self {
        HealthBar { style }
    }

    /// Renders the bar centred over an anchor of width `anchor_width` whose
    /// top-left corner is at (`anchor_x`, `anchor_y`) in screen space.
    pub fn render(
        &self,
        painter: &mut dyn Painter,
        anchor_x: i32,
        anchor_y: i32,
        anchor_width: u32,
        health_percentage: f32,
    ) -> Result<(), String> {
        if !self.style.show_when_full && health_percentage >= 1.0 {
            return Ok(());
        }

        let bar_x = anchor_x + (anchor_width as i32 / 2) - (self.style.width as i32 / 2);
        let bar_y = anchor_y + self.style.offset_y;
        let background = ScreenRect::new(bar_x, bar_y, self.style.width, self.style.height);
        painter.fill_rect(background, self.style.background_color)?;

        let health_width = (self.style.width as f32 * health_percentage.clamp(0.0, 1.0)) as u32;
        if health_width > 0 {
            let fill_color = if health_percentage < 0.3 {
                self.style.low_health_color
            } else {
                self.style.health_color
            };
            painter.fill_rect(
                ScreenRect::new(bar_x, bar_y, health_width, self.style.height),
                fill_color,
            )?;
        }

        if self.style.border_thickness > 0 {
            painter.draw_rect(background, self.style.border_color)?;
        }

        Ok(())
    }

    pub fn style(&self) -> &HealthBarStyle {
        &self.style
    }
}
