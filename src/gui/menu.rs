//! Base Menu Component
//!
//! Provides the overlay menu shared by every menu scene.
//! Supports keyboard navigation, customizable styling, and selection highlighting.

use crate::input_system::GameAction;
use crate::render::{Color, Painter, ScreenRect};
use crate::text::draw_centered_text;

/// Configuration for menu appearance
#[derive(Debug, Clone)]
pub struct MenuStyle {
    /// Menu box width in pixels
    pub width: u32,

    /// Minimum menu box height; grows with the item count
    pub min_height: u32,

    /// Background color
    pub background_color: Color,

    /// Border color
    pub border_color: Color,

    /// Border thickness (draws double border if > 1)
    pub border_thickness: u32,

    /// Overlay darkness (0-255, higher = darker, 255 hides the scene below)
    pub overlay_alpha: u8,

    /// Title text color
    pub title_color: Color,

    /// Normal item text color
    pub item_color: Color,

    /// Selected item text color
    pub selected_item_color: Color,

    /// Selection highlight color
    pub highlight_color: Color,
}

impl Default for MenuStyle {
    fn default() -> Self {
        MenuStyle {
            width: 500,
            min_height: 240,
            background_color: Color::rgb(30, 30, 40),
            border_color: Color::rgb(100, 100, 120),
            border_thickness: 2,
            overlay_alpha: 180,
            title_color: Color::rgb(220, 220, 240),
            item_color: Color::rgb(160, 160, 170),
            selected_item_color: Color::rgb(255, 255, 255),
            highlight_color: Color::rgb(80, 100, 140),
        }
    }
}

impl MenuStyle {
    /// Opaque variant for scenes that sit at the bottom of the stack
    pub fn opaque() -> Self {
        MenuStyle {
            overlay_alpha: 255,
            ..MenuStyle::default()
        }
    }
}

/// A menu item
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItem {
    pub text: String,
}

impl MenuItem {
    pub fn new(text: impl Into<String>) -> Self {
        MenuItem { text: text.into() }
    }
}

const TITLE_SCALE: u32 = 3;
const ITEM_SCALE: u32 = 3;
const ITEM_HEIGHT: u32 = 60;
const ITEM_START: u32 = 100;

/// A stateful overlay menu component
///
/// The menu handles:
/// - Navigation (up/down selection, wrapping)
/// - Rendering (overlay, box, items, highlighting)
/// - Style customization
///
/// # Example
///
/// ```ignore
/// use crate::gui::{Menu, MenuItem};
///
/// let mut menu = Menu::new("PAUSE", vec![MenuItem::new("CONTINUE"), MenuItem::new("MAIN MENU")]);
///
/// // Navigate; confirm yields the selected index
/// menu.navigate(GameAction::MenuDown);
/// if let Some(index) = menu.navigate(GameAction::MenuConfirm) { /* ... */ }
///
/// // Render
/// menu.render(painter)?;
/// ```
pub struct Menu {
    title: String,
    items: Vec<MenuItem>,
    selected_index: usize,
    style: MenuStyle,
}

impl Menu {
    /// Creates a new menu with default styling
    pub fn new(title: impl Into<String>, items: Vec<MenuItem>) -> Self {
        Menu::with_style(title, items, MenuStyle::default())
    }

    /// Creates a menu with custom styling
    pub fn with_style(title: impl Into<String>, items: Vec<MenuItem>, style: MenuStyle) -> Self {
        Menu {
            title: title.into(),
            items,
            selected_index: 0,
            style,
        }
    }

    /// Move selection up (wraps to bottom)
    pub fn select_previous(&mut self) {
        if self.items.is_empty() {
            return;
        }
        if self.selected_index == 0 {
            self.selected_index = self.items.len() - 1;
        } else {
            self.selected_index -= 1;
        }
    }

    /// Move selection down (wraps to top)
    pub fn select_next(&mut self) {
        if self.items.is_empty() {
            return;
        }
        self.selected_index = (self.selected_index + 1) % self.items.len();
    }

    /// Get currently selected index
    pub fn selected_index(&self) -> usize {
        self.selected_index
    }

    /// Back to the first item, for menus reopened from the cache
    pub fn reset_selection(&mut self) {
        self.selected_index = 0;
    }

    pub fn items(&self) -> &[MenuItem] {
        &self.items
    }

    /// Replaces an item's label (settings values change in place)
    pub fn set_item_text(&mut self, index: usize, text: impl Into<String>) {
        if let Some(item) = self.items.get_mut(index) {
            item.text = text.into();
        }
    }

    /// Applies up/down navigation; returns the selected index on confirm
    pub fn navigate(&mut self, action: GameAction) -> Option<usize> {
        match action {
            GameAction::MenuUp => self.select_previous(),
            GameAction::MenuDown => self.select_next(),
            GameAction::MenuConfirm if !self.items.is_empty() => return Some(self.selected_index),
            _ => {}
        }
        None
    }

    fn height(&self) -> u32 {
        (ITEM_START + self.items.len() as u32 * ITEM_HEIGHT).max(self.style.min_height)
    }

    /// Render the menu at screen center
    pub fn render(&self, painter: &mut dyn Painter) -> Result<(), String> {
        let (screen_width, screen_height) = painter.screen_size();

        // 1. Overlay (darken or hide the scene below)
        painter.fill_screen(Color::rgba(0, 0, 0, self.style.overlay_alpha))?;

        // 2. Centered box
        let width = self.style.width.min(screen_width);
        let height = self.height().min(screen_height);
        let menu_x = ((screen_width - width) / 2) as i32;
        let menu_y = ((screen_height - height) / 2) as i32;
        let center_x = menu_x + width as i32 / 2;

        painter.fill_rect(
            ScreenRect::new(menu_x, menu_y, width, height),
            self.style.background_color,
        )?;

        // 3. Double border
        painter.draw_rect(ScreenRect::new(menu_x, menu_y, width, height), self.style.border_color)?;
        if self.style.border_thickness > 1 && width > 4 && height > 4 {
            painter.draw_rect(
                ScreenRect::new(menu_x + 2, menu_y + 2, width - 4, height - 4),
                self.style.border_color,
            )?;
        }

        // 4. Title
        draw_centered_text(
            painter,
            &self.title,
            center_x,
            menu_y + 30,
            self.style.title_color,
            TITLE_SCALE,
        )?;

        // 5. Items
        for (i, item) in self.items.iter().enumerate() {
            let item_y = menu_y + (ITEM_START + i as u32 * ITEM_HEIGHT) as i32;
            let is_selected = i == self.selected_index;

            if is_selected {
                painter.fill_rect(
                    ScreenRect::new(menu_x + 15, item_y - 3, width.saturating_sub(30), 36),
                    self.style.highlight_color,
                )?;
            }

            let text_color = if is_selected {
                self.style.selected_item_color
            } else {
                self.style.item_color
            };
            draw_centered_text(painter, &item.text, center_x, item_y, text_color, ITEM_SCALE)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{DrawCall, RecordingPainter};

    fn menu() -> Menu {
        Menu::new(
            "PAUSE",
            vec![MenuItem::new("CONTINUE"), MenuItem::new("SETTINGS"), MenuItem::new("MAIN MENU")],
        )
    }

    #[test]
    fn test_navigation_wraps() {
        let mut menu = menu();
        menu.select_previous();
        assert_eq!(menu.selected_index(), 2);
        menu.select_next();
        assert_eq!(menu.selected_index(), 0);
    }

    #[test]
    fn test_confirm_returns_selection() {
        let mut menu = menu();
        assert_eq!(menu.navigate(GameAction::MenuDown), None);
        assert_eq!(menu.navigate(GameAction::MenuConfirm), Some(1));
        assert_eq!(menu.navigate(GameAction::Attack), None);
    }

    #[test]
    fn test_empty_menu_never_confirms() {
        let mut menu = Menu::new("EMPTY", Vec::new());
        menu.select_next();
        menu.select_previous();
        assert_eq!(menu.navigate(GameAction::MenuConfirm), None);
    }

    #[test]
    fn test_set_item_text() {
        let mut menu = menu();
        menu.set_item_text(1, "MUSIC: 50%");
        menu.set_item_text(9, "ignored");
        assert_eq!(menu.items()[1].text, "MUSIC: 50%");
    }

    #[test]
    fn test_render_highlights_selected_item() {
        let mut menu = menu();
        menu.select_next();
        let mut painter = RecordingPainter::new(800, 600);
        menu.render(&mut painter).unwrap();

        assert_eq!(
            painter.calls[0],
            DrawCall::Fill(ScreenRect::new(0, 0, 800, 600), Color::rgba(0, 0, 0, 180))
        );
        let style = MenuStyle::default();
        assert_eq!(painter.count_fills(style.highlight_color), 1);
        // Box height grows to fit three items
        assert!(painter.calls.contains(&DrawCall::Fill(
            ScreenRect::new(150, 160, 500, 280),
            style.background_color
        )));
    }

    #[test]
    fn test_box_shrinks_to_narrow_screen() {
        let menu = menu();
        let mut painter = RecordingPainter::new(300, 200);
        menu.render(&mut painter).unwrap();

        assert!(painter.calls.contains(&DrawCall::Fill(
            ScreenRect::new(0, 0, 300, 200),
            MenuStyle::default().background_color
        )));
    }
}
