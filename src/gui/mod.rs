//! Menu Scenes
//!
//! Every screen outside a level. All of them share the [`Menu`] widget for
//! navigation and drawing and talk to the director only through stack
//! commands.
//!
//! # Available Scenes
//!
//! - [`MainMenu`] - title screen and stack root
//! - [`PauseMenu`] - translucent overlay above a paused level
//! - [`SettingsMenu`] - volumes and resolution
//! - [`Instructions`] - control reference
//! - [`EndScreen`] - game over and victory
//!
//! # Example Usage
//!
//! ```ignore
//! let mut director = Director::new(SceneHandle::menu(), resources, settings, (800, 600), audio);
//! gui::register_menus(&mut director, "level_1");
//! ```

pub mod end_screen;
pub mod instructions;
pub mod main_menu;
pub mod menu;
pub mod pause_menu;
pub mod settings_menu;

pub use end_screen::{EndKind, EndScreen};
pub use instructions::Instructions;
pub use main_menu::MainMenu;
pub use menu::{Menu, MenuItem, MenuStyle};
pub use pause_menu::PauseMenu;
pub use settings_menu::SettingsMenu;

use crate::director::Director;
use crate::error::ConfigError;
use crate::scene::kinds;

/// Registers a factory for every menu scene kind
pub fn register_menus(director: &mut Director, first_level: &str) {
    let first_level = first_level.to_string();
    director.register(kinds::MENU, move |_, ctx| {
        Ok(Box::new(MainMenu::new(first_level.clone(), ctx)))
    });
    director.register(kinds::PAUSE, |_, _| Ok(Box::new(PauseMenu::new())));
    director.register(kinds::SETTINGS, |_, ctx| Ok(Box::new(SettingsMenu::new(ctx.settings))));
    director.register(kinds::INSTRUCTIONS, |_, ctx| {
        Ok(Box::new(Instructions::new(ctx.resources)))
    });
    director.register(kinds::GAME_OVER, |handle, ctx| {
        let level = handle
            .instance()
            .ok_or_else(|| ConfigError::UnknownLevel(handle.to_string()))?;
        Ok(Box::new(EndScreen::game_over(level, ctx.resources)))
    });
    director.register(kinds::VICTORY, |_, ctx| Ok(Box::new(EndScreen::victory(ctx.resources))));
}
