//! Settings screen: volumes and resolution
//!
//! Edits a draft copy of the settings. SAVE hands the draft to the director,
//! which persists it and applies any resolution change; `Esc` drops it.

use super::{Menu, MenuItem, MenuStyle};
use crate::config::Settings;
use crate::config::settings::round_volume;
use crate::input_system::{GameAction, InputContext, InputEvent, InputSystem};
use crate::render::Painter;
use crate::scene::{Scene, SceneContext, StackCommand};

const VOLUME_STEP: f32 = 0.1;

const MUSIC: usize = 0;
const FX: usize = 1;
const RESOLUTION: usize = 2;
const SAVE: usize = 3;
const BACK: usize = 4;

pub struct SettingsMenu {
    menu: Menu,
    draft: Settings,
}

impl SettingsMenu {
    pub fn new(settings: &Settings) -> Self {
        let mut menu = SettingsMenu {
            menu: Menu::with_style(
                "SETTINGS",
                vec![
                    MenuItem::new(""),
                    MenuItem::new(""),
                    MenuItem::new(""),
                    MenuItem::new("SAVE"),
                    MenuItem::new("BACK"),
                ],
                MenuStyle {
                    width: 600,
                    ..MenuStyle::opaque()
                },
            ),
            draft: settings.clone(),
        };
        menu.refresh_labels();
        menu
    }

    pub fn draft(&self) -> &Settings {
        &self.draft
    }

    fn refresh_labels(&mut self) {
        let music = format!("MUSIC: {}%", percent(self.draft.music_volume));
        let fx = format!("FX: {}%", percent(self.draft.fx_volume));
        let resolution = format!("SCREEN: {}", self.draft.resolution).to_uppercase();
        self.menu.set_item_text(MUSIC, music);
        self.menu.set_item_text(FX, fx);
        self.menu.set_item_text(RESOLUTION, resolution);
    }

    /// Steps the selected value; `direction` is +1 or -1
    fn adjust(&mut self, direction: f32) {
        match self.menu.selected_index() {
            MUSIC => {
                self.draft.music_volume = round_volume(self.draft.music_volume + VOLUME_STEP * direction);
            }
            FX => {
                self.draft.fx_volume = round_volume(self.draft.fx_volume + VOLUME_STEP * direction);
            }
            RESOLUTION => {
                self.draft.resolution = if direction > 0.0 {
                    self.draft.resolution.next()
                } else {
                    self.draft.resolution.previous()
                };
            }
            _ => return,
        }
        self.refresh_labels();
    }
}

fn percent(volume: f32) -> u32 {
    (volume * 100.0).round() as u32
}

impl Scene for SettingsMenu {
    /// Starts from whatever is currently in effect, not a stale draft
    fn on_enter(&mut self, ctx: &mut SceneContext) {
        self.draft = ctx.settings.clone();
        self.menu.reset_selection();
        self.refresh_labels();
    }

    fn handle_event(&mut self, event: &InputEvent, ctx: &mut SceneContext) {
        let Some(action) = InputSystem::translate(event, InputContext::Menu) else {
            return;
        };
        match action {
            GameAction::MenuBack => ctx.command(StackCommand::Pop),
            GameAction::MenuLeft => self.adjust(-1.0),
            GameAction::MenuRight => self.adjust(1.0),
            _ => match self.menu.navigate(action) {
                Some(SAVE) => {
                    ctx.command(StackCommand::SaveSettings(self.draft.clone()));
                    ctx.command(StackCommand::Pop);
                }
                Some(BACK) => ctx.command(StackCommand::Pop),
                Some(_) => self.adjust(1.0),
                None => {}
            },
        }
    }

    fn update(&mut self, _ctx: &mut SceneContext) {}

    fn render(&self, painter: &mut dyn Painter) -> Result<(), String> {
        self.menu.render(painter)
    }
}
