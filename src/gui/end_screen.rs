//! Game over and victory screens
//!
//! Both replace the phase that ended. Game over offers a fresh retry of the
//! same level; victory reports the coins carried out of the last level.

use std::rc::Rc;

use super::{Menu, MenuItem};
use crate::input_system::{GameAction, InputContext, InputEvent, InputSystem};
use crate::player::PlayerStateSnapshot;
use crate::render::{Color, Painter, ScreenRect};
use crate::resources::{ImageHandle, ResourceManager};
use crate::scene::{Scene, SceneContext, SceneHandle, StackCommand};
use crate::text::draw_centered_text;

/// Configuration for end screen appearance
#[derive(Debug, Clone)]
pub struct EndScreenStyle {
    /// Subtitle text color
    pub subtitle_color: Color,

    /// Subtitle text scale
    pub subtitle_scale: u32,
}

impl Default for EndScreenStyle {
    fn default() -> Self {
        EndScreenStyle {
            subtitle_color: Color::rgb(255, 255, 100), // Yellow
            subtitle_scale: 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EndKind {
    GameOver { level: String },
    Victory { coins: u32 },
}

pub struct EndScreen {
    kind: EndKind,
    menu: Menu,
    background: Rc<ImageHandle>,
    style: EndScreenStyle,
}

impl EndScreen {
    pub fn game_over(level: impl Into<String>, resources: &mut ResourceManager) -> Self {
        EndScreen {
            kind: EndKind::GameOver { level: level.into() },
            menu: Menu::new(
                "ACCEPT YOUR FATE",
                vec![MenuItem::new("RETRY"), MenuItem::new("MAIN MENU")],
            ),
            background: resources.load_image_or_placeholder("lose.jpg"),
            style: EndScreenStyle::default(),
        }
    }

    pub fn victory(resources: &mut ResourceManager) -> Self {
        EndScreen {
            kind: EndKind::Victory { coins: 0 },
            menu: Menu::new(
                "YOU SAVED THE FIC!",
                vec![MenuItem::new("PLAY AGAIN"), MenuItem::new("EXIT")],
            ),
            background: resources.load_image_or_placeholder("win.jpg"),
            style: EndScreenStyle::default(),
        }
    }

    pub fn kind(&self) -> &EndKind {
        &self.kind
    }

    fn music(&self) -> &'static str {
        match self.kind {
            EndKind::GameOver { .. } => "lose.mp3",
            EndKind::Victory { .. } => "win.mp3",
        }
    }

    fn subtitle(&self) -> String {
        match &self.kind {
            EndKind::GameOver { .. } => "WE WILL SEE YOU IN JULY :)".to_string(),
            EndKind::Victory { coins } => format!("COINS COLLECTED: {}", coins),
        }
    }

    fn confirm(&self, index: usize, ctx: &mut SceneContext) {
        match (&self.kind, index) {
            // A fresh level: nothing is carried into the retry
            (EndKind::GameOver { level }, 0) => {
                ctx.command(StackCommand::Replace(SceneHandle::phase(level)))
            }
            (EndKind::GameOver { .. }, _) => ctx.command(StackCommand::ReturnToRoot),
            (EndKind::Victory { .. }, 0) => ctx.command(StackCommand::ReturnToRoot),
            (EndKind::Victory { .. }, _) => ctx.command(StackCommand::Quit),
        }
    }
}

impl Scene for EndScreen {
    fn on_enter(&mut self, ctx: &mut SceneContext) {
        self.menu.reset_selection();
        ctx.play_music(self.music());
    }

    fn apply_snapshot(&mut self, snapshot: &PlayerStateSnapshot) {
        if let EndKind::Victory { coins } = &mut self.kind {
            *coins = snapshot.coins;
        }
    }

    fn handle_event(&mut self, event: &InputEvent, ctx: &mut SceneContext) {
        let Some(action) = InputSystem::translate(event, InputContext::Menu) else {
            return;
        };
        if action == GameAction::MenuBack {
            ctx.command(StackCommand::ReturnToRoot);
            return;
        }
        if let Some(index) = self.menu.navigate(action) {
            self.confirm(index, ctx);
        }
    }

    fn update(&mut self, _ctx: &mut SceneContext) {}

    fn render(&self, painter: &mut dyn Painter) -> Result<(), String> {
        let (w, h) = painter.screen_size();
        painter.draw_image(&self.background, None, ScreenRect::new(0, 0, w, h))?;
        self.menu.render(painter)?;

        // Above the menu box
        draw_centered_text(
            painter,
            &self.subtitle(),
            w as i32 / 2,
            h as i32 / 8,
            self.style.subtitle_color,
            self.style.subtitle_scale,
        )
    }
}
