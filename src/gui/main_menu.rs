//! Title screen, the root of the scene stack

use std::rc::Rc;

use super::{Menu, MenuItem};
use crate::input_system::{GameAction, InputContext, InputEvent, InputSystem};
use crate::render::{Painter, ScreenRect};
use crate::resources::ImageHandle;
use crate::scene::{BuildContext, Scene, SceneContext, SceneHandle, StackCommand};

pub const MENU_MUSIC: &str = "menu.mp3";
const BACKGROUND: &str = "fondo_inicio.jpg";

const START: usize = 0;
const SETTINGS: usize = 1;
const HOW_TO_PLAY: usize = 2;
const QUIT: usize = 3;

pub struct MainMenu {
    menu: Menu,
    first_level: String,
    background: Rc<ImageHandle>,
}

impl MainMenu {
    pub fn new(first_level: impl Into<String>, ctx: &mut BuildContext) -> Self {
        MainMenu {
            menu: Menu::new(
                "NHEMBI SURVIVOR",
                vec![
                    MenuItem::new("START"),
                    MenuItem::new("SETTINGS"),
                    MenuItem::new("HOW TO PLAY"),
                    MenuItem::new("QUIT"),
                ],
            ),
            first_level: first_level.into(),
            background: ctx.resources.load_image_or_placeholder(BACKGROUND),
        }
    }

    fn confirm(&self, index: usize, ctx: &mut SceneContext) {
        match index {
            START => ctx.command(StackCommand::Push(SceneHandle::phase(&self.first_level))),
            SETTINGS => ctx.command(StackCommand::Push(SceneHandle::settings())),
            HOW_TO_PLAY => ctx.command(StackCommand::Push(SceneHandle::instructions())),
            QUIT => ctx.command(StackCommand::Quit),
            _ => {}
        }
    }
}

impl Scene for MainMenu {
    fn on_enter(&mut self, ctx: &mut SceneContext) {
        self.menu.reset_selection();
        ctx.play_music(MENU_MUSIC);
    }

    /// Back from a level the menu music starts over
    fn on_resume(&mut self, ctx: &mut SceneContext) {
        ctx.play_music(MENU_MUSIC);
    }

    fn handle_event(&mut self, event: &InputEvent, ctx: &mut SceneContext) {
        let Some(action) = InputSystem::translate(event, InputContext::Menu) else {
            return;
        };
        if action == GameAction::MenuBack {
            ctx.command(StackCommand::Quit);
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
        self.menu.render(painter)
    }
}
