//! How-to-play screen pushed from the title menu

use std::rc::Rc;

use crate::input_system::{InputEvent, Key};
use crate::render::{Color, Painter, ScreenRect};
use crate::resources::{ImageHandle, ResourceManager};
use crate::scene::{Scene, SceneContext, StackCommand};
use crate::text::draw_centered_text;

const TITLE: &str = "HOW TO PLAY";

const LINES: [&str; 6] = [
    "WASD / ARROWS - MOVE",
    "SPACE - ATTACK",
    "E - SHIELD (ONCE PER LEVEL)",
    "M - MINIMAP",
    "ESC - PAUSE",
    "COLLECT THE COINS TO WIN",
];

const LINE_SPACING: i32 = 40;

pub struct Instructions {
    background: Rc<ImageHandle>,
}

impl Instructions {
    pub fn new(resources: &mut ResourceManager) -> Self {
        Instructions {
            background: resources.load_image_or_placeholder("fondo_inicio.jpg"),
        }
    }
}

impl Scene for Instructions {
    fn handle_event(&mut self, event: &InputEvent, ctx: &mut SceneContext) {
        if let InputEvent::KeyDown(Key::Escape | Key::Enter) = event {
            ctx.command(StackCommand::Pop);
        }
    }

    fn update(&mut self, _ctx: &mut SceneContext) {}

    fn render(&self, painter: &mut dyn Painter) -> Result<(), String> {
        let (w, h) = painter.screen_size();
        painter.draw_image(&self.background, None, ScreenRect::new(0, 0, w, h))?;
        painter.fill_screen(Color::rgba(0, 0, 0, 160))?;

        let center_x = w as i32 / 2;
        let top = h as i32 / 8;
        draw_centered_text(painter, TITLE, center_x, top, Color::WHITE, 4)?;
        for (i, line) in LINES.iter().enumerate() {
            let y = top + LINE_SPACING * (i as i32 + 2);
            draw_centered_text(painter, line, center_x, y, Color::WHITE, 2)?;
        }
        Ok(())
    }
}
