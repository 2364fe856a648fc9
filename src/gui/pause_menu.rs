//! Pause overlay drawn over the frozen level

use super::{Menu, MenuItem};
use crate::input_system::{GameAction, InputContext, InputEvent, InputSystem};
use crate::render::Painter;
use crate::scene::{Scene, SceneContext, SceneHandle, StackCommand};

const CONTINUE: usize = 0;
const RESTART: usize = 1;
const SETTINGS: usize = 2;
const MAIN_MENU: usize = 3;

pub struct PauseMenu {
    menu: Menu,
}

impl PauseMenu {
    pub fn new() -> Self {
        PauseMenu {
            menu: Menu::new(
                "PAUSE",
                vec![
                    MenuItem::new("CONTINUE"),
                    MenuItem::new("RESTART LEVEL"),
                    MenuItem::new("SETTINGS"),
                    MenuItem::new("MAIN MENU"),
                ],
            ),
        }
    }

    fn confirm(&self, index: usize, ctx: &mut SceneContext) {
        match index {
            CONTINUE => ctx.command(StackCommand::Pop),
            RESTART => {
                // Pop first so the restart hits the level underneath
                ctx.command(StackCommand::Pop);
                ctx.command(StackCommand::RestartCurrent);
            }
            SETTINGS => ctx.command(StackCommand::Push(SceneHandle::settings())),
            MAIN_MENU => ctx.command(StackCommand::ReturnToRoot),
            _ => {}
        }
    }
}

impl Default for PauseMenu {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene for PauseMenu {
    fn on_enter(&mut self, _ctx: &mut SceneContext) {
        self.menu.reset_selection();
    }

    fn is_translucent(&self) -> bool {
        true
    }

    fn handle_event(&mut self, event: &InputEvent, ctx: &mut SceneContext) {
        let Some(action) = InputSystem::translate(event, InputContext::Menu) else {
            return;
        };
        if action == GameAction::MenuBack {
            ctx.command(StackCommand::Pop);
            return;
        }
        if let Some(index) = self.menu.navigate(action) {
            self.confirm(index, ctx);
        }
    }

    fn update(&mut self, _ctx: &mut SceneContext) {}

    fn render(&self, painter: &mut dyn Painter) -> Result<(), String> {
        self.menu.render(painter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input_system::Key;
    use crate::scene::test_support::SceneHarness;

    #[test]
    fn test_escape_and_continue_pop() {
        let mut harness = SceneHarness::new();
        let mut pause = PauseMenu::new();
        assert!(pause.is_translucent());

        harness.press(&mut pause, Key::Escape);
        harness.press(&mut pause, Key::Enter);
        assert_eq!(harness.take_commands(), vec![StackCommand::Pop, StackCommand::Pop]);
    }

    #[test]
    fn test_restart_pops_then_restarts() {
        let mut harness = SceneHarness::new();
        let mut pause = PauseMenu::new();
        harness.press(&mut pause, Key::Down);
        harness.press(&mut pause, Key::Enter);
        assert_eq!(
            harness.take_commands(),
            vec![StackCommand::Pop, StackCommand::RestartCurrent]
        );
    }

    #[test]
    fn test_settings_and_main_menu() {
        let mut harness = SceneHarness::new();
        let mut pause = PauseMenu::new();
        harness.press(&mut pause, Key::Down);
        harness.press(&mut pause, Key::Down);
        harness.press(&mut pause, Key::Enter);
        harness.press(&mut pause, Key::Down);
        harness.press(&mut pause, Key::Space);
        assert_eq!(
            harness.take_commands(),
            vec![
                StackCommand::Push(SceneHandle::settings()),
                StackCommand::ReturnToRoot
            ]
        );
    }

    #[test]
    fn test_selection_resets_when_reentered() {
        let mut harness = SceneHarness::new();
        let mut pause = PauseMenu::new();
        harness.press(&mut pause, Key::Down);
        harness.with_ctx(|ctx| pause.on_enter(ctx));
        harness.press(&mut pause, Key::Enter);
        assert_eq!(harness.take_commands(), vec![StackCommand::Pop]);
    }
}
