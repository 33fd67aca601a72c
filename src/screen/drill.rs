//! Drill room: shoot blocks for crystal

use super::gameplay::{bank_haul, close_run, draw_arena_screen, step_arena};
use super::{CONTINUE, FinishCode, Screen, ScreenContext, ScreenId};
use crate::render::{Camera, RenderFrame, palette};
use crate::sim::ArenaState;

#[derive(Debug, Default)]
pub struct DrillScreen {
    state: Option<ArenaState>,
    camera: Option<Camera>,
    /// Leaving for the title ends the run
    to_title: bool,
}

impl Screen for DrillScreen {
    fn id(&self) -> ScreenId {
        ScreenId::Drill
    }

    fn init(&mut self, ctx: &mut ScreenContext) {
        let state = ArenaState::drill(ctx.session.next_seed());
        self.camera = Some(Camera::following(state.player.body.position));
        self.state = Some(state);
        self.to_title = false;
    }

    fn update(&mut self, ctx: &mut ScreenContext) -> FinishCode {
        let (Some(state), Some(camera)) = (self.state.as_mut(), self.camera.as_mut()) else {
            return CONTINUE;
        };
        if ctx.input.back {
            self.to_title = true;
            return 2;
        }
        if ctx.input.confirm {
            return 1;
        }
        step_arena(state, camera, ctx);
        CONTINUE
    }

    fn draw(&self, ctx: &ScreenContext, frame: &mut RenderFrame) {
        if let (Some(state), Some(camera)) = (&self.state, self.camera) {
            draw_arena_screen(state, camera, ctx, frame);
            frame.text("CONFIRM: DUNGEON  BACK: TITLE", 0.5, 0.95, 1.0, palette::TEXT_DIM);
        }
    }

    fn unload(&mut self, ctx: &mut ScreenContext) {
        self.camera = None;
        if let Some(state) = self.state.take() {
            bank_haul(&state, ctx);
        }
        // A dungeon run that detoured here is recorded on the way out
        if self.to_title {
            if let Some(health) = ctx.session.carried_health.take() {
                close_run(ctx, health, false);
            }
        }
    }

    fn next_screen(&self, code: FinishCode) -> Option<ScreenId> {
        match code {
            1 => Some(ScreenId::Gameplay),
            2 => Some(ScreenId::Title),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::AudioManager;
    use crate::persistence::Storage;
    use crate::screen::gameplay::SAVE_SLOT;
    use crate::sim::TickInput;
    use tempfile::TempDir;

    #[test]
    fn test_title_exit_closes_a_detoured_run() {
        let dir = TempDir::new().unwrap();
        let mut ctx = ScreenContext::new(Storage::new(dir.path()), AudioManager::default());
        ctx.session.begin_run();
        ctx.session.carried_health = Some(0.5);
        ctx.session.frames = 25;

        let mut screen = DrillScreen::default();
        screen.init(&mut ctx);
        ctx.input = TickInput {
            back: true,
            ..Default::default()
        };
        let code = screen.update(&mut ctx);
        assert_eq!(screen.next_screen(code), Some(ScreenId::Title));
        screen.unload(&mut ctx);

        let slot = ctx.storage.load_slot(SAVE_SLOT);
        assert_eq!(slot.playtime_frames, 25);
        assert_eq!(slot.health, 0.5);
        assert_eq!(ctx.session.carried_health, None);
    }

    #[test]
    fn test_dungeon_exit_keeps_the_run_open() {
        let dir = TempDir::new().unwrap();
        let mut ctx = ScreenContext::new(Storage::new(dir.path()), AudioManager::default());
        ctx.session.carried_health = Some(0.5);

        let mut screen = DrillScreen::default();
        screen.init(&mut ctx);
        ctx.input = TickInput {
            confirm: true,
            ..Default::default()
        };
        let code = screen.update(&mut ctx);
        assert_eq!(screen.next_screen(code), Some(ScreenId::Gameplay));
        screen.unload(&mut ctx);
        assert_eq!(ctx.session.carried_health, Some(0.5));
    }
}
