//! Top-level frame loop
//!
//! `Game` owns the screen table, the shared screen context and the fade
//! transition. One call to `frame` runs one update and produces one
//! `RenderFrame`.

use crate::audio::{AudioManager, MusicTrack, SoundEffect};
use crate::consts::MAX_FRAME_DT;
use crate::persistence::Storage;
use crate::render::RenderFrame;
use crate::screen::{
    CONTINUE, Screen, ScreenContext, ScreenId, ScreenTable, Transition, TransitionStep,
};
use crate::settings::Settings;
use crate::sim::TickInput;

/// Frames averaged for the FPS readout
const FPS_WINDOW: usize = 60;

#[derive(Debug, Clone)]
struct FpsCounter {
    frame_times: [f32; FPS_WINDOW],
    frame_index: usize,
}

impl FpsCounter {
    fn new() -> Self {
        Self {
            frame_times: [0.0; FPS_WINDOW],
            frame_index: 0,
        }
    }

    /// Record a frame time and return the average rate over the window
    fn push(&mut self, dt: f32) -> f32 {
        self.frame_times[self.frame_index] = dt;
        self.frame_index = (self.frame_index + 1) % FPS_WINDOW;
        let recorded = self.frame_times.iter().filter(|&&t| t > 0.0);
        let (count, elapsed) = recorded.fold((0usize, 0.0f32), |(n, sum), t| (n + 1, sum + t));
        crate::ratio(count as f32, elapsed)
    }
}

fn screen_mut(screens: &mut ScreenTable, id: ScreenId) -> &mut (dyn Screen + 'static) {
    screens
        .get_mut(id)
        .expect("screen table covers every screen but Unknown")
}

#[derive(Debug)]
pub struct Game {
    screens: ScreenTable,
    current: ScreenId,
    transition: Transition,
    ctx: ScreenContext,
    fps: FpsCounter,
    frame_count: u64,
}

impl Game {
    /// Start at the logo screen with data under `storage`
    pub fn new(storage: Storage, audio: AudioManager) -> Self {
        let ctx = ScreenContext::new(storage, audio);
        let transition = Transition::new(ctx.settings.fade_in_step(), ctx.settings.fade_out_step());
        let mut game = Self {
            screens: ScreenTable::standard(),
            current: ScreenId::Logo,
            transition,
            ctx,
            fps: FpsCounter::new(),
            frame_count: 0,
        };
        screen_mut(&mut game.screens, ScreenId::Logo).init(&mut game.ctx);
        log::info!("Game started at {:?}", game.current);
        game
    }

    /// Run one frame: update (or advance the fade), then draw
    pub fn frame(&mut self, input: TickInput, dt: f32) -> RenderFrame {
        self.frame_count += 1;
        self.ctx.input = input;
        self.ctx.dt = if dt.is_finite() { dt.clamp(0.0, MAX_FRAME_DT) } else { 0.0 };
        self.ctx.fps = self.fps.push(self.ctx.dt);

        if self.transition.is_transitioning() {
            match self.transition.step() {
                TransitionStep::Swap { from, to } => self.swap(from, to),
                TransitionStep::Finished => log::debug!("Transition into {:?} finished", self.current),
                _ => {}
            }
        } else {
            self.update_current();
        }

        let mut frame = RenderFrame::default();
        if let Some(screen) = self.screens.get(self.current) {
            screen.draw(&self.ctx, &mut frame);
        }
        frame.overlay_alpha = self.transition.alpha();
        frame
    }

    fn update_current(&mut self) {
        let current = self.current;
        let screens = &mut self.screens;
        let Some(screen) = screens.get_mut(current) else {
            return;
        };
        let code = screen.update(&mut self.ctx);
        if code == CONTINUE {
            return;
        }
        match screen.next_screen(code) {
            Some(to) => {
                // Options may have changed the fade speeds
                self.transition
                    .set_steps(self.ctx.settings.fade_in_step(), self.ctx.settings.fade_out_step());
                if self.transition.request(to, current) {
                    log::info!("Leaving {:?} for {:?} (code {})", current, to, code);
                    self.ctx.audio.play(SoundEffect::Transition);
                }
            }
            None => log::warn!("{:?} returned unmapped finish code {}", current, code),
        }
    }

    fn swap(&mut self, from: ScreenId, to: ScreenId) {
        if let Some(screen) = self.screens.get_mut(from) {
            screen.unload(&mut self.ctx);
        }
        screen_mut(&mut self.screens, to).init(&mut self.ctx);
        self.current = to;
        self.ctx.audio.play_music(MusicTrack::for_screen(to));
        log::info!("Screen swap {:?} -> {:?}", from, to);
    }

    pub fn current_screen(&self) -> ScreenId {
        self.current
    }

    pub fn is_transitioning(&self) -> bool {
        self.transition.is_transitioning()
    }

    pub fn transition(&self) -> &Transition {
        &self.transition
    }

    pub fn settings(&self) -> &Settings {
        &self.ctx.settings
    }

    pub fn context(&self) -> &ScreenContext {
        &self.ctx
    }

    pub fn context_mut(&mut self) -> &mut ScreenContext {
        &mut self.ctx
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Unload the current screen (flushes its persistence) before exit
    pub fn shutdown(&mut self) {
        let current = self.current;
        if let Some(screen) = self.screens.get_mut(current) {
            screen.unload(&mut self.ctx);
        }
        self.current = ScreenId::Unknown;
        log::info!("Shut down after {} frames", self.frame_count);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn new_game() -> (Game, TempDir) {
        let dir = TempDir::new().unwrap();
        let game = Game::new(Storage::new(dir.path()), AudioManager::default());
        (game, dir)
    }

    fn confirm() -> TickInput {
        TickInput {
            confirm: true,
            ..Default::default()
        }
    }

    /// Run idle frames until the transition is over
    fn settle(game: &mut Game) {
        for _ in 0..200 {
            game.frame(TickInput::default(), 1.0 / 60.0);
            if !game.is_transitioning() {
                return;
            }
        }
        panic!("transition never finished");
    }

    #[test]
    fn test_logo_confirm_leads_to_title() {
        let (mut game, _dir) = new_game();
        assert_eq!(game.current_screen(), ScreenId::Logo);
        game.frame(confirm(), 1.0 / 60.0);
        assert!(game.is_transitioning());
        settle(&mut game);
        assert_eq!(game.current_screen(), ScreenId::Title);
    }

    #[test]
    fn test_logo_auto_advances() {
        let (mut game, _dir) = new_game();
        for _ in 0..crate::consts::LOGO_FRAMES {
            game.frame(TickInput::default(), 1.0 / 60.0);
        }
        assert!(game.is_transitioning());
    }

    #[test]
    fn test_update_suspended_during_transition() {
        let (mut game, _dir) = new_game();
        game.frame(confirm(), 1.0 / 60.0);
        // More confirms while fading must not queue another transition
        for _ in 0..5 {
            game.frame(confirm(), 1.0 / 60.0);
        }
        assert_eq!(game.transition().to(), ScreenId::Title);
    }

    #[test]
    fn test_overlay_alpha_matches_transition() {
        let (mut game, _dir) = new_game();
        let frame = game.frame(confirm(), 1.0 / 60.0);
        assert_eq!(frame.overlay_alpha, 0.0);
        let frame = game.frame(TickInput::default(), 1.0 / 60.0);
        assert!(frame.overlay_alpha > 0.0);
    }

    #[test]
    fn test_huge_dt_is_clamped() {
        let (mut game, _dir) = new_game();
        game.frame(TickInput::default(), 5.0);
        assert_eq!(game.context().dt, MAX_FRAME_DT);
        game.frame(TickInput::default(), f32::NAN);
        assert_eq!(game.context().dt, 0.0);
    }

    #[test]
    fn test_fps_counter_averages() {
        let mut fps = FpsCounter::new();
        let mut rate = 0.0;
        for _ in 0..10 {
            rate = fps.push(0.02);
        }
        assert!((rate - 50.0).abs() < 0.01);
    }
}
