//! Dungeon gameplay screen
//!
//! Owns an `ArenaState` between init and unload. The run's haul is written
//! to the wallet, the save slot and the level record on unload.

use super::{CONTINUE, FinishCode, Screen, ScreenContext, ScreenId};
use crate::render::{Camera, RenderFrame, draw_arena, draw_hud, palette};
use crate::sim::{ArenaOutcome, ArenaState, Currency, tick};

/// Save slot written by the dungeon
pub const SAVE_SLOT: u32 = 1;
/// Level record id of the dungeon
pub const DUNGEON_LEVEL: u32 = 1;

/// Tick an arena one frame and move the camera with the player
///
/// The camera is captured before the step and put back when the player's
/// move was reverted, so a blocked frame never jitters the view.
pub(crate) fn step_arena(state: &mut ArenaState, camera: &mut Camera, ctx: &mut ScreenContext) {
    let saved = *camera;
    tick(state, &ctx.input, ctx.dt);
    ctx.audio.play_events(&state.events);
    ctx.session.record_tick(&state.events);

    let reverted = state.last_step.is_some_and(|s| s.reverted);
    *camera = if reverted {
        saved
    } else {
        Camera::following(state.player.body.position)
    };
}

/// Move an arena's haul into the wallet and the session totals
///
/// Clearing the dungeon banks everything carried.
pub(crate) fn bank_haul(state: &ArenaState, ctx: &mut ScreenContext) {
    ctx.session.absorb(state);
    let cleared = state.outcome == ArenaOutcome::Cleared;
    if state.total_collected() == 0 && !cleared {
        return;
    }
    let mut wallet = ctx.storage.load_wallet();
    wallet.deposit_all(&state.collected);
    if cleared {
        log::info!("Dungeon cleared, banked {} coins", wallet.bank_all());
    }
    if let Err(err) = ctx.storage.save_wallet(&wallet) {
        log::warn!("Wallet not saved: {}", err);
    }
    log::info!(
        "Deposited {} gold, {} silver, {} crystal",
        state.collected[Currency::Gold.index()],
        state.collected[Currency::Silver.index()],
        state.collected[Currency::Crystal.index()]
    );
}

/// Write a finished run to the save slot and the dungeon's level record
pub(crate) fn close_run(ctx: &mut ScreenContext, health: f32, cleared: bool) {
    let gold = ctx.session.collected[Currency::Gold.index()];

    let mut slot = ctx.storage.load_slot(SAVE_SLOT);
    slot.record_run(gold, health, ctx.session.frames);
    if cleared {
        slot.level = slot.level.max(DUNGEON_LEVEL + 1);
    }
    if let Err(err) = ctx.storage.save_slot(&slot) {
        log::warn!("Save slot not written: {}", err);
    }

    let mut record = ctx.storage.load_level(DUNGEON_LEVEL);
    if record.record_run(cleared, gold) {
        log::info!("New best on level {}: {} gold", DUNGEON_LEVEL, gold);
    }
    if let Err(err) = ctx.storage.save_level(&record) {
        log::warn!("Level record not written: {}", err);
    }
}

pub(crate) fn draw_arena_screen(state: &ArenaState, camera: Camera, ctx: &ScreenContext, frame: &mut RenderFrame) {
    frame.camera = Some(camera);
    draw_arena(state, frame);
    draw_hud(state, frame);
    if ctx.settings.show_fps {
        frame.text(format!("{:.0} FPS", ctx.fps), 0.92, 0.02, 1.0, palette::TEXT_DIM);
    }
}

#[derive(Debug, Default)]
pub struct GameplayScreen {
    state: Option<ArenaState>,
    camera: Option<Camera>,
}

impl Screen for GameplayScreen {
    fn id(&self) -> ScreenId {
        ScreenId::Gameplay
    }

    fn init(&mut self, ctx: &mut ScreenContext) {
        let seed = ctx.session.next_seed();
        let mut state = ArenaState::dungeon(seed);
        let slot = ctx.storage.load_slot(SAVE_SLOT);
        log::info!(
            "Slot {}: level {}, {} gold, {} frames played",
            slot.id,
            slot.level,
            slot.gold,
            slot.playtime_frames
        );
        let health = ctx.session.carried_health.take().unwrap_or(slot.health);
        state.player.health = health.max(0.25);
        self.camera = Some(Camera::following(state.player.body.position));
        self.state = Some(state);
    }

    fn update(&mut self, ctx: &mut ScreenContext) -> FinishCode {
        let (Some(state), Some(camera)) = (self.state.as_mut(), self.camera.as_mut()) else {
            return CONTINUE;
        };
        if ctx.input.back {
            return 2;
        }
        step_arena(state, camera, ctx);
        match state.outcome {
            ArenaOutcome::Continue => CONTINUE,
            ArenaOutcome::Defeated | ArenaOutcome::Cleared => 1,
            ArenaOutcome::EnterDrill => 3,
        }
    }

    fn draw(&self, ctx: &ScreenContext, frame: &mut RenderFrame) {
        if let (Some(state), Some(camera)) = (&self.state, self.camera) {
            draw_arena_screen(state, camera, ctx, frame);
        }
    }

    fn unload(&mut self, ctx: &mut ScreenContext) {
        let Some(state) = self.state.take() else {
            return;
        };
        self.camera = None;
        bank_haul(&state, ctx);

        // A defeat still records the run, but the next one starts healed
        let health = if state.player.is_dead() { 1.0 } else { state.player.health };
        if state.outcome == ArenaOutcome::EnterDrill {
            ctx.session.carried_health = Some(health);
            log::debug!("Run {} continues in the drill room", ctx.session.run);
            return;
        }
        ctx.session.carried_health = None;
        close_run(ctx, health, state.outcome == ArenaOutcome::Cleared);
    }

    fn next_screen(&self, code: FinishCode) -> Option<ScreenId> {
        match code {
            1 => Some(ScreenId::Ending),
            2 => Some(ScreenId::Title),
            3 => Some(ScreenId::Drill),
            _ => None,
        }
    }
}
