//! Run summary

use super::{CONTINUE, FinishCode, Screen, ScreenContext, ScreenId};
use crate::render::{RenderFrame, palette};
use crate::sim::{ArenaOutcome, Currency};

#[derive(Debug, Default)]
pub struct EndingScreen {
    frames: u32,
}

/// Frames before input is accepted, so a held key does not skip the summary
const INPUT_DELAY: u32 = 30;

impl Screen for EndingScreen {
    fn id(&self) -> ScreenId {
        ScreenId::Ending
    }

    fn init(&mut self, ctx: &mut ScreenContext) {
        self.frames = 0;
        log::info!(
            "Run {} over: {:?}, {} collected, {} defeated, {} frames",
            ctx.session.run,
            ctx.session.outcome,
            ctx.session.total_collected(),
            ctx.session.npcs_defeated,
            ctx.session.frames
        );
    }

    fn update(&mut self, ctx: &mut ScreenContext) -> FinishCode {
        self.frames = self.frames.saturating_add(1);
        if self.frames > INPUT_DELAY && (ctx.input.confirm || ctx.input.back) {
            1
        } else {
            CONTINUE
        }
    }

    fn draw(&self, ctx: &ScreenContext, frame: &mut RenderFrame) {
        let session = &ctx.session;
        let (headline, color) = match session.outcome {
            Some(ArenaOutcome::Cleared) => ("DUNGEON CLEARED", palette::GOLD),
            Some(ArenaOutcome::Defeated) => ("DEFEATED", palette::PLAYER_DANGER),
            _ => ("RUN OVER", palette::TEXT),
        };
        frame.text(headline, 0.5, 0.2, 3.0, color);
        for (row, currency) in Currency::ALL.into_iter().enumerate() {
            frame.text(
                format!("{}: {}", currency.as_str(), session.collected[currency.index()]),
                0.5,
                0.4 + row as f32 * 0.06,
                1.5,
                palette::TEXT,
            );
        }
        frame.text(
            format!("NPCS DEFEATED: {}", session.npcs_defeated),
            0.5,
            0.62,
            1.5,
            palette::TEXT,
        );
        frame.text(
            format!("TIME: {}s", session.frames / crate::consts::SIM_HZ as u64),
            0.5,
            0.68,
            1.5,
            palette::TEXT,
        );
        if self.frames > INPUT_DELAY {
            frame.text("PRESS CONFIRM", 0.5, 0.85, 1.0, palette::TEXT_DIM);
        }
    }

    fn unload(&mut self, _ctx: &mut ScreenContext) {}

    fn next_screen(&self, code: FinishCode) -> Option<ScreenId> {
        match code {
            1 => Some(ScreenId::Title),
            _ => None,
        }
    }
}
