//! Title menu: play, drill room, options

use super::{CONTINUE, FinishCode, MenuCursor, Screen, ScreenContext, ScreenId, draw_menu};
use crate::audio::SoundEffect;
use crate::render::{RenderFrame, palette};
use crate::sim::Currency;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TitleItem {
    Play,
    Drill,
    Options,
}

impl TitleItem {
    pub const ALL: [TitleItem; 3] = [TitleItem::Play, TitleItem::Drill, TitleItem::Options];

    pub fn label(&self) -> &'static str {
        match self {
            TitleItem::Play => "PLAY",
            TitleItem::Drill => "DRILL ROOM",
            TitleItem::Options => "OPTIONS",
        }
    }

    fn finish_code(&self) -> FinishCode {
        match self {
            TitleItem::Options => 1,
            TitleItem::Play => 2,
            TitleItem::Drill => 3,
        }
    }
}

#[derive(Debug, Default)]
pub struct TitleScreen {
    cursor: MenuCursor,
    /// Wallet totals shown under the menu, indexed by `Currency::index`
    totals: [u32; Currency::COUNT],
}

impl TitleScreen {
    pub fn selected(&self) -> TitleItem {
        TitleItem::ALL[self.cursor.selected]
    }
}

impl Screen for TitleScreen {
    fn id(&self) -> ScreenId {
        ScreenId::Title
    }

    fn init(&mut self, ctx: &mut ScreenContext) {
        self.cursor = MenuCursor::default();
        let wallet = ctx.storage.load_wallet();
        self.totals = Currency::ALL.map(|c| wallet.total(c));
    }

    fn update(&mut self, ctx: &mut ScreenContext) -> FinishCode {
        self.cursor.navigate(TitleItem::ALL.len(), ctx);
        if !ctx.input.confirm {
            return CONTINUE;
        }
        let item = self.selected();
        ctx.audio.play(SoundEffect::MenuSelect);
        if item != TitleItem::Options {
            ctx.session.begin_run();
        }
        item.finish_code()
    }

    fn draw(&self, _ctx: &ScreenContext, frame: &mut RenderFrame) {
        frame.text("DELVE ARENA", 0.5, 0.2, 3.0, palette::GOLD);
        let items: Vec<String> = TitleItem::ALL.iter().map(|i| i.label().to_string()).collect();
        draw_menu(frame, &items, self.cursor.selected, 0.45);
        for (row, currency) in Currency::ALL.into_iter().enumerate() {
            frame.text(
                format!("{} {}", currency.as_str(), self.totals[currency.index()]),
                0.5,
                0.8 + row as f32 * 0.04,
                1.0,
                palette::TEXT_DIM,
            );
        }
    }

    fn unload(&mut self, _ctx: &mut ScreenContext) {}

    fn next_screen(&self, code: FinishCode) -> Option<ScreenId> {
        match code {
            1 => Some(ScreenId::Options),
            2 => Some(ScreenId::Gameplay),
            3 => Some(ScreenId::Drill),
            _ => None,
        }
    }
}
