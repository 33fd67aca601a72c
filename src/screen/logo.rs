//! Logo splash: auto-advances to the title

use super::{CONTINUE, FinishCode, Screen, ScreenContext, ScreenId};
use crate::consts::LOGO_FRAMES;
use crate::render::{DrawItem, RenderFrame, palette};

const LOGO_TEXT: &str = "DELVE ARENA";
/// Frames per revealed letter
const LETTER_FRAMES: u32 = 6;

#[derive(Debug, Default)]
pub struct LogoScreen {
    frames: u32,
}

impl LogoScreen {
    fn letters_shown(&self) -> usize {
        ((self.frames / LETTER_FRAMES) as usize).min(LOGO_TEXT.len())
    }
}

impl Screen for LogoScreen {
    fn id(&self) -> ScreenId {
        ScreenId::Logo
    }

    fn init(&mut self, _ctx: &mut ScreenContext) {
        self.frames = 0;
    }

    fn update(&mut self, ctx: &mut ScreenContext) -> FinishCode {
        self.frames += 1;
        if self.frames >= LOGO_FRAMES || ctx.input.confirm {
            1
        } else {
            CONTINUE
        }
    }

    fn draw(&self, _ctx: &ScreenContext, frame: &mut RenderFrame) {
        frame.clear = palette::LOGO_BACKGROUND;
        // Square outline grows over the first half, then the name types in
        let grow = (self.frames as f32 / (LOGO_FRAMES as f32 / 2.0)).min(1.0);
        let side = 0.25 * grow;
        frame.push(DrawItem::panel(0.5 - side / 2.0, 0.4 - side / 2.0, side, side, palette::OVERLAY));
        let shown = &LOGO_TEXT[..self.letters_shown()];
        if !shown.is_empty() {
            frame.text(shown, 0.5, 0.65, 2.0, palette::OVERLAY);
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_letters_reveal_and_cap() {
        let mut logo = LogoScreen::default();
        assert_eq!(logo.letters_shown(), 0);
        logo.frames = LETTER_FRAMES * 3;
        assert_eq!(logo.letters_shown(), 3);
        logo.frames = 10_000;
        assert_eq!(logo.letters_shown(), LOGO_TEXT.len());
    }
}
