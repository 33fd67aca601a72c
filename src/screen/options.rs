//! Options menu: volumes and toggles, saved on exit

use super::{CONTINUE, FinishCode, MenuCursor, Screen, ScreenContext, ScreenId, draw_menu};
use crate::audio::SoundEffect;
use crate::render::{RenderFrame, palette};
use crate::settings::{Settings, VOLUME_STEP, step_volume};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionItem {
    MasterVolume,
    MusicVolume,
    SfxVolume,
    Mute,
    ShowFps,
    ReducedMotion,
    Back,
}

impl OptionItem {
    pub const ALL: [OptionItem; 7] = [
        OptionItem::MasterVolume,
        OptionItem::MusicVolume,
        OptionItem::SfxVolume,
        OptionItem::Mute,
        OptionItem::ShowFps,
        OptionItem::ReducedMotion,
        OptionItem::Back,
    ];

    fn label(&self, settings: &Settings) -> String {
        let on_off = |b: bool| if b { "ON" } else { "OFF" };
        let percent = |v: f32| (v * 100.0).round() as u32;
        match self {
            OptionItem::MasterVolume => format!("MASTER {}%", percent(settings.master_volume)),
            OptionItem::MusicVolume => format!("MUSIC {}%", percent(settings.music_volume)),
            OptionItem::SfxVolume => format!("SFX {}%", percent(settings.sfx_volume)),
            OptionItem::Mute => format!("MUTE {}", on_off(settings.muted)),
            OptionItem::ShowFps => format!("SHOW FPS {}", on_off(settings.show_fps)),
            OptionItem::ReducedMotion => format!("REDUCED MOTION {}", on_off(settings.reduced_motion)),
            OptionItem::Back => "BACK".to_string(),
        }
    }

    /// Apply a left (-1) / right (+1) / confirm (0) press; returns true if anything changed
    fn adjust(&self, settings: &mut Settings, direction: i8) -> bool {
        let delta = direction as f32 * VOLUME_STEP;
        let volume = match self {
            OptionItem::MasterVolume => &mut settings.master_volume,
            OptionItem::MusicVolume => &mut settings.music_volume,
            OptionItem::SfxVolume => &mut settings.sfx_volume,
            OptionItem::Mute => return toggle(&mut settings.muted),
            OptionItem::ShowFps => return toggle(&mut settings.show_fps),
            OptionItem::ReducedMotion => return toggle(&mut settings.reduced_motion),
            OptionItem::Back => return false,
        };
        if direction == 0 {
            return false;
        }
        let before = *volume;
        *volume = step_volume(before, delta);
        *volume != before
    }
}

fn toggle(flag: &mut bool) -> bool {
    *flag = !*flag;
    true
}

#[derive(Debug, Default)]
pub struct OptionsScreen {
    cursor: MenuCursor,
}

impl OptionsScreen {
    pub fn selected(&self) -> OptionItem {
        OptionItem::ALL[self.cursor.selected]
    }
}

impl Screen for OptionsScreen {
    fn id(&self) -> ScreenId {
        ScreenId::Options
    }

    fn init(&mut self, _ctx: &mut ScreenContext) {
        self.cursor = MenuCursor::default();
    }

    fn update(&mut self, ctx: &mut ScreenContext) -> FinishCode {
        if ctx.input.back {
            return 1;
        }
        self.cursor.navigate(OptionItem::ALL.len(), ctx);

        let item = self.selected();
        if ctx.input.confirm && item == OptionItem::Back {
            ctx.audio.play(SoundEffect::MenuSelect);
            return 1;
        }

        let direction = if ctx.input.left {
            -1
        } else if ctx.input.right {
            1
        } else {
            0
        };
        let pressed = direction != 0 || ctx.input.confirm;
        if pressed && item.adjust(&mut ctx.settings, direction) {
            ctx.audio.apply_settings(&ctx.settings);
            ctx.audio.play(SoundEffect::MenuSelect);
        }
        CONTINUE
    }

    fn draw(&self, ctx: &ScreenContext, frame: &mut RenderFrame) {
        frame.text("OPTIONS", 0.5, 0.15, 2.5, palette::TEXT);
        let items: Vec<String> = OptionItem::ALL.iter().map(|i| i.label(&ctx.settings)).collect();
        draw_menu(frame, &items, self.cursor.selected, 0.3);
    }

    fn unload(&mut self, ctx: &mut ScreenContext) {
        ctx.settings.save(&ctx.storage);
    }

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
    fn test_volume_adjust_steps_and_clamps() {
        let mut settings = Settings {
            master_volume: 0.9,
            ..Default::default()
        };
        assert!(OptionItem::MasterVolume.adjust(&mut settings, 1));
        assert!((settings.master_volume - 1.0).abs() < 1e-6);
        assert!(!OptionItem::MasterVolume.adjust(&mut settings, 1));
        assert!(!OptionItem::MasterVolume.adjust(&mut settings, 0));
    }

    #[test]
    fn test_toggles_flip_on_any_press() {
        let mut settings = Settings::default();
        assert!(OptionItem::ReducedMotion.adjust(&mut settings, 0));
        assert!(settings.reduced_motion);
        assert!(OptionItem::ReducedMotion.adjust(&mut settings, -1));
        assert!(!settings.reduced_motion);
        assert!(!OptionItem::Back.adjust(&mut settings, 1));
    }

    #[test]
    fn test_labels_show_values() {
        let settings = Settings::default();
        assert_eq!(OptionItem::MasterVolume.label(&settings), "MASTER 80%");
        assert_eq!(OptionItem::Mute.label(&settings), "MUTE OFF");
    }
}
