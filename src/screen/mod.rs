//! Screen state machine
//!
//! Each screen implements `Screen` and declares its own exits through
//! `next_screen`. `Game` dispatches through a `ScreenTable` and runs the
//! fade protocol in `transition`.

pub mod drill;
pub mod ending;
pub mod gameplay;
pub mod logo;
pub mod options;
pub mod title;
pub mod transition;

use crate::audio::{AudioManager, SoundEffect};
use crate::persistence::Storage;
use crate::render::RenderFrame;
use crate::settings::Settings;
use crate::sim::{ArenaOutcome, ArenaState, Currency, GameEvent, TickInput};

pub use transition::{Transition, TransitionStep};

/// Value returned by `Screen::update`; 0 keeps the screen running
pub type FinishCode = u8;

pub const CONTINUE: FinishCode = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScreenId {
    Logo,
    Title,
    Options,
    Gameplay,
    Drill,
    Ending,
    /// No screen; used as the idle transition target
    Unknown,
}

impl ScreenId {
    /// Every real screen, in table order
    pub const ALL: [ScreenId; 6] = [
        ScreenId::Logo,
        ScreenId::Title,
        ScreenId::Options,
        ScreenId::Gameplay,
        ScreenId::Drill,
        ScreenId::Ending,
    ];

    fn slot(self) -> Option<usize> {
        Self::ALL.iter().position(|&id| id == self)
    }
}

/// Run totals carried from the arenas to the ending screen
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    /// Runs started since launch
    pub run: u32,
    /// Arenas built during this run
    pub arenas: u32,
    pub collected: [u32; Currency::COUNT],
    pub frames: u64,
    pub npcs_defeated: u32,
    /// How the last arena ended
    pub outcome: Option<ArenaOutcome>,
    /// Player health carried through a drill room visit
    pub carried_health: Option<f32>,
}

impl Session {
    const BASE_SEED: u64 = 0x00DE_17E5;

    /// Start a fresh run, dropping the previous totals
    pub fn begin_run(&mut self) {
        *self = Session {
            run: self.run + 1,
            ..Default::default()
        };
        log::info!("Run {} started", self.run);
    }

    /// Seed for the next arena of this run
    pub fn next_seed(&mut self) -> u64 {
        self.arenas += 1;
        Self::BASE_SEED ^ ((self.run as u64) << 32) ^ self.arenas as u64
    }

    /// Per-frame bookkeeping while an arena is live
    pub fn record_tick(&mut self, events: &[GameEvent]) {
        self.frames += 1;
        self.npcs_defeated += events
            .iter()
            .filter(|e| **e == GameEvent::NpcDefeated)
            .count() as u32;
    }

    /// Fold an arena's haul into the run totals
    pub fn absorb(&mut self, state: &ArenaState) {
        for currency in Currency::ALL {
            self.collected[currency.index()] += state.collected[currency.index()];
        }
        self.outcome = Some(state.outcome);
    }

    pub fn total_collected(&self) -> u32 {
        self.collected.iter().sum()
    }
}

/// Shared state handed to every screen hook
#[derive(Debug)]
pub struct ScreenContext {
    /// This frame's input
    pub input: TickInput,
    /// Clamped frame time in seconds
    pub dt: f32,
    /// Smoothed frames per second
    pub fps: f32,
    pub settings: Settings,
    pub storage: Storage,
    pub audio: AudioManager,
    pub session: Session,
}

impl ScreenContext {
    pub fn new(storage: Storage, mut audio: AudioManager) -> Self {
        let settings = Settings::load(&storage);
        audio.apply_settings(&settings);
        Self {
            input: TickInput::default(),
            dt: 0.0,
            fps: 0.0,
            settings,
            storage,
            audio,
            session: Session::default(),
        }
    }
}

/// One screen of the game
pub trait Screen {
    fn id(&self) -> ScreenId;

    /// Called when the screen becomes current (after the fade-in)
    fn init(&mut self, ctx: &mut ScreenContext);

    /// Advance one frame; a non-zero code asks to leave
    fn update(&mut self, ctx: &mut ScreenContext) -> FinishCode;

    fn draw(&self, ctx: &ScreenContext, frame: &mut RenderFrame);

    /// Called when the screen stops being current
    fn unload(&mut self, ctx: &mut ScreenContext);

    /// Where a finish code leads
    fn next_screen(&self, code: FinishCode) -> Option<ScreenId>;
}

/// Every screen, addressed by id
pub struct ScreenTable {
    screens: Vec<Box<dyn Screen>>,
}

impl ScreenTable {
    /// The full game: logo, title, options, gameplay, drill room, ending
    pub fn standard() -> Self {
        let screens: Vec<Box<dyn Screen>> = vec![
            Box::new(logo::LogoScreen::default()),
            Box::new(title::TitleScreen::default()),
            Box::new(options::OptionsScreen::default()),
            Box::new(gameplay::GameplayScreen::default()),
            Box::new(drill::DrillScreen::default()),
            Box::new(ending::EndingScreen::default()),
        ];
        debug_assert!(screens.iter().zip(ScreenId::ALL).all(|(s, id)| s.id() == id));
        Self { screens }
    }

    pub fn get(&self, id: ScreenId) -> Option<&dyn Screen> {
        id.slot().map(|i| self.screens[i].as_ref())
    }

    pub fn get_mut(&mut self, id: ScreenId) -> Option<&mut (dyn Screen + 'static)> {
        id.slot().map(|i| self.screens[i].as_mut())
    }
}

impl std::fmt::Debug for ScreenTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.screens.iter().map(|s| s.id()))
            .finish()
    }
}

/// Up/down cursor over a fixed list of menu entries
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MenuCursor {
    pub selected: usize,
}

impl MenuCursor {
    /// Move on up/down presses (wrapping); plays the move sound when it moved
    pub fn navigate(&mut self, len: usize, ctx: &mut ScreenContext) -> bool {
        if len == 0 {
            return false;
        }
        let before = self.selected;
        if ctx.input.up {
            self.selected = (self.selected + len - 1) % len;
        } else if ctx.input.down {
            self.selected = (self.selected + 1) % len;
        }
        let moved = self.selected != before;
        if moved {
            ctx.audio.play(SoundEffect::MenuMove);
        }
        moved
    }
}

/// Draw a vertical menu with the selected entry highlighted
pub(crate) fn draw_menu(frame: &mut RenderFrame, items: &[String], selected: usize, top: f32) {
    use crate::render::palette;
    for (i, item) in items.iter().enumerate() {
        let (label, color) = if i == selected {
            (format!("> {} <", item), palette::HIGHLIGHT)
        } else {
            (item.clone(), palette::TEXT)
        };
        frame.text(label, 0.5, top + i as f32 * 0.07, 1.5, color);
    }
}
