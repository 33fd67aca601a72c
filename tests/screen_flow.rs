//! Drive the whole game through `Game::frame` against a temp storage root

use delve_arena::Game;
use delve_arena::audio::AudioManager;
use delve_arena::persistence::{CurrencyWallet, SaveSlot, Storage};
use delve_arena::screen::ScreenId;
use delve_arena::settings::Settings;
use delve_arena::sim::{Currency, TickInput};
use glam::Vec3;
use tempfile::TempDir;

const DT: f32 = 1.0 / 60.0;

fn new_game() -> (Game, Storage, TempDir) {
    let dir = TempDir::new().unwrap();
    let storage = Storage::new(dir.path());
    let game = Game::new(storage.clone(), AudioManager::default());
    (game, storage, dir)
}

fn input(f: impl FnOnce(&mut TickInput)) -> TickInput {
    let mut input = TickInput::default();
    f(&mut input);
    input
}

/// One frame of `input`, then idle frames until any fade is over
fn press(game: &mut Game, input: TickInput) {
    game.frame(input, DT);
    for _ in 0..500 {
        if !game.is_transitioning() {
            return;
        }
        game.frame(TickInput::default(), DT);
    }
    panic!("transition never finished");
}

fn hold(game: &mut Game, input: TickInput, frames: u32) {
    for _ in 0..frames {
        game.frame(input, DT);
    }
}

fn to_title(game: &mut Game) {
    press(game, input(|i| i.confirm = true));
    assert_eq!(game.current_screen(), ScreenId::Title);
}

#[test]
fn options_changes_are_saved_on_exit() {
    let (mut game, storage, _dir) = new_game();
    to_title(&mut game);

    // Title: Play, Drill, Options
    press(&mut game, input(|i| i.down = true));
    press(&mut game, input(|i| i.down = true));
    press(&mut game, input(|i| i.confirm = true));
    assert_eq!(game.current_screen(), ScreenId::Options);

    // Options: Master, Music, Sfx, Mute, Show FPS, ...
    for _ in 0..4 {
        press(&mut game, input(|i| i.down = true));
    }
    press(&mut game, input(|i| i.confirm = true));
    assert!(game.settings().show_fps);

    press(&mut game, input(|i| i.back = true));
    assert_eq!(game.current_screen(), ScreenId::Title);

    let saved: Settings = storage.read("settings.json").unwrap();
    assert!(saved.show_fps);

    // A new game picks the saved settings up
    let reloaded = Game::new(storage.clone(), AudioManager::default());
    assert!(reloaded.settings().show_fps);
}

#[test]
fn gameplay_writes_records_on_exit() {
    let (mut game, storage, _dir) = new_game();
    to_title(&mut game);
    press(&mut game, input(|i| i.confirm = true));
    assert_eq!(game.current_screen(), ScreenId::Gameplay);
    assert_eq!(game.context().session.run, 1);

    hold(&mut game, input(|i| i.movement = Vec3::NEG_Z), 30);
    let frames = game.context().session.frames;
    assert!(frames >= 30);

    press(&mut game, input(|i| i.back = true));
    assert_eq!(game.current_screen(), ScreenId::Title);

    let slot: SaveSlot = storage.read("slot/1.json").unwrap();
    assert!(slot.playtime_frames >= 30);
    assert!(storage.path("level_1.json").exists());
    assert!(storage.path(CurrencyWallet::FILE_NAME).exists());
}

#[test]
fn drill_room_pays_crystal_into_wallet() {
    let (mut game, storage, _dir) = new_game();
    to_title(&mut game);
    press(&mut game, input(|i| i.down = true));
    press(&mut game, input(|i| i.confirm = true));
    assert_eq!(game.current_screen(), ScreenId::Drill);

    // Line up with a block, then face the row again
    hold(&mut game, input(|i| i.movement = Vec3::X), 5);
    hold(&mut game, input(|i| i.movement = Vec3::NEG_Z), 1);
    hold(&mut game, input(|i| i.fire = true), 180);
    assert!(game.context().session.frames > 180);

    press(&mut game, input(|i| i.back = true));
    assert_eq!(game.current_screen(), ScreenId::Title);
    assert!(game.context().session.collected[Currency::Crystal.index()] >= 1);
    assert!(storage.load_wallet().total(Currency::Crystal) >= 1);
}

#[test]
fn drill_confirm_returns_to_dungeon() {
    let (mut game, _storage, _dir) = new_game();
    to_title(&mut game);
    press(&mut game, input(|i| i.down = true));
    press(&mut game, input(|i| i.confirm = true));
    assert_eq!(game.current_screen(), ScreenId::Drill);

    press(&mut game, input(|i| i.confirm = true));
    assert_eq!(game.current_screen(), ScreenId::Gameplay);
    assert_eq!(game.context().session.arenas, 2);
}

#[test]
fn every_frame_has_bounded_overlay_and_camera_in_arenas() {
    let (mut game, _storage, _dir) = new_game();
    to_title(&mut game);
    game.frame(input(|i| i.confirm = true), DT);
    let mut saw_gameplay_camera = false;
    for _ in 0..200 {
        let frame = game.frame(TickInput::default(), DT);
        assert!((0.0..=1.0).contains(&frame.overlay_alpha));
        if game.current_screen() == ScreenId::Gameplay {
            saw_gameplay_camera |= frame.camera.is_some();
        }
    }
    assert!(saw_gameplay_camera);
}
