//! Delve Arena entry point
//!
//! The native binary is a headless runner: it plays a scripted input sequence
//! through every screen and logs what happens. A windowed frontend drives
//! `Game::frame` the same way, one call per rendered frame.
//!
//! Usage: `delve-arena [STORAGE_DIR]` (falls back to `DELVE_STORAGE_DIR`, then `storage/`).
//! Set `RUST_LOG=info` (or `trace` for audio) to see the run.

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use delve_arena::Game;
    use delve_arena::audio::{AudioManager, TraceBackend};
    use delve_arena::persistence::Storage;
    use delve_arena::screen::ScreenId;
    use delve_arena::sim::{Currency, TickInput};
    use glam::Vec3;

    const DT: f32 = 1.0 / 60.0;

    /// One scripted phase: hold `input` for up to `frames` frames
    struct Step {
        label: &'static str,
        input: TickInput,
        frames: u32,
        /// Stop early once this screen is current and the fade is over
        until: Option<ScreenId>,
    }

    fn press(label: &'static str, input: TickInput, until: Option<ScreenId>) -> Step {
        Step {
            label,
            input,
            frames: 1,
            until,
        }
    }

    fn hold(label: &'static str, input: TickInput, frames: u32) -> Step {
        Step {
            label,
            input,
            frames,
            until: None,
        }
    }

    fn wait_for(label: &'static str, screen: ScreenId, frames: u32) -> Step {
        Step {
            label,
            input: TickInput::default(),
            frames,
            until: Some(screen),
        }
    }

    fn script() -> Vec<Step> {
        let confirm = TickInput {
            confirm: true,
            ..Default::default()
        };
        let back = TickInput {
            back: true,
            ..Default::default()
        };
        let down = TickInput {
            down: true,
            ..Default::default()
        };
        let right = TickInput {
            right: true,
            ..Default::default()
        };
        let walk = |x: f32, z: f32| TickInput {
            movement: Vec3::new(x, 0.0, z),
            ..Default::default()
        };
        let fire = TickInput {
            fire: true,
            ..Default::default()
        };

        vec![
            wait_for("logo plays out", ScreenId::Title, 400),
            // Title: Play, Drill, Options
            press("select options", down, None),
            press("select options", down, None),
            press("open options", confirm, None),
            wait_for("enter options", ScreenId::Options, 200),
            press("select show fps", down, None),
            press("select show fps", down, None),
            press("select show fps", down, None),
            press("select show fps", down, None),
            press("toggle show fps", right, None),
            press("leave options", back, None),
            wait_for("back at title", ScreenId::Title, 200),
            press("play", confirm, None),
            wait_for("enter dungeon", ScreenId::Gameplay, 200),
            hold("walk forward", walk(0.0, -1.0), 90),
            hold("strafe", walk(1.0, -0.5), 60),
            press(
                "jump",
                TickInput {
                    jump: true,
                    ..Default::default()
                },
                None,
            ),
            hold("shoot", fire, 60),
            hold("walk toward the drill pad", walk(1.0, -1.0), 300),
            wait_for("drill room or dungeon", ScreenId::Drill, 200),
            hold("shoot blocks", fire, 240),
            press("return to the dungeon", confirm, None),
            wait_for("dungeon again", ScreenId::Gameplay, 200),
            hold("stand and fight", fire, 600),
            press("give up", back, None),
            wait_for("title", ScreenId::Title, 200),
        ]
    }

    fn run_step(game: &mut Game, step: &Step) {
        let start = game.current_screen();
        let mut frames = 0;
        for _ in 0..step.frames {
            game.frame(step.input, DT);
            frames += 1;
            if step.until.is_some_and(|id| id == game.current_screen()) && !game.is_transitioning() {
                break;
            }
        }
        log::info!(
            "[{}] {:?} -> {:?} after {} frames",
            step.label,
            start,
            game.current_screen(),
            frames
        );
    }

    pub fn run() {
        env_logger::init();
        let root = Storage::resolve_root(std::env::args().nth(1));
        log::info!("Delve Arena (headless) starting, storage at {}", root.display());

        let storage = Storage::new(root);
        let audio = AudioManager::new(Some(Box::new(TraceBackend)));
        let mut game = Game::new(storage.clone(), audio);

        for step in script() {
            run_step(&mut game, &step);
        }
        game.shutdown();

        let wallet = storage.load_wallet();
        println!("\nRun finished after {} frames", game.frame_count());
        for currency in Currency::ALL {
            println!("  {:<8} {}", currency.as_str(), wallet.total(currency));
        }
        println!("  show_fps {}", game.settings().show_fps);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    headless::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // No browser frontend; the library is driven by the embedding host
}
