/// Entry point and game loop.

use std::fs::File;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing_subscriber::EnvFilter;

use maze_escape::config::GameConfig;
use maze_escape::domain::entity::MoveDir;
use maze_escape::sim::game::{Game, MazeSource};
use maze_escape::ui::gamepad::GamepadState;
use maze_escape::ui::input::InputState;
use maze_escape::ui::renderer::Renderer;
use maze_escape::ui::sound::SoundEngine;

const FRAME_SLEEP: Duration = Duration::from_millis(5);

// ── Command line ──

#[derive(Debug, Default, PartialEq)]
struct Args {
    seed: Option<u64>,
    config: Option<PathBuf>,
}

impl Args {
    fn parse(mut args: impl Iterator<Item = String>) -> Result<Args, String> {
        let mut parsed = Args::default();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--seed" => {
                    let value = args.next().ok_or("--seed needs a value")?;
                    let seed = value.parse().map_err(|_| format!("bad seed: {value}"))?;
                    parsed.seed = Some(seed);
                }
                "--config" => {
                    let value = args.next().ok_or("--config needs a path")?;
                    parsed.config = Some(PathBuf::from(value));
                }
                other => return Err(format!("unknown argument: {other}")),
            }
        }
        Ok(parsed)
    }
}

fn main() {
    let args = match Args::parse(std::env::args().skip(1)) {
        Ok(a) => a,
        Err(e) => {
            eprintln!("{e}");
            eprintln!("usage: maze-escape [--seed N] [--config PATH]");
            std::process::exit(2);
        }
    };

    let (config, warnings) = GameConfig::load(args.config.as_deref());
    init_tracing(&config);
    for w in &warnings {
        eprintln!("config: {w}");
        tracing::warn!("{w}");
    }

    let source = match &config.maze.layout_file {
        Some(path) => match MazeSource::from_file(path) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("Layout {}: {e}", path.display());
                std::process::exit(1);
            }
        },
        None => MazeSource::Random(config.maze.params.clone()),
    };

    let rng = args.seed.map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);
    let mut game = match Game::new(source, config.start_difficulty, config.speed.move_cooldown_frames, rng) {
        Ok(g) => g,
        Err(e) => {
            eprintln!("Could not start a game: {e}");
            std::process::exit(1);
        }
    };
    tracing::info!(seed = ?args.seed, difficulty = config.start_difficulty.level(), "game started");

    let mut renderer = Renderer::new();
    if let Err(e) = renderer.init() {
        eprintln!("Terminal init failed: {e}");
        return;
    }

    let sound = SoundEngine::new();

    let result = game_loop(&mut game, &mut renderer, sound.as_ref(), &config);

    if let Err(e) = renderer.cleanup() {
        eprintln!("Terminal cleanup failed: {e}");
    }

    if let Err(e) = result {
        tracing::error!(error = %e, "game loop failed");
        eprintln!("Game error: {e}");
    }

    println!();
    println!("Thanks for playing Maze Escape!");
    println!(
        "Sessions: {}   Final difficulty: {}",
        game.sessions_played(),
        game.session().difficulty().level()
    );
}

/// Log to the configured file only; the terminal is in raw mode.
fn init_tracing(config: &GameConfig) {
    let Some(path) = &config.log.file else { return };
    let file = match File::create(path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("could not open log file {}: {e}", path.display());
            return;
        }
    };
    let filter = EnvFilter::try_new(&config.log.level).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .init();
}

fn game_loop(
    game: &mut Game,
    renderer: &mut Renderer,
    sound: Option<&SoundEngine>,
    config: &GameConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut kb = InputState::new();
    let mut gp = GamepadState::new(&config.gamepad);
    let mut last_frame = Instant::now();
    let frame_rate = Duration::from_millis(config.speed.frame_rate_ms);

    loop {
        kb.drain_events();
        gp.update();

        if kb.quit_pressed() || gp.quit_pressed() {
            tracing::info!("quit");
            break;
        }

        if kb.restart_pressed() || gp.restart_pressed() {
            match game.restart() {
                Ok(true) => renderer.invalidate()?,
                Ok(false) => {}
                // keep the finished session on screen; R can be tried again
                Err(e) => tracing::warn!(error = %e, "restart failed"),
            }
        }

        if last_frame.elapsed() >= frame_rate {
            let events = game.frame(detect_movement(&kb, &gp));
            if let Some(sfx) = sound {
                sfx.play_events(&events);
            }
            last_frame = Instant::now();
        }

        renderer.render(game.session())?;
        std::thread::sleep(FRAME_SLEEP);
    }

    Ok(())
}

fn detect_movement(kb: &InputState, gp: &GamepadState) -> Option<MoveDir> {
    kb.held_direction().or_else(|| gp.held_direction())
}
