//! Sword Runner headless runner
//!
//! Loads a level, plays it with scripted input and prints the final render
//! snapshot. Rendering and real audio are left to a frontend.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use sword_runner::audio::{AudioManager, LoggingAudio};
use sword_runner::consts::MAX_SUBSTEPS;
use sword_runner::leaderboard::{Leaderboard, LevelResult};
use sword_runner::level;
use sword_runner::platform::now_millis;
use sword_runner::settings::Settings;
use sword_runner::sim::{GameEvent, GamePhase, GameState, TickInput, tick};
use sword_runner::snapshot::RenderSnapshot;

/// Frame length of the simulated display
const FRAME_DT: f32 = 1.0 / 30.0;

#[derive(Parser)]
#[command(name = "sword-runner")]
#[command(about = "Play a Sword Runner level headlessly with scripted input")]
struct Args {
    /// Built-in level index
    #[arg(long, default_value_t = 0)]
    level: u32,
    /// Custom level file (overrides --level)
    #[arg(long)]
    custom: Option<PathBuf>,
    /// Save game to resume (overrides --level and --custom); relative
    /// paths are looked up in the settings' saves directory
    #[arg(long)]
    load: Option<PathBuf>,
    /// Simulation ticks to run
    #[arg(long, default_value_t = 600)]
    ticks: u64,
    /// Write a save game here when done (relative to the saves directory)
    #[arg(long)]
    save: Option<PathBuf>,
    /// Settings file
    #[arg(long, default_value = "settings.json")]
    settings: PathBuf,
    /// Print the whole snapshot as JSON
    #[arg(long)]
    json: bool,
}

/// Game instance holding all state
struct Game {
    state: GameState,
    accumulator: f32,
    dt: f32,
    /// Wall clock at tick 0; the level clock runs on simulated time
    start_millis: u64,
    ticks_per_second: u64,
    ticks: u64,
}

impl Game {
    fn new(state: GameState, settings: &Settings, start_millis: u64) -> Self {
        Self {
            state,
            accumulator: 0.0,
            dt: settings.sim_dt(),
            start_millis,
            ticks_per_second: u64::from(settings.ticks_per_second.max(1)),
            ticks: 0,
        }
    }

    fn now_millis(&self) -> u64 {
        self.start_millis + self.ticks * 1000 / self.ticks_per_second
    }

    /// Run simulation ticks for one frame
    fn update(&mut self, frame_dt: f32) {
        self.accumulator += frame_dt.min(0.1);

        let mut substeps = 0;
        while self.accumulator >= self.dt && substeps < MAX_SUBSTEPS {
            let input = TickInput {
                now_millis: self.now_millis(),
                ..scripted_input(self.ticks)
            };
            tick(&mut self.state, &input, self.dt);
            self.accumulator -= self.dt;
            self.ticks += 1;
            substeps += 1;
        }
    }

    fn finished(&self) -> bool {
        matches!(
            self.state.phase,
            GamePhase::GameOver | GamePhase::LevelComplete
        )
    }
}

/// Hold right, jump now and then, swing the sword every other second
fn scripted_input(tick: u64) -> TickInput {
    TickInput {
        right: true,
        jump: tick % 45 < 8,
        attack: tick % 120 == 60,
        ..Default::default()
    }
}

fn load_state(args: &Args, settings: &Settings, now: u64) -> Result<GameState> {
    let strict = settings.strict_level_files;
    if let Some(path) = &args.load {
        let path = settings.save_file(path);
        level::load_saved(&path, strict, now)
            .with_context(|| format!("loading save {}", path.display()))
    } else if let Some(path) = &args.custom {
        level::load_custom(path, strict, now)
            .with_context(|| format!("loading level {}", path.display()))
    } else {
        level::load_builtin(args.level, now).context("loading built-in level")
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let settings = Settings::load(&args.settings);
    log::info!("Sword Runner (headless) starting as {}", settings.player_name);

    let start = now_millis();
    let state = load_state(&args, &settings, start)?;
    let mut game = Game::new(state, &settings, start);
    let mut audio = AudioManager::from_settings(LoggingAudio, &settings);
    let mut leaderboard = Leaderboard::load(&settings.leaderboard_path).with_context(|| {
        format!("reading leaderboard {}", settings.leaderboard_path.display())
    })?;

    while game.ticks < args.ticks && !game.finished() {
        game.update(FRAME_DT);

        let events = game.state.drain_events();
        audio.dispatch(&events);
        for event in &events {
            match *event {
                GameEvent::LevelCompleted {
                    level,
                    score,
                    elapsed_secs,
                } => {
                    let Some(index) = level.builtin_index() else {
                        continue;
                    };
                    let result = LevelResult {
                        name: settings.player_name.clone(),
                        level: index,
                        time_secs: u32::try_from(elapsed_secs).unwrap_or(u32::MAX),
                        score,
                    };
                    leaderboard
                        .append(&settings.leaderboard_path, result)
                        .context("recording result")?;
                }
                GameEvent::GameOver { score } => println!("Game over with {score} points"),
                _ => {}
            }
        }
    }

    if let Some(path) = &args.save {
        let path = settings.save_file(path);
        match level::save_game(&game.state, &path) {
            Ok(()) => println!("Saved to {}", path.display()),
            Err(e) => log::warn!("Not saved: {e}"),
        }
    }

    let snapshot = RenderSnapshot::from_state(&game.state);
    if args.json {
        println!("{}", snapshot.to_json()?);
    } else {
        println!(
            "{:?} {:?} after {} ticks: score {}, health {}, camera {:.1}, {} visible bodies",
            snapshot.level,
            snapshot.phase,
            game.ticks,
            snapshot.hud.score,
            snapshot.hud.health,
            snapshot.camera_offset,
            snapshot.bodies.len()
        );
    }

    let unlocked = leaderboard.unlocked_level(&settings.player_name);
    println!("{} may start up to level {}", settings.player_name, unlocked + 1);
    Ok(())
}
