//! Level loading
//!
//! Built-in levels come from hardcoded manifests. Custom levels and save
//! games are line-record files applied on top of a fresh state, in file
//! order.

pub mod builtin;
pub mod parser;
pub mod save;

use std::path::Path;

use glam::Vec2;

pub use builtin::{BUILTIN_LEVEL_COUNT, BUILTIN_START, load_builtin};
pub use parser::{LevelRecord, parse_line};
pub use save::{save_game, save_records};

use crate::consts::DEFAULT_LEVEL_LENGTH;
use crate::error::LoadError;
use crate::persistence;
use crate::sim::enemy::EnemyKind;
use crate::sim::objects::{IntermittentPlatform, LevelObject, PickupKind};
use crate::sim::physics::Shape;
use crate::sim::state::{GameEvent, GameState, LevelSource};

/// Load a custom level file. Custom levels always play music track 0.
pub fn load_custom(path: &Path, strict: bool, now_millis: u64) -> Result<GameState, LoadError> {
    let mut state = empty_custom(now_millis);
    apply_file(&mut state, path, strict, now_millis)?;
    state.events.push(GameEvent::SwitchMusic { track: 0 });
    log::info!(
        "Loaded custom level {}: {} bodies",
        path.display(),
        state.world.len()
    );
    Ok(state)
}

/// Restore a save game. The `level` record rebuilds the built-in level, the
/// records after it restore progress on top.
pub fn load_saved(path: &Path, strict: bool, now_millis: u64) -> Result<GameState, LoadError> {
    let mut state = empty_custom(now_millis);
    apply_file(&mut state, path, strict, now_millis)?;
    log::info!(
        "Loaded save {} ({:?}, score {})",
        path.display(),
        state.level,
        state.score
    );
    Ok(state)
}

fn empty_custom(now_millis: u64) -> GameState {
    GameState::new(
        LevelSource::Custom,
        DEFAULT_LEVEL_LENGTH,
        BUILTIN_START,
        now_millis,
    )
}

/// Apply every line of `path`. In lenient mode bad lines are logged and
/// skipped; in strict mode the first one aborts the load.
pub fn apply_file(
    state: &mut GameState,
    path: &Path,
    strict: bool,
    now_millis: u64,
) -> Result<(), LoadError> {
    let lines = persistence::read_lines(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    for (index, line) in lines.iter().enumerate() {
        let line_no = index + 1;
        let result = parse_line(line)
            .map_err(|source| LoadError::Record {
                line: line_no,
                source,
            })
            .and_then(|record| match record {
                Some(record) => apply_record(state, record, now_millis),
                None => Ok(()),
            });

        if let Err(e) = result {
            if strict {
                return Err(e);
            }
            log::warn!("{}: skipping line {line_no}: {e}", path.display());
        }
    }
    Ok(())
}

/// Apply one record to the running state
pub fn apply_record(
    state: &mut GameState,
    record: LevelRecord,
    now_millis: u64,
) -> Result<(), LoadError> {
    match record {
        LevelRecord::Platform { sprite, pos, half } => {
            state.add_platform(&sprite, pos, Shape::boxed(half.x, half.y));
        }
        LevelRecord::Coin { pos } => {
            state.add_pickup(PickupKind::Coin, pos);
        }
        LevelRecord::Box { sprite, pos, half } => {
            state.add_prop(&sprite, pos, Shape::boxed(half.x, half.y), 1.0);
        }
        LevelRecord::IntermittentPlatform { pos } => {
            state.add_object(LevelObject::Intermittent(IntermittentPlatform::new(pos)));
        }
        LevelRecord::Enemy { pos } => {
            state.add_enemy(EnemyKind::BasicPatrol, pos);
        }
        LevelRecord::Length(length) => state.set_level_length(length),
        LevelRecord::StartingPosition(pos) => state.set_start_position(pos),
        LevelRecord::Level(index) => {
            let mut rebuilt = load_builtin(index, now_millis)?;
            let mut events = state.drain_events();
            events.append(&mut rebuilt.events);
            rebuilt.events = events;
            *state = rebuilt;
        }
        LevelRecord::Score(score) => state.score = score,
        LevelRecord::Time(secs) => state.clock.resume_from(secs, now_millis),
        LevelRecord::Player { pos, has_sword } => {
            let world_pos = Vec2::new(state.camera.to_world(pos.x), pos.y);
            state.world.set_position(state.player.body(), world_pos);
            state.player.has_sword = has_sword;
        }
        LevelRecord::Camera(offset) => {
            // Shift by what the clamp let through so the player keeps its screen x
            let before = state.camera.offset;
            state.camera.set_offset(before + offset);
            state.shift_player(state.camera.offset - before);
        }
    }
    Ok(())
}
