//! Save game writer

use std::path::Path;

use glam::Vec2;

use super::parser::LevelRecord;
use crate::error::SaveError;
use crate::persistence;
use crate::sim::state::GameState;

/// Records describing the running level, in load order
pub fn save_records(state: &GameState) -> Result<Vec<LevelRecord>, SaveError> {
    let index = state.level.builtin_index().ok_or(SaveError::CustomLevel)?;
    let player = state.player_position();

    Ok(vec![
        LevelRecord::Level(index),
        LevelRecord::Score(state.score),
        LevelRecord::Player {
            pos: Vec2::new(state.camera.to_screen(player.x), player.y),
            has_sword: state.player.has_sword,
        },
        LevelRecord::Time(state.clock.elapsed_secs()),
        LevelRecord::Camera(state.camera.offset),
    ])
}

/// Write a save game to `path`, replacing any previous one
pub fn save_game(state: &GameState, path: &Path) -> Result<(), SaveError> {
    let records = save_records(state)?;
    persistence::write_lines(path, records.iter().map(ToString::to_string)).map_err(|source| {
        SaveError::Io {
            path: path.to_path_buf(),
            source,
        }
    })?;
    log::info!("Saved {:?} to {}", state.level, path.display());
    Ok(())
}
