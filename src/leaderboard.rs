//! Leaderboard
//!
//! Every completed level appends one `name;level;time;score;` line to a flat
//! file. Views re-read the whole file and re-aggregate per player.

use std::collections::BTreeMap;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::persistence;

/// Rows shown in each leaderboard view
pub const MAX_DISPLAYED_ENTRIES: usize = 5;

/// Seconds a level "should" take; finishing faster adds to the total
pub const PAR_TIME_SECS: i64 = 60;

/// One completed level
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelResult {
    pub name: String,
    /// Zero-based level index
    pub level: u32,
    /// Completion time in seconds
    pub time_secs: u32,
    pub score: u32,
}

impl LevelResult {
    /// Ranking value: time under par plus score
    pub fn total(&self) -> i64 {
        (PAR_TIME_SECS - i64::from(self.time_secs)) + i64::from(self.score)
    }

    pub fn to_line(&self) -> String {
        format!("{};{};{};{};", self.name, self.level, self.time_secs, self.score)
    }

    /// Parse one file line; `None` for anything malformed
    pub fn parse(line: &str) -> Option<Self> {
        let mut fields = line.split(';');
        let name = fields.next().filter(|n| !n.is_empty())?;
        let level = fields.next()?.trim().parse().ok()?;
        let time_secs = fields.next()?.trim().parse().ok()?;
        let score = fields.next()?.trim().parse().ok()?;
        Some(Self {
            name: name.to_string(),
            level,
            time_secs,
            score,
        })
    }
}

/// Everything one player has achieved
#[derive(Debug, Clone, Default, Serialize)]
pub struct PlayerProgress {
    pub name: String,
    /// Results in file order
    pub results: Vec<LevelResult>,
}

impl PlayerProgress {
    pub fn best_total(&self) -> i64 {
        self.results.iter().map(LevelResult::total).max().unwrap_or(0)
    }

    pub fn highest_level(&self) -> Option<u32> {
        self.results.iter().map(|r| r.level).max()
    }

    /// Highest level index the player may start
    pub fn unlocked_level(&self) -> u32 {
        self.highest_level().map_or(0, |level| level + 1)
    }

    /// Results by total, best first; on ties the later result wins
    pub fn ranked(&self) -> Vec<&LevelResult> {
        let mut ranked: Vec<_> = self.results.iter().enumerate().collect();
        ranked.sort_by(|(ia, a), (ib, b)| b.total().cmp(&a.total()).then(ib.cmp(ia)));
        ranked.into_iter().map(|(_, r)| r).collect()
    }

    pub fn best(&self) -> Option<&LevelResult> {
        self.ranked().into_iter().next()
    }
}

/// Aggregated view of the result file
#[derive(Debug, Clone, Default, Serialize)]
pub struct Leaderboard {
    players: BTreeMap<String, PlayerProgress>,
}

impl Leaderboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Aggregate result lines, skipping malformed ones
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut board = Self::new();
        for line in lines {
            let line = line.as_ref();
            if line.trim().is_empty() {
                continue;
            }
            match LevelResult::parse(line) {
                Some(result) => board.record(result),
                None => log::debug!("Skipping leaderboard line `{line}`"),
            }
        }
        board
    }

    /// Read and aggregate the whole result file (created empty when missing)
    pub fn load(path: &Path) -> io::Result<Self> {
        let board = Self::from_lines(persistence::read_lines(path)?);
        log::info!("Loaded leaderboard with {} players", board.players.len());
        Ok(board)
    }

    pub fn record(&mut self, result: LevelResult) {
        self.players
            .entry(result.name.clone())
            .or_insert_with(|| PlayerProgress {
                name: result.name.clone(),
                results: Vec::new(),
            })
            .results
            .push(result);
    }

    /// Append a result to the file and to this view
    pub fn append(&mut self, path: &Path, result: LevelResult) -> io::Result<()> {
        persistence::append_line(path, &result.to_line())?;
        log::info!(
            "Recorded {} on level {} ({}s, {} points)",
            result.name,
            result.level,
            result.time_secs,
            result.score
        );
        self.record(result);
        Ok(())
    }

    pub fn player(&self, name: &str) -> Option<&PlayerProgress> {
        self.players.get(name)
    }

    /// Level index `name` may start; new players only get the first level
    pub fn unlocked_level(&self, name: &str) -> u32 {
        self.player(name).map_or(0, PlayerProgress::unlocked_level)
    }

    pub fn is_unlocked(&self, name: &str, level: u32) -> bool {
        level <= self.unlocked_level(name)
    }

    /// Top players by best total, then by name
    pub fn global_ranking(&self) -> Vec<&PlayerProgress> {
        let mut ranking: Vec<_> = self
            .players
            .values()
            .filter(|p| !p.results.is_empty())
            .collect();
        ranking.sort_by(|a, b| b.best_total().cmp(&a.best_total()).then(a.name.cmp(&b.name)));
        ranking.truncate(MAX_DISPLAYED_ENTRIES);
        ranking
    }

    /// A player's best results
    pub fn player_results(&self, name: &str) -> Vec<&LevelResult> {
        let mut results = self.player(name).map(PlayerProgress::ranked).unwrap_or_default();
        results.truncate(MAX_DISPLAYED_ENTRIES);
        results
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::temp_path;
    use std::fs;

    fn result(name: &str, level: u32, time_secs: u32, score: u32) -> LevelResult {
        LevelResult {
            name: name.to_string(),
            level,
            time_secs,
            score,
        }
    }

    #[test]
    fn test_total_rewards_speed_and_score() {
        assert_eq!(result("a", 0, 30, 12).total(), 42);
        assert_eq!(result("a", 0, 90, 5).total(), -25);
    }

    #[test]
    fn test_parse_line() {
        assert_eq!(LevelResult::parse("alice;1;45;120;"), Some(result("alice", 1, 45, 120)));
        assert_eq!(LevelResult::parse("alice;1;45"), None);
        assert_eq!(LevelResult::parse("alice;one;45;120;"), None);
        assert_eq!(LevelResult::parse(";1;45;120;"), None);
    }

    #[test]
    fn test_bad_lines_do_not_abort_load() {
        let board = Leaderboard::from_lines(["bob;0;20;10;", "garbage", "", "bob;x;1;1;", "bob;1;50;30;"]);
        let bob = board.player("bob").unwrap();
        assert_eq!(bob.results.len(), 2);
        assert_eq!(bob.best_total(), 50);
        assert_eq!(bob.unlocked_level(), 2);
    }

    #[test]
    fn test_unlocking() {
        let board = Leaderboard::from_lines(["carol;0;40;3;"]);
        assert!(board.is_unlocked("carol", 1));
        assert!(!board.is_unlocked("carol", 2));
        assert!(board.is_unlocked("dave", 0));
        assert!(!board.is_unlocked("dave", 1));
    }

    #[test]
    fn test_global_ranking_top_five() {
        let lines = [
            "a;0;60;10;",
            "b;0;60;50;",
            "c;0;60;30;",
            "d;0;60;30;",
            "e;0;60;5;",
            "f;0;60;1;",
            "a;1;10;20;",
        ];
        let board = Leaderboard::from_lines(lines);
        let names: Vec<_> = board.global_ranking().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["a", "b", "c", "d", "e"]);
    }

    #[test]
    fn test_player_results_best_first() {
        let lines: Vec<String> = (0..7).map(|i| format!("zoe;0;60;{i};")).collect();
        let board = Leaderboard::from_lines(&lines);
        let scores: Vec<_> = board.player_results("zoe").iter().map(|r| r.score).collect();
        assert_eq!(scores, [6, 5, 4, 3, 2]);
        assert!(board.player_results("nobody").is_empty());
    }

    #[test]
    fn test_append_and_reload() {
        let path = temp_path("leaderboard.txt");
        let mut board = Leaderboard::load(&path).unwrap();
        assert!(board.is_empty());

        board.append(&path, result("eve", 0, 33, 104)).unwrap();
        board.append(&path, result("eve", 1, 41, 120)).unwrap();

        let reloaded = Leaderboard::load(&path).unwrap();
        assert_eq!(reloaded.player("eve").unwrap().results, board.player("eve").unwrap().results);
        assert_eq!(reloaded.unlocked_level("eve"), 2);

        let _ = fs::remove_file(&path);
    }
}
