//! Sword Runner - A side-scrolling platformer simulation core
//!
//! Core modules:
//! - `sim`: Fixed-timestep simulation (bodies, actors, enemies, interactions, camera)
//! - `level`: Built-in level manifests, the line-record level format and save games
//! - `leaderboard`: Append-only result file and per-player aggregation
//! - `settings`: Player preferences and file locations
//! - `audio`: Sound effect ids and the audio collaborator interface
//! - `snapshot`: Read-only per-frame view handed to a renderer
//! - `persistence`: Line-oriented file helpers
//! - `platform`: Wall-clock access

pub mod audio;
pub mod error;
pub mod leaderboard;
pub mod level;
pub mod persistence;
pub mod platform;
pub mod settings;
pub mod sim;
pub mod snapshot;

pub use error::{LoadError, RecordError, SaveError, SettingsError};
pub use leaderboard::Leaderboard;
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, the host engine's default)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Ticks per second at the fixed timestep
    pub const TICKS_PER_SECOND: u32 = 60;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// World gravity (units/s², y is up)
    pub const GRAVITY: f32 = -75.0;
    /// Terminal fall speed, keeps heavy bodies from tunnelling thin platforms
    pub const MAX_FALL_SPEED: f32 = 60.0;

    /// Visible width of the level in world units (786 px at 20 px/unit)
    pub const VIEWPORT_WIDTH: f32 = 786.0 / 20.0;
    /// Default built-in level length
    pub const DEFAULT_LEVEL_LENGTH: f32 = 100.0;
    /// Player falls below this: game over
    pub const PLAYER_KILL_Y: f32 = -20.0;
    /// Other dynamic bodies below this are removed
    pub const BODY_KILL_Y: f32 = -25.0;

    /// Player defaults
    pub const PLAYER_HALF_WIDTH: f32 = 0.5;
    pub const PLAYER_HALF_HEIGHT: f32 = 1.0;
    pub const PLAYER_START_HEALTH: u8 = 3;
    pub const PLAYER_MAX_VELOCITY: f32 = 10.0;
    pub const PLAYER_RUN_IMPULSE: f32 = 6.0;
    pub const PLAYER_SLOW_IMPULSE: f32 = 1.0;
    pub const PLAYER_JUMP_IMPULSE: f32 = 50.0;
    pub const ATTACK_DURATION: u32 = 15;
    pub const ATTACK_IMPULSE: f32 = 50.0;
    pub const INVULNERABILITY_DURATION: u32 = 20;

    /// Ground detection: contact normal y at or below this means "standing"
    pub const GROUND_NORMAL_Y: f32 = -0.4;
    /// Vertical speed above which an actor counts as airborne
    pub const AIRBORNE_SPEED: f32 = 1.0;

    /// Enemy defaults
    pub const ENEMY_ACTION_INTERVAL: u32 = 70;
    pub const ENEMY_MOVEMENT_SPEED: f32 = 5.0;
    pub const ENEMY_DEFEAT_SCORE: u32 = 5;
    /// Contact normal y at or above this is a hit from above (stomp)
    pub const STOMP_NORMAL_Y: f32 = 0.8;
    pub const STOMP_BOUNCE_IMPULSE: f32 = 18.0;
    pub const SIDE_HIT_IMPULSE_X: f32 = 18.0;
    pub const SIDE_HIT_IMPULSE_Y: f32 = 12.0;
    pub const KNOCKBACK_FACTOR: f32 = 5.0;
    pub const SLIME_HOP_IMPULSE: f32 = 20.0;
    pub const PURSUER_RANGE_X: f32 = 6.0;
    pub const PURSUER_RANGE_Y: f32 = 5.0;
    pub const TURRET_GRAVITY_SCALE: f32 = 1000.0;

    /// Bullet defaults
    pub const BULLET_HALF_SIZE: f32 = 0.2;
    pub const BULLET_SPEED: f32 = 15.0;
    pub const BULLET_IMPACT_IMPULSE: f32 = 20.0;

    /// Interactive objects
    pub const PORTAL_INTERVAL: u32 = 50;
    pub const PORTAL_REPEL_IMPULSE: f32 = 50.0;
    pub const INTERMITTENT_INTERVAL: u32 = 70;
    pub const FALLING_TIMER_STANDING: u32 = 10;
    pub const FALLING_SPEED: f32 = 0.2;
    pub const FALLING_RESET_Y: f32 = -25.0;
    /// Player must be this far above a one-way platform for it to turn solid
    pub const ONE_WAY_CLEARANCE: f32 = 1.5;
    pub const PATH_PLATFORM_SPEED: f32 = 0.1;

    /// Score rewards
    pub const COIN_SCORE: u32 = 1;
    pub const LEVEL_COMPLETE_BONUS: u32 = 100;
}

