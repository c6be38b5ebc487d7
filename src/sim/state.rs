//! Game state and core simulation types
//!
//! One `GameState` is one running level: the physics world, every entity
//! living in it, the camera, the score and the level clock. Loading a level,
//! restarting or advancing replaces the whole state.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::camera::Camera;
use super::enemy::{Bullet, Enemy, EnemyKind};
use super::objects::{LevelObject, Pickup, PickupKind};
use super::physics::{Body, BodyId, BodyRole, PhysicsWorld, Shape};
use super::player::Player;
use crate::audio::SoundEffect;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Game is paused, the level clock is frozen
    Paused,
    /// Player died or fell out of the level
    GameOver,
    /// Last level (or a custom level) finished
    LevelComplete,
}

/// Where the running level came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LevelSource {
    /// One of the hardcoded levels, by index
    Builtin(u32),
    /// A level file
    Custom,
}

impl LevelSource {
    pub fn builtin_index(self) -> Option<u32> {
        match self {
            LevelSource::Builtin(index) => Some(index),
            LevelSource::Custom => None,
        }
    }
}

/// Notifications for the collaborators (audio, UI, leaderboard)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Sound(SoundEffect),
    /// Start looping background track `track`
    SwitchMusic { track: u32 },
    PauseMusic,
    ResumeMusic,
    EnemyDefeated { kind: EnemyKind, score: u32 },
    LevelCompleted {
        level: LevelSource,
        score: u32,
        elapsed_secs: u64,
    },
    GameOver { score: u32 },
}

/// Wall-clock level timer in whole seconds
///
/// Callers pass the current time in; the clock never reads it itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LevelClock {
    start_millis: u64,
    elapsed_secs: u64,
}

impl LevelClock {
    pub fn started_at(now_millis: u64) -> Self {
        Self {
            start_millis: now_millis,
            elapsed_secs: 0,
        }
    }

    pub fn elapsed_secs(&self) -> u64 {
        self.elapsed_secs
    }

    pub fn restart(&mut self, now_millis: u64) {
        *self = Self::started_at(now_millis);
    }

    /// Continue a level that had already run for `secs` seconds
    pub fn resume_from(&mut self, secs: u64, now_millis: u64) {
        self.start_millis = now_millis.saturating_sub(secs.saturating_mul(1000));
        self.elapsed_secs = secs;
    }

    pub fn update(&mut self, now_millis: u64) {
        self.elapsed_secs = now_millis.saturating_sub(self.start_millis) / 1000;
    }

    /// Shift the start forward by the time spent paused
    pub fn adjust_after_pause(&mut self, now_millis: u64) {
        let wall_secs = now_millis.saturating_sub(self.start_millis) / 1000;
        let paused_secs = wall_secs.saturating_sub(self.elapsed_secs);
        self.start_millis = self
            .start_millis
            .saturating_add(paused_secs.saturating_mul(1000));
    }
}

/// Complete state of a running level
#[derive(Debug)]
pub struct GameState {
    pub world: PhysicsWorld,
    pub player: Player,
    /// Enemies in spawn order
    pub enemies: Vec<Enemy>,
    pub bullets: Vec<Bullet>,
    pub pickups: Vec<Pickup>,
    pub objects: Vec<LevelObject>,
    pub camera: Camera,
    pub score: u32,
    pub phase: GamePhase,
    pub level: LevelSource,
    pub clock: LevelClock,
    pub start_position: Vec2,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Events produced since the last drain
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// An empty level with only the player in it
    pub fn new(level: LevelSource, level_length: f32, start: Vec2, now_millis: u64) -> Self {
        let mut world = PhysicsWorld::new();
        let player = Player::spawn(&mut world, start);

        Self {
            world,
            player,
            enemies: Vec::new(),
            bullets: Vec::new(),
            pickups: Vec::new(),
            objects: Vec::new(),
            camera: Camera::new(level_length),
            score: 0,
            phase: GamePhase::Playing,
            level,
            clock: LevelClock::started_at(now_millis),
            start_position: start,
            time_ticks: 0,
            events: Vec::new(),
        }
    }

    /// Take every pending event
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn player_position(&self) -> Vec2 {
        self.world
            .position(self.player.body())
            .unwrap_or(self.start_position)
    }

    /// Player x relative to the left of the scrolled view
    pub fn player_screen_x(&self) -> f32 {
        self.camera.to_screen(self.player_position().x)
    }

    /// Move the player horizontally without collision (save-game restore)
    pub fn shift_player(&mut self, dx: f32) {
        self.world.translate(self.player.body(), Vec2::new(dx, 0.0));
    }

    pub fn set_level_length(&mut self, length: f32) {
        self.camera.level_length = length;
        self.camera.set_offset(self.camera.offset);
    }

    pub fn set_start_position(&mut self, pos: Vec2) {
        self.start_position = pos;
        self.world.set_position(self.player.body(), pos);
    }

    /// Static blocking geometry
    pub fn add_platform(&mut self, sprite: &str, pos: Vec2, shape: Shape) -> BodyId {
        let height = 2.0 * shape.half_extents().y;
        self.world.insert(
            Body::fixed(BodyRole::Scenery, shape)
                .at(pos)
                .with_sprite(sprite, height),
        )
    }

    /// Pushable dynamic body
    pub fn add_prop(&mut self, sprite: &str, pos: Vec2, shape: Shape, gravity_scale: f32) -> BodyId {
        let height = 2.0 * shape.half_extents().y;
        self.world.insert(
            Body::dynamic(BodyRole::Prop, shape)
                .at(pos)
                .with_gravity_scale(gravity_scale)
                .with_sprite(sprite, height),
        )
    }

    pub fn add_enemy(&mut self, kind: EnemyKind, pos: Vec2) -> BodyId {
        let enemy = Enemy::spawn(&mut self.world, kind, pos);
        let id = enemy.body();
        self.enemies.push(enemy);
        id
    }

    pub fn add_pickup(&mut self, kind: PickupKind, pos: Vec2) -> BodyId {
        let pickup = Pickup::spawn(&mut self.world, kind, pos);
        let id = pickup.body;
        self.pickups.push(pickup);
        id
    }

    pub fn add_object(&mut self, object: LevelObject) {
        self.objects.push(object);
    }

    pub fn enemy_mut(&mut self, body: BodyId) -> Option<&mut Enemy> {
        self.enemies.iter_mut().find(|e| e.body() == body)
    }

    pub fn object_mut(&mut self, body: BodyId) -> Option<&mut LevelObject> {
        self.objects.iter_mut().find(|o| o.body() == Some(body))
    }

    pub(crate) fn play(&mut self, sound: SoundEffect) {
        self.events.push(GameEvent::Sound(sound));
    }

    /// Drop bookkeeping for entities whose bodies are gone
    pub fn sweep_dead(&mut self) {
        self.world.sweep_dead();
        let world = &self.world;
        self.enemies.retain(|e| world.is_alive(e.body()));
        self.bullets.retain(|b| world.is_alive(b.body));
        self.pickups.retain(|p| !p.is_collected() && world.is_alive(p.body));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_counts_whole_seconds() {
        let mut clock = LevelClock::started_at(10_000);
        clock.update(12_999);
        assert_eq!(clock.elapsed_secs(), 2);
        clock.update(13_000);
        assert_eq!(clock.elapsed_secs(), 3);
    }

    #[test]
    fn test_clock_excludes_pause() {
        let mut clock = LevelClock::started_at(0);
        clock.update(5_000);
        assert_eq!(clock.elapsed_secs(), 5);

        // Paused for 20 s
        clock.adjust_after_pause(25_000);
        clock.update(25_000);
        assert_eq!(clock.elapsed_secs(), 5);
        clock.update(26_000);
        assert_eq!(clock.elapsed_secs(), 6);
    }

    #[test]
    fn test_clock_resume_from_saved_seconds() {
        let mut clock = LevelClock::default();
        clock.resume_from(42, 100_000);
        assert_eq!(clock.elapsed_secs(), 42);
        clock.update(101_500);
        assert_eq!(clock.elapsed_secs(), 43);

        clock.restart(200_000);
        assert_eq!(clock.elapsed_secs(), 0);
    }

    #[test]
    fn test_clock_saturates_on_huge_values() {
        let mut clock = LevelClock::default();
        clock.resume_from(u64::MAX, 1_000);
        assert_eq!(clock.elapsed_secs(), u64::MAX);

        let mut clock = LevelClock::started_at(0);
        clock.adjust_after_pause(u64::MAX);
        clock.update(u64::MAX);
        assert_eq!(clock.elapsed_secs(), 0);
    }

    #[test]
    fn test_new_state_has_player_at_start() {
        let state = GameState::new(LevelSource::Custom, 80.0, Vec2::new(-16.0, -8.0), 0);
        assert_eq!(state.player_position(), Vec2::new(-16.0, -8.0));
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.world.len(), 1);
        assert_eq!(state.camera.level_length, 80.0);
    }

    #[test]
    fn test_sweep_drops_destroyed_entities() {
        let mut state = GameState::new(LevelSource::Custom, 100.0, Vec2::ZERO, 0);
        let enemy = state.add_enemy(EnemyKind::BasicPatrol, Vec2::new(5.0, 0.0));
        state.add_enemy(EnemyKind::Slime, Vec2::new(8.0, 0.0));
        state.add_pickup(PickupKind::Coin, Vec2::new(2.0, 0.0));

        state.world.destroy(enemy);
        state.sweep_dead();
        assert_eq!(state.enemies.len(), 1);
        assert_eq!(state.enemies[0].kind, EnemyKind::Slime);
        assert_eq!(state.pickups.len(), 1);
    }

    #[test]
    fn test_platform_sprite_height_follows_shape() {
        let mut state = GameState::new(LevelSource::Custom, 100.0, Vec2::ZERO, 0);
        let id = state.add_platform("ground", Vec2::new(0.0, -5.0), Shape::boxed(10.0, 1.5));
        let body = state.world.get(id).unwrap();
        assert_eq!(body.sprite.height, 3.0);
        assert!(!body.is_dynamic());
    }
}
