//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Wall-clock time only through `TickInput`
//! - Stable iteration order (by body ID)
//! - No rendering, audio or platform dependencies

pub mod actor;
pub mod camera;
pub mod collision;
pub mod enemy;
pub mod interaction;
pub mod objects;
pub mod physics;
pub mod player;
pub mod state;
pub mod tick;

pub use actor::{ActorMotion, Direction, Impulses};
pub use camera::Camera;
pub use collision::{Contact, HitDirection, SensorEvent, classify_hit};
pub use enemy::{AttackOutcome, Bullet, Enemy, EnemyCommand, EnemyKind};
pub use objects::{
    DelayedFallingPlatform, Door, ElectricPortal, IntermittentPlatform, LevelObject, Pickup,
    PickupKind, RectangularPathPlatform, coin_row,
};
pub use physics::{
    Body, BodyId, BodyRole, BodyType, Fixture, PhysicsWorld, Shape, Sprite, StepReport,
};
pub use player::{Animation, Player};
pub use state::{GameEvent, GamePhase, GameState, LevelClock, LevelSource};
pub use tick::{TickInput, tick};
