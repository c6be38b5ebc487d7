//! Impulse-driven movement shared by the player and enemies

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::is_ground_normal;
use super::physics::{BodyId, PhysicsWorld};
use crate::consts::AIRBORNE_SPEED;

/// Movement request for one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Right,
    Left,
    Up,
    None,
}

/// The five impulses an actor can apply to itself
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Impulses {
    pub right: Vec2,
    pub left: Vec2,
    /// Braking impulse while moving left
    pub slow_right: Vec2,
    /// Braking impulse while moving right
    pub slow_left: Vec2,
    pub jump: Vec2,
}

impl Impulses {
    /// Symmetric impulse set from a run, brake and jump magnitude
    pub fn symmetric(run: f32, brake: f32, jump: f32) -> Self {
        Self {
            right: Vec2::new(run, 0.0),
            left: Vec2::new(-run, 0.0),
            slow_right: Vec2::new(brake, 0.0),
            slow_left: Vec2::new(-brake, 0.0),
            jump: Vec2::new(0.0, jump),
        }
    }
}

/// Movement state of a dynamic body driven by impulses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActorMotion {
    pub body: BodyId,
    pub impulses: Impulses,
    pub max_velocity: f32,
    /// Set by a ground contact, cleared when airborne or after a jump
    pub can_jump: bool,
    pub facing_right: bool,
    /// Last horizontal request (`Right`, `Left` or `None`)
    pub last_move: Direction,
}

impl ActorMotion {
    pub fn new(body: BodyId, impulses: Impulses, max_velocity: f32) -> Self {
        Self {
            body,
            impulses,
            max_velocity,
            can_jump: false,
            facing_right: false,
            last_move: Direction::None,
        }
    }

    /// Apply the impulse for `direction`, respecting the velocity caps
    pub fn move_in(&mut self, world: &mut PhysicsWorld, direction: Direction) {
        let Some(vel) = world.velocity(self.body) else {
            return;
        };

        match direction {
            Direction::Right => {
                self.facing_right = true;
                self.last_move = Direction::Right;
                if vel.x <= self.max_velocity {
                    world.apply_impulse(self.body, self.impulses.right);
                }
            }
            Direction::Left => {
                self.facing_right = false;
                self.last_move = Direction::Left;
                if vel.x >= -self.max_velocity {
                    world.apply_impulse(self.body, self.impulses.left);
                }
            }
            Direction::Up => {
                if self.can_jump && vel.y <= AIRBORNE_SPEED {
                    world.apply_impulse(self.body, self.impulses.jump);
                    self.can_jump = false;
                }
            }
            Direction::None => {
                self.last_move = Direction::None;
                if vel.x >= 1.0 {
                    world.apply_impulse(self.body, self.impulses.slow_left);
                } else if vel.x <= -1.0 {
                    world.apply_impulse(self.body, self.impulses.slow_right);
                }
            }
        }
    }

    /// Contact callback; `normal` points from the actor towards the other body
    pub fn on_contact(&mut self, normal: Vec2) {
        if is_ground_normal(normal) {
            self.can_jump = true;
        }
    }

    /// Per-tick update: a fast vertical speed means the actor is airborne
    pub fn step(&mut self, world: &PhysicsWorld) {
        if let Some(vel) = world.velocity(self.body) {
            if vel.y.abs() > AIRBORNE_SPEED {
                self.can_jump = false;
            }
        }
    }
}
