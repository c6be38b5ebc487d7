//! The player character

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::actor::{ActorMotion, Direction, Impulses};
use super::physics::{Body, BodyId, BodyRole, PhysicsWorld, Shape};
use super::state::GameEvent;
use crate::audio::SoundEffect;
use crate::consts::*;

/// Sprite height of every player frame
pub const PLAYER_SPRITE_HEIGHT: f32 = 2.0;

/// Animation derived from movement and attack state each tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Animation {
    Standing,
    Running,
    Jumping,
    Attacking,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub motion: ActorMotion,
    pub health: u8,
    pub attacking: bool,
    attack_ticks: u32,
    /// Ticks since the last damaging hit, `None` when vulnerable
    invulnerable_ticks: Option<u32>,
    pub has_sword: bool,
    pub has_key: bool,
}

impl Player {
    /// Create the player body at `pos`
    pub fn spawn(world: &mut PhysicsWorld, pos: Vec2) -> Self {
        let body = world.insert(
            Body::dynamic(
                BodyRole::Player,
                Shape::boxed(PLAYER_HALF_WIDTH, PLAYER_HALF_HEIGHT),
            )
            .at(pos)
            .with_sprite("player_idle", PLAYER_SPRITE_HEIGHT),
        );
        let mut motion = ActorMotion::new(
            body,
            Impulses::symmetric(PLAYER_RUN_IMPULSE, PLAYER_SLOW_IMPULSE, PLAYER_JUMP_IMPULSE),
            PLAYER_MAX_VELOCITY,
        );
        motion.facing_right = true;

        Self {
            motion,
            health: PLAYER_START_HEALTH,
            attacking: false,
            attack_ticks: 0,
            invulnerable_ticks: None,
            has_sword: false,
            has_key: false,
        }
    }

    #[inline]
    pub fn body(&self) -> BodyId {
        self.motion.body
    }

    pub fn move_in(&mut self, world: &mut PhysicsWorld, direction: Direction) {
        self.motion.move_in(world, direction);
    }

    pub fn is_invulnerable(&self) -> bool {
        self.invulnerable_ticks.is_some()
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    /// Grant the sword
    pub fn upgrade(&mut self) {
        self.has_sword = true;
    }

    /// Start a sword swing. Returns false when the swing was not possible.
    pub fn attack(&mut self, world: &mut PhysicsWorld, events: &mut Vec<GameEvent>) -> bool {
        if !self.has_sword || self.attacking {
            return false;
        }
        self.attacking = true;
        self.attack_ticks = 0;

        let push = if self.motion.facing_right {
            ATTACK_IMPULSE
        } else {
            -ATTACK_IMPULSE
        };
        world.apply_impulse(self.body(), Vec2::new(push, 0.0));
        events.push(GameEvent::Sound(SoundEffect::Damage));
        true
    }

    /// Take a hit. Health only drops outside the invulnerability window;
    /// the damage sound plays either way. Returns whether health was lost.
    pub fn attacked(&mut self, events: &mut Vec<GameEvent>) -> bool {
        events.push(GameEvent::Sound(SoundEffect::Damage));
        if self.invulnerable_ticks.is_some() {
            return false;
        }
        self.health = self.health.saturating_sub(1);
        self.invulnerable_ticks = Some(0);
        true
    }

    pub fn animation(&self) -> Animation {
        if self.attacking {
            Animation::Attacking
        } else if !self.motion.can_jump {
            Animation::Jumping
        } else if self.motion.last_move == Direction::None {
            Animation::Standing
        } else {
            Animation::Running
        }
    }

    /// Sprite for the current animation
    pub fn sprite(&self) -> &'static str {
        match (self.animation(), self.has_sword) {
            (Animation::Attacking, _) => "player_attack",
            (Animation::Standing, false) => "player_idle",
            (Animation::Standing, true) => "player_idle_sword",
            (Animation::Running, false) => "player_run",
            (Animation::Running, true) => "player_run_sword",
            (Animation::Jumping, false) => "player_jump",
            (Animation::Jumping, true) => "player_jump_sword",
        }
    }

    /// Per-tick update: airborne check, sprite, attack and invulnerability timers
    pub fn step(&mut self, world: &mut PhysicsWorld) {
        self.motion.step(world);

        let name = self.sprite();
        let flip = !self.motion.facing_right;
        if let Some(sprite) = world.sprite_mut(self.body()) {
            if sprite.name != name {
                sprite.name = name.to_string();
            }
            sprite.flip_x = flip;
        }

        if self.attacking {
            self.attack_ticks += 1;
            if self.attack_ticks >= ATTACK_DURATION {
                self.attack_ticks = 0;
                self.attacking = false;
            }
        }

        if let Some(ticks) = self.invulnerable_ticks {
            let ticks = ticks + 1;
            self.invulnerable_ticks = (ticks < INVULNERABILITY_DURATION).then_some(ticks);
        }
    }
}
