//! Enemy variants and turret bullets
//!
//! Every enemy shares one record: a movement state, an action timer and a
//! patrol direction. The variant tag decides the hitbox, the periodic
//! `action` and how `attacked` reacts.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::actor::{ActorMotion, Impulses};
use super::physics::{Body, BodyId, BodyRole, PhysicsWorld, Shape};
use crate::consts::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyKind {
    /// Walks back and forth
    BasicPatrol,
    /// Patrols and hops on every turn
    Slime,
    /// Cannot be stomped
    Spiked,
    /// Chases the player when close
    Pursuer,
    /// Slow and invulnerable
    Armored,
    /// Stationary, fires bullets
    Turret,
}

impl EnemyKind {
    pub fn half_extents(self) -> Vec2 {
        match self {
            EnemyKind::BasicPatrol | EnemyKind::Spiked | EnemyKind::Pursuer => Vec2::splat(0.8),
            EnemyKind::Slime => Vec2::splat(0.6),
            EnemyKind::Armored => Vec2::splat(1.5),
            EnemyKind::Turret => Vec2::new(37.0 / 40.0, 38.0 / 40.0),
        }
    }

    /// Sprite name and height
    pub fn sprite(self) -> (&'static str, f32) {
        match self {
            EnemyKind::BasicPatrol => ("enemy_basic", 1.6),
            EnemyKind::Slime => ("enemy_slime", 1.2),
            EnemyKind::Spiked => ("enemy_spike", 1.6),
            EnemyKind::Pursuer => ("enemy_follower", 1.6),
            EnemyKind::Armored => ("enemy_metallic", 3.0),
            EnemyKind::Turret => ("enemy_shooter", 2.0),
        }
    }

    pub fn action_interval(self) -> u32 {
        match self {
            EnemyKind::Pursuer => 2 * ENEMY_ACTION_INTERVAL,
            EnemyKind::Armored => 200,
            _ => ENEMY_ACTION_INTERVAL,
        }
    }

    pub fn movement_speed(self) -> f32 {
        match self {
            EnemyKind::Armored => 2.0,
            EnemyKind::Turret => 0.0,
            _ => ENEMY_MOVEMENT_SPEED,
        }
    }

    /// Score for defeating this kind, `None` when it cannot be defeated
    pub fn defeat_score(self) -> Option<u32> {
        match self {
            EnemyKind::BasicPatrol | EnemyKind::Slime | EnemyKind::Spiked => Some(ENEMY_DEFEAT_SCORE),
            EnemyKind::Pursuer => Some(0),
            EnemyKind::Armored | EnemyKind::Turret => None,
        }
    }

    /// Whether landing on top of it defeats it instead of hurting the player
    pub fn can_be_stomped(self) -> bool {
        self != EnemyKind::Spiked
    }

    fn sprite_starts_flipped(self) -> bool {
        matches!(self, EnemyKind::Spiked | EnemyKind::Pursuer)
    }
}

/// Result of hitting an enemy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttackOutcome {
    /// Invulnerable kind, nothing happened
    Ignored,
    /// Enemy destroyed, award `score`
    Defeated { score: u32 },
    /// Enemy was already gone
    AlreadyDefeated,
}

/// Side effects an enemy asks the world to perform
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EnemyCommand {
    FireBullet { owner: BodyId, from: Vec2 },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub kind: EnemyKind,
    pub motion: ActorMotion,
    pub action_timer: u32,
    /// Patrol direction; `true` moves towards +x
    pub moving_right: bool,
    defeated: bool,
}

impl Enemy {
    pub fn spawn(world: &mut PhysicsWorld, kind: EnemyKind, pos: Vec2) -> Self {
        let half = kind.half_extents();
        let (sprite, height) = kind.sprite();
        let mut body = Body::dynamic(BodyRole::Enemy, Shape::boxed(half.x, half.y))
            .at(pos)
            .with_sprite(sprite, height);
        body.sprite.flip_x = kind.sprite_starts_flipped();
        if kind == EnemyKind::Turret {
            body.gravity_scale = TURRET_GRAVITY_SCALE;
        }
        let id = world.insert(body);

        Self {
            kind,
            motion: ActorMotion::new(id, Impulses::default(), 0.0),
            action_timer: 0,
            moving_right: true,
            defeated: false,
        }
    }

    #[inline]
    pub fn body(&self) -> BodyId {
        self.motion.body
    }

    pub fn is_defeated(&self) -> bool {
        self.defeated
    }

    /// Damage reaction. Defeating destroys the body; repeated calls are no-ops.
    pub fn attacked(&mut self, world: &mut PhysicsWorld) -> AttackOutcome {
        if self.defeated {
            return AttackOutcome::AlreadyDefeated;
        }
        match self.kind.defeat_score() {
            Some(score) => {
                self.defeated = true;
                world.destroy(self.body());
                log::debug!("{:?} defeated", self.kind);
                AttackOutcome::Defeated { score }
            }
            None => AttackOutcome::Ignored,
        }
    }

    /// Reverse the patrol direction and mirror the sprite
    pub fn turn_around(&mut self, world: &mut PhysicsWorld) {
        self.moving_right = !self.moving_right;
        if let Some(sprite) = world.sprite_mut(self.body()) {
            sprite.flip_x = !sprite.flip_x;
        }
    }

    /// Periodic behaviour
    pub fn action(&mut self, world: &mut PhysicsWorld) -> Option<EnemyCommand> {
        match self.kind {
            EnemyKind::Slime => {
                self.turn_around(world);
                world.apply_impulse(self.body(), Vec2::new(0.0, SLIME_HOP_IMPULSE));
                None
            }
            EnemyKind::Turret => {
                let pos = world.position(self.body())?;
                Some(EnemyCommand::FireBullet {
                    owner: self.body(),
                    from: pos + Vec2::new(1.0, 0.0),
                })
            }
            EnemyKind::BasicPatrol | EnemyKind::Spiked | EnemyKind::Pursuer | EnemyKind::Armored => {
                self.turn_around(world);
                None
            }
        }
    }

    /// Per-tick update. `player` is the player's position for pursuers.
    pub fn step(&mut self, world: &mut PhysicsWorld, player: Option<Vec2>) -> Option<EnemyCommand> {
        if self.defeated {
            return None;
        }
        self.motion.step(world);
        let pos = world.position(self.body())?;

        let command = match (self.kind, player) {
            (EnemyKind::Pursuer, Some(target)) if in_detection_range(pos, target) => {
                // Turn to face the player
                let player_is_left = pos.x > target.x;
                if player_is_left == self.moving_right {
                    self.action(world)
                } else {
                    None
                }
            }
            _ => self.tick_action_timer(world),
        };

        let speed = if self.moving_right {
            self.kind.movement_speed()
        } else {
            -self.kind.movement_speed()
        };
        let vy = match self.kind {
            EnemyKind::Pursuer => 0.0,
            _ => world.velocity(self.body()).map_or(0.0, |v| v.y),
        };
        world.set_velocity(self.body(), Vec2::new(speed, vy));
        command
    }

    fn tick_action_timer(&mut self, world: &mut PhysicsWorld) -> Option<EnemyCommand> {
        self.action_timer += 1;
        if self.action_timer >= self.kind.action_interval() {
            self.action_timer = 0;
            self.action(world)
        } else {
            None
        }
    }
}

fn in_detection_range(pos: Vec2, target: Vec2) -> bool {
    (pos.x - target.x).abs() <= PURSUER_RANGE_X && (pos.y - target.y).abs() <= PURSUER_RANGE_Y
}

/// Projectile fired by a turret
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bullet {
    pub body: BodyId,
    pub owner: BodyId,
    pub moving_right: bool,
}

impl Bullet {
    pub fn spawn(world: &mut PhysicsWorld, owner: BodyId, from: Vec2, moving_right: bool) -> Self {
        let speed = if moving_right { BULLET_SPEED } else { -BULLET_SPEED };
        let body = world.insert(
            Body::dynamic(
                BodyRole::Bullet { owner },
                Shape::boxed(BULLET_HALF_SIZE, BULLET_HALF_SIZE),
            )
            .at(from)
            .with_velocity(Vec2::new(speed, 0.0))
            .with_gravity_scale(0.0)
            .ghost()
            .with_sensor()
            .with_sprite("shooter_bullet", 2.0 * BULLET_HALF_SIZE),
        );
        Self {
            body,
            owner,
            moving_right,
        }
    }

    /// Impulse applied to the player on impact
    pub fn impact_impulse(&self) -> Vec2 {
        if self.moving_right {
            Vec2::new(BULLET_IMPACT_IMPULSE, 0.0)
        } else {
            Vec2::new(-BULLET_IMPACT_IMPULSE, 0.0)
        }
    }
}
