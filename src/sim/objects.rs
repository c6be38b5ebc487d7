//! Pickups and stateful static objects
//!
//! Pickups fire once on the first player overlap and then disappear. The
//! other objects sit at fixed world positions but run a small state machine
//! every tick: doors, electric portals, one-way falling platforms, blinking
//! platforms and platforms travelling a rectangular loop.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::physics::{Body, BodyId, BodyRole, Fixture, PhysicsWorld, Shape};
use super::player::Player;
use super::state::GameEvent;
use crate::audio::SoundEffect;
use crate::consts::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PickupKind {
    Coin,
    Key,
    Sword,
}

impl PickupKind {
    pub fn half_extents(self) -> Vec2 {
        match self {
            PickupKind::Coin => Vec2::splat(0.3),
            PickupKind::Key | PickupKind::Sword => Vec2::new(43.0 / 40.0, 41.0 / 40.0),
        }
    }

    fn sprite(self) -> (&'static str, f32) {
        match self {
            PickupKind::Coin => ("collectible_coin", 0.6),
            PickupKind::Key => ("collectible_key", 83.0 / 20.0),
            PickupKind::Sword => ("item_sword_power", 83.0 / 20.0),
        }
    }
}

/// A collectible: ghost body with a sensor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pickup {
    pub kind: PickupKind,
    pub body: BodyId,
    collected: bool,
}

impl Pickup {
    pub fn spawn(world: &mut PhysicsWorld, kind: PickupKind, pos: Vec2) -> Self {
        let half = kind.half_extents();
        let (sprite, height) = kind.sprite();
        let body = world.insert(
            Body::fixed(BodyRole::Pickup, Shape::boxed(half.x, half.y))
                .at(pos)
                .ghost()
                .with_sensor()
                .with_sprite(sprite, height),
        );
        Self {
            kind,
            body,
            collected: false,
        }
    }

    pub fn is_collected(&self) -> bool {
        self.collected
    }

    /// Apply the pickup to the player once. Returns the score it is worth.
    pub fn collect(
        &mut self,
        world: &mut PhysicsWorld,
        player: &mut Player,
        events: &mut Vec<GameEvent>,
    ) -> u32 {
        if self.collected {
            return 0;
        }
        self.collected = true;
        world.destroy(self.body);

        match self.kind {
            PickupKind::Coin => {
                events.push(GameEvent::Sound(SoundEffect::Coin));
                COIN_SCORE
            }
            PickupKind::Key => {
                player.has_key = true;
                events.push(GameEvent::Sound(SoundEffect::Coin));
                0
            }
            PickupKind::Sword => {
                player.upgrade();
                events.push(GameEvent::Sound(SoundEffect::Sword));
                0
            }
        }
    }
}

/// Where the `index`-th coin of a row sits above a platform
pub fn coin_position(platform_pos: Vec2, platform_half: Vec2, index: i32) -> Vec2 {
    Vec2::new(
        platform_pos.x - 0.3 - index as f32,
        platform_pos.y + platform_half.y + 0.4,
    )
}

/// Place one coin per index above a platform
pub fn coin_row(
    world: &mut PhysicsWorld,
    platform_pos: Vec2,
    platform_half: Vec2,
    indices: std::ops::Range<i32>,
) -> Vec<Pickup> {
    indices
        .map(|i| {
            Pickup::spawn(
                world,
                PickupKind::Coin,
                coin_position(platform_pos, platform_half, i),
            )
        })
        .collect()
}

pub const DOOR_HALF: Vec2 = Vec2::new(14.0 / 40.0, 56.0 / 40.0);

/// Blocks the way until touched by a player carrying a key
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Door {
    pub body: BodyId,
    open: bool,
}

impl Door {
    pub fn spawn(world: &mut PhysicsWorld, pos: Vec2) -> Self {
        let body = world.insert(
            Body::fixed(BodyRole::Door, Shape::boxed(DOOR_HALF.x, DOOR_HALF.y))
                .at(pos)
                .with_sprite("door_closed", 56.0 / 20.0),
        );
        Self { body, open: false }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Player contact: opens the door if the player has a key, consuming it
    pub fn touch(&mut self, world: &mut PhysicsWorld, player: &mut Player) -> bool {
        if self.open || !player.has_key {
            return false;
        }
        player.has_key = false;
        self.open = true;
        world.set_fixture(self.body, Fixture::Ghost);
        if let Some(sprite) = world.sprite_mut(self.body) {
            sprite.name = "door_open".to_string();
            sprite.height = 57.0 / 20.0;
        }
        log::debug!("Door {:?} opened", self.body);
        true
    }
}

pub const PORTAL_HALF: Vec2 = Vec2::new(14.0 / 20.0, 56.0 / 20.0);

/// Barrier that switches between harmless and electrified on a fixed cycle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElectricPortal {
    pub body: BodyId,
    timer: u32,
    active: bool,
}

impl ElectricPortal {
    pub fn spawn(world: &mut PhysicsWorld, pos: Vec2) -> Self {
        let body = world.insert(
            Body::fixed(BodyRole::Portal, Shape::boxed(PORTAL_HALF.x, PORTAL_HALF.y))
                .at(pos)
                .ghost()
                .with_sprite("portal_electric_inactive", 56.0 / 20.0),
        );
        Self {
            body,
            timer: 0,
            active: false,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn step(&mut self, world: &mut PhysicsWorld) {
        self.timer += 1;
        if self.timer < PORTAL_INTERVAL {
            return;
        }
        self.timer = 0;
        self.active = !self.active;

        let (fixture, sprite_name) = if self.active {
            (Fixture::Solid, "portal_electric_active")
        } else {
            (Fixture::Ghost, "portal_electric_inactive")
        };
        world.set_fixture(self.body, fixture);
        if let Some(sprite) = world.sprite_mut(self.body) {
            sprite.name = sprite_name.to_string();
        }
    }

    /// Player contact: repel against the player's motion and hurt while active
    pub fn touch(&self, world: &mut PhysicsWorld, player: &mut Player, events: &mut Vec<GameEvent>) {
        if !self.active {
            return;
        }
        let vx = world.velocity(player.body()).map_or(0.0, |v| v.x);
        let push = if vx > 0.0 {
            -PORTAL_REPEL_IMPULSE
        } else {
            PORTAL_REPEL_IMPULSE
        };
        world.apply_impulse(player.body(), Vec2::new(push, 0.0));
        player.attacked(events);
    }
}

pub const FALLING_PLATFORM_HALF: Vec2 = Vec2::splat(0.5);

/// One-way platform that drops away shortly after being stood on
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DelayedFallingPlatform {
    pub body: BodyId,
    pub home: Vec2,
    /// Ticks between the first contact and the fall
    pub timer_standing: u32,
    standing_ticks: Option<u32>,
    falling: bool,
}

impl DelayedFallingPlatform {
    pub fn spawn(world: &mut PhysicsWorld, home: Vec2, timer_standing: u32) -> Self {
        let body = world.insert(
            Body::fixed(
                BodyRole::FallingPlatform,
                Shape::boxed(FALLING_PLATFORM_HALF.x, FALLING_PLATFORM_HALF.y),
            )
            .at(home)
            .ghost()
            .with_sprite("prop_log_horizontal", 1.0),
        );
        Self {
            body,
            home,
            timer_standing,
            standing_ticks: None,
            falling: false,
        }
    }

    pub fn is_falling(&self) -> bool {
        self.falling
    }

    pub fn is_countdown_running(&self) -> bool {
        self.standing_ticks.is_some()
    }

    pub fn is_solid(&self, world: &PhysicsWorld) -> bool {
        world.get(self.body).is_some_and(|b| b.is_solid())
    }

    /// Player contact starts the countdown; later contacts do not restart it
    pub fn touch(&mut self) {
        if self.standing_ticks.is_none() {
            self.standing_ticks = Some(0);
        }
    }

    pub fn step(&mut self, world: &mut PhysicsWorld, player_y: f32) {
        if self.falling {
            world.translate(self.body, Vec2::new(0.0, -FALLING_SPEED));
            if world.position(self.body).is_some_and(|p| p.y <= FALLING_RESET_Y) {
                self.reset(world);
                self.falling = false;
            }
        } else {
            let above = player_y - ONE_WAY_CLEARANCE > self.home.y;
            world.set_fixture(self.body, if above { Fixture::Solid } else { Fixture::Ghost });
        }

        if let Some(ticks) = self.standing_ticks {
            let ticks = ticks + 1;
            if ticks >= self.timer_standing {
                self.standing_ticks = None;
                self.reset(world);
                self.falling = true;
            } else {
                self.standing_ticks = Some(ticks);
            }
        }
    }

    fn reset(&self, world: &mut PhysicsWorld) {
        world.set_position(self.body, self.home);
        world.set_fixture(self.body, Fixture::Ghost);
    }
}

pub const INTERMITTENT_PLATFORM_HALF: Vec2 = Vec2::new(0.8, 0.5);

/// Platform that blinks in and out of existence on a fixed timer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntermittentPlatform {
    pub home: Vec2,
    /// Present only while the platform is solid
    pub body: Option<BodyId>,
    pub interval: u32,
    timer: u32,
}

impl IntermittentPlatform {
    /// Starts absent; appears after the first interval
    pub fn new(home: Vec2) -> Self {
        Self {
            home,
            body: None,
            interval: INTERMITTENT_INTERVAL,
            timer: 0,
        }
    }

    pub fn is_solid(&self) -> bool {
        self.body.is_some()
    }

    pub fn step(&mut self, world: &mut PhysicsWorld) {
        self.timer += 1;
        if self.timer < self.interval {
            return;
        }
        self.timer = 0;

        match self.body.take() {
            Some(id) => world.destroy(id),
            None => {
                let half = INTERMITTENT_PLATFORM_HALF;
                self.body = Some(
                    world.insert(
                        Body::fixed(BodyRole::IntermittentPlatform, Shape::boxed(half.x, half.y))
                            .at(self.home)
                            .with_sprite("platform_disappearing", 1.0),
                    ),
                );
            }
        }
    }
}

pub const PATH_PLATFORM_HALF: Vec2 = Vec2::new(63.0 / 40.0, 29.0 / 40.0);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PathLeg {
    Horizontal,
    Vertical,
}

/// Platform travelling a closed rectangle, carrying whatever rides on it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RectangularPathPlatform {
    pub body: BodyId,
    pub leg: PathLeg,
    horizontal_speed: f32,
    vertical_speed: f32,
    traveled: f32,
    max_horizontal: f32,
    max_vertical: f32,
    passenger: Option<BodyId>,
}

impl RectangularPathPlatform {
    pub fn spawn(world: &mut PhysicsWorld, pos: Vec2, horizontal: f32, vertical: f32) -> Self {
        let body = world.insert(
            Body::fixed(
                BodyRole::MovingPlatform,
                Shape::boxed(PATH_PLATFORM_HALF.x, PATH_PLATFORM_HALF.y),
            )
            .at(pos)
            .with_sensor()
            .with_sprite("platform_moving", 29.0 / 20.0),
        );
        Self {
            body,
            leg: PathLeg::Horizontal,
            horizontal_speed: PATH_PLATFORM_SPEED,
            vertical_speed: PATH_PLATFORM_SPEED,
            traveled: 0.0,
            max_horizontal: horizontal.abs(),
            max_vertical: vertical.abs(),
            passenger: None,
        }
    }

    pub fn passenger(&self) -> Option<BodyId> {
        self.passenger
    }

    pub fn on_sensor_begin(&mut self, other: BodyId) {
        self.passenger = Some(other);
    }

    pub fn on_sensor_end(&mut self, other: BodyId) {
        if self.passenger == Some(other) {
            self.passenger = None;
        }
    }

    /// Advance along the path and return the displacement applied
    pub fn step(&mut self, world: &mut PhysicsWorld) -> Vec2 {
        let mut movement = Vec2::ZERO;

        if self.leg == PathLeg::Horizontal {
            if self.traveled >= self.max_horizontal {
                self.leg = PathLeg::Vertical;
                self.vertical_speed = -self.vertical_speed;
                self.traveled = 0.0;
            } else {
                movement = Vec2::new(self.horizontal_speed, 0.0);
                self.traveled += self.horizontal_speed.abs();
            }
        }
        // A leg switch above falls through into the vertical leg this tick
        if self.leg == PathLeg::Vertical {
            if self.traveled >= self.max_vertical {
                self.leg = PathLeg::Horizontal;
                self.horizontal_speed = -self.horizontal_speed;
                self.traveled = 0.0;
            } else {
                movement = Vec2::new(0.0, self.vertical_speed);
                self.traveled += self.vertical_speed.abs();
            }
        }

        world.translate(self.body, movement);
        if let Some(rider) = self.passenger {
            world.translate(rider, movement);
        }
        movement
    }
}

/// Every stateful static object of a level
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum LevelObject {
    Door(Door),
    Portal(ElectricPortal),
    Falling(DelayedFallingPlatform),
    Intermittent(IntermittentPlatform),
    Path(RectangularPathPlatform),
}

impl LevelObject {
    /// Current body, if the object has one right now
    pub fn body(&self) -> Option<BodyId> {
        match self {
            LevelObject::Door(door) => Some(door.body),
            LevelObject::Portal(portal) => Some(portal.body),
            LevelObject::Falling(platform) => Some(platform.body),
            LevelObject::Intermittent(platform) => platform.body,
            LevelObject::Path(platform) => Some(platform.body),
        }
    }

    pub fn step(&mut self, world: &mut PhysicsWorld, player_pos: Vec2) {
        match self {
            LevelObject::Door(_) => {}
            LevelObject::Portal(portal) => portal.step(world),
            LevelObject::Falling(platform) => platform.step(world, player_pos.y),
            LevelObject::Intermittent(platform) => platform.step(world),
            LevelObject::Path(platform) => {
                platform.step(world);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn world_with_player() -> (PhysicsWorld, Player) {
        let mut world = PhysicsWorld::new();
        let player = Player::spawn(&mut world, Vec2::new(0.0, 10.0));
        (world, player)
    }

    #[test]
    fn test_coin_collects_once() {
        let (mut world, mut player) = world_with_player();
        let mut coin = Pickup::spawn(&mut world, PickupKind::Coin, Vec2::new(12.5, -3.0));
        let mut events = Vec::new();

        assert_eq!(coin.collect(&mut world, &mut player, &mut events), COIN_SCORE);
        assert_eq!(coin.collect(&mut world, &mut player, &mut events), 0);
        assert!(!world.is_alive(coin.body));
        assert_eq!(events, vec![GameEvent::Sound(SoundEffect::Coin)]);
    }

    #[test]
    fn test_key_and_sword_pickups() {
        let (mut world, mut player) = world_with_player();
        let mut events = Vec::new();
        let mut key = Pickup::spawn(&mut world, PickupKind::Key, Vec2::ZERO);
        let mut sword = Pickup::spawn(&mut world, PickupKind::Sword, Vec2::ZERO);

        key.collect(&mut world, &mut player, &mut events);
        sword.collect(&mut world, &mut player, &mut events);
        assert!(player.has_key);
        assert!(player.has_sword);
        assert_eq!(events.last(), Some(&GameEvent::Sound(SoundEffect::Sword)));
    }

    #[test]
    fn test_coin_row_positions() {
        let mut world = PhysicsWorld::new();
        let coins = coin_row(&mut world, Vec2::new(10.0, 0.0), Vec2::new(2.0, 1.0), -1..2);
        let xs: Vec<f32> = coins
            .iter()
            .map(|c| world.position(c.body).unwrap().x)
            .collect();
        for (x, expected) in xs.iter().zip([10.7, 9.7, 8.7]) {
            assert!((x - expected).abs() < 1e-5, "{x} != {expected}");
        }
        assert!((world.position(coins[0].body).unwrap().y - 1.4).abs() < 1e-6);
    }

    #[test]
    fn test_door_needs_key_and_consumes_it() {
        let (mut world, mut player) = world_with_player();
        let mut door = Door::spawn(&mut world, Vec2::ZERO);

        assert!(!door.touch(&mut world, &mut player));
        assert!(world.get(door.body).unwrap().is_solid());

        player.has_key = true;
        assert!(door.touch(&mut world, &mut player));
        assert!(door.is_open());
        assert!(!player.has_key);
        assert!(!world.get(door.body).unwrap().is_solid());

        // Open doors stay open and ignore further keys
        player.has_key = true;
        assert!(!door.touch(&mut world, &mut player));
        assert!(player.has_key);
    }

    #[test]
    fn test_portal_duty_cycle() {
        let mut world = PhysicsWorld::new();
        let mut portal = ElectricPortal::spawn(&mut world, Vec2::ZERO);
        assert!(!portal.is_active());

        for _ in 0..PORTAL_INTERVAL - 1 {
            portal.step(&mut world);
        }
        assert!(!portal.is_active());
        portal.step(&mut world);
        assert!(portal.is_active());
        assert!(world.get(portal.body).unwrap().is_solid());

        for _ in 0..PORTAL_INTERVAL {
            portal.step(&mut world);
        }
        assert!(!portal.is_active());
        assert!(!world.get(portal.body).unwrap().is_solid());
    }

    #[test]
    fn test_active_portal_repels_and_hurts() {
        let (mut world, mut player) = world_with_player();
        let mut portal = ElectricPortal::spawn(&mut world, Vec2::ZERO);
        let mut events = Vec::new();

        portal.touch(&mut world, &mut player, &mut events);
        assert_eq!(player.health, PLAYER_START_HEALTH);

        for _ in 0..PORTAL_INTERVAL {
            portal.step(&mut world);
        }
        world.set_velocity(player.body(), Vec2::new(4.0, 0.0));
        portal.touch(&mut world, &mut player, &mut events);
        assert_eq!(player.health, PLAYER_START_HEALTH - 1);
        assert_eq!(world.velocity(player.body()).unwrap().x, 4.0 - 25.0);
    }

    #[test]
    fn test_falling_platform_one_way() {
        let mut world = PhysicsWorld::new();
        let mut platform = DelayedFallingPlatform::spawn(&mut world, Vec2::ZERO, 10);
        assert!(!platform.is_solid(&world));

        platform.step(&mut world, 2.0);
        assert!(platform.is_solid(&world));
        platform.step(&mut world, 1.0);
        assert!(!platform.is_solid(&world));
    }

    #[test]
    fn test_falling_platform_falls_after_timer() {
        let mut world = PhysicsWorld::new();
        let mut platform = DelayedFallingPlatform::spawn(&mut world, Vec2::ZERO, 10);
        platform.step(&mut world, 2.0);
        platform.touch();

        for _ in 0..9 {
            platform.step(&mut world, 2.0);
            platform.touch();
        }
        assert!(!platform.is_falling());
        platform.step(&mut world, 2.0);
        assert!(platform.is_falling());
        assert!(!platform.is_solid(&world));

        platform.step(&mut world, 2.0);
        assert!(world.position(platform.body).unwrap().y < 0.0);
    }

    #[test]
    fn test_falling_platform_timer_survives_leaving() {
        let mut world = PhysicsWorld::new();
        let mut platform = DelayedFallingPlatform::spawn(&mut world, Vec2::ZERO, 10);
        platform.touch();

        // Player steps off right away; the countdown keeps running
        for _ in 0..9 {
            platform.step(&mut world, -5.0);
        }
        assert!(platform.is_countdown_running());
        platform.step(&mut world, -5.0);
        assert!(platform.is_falling());
    }

    #[test]
    fn test_falling_platform_resets_below_bound() {
        let mut world = PhysicsWorld::new();
        let mut platform = DelayedFallingPlatform::spawn(&mut world, Vec2::new(3.0, 0.0), 1);
        platform.touch();
        platform.step(&mut world, 0.0);
        assert!(platform.is_falling());

        let ticks = (-FALLING_RESET_Y / FALLING_SPEED).ceil() as usize + 1;
        for _ in 0..ticks {
            platform.step(&mut world, 0.0);
        }
        assert!(!platform.is_falling());
        assert_eq!(world.position(platform.body).unwrap(), Vec2::new(3.0, 0.0));
    }

    #[test]
    fn test_intermittent_platform_blinks() {
        let mut world = PhysicsWorld::new();
        let mut platform = IntermittentPlatform::new(Vec2::new(1.0, 1.0));
        assert!(!platform.is_solid());

        for _ in 0..INTERMITTENT_INTERVAL {
            platform.step(&mut world);
        }
        let id = platform.body.expect("platform should appear");
        assert_eq!(world.position(id), Some(Vec2::new(1.0, 1.0)));

        for _ in 0..INTERMITTENT_INTERVAL {
            platform.step(&mut world);
        }
        assert!(!platform.is_solid());
        assert!(!world.is_alive(id));
    }

    #[test]
    fn test_path_platform_loops_and_carries_rider() {
        let mut world = PhysicsWorld::new();
        let rider = world.insert(Body::dynamic(BodyRole::Player, Shape::boxed(0.5, 1.0)));
        let mut platform = RectangularPathPlatform::spawn(&mut world, Vec2::ZERO, 1.0, 0.5);
        platform.on_sensor_begin(rider);

        let start = world.position(platform.body).unwrap();
        let mut total = Vec2::ZERO;
        let mut legs = Vec::new();
        for _ in 0..200 {
            total += platform.step(&mut world);
            if legs.last() != Some(&platform.leg) {
                legs.push(platform.leg);
            }
        }
        assert!(legs.len() >= 4);
        // Rider moved with the platform
        let end = world.position(platform.body).unwrap();
        assert!(((end - start) - total).length() < 1e-4);
        assert!((world.position(rider).unwrap() - total).length() < 1e-4);

        platform.on_sensor_end(rider);
        assert_eq!(platform.passenger(), None);
    }

    #[test]
    fn test_path_platform_first_corner_goes_down() {
        let mut world = PhysicsWorld::new();
        let mut platform = RectangularPathPlatform::spawn(&mut world, Vec2::ZERO, 0.3, 0.3);
        let mut moves = Vec::new();
        for _ in 0..8 {
            moves.push(platform.step(&mut world));
        }
        assert!(moves[0].x > 0.0);
        assert!(moves.iter().any(|m| m.y < 0.0));
    }
}
