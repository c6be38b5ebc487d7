//! Rigid-body world
//!
//! Gameplay code talks in `BodyId`s and `Body` records; rapier stays an
//! implementation detail behind this module. Every collider carries its body
//! id in `user_data`, and the extra collider of a sensor body also carries
//! `SENSOR_TAG`. Bodies are kept sorted by id so every pass over them, and
//! every report, comes out in a stable order.

use std::collections::BTreeMap;
use std::fmt;

use crossbeam_channel::Receiver;
use glam::Vec2;
use rapier2d::prelude::*;
use serde::{Deserialize, Serialize};

use super::collision::{Contact, SensorEvent};
use crate::consts::{GRAVITY, MAX_FALL_SPEED};

/// Extra reach of sensors so a body resting on a sensor body still counts
pub const SENSOR_SKIN: f32 = 0.05;

/// Set in `user_data` on the overlap-reporting collider of a sensor body
const SENSOR_TAG: u128 = 1 << 64;

/// Friction of scenery and props. Actors slide with none.
const SURFACE_FRICTION: f32 = 0.5;

/// Stable handle to a body
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BodyId(pub u32);

/// Collision shape, fixed at construction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Box { hx: f32, hy: f32 },
    /// Convex polygon, vertices relative to the body centre
    Polygon { points: Vec<Vec2> },
    Circle { radius: f32 },
}

impl Shape {
    pub fn boxed(hx: f32, hy: f32) -> Self {
        Shape::Box { hx, hy }
    }

    /// Half extents of the bounding box, used for sprites and culling
    pub fn half_extents(&self) -> Vec2 {
        match self {
            Shape::Box { hx, hy } => Vec2::new(*hx, *hy),
            Shape::Polygon { points } => points
                .iter()
                .fold(Vec2::ZERO, |acc, p| acc.max(p.abs())),
            Shape::Circle { radius } => Vec2::splat(*radius),
        }
    }

    pub fn area(&self) -> f32 {
        match self {
            Shape::Box { hx, hy } => 4.0 * hx * hy,
            Shape::Polygon { points } => {
                let n = points.len();
                let twice: f32 = (0..n)
                    .map(|i| {
                        let a = points[i];
                        let b = points[(i + 1) % n];
                        a.x * b.y - b.x * a.y
                    })
                    .sum();
                twice.abs() / 2.0
            }
            Shape::Circle { radius } => std::f32::consts::PI * radius * radius,
        }
    }

    /// Collider geometry grown by `skin` on every side
    fn to_collider_shape(&self, skin: f32) -> SharedShape {
        match self {
            Shape::Box { hx, hy } => SharedShape::cuboid(hx + skin, hy + skin),
            Shape::Circle { radius } => SharedShape::ball(radius + skin),
            Shape::Polygon { points } => {
                let points: Vec<Point<Real>> = points.iter().map(|p| point![p.x, p.y]).collect();
                let hull = if skin > 0.0 {
                    SharedShape::round_convex_hull(&points, skin)
                } else {
                    SharedShape::convex_hull(&points)
                };
                hull.unwrap_or_else(|| {
                    log::warn!("Degenerate polygon of {} points, using its bounds", points.len());
                    let half = self.half_extents();
                    SharedShape::cuboid(half.x + skin, half.y + skin)
                })
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BodyType {
    /// Never moved by the step; positioned by gameplay code
    Static,
    /// Integrated and collided every step
    Dynamic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Fixture {
    /// Blocks movement and produces contacts
    Solid,
    /// Detects overlap only (through a sensor), never blocks
    Ghost,
}

/// Capability tag that drives interaction dispatch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BodyRole {
    Player,
    Enemy,
    Bullet { owner: BodyId },
    Pickup,
    Door,
    Portal,
    FallingPlatform,
    IntermittentPlatform,
    MovingPlatform,
    /// Plain static geometry: ground, walls, decoration
    Scenery,
    /// Pushable dynamic crate or wheel
    Prop,
}

impl BodyRole {
    /// Bodies steered by gameplay velocities rather than by friction
    pub fn is_actor(self) -> bool {
        matches!(self, BodyRole::Player | BodyRole::Enemy | BodyRole::Bullet { .. })
    }
}

/// What the renderer draws for a body
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Sprite {
    pub name: String,
    /// Height in world units
    pub height: f32,
    pub flip_x: bool,
}

/// A body in the world
///
/// Position, velocity and angle mirror the simulation and are only
/// changed through `PhysicsWorld`.
#[derive(Debug, Clone)]
pub struct Body {
    pub id: BodyId,
    pub role: BodyRole,
    pub shape: Shape,
    pub body_type: BodyType,
    fixture: Fixture,
    pub sensor: bool,
    pub gravity_scale: f32,
    pub mass: f32,
    pub sprite: Sprite,
    pos: Vec2,
    vel: Vec2,
    angle: f32,
    alive: bool,
}

impl Body {
    pub fn new(role: BodyRole, shape: Shape, body_type: BodyType) -> Self {
        let area = shape.area();
        Self {
            id: BodyId(0),
            role,
            shape,
            body_type,
            fixture: Fixture::Solid,
            sensor: false,
            gravity_scale: 1.0,
            mass: if area > 0.0 { area } else { 1.0 },
            sprite: Sprite::default(),
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            angle: 0.0,
            alive: true,
        }
    }

    pub fn fixed(role: BodyRole, shape: Shape) -> Self {
        Self::new(role, shape, BodyType::Static)
    }

    pub fn dynamic(role: BodyRole, shape: Shape) -> Self {
        Self::new(role, shape, BodyType::Dynamic)
    }

    pub fn at(mut self, pos: Vec2) -> Self {
        self.pos = pos;
        self
    }

    pub fn with_sprite(mut self, name: impl Into<String>, height: f32) -> Self {
        self.sprite.name = name.into();
        self.sprite.height = height;
        self
    }

    pub fn ghost(mut self) -> Self {
        self.fixture = Fixture::Ghost;
        self
    }

    pub fn with_sensor(mut self) -> Self {
        self.sensor = true;
        self
    }

    pub fn with_gravity_scale(mut self, scale: f32) -> Self {
        self.gravity_scale = scale;
        self
    }

    pub fn with_velocity(mut self, vel: Vec2) -> Self {
        self.vel = vel;
        self
    }

    #[inline]
    pub fn pos(&self) -> Vec2 {
        self.pos
    }

    #[inline]
    pub fn vel(&self) -> Vec2 {
        self.vel
    }

    /// Rotation in radians; only props turn
    #[inline]
    pub fn angle(&self) -> f32 {
        self.angle
    }

    #[inline]
    pub fn fixture(&self) -> Fixture {
        self.fixture
    }

    #[inline]
    pub fn half_extents(&self) -> Vec2 {
        self.shape.half_extents()
    }

    #[inline]
    pub fn is_dynamic(&self) -> bool {
        self.body_type == BodyType::Dynamic
    }

    #[inline]
    pub fn is_solid(&self) -> bool {
        self.fixture == Fixture::Solid
    }
}

/// Output of one physics step
#[derive(Debug, Clone, Default)]
pub struct StepReport {
    pub contacts: Vec<Contact>,
    pub sensor_events: Vec<SensorEvent>,
}

struct Slot {
    body: Body,
    handle: RigidBodyHandle,
    /// The blocking (or ghost) collider; a sensor body has a second one
    collider: ColliderHandle,
}

/// All bodies of the running level
pub struct PhysicsWorld {
    pipeline: PhysicsPipeline,
    integration_parameters: IntegrationParameters,
    island_manager: IslandManager,
    broad_phase: BroadPhase,
    narrow_phase: NarrowPhase,
    rigid_bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    event_handler: ChannelEventCollector,
    collision_events: Receiver<CollisionEvent>,
    // Force events are not used, but the collector needs somewhere to send them
    _contact_force_events: Receiver<ContactForceEvent>,
    bodies: BTreeMap<BodyId, Slot>,
    gravity: Vec2,
    next_id: u32,
}

impl fmt::Debug for PhysicsWorld {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PhysicsWorld")
            .field("bodies", &self.len())
            .field("gravity", &self.gravity)
            .field("next_id", &self.next_id)
            .finish_non_exhaustive()
    }
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl PhysicsWorld {
    pub fn new() -> Self {
        let (collision_send, collision_events) = crossbeam_channel::unbounded();
        let (force_send, contact_force_events) = crossbeam_channel::unbounded();

        Self {
            pipeline: PhysicsPipeline::new(),
            integration_parameters: IntegrationParameters::default(),
            island_manager: IslandManager::new(),
            broad_phase: BroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            rigid_bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            event_handler: ChannelEventCollector::new(collision_send, force_send),
            collision_events,
            _contact_force_events: contact_force_events,
            bodies: BTreeMap::new(),
            gravity: Vec2::new(0.0, GRAVITY),
            next_id: 1,
        }
    }

    /// Add a body and return its id
    pub fn insert(&mut self, mut body: Body) -> BodyId {
        let id = BodyId(self.next_id);
        self.next_id += 1;
        body.id = id;

        let mut builder = match body.body_type {
            BodyType::Static => RigidBodyBuilder::new(RigidBodyType::Fixed),
            BodyType::Dynamic => RigidBodyBuilder::new(RigidBodyType::Dynamic)
                .gravity_scale(body.gravity_scale)
                .ccd_enabled(true)
                .can_sleep(false),
        };
        builder = builder
            .translation(vector![body.pos.x, body.pos.y])
            .linvel(vector![body.vel.x, body.vel.y]);
        if body.is_dynamic() && body.role != BodyRole::Prop {
            builder = builder.lock_rotations();
        }
        let handle = self.rigid_bodies.insert(builder.build());

        let friction = if body.role.is_actor() { 0.0 } else { SURFACE_FRICTION };
        let main = ColliderBuilder::new(body.shape.to_collider_shape(0.0))
            .sensor(!body.is_solid())
            .friction(friction)
            .friction_combine_rule(CoefficientCombineRule::Min)
            .restitution(0.0)
            .user_data(u128::from(id.0))
            .build();
        let collider = self
            .colliders
            .insert_with_parent(main, handle, &mut self.rigid_bodies);

        if body.sensor {
            let overlap = ColliderBuilder::new(body.shape.to_collider_shape(SENSOR_SKIN))
                .sensor(true)
                .density(0.0)
                .active_events(ActiveEvents::COLLISION_EVENTS)
                .user_data(u128::from(id.0) | SENSOR_TAG)
                .build();
            self.colliders
                .insert_with_parent(overlap, handle, &mut self.rigid_bodies);
        }

        self.bodies.insert(id, Slot { body, handle, collider });
        id
    }

    fn slot(&self, id: BodyId) -> Option<&Slot> {
        self.bodies.get(&id).filter(|s| s.body.alive)
    }

    fn slot_mut(&mut self, id: BodyId) -> Option<&mut Slot> {
        self.bodies.get_mut(&id).filter(|s| s.body.alive)
    }

    /// Living body and its rapier counterpart
    fn rigid_body_mut(&mut self, id: BodyId) -> Option<(&mut Body, &mut RigidBody)> {
        let slot = self.bodies.get_mut(&id).filter(|s| s.body.alive)?;
        let rigid_body = self.rigid_bodies.get_mut(slot.handle)?;
        Some((&mut slot.body, rigid_body))
    }

    /// Living body by id
    pub fn get(&self, id: BodyId) -> Option<&Body> {
        self.slot(id).map(|s| &s.body)
    }

    pub fn is_alive(&self, id: BodyId) -> bool {
        self.slot(id).is_some()
    }

    pub fn position(&self, id: BodyId) -> Option<Vec2> {
        self.get(id).map(|b| b.pos)
    }

    pub fn velocity(&self, id: BodyId) -> Option<Vec2> {
        self.get(id).map(|b| b.vel)
    }

    pub fn role(&self, id: BodyId) -> Option<BodyRole> {
        self.get(id).map(|b| b.role)
    }

    pub fn sprite_mut(&mut self, id: BodyId) -> Option<&mut Sprite> {
        self.slot_mut(id).map(|s| &mut s.body.sprite)
    }

    /// Switch a body between blocking and overlap-only
    pub fn set_fixture(&mut self, id: BodyId, fixture: Fixture) {
        let Some(slot) = self.bodies.get_mut(&id).filter(|s| s.body.alive) else {
            return;
        };
        if slot.body.fixture == fixture {
            return;
        }
        slot.body.fixture = fixture;
        if let Some(collider) = self.colliders.get_mut(slot.collider) {
            collider.set_sensor(fixture == Fixture::Ghost);
        }
    }

    /// Mark a body dead; it stays in storage until `sweep_dead`
    pub fn destroy(&mut self, id: BodyId) {
        if let Some(slot) = self.bodies.get_mut(&id) {
            slot.body.alive = false;
        }
    }

    /// Remove dead bodies and their colliders
    pub fn sweep_dead(&mut self) {
        let dead: Vec<BodyId> = self
            .bodies
            .values()
            .filter(|s| !s.body.alive)
            .map(|s| s.body.id)
            .collect();

        for id in dead {
            if let Some(slot) = self.bodies.remove(&id) {
                self.rigid_bodies.remove(
                    slot.handle,
                    &mut self.island_manager,
                    &mut self.colliders,
                    &mut self.impulse_joints,
                    &mut self.multibody_joints,
                    true,
                );
            }
        }
    }

    /// Change a dynamic body's velocity by `impulse / mass`
    pub fn apply_impulse(&mut self, id: BodyId, impulse: Vec2) {
        if let Some((body, rigid_body)) = self.rigid_body_mut(id) {
            if body.is_dynamic() {
                let v = rigid_body.linvel();
                let vel = Vec2::new(v.x, v.y) + impulse / body.mass;
                rigid_body.set_linvel(vector![vel.x, vel.y], true);
                body.vel = vel;
            }
        }
    }

    pub fn set_velocity(&mut self, id: BodyId, vel: Vec2) {
        if let Some((body, rigid_body)) = self.rigid_body_mut(id) {
            rigid_body.set_linvel(vector![vel.x, vel.y], true);
            body.vel = vel;
        }
    }

    /// Teleport a body; collisions are resolved on the next step
    pub fn set_position(&mut self, id: BodyId, pos: Vec2) {
        if let Some((body, rigid_body)) = self.rigid_body_mut(id) {
            rigid_body.set_translation(vector![pos.x, pos.y], true);
            body.pos = pos;
        }
    }

    pub fn translate(&mut self, id: BodyId, delta: Vec2) {
        if let Some(pos) = self.position(id) {
            self.set_position(id, pos + delta);
        }
    }

    /// Living bodies in id order
    pub fn iter(&self) -> impl Iterator<Item = &Body> {
        self.bodies
            .values()
            .map(|s| &s.body)
            .filter(|b| b.alive)
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Advance the simulation by `dt`
    pub fn step(&mut self, dt: f32) -> StepReport {
        self.integration_parameters.dt = dt;
        let gravity = vector![self.gravity.x, self.gravity.y];
        let hooks = &();

        self.pipeline.step(
            &gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.rigid_bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            hooks,
            &self.event_handler,
        );

        self.sync_bodies();
        StepReport {
            contacts: self.collect_contacts(),
            sensor_events: self.collect_sensor_events(),
        }
    }

    /// Copy rapier's state back into the body records, capping fall speed
    fn sync_bodies(&mut self) {
        for slot in self.bodies.values_mut() {
            let Some(rigid_body) = self.rigid_bodies.get_mut(slot.handle) else {
                continue;
            };
            let mut vel = *rigid_body.linvel();
            if vel.y < -MAX_FALL_SPEED {
                vel.y = -MAX_FALL_SPEED;
                rigid_body.set_linvel(vel, true);
            }
            let t = *rigid_body.translation();
            slot.body.pos = Vec2::new(t.x, t.y);
            slot.body.vel = Vec2::new(vel.x, vel.y);
            slot.body.angle = rigid_body.rotation().angle();
        }
    }

    /// Body id behind a collider, and whether it is the overlap collider
    fn owner_of(&self, collider: ColliderHandle) -> Option<(BodyId, bool)> {
        let data = self.colliders.get(collider)?.user_data;
        let id = BodyId((data & u128::from(u32::MAX)) as u32);
        self.is_alive(id).then_some((id, data & SENSOR_TAG != 0))
    }

    /// One contact per touching pair, normal taken from its first manifold
    fn collect_contacts(&self) -> Vec<Contact> {
        let mut contacts: Vec<Contact> = self
            .narrow_phase
            .contact_pairs()
            .filter(|pair| pair.has_any_active_contact)
            .filter_map(|pair| {
                let (a, _) = self.owner_of(pair.collider1)?;
                let (b, _) = self.owner_of(pair.collider2)?;
                let manifold = pair
                    .manifolds
                    .iter()
                    .find(|m| !m.data.solver_contacts.is_empty())?;
                let n = manifold.data.normal;
                Some(Contact::new(a, b, Vec2::new(n.x, n.y)))
            })
            .collect();
        contacts.sort_by_key(|c| (c.a.min(c.b), c.a.max(c.b)));
        contacts
    }

    fn collect_sensor_events(&self) -> Vec<SensorEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.collision_events.try_recv() {
            let (c1, c2, began) = match event {
                CollisionEvent::Started(c1, c2, _) => (c1, c2, true),
                CollisionEvent::Stopped(c1, c2, _) => (c1, c2, false),
            };
            let (Some((id1, tagged1)), Some((id2, tagged2))) = (self.owner_of(c1), self.owner_of(c2))
            else {
                continue;
            };
            if id1 == id2 {
                continue;
            }
            for (sensor, other, tagged) in [(id1, id2, tagged1), (id2, id1, tagged2)] {
                if tagged {
                    events.push(if began {
                        SensorEvent::Begin { sensor, other }
                    } else {
                        SensorEvent::End { sensor, other }
                    });
                }
            }
        }
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;

    fn ground(world: &mut PhysicsWorld) -> BodyId {
        world.insert(Body::fixed(BodyRole::Scenery, Shape::boxed(20.0, 1.0)).at(Vec2::new(0.0, -1.0)))
    }

    #[test]
    fn test_falling_body_lands_with_ground_contact() {
        let mut world = PhysicsWorld::new();
        let floor = ground(&mut world);
        let crate_id =
            world.insert(Body::dynamic(BodyRole::Prop, Shape::boxed(0.5, 0.5)).at(Vec2::new(0.0, 3.0)));

        let mut landed = false;
        for _ in 0..120 {
            let report = world.step(SIM_DT);
            if report.contacts.iter().any(|c| {
                c.involves(floor) && c.normal_for(crate_id).is_some_and(|n| n.y < -0.99)
            }) {
                landed = true;
            }
        }

        assert!(landed);
        let pos = world.position(crate_id).unwrap();
        assert!((pos.y - 0.5).abs() < 0.02, "resting on top, got {pos}");
        assert!(world.velocity(crate_id).unwrap().y.abs() < 0.1);
    }

    #[test]
    fn test_walking_on_ground_does_not_snag_on_it() {
        let mut world = PhysicsWorld::new();
        ground(&mut world);
        let walker = world.insert(
            Body::dynamic(BodyRole::Enemy, Shape::boxed(0.5, 0.5)).at(Vec2::new(0.0, 0.5)),
        );

        for _ in 0..30 {
            world.set_velocity(walker, Vec2::new(5.0, world.velocity(walker).unwrap().y));
            world.step(SIM_DT);
        }

        let pos = world.position(walker).unwrap();
        assert!(pos.x > 2.0, "walker should have advanced, got {pos}");
        assert!((pos.y - 0.5).abs() < 0.02);
    }

    #[test]
    fn test_wall_blocks_and_reports_side_normal() {
        let mut world = PhysicsWorld::new();
        let wall = world.insert(Body::fixed(BodyRole::Scenery, Shape::boxed(0.5, 5.0)).at(Vec2::new(2.0, 0.0)));
        let mover = world.insert(
            Body::dynamic(BodyRole::Player, Shape::boxed(0.5, 0.5))
                .with_gravity_scale(0.0)
                .with_velocity(Vec2::new(30.0, 0.0)),
        );

        let mut hit = None;
        for _ in 0..20 {
            let report = world.step(SIM_DT);
            if let Some(c) = report.contacts.iter().find(|c| c.involves(wall)) {
                hit = Some(*c);
                break;
            }
        }

        let contact = hit.expect("mover should hit the wall");
        let normal = contact.normal_for(mover).unwrap();
        assert!(normal.x > 0.99, "normal {normal}");
        assert!(contact.normal_for(wall).unwrap().x < -0.99);

        for _ in 0..10 {
            world.step(SIM_DT);
        }
        assert!(world.position(mover).unwrap().x < 1.05);
    }

    #[test]
    fn test_ghost_bodies_do_not_block() {
        let mut world = PhysicsWorld::new();
        world.insert(
            Body::fixed(BodyRole::Pickup, Shape::boxed(0.5, 5.0))
                .at(Vec2::new(1.0, 0.0))
                .ghost(),
        );
        let mover = world.insert(
            Body::dynamic(BodyRole::Player, Shape::boxed(0.5, 0.5))
                .with_gravity_scale(0.0)
                .with_velocity(Vec2::new(60.0, 0.0)),
        );

        for _ in 0..10 {
            assert!(world.step(SIM_DT).contacts.is_empty());
        }
        assert!(world.position(mover).unwrap().x > 5.0);
    }

    #[test]
    fn test_fixture_switch_opens_a_wall() {
        let mut world = PhysicsWorld::new();
        let door = world.insert(Body::fixed(BodyRole::Door, Shape::boxed(0.5, 5.0)).at(Vec2::new(2.0, 0.0)));
        let mover = world.insert(
            Body::dynamic(BodyRole::Player, Shape::boxed(0.5, 0.5))
                .with_gravity_scale(0.0)
                .with_velocity(Vec2::new(30.0, 0.0)),
        );
        for _ in 0..20 {
            world.step(SIM_DT);
        }
        assert!(world.position(mover).unwrap().x < 1.05);

        world.set_fixture(door, Fixture::Ghost);
        assert_eq!(world.get(door).unwrap().fixture(), Fixture::Ghost);
        for _ in 0..30 {
            world.set_velocity(mover, Vec2::new(30.0, 0.0));
            world.step(SIM_DT);
        }
        assert!(world.position(mover).unwrap().x > 5.0);
    }

    #[test]
    fn test_sensor_begin_and_end_events() {
        let mut world = PhysicsWorld::new();
        let sensor = world.insert(
            Body::fixed(BodyRole::Pickup, Shape::boxed(0.3, 0.3))
                .at(Vec2::new(1.0, 0.0))
                .ghost()
                .with_sensor(),
        );
        let mover = world.insert(
            Body::dynamic(BodyRole::Player, Shape::boxed(0.5, 0.5))
                .with_gravity_scale(0.0)
                .with_velocity(Vec2::new(30.0, 0.0)),
        );

        let mut events = Vec::new();
        for _ in 0..20 {
            events.extend(world.step(SIM_DT).sensor_events);
        }

        assert_eq!(
            events,
            vec![
                SensorEvent::Begin { sensor, other: mover },
                SensorEvent::End { sensor, other: mover },
            ]
        );
    }

    #[test]
    fn test_ghost_bullet_reports_overlap_without_blocking() {
        let mut world = PhysicsWorld::new();
        let wall = world.insert(Body::fixed(BodyRole::Scenery, Shape::boxed(0.5, 5.0)).at(Vec2::new(2.0, 0.0)));
        let bullet = world.insert(
            Body::dynamic(BodyRole::Bullet { owner: BodyId(99) }, Shape::boxed(0.2, 0.2))
                .with_gravity_scale(0.0)
                .with_velocity(Vec2::new(15.0, 0.0))
                .ghost()
                .with_sensor(),
        );

        let mut events = Vec::new();
        for _ in 0..10 {
            let report = world.step(SIM_DT);
            assert!(report.contacts.is_empty());
            events.extend(report.sensor_events);
        }

        assert!(events.contains(&SensorEvent::Begin { sensor: bullet, other: wall }));
        assert!(world.position(bullet).unwrap().x > 2.0);
    }

    #[test]
    fn test_polygon_ramp_tilts_the_contact_normal() {
        let mut world = PhysicsWorld::new();
        let ramp = world.insert(Body::fixed(
            BodyRole::Scenery,
            Shape::Polygon {
                points: vec![
                    Vec2::new(-1.875, -0.75),
                    Vec2::new(1.875, -0.75),
                    Vec2::new(1.875, 0.75),
                ],
            },
        ));
        let crate_id = world.insert(
            Body::dynamic(BodyRole::Enemy, Shape::boxed(0.25, 0.25)).at(Vec2::new(0.5, 2.0)),
        );

        let mut normal = None;
        for _ in 0..60 {
            let report = world.step(SIM_DT);
            if let Some(c) = report.contacts.iter().find(|c| c.involves(ramp)) {
                normal = c.normal_for(crate_id);
                break;
            }
        }

        let normal = normal.expect("body should land on the ramp");
        assert!(normal.x > 0.2, "slope normal {normal}");
        assert!(normal.y < -0.5, "slope normal {normal}");
    }

    #[test]
    fn test_wheel_prop_rolls_and_rotates() {
        let mut world = PhysicsWorld::new();
        ground(&mut world);
        let wheel = world.insert(
            Body::dynamic(BodyRole::Prop, Shape::Circle { radius: 0.5 }).at(Vec2::new(0.0, 0.5)),
        );
        world.set_velocity(wheel, Vec2::new(4.0, 0.0));

        for _ in 0..30 {
            world.step(SIM_DT);
        }
        assert!(world.get(wheel).unwrap().angle().abs() > 0.1);
    }

    #[test]
    fn test_impulse_scales_with_mass() {
        let mut world = PhysicsWorld::new();
        let id = world.insert(Body::dynamic(BodyRole::Player, Shape::boxed(0.5, 1.0)));
        assert_eq!(world.get(id).unwrap().mass, 2.0);

        world.apply_impulse(id, Vec2::new(6.0, 0.0));
        assert_eq!(world.velocity(id).unwrap(), Vec2::new(3.0, 0.0));
    }

    #[test]
    fn test_destroy_then_sweep() {
        let mut world = PhysicsWorld::new();
        let a = ground(&mut world);
        let b = ground(&mut world);
        world.destroy(a);

        assert!(!world.is_alive(a));
        assert!(world.is_alive(b));
        assert_eq!(world.len(), 1);

        world.sweep_dead();
        assert!(world.get(b).is_some());
        assert_eq!(world.colliders.len(), 1);
    }

    #[test]
    fn test_polygon_bounds_and_area() {
        let tri = Shape::Polygon {
            points: vec![
                Vec2::new(-1.875, -0.75),
                Vec2::new(1.875, -0.75),
                Vec2::new(1.875, 0.75),
            ],
        };
        assert_eq!(tri.half_extents(), Vec2::new(1.875, 0.75));
        assert!((tri.area() - 2.8125).abs() < 1e-4);
    }
}
