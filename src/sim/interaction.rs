//! Collision policy
//!
//! Every contact and sensor event from a physics step is routed through one
//! table keyed by the pair of body roles involved. Bullets are overlap-only
//! bodies, so their hits arrive as sensor events.

use glam::Vec2;

use super::collision::{Contact, HitDirection, SensorEvent, classify_hit};
use super::enemy::AttackOutcome;
use super::objects::LevelObject;
use super::physics::{BodyId, BodyRole, StepReport};
use super::state::{GameEvent, GameState};
use crate::audio::SoundEffect;
use crate::consts::*;

/// Apply the gameplay consequences of one physics step
pub fn dispatch(state: &mut GameState, report: &StepReport) {
    for contact in &report.contacts {
        handle_contact(state, *contact);
    }
    for event in &report.sensor_events {
        handle_sensor(state, *event);
    }
}

fn handle_contact(state: &mut GameState, contact: Contact) {
    notify_actor(state, contact.a, contact.normal);
    notify_actor(state, contact.b, -contact.normal);

    let (Some(role_a), Some(role_b)) = (state.world.role(contact.a), state.world.role(contact.b))
    else {
        return;
    };

    match (role_a, role_b) {
        (BodyRole::Player, BodyRole::Enemy) => player_meets_enemy(state, contact.flipped()),
        (BodyRole::Enemy, BodyRole::Player) => player_meets_enemy(state, contact),
        (BodyRole::Player, BodyRole::Door) => door_touched(state, contact.b),
        (BodyRole::Door, BodyRole::Player) => door_touched(state, contact.a),
        (BodyRole::Player, BodyRole::Portal) => portal_touched(state, contact.b),
        (BodyRole::Portal, BodyRole::Player) => portal_touched(state, contact.a),
        (BodyRole::Player, BodyRole::FallingPlatform) => falling_platform_touched(state, contact.b),
        (BodyRole::FallingPlatform, BodyRole::Player) => falling_platform_touched(state, contact.a),
        _ => {}
    }
}

/// Ground detection for the player and enemies
fn notify_actor(state: &mut GameState, id: BodyId, normal: Vec2) {
    if id == state.player.body() {
        state.player.motion.on_contact(normal);
    } else if let Some(enemy) = state.enemy_mut(id) {
        enemy.motion.on_contact(normal);
    }
}

/// `contact.a` is the enemy, `contact.normal` points from it to the player
fn player_meets_enemy(state: &mut GameState, contact: Contact) {
    let Some(kind) = state.enemy_mut(contact.a).map(|e| e.kind) else {
        return;
    };
    if state.player.attacking {
        defeat_enemy(state, contact.a);
        return;
    }

    let player = state.player.body();
    let player_vx = state.world.velocity(player).map_or(0.0, |v| v.x);

    match classify_hit(contact.normal) {
        HitDirection::FromAbove if kind.can_be_stomped() => {
            defeat_enemy(state, contact.a);
            state
                .world
                .apply_impulse(player, Vec2::new(0.0, STOMP_BOUNCE_IMPULSE));
            state.play(SoundEffect::Bounce);
        }
        HitDirection::FromAbove => {
            state
                .world
                .apply_impulse(player, Vec2::new(0.0, STOMP_BOUNCE_IMPULSE));
            state.player.attacked(&mut state.events);
        }
        hit @ (HitDirection::FromLeft | HitDirection::FromRight) => {
            state
                .world
                .apply_impulse(contact.a, Vec2::new(-player_vx * KNOCKBACK_FACTOR, 0.0));
            state.world.apply_impulse(
                player,
                Vec2::new(hit.outward_sign() * SIDE_HIT_IMPULSE_X, SIDE_HIT_IMPULSE_Y),
            );
            state.player.attacked(&mut state.events);
        }
        HitDirection::Other => {
            state
                .world
                .apply_impulse(player, Vec2::new(-player_vx, STOMP_BOUNCE_IMPULSE));
            state.player.attacked(&mut state.events);
        }
    }
}

fn defeat_enemy(state: &mut GameState, body: BodyId) {
    let GameState {
        world,
        enemies,
        events,
        score,
        ..
    } = state;
    let Some(enemy) = enemies.iter_mut().find(|e| e.body() == body) else {
        return;
    };
    if let AttackOutcome::Defeated { score: reward } = enemy.attacked(world) {
        *score = score.saturating_add(reward);
        events.push(GameEvent::EnemyDefeated {
            kind: enemy.kind,
            score: reward,
        });
    }
}

/// A bullet breaks on anything solid except the turret that fired it
fn bullet_hit(state: &mut GameState, bullet: BodyId, owner: BodyId, other: BodyId) {
    if other == owner || !state.world.is_alive(bullet) {
        return;
    }
    let Some(other_role) = state.world.get(other).filter(|b| b.is_solid()).map(|b| b.role) else {
        return;
    };
    let Some(impulse) = state
        .bullets
        .iter()
        .find(|b| b.body == bullet)
        .map(|b| b.impact_impulse())
    else {
        return;
    };

    if other_role == BodyRole::Player {
        state.player.attacked(&mut state.events);
        state.world.apply_impulse(other, impulse);
    }
    state.world.destroy(bullet);
}

fn door_touched(state: &mut GameState, body: BodyId) {
    let GameState {
        world,
        player,
        objects,
        ..
    } = state;
    if let Some(LevelObject::Door(door)) = objects.iter_mut().find(|o| o.body() == Some(body)) {
        door.touch(world, player);
    }
}

fn portal_touched(state: &mut GameState, body: BodyId) {
    let GameState {
        world,
        player,
        objects,
        events,
        ..
    } = state;
    if let Some(LevelObject::Portal(portal)) = objects.iter().find(|o| o.body() == Some(body)) {
        portal.touch(world, player, events);
    }
}

fn falling_platform_touched(state: &mut GameState, body: BodyId) {
    if let Some(LevelObject::Falling(platform)) = state.object_mut(body) {
        platform.touch();
    }
}

fn handle_sensor(state: &mut GameState, event: SensorEvent) {
    match event {
        SensorEvent::Begin { sensor, other } => match state.world.role(sensor) {
            Some(BodyRole::Pickup) if other == state.player.body() => pickup_collected(state, sensor),
            Some(BodyRole::Bullet { owner }) => bullet_hit(state, sensor, owner, other),
            Some(BodyRole::MovingPlatform) => {
                let rider = state
                    .world
                    .get(other)
                    .is_some_and(|b| b.is_dynamic() && b.is_solid());
                if !rider {
                    return;
                }
                if let Some(LevelObject::Path(platform)) = state.object_mut(sensor) {
                    platform.on_sensor_begin(other);
                }
            }
            _ => {}
        },
        SensorEvent::End { sensor, other } => {
            if let Some(LevelObject::Path(platform)) = state.object_mut(sensor) {
                platform.on_sensor_end(other);
            }
        }
    }
}

fn pickup_collected(state: &mut GameState, body: BodyId) {
    let GameState {
        world,
        player,
        pickups,
        events,
        score,
        ..
    } = state;
    if let Some(pickup) = pickups.iter_mut().find(|p| p.body == body) {
        *score = score.saturating_add(pickup.collect(world, player, events));
    }
}
