//! Hardcoded level manifests
//!
//! Level art is authored in pixels: positions at 20 px per world unit and
//! sizes as full widths, so half extents come out at 40 px per unit.

use std::ops::Range;

use glam::Vec2;

use crate::consts::*;
use crate::error::LoadError;
use crate::sim::enemy::EnemyKind;
use crate::sim::objects::{
    DelayedFallingPlatform, Door, ElectricPortal, IntermittentPlatform, LevelObject, PickupKind,
    RectangularPathPlatform, coin_row,
};
use crate::sim::physics::Shape;
use crate::sim::state::{GameEvent, GameState, LevelSource};

pub const BUILTIN_LEVEL_COUNT: u32 = 3;

/// Spawn point shared by every built-in level
pub const BUILTIN_START: Vec2 = Vec2::new(-16.0, -8.0);

/// Build built-in level `index` from scratch
pub fn load_builtin(index: u32, now_millis: u64) -> Result<GameState, LoadError> {
    let mut state = GameState::new(
        LevelSource::Builtin(index),
        DEFAULT_LEVEL_LENGTH,
        BUILTIN_START,
        now_millis,
    );

    match index {
        0 => forest(&mut state),
        1 => ice(&mut state),
        2 => lava(&mut state),
        _ => return Err(LoadError::UnknownLevel(index)),
    }

    state.events.push(GameEvent::SwitchMusic { track: index });
    log::info!(
        "Loaded built-in level {index}: {} bodies, {} enemies",
        state.world.len(),
        state.enemies.len()
    );
    Ok(state)
}

fn at(x: f32, y: f32) -> Vec2 {
    Vec2::new(x / 20.0, y / 20.0)
}

fn size(width: f32, height: f32) -> Vec2 {
    Vec2::new(width / 40.0, height / 40.0)
}

/// Static box platform; returns its placement for coin rows
fn platform(state: &mut GameState, sprite: &str, pos: Vec2, half: Vec2) -> (Vec2, Vec2) {
    state.add_platform(sprite, pos, Shape::boxed(half.x, half.y));
    (pos, half)
}

fn coins(state: &mut GameState, (pos, half): (Vec2, Vec2), indices: Range<i32>) {
    state.pickups.extend(coin_row(&mut state.world, pos, half, indices));
}

fn left_border(state: &mut GameState) {
    state.add_platform("", Vec2::new(-21.0, 0.0), Shape::boxed(1.0, 60.0));
}

fn falling(state: &mut GameState, home: Vec2, timer_standing: u32) {
    let platform = DelayedFallingPlatform::spawn(&mut state.world, home, timer_standing);
    state.add_object(LevelObject::Falling(platform));
}

fn forest(state: &mut GameState) {
    left_border(state);

    state.add_enemy(EnemyKind::BasicPatrol, at(502.0, -81.5));
    state.add_enemy(EnemyKind::BasicPatrol, at(1010.0, -36.5));
    let blue = state.add_enemy(EnemyKind::BasicPatrol, at(590.0, 84.5));
    if let Some(sprite) = state.world.sprite_mut(blue) {
        sprite.name = "enemy_basic_blue".to_string();
        sprite.height = 1.4;
    }

    state.add_platform("prop_tree_tall", Vec2::new(-19.0, 0.0), Shape::boxed(0.6, 8.0));

    let p = platform(state, "platform_wood_medium", at(131.5, -187.5), size(67.0, 192.0));
    coins(state, p, -1..2);
    let ground = platform(state, "prop_ground_grass", at(-114.0, -216.0), size(558.0, 129.0));
    coins(state, ground, 0..5);

    state.add_platform(
        "platform_triangle",
        Vec2::new(2.73 - 3.75 / 2.0, -7.65 + 0.75),
        Shape::Polygon {
            points: vec![
                Vec2::new(-3.75 / 2.0, -0.75),
                Vec2::new(3.75 / 2.0, -0.75),
                Vec2::new(3.75 / 2.0, 0.75),
            ],
        },
    );

    platform(state, "platform_stone_small", at(76.0, -139.0), size(44.0, 29.0));
    let p = platform(state, "platform_grass_wide", at(476.5, -159.5), size(203.0, 246.0));
    coins(state, p, -1..2);
    let p = platform(state, "platform_brick_medium", at(308.0, -187.5), size(138.0, 190.0));
    coins(state, p, -1..2);
    platform(state, "platform_floating_small", at(204.0, -107.0), size(70.0, 23.0));
    platform(state, "platform_stone_wide", at(639.0, -111.5), size(144.0, 342.0));
    platform(state, "platform_floating_tiny", at(302.0, -28.0), size(56.0, 17.0));
    let p = platform(state, "platform_floating_narrow", at(259.5, 31.0), size(35.0, 17.0));
    coins(state, p, 0..1);
    platform(state, "platform_wood_narrow", at(326.0, 117.0), size(106.0, 15.0));

    let crate_half = size(22.0, 22.0);
    state.add_prop(
        "prop_crate_small",
        at(340.0, 135.5),
        Shape::boxed(crate_half.x, crate_half.y),
        11.0,
    );

    platform(state, "platform_brick_large", at(1069.0, -163.5), size(144.0, 234.0));
    platform(state, "platform_grass_medium", at(1326.0, -163.5), size(144.0, 234.0));
    platform(state, "platform_stone_narrow", at(1199.5, -69.0), size(117.0, 33.0));
    let p = platform(state, "platform_wood_wide", at(1498.5, -61.5), size(217.0, 438.0));
    coins(state, p, -1..2);
    platform(state, "platform_floating_narrow", at(1077.5, 129.0), size(35.0, 17.0));

    state.add_prop(
        "prop_wheel_large",
        at(1324.0, -18.5),
        Shape::Circle {
            radius: 56.0 / 40.0,
        },
        1.0,
    );

    let p = platform(state, "platform_floating_medium", at(1161.5, 51.0), size(139.0, 15.0));
    coins(state, p, -2..3);
    let p = platform(state, "platform_stone_medium", at(1161.5, 204.0), size(139.0, 15.0));
    coins(state, p, -2..3);

    let mover = RectangularPathPlatform::spawn(&mut state.world, at(763.5, 47.0), 9.0, 5.0);
    state.add_object(LevelObject::Path(mover));
}

fn ice(state: &mut GameState) {
    left_border(state);

    state.add_enemy(EnemyKind::Slime, at(-18.0, -87.5));
    state.add_enemy(EnemyKind::Spiked, at(-236.5, -138.0));
    state.add_enemy(EnemyKind::Spiked, at(832.5, -83.0));

    let p = platform(state, "platform_ice_ground", at(-228.5, -216.0), size(307.0, 129.0));
    coins(state, p, -2..3);
    let p = platform(state, "platform_ice_small", at(-55.0, -202.5), size(44.0, 156.0));
    coins(state, p, 0..2);
    let p = platform(state, "platform_ice_medium", at(74.5, -189.0), size(219.0, 183.0));
    coins(state, p, 0..2);
    platform(state, "platform_ice_large", at(745.0, -188.5), size(760.0, 184.0));

    state.add_platform(
        "platform_ice_floating",
        at(645.0, -84.0),
        Shape::Polygon {
            points: vec![
                at(-156.0, -15.0),
                at(-128.0, 15.0),
                at(128.0, 15.0),
                at(156.0, -15.0),
            ],
        },
    );
    platform(state, "platform_ice_narrow", at(640.5, -62.0), size(45.0, 15.0));
    platform(state, "platform_ice_wide", at(1498.5, -93.5), size(217.0, 374.0));

    // Bridge of quick-dropping tiles
    for x in (194..=354).step_by(20) {
        falling(state, at(x as f32, -107.5), FALLING_TIMER_STANDING);
    }
    // Vertical stair
    for y in [-50.0, 10.0, 70.0] {
        falling(state, at(444.0, y), 30);
    }
    for x in [1302.0, 1282.0, 1322.0] {
        falling(state, at(x, -50.5), 40);
    }
    for x in [1200.0, 1180.0, 1220.0] {
        falling(state, at(x, 22.5), 40);
    }

    let p = platform(state, "platform_special", Vec2::ZERO, size(237.0, 43.0));
    coins(state, p, -1..2);

    state.add_pickup(PickupKind::Sword, at(644.5, -44.0));
}

fn lava(state: &mut GameState) {
    left_border(state);

    let blinking = [at(505.5, 37.5), at(159.5, -73.5)];
    for home in blinking {
        state.add_object(LevelObject::Intermittent(IntermittentPlatform::new(home)));
    }

    platform(state, "platform_lava_ground", at(-309.0, -208.5), size(168.0, 144.0));
    let ledge_low = platform(state, "platform_lava_horizontal", at(-320.5, -27.0), size(145.0, 13.0));
    platform(state, "platform_lava_vertical_narrow", at(-388.0, 20.0), size(10.0, 81.0));
    let ledge_high = platform(state, "platform_lava_horizontal_upper", at(-320.5, 67.0), size(145.0, 13.0));
    platform(state, "platform_lava_pillar_small", at(-88.5, -2.0), size(31.0, 69.0));
    let bridge = platform(state, "platform_lava_bridge_long", at(164.5, 52.0), size(541.0, 43.0));
    platform(state, "platform_lava_pillar_medium", at(414.0, -2.5), size(34.0, 68.0));
    let base = platform(state, "platform_lava_base_large", at(-50.0, -187.5), size(202.0, 190.0));
    platform(state, "platform_lava_ledge_wide", at(172.0, -231.5), size(248.0, 98.0));
    platform(state, "platform_lava_island_large", at(458.5, -186.5), size(331.0, 188.0));
    let floating = platform(state, "platform_lava_floating_wide", at(-176.5, 61.0), size(159.0, 21.0));
    let island = platform(state, "platform_lava_island_extended", at(1031.5, -186.5), size(417.0, 188.0));
    let cliff = platform(state, "platform_lava_cliff_tall", at(1483.0, -157.0), size(248.0, 247.0));

    platform(state, "prop_crate_large", at(584.5, -53.0), size(55.0, 79.0));
    platform(state, "prop_crate_medium", at(541.5, -72.5), size(33.0, 40.0));
    platform(state, "prop_pipe_vertical", at(714.0, -205.0), size(58.0, 151.0));
    platform(state, "platform_lava_wall_tall", at(1588.0, 151.0), size(38.0, 259.0));

    state.add_pickup(PickupKind::Key, at(-353.0, -5.5));
    let door = Door::spawn(&mut state.world, at(-89.0, -65.5));
    state.add_object(LevelObject::Door(door));
    let portal = ElectricPortal::spawn(&mut state.world, at(414.0, -64.5));
    state.add_object(LevelObject::Portal(portal));

    state.player.upgrade();

    state.add_enemy(EnemyKind::Pursuer, at(0.0, 89.5));
    state.add_enemy(EnemyKind::Armored, at(232.0, -155.5));
    state.add_enemy(EnemyKind::BasicPatrol, at(15.5, -169.0));
    state.add_enemy(EnemyKind::Turret, at(-369.5, 80.5));

    state.add_pickup(PickupKind::Key, at(71.0, 89.5));
    let door = Door::spawn(&mut state.world, at(1589.0, -6.5));
    state.add_object(LevelObject::Door(door));

    state.add_enemy(EnemyKind::Pursuer, at(891.0, -77.5));

    for p in [ledge_low, ledge_high, bridge, base, floating, island, cliff] {
        coins(state, p, -1..2);
    }
}
