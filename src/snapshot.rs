//! Per-frame render snapshot
//!
//! Read-only view of a `GameState` for a renderer. Positions are in screen
//! space: world x minus the camera offset, with the view centred on x = 0.

use glam::Vec2;
use serde::Serialize;

use crate::sim::player::Animation;
use crate::sim::state::{GamePhase, GameState, LevelSource};

/// One drawable body
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpriteView {
    pub body: u32,
    pub sprite: String,
    pub screen_pos: Vec2,
    pub half_extents: Vec2,
    /// Image height in world units
    pub height: f32,
    pub flip_x: bool,
    /// Rotation in radians
    pub angle: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HudView {
    pub health: u8,
    pub score: u32,
    pub has_sword: bool,
    pub has_key: bool,
    pub invulnerable: bool,
    pub animation: Animation,
    pub elapsed_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderSnapshot {
    pub phase: GamePhase,
    pub level: LevelSource,
    pub camera_offset: f32,
    pub hud: HudView,
    /// Visible bodies in id order
    pub bodies: Vec<SpriteView>,
}

impl RenderSnapshot {
    pub fn from_state(state: &GameState) -> Self {
        let camera = &state.camera;
        let half_view = camera.viewport_width / 2.0;

        let bodies = state
            .world
            .iter()
            .filter(|b| !b.sprite.name.is_empty())
            .filter_map(|b| {
                let half = b.half_extents();
                let pos = b.pos();
                let screen_pos = Vec2::new(camera.to_screen(pos.x), pos.y);
                (screen_pos.x.abs() - half.x <= half_view).then(|| SpriteView {
                    body: b.id.0,
                    sprite: b.sprite.name.clone(),
                    screen_pos,
                    half_extents: half,
                    height: b.sprite.height,
                    flip_x: b.sprite.flip_x,
                    angle: b.angle(),
                })
            })
            .collect();

        let player = &state.player;
        Self {
            phase: state.phase,
            level: state.level,
            camera_offset: camera.offset,
            hud: HudView {
                health: player.health,
                score: state.score,
                has_sword: player.has_sword,
                has_key: player.has_key,
                invulnerable: player.is_invulnerable(),
                animation: player.animation(),
                elapsed_secs: state.clock.elapsed_secs(),
            },
            bodies,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
