//! Horizontal scrolling camera
//!
//! The physics world never moves. The camera keeps a horizontal offset and
//! everything else converts between world and screen x with it.

use serde::{Deserialize, Serialize};

use crate::consts::VIEWPORT_WIDTH;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    /// Horizontal scroll, always in `[0, max_offset()]`
    pub offset: f32,
    /// Screen x the followed body is kept at
    pub anchor: f32,
    pub level_length: f32,
    pub viewport_width: f32,
}

impl Camera {
    pub fn new(level_length: f32) -> Self {
        Self {
            offset: 0.0,
            anchor: 0.0,
            level_length,
            viewport_width: VIEWPORT_WIDTH,
        }
    }

    /// Largest scroll that still keeps the viewport inside the level
    pub fn max_offset(&self) -> f32 {
        (self.level_length - self.viewport_width).max(0.0)
    }

    /// Scroll so that `target_x` sits at the anchor, clamped to the level.
    /// Returns the applied shift.
    pub fn follow(&mut self, target_x: f32) -> f32 {
        let wanted = target_x - self.anchor;
        let next = wanted.clamp(0.0, self.max_offset());
        let shift = next - self.offset;
        self.offset = next;
        shift
    }

    /// Set the offset directly (clamped)
    pub fn set_offset(&mut self, offset: f32) {
        self.offset = offset.clamp(0.0, self.max_offset());
    }

    #[inline]
    pub fn to_screen(&self, world_x: f32) -> f32 {
        world_x - self.offset
    }

    #[inline]
    pub fn to_world(&self, screen_x: f32) -> f32 {
        screen_x + self.offset
    }

    pub fn at_right_limit(&self) -> bool {
        self.offset >= self.max_offset()
    }

    /// Whether a body reaching `world_x` has touched the right screen edge
    pub fn reached_right_edge(&self, world_x: f32) -> bool {
        self.to_screen(world_x) >= self.viewport_width / 2.0
    }
}
