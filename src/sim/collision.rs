//! Contact geometry and hit classification
//!
//! A normal is stored from the point of view of body `a` and points from `a`
//! towards `b`: an actor landing on flat ground sees `(0, -1)`, an enemy
//! being stomped sees `(0, 1)`. Slopes and round props give tilted normals.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::physics::BodyId;
use crate::consts::{GROUND_NORMAL_Y, STOMP_NORMAL_Y};

/// A blocking contact produced by the physics step
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    pub a: BodyId,
    pub b: BodyId,
    /// Unit normal pointing from `a` towards `b`
    pub normal: Vec2,
}

impl Contact {
    pub fn new(a: BodyId, b: BodyId, normal: Vec2) -> Self {
        Self { a, b, normal }
    }

    /// The same contact seen from `b`
    pub fn flipped(&self) -> Self {
        Self {
            a: self.b,
            b: self.a,
            normal: -self.normal,
        }
    }

    /// Whether `id` takes part in this contact
    pub fn involves(&self, id: BodyId) -> bool {
        self.a == id || self.b == id
    }

    /// Normal from `id`'s point of view (pointing towards the other body)
    pub fn normal_for(&self, id: BodyId) -> Option<Vec2> {
        if id == self.a {
            Some(self.normal)
        } else if id == self.b {
            Some(-self.normal)
        } else {
            None
        }
    }
}

/// Overlap notifications for sensor bodies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SensorEvent {
    Begin { sensor: BodyId, other: BodyId },
    End { sensor: BodyId, other: BodyId },
}

/// Where a striker touched a body, seen from the struck body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitDirection {
    /// Striker is on the right side
    FromRight,
    /// Striker is on the left side
    FromLeft,
    /// Striker landed on top
    FromAbove,
    /// Anything else (striker underneath)
    Other,
}

impl HitDirection {
    /// Horizontal direction that pushes the striker away from the struck body
    pub fn outward_sign(self) -> f32 {
        match self {
            HitDirection::FromRight => 1.0,
            HitDirection::FromLeft => -1.0,
            HitDirection::FromAbove | HitDirection::Other => 0.0,
        }
    }
}

/// Classify a hit from the struck body's normal (pointing at the striker).
/// Side hits win over the vertical test.
pub fn classify_hit(normal: Vec2) -> HitDirection {
    if normal.x >= 0.99 {
        HitDirection::FromRight
    } else if normal.x <= -0.99 {
        HitDirection::FromLeft
    } else if normal.y >= STOMP_NORMAL_Y {
        HitDirection::FromAbove
    } else {
        HitDirection::Other
    }
}

/// Whether a contact normal (seen from the actor) means the actor stands on something
#[inline]
pub fn is_ground_normal(normal: Vec2) -> bool {
    normal.y <= GROUND_NORMAL_Y
}
