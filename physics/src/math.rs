use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Centre of mass and angle of a body at some instant.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub c: Vec2,
    pub a: f32,
}

impl Position {
    pub fn new(c: Vec2, a: f32) -> Self {
        Self { c, a }
    }

    pub fn lerp(self, rhs: Self, t: f32) -> Self {
        Self {
            c: self.c + (rhs.c - self.c) * t,
            a: self.a + (rhs.a - self.a) * t,
        }
    }
}

/// Rigid 2D transform. `q` is the rotation as a unit complex number (cos, sin).
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub p: Vec2,
    pub q: Vec2,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    pub const IDENTITY: Self = Self {
        p: Vec2::ZERO,
        q: Vec2::X,
    };

    pub fn from_position_angle(p: Vec2, angle: f32) -> Self {
        Self {
            p,
            q: Vec2::from_angle(angle),
        }
    }

    pub fn angle(&self) -> f32 {
        self.q.y.atan2(self.q.x)
    }

    pub fn transform_point(&self, local: Vec2) -> Vec2 {
        self.p + self.q.rotate(local)
    }

    pub fn inv_transform_point(&self, world: Vec2) -> Vec2 {
        let conjugate = Vec2::new(self.q.x, -self.q.y);
        conjugate.rotate(world - self.p)
    }
}
