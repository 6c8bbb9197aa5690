//! Motion of a body across one step, sampled for continuous collision.
//!
//! `pos0` is the body's centre of mass at fraction `alpha0` of the step and
//! `pos1` is the integrator's candidate for the end of the step. Time of impact
//! works on fractions of the remaining motion between the two; advancing
//! re-bases `pos0` so already-elapsed motion is never re-derived from the
//! step start.

use crate::{
    error::SweepError,
    math::{Position, Transform},
};
use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::f32::consts::{PI, TAU};

#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Sweep {
    /// Centre of mass in body space.
    pub local_center: Vec2,
    pos0: Position,
    pos1: Position,
    alpha0: f32,
}

impl Sweep {
    /// A fresh sweep with no motion: both anchors at `position`.
    pub fn new(local_center: Vec2, position: Position) -> Self {
        Self {
            local_center,
            pos0: position,
            pos1: position,
            alpha0: 0.0,
        }
    }

    pub fn from_anchors(local_center: Vec2, pos0: Position, pos1: Position) -> Self {
        Self {
            local_center,
            pos0,
            pos1,
            alpha0: 0.0,
        }
    }

    pub fn pos0(&self) -> Position {
        self.pos0
    }

    pub fn pos1(&self) -> Position {
        self.pos1
    }

    pub fn alpha0(&self) -> f32 {
        self.alpha0
    }

    pub fn is_fresh(&self) -> bool {
        self.alpha0 == 0.0
    }

    /// Publishes the integrator's end-of-step candidate.
    pub fn set_pos1(&mut self, pos1: Position) {
        self.pos1 = pos1;
    }

    /// Step reset, performed by the integrator before it writes a new `pos1`.
    pub fn begin_step(&mut self) {
        self.pos0 = self.pos1;
        self.alpha0 = 0.0;
    }

    /// Collapses the remaining motion so the body rests at `pos0`.
    pub(crate) fn freeze(&mut self) {
        self.pos1 = self.pos0;
    }

    /// Moves `pos0` forward to step fraction `alpha`, keeping `pos1` fixed.
    ///
    /// Contract:
    /// - `alpha == alpha0` is accepted and leaves the sweep unchanged, so
    ///   `advance0(0.0)` on a fresh sweep succeeds and two sweeps already on the
    ///   same `alpha0` can be aligned without error.
    /// - `alpha < alpha0` or `alpha >= 1` fails with
    ///   [`SweepError::OutOfRange`]; a non-finite `alpha` fails with
    ///   [`SweepError::NonFinite`].
    /// - A sweep with `alpha0 >= 1` fails with [`SweepError::Exhausted`].
    ///
    /// On failure the sweep is left untouched.
    pub fn advance0(&mut self, alpha: f32) -> Result<(), SweepError> {
        if !alpha.is_finite() {
            return Err(SweepError::NonFinite(alpha));
        }
        if self.alpha0 >= 1.0 {
            return Err(SweepError::Exhausted(self.alpha0));
        }
        if alpha < self.alpha0 || alpha >= 1.0 {
            return Err(SweepError::OutOfRange {
                alpha,
                alpha0: self.alpha0,
            });
        }
        self.advance0_unchecked(alpha);
        Ok(())
    }

    /// Hot-path variant of [`Sweep::advance0`]; the preconditions are only
    /// checked in debug builds.
    pub fn advance0_unchecked(&mut self, alpha: f32) {
        debug_assert!(self.alpha0 < 1.0);
        debug_assert!(alpha.is_finite() && alpha >= self.alpha0 && alpha < 1.0);

        let beta = (alpha - self.alpha0) / (1.0 - self.alpha0);
        self.pos0 = self.pos0.lerp(self.pos1, beta);
        self.alpha0 = alpha;
    }

    /// Body transform at fraction `beta` of the remaining motion, where 0 is
    /// `pos0` and 1 is `pos1`.
    pub fn transform_at(&self, beta: f32) -> Transform {
        let position = self.pos0.lerp(self.pos1, beta);
        let mut xf = Transform::from_position_angle(position.c, position.a);
        // shift from the centre of mass to the body origin
        xf.p -= xf.q.rotate(self.local_center);
        xf
    }

    /// Wraps the start angle into `[-pi, pi]` and shifts the end angle by the
    /// same number of turns.
    pub fn normalize(&mut self) {
        let d = TAU * ((self.pos0.a + PI) / TAU).floor();
        self.pos0.a -= d;
        self.pos1.a -= d;
    }
}
