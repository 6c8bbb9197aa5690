//! Continuous collision: walks the step forward impact by impact.
//!
//! Each pass finds the earliest time of impact over all eligible contacts,
//! advances the two bodies to it, and lets the caller's solver resolve the
//! impact before looking for the next one. Bodies are never moved backwards
//! within a step because every advance goes through [`Sweep::advance0`].

use crate::{
    body::{Body, BodyHandle, BodyType},
    contact::{Contact, ContactHandle},
    error::{ListError, WorldError},
    sweep::Sweep,
    world::World,
};
use tracing::{debug, trace};

/// Impacts closer than this to the end of the step are left to the next step.
const TOI_END_EPSILON: f32 = 10.0 * f32::EPSILON;

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum ToiOutput {
    /// The shapes touch at this fraction of the remaining motion.
    Touching(f32),
    Separated,
}

/// Narrow-phase and solver hooks used while resolving impacts.
pub trait ContinuousSolver {
    /// Time of impact between the two swept shapes, as a fraction of the
    /// motion remaining in both sweeps. Both sweeps share the same `alpha0`.
    fn time_of_impact(&mut self, contact: &Contact, sweep_a: &Sweep, sweep_b: &Sweep) -> ToiOutput;

    /// Called once both bodies have been advanced to `alpha`. Returns `false`
    /// when the contact turns out not to be touching, in which case the bodies
    /// are put back where they were.
    fn resolve(
        &mut self,
        contact: &mut Contact,
        body_a: &mut Body,
        body_b: &mut Body,
        alpha: f32,
    ) -> bool;
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ToiEvent {
    pub contact: ContactHandle,
    pub alpha: f32,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ToiReport {
    /// Resolved impacts in the order they were processed.
    pub impacts: Vec<ToiEvent>,
    /// Impacts the solver rejected as not touching.
    pub rejected: usize,
}

impl World {
    /// Resolves the step's impacts earliest first. The integrator must have
    /// started every body's sweep for this step beforehand.
    pub fn solve_toi<S: ContinuousSolver>(&mut self, solver: &mut S) -> Result<ToiReport, WorldError> {
        let mut report = ToiReport::default();

        let mut cursor = self.contact_list.begin();
        while let Some(handle) = cursor.handle() {
            if let Some(contact) = self.contacts.get_mut(handle) {
                contact.reset_toi();
            }
            cursor.move_next(&self.contacts);
        }

        loop {
            let mut earliest: Option<(ContactHandle, f32)> = None;
            let mut cursor = self.contact_list.begin();
            while let Some(handle) = cursor.handle() {
                cursor.move_next(&self.contacts);
                if let Some(alpha) = self.contact_alpha(handle, solver)? {
                    if earliest.map_or(true, |(_, min_alpha)| alpha < min_alpha) {
                        earliest = Some((handle, alpha));
                    }
                }
            }

            let (handle, alpha) = match earliest {
                Some((handle, alpha)) if alpha < 1.0 - TOI_END_EPSILON => (handle, alpha),
                _ => break,
            };
            trace!(?handle, alpha, "earliest impact");

            let contact = self
                .contacts
                .get_mut(handle)
                .ok_or(WorldError::InvalidContact)?;
            let (body_a, body_b) = self
                .bodies
                .get_pair_mut(contact.body_a(), contact.body_b())
                .ok_or(WorldError::InvalidBody)?;

            // another pass may have moved a body past this cached impact
            if alpha < body_a.sweep().alpha0() || alpha < body_b.sweep().alpha0() {
                contact.toi = None;
                continue;
            }

            let backup_a = *body_a.sweep();
            let backup_b = *body_b.sweep();
            body_a.advance(alpha)?;
            body_b.advance(alpha)?;

            contact.toi = None;
            contact.toi_count += 1;

            if !solver.resolve(contact, body_a, body_b, alpha) {
                // out of the running for the rest of this step
                contact.toi_count = self.config.max_toi_sub_steps;
                body_a.restore_sweep(backup_a);
                body_b.restore_sweep(backup_b);
                report.rejected += 1;
                continue;
            }

            body_a.set_awake(true);
            body_b.set_awake(true);
            let ends = [contact.body_a(), contact.body_b()];
            report.impacts.push(ToiEvent {
                contact: handle,
                alpha,
            });

            // both bodies moved, so every impact cached against them is stale
            for body in ends {
                self.invalidate_toi(body);
            }
        }

        debug!(
            impacts = report.impacts.len(),
            rejected = report.rejected,
            "continuous collision pass complete"
        );
        Ok(report)
    }

    /// Step fraction of the contact's first impact, or `None` if the contact
    /// does not take part in continuous collision right now.
    fn contact_alpha<S: ContinuousSolver>(
        &mut self,
        handle: ContactHandle,
        solver: &mut S,
    ) -> Result<Option<f32>, WorldError> {
        let contact = self.contacts.get(handle).ok_or(ListError::StaleHandle)?;
        if !contact.is_enabled() || contact.toi_count >= self.config.max_toi_sub_steps {
            return Ok(None);
        }
        if let Some(toi) = contact.toi {
            return Ok(Some(toi));
        }

        let sensor = [contact.fixture_a(), contact.fixture_b()]
            .iter()
            .any(|&f| self.fixtures.get(f).map_or(false, |f| f.is_sensor));
        if sensor {
            return Ok(None);
        }

        let (body_a, body_b) = self
            .bodies
            .get_pair_mut(contact.body_a(), contact.body_b())
            .ok_or(WorldError::InvalidBody)?;
        if !is_toi_candidate(body_a, body_b) {
            return Ok(None);
        }

        // put both sweeps on the same time origin
        let alpha0 = body_a.sweep().alpha0().max(body_b.sweep().alpha0());
        body_a.sweep_mut().advance0(alpha0)?;
        body_b.sweep_mut().advance0(alpha0)?;

        let alpha = match solver.time_of_impact(contact, body_a.sweep(), body_b.sweep()) {
            ToiOutput::Touching(beta) if beta.is_finite() => {
                (alpha0 + (1.0 - alpha0) * beta.clamp(0.0, 1.0)).min(1.0)
            }
            ToiOutput::Touching(_) | ToiOutput::Separated => 1.0,
        };

        if let Some(contact) = self.contacts.get_mut(handle) {
            contact.toi = Some(alpha);
        }
        Ok(Some(alpha))
    }

    fn invalidate_toi(&mut self, body: BodyHandle) {
        let body = match self.bodies.get(body) {
            Some(body) => body,
            None => return,
        };
        for (_, edge) in body.contact_edges.iter(&self.contact_edges) {
            if let Some(contact) = self.contacts.get_mut(edge.contact()) {
                contact.toi = None;
            }
        }
    }
}

// Only bullets and pairs involving a non-dynamic body are swept; dynamic vs
// dynamic tunnelling is left to the discrete solver.
fn is_toi_candidate(a: &Body, b: &Body) -> bool {
    let active_a = a.is_awake() && !a.is_static();
    let active_b = b.is_awake() && !b.is_static();
    if !active_a && !active_b {
        return false;
    }

    let collide_a = a.is_bullet() || a.body_type() != BodyType::Dynamic;
    let collide_b = b.is_bullet() || b.body_type() != BodyType::Dynamic;
    collide_a || collide_b
}
