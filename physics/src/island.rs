use crate::{body::BodyHandle, contact::ContactHandle, joint::JointHandle, world::World};
use std::collections::HashSet;

/// Bodies connected through touching contacts and joints. The constraint
/// solver processes each island on its own.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Island {
    pub bodies: Vec<BodyHandle>,
    pub contacts: Vec<ContactHandle>,
    pub joints: Vec<JointHandle>,
}

impl World {
    /// Flood-fills the contact/joint graph from every awake, non-static body.
    ///
    /// Static bodies are added to the islands that reach them but never
    /// propagate, so one ground body can appear in many islands.
    pub fn islands(&self) -> Vec<Island> {
        let mut islands = Vec::new();
        let mut body_seen = HashSet::new();
        let mut contact_seen = HashSet::new();
        let mut joint_seen = HashSet::new();
        let mut stack = Vec::with_capacity(self.body_count());

        for (seed, seed_body) in self.bodies() {
            if body_seen.contains(&seed) || !seed_body.is_awake() || seed_body.is_static() {
                continue;
            }

            let mut island = Island::default();
            stack.push(seed);
            body_seen.insert(seed);

            while let Some(handle) = stack.pop() {
                let body = match self.bodies.get(handle) {
                    Some(body) => body,
                    None => continue,
                };
                island.bodies.push(handle);

                // don't propagate islands across static bodies
                if body.is_static() {
                    continue;
                }

                for (_, edge) in body.contact_edges.iter(&self.contact_edges) {
                    let handle = edge.contact();
                    if contact_seen.contains(&handle) {
                        continue;
                    }
                    let contact = match self.contacts.get(handle) {
                        Some(contact) => contact,
                        None => continue,
                    };
                    if !contact.is_enabled() || !contact.is_touching() {
                        continue;
                    }
                    let sensor = [contact.fixture_a(), contact.fixture_b()]
                        .iter()
                        .any(|&f| self.fixtures.get(f).map_or(false, |f| f.is_sensor));
                    if sensor {
                        continue;
                    }

                    contact_seen.insert(handle);
                    island.contacts.push(handle);

                    if body_seen.insert(edge.other()) {
                        stack.push(edge.other());
                    }
                }

                for (_, edge) in body.joint_edges.iter(&self.joint_edges) {
                    if !joint_seen.insert(edge.joint()) {
                        continue;
                    }
                    island.joints.push(edge.joint());

                    if body_seen.insert(edge.other()) {
                        stack.push(edge.other());
                    }
                }
            }

            // allow static bodies to take part in other islands
            for handle in &island.bodies {
                if self.bodies.get(*handle).map_or(false, |b| b.is_static()) {
                    body_seen.remove(handle);
                }
            }

            islands.push(island);
        }

        islands
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        body::{BodyDef, BodyType},
        fixture::{FixtureDef, FixtureHandle},
        joint::{JointDef, JointKind},
    };
    use glam::Vec2;

    fn body_with_fixture(
        world: &mut World,
        body_type: BodyType,
        x: f32,
    ) -> (BodyHandle, FixtureHandle) {
        let body = world
            .create_body(&BodyDef {
                body_type,
                position: Vec2::new(x, 0.0),
                ..BodyDef::default()
            })
            .unwrap();
        let fixture = world.create_fixture(body, &FixtureDef::default()).unwrap();
        (body, fixture)
    }

    #[test]
    fn static_ground_is_shared_between_islands() {
        let mut world = World::default();
        let (ground, ground_fixture) = body_with_fixture(&mut world, BodyType::Static, 0.0);
        let (left, left_fixture) = body_with_fixture(&mut world, BodyType::Dynamic, -5.0);
        let (right, right_fixture) = body_with_fixture(&mut world, BodyType::Dynamic, 5.0);

        for fixture in [left_fixture, right_fixture] {
            let contact = world.create_contact(ground_fixture, fixture).unwrap().unwrap();
            world.contact_mut(contact).unwrap().set_touching(true);
        }

        let islands = world.islands();
        assert_eq!(islands.len(), 2);
        for island in &islands {
            assert_eq!(island.bodies.len(), 2);
            assert!(island.bodies.contains(&ground));
            assert_eq!(island.contacts.len(), 1);
        }
        let all: Vec<_> = islands.iter().flat_map(|i| i.bodies.iter()).collect();
        assert!(all.contains(&&left));
        assert!(all.contains(&&right));
    }

    #[test]
    fn joints_and_touching_contacts_connect_bodies() {
        let mut world = World::default();
        let (a, fa) = body_with_fixture(&mut world, BodyType::Dynamic, 0.0);
        let (b, fb) = body_with_fixture(&mut world, BodyType::Dynamic, 1.0);
        let (c, _) = body_with_fixture(&mut world, BodyType::Dynamic, 2.0);
        let (lonely, fl) = body_with_fixture(&mut world, BodyType::Dynamic, 9.0);

        let joint = world
            .create_joint(&JointDef::new(JointKind::Revolute, b, c))
            .unwrap();
        let touching = world.create_contact(fa, fb).unwrap().unwrap();
        world.contact_mut(touching).unwrap().set_touching(true);
        // not touching, so it must not merge islands
        world.create_contact(fb, fl).unwrap().unwrap();

        let islands = world.islands();
        assert_eq!(islands.len(), 2);
        let big = islands.iter().find(|i| i.bodies.len() == 3).unwrap();
        for body in [a, b, c] {
            assert!(big.bodies.contains(&body));
        }
        assert_eq!(big.joints, vec![joint]);
        assert_eq!(big.contacts, vec![touching]);

        let small = islands.iter().find(|i| i.bodies.len() == 1).unwrap();
        assert_eq!(small.bodies, vec![lonely]);
    }

    #[test]
    fn sleeping_bodies_do_not_seed() {
        let mut world = World::default();
        let (a, _) = body_with_fixture(&mut world, BodyType::Dynamic, 0.0);
        world.body_mut(a).unwrap().set_awake(false);
        assert!(world.islands().is_empty());
    }
}
