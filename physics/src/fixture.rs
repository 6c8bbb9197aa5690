use crate::{
    arena::Handle,
    body::BodyHandle,
    list::{IntrusiveList, Link, Linked},
};
use serde::{Deserialize, Serialize};

pub type FixtureHandle = Handle<Fixture>;
pub type FixtureList = IntrusiveList<Fixture>;

// Shape geometry lives with the collision code; a fixture here only carries
// the material a contact needs.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct FixtureDef {
    pub friction: f32,
    pub restitution: f32,
    pub density: f32,
    pub is_sensor: bool,
}

impl Default for FixtureDef {
    fn default() -> Self {
        Self {
            friction: 0.2,
            restitution: 0.0,
            density: 0.0,
            is_sensor: false,
        }
    }
}

#[derive(Debug)]
pub struct Fixture {
    link: Link<Fixture>,
    body: BodyHandle,
    pub friction: f32,
    pub restitution: f32,
    pub density: f32,
    pub is_sensor: bool,
}

impl Linked for Fixture {
    fn link(&self) -> &Link<Self> {
        &self.link
    }

    fn link_mut(&mut self) -> &mut Link<Self> {
        &mut self.link
    }
}

impl Fixture {
    pub(crate) fn new(body: BodyHandle, def: &FixtureDef) -> Self {
        Self {
            link: Link::default(),
            body,
            friction: def.friction,
            restitution: def.restitution,
            density: def.density,
            is_sensor: def.is_sensor,
        }
    }

    pub fn body(&self) -> BodyHandle {
        self.body
    }
}
