use crate::{
    arena::Handle,
    body::BodyHandle,
    fixture::{Fixture, FixtureHandle},
    list::{IntrusiveList, Link, Linked},
};

pub type ContactHandle = Handle<Contact>;
pub type ContactList = IntrusiveList<Contact>;
pub type ContactEdgeHandle = Handle<ContactEdge>;
pub type ContactEdgeList = IntrusiveList<ContactEdge>;

/// Friction mixing law: geometric mean, so a frictionless fixture slides on
/// anything.
pub fn mix_friction(friction_a: f32, friction_b: f32) -> f32 {
    (friction_a * friction_b).sqrt()
}

/// Restitution mixing law: the bouncier fixture wins.
pub fn mix_restitution(restitution_a: f32, restitution_b: f32) -> f32 {
    restitution_a.max(restitution_b)
}

/// A potentially touching fixture pair. Contacts are created and destroyed by
/// the world; the narrow phase owns the touching/enabled flags.
#[derive(Debug)]
pub struct Contact {
    link: Link<Contact>,
    fixture_a: FixtureHandle,
    fixture_b: FixtureHandle,
    body_a: BodyHandle,
    body_b: BodyHandle,
    pub(crate) edge_a: ContactEdgeHandle,
    pub(crate) edge_b: ContactEdgeHandle,

    pub friction: f32,
    pub restitution: f32,

    touching: bool,
    enabled: bool,
    pub(crate) needs_filtering: bool,

    // cached time of impact as a step fraction, valid until either body moves
    pub(crate) toi: Option<f32>,
    pub(crate) toi_count: u32,
}

impl Linked for Contact {
    fn link(&self) -> &Link<Self> {
        &self.link
    }

    fn link_mut(&mut self) -> &mut Link<Self> {
        &mut self.link
    }
}

impl Contact {
    pub(crate) fn new(
        fixture_a: FixtureHandle,
        a: &Fixture,
        fixture_b: FixtureHandle,
        b: &Fixture,
    ) -> Self {
        Self {
            link: Link::default(),
            fixture_a,
            fixture_b,
            body_a: a.body(),
            body_b: b.body(),
            edge_a: ContactEdgeHandle::default(),
            edge_b: ContactEdgeHandle::default(),
            friction: mix_friction(a.friction, b.friction),
            restitution: mix_restitution(a.restitution, b.restitution),
            touching: false,
            enabled: true,
            needs_filtering: false,
            toi: None,
            toi_count: 0,
        }
    }

    pub fn fixture_a(&self) -> FixtureHandle {
        self.fixture_a
    }

    pub fn fixture_b(&self) -> FixtureHandle {
        self.fixture_b
    }

    pub fn body_a(&self) -> BodyHandle {
        self.body_a
    }

    pub fn body_b(&self) -> BodyHandle {
        self.body_b
    }

    pub fn connects(&self, fixture_a: FixtureHandle, fixture_b: FixtureHandle) -> bool {
        (self.fixture_a == fixture_a && self.fixture_b == fixture_b)
            || (self.fixture_a == fixture_b && self.fixture_b == fixture_a)
    }

    pub fn other_body(&self, body: BodyHandle) -> Option<BodyHandle> {
        if body == self.body_a {
            Some(self.body_b)
        } else if body == self.body_b {
            Some(self.body_a)
        } else {
            None
        }
    }

    pub fn is_touching(&self) -> bool {
        self.touching
    }

    pub fn set_touching(&mut self, touching: bool) {
        self.touching = touching;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Marks the contact for a filter pass, e.g. after a joint between its
    /// bodies was created or destroyed.
    pub fn flag_for_filtering(&mut self) {
        self.needs_filtering = true;
    }

    pub fn needs_filtering(&self) -> bool {
        self.needs_filtering
    }

    pub fn toi(&self) -> Option<f32> {
        self.toi
    }

    pub fn toi_count(&self) -> u32 {
        self.toi_count
    }

    pub(crate) fn reset_toi(&mut self) {
        self.toi = None;
        self.toi_count = 0;
    }
}

/// One endpoint of a contact, linked into the contact list of the body on
/// this side and pointing at the body on the other side.
#[derive(Debug)]
pub struct ContactEdge {
    link: Link<ContactEdge>,
    other: BodyHandle,
    contact: ContactHandle,
}

impl Linked for ContactEdge {
    fn link(&self) -> &Link<Self> {
        &self.link
    }

    fn link_mut(&mut self) -> &mut Link<Self> {
        &mut self.link
    }
}

impl ContactEdge {
    pub(crate) fn new(other: BodyHandle, contact: ContactHandle) -> Self {
        Self {
            link: Link::default(),
            other,
            contact,
        }
    }

    pub fn other(&self) -> BodyHandle {
        self.other
    }

    pub fn contact(&self) -> ContactHandle {
        self.contact
    }
}
