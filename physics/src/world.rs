use crate::{
    arena::Arena,
    body::{Body, BodyDef, BodyHandle, BodyList, BodyType},
    config::WorldConfig,
    contact::{Contact, ContactEdge, ContactEdgeHandle, ContactHandle, ContactList},
    error::{ListError, WorldError},
    fixture::{Fixture, FixtureDef, FixtureHandle},
    joint::{Joint, JointDef, JointEdge, JointHandle, JointList},
    list::Iter,
};
use tracing::{debug, warn};

/// Owner of every simulation entity and of the world-level lists that thread
/// them. Bodies own their fixture and edge lists; the entities behind those
/// lists still live in the world's arenas.
pub struct World {
    pub(crate) config: WorldConfig,

    pub(crate) bodies: Arena<Body>,
    pub(crate) fixtures: Arena<Fixture>,
    pub(crate) contacts: Arena<Contact>,
    pub(crate) joints: Arena<Joint>,
    pub(crate) contact_edges: Arena<ContactEdge>,
    pub(crate) joint_edges: Arena<JointEdge>,

    pub(crate) body_list: BodyList,
    pub(crate) contact_list: ContactList,
    pub(crate) joint_list: JointList,
}

impl Default for World {
    fn default() -> Self {
        Self::new(WorldConfig::default())
    }
}

fn capacity_error(what: &str, max_size: usize) -> WorldError {
    warn!(max_size, "cannot create {}, limit reached", what);
    ListError::CapacityExceeded { max_size }.into()
}

impl World {
    pub fn new(config: WorldConfig) -> Self {
        World {
            bodies: Arena::with_capacity(config.max_bodies),
            fixtures: Arena::new(),
            contacts: Arena::new(),
            joints: Arena::new(),
            contact_edges: Arena::new(),
            joint_edges: Arena::new(),
            body_list: BodyList::bounded(config.max_bodies),
            contact_list: ContactList::bounded(config.max_contacts),
            joint_list: JointList::bounded(config.max_joints),
            config,
        }
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    /// Drops every entity. Handles issued before the call go stale.
    pub fn clear(&mut self) {
        *self = Self::new(self.config.clone());
    }

    pub fn create_body(&mut self, def: &BodyDef) -> Result<BodyHandle, WorldError> {
        if self.body_list.is_full() {
            return Err(capacity_error("body", self.body_list.max_size()));
        }

        let handle = self
            .bodies
            .insert(Body::new(def, self.config.max_fixtures_per_body));
        if let Err(err) = self.body_list.push_front(&mut self.bodies, handle) {
            self.bodies.remove(handle);
            return Err(err.into());
        }

        debug!(?handle, body_type = ?def.body_type, "created body");
        Ok(handle)
    }

    /// Destroys the body together with every joint, contact and fixture
    /// attached to it.
    pub fn destroy_body(&mut self, handle: BodyHandle) -> Result<(), WorldError> {
        if !self.bodies.contains(handle) {
            return Err(WorldError::InvalidBody);
        }

        // each destroy unlinks the head edge, so keep taking the head
        while let Some(edge) = self.body(handle)?.joint_edges.front() {
            let joint = self
                .joint_edges
                .get(edge)
                .ok_or(ListError::StaleHandle)?
                .joint();
            self.destroy_joint(joint)?;
        }

        while let Some(edge) = self.body(handle)?.contact_edges.front() {
            let contact = self
                .contact_edges
                .get(edge)
                .ok_or(ListError::StaleHandle)?
                .contact();
            self.destroy_contact(contact)?;
        }

        let body = self.bodies.get_mut(handle).ok_or(WorldError::InvalidBody)?;
        while !body.fixtures.is_empty() {
            let fixture = body.fixtures.pop_front(&mut self.fixtures)?;
            self.fixtures.remove(fixture);
        }

        self.body_list.remove(&mut self.bodies, handle)?;
        self.bodies.remove(handle);

        debug!(?handle, "destroyed body");
        Ok(())
    }

    pub fn create_fixture(
        &mut self,
        body_handle: BodyHandle,
        def: &FixtureDef,
    ) -> Result<FixtureHandle, WorldError> {
        let body = self
            .bodies
            .get_mut(body_handle)
            .ok_or(WorldError::InvalidBody)?;
        if body.fixtures.is_full() {
            return Err(capacity_error("fixture", body.fixtures.max_size()));
        }

        let handle = self.fixtures.insert(Fixture::new(body_handle, def));
        if let Err(err) = body.fixtures.push_front(&mut self.fixtures, handle) {
            self.fixtures.remove(handle);
            return Err(err.into());
        }

        debug!(?handle, body = ?body_handle, "created fixture");
        Ok(handle)
    }

    /// Destroys the fixture and every contact it takes part in.
    pub fn destroy_fixture(&mut self, handle: FixtureHandle) -> Result<(), WorldError> {
        let body_handle = self
            .fixtures
            .get(handle)
            .ok_or(WorldError::InvalidFixture)?
            .body();

        // destroying a contact unlinks the current edge, so the successor is
        // read before the destroy
        let mut cursor = self.body(body_handle)?.contact_edges.begin();
        while let Some(edge) = cursor.handle() {
            let next = cursor.next_cursor(&self.contact_edges);
            let contact = self
                .contact_edges
                .get(edge)
                .ok_or(ListError::StaleHandle)?
                .contact();
            let uses_fixture = self
                .contacts
                .get(contact)
                .map_or(false, |c| c.fixture_a() == handle || c.fixture_b() == handle);
            if uses_fixture {
                self.destroy_contact(contact)?;
            }
            cursor = next;
        }

        let body = self
            .bodies
            .get_mut(body_handle)
            .ok_or(WorldError::InvalidBody)?;
        body.fixtures.remove(&mut self.fixtures, handle)?;
        self.fixtures.remove(handle);

        debug!(?handle, "destroyed fixture");
        Ok(())
    }

    pub fn create_joint(&mut self, def: &JointDef) -> Result<JointHandle, WorldError> {
        let (body_a, body_b) = (def.body_a, def.body_b);
        if body_a == body_b {
            return Err(WorldError::SameBody("joint"));
        }
        if !self.bodies.contains(body_a) || !self.bodies.contains(body_b) {
            return Err(WorldError::InvalidBody);
        }
        if self.joint_list.is_full() {
            return Err(capacity_error("joint", self.joint_list.max_size()));
        }

        let handle = self.joints.insert(Joint::new(def));
        if let Err(err) = self.joint_list.push_front(&mut self.joints, handle) {
            self.joints.remove(handle);
            return Err(err.into());
        }

        let edge_a = self.joint_edges.insert(JointEdge::new(body_b, handle));
        let edge_b = self.joint_edges.insert(JointEdge::new(body_a, handle));
        self.bodies
            .get_mut(body_a)
            .ok_or(WorldError::InvalidBody)?
            .joint_edges
            .push_front(&mut self.joint_edges, edge_a)?;
        self.bodies
            .get_mut(body_b)
            .ok_or(WorldError::InvalidBody)?
            .joint_edges
            .push_front(&mut self.joint_edges, edge_b)?;

        let joint = self.joints.get_mut(handle).ok_or(WorldError::InvalidJoint)?;
        joint.edge_a = edge_a;
        joint.edge_b = edge_b;

        // existing contacts between the two bodies may no longer be wanted
        if !def.collide_connected {
            self.flag_contacts_between(body_a, body_b);
        }

        debug!(?handle, kind = ?def.kind, ?body_a, ?body_b, "created joint");
        Ok(handle)
    }

    pub fn destroy_joint(&mut self, handle: JointHandle) -> Result<(), WorldError> {
        let joint = self.joints.get(handle).ok_or(WorldError::InvalidJoint)?;
        let (body_a, body_b) = (joint.body_a(), joint.body_b());
        let (edge_a, edge_b) = (joint.edge_a, joint.edge_b);
        let collide_connected = joint.collide_connected();
        if !self.bodies.contains(body_a) || !self.bodies.contains(body_b) {
            return Err(WorldError::InvalidBody);
        }

        self.joint_list.remove(&mut self.joints, handle)?;

        // both sides go together or the other body keeps a dangling edge
        self.bodies
            .get_mut(body_a)
            .ok_or(WorldError::InvalidBody)?
            .joint_edges
            .remove(&mut self.joint_edges, edge_a)?;
        self.bodies
            .get_mut(body_b)
            .ok_or(WorldError::InvalidBody)?
            .joint_edges
            .remove(&mut self.joint_edges, edge_b)?;
        self.joint_edges.remove(edge_a);
        self.joint_edges.remove(edge_b);
        self.joints.remove(handle);

        if !collide_connected {
            self.flag_contacts_between(body_a, body_b);
        }

        debug!(?handle, "destroyed joint");
        Ok(())
    }

    /// Connects two fixtures with a contact. Returns the existing contact if
    /// the pair is already connected and `None` if the pair is filtered out.
    pub fn create_contact(
        &mut self,
        fixture_a: FixtureHandle,
        fixture_b: FixtureHandle,
    ) -> Result<Option<ContactHandle>, WorldError> {
        let a = self
            .fixtures
            .get(fixture_a)
            .ok_or(WorldError::InvalidFixture)?;
        let b = self
            .fixtures
            .get(fixture_b)
            .ok_or(WorldError::InvalidFixture)?;
        let (body_a, body_b) = (a.body(), b.body());
        if body_a == body_b {
            return Ok(None);
        }

        if let Some(existing) = self.find_contact(fixture_a, fixture_b) {
            return Ok(Some(existing));
        }
        if !self.should_collide(body_a, body_b)? {
            return Ok(None);
        }
        if self.contact_list.is_full() {
            return Err(capacity_error("contact", self.contact_list.max_size()));
        }

        let contact = Contact::new(fixture_a, a, fixture_b, b);
        let wake = !(a.is_sensor || b.is_sensor);
        let handle = self.contacts.insert(contact);
        if let Err(err) = self.contact_list.push_front(&mut self.contacts, handle) {
            self.contacts.remove(handle);
            return Err(err.into());
        }

        let edge_a = self.contact_edges.insert(ContactEdge::new(body_b, handle));
        let edge_b = self.contact_edges.insert(ContactEdge::new(body_a, handle));
        for (body, edge) in [(body_a, edge_a), (body_b, edge_b)] {
            let body = self.bodies.get_mut(body).ok_or(WorldError::InvalidBody)?;
            body.contact_edges.push_front(&mut self.contact_edges, edge)?;
            if wake {
                body.set_awake(true);
            }
        }

        let contact = self
            .contacts
            .get_mut(handle)
            .ok_or(WorldError::InvalidContact)?;
        contact.edge_a = edge_a;
        contact.edge_b = edge_b;

        debug!(?handle, ?body_a, ?body_b, "created contact");
        Ok(Some(handle))
    }

    pub fn destroy_contact(&mut self, handle: ContactHandle) -> Result<(), WorldError> {
        let contact = self
            .contacts
            .get(handle)
            .ok_or(WorldError::InvalidContact)?;
        let ends = ContactEnds::of(contact);
        ends.check(&self.bodies)?;

        self.contact_list.remove(&mut self.contacts, handle)?;
        self.unlink_contact_edges(ends)?;
        self.contacts.remove(handle);

        debug!(?handle, "destroyed contact");
        Ok(())
    }

    /// Destroys every contact flagged for filtering whose bodies should no
    /// longer collide. Returns how many were destroyed.
    pub fn filter_contacts(&mut self) -> Result<usize, WorldError> {
        let mut destroyed = 0;
        let mut cursor = self.contact_list.begin();
        while let Some(handle) = cursor.handle() {
            let contact = self
                .contacts
                .get_mut(handle)
                .ok_or(ListError::StaleHandle)?;
            if !contact.needs_filtering {
                cursor.move_next(&self.contacts);
                continue;
            }
            contact.needs_filtering = false;
            let ends = ContactEnds::of(contact);

            if self.should_collide(ends.body_a, ends.body_b)? {
                cursor.move_next(&self.contacts);
                continue;
            }

            cursor = self.contact_list.erase(&mut self.contacts, cursor)?;
            self.unlink_contact_edges(ends)?;
            self.contacts.remove(handle);
            destroyed += 1;
            debug!(?handle, "filtered out contact");
        }
        Ok(destroyed)
    }

    /// At least one body must be dynamic, and a joint between the two that
    /// does not collide its bodies vetoes the pair.
    pub fn should_collide(
        &self,
        body_a: BodyHandle,
        body_b: BodyHandle,
    ) -> Result<bool, WorldError> {
        let a = self.body(body_a)?;
        let b = self.body(body_b)?;
        if a.body_type() != BodyType::Dynamic && b.body_type() != BodyType::Dynamic {
            return Ok(false);
        }

        for (_, edge) in b.joint_edges.iter(&self.joint_edges) {
            if edge.other() != body_a {
                continue;
            }
            if let Some(joint) = self.joints.get(edge.joint()) {
                if !joint.collide_connected() {
                    return Ok(false);
                }
            }
        }
        Ok(true)
    }

    /// Looks for a contact joining the two fixtures by walking the contact
    /// edges of the second fixture's body.
    pub fn find_contact(
        &self,
        fixture_a: FixtureHandle,
        fixture_b: FixtureHandle,
    ) -> Option<ContactHandle> {
        let body_a = self.fixtures.get(fixture_a)?.body();
        let body_b = self.fixtures.get(fixture_b)?.body();
        let body = self.bodies.get(body_b)?;
        body.contact_edges
            .iter(&self.contact_edges)
            .filter(|(_, edge)| edge.other() == body_a)
            .map(|(_, edge)| edge.contact())
            .find(|&contact| {
                self.contacts
                    .get(contact)
                    .map_or(false, |c| c.connects(fixture_a, fixture_b))
            })
    }

    fn flag_contacts_between(&mut self, body_a: BodyHandle, body_b: BodyHandle) {
        let body = match self.bodies.get(body_b) {
            Some(body) => body,
            None => return,
        };
        for (_, edge) in body.contact_edges.iter(&self.contact_edges) {
            if edge.other() == body_a {
                if let Some(contact) = self.contacts.get_mut(edge.contact()) {
                    contact.flag_for_filtering();
                }
            }
        }
    }

    fn unlink_contact_edges(&mut self, ends: ContactEnds) -> Result<(), WorldError> {
        self.bodies
            .get_mut(ends.body_a)
            .ok_or(WorldError::InvalidBody)?
            .contact_edges
            .remove(&mut self.contact_edges, ends.edge_a)?;
        self.bodies
            .get_mut(ends.body_b)
            .ok_or(WorldError::InvalidBody)?
            .contact_edges
            .remove(&mut self.contact_edges, ends.edge_b)?;
        self.contact_edges.remove(ends.edge_a);
        self.contact_edges.remove(ends.edge_b);
        Ok(())
    }

    pub fn body(&self, handle: BodyHandle) -> Result<&Body, WorldError> {
        self.bodies.get(handle).ok_or(WorldError::InvalidBody)
    }

    pub fn body_mut(&mut self, handle: BodyHandle) -> Result<&mut Body, WorldError> {
        self.bodies.get_mut(handle).ok_or(WorldError::InvalidBody)
    }

    pub fn fixture(&self, handle: FixtureHandle) -> Result<&Fixture, WorldError> {
        self.fixtures.get(handle).ok_or(WorldError::InvalidFixture)
    }

    pub fn fixture_mut(&mut self, handle: FixtureHandle) -> Result<&mut Fixture, WorldError> {
        self.fixtures
            .get_mut(handle)
            .ok_or(WorldError::InvalidFixture)
    }

    pub fn contact(&self, handle: ContactHandle) -> Result<&Contact, WorldError> {
        self.contacts.get(handle).ok_or(WorldError::InvalidContact)
    }

    pub fn contact_mut(&mut self, handle: ContactHandle) -> Result<&mut Contact, WorldError> {
        self.contacts
            .get_mut(handle)
            .ok_or(WorldError::InvalidContact)
    }

    pub fn joint(&self, handle: JointHandle) -> Result<&Joint, WorldError> {
        self.joints.get(handle).ok_or(WorldError::InvalidJoint)
    }

    pub fn joint_mut(&mut self, handle: JointHandle) -> Result<&mut Joint, WorldError> {
        self.joints.get_mut(handle).ok_or(WorldError::InvalidJoint)
    }

    pub fn body_count(&self) -> usize {
        self.body_list.len()
    }

    pub fn contact_count(&self) -> usize {
        self.contact_list.len()
    }

    pub fn joint_count(&self) -> usize {
        self.joint_list.len()
    }

    /// Bodies, most recently created first.
    pub fn bodies(&self) -> Iter<'_, Body> {
        self.body_list.iter(&self.bodies)
    }

    pub fn contacts(&self) -> Iter<'_, Contact> {
        self.contact_list.iter(&self.contacts)
    }

    pub fn joints(&self) -> Iter<'_, Joint> {
        self.joint_list.iter(&self.joints)
    }

    pub fn fixtures(&self, body: BodyHandle) -> Result<Iter<'_, Fixture>, WorldError> {
        Ok(self.body(body)?.fixtures.iter(&self.fixtures))
    }

    pub fn contact_edges(&self, body: BodyHandle) -> Result<Iter<'_, ContactEdge>, WorldError> {
        Ok(self.body(body)?.contact_edges.iter(&self.contact_edges))
    }

    pub fn joint_edges(&self, body: BodyHandle) -> Result<Iter<'_, JointEdge>, WorldError> {
        Ok(self.body(body)?.joint_edges.iter(&self.joint_edges))
    }

    pub fn body_list(&self) -> &BodyList {
        &self.body_list
    }

    pub fn contact_list(&self) -> &ContactList {
        &self.contact_list
    }

    pub fn joint_list(&self) -> &JointList {
        &self.joint_list
    }

    pub fn body_arena(&self) -> &Arena<Body> {
        &self.bodies
    }

    pub fn fixture_arena(&self) -> &Arena<Fixture> {
        &self.fixtures
    }

    pub fn contact_arena(&self) -> &Arena<Contact> {
        &self.contacts
    }

    pub fn joint_arena(&self) -> &Arena<Joint> {
        &self.joints
    }

    pub fn contact_edge_arena(&self) -> &Arena<ContactEdge> {
        &self.contact_edges
    }

    pub fn joint_edge_arena(&self) -> &Arena<JointEdge> {
        &self.joint_edges
    }

    /// Checks every list in the world, including each body's own lists.
    pub fn validate(&self) -> Result<(), ListError> {
        self.body_list.validate(&self.bodies)?;
        self.contact_list.validate(&self.contacts)?;
        self.joint_list.validate(&self.joints)?;
        for (_, body) in self.bodies() {
            body.fixtures.validate(&self.fixtures)?;
            body.contact_edges.validate(&self.contact_edges)?;
            body.joint_edges.validate(&self.joint_edges)?;
        }
        Ok(())
    }
}

#[derive(Copy, Clone)]
struct ContactEnds {
    body_a: BodyHandle,
    body_b: BodyHandle,
    edge_a: ContactEdgeHandle,
    edge_b: ContactEdgeHandle,
}

impl ContactEnds {
    fn of(contact: &Contact) -> Self {
        Self {
            body_a: contact.body_a(),
            body_b: contact.body_b(),
            edge_a: contact.edge_a,
            edge_b: contact.edge_b,
        }
    }

    fn check(&self, bodies: &Arena<Body>) -> Result<(), WorldError> {
        if bodies.contains(self.body_a) && bodies.contains(self.body_b) {
            Ok(())
        } else {
            Err(WorldError::InvalidBody)
        }
    }
}
