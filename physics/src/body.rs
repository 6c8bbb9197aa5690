use crate::{
    arena::Handle,
    contact::ContactEdgeList,
    error::SweepError,
    fixture::FixtureList,
    joint::JointEdgeList,
    list::{IntrusiveList, Link, Linked},
    math::{Position, Transform},
    sweep::Sweep,
};
use glam::Vec2;
use serde::{Deserialize, Serialize};

pub type BodyHandle = Handle<Body>;
pub type BodyList = IntrusiveList<Body>;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BodyType {
    Static,
    Kinematic,
    Dynamic,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct BodyDef {
    pub body_type: BodyType,
    pub position: Vec2,
    pub angle: f32,
    pub local_center: Vec2,
    pub linear_velocity: Vec2,
    pub angular_velocity: f32,
    pub inv_mass: f32,
    pub bullet: bool,
    pub awake: bool,
}

impl Default for BodyDef {
    fn default() -> Self {
        Self {
            body_type: BodyType::Dynamic,
            position: Vec2::ZERO,
            angle: 0.0,
            local_center: Vec2::ZERO,
            linear_velocity: Vec2::ZERO,
            angular_velocity: 0.0,
            inv_mass: 1.0,
            bullet: false,
            awake: true,
        }
    }
}

#[derive(Debug)]
pub struct Body {
    link: Link<Body>,
    body_type: BodyType,
    sweep: Sweep,
    transform: Transform,
    pub linear_velocity: Vec2,
    pub angular_velocity: f32,
    pub inv_mass: f32,
    bullet: bool,
    awake: bool,

    pub(crate) fixtures: FixtureList,
    pub(crate) contact_edges: ContactEdgeList,
    pub(crate) joint_edges: JointEdgeList,
}

impl Linked for Body {
    fn link(&self) -> &Link<Self> {
        &self.link
    }

    fn link_mut(&mut self) -> &mut Link<Self> {
        &mut self.link
    }
}

impl Body {
    pub(crate) fn new(def: &BodyDef, max_fixtures: usize) -> Self {
        let transform = Transform::from_position_angle(def.position, def.angle);
        let centre = transform.transform_point(def.local_center);
        let inv_mass = match def.body_type {
            BodyType::Dynamic => def.inv_mass,
            BodyType::Static | BodyType::Kinematic => 0.0,
        };
        Self {
            link: Link::default(),
            body_type: def.body_type,
            sweep: Sweep::new(def.local_center, Position::new(centre, def.angle)),
            transform,
            linear_velocity: def.linear_velocity,
            angular_velocity: def.angular_velocity,
            inv_mass,
            bullet: def.bullet,
            awake: def.awake,
            fixtures: FixtureList::bounded(max_fixtures),
            contact_edges: ContactEdgeList::unbounded(),
            joint_edges: JointEdgeList::unbounded(),
        }
    }

    pub fn body_type(&self) -> BodyType {
        self.body_type
    }

    pub fn is_static(&self) -> bool {
        self.body_type == BodyType::Static
    }

    pub fn is_dynamic(&self) -> bool {
        self.body_type == BodyType::Dynamic
    }

    pub fn has_infinite_mass(&self) -> bool {
        self.inv_mass == 0.0
    }

    pub fn is_bullet(&self) -> bool {
        self.bullet
    }

    pub fn set_bullet(&mut self, bullet: bool) {
        self.bullet = bullet;
    }

    pub fn is_awake(&self) -> bool {
        self.awake
    }

    pub fn set_awake(&mut self, awake: bool) {
        if self.is_static() {
            return;
        }
        self.awake = awake;
        if !awake {
            self.linear_velocity = Vec2::ZERO;
            self.angular_velocity = 0.0;
        }
    }

    pub fn sweep(&self) -> &Sweep {
        &self.sweep
    }

    pub fn sweep_mut(&mut self) -> &mut Sweep {
        &mut self.sweep
    }

    pub(crate) fn restore_sweep(&mut self, sweep: Sweep) {
        self.sweep = sweep;
        self.synchronize_transform();
    }

    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    pub fn position(&self) -> Vec2 {
        self.transform.p
    }

    pub fn angle(&self) -> f32 {
        self.sweep.pos1().a
    }

    pub fn world_center(&self) -> Vec2 {
        self.sweep.pos1().c
    }

    pub fn local_to_world(&self, body_point: Vec2) -> Vec2 {
        self.transform.transform_point(body_point)
    }

    pub fn world_to_local(&self, world_point: Vec2) -> Vec2 {
        self.transform.inv_transform_point(world_point)
    }

    pub fn fixtures(&self) -> &FixtureList {
        &self.fixtures
    }

    pub fn contact_edges(&self) -> &ContactEdgeList {
        &self.contact_edges
    }

    pub fn joint_edges(&self) -> &JointEdgeList {
        &self.joint_edges
    }

    /// Rebuilds the transform from the end of the sweep.
    pub fn synchronize_transform(&mut self) {
        self.transform = self.sweep.transform_at(1.0);
    }

    /// Commits motion up to step fraction `alpha` and parks the body there:
    /// the remaining motion of this step is discarded.
    pub fn advance(&mut self, alpha: f32) -> Result<(), SweepError> {
        self.sweep.advance0(alpha)?;
        self.sweep.freeze();
        self.synchronize_transform();
        Ok(())
    }
}
