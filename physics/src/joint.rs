use crate::{
    arena::Handle,
    body::BodyHandle,
    list::{IntrusiveList, Link, Linked},
};
use glam::Vec2;
use serde::{Deserialize, Serialize};

pub type JointHandle = Handle<Joint>;
pub type JointList = IntrusiveList<Joint>;
pub type JointEdgeHandle = Handle<JointEdge>;
pub type JointEdgeList = IntrusiveList<JointEdge>;

/// Which solver the joint is handed to. The solvers themselves live outside
/// this crate.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum JointKind {
    Distance,
    Revolute,
    Prismatic,
    Weld,
    Rope,
}

#[derive(Copy, Clone, Debug)]
pub struct JointDef {
    pub kind: JointKind,
    pub body_a: BodyHandle,
    pub body_b: BodyHandle,

    pub local_anchor_a: Vec2, // the anchor location in body_a's space
    pub local_anchor_b: Vec2, // the anchor location in body_b's space

    pub collide_connected: bool,
}

impl JointDef {
    pub fn new(kind: JointKind, body_a: BodyHandle, body_b: BodyHandle) -> Self {
        Self {
            kind,
            body_a,
            body_b,
            local_anchor_a: Vec2::ZERO,
            local_anchor_b: Vec2::ZERO,
            collide_connected: false,
        }
    }
}

#[derive(Debug)]
pub struct Joint {
    link: Link<Joint>,
    kind: JointKind,
    body_a: BodyHandle,
    body_b: BodyHandle,
    pub(crate) edge_a: JointEdgeHandle,
    pub(crate) edge_b: JointEdgeHandle,
    pub local_anchor_a: Vec2,
    pub local_anchor_b: Vec2,
    collide_connected: bool,
}

impl Linked for Joint {
    fn link(&self) -> &Link<Self> {
        &self.link
    }

    fn link_mut(&mut self) -> &mut Link<Self> {
        &mut self.link
    }
}

impl Joint {
    pub(crate) fn new(def: &JointDef) -> Self {
        Self {
            link: Link::default(),
            kind: def.kind,
            body_a: def.body_a,
            body_b: def.body_b,
            edge_a: JointEdgeHandle::default(),
            edge_b: JointEdgeHandle::default(),
            local_anchor_a: def.local_anchor_a,
            local_anchor_b: def.local_anchor_b,
            collide_connected: def.collide_connected,
        }
    }

    pub fn kind(&self) -> JointKind {
        self.kind
    }

    pub fn body_a(&self) -> BodyHandle {
        self.body_a
    }

    pub fn body_b(&self) -> BodyHandle {
        self.body_b
    }

    pub fn collide_connected(&self) -> bool {
        self.collide_connected
    }
}

/// One endpoint of a joint, linked into the joint list of the body on this
/// side.
#[derive(Debug)]
pub struct JointEdge {
    link: Link<JointEdge>,
    other: BodyHandle,
    joint: JointHandle,
}

impl Linked for JointEdge {
    fn link(&self) -> &Link<Self> {
        &self.link
    }

    fn link_mut(&mut self) -> &mut Link<Self> {
        &mut self.link
    }
}

impl JointEdge {
    pub(crate) fn new(other: BodyHandle, joint: JointHandle) -> Self {
        Self {
            link: Link::default(),
            other,
            joint,
        }
    }

    pub fn other(&self) -> BodyHandle {
        self.other
    }

    pub fn joint(&self) -> JointHandle {
        self.joint
    }
}
