//! Object lifetime and traversal for a 2D rigid-body world.
//!
//! Bodies, fixtures, contacts, joints and the per-body contact/joint edges
//! all live in generational arenas and are threaded through intrusive
//! doubly-linked lists. Lists can be edited while they are being walked:
//! erasing at a cursor hands back a cursor to the next element.

pub mod arena;
pub mod body;
pub mod config;
pub mod contact;
pub mod error;
pub mod fixture;
pub mod island;
pub mod joint;
pub mod list;
pub mod math;
pub mod sweep;
pub mod toi;
pub mod world;

pub use arena::{Arena, Handle};
pub use body::{Body, BodyDef, BodyHandle, BodyType};
pub use config::WorldConfig;
pub use contact::{Contact, ContactEdge, ContactHandle};
pub use error::{ConfigError, ListError, SweepError, WorldError};
pub use fixture::{Fixture, FixtureDef, FixtureHandle};
pub use island::Island;
pub use joint::{Joint, JointDef, JointEdge, JointHandle, JointKind};
pub use list::{Cursor, IntrusiveList, Link, Linked, ListId};
pub use math::{Position, Transform};
pub use sweep::Sweep;
pub use toi::{ContinuousSolver, ToiEvent, ToiOutput, ToiReport};
pub use world::World;
