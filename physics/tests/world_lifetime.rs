use glam::Vec2;
use linkworld_physics::{
    BodyDef, BodyHandle, BodyType, FixtureDef, FixtureHandle, JointDef, JointKind, ListError,
    World, WorldConfig, WorldError,
};

fn dynamic(world: &mut World, x: f32) -> BodyHandle {
    world
        .create_body(&BodyDef {
            position: Vec2::new(x, 0.0),
            ..BodyDef::default()
        })
        .unwrap()
}

fn fixture(world: &mut World, body: BodyHandle) -> FixtureHandle {
    world.create_fixture(body, &FixtureDef::default()).unwrap()
}

#[test]
fn joint_links_an_edge_into_each_body() {
    let mut world = World::default();
    let a = dynamic(&mut world, 0.0);
    let b = dynamic(&mut world, 1.0);
    let joint = world
        .create_joint(&JointDef::new(JointKind::Distance, a, b))
        .unwrap();

    let edges_a: Vec<_> = world.joint_edges(a).unwrap().map(|(_, e)| (e.other(), e.joint())).collect();
    let edges_b: Vec<_> = world.joint_edges(b).unwrap().map(|(_, e)| (e.other(), e.joint())).collect();
    assert_eq!(edges_a, vec![(b, joint)]);
    assert_eq!(edges_b, vec![(a, joint)]);
    assert_eq!(world.joint_count(), 1);

    world.destroy_joint(joint).unwrap();
    assert!(world.body(a).unwrap().joint_edges().is_empty());
    assert!(world.body(b).unwrap().joint_edges().is_empty());
    assert_eq!(world.joint_count(), 0);
    assert_eq!(world.joint(joint).unwrap_err(), WorldError::InvalidJoint);
    world.validate().unwrap();
}

#[test]
fn joint_needs_two_live_bodies() {
    let mut world = World::default();
    let a = dynamic(&mut world, 0.0);
    let b = dynamic(&mut world, 1.0);
    assert_eq!(
        world.create_joint(&JointDef::new(JointKind::Weld, a, a)),
        Err(WorldError::SameBody("joint"))
    );
    world.destroy_body(b).unwrap();
    assert_eq!(
        world.create_joint(&JointDef::new(JointKind::Weld, a, b)),
        Err(WorldError::InvalidBody)
    );
    assert_eq!(world.joint_count(), 0);
}

#[test]
fn contact_edges_mirror_each_other() {
    let mut world = World::default();
    let a = dynamic(&mut world, 0.0);
    let b = dynamic(&mut world, 1.0);
    let fa = fixture(&mut world, a);
    let fb = fixture(&mut world, b);

    let contact = world.create_contact(fa, fb).unwrap().unwrap();
    assert_eq!(world.create_contact(fb, fa).unwrap(), Some(contact));
    assert_eq!(world.find_contact(fa, fb), Some(contact));
    assert_eq!(world.contact_count(), 1);

    let edges_a: Vec<_> = world.contact_edges(a).unwrap().map(|(_, e)| (e.other(), e.contact())).collect();
    let edges_b: Vec<_> = world.contact_edges(b).unwrap().map(|(_, e)| (e.other(), e.contact())).collect();
    assert_eq!(edges_a, vec![(b, contact)]);
    assert_eq!(edges_b, vec![(a, contact)]);

    world.destroy_contact(contact).unwrap();
    assert!(world.body(a).unwrap().contact_edges().is_empty());
    assert!(world.body(b).unwrap().contact_edges().is_empty());
    assert_eq!(world.find_contact(fa, fb), None);
    world.validate().unwrap();
}

#[test]
fn contacts_are_filtered_at_creation() {
    let mut world = World::default();
    let ground = world
        .create_body(&BodyDef {
            body_type: BodyType::Static,
            ..BodyDef::default()
        })
        .unwrap();
    let wall = world
        .create_body(&BodyDef {
            body_type: BodyType::Kinematic,
            ..BodyDef::default()
        })
        .unwrap();
    let a = dynamic(&mut world, 0.0);
    let (fg, fw, fa, fa2) = (
        fixture(&mut world, ground),
        fixture(&mut world, wall),
        fixture(&mut world, a),
        fixture(&mut world, a),
    );

    assert_eq!(world.create_contact(fg, fw).unwrap(), None);
    assert_eq!(world.create_contact(fa, fa2).unwrap(), None);
    assert!(world.create_contact(fg, fa).unwrap().is_some());
    assert_eq!(world.contact_count(), 1);
}

#[test]
fn sensor_contacts_do_not_wake_bodies() {
    let mut world = World::default();
    let a = dynamic(&mut world, 0.0);
    let b = dynamic(&mut world, 1.0);
    let fa = fixture(&mut world, a);
    let sensor = world
        .create_fixture(
            b,
            &FixtureDef {
                is_sensor: true,
                ..FixtureDef::default()
            },
        )
        .unwrap();
    let fb = fixture(&mut world, b);
    world.body_mut(b).unwrap().set_awake(false);

    world.create_contact(fa, sensor).unwrap().unwrap();
    assert!(!world.body(b).unwrap().is_awake());

    world.create_contact(fa, fb).unwrap().unwrap();
    assert!(world.body(b).unwrap().is_awake());
}

#[test]
fn destroy_body_cascades() {
    let mut world = World::default();
    let a = dynamic(&mut world, 0.0);
    let b = dynamic(&mut world, 1.0);
    let c = dynamic(&mut world, 2.0);
    let fa1 = fixture(&mut world, a);
    let fa2 = fixture(&mut world, a);
    let fb = fixture(&mut world, b);
    let fc = fixture(&mut world, c);

    let joint = world
        .create_joint(&JointDef::new(JointKind::Revolute, a, b))
        .unwrap();
    world.create_contact(fa1, fc).unwrap().unwrap();
    world.create_contact(fa2, fc).unwrap().unwrap();
    let survivor = world.create_contact(fb, fc).unwrap().unwrap();
    assert_eq!(world.contact_count(), 3);

    world.destroy_body(a).unwrap();

    assert_eq!(world.body(a).unwrap_err(), WorldError::InvalidBody);
    assert_eq!(world.fixture(fa1).unwrap_err(), WorldError::InvalidFixture);
    assert_eq!(world.fixture(fa2).unwrap_err(), WorldError::InvalidFixture);
    assert!(world.joint(joint).is_err());
    assert_eq!(world.joint_count(), 0);
    assert_eq!(world.contact_count(), 1);
    assert!(world.body(b).unwrap().joint_edges().is_empty());

    let edges_c: Vec<_> = world.contact_edges(c).unwrap().map(|(_, e)| e.contact()).collect();
    assert_eq!(edges_c, vec![survivor]);
    assert_eq!(world.body_count(), 2);
    assert_eq!(world.destroy_body(a), Err(WorldError::InvalidBody));
    world.validate().unwrap();
}

#[test]
fn destroy_fixture_only_takes_its_own_contacts() {
    let mut world = World::default();
    let a = dynamic(&mut world, 0.0);
    let b = dynamic(&mut world, 1.0);
    let fa1 = fixture(&mut world, a);
    let fa2 = fixture(&mut world, a);
    let fb = fixture(&mut world, b);
    world.create_contact(fa1, fb).unwrap().unwrap();
    let kept = world.create_contact(fa2, fb).unwrap().unwrap();

    world.destroy_fixture(fa1).unwrap();

    assert_eq!(world.contact_count(), 1);
    assert!(world.contact(kept).unwrap().connects(fa2, fb));
    let fixtures: Vec<_> = world.fixtures(a).unwrap().map(|(h, _)| h).collect();
    assert_eq!(fixtures, vec![fa2]);
    assert_eq!(world.body(b).unwrap().contact_edges().len(), 1);
    world.validate().unwrap();
}

#[test]
fn joint_filters_existing_contacts() {
    let mut world = World::default();
    let a = dynamic(&mut world, 0.0);
    let b = dynamic(&mut world, 1.0);
    let c = dynamic(&mut world, 2.0);
    let (fa, fb, fc) = (fixture(&mut world, a), fixture(&mut world, b), fixture(&mut world, c));
    let ab = world.create_contact(fa, fb).unwrap().unwrap();
    let ac = world.create_contact(fa, fc).unwrap().unwrap();

    world
        .create_joint(&JointDef::new(JointKind::Prismatic, a, b))
        .unwrap();
    assert!(world.contact(ab).unwrap().needs_filtering());
    assert!(!world.contact(ac).unwrap().needs_filtering());

    assert_eq!(world.filter_contacts(), Ok(1));
    assert!(world.contact(ab).is_err());
    assert!(world.contact(ac).is_ok());
    assert_eq!(world.body(b).unwrap().contact_edges().len(), 0);
    assert_eq!(world.body(a).unwrap().contact_edges().len(), 1);

    // the joint now vetoes the pair
    assert_eq!(world.create_contact(fa, fb).unwrap(), None);
    assert_eq!(world.filter_contacts(), Ok(0));
    world.validate().unwrap();
}

#[test]
fn colliding_joints_keep_their_contacts() {
    let mut world = World::default();
    let a = dynamic(&mut world, 0.0);
    let b = dynamic(&mut world, 1.0);
    let (fa, fb) = (fixture(&mut world, a), fixture(&mut world, b));
    let contact = world.create_contact(fa, fb).unwrap().unwrap();

    world
        .create_joint(&JointDef {
            collide_connected: true,
            ..JointDef::new(JointKind::Rope, a, b)
        })
        .unwrap();
    assert!(world.should_collide(a, b).unwrap());
    assert_eq!(world.filter_contacts(), Ok(0));
    assert!(world.contact(contact).is_ok());
}

#[test]
fn capacity_limits_leave_lists_unchanged() {
    let mut world = World::new(WorldConfig {
        max_bodies: 2,
        max_joints: 1,
        max_contacts: 1,
        max_fixtures_per_body: 1,
        ..WorldConfig::default()
    });
    let a = dynamic(&mut world, 0.0);
    let b = dynamic(&mut world, 1.0);
    assert_eq!(
        world.create_body(&BodyDef::default()),
        Err(WorldError::List(ListError::CapacityExceeded { max_size: 2 }))
    );
    assert_eq!(world.body_count(), 2);
    assert_eq!(world.body_arena().len(), 2);

    let fa = fixture(&mut world, a);
    let fb = fixture(&mut world, b);
    assert!(matches!(
        world.create_fixture(a, &FixtureDef::default()),
        Err(WorldError::List(ListError::CapacityExceeded { max_size: 1 }))
    ));
    assert_eq!(world.body(a).unwrap().fixtures().len(), 1);

    world
        .create_joint(&JointDef {
            collide_connected: true,
            ..JointDef::new(JointKind::Distance, a, b)
        })
        .unwrap();
    assert!(world
        .create_joint(&JointDef::new(JointKind::Distance, b, a))
        .is_err());
    assert_eq!(world.joint_count(), 1);
    assert_eq!(world.body(a).unwrap().joint_edges().len(), 1);

    world.create_contact(fa, fb).unwrap().unwrap();
    assert_eq!(world.contact_count(), 1);
    world.validate().unwrap();

    world.clear();
    assert_eq!(world.body_count(), 0);
    assert!(world.create_body(&BodyDef::default()).is_ok());
}
