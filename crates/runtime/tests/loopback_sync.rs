use std::time::Duration;

use glam::Vec3;
use holdable_core::{
    Attachment, Authority, ItemState, ObjectId, OwnershipState, PeerId, Presence,
    ScrollDirection, UseSlot,
};
use holdable_runtime::{
    ActionEvent, ContainerSpec, Event, InboundFrame, OwnershipEvent, Session, SessionConfig, Topic,
    spawn,
};

const FUSE: ObjectId = ObjectId(1);
const CRATE: ObjectId = ObjectId(50);
const PANEL: ObjectId = ObjectId(60);
const PANEL_COVER: ObjectId = ObjectId(61);
const HOST: PeerId = PeerId(1);
const GUEST: PeerId = PeerId(2);

/// Host owns the fuse; guest mirrors it. Both know the same containers.
fn pair() -> (Session, Session) {
    let (mut host, mut guest) = Session::loopback_pair(
        SessionConfig::default().with_peer(HOST),
        SessionConfig::default().with_peer(GUEST),
    );
    for session in [&mut host, &mut guest] {
        session
            .add_container(ContainerSpec::new(CRATE, "Crate"))
            .unwrap();
        session
            .add_container(ContainerSpec::new(PANEL, "Fuse Box").requiring("Fuse"))
            .unwrap();
        session.set_parent(PANEL_COVER, PANEL);
    }
    host.add_item(ItemState::new(FUSE, "Fuse")).unwrap();
    guest.add_replica(ItemState::new(FUSE, "Fuse")).unwrap();
    (host, guest)
}

fn exchange(host: &mut Session, guest: &mut Session, dt: f32) {
    host.tick(dt);
    guest.tick(dt);
}

#[test]
fn pick_up_and_drop_are_mirrored() {
    let (mut host, mut guest) = pair();

    host.pick_up(FUSE).unwrap();
    exchange(&mut host, &mut guest, 0.016);

    let replica = guest.item(FUSE).unwrap();
    assert_eq!(replica.ownership().state(), OwnershipState::InHands);
    assert_eq!(replica.ownership().attachment(), Attachment::RemoteHand(HOST));
    assert!(!replica.state().able_to_pick_up);

    let err = guest.pick_up(FUSE).unwrap_err();
    assert_eq!(err.code(), "TRANSITION_REMOTELY_HELD");

    host.drop(FUSE).unwrap();
    exchange(&mut host, &mut guest, 0.016);

    let origin = host.item(FUSE).unwrap().state().body.pose.position;
    assert_eq!(origin, Vec3::new(0.0, 0.0, -1.5));

    let replica = guest.item(FUSE).unwrap();
    assert_eq!(replica.ownership().state(), OwnershipState::Free);
    assert_eq!(replica.ownership().authority(), Authority::Network);
    assert!(replica.state().able_to_pick_up);
    assert!(replica.state().body.pose.position.abs_diff_eq(origin, 1e-4));
    assert_eq!(guest.stats().frames_applied, 2);
}

#[test]
fn guest_can_claim_after_release() {
    let (mut host, mut guest) = pair();
    host.pick_up(FUSE).unwrap();
    exchange(&mut host, &mut guest, 0.016);
    host.drop(FUSE).unwrap();
    exchange(&mut host, &mut guest, 0.016);

    guest.pick_up(FUSE).unwrap();
    guest.tick(0.016);
    host.tick(0.016);

    let original = host.item(FUSE).unwrap();
    assert_eq!(original.ownership().attachment(), Attachment::RemoteHand(GUEST));
    assert_eq!(original.ownership().authority(), Authority::Network);
    assert!(host.drop(FUSE).is_err());
}

#[test]
fn container_storage_is_mirrored() {
    let (mut host, mut guest) = pair();

    host.pick_up(FUSE).unwrap();
    host.store_in(FUSE, CRATE).unwrap();
    exchange(&mut host, &mut guest, 0.016);

    assert_eq!(host.containers().contents(CRATE), vec![FUSE]);
    assert_eq!(guest.containers().contents(CRATE), vec![FUSE]);
    let replica = guest.item(FUSE).unwrap();
    assert!(replica.state().hidden);
    assert_eq!(replica.ownership().container(), Some(CRATE));

    host.remove_from_container(FUSE).unwrap();
    exchange(&mut host, &mut guest, 0.016);

    assert!(guest.containers().contents(CRATE).is_empty());
    assert!(!guest.item(FUSE).unwrap().state().hidden);
}

#[test]
fn thrown_item_arrives_with_zero_velocity() {
    let (mut host, mut guest) = pair();
    let mut actions = host.events().subscribe(Topic::Action);

    host.pick_up(FUSE).unwrap();
    host.tick(0.0);
    host.scroll(FUSE, ScrollDirection::Down).unwrap();
    host.use_start(FUSE, UseSlot::Secondary).unwrap();
    for _ in 0..10 {
        host.tick(0.1);
    }
    host.use_end(FUSE, UseSlot::Secondary).unwrap();
    exchange(&mut host, &mut guest, 0.016);

    let thrown = host.item(FUSE).unwrap();
    assert!(thrown.state().body.velocity.z < -5.9);
    let replica = guest.item(FUSE).unwrap();
    assert_eq!(replica.ownership().state(), OwnershipState::Free);
    assert_eq!(replica.state().body.velocity, Vec3::ZERO);

    let mut saw_throw = false;
    while let Ok(event) = actions.try_recv() {
        if let Event::Action(ActionEvent::Thrown { charge, .. }) = event {
            assert!((charge - 6.0).abs() < 1e-3);
            saw_throw = true;
        }
    }
    assert!(saw_throw);
}

#[test]
fn install_fills_the_panel_on_both_peers() {
    let (mut host, mut guest) = pair();
    host.holder_mut().look_target = Some(PANEL_COVER);

    host.pick_up(FUSE).unwrap();
    host.tick(0.0);
    host.use_start(FUSE, UseSlot::Primary).unwrap();
    for _ in 0..12 {
        host.tick(0.1);
    }
    guest.tick(0.016);

    assert_eq!(host.containers().installed_parts(PANEL), &[FUSE]);
    assert!(host.containers().missing_parts(PANEL).is_empty());
    assert_eq!(host.containers().contents(PANEL), vec![FUSE]);
    assert_eq!(guest.containers().contents(PANEL), vec![FUSE]);
    assert!(!host.holder().hands_full);
}

#[test]
fn ownership_events_follow_transitions() {
    let (mut host, _guest) = pair();
    let mut ownership = host.events().subscribe(Topic::Ownership);

    host.pick_up(FUSE).unwrap();
    host.tick(0.016);

    assert_eq!(
        ownership.try_recv().unwrap(),
        Event::Ownership(OwnershipEvent {
            item: FUSE,
            from: OwnershipState::Free,
            to: OwnershipState::InHands,
            authority: Authority::Local,
        })
    );
}

#[test]
fn malformed_and_misaddressed_frames_are_skipped() {
    let (_host, mut guest) = pair();
    let before = guest.item(FUSE).unwrap().state().clone();
    let inbox = guest.inbox_sender();
    for (item, payload) in [
        (FUSE, "item,Dropped,1,2,3"),
        (FUSE, "item,InPlayerHand,extra"),
        (FUSE, "door,Open"),
        (FUSE, "item,InInv,12.5"),
        (FUSE, "item,InInv,999"),
        (FUSE, "item,Anim,Open,yes"),
        (ObjectId(404), "item,InPlayerHand"),
    ] {
        inbox
            .send(InboundFrame {
                peer: HOST,
                item,
                payload: payload.into(),
            })
            .unwrap();
    }

    let summary = guest.tick(0.016);

    assert_eq!(summary.frames_rejected, 7);
    assert_eq!(summary.frames_applied, 0);
    assert_eq!(guest.item(FUSE).unwrap().state(), &before);
}

#[test]
fn settled_items_stop_streaming() {
    let (mut host, mut guest) = pair();
    host.pick_up(FUSE).unwrap();
    host.drop(FUSE).unwrap();
    assert_eq!(host.streaming_items(), vec![FUSE]);

    let settled: Vec<_> = (0..40)
        .flat_map(|_| host.tick(1.0 / 60.0).settled)
        .collect();

    assert_eq!(settled, vec![FUSE]);
    assert!(host.streaming_items().is_empty());
    guest.tick(0.016);
    let replica = guest.item(FUSE).unwrap();
    assert!(
        replica
            .state()
            .presence
            .contains(Presence::COLLIDERS | Presence::RENDERERS)
    );
}

#[test]
fn attributes_survive_a_save_and_load() {
    let (mut host, mut guest) = pair();
    host.set_rotation(FUSE, true).unwrap();
    host.pick_up(FUSE).unwrap();
    host.store_in(FUSE, CRATE).unwrap();
    let saved = host.save_attributes(FUSE).unwrap();

    let mut restored = Session::new(SessionConfig::default());
    restored
        .add_container(ContainerSpec::new(CRATE, "Crate"))
        .unwrap();
    restored.add_item(ItemState::new(FUSE, "Fuse")).unwrap();
    restored.load_attributes(FUSE, &saved).unwrap();

    let item = restored.item(FUSE).unwrap();
    assert_eq!(item.ownership().container(), Some(CRATE));
    assert!(item.state().footprint.rotated);
    assert_eq!(restored.containers().contents(CRATE), vec![FUSE]);

    exchange(&mut host, &mut guest, 0.016);
    assert!(guest.item(FUSE).unwrap().state().footprint.rotated);
}

#[tokio::test]
async fn driver_applies_frames_between_ticks() {
    let (mut host, guest) = pair();
    let guest = spawn(guest);

    host.pick_up(FUSE).unwrap();
    host.tick(0.016);
    tokio::time::sleep(Duration::from_millis(100)).await;

    let guest = guest.stop().await.unwrap();
    assert!(guest.stats().ticks > 0);
    assert_eq!(
        guest.item(FUSE).unwrap().ownership().attachment(),
        Attachment::RemoteHand(HOST)
    );
}
