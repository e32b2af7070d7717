//! Multi-item session host.
//!
//! A [`Session`] owns every item of one peer, the container store, the
//! inbound frame queue, and the outbound channel. Each tick runs in a fixed
//! order:
//!
//! 1. drain the inbox and apply each frame fully before the next
//! 2. tick every item (rest watch, placement, action refresh, while-steps)
//! 3. flush every item's outbox to the channel
//! 4. republish the item journals on the event bus
//!
//! Nothing inside a tick awaits; the async driver only paces calls to
//! [`Session::tick`].

use std::collections::BTreeMap;

use holdable_core::{
    Attribute, BodyState, Headless, HoldableError, HoldableItem, ItemEnv, ItemState, ObjectId,
    PeerId, PlacementRaycaster, ScrollDirection, StaticHolder, UseSlot, encode_frame,
};

use crate::config::SessionConfig;
use crate::containers::{ContainerSpec, ContainerStore};
use crate::error::{Result, SessionError};
use crate::events::{Event, EventBus, NetworkEvent, from_item_event};
use crate::network::{
    InboundFrame, InboxReceiver, InboxSender, LoopbackChannel, NetworkChannel, OfflineChannel,
    OutboundFrame, inbox,
};

/// Running totals since the session started.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SessionStats {
    pub ticks: u64,
    pub frames_applied: u64,
    pub frames_rejected: u64,
    pub frames_sent: u64,
}

/// Outcome of one [`Session::tick`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TickSummary {
    pub frames_applied: usize,
    pub frames_rejected: usize,
    pub frames_sent: usize,
    pub settled: Vec<ObjectId>,
}

/// Collaborators shared by every item of the session.
struct Host {
    holder: StaticHolder,
    containers: ContainerStore,
    inventory: Headless,
    ui: Headless,
    raycaster: Box<dyn PlacementRaycaster + Send>,
}

impl Host {
    fn env(&mut self) -> ItemEnv<'_> {
        ItemEnv::new(
            &mut self.holder,
            &mut self.containers,
            &mut self.inventory,
            &mut self.ui,
            &*self.raycaster,
        )
    }
}

pub struct Session {
    config: SessionConfig,
    items: BTreeMap<ObjectId, HoldableItem>,
    host: Host,
    inbox_tx: InboxSender,
    inbox: InboxReceiver,
    channel: Box<dyn NetworkChannel>,
    events: EventBus,
    stats: SessionStats,
}

impl Session {
    /// Creates an offline session. Attach a channel with
    /// [`Session::with_channel`].
    pub fn new(config: SessionConfig) -> Self {
        let (inbox_tx, inbox) = inbox();
        let events = EventBus::with_capacity(config.event_buffer_size);
        tracing::info!(
            peer = %config.local_peer,
            tick_rate = config.tick_rate_hz,
            "session created"
        );
        Self {
            items: BTreeMap::new(),
            host: Host {
                holder: StaticHolder::default(),
                containers: ContainerStore::new(),
                inventory: Headless,
                ui: Headless,
                raycaster: Box::new(Headless),
            },
            inbox_tx,
            inbox,
            channel: Box::new(OfflineChannel),
            events,
            stats: SessionStats::default(),
            config,
        }
    }

    /// Two sessions wired to each other's inbox.
    pub fn loopback_pair(a: SessionConfig, b: SessionConfig) -> (Self, Self) {
        let (peer_a, peer_b) = (a.local_peer, b.local_peer);
        let a = Self::new(a);
        let b = Self::new(b);
        let a_inbox = a.inbox_sender();
        let b_inbox = b.inbox_sender();
        (
            a.with_channel(LoopbackChannel::new(peer_a).connect(b_inbox)),
            b.with_channel(LoopbackChannel::new(peer_b).connect(a_inbox)),
        )
    }

    pub fn with_channel(mut self, channel: impl NetworkChannel + 'static) -> Self {
        self.channel = Box::new(channel);
        self
    }

    pub fn with_raycaster(mut self, raycaster: impl PlacementRaycaster + Send + 'static) -> Self {
        self.host.raycaster = Box::new(raycaster);
        self
    }

    // ===== accessors =====

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn local_peer(&self) -> PeerId {
        self.config.local_peer
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    /// Handle other sessions (or a transport) push inbound frames into.
    pub fn inbox_sender(&self) -> InboxSender {
        self.inbox_tx.clone()
    }

    pub fn holder(&self) -> &StaticHolder {
        &self.host.holder
    }

    pub fn holder_mut(&mut self) -> &mut StaticHolder {
        &mut self.host.holder
    }

    pub fn containers(&self) -> &ContainerStore {
        &self.host.containers
    }

    pub fn item(&self, id: ObjectId) -> Option<&HoldableItem> {
        self.items.get(&id)
    }

    pub fn items(&self) -> impl Iterator<Item = &HoldableItem> {
        self.items.values()
    }

    /// Physics integration writes item bodies through here.
    pub fn body_mut(&mut self, id: ObjectId) -> Result<&mut BodyState> {
        self.items
            .get_mut(&id)
            .map(HoldableItem::body_mut)
            .ok_or(SessionError::UnknownItem(id))
    }

    /// Items whose pose is still being streamed to peers.
    pub fn streaming_items(&self) -> Vec<ObjectId> {
        self.items
            .values()
            .filter(|item| item.needs_pose_stream())
            .map(HoldableItem::id)
            .collect()
    }

    // ========================================================================
    // Registration
    // ========================================================================

    pub fn add_container(&mut self, spec: ContainerSpec) -> Result<()> {
        self.host.containers.add(spec)
    }

    pub fn set_parent(&mut self, child: ObjectId, parent: ObjectId) {
        self.host.containers.set_parent(child, parent);
    }

    /// Registers an item this peer is authoritative for.
    pub fn add_item(&mut self, state: ItemState) -> Result<()> {
        let item = HoldableItem::new(state, self.config.holdable.clone());
        self.insert_item(item)
    }

    /// Registers an item that mirrors a remote authority.
    pub fn add_replica(&mut self, state: ItemState) -> Result<()> {
        let item = HoldableItem::replica(state, self.config.holdable.clone());
        self.insert_item(item)
    }

    /// Registers a fully built item, e.g. one with a custom behavior.
    pub fn insert_item(&mut self, item: HoldableItem) -> Result<()> {
        let id = item.id();
        if self.items.contains_key(&id) {
            return Err(SessionError::DuplicateItem(id));
        }
        self.host.containers.note_item(id, &item.state().name);
        self.host
            .containers
            .sync_member(id, item.ownership().container(), item.inventory_size());
        tracing::debug!(item = %id, name = %item.state().name, "item registered");
        self.items.insert(id, item);
        Ok(())
    }

    // ========================================================================
    // Item Operations
    // ========================================================================

    fn with_item<R>(
        &mut self,
        id: ObjectId,
        f: impl FnOnce(&mut HoldableItem, &mut ItemEnv<'_>) -> R,
    ) -> Result<R> {
        let item = self
            .items
            .get_mut(&id)
            .ok_or(SessionError::UnknownItem(id))?;
        let result = f(item, &mut self.host.env());
        self.host
            .containers
            .sync_member(id, item.ownership().container(), item.inventory_size());
        Ok(result)
    }

    fn transition(
        &mut self,
        id: ObjectId,
        f: impl FnOnce(
            &mut HoldableItem,
            &mut ItemEnv<'_>,
        ) -> std::result::Result<(), holdable_core::TransitionError>,
    ) -> Result<()> {
        self.with_item(id, f)?
            .map_err(|source| SessionError::Transition { item: id, source })
    }

    pub fn pick_up(&mut self, id: ObjectId) -> Result<()> {
        self.transition(id, |item, env| item.pick_up(env))
    }

    pub fn drop(&mut self, id: ObjectId) -> Result<()> {
        self.transition(id, |item, env| item.drop(env))
    }

    pub fn store_in(&mut self, id: ObjectId, container: ObjectId) -> Result<()> {
        self.transition(id, |item, env| item.store_in(container, env))
    }

    pub fn remove_from_container(&mut self, id: ObjectId) -> Result<()> {
        self.transition(id, |item, env| item.remove_from_container(env))
    }

    pub fn take_from_hands(&mut self, id: ObjectId) -> Result<()> {
        self.transition(id, |item, env| item.take_from_hands(env))
    }

    pub fn use_start(&mut self, id: ObjectId, slot: UseSlot) -> Result<()> {
        self.with_item(id, |item, env| item.use_start(slot, env))?
            .map_err(|source| SessionError::Action { item: id, source })
    }

    pub fn use_end(&mut self, id: ObjectId, slot: UseSlot) -> Result<()> {
        self.with_item(id, |item, env| item.use_end(slot, env))?
            .map_err(|source| SessionError::Action { item: id, source })
    }

    pub fn scroll(&mut self, id: ObjectId, direction: ScrollDirection) -> Result<()> {
        self.with_item(id, |item, _| item.scroll(direction))
    }

    pub fn set_rotation(&mut self, id: ObjectId, rotated: bool) -> Result<()> {
        self.with_item(id, |item, _| item.set_rotation(rotated))
    }

    pub fn set_animation(&mut self, id: ObjectId, name: &str, value: bool) -> Result<()> {
        self.with_item(id, |item, _| item.set_animation(name, value))
    }

    pub fn save_attributes(&self, id: ObjectId) -> Result<Vec<Attribute>> {
        self.items
            .get(&id)
            .map(HoldableItem::to_attributes)
            .ok_or(SessionError::UnknownItem(id))
    }

    pub fn load_attributes(&mut self, id: ObjectId, attributes: &[Attribute]) -> Result<()> {
        let item = self
            .items
            .get_mut(&id)
            .ok_or(SessionError::UnknownItem(id))?;
        item.apply_attributes(attributes, &self.host.containers);
        self.host
            .containers
            .sync_member(id, item.ownership().container(), item.inventory_size());
        Ok(())
    }

    // ========================================================================
    // Tick
    // ========================================================================

    /// Advances the session by `dt` seconds.
    pub fn tick(&mut self, dt: f32) -> TickSummary {
        let mut summary = TickSummary::default();

        while let Ok(frame) = self.inbox.try_recv() {
            if self.apply_inbound(frame) {
                summary.frames_applied += 1;
            } else {
                summary.frames_rejected += 1;
            }
        }

        for (id, item) in &mut self.items {
            let report = item.tick(dt, &mut self.host.env());
            self.host
                .containers
                .sync_member(*id, item.ownership().container(), item.inventory_size());
            if report.settled {
                summary.settled.push(*id);
            }
        }

        summary.frames_sent = self.flush();
        self.publish_events();

        self.stats.ticks += 1;
        self.stats.frames_applied += summary.frames_applied as u64;
        self.stats.frames_rejected += summary.frames_rejected as u64;
        tracing::trace!(tick = self.stats.ticks, ?summary, "tick complete");
        summary
    }

    /// Applies one inbound frame. Returns false if it was skipped.
    fn apply_inbound(&mut self, frame: InboundFrame) -> bool {
        let InboundFrame {
            peer,
            item: id,
            payload,
        } = frame;

        let Some(item) = self.items.get_mut(&id) else {
            tracing::warn!(%peer, item = %id, "frame for unknown item");
            self.publish_rejection(peer, id, "SESSION_UNKNOWN_ITEM", "unknown item".into());
            return false;
        };

        let result = item.apply_frame(peer, &payload, &mut self.host.env());
        self.host
            .containers
            .sync_member(id, item.ownership().container(), item.inventory_size());

        match result {
            Ok(()) => true,
            Err(error) => {
                tracing::warn!(
                    %peer,
                    item = %id,
                    code = error.error_code(),
                    %error,
                    %payload,
                    "frame rejected"
                );
                self.publish_rejection(peer, id, error.error_code(), error.to_string());
                false
            }
        }
    }

    fn publish_rejection(&self, peer: PeerId, item: ObjectId, code: &str, reason: String) {
        self.events.publish(Event::Network(NetworkEvent::FrameRejected {
            peer,
            item,
            code: code.to_owned(),
            reason,
        }));
    }

    /// Encodes and sends every pending outbox message. Returns the number of
    /// frames handed to the channel.
    pub fn flush(&mut self) -> usize {
        let mut sent = 0;
        for (id, item) in &mut self.items {
            let protocol = *item.protocol();
            for message in item.drain_outbox() {
                let payload = match encode_frame(&message, &protocol) {
                    Ok(payload) => payload,
                    Err(error) => {
                        tracing::warn!(item = %id, code = error.error_code(), %error, "unencodable message dropped");
                        continue;
                    }
                };
                tracing::trace!(item = %id, %payload, "sending frame");
                match self.channel.broadcast(OutboundFrame { item: *id, payload }) {
                    Ok(()) => sent += 1,
                    Err(error) => {
                        tracing::warn!(item = %id, %error, "frame not delivered");
                        self.events
                            .publish(Event::Network(NetworkEvent::SendFailed { item: *id }));
                    }
                }
            }
        }
        self.stats.frames_sent += sent as u64;
        sent
    }

    fn publish_events(&mut self) {
        for (id, item) in &mut self.items {
            for event in item.drain_events() {
                self.events.publish(from_item_event(*id, event));
            }
        }
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("peer", &self.config.local_peer)
            .field("items", &self.items.len())
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use holdable_core::{OwnershipState, ProtocolError};

    use super::*;

    const CRATE: ObjectId = ObjectId(50);
    const FUSE: ObjectId = ObjectId(1);

    fn session() -> Session {
        let mut session = Session::new(SessionConfig::default());
        session
            .add_container(ContainerSpec::new(CRATE, "Crate"))
            .unwrap();
        session.add_item(ItemState::new(FUSE, "Fuse")).unwrap();
        session
    }

    #[test]
    fn duplicate_items_are_rejected() {
        let mut session = session();
        assert!(matches!(
            session.add_item(ItemState::new(FUSE, "Fuse")),
            Err(SessionError::DuplicateItem(FUSE))
        ));
    }

    #[test]
    fn unknown_item_operations_fail() {
        let mut session = session();
        assert!(matches!(
            session.pick_up(ObjectId(404)),
            Err(SessionError::UnknownItem(_))
        ));
    }

    #[test]
    fn store_updates_container_contents() {
        let mut session = session();
        session.pick_up(FUSE).unwrap();
        session.store_in(FUSE, CRATE).unwrap();

        assert_eq!(session.containers().contents(CRATE), vec![FUSE]);

        session.remove_from_container(FUSE).unwrap();
        assert!(session.containers().contents(CRATE).is_empty());
    }

    #[test]
    fn rejected_transition_carries_core_code() {
        let mut session = session();
        let err = session.drop(FUSE).unwrap_err();
        assert_eq!(err.code(), "TRANSITION_INVALID_STATE");
    }

    #[test]
    fn inbound_frames_apply_in_arrival_order() {
        let mut session = session();
        let tx = session.inbox_sender();
        for payload in ["item,InPlayerHand", "item,InInv,50", "item,OutInv,0,0,0,0,0,0,1,0,0,0,0,0,0"] {
            tx.send(InboundFrame {
                peer: PeerId(9),
                item: FUSE,
                payload: payload.into(),
            })
            .unwrap();
        }

        let summary = session.tick(0.016);

        assert_eq!(summary.frames_applied, 3);
        let item = session.item(FUSE).unwrap();
        assert_eq!(item.ownership().state(), OwnershipState::Free);
        assert!(session.containers().contents(CRATE).is_empty());
    }

    #[test]
    fn malformed_frame_is_counted_and_published() {
        let mut session = session();
        let mut network = session.events().subscribe(crate::Topic::Network);
        session
            .inbox_sender()
            .send(InboundFrame {
                peer: PeerId(9),
                item: FUSE,
                payload: "item,Teleport".into(),
            })
            .unwrap();

        let summary = session.tick(0.016);

        assert_eq!(summary.frames_rejected, 1);
        let Event::Network(NetworkEvent::FrameRejected { code, .. }) = network.try_recv().unwrap()
        else {
            panic!("expected a rejection");
        };
        assert_eq!(code, ProtocolError::UnknownOpcode("Teleport".into()).error_code());
    }

    #[test]
    fn offline_session_still_drains_outbox() {
        let mut session = session();
        session.pick_up(FUSE).unwrap();
        assert_eq!(session.tick(0.016).frames_sent, 1);
        assert_eq!(session.stats().frames_sent, 1);
    }
}
