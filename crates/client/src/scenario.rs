//! Scripted two-peer session.

use anyhow::Result;
use glam::Vec3;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tokio::time::{self, Interval, MissedTickBehavior};

use holdable_core::{ItemState, ObjectId, ScrollDirection, UseSlot, ViewTransform};
use holdable_runtime::{ContainerSpec, EventBus, Session, SessionConfig, TickSummary, Topic};

const FUSE: ObjectId = ObjectId(1);
const CRATE: ObjectId = ObjectId(50);
const PANEL: ObjectId = ObjectId(60);
const PANEL_COVER: ObjectId = ObjectId(61);

/// Per-tick velocity retention of the stand-in physics.
const DAMPING: f32 = 0.85;
const SETTLE_TIMEOUT_SECS: f32 = 10.0;

pub async fn run(host_config: SessionConfig, guest_config: SessionConfig) -> Result<()> {
    let (mut host, mut guest) = Session::loopback_pair(host_config, guest_config);
    populate(&mut host, false)?;
    populate(&mut guest, true)?;
    host.holder_mut().view = ViewTransform::new(Vec3::new(0.0, 1.6, 0.0), Vec3::NEG_Z);

    let mut watchers = watch(host.events(), "host");
    watchers.extend(watch(guest.events(), "guest"));
    let guest = holdable_runtime::spawn(guest);
    let mut clock = Clock::new(host.config());

    tracing::info!("scene 1: pick up and throw");
    host.pick_up(FUSE)?;
    clock.step(&mut host).await;
    host.scroll(FUSE, ScrollDirection::Down)?;
    host.use_start(FUSE, UseSlot::Secondary)?;
    clock.run_for(&mut host, 0.5).await;
    host.use_end(FUSE, UseSlot::Secondary)?;
    settle(&mut host, &mut clock).await?;

    tracing::info!("scene 2: store in the crate and drop it back out");
    host.pick_up(FUSE)?;
    clock.step(&mut host).await;
    host.store_in(FUSE, CRATE)?;
    clock.step(&mut host).await;
    tracing::info!(contents = ?host.containers().contents(CRATE), "crate");
    host.drop(FUSE)?;
    settle(&mut host, &mut clock).await?;

    tracing::info!("scene 3: install into the fuse box");
    host.holder_mut().look_target = Some(PANEL_COVER);
    host.pick_up(FUSE)?;
    clock.step(&mut host).await;
    host.use_start(FUSE, UseSlot::Primary)?;
    clock.run_for(&mut host, 1.2).await;
    tracing::info!(
        installed = ?host.containers().installed_parts(PANEL),
        missing = ?host.containers().missing_parts(PANEL),
        "fuse box"
    );

    clock.run_for(&mut host, 0.1).await;
    let guest = guest.stop().await?;
    for watcher in watchers {
        watcher.abort();
    }

    report(&host, &guest);
    Ok(())
}

fn populate(session: &mut Session, replica: bool) -> Result<()> {
    session.add_container(ContainerSpec::new(CRATE, "Crate"))?;
    session.add_container(ContainerSpec::new(PANEL, "Fuse Box").requiring("Fuse"))?;
    session.set_parent(PANEL_COVER, PANEL);

    let mut fuse = ItemState::new(FUSE, "Fuse");
    fuse.body.pose.position = Vec3::new(0.0, 0.5, -1.0);
    if replica {
        session.add_replica(fuse)?;
    } else {
        session.add_item(fuse)?;
    }
    Ok(())
}

/// Logs every event of `bus` until the task is aborted.
fn watch(bus: &EventBus, peer: &'static str) -> Vec<JoinHandle<()>> {
    bus.subscribe_multiple(&[Topic::Ownership, Topic::Action, Topic::Physics, Topic::Network])
        .into_iter()
        .map(|(topic, mut rx)| {
            tokio::spawn(async move {
                loop {
                    match rx.recv().await {
                        Ok(event) => tracing::info!(peer, %topic, ?event),
                        Err(RecvError::Lagged(skipped)) => {
                            tracing::warn!(peer, %topic, skipped, "event log lagging");
                        }
                        Err(RecvError::Closed) => break,
                    }
                }
            })
        })
        .collect()
}

/// Damps the fuse until the rest watch fires.
async fn settle(host: &mut Session, clock: &mut Clock) -> Result<()> {
    let max_ticks = (SETTLE_TIMEOUT_SECS / clock.dt).ceil() as u32;
    for _ in 0..max_ticks {
        let body = host.body_mut(FUSE)?;
        body.pose.position += body.velocity * clock.dt;
        body.velocity *= DAMPING;
        body.angular_velocity *= DAMPING;

        if clock.step(host).await.settled.contains(&FUSE) {
            return Ok(());
        }
    }
    tracing::warn!(item = %FUSE, "did not settle before timeout");
    Ok(())
}

fn report(host: &Session, guest: &Session) {
    for (name, session) in [("host", host), ("guest", guest)] {
        let stats = session.stats();
        tracing::info!(
            peer = name,
            ticks = stats.ticks,
            sent = stats.frames_sent,
            applied = stats.frames_applied,
            rejected = stats.frames_rejected,
            "session stats"
        );
        if let Some(item) = session.item(FUSE) {
            tracing::info!(
                peer = name,
                state = %item.ownership().state(),
                container = ?item.ownership().container(),
                "final fuse"
            );
        }
    }
}

/// Paces host ticks at the configured rate.
struct Clock {
    interval: Interval,
    dt: f32,
}

impl Clock {
    fn new(config: &SessionConfig) -> Self {
        let mut interval = time::interval(config.tick_interval());
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        Self {
            interval,
            dt: config.tick_dt(),
        }
    }

    async fn step(&mut self, session: &mut Session) -> TickSummary {
        self.interval.tick().await;
        session.tick(self.dt)
    }

    async fn run_for(&mut self, session: &mut Session, seconds: f32) {
        let ticks = (seconds / self.dt).ceil() as u32;
        for _ in 0..ticks {
            self.step(session).await;
        }
    }
}
