//! Fixed-rate async driver for a session.
//!
//! The driver owns the session on a tokio task and calls
//! [`Session::tick`] on every interval tick until stopped. Stopping hands the
//! session back so callers can inspect it.

use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};

use crate::error::{Result, SessionError};
use crate::session::Session;

pub struct DriverHandle {
    shutdown: oneshot::Sender<()>,
    join: JoinHandle<Session>,
}

impl DriverHandle {
    /// Stops ticking and returns the session.
    pub async fn stop(self) -> Result<Session> {
        // The task may already have exited; join reports that.
        let _ = self.shutdown.send(());
        self.join.await.map_err(SessionError::DriverJoin)
    }
}

/// Spawns the tick loop at the session's configured rate.
pub fn spawn(session: Session) -> DriverHandle {
    let (shutdown, shutdown_rx) = oneshot::channel();
    let join = tokio::spawn(run(session, shutdown_rx));
    DriverHandle { shutdown, join }
}

async fn run(mut session: Session, mut shutdown: oneshot::Receiver<()>) -> Session {
    let mut interval = time::interval(session.config().tick_interval());
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let dt = session.config().tick_dt();

    tracing::info!(peer = %session.local_peer(), "session driver started");
    loop {
        tokio::select! {
            _ = &mut shutdown => break,
            _ = interval.tick() => {
                session.tick(dt);
            }
        }
    }
    tracing::info!(
        peer = %session.local_peer(),
        ticks = session.stats().ticks,
        "session driver stopped"
    );
    session
}
