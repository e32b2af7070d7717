//! Holdable item simulator.
//!
//! Runs two loopback peers in one process: a host that scripts a player
//! handling a fuse, and a guest driven on its own tick loop that mirrors
//! everything it receives. Both peers log what they see.
//!
//! # Configuration
//!
//! - `HOLDABLE_CONFIG` - Path to a session TOML file (optional)
//! - `HOLDABLE_TICK_RATE`, `HOLDABLE_EVENT_BUFFER`, `HOLDABLE_PEER_ID` -
//!   overrides applied on top of the file
//! - `RUST_LOG` - Log filter (default: info)
//!
//! ```bash
//! RUST_LOG=holdable_core=debug cargo run -p holdable-client
//! ```

mod logging;
mod scenario;

use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use holdable_core::PeerId;
use holdable_runtime::SessionConfig;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    logging::setup_logging()?;

    let host_config = load_config()?;
    let guest_config = host_config
        .clone()
        .with_peer(guest_peer(host_config.local_peer)?);

    tracing::info!(
        host = %host_config.local_peer,
        guest = %guest_config.local_peer,
        tick_rate = host_config.tick_rate_hz,
        "starting holdable simulator"
    );

    scenario::run(host_config, guest_config).await
}

fn load_config() -> Result<SessionConfig> {
    let config = match std::env::var_os("HOLDABLE_CONFIG").map(PathBuf::from) {
        Some(path) => SessionConfig::load(&path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => SessionConfig::default(),
    };
    Ok(config.with_env_overrides())
}

/// The guest takes the id after the host's.
fn guest_peer(host: PeerId) -> Result<PeerId> {
    host.0
        .checked_add(1)
        .map(PeerId)
        .ok_or_else(|| anyhow!("host peer id {host} leaves no room for a guest"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guest_follows_host() {
        assert_eq!(guest_peer(PeerId(1)).unwrap(), PeerId(2));
    }

    #[test]
    fn max_host_id_is_an_error() {
        assert!(guest_peer(PeerId(u64::MAX)).is_err());
    }
}
