//! Session configuration.
//!
//! Values come from, in increasing priority: `Default`, a TOML file, and the
//! process environment.

use std::env;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use holdable_core::{HoldableConfig, PeerId};

use crate::error::{Result, SessionError};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Per-item tuning shared by every item in the session.
    pub holdable: HoldableConfig,
    pub tick_rate_hz: u32,
    /// Capacity of each event bus topic.
    pub event_buffer_size: usize,
    /// Id this process uses as the sender of its frames.
    pub local_peer: PeerId,
}

impl SessionConfig {
    pub const DEFAULT_TICK_RATE_HZ: u32 = 60;
    pub const DEFAULT_EVENT_BUFFER_SIZE: usize = 100;
    pub const DEFAULT_LOCAL_PEER: PeerId = PeerId(1);

    pub const ENV_TICK_RATE: &'static str = "HOLDABLE_TICK_RATE";
    pub const ENV_EVENT_BUFFER: &'static str = "HOLDABLE_EVENT_BUFFER";
    pub const ENV_PEER_ID: &'static str = "HOLDABLE_PEER_ID";

    /// Loads a TOML file. Missing keys take their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| SessionError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| SessionError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Defaults overridden from the environment.
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// Applies environment overrides on top of `self`.
    ///
    /// Environment variables:
    /// - `HOLDABLE_TICK_RATE` - Ticks per second (default: 60)
    /// - `HOLDABLE_EVENT_BUFFER` - Event bus capacity per topic (default: 100)
    /// - `HOLDABLE_PEER_ID` - Local peer id (default: 1)
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(rate) = read_env::<u32>(Self::ENV_TICK_RATE) {
            self.tick_rate_hz = rate.max(1);
        }
        if let Some(capacity) = read_env::<usize>(Self::ENV_EVENT_BUFFER) {
            self.event_buffer_size = capacity.max(1);
        }
        if let Some(peer) = read_env::<u64>(Self::ENV_PEER_ID) {
            self.local_peer = PeerId(peer);
        }
        self
    }

    pub fn with_peer(mut self, peer: PeerId) -> Self {
        self.local_peer = peer;
        self
    }

    /// Wall-clock length of one tick.
    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / f64::from(self.tick_rate_hz.max(1)))
    }

    /// Simulation step in seconds.
    pub fn tick_dt(&self) -> f32 {
        1.0 / self.tick_rate_hz.max(1) as f32
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            holdable: HoldableConfig::default(),
            tick_rate_hz: Self::DEFAULT_TICK_RATE_HZ,
            event_buffer_size: Self::DEFAULT_EVENT_BUFFER_SIZE,
            local_peer: Self::DEFAULT_LOCAL_PEER,
        }
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}
