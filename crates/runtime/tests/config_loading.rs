use holdable_core::{FloatPrecision, HoldableConfig, PeerId};
use holdable_runtime::{SessionConfig, SessionError};

fn write_config(contents: &str) -> (tempfile::TempDir, std::path::PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.toml");
    std::fs::write(&path, contents).unwrap();
    (dir, path)
}

#[test]
fn loads_overrides_and_keeps_defaults() {
    let (_dir, path) = write_config(
        r#"
tick_rate_hz = 30
local_peer = 7

[holdable]
drop_distance = 2.0
rest_required_ticks = 10
hand_exit_precision = { Fixed = 2 }
"#,
    );

    let config = SessionConfig::load(&path).unwrap();

    assert_eq!(config.tick_rate_hz, 30);
    assert_eq!(config.local_peer, PeerId(7));
    assert_eq!(config.event_buffer_size, SessionConfig::DEFAULT_EVENT_BUFFER_SIZE);
    assert_eq!(config.holdable.drop_distance, 2.0);
    assert_eq!(config.holdable.rest_required_ticks, 10);
    assert_eq!(config.holdable.hand_exit_precision, FloatPrecision::Fixed(2));
    assert_eq!(
        config.holdable.placement_distance,
        HoldableConfig::DEFAULT_PLACEMENT_DISTANCE
    );
}

#[test]
fn empty_file_is_all_defaults() {
    let (_dir, path) = write_config("");
    assert_eq!(SessionConfig::load(&path).unwrap(), SessionConfig::default());
}

#[test]
fn malformed_toml_is_a_parse_error() {
    let (_dir, path) = write_config("tick_rate_hz = \"fast\"");
    let err = SessionConfig::load(&path).unwrap_err();
    assert!(matches!(err, SessionError::ConfigParse { .. }));
    assert_eq!(err.code(), "SESSION_CONFIG_PARSE");
}

#[test]
fn missing_file_is_a_read_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = SessionConfig::load(&dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, SessionError::ConfigRead { .. }));
}

#[test]
fn environment_overrides_file_values() {
    let (_dir, path) = write_config("tick_rate_hz = 30\nevent_buffer_size = 8\n");

    // SAFETY: this is the only test in the binary that touches these variables.
    unsafe {
        std::env::set_var(SessionConfig::ENV_TICK_RATE, "120");
        std::env::set_var(SessionConfig::ENV_PEER_ID, "42");
        std::env::set_var(SessionConfig::ENV_EVENT_BUFFER, "not-a-number");
    }

    let config = SessionConfig::load(&path).unwrap().with_env_overrides();

    unsafe {
        std::env::remove_var(SessionConfig::ENV_TICK_RATE);
        std::env::remove_var(SessionConfig::ENV_PEER_ID);
        std::env::remove_var(SessionConfig::ENV_EVENT_BUFFER);
    }

    assert_eq!(config.tick_rate_hz, 120);
    assert_eq!(config.local_peer, PeerId(42));
    assert_eq!(config.event_buffer_size, 8);
}
