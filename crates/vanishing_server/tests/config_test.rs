//! Server configuration loading.

use std::io::Write;
use std::time::Duration;
use tempfile::NamedTempFile;
use vanishing_server::ServerConfig;

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn defaults_match_reference_server() {
    let config = ServerConfig::default();
    assert_eq!(config.host(), "127.0.0.1");
    assert_eq!(*config.port(), 3000);
    assert_eq!(*config.session_config().turn_timeout(), Duration::from_millis(3000));
    assert_eq!(config.socket_addr().unwrap().port(), 3000);
}

#[test]
fn partial_file_keeps_defaults() {
    let file = write_config("port = 8080\n");
    let config = ServerConfig::from_file(file.path()).unwrap();
    assert_eq!(*config.port(), 8080);
    assert_eq!(config.host(), "127.0.0.1");
    assert_eq!(*config.turn_timeout_ms(), 3000);
}

#[test]
fn full_file_overrides_everything() {
    let file = write_config("host = \"0.0.0.0\"\nport = 9000\nturn_timeout_ms = 1500\n");
    let config = ServerConfig::from_file(file.path()).unwrap();
    assert_eq!(config.host(), "0.0.0.0");
    assert_eq!(*config.session_config().turn_timeout(), Duration::from_millis(1500));
}

#[test]
fn zero_timeout_is_rejected() {
    let file = write_config("turn_timeout_ms = 0\n");
    let err = ServerConfig::from_file(file.path()).unwrap_err();
    assert!(err.message.contains("turn_timeout_ms"));
    assert!(ServerConfig::default().with_turn_timeout_ms(0).is_err());
}

#[test]
fn malformed_file_is_an_error() {
    let file = write_config("port = \"not a number\"\n");
    let err = ServerConfig::from_file(file.path()).unwrap_err();
    assert!(err.message.starts_with("Failed to parse config"));
}

#[test]
fn missing_file_falls_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let absent = dir.path().join("absent.toml");
    let config = ServerConfig::load(Some(absent.as_path())).unwrap();
    assert_eq!(config, ServerConfig::default());
    assert_eq!(ServerConfig::load(None).unwrap(), ServerConfig::default());
}

#[test]
fn bad_host_fails_at_bind_address() {
    let config = ServerConfig::default().with_host("not a host");
    assert!(config.socket_addr().is_err());
}
