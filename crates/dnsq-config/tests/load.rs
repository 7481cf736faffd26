//! Loading configuration files from disk.

use std::io::Write;
use std::net::Ipv4Addr;

use dnsq_config::{Config, ConfigError, TransportKind};
use tempfile::Builder;

fn write_config(suffix: &str, contents: &str) -> tempfile::NamedTempFile {
    let mut file = Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_load_yaml() {
    let file = write_config(
        ".yaml",
        "resolver:\n  server: 1.1.1.1\n  timeout_ms: 2500\n  transport: raw\n  source_address: 192.0.2.7\n",
    );

    let config = Config::from_file(file.path()).unwrap();
    assert_eq!(config.resolver.server, Ipv4Addr::new(1, 1, 1, 1));
    assert_eq!(config.resolver.timeout_ms, 2500);
    assert_eq!(config.resolver.transport, TransportKind::Raw);
    assert_eq!(config.resolver.source_address, Some(Ipv4Addr::new(192, 0, 2, 7)));
    assert_eq!(config.resolver.port, 53);
    assert!(config.validate().is_ok());
}

#[test]
fn test_load_toml() {
    let file = write_config(
        ".toml",
        "[resolver]\nport = 5353\nrecursion_desired = false\n\n[logging]\nlevel = \"debug\"\n",
    );

    let config = Config::from_file(file.path()).unwrap();
    assert_eq!(config.resolver.port, 5353);
    assert!(!config.resolver.recursion_desired);
    assert_eq!(config.logging.level, "debug");
}

#[test]
fn test_load_json() {
    let file = write_config(".json", r#"{"resolver": {"max_response_size": 1232}}"#);

    let config = Config::from_file(file.path()).unwrap();
    assert_eq!(config.resolver.max_response_size, 1232);
    assert_eq!(config.logging.format, "text");
}

#[test]
fn test_unknown_transport_is_a_parse_error() {
    let file = write_config(".yaml", "resolver:\n  transport: carrier-pigeon\n");
    assert!(matches!(
        Config::from_file(file.path()),
        Err(ConfigError::Yaml(_))
    ));
}

#[test]
fn test_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.yaml");
    assert!(matches!(
        Config::from_file(&path),
        Err(ConfigError::NotFound(p)) if p == path
    ));
}
