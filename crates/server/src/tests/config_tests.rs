use super::*;

use std::collections::HashMap;

fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| map.get(key).cloned()
}

#[test]
fn requires_ufo_address() {
    let err = settings_from_sources("ufo.toml", None, env_from(&[])).expect_err("missing");
    assert!(matches!(err, ConfigError::Missing("UFO_ADDRESS")));
}

#[test]
fn empty_ufo_address_is_missing() {
    let err = settings_from_sources("ufo.toml", None, env_from(&[("UFO_ADDRESS", "  ")]))
        .expect_err("missing");
    assert!(matches!(err, ConfigError::Missing("UFO_ADDRESS")));
}

#[test]
fn blank_ufo_address_in_env_does_not_fall_back_to_file() {
    let err = settings_from_sources(
        "ufo.toml",
        Some(r#"ufo_address = "10.0.0.5""#),
        env_from(&[("UFO_ADDRESS", "")]),
    )
    .expect_err("blank env address");
    assert!(matches!(err, ConfigError::Missing("UFO_ADDRESS")));
}

#[test]
fn defaults_apply_when_only_address_is_set() {
    let settings =
        settings_from_sources("ufo.toml", None, env_from(&[("UFO_ADDRESS", "ufo.local")]))
            .expect("settings");
    assert_eq!(settings.ufo_address.as_str(), "ufo.local");
    assert_eq!(settings.bind_addr(), "0.0.0.0:8080");
    assert_eq!(settings.timeout, Duration::from_secs(10));
    assert_eq!(settings.ring_policy, RingPolicy::StageDerived);
    assert_eq!(settings.max_event_bytes, 65536);
}

#[test]
fn environment_overrides_file() {
    let file = r#"
        ufo_address = "10.0.0.5"
        port = 9000
        ring_policy = "legacy"
        timeout_secs = 3
    "#;
    let settings = settings_from_sources(
        "ufo.toml",
        Some(file),
        env_from(&[("UFO_ADDRESS", "10.0.0.6:81"), ("PORT", "")]),
    )
    .expect("settings");
    assert_eq!(settings.ufo_address.as_str(), "10.0.0.6:81");
    assert_eq!(settings.port, 9000);
    assert_eq!(settings.ring_policy, RingPolicy::Legacy);
    assert_eq!(settings.timeout, Duration::from_secs(3));
}

#[test]
fn rejects_unparseable_values() {
    let err = settings_from_sources(
        "ufo.toml",
        None,
        env_from(&[("UFO_ADDRESS", "ufo.local"), ("PORT", "eighty")]),
    )
    .expect_err("invalid port");
    assert!(matches!(err, ConfigError::Invalid { key: "PORT", .. }));

    let err = settings_from_sources(
        "ufo.toml",
        None,
        env_from(&[("UFO_ADDRESS", "ufo.local"), ("UFO_RING_POLICY", "sideways")]),
    )
    .expect_err("invalid policy");
    assert!(matches!(err, ConfigError::Invalid { key: "UFO_RING_POLICY", .. }));

    let err = settings_from_sources(
        "ufo.toml",
        None,
        env_from(&[("UFO_ADDRESS", "ufo.local"), ("UFO_TIMEOUT_SECS", "0")]),
    )
    .expect_err("zero timeout");
    assert!(matches!(err, ConfigError::Invalid { key: "UFO_TIMEOUT_SECS", .. }));
}

#[test]
fn rejects_broken_settings_file() {
    let err = settings_from_sources("ufo.toml", Some("ufo_address = "), env_from(&[]))
        .expect_err("bad toml");
    assert!(matches!(err, ConfigError::File { .. }));
}
