// Config loading and validation tests

use cauldron::config::{AppConfig, StrikeTrigger};
use std::path::Path;

const VALID_CONFIG: &str = r#"
[dispatcher]
target_host = "127.0.0.1"
target_port = 9999
interval_ms = 500
status_dir = "/srv/mt5/Common/Files"

[[nodes]]
id = "node_1"
file = "grok_mind_status.json"

[[nodes]]
id = "node_2"
file = "grok_legacy_status.json"

[[nodes]]
id = "node_3"
file = "/abs/grok_overlord_status.json"

[war_chest]
goal = 100000
strike_threshold = 1000.0

[dashboard]
listen_port = 9999
"#;

#[test]
fn test_config_loads_from_str() {
    let config = AppConfig::load_from_str(VALID_CONFIG).expect("load_from_str");
    assert_eq!(config.dispatcher.target_host, "127.0.0.1");
    assert_eq!(config.dispatcher.target_port, 9999);
    assert_eq!(config.dispatcher.interval_ms, 500);
    assert_eq!(config.war_chest.goal, 100_000.0);
    assert_eq!(config.war_chest.strike_threshold, 1000.0);
    assert_eq!(config.dashboard.listen_port, 9999);
}

#[test]
fn test_config_defaults_when_omitted() {
    let config = AppConfig::load_from_str(VALID_CONFIG).expect("valid");
    assert_eq!(config.dispatcher.health_timeout_ms, 1000);
    assert_eq!(config.dispatcher.stats_log_interval_secs, 60);
    assert_eq!(config.war_chest.strike_trigger, StrikeTrigger::Level);
    assert_eq!(config.war_chest.strike_log_capacity, 50);
    assert_eq!(config.war_chest.strike_window, 10);
    assert_eq!(config.dashboard.listen_host, "0.0.0.0");
    assert_eq!(config.dashboard.poll_interval_ms, 10);
    assert_eq!(config.dashboard.render_interval_ms, 100);
    assert!(config.dashboard.log_file.is_none());
}

#[test]
fn test_config_keeps_node_order_and_resolves_paths() {
    let config = AppConfig::load_from_str(VALID_CONFIG).expect("valid");
    let ids: Vec<&str> = config.node_ids().collect();
    assert_eq!(ids, vec!["node_1", "node_2", "node_3"]);
    let paths = config.node_paths();
    assert_eq!(
        paths[0].1,
        Path::new("/srv/mt5/Common/Files/grok_mind_status.json")
    );
    assert_eq!(paths[2].1, Path::new("/abs/grok_overlord_status.json"));
}

#[test]
fn test_config_edge_trigger() {
    let cfg = VALID_CONFIG.replace(
        "strike_threshold = 1000.0",
        "strike_threshold = 1000.0\nstrike_trigger = \"edge\"",
    );
    let config = AppConfig::load_from_str(&cfg).expect("valid");
    assert_eq!(config.war_chest.strike_trigger, StrikeTrigger::Edge);
}

#[test]
fn test_config_validation_rejects_zero_goal() {
    let bad = VALID_CONFIG.replace("goal = 100000", "goal = 0");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("war_chest.goal"));
}

#[test]
fn test_config_validation_rejects_negative_goal() {
    let bad = VALID_CONFIG.replace("goal = 100000", "goal = -5.0");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("war_chest.goal"));
}

#[test]
fn test_config_validation_rejects_negative_threshold() {
    let bad = VALID_CONFIG.replace("strike_threshold = 1000.0", "strike_threshold = -1.0");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("strike_threshold"));
}

#[test]
fn test_config_validation_rejects_invalid_target_port() {
    let bad = VALID_CONFIG.replace("target_port = 9999", "target_port = 0");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("dispatcher.target_port"));
}

#[test]
fn test_config_validation_rejects_invalid_listen_port() {
    let bad = VALID_CONFIG.replace("listen_port = 9999", "listen_port = 0");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("dashboard.listen_port"));
}

#[test]
fn test_config_validation_rejects_interval_zero() {
    let bad = VALID_CONFIG.replace("interval_ms = 500", "interval_ms = 0");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("interval_ms"));
}

#[test]
fn test_config_validation_rejects_duplicate_node_ids() {
    let bad = VALID_CONFIG.replace("id = \"node_2\"", "id = \"node_1\"");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("unique"));
}

#[test]
fn test_config_validation_rejects_window_over_capacity() {
    let bad = VALID_CONFIG.replace(
        "strike_threshold = 1000.0",
        "strike_threshold = 1000.0\nstrike_log_capacity = 5\nstrike_window = 10",
    );
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("strike_log_capacity"));
}

#[test]
fn test_config_validation_rejects_missing_nodes() {
    let start = VALID_CONFIG.find("[[nodes]]").unwrap();
    let end = VALID_CONFIG.find("[war_chest]").unwrap();
    let bad = format!(
        "nodes = []\n{}{}",
        &VALID_CONFIG[..start],
        &VALID_CONFIG[end..]
    );
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("at least one node"));
}

#[test]
fn test_config_validation_rejects_invalid_toml() {
    let err = AppConfig::load_from_str("not valid toml [[[").unwrap_err();
    assert!(!err.to_string().is_empty());
}

#[test]
fn test_config_load_from_file_via_env() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, VALID_CONFIG).unwrap();
    unsafe { std::env::set_var("CONFIG_FILE", path.to_str().unwrap()) };
    let result = AppConfig::load();
    unsafe { std::env::remove_var("CONFIG_FILE") };
    let config = result.expect("load from CONFIG_FILE");
    assert_eq!(config.nodes.len(), 3);
    assert_eq!(config.dispatcher.target_port, 9999);
}
