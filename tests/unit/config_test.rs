//! Tests for configuration validation

use std::collections::HashMap;

use keyed_parking_lot::config::{LaneConfig, SchedulerConfig};
use keyed_parking_lot::core::SchedulerError;

fn lanes(entries: &[(&str, usize)]) -> SchedulerConfig {
    SchedulerConfig {
        lanes: entries
            .iter()
            .map(|(name, limit)| {
                (
                    (*name).to_string(),
                    LaneConfig {
                        concurrency_limit: *limit,
                    },
                )
            })
            .collect(),
    }
}

#[test]
fn test_lane_config_validation() {
    let valid = LaneConfig {
        concurrency_limit: 2,
    };
    assert!(valid.validate().is_ok());
}

#[test]
fn test_lane_config_invalid_limit() {
    let invalid = LaneConfig {
        concurrency_limit: 0,
    };
    assert!(matches!(
        invalid.validate(),
        Err(SchedulerError::InvalidConfig(_))
    ));
}

#[test]
fn test_scheduler_config_validation() {
    let config = lanes(&[("fact_check", 2), ("image_generation", 1)]);
    assert!(config.validate().is_ok());
}

#[test]
fn test_scheduler_config_empty_lanes() {
    let config = SchedulerConfig {
        lanes: HashMap::new(),
    };
    assert!(config.validate().is_err());
}

#[test]
fn test_scheduler_config_names_bad_lane() {
    let config = lanes(&[("fact_check", 2), ("image_generation", 0)]);
    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("image_generation"));
}

#[test]
fn test_scheduler_config_from_json() {
    let json = r#"{
        "lanes": {
            "fact_check": { "concurrency_limit": 2 },
            "image_generation": { "concurrency_limit": 1 }
        }
    }"#;

    let config = SchedulerConfig::from_json_str(json).unwrap();
    assert_eq!(config.lanes.len(), 2);
    assert_eq!(config.lanes["fact_check"].concurrency_limit, 2);
}

#[test]
fn test_scheduler_config_from_json_rejects_missing_limit() {
    let json = r#"{ "lanes": { "fact_check": {} } }"#;
    let err = SchedulerConfig::from_json_str(json).unwrap_err();
    assert!(err.to_string().contains("parse error"));
}

#[test]
fn test_scheduler_config_from_json_rejects_zero_limit() {
    let json = r#"{ "lanes": { "fact_check": { "concurrency_limit": 0 } } }"#;
    assert!(SchedulerConfig::from_json_str(json).is_err());
}

#[test]
fn test_env_var_name() {
    assert_eq!(
        LaneConfig::env_var_name("fact_check"),
        "FACT_CHECK_CONCURRENCY_LIMIT"
    );
    assert_eq!(
        LaneConfig::env_var_name("image-gen"),
        "IMAGE_GEN_CONCURRENCY_LIMIT"
    );
}

// Each env test uses its own lane name so tests can run in parallel.

#[test]
fn test_lane_from_env() {
    std::env::set_var("KPL_TEST_ENV_OK_CONCURRENCY_LIMIT", " 3 ");
    let cfg = LaneConfig::from_env("kpl_test_env_ok").unwrap();
    assert_eq!(cfg.concurrency_limit, 3);
}

#[test]
fn test_lane_from_env_missing_is_error() {
    std::env::remove_var("KPL_TEST_ENV_MISSING_CONCURRENCY_LIMIT");
    let err = LaneConfig::from_env("kpl_test_env_missing").unwrap_err();
    assert!(err.to_string().contains("KPL_TEST_ENV_MISSING_CONCURRENCY_LIMIT"));
}

#[test]
fn test_lane_from_env_unparsable_is_error() {
    std::env::set_var("KPL_TEST_ENV_BAD_CONCURRENCY_LIMIT", "lots");
    assert!(LaneConfig::from_env("kpl_test_env_bad").is_err());
}

#[test]
fn test_lane_from_env_zero_is_error() {
    std::env::set_var("KPL_TEST_ENV_ZERO_CONCURRENCY_LIMIT", "0");
    assert!(LaneConfig::from_env("kpl_test_env_zero").is_err());
}

#[test]
fn test_scheduler_config_from_env() {
    std::env::set_var("KPL_TEST_MULTI_A_CONCURRENCY_LIMIT", "4");
    std::env::set_var("KPL_TEST_MULTI_B_CONCURRENCY_LIMIT", "1");
    let cfg = SchedulerConfig::from_env(["kpl_test_multi_a", "kpl_test_multi_b"]).unwrap();
    assert_eq!(cfg.lanes["kpl_test_multi_a"].concurrency_limit, 4);
    assert_eq!(cfg.lanes["kpl_test_multi_b"].concurrency_limit, 1);
}

#[test]
fn test_scheduler_config_from_env_names_missing_lane() {
    std::env::set_var("KPL_TEST_PARTIAL_OK_CONCURRENCY_LIMIT", "2");
    std::env::remove_var("KPL_TEST_PARTIAL_GONE_CONCURRENCY_LIMIT");
    let err = SchedulerConfig::from_env(["kpl_test_partial_ok", "kpl_test_partial_gone"]).unwrap_err();
    assert!(err.to_string().contains("KPL_TEST_PARTIAL_GONE_CONCURRENCY_LIMIT"));
}
