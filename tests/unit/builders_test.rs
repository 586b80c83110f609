//! Tests for builder modules

use keyed_parking_lot::builders::build_schedulers;
use keyed_parking_lot::config::SchedulerConfig;
use keyed_parking_lot::core::Scheduler;
use keyed_parking_lot::runtime::TokioSpawner;

const CONFIG: &str = r#"{
    "lanes": {
        "fact_check": { "concurrency_limit": 2 },
        "image_generation": { "concurrency_limit": 1 }
    }
}"#;

#[test]
fn test_build_schedulers_per_lane() {
    let cfg = SchedulerConfig::from_json_str(CONFIG).unwrap();
    let schedulers = build_schedulers::<String, String, _>(&cfg, TokioSpawner::ambient()).unwrap();

    assert_eq!(schedulers.len(), 2);
    assert_eq!(schedulers["fact_check"].concurrency_limit(), 2);
    assert_eq!(schedulers["image_generation"].concurrency_limit(), 1);
    assert_eq!(schedulers["fact_check"].pending(), 0);
}

#[test]
fn test_build_schedulers_rejects_invalid_config() {
    let cfg = SchedulerConfig {
        lanes: std::collections::HashMap::new(),
    };
    let result = build_schedulers::<String, String, _>(&cfg, TokioSpawner::ambient());
    assert!(result.is_err());
}

#[tokio::test]
async fn test_built_lanes_are_independent() {
    let cfg = SchedulerConfig::from_json_str(CONFIG).unwrap();
    let schedulers: std::collections::HashMap<String, Scheduler<String, String, _>> =
        build_schedulers(&cfg, TokioSpawner::try_current().unwrap()).unwrap();

    let fact = schedulers["fact_check"]
        .enqueue("quote-1", || async { Ok("fact".to_string()) })
        .unwrap();
    let image = schedulers["image_generation"]
        .enqueue("quote-1", || async { Ok("image".to_string()) })
        .unwrap();

    assert!(!fact.ptr_eq(&image));
    assert_eq!(fact.await, Ok("fact".to_string()));
    assert_eq!(image.await, Ok("image".to_string()));
}
