//! Tests for API-facing observability models

use keyed_parking_lot::config::SchedulerConfig;
use keyed_parking_lot::core::{Scheduler, SchedulerSnapshot};
use keyed_parking_lot::runtime::{list_lanes, queue_position, snapshot, KeyState, QueuePosition};

#[tokio::test]
async fn test_queue_position_report() {
    let scheduler = Scheduler::<String, String, _>::new(1).unwrap();
    let (release_tx, release_rx) = tokio::sync::oneshot::channel::<()>();

    let running = scheduler
        .enqueue("running", move || async move {
            let _ = release_rx.await;
            Ok(String::new())
        })
        .unwrap();
    let waiting = scheduler
        .enqueue("waiting", || async { Ok(String::new()) })
        .unwrap();

    let report = queue_position(&scheduler, "waiting");
    assert_eq!(
        report,
        QueuePosition {
            key: "waiting".to_string(),
            position: 1,
            state: KeyState::Waiting,
        }
    );
    assert_eq!(queue_position(&scheduler, "running").state, KeyState::Running);
    assert_eq!(queue_position(&scheduler, "nope").position, -1);

    assert_eq!(
        snapshot(&scheduler),
        SchedulerSnapshot {
            concurrency_limit: 1,
            pending: 1,
            active: 1,
        }
    );

    release_tx.send(()).unwrap();
    running.await.unwrap();
    waiting.await.unwrap();
}

#[test]
fn test_queue_position_serializes() {
    let report = QueuePosition {
        key: "fact-check:7".to_string(),
        position: 3,
        state: KeyState::Waiting,
    };
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(
        json,
        serde_json::json!({ "key": "fact-check:7", "position": 3, "state": "waiting" })
    );
}

#[test]
fn test_list_lanes_sorted() {
    let cfg = SchedulerConfig::from_json_str(
        r#"{ "lanes": {
            "image_generation": { "concurrency_limit": 1 },
            "fact_check": { "concurrency_limit": 2 }
        } }"#,
    )
    .unwrap();

    let lanes = list_lanes(&cfg);
    assert_eq!(lanes.len(), 2);
    assert_eq!(lanes[0].name, "fact_check");
    assert_eq!(lanes[0].concurrency_limit, 2);
    assert_eq!(lanes[1].name, "image_generation");
}
