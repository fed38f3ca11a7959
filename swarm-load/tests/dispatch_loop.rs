use std::sync::Arc;
use std::time::Duration;

use swarm_core::SensorId;
use swarm_load::{Dispatcher, GenerateConfig, MockTransport, SimulatedSensor};
use tokio_util::sync::CancellationToken;

fn test_ranges() -> GenerateConfig {
    GenerateConfig {
        temperature_min: 15.0,
        temperature_max: 30.0,
        humidity_min: 30.0,
        humidity_max: 70.0,
        fault_ratio: 0.0,
    }
}

fn fleet(count: u8) -> Vec<SimulatedSensor> {
    let ids: Vec<SensorId> = (1..=count).map(SensorId).collect();
    SimulatedSensor::fleet(&ids, test_ranges())
}

#[tokio::test]
async fn oneshot_reports_one_outcome_per_sensor() {
    let mock = Arc::new(MockTransport::ok());
    let dispatcher = Dispatcher::new(mock.clone(), fleet(25), 5);

    let summary = dispatcher
        .run_oneshot(8, Duration::ZERO, CancellationToken::new())
        .await;

    assert_eq!(summary.attempts, 25);
    assert_eq!(summary.successes, 25);
    assert_eq!(summary.failures, 0);
    assert_eq!(summary.success_rate(), 1.0);

    let sent = mock.sent();
    assert_eq!(sent.len(), 25);
    for payload in sent {
        assert_eq!(payload.len(), 4 + 5 * 15);
    }
}

#[tokio::test]
async fn oneshot_counts_failures_without_aborting() {
    let mock = Arc::new(MockTransport::ok().script([500, 503]));
    let dispatcher = Dispatcher::new(mock.clone(), fleet(5), 2);

    let summary = dispatcher
        .run_oneshot(5, Duration::ZERO, CancellationToken::new())
        .await;

    assert_eq!(summary.attempts, 5);
    assert_eq!(summary.failures, 2);
    assert_eq!(summary.successes, 3);
    assert_eq!(mock.sent_count(), 5);
}

#[tokio::test]
async fn oneshot_respects_in_flight_bound() {
    let mock = Arc::new(MockTransport::ok().with_latency(Duration::from_millis(30)));
    let dispatcher = Dispatcher::new(mock.clone(), fleet(16), 1);

    let summary = dispatcher
        .run_oneshot(3, Duration::ZERO, CancellationToken::new())
        .await;

    assert_eq!(summary.attempts, 16);
    assert!(
        mock.max_in_flight_seen() <= 3,
        "saw {} concurrent sends",
        mock.max_in_flight_seen()
    );
}

#[tokio::test]
async fn oneshot_cancelled_before_sending_produces_no_outcomes() {
    let mock = Arc::new(MockTransport::ok());
    let dispatcher = Dispatcher::new(mock.clone(), fleet(10), 2);

    let cancel = CancellationToken::new();
    cancel.cancel();

    let summary = dispatcher
        .run_oneshot(10, Duration::from_secs(1), cancel)
        .await;

    assert_eq!(summary.attempts, 0);
    assert_eq!(mock.sent_count(), 0);
}

#[tokio::test]
async fn periodic_stops_promptly_on_cancel() {
    let mock = Arc::new(MockTransport::ok());
    let dispatcher = Dispatcher::new(mock.clone(), fleet(3), 2);

    let cancel = CancellationToken::new();
    let run = tokio::spawn({
        let cancel = cancel.clone();
        async move {
            dispatcher
                .run_periodic(Duration::from_secs(60), Duration::ZERO, cancel)
                .await
        }
    });

    // every sensor sends once right away, then parks on a 60s interval
    tokio::time::sleep(Duration::from_millis(300)).await;
    cancel.cancel();

    let summary = tokio::time::timeout(Duration::from_secs(2), run)
        .await
        .expect("periodic loops must stop within one sleep interval")
        .unwrap();

    assert_eq!(summary.attempts, 3);
    assert_eq!(summary.successes, 3);
}

#[tokio::test]
async fn periodic_keeps_sending_each_interval() {
    let mock = Arc::new(MockTransport::ok());
    let dispatcher = Dispatcher::new(mock.clone(), fleet(2), 1);

    let cancel = CancellationToken::new();
    let run = tokio::spawn({
        let cancel = cancel.clone();
        async move {
            dispatcher
                .run_periodic(Duration::from_millis(50), Duration::ZERO, cancel)
                .await
        }
    });

    tokio::time::sleep(Duration::from_millis(240)).await;
    cancel.cancel();

    let summary = tokio::time::timeout(Duration::from_secs(2), run)
        .await
        .expect("periodic loops must stop after cancel")
        .unwrap();

    // ~5 cycles per sensor in 240ms; be generous to avoid scheduler flakes
    assert!(
        summary.attempts >= 4,
        "expected repeated sends, got {}",
        summary.attempts
    );
    assert_eq!(summary.failures, 0);
}
