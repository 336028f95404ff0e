#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::sync::Arc;

use p5bridge_gateway::realtime::{HeartbeatMonitor, SessionRegistry};
use tokio::sync::watch;
use tokio::time::{sleep, Duration, Instant};

fn monitor(timeout: Duration) -> (Arc<SessionRegistry>, HeartbeatMonitor) {
    let reg = Arc::new(SessionRegistry::new());
    let mon = HeartbeatMonitor::new(Arc::clone(&reg), timeout, Duration::from_millis(20));
    (reg, mon)
}

#[test]
fn untouched_session_is_evicted_after_timeout() {
    let timeout = Duration::from_secs(30);
    let (reg, mon) = monitor(timeout);
    reg.register("a");

    assert!(mon.sweep_at(Instant::now() + timeout / 2).is_empty());
    assert!(reg.snapshot().contains("a"));

    let evicted = mon.sweep_at(Instant::now() + timeout + Duration::from_millis(1));
    assert_eq!(evicted, vec!["a".to_string()]);
    assert!(!reg.snapshot().contains("a"));
}

#[tokio::test]
async fn touched_session_survives_untouched_one_does_not() {
    let (reg, mon) = monitor(Duration::from_millis(100));
    reg.register("idle");
    reg.register("alive");

    sleep(Duration::from_millis(150)).await;
    assert!(reg.touch("alive"));

    let evicted = mon.sweep();
    assert_eq!(evicted, vec!["idle".to_string()]);
    let snap = reg.snapshot();
    assert!(snap.contains("alive"));
    assert!(!snap.contains("idle"));
}

#[tokio::test]
async fn background_sweep_runs_until_shutdown() {
    let reg = Arc::new(SessionRegistry::new());
    let mon = Arc::new(HeartbeatMonitor::new(
        Arc::clone(&reg),
        Duration::from_millis(30),
        Duration::from_millis(10),
    ));
    let (tx, rx) = watch::channel(false);
    let task = Arc::clone(&mon).spawn(rx);

    reg.register("a");
    sleep(Duration::from_millis(120)).await;
    assert_eq!(reg.count(), 0);

    tx.send_replace(true);
    tokio::time::timeout(Duration::from_secs(1), task)
        .await
        .expect("monitor must stop")
        .unwrap();
}

#[test]
fn empty_registry_sweep_is_quiet() {
    let (_reg, mon) = monitor(Duration::from_secs(1));
    assert!(mon.sweep().is_empty());
}
