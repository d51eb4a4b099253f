//! Loading indicator driven by real navigations.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;

use rauta::config::RautaConfig;
use rauta::indicator::{IndicatorDriver, IndicatorState};
use rauta::navigation::{MemoryHistory, NavigationOutcome, Router};

mod common;
use common::{table, url, CountingClient, RenderLog};

fn config() -> RautaConfig {
    let mut config = RautaConfig::default();
    config.indicator.min_visible_ms = 100;
    config.indicator.fade_ms = 200;
    config
}

#[tokio::test(start_paused = true)]
async fn test_cancelled_navigation_still_returns_to_idle() {
    let client = CountingClient::new();
    let router = Router::start(
        table(&[("x", "/x"), ("y", "/y")], &RenderLog::default()),
        Arc::new(client.clone()),
        MemoryHistory::new(url("/")),
        &config(),
    )
    .unwrap();

    let (stop_tx, stop_rx) = broadcast::channel(1);
    let driver = tokio::spawn(IndicatorDriver::new(router.indicator()).run(stop_rx));
    let mut states = router.indicator().subscribe();

    let nested = router.clone();
    client.set_hook(move |_, variables| {
        if variables["route"] == "x" {
            nested.goto("/y").unwrap();
        }
    });
    assert_eq!(router.goto("/x").unwrap(), NavigationOutcome::Superseded);
    client.clear_hook();
    assert_eq!(router.indicator().state(), IndicatorState::Settling);

    tokio::time::sleep(Duration::from_millis(301)).await;
    assert_eq!(router.indicator().state(), IndicatorState::Idle);
    states.changed().await.unwrap();
    assert_eq!(*states.borrow(), IndicatorState::Idle);

    stop_tx.send(()).unwrap();
    driver.await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_navigation_during_fade_restarts_the_bar() {
    let router = Router::start(
        table(&[("x", "/x"), ("y", "/y")], &RenderLog::default()),
        Arc::new(CountingClient::new()),
        MemoryHistory::new(url("/")),
        &config(),
    )
    .unwrap();
    let (stop_tx, stop_rx) = broadcast::channel(1);
    let driver = tokio::spawn(IndicatorDriver::new(router.indicator()).run(stop_rx));

    assert_eq!(router.indicator().state(), IndicatorState::Idle);
    router.goto("/x").unwrap();
    assert_eq!(router.indicator().state(), IndicatorState::Settling);

    tokio::time::sleep(Duration::from_millis(150)).await;
    router.goto("/y").unwrap();

    // The second navigation settled at t=150, so the bar is visible until
    // t=250 and gone at t=450.
    tokio::time::sleep(Duration::from_millis(250)).await;
    assert_eq!(router.indicator().state(), IndicatorState::Settling);
    tokio::time::sleep(Duration::from_millis(60)).await;
    assert_eq!(router.indicator().state(), IndicatorState::Idle);

    stop_tx.send(()).unwrap();
    driver.await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_bar_geometry_follows_the_fade() {
    let client = CountingClient::new();
    let router = Router::start(
        table(&[("x", "/x")], &RenderLog::default()),
        Arc::new(client.clone()),
        MemoryHistory::new(url("/")),
        &config(),
    )
    .unwrap();
    let (stop_tx, stop_rx) = broadcast::channel(1);
    let driver = tokio::spawn(IndicatorDriver::new(router.indicator()).run(stop_rx));

    let indicator = router.indicator();
    assert_eq!(indicator.progress(), 0.0);
    assert_eq!(indicator.opacity(), 0.0);

    // Seen from inside the match: shown, not finished.
    let during = router.indicator();
    client.set_hook(move |_, _| {
        assert_eq!(during.state(), IndicatorState::Pending);
        assert_eq!(during.opacity(), 1.0);
        assert!(during.progress() < 0.9);
    });
    router.goto("/x").unwrap();
    client.clear_hook();

    // Settled at t=0: full width until t=100, faded out by t=300.
    assert_eq!(indicator.progress(), 1.0);
    assert_eq!(indicator.opacity(), 1.0);

    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(indicator.state(), IndicatorState::Settling);
    assert!((indicator.opacity() - 0.5).abs() < 1e-6);

    tokio::time::sleep(Duration::from_millis(101)).await;
    assert_eq!(indicator.state(), IndicatorState::Idle);
    assert_eq!(indicator.opacity(), 0.0);

    stop_tx.send(()).unwrap();
    driver.await.unwrap();
}
