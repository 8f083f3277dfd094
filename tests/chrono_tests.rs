//! Chronometer behavior under a paused tokio clock.

use std::time::Duration;

use tokio::time::advance;

use dominion_node::game::chrono::Chronometer;

#[tokio::test(start_paused = true)]
async fn accumulates_only_while_running() {
    let mut chrono = Chronometer::new();

    chrono.start();
    advance(Duration::from_secs(5)).await;
    chrono.stop();
    assert_eq!(chrono.elapsed(), Duration::from_secs(5));

    // Frozen while stopped.
    advance(Duration::from_secs(3)).await;
    assert_eq!(chrono.elapsed(), Duration::from_secs(5));
}

#[tokio::test(start_paused = true)]
async fn start_while_running_is_a_no_op() {
    let mut chrono = Chronometer::new();

    chrono.start();
    advance(Duration::from_secs(2)).await;
    chrono.start();
    advance(Duration::from_secs(3)).await;
    chrono.stop();

    assert_eq!(chrono.elapsed(), Duration::from_secs(5));
}

#[tokio::test(start_paused = true)]
async fn stop_while_stopped_is_a_no_op() {
    let mut chrono = Chronometer::new();
    chrono.stop();
    assert_eq!(chrono.elapsed(), Duration::ZERO);
    assert!(!chrono.is_running());
}

#[tokio::test(start_paused = true)]
async fn pause_and_resume_accumulates() {
    let mut chrono = Chronometer::new();

    chrono.start();
    advance(Duration::from_secs(2)).await;
    chrono.stop();

    advance(Duration::from_secs(7)).await;

    chrono.start();
    advance(Duration::from_secs(3)).await;
    chrono.stop();

    assert_eq!(chrono.elapsed(), Duration::from_secs(5));
}

#[tokio::test(start_paused = true)]
async fn reset_while_running_counts_from_zero() {
    let mut chrono = Chronometer::new();

    chrono.start();
    advance(Duration::from_secs(3)).await;
    chrono.reset();

    assert!(chrono.is_running());
    advance(Duration::from_secs(2)).await;
    assert_eq!(chrono.elapsed(), Duration::from_secs(2));
}

#[tokio::test(start_paused = true)]
async fn reset_while_stopped_zeroes() {
    let mut chrono = Chronometer::new();

    chrono.start();
    advance(Duration::from_secs(3)).await;
    chrono.stop();
    chrono.reset();

    assert!(!chrono.is_running());
    assert_eq!(chrono.elapsed(), Duration::ZERO);
}

#[tokio::test(start_paused = true)]
async fn elapsed_seconds_rounds_down() {
    let mut chrono = Chronometer::new();

    chrono.start();
    advance(Duration::from_millis(999)).await;
    assert_eq!(chrono.elapsed_seconds(), 0);

    advance(Duration::from_millis(501)).await;
    assert_eq!(chrono.elapsed_seconds(), 1);
}
