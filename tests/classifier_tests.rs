//! Press classification: debounce, duration buckets, combined presses
//! and the saturation window.

mod common;
use common::*;

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TryRecvError;

use dominion_node::input::{
    AppEvent, ButtonEdge, ButtonKind, ClassifierHandle, EventDispatcher, InputError,
    InputSettings, PressLength, EDGE_QUEUE_DEPTH,
};

fn spawn_classifier(
    lines: ScriptedLines,
) -> (
    mpsc::Sender<ButtonEdge>,
    mpsc::Receiver<AppEvent>,
    ClassifierHandle,
) {
    let (dispatcher, event_rx) = EventDispatcher::channel(None);
    let (edge_tx, edge_rx) = mpsc::channel(EDGE_QUEUE_DEPTH);
    let handle = ClassifierHandle::spawn(Box::new(lines.clone()), edge_rx, dispatcher, None)
        .expect("lines are idle at spawn");
    (edge_tx, event_rx, handle)
}

#[test]
fn buckets_have_strict_lower_boundaries() {
    let settings = InputSettings::default();

    assert_eq!(settings.classify(Duration::ZERO), PressLength::Short);
    assert_eq!(settings.classify(Duration::from_millis(1999)), PressLength::Short);
    assert_eq!(settings.classify(Duration::from_millis(2000)), PressLength::Medium);
    assert_eq!(settings.classify(Duration::from_millis(3999)), PressLength::Medium);
    assert_eq!(settings.classify(Duration::from_millis(4000)), PressLength::Long);
    assert_eq!(settings.classify(Duration::from_secs(60)), PressLength::Long);
}

#[tokio::test(start_paused = true)]
async fn red_short_press() {
    let lines = ScriptedLines::new();
    let (edge_tx, mut event_rx, _handle) = spawn_classifier(lines.clone());

    lines.hold_red(Duration::from_millis(1500));
    edge_tx.send(ButtonEdge::Red).await.unwrap();

    let event = event_rx.recv().await.unwrap();
    assert_eq!(event, AppEvent::Button(ButtonKind::Red, PressLength::Short));
}

#[tokio::test(start_paused = true)]
async fn blue_medium_press() {
    let lines = ScriptedLines::new();
    let (edge_tx, mut event_rx, _handle) = spawn_classifier(lines.clone());

    // 200ms debounce leaves 2.8s of measured hold.
    lines.hold_blue(Duration::from_millis(3000));
    edge_tx.send(ButtonEdge::Blue).await.unwrap();

    let event = event_rx.recv().await.unwrap();
    assert_eq!(event, AppEvent::Button(ButtonKind::Blue, PressLength::Medium));
}

#[tokio::test(start_paused = true)]
async fn red_long_press() {
    let lines = ScriptedLines::new();
    let (edge_tx, mut event_rx, _handle) = spawn_classifier(lines.clone());

    lines.hold_red(Duration::from_millis(6000));
    edge_tx.send(ButtonEdge::Red).await.unwrap();

    let event = event_rx.recv().await.unwrap();
    assert_eq!(event, AppEvent::Button(ButtonKind::Red, PressLength::Long));
}

#[tokio::test(start_paused = true)]
async fn combined_press_commits_to_both() {
    let lines = ScriptedLines::new();
    let (edge_tx, mut event_rx, _handle) = spawn_classifier(lines.clone());

    // Red stays held far beyond blue; the episode is still BOTH and its
    // window ends when blue releases.
    lines.hold_red(Duration::from_secs(60));
    lines.hold_blue(Duration::from_millis(3100));
    edge_tx.send(ButtonEdge::Red).await.unwrap();

    let event = event_rx.recv().await.unwrap();
    assert_eq!(event, AppEvent::Button(ButtonKind::Both, PressLength::Medium));
}

#[tokio::test(start_paused = true)]
async fn sampling_window_saturates_into_long() {
    let lines = ScriptedLines::new();
    let (edge_tx, mut event_rx, _handle) = spawn_classifier(lines.clone());

    // Held "forever": the 10s cap ends the episode as a long press.
    lines.hold_both(Duration::from_secs(3600));
    edge_tx.send(ButtonEdge::Blue).await.unwrap();

    let event = event_rx.recv().await.unwrap();
    assert_eq!(event, AppEvent::Button(ButtonKind::Both, PressLength::Long));
}

#[tokio::test(start_paused = true)]
async fn one_event_per_episode() {
    let lines = ScriptedLines::new();
    let (edge_tx, mut event_rx, _handle) = spawn_classifier(lines.clone());

    lines.hold_red(Duration::from_millis(1000));
    // Bouncy contact: several edges for the same physical press.
    edge_tx.send(ButtonEdge::Red).await.unwrap();
    edge_tx.send(ButtonEdge::Red).await.unwrap();
    edge_tx.send(ButtonEdge::Red).await.unwrap();

    let event = event_rx.recv().await.unwrap();
    assert_eq!(event, AppEvent::Button(ButtonKind::Red, PressLength::Short));
    assert!(matches!(event_rx.try_recv(), Err(TryRecvError::Empty)));
}

#[tokio::test(start_paused = true)]
async fn release_within_debounce_produces_nothing() {
    let lines = ScriptedLines::new();
    let (edge_tx, mut event_rx, _handle) = spawn_classifier(lines.clone());

    lines.hold_red(Duration::from_millis(50));
    edge_tx.send(ButtonEdge::Red).await.unwrap();

    // A second, real press must still come through.
    tokio::time::sleep(Duration::from_secs(1)).await;
    lines.hold_blue(Duration::from_millis(1000));
    edge_tx.send(ButtonEdge::Blue).await.unwrap();

    let event = event_rx.recv().await.unwrap();
    assert_eq!(event, AppEvent::Button(ButtonKind::Blue, PressLength::Short));
}

#[tokio::test(start_paused = true)]
async fn stuck_button_at_startup_is_fatal() {
    let lines = ScriptedLines::new();
    lines.hold_red(Duration::from_secs(3600));

    let (dispatcher, _event_rx) = EventDispatcher::channel(None);
    let (_edge_tx, edge_rx) = mpsc::channel(EDGE_QUEUE_DEPTH);

    let result = ClassifierHandle::spawn(Box::new(lines), edge_rx, dispatcher, None);
    assert!(matches!(result, Err(InputError::ButtonStuck("RED"))));
}
