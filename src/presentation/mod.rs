//! Presentation boundary: team indicator LEDs, the two elapsed-time
//! displays and the audible feedback patterns.
//!
//! The core fires commands at a bounded channel and never waits for the
//! outcome; a worker task drains them, drives the indicator LEDs and
//! logs the display/buzzer renders (the physical 7-segment and buzzer
//! drivers live outside this crate).

use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::time::interval;
use tracing::{debug, info, trace, warn};

use crate::game::machine::{GameState, GameStatus, Team};
use crate::hardware::Leds;

/// Named audible/visual feedback patterns the device can play.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackPattern {
    Hello,
    Ok,
    Switch,
    Finish,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PresentationCommand {
    Indicator { team: Team, on: bool },
    AllIndicators { on: bool },
    Time { team: Team, seconds: u32 },
    Label { team: Team, text: &'static str },
    Feedback(FeedbackPattern),
}

/// Fire-and-forget sender for presentation commands. Cloned freely; a
/// full queue drops the command with a log line, it never blocks the
/// caller.
#[derive(Clone, Debug)]
pub struct Presenter {
    tx: mpsc::Sender<PresentationCommand>,
}

impl Presenter {
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<PresentationCommand>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self { tx }, rx)
    }

    fn push(&self, command: PresentationCommand) {
        if let Err(e) = self.tx.try_send(command) {
            debug!("Presentation queue full, dropping command: {e}");
        }
    }

    pub fn indicator(&self, team: Team, on: bool) {
        self.push(PresentationCommand::Indicator { team, on });
    }

    pub fn all_indicators(&self, on: bool) {
        self.push(PresentationCommand::AllIndicators { on });
    }

    pub fn time(&self, team: Team, seconds: u32) {
        self.push(PresentationCommand::Time { team, seconds });
    }

    pub fn label(&self, team: Team, text: &'static str) {
        self.push(PresentationCommand::Label { team, text });
    }

    pub fn feedback(&self, pattern: FeedbackPattern) {
        self.push(PresentationCommand::Feedback(pattern));
    }
}

/// Drain presentation commands. Indicators go to the LEDs when they are
/// available; everything else is logged at the boundary.
pub async fn run_presentation_loop(
    mut rx: mpsc::Receiver<PresentationCommand>,
    mut leds: Option<Leds>,
) {
    info!("Presentation worker started");

    while let Some(command) = rx.recv().await {
        match command {
            PresentationCommand::Indicator { team, on } => {
                debug!("Indicator {:?} {}", team, if on { "on" } else { "off" });
                if let Some(leds) = leds.as_mut() {
                    leds.set(team, on);
                }
            }
            PresentationCommand::AllIndicators { on } => {
                debug!("All indicators {}", if on { "on" } else { "off" });
                if let Some(leds) = leds.as_mut() {
                    leds.set_all(on);
                }
            }
            PresentationCommand::Time { team, seconds } => {
                trace!("Display {:?}: {:02}:{:02}", team, seconds / 60, seconds % 60);
            }
            PresentationCommand::Label { team, text } => {
                debug!("Display {:?}: {text}", team);
            }
            PresentationCommand::Feedback(pattern) => {
                info!("Feedback pattern {:?}", pattern);
            }
        }
    }

    warn!("Presentation channel closed, worker stopping");
}

/// Low-priority display refresh: re-render both teams' elapsed time from
/// the latest status snapshot. Staleness of one tick is expected and
/// fine.
pub async fn run_display_refresh(
    status_rx: watch::Receiver<GameStatus>,
    presenter: Presenter,
    period: Duration,
) {
    let mut ticker = interval(period);
    info!("Display refresh task started ({}ms period)", period.as_millis());

    loop {
        ticker.tick().await;
        let status = status_rx.borrow().clone();
        match status.state {
            GameState::Idle
            | GameState::RunningRed
            | GameState::RunningBlue
            | GameState::Finished => {
                presenter.time(Team::Red, status.red.elapsed_seconds());
                presenter.time(Team::Blue, status.blue.elapsed_seconds());
            }
            GameState::Init | GameState::Settings => {}
        }
    }
}
