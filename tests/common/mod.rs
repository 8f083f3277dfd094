//! Shared mocks for the integration tests.

#![allow(dead_code)]

use std::io;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::Instant;

use dominion_node::game::machine::{GameState, GameStatus};
use dominion_node::game::settings::ControlPoint;
use dominion_node::input::ButtonLines;
use dominion_node::persistence::{SettingsStore, StorageError};

/// In-memory settings store. Clones share the same values so a test can
/// hand one clone to the machine and inspect the other afterwards.
#[derive(Clone)]
pub struct MemoryStore {
    inner: Arc<Mutex<(ControlPoint, bool)>>,
    fail_loads: bool,
}

impl MemoryStore {
    pub fn new(control_point: ControlPoint, beep: bool) -> Self {
        Self {
            inner: Arc::new(Mutex::new((control_point, beep))),
            fail_loads: false,
        }
    }

    /// A store whose loads always fail, for fallback-path tests.
    pub fn failing() -> Self {
        Self {
            inner: Arc::new(Mutex::new((ControlPoint::Echo, false))),
            fail_loads: true,
        }
    }

    pub fn control_point(&self) -> ControlPoint {
        self.inner.lock().unwrap().0
    }

    pub fn beep(&self) -> bool {
        self.inner.lock().unwrap().1
    }
}

impl SettingsStore for MemoryStore {
    fn load_control_point(&self) -> Result<ControlPoint, StorageError> {
        if self.fail_loads {
            return Err(StorageError::Io(io::Error::new(
                io::ErrorKind::NotFound,
                "no stored settings",
            )));
        }
        Ok(self.inner.lock().unwrap().0)
    }

    fn save_control_point(&self, control_point: ControlPoint) -> Result<(), StorageError> {
        self.inner.lock().unwrap().0 = control_point;
        Ok(())
    }

    fn load_beep(&self) -> Result<bool, StorageError> {
        if self.fail_loads {
            return Err(StorageError::Io(io::Error::new(
                io::ErrorKind::NotFound,
                "no stored settings",
            )));
        }
        Ok(self.inner.lock().unwrap().1)
    }

    fn save_beep(&self, beep: bool) -> Result<(), StorageError> {
        self.inner.lock().unwrap().1 = beep;
        Ok(())
    }
}

/// Button lines whose hold windows are scripted against the (paused)
/// tokio clock: a line reads as held until its deadline passes.
#[derive(Clone, Default)]
pub struct ScriptedLines {
    red_until: Arc<Mutex<Option<Instant>>>,
    blue_until: Arc<Mutex<Option<Instant>>>,
}

impl ScriptedLines {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hold_red(&self, duration: Duration) {
        *self.red_until.lock().unwrap() = Some(Instant::now() + duration);
    }

    pub fn hold_blue(&self, duration: Duration) {
        *self.blue_until.lock().unwrap() = Some(Instant::now() + duration);
    }

    pub fn hold_both(&self, duration: Duration) {
        self.hold_red(duration);
        self.hold_blue(duration);
    }
}

fn held(until: &Mutex<Option<Instant>>) -> bool {
    until
        .lock()
        .unwrap()
        .map(|deadline| Instant::now() < deadline)
        .unwrap_or(false)
}

impl ButtonLines for ScriptedLines {
    fn red_held(&self) -> bool {
        held(&self.red_until)
    }

    fn blue_held(&self) -> bool {
        held(&self.blue_until)
    }
}

/// Block until the game task publishes the wanted state.
pub async fn until_state(status_rx: &mut watch::Receiver<GameStatus>, wanted: GameState) {
    while status_rx.borrow().state != wanted {
        status_rx
            .changed()
            .await
            .expect("game task stopped before reaching the expected state");
    }
}
