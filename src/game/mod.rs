//! Game subsystem: the central controller of the node.
//!
//! ```text
//! Buttons ──► Classifier ──► Dispatcher ──► GameMachine ──► Presenter
//!             (edges)        (AppEvent)     (transitions)   (LEDs/display)
//! ```
//!
//! The machine task is the sole owner of the game state, both team
//! chronometers and the settings values; everything else observes it
//! through watch snapshots or talks to it through channels.

pub mod chrono;
pub mod machine;
pub mod settings;

pub use chrono::Chronometer;
pub use machine::{GameHandle, GameMachine, GameSettings, GameState, GameStatus, Team};
pub use settings::{ControlPoint, Setting, SettingKind, SettingsMenu};

// Game errors
#[derive(Debug, thiserror::Error)]
pub enum GameError {
    #[error("Command rejected in state {0:?}")]
    InvalidState(machine::GameState),

    #[error("Game task is not running")]
    ChannelClosed,
}
