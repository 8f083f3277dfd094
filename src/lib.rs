//! Control core of the Dominion Node, a battery-powered field unit for a
//! two-team timed-capture game. Physical buttons start and stop per-team
//! stopwatches; a state machine drives the device from boot through idle,
//! active timing, match end and a configuration mode.

pub mod game;
pub mod hardware;
pub mod input;
pub mod persistence;
pub mod presentation;
