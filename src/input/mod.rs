//! Button input subsystem.
//!
//! The interrupt layer pushes raw edge tokens into a small bounded
//! channel; the classifier task debounces, samples the line levels and
//! turns each press episode into exactly one classified [`AppEvent`] on
//! the dispatcher queue.

pub mod classifier;
pub mod dispatcher;
pub mod event;

pub use classifier::ClassifierHandle;
pub use dispatcher::EventDispatcher;
pub use event::{AppEvent, ButtonKind, InputSettings, PressLength};

/// Capacity of the edge-notification channel. Edges only arm the
/// classifier, they carry no data, so a handful of slots is plenty.
pub const EDGE_QUEUE_DEPTH: usize = 8;

/// Raw edge notification from the interrupt layer. The producing context
/// only ever `try_send`s these; a full channel means the classifier is
/// already armed and the token can be dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonEdge {
    Red,
    Blue,
}

/// Level access to the two debounced button lines. Implemented by the
/// GPIO layer on the device and by scripted mocks in tests.
pub trait ButtonLines: Send + 'static {
    fn red_held(&self) -> bool;
    fn blue_held(&self) -> bool;
}

// Input errors
#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("Button {0} is pressed at startup or damaged")]
    ButtonStuck(&'static str),
}
