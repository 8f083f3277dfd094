//! Raspberry Pi GPIO layer: the two team buttons and the two indicator
//! LEDs. Everything above this module talks to traits and channels, so
//! the rest of the crate runs (and tests) without the hardware.

pub mod buttons;
pub mod leds;
pub mod signaling;

pub use buttons::Buttons;
pub use leds::Leds;
pub use signaling::{signal_fatal, FatalKind};

// GPIO pin assignments (BCM numbering)
pub const GPIO_BTN_RED: u8 = 5;
pub const GPIO_BTN_BLUE: u8 = 4;
pub const GPIO_LED_RED: u8 = 19;
pub const GPIO_LED_BLUE: u8 = 18;

// Hardware errors
#[derive(Debug, thiserror::Error)]
pub enum HardwareError {
    #[error("GPIO error: {0}")]
    Gpio(#[from] rppal::gpio::Error),
}
