use rppal::gpio::{Gpio, InputPin, Trigger};
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::hardware::{HardwareError, GPIO_BTN_BLUE, GPIO_BTN_RED};
use crate::input::{ButtonEdge, ButtonLines};

/// The two team buttons: pulled-up inputs, active low, with falling-edge
/// interrupts.
///
/// The interrupt callbacks run on rppal's poll thread and only ever
/// `try_send` an edge token; they never block and never touch any other
/// state. Level sampling for debounce/duration happens in the classifier
/// task through [`ButtonLines`].
pub struct Buttons {
    red: InputPin,
    blue: InputPin,
}

impl Buttons {
    pub fn new(edge_tx: mpsc::Sender<ButtonEdge>) -> Result<Self, HardwareError> {
        let gpio = Gpio::new()?;

        let mut red = gpio.get(GPIO_BTN_RED)?.into_input_pullup();
        let mut blue = gpio.get(GPIO_BTN_BLUE)?.into_input_pullup();

        let tx = edge_tx.clone();
        red.set_async_interrupt(Trigger::FallingEdge, None, move |_| {
            // Full channel means the classifier is already armed.
            let _ = tx.try_send(ButtonEdge::Red);
        })?;

        let tx = edge_tx;
        blue.set_async_interrupt(Trigger::FallingEdge, None, move |_| {
            let _ = tx.try_send(ButtonEdge::Blue);
        })?;

        info!(
            "Buttons ready on GPIO {} (red) and {} (blue)",
            GPIO_BTN_RED, GPIO_BTN_BLUE
        );
        debug!("Falling-edge interrupts installed");

        Ok(Self { red, blue })
    }
}

impl ButtonLines for Buttons {
    fn red_held(&self) -> bool {
        self.red.is_low()
    }

    fn blue_held(&self) -> bool {
        self.blue.is_low()
    }
}
