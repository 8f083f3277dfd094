use rppal::gpio::{Gpio, OutputPin};
use tracing::info;

use crate::game::machine::Team;
use crate::hardware::{HardwareError, GPIO_LED_BLUE, GPIO_LED_RED};

/// The two team indicator LEDs.
pub struct Leds {
    red: OutputPin,
    blue: OutputPin,
}

impl Leds {
    pub fn new() -> Result<Self, HardwareError> {
        let gpio = Gpio::new()?;
        let red = gpio.get(GPIO_LED_RED)?.into_output_low();
        let blue = gpio.get(GPIO_LED_BLUE)?.into_output_low();
        info!(
            "LEDs ready on GPIO {} (red) and {} (blue)",
            GPIO_LED_RED, GPIO_LED_BLUE
        );
        Ok(Self { red, blue })
    }

    pub fn set(&mut self, team: Team, on: bool) {
        let pin = match team {
            Team::Red => &mut self.red,
            Team::Blue => &mut self.blue,
        };
        if on {
            pin.set_high();
        } else {
            pin.set_low();
        }
    }

    pub fn set_all(&mut self, on: bool) {
        self.set(Team::Red, on);
        self.set(Team::Blue, on);
    }
}
