use std::time::Duration;

use tokio::time::sleep;
use tracing::error;

use crate::game::machine::Team;
use crate::hardware::Leds;

/// Fatal initialization failures, each with its own blink pattern so a
/// human can tell which step failed without a serial console.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FatalKind {
    /// A required resource could not be created at boot.
    Init,
    /// A button line was asserted at startup (stuck or damaged button).
    Button,
}

/// Signal a fatal condition forever. Never returns; the device needs a
/// power cycle to clear it.
///
/// Init failure alternates the two LEDs slowly; a stuck button flashes
/// both rapidly. Without working LEDs the pattern degrades to a periodic
/// log line.
pub async fn signal_fatal(leds: Option<Leds>, kind: FatalKind) {
    error!("A fatal error occurred: {:?}", kind);

    let Some(mut leds) = leds else {
        loop {
            error!("Fatal condition {:?}, power cycle required", kind);
            sleep(Duration::from_secs(3)).await;
        }
    };

    leds.set_all(false);
    match kind {
        FatalKind::Init => loop {
            leds.set(Team::Red, true);
            leds.set(Team::Blue, false);
            sleep(Duration::from_secs(1)).await;
            leds.set(Team::Blue, true);
            leds.set(Team::Red, false);
            sleep(Duration::from_secs(1)).await;
        },
        FatalKind::Button => loop {
            leds.set_all(true);
            sleep(Duration::from_millis(100)).await;
            leds.set_all(false);
            sleep(Duration::from_millis(100)).await;
        },
    }
}
