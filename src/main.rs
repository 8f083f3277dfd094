use std::time::Duration;

use color_eyre::Result;
use tokio::sync::mpsc;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

use dominion_node::game::machine::GameHandle;
use dominion_node::hardware::{signal_fatal, Buttons, FatalKind, Leds};
use dominion_node::input::{ClassifierHandle, EventDispatcher, EDGE_QUEUE_DEPTH};
use dominion_node::persistence::TomlStore;
use dominion_node::presentation::{run_display_refresh, run_presentation_loop, Presenter};

const DISPLAY_REFRESH_PERIOD: Duration = Duration::from_millis(500);

#[tokio::main]
async fn main() -> Result<()> {
    setup()?;

    info!("Initializing the node...");

    let (edge_tx, edge_rx) = mpsc::channel(EDGE_QUEUE_DEPTH);

    let leds = Leds::new();
    let buttons = Buttons::new(edge_tx);

    let (leds, buttons) = match (leds, buttons) {
        (Ok(leds), Ok(buttons)) => (leds, buttons),
        (leds, buttons) => {
            if let Err(e) = &leds {
                error!("Error initializing LEDs: {e}");
            }
            if let Err(e) = &buttons {
                error!("Error initializing buttons: {e}");
            }
            signal_fatal(leds.ok(), FatalKind::Init).await;
            return Ok(());
        }
    };
    info!("Hardware init OK");

    let store = match TomlStore::at_default_location() {
        Ok(store) => store,
        Err(e) => {
            error!("Error initializing settings storage: {e}");
            signal_fatal(Some(leds), FatalKind::Init).await;
            return Ok(());
        }
    };
    info!("Storage init OK");

    let (dispatcher, event_rx) = EventDispatcher::channel(None);

    // Startup check inside: a pressed line at boot is fatal.
    let _classifier =
        match ClassifierHandle::spawn(Box::new(buttons), edge_rx, dispatcher.clone(), None) {
            Ok(handle) => handle,
            Err(e) => {
                error!("Error initializing classifier: {e}");
                signal_fatal(Some(leds), FatalKind::Button).await;
                return Ok(());
            }
        };

    let (presenter, presentation_rx) = Presenter::channel(64);
    tokio::spawn(run_presentation_loop(presentation_rx, Some(leds)));

    let game = GameHandle::spawn(
        Box::new(store),
        presenter.clone(),
        dispatcher,
        event_rx,
        None,
    );

    tokio::spawn(run_display_refresh(
        game.subscribe(),
        presenter,
        DISPLAY_REFRESH_PERIOD,
    ));

    info!("Node running, waiting for the setup window");
    tokio::signal::ctrl_c().await?;
    info!("Shutting down");

    Ok(())
}

fn setup() -> Result<()> {
    if std::env::var("RUST_LIB_BACKTRACE").is_err() {
        std::env::set_var("RUST_LIB_BACKTRACE", "0")
    }
    color_eyre::install()?;
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info")
    }
    setup_logging_env();
    Ok(())
}

fn setup_logging_env() {
    FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(false)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .pretty()
        .init();
}
