use statum::{machine, state};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{sleep, Instant};
use tracing::{debug, info, warn};

use crate::input::dispatcher::EventDispatcher;
use crate::input::event::{AppEvent, ButtonKind, InputSettings};
use crate::input::{ButtonEdge, ButtonLines, InputError};

// Define classifier states using statum's state macro
#[state]
#[derive(Debug, Clone)]
pub enum ClassifierState {
    Initializing,
    Classifying,
}

#[machine]
pub struct ButtonClassifier<S: ClassifierState> {
    // Level access to the two button lines
    lines: Box<dyn ButtonLines>,

    // Edge notifications from the interrupt layer
    edge_rx: mpsc::Receiver<ButtonEdge>,

    // Sending side of the classified-event stream
    dispatcher: EventDispatcher,

    // Timing settings
    settings: InputSettings,
}

impl ButtonClassifier<Initializing> {
    pub fn create(
        lines: Box<dyn ButtonLines>,
        edge_rx: mpsc::Receiver<ButtonEdge>,
        dispatcher: EventDispatcher,
        settings: Option<InputSettings>,
    ) -> Self {
        let settings = settings.unwrap_or_default();
        debug!("Creating button classifier with settings: {:?}", settings);
        Self::new(lines, edge_rx, dispatcher, settings)
    }

    /// Verify the lines are idle and transition to the classifying state.
    /// A line already asserted at startup points at a stuck or damaged
    /// button and is an initialization failure.
    pub fn initialize(self) -> Result<ButtonClassifier<Classifying>, InputError> {
        if self.lines.red_held() {
            return Err(InputError::ButtonStuck("RED"));
        }
        if self.lines.blue_held() {
            return Err(InputError::ButtonStuck("BLUE"));
        }

        info!("Button lines idle, classifier ready");
        Ok(self.transition())
    }
}

impl ButtonClassifier<Classifying> {
    /// Consume edge notifications until the channel closes. Each episode
    /// produces at most one classified event.
    pub async fn run_classification_loop(mut self) {
        info!("Starting button classification loop");

        while let Some(edge) = self.edge_rx.recv().await {
            debug!("Edge notification: {:?}", edge);
            self.classify_episode().await;

            // Edges that piled up while sampling belong to the episode
            // just classified; drain them so they do not re-arm us.
            while self.edge_rx.try_recv().is_ok() {}
        }

        warn!("Edge channel closed, classifier stopping");
    }

    /// Debounce, snapshot which line(s) are held, then measure how long
    /// they stay held (capped at the sampling window) and emit the
    /// classified event.
    async fn classify_episode(&mut self) {
        sleep(self.settings.debounce).await;

        let red = self.lines.red_held();
        let blue = self.lines.blue_held();

        let kind = match (red, blue) {
            (true, true) => ButtonKind::Both,
            (true, false) => ButtonKind::Red,
            (false, true) => ButtonKind::Blue,
            (false, false) => {
                debug!("Lines released within the debounce window, ignoring episode");
                return;
            }
        };

        // Duration counts from the post-debounce snapshot. A combined
        // press stays combined: release of either line ends its window,
        // but the classification committed here is not revised.
        let start = Instant::now();
        loop {
            sleep(self.settings.poll_interval).await;
            if start.elapsed() >= self.settings.sample_cap {
                debug!("Sampling window saturated");
                break;
            }
            let held = match kind {
                ButtonKind::Red => self.lines.red_held(),
                ButtonKind::Blue => self.lines.blue_held(),
                ButtonKind::Both => self.lines.red_held() && self.lines.blue_held(),
            };
            if !held {
                break;
            }
        }

        let held_for = start.elapsed();
        let length = self.settings.classify(held_for);
        info!(
            "{:?} press held for {}ms classified as {:?}",
            kind,
            held_for.as_millis(),
            length
        );

        self.dispatcher.dispatch(AppEvent::Button(kind, length)).await;
    }
}

// Public interface for spawning the classifier
pub struct ClassifierHandle {
    task: JoinHandle<()>,
}

impl ClassifierHandle {
    /// Create the classifier, run its startup check, and spawn the
    /// classification loop as a tokio task.
    pub fn spawn(
        lines: Box<dyn ButtonLines>,
        edge_rx: mpsc::Receiver<ButtonEdge>,
        dispatcher: EventDispatcher,
        settings: Option<InputSettings>,
    ) -> Result<Self, InputError> {
        let classifier = ButtonClassifier::create(lines, edge_rx, dispatcher, settings);
        let classifying = classifier.initialize()?;

        let task = tokio::spawn(classifying.run_classification_loop());
        info!("Button classifier started");

        Ok(Self { task })
    }

    pub fn abort(&self) {
        self.task.abort();
    }
}
