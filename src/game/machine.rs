use std::time::Duration;

use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::AbortHandle;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

use crate::game::chrono::Chronometer;
use crate::game::settings::{ControlPoint, SettingKind, SettingsMenu};
use crate::game::GameError;
use crate::input::{AppEvent, ButtonKind, EventDispatcher, PressLength};
use crate::persistence::SettingsStore;
use crate::presentation::{FeedbackPattern, Presenter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Team {
    Red,
    Blue,
}

impl Team {
    pub fn opponent(self) -> Team {
        match self {
            Team::Red => Team::Blue,
            Team::Blue => Team::Red,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    Init,
    Idle,
    RunningRed,
    RunningBlue,
    Finished,
    Settings,
}

// Game machine settings
#[derive(Clone, Debug)]
pub struct GameSettings {
    /// How long the node waits after boot for a first button press before
    /// it gives up on the setup window and goes idle on its own.
    pub setup_timeout: Duration,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            setup_timeout: Duration::from_secs(30),
        }
    }
}

/// Snapshot published on the watch channel after every consumed event.
///
/// Carries the chronometers by value so observers compute live elapsed
/// time from the copy; staleness is bounded by their own polling interval.
#[derive(Debug, Clone)]
pub struct GameStatus {
    pub state: GameState,
    pub red: Chronometer,
    pub blue: Chronometer,
    pub control_point: ControlPoint,
    pub beep: bool,
    pub winner: Option<Team>,
}

impl Default for GameStatus {
    fn default() -> Self {
        Self {
            state: GameState::Init,
            red: Chronometer::new(),
            blue: Chronometer::new(),
            control_point: ControlPoint::RECOVERY_DEFAULT,
            beep: true,
            winner: None,
        }
    }
}

// Externally triggered commands from the remote control surface
#[derive(Debug)]
pub enum GameCommand {
    StartGame {
        team: Team,
        reply: oneshot::Sender<Result<(), GameError>>,
    },
    EndGame {
        reply: oneshot::Sender<Result<(), GameError>>,
    },
}

/// What a (state, event) pair means for the machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    /// Leave the boot setup window and go idle.
    LeaveSetup,
    /// Enter the settings menu from the setup window.
    EnterSettings,
    /// Start (or switch to) the given team's chronometer.
    StartTeam(Team),
    /// Stop both chronometers and declare a winner.
    FinishMatch,
    /// Clear the finished match and return to idle.
    ResetMatch,
    /// Advance the settings cursor.
    SettingsNext,
    /// Modify the value under the cursor, or commit and leave on the exit
    /// entry.
    SettingsSelect,
    /// Leave the settings menu without persisting.
    SettingsAbandon,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Apply(Action),
    /// Valid but meaningless in this state; dropped silently.
    Ignored,
    /// Not in the transition table at all; reported, never fatal.
    Unexpected,
}

/// The transition table. Pure function of (state, event) so the mapping
/// stays exhaustively checkable; all side effects happen in `apply`.
fn decide(state: GameState, event: &AppEvent) -> Outcome {
    use ButtonKind::{Blue, Both, Red};
    use PressLength::{Long, Medium, Short};

    match (state, event) {
        // Boot setup window: any short/medium press (or the timeout)
        // confirms the node and goes idle; holding both buttons long
        // enters the settings menu instead.
        (GameState::Init, AppEvent::SetupTimeout) => Outcome::Apply(Action::LeaveSetup),
        (GameState::Init, AppEvent::Button(Both, Long)) => Outcome::Apply(Action::EnterSettings),
        (GameState::Init, AppEvent::Button(Red | Blue, Long)) => Outcome::Ignored,
        (GameState::Init, AppEvent::Button(_, _)) => Outcome::Apply(Action::LeaveSetup),

        (GameState::Idle, AppEvent::Button(Red, Short | Medium)) => {
            Outcome::Apply(Action::StartTeam(Team::Red))
        }
        (GameState::Idle, AppEvent::Button(Blue, Short | Medium)) => {
            Outcome::Apply(Action::StartTeam(Team::Blue))
        }
        (GameState::Idle, AppEvent::Button(_, _)) => Outcome::Ignored,

        // While running, the other team's press switches possession; the
        // active team's press is a no-op. Both buttons held medium/long
        // ends the match.
        (GameState::RunningRed, AppEvent::Button(Blue, Short | Medium)) => {
            Outcome::Apply(Action::StartTeam(Team::Blue))
        }
        (GameState::RunningBlue, AppEvent::Button(Red, Short | Medium)) => {
            Outcome::Apply(Action::StartTeam(Team::Red))
        }
        (GameState::RunningRed | GameState::RunningBlue, AppEvent::Button(Both, Medium | Long)) => {
            Outcome::Apply(Action::FinishMatch)
        }
        (GameState::RunningRed | GameState::RunningBlue, AppEvent::Button(_, _)) => Outcome::Ignored,

        (GameState::Finished, AppEvent::Button(Both, Medium | Long)) => {
            Outcome::Apply(Action::ResetMatch)
        }
        (GameState::Finished, AppEvent::Button(_, _)) => Outcome::Ignored,

        (GameState::Settings, AppEvent::Button(Blue, Short)) => Outcome::Apply(Action::SettingsNext),
        (GameState::Settings, AppEvent::Button(Red, Short)) => Outcome::Apply(Action::SettingsSelect),
        (GameState::Settings, AppEvent::Button(Both, Medium | Long)) => {
            Outcome::Apply(Action::SettingsAbandon)
        }
        (GameState::Settings, AppEvent::Button(_, _)) => Outcome::Ignored,

        // The setup timeout only means something during the setup window.
        (_, AppEvent::SetupTimeout) => Outcome::Unexpected,
    }
}

/// The central controller: sole owner of the game state, both team
/// chronometers and the settings menu. Driven one event at a time, so
/// every transition is atomic with respect to every other.
pub struct GameMachine {
    state: GameState,
    red: Chronometer,
    blue: Chronometer,
    menu: SettingsMenu,
    winner: Option<Team>,
    store: Box<dyn SettingsStore>,
    presenter: Presenter,
    setup_timer: Option<AbortHandle>,
}

impl GameMachine {
    pub fn new(store: Box<dyn SettingsStore>, presenter: Presenter) -> Self {
        let mut menu = SettingsMenu::new();
        menu.enter(&*store);
        info!("Control point: {:?}", menu.value().control_point);

        Self {
            state: GameState::Init,
            red: Chronometer::new(),
            blue: Chronometer::new(),
            menu,
            winner: None,
            store,
            presenter,
            setup_timer: None,
        }
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn status(&self) -> GameStatus {
        GameStatus {
            state: self.state,
            red: self.red,
            blue: self.blue,
            control_point: self.menu.value().control_point,
            beep: self.menu.value().beep,
            winner: self.winner,
        }
    }

    pub fn elapsed_seconds(&self, team: Team) -> u32 {
        match team {
            Team::Red => self.red.elapsed_seconds(),
            Team::Blue => self.blue.elapsed_seconds(),
        }
    }

    /// Hand the machine the abort handle of the one-shot setup timer so
    /// leaving the setup window can cancel it.
    pub fn set_setup_timer(&mut self, handle: AbortHandle) {
        self.setup_timer = Some(handle);
    }

    /// Consume one classified event, to completion.
    pub fn handle_event(&mut self, event: &AppEvent) {
        match decide(self.state, event) {
            Outcome::Apply(action) => {
                info!("State {:?}, event {:?}", self.state, event);
                self.apply(action);
            }
            Outcome::Ignored => {
                debug!("Ignoring {:?} in state {:?}", event, self.state);
            }
            Outcome::Unexpected => {
                error!(
                    "Unexpected transition! State {:?}, wrong event {:?}",
                    self.state, event
                );
            }
        }
    }

    /// Externally triggered equivalent of the idle-to-running entry.
    /// Only accepted during the setup window or after a finished match.
    pub fn force_start(&mut self, team: Team) -> Result<(), GameError> {
        match self.state {
            GameState::Init => {
                info!("Remote start for team {:?} during setup window", team);
                self.cancel_setup_timer();
                self.start_team(team);
                Ok(())
            }
            GameState::Finished => {
                info!("Remote start for team {:?} after finished match", team);
                self.red.reset();
                self.blue.reset();
                self.winner = None;
                self.start_team(team);
                Ok(())
            }
            state => {
                warn!("Remote start rejected in state {:?}", state);
                Err(GameError::InvalidState(state))
            }
        }
    }

    /// Externally triggered equivalent of the running-to-finished entry.
    pub fn force_end(&mut self) -> Result<(), GameError> {
        match self.state {
            GameState::RunningRed | GameState::RunningBlue => {
                info!("Remote end of match");
                self.finish_match();
                Ok(())
            }
            state => {
                warn!("Remote end rejected in state {:?}", state);
                Err(GameError::InvalidState(state))
            }
        }
    }

    pub fn handle_command(&mut self, command: GameCommand) {
        match command {
            GameCommand::StartGame { team, reply } => {
                let result = self.force_start(team);
                if reply.send(result).is_err() {
                    warn!("Remote start reply dropped");
                }
            }
            GameCommand::EndGame { reply } => {
                let result = self.force_end();
                if reply.send(result).is_err() {
                    warn!("Remote end reply dropped");
                }
            }
        }
    }

    fn apply(&mut self, action: Action) {
        match action {
            Action::LeaveSetup => {
                self.cancel_setup_timer();
                self.state = GameState::Idle;
                info!("Setup window closed, node is idle");
                self.feedback(FeedbackPattern::Hello);
            }
            Action::EnterSettings => {
                self.cancel_setup_timer();
                self.menu.enter(&*self.store);
                self.state = GameState::Settings;
                info!("Entering settings menu");
                self.render_menu();
            }
            Action::StartTeam(team) => {
                self.start_team(team);
            }
            Action::FinishMatch => {
                self.finish_match();
            }
            Action::ResetMatch => {
                self.red.reset();
                self.blue.reset();
                self.winner = None;
                self.presenter.all_indicators(false);
                self.state = GameState::Idle;
                info!("Match cleared, node is idle");
            }
            Action::SettingsNext => {
                self.menu.advance();
                self.render_menu();
            }
            Action::SettingsSelect => {
                if self.menu.cursor() == SettingKind::Exit {
                    if let Err(e) = self.menu.save(&*self.store) {
                        error!("Failed to persist settings: {e}");
                    }
                    self.state = GameState::Idle;
                    info!("Settings committed, node is idle");
                    self.feedback(FeedbackPattern::Ok);
                } else {
                    self.menu.modify_current();
                    self.render_menu();
                }
            }
            Action::SettingsAbandon => {
                self.state = GameState::Idle;
                info!("Settings abandoned without saving");
            }
        }
    }

    fn start_team(&mut self, team: Team) {
        match team {
            Team::Red => {
                self.red.start();
                self.blue.stop();
                self.state = GameState::RunningRed;
            }
            Team::Blue => {
                self.blue.start();
                self.red.stop();
                self.state = GameState::RunningBlue;
            }
        }
        self.presenter.indicator(team, true);
        self.presenter.indicator(team.opponent(), false);
        self.feedback(FeedbackPattern::Switch);
        info!("Team {:?} holds the point", team);
    }

    fn finish_match(&mut self) {
        self.red.stop();
        self.blue.stop();
        self.presenter.all_indicators(true);

        let red_seconds = self.red.elapsed_seconds();
        let blue_seconds = self.blue.elapsed_seconds();
        let winner = if blue_seconds >= red_seconds {
            Team::Blue
        } else {
            Team::Red
        };
        self.winner = Some(winner);
        self.state = GameState::Finished;

        info!("Blue team: {blue_seconds}s");
        info!("Red team:  {red_seconds}s");
        info!("Win {:?} team!", winner);
        self.feedback(FeedbackPattern::Finish);
    }

    fn render_menu(&self) {
        self.presenter.label(Team::Red, self.menu.cursor().label());
        self.presenter.label(Team::Blue, self.menu.current_value_label());
    }

    fn feedback(&self, pattern: FeedbackPattern) {
        if self.menu.value().beep {
            self.presenter.feedback(pattern);
        }
    }

    fn cancel_setup_timer(&mut self) {
        if let Some(timer) = self.setup_timer.take() {
            timer.abort();
            debug!("Setup timer cancelled");
        }
    }
}

// Public handle for the game task: event injection, remote commands and
// the status snapshot feed.
#[derive(Clone, Debug)]
pub struct GameHandle {
    dispatcher: EventDispatcher,
    command_tx: mpsc::Sender<GameCommand>,
    status_rx: watch::Receiver<GameStatus>,
}

impl GameHandle {
    /// Spawn the game task: build the machine, start the one-shot setup
    /// timer, and run the consumer loop until the event channel closes.
    pub fn spawn(
        store: Box<dyn SettingsStore>,
        presenter: Presenter,
        dispatcher: EventDispatcher,
        event_rx: mpsc::Receiver<AppEvent>,
        settings: Option<GameSettings>,
    ) -> Self {
        let settings = settings.unwrap_or_default();
        info!("Spawning game task with settings: {:?}", settings);

        let machine = GameMachine::new(store, presenter);
        let (command_tx, command_rx) = mpsc::channel(8);
        let (status_tx, status_rx) = watch::channel(machine.status());

        let timer_dispatcher = dispatcher.clone();
        tokio::spawn(run_game_loop(
            machine,
            event_rx,
            command_rx,
            status_tx,
            timer_dispatcher,
            settings,
        ));

        Self {
            dispatcher,
            command_tx,
            status_rx,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<GameStatus> {
        self.status_rx.clone()
    }

    pub fn state(&self) -> GameState {
        self.status_rx.borrow().state
    }

    pub fn elapsed_seconds(&self, team: Team) -> u32 {
        let status = self.status_rx.borrow();
        match team {
            Team::Red => status.red.elapsed_seconds(),
            Team::Blue => status.blue.elapsed_seconds(),
        }
    }

    /// Injection point for classified input events.
    pub async fn inject(&self, event: AppEvent) {
        self.dispatcher.dispatch(event).await;
    }

    pub async fn start_game(&self, team: Team) -> Result<(), GameError> {
        let (reply, response) = oneshot::channel();
        self.command_tx
            .send(GameCommand::StartGame { team, reply })
            .await
            .map_err(|_| GameError::ChannelClosed)?;
        response.await.map_err(|_| GameError::ChannelClosed)?
    }

    pub async fn end_game(&self) -> Result<(), GameError> {
        let (reply, response) = oneshot::channel();
        self.command_tx
            .send(GameCommand::EndGame { reply })
            .await
            .map_err(|_| GameError::ChannelClosed)?;
        response.await.map_err(|_| GameError::ChannelClosed)?
    }
}

async fn run_game_loop(
    mut machine: GameMachine,
    mut event_rx: mpsc::Receiver<AppEvent>,
    mut command_rx: mpsc::Receiver<GameCommand>,
    status_tx: watch::Sender<GameStatus>,
    dispatcher: EventDispatcher,
    settings: GameSettings,
) {
    // One-shot setup window timer; it feeds the same event queue as the
    // buttons and the machine aborts it on the first transition out of
    // the setup state.
    let setup_timeout = settings.setup_timeout;
    let timer = tokio::spawn(async move {
        sleep(setup_timeout).await;
        info!("Setup window expired");
        dispatcher.dispatch(AppEvent::SetupTimeout).await;
    });
    machine.set_setup_timer(timer.abort_handle());

    info!("Game task started in state {:?}", machine.state());
    let _ = status_tx.send(machine.status());

    loop {
        tokio::select! {
            maybe_event = event_rx.recv() => match maybe_event {
                Some(event) => machine.handle_event(&event),
                None => {
                    warn!("Event channel closed, game task stopping");
                    break;
                }
            },
            maybe_command = command_rx.recv() => match maybe_command {
                Some(command) => machine.handle_command(command),
                None => {
                    warn!("Command channel closed, game task stopping");
                    break;
                }
            },
        }
        let _ = status_tx.send(machine.status());
    }
}
