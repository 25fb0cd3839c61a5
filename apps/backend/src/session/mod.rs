//! Per-session orchestration: shared state, locking, and event fan-out.
//!
//! One [`GameSession`] owns everything for one game. The orchestrator loop
//! (`runner`) runs as a single spawned task; many independent callers mutate
//! the same state through the actor-facing API (`actions`) while the loop is
//! blocked in a timed wait. All shared mutable state lives behind one
//! `parking_lot::Mutex<SessionState>`; the board engine sits behind its own
//! mutex. Neither lock is ever held across an `.await`, and the two locks
//! are never held at the same time.

mod actions;
mod runner;

use std::sync::Arc;
use std::time::Instant;

use parking_lot::{Mutex, MutexGuard};
use rand::prelude::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tokio::sync::Notify;
use tokio_util::sync::CancellationToken;

use crate::ai::MoveAdvisor;
use crate::config::game::GameConfig;
use crate::config::names::NAME_POOL;
use crate::domain::ballots;
use crate::domain::color::TeamColor;
use crate::domain::snapshot::{HistoryExport, TurnRecord};
use crate::domain::state::{GameOutcome, GamePhase};
use crate::domain::team::{Team, TeamSummary};
use crate::engine::BoardEngine;
use crate::events::{Messenger, SessionEvent};

/// Advisory result of an actor-facing call. Player mistakes (wrong phase,
/// illegal move, duplicate join, ...) are reported here, never as faults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionOutcome {
    pub ok: bool,
    pub message: String,
}

impl ActionOutcome {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            ok: true,
            message: message.into(),
        }
    }

    pub fn err(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            message: message.into(),
        }
    }
}

/// Public summary of a session for lobby listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub title: String,
    pub creator: String,
    pub teams: Vec<TeamSummary>,
}

/// Everything the state lock guards.
pub(crate) struct SessionState {
    pub phase: GamePhase,
    pub playing: bool,
    /// Set once `start()` has accepted; blocks a second start racing the
    /// orchestrator task.
    pub started: bool,
    pub turn: TeamColor,
    pub move_num: u32,
    pub teams: [Team; 2],
    pub observers: Vec<String>,
    pub history: Vec<TurnRecord>,
    pub outcome: Option<GameOutcome>,
    pub last_activity: Instant,
}

impl SessionState {
    fn new() -> Self {
        Self {
            phase: GamePhase::Pregame,
            playing: false,
            started: false,
            turn: TeamColor::White,
            move_num: 1,
            teams: [Team::new(TeamColor::Black), Team::new(TeamColor::White)],
            observers: Vec::new(),
            history: Vec::new(),
            outcome: None,
            last_activity: Instant::now(),
        }
    }

    pub fn team(&self, color: TeamColor) -> &Team {
        &self.teams[color.index()]
    }

    pub fn team_mut(&mut self, color: TeamColor) -> &mut Team {
        &mut self.teams[color.index()]
    }

    pub fn player_color(&self, name: &str) -> Option<TeamColor> {
        TeamColor::BOTH
            .into_iter()
            .find(|&c| self.team(c).find(name).is_some())
    }

    /// No present human remains on either team.
    pub fn deserted(&self) -> bool {
        self.teams
            .iter()
            .all(|t| t.players.iter().all(|p| p.away || p.ai))
    }

    pub fn history_export(&self, title: &str) -> HistoryExport {
        HistoryExport {
            title: title.to_string(),
            history: self.history.clone(),
        }
    }
}

/// A message staged under the state lock and delivered after it is released,
/// so `Messenger` implementations can call back into the session.
pub(crate) enum Outbound {
    Broadcast(SessionEvent),
    Direct(String, SessionEvent),
}

/// One game session: the aggregate root of teams, ballots, history and the
/// phase state machine.
pub struct GameSession {
    title: String,
    creator: String,
    config: GameConfig,
    name_pool: Vec<String>,
    state: Mutex<SessionState>,
    board: Mutex<Box<dyn BoardEngine>>,
    messenger: Arc<dyn Messenger>,
    advisor: Arc<dyn MoveAdvisor>,
    rng: Mutex<StdRng>,
    /// Wakes a timed phase wait early (quorum, end condition, desertion).
    wake: Notify,
    /// Tears the whole session down, skipping any remaining phases.
    cancel: CancellationToken,
}

impl GameSession {
    pub fn new(
        creator: impl Into<String>,
        title: impl Into<String>,
        board: Box<dyn BoardEngine>,
        messenger: Arc<dyn Messenger>,
        advisor: Arc<dyn MoveAdvisor>,
        config: GameConfig,
    ) -> Self {
        Self {
            title: title.into(),
            creator: creator.into(),
            config,
            name_pool: NAME_POOL.clone(),
            state: Mutex::new(SessionState::new()),
            board: Mutex::new(board),
            messenger,
            advisor,
            rng: Mutex::new(StdRng::from_os_rng()),
            wake: Notify::new(),
            cancel: CancellationToken::new(),
        }
    }

    /// Seed every random choice this session makes (mole assignment, move
    /// tie-break, AI name draw) for reproducible behavior.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = Mutex::new(StdRng::seed_from_u64(seed));
        self
    }

    /// Replace the process-wide AI name pool for this session.
    pub fn with_name_pool(mut self, pool: Vec<String>) -> Self {
        self.name_pool = pool;
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn creator(&self) -> &str {
        &self.creator
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn phase(&self) -> GamePhase {
        self.state.lock().phase
    }

    pub fn is_playing(&self) -> bool {
        self.state.lock().playing
    }

    pub fn outcome(&self) -> Option<GameOutcome> {
        self.state.lock().outcome.clone()
    }

    /// Not playing and idle for longer than the pregame window; the owner of
    /// the session collection may cull it.
    pub fn is_defunct(&self) -> bool {
        let state = self.state.lock();
        !state.playing && state.last_activity.elapsed() > self.config.pre_time
    }

    pub fn summary(&self) -> SessionSummary {
        let state = self.state.lock();
        SessionSummary {
            title: self.title.clone(),
            creator: self.creator.clone(),
            teams: state.teams.iter().map(Team::summary).collect(),
        }
    }

    pub fn history_export(&self) -> HistoryExport {
        self.state.lock().history_export(&self.title)
    }

    /// Abrupt teardown: interrupts any in-progress wait and skips remaining
    /// phases.
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }

    pub(crate) fn lock_state(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock()
    }

    pub(crate) fn lock_board(&self) -> MutexGuard<'_, Box<dyn BoardEngine>> {
        self.board.lock()
    }

    pub(crate) fn lock_rng(&self) -> MutexGuard<'_, StdRng> {
        self.rng.lock()
    }

    pub(crate) fn name_pool(&self) -> &[String] {
        &self.name_pool
    }

    pub(crate) fn advisor(&self) -> Arc<dyn MoveAdvisor> {
        Arc::clone(&self.advisor)
    }

    pub(crate) fn cancelled(&self) -> &CancellationToken {
        &self.cancel
    }

    pub(crate) fn wake_waiters(&self) {
        self.wake.notify_one();
    }

    pub(crate) fn wake_notified(&self) -> tokio::sync::futures::Notified<'_> {
        self.wake.notified()
    }

    pub(crate) fn messenger_tell(&self, recipient: &str, event: SessionEvent) {
        self.messenger.tell(recipient, event);
    }

    pub(crate) fn chat(&self, msg: impl Into<String>) -> Outbound {
        Outbound::Broadcast(SessionEvent::Chat {
            msg: msg.into(),
            source: self.title.clone(),
        })
    }

    pub(crate) fn teams_update(&self, state: &SessionState) -> Outbound {
        Outbound::Broadcast(SessionEvent::Teams {
            teams: state.teams.iter().map(Team::summary).collect(),
        })
    }

    /// Deliver staged messages. Recipients are snapshotted under the lock
    /// and the iteration happens outside it, so a concurrent join or leave
    /// can neither crash the broadcast nor duplicate a message.
    pub(crate) fn flush(&self, staged: Vec<Outbound>) {
        if staged.is_empty() {
            return;
        }
        let recipients: Vec<String> = {
            let state = self.state.lock();
            state
                .teams
                .iter()
                .flat_map(|t| t.players.iter())
                .filter(|p| !p.away && !p.ai)
                .map(|p| p.name.clone())
                .chain(state.observers.iter().cloned())
                .collect()
        };
        for message in staged {
            match message {
                Outbound::Broadcast(event) => {
                    for name in &recipients {
                        self.messenger.tell(name, event.clone());
                    }
                }
                Outbound::Direct(name, event) => self.messenger.tell(&name, event),
            }
        }
    }

    /// Terminal bookkeeping shared by every end condition. Idempotent: the
    /// first caller wins, later calls are no-ops.
    pub(crate) fn end_game(
        &self,
        state: &mut SessionState,
        winner: Option<TeamColor>,
        reason: &str,
        out: &mut Vec<Outbound>,
    ) {
        if !state.playing {
            return;
        }
        if let Some(color) = winner {
            out.push(self.chat(format!("{color} wins by {reason}!")));
            let bonus = self.config.win_bonus;
            for name in crate::domain::scoring::award_team(state.team_mut(color), bonus) {
                out.push(self.chat(format!("{name} gets {bonus} points")));
            }
        } else {
            out.push(self.chat(format!("Game Over! ({reason})")));
        }
        state.playing = false;
        let outcome = GameOutcome {
            winner,
            reason: reason.to_string(),
        };
        tracing::info!(title = %self.title, ?winner, reason, "game over");
        state.outcome = Some(outcome.clone());
        out.push(Outbound::Broadcast(SessionEvent::Finished { outcome }));
        self.wake.notify_one();
    }

    /// Quorum signal from the submission path: wake the voting wait if the
    /// acting team's ballots now cover every active player.
    pub(crate) fn check_quorum(&self, state: &SessionState) {
        if state.phase == GamePhase::Voting && ballots::quorum_reached(state.team(state.turn)) {
            tracing::debug!(title = %self.title, turn = %state.turn, "move quorum reached");
            self.wake.notify_one();
        }
    }
}
