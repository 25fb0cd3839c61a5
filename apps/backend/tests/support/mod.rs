#![allow(dead_code)]

use std::sync::Arc;

use parking_lot::Mutex;

use molechess_backend::ai::RandomAdvisor;
use molechess_backend::domain::state::GameOutcome;
use molechess_backend::engine::BoardEngine;
use molechess_backend::events::{Messenger, SessionEvent};
use molechess_backend::{GameConfig, GameSession};

// Logging is auto-installed for every test binary that pulls this module in.
#[ctor::ctor]
fn init_logging() {
    if std::env::var("RUST_LOG").is_err() {
        let level = std::env::var("TEST_LOG").unwrap_or_else(|_| "warn".to_string());
        std::env::set_var("RUST_LOG", level);
    }
    molechess_backend::logging::init();
}

/// Shared script driving a [`ScriptedBoard`]. Tests hold a handle and flip
/// the terminal flags mid-game.
pub struct ScriptState {
    pub legal: Vec<String>,
    /// When set, overrides `legal`: the first set is legal after an even
    /// number of applied moves, the second after an odd number. Models a
    /// position whose legal moves change with every applied move.
    pub alternating: Option<(Vec<String>, Vec<String>)>,
    pub stalemate: bool,
    pub checkmate: bool,
    pub insufficient: bool,
    /// Report checkmate once this many moves have been applied; models a
    /// move that delivers mate.
    pub checkmate_after: Option<usize>,
    /// Same, for stalemate.
    pub stalemate_after: Option<usize>,
    /// Every move the session applied, in order.
    pub applied: Vec<String>,
}

/// Board engine stub: a fixed legal-move set and scripted terminal flags.
pub struct ScriptedBoard {
    state: Arc<Mutex<ScriptState>>,
}

impl ScriptedBoard {
    pub fn new(legal: &[&str]) -> (Box<dyn BoardEngine>, Arc<Mutex<ScriptState>>) {
        let state = Arc::new(Mutex::new(ScriptState {
            legal: legal.iter().map(|m| m.to_string()).collect(),
            alternating: None,
            stalemate: false,
            checkmate: false,
            insufficient: false,
            checkmate_after: None,
            stalemate_after: None,
            applied: Vec::new(),
        }));
        (
            Box::new(Self {
                state: Arc::clone(&state),
            }),
            state,
        )
    }
}

impl ScriptState {
    pub fn current_legal(&self) -> Vec<String> {
        match &self.alternating {
            Some((even, odd)) => {
                if self.applied.len() % 2 == 0 {
                    even.clone()
                } else {
                    odd.clone()
                }
            }
            None => self.legal.clone(),
        }
    }
}

impl BoardEngine for ScriptedBoard {
    fn legal_moves(&self) -> Vec<String> {
        self.state.lock().current_legal()
    }

    fn apply(&mut self, notation: &str) -> bool {
        let mut state = self.state.lock();
        if state.current_legal().iter().any(|m| m == notation) {
            state.applied.push(notation.to_string());
            true
        } else {
            false
        }
    }

    fn is_stalemate(&self) -> bool {
        let state = self.state.lock();
        state.stalemate || state.stalemate_after.is_some_and(|n| state.applied.len() >= n)
    }

    fn is_checkmate(&self) -> bool {
        let state = self.state.lock();
        state.checkmate || state.checkmate_after.is_some_and(|n| state.applied.len() >= n)
    }

    fn is_insufficient_material(&self) -> bool {
        self.state.lock().insufficient
    }

    fn fen(&self) -> String {
        format!("pos-{}", self.state.lock().applied.len())
    }
}

/// Messenger that records every delivery for later assertions.
#[derive(Default)]
pub struct RecordingMessenger {
    log: Mutex<Vec<(String, SessionEvent)>>,
}

impl Messenger for RecordingMessenger {
    fn tell(&self, recipient: &str, event: SessionEvent) {
        self.log.lock().push((recipient.to_string(), event));
    }
}

impl RecordingMessenger {
    pub fn all(&self) -> Vec<(String, SessionEvent)> {
        self.log.lock().clone()
    }

    pub fn events_for(&self, name: &str) -> Vec<SessionEvent> {
        self.log
            .lock()
            .iter()
            .filter(|(r, _)| r == name)
            .map(|(_, e)| e.clone())
            .collect()
    }

    /// Chat lines delivered to `name`, in order.
    pub fn chats_for(&self, name: &str) -> Vec<String> {
        self.events_for(name)
            .into_iter()
            .filter_map(|e| match e {
                SessionEvent::Chat { msg, .. } => Some(msg),
                _ => None,
            })
            .collect()
    }

    /// Recipients of the mole notification, deduplicated in arrival order.
    pub fn mole_recipients(&self) -> Vec<String> {
        let mut seen = Vec::new();
        for (recipient, event) in self.log.lock().iter() {
            if matches!(event, SessionEvent::MoleAssigned) && !seen.contains(recipient) {
                seen.push(recipient.clone());
            }
        }
        seen
    }

    pub fn finished_for(&self, name: &str) -> Option<GameOutcome> {
        self.events_for(name).into_iter().find_map(|e| match e {
            SessionEvent::Finished { outcome } => Some(outcome),
            _ => None,
        })
    }

    pub fn last_game_update_for(&self, name: &str) -> Option<(String, String)> {
        self.events_for(name)
            .into_iter()
            .rev()
            .find_map(|e| match e {
                SessionEvent::GameUpdate { last_move, fen } => Some((last_move, fen)),
                _ => None,
            })
    }
}

pub struct Harness {
    pub session: Arc<GameSession>,
    pub messenger: Arc<RecordingMessenger>,
    pub script: Arc<Mutex<ScriptState>>,
}

pub const LEGAL: [&str; 4] = ["e2e4", "d2d4", "g1f3", "b1c3"];

/// A fully wired session with a scripted board, a recording messenger, a
/// seeded RNG, and a fixed AI name pool. `creator` still has to join.
pub fn harness(creator: &str, config: GameConfig) -> Harness {
    harness_with_pool(
        creator,
        config,
        &["Boris", "Mort", "Vera", "Sacha", "Nikolai", "Anya"],
    )
}

pub fn harness_with_pool(creator: &str, config: GameConfig, pool: &[&str]) -> Harness {
    let messenger = Arc::new(RecordingMessenger::default());
    let (board, script) = ScriptedBoard::new(&LEGAL);
    let advisor = Arc::new(RandomAdvisor::new(Some(99)));
    let session = Arc::new(
        GameSession::new(
            creator,
            "table-1",
            board,
            Arc::clone(&messenger) as Arc<dyn Messenger>,
            advisor,
            config,
        )
        .with_seed(7)
        .with_name_pool(pool.iter().map(|n| n.to_string()).collect()),
    );
    Harness {
        session,
        messenger,
        script,
    }
}

/// Config for hand-rostered games: no AI-fill, `n` players per team.
pub fn manual_config(n: usize) -> GameConfig {
    GameConfig {
        min_players: n,
        ai_fill: false,
        ..GameConfig::default()
    }
}
