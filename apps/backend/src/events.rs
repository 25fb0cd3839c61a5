//! Outbound session events and the delivery seam.

use serde::{Deserialize, Serialize};

use crate::domain::snapshot::HistoryExport;
use crate::domain::state::{GameOutcome, GamePhase};
use crate::domain::team::TeamSummary;

/// Typed event delivered to players and observers.
///
/// The wire shape is the session's public contract: a tagged `snake_case`
/// JSON object per event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    /// Chat-style notice ("Turn #3: White", award announcements, ...).
    Chat { msg: String, source: String },

    /// A phase was entered.
    Phase { phase: GamePhase },

    /// A timed wait opened with this many seconds on the clock.
    Countdown { seconds: u64 },

    /// Board update after an applied move. `last_move` is empty for the
    /// starting position.
    GameUpdate { last_move: String, fen: String },

    /// Full move history; sent after every resolved turn and to observers on
    /// subscribe.
    MoveList { export: HistoryExport },

    /// Roster change (join, defection) worth re-rendering.
    Teams { teams: Vec<TeamSummary> },

    /// Delivered only to the player who holds the mole role.
    MoleAssigned,

    /// The game reached a terminal outcome.
    Finished { outcome: GameOutcome },

    /// The session is gone: postgame elapsed, or the session was deserted or
    /// torn down.
    Closed,
}

/// Fan-out channel to connected users, consumed by the session core.
///
/// `recipient` is a user name. Delivery must not block: implementations
/// should enqueue (the session may call this from its orchestrator task or
/// from any submission handler) and must swallow per-recipient failures —
/// a player who vanished mid-broadcast is not the session's problem.
pub trait Messenger: Send + Sync {
    fn tell(&self, recipient: &str, event: SessionEvent);
}
