use serde::{Deserialize, Serialize};

use crate::domain::color::TeamColor;

/// Session progression phases.
///
/// `Pregame -> Voting (repeating) -> Postgame -> terminated`. Desertion during
/// pregame terminates the session without ever entering `Voting`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GamePhase {
    Pregame,
    Voting,
    Postgame,
}

impl std::fmt::Display for GamePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GamePhase::Pregame => write!(f, "PREGAME"),
            GamePhase::Voting => write!(f, "VOTING"),
            GamePhase::Postgame => write!(f, "POSTGAME"),
        }
    }
}

/// Terminal result of a game. `winner: None` covers draws, accusation
/// endings, desertion, and defensive aborts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameOutcome {
    pub winner: Option<TeamColor>,
    pub reason: String,
}
