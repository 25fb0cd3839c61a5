//! Immutable per-turn ballot records and the exported history format.

use serde::{Deserialize, Serialize};

use crate::domain::color::TeamColor;

/// One submitted (or synthesized) ballot. `player` is `None` only for the
/// synthetic selected entry recorded when no submission matched the chosen
/// move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BallotEntry {
    pub player: Option<String>,
    pub notation: String,
}

/// Record of one resolved turn: the position before the move, the acting
/// team, and the ballot partition. Appended once per resolved turn and never
/// mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnRecord {
    pub fen: String,
    pub turn: TeamColor,
    pub selected: Vec<BallotEntry>,
    pub alts: Vec<BallotEntry>,
}

/// Ordered move history, suitable for replay or audit and pushed to
/// observers on subscribe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryExport {
    pub title: String,
    pub history: Vec<TurnRecord>,
}
