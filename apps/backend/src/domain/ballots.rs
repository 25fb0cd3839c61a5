//! Move-ballot aggregation and the turn resolution policy.
//!
//! Resolution is deliberately non-majoritarian: once the voting wait ends,
//! the played move is drawn uniformly from the submitted ballots (each
//! submission one ticket), or uniformly from the legal-move set when nobody
//! voted. A move three players chose and a move one player chose have equal
//! odds. This mirrors the "picking randomly" behavior the game is built
//! around and must not be "fixed" into a plurality vote.

use rand::prelude::IndexedRandom;
use rand::Rng;

use crate::domain::snapshot::{BallotEntry, TurnRecord};
use crate::domain::team::Team;
use crate::errors::DomainError;

/// Quorum: ballots from the acting team reach its active-player count, so
/// waiting longer cannot change the ballot set. AI ballots arrive through the
/// same submission path and count like any other.
pub fn quorum_reached(team: &Team) -> bool {
    team.ballot_count() >= team.active_count()
}

/// Live ballots in roster order.
pub fn submitted_moves(team: &Team) -> Vec<String> {
    team.players
        .iter()
        .filter_map(|p| p.ballot.clone())
        .collect()
}

/// Pick the move to play: uniform among `submitted` if any, else uniform
/// among `legal`.
///
/// Both sets empty is an invariant violation: the orchestrator only resolves
/// while the board still has legal moves.
pub fn resolve_move<R: Rng + ?Sized>(
    submitted: &[String],
    legal: &[String],
    rng: &mut R,
) -> Result<String, DomainError> {
    let pool = if submitted.is_empty() { legal } else { submitted };
    pool.choose(rng)
        .cloned()
        .ok_or_else(|| DomainError::invariant("no candidate moves to resolve"))
}

/// Capture the turn's full ballot partition for the history.
///
/// Every ballot whose text equals the chosen move is tagged selected; the
/// rest are alternates. When no submission matched (nobody voted, or the
/// random legal pick differed from every ballot) a synthetic player-less
/// selected entry records the move actually played.
pub fn ballot_snapshot(team: &Team, fen_before: String, chosen: &str) -> TurnRecord {
    let mut selected = Vec::new();
    let mut alts = Vec::new();
    for player in &team.players {
        if let Some(notation) = &player.ballot {
            let entry = BallotEntry {
                player: Some(player.name.clone()),
                notation: notation.clone(),
            };
            if notation == chosen {
                selected.push(entry);
            } else {
                alts.push(entry);
            }
        }
    }
    if selected.is_empty() {
        selected.push(BallotEntry {
            player: None,
            notation: chosen.to_string(),
        });
    }
    TurnRecord {
        fen: fen_before,
        turn: team.color,
        selected,
        alts,
    }
}
