//! Domain layer: pure session logic, free of I/O and timing.

pub mod ballots;
pub mod color;
pub mod consensus;
pub mod player;
pub mod scoring;
pub mod snapshot;
pub mod state;
pub mod team;

#[cfg(test)]
mod tests_ballots;
#[cfg(test)]
mod tests_props_resolution;
#[cfg(test)]
mod tests_roster;

// Re-exports for ergonomics
pub use color::TeamColor;
pub use player::{Player, Role};
pub use snapshot::{BallotEntry, HistoryExport, TurnRecord};
pub use state::{GameOutcome, GamePhase};
pub use team::Team;
