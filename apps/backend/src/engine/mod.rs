//! Seam to the external chess rules engine.
//!
//! The session core never interprets moves or positions itself: legality,
//! application, and terminal-position detection are delegated entirely to an
//! implementation of [`BoardEngine`]. Moves are opaque text in whatever
//! notation the engine defines; the session only compares them for equality
//! against the engine's own legal-move set.

/// External board engine, consumed by the session.
///
/// Implementations receive every call with the session's state lock
/// released, serialized through the session's own board lock, so they do not
/// need interior synchronization.
pub trait BoardEngine: Send {
    /// Legal moves for the current position, in the engine's notation.
    fn legal_moves(&self) -> Vec<String>;

    /// Apply a move. Returns false if the engine refuses it; for a move
    /// drawn from [`legal_moves`](Self::legal_moves) that is an invariant
    /// violation and the session finishes defensively.
    fn apply(&mut self, notation: &str) -> bool;

    fn is_stalemate(&self) -> bool;

    fn is_checkmate(&self) -> bool;

    fn is_insufficient_material(&self) -> bool;

    /// Current position in standard position notation (FEN).
    fn fen(&self) -> String;
}
