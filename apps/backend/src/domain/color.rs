use std::fmt;

use serde::{Deserialize, Serialize};

/// The two fixed sides of a session. White always moves first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TeamColor {
    Black,
    White,
}

impl TeamColor {
    pub const BOTH: [TeamColor; 2] = [TeamColor::Black, TeamColor::White];

    /// Stable array index for per-team storage.
    #[inline]
    pub fn index(self) -> usize {
        match self {
            TeamColor::Black => 0,
            TeamColor::White => 1,
        }
    }

    /// The other side; also the turn rotation.
    #[inline]
    pub fn opponent(self) -> Self {
        match self {
            TeamColor::Black => TeamColor::White,
            TeamColor::White => TeamColor::Black,
        }
    }
}

impl fmt::Display for TeamColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TeamColor::Black => write!(f, "Black"),
            TeamColor::White => write!(f, "White"),
        }
    }
}
