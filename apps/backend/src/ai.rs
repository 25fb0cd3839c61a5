//! AI move selection seam.
//!
//! AI seats submit ballots through the same path as humans; the only AI-only
//! code is choosing which move to submit. A real deployment plugs a chess
//! engine in behind [`MoveAdvisor`]; [`RandomAdvisor`] is the stock
//! implementation and the baseline for tests.

use async_trait::async_trait;
use parking_lot::Mutex;
use rand::prelude::{IndexedRandom, StdRng};
use rand::SeedableRng;

/// Chooses a move for an AI seat.
///
/// `legal` is the board engine's legal-move set for `fen`; implementations
/// must pick from it or return `None` to abstain.
#[async_trait]
pub trait MoveAdvisor: Send + Sync {
    async fn choose_move(&self, fen: &str, legal: &[String]) -> Option<String>;
}

/// Advisor that picks uniformly from the legal moves.
pub struct RandomAdvisor {
    /// `Mutex` for interior mutability: trait methods take `&self` but the
    /// RNG needs mutable access.
    rng: Mutex<StdRng>,
}

impl RandomAdvisor {
    /// `seed` makes the advisor deterministic; `None` uses system entropy.
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_os_rng(),
        };
        Self {
            rng: Mutex::new(rng),
        }
    }
}

#[async_trait]
impl MoveAdvisor for RandomAdvisor {
    async fn choose_move(&self, _fen: &str, legal: &[String]) -> Option<String> {
        let mut rng = self.rng.lock();
        legal.choose(&mut *rng).cloned()
    }
}
