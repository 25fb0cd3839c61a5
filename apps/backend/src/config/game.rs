//! Per-session game configuration.
//!
//! Defaults match the long-standing tuning of the game; `from_env()` lets a
//! deployment override any of them through `MOLE_*` variables without code
//! changes. Unparseable values fall back to the default with a warning.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use tracing::warn;

#[derive(Debug, Clone)]
pub struct GameConfig {
    /// Minimum roster size per team at start (AI-fill tops up to this).
    pub min_players: usize,
    /// Per-team capacity; one slot is always held back, so at most
    /// `max_players - 1` may join a team.
    pub max_players: usize,
    /// Length of each voting phase.
    pub move_time: Duration,
    /// Length of the postgame phase.
    pub post_time: Duration,
    /// Idle window after which a pregame session counts as defunct.
    pub pre_time: Duration,
    /// Fraction of `move_time` AI players spend thinking before they vote.
    pub calc_factor: f64,
    /// Accusation consensus events allowed per team.
    pub vote_limit: u32,
    /// Bonus for catching (or being) the mole.
    pub mole_bonus: i32,
    /// Bonus for each active player on the winning team.
    pub win_bonus: i32,
    /// Top up short rosters with AI players at start.
    pub ai_fill: bool,
    /// End the game (no winner) on the first accusation consensus.
    pub end_on_accusation: bool,
    /// End the game (no winner) once both teams have spent an accusation.
    pub end_on_mutual_accusation: bool,
    /// Accused players defect to the opposing team instead of being expelled.
    pub defection: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            min_players: 3,
            max_players: 6,
            move_time: Duration::from_secs(12),
            post_time: Duration::from_secs(300),
            pre_time: Duration::from_secs(999),
            calc_factor: 0.25,
            vote_limit: 1,
            mole_bonus: 100,
            win_bonus: 200,
            ai_fill: true,
            end_on_accusation: false,
            end_on_mutual_accusation: false,
            defection: true,
        }
    }
}

impl GameConfig {
    /// Defaults overridden by any `MOLE_*` environment variables present.
    pub fn from_env() -> Self {
        let d = Self::default();
        Self {
            min_players: env_or("MOLE_MIN_PLAYERS", d.min_players),
            max_players: env_or("MOLE_MAX_PLAYERS", d.max_players),
            move_time: Duration::from_secs(env_or(
                "MOLE_MOVE_TIME_SECS",
                d.move_time.as_secs(),
            )),
            post_time: Duration::from_secs(env_or(
                "MOLE_POST_TIME_SECS",
                d.post_time.as_secs(),
            )),
            pre_time: Duration::from_secs(env_or("MOLE_PRE_TIME_SECS", d.pre_time.as_secs())),
            calc_factor: env_or("MOLE_CALC_FACTOR", d.calc_factor),
            vote_limit: env_or("MOLE_VOTE_LIMIT", d.vote_limit),
            mole_bonus: env_or("MOLE_MOLE_BONUS", d.mole_bonus),
            win_bonus: env_or("MOLE_WIN_BONUS", d.win_bonus),
            ai_fill: env_or("MOLE_AI_FILL", d.ai_fill),
            end_on_accusation: env_or("MOLE_END_ON_ACCUSATION", d.end_on_accusation),
            end_on_mutual_accusation: env_or(
                "MOLE_END_ON_MUTUAL_ACCUSATION",
                d.end_on_mutual_accusation,
            ),
            defection: env_or("MOLE_DEFECTION", d.defection),
        }
    }

    /// AI think time at the top of a turn.
    pub fn think_time(&self) -> Duration {
        self.move_time.mul_f64(self.calc_factor.clamp(0.0, 1.0))
    }
}

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(raw) => match raw.trim().parse() {
            Ok(value) => value,
            Err(_) => {
                warn!(key, raw, "unparseable config value, using default");
                default
            }
        },
        Err(_) => default,
    }
}
