#![deny(clippy::wildcard_imports)]
#![cfg_attr(test, allow(clippy::wildcard_imports))]

pub mod ai;
pub mod config;
pub mod domain;
pub mod engine;
pub mod errors;
pub mod events;
pub mod logging;
pub mod session;


// Re-exports for public API
pub use ai::{MoveAdvisor, RandomAdvisor};
pub use config::game::GameConfig;
pub use config::names::load_name_pool;
pub use domain::state::{GameOutcome, GamePhase};
pub use engine::BoardEngine;
pub use errors::DomainError;
pub use events::{Messenger, SessionEvent};
pub use session::{ActionOutcome, GameSession};

// Auto-initialize logging for unit tests
#[cfg(test)]
#[ctor::ctor]
fn init_test_logging() {
    test_bootstrap::logging::init();
}
