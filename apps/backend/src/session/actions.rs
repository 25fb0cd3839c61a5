//! Actor-facing API: join, leave, start, ballots, accusations, resignation.
//!
//! Every call validates under the state lock, stages its messages, and
//! flushes them after the lock is released. Rejections come back as advisory
//! [`ActionOutcome`]s with the state untouched.

use std::sync::Arc;

use rand::prelude::IndexedRandom;
use tracing::{info, warn};

use super::{ActionOutcome, GameSession, Outbound};
use crate::domain::color::TeamColor;
use crate::domain::consensus;
use crate::domain::player::{Player, Role};
use crate::domain::scoring;
use crate::domain::state::GamePhase;
use crate::events::SessionEvent;

impl GameSession {
    /// Join a team, or return from being away. Fresh joins are pregame-only
    /// and capped at one short of the per-team maximum.
    pub fn join(&self, user: &str, color: TeamColor) -> ActionOutcome {
        let mut out = Vec::new();
        let result = {
            let mut state = self.lock_state();
            if let Some(existing) = state.player_color(user) {
                let Some(player) = state.team_mut(existing).find_mut(user) else {
                    return ActionOutcome::err(format!("Player not found: {user}"));
                };
                if player.away {
                    player.away = false;
                    state.last_activity = std::time::Instant::now();
                    out.push(self.teams_update(&state));
                    // Catch the returning player up on everything they missed.
                    out.push(Outbound::Direct(
                        user.to_string(),
                        SessionEvent::MoveList {
                            export: state.history_export(self.title()),
                        },
                    ));
                    ActionOutcome::ok(format!("Rejoining game: {}", self.title()))
                } else {
                    ActionOutcome::err("Error: already joined")
                }
            } else if state.phase != GamePhase::Pregame {
                ActionOutcome::err("Game already begun")
            } else if state.team(color).players.len() >= self.config().max_players - 1 {
                ActionOutcome::err("Too many players")
            } else {
                state.team_mut(color).players.push(Player::human(user, color));
                state.last_activity = std::time::Instant::now();
                info!(title = %self.title(), user, %color, "player joined");
                out.push(self.teams_update(&state));
                ActionOutcome::ok(format!("Joined game: {}", self.title()))
            }
        };
        self.flush(out);
        result
    }

    /// Leave the session. During pregame the player is removed outright;
    /// afterwards they are marked away but stay on the roster. Triggers the
    /// desertion check.
    pub fn leave(&self, user: &str) -> ActionOutcome {
        let mut out = Vec::new();
        let mut observing = false;
        {
            let mut state = self.lock_state();
            if let Some(pos) = state.observers.iter().position(|o| o == user) {
                state.observers.remove(pos);
                observing = true;
                out.push(Outbound::Direct(
                    user.to_string(),
                    SessionEvent::Chat {
                        msg: format!("No longer observing: {}", self.title()),
                        source: self.title().to_string(),
                    },
                ));
            }
        }
        let result = {
            let mut state = self.lock_state();
            match state.player_color(user) {
                Some(color) => {
                    if state.phase == GamePhase::Pregame {
                        state.team_mut(color).players.retain(|p| p.name != user);
                    } else if let Some(player) = state.team_mut(color).find_mut(user) {
                        player.away = true;
                    }
                    info!(title = %self.title(), user, "player left");
                    out.push(self.chat(format!("{user} leaves.")));
                    out.push(self.teams_update(&state));
                    // A departure can complete quorum (or empty the acting
                    // team entirely); wake the voting wait rather than let
                    // it run out the clock before noticing.
                    self.check_quorum(&state);
                    if state.deserted() {
                        match state.phase {
                            GamePhase::Pregame => {
                                warn!(title = %self.title(), "session deserted before start");
                                out.push(Outbound::Broadcast(SessionEvent::Closed));
                                self.shutdown();
                            }
                            GamePhase::Voting => {
                                self.end_game(&mut state, None, "deserted", &mut out);
                            }
                            GamePhase::Postgame => {
                                // Force-terminate the postgame wait.
                                self.wake_waiters();
                            }
                        }
                    }
                    ActionOutcome::ok(format!("Left game: {}", self.title()))
                }
                None if observing => ActionOutcome::ok(format!("Left game: {}", self.title())),
                None => ActionOutcome::err("Player not found"),
            }
        };
        self.flush(out);
        result
    }

    /// Start the game. Creator-only; validates rosters (or AI-fills them)
    /// and spawns the orchestrator loop.
    pub fn start(self: &Arc<Self>, user: &str) -> ActionOutcome {
        let mut out = Vec::new();
        let result = {
            let mut state = self.lock_state();
            if state.phase != GamePhase::Pregame || state.started {
                ActionOutcome::err("Game already begun")
            } else if user != self.creator() {
                ActionOutcome::err("Error: permission denied")
            } else {
                let black = state.team(TeamColor::Black).players.len();
                let white = state.team(TeamColor::White).players.len();
                if !self.config().ai_fill && black != white {
                    ActionOutcome::err("Error: unbalanced teams")
                } else if !self.config().ai_fill && black < self.config().min_players {
                    ActionOutcome::err("Error: too few players")
                } else {
                    if self.config().ai_fill {
                        self.ai_fill(&mut state, TeamColor::Black);
                        self.ai_fill(&mut state, TeamColor::White);
                    }
                    let too_few = TeamColor::BOTH.into_iter().any(|c| {
                        state.team(c).players.len() < self.config().min_players
                    });
                    if too_few {
                        // Name pool exhausted (or empty) before reaching the minimum.
                        ActionOutcome::err("Error: too few players")
                    } else {
                        state.started = true;
                        state.last_activity = std::time::Instant::now();
                        out.push(self.teams_update(&state));
                        info!(title = %self.title(), "starting game");
                        tokio::spawn(super::runner::run(Arc::clone(self)));
                        ActionOutcome::ok("Starting Game")
                    }
                }
            }
        };
        self.flush(out);
        result
    }

    /// Submit a move ballot for the current voting phase. Also the path AI
    /// players vote through.
    pub fn vote_move(&self, user: &str, notation: &str) -> ActionOutcome {
        // The legal set is read without the state lock (the two locks are
        // never held together). Remember which move the snapshot was taken
        // for: if resolution rotates the turn in between, the validation is
        // against a stale position and the ballot must be rejected.
        let vote_round = self.lock_state().move_num;
        let legal = self.lock_board().legal_moves();
        let mut guard = self.lock_state();
        let state = &mut *guard;
        if state.move_num != vote_round {
            return ActionOutcome::err("Position changed, vote again");
        }
        let Some(color) = state.player_color(user) else {
            return ActionOutcome::err(format!("Player not found: {user}"));
        };
        if state.phase != GamePhase::Voting {
            return ActionOutcome::err(format!("Bad phase: {}", state.phase));
        }
        if color != state.turn {
            return ActionOutcome::err(format!("Current turn: {}", state.turn));
        }
        let Some(player) = state.team_mut(color).find_mut(user) else {
            return ActionOutcome::err(format!("Player not found: {user}"));
        };
        if player.expelled {
            return ActionOutcome::err("Sorry, you've been voted off");
        }
        if !legal.iter().any(|m| m == notation) {
            return ActionOutcome::err(format!("Bad Move: {notation}"));
        }
        player.ballot = Some(notation.to_string());
        self.check_quorum(state);
        ActionOutcome::ok(format!("{user} votes: {notation}"))
    }

    /// Accuse a teammate of being the mole. Replaces the accuser's live
    /// target and runs the consensus check.
    pub fn accuse(&self, user: &str, suspect_name: &str) -> ActionOutcome {
        let mut out = Vec::new();
        let result = {
            let mut state = self.lock_state();
            let Some(color) = state.player_color(user) else {
                return ActionOutcome::err(format!("Player not found: {user}"));
            };
            if !state.playing {
                ActionOutcome::err("Game not currently running")
            } else if state.team(color).accusation_votes >= self.config().vote_limit {
                ActionOutcome::err("No more voting!")
            } else if state.team(color).find(user).is_some_and(|p| p.expelled) {
                ActionOutcome::err("Sorry, you've been voted off")
            } else if state.phase != GamePhase::Voting {
                ActionOutcome::err(format!("Cannot vote during: {}", state.phase))
            } else {
                match state.team(color).find_ci(suspect_name) {
                    None => ActionOutcome::err("Suspect not found"),
                    Some(suspect) => {
                        let suspect = suspect.name.clone();
                        if let Some(accuser) = state.team_mut(color).find_mut(user) {
                            accuser.accusation = Some(suspect.clone());
                        }
                        out.push(self.chat(format!("{user} votes off: {suspect}")));
                        self.resolve_consensus(&mut state, color, &mut out);
                        ActionOutcome::ok(format!("Accusation recorded: {suspect}"))
                    }
                }
            }
        };
        self.flush(out);
        result
    }

    /// Flag resignation. The game ends for the acting team once every
    /// interactive teammate has resigned.
    pub fn resign(&self, user: &str) -> ActionOutcome {
        let mut out = Vec::new();
        let result = {
            let mut state = self.lock_state();
            let Some(color) = state.player_color(user) else {
                return ActionOutcome::err(format!("Player not found: {user}"));
            };
            if state.phase != GamePhase::Voting {
                ActionOutcome::err(format!("Bad phase: {}", state.phase))
            } else if color != state.turn {
                ActionOutcome::err(format!("Wrong turn: {}", state.turn))
            } else {
                if let Some(player) = state.team_mut(color).find_mut(user) {
                    player.resigning = true;
                }
                out.push(self.chat(format!("{user} resigns")));
                if state.team(color).is_resigning() {
                    self.end_game(&mut state, Some(color.opponent()), "resignation", &mut out);
                }
                ActionOutcome::ok("Resignation noted")
            }
        };
        self.flush(out);
        result
    }

    /// Observe the session; receives every broadcast plus the full history
    /// up front.
    pub fn add_observer(&self, user: &str) -> ActionOutcome {
        let mut out = Vec::new();
        {
            let mut state = self.lock_state();
            if !state.observers.iter().any(|o| o == user) {
                state.observers.push(user.to_string());
                out.push(Outbound::Direct(
                    user.to_string(),
                    SessionEvent::MoveList {
                        export: state.history_export(self.title()),
                    },
                ));
            }
        }
        self.flush(out);
        ActionOutcome::ok(format!("Observing: {}", self.title()))
    }

    pub fn remove_observer(&self, user: &str) -> ActionOutcome {
        let mut state = self.lock_state();
        state.observers.retain(|o| o != user);
        drop(state);
        self.messenger_tell(
            user,
            SessionEvent::Chat {
                msg: format!("No longer observing: {}", self.title()),
                source: self.title().to_string(),
            },
        );
        ActionOutcome::ok(format!("No longer observing: {}", self.title()))
    }

    /// Consensus side effects: reveal, award, defection or expulsion, vote
    /// accounting, and the optional accusation endings.
    fn resolve_consensus(
        &self,
        state: &mut super::SessionState,
        color: TeamColor,
        out: &mut Vec<Outbound>,
    ) {
        let Some(suspect_name) = consensus::consensus_suspect(state.team(color)) else {
            return;
        };
        info!(title = %self.title(), team = %color, suspect = %suspect_name, "accusation consensus");
        out.push(self.chat(format!("{suspect_name} is voted off!")));

        let bonus = self.config().mole_bonus;
        let accused_the_mole = state
            .team(color)
            .find(&suspect_name)
            .is_some_and(|p| p.role == Role::Mole);
        if accused_the_mole {
            out.push(self.chat(format!("{suspect_name} was the Mole!")));
            for name in scoring::award_team(state.team_mut(color), bonus) {
                out.push(self.chat(format!("{name} gets {bonus} points")));
            }
        } else if let Some(mole) = state.team_mut(color).mole_mut() {
            let mole_name = mole.name.clone();
            out.push(self.chat(format!("{mole_name} was the Mole!")));
            if scoring::award_player(mole, bonus) {
                out.push(self.chat(format!("{mole_name} gets {bonus} points")));
            }
        }

        if self.config().defection {
            // Full membership transfer; the role stays where it is and an
            // expelled suspect comes back into play on the other side.
            let new_color = color.opponent();
            let team = state.team_mut(color);
            if let Some(pos) = team.players.iter().position(|p| p.name == suspect_name) {
                let mut suspect = team.players.remove(pos);
                suspect.color = new_color;
                suspect.expelled = false;
                // A ballot or resignation was cast for the old side; neither
                // follows the defector across.
                suspect.ballot = None;
                suspect.resigning = false;
                state.team_mut(new_color).players.push(suspect);
                out.push(self.chat(format!("{suspect_name} joins {new_color}")));
                out.push(self.teams_update(state));
                // Losing a member can complete the old team's quorum.
                self.check_quorum(state);
            }
        } else if let Some(suspect) = state.team_mut(color).find_mut(&suspect_name) {
            suspect.expelled = true;
        }

        state.team_mut(color).accusation_votes += 1;

        if self.config().end_on_accusation {
            self.end_game(state, None, "mole vote", out);
        } else if self.config().end_on_mutual_accusation
            && TeamColor::BOTH
                .into_iter()
                .all(|c| state.team(c).accusation_votes > 0)
        {
            self.end_game(state, None, "mutual mole vote", out);
        }
    }

    /// Top up a roster to the minimum with AI players, drawing names without
    /// replacement from the session's pool.
    fn ai_fill(&self, state: &mut super::SessionState, color: TeamColor) {
        while state.team(color).players.len() < self.config().min_players {
            let available: Vec<&String> = self
                .name_pool()
                .iter()
                .filter(|name| {
                    !TeamColor::BOTH
                        .into_iter()
                        .any(|c| state.team(c).find_ci(name).is_some())
                })
                .collect();
            let drawn = {
                let mut rng = self.lock_rng();
                available.choose(&mut *rng).map(|name| (*name).clone())
            };
            match drawn {
                Some(name) => {
                    info!(title = %self.title(), %color, name, "AI-filling seat");
                    state.team_mut(color).players.push(Player::ai(name, color));
                }
                None => {
                    warn!(title = %self.title(), %color, "name pool exhausted during AI-fill");
                    break;
                }
            }
        }
    }
}
