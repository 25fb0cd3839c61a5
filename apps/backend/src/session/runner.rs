//! The orchestrator loop: timed phases, turn resolution, end conditions.
//!
//! One task per session drives `Pregame -> Voting (repeating) -> Postgame`.
//! Phase waits are cancellable: quorum, any end condition, and desertion
//! wake them early through the session's `Notify`; abrupt teardown cancels
//! through the session token. Every wake-up path converges on the same
//! post-wait end-condition evaluation.

use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use tokio::time::Instant;
use tracing::{debug, error, info};

use super::{GameSession, Outbound};
use crate::domain::ballots;
use crate::domain::color::TeamColor;
use crate::domain::player::Role;
use crate::domain::state::GamePhase;
use crate::errors::DomainError;
use crate::events::SessionEvent;

pub(super) async fn run(session: Arc<GameSession>) {
    session.begin();
    loop {
        let (playing, turn, move_num) = {
            let state = session.lock_state();
            (state.playing, state.turn, state.move_num)
        };
        if !playing || session.cancelled().is_cancelled() {
            break;
        }
        session.flush(vec![session.chat(format!("Turn #{move_num}: {turn}"))]);
        session.schedule_ai_votes(turn);
        session
            .run_phase(GamePhase::Voting, session.config().move_time)
            .await;
        if !session.is_playing() {
            break;
        }
        if let Err(err) = session.resolve_turn() {
            // The chosen move came from the legal-move set; a refusal means
            // the session state and the board disagree. Finish defensively.
            error!(title = %session.title(), error = %err, "aborting session");
            let mut out = Vec::new();
            {
                let mut state = session.lock_state();
                session.end_game(&mut state, None, "internal error", &mut out);
            }
            session.flush(out);
            break;
        }
    }
    let deserted = session.lock_state().deserted();
    if !deserted && !session.cancelled().is_cancelled() {
        session
            .run_phase(GamePhase::Postgame, session.config().post_time)
            .await;
    }
    session.close();
}

impl GameSession {
    /// One-time game setup: mole assignment, turn reset, opening broadcast.
    fn begin(&self) {
        let mut out = Vec::new();
        {
            let mut state = self.lock_state();
            state.playing = true;
            state.turn = TeamColor::White;
            state.move_num = 1;
            for color in TeamColor::BOTH {
                let team = state.team_mut(color);
                if team.players.is_empty() {
                    continue;
                }
                let pick = {
                    let mut rng = self.lock_rng();
                    rng.random_range(0..team.players.len())
                };
                let mole = &mut team.players[pick];
                mole.role = Role::Mole;
                debug!(title = %self.title(), %color, mole = %mole.name, "mole assigned");
                out.push(Outbound::Direct(
                    mole.name.clone(),
                    SessionEvent::Chat {
                        msg: "You're the mole!".to_string(),
                        source: self.title().to_string(),
                    },
                ));
                out.push(Outbound::Direct(mole.name.clone(), SessionEvent::MoleAssigned));
            }
        }
        info!(title = %self.title(), "game started");
        let fen = self.lock_board().fen();
        out.push(Outbound::Broadcast(SessionEvent::GameUpdate {
            last_move: String::new(),
            fen,
        }));
        self.flush(out);
    }

    /// Enter a phase and block until its countdown elapses or the wait is
    /// woken and the wake survives a re-check. Ends with the shared
    /// end-condition evaluation, whichever way the wait finished.
    async fn run_phase(&self, phase: GamePhase, countdown: Duration) {
        let mut out = Vec::new();
        {
            let mut state = self.lock_state();
            state.phase = phase;
            out.push(Outbound::Broadcast(SessionEvent::Phase { phase }));
            if !countdown.is_zero() {
                out.push(Outbound::Broadcast(SessionEvent::Countdown {
                    seconds: countdown.as_secs(),
                }));
            }
        }
        self.flush(out);
        if !countdown.is_zero() {
            let deadline = Instant::now() + countdown;
            loop {
                // Arm the waiter before checking the condition so a signal
                // sent in between is not lost.
                let wake = self.wake_notified();
                if !self.keep_waiting(phase) {
                    break;
                }
                tokio::select! {
                    _ = tokio::time::sleep_until(deadline) => break,
                    _ = self.cancelled().cancelled() => break,
                    _ = wake => {
                        // Re-check; stale permits fall through harmlessly.
                    }
                }
            }
        }
        let to_move = self.lock_state().turn;
        self.endgame_check(to_move);
    }

    /// Whether a phase wait should stay blocked. Voting ends early on quorum
    /// or game end; postgame ends early only on desertion.
    fn keep_waiting(&self, phase: GamePhase) -> bool {
        let state = self.lock_state();
        match phase {
            GamePhase::Voting => {
                state.playing && !ballots::quorum_reached(state.team(state.turn))
            }
            GamePhase::Postgame => !state.deserted(),
            GamePhase::Pregame => false,
        }
    }

    /// Ordered end-condition evaluation; the first true condition wins. No-op
    /// unless the game is still playing. `to_move` is the side the board
    /// expects to move next, which is the side a checkmate is against.
    fn endgame_check(&self, to_move: TeamColor) {
        let (playing, turn, active) = {
            let state = self.lock_state();
            (
                state.playing,
                state.turn,
                state.team(state.turn).active_count(),
            )
        };
        if !playing {
            return;
        }
        let mut out = Vec::new();
        if active == 0 {
            let mut state = self.lock_state();
            self.end_game(&mut state, Some(turn.opponent()), "forfeit", &mut out);
        } else {
            let (stalemate, checkmate, insufficient) = {
                let board = self.lock_board();
                (
                    board.is_stalemate(),
                    board.is_checkmate(),
                    board.is_insufficient_material(),
                )
            };
            if stalemate || checkmate || insufficient {
                let mut state = self.lock_state();
                if stalemate {
                    self.end_game(&mut state, None, "stalemate", &mut out);
                } else if checkmate {
                    self.end_game(&mut state, Some(to_move.opponent()), "checkmate", &mut out);
                } else {
                    self.end_game(&mut state, None, "insufficient material", &mut out);
                }
            }
        }
        self.flush(out);
    }

    /// Resolve the voting phase that just ended: pick the move, apply it,
    /// record the ballot snapshot, rotate the turn.
    fn resolve_turn(&self) -> Result<(), DomainError> {
        let (submitted, listing) = {
            let state = self.lock_state();
            let team = state.team(state.turn);
            (ballots::submitted_moves(team), ballot_listing(team))
        };
        let (legal, fen_before) = {
            let board = self.lock_board();
            (board.legal_moves(), board.fen())
        };
        let mut out = Vec::new();
        if submitted.is_empty() {
            out.push(self.chat("No legal moves selected, picking randomly..."));
        } else {
            out.push(self.chat(format!(
                "Picking randomly from the following moves:\n{listing}"
            )));
        }
        let chosen = {
            let mut rng = self.lock_rng();
            ballots::resolve_move(&submitted, &legal, &mut *rng)?
        };
        out.push(self.chat(format!("Selected Move: {chosen}")));
        self.flush(std::mem::take(&mut out));

        let applied = self.lock_board().apply(&chosen);
        if !applied {
            return Err(DomainError::invariant(format!(
                "board refused resolved move: {chosen}"
            )));
        }
        let fen = self.lock_board().fen();
        self.flush(vec![Outbound::Broadcast(SessionEvent::GameUpdate {
            last_move: chosen.clone(),
            fen,
        })]);
        // The move just played handed the board to the opponent.
        let mover = self.lock_state().turn;
        self.endgame_check(mover.opponent());

        // Record and rotate only if no end condition fired on the move.
        let mut out = Vec::new();
        {
            let mut state = self.lock_state();
            if state.playing {
                let turn = state.turn;
                let record = ballots::ballot_snapshot(state.team(turn), fen_before, &chosen);
                state.history.push(record);
                out.push(Outbound::Broadcast(SessionEvent::MoveList {
                    export: state.history_export(self.title()),
                }));
                state.team_mut(turn).clear_ballots();
                state.turn = turn.opponent();
                state.move_num += 1;
            }
        }
        self.flush(out);
        Ok(())
    }

    /// Give each AI seat on the acting team its think time, then submit a
    /// ballot through the same path humans use.
    fn schedule_ai_votes(self: &Arc<Self>, turn: TeamColor) {
        let thinkers: Vec<String> = {
            let state = self.lock_state();
            state
                .team(turn)
                .players
                .iter()
                .filter(|p| p.ai && p.is_active())
                .map(|p| p.name.clone())
                .collect()
        };
        let think_time = self.config().think_time();
        for name in thinkers {
            let session = Arc::clone(self);
            let advisor = self.advisor();
            tokio::spawn(async move {
                tokio::time::sleep(think_time).await;
                let (fen, legal) = {
                    let board = session.lock_board();
                    (board.fen(), board.legal_moves())
                };
                if let Some(notation) = advisor.choose_move(&fen, &legal).await {
                    let outcome = session.vote_move(&name, &notation);
                    if !outcome.ok {
                        // Phase may have moved on while the seat was thinking.
                        debug!(name, message = %outcome.message, "AI ballot rejected");
                    }
                }
            });
        }
    }

    /// Final bookkeeping once the loop exits: the session is terminated.
    fn close(&self) {
        info!(title = %self.title(), "session closed");
        self.flush(vec![Outbound::Broadcast(SessionEvent::Closed)]);
        self.shutdown();
    }
}

/// "name: move" lines for the pre-selection announcement.
fn ballot_listing(team: &crate::domain::team::Team) -> String {
    team.players
        .iter()
        .filter_map(|p| {
            p.ballot
                .as_ref()
                .map(|notation| format!("{}: {notation}", p.name))
        })
        .collect::<Vec<_>>()
        .join("\n")
}
