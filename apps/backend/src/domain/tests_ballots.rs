#![cfg(test)]

use rand::prelude::StdRng;
use rand::SeedableRng;

use crate::domain::ballots::{ballot_snapshot, quorum_reached, resolve_move, submitted_moves};
use crate::domain::color::TeamColor;
use crate::domain::player::Player;
use crate::domain::team::Team;

fn team_with(specs: &[(&str, bool, Option<&str>)]) -> Team {
    // (name, ai, ballot)
    let mut team = Team::new(TeamColor::White);
    for (name, ai, ballot) in specs {
        let mut player = if *ai {
            Player::ai(*name, TeamColor::White)
        } else {
            Player::human(*name, TeamColor::White)
        };
        player.ballot = ballot.map(str::to_string);
        team.players.push(player);
    }
    team
}

#[test]
fn quorum_counts_ai_ballots_like_any_other() {
    let mut team = team_with(&[
        ("ada", false, Some("e2e4")),
        ("Boris", true, None),
        ("bob", false, Some("d2d4")),
    ]);
    assert!(!quorum_reached(&team));

    team.find_mut("Boris").unwrap().ballot = Some("g1f3".to_string());
    assert!(quorum_reached(&team));
}

#[test]
fn quorum_ignores_away_and_expelled_in_the_target() {
    let mut team = team_with(&[
        ("ada", false, Some("e2e4")),
        ("bob", false, None),
        ("eve", false, None),
    ]);
    team.find_mut("bob").unwrap().away = true;
    team.find_mut("eve").unwrap().expelled = true;
    // One active player, one ballot.
    assert!(quorum_reached(&team));
}

#[test]
fn submitted_moves_follow_roster_order() {
    let team = team_with(&[
        ("ada", false, Some("e2e4")),
        ("bob", false, None),
        ("eve", false, Some("d2d4")),
    ]);
    assert_eq!(submitted_moves(&team), vec!["e2e4", "d2d4"]);
}

#[test]
fn resolution_with_ballots_never_leaves_the_submitted_set() {
    let submitted = vec!["e2e4".to_string(), "d2d4".to_string()];
    let legal = vec![
        "e2e4".to_string(),
        "d2d4".to_string(),
        "g1f3".to_string(),
        "b1c3".to_string(),
    ];
    let mut rng = StdRng::seed_from_u64(11);
    for _ in 0..100 {
        let chosen = resolve_move(&submitted, &legal, &mut rng).unwrap();
        assert!(submitted.contains(&chosen));
    }
}

#[test]
fn resolution_without_ballots_covers_the_legal_set() {
    let legal = vec!["e2e4".to_string(), "d2d4".to_string(), "g1f3".to_string()];
    let mut rng = StdRng::seed_from_u64(42);
    let mut seen = [0usize; 3];
    for _ in 0..3_000 {
        let chosen = resolve_move(&[], &legal, &mut rng).unwrap();
        let idx = legal.iter().position(|m| m == &chosen).unwrap();
        seen[idx] += 1;
    }
    // Uniform draw: each of the three moves should land near 1000 hits.
    for count in seen {
        assert!(count > 800 && count < 1200, "skewed distribution: {seen:?}");
    }
}

#[test]
fn resolution_with_empty_sets_is_an_invariant_violation() {
    let mut rng = StdRng::seed_from_u64(0);
    assert!(resolve_move(&[], &[], &mut rng).is_err());
}

#[test]
fn unanimous_ballots_leave_no_alternates() {
    let team = team_with(&[
        ("ada", false, Some("e2e4")),
        ("bob", false, Some("e2e4")),
        ("eve", false, Some("e2e4")),
    ]);
    let record = ballot_snapshot(&team, "fen-before".to_string(), "e2e4");
    assert_eq!(record.selected.len(), 3);
    assert!(record.alts.is_empty());
    assert!(record.selected.iter().all(|e| e.player.is_some()));
    assert_eq!(record.fen, "fen-before");
    assert_eq!(record.turn, TeamColor::White);
}

#[test]
fn unmatched_choice_records_a_synthetic_selected_entry() {
    let team = team_with(&[("ada", false, Some("d2d4")), ("bob", false, None)]);
    let record = ballot_snapshot(&team, "fen".to_string(), "g1f3");
    assert_eq!(record.selected.len(), 1);
    assert_eq!(record.selected[0].player, None);
    assert_eq!(record.selected[0].notation, "g1f3");
    assert_eq!(record.alts.len(), 1);
    assert_eq!(record.alts[0].player.as_deref(), Some("ada"));
}
