#![cfg(test)]

use crate::domain::color::TeamColor;
use crate::domain::player::{Player, Role};
use crate::domain::team::Team;

fn team_of(players: Vec<Player>) -> Team {
    let mut team = Team::new(TeamColor::White);
    team.players = players;
    team
}

#[test]
fn activity_classification() {
    let mut p = Player::human("ada", TeamColor::White);
    assert!(p.is_active());
    assert!(p.is_interactive());

    p.away = true;
    assert!(!p.is_active());
    assert!(!p.is_interactive());

    p.away = false;
    p.expelled = true;
    assert!(!p.is_active());
    assert!(!p.is_interactive());

    let bot = Player::ai("Boris", TeamColor::White);
    assert!(bot.is_active());
    assert!(!bot.is_interactive());
}

#[test]
fn counts_split_active_and_interactive() {
    let mut away = Player::human("away", TeamColor::White);
    away.away = true;
    let team = team_of(vec![
        Player::human("ada", TeamColor::White),
        Player::ai("Boris", TeamColor::White),
        away,
    ]);
    assert_eq!(team.active_count(), 2);
    assert_eq!(team.interactive_count(), 1);
}

#[test]
fn suspect_lookup_is_case_insensitive() {
    let team = team_of(vec![Player::human("Ada", TeamColor::White)]);
    assert!(team.find_ci("ada").is_some());
    assert!(team.find_ci("ADA").is_some());
    // Exact lookup is identity-based and stays case-sensitive.
    assert!(team.find("ada").is_none());
    assert!(team.find("Ada").is_some());
}

#[test]
fn mole_lookup_finds_the_assigned_role() {
    let mut players = vec![
        Player::human("ada", TeamColor::White),
        Player::human("bob", TeamColor::White),
    ];
    players[1].role = Role::Mole;
    let team = team_of(players);
    assert_eq!(team.mole().unwrap().name, "bob");
}

#[test]
fn resignation_requires_every_interactive_player() {
    let mut players = vec![
        Player::human("ada", TeamColor::White),
        Player::human("bob", TeamColor::White),
        Player::ai("Boris", TeamColor::White),
    ];
    players[0].resigning = true;
    let mut team = team_of(players.clone());
    // bob has not resigned; the AI's flag is irrelevant.
    assert!(!team.is_resigning());

    team.players[1].resigning = true;
    assert!(team.is_resigning());

    // A team with no interactive players cannot resign.
    players.retain(|p| p.ai);
    let bots_only = team_of(players);
    assert!(!bots_only.is_resigning());
}

#[test]
fn summary_never_exposes_the_role() {
    let mut player = Player::human("ada", TeamColor::White);
    player.role = Role::Mole;
    let json = serde_json::to_value(player.summary()).unwrap();
    assert!(json.get("role").is_none());
    assert_eq!(json["name"], "ada");
}
