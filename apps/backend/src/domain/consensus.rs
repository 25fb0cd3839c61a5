//! Accusation consensus detection.

use crate::domain::team::Team;

/// The unanimously accused suspect, if the team's interactive players have
/// settled on one.
///
/// Consensus requires at least one interactive player and that every
/// interactive player's live accusation targets the same suspect. An absent
/// target, or a single dissenter, blocks it. AI and expelled players are
/// ignored; targets are canonical names, compared exactly.
pub fn consensus_suspect(team: &Team) -> Option<String> {
    let mut suspect: Option<&str> = None;
    for player in team.players.iter().filter(|p| p.is_interactive()) {
        let target = player.accusation.as_deref()?;
        match suspect {
            None => suspect = Some(target),
            Some(s) if s != target => return None,
            Some(_) => {}
        }
    }
    suspect.map(str::to_string)
}
