//! Point awards. Away and expelled players accrue nothing.

use crate::domain::player::Player;
use crate::domain::team::Team;

/// Award a flat bonus to every active player on the team. Returns the names
/// awarded, in roster order, for announcement.
pub fn award_team(team: &mut Team, bonus: i32) -> Vec<String> {
    let mut awarded = Vec::new();
    for player in &mut team.players {
        if award_player(player, bonus) {
            awarded.push(player.name.clone());
        }
    }
    awarded
}

/// Award a flat bonus to a single player. Silently skipped (returns false)
/// when the player is not active.
pub fn award_player(player: &mut Player, bonus: i32) -> bool {
    if player.is_active() {
        player.score += bonus;
        true
    } else {
        false
    }
}
