#![cfg(test)]

use proptest::prelude::*;
use rand::prelude::StdRng;
use rand::SeedableRng;

use crate::domain::ballots::{ballot_snapshot, resolve_move};
use crate::domain::color::TeamColor;
use crate::domain::player::Player;
use crate::domain::team::Team;

fn notation() -> impl Strategy<Value = String> {
    "[a-h][1-8][a-h][1-8]"
}

proptest! {
    /// With at least one ballot, resolution only ever returns a submitted
    /// move, whatever the legal set looks like.
    #[test]
    fn chosen_move_comes_from_ballots_when_any_exist(
        submitted in proptest::collection::vec(notation(), 1..6),
        legal in proptest::collection::vec(notation(), 0..20),
        seed in any::<u64>(),
    ) {
        let mut rng = StdRng::seed_from_u64(seed);
        let chosen = resolve_move(&submitted, &legal, &mut rng).unwrap();
        prop_assert!(submitted.contains(&chosen));
    }

    /// Without ballots, resolution falls back to the legal set.
    #[test]
    fn chosen_move_comes_from_legal_set_otherwise(
        legal in proptest::collection::vec(notation(), 1..20),
        seed in any::<u64>(),
    ) {
        let mut rng = StdRng::seed_from_u64(seed);
        let chosen = resolve_move(&[], &legal, &mut rng).unwrap();
        prop_assert!(legal.contains(&chosen));
    }

    /// Every ballot lands in exactly one side of the snapshot, and the
    /// selected side only holds entries matching the chosen notation.
    #[test]
    fn snapshot_partitions_the_ballots(
        ballots in proptest::collection::vec(proptest::option::of(notation()), 1..6),
        chosen in notation(),
    ) {
        let mut team = Team::new(TeamColor::White);
        for (i, ballot) in ballots.iter().enumerate() {
            let mut player = Player::human(format!("p{i}"), TeamColor::White);
            player.ballot = ballot.clone();
            team.players.push(player);
        }
        let record = ballot_snapshot(&team, "fen".to_string(), &chosen);

        let ballot_count = ballots.iter().flatten().count();
        let named_selected = record.selected.iter().filter(|e| e.player.is_some()).count();
        prop_assert_eq!(named_selected + record.alts.len(), ballot_count);
        prop_assert!(record.selected.iter().all(|e| e.notation == chosen));
        prop_assert!(record.alts.iter().all(|e| e.notation != chosen));
        // The chosen move always appears, as a ballot or synthetically.
        prop_assert!(!record.selected.is_empty());
    }
}
