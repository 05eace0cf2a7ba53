//! Third-placed teams: collect them from the standings and pick the 8 that qualify.

use crate::models::{BracketError, GroupId, Standings, ThirdPlaceCandidate};
use std::collections::BTreeSet;

/// Number of third-placed teams that go through to the round of 32.
pub const QUALIFIED_THIRDS: usize = 8;

/// Third-placed team of every complete group, in group order. Incomplete groups are skipped.
pub fn extract_third_placed(standings: &Standings) -> Vec<ThirdPlaceCandidate> {
    standings
        .iter()
        .map(|(group, ranking)| ThirdPlaceCandidate::new(group, ranking[2].clone()))
        .collect()
}

/// Exactly [`QUALIFIED_THIRDS`] must be selected.
pub fn validate_qualified_count(selected: &[ThirdPlaceCandidate]) -> Result<(), BracketError> {
    if selected.len() != QUALIFIED_THIRDS {
        return Err(BracketError::InvalidQualifiedCount {
            selected: selected.len(),
        });
    }
    Ok(())
}

/// Apply the driver's qualification marks to the full list of 12 thirds.
/// Returns the qualified candidates in group order.
pub fn select_qualified(
    thirds: &[ThirdPlaceCandidate],
    qualified_groups: &BTreeSet<GroupId>,
) -> Result<Vec<ThirdPlaceCandidate>, BracketError> {
    if thirds.len() != GroupId::ALL.len() {
        return Err(BracketError::IncompleteThirdPlaced {
            defined: thirds.len(),
        });
    }
    let selected: Vec<ThirdPlaceCandidate> = thirds
        .iter()
        .filter(|c| qualified_groups.contains(&c.group))
        .cloned()
        .collect();
    validate_qualified_count(&selected)?;
    Ok(selected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::GroupConfiguration;

    fn full_standings() -> Standings {
        let config = GroupConfiguration::world_cup_2026();
        let mut standings = Standings::default();
        for g in GroupId::ALL {
            let teams: [String; 4] = config.teams(g).to_vec().try_into().unwrap();
            standings.insert(g, teams);
        }
        standings
    }

    #[test]
    fn extracts_one_third_per_group() {
        let thirds = extract_third_placed(&full_standings());
        assert_eq!(thirds.len(), 12);
        assert_eq!(thirds[0], ThirdPlaceCandidate::new(GroupId::A, "South Korea"));
        assert_eq!(thirds[11], ThirdPlaceCandidate::new(GroupId::L, "Ghana"));
    }

    #[test]
    fn requires_exactly_eight() {
        let thirds = extract_third_placed(&full_standings());
        let seven: BTreeSet<_> = GroupId::ALL[..7].iter().copied().collect();
        assert_eq!(
            select_qualified(&thirds, &seven),
            Err(BracketError::InvalidQualifiedCount { selected: 7 })
        );
        let eight: BTreeSet<_> = GroupId::ALL[..8].iter().copied().collect();
        let selected = select_qualified(&thirds, &eight).unwrap();
        assert_eq!(selected.len(), 8);
        assert_eq!(
            BracketError::InvalidQualifiedCount { selected: 9 }.to_string(),
            "You must select exactly 8 third-placed teams (currently selected: 9)."
        );
    }

    #[test]
    fn needs_all_twelve_thirds() {
        let mut standings = Standings::default();
        standings.insert(GroupId::A, ["a1", "a2", "a3", "a4"].map(String::from));
        let thirds = extract_third_placed(&standings);
        assert_eq!(thirds, vec![ThirdPlaceCandidate::new(GroupId::A, "a3")]);
        assert_eq!(
            select_qualified(&thirds, &BTreeSet::from([GroupId::A])),
            Err(BracketError::IncompleteThirdPlaced { defined: 1 })
        );
    }
}
