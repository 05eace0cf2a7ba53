//! Group standings: validate the driver's choices and resolve seed codes against them.

use crate::logic::validation::is_valid_permutation;
use crate::models::{
    BracketError, GroupConfiguration, GroupId, SeedCode, StandingIssue, Standings,
    StandingsSelection, EMPTY_CHOICE, TEAMS_PER_GROUP,
};

/// Validate every group's choices. Complete groups go into the returned [`Standings`];
/// each rejected (or missing) group yields one `InvalidStanding`, in group order.
pub fn validate_standings(
    config: &GroupConfiguration,
    selection: &StandingsSelection,
) -> (Standings, Vec<BracketError>) {
    let mut standings = Standings::default();
    let mut errors = Vec::new();

    for group in GroupId::ALL {
        let choices = selection.get(&group).map(Vec::as_slice).unwrap_or(&[]);
        match check_group(config, group, choices) {
            Ok(ranking) => standings.insert(group, ranking),
            Err(issue) => errors.push(BracketError::InvalidStanding { group, issue }),
        }
    }

    (standings, errors)
}

fn check_group(
    config: &GroupConfiguration,
    group: GroupId,
    choices: &[String],
) -> Result<[String; TEAMS_PER_GROUP], StandingIssue> {
    // An untouched group reads as four empty slots.
    if choices.is_empty() {
        return Err(StandingIssue::EmptySlot);
    }
    let ranking: [String; TEAMS_PER_GROUP] = choices
        .to_vec()
        .try_into()
        .map_err(|_| StandingIssue::WrongLength(choices.len()))?;

    let empty = EMPTY_CHOICE.to_string();
    if !is_valid_permutation(&ranking, &empty) {
        return Err(if ranking.contains(&empty) {
            StandingIssue::EmptySlot
        } else {
            StandingIssue::DuplicateTeam
        });
    }
    if let Some(stranger) = ranking.iter().find(|t| !config.contains_team(group, t)) {
        return Err(StandingIssue::UnknownTeam(stranger.clone()));
    }
    Ok(ranking)
}

/// Resolve a code like "2B" to a team name. `None` (unresolved) for a malformed code,
/// a position outside 1..=4, an unknown group, or a group without a complete standing.
pub fn resolve_seed_code<'a>(code: &str, standings: &'a Standings) -> Option<&'a str> {
    let seed = SeedCode::parse(code)?;
    resolve_seed(seed, standings)
}

/// Typed form of [`resolve_seed_code`].
pub fn resolve_seed(seed: SeedCode, standings: &Standings) -> Option<&str> {
    standings.team_at(seed.group, seed.position)
}
