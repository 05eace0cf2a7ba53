//! Rounds after the round of 32: the fixed match graph, winner propagation, and winner recording.

use crate::logic::evaluate::build_bracket;
use crate::models::{
    BracketError, BracketView, FinalResult, GroupConfiguration, MatchId, MatchView, Participant,
    SessionState,
};
use std::collections::BTreeMap;

/// Where one side of a later-round match comes from.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TeamSource {
    WinnerOf(MatchId),
    /// Only the third-place match is fed by losers.
    LoserOf(MatchId),
}

impl std::fmt::Display for TeamSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TeamSource::WinnerOf(m) => write!(f, "Winner {}", m),
            TeamSource::LoserOf(m) => write!(f, "Loser {}", m),
        }
    }
}

/// A match from the round of 16 onwards.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct KnockoutMatch {
    pub id: MatchId,
    pub sources: [TeamSource; 2],
}

impl KnockoutMatch {
    pub fn description(&self) -> String {
        format!("{} vs {}", self.sources[0], self.sources[1])
    }
}

const fn winners_of(id: u8, a: u8, b: u8) -> KnockoutMatch {
    KnockoutMatch {
        id: MatchId::new_unchecked(id),
        sources: [
            TeamSource::WinnerOf(MatchId::new_unchecked(a)),
            TeamSource::WinnerOf(MatchId::new_unchecked(b)),
        ],
    }
}

/// M89..M104 in dependency order; every source id is lower than the match it feeds.
pub const LATER_ROUNDS: [KnockoutMatch; 16] = [
    winners_of(89, 74, 77),
    winners_of(90, 73, 75),
    winners_of(91, 76, 78),
    winners_of(92, 79, 80),
    winners_of(93, 83, 84),
    winners_of(94, 81, 82),
    winners_of(95, 86, 88),
    winners_of(96, 85, 87),
    winners_of(97, 89, 90),
    winners_of(98, 93, 94),
    winners_of(99, 91, 92),
    winners_of(100, 95, 96),
    winners_of(101, 97, 98),
    winners_of(102, 99, 100),
    KnockoutMatch {
        id: MatchId::THIRD_PLACE,
        sources: [
            TeamSource::LoserOf(MatchId::SEMI_FINAL_1),
            TeamSource::LoserOf(MatchId::SEMI_FINAL_2),
        ],
    },
    winners_of(104, 101, 102),
];

/// Resolve one side from already-computed matches.
fn resolve_source(source: TeamSource, prior: &BTreeMap<MatchId, MatchView>) -> Participant {
    let team = match source {
        TeamSource::WinnerOf(m) => prior.get(&m).and_then(|v| v.winner.as_deref()),
        TeamSource::LoserOf(m) => prior.get(&m).and_then(MatchView::loser),
    };
    team.into()
}

/// Current participants of a later-round match. Each side stays pending until its
/// source match has a recorded winner; a match fed by losers shows nobody until both
/// of its source matches are decided.
pub fn compute_match(
    definition: &KnockoutMatch,
    prior: &BTreeMap<MatchId, MatchView>,
) -> (Participant, Participant) {
    let sides = (
        resolve_source(definition.sources[0], prior),
        resolve_source(definition.sources[1], prior),
    );
    let fed_by_losers = definition
        .sources
        .iter()
        .all(|s| matches!(s, TeamSource::LoserOf(_)));
    if fed_by_losers && (sides.0.is_pending() || sides.1.is_pending()) {
        return (Participant::Pending, Participant::Pending);
    }
    sides
}

/// The recorded winner, if it is one of the match's current participants.
/// Selections left over from earlier inputs are ignored.
fn accepted_winner(view: &MatchView, winners: &BTreeMap<MatchId, String>) -> Option<String> {
    let chosen = winners.get(&view.id)?;
    (view.is_resolved() && view.has_team(chosen)).then(|| chosen.clone())
}

/// Propagate recorded winners from the round of 32 through the final.
///
/// Pure: the same round of 32 and winner selections always give the same view.
pub fn compute_bracket(
    round_of_32: Vec<MatchView>,
    winners: &BTreeMap<MatchId, String>,
) -> BracketView {
    let mut computed: BTreeMap<MatchId, MatchView> = BTreeMap::new();

    for mut view in round_of_32 {
        view.winner = accepted_winner(&view, winners);
        computed.insert(view.id, view);
    }

    for definition in &LATER_ROUNDS {
        let (team_1, team_2) = compute_match(definition, &computed);
        let mut view = MatchView {
            id: definition.id,
            round: definition.id.round(),
            description: definition.description(),
            team_1,
            team_2,
            winner: None,
        };
        view.winner = accepted_winner(&view, winners);
        computed.insert(view.id, view);
    }

    let decided = |id: MatchId| computed.get(&id).and_then(|v| v.winner.clone());
    let final_result = match (decided(MatchId::FINAL), decided(MatchId::THIRD_PLACE)) {
        (Some(champion), Some(third_place)) => Some(FinalResult {
            champion,
            third_place,
        }),
        _ => None,
    };

    BracketView {
        matches: computed.into_values().collect(),
        final_result,
    }
}

/// Record `team` as the winner of `match_id`.
///
/// Accepted only when both participants are known and `team` is one of them;
/// on rejection the session is left unchanged.
pub fn record_winner(
    session: &mut SessionState,
    config: &GroupConfiguration,
    match_id: MatchId,
    team: &str,
) -> Result<(), BracketError> {
    let pending = BracketError::MatchPending { match_id };
    let bracket = build_bracket(config, session).map_err(|_| pending.clone())?;
    let view = bracket.get(match_id).ok_or_else(|| pending.clone())?;
    if !view.is_resolved() {
        log::debug!("Rejected winner {} for {}: match pending", team, match_id);
        return Err(pending);
    }
    if !view.has_team(team) {
        log::debug!("Rejected winner {} for {}: not a participant", team, match_id);
        return Err(BracketError::InvalidWinnerSelection {
            match_id,
            team: team.to_string(),
        });
    }
    session.winners.insert(match_id, team.to_string());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Round;

    fn r32_with_teams() -> Vec<MatchView> {
        (73..=88)
            .map(|n| {
                let id = MatchId::new(n).unwrap();
                MatchView {
                    id,
                    round: Round::RoundOf32,
                    description: String::new(),
                    team_1: Participant::Team(format!("H{n}")),
                    team_2: Participant::Team(format!("A{n}")),
                    winner: None,
                }
            })
            .collect()
    }

    fn id(n: u8) -> MatchId {
        MatchId::new(n).unwrap()
    }

    #[test]
    fn graph_sources_precede_their_match() {
        for m in &LATER_ROUNDS {
            for s in m.sources {
                let (TeamSource::WinnerOf(src) | TeamSource::LoserOf(src)) = s;
                assert!(src < m.id, "{} feeds {}", src, m.id);
            }
        }
        assert_eq!(LATER_ROUNDS.len() + 16, MatchId::all().count());
    }

    #[test]
    fn later_rounds_pending_without_winners() {
        let view = compute_bracket(r32_with_teams(), &BTreeMap::new());
        assert_eq!(view.matches.len(), 32);
        for m in view.matches.iter().filter(|m| m.id.number() > 88) {
            assert!(m.team_1.is_pending() && m.team_2.is_pending(), "{}", m.id);
        }
        assert_eq!(view.final_result, None);
    }

    #[test]
    fn one_winner_partially_resolves_next_match() {
        let winners = BTreeMap::from([(id(74), "H74".to_string())]);
        let view = compute_bracket(r32_with_teams(), &winners);
        let m89 = view.get(id(89)).unwrap();
        assert_eq!(m89.team_1, Participant::Team("H74".into()));
        assert_eq!(m89.team_2, Participant::Pending);
        assert_eq!(m89.description, "Winner M74 vs Winner M77");
    }

    #[test]
    fn stale_winner_is_ignored() {
        let winners = BTreeMap::from([(id(73), "Somebody else".to_string())]);
        let view = compute_bracket(r32_with_teams(), &winners);
        assert_eq!(view.get(id(73)).unwrap().winner, None);
        assert!(view.get(id(90)).unwrap().team_1.is_pending());
    }

    #[test]
    fn third_place_match_takes_semi_final_losers() {
        let mut winners: BTreeMap<MatchId, String> = BTreeMap::new();
        for n in 73..=88 {
            winners.insert(id(n), format!("H{n}"));
        }
        for (m, pick) in [
            (89, "H74"),
            (90, "H73"),
            (91, "H76"),
            (92, "H79"),
            (93, "H83"),
            (94, "H81"),
            (95, "H86"),
            (96, "H85"),
            (97, "H74"),
            (98, "H83"),
            (99, "H76"),
            (100, "H86"),
            (101, "H74"),
            (102, "H86"),
        ] {
            winners.insert(id(m), pick.to_string());
        }
        let view = compute_bracket(r32_with_teams(), &winners);
        let third = view.get(MatchId::THIRD_PLACE).unwrap();
        assert_eq!(third.team_1, Participant::Team("H83".into()));
        assert_eq!(third.team_2, Participant::Team("H76".into()));
        assert_eq!(third.description, "Loser M101 vs Loser M102");
        let fin = view.get(MatchId::FINAL).unwrap();
        assert_eq!(fin.team_1, Participant::Team("H74".into()));
        assert_eq!(fin.team_2, Participant::Team("H86".into()));
    }
}
