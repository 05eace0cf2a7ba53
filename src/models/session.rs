//! SessionState (the driver's input snapshot), the derived SessionView, and BracketError.

use crate::models::bracket::{BracketView, MatchId};
use crate::models::group::{GroupId, StandingsSelection, ThirdPlaceCandidate};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Why a group's standing was rejected.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum StandingIssue {
    /// At least one position has no team.
    EmptySlot,
    /// A team was placed twice.
    DuplicateTeam,
    /// A choice is not one of the group's teams.
    UnknownTeam(String),
    /// Not exactly 4 positions were sent.
    WrongLength(usize),
}

/// Errors that block a stage or reject a driver action.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum BracketError {
    /// A group's 1st-4th ranking is incomplete or inconsistent.
    InvalidStanding { group: GroupId, issue: StandingIssue },
    /// Not every group has a complete standing, so not all 12 thirds are known.
    IncompleteThirdPlaced { defined: usize },
    /// Qualified third-placed teams must number exactly 8.
    InvalidQualifiedCount { selected: usize },
    /// No one-to-one assignment of the qualified thirds to the eligible slots exists.
    UnassignableThirdPlace { groups: Vec<GroupId> },
    /// The chosen team is not one of the match's two current participants.
    InvalidWinnerSelection { match_id: MatchId, team: String },
    /// The match does not have both participants yet.
    MatchPending { match_id: MatchId },
}

impl std::fmt::Display for BracketError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BracketError::InvalidStanding { group, issue } => match issue {
                StandingIssue::UnknownTeam(team) => {
                    write!(f, "Fill Group {} correctly ({} is not in this group).", group, team)
                }
                StandingIssue::WrongLength(n) => {
                    write!(f, "Fill Group {} correctly (expected 4 positions, got {}).", group, n)
                }
                StandingIssue::EmptySlot | StandingIssue::DuplicateTeam => write!(
                    f,
                    "Fill Group {} correctly (no repetition and no empty fields).",
                    group
                ),
            },
            BracketError::IncompleteThirdPlaced { defined } => write!(
                f,
                "All 12 third-placed teams must be defined first (currently defined: {}).",
                defined
            ),
            BracketError::InvalidQualifiedCount { selected } => write!(
                f,
                "You must select exactly 8 third-placed teams (currently selected: {}).",
                selected
            ),
            BracketError::UnassignableThirdPlace { groups } => {
                let names: Vec<String> = groups.iter().map(|g| format!("3{}", g)).collect();
                write!(
                    f,
                    "Unable to assign the selected third-placed teams ({}) to the Round of 32.",
                    names.join(", ")
                )
            }
            BracketError::InvalidWinnerSelection { match_id, team } => {
                write!(f, "{} is not playing in {}", team, match_id)
            }
            BracketError::MatchPending { match_id } => {
                write!(f, "Teams for {} are not determined yet", match_id)
            }
        }
    }
}

impl std::error::Error for BracketError {}

/// Everything the driver has entered so far. The bracket is always re-derived from this.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    /// Per-group 1st..4th choices.
    pub standings: StandingsSelection,
    /// Groups whose third-placed team is marked as qualifying.
    pub qualified_thirds: BTreeSet<GroupId>,
    /// Chosen winner per knockout match.
    pub winners: BTreeMap<MatchId, String>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace a group's 4 position choices.
    pub fn set_standing(&mut self, group: GroupId, choices: Vec<String>) {
        self.standings.insert(group, choices);
    }

    /// Mark or unmark a group's third-placed team as qualifying.
    pub fn set_third_qualified(&mut self, group: GroupId, qualified: bool) {
        if qualified {
            self.qualified_thirds.insert(group);
        } else {
            self.qualified_thirds.remove(&group);
        }
    }

    /// Replace the whole qualified set.
    pub fn set_qualified_thirds(&mut self, groups: impl IntoIterator<Item = GroupId>) {
        self.qualified_thirds = groups.into_iter().collect();
    }

    /// Drop a recorded winner. Returns whether one was recorded.
    pub fn clear_winner(&mut self, match_id: MatchId) -> bool {
        self.winners.remove(&match_id).is_some()
    }
}

/// Which step the driver is on: the first one that is blocked, or the knockout once the
/// bracket exists.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    GroupStandings,
    ThirdPlaceSelection,
    Knockout,
}

/// Everything the driver renders, derived from a [`SessionState`].
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct SessionView {
    pub stage: Stage,
    /// Human-readable problems blocking the current stage.
    pub errors: Vec<String>,
    /// Third-placed team per complete group, in group order.
    pub third_placed: Vec<ThirdPlaceCandidate>,
    pub bracket: Option<BracketView>,
}
