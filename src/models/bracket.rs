//! Knockout matches: ids, rounds, participants, and the computed bracket view.

use serde::{Deserialize, Serialize};

/// Knockout match number (M73..M104).
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MatchId(u8);

impl MatchId {
    pub const FIRST: u8 = 73;
    pub const LAST: u8 = 104;

    pub const SEMI_FINAL_1: MatchId = MatchId(101);
    pub const SEMI_FINAL_2: MatchId = MatchId(102);
    pub const THIRD_PLACE: MatchId = MatchId(103);
    pub const FINAL: MatchId = MatchId(104);

    /// `None` outside M73..M104.
    pub fn new(number: u8) -> Option<Self> {
        (Self::FIRST..=Self::LAST).contains(&number).then_some(Self(number))
    }

    /// Used for the static bracket tables, which only hold valid numbers.
    pub(crate) const fn new_unchecked(number: u8) -> Self {
        Self(number)
    }

    pub fn number(self) -> u8 {
        self.0
    }

    /// Every knockout match in dependency order (each match's sources come before it).
    pub fn all() -> impl Iterator<Item = MatchId> {
        (Self::FIRST..=Self::LAST).map(MatchId)
    }

    pub fn round(self) -> Round {
        match self.0 {
            89..=96 => Round::RoundOf16,
            97..=100 => Round::QuarterFinals,
            101 | 102 => Round::SemiFinals,
            103 => Round::ThirdPlace,
            104 => Round::Final,
            _ => Round::RoundOf32,
        }
    }
}

impl std::fmt::Display for MatchId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "M{}", self.0)
    }
}

/// Error for a string that is not a knockout match id.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UnknownMatch(pub String);

impl std::fmt::Display for UnknownMatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Unknown match '{}' (expected M73 to M104)", self.0)
    }
}

impl std::error::Error for UnknownMatch {}

impl std::str::FromStr for MatchId {
    type Err = UnknownMatch;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        trimmed
            .strip_prefix('M')
            .or_else(|| trimmed.strip_prefix('m'))
            .and_then(|n| n.parse::<u8>().ok())
            .and_then(MatchId::new)
            .ok_or_else(|| UnknownMatch(s.to_string()))
    }
}

impl TryFrom<String> for MatchId {
    type Error = UnknownMatch;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<MatchId> for String {
    fn from(id: MatchId) -> Self {
        id.to_string()
    }
}

/// Knockout round a match belongs to.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Round {
    RoundOf32,
    RoundOf16,
    QuarterFinals,
    SemiFinals,
    ThirdPlace,
    Final,
}

impl Round {
    pub fn title(self) -> &'static str {
        match self {
            Round::RoundOf32 => "Round of 32",
            Round::RoundOf16 => "Round of 16",
            Round::QuarterFinals => "Quarterfinals",
            Round::SemiFinals => "Semifinals",
            Round::ThirdPlace => "Third Place Match",
            Round::Final => "Final",
        }
    }
}

/// One side of a match: a known team, or pending until its source resolves.
#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Participant {
    Team(String),
    Pending,
}

impl Participant {
    pub fn team(&self) -> Option<&str> {
        match self {
            Participant::Team(name) => Some(name),
            Participant::Pending => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Participant::Pending)
    }
}

impl From<Option<&str>> for Participant {
    fn from(team: Option<&str>) -> Self {
        team.map_or(Participant::Pending, |t| Participant::Team(t.to_string()))
    }
}

/// Current state of one match, as shown to the driver.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct MatchView {
    pub id: MatchId,
    pub round: Round,
    /// Where the two sides come from, e.g. "1E vs 3C" or "Winner M74 vs Winner M77".
    pub description: String,
    pub team_1: Participant,
    pub team_2: Participant,
    /// Recorded winner; only present while it is one of the two current participants.
    pub winner: Option<String>,
}

impl MatchView {
    /// Both sides are known.
    pub fn is_resolved(&self) -> bool {
        !self.team_1.is_pending() && !self.team_2.is_pending()
    }

    /// The participant that is not the recorded winner.
    pub fn loser(&self) -> Option<&str> {
        let winner = self.winner.as_deref()?;
        let (t1, t2) = (self.team_1.team()?, self.team_2.team()?);
        if winner == t1 {
            Some(t2)
        } else {
            Some(t1)
        }
    }

    pub fn has_team(&self, team: &str) -> bool {
        self.team_1.team() == Some(team) || self.team_2.team() == Some(team)
    }
}

/// Champion and third place, once both deciding matches have a winner.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct FinalResult {
    pub champion: String,
    pub third_place: String,
}

/// Every knockout match (M73..M104 in order) plus the final result when known.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct BracketView {
    pub matches: Vec<MatchView>,
    pub final_result: Option<FinalResult>,
}

impl BracketView {
    pub fn get(&self, id: MatchId) -> Option<&MatchView> {
        self.matches.iter().find(|m| m.id == id)
    }

    pub fn round(&self, round: Round) -> impl Iterator<Item = &MatchView> {
        self.matches.iter().filter(move |m| m.round == round)
    }
}
