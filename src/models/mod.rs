//! Data structures for the bracket: groups, seed codes, matches, session state.

mod bracket;
mod group;
mod seed;
mod session;

pub use bracket::{BracketView, FinalResult, MatchId, MatchView, Participant, Round, UnknownMatch};
pub use group::{
    ConfigError, GroupConfiguration, GroupId, Standings, StandingsSelection, ThirdPlaceCandidate,
    EMPTY_CHOICE, TEAMS_PER_GROUP,
};
pub use seed::SeedCode;
pub use session::{BracketError, SessionState, SessionView, Stage, StandingIssue};
