//! World Cup knockout bracket: library with models and bracket logic.

pub mod logic;
pub mod models;

pub use logic::{
    assign_third_placed, build_bracket, build_round_of_32, compute_bracket, compute_match,
    evaluate, extract_third_placed, is_valid_permutation, ordinal, record_winner, resolve_seed,
    resolve_seed_code, select_qualified, validate_qualified_count, validate_standings,
};
pub use models::{
    BracketError, BracketView, ConfigError, FinalResult, GroupConfiguration, GroupId, MatchId,
    MatchView, Participant, Round, SeedCode, SessionState, SessionView, Stage, StandingIssue,
    Standings, StandingsSelection, ThirdPlaceCandidate, EMPTY_CHOICE,
};
