//! Staged evaluation of a whole session: standings, then thirds, then the knockout bracket.

use crate::logic::assignment::build_round_of_32;
use crate::logic::knockout::compute_bracket;
use crate::logic::standings::validate_standings;
use crate::logic::third_place::{extract_third_placed, select_qualified};
use crate::models::{
    BracketError, BracketView, GroupConfiguration, SessionState, SessionView, Stage,
    ThirdPlaceCandidate,
};

struct Evaluation {
    stage: Stage,
    errors: Vec<BracketError>,
    third_placed: Vec<ThirdPlaceCandidate>,
    bracket: Option<BracketView>,
}

fn run(config: &GroupConfiguration, session: &SessionState) -> Evaluation {
    let (standings, errors) = validate_standings(config, &session.standings);
    let third_placed = extract_third_placed(&standings);
    if !errors.is_empty() {
        return Evaluation {
            stage: Stage::GroupStandings,
            errors,
            third_placed,
            bracket: None,
        };
    }

    let blocked = |e: BracketError, third_placed: Vec<ThirdPlaceCandidate>| Evaluation {
        stage: Stage::ThirdPlaceSelection,
        errors: vec![e],
        third_placed,
        bracket: None,
    };

    let qualified = match select_qualified(&third_placed, &session.qualified_thirds) {
        Ok(q) => q,
        Err(e) => return blocked(e, third_placed),
    };
    let round_of_32 = match build_round_of_32(&standings, &qualified) {
        Ok(r) => r,
        Err(e) => return blocked(e, third_placed),
    };

    Evaluation {
        stage: Stage::Knockout,
        errors: Vec::new(),
        third_placed,
        bracket: Some(compute_bracket(round_of_32, &session.winners)),
    }
}

/// Recompute everything the driver shows from the session's current inputs.
pub fn evaluate(config: &GroupConfiguration, session: &SessionState) -> SessionView {
    let e = run(config, session);
    SessionView {
        stage: e.stage,
        errors: e.errors.iter().map(ToString::to_string).collect(),
        third_placed: e.third_placed,
        bracket: e.bracket,
    }
}

/// The bracket, or the errors of the first stage that blocks it.
pub fn build_bracket(
    config: &GroupConfiguration,
    session: &SessionState,
) -> Result<BracketView, Vec<BracketError>> {
    let e = run(config, session);
    e.bracket.ok_or(e.errors)
}
