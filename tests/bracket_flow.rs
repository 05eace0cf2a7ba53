//! Integration tests for the full flow: standings, third-place selection, knockout propagation.

use world_cup_bracket_web::{
    build_bracket, evaluate, record_winner, BracketError, FinalResult, GroupConfiguration,
    GroupId, MatchId, Participant, Round, SessionState, Stage,
};

/// Every group ranked in setup order; thirds of groups A..H qualify.
fn complete_session(config: &GroupConfiguration) -> SessionState {
    let mut s = SessionState::new();
    for g in GroupId::ALL {
        s.set_standing(g, config.teams(g).to_vec());
    }
    s.set_qualified_thirds(GroupId::ALL[..8].iter().copied());
    s
}

fn id(n: u8) -> MatchId {
    MatchId::new(n).unwrap()
}

fn team(name: &str) -> Participant {
    Participant::Team(name.to_string())
}

/// Record team_1 as the winner of every match, in dependency order.
fn play_out_home_wins(session: &mut SessionState, config: &GroupConfiguration) {
    for m in MatchId::all() {
        let bracket = build_bracket(config, session).unwrap();
        let home = bracket.get(m).unwrap().team_1.team().unwrap().to_string();
        record_winner(session, config, m, &home).unwrap();
    }
}

#[test]
fn empty_session_is_blocked_at_group_stage() {
    let config = GroupConfiguration::world_cup_2026();
    let view = evaluate(&config, &SessionState::new());
    assert_eq!(view.stage, Stage::GroupStandings);
    assert_eq!(view.errors.len(), 12);
    assert_eq!(
        view.errors[0],
        "Fill Group A correctly (no repetition and no empty fields)."
    );
    assert!(view.bracket.is_none());
}

#[test]
fn wrong_number_of_thirds_blocks_bracket() {
    let config = GroupConfiguration::world_cup_2026();
    let mut session = complete_session(&config);
    session.set_third_qualified(GroupId::A, false);
    let view = evaluate(&config, &session);
    assert_eq!(view.stage, Stage::ThirdPlaceSelection);
    assert_eq!(view.third_placed.len(), 12);
    assert_eq!(
        build_bracket(&config, &session),
        Err(vec![BracketError::InvalidQualifiedCount { selected: 7 }])
    );
}

#[test]
fn round_of_32_is_fully_resolved() {
    let config = GroupConfiguration::world_cup_2026();
    let view = evaluate(&config, &complete_session(&config));
    assert_eq!(view.stage, Stage::Knockout);
    assert!(view.errors.is_empty());

    let bracket = view.bracket.unwrap();
    assert_eq!(bracket.matches.len(), 32);
    let r32: Vec<_> = bracket.round(Round::RoundOf32).collect();
    assert_eq!(r32.len(), 16);
    assert!(r32.iter().all(|m| m.is_resolved()));

    let m73 = bracket.get(id(73)).unwrap();
    assert_eq!(m73.description, "2A vs 2B");
    assert_eq!(m73.team_1, team("South Africa"));
    assert_eq!(m73.team_2, team("UEFA A (ITA/NIR/WAL/BIH)"));

    let m74 = bracket.get(id(74)).unwrap();
    assert_eq!(m74.description, "1E vs 3A");
    assert_eq!(m74.team_1, team("Germany"));
    assert_eq!(m74.team_2, team("South Korea"));

    let m80 = bracket.get(id(80)).unwrap();
    assert_eq!(m80.description, "1L vs 3E");
    assert_eq!(m80.team_2, team("Ivory Coast"));

    assert!(bracket
        .matches
        .iter()
        .filter(|m| m.round != Round::RoundOf32)
        .all(|m| !m.is_resolved()));
}

#[test]
fn recomputing_same_inputs_is_identical() {
    let config = GroupConfiguration::world_cup_2026();
    let mut session = complete_session(&config);
    record_winner(&mut session, &config, id(74), "Germany").unwrap();
    let a = serde_json::to_string(&evaluate(&config, &session)).unwrap();
    let b = serde_json::to_string(&evaluate(&config, &session)).unwrap();
    assert_eq!(a, b);
}

#[test]
fn winner_for_pending_match_is_rejected() {
    let config = GroupConfiguration::world_cup_2026();
    let mut session = complete_session(&config);
    record_winner(&mut session, &config, id(74), "Germany").unwrap();
    let before = session.clone();

    assert_eq!(
        record_winner(&mut session, &config, id(89), "Germany"),
        Err(BracketError::MatchPending { match_id: id(89) })
    );
    assert_eq!(session, before);
}

#[test]
fn winner_must_be_a_participant() {
    let config = GroupConfiguration::world_cup_2026();
    let mut session = complete_session(&config);
    let err = record_winner(&mut session, &config, id(73), "Brazil").unwrap_err();
    assert_eq!(
        err,
        BracketError::InvalidWinnerSelection {
            match_id: id(73),
            team: "Brazil".into()
        }
    );
    assert_eq!(err.to_string(), "Brazil is not playing in M73");
    assert!(session.winners.is_empty());
}

#[test]
fn no_winners_before_bracket_exists() {
    let config = GroupConfiguration::world_cup_2026();
    let mut session = SessionState::new();
    assert_eq!(
        record_winner(&mut session, &config, id(73), "South Africa"),
        Err(BracketError::MatchPending { match_id: id(73) })
    );
}

#[test]
fn third_place_match_is_between_semi_final_losers() {
    let config = GroupConfiguration::world_cup_2026();
    let mut session = complete_session(&config);
    play_out_home_wins(&mut session, &config);

    let bracket = build_bracket(&config, &session).unwrap();
    let semi_1 = bracket.get(MatchId::SEMI_FINAL_1).unwrap();
    assert_eq!(semi_1.team_1, team("Germany"));
    assert_eq!(semi_1.team_2, team("IC1 (NCL/JAM/COD)"));

    let third = bracket.get(MatchId::THIRD_PLACE).unwrap();
    assert_eq!(third.team_1, team("IC1 (NCL/JAM/COD)"));
    assert_eq!(third.team_2, team("Argentina"));

    let fin = bracket.get(MatchId::FINAL).unwrap();
    assert_eq!(fin.team_1, team("Germany"));
    assert_eq!(fin.team_2, team("Brazil"));

    assert_eq!(
        bracket.final_result,
        Some(FinalResult {
            champion: "Germany".into(),
            third_place: "IC1 (NCL/JAM/COD)".into(),
        })
    );
}

#[test]
fn final_result_needs_both_deciding_matches() {
    let config = GroupConfiguration::world_cup_2026();
    let mut session = complete_session(&config);
    play_out_home_wins(&mut session, &config);
    session.clear_winner(MatchId::THIRD_PLACE);
    let bracket = build_bracket(&config, &session).unwrap();
    assert!(bracket.get(MatchId::FINAL).unwrap().winner.is_some());
    assert_eq!(bracket.final_result, None);
}

#[test]
fn changing_standings_makes_downstream_winners_stale() {
    let config = GroupConfiguration::world_cup_2026();
    let mut session = complete_session(&config);
    play_out_home_wins(&mut session, &config);

    // Swap 1st and 2nd in Group E: Germany no longer plays M74.
    let mut e = config.teams(GroupId::E).to_vec();
    e.swap(0, 1);
    session.set_standing(GroupId::E, e);

    let bracket = build_bracket(&config, &session).unwrap();
    let m74 = bracket.get(id(74)).unwrap();
    assert_eq!(m74.team_1, team("Curaçao"));
    assert_eq!(m74.winner, None);
    assert!(bracket.get(id(89)).unwrap().team_1.is_pending());
    assert_eq!(bracket.final_result, None);
    // The selection itself is kept in the inputs.
    assert_eq!(session.winners.get(&id(74)).map(String::as_str), Some("Germany"));
}

#[test]
fn third_place_match_waits_for_both_semi_finals() {
    let config = GroupConfiguration::world_cup_2026();
    let mut session = complete_session(&config);
    for m in MatchId::all().take_while(|m| *m <= MatchId::SEMI_FINAL_1) {
        let bracket = build_bracket(&config, &session).unwrap();
        let home = bracket.get(m).unwrap().team_1.team().unwrap().to_string();
        record_winner(&mut session, &config, m, &home).unwrap();
    }

    let bracket = build_bracket(&config, &session).unwrap();
    assert!(bracket.get(MatchId::SEMI_FINAL_1).unwrap().winner.is_some());
    assert!(bracket.get(MatchId::SEMI_FINAL_2).unwrap().winner.is_none());
    let third = bracket.get(MatchId::THIRD_PLACE).unwrap();
    assert_eq!(third.team_1, Participant::Pending);
    assert_eq!(third.team_2, Participant::Pending);
    assert_eq!(
        record_winner(&mut session, &config, MatchId::THIRD_PLACE, "IC1 (NCL/JAM/COD)"),
        Err(BracketError::MatchPending {
            match_id: MatchId::THIRD_PLACE
        })
    );
}

#[test]
fn unknown_team_name_is_reported_verbatim() {
    let config = GroupConfiguration::world_cup_2026();
    let mut session = complete_session(&config);
    let mut choices = config.teams(GroupId::A).to_vec();
    choices[3] = "<img src=x onerror=alert(1)>".to_string();
    session.set_standing(GroupId::A, choices);

    let view = evaluate(&config, &session);
    assert_eq!(view.stage, Stage::GroupStandings);
    let expected = "Fill Group A correctly (<img src=x onerror=alert(1)> is not in this group).";
    assert_eq!(view.errors, vec![expected.to_string()]);
}
