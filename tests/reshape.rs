use chrono::NaiveDate;

use matchprep::match_store::{FullTimeResult, MatchRecord};
use matchprep::reshape::{
    TeamResult, extract_teams, reshape_matches, summarize_teams,
};

fn record(
    match_id: i64,
    home: &str,
    away: &str,
    home_goals: i64,
    away_goals: i64,
    result: FullTimeResult,
) -> MatchRecord {
    MatchRecord {
        match_id,
        season: 2011,
        division: "D1".to_string(),
        date: NaiveDate::from_ymd_opt(2011, 8, 13).unwrap(),
        home_team: home.to_string(),
        away_team: away.to_string(),
        home_goals,
        away_goals,
        result,
    }
}

#[test]
fn reshape_emits_two_rows_per_match() {
    let matches = vec![
        record(1, "Ajax", "Feyenoord", 2, 1, FullTimeResult::HomeWin),
        record(2, "PSV", "Ajax", 0, 0, FullTimeResult::Draw),
        record(3, "Feyenoord", "PSV", 1, 3, FullTimeResult::AwayWin),
    ];
    let rows = reshape_matches(&matches).unwrap();
    assert_eq!(rows.len(), matches.len() * 2);
}

#[test]
fn home_win_yields_mirrored_perspectives() {
    // {id=1, home=A, away=B, 2-1, H} -> (A, W, home) and (B, L, away).
    let matches = vec![record(1, "A", "B", 2, 1, FullTimeResult::HomeWin)];
    let rows = reshape_matches(&matches).unwrap();

    let home_row = &rows[0];
    assert_eq!(home_row.team, "A");
    assert_eq!(home_row.opponent, "B");
    assert_eq!(home_row.goals, 2);
    assert_eq!(home_row.opp_goals, 1);
    assert_eq!(home_row.result, TeamResult::Win);
    assert_eq!(home_row.result_int, 1);
    assert!(home_row.is_home);

    let away_row = &rows[1];
    assert_eq!(away_row.team, "B");
    assert_eq!(away_row.opponent, "A");
    assert_eq!(away_row.goals, 1);
    assert_eq!(away_row.opp_goals, 2);
    assert_eq!(away_row.result, TeamResult::Loss);
    assert_eq!(away_row.result_int, -1);
    assert!(!away_row.is_home);
}

#[test]
fn draw_yields_draw_from_both_perspectives() {
    let matches = vec![record(9, "C", "D", 0, 0, FullTimeResult::Draw)];
    let rows = reshape_matches(&matches).unwrap();
    for row in &rows {
        assert_eq!(row.result, TeamResult::Draw);
        assert_eq!(row.result_int, 0);
    }
}

#[test]
fn row_pairs_are_exact_mirrors() {
    let matches = vec![
        record(1, "Ajax", "Feyenoord", 2, 1, FullTimeResult::HomeWin),
        record(2, "PSV", "Ajax", 0, 2, FullTimeResult::AwayWin),
        record(3, "Feyenoord", "PSV", 1, 1, FullTimeResult::Draw),
    ];
    let rows = reshape_matches(&matches).unwrap();

    for pair in rows.chunks(2) {
        let (a, b) = (&pair[0], &pair[1]);
        assert_eq!(a.match_id, b.match_id);
        assert_eq!(a.team, b.opponent);
        assert_eq!(a.opponent, b.team);
        assert_eq!(a.goals, b.opp_goals);
        assert_eq!(a.opp_goals, b.goals);
        assert_ne!(a.is_home, b.is_home);
        match a.result {
            TeamResult::Win => assert_eq!(b.result, TeamResult::Loss),
            TeamResult::Loss => assert_eq!(b.result, TeamResult::Win),
            TeamResult::Draw => assert_eq!(b.result, TeamResult::Draw),
        }
        assert_eq!(a.result_int, -b.result_int);
    }
}

#[test]
fn result_int_sums_to_wins_minus_losses() {
    let matches = vec![
        record(1, "Ajax", "Feyenoord", 2, 1, FullTimeResult::HomeWin),
        record(2, "PSV", "Ajax", 0, 2, FullTimeResult::AwayWin),
        record(3, "Ajax", "PSV", 0, 1, FullTimeResult::AwayWin),
        record(4, "Feyenoord", "Ajax", 2, 2, FullTimeResult::Draw),
    ];
    let rows = reshape_matches(&matches).unwrap();

    let ajax_rows: Vec<_> = rows.iter().filter(|r| r.team == "Ajax").collect();
    let wins = ajax_rows
        .iter()
        .filter(|r| r.result == TeamResult::Win)
        .count() as i64;
    let losses = ajax_rows
        .iter()
        .filter(|r| r.result == TeamResult::Loss)
        .count() as i64;
    let sum: i64 = ajax_rows.iter().map(|r| r.result_int).sum();
    assert_eq!(sum, wins - losses);
    // Ajax: W, W, L, D.
    assert_eq!(sum, 1);
}

#[test]
fn extract_teams_dedups_and_sorts() {
    let matches = vec![
        record(1, "PSV", "Ajax", 1, 0, FullTimeResult::HomeWin),
        record(2, "Ajax", "Feyenoord", 1, 1, FullTimeResult::Draw),
        record(3, "Feyenoord", "PSV", 0, 1, FullTimeResult::AwayWin),
    ];
    let teams = extract_teams(&matches);
    assert_eq!(teams, vec!["Ajax", "Feyenoord", "PSV"]);
}

#[test]
fn summary_totals_goals_and_wins() {
    let matches = vec![
        record(1, "Ajax", "Feyenoord", 2, 1, FullTimeResult::HomeWin),
        record(2, "PSV", "Ajax", 0, 3, FullTimeResult::AwayWin),
        record(3, "Ajax", "PSV", 1, 1, FullTimeResult::Draw),
    ];
    let teams = extract_teams(&matches);
    let rows = reshape_matches(&matches).unwrap();
    let summaries = summarize_teams(&teams, &rows);

    let ajax = summaries.iter().find(|s| s.team == "Ajax").unwrap();
    assert_eq!(ajax.goals, 6);
    assert_eq!(ajax.wins, 2);

    let psv = summaries.iter().find(|s| s.team == "PSV").unwrap();
    assert_eq!(psv.goals, 1);
    assert_eq!(psv.wins, 0);
}

#[test]
fn zero_match_team_gets_zero_summary_not_absence() {
    let matches = vec![record(1, "Ajax", "PSV", 1, 0, FullTimeResult::HomeWin)];
    let rows = reshape_matches(&matches).unwrap();

    let mut teams = extract_teams(&matches);
    teams.push("Vitesse".to_string());
    let summaries = summarize_teams(&teams, &rows);

    let vitesse = summaries.iter().find(|s| s.team == "Vitesse").unwrap();
    assert_eq!(vitesse.goals, 0);
    assert_eq!(vitesse.wins, 0);
    assert_eq!(summaries.len(), 3);
}

#[test]
fn same_team_on_both_sides_is_rejected() {
    let matches = vec![record(7, "Ajax", "Ajax", 1, 0, FullTimeResult::HomeWin)];
    let err = reshape_matches(&matches).unwrap_err();
    assert!(err.to_string().contains("home and away team"));
}
