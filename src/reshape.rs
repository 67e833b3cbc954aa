use std::collections::{BTreeSet, HashMap};
use std::fmt;

use anyhow::{Result, anyhow};
use chrono::NaiveDate;
use log::debug;

use crate::match_store::{FullTimeResult, MatchRecord};

/// Side a match is viewed from when building team-perspective rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Perspective {
    Home,
    Away,
}

impl Perspective {
    pub const BOTH: [Perspective; 2] = [Perspective::Home, Perspective::Away];
}

/// Match outcome relative to the acting team.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TeamResult {
    Win,
    Loss,
    Draw,
}

impl TeamResult {
    pub fn as_int(&self) -> i64 {
        match self {
            Self::Win => 1,
            Self::Loss => -1,
            Self::Draw => 0,
        }
    }

    pub fn as_code(&self) -> &'static str {
        match self {
            Self::Win => "W",
            Self::Loss => "L",
            Self::Draw => "D",
        }
    }

    fn from_full_time(result: FullTimeResult, perspective: Perspective) -> Self {
        match (result, perspective) {
            (FullTimeResult::Draw, _) => Self::Draw,
            (FullTimeResult::HomeWin, Perspective::Home) => Self::Win,
            (FullTimeResult::AwayWin, Perspective::Away) => Self::Win,
            _ => Self::Loss,
        }
    }
}

impl fmt::Display for TeamResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_code())
    }
}

/// One match re-expressed from a single team's point of view. Every source
/// match yields exactly two of these, one per side.
#[derive(Debug, Clone)]
pub struct TeamMatchRow {
    pub match_id: i64,
    pub team: String,
    pub opponent: String,
    pub date: NaiveDate,
    pub division: String,
    pub goals: i64,
    pub opp_goals: i64,
    pub result: TeamResult,
    pub result_int: i64,
    pub is_home: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamSummary {
    pub team: String,
    pub goals: i64,
    pub wins: i64,
}

/// Union of home and away team names, deduplicated, sorted for determinism.
pub fn extract_teams(matches: &[MatchRecord]) -> Vec<String> {
    let mut teams = BTreeSet::new();
    for m in matches {
        teams.insert(m.home_team.clone());
        teams.insert(m.away_team.clone());
    }
    teams.into_iter().collect()
}

/// Single pass over the match set, emitting two team-perspective rows per
/// match. A match listing the same club on both sides is malformed input and
/// is rejected rather than producing rows with `team == opponent`.
pub fn reshape_matches(matches: &[MatchRecord]) -> Result<Vec<TeamMatchRow>> {
    let mut rows = Vec::with_capacity(matches.len() * 2);
    for m in matches {
        if m.home_team == m.away_team {
            return Err(anyhow!(
                "match {}: home and away team are both {:?}",
                m.match_id,
                m.home_team
            ));
        }
        for perspective in Perspective::BOTH {
            rows.push(perspective_row(m, perspective));
        }
    }
    debug!("reshaped {} matches into {} rows", matches.len(), rows.len());
    Ok(rows)
}

fn perspective_row(m: &MatchRecord, perspective: Perspective) -> TeamMatchRow {
    let (team, opponent, goals, opp_goals) = match perspective {
        Perspective::Home => (&m.home_team, &m.away_team, m.home_goals, m.away_goals),
        Perspective::Away => (&m.away_team, &m.home_team, m.away_goals, m.home_goals),
    };
    let result = TeamResult::from_full_time(m.result, perspective);
    TeamMatchRow {
        match_id: m.match_id,
        team: team.clone(),
        opponent: opponent.clone(),
        date: m.date,
        division: m.division.clone(),
        goals,
        opp_goals,
        result,
        result_int: result.as_int(),
        is_home: matches!(perspective, Perspective::Home),
    }
}

/// One summary per team in `teams`, in the given order. Teams without any
/// reshaped rows still appear, with zero goals and zero wins.
pub fn summarize_teams(teams: &[String], rows: &[TeamMatchRow]) -> Vec<TeamSummary> {
    let mut totals: HashMap<&str, (i64, i64)> = HashMap::new();
    for row in rows {
        let entry = totals.entry(row.team.as_str()).or_insert((0, 0));
        entry.0 += row.goals;
        if row.result == TeamResult::Win {
            entry.1 += 1;
        }
    }
    teams
        .iter()
        .map(|team| {
            let (goals, wins) = totals.get(team.as_str()).copied().unwrap_or((0, 0));
            TeamSummary {
                team: team.clone(),
                goals,
                wins,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{Perspective, TeamResult};
    use crate::match_store::FullTimeResult;

    #[test]
    fn result_mapping_per_side() {
        let w = TeamResult::from_full_time(FullTimeResult::HomeWin, Perspective::Home);
        let l = TeamResult::from_full_time(FullTimeResult::HomeWin, Perspective::Away);
        let d = TeamResult::from_full_time(FullTimeResult::Draw, Perspective::Away);
        assert_eq!(w, TeamResult::Win);
        assert_eq!(l, TeamResult::Loss);
        assert_eq!(d, TeamResult::Draw);
        assert_eq!(w.as_int(), 1);
        assert_eq!(l.as_int(), -1);
        assert_eq!(d.as_int(), 0);
    }
}
