use std::fmt;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use chrono::NaiveDate;
use log::debug;
use rusqlite::{Connection, params};

/// Final outcome code of a match as stored in the source table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FullTimeResult {
    HomeWin,
    AwayWin,
    Draw,
}

impl FullTimeResult {
    pub fn parse(raw: &str) -> Result<Self> {
        match raw.trim() {
            "H" => Ok(Self::HomeWin),
            "A" => Ok(Self::AwayWin),
            "D" => Ok(Self::Draw),
            other => Err(anyhow!(
                "invalid full-time result code {other:?}, expected one of H, A, D"
            )),
        }
    }

    pub fn as_code(&self) -> &'static str {
        match self {
            Self::HomeWin => "H",
            Self::AwayWin => "A",
            Self::Draw => "D",
        }
    }
}

impl fmt::Display for FullTimeResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_code())
    }
}

#[derive(Debug, Clone)]
pub struct MatchRecord {
    pub match_id: i64,
    pub season: i64,
    pub division: String,
    pub date: NaiveDate,
    pub home_team: String,
    pub away_team: String,
    pub home_goals: i64,
    pub away_goals: i64,
    pub result: FullTimeResult,
}

impl MatchRecord {
    /// Result code implied by the goal columns. The stored code must agree.
    pub fn implied_result(&self) -> FullTimeResult {
        if self.home_goals > self.away_goals {
            FullTimeResult::HomeWin
        } else if self.home_goals < self.away_goals {
            FullTimeResult::AwayWin
        } else {
            FullTimeResult::Draw
        }
    }
}

pub fn open_db(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).ok();
    }
    let conn =
        Connection::open(path).with_context(|| format!("open sqlite db {}", path.display()))?;
    init_schema(&conn)?;
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS matches (
            match_id INTEGER PRIMARY KEY,
            season INTEGER NOT NULL,
            division TEXT NOT NULL,
            date TEXT NOT NULL,
            home_team TEXT NOT NULL,
            away_team TEXT NOT NULL,
            home_goals INTEGER NOT NULL,
            away_goals INTEGER NOT NULL,
            result TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_matches_season ON matches(season);
        CREATE INDEX IF NOT EXISTS idx_matches_date ON matches(date);
        "#,
    )
    .context("create sqlite schema")?;
    Ok(())
}

/// Loads the whole matches table. Season filtering happens in-process via
/// [`matches_for_season`].
pub fn load_matches(conn: &Connection) -> Result<Vec<MatchRecord>> {
    let mut stmt = conn
        .prepare(
            r#"
            SELECT
                match_id, season, division, date,
                home_team, away_team, home_goals, away_goals, result
            FROM matches
            ORDER BY date ASC, match_id ASC
            "#,
        )
        .context("prepare load matches query")?;

    let rows = stmt
        .query_map([], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, i64>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, String>(4)?,
                row.get::<_, String>(5)?,
                row.get::<_, i64>(6)?,
                row.get::<_, i64>(7)?,
                row.get::<_, String>(8)?,
            ))
        })
        .context("query load matches")?;

    let mut out = Vec::new();
    for row in rows {
        let (match_id, season, division, date, home_team, away_team, home_goals, away_goals, result) =
            row.context("decode match row")?;
        let date = NaiveDate::parse_from_str(&date, "%Y-%m-%d")
            .with_context(|| format!("match {match_id}: invalid date {date:?}"))?;
        let result = FullTimeResult::parse(&result)
            .with_context(|| format!("match {match_id}: bad result column"))?;
        out.push(MatchRecord {
            match_id,
            season,
            division,
            date,
            home_team,
            away_team,
            home_goals,
            away_goals,
            result,
        });
    }
    debug!("loaded {} match rows", out.len());
    Ok(out)
}

pub fn matches_for_season(conn: &Connection, season: i64) -> Result<Vec<MatchRecord>> {
    let mut matches = load_matches(conn)?;
    matches.retain(|m| m.season == season);
    Ok(matches)
}

pub fn insert_match(conn: &Connection, m: &MatchRecord) -> Result<()> {
    conn.execute(
        r#"
        INSERT INTO matches (
            match_id, season, division, date,
            home_team, away_team, home_goals, away_goals, result
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
        ON CONFLICT(match_id) DO UPDATE SET
            season = excluded.season,
            division = excluded.division,
            date = excluded.date,
            home_team = excluded.home_team,
            away_team = excluded.away_team,
            home_goals = excluded.home_goals,
            away_goals = excluded.away_goals,
            result = excluded.result
        "#,
        params![
            m.match_id,
            m.season,
            m.division,
            m.date.format("%Y-%m-%d").to_string(),
            m.home_team,
            m.away_team,
            m.home_goals,
            m.away_goals,
            m.result.as_code(),
        ],
    )
    .context("upsert match")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::FullTimeResult;

    #[test]
    fn parse_result_codes() {
        assert_eq!(FullTimeResult::parse("H").unwrap(), FullTimeResult::HomeWin);
        assert_eq!(FullTimeResult::parse("A").unwrap(), FullTimeResult::AwayWin);
        assert_eq!(FullTimeResult::parse(" D ").unwrap(), FullTimeResult::Draw);
        assert!(FullTimeResult::parse("X").is_err());
        assert!(FullTimeResult::parse("").is_err());
    }
}
