use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};

use matchprep::match_store;
use matchprep::reshape::{extract_teams, reshape_matches, summarize_teams};

const DEFAULT_SEASON: i64 = 2011;

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init();

    let db_path = parse_path_arg("--db").context("missing required --db <path> argument")?;
    let season = parse_season_arg().unwrap_or(DEFAULT_SEASON);

    let conn = match_store::open_db(&db_path)?;
    let matches = match_store::matches_for_season(&conn, season)?;
    if matches.is_empty() {
        return Err(anyhow!(
            "no matches for season {season} in {}",
            db_path.display()
        ));
    }

    let teams = extract_teams(&matches);
    let rows = reshape_matches(&matches)?;
    let summaries = summarize_teams(&teams, &rows);

    println!("Season {season}: {} matches, {} teams", matches.len(), teams.len());
    println!("{:<28} {:>6} {:>5}", "team", "goals", "wins");
    for summary in &summaries {
        println!("{:<28} {:>6} {:>5}", summary.team, summary.goals, summary.wins);
    }

    Ok(())
}

fn parse_path_arg(flag: &str) -> Option<PathBuf> {
    let prefix = format!("{flag}=");
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    for (idx, arg) in args.iter().enumerate() {
        if let Some(path) = arg.strip_prefix(&prefix) {
            let trimmed = path.trim();
            if !trimmed.is_empty() {
                return Some(PathBuf::from(trimmed));
            }
        }
        if arg == flag {
            let Some(next) = args.get(idx + 1) else {
                continue;
            };
            if !next.trim().is_empty() {
                return Some(PathBuf::from(next));
            }
        }
    }
    None
}

fn parse_season_arg() -> Option<i64> {
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    for (idx, arg) in args.iter().enumerate() {
        if let Some(raw) = arg.strip_prefix("--season=") {
            if let Ok(season) = raw.trim().parse::<i64>() {
                return Some(season);
            }
        }
        if arg == "--season"
            && let Some(next) = args.get(idx + 1)
            && let Ok(season) = next.trim().parse::<i64>()
        {
            return Some(season);
        }
    }
    None
}
