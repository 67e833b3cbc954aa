use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use log::warn;

use matchprep::locations::LocationTable;
use matchprep::weather::{WeatherConfig, WeatherError, WeatherFetcher, WeatherReply};

const DEFAULT_CITY: &str = "Berlin";
const DEFAULT_LOCATIONS_CSV: &str = "team_locations.csv";

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init();

    let city = parse_value_arg("--city").unwrap_or_else(|| DEFAULT_CITY.to_string());
    let csv_path = parse_value_arg("--locations")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_LOCATIONS_CSV));
    let dates = parse_dates_arg().context("missing required --dates <YYYY-MM-DD,...> argument")?;

    let table = LocationTable::from_csv_path(&csv_path)?;
    let location = table.resolve(&city)?.clone();
    println!("{city}: lat={} lon={}", location.lat, location.lon);

    let mut fetcher = WeatherFetcher::new(WeatherConfig::from_env(), location);
    for date in &dates {
        let unix_time = date
            .and_hms_opt(12, 0, 0)
            .map(|dt| dt.and_utc().timestamp())
            .context("midday timestamp out of range")?;
        match fetcher.fetch(unix_time) {
            Ok(WeatherReply::Observation(value)) => {
                let summary = value
                    .get("currently")
                    .and_then(|c| c.get("summary"))
                    .and_then(|s| s.as_str())
                    .unwrap_or("n/a");
                println!("{date}: {summary}");
            }
            Ok(WeatherReply::RequestUrl(url)) => {
                println!("{date}: would call {url}");
            }
            Err(WeatherError::BudgetExhausted { limit }) => {
                warn!("stopping after {limit} calls, {date} and later dates skipped");
                break;
            }
            Err(err) => return Err(err.into()),
        }
    }

    println!(
        "calls used: {}, remaining: {}",
        fetcher.calls_made(),
        fetcher.calls_remaining()
    );
    Ok(())
}

fn parse_value_arg(flag: &str) -> Option<String> {
    let prefix = format!("{flag}=");
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    for (idx, arg) in args.iter().enumerate() {
        if let Some(value) = arg.strip_prefix(&prefix) {
            let trimmed = value.trim();
            if !trimmed.is_empty() {
                return Some(trimmed.to_string());
            }
        }
        if arg == flag {
            let Some(next) = args.get(idx + 1) else {
                continue;
            };
            if !next.trim().is_empty() {
                return Some(next.trim().to_string());
            }
        }
    }
    None
}

fn parse_dates_arg() -> Option<Vec<NaiveDate>> {
    let raw = parse_value_arg("--dates")?;
    let dates = raw
        .split([',', ';', ' '])
        .filter_map(|part| NaiveDate::parse_from_str(part.trim(), "%Y-%m-%d").ok())
        .collect::<Vec<_>>();
    if dates.is_empty() { None } else { Some(dates) }
}
