use std::path::Path;

use anyhow::{Context, Result, anyhow};
use log::debug;
use serde::Deserialize;

/// Static city→coordinate reference row, as stored in the locations CSV.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CityLocation {
    pub city: String,
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Clone, Default)]
pub struct LocationTable {
    rows: Vec<CityLocation>,
}

impl LocationTable {
    pub fn new(rows: Vec<CityLocation>) -> Self {
        Self { rows }
    }

    /// Reads a `city,lat,lon` CSV with a header row.
    pub fn from_csv_path(path: &Path) -> Result<Self> {
        let mut reader = csv::Reader::from_path(path)
            .with_context(|| format!("open locations csv {}", path.display()))?;
        let mut rows = Vec::new();
        for record in reader.deserialize() {
            let row: CityLocation = record
                .with_context(|| format!("decode locations row in {}", path.display()))?;
            rows.push(row);
        }
        debug!("loaded {} city locations from {}", rows.len(), path.display());
        Ok(Self { rows })
    }

    pub fn resolve(&self, city: &str) -> Result<&CityLocation> {
        self.rows
            .iter()
            .find(|row| row.city == city)
            .ok_or_else(|| anyhow!("city {city:?} not found in locations table"))
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }
}
