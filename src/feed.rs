//! GTFS schedule records consumed by the rules, and CSV loading for them.
//!
//! Only the columns the rules read (or must carry through) are modelled.
//! Unknown columns are ignored by the CSV reader.

use std::fmt;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// GTFS `route_type`, basic and extended values collapsed to the basic set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "u16", into = "u16")]
pub enum RouteType {
    /// Tram, streetcar, light rail.
    LightRail,
    Subway,
    Rail,
    Bus,
    Ferry,
    CableTram,
    AerialLift,
    Funicular,
    Trolleybus,
    Monorail,
    Other(u16),
}

impl From<u16> for RouteType {
    fn from(value: u16) -> Self {
        match value {
            0 | 900..=999 => RouteType::LightRail,
            1 | 400..=499 => RouteType::Subway,
            2 | 100..=199 => RouteType::Rail,
            3 | 700..=799 => RouteType::Bus,
            4 | 1000..=1099 | 1200 => RouteType::Ferry,
            5 => RouteType::CableTram,
            6 | 1300..=1399 => RouteType::AerialLift,
            7 | 1400..=1499 => RouteType::Funicular,
            11 | 800..=899 => RouteType::Trolleybus,
            12 => RouteType::Monorail,
            other => RouteType::Other(other),
        }
    }
}

impl From<RouteType> for u16 {
    fn from(value: RouteType) -> Self {
        match value {
            RouteType::LightRail => 0,
            RouteType::Subway => 1,
            RouteType::Rail => 2,
            RouteType::Bus => 3,
            RouteType::Ferry => 4,
            RouteType::CableTram => 5,
            RouteType::AerialLift => 6,
            RouteType::Funicular => 7,
            RouteType::Trolleybus => 11,
            RouteType::Monorail => 12,
            RouteType::Other(other) => other,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub route_id: String,
    #[serde(default)]
    pub route_short_name: String,
    #[serde(default)]
    pub route_long_name: String,
    pub route_type: RouteType,
    #[serde(default)]
    pub route_color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stop {
    pub stop_id: String,
    #[serde(default)]
    pub stop_code: String,
    #[serde(default)]
    pub stop_name: String,
    #[serde(default)]
    pub stop_lat: Option<f64>,
    #[serde(default)]
    pub stop_lon: Option<f64>,
}

impl fmt::Display for Stop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Stop{{id={}, code={}, name={}}}",
            self.stop_id, self.stop_code, self.stop_name
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trip {
    pub route_id: String,
    pub service_id: String,
    pub trip_id: String,
    #[serde(default)]
    pub trip_headsign: String,
    #[serde(default)]
    pub direction_id: Option<u8>,
}

/// The subset of a schedule feed the rules apply to.
#[derive(Debug, Default)]
pub struct Feed {
    pub routes: Vec<Route>,
    pub trips: Vec<Trip>,
    pub stops: Vec<Stop>,
}

impl Feed {
    /// Reads `routes.txt`, `trips.txt` and `stops.txt` from an extracted feed
    /// directory.
    #[tracing::instrument(skip(dir), fields(dir = %dir.display()))]
    pub fn read_dir(dir: &Path) -> Result<Self> {
        let feed = Feed {
            routes: read_records(&dir.join("routes.txt"))?,
            trips: read_records(&dir.join("trips.txt"))?,
            stops: read_records(&dir.join("stops.txt"))?,
        };
        info!(
            routes = feed.routes.len(),
            trips = feed.trips.len(),
            stops = feed.stops.len(),
            "Feed loaded"
        );
        Ok(feed)
    }
}

fn read_records<T: serde::de::DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    debug!(path = %path.display(), "Reading CSV");
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("failed to open {}", path.display()))?;

    reader
        .deserialize()
        .enumerate()
        .map(|(i, record)| {
            record.with_context(|| format!("bad record {} in {}", i + 1, path.display()))
        })
        .collect()
}
