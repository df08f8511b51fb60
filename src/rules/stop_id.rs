//! Numeric stop ids.
//!
//! Current feeds publish a numeric stop code that doubles as the stop id.
//! Older vintages only had textual ids like `EE4501`; those map to
//! `zone offset + digits` through a [`ZoneTable`].

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::DataIntegrityError;
use crate::feed::Stop;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Zone {
    pub prefix: String,
    pub offset: u32,
}

/// Prefix-to-offset table. The first zone whose prefix starts the stop id
/// (ignoring case) wins. The default only holds the known offsets; other
/// zones come from the rules config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ZoneTable(pub Vec<Zone>);

impl Default for ZoneTable {
    fn default() -> Self {
        let zones = [
            ("PLACE", 1_000_000),
            ("RZ", 1_100_000),
            ("EE", 100_000),
        ];
        Self(
            zones
                .into_iter()
                .map(|(prefix, offset)| Zone {
                    prefix: prefix.to_string(),
                    offset,
                })
                .collect(),
        )
    }
}

impl ZoneTable {
    pub fn offset_for(&self, raw_stop_id: &str) -> Option<u32> {
        let upper = raw_stop_id.to_uppercase();
        self.0
            .iter()
            .find(|zone| upper.starts_with(&zone.prefix.to_uppercase()))
            .map(|zone| zone.offset)
    }

    /// `offset + first run of digits` of the raw stop id.
    pub fn stop_id(&self, stop: &Stop) -> Result<u32, DataIntegrityError> {
        let offset = self
            .offset_for(&stop.stop_id)
            .ok_or_else(|| DataIntegrityError::NoZonePrefix {
                stop_id: stop.stop_id.clone(),
            })?;
        let digits = first_digits(&stop.stop_id).ok_or_else(|| DataIntegrityError::NoDigits {
            stop_id: stop.stop_id.clone(),
        })?;

        digits
            .parse::<u32>()
            .ok()
            .and_then(|n| n.checked_add(offset))
            .ok_or_else(|| DataIntegrityError::StopIdOverflow {
                stop_id: stop.stop_id.clone(),
            })
    }
}

fn first_digits(s: &str) -> Option<&str> {
    let start = s.find(|c: char| c.is_ascii_digit())?;
    let rest = &s[start..];
    let end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    Some(&rest[..end])
}

/// How a stop's numeric id is obtained.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum StopIdMode {
    /// The stop code is the stop id.
    #[default]
    DirectFromCode,
    /// Stop code when numeric, else the zone table over the raw stop id.
    PrefixZoneTable {
        #[serde(default)]
        zones: ZoneTable,
    },
}

impl StopIdMode {
    pub fn stop_id(&self, stop: &Stop) -> Result<u32, DataIntegrityError> {
        if let Some(id) = id_from_code(stop)? {
            return Ok(id);
        }
        match self {
            StopIdMode::DirectFromCode => Err(DataIntegrityError::UnexpectedStopId {
                stop_id: stop.stop_id.clone(),
                stop_code: stop.stop_code.clone(),
                stop_name: stop.stop_name.clone(),
            }),
            StopIdMode::PrefixZoneTable { zones } => {
                debug!(stop_id = %stop.stop_id, "Stop code not numeric, using zone table");
                zones.stop_id(stop)
            }
        }
    }
}

fn id_from_code(stop: &Stop) -> Result<Option<u32>, DataIntegrityError> {
    let code = stop.stop_code.as_str();
    if code.is_empty() || !code.chars().all(|c| c.is_ascii_digit()) {
        return Ok(None);
    }
    code.parse::<u32>()
        .map(Some)
        .map_err(|_| DataIntegrityError::StopIdOverflow {
            stop_id: stop.stop_id.clone(),
        })
}
