//! The capability interface an agency implements to customize feed cleanup.
//!
//! [`AgencyRules`] carries the generic behavior as default methods; an agency
//! overrides only what its feed needs. The pipeline depends on nothing else.

pub mod ids;
pub mod stop_id;

use regex::Regex;

use crate::error::DataIntegrityError;
use crate::feed::{Route, RouteType, Stop};
use crate::labels::{self, Locale};

pub use ids::{RouteIdCleanup, clean_id};
pub use stop_id::{StopIdMode, Zone, ZoneTable};

/// Static description of an agency and the generic behaviors it opts into.
#[derive(Debug, Clone)]
pub struct AgencyMetadata {
    pub name: &'static str,
    /// Hex RGB without the leading `#`.
    pub color: &'static str,
    pub route_type: RouteType,
    pub languages: &'static [Locale],
    pub use_route_short_name_for_route_id: bool,
    pub default_route_id_enabled: bool,
    pub default_route_long_name_enabled: bool,
    pub default_agency_color_enabled: bool,
    pub direction_finder_enabled: bool,
    pub verify_route_ids_uniqueness: bool,
}

impl AgencyMetadata {
    /// First supported language, used for locale-aware label cleanup.
    pub fn primary_language(&self) -> Locale {
        self.languages.first().copied().unwrap_or(Locale::English)
    }
}

/// Generic policy: keep only routes of the agency's route type.
pub fn default_exclude_route(metadata: &AgencyMetadata, route: &Route) -> bool {
    route.route_type != metadata.route_type
}

pub trait AgencyRules: Send + Sync {
    fn metadata(&self) -> &AgencyMetadata;

    fn exclude_route(&self, route: &Route) -> bool {
        default_exclude_route(self.metadata(), route)
    }

    fn route_id_cleanup_regex(&self) -> Option<&Regex> {
        None
    }

    fn service_id_cleanup_regex(&self) -> Option<&Regex> {
        None
    }

    fn trip_id_cleanup_regex(&self) -> Option<&Regex> {
        None
    }

    /// Short name or feed id, then the route id cleanup pattern. Several
    /// feed routes may share the result.
    fn route_id(&self, route: &Route) -> String {
        let raw = if self.metadata().use_route_short_name_for_route_id
            && !route.route_short_name.is_empty()
        {
            &route.route_short_name
        } else {
            &route.route_id
        };
        clean_id(self.route_id_cleanup_regex(), raw)
    }

    fn service_id(&self, service_id: &str) -> String {
        clean_id(self.service_id_cleanup_regex(), service_id)
    }

    fn trip_id(&self, trip_id: &str) -> String {
        clean_id(self.trip_id_cleanup_regex(), trip_id)
    }

    fn clean_route_long_name(&self, long_name: &str) -> String {
        labels::clean_label(long_name)
    }

    fn clean_trip_headsign(&self, headsign: &str) -> String {
        labels::clean_label(headsign)
    }

    fn clean_stop_name(&self, stop_name: &str) -> String {
        labels::clean_label(stop_name)
    }

    /// Generic policy: the feed's own stop id must already be numeric.
    fn stop_id(&self, stop: &Stop) -> Result<u32, DataIntegrityError> {
        stop.stop_id
            .parse::<u32>()
            .map_err(|_| DataIntegrityError::UnexpectedStopId {
                stop_id: stop.stop_id.clone(),
                stop_code: stop.stop_code.clone(),
                stop_name: stop.stop_name.clone(),
            })
    }
}
