//! Applies an agency's [`AgencyRules`] to a loaded [`Feed`].
//!
//! Order: route filtering, identifier assignment, label cleanup, stop id
//! derivation. A stop id failure aborts the whole run.

use std::collections::{HashMap, HashSet};

use anyhow::{Result, bail};
use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::feed::{Feed, Route, Trip};
use crate::rules::AgencyRules;
use crate::stats::CleanupStats;

/// A stop with its derived numeric id. `feed_stop_id` keeps the raw id so
/// other feed files can still be joined.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CleanedStop {
    pub stop_id: u32,
    pub feed_stop_id: String,
    pub stop_code: String,
    pub stop_name: String,
    pub stop_lat: Option<f64>,
    pub stop_lon: Option<f64>,
}

#[derive(Debug, Default)]
pub struct CleanedFeed {
    pub routes: Vec<Route>,
    pub trips: Vec<Trip>,
    pub stops: Vec<CleanedStop>,
    pub stats: CleanupStats,
}

#[tracing::instrument(skip_all, fields(agency = rules.metadata().name))]
pub fn apply<R: AgencyRules + ?Sized>(rules: &R, feed: Feed) -> Result<CleanedFeed> {
    let metadata = rules.metadata();
    let mut stats = CleanupStats::new(metadata.name);
    stats.routes_read = feed.routes.len();
    stats.trips_read = feed.trips.len();
    stats.stops_read = feed.stops.len();

    // feed route id -> derived route id
    let mut route_ids: HashMap<String, String> = HashMap::new();
    let mut routes: Vec<Route> = Vec::new();
    let mut route_index: HashMap<String, usize> = HashMap::new();

    let long_name = |name: String| {
        if metadata.default_route_long_name_enabled {
            rules.clean_route_long_name(&name)
        } else {
            name
        }
    };

    for route in feed.routes {
        if rules.exclude_route(&route) {
            debug!(route_id = %route.route_id, route_type = ?route.route_type, "Route excluded");
            stats.routes_excluded += 1;
            continue;
        }

        let route_id = rules.route_id(&route);
        route_ids.insert(route.route_id.clone(), route_id.clone());

        if let Some(&i) = route_index.get(&route_id) {
            if metadata.verify_route_ids_uniqueness {
                bail!(
                    "route {:?} and {:?} both map to route ID {:?}",
                    routes[i].route_short_name,
                    route.route_short_name,
                    route_id
                );
            }
            debug!(feed_route_id = %route.route_id, %route_id, "Route merged");
            stats.routes_merged += 1;
            if routes[i].route_long_name.is_empty() && !route.route_long_name.is_empty() {
                routes[i].route_long_name = long_name(route.route_long_name);
            }
            continue;
        }

        let route_long_name = long_name(route.route_long_name);
        let route_color = match route.route_color.filter(|c| !c.is_empty()) {
            None if metadata.default_agency_color_enabled => Some(metadata.color.to_string()),
            color => color,
        };

        route_index.insert(route_id.clone(), routes.len());
        routes.push(Route {
            route_id,
            route_short_name: route.route_short_name,
            route_long_name,
            route_type: metadata.route_type,
            route_color,
        });
    }
    stats.routes_kept = routes.len();

    let mut trips = Vec::with_capacity(feed.trips.len());
    for trip in feed.trips {
        let Some(route_id) = route_ids.get(&trip.route_id) else {
            continue;
        };
        trips.push(Trip {
            route_id: route_id.clone(),
            service_id: rules.service_id(&trip.service_id),
            trip_id: rules.trip_id(&trip.trip_id),
            trip_headsign: rules.clean_trip_headsign(&trip.trip_headsign),
            direction_id: trip.direction_id,
        });
    }
    stats.trips_kept = trips.len();

    let mut seen_stop_ids = HashSet::new();
    let mut stops = Vec::with_capacity(feed.stops.len());
    for stop in feed.stops {
        let stop_id = rules
            .stop_id(&stop)
            .inspect_err(|e| error!(error = %e, %stop, "Stop ID derivation failed"))?;
        if !seen_stop_ids.insert(stop_id) {
            warn!(stop_id, feed_stop_id = %stop.stop_id, "Duplicate stop ID");
        }
        stops.push(CleanedStop {
            stop_id,
            stop_name: rules.clean_stop_name(&stop.stop_name),
            feed_stop_id: stop.stop_id,
            stop_code: stop.stop_code,
            stop_lat: stop.stop_lat,
            stop_lon: stop.stop_lon,
        });
    }

    info!(
        routes_kept = stats.routes_kept,
        routes_excluded = stats.routes_excluded,
        routes_merged = stats.routes_merged,
        trips_kept = stats.trips_kept,
        stops = stops.len(),
        "Feed cleaned"
    );

    Ok(CleanedFeed {
        routes,
        trips,
        stops,
        stats,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DataIntegrityError;
    use crate::feed::{RouteType, Stop};
    use crate::octranspo::OttawaOcTranspoTrainRules;
    use crate::rules::AgencyMetadata;

    fn route(route_id: &str, short_name: &str, route_type: RouteType) -> Route {
        Route {
            route_id: route_id.to_string(),
            route_short_name: short_name.to_string(),
            route_long_name: "".to_string(),
            route_type,
            route_color: None,
        }
    }

    fn trip(route_id: &str, trip_id: &str, headsign: &str) -> Trip {
        Trip {
            route_id: route_id.to_string(),
            service_id: "JAN26-Weekday".to_string(),
            trip_id: trip_id.to_string(),
            trip_headsign: headsign.to_string(),
            direction_id: Some(0),
        }
    }

    fn stop(stop_id: &str, stop_code: &str, name: &str) -> Stop {
        Stop {
            stop_id: stop_id.to_string(),
            stop_code: stop_code.to_string(),
            stop_name: name.to_string(),
            stop_lat: Some(45.42),
            stop_lon: Some(-75.69),
        }
    }

    fn sample_feed() -> Feed {
        Feed {
            routes: vec![
                route("1-350", "1", RouteType::Bus),
                route("7-350", "7", RouteType::Bus),
                route("12-1-2", "12-1-2", RouteType::LightRail),
                route("12-3-4", "12-3-4", RouteType::LightRail),
            ],
            trips: vec![
                trip("1-350", "JAN26-100", "Blair via Rideau"),
                trip("7-350", "JAN26-200", "Carleton"),
                trip("12-3-4", "JAN26-300", "LIMEBANK"),
            ],
            stops: vec![stop("CD995", "3017", "O-Train BLAIR e.")],
        }
    }

    #[test]
    fn test_apply_filters_merges_and_cleans() {
        let rules = OttawaOcTranspoTrainRules::default();
        let cleaned = apply(&rules, sample_feed()).unwrap();

        let route_ids: Vec<_> = cleaned.routes.iter().map(|r| r.route_id.as_str()).collect();
        assert_eq!(route_ids, vec!["1", "12"]);
        assert!(cleaned.routes.iter().all(|r| r.route_type == RouteType::LightRail));
        assert!(
            cleaned
                .routes
                .iter()
                .all(|r| r.route_color.as_deref() == Some("C80D1A"))
        );

        assert_eq!(cleaned.trips.len(), 2);
        assert_eq!(cleaned.trips[0].route_id, "1");
        assert_eq!(cleaned.trips[0].trip_id, "100");
        assert_eq!(cleaned.trips[0].service_id, "Weekday");
        assert_eq!(cleaned.trips[0].trip_headsign, "Blair");
        assert_eq!(cleaned.trips[1].route_id, "12");
        assert_eq!(cleaned.trips[1].trip_headsign, "Limebank");

        assert_eq!(cleaned.stops.len(), 1);
        assert_eq!(cleaned.stops[0].stop_id, 3017);
        assert_eq!(cleaned.stops[0].feed_stop_id, "CD995");
        assert_eq!(cleaned.stops[0].stop_name, "Blair");
    }

    #[test]
    fn test_apply_stats() {
        let rules = OttawaOcTranspoTrainRules::default();
        let stats = apply(&rules, sample_feed()).unwrap().stats;

        assert_eq!(stats.agency, "OC Transpo");
        assert_eq!(stats.routes_read, 4);
        assert_eq!(stats.routes_excluded, 1);
        assert_eq!(stats.routes_merged, 1);
        assert_eq!(stats.routes_kept, 2);
        assert_eq!(stats.trips_read, 3);
        assert_eq!(stats.trips_kept, 2);
        assert_eq!(stats.stops_read, 1);
    }

    #[test]
    fn test_apply_keeps_feed_route_color() {
        let rules = OttawaOcTranspoTrainRules::default();
        let mut feed = sample_feed();
        feed.routes[0].route_color = Some("00A650".to_string());

        let cleaned = apply(&rules, feed).unwrap();
        assert_eq!(cleaned.routes[0].route_color.as_deref(), Some("00A650"));
    }

    #[test]
    fn test_apply_aborts_on_bad_stop_id() {
        let rules = OttawaOcTranspoTrainRules::default();
        let mut feed = sample_feed();
        feed.stops.push(stop("NA990", "", "Tremblay"));

        let err = apply(&rules, feed).unwrap_err();
        let integrity = err.downcast_ref::<DataIntegrityError>().unwrap();
        assert!(matches!(
            integrity,
            DataIntegrityError::UnexpectedStopId { stop_id, .. } if stop_id == "NA990"
        ));
    }

    struct ShortNameIds(AgencyMetadata);

    impl AgencyRules for ShortNameIds {
        fn metadata(&self) -> &AgencyMetadata {
            &self.0
        }

        fn route_id(&self, route: &Route) -> String {
            route.route_short_name.clone()
        }
    }

    fn short_name_metadata() -> AgencyMetadata {
        AgencyMetadata {
            name: "Strict",
            color: "000000",
            route_type: RouteType::Bus,
            languages: &[],
            use_route_short_name_for_route_id: true,
            default_route_id_enabled: true,
            default_route_long_name_enabled: true,
            default_agency_color_enabled: false,
            direction_finder_enabled: false,
            verify_route_ids_uniqueness: true,
        }
    }

    #[test]
    fn test_apply_rejects_duplicate_route_ids_when_verified() {
        let rules = ShortNameIds(short_name_metadata());
        let feed = Feed {
            routes: vec![
                route("95-1", "95", RouteType::Bus),
                route("95-2", "95", RouteType::Bus),
            ],
            ..Feed::default()
        };

        assert!(apply(&rules, feed).is_err());
    }

    #[test]
    fn test_merged_long_name_respects_cleanup_flag() {
        let rules = ShortNameIds(AgencyMetadata {
            default_route_long_name_enabled: false,
            verify_route_ids_uniqueness: false,
            ..short_name_metadata()
        });
        let raw = "  orleans   express ";
        let mut first = route("95-1", "95", RouteType::Bus);
        let mut second = route("95-2", "95", RouteType::Bus);

        first.route_long_name = raw.to_string();
        let feed = Feed {
            routes: vec![first.clone(), second.clone()],
            ..Feed::default()
        };
        assert_eq!(apply(&rules, feed).unwrap().routes[0].route_long_name, raw);

        first.route_long_name.clear();
        second.route_long_name = raw.to_string();
        let feed = Feed {
            routes: vec![first, second],
            ..Feed::default()
        };
        let cleaned = apply(&rules, feed).unwrap();
        assert_eq!(cleaned.routes.len(), 1);
        assert_eq!(cleaned.routes[0].route_long_name, raw);
    }
}
