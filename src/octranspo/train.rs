//! OC Transpo O-Train (light rail) feed rules.
//!
//! https://www.octranspo.com/en/plan-your-trip/travel-tools/developers/

use lazy_static::lazy_static;
use regex::Regex;

use crate::config::RulesConfig;
use crate::error::DataIntegrityError;
use crate::feed::{Route, RouteType, Stop};
use crate::labels::{self, Locale};
use crate::octranspo::commons;
use crate::rules::ids::BATCH_TAG;
use crate::rules::{AgencyMetadata, AgencyRules, RouteIdCleanup, StopIdMode, default_exclude_route};

const KEEP: bool = false;

/// Light rail lines the feed publishes with the bus route type.
const BUS_TYPED_TRAIN_ROUTES: &[&str] = &[
    "1", // Confederation Line
    "2", // Bayview - Greenboro
    "4", // South Keys - Airport
];

/// Acronyms never title-cased.
const IGNORED_WORDS: &[&str] = &["TOH"];

const METADATA: AgencyMetadata = AgencyMetadata {
    name: "OC Transpo",
    color: "C80D1A",
    route_type: RouteType::LightRail,
    languages: &[Locale::English, Locale::French],
    use_route_short_name_for_route_id: true,
    default_route_id_enabled: true,
    default_route_long_name_enabled: true,
    default_agency_color_enabled: true,
    direction_finder_enabled: true,
    // variants of one line share a short name and are merged
    verify_route_ids_uniqueness: false,
};

lazy_static! {
    static ref O_TRAIN: Regex = labels::clean_words(&["o-train", "o train"]);
    static ref O_TRAIN_REPLACEMENT: String = labels::clean_words_replacement("");
    static ref ENDS_WITH_DIRECTION: Regex = Regex::new(
        r"(?i)(^|\W)(?:[nsewo]\.|north\s?/\s?nord|south\s?/\s?sud|east\s?/\s?est|west\s?/\s?ouest)\s*$"
    )
    .unwrap();
}

/// One step of stop name cleanup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopNameStage {
    /// Network branding says nothing about where the stop is.
    RemoveOTrain,
    RemoveTrailingDirection,
    TitleCaseUpperCaseWords,
    FixMcXCase,
    CleanBounds,
    CleanNumbers,
    CleanStreetTypes,
    CleanLabel,
}

/// Stop name stages in the order they run. Branding goes before the
/// direction marker it could hide; casing runs on the original token
/// boundaries; the label pass runs last.
pub const STOP_NAME_STAGES: [StopNameStage; 8] = [
    StopNameStage::RemoveOTrain,
    StopNameStage::RemoveTrailingDirection,
    StopNameStage::TitleCaseUpperCaseWords,
    StopNameStage::FixMcXCase,
    StopNameStage::CleanBounds,
    StopNameStage::CleanNumbers,
    StopNameStage::CleanStreetTypes,
    StopNameStage::CleanLabel,
];

pub fn remove_o_train(name: &str) -> String {
    O_TRAIN
        .replace_all(name, O_TRAIN_REPLACEMENT.as_str())
        .into_owned()
}

pub fn remove_trailing_direction(name: &str) -> String {
    ENDS_WITH_DIRECTION.replace(name, "${1}").into_owned()
}

#[derive(Debug, Clone)]
pub struct OttawaOcTranspoTrainRules {
    route_id_cleanup: RouteIdCleanup,
    stop_id_mode: StopIdMode,
    locale_aware_labels: bool,
}

impl Default for OttawaOcTranspoTrainRules {
    fn default() -> Self {
        Self::new(&RulesConfig::default())
    }
}

impl OttawaOcTranspoTrainRules {
    pub fn new(config: &RulesConfig) -> Self {
        Self {
            route_id_cleanup: config.route_id_cleanup,
            stop_id_mode: config.stop_id_mode.clone(),
            locale_aware_labels: config.locale_aware_labels,
        }
    }

    pub fn apply_stop_name_stage(&self, stage: StopNameStage, name: &str) -> String {
        match stage {
            StopNameStage::RemoveOTrain => remove_o_train(name),
            StopNameStage::RemoveTrailingDirection => remove_trailing_direction(name),
            StopNameStage::TitleCaseUpperCaseWords => {
                labels::title_case_upper_case_words(name, IGNORED_WORDS)
            }
            StopNameStage::FixMcXCase => labels::fix_mc_x_case(name),
            StopNameStage::CleanBounds => labels::clean_bounds(name),
            StopNameStage::CleanNumbers => labels::clean_numbers(name),
            StopNameStage::CleanStreetTypes => labels::clean_street_types(name),
            StopNameStage::CleanLabel if self.locale_aware_labels => {
                labels::clean_label_locale(METADATA.primary_language(), name)
            }
            StopNameStage::CleanLabel => labels::clean_label(name),
        }
    }
}

impl AgencyRules for OttawaOcTranspoTrainRules {
    fn metadata(&self) -> &AgencyMetadata {
        &METADATA
    }

    fn exclude_route(&self, route: &Route) -> bool {
        if route.route_type == RouteType::Bus
            && BUS_TYPED_TRAIN_ROUTES.contains(&route.route_short_name.as_str())
        {
            return KEEP;
        }
        default_exclude_route(&METADATA, route)
    }

    fn route_id_cleanup_regex(&self) -> Option<&Regex> {
        Some(self.route_id_cleanup.regex())
    }

    fn service_id_cleanup_regex(&self) -> Option<&Regex> {
        Some(&*BATCH_TAG)
    }

    fn trip_id_cleanup_regex(&self) -> Option<&Regex> {
        Some(&*BATCH_TAG)
    }

    fn clean_trip_headsign(&self, headsign: &str) -> String {
        commons::clean_trip_headsign(&labels::remove_via(headsign))
    }

    fn clean_stop_name(&self, stop_name: &str) -> String {
        STOP_NAME_STAGES
            .iter()
            .fold(stop_name.to_string(), |name, stage| {
                self.apply_stop_name_stage(*stage, &name)
            })
    }

    fn stop_id(&self, stop: &Stop) -> Result<u32, DataIntegrityError> {
        self.stop_id_mode.stop_id(stop)
    }
}
