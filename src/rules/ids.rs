//! Identifier cleanup patterns.
//!
//! Route ids are derived from short names and lose trailing numeric variant
//! groups so variants merge into one route. Trip and service ids lose the
//! batch tag a feed publication prefixes them with.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

lazy_static! {
    static ref ROUTE_ID_TWO_GROUPS: Regex = Regex::new(r"-\d+(-\d+)?$").unwrap();
    static ref ROUTE_ID_ONE_GROUP: Regex = Regex::new(r"-\d+$").unwrap();
    /// "JAN26-", "SEPT25-"
    pub static ref BATCH_TAG: Regex = Regex::new(r"^[A-Z]+\d{2}-").unwrap();
}

/// Which trailing numeric groups are stripped from a route id.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteIdCleanup {
    /// `-12` or `-12-3`.
    #[default]
    TwoGroups,
    /// `-12` only, as older feed vintages published.
    SingleGroup,
}

impl RouteIdCleanup {
    pub fn regex(&self) -> &'static Regex {
        match self {
            RouteIdCleanup::TwoGroups => &ROUTE_ID_TWO_GROUPS,
            RouteIdCleanup::SingleGroup => &ROUTE_ID_ONE_GROUP,
        }
    }
}

/// Removes the first match of `pattern` from `id`, if any.
pub fn clean_id(pattern: Option<&Regex>, id: &str) -> String {
    match pattern {
        Some(pattern) => pattern.replace(id, "").into_owned(),
        None => id.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_group_cleanup() {
        let re = RouteIdCleanup::TwoGroups.regex();
        assert_eq!(clean_id(Some(re), "12-1-2"), "12");
        assert_eq!(clean_id(Some(re), "12-3-4"), "12");
        assert_eq!(clean_id(Some(re), "1-350"), "1");
        assert_eq!(clean_id(Some(re), "2"), "2");
    }

    #[test]
    fn test_single_group_cleanup() {
        let re = RouteIdCleanup::SingleGroup.regex();
        assert_eq!(clean_id(Some(re), "12-1-2"), "12-1");
        assert_eq!(clean_id(Some(re), "1-350"), "1");
    }

    #[test]
    fn test_route_id_cleanup_is_idempotent() {
        let re = RouteIdCleanup::TwoGroups.regex();
        let once = clean_id(Some(re), "4-7-9");
        assert_eq!(clean_id(Some(re), &once), once);
    }

    #[test]
    fn test_batch_tag() {
        assert_eq!(clean_id(Some(&*BATCH_TAG), "JAN26-1234567"), "1234567");
        assert_eq!(clean_id(Some(&*BATCH_TAG), "SEPT25-WEEKDAY"), "WEEKDAY");
        assert_eq!(clean_id(Some(&*BATCH_TAG), "jan26-1234567"), "jan26-1234567");
        assert_eq!(clean_id(Some(&*BATCH_TAG), "JAN2026-1"), "JAN2026-1");
        assert_eq!(clean_id(None, "JAN26-1"), "JAN26-1");
    }

    #[test]
    fn test_route_id_cleanup_from_json() {
        let v: RouteIdCleanup = serde_json::from_str(r#""single_group""#).unwrap();
        assert_eq!(v, RouteIdCleanup::SingleGroup);
    }
}
