//! Label conventions shared by every OC Transpo feed (bus and train).

use lazy_static::lazy_static;
use regex::Regex;

use crate::labels;

lazy_static! {
    // "Blair - Eastbound / Est", "Tunney's Pasture (Westbound/Ouest)"
    static ref BOUND_SUFFIX: Regex = Regex::new(
        r"(?i)\s*[-(]?\s*(east|west|north|south)bound\s*/\s*(est|ouest|nord|sud)\s*\)?\s*$"
    )
    .unwrap();
    static ref BILINGUAL_PAIR: Regex = Regex::new(r"^(.+?)\s*/\s*(.+)$").unwrap();
}

/// Bilingual headsign cleanup: drops the direction suffix, collapses an
/// English/French pair that says the same thing twice, fixes casing.
pub fn clean_trip_headsign(headsign: &str) -> String {
    let headsign = BOUND_SUFFIX.replace(headsign, "");
    let headsign = collapse_bilingual_pair(&headsign);
    let headsign = labels::title_case_upper_case_words(&headsign, &[]);
    labels::clean_label(&headsign)
}

fn collapse_bilingual_pair(headsign: &str) -> String {
    if let Some(caps) = BILINGUAL_PAIR.captures(headsign) {
        let (en, fr) = (caps[1].trim(), caps[2].trim());
        if en.to_lowercase() == fr.to_lowercase() {
            return en.to_string();
        }
    }
    headsign.to_string()
}
