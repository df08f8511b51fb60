//! Persistence for cleaned feeds and run summaries.
//!
//! Cleaned records are written as GTFS-style CSV files, optionally
//! gzip-compressed; run summaries are appended to a CSV log.

use anyhow::{Context, Result};
use flate2::Compression;
use flate2::write::GzEncoder;
use serde::Serialize;
use tracing::{debug, info};

use crate::pipeline::CleanedFeed;
use crate::stats::CleanupStats;
use csv::WriterBuilder;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Logs a run summary using Rust's debug pretty-print format.
pub fn print_pretty(stats: &CleanupStats) {
    debug!("{:#?}", stats);
}

/// Logs a run summary as pretty-printed JSON.
pub fn print_json(stats: &CleanupStats) -> Result<()> {
    info!("{}", serde_json::to_string_pretty(stats)?);
    Ok(())
}

/// Appends a [`CleanupStats`] record as a row to a CSV file.
///
/// Creates the file with headers if it does not already exist.
pub fn append_record(path: &str, stats: &CleanupStats) -> Result<()> {
    let file_exists = Path::new(path).exists();
    debug!(path, file_exists, "Appending CSV record");

    let file = OpenOptions::new().append(true).create(true).open(path)?;

    let mut writer = WriterBuilder::new()
        .has_headers(!file_exists) // IMPORTANT when appending
        .from_writer(file);

    writer.serialize(stats)?;
    writer.flush()?;

    Ok(())
}

/// Writes `routes.txt`, `trips.txt` and `stops.txt` into `dir`, creating it
/// if needed. With `gzip`, each file gets a `.gz` suffix.
#[tracing::instrument(skip_all, fields(dir = %dir.display(), gzip = gzip))]
pub fn write_feed(dir: &Path, feed: &CleanedFeed, gzip: bool) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create {}", dir.display()))?;

    let paths = vec![
        write_records(dir, "routes.txt", &feed.routes, gzip)?,
        write_records(dir, "trips.txt", &feed.trips, gzip)?,
        write_records(dir, "stops.txt", &feed.stops, gzip)?,
    ];
    info!(files = paths.len(), "Cleaned feed written");
    Ok(paths)
}

fn write_records<T: Serialize>(
    dir: &Path,
    file_name: &str,
    records: &[T],
    gzip: bool,
) -> Result<PathBuf> {
    let path = if gzip {
        dir.join(format!("{file_name}.gz"))
    } else {
        dir.join(file_name)
    };
    let file =
        File::create(&path).with_context(|| format!("failed to create {}", path.display()))?;

    if gzip {
        let encoder = GzEncoder::new(file, Compression::default());
        let encoder = serialize_all(encoder, records)?;
        encoder.finish()?;
    } else {
        serialize_all(file, records)?;
    }

    debug!(path = %path.display(), records = records.len(), "CSV written");
    Ok(path)
}

fn serialize_all<W: Write, T: Serialize>(writer: W, records: &[T]) -> Result<W> {
    let mut writer = WriterBuilder::new().from_writer(writer);
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("failed to flush CSV writer: {}", e.error()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::{Route, RouteType};
    use crate::pipeline::CleanedStop;
    use flate2::read::GzDecoder;
    use std::env;
    use std::fs;
    use std::io::Read;

    fn temp_path(name: &str) -> String {
        format!("{}/{}", env::temp_dir().display(), name)
    }

    fn sample_feed() -> CleanedFeed {
        CleanedFeed {
            routes: vec![Route {
                route_id: "1".to_string(),
                route_short_name: "1".to_string(),
                route_long_name: "Confederation".to_string(),
                route_type: RouteType::LightRail,
                route_color: Some("C80D1A".to_string()),
            }],
            trips: vec![],
            stops: vec![CleanedStop {
                stop_id: 3017,
                feed_stop_id: "CD995".to_string(),
                stop_code: "3017".to_string(),
                stop_name: "Blair".to_string(),
                stop_lat: None,
                stop_lon: None,
            }],
            stats: CleanupStats::default(),
        }
    }

    #[test]
    fn test_print_pretty_does_not_panic() {
        let stats = CleanupStats::default();
        print_pretty(&stats);
    }

    #[test]
    fn test_print_json_does_not_panic() {
        let stats = CleanupStats::default();
        print_json(&stats).unwrap();
    }

    #[test]
    fn test_append_record_writes_header_once() {
        let path = temp_path("gtfs_agency_rules_test_header.csv");
        let _ = fs::remove_file(&path);

        let stats = CleanupStats::default();
        append_record(&path, &stats).unwrap();
        append_record(&path, &stats).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let header_count = content.lines().filter(|l| l.contains("timestamp")).count();
        assert_eq!(header_count, 1);
        // 1 header + 2 data rows
        assert_eq!(content.lines().count(), 3);

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_write_feed_plain() {
        let dir = PathBuf::from(temp_path("gtfs_agency_rules_test_plain"));
        let _ = fs::remove_dir_all(&dir);

        let paths = write_feed(&dir, &sample_feed(), false).unwrap();
        assert_eq!(paths.len(), 3);

        let routes = fs::read_to_string(dir.join("routes.txt")).unwrap();
        assert_eq!(
            routes.lines().next(),
            Some("route_id,route_short_name,route_long_name,route_type,route_color")
        );
        assert_eq!(routes.lines().nth(1), Some("1,1,Confederation,0,C80D1A"));

        let stops = fs::read_to_string(dir.join("stops.txt")).unwrap();
        assert_eq!(stops.lines().nth(1), Some("3017,CD995,3017,Blair,,"));

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_write_feed_gzip() {
        let dir = PathBuf::from(temp_path("gtfs_agency_rules_test_gzip"));
        let _ = fs::remove_dir_all(&dir);

        write_feed(&dir, &sample_feed(), true).unwrap();

        let file = fs::File::open(dir.join("stops.txt.gz")).unwrap();
        let mut content = String::new();
        GzDecoder::new(file).read_to_string(&mut content).unwrap();
        assert!(content.contains("Blair"));

        fs::remove_dir_all(&dir).unwrap();
    }
}
