//! CSV export collaborator.
//!
//! Thin persistence layer over the pipeline's output: two timestamped CSV
//! files, one per record collection, column order fixed by the record
//! structs. Every row carries its provenance tag.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use rateline_core::models::AcquisitionResult;

/// Write `listings_<ts>.csv` and `historical_<ts>.csv` under `out_dir`,
/// returning both paths.
pub fn export_result(result: &AcquisitionResult, out_dir: &Path) -> Result<(PathBuf, PathBuf)> {
    fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create output directory {}", out_dir.display()))?;

    let timestamp = Utc::now().format("%Y%m%d_%H%M%S");

    let listings_path = out_dir.join(format!("listings_{timestamp}.csv"));
    let mut writer = csv::Writer::from_path(&listings_path)
        .with_context(|| format!("Failed to open {}", listings_path.display()))?;
    for record in &result.listings {
        writer.serialize(record)?;
    }
    writer.flush()?;

    let history_path = out_dir.join(format!("historical_{timestamp}.csv"));
    let mut writer = csv::Writer::from_path(&history_path)
        .with_context(|| format!("Failed to open {}", history_path.display()))?;
    for point in &result.history {
        writer.serialize(point)?;
    }
    writer.flush()?;

    tracing::info!(
        listings = result.listings.len(),
        history_points = result.history.len(),
        listings_file = %listings_path.display(),
        history_file = %history_path.display(),
        "Exported acquisition result"
    );

    Ok((listings_path, history_path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rateline_core::models::{HistoricalPoint, ListingRecord, Provenance};

    fn sample_result() -> AcquisitionResult {
        AcquisitionResult {
            listings: vec![
                ListingRecord::new(
                    "Shanti Park",
                    "Mira Road",
                    "Residential",
                    8500,
                    Some(25.0),
                    Some(3.2),
                    Provenance::Live,
                )
                .unwrap(),
            ],
            history: vec![HistoricalPoint {
                locality: "Mira Road".into(),
                year: 2025,
                price_per_sqft: 11150,
                rental_yield: Some(3.2),
                provenance: Provenance::Live,
            }],
        }
    }

    #[test]
    fn writes_both_files_with_headers_and_provenance() {
        let dir = tempfile::tempdir().unwrap();
        let (listings_path, history_path) =
            export_result(&sample_result(), dir.path()).unwrap();

        let listings = fs::read_to_string(&listings_path).unwrap();
        assert!(listings.starts_with(
            "area_name,zone,property_type,rate_per_sqft,appreciation_5yr,rental_yield,provenance"
        ));
        assert!(listings.contains("Shanti Park,Mira Road,Residential,8500,25.0,3.2,live"));

        let history = fs::read_to_string(&history_path).unwrap();
        assert!(history.starts_with("locality,year,price_per_sqft,rental_yield,provenance"));
        assert!(history.contains("Mira Road,2025,11150,3.2,live"));
    }
}
