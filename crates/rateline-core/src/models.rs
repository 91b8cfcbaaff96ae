use serde::{Deserialize, Serialize};

/// Origin of a record: live extraction or the synthetic fallback.
///
/// Every record handed to the export collaborator carries one of these tags
/// so operators can distinguish real coverage from synthetic filler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provenance {
    Live,
    Synthetic,
}

impl std::fmt::Display for Provenance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Provenance::Live => write!(f, "live"),
            Provenance::Synthetic => write!(f, "synthetic"),
        }
    }
}

/// A current-listing record for one area/society.
///
/// `rate_per_sqft` is mandatory and positive; use [`ListingRecord::new`],
/// which refuses to construct a record without it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingRecord {
    pub area_name: String,
    pub zone: String,
    pub property_type: String,
    pub rate_per_sqft: u32,
    pub appreciation_5yr: Option<f64>,
    pub rental_yield: Option<f64>,
    pub provenance: Provenance,
}

impl ListingRecord {
    /// Build a listing record. Returns `None` for a zero rate — a listing
    /// without a positive price-per-sqft cannot exist.
    pub fn new(
        area_name: impl Into<String>,
        zone: impl Into<String>,
        property_type: impl Into<String>,
        rate_per_sqft: u32,
        appreciation_5yr: Option<f64>,
        rental_yield: Option<f64>,
        provenance: Provenance,
    ) -> Option<Self> {
        if rate_per_sqft == 0 {
            return None;
        }
        Some(Self {
            area_name: area_name.into(),
            zone: zone.into(),
            property_type: property_type.into(),
            rate_per_sqft,
            appreciation_5yr,
            rental_yield,
            provenance,
        })
    }
}

/// One point in a locality's price history.
///
/// `rental_yield` is the locality's observed (or generated) yield at export
/// time; every row of a locality's series carries the same figure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoricalPoint {
    pub locality: String,
    pub year: i32,
    pub price_per_sqft: u32,
    pub rental_yield: Option<f64>,
    pub provenance: Provenance,
}

/// Aggregate output of one acquisition run.
///
/// Owned by the pipeline until handed to the export collaborator;
/// immutable afterward.
#[derive(Debug, Clone, Serialize)]
pub struct AcquisitionResult {
    pub listings: Vec<ListingRecord>,
    pub history: Vec<HistoricalPoint>,
}

impl AcquisitionResult {
    /// Count of listing records tagged live.
    pub fn live_listing_count(&self) -> usize {
        self.listings
            .iter()
            .filter(|r| r.provenance == Provenance::Live)
            .count()
    }

    /// Count of historical points tagged live.
    pub fn live_history_count(&self) -> usize {
        self.history
            .iter()
            .filter(|p| p.provenance == Provenance::Live)
            .count()
    }
}
