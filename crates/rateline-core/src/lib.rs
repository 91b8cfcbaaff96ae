pub mod config;
pub mod error;
pub mod models;
pub mod patterns;
pub mod pipeline;
pub mod synthetic;
pub mod testutil;
pub mod throttle;
pub mod traits;
pub mod trend;
pub mod zones;

pub use config::{PipelineConfig, Target, TransportConfig};
pub use error::AppError;
pub use models::{AcquisitionResult, HistoricalPoint, ListingRecord, Provenance};
pub use pipeline::AcquisitionPipeline;
pub use traits::{Fetcher, ListingExtractor, TrendExtractor, TrendObservation};
