pub mod fetcher;
pub mod listings;
pub mod trends;

pub use fetcher::SessionFetcher;
pub use listings::SelectorListingExtractor;
pub use trends::FaqTrendExtractor;
