mod search_config;

pub use search_config::{CollectorConfig, SearchConfig, SimilarityConfig};
