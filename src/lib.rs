pub mod feed;
pub mod gradient;
pub mod http_client;
pub mod metric_schema;
pub mod rankings;
pub mod sample_feed;
pub mod state;
pub mod stats_cache;
pub mod stats_fetch;
