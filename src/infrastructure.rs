//! Infrastructure layer for transport, parsing, downloads and configuration
//!
//! Everything that touches the network, the filesystem or raw markup lives here;
//! the application layer composes these pieces.

pub mod config; // Configuration constants and helpers
pub mod downloader;
pub mod endpoints;
pub mod http_client;
pub mod logging;
pub mod parsing;
pub mod parsing_error;

// Re-export commonly used items
pub use config::{AppConfig, ConfigManager, booth};
pub use downloader::{AssetDownloader, DownloadError, LinkState};
pub use endpoints::{EndpointError, Endpoints, SortFilter};
pub use http_client::{
    ByteStream, DocumentFetcher, HttpClient, HttpClientConfig, Request, ResponseKind,
    TransportError,
};
pub use logging::{get_log_directory, init_logging, init_logging_with_config};
pub use parsing::{
    CompiledSelectors, ListingExtractor, ListingSelectors, MappingError, ParsingError, ParsingResult,
    ProductDetailMapper,
};
