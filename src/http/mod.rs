//! HTTP protocol layer module
//!
//! Response building, header decoration and request-line helpers shared by the
//! static file handler.

pub mod cors;
pub mod encoding;
pub mod mime;
pub mod range;
pub mod response;

// Re-export commonly used types
pub use cors::CorsHeaders;
pub use range::{parse_range_header, RangeParseResult};
pub use response::{
    build_error_response, build_file_response, build_listing_response, build_partial_response,
    build_redirect_response, build_416_response,
};
