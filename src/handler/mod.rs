//! Request handler module
//!
//! Method validation, static file serving and directory listings. Every
//! response is decorated with the CORS and no-cache headers on its way out.

pub mod listing;
pub mod router;
pub mod static_files;

// Re-export main entry point
pub use router::handle_request;
