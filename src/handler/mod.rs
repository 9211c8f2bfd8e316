//! Request handler module
//!
//! The base file-serving logic: path translation, files, index pages and
//! directory listings.

pub mod listing;
pub mod path;
pub mod router;
pub mod static_files;

pub use router::handle_request;
