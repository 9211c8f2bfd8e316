//! Service decorators wrapped around the file handler.
//!
//! Layering per connection, outermost first:
//! `AccessLog` -> `InjectHeaders` -> `handler::handle_request`

pub mod access_log;
pub mod headers;

pub use access_log::AccessLog;
pub use headers::{cors_no_store_headers, finalize_headers, InjectHeaders, InjectedHeaders};
