//! HTTP protocol layer module
//!
//! Content types, conditional requests and response builders, independent
//! of how requests are routed to files.

pub mod body;
pub mod conditional;
pub mod mime;
pub mod response;

pub use body::ResponseBody;
pub use response::{
    build_304_response, build_404_response, build_501_response, build_error_response,
    build_file_response, build_html_response, build_redirect_response, escape_html,
};
