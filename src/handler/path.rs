//! Request path translation
//!
//! Maps a request target onto a filesystem path below the document root.
//! `.` and `..` are resolved lexically before joining, so the result can
//! never name anything outside the root.

use percent_encoding::percent_decode_str;
use std::path::{Path, PathBuf};

/// A request path resolved against the document root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslatedPath {
    pub fs_path: PathBuf,
    /// The raw path ended with `/`
    pub trailing_slash: bool,
}

/// Strip query and fragment from a request target
pub fn strip_query(target: &str) -> &str {
    let end = target.find(['?', '#']).unwrap_or(target.len());
    &target[..end]
}

/// Collapse a run of leading slashes into one
///
/// `//host/x` would otherwise read as a protocol-relative URL when echoed
/// back in a `Location` header.
pub fn collapse_leading_slashes(path: &str) -> &str {
    let rest = path.trim_start_matches('/');
    if path.len() - rest.len() > 1 {
        &path[path.len() - rest.len() - 1..]
    } else {
        path
    }
}

/// Percent-decode a URL path; invalid UTF-8 is replaced, not rejected
pub fn decode(path: &str) -> String {
    percent_decode_str(path).decode_utf8_lossy().into_owned()
}

pub fn translate(root: &Path, target: &str) -> TranslatedPath {
    let path = strip_query(target);
    let trailing_slash = path.trim_end().ends_with('/');
    let decoded = decode(path);

    let mut segments: Vec<&str> = Vec::new();
    for segment in decoded.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            s if s.contains(['\\', '\0', ':']) => {}
            s => segments.push(s),
        }
    }

    let mut fs_path = root.to_path_buf();
    fs_path.extend(segments);

    TranslatedPath {
        fs_path,
        trailing_slash,
    }
}
