//! Directory listing generation

use crate::http::escape_html;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use std::io;
use std::path::Path;
use tokio::fs;

/// Characters left unescaped in listing links
const LINK_SAFE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~')
    .remove(b'/');

/// One row of a listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingEntry {
    pub name: String,
    pub is_dir: bool,
    pub is_symlink: bool,
}

impl ListingEntry {
    fn href(&self) -> String {
        let link = if self.is_dir {
            format!("{}/", self.name)
        } else {
            self.name.clone()
        };
        utf8_percent_encode(&link, LINK_SAFE).to_string()
    }

    /// `@` marks a symlink and takes the place of the directory `/`
    fn display_name(&self) -> String {
        let suffix = if self.is_symlink {
            "@"
        } else if self.is_dir {
            "/"
        } else {
            ""
        };
        escape_html(&format!("{}{suffix}", self.name))
    }
}

/// Read `dir` into listing entries, sorted case-insensitively
///
/// Directories are detected through symlinks, so a link to a directory
/// links to `name/` and is shown as `name@`.
pub async fn read_entries(dir: &Path) -> io::Result<Vec<ListingEntry>> {
    let mut reader = fs::read_dir(dir).await?;
    let mut entries = Vec::new();

    while let Some(entry) = reader.next_entry().await? {
        let is_symlink = entry
            .file_type()
            .await
            .is_ok_and(|t| t.is_symlink());
        let is_dir = fs::metadata(entry.path()).await.is_ok_and(|m| m.is_dir());
        entries.push(ListingEntry {
            name: entry.file_name().to_string_lossy().into_owned(),
            is_dir,
            is_symlink,
        });
    }

    entries.sort_by_cached_key(|e| e.name.to_lowercase());
    Ok(entries)
}

/// Render the listing page for the URL path `display_path` (already decoded)
pub fn render(display_path: &str, entries: &[ListingEntry]) -> String {
    let title = format!("Directory listing for {}", escape_html(display_path));
    let mut html = format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{title}</title>\n</head>\n<body>\n<h1>{title}</h1>\n<hr>\n<ul>\n"
    );
    for entry in entries {
        html.push_str(&format!(
            "<li><a href=\"{}\">{}</a></li>\n",
            entry.href(),
            entry.display_name()
        ));
    }
    html.push_str("</ul>\n<hr>\n</body>\n</html>\n");
    html
}
