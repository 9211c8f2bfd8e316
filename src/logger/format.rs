//! Access log line formatting
//!
//! Formats:
//! - `common` (Common Log Format)
//! - `combined` (CLF plus referer and user agent)
//! - `json` (one object per line)
//! - anything else is a pattern with `$variable` placeholders

use chrono::{DateTime, Local};
use serde::Serialize;

const CLF_TIME: &str = "%d/%b/%Y:%H:%M:%S %z";

/// One completed request/response exchange
#[derive(Debug, Clone, Serialize)]
pub struct AccessLogEntry {
    pub remote_addr: String,
    #[serde(serialize_with = "serialize_time")]
    pub time: DateTime<Local>,
    pub method: String,
    /// Request target as received (path and query)
    pub target: String,
    /// e.g. `HTTP/1.1`
    pub version: String,
    pub status: u16,
    /// `None` when the response had no body (HEAD, 304, redirects)
    pub body_bytes: Option<u64>,
    pub referer: Option<String>,
    pub user_agent: Option<String>,
    pub request_time_us: u64,
}

fn serialize_time<S: serde::Serializer>(t: &DateTime<Local>, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&t.to_rfc3339())
}

impl AccessLogEntry {
    pub fn new(remote_addr: impl Into<String>, method: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            remote_addr: remote_addr.into(),
            time: Local::now(),
            method: method.into(),
            target: target.into(),
            version: "HTTP/1.1".to_string(),
            status: 200,
            body_bytes: None,
            referer: None,
            user_agent: None,
            request_time_us: 0,
        }
    }

    pub fn format(&self, format: &str) -> String {
        match format {
            "common" => self.format_common(),
            "combined" => format!(
                "{} \"{}\" \"{}\"",
                self.format_common(),
                self.referer.as_deref().unwrap_or("-"),
                self.user_agent.as_deref().unwrap_or("-"),
            ),
            "json" => serde_json::to_string(self).unwrap_or_else(|e| format!("{{\"error\":\"{e}\"}}")),
            pattern => self.format_pattern(pattern),
        }
    }

    fn request_line(&self) -> String {
        format!("{} {} {}", self.method, self.target, self.version)
    }

    fn bytes_field(&self) -> String {
        self.body_bytes.map_or_else(|| "-".to_string(), |b| b.to_string())
    }

    fn format_common(&self) -> String {
        format!(
            "{} - - [{}] \"{}\" {} {}",
            self.remote_addr,
            self.time.format(CLF_TIME),
            self.request_line(),
            self.status,
            self.bytes_field(),
        )
    }

    /// Substitute `$variables` in a user pattern.
    ///
    /// `$request_time` and `$request_method` are replaced before `$request`
    /// so the shorter name does not eat their prefix.
    fn format_pattern(&self, pattern: &str) -> String {
        #[allow(clippy::cast_precision_loss)]
        let seconds = self.request_time_us as f64 / 1_000_000.0;

        pattern
            .replace("$remote_addr", &self.remote_addr)
            .replace("$time_local", &self.time.format(CLF_TIME).to_string())
            .replace("$time_iso8601", &self.time.to_rfc3339())
            .replace("$request_time", &format!("{seconds:.3}"))
            .replace("$request_method", &self.method)
            .replace("$request_uri", &self.target)
            .replace("$request", &self.request_line())
            .replace("$status", &self.status.to_string())
            .replace("$body_bytes_sent", &self.bytes_field())
            .replace("$http_referer", self.referer.as_deref().unwrap_or("-"))
            .replace("$http_user_agent", self.user_agent.as_deref().unwrap_or("-"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry() -> AccessLogEntry {
        let mut e = AccessLogEntry::new("10.0.0.7", "GET", "/site/index.html?v=2");
        e.status = 200;
        e.body_bytes = Some(11);
        e.user_agent = Some("curl/8.5.0".to_string());
        e.request_time_us = 2600;
        e
    }

    #[test]
    fn test_common() {
        let line = entry().format("common");
        assert!(line.starts_with("10.0.0.7 - - ["));
        assert!(line.ends_with("\"GET /site/index.html?v=2 HTTP/1.1\" 200 11"));
        assert!(!line.contains("curl"));
    }

    #[test]
    fn test_common_without_body() {
        let mut e = entry();
        e.method = "HEAD".to_string();
        e.body_bytes = None;
        assert!(e.format("common").ends_with("200 -"));
    }

    #[test]
    fn test_combined_adds_agent() {
        let line = entry().format("combined");
        assert!(line.ends_with("\"-\" \"curl/8.5.0\""));
    }

    #[test]
    fn test_json() {
        let line = entry().format("json");
        let v: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(v["status"], 200);
        assert_eq!(v["target"], "/site/index.html?v=2");
        assert_eq!(v["body_bytes"], 11);
        assert!(v["referer"].is_null());
    }

    #[test]
    fn test_pattern() {
        let line = entry().format("$request_method $status in $request_time [$request]");
        assert_eq!(line, "GET 200 in 0.003 [GET /site/index.html?v=2 HTTP/1.1]");
    }
}
