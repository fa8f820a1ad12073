//! Runtime settings: API endpoint, query bounds and transport limits.
//!
//! Defaults match the public World Bank API; environment variables override
//! them, and the binaries apply their own flags on top.
//!
//! - `SDG_API_BASE_URL`
//! - `SDG_DATE_FROM`, `SDG_DATE_TO`
//! - `SDG_PER_PAGE`
//! - `SDG_TIMEOUT_SECS`
//! - `SDG_FOLLOW_PAGES` (`1`/`true`/`yes`)

use crate::models::DateRange;
use log::warn;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.worldbank.org/v2";

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// API root, without trailing slash.
    pub base_url: String,
    /// Years requested for every series.
    pub date_range: DateRange,
    /// `per_page` of series requests.
    pub per_page: u32,
    /// `per_page` of the country catalog request; large enough for one page.
    pub country_page_size: u32,
    /// Total request timeout.
    pub timeout: Duration,
    /// Fetch and merge every page of a series instead of only the first.
    pub follow_pages: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            date_range: DateRange::DEFAULT,
            per_page: 100,
            country_page_size: 300,
            timeout: Duration::from_secs(30),
            follow_pages: false,
        }
    }
}

impl Settings {
    /// Defaults with environment overrides.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults with overrides from an arbitrary key lookup.
    ///
    /// Unparsable values are logged and ignored.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut s = Settings::default();

        if let Some(url) = lookup("SDG_API_BASE_URL") {
            let url = url.trim().trim_end_matches('/');
            if !url.is_empty() {
                s.base_url = url.to_string();
            }
        }

        let start = parse_var::<i32>(&lookup, "SDG_DATE_FROM").unwrap_or(s.date_range.start);
        let end = parse_var::<i32>(&lookup, "SDG_DATE_TO").unwrap_or(s.date_range.end);
        match DateRange::new(start, end) {
            Ok(r) => s.date_range = r,
            Err(e) => warn!("ignoring SDG_DATE_FROM/SDG_DATE_TO: {e}"),
        }

        if let Some(n) = parse_var::<u32>(&lookup, "SDG_PER_PAGE") {
            if n > 0 {
                s.per_page = n;
            } else {
                warn!("ignoring SDG_PER_PAGE=0");
            }
        }
        if let Some(secs) = parse_var::<u64>(&lookup, "SDG_TIMEOUT_SECS") {
            s.timeout = Duration::from_secs(secs.max(1));
        }
        if let Some(v) = lookup("SDG_FOLLOW_PAGES") {
            s.follow_pages = matches!(
                v.trim().to_ascii_lowercase().as_str(),
                "1" | "true" | "yes" | "on"
            );
        }

        s
    }
}

fn parse_var<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    let raw = lookup(key)?;
    match raw.trim().parse::<T>() {
        Ok(v) => Some(v),
        Err(_) => {
            warn!("ignoring {key}={raw:?}: not a valid number");
            None
        }
    }
}
