//! Synchronous client for the two **World Bank Indicators API (v2)** endpoints the
//! dashboard needs: the country catalog and one country/indicator time series.
//!
//! ### Notes
//! - Each call is a single attempt: no retry, no cache. Callers decide whether to retry.
//! - A timeout (30s by default, see [`Settings::timeout`]) surfaces as [`FetchError::Network`].
//! - Only the first page of a series is fetched unless [`Settings::follow_pages`] is set.
//!
//! Typical usage:
//! ```no_run
//! # use sdg_tracker::{Client, DateRange};
//! let client = Client::default();
//! let series = client.fetch_series("USA", "EN.ATM.CO2E.PC", DateRange::DEFAULT)?;
//! if !series.has_data() {
//!     println!("no data");
//! }
//! # Ok::<(), sdg_tracker::FetchError>(())
//! ```

use crate::config::Settings;
use crate::error::FetchError;
use crate::models::{Country, DateRange, SeriesResult};
use crate::normalize;
use log::debug;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC};
use reqwest::blocking::Client as HttpClient;
use reqwest::redirect::Policy;
use serde_json::Value;
use std::time::Duration;

/// Safety cap when following pages.
const MAX_PAGES: u32 = 1000;

#[derive(Debug, Clone)]
pub struct Client {
    settings: Settings,
    http: HttpClient,
}

impl Default for Client {
    fn default() -> Self {
        Self::new(Settings::default()).expect("reqwest client build")
    }
}

// Allow -, _, . unescaped in codes (common for indicator ids)
const SAFE: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'_').remove(b'.');

fn enc(code: &str) -> String {
    percent_encoding::utf8_percent_encode(code.trim(), SAFE).to_string()
}

impl Client {
    pub fn new(settings: Settings) -> Result<Self, FetchError> {
        let http = HttpClient::builder()
            .timeout(settings.timeout) // total request timeout
            .connect_timeout(settings.timeout.min(Duration::from_secs(10)))
            .redirect(Policy::limited(5))
            .user_agent(concat!("sdg_tracker/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| FetchError::Network {
                url: settings.base_url.clone(),
                message: format!("cannot build http client: {e}"),
            })?;
        Ok(Self { settings, http })
    }

    /// URL of the country catalog request.
    pub fn countries_url(&self) -> String {
        format!(
            "{}/country?format=json&per_page={}",
            self.settings.base_url, self.settings.country_page_size
        )
    }

    /// URL of one page of a series request. Page 1 carries no `page` parameter.
    pub fn series_url(&self, country: &str, indicator: &str, range: DateRange, page: u32) -> String {
        let mut url = format!(
            "{}/country/{}/indicator/{}?format=json&per_page={}&date={}",
            self.settings.base_url,
            enc(country),
            enc(indicator),
            self.settings.per_page,
            range.to_query_param()
        );
        if page > 1 {
            url.push_str(&format!("&page={page}"));
        }
        url
    }

    fn get_json(&self, url: &str) -> Result<Value, FetchError> {
        debug!("GET {url}");
        let resp = self
            .http
            .get(url)
            .send()
            .map_err(|e| FetchError::from_reqwest(url, e))?;
        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Http {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        resp.json::<Value>()
            .map_err(|e| FetchError::from_reqwest(url, e))
    }

    /// Fetch the country catalog, aggregates excluded.
    ///
    /// ### Errors
    /// - [`FetchError::Network`] / [`FetchError::Http`] on transport failure
    /// - [`FetchError::UnexpectedFormat`] when the envelope or the list is malformed
    /// - [`FetchError::Api`] when the API returns its error payload
    pub fn load_countries(&self) -> Result<Vec<Country>, FetchError> {
        let url = self.countries_url();
        let v = self.get_json(&url)?;
        let countries = normalize::parse_countries(&v)?;
        debug!("loaded {} countries", countries.len());
        Ok(countries)
    }

    /// Fetch and normalize one country/indicator series.
    ///
    /// The result holds only numeric observations, ascending by year. An empty
    /// or all-null response yields `has_data() == false`, not an error.
    pub fn fetch_series(
        &self,
        country: &str,
        indicator: &str,
        range: DateRange,
    ) -> Result<SeriesResult, FetchError> {
        let (country, indicator) = (country.trim(), indicator.trim());
        if country.is_empty() {
            return Err(FetchError::InvalidRequest("country code is empty".into()));
        }
        if indicator.is_empty() {
            return Err(FetchError::InvalidRequest("indicator code is empty".into()));
        }

        let mut page = 1u32;
        let mut observations = Vec::new();
        let total_pages = loop {
            let url = self.series_url(country, indicator, range, page);
            let v = self.get_json(&url)?;
            let normalized = normalize::normalize_page(&v)?;
            debug!(
                "{country}/{indicator} page {page}: {} of {} entries usable",
                normalized.observations.len(),
                normalized.raw_count
            );
            observations.extend(normalized.observations);

            let pages = normalized.meta.pages;
            if page >= pages {
                break pages.max(page);
            }
            if !self.settings.follow_pages {
                debug!("{country}/{indicator}: {pages} pages available, only page 1 fetched");
                break pages;
            }
            if page >= MAX_PAGES {
                return Err(FetchError::UnexpectedFormat(format!(
                    "page limit exceeded ({MAX_PAGES})"
                )));
            }
            page += 1;
        };

        normalize::sort_by_period(&mut observations);
        Ok(SeriesResult::new(country, indicator, range, observations).with_pages(total_pages, page))
    }
}
