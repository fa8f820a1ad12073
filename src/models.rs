use crate::error::FetchError;
use chrono::Datelike;
use serde::{Deserialize, Serialize};

/// Earliest year the World Bank indicator series cover.
pub const MIN_YEAR: i32 = 1960;

/// Closed interval of years used in series queries (`date=start:end`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: i32,
    pub end: i32,
}

impl DateRange {
    /// 2000 through the most recent year the indicators are published for.
    pub const DEFAULT: DateRange = DateRange {
        start: 2000,
        end: 2024,
    };

    /// Validated constructor: `start <= end`, both within `1960..=current year`.
    pub fn new(start: i32, end: i32) -> Result<Self, FetchError> {
        if start > end {
            return Err(FetchError::InvalidRequest(format!(
                "start year {start} is later than end year {end}"
            )));
        }
        let current = chrono::Utc::now().year();
        if start < MIN_YEAR || end > current {
            return Err(FetchError::InvalidRequest(format!(
                "years must lie between {MIN_YEAR} and {current}, got {start}:{end}"
            )));
        }
        Ok(Self { start, end })
    }

    pub fn to_query_param(&self) -> String {
        format!("{}:{}", self.start, self.end)
    }

    pub fn contains(&self, year: i32) -> bool {
        (self.start..=self.end).contains(&year)
    }
}

impl Default for DateRange {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Metadata section returned by the API (position 0).
///
/// Every field defaults to 0: empty-result responses sometimes omit them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Meta {
    #[serde(default, deserialize_with = "de_u32_from_string_or_number")]
    pub page: u32,
    #[serde(default, deserialize_with = "de_u32_from_string_or_number")]
    pub pages: u32,
    /// Some responses encode `per_page` as a string, others as a number.
    #[serde(default, deserialize_with = "de_u32_from_string_or_number")]
    pub per_page: u32,
    #[serde(default, deserialize_with = "de_u32_from_string_or_number")]
    pub total: u32,
}

/// Serde helper: parse `u32` from either a JSON number or a string.
fn de_u32_from_string_or_number<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::{self, Visitor};
    struct U32Visitor;

    impl<'de> Visitor<'de> for U32Visitor {
        type Value = u32;

        fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
            write!(f, "a string or integer representing a non-negative number")
        }

        fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            u32::try_from(v).map_err(E::custom)
        }

        fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            u32::try_from(v).map_err(|_| E::custom("negative value for u32"))
        }

        fn visit_str<E>(self, s: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            s.trim().parse::<u32>().map_err(E::custom)
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(0)
        }
    }

    deserializer.deserialize_any(U32Visitor)
}

/// `{ "id": ..., "value": ... }` pair the API uses for classifications.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeName {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub value: String,
}

/// Region value the API uses for supranational/group rows.
pub const AGGREGATES_REGION: &str = "Aggregates";

/// Country record from the `/country` endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Country {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub region: Option<CodeName>,
    #[serde(rename = "iso2Code", default)]
    pub iso2_code: Option<String>,
    #[serde(rename = "capitalCity", default)]
    pub capital_city: Option<String>,
    #[serde(rename = "incomeLevel", default)]
    pub income_level: Option<CodeName>,
}

impl Country {
    pub fn region_name(&self) -> Option<&str> {
        self.region.as_ref().map(|r| r.value.as_str())
    }

    /// A real country: classified into a region other than "Aggregates".
    pub fn is_country(&self) -> bool {
        matches!(self.region_name(), Some(r) if r != AGGREGATES_REGION)
    }
}

/// One normalized (period, value) data point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub date: String,
    pub value: f64,
}

impl Observation {
    pub fn new(date: impl Into<String>, value: f64) -> Self {
        Self {
            date: date.into(),
            value,
        }
    }

    /// Numeric year of the period, if `date` starts with one.
    pub fn year(&self) -> Option<i32> {
        period_year(&self.date)
    }
}

/// Leading integer of a period string: `"2019"` → 2019, `"2019Q1"` → 2019.
pub fn period_year(date: &str) -> Option<i32> {
    let s = date.trim();
    let end = s
        .char_indices()
        .find(|(i, c)| !(c.is_ascii_digit() || (*i == 0 && *c == '-')))
        .map(|(i, _)| i)
        .unwrap_or(s.len());
    s[..end].parse().ok()
}

/// Normalized time series for one (country, indicator, range) request.
///
/// `has_data()` is derived from the observations, so it can never disagree
/// with them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesResult {
    pub country: String,
    pub indicator: String,
    pub range: DateRange,
    observations: Vec<Observation>,
    /// Pages the API reported for this query.
    pub pages: u32,
    /// Pages actually fetched and merged.
    pub pages_fetched: u32,
}

impl SeriesResult {
    /// Build from already-normalized observations (non-null, ascending).
    pub fn new(
        country: impl Into<String>,
        indicator: impl Into<String>,
        range: DateRange,
        observations: Vec<Observation>,
    ) -> Self {
        Self {
            country: country.into(),
            indicator: indicator.into(),
            range,
            observations,
            pages: 1,
            pages_fetched: 1,
        }
    }

    pub fn empty(country: impl Into<String>, indicator: impl Into<String>, range: DateRange) -> Self {
        Self::new(country, indicator, range, Vec::new())
    }

    pub fn with_pages(mut self, pages: u32, pages_fetched: u32) -> Self {
        self.pages = pages;
        self.pages_fetched = pages_fetched;
        self
    }

    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    pub fn has_data(&self) -> bool {
        !self.observations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// True when the API had more pages than were fetched.
    pub fn is_truncated(&self) -> bool {
        self.pages > self.pages_fetched
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn period_year_parses_leading_integer() {
        assert_eq!(period_year("2019"), Some(2019));
        assert_eq!(period_year(" 2020 "), Some(2020));
        assert_eq!(period_year("2019Q3"), Some(2019));
        assert_eq!(period_year("9"), Some(9));
        assert_eq!(period_year("Q3"), None);
        assert_eq!(period_year(""), None);
    }

    #[test]
    fn date_range_validation() {
        assert!(DateRange::new(2000, 2020).is_ok());
        assert!(DateRange::new(2015, 2015).is_ok());
        assert!(DateRange::new(2020, 2010).is_err());
        assert!(DateRange::new(1950, 2020).is_err());
        assert!(DateRange::new(2000, 9999).is_err());
        assert_eq!(DateRange::DEFAULT.to_query_param(), "2000:2024");
    }

    #[test]
    fn has_data_follows_observations() {
        let empty = SeriesResult::empty("USA", "X", DateRange::DEFAULT);
        assert!(!empty.has_data());
        assert!(empty.is_empty());
        let one = SeriesResult::new("USA", "X", DateRange::DEFAULT, vec![Observation::new("2000", 1.0)]);
        assert!(one.has_data());
        assert!(!one.is_truncated());
        assert!(one.with_pages(3, 1).is_truncated());
    }
}
