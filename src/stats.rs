use crate::models::{Observation, SeriesResult};
use num_format::{Locale, ToFormattedString};
use serde::{Deserialize, Serialize};

/// Summary statistics for one normalized series.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Summary {
    pub count: usize,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub mean: Option<f64>,
    pub median: Option<f64>,
    /// Earliest observation (first in period order).
    pub first: Option<Observation>,
    /// Most recent observation.
    pub latest: Option<Observation>,
}

/// Compute the summary of a series. All fields are `None` when there is no data.
pub fn summarize(series: &SeriesResult) -> Summary {
    let obs = series.observations();
    let mut vals: Vec<f64> = obs.iter().map(|o| o.value).collect();
    vals.sort_by(f64::total_cmp);

    let count = vals.len();
    let min = vals.first().cloned();
    let max = vals.last().cloned();
    let mean = if count > 0 {
        Some(vals.iter().copied().sum::<f64>() / count as f64)
    } else {
        None
    };
    let median = if count == 0 {
        None
    } else if count % 2 == 1 {
        Some(vals[count / 2])
    } else {
        Some((vals[count / 2 - 1] + vals[count / 2]) / 2.0)
    };
    Summary {
        count,
        min,
        max,
        mean,
        median,
        first: obs.first().cloned(),
        latest: obs.last().cloned(),
    }
}

/// Value the chart's full bar height corresponds to.
///
/// The series maximum, or 100 when the series is empty or nothing is positive.
pub fn chart_max(series: &SeriesResult) -> f64 {
    let max = series
        .observations()
        .iter()
        .map(|o| o.value)
        .fold(f64::NEG_INFINITY, f64::max);
    if max > 0.0 { max } else { 100.0 }
}

/// Bar height as a fraction of the chart, never below `min_fraction` so every
/// observation stays visible.
pub fn bar_fraction(value: f64, chart_max: f64, min_fraction: f64) -> f64 {
    (value / chart_max).clamp(min_fraction, 1.0)
}

/// Map a user-provided locale tag to a num-format Locale and decimal separator.
/// Supported tags (case-insensitive): "en", "de", "fr", "es", "it", "pt", "nl"
fn map_locale(tag: &str) -> (&'static Locale, char) {
    match tag.to_lowercase().as_str() {
        "de" | "de_de" | "german" => (&Locale::de, ','),
        "fr" | "fr_fr" => (&Locale::fr, ','),
        "es" | "es_es" => (&Locale::es, ','),
        "it" | "it_it" => (&Locale::it, ','),
        "pt" | "pt_pt" | "pt_br" => (&Locale::pt, ','),
        "nl" | "nl_nl" => (&Locale::nl, ','),
        _ => (&Locale::en, '.'),
    }
}

/// Format a value with thousands grouping and a fixed number of decimals,
/// e.g. `format_value(12345.678, 2, "en") == "12,345.68"`.
pub fn format_value(v: f64, decimals: usize, locale_tag: &str) -> String {
    if !v.is_finite() {
        return "NA".to_string();
    }
    let (locale, dec_sep) = map_locale(locale_tag);
    let fixed = format!("{:.*}", decimals, v.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let Ok(int_val) = int_part.parse::<u128>() else {
        return format!("{}{fixed}", if v < 0.0 { "-" } else { "" });
    };
    let sign = if v < 0.0 && fixed.chars().any(|c| c.is_ascii_digit() && c != '0') {
        "-"
    } else {
        ""
    };
    let mut out = format!("{sign}{}", int_val.to_formatted_string(locale));
    if !frac_part.is_empty() {
        out.push(dec_sep);
        out.push_str(frac_part);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_value_groups_and_rounds() {
        assert_eq!(format_value(12345.678, 2, "en"), "12,345.68");
        assert_eq!(format_value(12345.678, 2, "de"), "12.345,68");
        assert_eq!(format_value(15.2, 0, "en"), "15");
        assert_eq!(format_value(-0.001, 2, "en"), "0.00");
        assert_eq!(format_value(-1234.5, 1, "en"), "-1,234.5");
        assert_eq!(format_value(f64::NAN, 2, "en"), "NA");
    }

    #[test]
    fn format_value_keeps_huge_magnitudes() {
        assert_eq!(format_value(2.5e19, 0, "en"), "25,000,000,000,000,000,000");
        assert_eq!(format_value(-2.5e19, 1, "en"), "-25,000,000,000,000,000,000.0");
        assert!(format_value(1e300, 0, "en").starts_with("1000000"));
    }

    #[test]
    fn bar_fraction_is_clamped() {
        assert_eq!(bar_fraction(50.0, 100.0, 0.05), 0.5);
        assert_eq!(bar_fraction(0.0, 100.0, 0.05), 0.05);
        assert_eq!(bar_fraction(-10.0, 100.0, 0.05), 0.05);
        assert_eq!(bar_fraction(200.0, 100.0, 0.05), 1.0);
    }
}
