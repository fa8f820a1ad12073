//! Reshaping of raw `[metadata, payload]` API envelopes.
//!
//! Everything here is pure: it takes an already-decoded `serde_json::Value` and
//! never touches the network, which keeps the tolerant parsing testable on
//! canned JSON.

use crate::error::FetchError;
use crate::models::{Country, Meta, Observation};
use log::{debug, warn};
use serde_json::Value;

/// The two halves of a validated envelope.
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope<'a> {
    pub meta: Meta,
    /// `None` when the payload is `null` (the API's "nothing found").
    pub payload: Option<&'a Value>,
}

/// Validate the `[metadata, payload]` shape.
///
/// - not an array, or not exactly two elements → `UnexpectedFormat`
/// - an error object in position 0 (`{"message": [...]}`) → `Api`
/// - an unparsable metadata object is tolerated (defaults) since nothing
///   downstream depends on it beyond paging
pub fn split_envelope(v: &Value) -> Result<Envelope<'_>, FetchError> {
    let arr = v
        .as_array()
        .ok_or_else(|| FetchError::UnexpectedFormat("not a top-level array".into()))?;

    if let Some(first) = arr.first()
        && let Some(message) = first.get("message")
    {
        return Err(FetchError::Api(api_message(message)));
    }

    if arr.len() != 2 {
        return Err(FetchError::UnexpectedFormat(format!(
            "expected a two-element [metadata, payload] array, got {} element(s)",
            arr.len()
        )));
    }

    let meta = match serde_json::from_value::<Meta>(arr[0].clone()) {
        Ok(m) => m,
        Err(e) => {
            debug!("ignoring unparsable metadata {}: {}", arr[0], e);
            Meta::default()
        }
    };
    let payload = match &arr[1] {
        Value::Null => None,
        other => Some(other),
    };
    Ok(Envelope { meta, payload })
}

/// Flatten the API error payload into one line: `[{"id":"120","key":"Invalid value","value":"..."}]`.
fn api_message(message: &Value) -> String {
    match message {
        Value::Array(items) => items
            .iter()
            .map(|m| {
                let key = m.get("key").and_then(Value::as_str).unwrap_or_default();
                let value = m.get("value").and_then(Value::as_str).unwrap_or_default();
                match (key.is_empty(), value.is_empty()) {
                    (false, false) => format!("{key}: {value}"),
                    (false, true) => key.to_string(),
                    (true, false) => value.to_string(),
                    (true, true) => m.to_string(),
                }
            })
            .collect::<Vec<_>>()
            .join("; "),
        other => other.to_string(),
    }
}

/// Parse the country catalog and drop aggregates.
///
/// Records without a region, or whose region is `"Aggregates"`, are excluded.
/// Records that do not look like a country object at all are skipped with a
/// warning instead of failing the whole catalog.
pub fn parse_countries(v: &Value) -> Result<Vec<Country>, FetchError> {
    let env = split_envelope(v)?;
    let list = env
        .payload
        .and_then(Value::as_array)
        .ok_or_else(|| FetchError::UnexpectedFormat("country list missing or not an array".into()))?;

    let mut out = Vec::with_capacity(list.len());
    for item in list {
        match serde_json::from_value::<Country>(item.clone()) {
            Ok(c) if c.is_country() => out.push(c),
            Ok(c) => debug!("excluding {} ({:?})", c.id, c.region_name()),
            Err(e) => warn!("skipping malformed country record {item}: {e}"),
        }
    }
    Ok(out)
}

/// Observations of one page plus the paging metadata.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedPage {
    pub meta: Meta,
    /// Non-null observations in API order (not yet sorted).
    pub observations: Vec<Observation>,
    /// Raw entries in the payload before filtering.
    pub raw_count: usize,
}

/// Extract the usable observations of one series page.
///
/// A `null`, non-array or empty payload is "no data", not an error. Entries
/// with a null or non-numeric value, or without a date, are dropped.
pub fn normalize_page(v: &Value) -> Result<NormalizedPage, FetchError> {
    let env = split_envelope(v)?;
    let Some(list) = env.payload.and_then(Value::as_array) else {
        if let Some(p) = env.payload {
            debug!("series payload is not an array: {p}");
        }
        return Ok(NormalizedPage {
            meta: env.meta,
            ..Default::default()
        });
    };

    let observations = list.iter().filter_map(observation_from).collect();
    Ok(NormalizedPage {
        meta: env.meta,
        observations,
        raw_count: list.len(),
    })
}

/// Sort observations by numeric year, ascending.
///
/// Stable, so equal years keep API order; periods without a leading integer
/// sort first.
pub fn sort_by_period(observations: &mut [Observation]) {
    observations.sort_by_key(Observation::year);
}

/// Full single-page normalization: filter, then sort.
pub fn normalize_series(v: &Value) -> Result<Vec<Observation>, FetchError> {
    let mut page = normalize_page(v)?;
    sort_by_period(&mut page.observations);
    Ok(page.observations)
}

fn observation_from(item: &Value) -> Option<Observation> {
    let obj = item.as_object()?;
    let date = match obj.get("date")? {
        Value::String(s) if !s.trim().is_empty() => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    let value = numeric(obj.get("value")?)?;
    Some(Observation { date, value })
}

/// Numbers pass through; numeric strings are accepted; everything else is null.
fn numeric(v: &Value) -> Option<f64> {
    let x = match v {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    x.is_finite().then_some(x)
}
