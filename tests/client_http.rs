//! Client tests against a local stub server (no internet needed).

mod common;

use common::{Reply, envelope, serve};
use sdg_tracker::{Client, DateRange, FetchError, Settings};
use std::time::Duration;

fn client(base_url: String, follow_pages: bool) -> Client {
    Client::new(Settings {
        base_url,
        timeout: Duration::from_secs(5),
        follow_pages,
        ..Settings::default()
    })
    .unwrap()
}

#[test]
fn fetch_series_builds_url_and_normalizes() {
    let body = envelope(
        1,
        r#"[{"date":"2020","value":null},{"date":"2019","value":15.2},{"date":"2018","value":16.1}]"#,
    );
    let (base, requests) = serve(vec![Reply::json(body)]);
    let series = client(base, false)
        .fetch_series("USA", "EN.ATM.CO2E.PC", DateRange::DEFAULT)
        .unwrap();

    assert_eq!(
        requests.recv().unwrap(),
        "/v2/country/USA/indicator/EN.ATM.CO2E.PC?format=json&per_page=100&date=2000:2024"
    );
    assert!(series.has_data());
    assert_eq!(series.country, "USA");
    assert_eq!(series.indicator, "EN.ATM.CO2E.PC");
    let dates: Vec<&str> = series.observations().iter().map(|o| o.date.as_str()).collect();
    assert_eq!(dates, vec!["2018", "2019"]);
    assert!(!series.is_truncated());
}

#[test]
fn no_data_is_not_an_error() {
    let (base, _requests) = serve(vec![Reply::json(envelope(0, "null"))]);
    let series = client(base, false)
        .fetch_series("FRA", "EN.POP.SLUM.UR.ZS", DateRange::DEFAULT)
        .unwrap();
    assert!(!series.has_data());
    assert!(series.observations().is_empty());
}

#[test]
fn only_first_page_by_default() {
    let (base, requests) = serve(vec![Reply::json(envelope(
        2,
        r#"[{"date":"2024","value":2.0}]"#,
    ))]);
    let series = client(base, false)
        .fetch_series("USA", "AG.LND.FRST.ZS", DateRange::DEFAULT)
        .unwrap();
    assert_eq!(series.len(), 1);
    assert_eq!(series.pages, 2);
    assert_eq!(series.pages_fetched, 1);
    assert!(series.is_truncated());
    assert!(!requests.recv().unwrap().contains("&page="));
}

#[test]
fn follow_pages_merges_and_sorts() {
    let (base, requests) = serve(vec![
        Reply::json(envelope(2, r#"[{"date":"2024","value":2.0},{"date":"2023","value":1.0}]"#)),
        Reply::json(envelope(2, r#"[{"date":"2001","value":null},{"date":"2000","value":0.5}]"#)),
    ]);
    let series = client(base, true)
        .fetch_series("USA", "AG.LND.FRST.ZS", DateRange::DEFAULT)
        .unwrap();
    let dates: Vec<&str> = series.observations().iter().map(|o| o.date.as_str()).collect();
    assert_eq!(dates, vec!["2000", "2023", "2024"]);
    assert!(!series.is_truncated());

    let _first = requests.recv().unwrap();
    assert!(requests.recv().unwrap().ends_with("&page=2"));
}

#[test]
fn http_error_status_is_reported() {
    let (base, _requests) = serve(vec![Reply::status(503, "{}")]);
    let err = client(base, false)
        .fetch_series("USA", "AG.LND.FRST.ZS", DateRange::DEFAULT)
        .unwrap_err();
    assert!(matches!(err, FetchError::Http { status: 503, .. }));
    assert!(err.is_transport());
}

#[test]
fn non_json_body_is_unexpected_format() {
    let (base, _requests) = serve(vec![Reply::json("<html>maintenance</html>")]);
    let err = client(base, false).load_countries().unwrap_err();
    assert!(matches!(err, FetchError::UnexpectedFormat(_)), "{err:?}");
}

#[test]
fn unreachable_server_is_a_network_error() {
    // Bind then drop to get a port nobody listens on.
    let port = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port();
    let err = client(format!("http://127.0.0.1:{port}/v2"), false)
        .load_countries()
        .unwrap_err();
    assert!(matches!(err, FetchError::Network { .. }), "{err:?}");
}

#[test]
fn empty_codes_are_rejected_before_any_request() {
    let c = client("http://127.0.0.1:9/v2".into(), false);
    assert!(matches!(
        c.fetch_series("  ", "AG.LND.FRST.ZS", DateRange::DEFAULT),
        Err(FetchError::InvalidRequest(_))
    ));
    assert!(matches!(
        c.fetch_series("USA", "", DateRange::DEFAULT),
        Err(FetchError::InvalidRequest(_))
    ));
}

#[test]
fn load_countries_filters_aggregates() {
    let body = envelope(
        1,
        r#"[{"id":"WLD","name":"World","region":{"id":"NA","value":"Aggregates"}},
            {"id":"FRA","name":"France","region":{"id":"ECS","value":"Europe & Central Asia"}}]"#,
    );
    let (base, requests) = serve(vec![Reply::json(body)]);
    let countries = client(base, false).load_countries().unwrap();
    assert_eq!(requests.recv().unwrap(), "/v2/country?format=json&per_page=300");
    assert_eq!(countries.len(), 1);
    assert_eq!(countries[0].id, "FRA");
}

#[test]
fn codes_are_percent_encoded() {
    let c = client("http://example.test/v2".into(), false);
    let url = c.series_url("US A", "EN.ATM.CO2E.PC", DateRange { start: 2010, end: 2012 }, 3);
    assert_eq!(
        url,
        "http://example.test/v2/country/US%20A/indicator/EN.ATM.CO2E.PC?format=json&per_page=100&date=2010:2012&page=3"
    );
}
