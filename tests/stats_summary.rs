use sdg_tracker::models::Observation;
use sdg_tracker::stats::{chart_max, format_value, summarize};
use sdg_tracker::{DateRange, SeriesResult};

fn series(points: &[(&str, f64)]) -> SeriesResult {
    let obs = points
        .iter()
        .map(|(d, v)| Observation::new(*d, *v))
        .collect();
    SeriesResult::new("USA", "EN.ATM.CO2E.PC", DateRange::DEFAULT, obs)
}

#[test]
fn summary_median_even_and_odd() {
    // [1,2,3,4] -> median = (2+3)/2 = 2.5
    let s = summarize(&series(&[
        ("2018", 1.0),
        ("2019", 2.0),
        ("2020", 3.0),
        ("2021", 4.0),
    ]));
    assert_eq!(s.count, 4);
    assert_eq!(s.min, Some(1.0));
    assert_eq!(s.max, Some(4.0));
    assert!((s.mean.unwrap() - 2.5).abs() < 1e-9);
    assert!((s.median.unwrap() - 2.5).abs() < 1e-9);

    // [10, 30, 20] -> median = 20
    let s = summarize(&series(&[("2000", 10.0), ("2001", 30.0), ("2002", 20.0)]));
    assert_eq!(s.count, 3);
    assert!((s.median.unwrap() - 20.0).abs() < 1e-9);
    assert_eq!(s.first, Some(Observation::new("2000", 10.0)));
    assert_eq!(s.latest, Some(Observation::new("2002", 20.0)));
}

#[test]
fn summary_of_empty_series_is_all_none() {
    let s = summarize(&SeriesResult::empty("FRA", "EN.POP.SLUM.UR.ZS", DateRange::DEFAULT));
    assert_eq!(s.count, 0);
    assert!(s.min.is_none() && s.max.is_none());
    assert!(s.mean.is_none() && s.median.is_none());
    assert!(s.first.is_none() && s.latest.is_none());
}

#[test]
fn chart_max_falls_back_to_one_hundred() {
    assert_eq!(chart_max(&series(&[("2018", 16.1), ("2019", 15.2)])), 16.1);
    assert_eq!(chart_max(&series(&[])), 100.0);
    assert_eq!(chart_max(&series(&[("2018", 0.0), ("2019", -3.0)])), 100.0);
}

#[test]
fn values_are_formatted_per_locale() {
    assert_eq!(format_value(1_234_567.891, 2, "en"), "1,234,567.89");
    assert!(format_value(1_234_567.891, 2, "fr").ends_with(",89"));
    assert_eq!(format_value(f64::INFINITY, 2, "en"), "NA");
}
