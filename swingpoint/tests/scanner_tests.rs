use polars::df;
use polars::prelude::{DataFrame, NamedFrom, Series};

use swingpoint::{
    ExtremumKind, ResumePoint, SwingConfig, ensure_swing_columns, locate_resume_point,
    scan_extrema,
};

const DAYS: [i64; 5] = [1, 2, 3, 4, 5];

/// Frame with a constant volatility of 1.0 on every row.
fn priced(column: &str, prices: &[f64]) -> DataFrame {
    let days: Vec<i64> = (1..=prices.len() as i64).collect();
    let mut df = df!(
        "Date" => &days,
        "atr_14" => &vec![1.0; prices.len()]
    )
    .expect("valid frame");
    df.with_column(Series::new(column, prices)).expect("price column");
    df
}

fn scan(df: &DataFrame, config: &SwingConfig) -> DataFrame {
    let prepared = ensure_swing_columns(df, config).expect("prepared");
    let resume = locate_resume_point(&prepared, config).expect("resume point");
    scan_extrema(&prepared, resume, config).expect("scanned").0
}

fn flags(df: &DataFrame, name: &str) -> Vec<bool> {
    df.column(name)
        .expect("flag column")
        .bool()
        .expect("bool")
        .into_iter()
        .map(|v| v.unwrap_or(false))
        .collect()
}

#[test]
fn alternating_series_flags_every_swing_but_the_open_one() {
    let out = scan(&priced("Close", &[100.0, 110.0, 102.0, 112.0, 105.0]), &SwingConfig::default());
    assert_eq!(flags(&out, "is_min"), [true, false, true, false, false]);
    assert_eq!(flags(&out, "is_max"), [false, true, false, true, false]);
}

#[test]
fn uptrend_confirms_only_the_first_minimum() {
    let out = scan(&priced("Close", &[100.0, 105.0, 110.0, 115.0, 120.0]), &SwingConfig::default());
    assert_eq!(flags(&out, "is_min"), [true, false, false, false, false]);
    assert_eq!(flags(&out, "is_max"), [false; 5]);
}

#[test]
fn downtrend_keeps_extending_the_minimum_candidate() {
    let out = scan(&priced("Close", &[120.0, 115.0, 110.0, 105.0, 100.0]), &SwingConfig::default());
    assert_eq!(flags(&out, "is_min"), [false; 5]);
    assert_eq!(flags(&out, "is_max"), [false; 5]);
}

#[test]
fn flat_series_sets_no_flags() {
    let out = scan(
        &priced("Close", &[100.1, 100.3, 100.15, 100.19, 100.36]),
        &SwingConfig::default(),
    );
    assert_eq!(flags(&out, "is_min"), [false; 5]);
    assert_eq!(flags(&out, "is_max"), [false; 5]);
}

#[test]
fn custom_price_column_is_scanned() {
    let config = SwingConfig::default().with_price_column("CustomPrice");
    let out = scan(&priced("CustomPrice", &[100.0, 110.0, 102.0, 112.0, 105.0]), &config);
    assert_eq!(flags(&out, "is_min"), [true, false, true, false, false]);
    assert_eq!(flags(&out, "is_max"), [false, true, false, true, false]);
}

#[test]
fn scan_continues_after_existing_maximum() {
    let config = SwingConfig::default().with_price_column("CustomPrice");
    let mut df = priced("CustomPrice", &[100.0, 110.0, 102.0, 112.0, 105.0]);
    df.with_column(Series::new("is_max", &[true, false, false, false, false]))
        .expect("is_max");

    let out = scan(&df, &config);
    assert_eq!(flags(&out, "is_min"), [false, false, true, false, false]);
    assert_eq!(flags(&out, "is_max"), [true, false, false, true, false]);
}

#[test]
fn single_row_cannot_reverse() {
    let out = scan(&priced("Close", &[102.0]), &SwingConfig::default());
    assert_eq!(flags(&out, "is_min"), [false]);
    assert_eq!(flags(&out, "is_max"), [false]);
}

#[test]
fn move_equal_to_threshold_is_not_a_reversal() {
    let out = scan(&priced("Close", &[100.0, 102.5]), &SwingConfig::default());
    assert_eq!(flags(&out, "is_min"), [false, false]);

    let out = scan(&priced("Close", &[100.0, 102.51]), &SwingConfig::default());
    assert_eq!(flags(&out, "is_min"), [true, false]);
}

#[test]
fn null_volatility_rows_cannot_confirm() {
    let mut df = priced("Close", &[100.0, 110.0, 120.0]);
    df.with_column(Series::new("atr_14", &[None, None, Some(1.0)]))
        .expect("atr");
    df.with_column(Series::new("High", &[100.0; 3])).expect("high");
    df.with_column(Series::new("Low", &[100.0; 3])).expect("low");

    let out = scan(&df, &SwingConfig::default());
    // row 1 has no volatility; row 2 confirms the minimum at row 0
    assert_eq!(flags(&out, "is_min"), [true, false, false]);
}

#[test]
fn missing_start_leaves_frame_unchanged() {
    let df = priced("Close", &[100.0, 110.0, 102.0, 112.0, 105.0]);
    let prepared = ensure_swing_columns(&df, &SwingConfig::default()).expect("prepared");
    let resume = ResumePoint { start: None, seek: ExtremumKind::Maximum };
    let (out, outcome) = scan_extrema(&prepared, resume, &SwingConfig::default()).expect("scanned");
    assert!(out.equals_missing(&prepared));
    assert_eq!(outcome.rows_visited, 0);
    assert!(outcome.confirmed.is_empty());
}

#[test]
fn outcome_reports_confirmed_points_and_open_candidate() {
    let df = priced("Close", &[100.0, 110.0, 102.0, 112.0, 105.0]);
    let config = SwingConfig::default();
    let prepared = ensure_swing_columns(&df, &config).expect("prepared");
    let resume = locate_resume_point(&prepared, &config).expect("resume point");
    let (_, outcome) = scan_extrema(&prepared, resume, &config).expect("scanned");

    let stamps: Vec<i64> = outcome.confirmed.iter().map(|p| p.timestamp).collect();
    assert_eq!(stamps, DAYS[..4]);
    assert_eq!(outcome.rows_visited, 5);
    assert_eq!(outcome.seek, ExtremumKind::Minimum);
    let open = outcome.open_candidate.expect("open candidate");
    assert_eq!((open.timestamp, open.price), (5, 105.0));
    let last = outcome.cursor.last_extremum.expect("cursor");
    assert_eq!((last.kind, last.timestamp), (ExtremumKind::Maximum, 4));
}
