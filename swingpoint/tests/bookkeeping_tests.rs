use polars::df;
use polars::prelude::DataFrame;

use swingpoint::{SwingConfig, SwingError, ensure_swing_columns, fill_bookkeeping};

fn dated_flags(is_min: [bool; 7], is_max: [bool; 7]) -> DataFrame {
    let df = df!(
        "Date" => &[1i64, 2, 3, 4, 5, 6, 7],
        "Close" => &[100.0, 90.0, 110.0, 85.0, 120.0, 95.0, 130.0],
        "atr_14" => &[1.0; 7],
        "is_min" => &is_min,
        "is_max" => &is_max
    )
    .expect("valid frame");
    ensure_swing_columns(&df, &SwingConfig::default()).expect("prepared")
}

fn alternating() -> DataFrame {
    dated_flags(
        [false, true, false, true, false, true, false],
        [false, false, true, false, true, false, false],
    )
}

fn date(df: &DataFrame, column: &str, row: usize) -> Option<i64> {
    df.column(column).expect("date column").i64().expect("i64").get(row)
}

fn value(df: &DataFrame, column: &str, row: usize) -> Option<f64> {
    df.column(column).expect("value column").f64().expect("f64").get(row)
}

#[test]
fn no_flags_leave_every_bookkeeping_cell_null() {
    let out = fill_bookkeeping(&dated_flags([false; 7], [false; 7]), &SwingConfig::default())
        .expect("filled");
    for kind in ["min", "max"] {
        for prefix in ["last_known", "prev_known"] {
            for suffix in ["date", "val"] {
                let name = format!("{prefix}_{kind}_{suffix}");
                assert_eq!(out.column(&name).expect("column").null_count(), 7, "{name}");
            }
        }
    }
}

#[test]
fn single_minimum_fills_last_known_only() {
    let mut is_min = [false; 7];
    is_min[1] = true;
    let out = fill_bookkeeping(&dated_flags(is_min, [false; 7]), &SwingConfig::default())
        .expect("filled");

    assert_eq!(date(&out, "last_known_min_date", 1), None);
    assert_eq!(date(&out, "last_known_min_date", 2), Some(2));
    assert_eq!(value(&out, "last_known_min_val", 2), Some(90.0));
    assert_eq!(date(&out, "prev_known_min_date", 2), None);
    assert_eq!(value(&out, "prev_known_min_val", 2), None);
    assert_eq!(date(&out, "last_known_min_date", 6), Some(2));
    assert_eq!(out.column("last_known_max_date").expect("column").null_count(), 7);
}

#[test]
fn single_maximum_fills_last_known_only() {
    let mut is_max = [false; 7];
    is_max[2] = true;
    let out = fill_bookkeeping(&dated_flags([false; 7], is_max), &SwingConfig::default())
        .expect("filled");

    assert_eq!(date(&out, "last_known_max_date", 3), Some(3));
    assert_eq!(value(&out, "last_known_max_val", 3), Some(110.0));
    assert_eq!(date(&out, "prev_known_max_date", 3), None);
    assert_eq!(date(&out, "last_known_max_date", 6), Some(3));
    assert_eq!(out.column("last_known_min_date").expect("column").null_count(), 7);
}

#[test]
fn alternating_flags_track_last_and_previous() {
    let out = fill_bookkeeping(&alternating(), &SwingConfig::default()).expect("filled");

    // fifth row: minima on days 2 and 4, one maximum on day 3
    assert_eq!(date(&out, "last_known_min_date", 4), Some(4));
    assert_eq!(value(&out, "last_known_min_val", 4), Some(85.0));
    assert_eq!(date(&out, "prev_known_min_date", 4), Some(2));
    assert_eq!(value(&out, "prev_known_min_val", 4), Some(90.0));
    assert_eq!(date(&out, "last_known_max_date", 4), Some(3));
    assert_eq!(value(&out, "last_known_max_val", 4), Some(110.0));
    assert_eq!(date(&out, "prev_known_max_date", 4), None);
    assert_eq!(value(&out, "prev_known_max_val", 4), None);

    // last row
    assert_eq!(date(&out, "last_known_min_date", 6), Some(6));
    assert_eq!(value(&out, "last_known_min_val", 6), Some(95.0));
    assert_eq!(date(&out, "prev_known_min_date", 6), Some(4));
    assert_eq!(date(&out, "last_known_max_date", 6), Some(5));
    assert_eq!(value(&out, "last_known_max_val", 6), Some(120.0));
    assert_eq!(date(&out, "prev_known_max_date", 6), Some(3));
    assert_eq!(value(&out, "prev_known_max_val", 6), Some(110.0));
}

#[test]
fn values_come_from_the_reference_column() {
    let mut df = alternating();
    let doubled = df.column("Close").expect("close") * 2.0;
    df.with_column(doubled.with_name("CustomVal")).expect("custom");
    let df = df.drop("Close").expect("drop close");

    let config = SwingConfig::default().with_price_column("CustomVal");
    let out = fill_bookkeeping(&df, &config).expect("filled");
    assert_eq!(value(&out, "last_known_min_val", 4), Some(170.0));
    assert_eq!(value(&out, "prev_known_min_val", 4), Some(180.0));
    assert_eq!(value(&out, "last_known_max_val", 4), Some(220.0));
}

#[test]
fn reference_column_can_differ_from_price_column() {
    let config = SwingConfig {
        reference_column: Some("Close".to_string()),
        ..SwingConfig::default().with_price_column("Missing")
    };
    let out = fill_bookkeeping(&alternating(), &config).expect("filled");
    assert_eq!(value(&out, "last_known_max_val", 6), Some(120.0));
}

#[test]
fn dates_never_reach_the_current_row() {
    let out = fill_bookkeeping(&alternating(), &SwingConfig::default()).expect("filled");
    for row in 0..out.height() {
        let today = row as i64 + 1;
        for column in [
            "last_known_min_date",
            "prev_known_min_date",
            "last_known_max_date",
            "prev_known_max_date",
        ] {
            if let Some(seen) = date(&out, column, row) {
                assert!(seen < today, "{column} at row {row} looks ahead");
            }
        }
    }
}

#[test]
fn conflicting_flags_are_rejected() {
    let mut is_min = [false; 7];
    let mut is_max = [false; 7];
    is_min[3] = true;
    is_max[3] = true;
    let df = df!(
        "Date" => &[1i64, 2, 3, 4, 5, 6, 7],
        "Close" => &[1.0; 7],
        "is_min" => &is_min,
        "is_max" => &is_max
    )
    .expect("valid frame");
    let err = fill_bookkeeping(&df, &SwingConfig::default());
    assert!(matches!(err, Err(SwingError::ConflictingExtremum { timestamp: 4 })));
}
