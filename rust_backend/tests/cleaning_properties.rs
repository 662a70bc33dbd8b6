//! Property-based tests for the listing cleaner.
//!
//! Random listings mix valid rows with every kind of defect the cleaner
//! removes: out-of-range prices, bad or missing review dates, coordinates
//! outside the city, zero availability, missing hosts and other room types.

use nyc_airbnb_prep::transformations::clean;
use polars::prelude::{df, DataFrame, DataType};
use proptest::prelude::*;

type Listing = (
    Option<f64>,
    Option<&'static str>,
    f64,
    f64,
    i64,
    Option<&'static str>,
    &'static str,
);

fn price() -> impl Strategy<Value = Option<f64>> {
    prop_oneof![
        Just(None),
        (0i64..600).prop_map(|p| Some(p as f64)),
        (0.0..600.0f64).prop_map(Some),
    ]
}

fn last_review() -> impl Strategy<Value = Option<&'static str>> {
    prop_oneof![
        Just(None),
        Just(Some("2019-06-01")),
        Just(Some("2018/03/15")),
        Just(Some("not-a-date")),
    ]
}

fn host_name() -> impl Strategy<Value = Option<&'static str>> {
    prop_oneof![Just(None), Just(Some("Maria")), Just(Some("Nan"))]
}

fn room_type() -> impl Strategy<Value = &'static str> {
    prop_oneof![
        Just("Entire home/apt"),
        Just("Private room"),
        Just("Shared room"),
    ]
}

fn frame(rows: &[Listing]) -> DataFrame {
    df!(
        "id" => (0..rows.len() as i64).collect::<Vec<_>>(),
        "price" => rows.iter().map(|r| r.0).collect::<Vec<_>>(),
        "last_review" => rows.iter().map(|r| r.1).collect::<Vec<_>>(),
        "longitude" => rows.iter().map(|r| r.2).collect::<Vec<_>>(),
        "latitude" => rows.iter().map(|r| r.3).collect::<Vec<_>>(),
        "availability_365" => rows.iter().map(|r| r.4).collect::<Vec<_>>(),
        "host_name" => rows.iter().map(|r| r.5).collect::<Vec<_>>(),
        "room_type" => rows.iter().map(|r| r.6).collect::<Vec<_>>(),
    )
    .unwrap()
}

fn listings() -> impl Strategy<Value = DataFrame> {
    let row = (
        price(),
        last_review(),
        -74.4..-73.3f64,
        40.3..41.4f64,
        0i64..4,
        host_name(),
        room_type(),
    );
    prop::collection::vec(row, 0..60).prop_map(|rows| frame(&rows))
}

fn price_bounds() -> impl Strategy<Value = (f64, f64)> {
    (0.0..300.0f64, 0.0..300.0f64).prop_map(|(lo, width)| (lo, lo + width))
}

fn numbers(df: &DataFrame, column: &str) -> Vec<Option<f64>> {
    df.column(column)
        .unwrap()
        .cast(&DataType::Float64)
        .unwrap()
        .f64()
        .unwrap()
        .into_iter()
        .collect()
}

proptest! {
    #[test]
    fn prop_prices_within_bounds(df in listings(), (lo, hi) in price_bounds()) {
        let cleaned = clean(&df, lo, hi).unwrap();
        for price in numbers(&cleaned, "price") {
            let price = price.unwrap();
            prop_assert!(lo <= price && price <= hi, "price {} outside [{}, {}]", price, lo, hi);
        }
    }

    #[test]
    fn prop_rows_satisfy_every_filter(df in listings(), (lo, hi) in price_bounds()) {
        let cleaned = clean(&df, lo, hi).unwrap();
        let room_types = cleaned.column("room_type").unwrap().str().unwrap();
        for room_type in room_types {
            prop_assert_eq!(room_type, Some("Entire home/apt"));
        }
        for availability in numbers(&cleaned, "availability_365") {
            prop_assert!(availability.unwrap() > 0.0);
        }
        prop_assert_eq!(cleaned.column("host_name").unwrap().null_count(), 0);

        let reviews = cleaned.column("last_review").unwrap();
        prop_assert!(matches!(reviews.dtype(), DataType::Datetime(_, _)));
        prop_assert_eq!(reviews.null_count(), 0);

        for lon in numbers(&cleaned, "longitude") {
            prop_assert!((-74.25..=-73.50).contains(&lon.unwrap()));
        }
        for lat in numbers(&cleaned, "latitude") {
            prop_assert!((40.5..=41.2).contains(&lat.unwrap()));
        }
    }

    #[test]
    fn prop_clean_is_idempotent(df in listings(), (lo, hi) in price_bounds()) {
        let once = clean(&df, lo, hi).unwrap();
        let twice = clean(&once, lo, hi).unwrap();
        prop_assert!(once.equals_missing(&twice));
    }

    #[test]
    fn prop_clean_keeps_columns_and_never_grows(df in listings(), (lo, hi) in price_bounds()) {
        let cleaned = clean(&df, lo, hi).unwrap();
        prop_assert_eq!(cleaned.get_column_names(), df.get_column_names());
        prop_assert!(cleaned.height() <= df.height());
    }
}
