//! Domain vocabulary for the listings dataset and the split parameters.
//!
//! This module names the columns the cleaner relies on, the geographic bounding
//! box of the city, and the validated parameter types consumed by the
//! transformations ([`PriceRange`], [`SplitSizes`], [`Stratify`]).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::error::{PrepError, PrepResult};

/// Listing column names referenced by the cleaner.
pub mod columns {
    pub const NAME: &str = "name";
    pub const NEIGHBOURHOOD_GROUP: &str = "neighbourhood_group";
    pub const NEIGHBOURHOOD: &str = "neighbourhood";
    pub const PRICE: &str = "price";
    pub const LAST_REVIEW: &str = "last_review";
    pub const LONGITUDE: &str = "longitude";
    pub const LATITUDE: &str = "latitude";
    pub const AVAILABILITY_365: &str = "availability_365";
    pub const HOST_NAME: &str = "host_name";
    pub const ROOM_TYPE: &str = "room_type";

    /// Every column that must be present before cleaning starts.
    pub const REQUIRED: [&str; 7] = [
        PRICE,
        LAST_REVIEW,
        LONGITUDE,
        LATITUDE,
        AVAILABILITY_365,
        HOST_NAME,
        ROOM_TYPE,
    ];

    /// Free-text columns, read as strings whatever their content looks like.
    pub const TEXT: [&str; 6] = [
        NAME,
        HOST_NAME,
        NEIGHBOURHOOD_GROUP,
        NEIGHBOURHOOD,
        ROOM_TYPE,
        LAST_REVIEW,
    ];
}

/// Inclusive longitude range of the city boundary.
pub const LONGITUDE_BOUNDS: (f64, f64) = (-74.25, -73.50);

/// Inclusive latitude range of the city boundary.
pub const LATITUDE_BOUNDS: (f64, f64) = (40.5, 41.2);

/// The only room type retained by the cleaner.
pub const ENTIRE_HOME: &str = "Entire home/apt";

/// Inclusive nightly price bounds.
///
/// # Examples
///
/// ```
/// use nyc_airbnb_prep::core::domain::PriceRange;
///
/// let range = PriceRange::new(10.0, 350.0);
/// assert!(range.contains(10.0));
/// assert!(range.contains(350.0));
/// assert!(!range.contains(350.01));
/// assert!(!range.contains(f64::NAN));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceRange {
    pub min_price: f64,
    pub max_price: f64,
}

impl PriceRange {
    pub fn new(min_price: f64, max_price: f64) -> Self {
        Self {
            min_price,
            max_price,
        }
    }

    pub fn contains(&self, price: f64) -> bool {
        self.min_price <= price && price <= self.max_price
    }
}

/// Validated test/validation fractions for a three-way split.
///
/// `val_size` is expressed relative to the whole table, so the fraction carved
/// out of the remaining train portion is [`SplitSizes::adjusted_val_fraction`].
///
/// # Examples
///
/// ```
/// use nyc_airbnb_prep::core::domain::SplitSizes;
///
/// let sizes = SplitSizes::new(0.2, 0.2).unwrap();
/// assert!((sizes.adjusted_val_fraction() - 0.25).abs() < 1e-12);
/// assert!((sizes.train_size() - 0.6).abs() < 1e-12);
///
/// assert!(SplitSizes::new(0.5, 0.5).is_err());
/// assert!(SplitSizes::new(0.0, 0.2).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SplitSizes {
    test_size: f64,
    val_size: f64,
}

impl SplitSizes {
    /// Validates both fractions: each in the open interval (0, 1) and their
    /// sum strictly below 1.
    pub fn new(test_size: f64, val_size: f64) -> PrepResult<Self> {
        for (name, value) in [("test_size", test_size), ("val_size", val_size)] {
            if !value.is_finite() || value <= 0.0 || value >= 1.0 {
                return Err(PrepError::InvalidSizeError(format!(
                    "{} must be in (0, 1), got {}",
                    name, value
                )));
            }
        }
        if test_size + val_size >= 1.0 {
            return Err(PrepError::InvalidSizeError(format!(
                "test_size + val_size must be < 1, got {} + {} = {}",
                test_size,
                val_size,
                test_size + val_size
            )));
        }
        Ok(Self {
            test_size,
            val_size,
        })
    }

    pub fn test_size(&self) -> f64 {
        self.test_size
    }

    pub fn val_size(&self) -> f64 {
        self.val_size
    }

    pub fn train_size(&self) -> f64 {
        1.0 - self.test_size - self.val_size
    }

    /// Share of the post-test remainder that becomes the validation set:
    /// `val_size / (1 - test_size)`.
    pub fn adjusted_val_fraction(&self) -> f64 {
        self.val_size / (1.0 - self.test_size)
    }
}

/// Stratification choice: `"none"` or a column name.
///
/// # Examples
///
/// ```
/// use nyc_airbnb_prep::core::domain::Stratify;
///
/// assert_eq!("none".parse::<Stratify>().unwrap(), Stratify::None);
/// assert_eq!(
///     "neighbourhood_group".parse::<Stratify>().unwrap(),
///     Stratify::Column("neighbourhood_group".into())
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Stratify {
    #[default]
    None,
    Column(String),
}

impl Stratify {
    pub fn column(&self) -> Option<&str> {
        match self {
            Stratify::None => None,
            Stratify::Column(name) => Some(name),
        }
    }
}

impl FromStr for Stratify {
    type Err = PrepError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(Stratify::None),
            name => Ok(Stratify::Column(name.to_string())),
        }
    }
}

impl fmt::Display for Stratify {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stratify::None => f.write_str("none"),
            Stratify::Column(name) => f.write_str(name),
        }
    }
}
