//! Display ordering and view filtering of the property list.

use crate::compare::price_per_sqft;
use crate::error::{Error, Result};
use crate::models::{FavoriteSet, MortgageSettings, Property};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Price,
    SquareFeet,
    PricePerSqFt,
    Bedrooms,
    Bathrooms,
    Taxes,
    YearBuilt,
    MonthlyPayment,
}

impl SortField {
    pub const ALL: [SortField; 8] = [
        SortField::Price,
        SortField::SquareFeet,
        SortField::PricePerSqFt,
        SortField::Bedrooms,
        SortField::Bathrooms,
        SortField::Taxes,
        SortField::YearBuilt,
        SortField::MonthlyPayment,
    ];

    pub fn key(self) -> &'static str {
        match self {
            SortField::Price => "price",
            SortField::SquareFeet => "squareFeet",
            SortField::PricePerSqFt => "pricePerSqFt",
            SortField::Bedrooms => "bedrooms",
            SortField::Bathrooms => "bathrooms",
            SortField::Taxes => "taxes",
            SortField::YearBuilt => "yearBuilt",
            SortField::MonthlyPayment => "monthlyPayment",
        }
    }

    fn label(self) -> &'static str {
        match self {
            SortField::Price => "Price",
            SortField::SquareFeet => "Square Feet",
            SortField::PricePerSqFt => "Price/Sq.Ft",
            SortField::Bedrooms => "Bedrooms",
            SortField::Bathrooms => "Bathrooms",
            SortField::Taxes => "Taxes",
            SortField::YearBuilt => "Year Built",
            SortField::MonthlyPayment => "Monthly Payment",
        }
    }

    /// Value used for ordering; `None` when missing or not computable
    fn value(self, property: &Property, settings: &MortgageSettings) -> Option<f64> {
        match self {
            SortField::Price => Some(property.price),
            SortField::SquareFeet => Some(f64::from(property.square_feet)),
            SortField::PricePerSqFt => price_per_sqft(property),
            SortField::Bedrooms => Some(f64::from(property.bedrooms)),
            SortField::Bathrooms => Some(f64::from(property.bathrooms)),
            SortField::Taxes => Some(property.taxes),
            SortField::YearBuilt => property.year_built.map(f64::from),
            SortField::MonthlyPayment => settings.breakdown_for(property).map(|b| b.total_monthly),
        }
    }

    /// What a missing value compares as under `MissingValues::AsZero`.
    /// A listing with no floor area has no finite price per sq.ft, so it
    /// ranks as the most expensive rather than the cheapest.
    fn missing_as(self) -> f64 {
        match self {
            SortField::PricePerSqFt => f64::INFINITY,
            _ => 0.0,
        }
    }
}

impl FromStr for SortField {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        SortField::ALL
            .into_iter()
            .find(|f| f.key() == s)
            .ok_or_else(|| Error::Validation(format!("unknown sort field: {s}")))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

/// Field plus direction, persisted as `"<field>-<dir>"`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SortOrder {
    pub field: SortField,
    pub direction: SortDirection,
}

impl SortOrder {
    pub fn new(field: SortField, direction: SortDirection) -> Self {
        Self { field, direction }
    }

    /// Human label, e.g. "Price: Low to High"
    pub fn label(&self) -> String {
        let suffix = match (self.field, self.direction) {
            (SortField::YearBuilt, SortDirection::Asc) => "Oldest First",
            (SortField::YearBuilt, SortDirection::Desc) => "Newest First",
            (_, SortDirection::Asc) => "Low to High",
            (_, SortDirection::Desc) => "High to Low",
        };
        format!("{}: {}", self.field.label(), suffix)
    }

    /// Every supported ordering in menu order
    pub fn options() -> Vec<SortOrder> {
        SortField::ALL
            .into_iter()
            .flat_map(|f| {
                [
                    SortOrder::new(f, SortDirection::Asc),
                    SortOrder::new(f, SortDirection::Desc),
                ]
            })
            .collect()
    }
}

impl Default for SortOrder {
    fn default() -> Self {
        Self::new(SortField::Price, SortDirection::Asc)
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dir = match self.direction {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        };
        write!(f, "{}-{}", self.field.key(), dir)
    }
}

impl FromStr for SortOrder {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (field, dir) = s
            .rsplit_once('-')
            .ok_or_else(|| Error::Validation(format!("invalid sort order: {s}")))?;

        let direction = match dir {
            "asc" => SortDirection::Asc,
            "desc" => SortDirection::Desc,
            other => return Err(Error::Validation(format!("invalid sort direction: {other}"))),
        };

        Ok(Self::new(field.parse()?, direction))
    }
}

impl TryFrom<String> for SortOrder {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<SortOrder> for String {
    fn from(order: SortOrder) -> Self {
        order.to_string()
    }
}

/// How properties lacking a value for the sort field are ordered
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MissingValues {
    /// Compare as 0, so a missing year sorts as year 0. Price per sq.ft
    /// without floor area compares as infinite.
    #[default]
    AsZero,
    /// Place after every present value regardless of direction
    Last,
}

/// Which part of the list is shown
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum View {
    #[default]
    All,
    Favorites,
}

impl FromStr for View {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "all" => Ok(View::All),
            "favorites" => Ok(View::Favorites),
            other => Err(Error::Validation(format!("unknown view: {other}"))),
        }
    }
}

/// Restrict the list to the active view
pub fn filter_view<'a>(
    properties: &'a [Property],
    view: View,
    favorites: &FavoriteSet,
) -> Vec<&'a Property> {
    properties
        .iter()
        .filter(|p| view == View::All || favorites.contains(&p.id))
        .collect()
}

/// Return a new ordering of `properties`; the input is left untouched and
/// equal keys keep their relative order.
pub fn sort_properties<'a>(
    properties: impl IntoIterator<Item = &'a Property>,
    order: SortOrder,
    settings: &MortgageSettings,
    missing: MissingValues,
) -> Vec<&'a Property> {
    let mut keyed: Vec<(&Property, Option<f64>)> = properties
        .into_iter()
        .map(|p| (p, order.field.value(p, settings)))
        .collect();

    let stand_in = order.field.missing_as();
    keyed.sort_by(|(_, a), (_, b)| compare_values(*a, *b, order.direction, missing, stand_in));
    keyed.into_iter().map(|(p, _)| p).collect()
}

fn compare_values(
    a: Option<f64>,
    b: Option<f64>,
    direction: SortDirection,
    missing: MissingValues,
    stand_in: f64,
) -> Ordering {
    let (a, b) = match (missing, a, b) {
        (MissingValues::Last, None, None) => return Ordering::Equal,
        (MissingValues::Last, None, Some(_)) => return Ordering::Greater,
        (MissingValues::Last, Some(_), None) => return Ordering::Less,
        _ => (a.unwrap_or(stand_in), b.unwrap_or(stand_in)),
    };

    match direction {
        SortDirection::Asc => a.total_cmp(&b),
        SortDirection::Desc => b.total_cmp(&a),
    }
}
