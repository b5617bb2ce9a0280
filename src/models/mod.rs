use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeSet;
use uuid::Uuid;

/// Generate a fresh opaque id for properties and saved searches
pub fn generate_id() -> String {
    Uuid::new_v4().to_string()
}

/// A listing the user is comparing
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    pub id: String,
    pub url: String,
    pub address: String,
    pub price: f64,
    pub square_feet: u32,
    #[serde(default)]
    pub taxes: f64,
    #[serde(default)]
    pub bedrooms: u32,
    #[serde(default)]
    pub bathrooms: f32,
    /// Stored as `0` or `null` by older data when unknown
    #[serde(
        default,
        deserialize_with = "zero_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub year_built: Option<u16>,
    /// Human-readable name of the listing site
    #[serde(default)]
    pub source: String,
}

fn zero_as_none<'de, D>(deserializer: D) -> Result<Option<u16>, D::Error>
where
    D: Deserializer<'de>,
{
    let year = Option::<u16>::deserialize(deserializer)?;
    Ok(year.filter(|y| *y != 0))
}

/// Form input for adding or editing a property, before validation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyDraft {
    pub url: String,
    pub address: String,
    pub source: String,
    pub price: f64,
    pub square_feet: u32,
    pub taxes: f64,
    pub bedrooms: u32,
    pub bathrooms: f32,
    pub year_built: Option<u16>,
}

impl From<&Property> for PropertyDraft {
    fn from(property: &Property) -> Self {
        Self {
            url: property.url.clone(),
            address: property.address.clone(),
            source: property.source.clone(),
            price: property.price,
            square_feet: property.square_feet,
            taxes: property.taxes,
            bedrooms: property.bedrooms,
            bathrooms: property.bathrooms,
            year_built: property.year_built,
        }
    }
}

/// Global settings for affordability calculations
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MortgageSettings {
    pub enabled: bool,
    /// Annual interest rate in percent
    pub interest_rate: f64,
    /// Down payment in percent of the price
    pub down_payment_percentage: f64,
    pub loan_term_years: u32,
}

impl Default for MortgageSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            interest_rate: 6.5,
            down_payment_percentage: 20.0,
            loan_term_years: 30,
        }
    }
}

/// Named snapshot of the property list
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SavedSearch {
    #[serde(default)]
    pub id: String,
    pub name: String,
    pub properties: Vec<Property>,
    #[serde(default = "Utc::now")]
    pub saved_at: DateTime<Utc>,
}

impl SavedSearch {
    pub fn new(name: impl Into<String>, properties: Vec<Property>) -> Self {
        Self {
            id: generate_id(),
            name: name.into(),
            properties,
            saved_at: Utc::now(),
        }
    }
}

/// Property ids marked as favorites
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct FavoriteSet(BTreeSet<String>);

impl FavoriteSet {
    pub fn contains(&self, id: &str) -> bool {
        self.0.contains(id)
    }

    pub fn insert(&mut self, id: impl Into<String>) -> bool {
        self.0.insert(id.into())
    }

    pub fn remove(&mut self, id: &str) -> bool {
        self.0.remove(id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
