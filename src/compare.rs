//! Best value and lowest monthly payment across the comparison set.
//!
//! Both selections scan the list once and keep the first property on ties.

use crate::models::{MortgageSettings, Property};

/// Price per square foot, `None` when the square footage is zero
pub fn price_per_sqft(property: &Property) -> Option<f64> {
    if property.square_feet == 0 {
        return None;
    }
    Some(property.price / f64::from(property.square_feet))
}

/// Property with the lowest price per square foot.
///
/// Only properties with a positive price and square footage take part.
pub fn best_value(properties: &[Property]) -> Option<&Property> {
    min_by_key(
        properties
            .iter()
            .filter(|p| p.price > 0.0)
            .filter_map(|p| price_per_sqft(p).map(|ratio| (p, ratio))),
    )
}

/// Property with the lowest total monthly cost, `None` when mortgage
/// calculations are disabled.
pub fn lowest_monthly_payment<'a>(
    properties: &'a [Property],
    settings: &MortgageSettings,
) -> Option<&'a Property> {
    min_by_key(
        properties
            .iter()
            .filter_map(|p| settings.breakdown_for(p).map(|b| (p, b.total_monthly))),
    )
}

/// Non-finite values never win
fn min_by_key<'a>(candidates: impl Iterator<Item = (&'a Property, f64)>) -> Option<&'a Property> {
    let mut best: Option<(&Property, f64)> = None;

    for (property, value) in candidates.filter(|(_, value)| value.is_finite()) {
        match best {
            Some((_, current)) if value >= current => {}
            _ => best = Some((property, value)),
        }
    }

    best.map(|(property, _)| property)
}

/// Ids of the distinguished properties for one list and settings pair
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Highlights {
    pub best_value: Option<String>,
    pub lowest_payment: Option<String>,
}

impl Highlights {
    pub fn compute(properties: &[Property], settings: &MortgageSettings) -> Self {
        Self {
            best_value: best_value(properties).map(|p| p.id.clone()),
            lowest_payment: lowest_monthly_payment(properties, settings).map(|p| p.id.clone()),
        }
    }

    pub fn is_best_value(&self, id: &str) -> bool {
        self.best_value.as_deref() == Some(id)
    }

    pub fn is_lowest_payment(&self, id: &str) -> bool {
        self.lowest_payment.as_deref() == Some(id)
    }
}
