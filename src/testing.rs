//! Shared fixtures for unit tests.

use crate::models::Property;

pub fn property(id: &str, price: f64, square_feet: u32) -> Property {
    Property {
        id: id.to_string(),
        url: format!("https://www.redfin.com/CA/Oakland/{id}-94610/home/1"),
        address: format!("{id} Lakeshore Ave"),
        price,
        square_feet,
        taxes: 0.0,
        bedrooms: 3,
        bathrooms: 2.0,
        year_built: Some(1990),
        source: "Redfin".to_string(),
    }
}

pub fn with_taxes(mut property: Property, taxes: f64) -> Property {
    property.taxes = taxes;
    property
}
