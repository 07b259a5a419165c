//! Read-only reference data: country names, city markers and raw datasets.

pub mod cities;
pub mod countries;
pub mod datasets;

pub use cities::*;
pub use countries::*;
pub use datasets::*;

/// Resolves a country code to its display name, ignoring case.
pub trait CountryLookup {
    fn lookup_country_name(&self, code: &str) -> Option<String>;
}

/// Ordered list of cities to mark on the map.
pub trait CityCatalog {
    fn list_cities(&self) -> Vec<CityEntry>;
}

/// The compiled-in country and city tables.
#[derive(Debug, Default, Clone, Copy)]
pub struct BuiltinCatalog;

impl CountryLookup for BuiltinCatalog {
    fn lookup_country_name(&self, code: &str) -> Option<String> {
        country_name(code).map(str::to_string)
    }
}

impl CityCatalog for BuiltinCatalog {
    fn list_cities(&self) -> Vec<CityEntry> {
        CITIES.to_vec()
    }
}
