use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::{error::ViewError, table::ObservationTable};

/// The two dashboard selections: one year, a list of countries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filters {
    pub year: i32,
    pub countries: Vec<String>,
}

impl Filters {
    pub fn new(year: i32, countries: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            year,
            countries: countries.into_iter().map(Into::into).collect(),
        }
    }

    /// Latest year plus whichever `preferred` countries have data.
    pub fn defaults(table: &ObservationTable, preferred: &[String]) -> Result<Self, ViewError> {
        let (_, latest) = table.year_range().ok_or(ViewError::EmptyTable)?;
        let known: HashSet<&str> = table.iter().map(|o| o.country.as_str()).collect();
        let countries = preferred
            .iter()
            .filter(|c| known.contains(c.as_str()))
            .cloned()
            .collect();
        Ok(Self {
            year: latest,
            countries,
        })
    }

    /// Check both selections against the table's domains.
    pub fn validate(&self, table: &ObservationTable) -> Result<(), ViewError> {
        if table.is_empty() {
            return Err(ViewError::EmptyTable);
        }
        if !table.iter().any(|o| o.year == self.year) {
            return Err(ViewError::UnknownYear(self.year));
        }
        let known: HashSet<&str> = table.iter().map(|o| o.country.as_str()).collect();
        if let Some(missing) = self.countries.iter().find(|c| !known.contains(c.as_str())) {
            return Err(ViewError::UnknownCountry(missing.clone()));
        }
        Ok(())
    }

    pub fn includes(&self, country: &str) -> bool {
        self.countries.iter().any(|c| c == country)
    }
}
