// src/view/mod.rs
pub mod filters;

pub use filters::Filters;

use serde::Serialize;
use tracing::debug;

use crate::{
    error::ViewError,
    table::{Observation, ObservationTable},
};

/// Start/end points for the enrollment change chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SlopeChart {
    pub start_year: i32,
    pub end_year: i32,
    pub points: Vec<Observation>,
}

/// Everything the chart layer needs for one filter selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSnapshot {
    pub filters: Filters,
    /// Year domain, ascending
    pub years: Vec<i32>,
    /// Country domain, sorted
    pub countries: Vec<String>,
    /// Choropleth: every country for the selected year
    pub map: Vec<Observation>,
    /// Bar chart: selected countries in the selected year, highest first
    pub ranking: Vec<Observation>,
    /// Line chart: selected countries across all years
    pub trend: Vec<Observation>,
    pub slope: SlopeChart,
}

/// Read-only slices over an observation table.
#[derive(Debug, Clone, Copy)]
pub struct DashboardView<'a> {
    table: &'a ObservationTable,
}

impl<'a> DashboardView<'a> {
    pub fn new(table: &'a ObservationTable) -> Self {
        Self { table }
    }

    pub fn years(&self) -> Vec<i32> {
        self.table.years()
    }

    pub fn countries(&self) -> Vec<String> {
        self.table.countries()
    }

    pub fn map_slice(&self, year: i32) -> Vec<Observation> {
        self.table
            .iter()
            .filter(|o| o.year == year)
            .cloned()
            .collect()
    }

    pub fn ranking(&self, filters: &Filters) -> Vec<Observation> {
        let mut rows: Vec<Observation> = self
            .table
            .iter()
            .filter(|o| o.year == filters.year && filters.includes(&o.country))
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.enrollment_pct.total_cmp(&a.enrollment_pct));
        rows
    }

    pub fn trend(&self, countries: &[String]) -> Vec<Observation> {
        let mut rows: Vec<Observation> = self
            .table
            .iter()
            .filter(|o| countries.iter().any(|c| *c == o.country))
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.country.cmp(&b.country).then(a.year.cmp(&b.year)));
        rows
    }

    /// Earliest year of the table against the selected year.
    pub fn slope(&self, filters: &Filters) -> Result<SlopeChart, ViewError> {
        let (start_year, _) = self.table.year_range().ok_or(ViewError::EmptyTable)?;
        let end_year = filters.year;
        let points = self
            .trend(&filters.countries)
            .into_iter()
            .filter(|o| o.year == start_year || o.year == end_year)
            .collect();
        Ok(SlopeChart {
            start_year,
            end_year,
            points,
        })
    }

    pub fn snapshot(&self, filters: &Filters) -> Result<DashboardSnapshot, ViewError> {
        filters.validate(self.table)?;
        let snapshot = DashboardSnapshot {
            filters: filters.clone(),
            years: self.years(),
            countries: self.countries(),
            map: self.map_slice(filters.year),
            ranking: self.ranking(filters),
            trend: self.trend(&filters.countries),
            slope: self.slope(filters)?,
        };
        debug!(
            year = filters.year,
            countries = filters.countries.len(),
            map = snapshot.map.len(),
            trend = snapshot.trend.len(),
            "built dashboard snapshot"
        );
        Ok(snapshot)
    }
}
