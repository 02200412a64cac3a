// src/table.rs

use anyhow::{anyhow, Context, Result};
use arrow::{
    array::{ArrayRef, Float64Array, Int32Array, StringArray},
    datatypes::{DataType, Field, Schema},
    record_batch::RecordBatch,
};
use serde::{Deserialize, Serialize};
use std::{collections::BTreeSet, sync::Arc};

/// One (country, year) enrollment value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub country: String,
    pub iso3: String,
    pub year: i32,
    pub enrollment_pct: f64,
}

impl Observation {
    pub fn new(country: impl Into<String>, iso3: impl Into<String>, year: i32, pct: f64) -> Self {
        Self {
            country: country.into(),
            iso3: iso3.into(),
            year,
            enrollment_pct: pct,
        }
    }
}

/// Long-format table of observations. Built once, read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObservationTable {
    observations: Vec<Observation>,
}

impl ObservationTable {
    pub fn new(observations: Vec<Observation>) -> Self {
        Self { observations }
    }

    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Observation> {
        self.observations.iter()
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Distinct years, ascending.
    pub fn years(&self) -> Vec<i32> {
        self.iter()
            .map(|o| o.year)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Distinct country names, sorted.
    pub fn countries(&self) -> Vec<String> {
        self.iter()
            .map(|o| o.country.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    pub fn year_range(&self) -> Option<(i32, i32)> {
        let min = self.iter().map(|o| o.year).min()?;
        let max = self.iter().map(|o| o.year).max()?;
        Some((min, max))
    }

    pub fn schema() -> Schema {
        Schema::new(vec![
            Field::new("country", DataType::Utf8, false),
            Field::new("iso3", DataType::Utf8, false),
            Field::new("year", DataType::Int32, false),
            Field::new("enrollment_pct", DataType::Float64, false),
        ])
    }

    pub fn to_record_batch(&self) -> Result<RecordBatch> {
        let countries: StringArray = self.iter().map(|o| Some(o.country.as_str())).collect();
        let iso3: StringArray = self.iter().map(|o| Some(o.iso3.as_str())).collect();
        let years = Int32Array::from_iter_values(self.iter().map(|o| o.year));
        let pcts = Float64Array::from_iter_values(self.iter().map(|o| o.enrollment_pct));

        let columns: Vec<ArrayRef> = vec![
            Arc::new(countries),
            Arc::new(iso3),
            Arc::new(years),
            Arc::new(pcts),
        ];
        RecordBatch::try_new(Arc::new(Self::schema()), columns)
            .context("building observation record batch")
    }

    /// Rebuild a table from batches carrying the observation schema.
    pub fn from_record_batches(batches: &[RecordBatch]) -> Result<Self> {
        let mut observations = Vec::new();
        for batch in batches {
            let countries = string_column(batch, "country")?;
            let iso3 = string_column(batch, "iso3")?;
            let years = batch
                .column_by_name("year")
                .and_then(|c| c.as_any().downcast_ref::<Int32Array>())
                .ok_or_else(|| anyhow!("column `year` missing or not Int32"))?;
            let pcts = batch
                .column_by_name("enrollment_pct")
                .and_then(|c| c.as_any().downcast_ref::<Float64Array>())
                .ok_or_else(|| anyhow!("column `enrollment_pct` missing or not Float64"))?;

            for i in 0..batch.num_rows() {
                observations.push(Observation::new(
                    countries.value(i),
                    iso3.value(i),
                    years.value(i),
                    pcts.value(i),
                ));
            }
        }
        Ok(Self::new(observations))
    }
}

impl<'a> IntoIterator for &'a ObservationTable {
    type Item = &'a Observation;
    type IntoIter = std::slice::Iter<'a, Observation>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

fn string_column<'a>(batch: &'a RecordBatch, name: &str) -> Result<&'a StringArray> {
    batch
        .column_by_name(name)
        .and_then(|c| c.as_any().downcast_ref::<StringArray>())
        .ok_or_else(|| anyhow!("column `{}` missing or not Utf8", name))
}
