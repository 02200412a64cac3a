// src/reshape/mod.rs
pub mod convert;

use calamine::Data;
use std::{collections::HashSet, path::Path};
use tracing::{debug, info, warn};

use crate::{
    config::ReshapeOptions,
    error::{FormatError, LoadError},
    load::{self, RawSheet},
    table::{Observation, ObservationTable},
};
use convert::{coerce_pct, is_year_label};

/// Counters gathered while melting one sheet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReshapeStats {
    pub data_rows: usize,
    pub year_columns: usize,
    /// Year cells that were blank or not numeric
    pub skipped_cells: usize,
    /// Non-blank rows without a country name or ISO3 code
    pub skipped_rows: usize,
}

/// Which sheet columns feed the melt.
#[derive(Debug)]
struct ColumnPlan {
    country: usize,
    iso3: usize,
    /// (column index, parsed year), in sheet order
    years: Vec<(usize, i32)>,
}

impl ColumnPlan {
    fn from_headers(headers: &[String], options: &ReshapeOptions) -> Result<Self, FormatError> {
        let mut seen: HashSet<&str> = HashSet::new();
        let mut country = None;
        let mut iso3 = None;
        let mut years = Vec::new();

        for (idx, label) in headers.iter().enumerate() {
            if options.drop_columns.iter().any(|d| d == label) {
                continue;
            }
            if !seen.insert(label.as_str()) {
                warn!(label = %label, column = idx, "duplicate header; keeping first occurrence");
                continue;
            }

            if *label == options.country_label {
                country = Some(idx);
            } else if *label == options.iso3_label {
                iso3 = Some(idx);
            } else if is_year_label(label) {
                let year = label
                    .parse::<i32>()
                    .map_err(|_| FormatError::YearOutOfRange {
                        label: label.clone(),
                    })?;
                years.push((idx, year));
            }
        }

        let country = country.ok_or_else(|| FormatError::MissingColumn {
            label: options.country_label.clone(),
        })?;
        let iso3 = iso3.ok_or_else(|| FormatError::MissingColumn {
            label: options.iso3_label.clone(),
        })?;

        Ok(Self {
            country,
            iso3,
            years,
        })
    }
}

fn id_text(cell: &Data) -> Option<String> {
    let s = match cell {
        Data::String(s) => s.trim().to_string(),
        Data::Empty => return None,
        other => load::header_label(other, 0),
    };
    (!s.is_empty()).then_some(s)
}

/// Melt a header + rows grid into observations.
pub fn reshape_sheet(
    sheet: &RawSheet,
    options: &ReshapeOptions,
) -> Result<(ObservationTable, ReshapeStats), FormatError> {
    let plan = ColumnPlan::from_headers(&sheet.headers, options)?;
    debug!(?plan, "column plan");

    let mut stats = ReshapeStats {
        year_columns: plan.years.len(),
        ..Default::default()
    };
    let mut observations = Vec::with_capacity(sheet.rows.len() * plan.years.len());

    for (row_idx, row) in sheet.rows.iter().enumerate() {
        if row.iter().all(|c| matches!(c, Data::Empty)) {
            continue;
        }
        stats.data_rows += 1;

        let (Some(country), Some(iso3)) = (
            id_text(sheet.cell(row_idx, plan.country)),
            id_text(sheet.cell(row_idx, plan.iso3)),
        ) else {
            warn!(row = row_idx, "row without country name or code; skipped");
            stats.skipped_rows += 1;
            continue;
        };

        for &(col, year) in &plan.years {
            match coerce_pct(sheet.cell(row_idx, col)) {
                Some(pct) => observations.push(Observation {
                    country: country.clone(),
                    iso3: iso3.clone(),
                    year,
                    enrollment_pct: pct,
                }),
                None => stats.skipped_cells += 1,
            }
        }
    }

    info!(
        rows = stats.data_rows,
        year_columns = stats.year_columns,
        observations = observations.len(),
        skipped_cells = stats.skipped_cells,
        skipped_rows = stats.skipped_rows,
        "reshaped wide sheet"
    );
    Ok((ObservationTable::new(observations), stats))
}

/// Reshape an in-memory cell grid laid out like the workbook sheet.
pub fn reshape_range(
    range: &calamine::Range<Data>,
    options: &ReshapeOptions,
) -> Result<ObservationTable, FormatError> {
    let sheet = load::sheet_from_range(range, options.skip_rows)?;
    reshape_sheet(&sheet, options).map(|(table, _)| table)
}

/// Load the workbook at `path` and return its long-format observations.
pub fn reshape(
    path: impl AsRef<Path>,
    options: &ReshapeOptions,
) -> Result<ObservationTable, LoadError> {
    let path = path.as_ref();
    let sheet = load::read_sheet(path, options)?;
    reshape_sheet(&sheet, options)
        .map(|(table, _)| table)
        .map_err(|source| LoadError::Format {
            path: path.to_path_buf(),
            source,
        })
}
