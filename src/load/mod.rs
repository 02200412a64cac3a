// src/load/mod.rs
pub mod header;
pub mod raw_sheet;

pub use header::header_label;
pub use raw_sheet::RawSheet;

use calamine::{open_workbook_auto, Data, Range, Reader};
use std::{fs::File, path::Path};
use tracing::{debug, warn};

use crate::{
    config::ReshapeOptions,
    error::{FormatError, LoadError},
};

/// Open the workbook at `path` and cut the configured sheet into a header row
/// plus data rows.
///
/// `.xls`, `.xlsx`, `.xlsm`, `.xlsb` and `.ods` are detected by extension.
#[tracing::instrument(level = "info", skip(path, options), fields(path = %path.display(), sheet = %options.sheet))]
pub fn read_sheet(path: &Path, options: &ReshapeOptions) -> Result<RawSheet, LoadError> {
    let format_err = |source: FormatError| LoadError::Format {
        path: path.to_path_buf(),
        source,
    };

    // surface missing/unreadable files before the decoder gets a chance to
    // report them as a generic workbook error
    File::open(path).map_err(|source| LoadError::InputNotFound {
        path: path.to_path_buf(),
        source,
    })?;

    let mut workbook =
        open_workbook_auto(path).map_err(|e| format_err(FormatError::Workbook(e)))?;

    let available = workbook.sheet_names();
    if !available.iter().any(|name| name == &options.sheet) {
        warn!(?available, "sheet not present");
        return Err(format_err(FormatError::MissingSheet {
            sheet: options.sheet.clone(),
            available,
        }));
    }

    let range = workbook
        .worksheet_range(&options.sheet)
        .map_err(|e| format_err(FormatError::Workbook(e)))?;
    debug!(
        height = range.height(),
        width = range.width(),
        start = ?range.start(),
        "sheet range read"
    );

    sheet_from_range(&range, options.skip_rows).map_err(format_err)
}

/// Split a cell grid into header + data rows.
///
/// `skip_rows` counts physical sheet rows, not rows of the used range: a
/// decoder may trim leading blank rows, so row positions are taken from
/// `range.start()`.
pub fn sheet_from_range(range: &Range<Data>, skip_rows: u32) -> Result<RawSheet, FormatError> {
    let (Some((start_row, start_col)), Some((end_row, _))) = (range.start(), range.end()) else {
        return Err(FormatError::NoHeader { skip_rows });
    };
    if skip_rows > end_row {
        return Err(FormatError::NoHeader { skip_rows });
    }

    let width = range.width();
    let header_cells: Vec<Data> = if skip_rows < start_row {
        // header row sits in the trimmed blank area
        vec![Data::Empty; width]
    } else {
        range
            .rows()
            .nth((skip_rows - start_row) as usize)
            .map(|r| r.to_vec())
            .unwrap_or_else(|| vec![Data::Empty; width])
    };

    let headers = header_cells
        .iter()
        .enumerate()
        .map(|(i, cell)| header_label(cell, start_col as usize + i))
        .collect();

    let rows = range
        .rows()
        .enumerate()
        .filter(|(i, _)| start_row as usize + i > skip_rows as usize)
        .map(|(_, r)| r.to_vec())
        .collect();

    Ok(RawSheet { headers, rows })
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use rust_xlsxwriter::Workbook;
    use tempfile::TempDir;

    fn grid(cells: &[(u32, u32, Data)]) -> Range<Data> {
        let max_r = cells.iter().map(|c| c.0).max().unwrap_or(0);
        let max_c = cells.iter().map(|c| c.1).max().unwrap_or(0);
        let min_r = cells.iter().map(|c| c.0).min().unwrap_or(0);
        let min_c = cells.iter().map(|c| c.1).min().unwrap_or(0);
        let mut range = Range::new((min_r, min_c), (max_r, max_c));
        for (r, c, v) in cells {
            range.set_value((*r, *c), v.clone());
        }
        range
    }

    #[test]
    fn header_is_found_below_banner_rows() -> Result<()> {
        let range = grid(&[
            (0, 0, Data::String("Data Source".into())),
            (1, 0, Data::String("Last Updated Date".into())),
            (3, 0, Data::String("Country Name".into())),
            (3, 1, Data::String("1990".into())),
            (4, 0, Data::String("Chad".into())),
            (4, 1, Data::Float(40.0)),
        ]);
        let sheet = sheet_from_range(&range, 3)?;
        assert_eq!(sheet.headers, vec!["Country Name", "1990"]);
        assert_eq!(sheet.rows.len(), 1);
        assert_eq!(sheet.cell(0, 1), &Data::Float(40.0));
        Ok(())
    }

    #[test]
    fn trimmed_leading_rows_keep_physical_offsets() -> Result<()> {
        // used range starts at the header itself
        let range = grid(&[
            (3, 2, Data::String("Country Name".into())),
            (4, 2, Data::String("Chad".into())),
        ]);
        let sheet = sheet_from_range(&range, 3)?;
        assert_eq!(sheet.headers, vec!["Country Name"]);
        assert_eq!(sheet.rows.len(), 1);
        Ok(())
    }

    #[test]
    fn header_offset_past_end_is_an_error() {
        let range = grid(&[(0, 0, Data::String("only row".into()))]);
        assert!(matches!(
            sheet_from_range(&range, 3),
            Err(FormatError::NoHeader { skip_rows: 3 })
        ));
        assert!(matches!(
            sheet_from_range(&Range::empty(), 0),
            Err(FormatError::NoHeader { .. })
        ));
    }

    #[test]
    fn missing_file_is_input_not_found() {
        let err = read_sheet(
            Path::new("/no/such/dir/enrollment.xlsx"),
            &ReshapeOptions::default(),
        )
        .unwrap_err();
        assert!(err.is_not_found(), "{err}");
    }

    #[test]
    fn missing_sheet_lists_available_sheets() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("wrong_sheet.xlsx");
        let mut wb = Workbook::new();
        wb.add_worksheet().set_name("Metadata")?.write_string(0, 0, "x")?;
        wb.save(&path)?;

        match read_sheet(&path, &ReshapeOptions::default()) {
            Err(LoadError::Format {
                source: FormatError::MissingSheet { sheet, available },
                ..
            }) => {
                assert_eq!(sheet, "Data");
                assert_eq!(available, vec!["Metadata".to_string()]);
            }
            other => panic!("expected MissingSheet, got {:?}", other),
        }
        Ok(())
    }

    #[test]
    fn garbage_file_is_a_format_error() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("not_really.xlsx");
        std::fs::write(&path, b"this is not a zip archive")?;
        let err = read_sheet(&path, &ReshapeOptions::default()).unwrap_err();
        assert!(matches!(err, LoadError::Format { .. }), "{err}");
        Ok(())
    }
}
