use calamine::Data;

#[derive(Debug, Clone, Default)]
pub struct RawSheet {
    /// Column labels from the header row, already stringified.
    /// Blank header cells become `Unnamed: <n>`.
    pub headers: Vec<String>,
    /// Every row below the header, one cell per header column.
    pub rows: Vec<Vec<Data>>,
}

impl RawSheet {
    pub fn width(&self) -> usize {
        self.headers.len()
    }

    /// Cell at (`row`, `col`), treating short rows as padded with empties.
    pub fn cell(&self, row: usize, col: usize) -> &Data {
        static EMPTY: Data = Data::Empty;
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&EMPTY)
    }
}
