use calamine::Data;

/// Stringify a header cell the way a column label is read.
///
/// - text → trimmed text
/// - integral numbers → digits only (`1990.0` → `"1990"`)
/// - other numbers → their decimal form
/// - blank → `Unnamed: <col>`
pub fn header_label(cell: &Data, col: usize) -> String {
    let label = match cell {
        Data::String(s) => s.trim().to_string(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", *f as i64),
        Data::Float(f) => f.to_string(),
        Data::Bool(b) => (if *b { "True" } else { "False" }).to_string(),
        Data::Empty => String::new(),
        other => format!("{:?}", other),
    };
    if label.is_empty() {
        format!("Unnamed: {}", col)
    } else {
        label
    }
}
