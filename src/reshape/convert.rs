use calamine::Data;

/// Coerce one cell to an enrollment percentage.
///
/// Numbers pass through, text is trimmed and parsed, everything else
/// (blank, booleans, error cells, dates) is treated as missing. `NaN` counts
/// as missing too.
pub fn coerce_pct(cell: &Data) -> Option<f64> {
    let v = match cell {
        Data::Float(f) => Some(*f),
        Data::Int(i) => Some(*i as f64),
        Data::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    v.filter(|f| !f.is_nan())
}

/// A label names a year column when it is non-empty and all ASCII digits.
pub fn is_year_label(label: &str) -> bool {
    !label.is_empty() && label.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_cells_pass_through() {
        assert_eq!(coerce_pct(&Data::Float(48.25)), Some(48.25));
        assert_eq!(coerce_pct(&Data::Int(50)), Some(50.0));
    }

    #[test]
    fn text_is_parsed_when_numeric() {
        assert_eq!(coerce_pct(&Data::String(" 47.9 ".into())), Some(47.9));
        assert_eq!(coerce_pct(&Data::String("..".into())), None);
        assert_eq!(coerce_pct(&Data::String("".into())), None);
        assert_eq!(coerce_pct(&Data::String("NaN".into())), None);
    }

    #[test]
    fn non_numeric_cells_are_missing() {
        assert_eq!(coerce_pct(&Data::Empty), None);
        assert_eq!(coerce_pct(&Data::Bool(true)), None);
        assert_eq!(coerce_pct(&Data::Float(f64::NAN)), None);
    }

    #[test]
    fn year_labels() {
        assert!(is_year_label("2020"));
        assert!(is_year_label("1960"));
        assert!(!is_year_label("Unnamed: 5"));
        assert!(!is_year_label("IndicatorCode"));
        assert!(!is_year_label("19.5"));
        assert!(!is_year_label("-1990"));
        assert!(!is_year_label(""));
    }
}
