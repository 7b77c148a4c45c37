//! Text normalisation and numeric coercion for loosely typed disclosure cells.
//!
//! Disclosure exports mix numbers and free text in the same column. Nothing
//! downstream does arithmetic on raw cells: numeric columns go through
//! [`numeric_values`] first, which yields `None` for anything unparsable.

use crate::error::{PipelineError, Result, View};
use polars::prelude::*;

/// Trimmed, lowercased form used by every predicate and side classification.
pub fn normalize(value: &str) -> String {
    value.trim().to_lowercase()
}

/// Parses one cell as a finite number. Blank, textual or non-finite cells are `None`.
pub fn parse_number(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Requires `column` to exist on `df`, reporting its absence against `view`.
pub fn require_column<'a>(df: &'a DataFrame, column: &str, view: View) -> Result<&'a Series> {
    df.column(column)
        .map_err(|_| PipelineError::missing_column(view, column))
}

/// Cell values of `column` rendered as text, nulls preserved.
pub fn text_values(df: &DataFrame, column: &str, view: View) -> Result<Vec<Option<String>>> {
    let series = require_column(df, column, view)?;
    let as_text = series.cast(&DataType::String)?;
    let values = as_text
        .str()?
        .into_iter()
        .map(|v| v.map(|s| s.to_string()))
        .collect();
    Ok(values)
}

/// Normalised cell values of `column`, nulls preserved.
pub fn normalized_values(df: &DataFrame, column: &str, view: View) -> Result<Vec<Option<String>>> {
    Ok(text_values(df, column, view)?
        .into_iter()
        .map(|v| v.map(|s| normalize(&s)))
        .collect())
}

/// Numeric values of `column`: native numeric columns are cast, text is parsed.
pub fn numeric_values(df: &DataFrame, column: &str, view: View) -> Result<Vec<Option<f64>>> {
    let series = require_column(df, column, view)?;
    if series.dtype().is_numeric() {
        let cast = series.cast(&DataType::Float64)?;
        return Ok(cast
            .f64()?
            .into_iter()
            .map(|v| v.filter(|x| x.is_finite()))
            .collect());
    }
    Ok(text_values(df, column, view)?
        .into_iter()
        .map(|v| v.as_deref().and_then(parse_number))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("  Promoter Group "), "promoter group");
        assert_eq!(normalize("BUY"), "buy");
        assert_eq!(normalize("\tMarket Sale\n"), "market sale");
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number(" 1500 "), Some(1500.0));
        assert_eq!(parse_number("2.75"), Some(2.75));
        assert_eq!(parse_number("-3.97E+07"), Some(-39_700_000.0));
        assert_eq!(parse_number(""), None);
        assert_eq!(parse_number("Nil"), None);
        assert_eq!(parse_number("1,000"), None);
        assert_eq!(parse_number("NaN"), None);
        assert_eq!(parse_number("inf"), None);
    }

    #[test]
    fn test_numeric_values_from_text_and_numbers() {
        let df = df!(
            "text" => &[Some("10"), Some("abc"), None],
            "num" => &[Some(1.5), None, Some(3.0)]
        )
        .unwrap();

        let text = numeric_values(&df, "text", View::Totals).unwrap();
        assert_eq!(text, vec![Some(10.0), None, None]);

        let num = numeric_values(&df, "num", View::Totals).unwrap();
        assert_eq!(num, vec![Some(1.5), None, Some(3.0)]);
    }

    #[test]
    fn test_missing_column_is_view_error() {
        let df = df!("a" => &["x"]).unwrap();
        let err = numeric_values(&df, "b", View::MaxTransactions).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::MissingColumn { view: View::MaxTransactions, ref column } if column == "b"
        ));
    }

    #[test]
    fn test_text_values_casts_numbers() {
        let df = df!("reg" => &[Some(7i64), None]).unwrap();
        let values = text_values(&df, "reg", View::Filtered).unwrap();
        assert_eq!(values, vec![Some("7".to_string()), None]);
    }
}
