//! Symbolic regression dataset loader.
//!
//! One sample per line, comma-separated, no header: `x1,x2,...,xk,y`.
//! All fields must parse as numbers and every line must have the same
//! width; the last field is the expected value.

use crate::error::{Error, Result};
use crate::gp::tree::Dataset;
use std::fs;
use std::path::Path;

/// Loads a CSV dataset, failing with file/line context on any malformed
/// content.
pub fn load_dataset(path: &Path) -> Result<Dataset> {
    let text = fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_dataset(&text, path)
}

fn parse_dataset(text: &str, path: &Path) -> Result<Dataset> {
    let parse_error = |line: usize, message: String| Error::Parse {
        path: path.to_path_buf(),
        line,
        message,
    };

    let mut dataset = Dataset::new();
    let mut width = None;
    for (index, line) in text.lines().enumerate() {
        let line_no = index + 1;
        if line.is_empty() {
            continue;
        }

        let mut fields = Vec::new();
        for token in line.split(',') {
            let value: f64 = token
                .parse()
                .map_err(|_| parse_error(line_no, format!("invalid number {token:?}")))?;
            fields.push(value);
        }
        if fields.len() < 2 {
            return Err(parse_error(
                line_no,
                "expected at least one input column and a target".into(),
            ));
        }
        match width {
            None => width = Some(fields.len()),
            Some(w) if w != fields.len() => {
                return Err(parse_error(
                    line_no,
                    format!("expected {w} columns, found {}", fields.len()),
                ));
            }
            Some(_) => {}
        }

        let expected = fields.pop().expect("non-empty fields");
        dataset.push((fields, expected));
    }

    if dataset.is_empty() {
        return Err(parse_error(1, "dataset is empty".into()));
    }
    Ok(dataset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn parse(text: &str) -> Result<Dataset> {
        parse_dataset(text, &PathBuf::from("test.csv"))
    }

    #[test]
    fn test_parses_samples_in_order() {
        let dataset = parse("12,2,15\n15,4,21\n").unwrap();
        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset[0], (vec![12.0, 2.0], 15.0));
        assert_eq!(dataset[1], (vec![15.0, 4.0], 21.0));
    }

    #[test]
    fn test_single_input_column() {
        let dataset = parse("1.5,3.0\n").unwrap();
        assert_eq!(dataset[0], (vec![1.5], 3.0));
    }

    #[test]
    fn test_rejects_non_numeric_field() {
        let err = parse("1,2,3\n1,two,3\n").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("test.csv:2"), "got: {message}");
        assert!(message.contains("two"), "got: {message}");
    }

    #[test]
    fn test_rejects_whitespace_in_fields() {
        assert!(parse("1, 2,3\n").is_err());
    }

    #[test]
    fn test_rejects_ragged_rows() {
        let err = parse("1,2,3\n1,2\n").unwrap_err();
        assert!(err.to_string().contains("expected 3 columns"));
    }

    #[test]
    fn test_rejects_single_column() {
        assert!(parse("42\n").is_err());
    }

    #[test]
    fn test_rejects_empty_input() {
        assert!(parse("").is_err());
    }

    #[test]
    fn test_skips_blank_lines() {
        let dataset = parse("1,2\n\n3,4\n").unwrap();
        assert_eq!(dataset.len(), 2);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_dataset(&PathBuf::from("/nonexistent/data.csv")).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }
}
