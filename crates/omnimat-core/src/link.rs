//! Delimited-text link contract
//!
//! A link source turns an external text stream into a matrix that the rest
//! of the library consumes like any other source. The contract is narrow: a
//! column separator and an optional quoting character.
//!
//! [`StringTableReader`] is the built-in reader. It produces a dense
//! `STRING` matrix with one row per non-empty line and as many columns as
//! the widest line; short lines are padded with empty strings. Numeric
//! interpretation is left to the consumer (the string cells convert through
//! the usual accessors, or through a convert node).
//!
//! # Examples
//!
//! ```
//! use omnimat_core::link::{write_delimited, DelimitedTextSource, LinkOptions, StringTableReader};
//! use omnimat_core::{Coordinates, Matrix};
//! use std::io::Cursor;
//!
//! let text = "a,b,c\n1,\"2,5\",3\n";
//! let options = LinkOptions::default();
//! let m = StringTableReader
//!     .read_matrix(&mut Cursor::new(text), &options)
//!     .unwrap();
//! assert_eq!(m.size(), &[2, 3]);
//! assert_eq!(m.get_as_string(&Coordinates::at(1, 1)).unwrap(), "2,5");
//! assert_eq!(m.get_as_double(&Coordinates::at(1, 2)).unwrap(), 3.0);
//!
//! let mut out = Vec::new();
//! write_delimited(m.as_ref(), &mut out, &options).unwrap();
//! assert_eq!(String::from_utf8(out).unwrap(), "a,b,c\n1,\"2,5\",3\n");
//! ```

use crate::coordinates::Coordinates;
use crate::dense::DenseMatrix;
use crate::error::{ConstructionError, MatrixResult};
use crate::matrix::{Matrix, MatrixRef};
use std::io::{BufRead, Write};
use std::sync::Arc;

/// Separator and quoting of a delimited text source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkOptions {
    /// Column separator
    pub separator: char,
    /// Quote character; `None` disables quoting
    pub quote: Option<char>,
}

impl Default for LinkOptions {
    fn default() -> Self {
        Self {
            separator: ',',
            quote: Some('"'),
        }
    }
}

impl LinkOptions {
    pub fn new(separator: char) -> Self {
        Self {
            separator,
            ..Self::default()
        }
    }

    pub fn with_quote(mut self, quote: Option<char>) -> Self {
        self.quote = quote;
        self
    }
}

/// Producer of a matrix view over delimited text
pub trait DelimitedTextSource: Send + Sync {
    fn read_matrix(&self, input: &mut dyn BufRead, options: &LinkOptions) -> MatrixResult<MatrixRef>;
}

/// Reads delimited text into a dense string matrix
#[derive(Debug, Clone, Copy, Default)]
pub struct StringTableReader;

impl DelimitedTextSource for StringTableReader {
    fn read_matrix(&self, input: &mut dyn BufRead, options: &LinkOptions) -> MatrixResult<MatrixRef> {
        let mut rows = Vec::new();
        let mut line = String::new();
        loop {
            line.clear();
            if input.read_line(&mut line)? == 0 {
                break;
            }
            let trimmed = line.trim_end_matches(['\r', '\n']);
            if trimmed.is_empty() {
                continue;
            }
            rows.push(split_fields(trimmed, options));
        }

        let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
        let size = [rows.len(), columns];
        let matrix = DenseMatrix::from_fn(&size, |c: &Coordinates| {
            rows[c.row()].get(c.column()).cloned().unwrap_or_default()
        });
        tracing::debug!(rows = size[0], columns, "delimited text linked");
        Ok(Arc::new(matrix))
    }
}

/// Split one line, honouring the quote character. A doubled quote inside a
/// quoted field stands for one literal quote.
fn split_fields(line: &str, options: &LinkOptions) -> Vec<String> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();
    while let Some(ch) = chars.next() {
        if Some(ch) == options.quote {
            if in_quotes && chars.peek() == Some(&ch) {
                field.push(ch);
                chars.next();
            } else {
                in_quotes = !in_quotes;
            }
        } else if ch == options.separator && !in_quotes {
            fields.push(std::mem::take(&mut field));
        } else {
            field.push(ch);
        }
    }
    fields.push(field);
    fields
}

/// Write a 2D matrix as delimited text, one line per row. Fields containing
/// the separator or the quote are quoted when quoting is enabled.
///
/// # Errors
///
/// Construction error for non-2D matrices, I/O errors from `out`.
pub fn write_delimited(matrix: &dyn Matrix, out: &mut dyn Write, options: &LinkOptions) -> MatrixResult<()> {
    if matrix.dimension_count() != 2 {
        return Err(ConstructionError::DimensionMismatch {
            operation: "write_delimited".to_string(),
            expected: 2,
            got: matrix.dimension_count(),
        }
        .into());
    }
    let separator = options.separator.to_string();
    for row in 0..matrix.row_count() {
        let mut fields = Vec::with_capacity(matrix.column_count());
        for column in 0..matrix.column_count() {
            let text = matrix.get_as_string(&Coordinates::at(row, column))?;
            fields.push(quote_field(text, options));
        }
        writeln!(out, "{}", fields.join(&separator))?;
    }
    Ok(())
}

fn quote_field(text: String, options: &LinkOptions) -> String {
    match options.quote {
        Some(q) if text.contains(options.separator) || text.contains(q) => {
            let doubled = text.replace(q, &format!("{q}{q}"));
            format!("{q}{doubled}{q}")
        }
        _ => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{StorageType, ValueType};
    use std::io::Cursor;

    fn read(text: &str, options: &LinkOptions) -> MatrixRef {
        StringTableReader
            .read_matrix(&mut Cursor::new(text), options)
            .unwrap()
    }

    #[test]
    fn test_ragged_rows_are_padded() {
        let m = read("1;2;3\n4\n\n5;6\n", &LinkOptions::new(';'));
        assert_eq!(m.size(), &[3, 3]);
        assert_eq!(m.value_type(), ValueType::String);
        assert_eq!(m.storage_type(), StorageType::Dense);
        assert_eq!(m.get_as_string(&Coordinates::at(1, 2)).unwrap(), "");
        assert_eq!(m.get_as_int(&Coordinates::at(2, 1)).unwrap(), 6);
        assert_eq!(m.get_as_int(&Coordinates::at(1, 1)).unwrap(), 0);
    }

    #[test]
    fn test_quotes() {
        let fields = split_fields("\"a,b\",\"say \"\"hi\"\"\",c", &LinkOptions::default());
        assert_eq!(fields, vec!["a,b", "say \"hi\"", "c"]);
        let unquoted = split_fields("\"a,b\"", &LinkOptions::default().with_quote(None));
        assert_eq!(unquoted, vec!["\"a", "b\""]);
    }

    #[test]
    fn test_empty_input() {
        let m = read("", &LinkOptions::default());
        assert_eq!(m.size(), &[0, 0]);
        assert_eq!(m.available_coordinates().count(), 0);
    }

    #[test]
    fn test_write_rejects_non_2d() {
        let m = DenseMatrix::<f64>::zeros(&[2, 2, 2]);
        let mut out = Vec::new();
        assert!(write_delimited(&m, &mut out, &LinkOptions::default())
            .unwrap_err()
            .is_construction());
    }

    #[test]
    fn test_write_tab_separated() {
        let m = DenseMatrix::from_column_major(vec![1.5, 2.0, 3.0, 4.25], &[2, 2]).unwrap();
        let mut out = Vec::new();
        write_delimited(&m, &mut out, &LinkOptions::new('\t')).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "1.5\t3\n2\t4.25\n");
    }
}
