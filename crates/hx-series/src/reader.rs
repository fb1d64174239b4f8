//! Parser for function-object `.dat` files.
//!
//! Every physical line is trimmed. Blank lines and lines starting with `#`
//! are skipped. Remaining lines are split on whitespace: the first field is
//! the time, the last field is the value. A line whose needed fields do not
//! parse is skipped without aborting the file.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use hx_core::parse_real;

use crate::{SeriesError, SeriesResult, TimeSeries};

const COMMENT_MARKER: char = '#';

/// Read the full series from a file.
pub fn read_series(path: &Path) -> SeriesResult<TimeSeries> {
    let reader = open(path)?;
    parse_series(reader).map_err(|source| SeriesError::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// Read only the value of the last parseable row.
pub fn read_last_value(path: &Path) -> SeriesResult<Option<f64>> {
    let reader = open(path)?;
    parse_last_value(reader).map_err(|source| SeriesError::Read {
        path: path.to_path_buf(),
        source,
    })
}

pub fn parse_series<R: BufRead>(reader: R) -> std::io::Result<TimeSeries> {
    let mut series = TimeSeries::new();
    for_each_row(reader, |fields| {
        if let (Some(t), Some(v)) = (first_real(fields), last_real(fields)) {
            series.push(t, v);
        }
    })?;
    Ok(series)
}

pub fn parse_last_value<R: BufRead>(reader: R) -> std::io::Result<Option<f64>> {
    let mut last = None;
    for_each_row(reader, |fields| {
        if let Some(v) = last_real(fields) {
            last = Some(v);
        }
    })?;
    Ok(last)
}

fn open(path: &Path) -> SeriesResult<BufReader<File>> {
    let file = File::open(path).map_err(|source| SeriesError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(BufReader::new(file))
}

/// Feed the fields of every data row to `f`. Lines are decoded lossily so a
/// stray byte only spoils its own row.
fn for_each_row<R, F>(mut reader: R, mut f: F) -> std::io::Result<()>
where
    R: BufRead,
    F: FnMut(&[&str]),
{
    let mut buf = Vec::new();
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            return Ok(());
        }
        let line = String::from_utf8_lossy(&buf);
        let line = line.trim();
        if line.is_empty() || line.starts_with(COMMENT_MARKER) {
            continue;
        }
        let fields: Vec<&str> = line.split_whitespace().collect();
        f(&fields);
    }
}

fn first_real(fields: &[&str]) -> Option<f64> {
    fields.first().and_then(|s| parse_real(s))
}

fn last_real(fields: &[&str]) -> Option<f64> {
    fields.last().and_then(|s| parse_real(s))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SURFACE_FIELD_VALUE: &str = "\
# Region type : patch outlet
# Faces       : 120
# Area        : 2.5e-03
# Time        \tareaAverage(T)
1\t300.5
2\t301.25
3\t302
";

    #[test]
    fn parses_rows_after_header() {
        let series = parse_series(SURFACE_FIELD_VALUE.as_bytes()).unwrap();
        assert_eq!(series.times(), &[1.0, 2.0, 3.0]);
        assert_eq!(series.values(), &[300.5, 301.25, 302.0]);
    }

    #[test]
    fn last_value_ignores_trailing_blank_lines() {
        let text = format!("{SURFACE_FIELD_VALUE}\n   \n");
        assert_eq!(parse_last_value(text.as_bytes()).unwrap(), Some(302.0));
    }

    #[test]
    fn malformed_rows_are_skipped() {
        let text = "\
1 10
2 N/A
oops 12
4 1 2 (3
5 0.5 15
";
        let series = parse_series(text.as_bytes()).unwrap();
        assert_eq!(series.times(), &[1.0, 5.0]);
        assert_eq!(series.values(), &[10.0, 15.0]);
    }

    #[test]
    fn last_value_only_needs_the_last_field() {
        // The first field is never looked at in final-value mode.
        let text = "1 10\noops 12\n3 N/A\n";
        assert_eq!(parse_last_value(text.as_bytes()).unwrap(), Some(12.0));
    }

    #[test]
    fn comment_only_file_is_empty_not_an_error() {
        let text = "# Time value\n#\n";
        assert!(parse_series(text.as_bytes()).unwrap().is_empty());
        assert_eq!(parse_last_value(text.as_bytes()).unwrap(), None);
    }

    #[test]
    fn indented_comments_and_crlf_are_handled() {
        let text = "   # header\r\n1 2\r\n\r\n2 3\r\n";
        let series = parse_series(text.as_bytes()).unwrap();
        assert_eq!(series.values(), &[2.0, 3.0]);
    }

    #[test]
    fn invalid_utf8_spoils_only_its_row() {
        let mut bytes = b"1 10\n".to_vec();
        bytes.extend_from_slice(&[0xff, 0xfe, b' ', b'9', b'\n']);
        bytes.extend_from_slice(b"3 30\n");
        let series = parse_series(bytes.as_slice()).unwrap();
        assert_eq!(series.times(), &[1.0, 3.0]);
        assert_eq!(parse_last_value(bytes.as_slice()).unwrap(), Some(30.0));
    }

    #[test]
    fn duplicate_and_backward_times_are_preserved() {
        let text = "2 1\n1 2\n1 3\n";
        let series = parse_series(text.as_bytes()).unwrap();
        assert_eq!(series.times(), &[2.0, 1.0, 1.0]);
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let err = read_series(Path::new("/definitely/not/here.dat")).unwrap_err();
        assert!(matches!(err, SeriesError::Read { .. }));
    }
}
