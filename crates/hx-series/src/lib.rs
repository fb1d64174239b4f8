//! hx-series: monitor file discovery, parsing and derived series.

pub mod derived;
pub mod locator;
pub mod reader;
pub mod series;

pub use derived::{MIN_SERIES_POINTS, diff_final, diff_series, interp};
pub use locator::{FileOrdering, LexicalOrder, NumericTimestepOrder, SeriesLocator};
pub use reader::{parse_last_value, parse_series, read_last_value, read_series};
pub use series::TimeSeries;

use std::path::PathBuf;

pub type SeriesResult<T> = Result<T, SeriesError>;

#[derive(thiserror::Error, Debug)]
pub enum SeriesError {
    #[error("Failed to read series file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to walk directory {path}: {source}")]
    Walk {
        path: PathBuf,
        source: walkdir::Error,
    },
}
