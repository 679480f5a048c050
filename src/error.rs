use thiserror::Error;

use crate::utils::http::FetchError;

/// Failures of the extraction pipeline.
///
/// The first four variants describe caller input that can be corrected and
/// retried; everything else means the fetched page did not have the shape the
/// extractors rely on.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("updating {0} is not possible: no listing page is configured for it")]
    UnsupportedComponent(String),

    #[error("you can't sort by {0}")]
    InvalidSortKey(String),

    #[error("there is no such filter as {0}")]
    UnknownFilter(String),

    #[error("there is no such option as {value} in filter {field}")]
    InvalidFilterValue { field: String, value: String },

    #[error("page is missing expected markup: {0}")]
    MissingMarkup(&'static str),

    #[error("label {0:?} not found on detail page")]
    MissingLabel(String),

    #[error("could not parse {field} from {value:?}")]
    DetailParse { field: &'static str, value: String },

    #[error("listing row {row} has {found} cells but the header has {expected}")]
    RowShape {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("listing row {row} has no detail link")]
    MissingLink { row: usize },

    #[error("listing table has {found} rows, expected at least {expected} non-data rows")]
    RowLayout { expected: usize, found: usize },

    #[error("listing header {0:?} appears more than once")]
    DuplicateHeader(String),

    #[error(transparent)]
    Fetch(#[from] FetchError),
}

impl ExtractError {
    /// True for failures caused by the request itself rather than the page.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            ExtractError::UnsupportedComponent(_)
                | ExtractError::InvalidSortKey(_)
                | ExtractError::UnknownFilter(_)
                | ExtractError::InvalidFilterValue { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, ExtractError>;
