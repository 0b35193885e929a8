use thiserror::Error;

#[derive(Error, Debug)]
pub enum SchumerError {
    #[error("section divider not found: {0}")]
    DividerNotFound(String),

    #[error("review page marker not found: {0}")]
    MarkerNotFound(String),

    #[error("value extraction failed for {attribute}: {reason}")]
    Normalization { attribute: String, reason: String },
}

impl SchumerError {
    /// Get an actionable hint for how to resolve this error
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            SchumerError::DividerNotFound(_) => Some(
                "The page text does not look like a disclosure table. Check that the fetch \
                 layer returned the terms-and-conditions region, or extend the divider set.",
            ),
            SchumerError::MarkerNotFound(_) => Some(
                "The review page does not match either known layout. Check the aggregator \
                 URL, or adjust the layout markers.",
            ),
            SchumerError::Normalization { .. } => Some(
                "The raw term did not match any known phrasing. Fill the value in manually \
                 or add an extraction rule for this wording.",
            ),
        }
    }
}

pub type Result<T> = std::result::Result<T, SchumerError>;
