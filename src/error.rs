use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DateFormatError {
    #[error("unrecognized date token {token:?} (expected YYYY-MM-DD or MM-DD)")]
    UnrecognizedShape { token: String },

    #[error("date token {token:?} is not a valid calendar date")]
    InvalidCalendarDate { token: String },
}

impl DateFormatError {
    pub fn token(&self) -> &str {
        match self {
            DateFormatError::UnrecognizedShape { token }
            | DateFormatError::InvalidCalendarDate { token } => token,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown assignment type {token:?} (expected homework, exam, project, quiz or other)")]
pub struct InvalidTypeError {
    pub token: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error("missing field `{0}`")]
    MissingField(&'static str),

    #[error("assignment name is empty")]
    EmptyName,

    #[error("malformed record: {0}")]
    Malformed(String),

    #[error("due date {0} is outside years 1 through 9999")]
    DueDateOutOfRange(NaiveDate),

    #[error(transparent)]
    Date(#[from] DateFormatError),

    #[error(transparent)]
    Type(#[from] InvalidTypeError),
}

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("extraction response is not a JSON array of assignments: {0}")]
    MalformedResponse(#[from] serde_json::Error),

    #[error("invalid CSV input: {0}")]
    Csv(#[from] csv::Error),
}
