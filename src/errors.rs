use axum::http::StatusCode;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LedgerError {
    #[error("week index {index} is out of range for a ledger of {len} weeks")]
    WeekOutOfRange { index: usize, len: usize },
    #[error("entry {0} not found")]
    EntryNotFound(String),
    #[error("date {0} falls outside the ledger")]
    DateOutOfRange(chrono::NaiveDate),
    #[error("amount is too large for the running total")]
    Overflow,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GoalError {
    #[error("goal name must not be empty")]
    EmptyName,
    #[error("goal name must be at most {max} characters")]
    NameTooLong { max: usize },
    #[error("target must be greater than zero")]
    NonPositiveTarget,
    #[error("total weeks must be between 1 and {max}")]
    TotalWeeksOutOfRange { max: u32 },
    #[error("visible weeks must be between 1 and the total number of weeks")]
    VisibleWeeksOutOfRange,
    #[error("start date must fall between years {min} and {max}")]
    StartDateOutOfRange { min: i32, max: i32 },
    #[error("reminder time {hour:02}:{minute:02} is not a valid time of day")]
    InvalidReminderTime { hour: u32, minute: u32 },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ImportError {
    #[error("import file is not a valid JSON object: {0}")]
    Malformed(String),
    #[error("import file has no weeks list")]
    MissingWeeks,
    #[error("import file amounts are too large")]
    Overflow,
}

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
        }
    }

    pub fn internal(err: impl std::error::Error) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: err.to_string(),
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::internal(err)
    }
}

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::DateOutOfRange(_) | LedgerError::Overflow => {
                Self::bad_request(err.to_string())
            }
            LedgerError::WeekOutOfRange { .. } | LedgerError::EntryNotFound(_) => {
                Self::not_found(err.to_string())
            }
        }
    }
}

impl From<GoalError> for AppError {
    fn from(err: GoalError) -> Self {
        Self::bad_request(err.to_string())
    }
}

impl From<ImportError> for AppError {
    fn from(err: ImportError) -> Self {
        Self::bad_request(err.to_string())
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        (self.status, self.message).into_response()
    }
}
