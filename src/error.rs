//! Batch-runner error types.
//!
//! Nothing here is recovered locally: any of these aborts the whole batch at
//! the top level. The only soft condition in the system (an unrecognized
//! target type) is a log line, not an error.

use std::path::PathBuf;

use thiserror::Error;

use crate::planner::PlannerError;

#[derive(Error, Debug)]
pub enum BatchError {
    #[error("could not read input file {path:?}: {source}")]
    InputUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed JSON in {path:?}: {source}")]
    MalformedInput {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("unexpected top-level shape in {path:?}: expected a JSON object keyed by order id")]
    UnexpectedShape { path: PathBuf },

    #[error("order '{order}': missing or invalid field '{field}': {detail}")]
    Field {
        order: String,
        field: String,
        detail: String,
    },

    #[error("load planning failed: {0}")]
    Planner(#[from] PlannerError),

    #[error("could not serialize the packing-plan document: {0}")]
    PlanDocument(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl BatchError {
    /// Convenience constructor for field-level failures.
    pub fn field(
        order: impl Into<String>,
        field: impl Into<String>,
        detail: impl Into<String>,
    ) -> Self {
        BatchError::Field {
            order: order.into(),
            field: field.into(),
            detail: detail.into(),
        }
    }
}

pub type BatchResult<T> = Result<T, BatchError>;
