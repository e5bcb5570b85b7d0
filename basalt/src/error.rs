use thiserror::Error;

pub type BasaltResult<T> = anyhow::Result<T>;
pub type DFResult<T> = datafusion_common::Result<T>;

/// Contract violations detected while building or rewriting plans.
///
/// A pattern failing to match is not an error, see [`crate::heuristic::Binding`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BasaltError {
    #[error("Capture {0:?} is not bound by rule pattern")]
    CaptureNotBound(&'static str),
    #[error("Capture {name:?} holds {actual}, but {expected} is expected")]
    CaptureTypeMismatch {
        name: &'static str,
        expected: &'static str,
        actual: String,
    },
    #[error("Table scan on {0:?} already has a project list")]
    ScanAlreadyProjected(String),
    #[error("Can't push an empty project list into table scan on {0:?}")]
    EmptyProjectList(String),
    #[error("{operator} expects {expected} inputs, but got {actual}")]
    InvalidInputs {
        operator: String,
        expected: usize,
        actual: usize,
    },
}
