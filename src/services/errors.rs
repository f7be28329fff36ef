use thiserror::Error;

/// Generic error type used by service layer functions.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ServiceError {
    /// Requested resource was not found.
    #[error("not found")]
    NotFound,
    /// Submitted form failed validation.
    #[error("{0}")]
    Form(String),
    /// A value did not satisfy a domain type constraint.
    #[error("{0}")]
    TypeConstraint(String),
    /// A scheduling rule rejected the operation.
    #[error("{0}")]
    Validation(String),
    /// The operation conflicts with existing records.
    #[error("{0}")]
    Conflict(String),
    /// An unexpected internal error occurred.
    #[error("internal error")]
    Internal,
}

/// Convenient alias for results returned from service functions.
pub type ServiceResult<T> = Result<T, ServiceError>;
