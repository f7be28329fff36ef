use crate::repository::RepositoryError;

pub mod appointments;
pub mod catalog;
pub mod clients;
pub mod errors;
pub mod stylists;

pub use errors::{ServiceError, ServiceResult};

/// Convert a repository failure, logging rule rejections as warnings and
/// anything unexpected as errors.
fn repository_failure(action: &str, err: RepositoryError) -> ServiceError {
    match &err {
        RepositoryError::NotFound => {}
        RepositoryError::ValidationError(_) | RepositoryError::ConstraintViolation(_) => {
            log::warn!("Cannot {action}: {err}");
        }
        _ => log::error!("Failed to {action}: {err}"),
    }
    err.into()
}

fn page_count(total: usize, per_page: usize) -> usize {
    total.div_ceil(per_page.max(1))
}
