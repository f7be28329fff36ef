//! Error conversion glue between layers.
//!
//! The domain layer must not depend on repository or service error types, so
//! the conversions live here instead of next to the error definitions.

use crate::domain::appointment::SchedulingError;
use crate::domain::types::TypeConstraintError;
use crate::repository::RepositoryError;

impl From<TypeConstraintError> for RepositoryError {
    fn from(val: TypeConstraintError) -> Self {
        RepositoryError::ValidationError(val.to_string())
    }
}

impl From<SchedulingError> for RepositoryError {
    fn from(val: SchedulingError) -> Self {
        match val {
            SchedulingError::DuplicateService => {
                RepositoryError::ConstraintViolation(val.to_string())
            }
            other => RepositoryError::ValidationError(other.to_string()),
        }
    }
}

#[cfg(feature = "server")]
mod service {
    use crate::domain::appointment::SchedulingError;
    use crate::domain::types::TypeConstraintError;
    use crate::forms::appointments::{
        AddLineFormError, BookAppointmentFormError, UpdateAppointmentFormError,
        UpdateLineFormError,
    };
    use crate::forms::clients::{AddClientFormError, ClientTagFormError};
    use crate::forms::services::ServiceFormError;
    use crate::forms::stylists::StylistFormError;
    use crate::repository::RepositoryError;
    use crate::services::errors::ServiceError;

    impl From<TypeConstraintError> for ServiceError {
        fn from(val: TypeConstraintError) -> Self {
            ServiceError::TypeConstraint(val.to_string())
        }
    }

    impl From<SchedulingError> for ServiceError {
        fn from(val: SchedulingError) -> Self {
            match val {
                SchedulingError::DuplicateService => ServiceError::Conflict(val.to_string()),
                other => ServiceError::Validation(other.to_string()),
            }
        }
    }

    impl From<RepositoryError> for ServiceError {
        fn from(val: RepositoryError) -> Self {
            match val {
                RepositoryError::NotFound => ServiceError::NotFound,
                RepositoryError::ValidationError(message) => ServiceError::Validation(message),
                RepositoryError::ConstraintViolation(message) => ServiceError::Conflict(message),
                _ => ServiceError::Internal,
            }
        }
    }

    macro_rules! form_error_into_service_error {
        ($($error:ty),+ $(,)?) => {
            $(
                impl From<$error> for ServiceError {
                    fn from(val: $error) -> Self {
                        ServiceError::Form(val.to_string())
                    }
                }
            )+
        };
    }

    form_error_into_service_error!(
        AddClientFormError,
        AddLineFormError,
        BookAppointmentFormError,
        ClientTagFormError,
        ServiceFormError,
        StylistFormError,
        UpdateAppointmentFormError,
        UpdateLineFormError,
    );
}
