use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::service::NewService;
use crate::domain::types::{
    DurationHours, Price, ServiceDescription, ServiceName, TypeConstraintError,
};
use crate::forms::blank_to_none;

/// Catalog service as submitted for creation or update.
#[derive(Deserialize, Validate)]
pub struct ServiceForm {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(range(min = 0.0))]
    pub price: f64,
    #[validate(range(min = 0.0))]
    pub duration_hours: f64,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ServiceFormPayload {
    pub name: ServiceName,
    pub price: Price,
    pub duration_hours: DurationHours,
    pub description: Option<ServiceDescription>,
}

impl ServiceFormPayload {
    pub fn into_new_service(self) -> NewService {
        NewService {
            name: self.name,
            price: self.price,
            duration_hours: self.duration_hours,
            description: self.description,
        }
    }
}

#[derive(Debug, Error)]
pub enum ServiceFormError {
    #[error("Service form validation failed: {0}")]
    Validation(String),
    #[error("Service form contains invalid data: {0}")]
    TypeConstraint(String),
}

impl From<ValidationErrors> for ServiceFormError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value.to_string())
    }
}

impl From<TypeConstraintError> for ServiceFormError {
    fn from(value: TypeConstraintError) -> Self {
        Self::TypeConstraint(value.to_string())
    }
}

impl TryFrom<ServiceForm> for ServiceFormPayload {
    type Error = ServiceFormError;

    fn try_from(value: ServiceForm) -> Result<Self, Self::Error> {
        value.validate()?;
        Ok(Self {
            name: ServiceName::new(value.name)?,
            price: Price::new(value.price)?,
            duration_hours: DurationHours::new(value.duration_hours)?,
            description: blank_to_none(value.description)
                .map(ServiceDescription::new)
                .transpose()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(price: f64, duration_hours: f64) -> ServiceForm {
        ServiceForm {
            name: " Colour ".to_string(),
            price,
            duration_hours,
            description: Some("   ".to_string()),
        }
    }

    #[test]
    fn accepts_zero_priced_services() {
        let payload: ServiceFormPayload = form(0.0, 1.5).try_into().unwrap();
        assert_eq!(payload.name.as_str(), "Colour");
        assert_eq!(payload.price, 0.0);
        assert_eq!(payload.description, None);
    }

    #[test]
    fn rejects_negative_price() {
        let payload: Result<ServiceFormPayload, _> = form(-5.0, 1.0).try_into();
        assert!(matches!(payload, Err(ServiceFormError::Validation(_))));
    }

    #[test]
    fn rejects_negative_duration() {
        let payload: Result<ServiceFormPayload, _> = form(10.0, -0.5).try_into();
        assert!(payload.is_err());
    }
}
