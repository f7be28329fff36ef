use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::stylist::NewStylist;
use crate::domain::types::{
    StylistEmail, StylistName, StylistNotes, StylistPhone, TypeConstraintError,
};
use crate::forms::blank_to_none;

fn default_active() -> bool {
    true
}

/// Stylist as submitted for creation or update.
#[derive(Deserialize, Validate)]
pub struct StylistForm {
    #[validate(length(min = 1))]
    pub name: String,
    #[serde(default = "default_active")]
    pub active: bool,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StylistFormPayload {
    pub name: StylistName,
    pub active: bool,
    pub phone: Option<StylistPhone>,
    pub email: Option<StylistEmail>,
    pub notes: Option<StylistNotes>,
}

impl StylistFormPayload {
    pub fn into_new_stylist(self) -> NewStylist {
        NewStylist {
            name: self.name,
            active: self.active,
            phone: self.phone,
            email: self.email,
            notes: self.notes,
        }
    }
}

#[derive(Debug, Error)]
pub enum StylistFormError {
    #[error("Stylist form validation failed: {0}")]
    Validation(String),
    #[error("Stylist form contains invalid data: {0}")]
    TypeConstraint(String),
}

impl From<ValidationErrors> for StylistFormError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value.to_string())
    }
}

impl From<TypeConstraintError> for StylistFormError {
    fn from(value: TypeConstraintError) -> Self {
        Self::TypeConstraint(value.to_string())
    }
}

impl TryFrom<StylistForm> for StylistFormPayload {
    type Error = StylistFormError;

    fn try_from(value: StylistForm) -> Result<Self, Self::Error> {
        value.validate()?;
        Ok(Self {
            name: StylistName::new(value.name)?,
            active: value.active,
            phone: blank_to_none(value.phone)
                .map(StylistPhone::new)
                .transpose()?,
            email: blank_to_none(value.email)
                .map(StylistEmail::new)
                .transpose()?,
            notes: blank_to_none(value.notes)
                .map(StylistNotes::new)
                .transpose()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn active_defaults_to_true() {
        let form: StylistForm = serde_json::from_str(r#"{"name": "Lucía"}"#).unwrap();
        let payload: StylistFormPayload = form.try_into().unwrap();
        assert!(payload.active);
        assert_eq!(payload.email, None);
    }

    #[test]
    fn rejects_malformed_email() {
        let form = StylistForm {
            name: "Lucía".to_string(),
            active: true,
            phone: None,
            email: Some("lucia-at-salon".to_string()),
            notes: None,
        };
        let payload: Result<StylistFormPayload, _> = form.try_into();
        assert!(matches!(payload, Err(StylistFormError::TypeConstraint(_))));
    }
}
