use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::client::{NewClient, NewTag};
use crate::domain::types::{ClientName, TagName, TypeConstraintError};

#[derive(Deserialize, Validate)]
pub struct AddClientForm {
    #[validate(length(min = 1))]
    pub name: String,
    #[serde(default)]
    pub is_company: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AddClientFormPayload {
    pub name: ClientName,
    pub is_company: bool,
}

impl AddClientFormPayload {
    pub fn into_new_client(self) -> NewClient {
        NewClient {
            name: self.name,
            is_company: self.is_company,
        }
    }
}

#[derive(Debug, Error)]
pub enum AddClientFormError {
    #[error("Add client form validation failed: {0}")]
    Validation(String),
    #[error("Add client form contains invalid data: {0}")]
    TypeConstraint(String),
}

impl From<ValidationErrors> for AddClientFormError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value.to_string())
    }
}

impl From<TypeConstraintError> for AddClientFormError {
    fn from(value: TypeConstraintError) -> Self {
        Self::TypeConstraint(value.to_string())
    }
}

impl TryFrom<AddClientForm> for AddClientFormPayload {
    type Error = AddClientFormError;

    fn try_from(value: AddClientForm) -> Result<Self, Self::Error> {
        value.validate()?;
        Ok(Self {
            name: ClientName::new(value.name)?,
            is_company: value.is_company,
        })
    }
}

/// Tag to attach to a client; the color is used if the tag has to be created.
#[derive(Deserialize, Validate)]
pub struct ClientTagForm {
    #[validate(length(min = 1))]
    pub name: String,
    #[serde(default)]
    pub color: i32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClientTagFormPayload {
    pub tag: NewTag,
}

#[derive(Debug, Error)]
pub enum ClientTagFormError {
    #[error("Client tag form validation failed: {0}")]
    Validation(String),
    #[error("Client tag form contains invalid data: {0}")]
    TypeConstraint(String),
}

impl From<ValidationErrors> for ClientTagFormError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value.to_string())
    }
}

impl From<TypeConstraintError> for ClientTagFormError {
    fn from(value: TypeConstraintError) -> Self {
        Self::TypeConstraint(value.to_string())
    }
}

impl TryFrom<ClientTagForm> for ClientTagFormPayload {
    type Error = ClientTagFormError;

    fn try_from(value: ClientTagForm) -> Result<Self, Self::Error> {
        value.validate()?;
        Ok(Self {
            tag: NewTag {
                name: TagName::new(value.name)?,
                color: value.color,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn company_flag_defaults_to_individual() {
        let form: AddClientForm = serde_json::from_str(r#"{"name": " Ana "}"#).unwrap();
        let payload: AddClientFormPayload = form.try_into().unwrap();
        assert_eq!(payload.name.as_str(), "Ana");
        assert!(!payload.is_company);
    }

    #[test]
    fn blank_tag_names_are_rejected() {
        let form = ClientTagForm {
            name: "   ".to_string(),
            color: 0,
        };
        let payload: Result<ClientTagFormPayload, _> = form.try_into();
        assert!(matches!(payload, Err(ClientTagFormError::TypeConstraint(_))));
    }
}
