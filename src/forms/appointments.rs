use chrono::NaiveDateTime;
use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::appointment::{
    AppointmentLineUpdate, AppointmentUpdate, NewAppointment, SchedulingError,
};
use crate::domain::types::{
    ClientId, DurationHours, Price, ServiceId, StylistId, TypeConstraintError,
};

#[derive(Deserialize, Validate)]
pub struct BookAppointmentForm {
    #[validate(range(min = 1))]
    pub client_id: i32,
    #[validate(range(min = 1))]
    pub stylist_id: i32,
    pub start_at: NaiveDateTime,
    /// At least one service has to be requested.
    #[validate(length(min = 1))]
    pub service_ids: Vec<i32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BookAppointmentFormPayload {
    pub client_id: ClientId,
    pub stylist_id: StylistId,
    pub start_at: NaiveDateTime,
    pub service_ids: Vec<ServiceId>,
}

impl BookAppointmentFormPayload {
    /// Validate the booking against the wall-clock `now`.
    pub fn into_new_appointment(
        self,
        now: NaiveDateTime,
    ) -> Result<NewAppointment, SchedulingError> {
        NewAppointment::new(
            self.client_id,
            self.stylist_id,
            self.start_at,
            self.service_ids,
            now,
        )
    }
}

#[derive(Debug, Error)]
pub enum BookAppointmentFormError {
    #[error("Booking form validation failed: {0}")]
    Validation(String),
    #[error("Booking form contains invalid data: {0}")]
    TypeConstraint(String),
}

impl From<ValidationErrors> for BookAppointmentFormError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value.to_string())
    }
}

impl From<TypeConstraintError> for BookAppointmentFormError {
    fn from(value: TypeConstraintError) -> Self {
        Self::TypeConstraint(value.to_string())
    }
}

impl TryFrom<BookAppointmentForm> for BookAppointmentFormPayload {
    type Error = BookAppointmentFormError;

    fn try_from(value: BookAppointmentForm) -> Result<Self, Self::Error> {
        value.validate()?;
        Ok(Self {
            client_id: ClientId::new(value.client_id)?,
            stylist_id: StylistId::new(value.stylist_id)?,
            start_at: value.start_at,
            service_ids: value
                .service_ids
                .into_iter()
                .map(ServiceId::new)
                .collect::<Result<Vec<_>, _>>()?,
        })
    }
}

/// Partial update of an appointment; omitted fields are left untouched.
#[derive(Deserialize, Validate)]
pub struct UpdateAppointmentForm {
    #[validate(range(min = 1))]
    pub client_id: Option<i32>,
    #[validate(range(min = 1))]
    pub stylist_id: Option<i32>,
    pub start_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UpdateAppointmentFormPayload {
    pub client_id: Option<ClientId>,
    pub stylist_id: Option<StylistId>,
    pub start_at: Option<NaiveDateTime>,
}

impl UpdateAppointmentFormPayload {
    pub fn into_update(self, now: NaiveDateTime) -> Result<AppointmentUpdate, SchedulingError> {
        AppointmentUpdate::new(self.client_id, self.stylist_id, self.start_at, now)
    }
}

#[derive(Debug, Error)]
pub enum UpdateAppointmentFormError {
    #[error("Update appointment form validation failed: {0}")]
    Validation(String),
    #[error("Update appointment form contains invalid data: {0}")]
    TypeConstraint(String),
}

impl From<ValidationErrors> for UpdateAppointmentFormError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value.to_string())
    }
}

impl From<TypeConstraintError> for UpdateAppointmentFormError {
    fn from(value: TypeConstraintError) -> Self {
        Self::TypeConstraint(value.to_string())
    }
}

impl TryFrom<UpdateAppointmentForm> for UpdateAppointmentFormPayload {
    type Error = UpdateAppointmentFormError;

    fn try_from(value: UpdateAppointmentForm) -> Result<Self, Self::Error> {
        value.validate()?;
        Ok(Self {
            client_id: value.client_id.map(ClientId::new).transpose()?,
            stylist_id: value.stylist_id.map(StylistId::new).transpose()?,
            start_at: value.start_at,
        })
    }
}

#[derive(Deserialize, Validate)]
pub struct AddLineForm {
    #[validate(range(min = 1))]
    pub service_id: i32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AddLineFormPayload {
    pub service_id: ServiceId,
}

#[derive(Debug, Error)]
pub enum AddLineFormError {
    #[error("Add line form validation failed: {0}")]
    Validation(String),
    #[error("Add line form contains invalid data: {0}")]
    TypeConstraint(String),
}

impl From<ValidationErrors> for AddLineFormError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value.to_string())
    }
}

impl From<TypeConstraintError> for AddLineFormError {
    fn from(value: TypeConstraintError) -> Self {
        Self::TypeConstraint(value.to_string())
    }
}

impl TryFrom<AddLineForm> for AddLineFormPayload {
    type Error = AddLineFormError;

    fn try_from(value: AddLineForm) -> Result<Self, Self::Error> {
        value.validate()?;
        Ok(Self {
            service_id: ServiceId::new(value.service_id)?,
        })
    }
}

/// Line edits: reselect the service and/or override the snapshotted values.
#[derive(Deserialize, Validate)]
pub struct UpdateLineForm {
    #[validate(range(min = 1))]
    pub service_id: Option<i32>,
    pub price: Option<f64>,
    pub duration_hours: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UpdateLineFormPayload {
    pub update: AppointmentLineUpdate,
}

#[derive(Debug, Error)]
pub enum UpdateLineFormError {
    #[error("Update line form validation failed: {0}")]
    Validation(String),
    #[error("Update line form contains invalid data: {0}")]
    TypeConstraint(String),
}

impl From<ValidationErrors> for UpdateLineFormError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value.to_string())
    }
}

impl From<TypeConstraintError> for UpdateLineFormError {
    fn from(value: TypeConstraintError) -> Self {
        Self::TypeConstraint(value.to_string())
    }
}

impl TryFrom<UpdateLineForm> for UpdateLineFormPayload {
    type Error = UpdateLineFormError;

    fn try_from(value: UpdateLineForm) -> Result<Self, Self::Error> {
        value.validate()?;
        Ok(Self {
            update: AppointmentLineUpdate {
                service_id: value.service_id.map(ServiceId::new).transpose()?,
                price: value.price.map(Price::new).transpose()?,
                duration_hours: value.duration_hours.map(DurationHours::new).transpose()?,
            },
        })
    }
}
