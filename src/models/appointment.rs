use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::appointment::{
    AppointmentHeader, AppointmentLine as DomainAppointmentLine, ServiceSnapshot,
};
use crate::domain::types::{AppointmentState, ServiceName, TypeConstraintError};

/// Diesel model representing the `appointments` table.
#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::appointments)]
pub struct Appointment {
    pub id: i32,
    pub client_id: i32,
    pub stylist_id: i32,
    pub start_at: NaiveDateTime,
    pub end_at: NaiveDateTime,
    pub state: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::appointments)]
pub struct NewAppointment {
    pub client_id: i32,
    pub stylist_id: i32,
    pub start_at: NaiveDateTime,
    pub end_at: NaiveDateTime,
    pub state: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Diesel model representing the `appointment_lines` table.
#[derive(Debug, Clone, Identifiable, Queryable, Selectable, Associations)]
#[diesel(belongs_to(Appointment))]
#[diesel(table_name = crate::schema::appointment_lines)]
pub struct AppointmentLine {
    pub id: i32,
    pub appointment_id: i32,
    pub service_id: i32,
    pub price: f64,
    pub duration_hours: f64,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::appointment_lines)]
pub struct NewAppointmentLine {
    pub appointment_id: i32,
    pub service_id: i32,
    pub price: f64,
    pub duration_hours: f64,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl TryFrom<Appointment> for AppointmentHeader {
    type Error = TypeConstraintError;

    fn try_from(appointment: Appointment) -> Result<Self, Self::Error> {
        Ok(Self {
            id: appointment.id.try_into()?,
            client_id: appointment.client_id.try_into()?,
            stylist_id: appointment.stylist_id.try_into()?,
            start_at: appointment.start_at,
            end_at: appointment.end_at,
            state: AppointmentState::try_from(appointment.state)?,
            created_at: appointment.created_at,
            updated_at: appointment.updated_at,
        })
    }
}

impl AppointmentLine {
    pub fn snapshot(&self) -> Result<ServiceSnapshot, TypeConstraintError> {
        Ok(ServiceSnapshot {
            price: self.price.try_into()?,
            duration_hours: self.duration_hours.try_into()?,
        })
    }

    /// Convert into the domain line labelled with its service name.
    pub fn into_domain(
        self,
        service_name: String,
    ) -> Result<DomainAppointmentLine, TypeConstraintError> {
        Ok(DomainAppointmentLine {
            id: self.id.try_into()?,
            appointment_id: self.appointment_id.try_into()?,
            service_id: self.service_id.try_into()?,
            service_name: ServiceName::new(service_name)?,
            price: self.price.try_into()?,
            duration_hours: self.duration_hours.try_into()?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl NewAppointmentLine {
    pub fn new(
        appointment_id: i32,
        service_id: i32,
        snapshot: ServiceSnapshot,
        now: NaiveDateTime,
    ) -> Self {
        Self {
            appointment_id,
            service_id,
            price: snapshot.price.get(),
            duration_hours: snapshot.duration_hours.get(),
            created_at: now,
            updated_at: now,
        }
    }
}
