use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::service::{NewService as DomainNewService, Service as DomainService};
use crate::domain::types::{ServiceDescription, ServiceName, TypeConstraintError};

/// Diesel model representing the `services` table.
#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::services)]
pub struct Service {
    pub id: i32,
    pub name: String,
    pub price: f64,
    pub duration_hours: f64,
    pub description: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Insertable/patchable form of [`Service`].
#[derive(Debug, Insertable, AsChangeset)]
#[diesel(table_name = crate::schema::services)]
#[diesel(treat_none_as_null = true)]
pub struct NewService {
    pub name: String,
    pub price: f64,
    pub duration_hours: f64,
    pub description: Option<String>,
    pub updated_at: NaiveDateTime,
}

impl TryFrom<Service> for DomainService {
    type Error = TypeConstraintError;

    fn try_from(service: Service) -> Result<Self, Self::Error> {
        Ok(Self {
            id: service.id.try_into()?,
            name: ServiceName::new(service.name)?,
            price: service.price.try_into()?,
            duration_hours: service.duration_hours.try_into()?,
            description: service
                .description
                .map(ServiceDescription::new)
                .transpose()?,
            created_at: service.created_at,
            updated_at: service.updated_at,
        })
    }
}

impl NewService {
    pub fn from_domain(service: &DomainNewService, now: NaiveDateTime) -> Self {
        Self {
            name: service.name.as_str().to_string(),
            price: service.price.get(),
            duration_hours: service.duration_hours.get(),
            description: service
                .description
                .as_ref()
                .map(|description| description.as_str().to_string()),
            updated_at: now,
        }
    }
}
