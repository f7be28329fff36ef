use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{DurationHours, Price, ServiceDescription, ServiceId, ServiceName};

/// A bookable salon service from the catalog.
///
/// Appointment lines copy `price` and `duration_hours` when the service is
/// selected, so editing a service never rewrites historical lines.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Service {
    pub id: ServiceId,
    pub name: ServiceName,
    pub price: Price,
    pub duration_hours: DurationHours,
    pub description: Option<ServiceDescription>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Data required to insert or overwrite a [`Service`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewService {
    pub name: ServiceName,
    pub price: Price,
    pub duration_hours: DurationHours,
    pub description: Option<ServiceDescription>,
}
