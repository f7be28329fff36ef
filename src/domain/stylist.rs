use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{
    AppointmentCount, StylistEmail, StylistId, StylistName, StylistNotes, StylistPhone,
};

/// A stylist on the salon staff.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stylist {
    pub id: StylistId,
    pub name: StylistName,
    /// Whether the stylist is currently on staff.
    pub active: bool,
    pub phone: Option<StylistPhone>,
    pub email: Option<StylistEmail>,
    pub notes: Option<StylistNotes>,
    /// Number of appointments referencing this stylist, in any state.
    pub total_appointments: AppointmentCount,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Data required to insert or overwrite a [`Stylist`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewStylist {
    pub name: StylistName,
    pub active: bool,
    pub phone: Option<StylistPhone>,
    pub email: Option<StylistEmail>,
    pub notes: Option<StylistNotes>,
}
