use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::stylist::{NewStylist as DomainNewStylist, Stylist as DomainStylist};
use crate::domain::types::{
    StylistEmail, StylistName, StylistNotes, StylistPhone, TypeConstraintError,
};

/// Diesel model representing the `stylists` table.
#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::stylists)]
pub struct Stylist {
    pub id: i32,
    pub name: String,
    pub active: bool,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub notes: Option<String>,
    pub total_appointments: i32,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Insertable/patchable form of [`Stylist`].
///
/// `total_appointments` is maintained by the appointment repository and is
/// never written from here.
#[derive(Debug, Insertable, AsChangeset)]
#[diesel(table_name = crate::schema::stylists)]
#[diesel(treat_none_as_null = true)]
pub struct NewStylist {
    pub name: String,
    pub active: bool,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub notes: Option<String>,
    pub updated_at: NaiveDateTime,
}

impl TryFrom<Stylist> for DomainStylist {
    type Error = TypeConstraintError;

    fn try_from(stylist: Stylist) -> Result<Self, Self::Error> {
        Ok(Self {
            id: stylist.id.try_into()?,
            name: StylistName::new(stylist.name)?,
            active: stylist.active,
            phone: stylist.phone.map(StylistPhone::new).transpose()?,
            email: stylist.email.map(StylistEmail::new).transpose()?,
            notes: stylist.notes.map(StylistNotes::new).transpose()?,
            total_appointments: stylist.total_appointments.try_into()?,
            created_at: stylist.created_at,
            updated_at: stylist.updated_at,
        })
    }
}

impl NewStylist {
    pub fn from_domain(stylist: &DomainNewStylist, now: NaiveDateTime) -> Self {
        Self {
            name: stylist.name.as_str().to_string(),
            active: stylist.active,
            phone: stylist.phone.as_ref().map(|v| v.as_str().to_string()),
            email: stylist.email.as_ref().map(|v| v.as_str().to_string()),
            notes: stylist.notes.as_ref().map(|v| v.as_str().to_string()),
            updated_at: now,
        }
    }
}
