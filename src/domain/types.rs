//! Strongly-typed value objects used by domain entities.
//!
//! Domain structs should carry these wrappers instead of raw primitives so that
//! identifiers, text values and numeric constraints are enforced at the
//! boundary.

use chrono::TimeDelta;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::iter::Sum;
use thiserror::Error;
use validator::ValidateEmail;

/// Errors produced when attempting to construct constrained domain types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TypeConstraintError {
    /// An identifier was zero or negative.
    #[error("{0} must be greater than zero")]
    NonPositiveId(&'static str),
    /// A numeric value required to be non-negative was negative.
    #[error("{0} must be zero or greater")]
    NegativeNumber(&'static str),
    /// A string was empty or whitespace-only after trimming.
    #[error("{0} cannot be empty")]
    EmptyString(&'static str),
    /// E-mail validation failed.
    #[error("{0} must be a valid e-mail address")]
    InvalidEmail(&'static str),
    /// Catch-all for custom validation failures.
    #[error("invalid value: {0}")]
    InvalidValue(String),
}

fn trim_and_require_non_empty<S: Into<String>>(
    value: S,
    field: &'static str,
) -> Result<String, TypeConstraintError> {
    let trimmed = value.into().trim().to_string();
    if trimmed.is_empty() {
        Err(TypeConstraintError::EmptyString(field))
    } else {
        Ok(trimmed)
    }
}

/// Macro to generate lightweight newtypes for positive identifiers.
macro_rules! id_newtype {
    ($name:ident, $doc:expr, $field:expr) => {
        #[doc = $doc]
        #[derive(
            Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord,
        )]
        #[serde(transparent)]
        pub struct $name(i32);

        impl $name {
            /// Creates a new identifier ensuring it is greater than zero.
            pub fn new(value: i32) -> Result<Self, TypeConstraintError> {
                if value > 0 {
                    Ok(Self(value))
                } else {
                    Err(TypeConstraintError::NonPositiveId($field))
                }
            }

            /// Returns the raw `i32` backing this identifier.
            pub const fn get(self) -> i32 {
                self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl TryFrom<i32> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: i32) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for i32 {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl PartialEq<i32> for $name {
            fn eq(&self, other: &i32) -> bool {
                self.0 == *other
            }
        }

        impl PartialEq<$name> for i32 {
            fn eq(&self, other: &$name) -> bool {
                *self == other.0
            }
        }
    };
}

macro_rules! non_empty_string_newtype {
    ($name:ident, $doc:expr, $field:expr) => {
        #[doc = $doc]
        #[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Constructs a trimmed, non-empty value.
            pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
                trim_and_require_non_empty(value, $field).map(Self)
            }

            /// Borrow the value as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the wrapper and return the owned string.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::ops::Deref for $name {
            type Target = str;

            fn deref(&self) -> &Self::Target {
                self.as_str()
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                self.as_str()
            }
        }

        impl TryFrom<String> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl TryFrom<&str> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: &str) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl PartialEq<&str> for $name {
            fn eq(&self, other: &&str) -> bool {
                self.as_str() == *other
            }
        }

        impl PartialEq<$name> for &str {
            fn eq(&self, other: &$name) -> bool {
                *self == other.as_str()
            }
        }
    };
}

macro_rules! email_string_newtype {
    ($name:ident, $doc:expr, $field:expr) => {
        #[doc = $doc]
        #[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Constructs a trimmed e-mail address and validates its format.
            pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
                let trimmed = trim_and_require_non_empty(value, $field)?;
                if !trimmed.as_str().validate_email() {
                    return Err(TypeConstraintError::InvalidEmail($field));
                }
                Ok(Self(trimmed))
            }

            /// Borrow the address as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the wrapper and return the owned address.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::ops::Deref for $name {
            type Target = str;

            fn deref(&self) -> &Self::Target {
                self.as_str()
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                self.as_str()
            }
        }

        impl TryFrom<String> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl TryFrom<&str> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: &str) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl PartialEq<&str> for $name {
            fn eq(&self, other: &&str) -> bool {
                self.as_str() == *other
            }
        }

        impl PartialEq<$name> for &str {
            fn eq(&self, other: &$name) -> bool {
                *self == other.as_str()
            }
        }
    };
}

macro_rules! non_negative_f64_newtype {
    ($name:ident, $doc:expr, $field:expr) => {
        #[doc = $doc]
        #[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, PartialOrd)]
        #[serde(transparent)]
        pub struct $name(f64);

        impl $name {
            /// Constructs a finite numeric value that is zero or greater.
            pub fn new(value: f64) -> Result<Self, TypeConstraintError> {
                if value.is_finite() && value >= 0.0 {
                    Ok(Self(value))
                } else {
                    Err(TypeConstraintError::NegativeNumber($field))
                }
            }

            /// The zero value.
            pub const fn zero() -> Self {
                Self(0.0)
            }

            /// Returns the raw `f64` value.
            pub const fn get(self) -> f64 {
                self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl TryFrom<f64> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: f64) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for f64 {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl PartialEq<f64> for $name {
            fn eq(&self, other: &f64) -> bool {
                self.0 == *other
            }
        }

        impl PartialEq<$name> for f64 {
            fn eq(&self, other: &$name) -> bool {
                *self == other.0
            }
        }
    };
}

macro_rules! non_negative_i32_newtype {
    ($name:ident, $doc:expr, $field:expr) => {
        #[doc = $doc]
        #[derive(
            Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord,
        )]
        #[serde(transparent)]
        pub struct $name(i32);

        impl $name {
            /// Constructs a value that must be zero or greater.
            pub fn new(value: i32) -> Result<Self, TypeConstraintError> {
                if value >= 0 {
                    Ok(Self(value))
                } else {
                    Err(TypeConstraintError::NegativeNumber($field))
                }
            }

            /// Returns the raw `i32` value.
            pub const fn get(self) -> i32 {
                self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl TryFrom<i32> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: i32) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for i32 {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl PartialEq<i32> for $name {
            fn eq(&self, other: &i32) -> bool {
                self.0 == *other
            }
        }

        impl PartialEq<$name> for i32 {
            fn eq(&self, other: &$name) -> bool {
                *self == other.0
            }
        }
    };
}

id_newtype!(ServiceId, "Unique identifier for a catalog service.", "service_id");
id_newtype!(StylistId, "Unique identifier for a stylist.", "stylist_id");
id_newtype!(ClientId, "Unique identifier for a client.", "client_id");
id_newtype!(TagId, "Unique identifier for a client tag.", "tag_id");
id_newtype!(
    AppointmentId,
    "Unique identifier for an appointment.",
    "appointment_id"
);
id_newtype!(
    AppointmentLineId,
    "Unique identifier for an appointment line.",
    "appointment_line_id"
);

non_empty_string_newtype!(
    ServiceName,
    "Catalog service name enforcing non-empty values.",
    "service name"
);
non_empty_string_newtype!(
    ServiceDescription,
    "Catalog service description enforcing non-empty values.",
    "description"
);
non_empty_string_newtype!(
    StylistName,
    "Stylist display name enforcing non-empty values.",
    "stylist name"
);
non_empty_string_newtype!(
    StylistPhone,
    "Stylist phone number enforcing non-empty values.",
    "phone"
);
non_empty_string_newtype!(
    StylistNotes,
    "Free-form stylist notes enforcing non-empty values.",
    "notes"
);
non_empty_string_newtype!(
    ClientName,
    "Client display name enforcing non-empty values.",
    "client name"
);
non_empty_string_newtype!(TagName, "Client tag name enforcing non-empty values.", "tag");

email_string_newtype!(StylistEmail, "Stylist contact e-mail.", "email");

non_negative_f64_newtype!(
    Price,
    "Non-negative price value in standard currency units.",
    "price"
);
non_negative_f64_newtype!(
    DurationHours,
    "Non-negative duration expressed in (fractional) hours.",
    "duration"
);

non_negative_i32_newtype!(
    AppointmentCount,
    "Number of appointments referencing an entity.",
    "appointment count"
);

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        Self(iter.map(|price| price.0).sum())
    }
}

impl Sum for DurationHours {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        Self(iter.map(|hours| hours.0).sum())
    }
}

impl DurationHours {
    /// Converts the fractional hours into a time delta rounded to whole seconds.
    ///
    /// Returns `None` when the duration does not fit in a [`TimeDelta`].
    pub fn to_time_delta(self) -> Option<TimeDelta> {
        // The float to int cast saturates, which `try_seconds` then rejects.
        TimeDelta::try_seconds((self.0 * 3600.0).round() as i64)
    }
}

/// Lifecycle state of an appointment.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentState {
    #[default]
    Draft,
    Confirmed,
    Done,
    Cancelled,
}

impl AppointmentState {
    /// String representation used in persistence.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Confirmed => "confirmed",
            Self::Done => "done",
            Self::Cancelled => "cancelled",
        }
    }

    /// Color index used by calendar views.
    pub const fn calendar_color(self) -> i32 {
        match self {
            Self::Draft => 0,
            Self::Confirmed => 4,
            Self::Done => 10,
            Self::Cancelled => 1,
        }
    }
}

impl Display for AppointmentState {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl TryFrom<&str> for AppointmentState {
    type Error = TypeConstraintError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim() {
            "draft" => Ok(Self::Draft),
            "confirmed" => Ok(Self::Confirmed),
            "done" => Ok(Self::Done),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(TypeConstraintError::InvalidValue(format!(
                "appointment state: {other}"
            ))),
        }
    }
}

impl TryFrom<String> for AppointmentState {
    type Error = TypeConstraintError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::try_from(value.as_str())
    }
}

impl From<AppointmentState> for String {
    fn from(value: AppointmentState) -> Self {
        value.as_str().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_non_empty_strings() {
        let value = ServiceName::new("  haircut  ").unwrap();
        assert_eq!(value.as_str(), "haircut");
        let err = TagName::new("   ").unwrap_err();
        assert_eq!(err, TypeConstraintError::EmptyString("tag"));
    }

    #[test]
    fn rejects_non_positive_ids() {
        let err = StylistId::new(0).unwrap_err();
        assert_eq!(err, TypeConstraintError::NonPositiveId("stylist_id"));
    }

    #[test]
    fn validates_emails() {
        assert!(StylistEmail::new(" ana@salon.example ").is_ok());
        let err = StylistEmail::new("not-an-email").unwrap_err();
        assert_eq!(err, TypeConstraintError::InvalidEmail("email"));
    }

    #[test]
    fn price_allows_zero() {
        assert_eq!(Price::new(0.0).unwrap().get(), 0.0);
    }

    #[test]
    fn price_rejects_negative_numbers() {
        assert_eq!(
            Price::new(-0.01).unwrap_err(),
            TypeConstraintError::NegativeNumber("price")
        );
    }

    #[test]
    fn duration_rejects_negative_and_non_finite_numbers() {
        assert_eq!(
            DurationHours::new(-1.0).unwrap_err(),
            TypeConstraintError::NegativeNumber("duration")
        );
        assert!(DurationHours::new(f64::NAN).is_err());
    }

    #[test]
    fn duration_converts_fractional_hours_to_seconds() {
        let half = DurationHours::new(0.5).unwrap();
        assert_eq!(half.to_time_delta(), Some(TimeDelta::minutes(30)));
        let third = DurationHours::new(1.0 / 3.0).unwrap();
        assert_eq!(third.to_time_delta(), Some(TimeDelta::minutes(20)));
    }

    #[test]
    fn durations_beyond_time_delta_range_do_not_convert() {
        assert_eq!(DurationHours::new(1e15).unwrap().to_time_delta(), None);
        assert_eq!(DurationHours::new(1e300).unwrap().to_time_delta(), None);
    }

    #[test]
    fn sums_prices_and_durations() {
        let total: Price = [20.0, 15.0]
            .into_iter()
            .map(|v| Price::new(v).unwrap())
            .sum();
        assert_eq!(total, 35.0);

        let hours: DurationHours = std::iter::empty::<DurationHours>().sum();
        assert_eq!(hours, 0.0);
    }

    #[test]
    fn appointment_state_round_trips_through_persistence_strings() {
        for state in [
            AppointmentState::Draft,
            AppointmentState::Confirmed,
            AppointmentState::Done,
            AppointmentState::Cancelled,
        ] {
            assert_eq!(AppointmentState::try_from(state.as_str()).unwrap(), state);
        }
        assert!(AppointmentState::try_from("archived").is_err());
    }

    #[test]
    fn calendar_colors_follow_state() {
        assert_eq!(AppointmentState::Draft.calendar_color(), 0);
        assert_eq!(AppointmentState::Confirmed.calendar_color(), 4);
        assert_eq!(AppointmentState::Done.calendar_color(), 10);
        assert_eq!(AppointmentState::Cancelled.calendar_color(), 1);
    }
}
