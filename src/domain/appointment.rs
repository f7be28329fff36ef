//! Appointments, their service lines and the scheduling rules applied to them.
//!
//! Derived values (end time, total price, VIP flag, display name and calendar
//! color) are recomputed explicitly in dependency order: lines first, then
//! totals and end time, then the client flags, then the presentation fields.

use chrono::{NaiveDateTime, SubsecRound};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::client::Client;
use crate::domain::service::Service;
use crate::domain::types::{
    AppointmentId, AppointmentLineId, AppointmentState, ClientId, ClientName, DurationHours,
    Price, ServiceId, ServiceName, StylistId, StylistName,
};

/// Prefix shown in front of the client name for VIP clients.
pub const VIP_MARKER: &str = "⭐ ";

/// Business rule violations raised while scheduling appointments.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SchedulingError {
    #[error("total price cannot be negative")]
    NegativeTotal,
    #[error("total price is too large")]
    TotalOutOfRange,
    #[error("appointment would end beyond the supported calendar range")]
    EndOutOfRange,
    #[error("cannot schedule an appointment in the past")]
    StartInPast,
    #[error("stylist {0} already has an appointment scheduled in that time slot")]
    StylistUnavailable(String),
    #[error("cannot cancel a draft appointment")]
    CancelDraft,
    #[error("the same service cannot be added twice to one appointment")]
    DuplicateService,
    #[error("appointments must be booked for an individual client, not a company")]
    CompanyClient,
}

/// Price and duration copied from the catalog into an appointment line.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ServiceSnapshot {
    pub price: Price,
    pub duration_hours: DurationHours,
}

impl ServiceSnapshot {
    /// Snapshot the current catalog values of the selected service.
    ///
    /// An empty selection yields a zero price and duration.
    pub fn of(service: Option<&Service>) -> Self {
        match service {
            Some(service) => Self {
                price: service.price,
                duration_hours: service.duration_hours,
            },
            None => Self {
                price: Price::zero(),
                duration_hours: DurationHours::zero(),
            },
        }
    }
}

/// One booked service within an appointment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppointmentLine {
    pub id: AppointmentLineId,
    pub appointment_id: AppointmentId,
    pub service_id: ServiceId,
    pub service_name: ServiceName,
    pub price: Price,
    pub duration_hours: DurationHours,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl AppointmentLine {
    pub fn snapshot(&self) -> ServiceSnapshot {
        ServiceSnapshot {
            price: self.price,
            duration_hours: self.duration_hours,
        }
    }
}

/// Changes requested for an existing appointment line.
///
/// Selecting another service re-snapshots its catalog values; explicit
/// `price`/`duration_hours` overrides are applied afterwards.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AppointmentLineUpdate {
    pub service_id: Option<ServiceId>,
    pub price: Option<Price>,
    pub duration_hours: Option<DurationHours>,
}

impl AppointmentLineUpdate {
    /// Resolve the line values after the update.
    ///
    /// `selected` is the newly selected service when `service_id` is set.
    pub fn apply(&self, current: ServiceSnapshot, selected: Option<&Service>) -> ServiceSnapshot {
        let mut values = if self.service_id.is_some() {
            ServiceSnapshot::of(selected)
        } else {
            current
        };
        if let Some(price) = self.price {
            values.price = price;
        }
        if let Some(duration_hours) = self.duration_hours {
            values.duration_hours = duration_hours;
        }
        values
    }
}

/// Stored scheduling data of an appointment, without its derived fields.
#[derive(Debug, Clone, PartialEq)]
pub struct AppointmentHeader {
    pub id: AppointmentId,
    pub client_id: ClientId,
    pub stylist_id: StylistId,
    pub start_at: NaiveDateTime,
    pub end_at: NaiveDateTime,
    pub state: AppointmentState,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// A booking of one client with one stylist for a set of services.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    pub id: AppointmentId,
    pub client_id: ClientId,
    pub client_name: ClientName,
    pub stylist_id: StylistId,
    pub stylist_name: StylistName,
    pub start_at: NaiveDateTime,
    pub end_at: NaiveDateTime,
    pub state: AppointmentState,
    pub lines: Vec<AppointmentLine>,
    pub total_price: Price,
    pub is_vip: bool,
    pub display_name: String,
    pub calendar_color: i32,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Appointment {
    /// Build the full appointment view and its derived fields.
    pub fn assemble(
        header: AppointmentHeader,
        client: &Client,
        stylist_name: StylistName,
        lines: Vec<AppointmentLine>,
    ) -> Result<Self, SchedulingError> {
        let total_price = compute_total_price(lines.iter().map(AppointmentLine::snapshot))?;
        let is_vip = client.is_vip();
        let display_name = display_name(client.name.as_str(), stylist_name.as_str(), is_vip);

        Ok(Self {
            id: header.id,
            client_id: header.client_id,
            client_name: client.name.clone(),
            stylist_id: header.stylist_id,
            stylist_name,
            start_at: header.start_at,
            end_at: header.end_at,
            state: header.state,
            lines,
            total_price,
            is_vip,
            display_name,
            calendar_color: header.state.calendar_color(),
            created_at: header.created_at,
            updated_at: header.updated_at,
        })
    }

    pub fn slot(&self) -> TimeSlot {
        TimeSlot::new(self.start_at, self.end_at)
    }
}

/// Data required to book a new appointment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewAppointment {
    pub client_id: ClientId,
    pub stylist_id: StylistId,
    pub start_at: NaiveDateTime,
    pub service_ids: Vec<ServiceId>,
}

impl NewAppointment {
    /// Validate a booking request against the wall-clock `now`.
    pub fn new(
        client_id: ClientId,
        stylist_id: StylistId,
        start_at: NaiveDateTime,
        service_ids: Vec<ServiceId>,
        now: NaiveDateTime,
    ) -> Result<Self, SchedulingError> {
        let start_at = normalize_start(start_at);
        ensure_not_in_past(start_at, now)?;
        ensure_unique_services(&service_ids)?;
        Ok(Self {
            client_id,
            stylist_id,
            start_at,
            service_ids,
        })
    }
}

/// Changes requested for an existing appointment. `None` keeps the value.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AppointmentUpdate {
    pub client_id: Option<ClientId>,
    pub stylist_id: Option<StylistId>,
    pub start_at: Option<NaiveDateTime>,
}

impl AppointmentUpdate {
    /// Validate the update; a new start time must not be in the past.
    pub fn new(
        client_id: Option<ClientId>,
        stylist_id: Option<StylistId>,
        start_at: Option<NaiveDateTime>,
        now: NaiveDateTime,
    ) -> Result<Self, SchedulingError> {
        let start_at = start_at.map(normalize_start);
        if let Some(start_at) = start_at {
            ensure_not_in_past(start_at, now)?;
        }
        Ok(Self {
            client_id,
            stylist_id,
            start_at,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.client_id.is_none() && self.stylist_id.is_none() && self.start_at.is_none()
    }
}

/// Lifecycle transitions available on an appointment.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StateTransition {
    Confirm,
    Finalize,
    Cancel,
}

impl StateTransition {
    /// Compute the state reached from `current`.
    ///
    /// Confirming and finalizing are allowed from any state; only cancelling
    /// a draft is rejected.
    pub fn apply(self, current: AppointmentState) -> Result<AppointmentState, SchedulingError> {
        match self {
            Self::Confirm => Ok(AppointmentState::Confirmed),
            Self::Finalize => Ok(AppointmentState::Done),
            Self::Cancel if current == AppointmentState::Draft => {
                Err(SchedulingError::CancelDraft)
            }
            Self::Cancel => Ok(AppointmentState::Cancelled),
        }
    }
}

/// Half-open `[start, end)` interval occupied by an appointment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeSlot {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl TimeSlot {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self { start, end }
    }

    /// Whether two half-open intervals intersect.
    pub fn overlaps(&self, other: &TimeSlot) -> bool {
        other.start < self.end && other.end > self.start
    }
}

/// Drop sub-second precision so stored timestamps compare exactly.
pub fn normalize_start(start_at: NaiveDateTime) -> NaiveDateTime {
    start_at.trunc_subsecs(0)
}

pub fn ensure_not_in_past(
    start_at: NaiveDateTime,
    now: NaiveDateTime,
) -> Result<(), SchedulingError> {
    if start_at < now {
        Err(SchedulingError::StartInPast)
    } else {
        Ok(())
    }
}

pub fn ensure_unique_services(service_ids: &[ServiceId]) -> Result<(), SchedulingError> {
    let mut seen = std::collections::HashSet::with_capacity(service_ids.len());
    if service_ids.iter().all(|id| seen.insert(*id)) {
        Ok(())
    } else {
        Err(SchedulingError::DuplicateService)
    }
}

/// Sum of line prices.
pub fn compute_total_price<I>(lines: I) -> Result<Price, SchedulingError>
where
    I: IntoIterator<Item = ServiceSnapshot>,
{
    let total: Price = lines.into_iter().map(|line| line.price).sum();
    if !total.get().is_finite() {
        Err(SchedulingError::TotalOutOfRange)
    } else if total.get() < 0.0 {
        Err(SchedulingError::NegativeTotal)
    } else {
        Ok(total)
    }
}

/// Start time shifted by the summed line durations.
pub fn compute_end_at<I>(
    start_at: NaiveDateTime,
    lines: I,
) -> Result<NaiveDateTime, SchedulingError>
where
    I: IntoIterator<Item = ServiceSnapshot>,
{
    let hours: DurationHours = lines.into_iter().map(|line| line.duration_hours).sum();
    hours
        .to_time_delta()
        .and_then(|duration| start_at.checked_add_signed(duration))
        .ok_or(SchedulingError::EndOutOfRange)
}

/// Calendar title of an appointment, e.g. `"⭐ Ana - Lucía"`.
pub fn display_name(client_name: &str, stylist_name: &str, is_vip: bool) -> String {
    let marker = if is_vip { VIP_MARKER } else { "" };
    format!("{marker}{client_name} - {stylist_name}")
}

/// Return the first slot in `others` overlapping `slot`.
pub fn find_overlap<I>(slot: &TimeSlot, others: I) -> Option<TimeSlot>
where
    I: IntoIterator<Item = TimeSlot>,
{
    others.into_iter().find(|other| slot.overlaps(other))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::client::Tag;
    use crate::domain::types::{TagId, TagName};
    use chrono::{NaiveDate, TimeDelta};

    fn at(hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    fn snapshot(price: f64, hours: f64) -> ServiceSnapshot {
        ServiceSnapshot {
            price: Price::new(price).unwrap(),
            duration_hours: DurationHours::new(hours).unwrap(),
        }
    }

    fn sample_service(price: f64, hours: f64) -> Service {
        Service {
            id: ServiceId::new(1).unwrap(),
            name: ServiceName::new("Cut").unwrap(),
            price: Price::new(price).unwrap(),
            duration_hours: DurationHours::new(hours).unwrap(),
            description: None,
            created_at: at(0, 0),
            updated_at: at(0, 0),
        }
    }

    fn sample_client(tags: &[&str]) -> Client {
        Client {
            id: ClientId::new(1).unwrap(),
            name: ClientName::new("Ana").unwrap(),
            is_company: false,
            tags: tags
                .iter()
                .enumerate()
                .map(|(i, name)| Tag {
                    id: TagId::new(i as i32 + 1).unwrap(),
                    name: TagName::new(*name).unwrap(),
                    color: 0,
                })
                .collect(),
            created_at: at(0, 0),
            updated_at: at(0, 0),
        }
    }

    fn sample_line(id: i32, price: f64, hours: f64) -> AppointmentLine {
        AppointmentLine {
            id: AppointmentLineId::new(id).unwrap(),
            appointment_id: AppointmentId::new(1).unwrap(),
            service_id: ServiceId::new(id).unwrap(),
            service_name: ServiceName::new("Service").unwrap(),
            price: Price::new(price).unwrap(),
            duration_hours: DurationHours::new(hours).unwrap(),
            created_at: at(0, 0),
            updated_at: at(0, 0),
        }
    }

    fn sample_header(state: AppointmentState) -> AppointmentHeader {
        AppointmentHeader {
            id: AppointmentId::new(1).unwrap(),
            client_id: ClientId::new(1).unwrap(),
            stylist_id: StylistId::new(1).unwrap(),
            start_at: at(10, 0),
            end_at: at(11, 30),
            state,
            created_at: at(0, 0),
            updated_at: at(0, 0),
        }
    }

    #[test]
    fn two_services_add_up_price_and_duration() {
        let lines = [snapshot(20.0, 1.0), snapshot(15.0, 0.5)];
        assert_eq!(compute_total_price(lines).unwrap(), 35.0);
        assert_eq!(compute_end_at(at(10, 0), lines).unwrap(), at(11, 30));
    }

    #[test]
    fn end_minus_start_equals_summed_durations() {
        let lines = [snapshot(0.0, 0.25), snapshot(0.0, 1.75), snapshot(0.0, 0.0)];
        let end = compute_end_at(at(9, 0), lines).unwrap();
        assert_eq!(end - at(9, 0), TimeDelta::hours(2));
    }

    #[test]
    fn huge_durations_are_rejected_instead_of_overflowing() {
        let lines = [snapshot(20.0, 1e9)];
        assert_eq!(
            compute_end_at(at(10, 0), lines),
            Err(SchedulingError::EndOutOfRange)
        );
        let lines = [snapshot(20.0, 1e300)];
        assert_eq!(
            compute_end_at(at(10, 0), lines),
            Err(SchedulingError::EndOutOfRange)
        );
    }

    #[test]
    fn overflowing_totals_are_reported_as_out_of_range() {
        let lines = [snapshot(f64::MAX, 1.0), snapshot(f64::MAX, 1.0)];
        assert_eq!(
            compute_total_price(lines),
            Err(SchedulingError::TotalOutOfRange)
        );
    }

    #[test]
    fn appointment_without_lines_ends_when_it_starts() {
        let none = || std::iter::empty::<ServiceSnapshot>();
        assert_eq!(compute_end_at(at(9, 0), none()).unwrap(), at(9, 0));
        assert_eq!(compute_total_price(none()).unwrap(), 0.0);
    }

    #[test]
    fn snapshot_copies_catalog_values_and_clears_to_zero() {
        let service = sample_service(20.0, 1.0);
        assert_eq!(ServiceSnapshot::of(Some(&service)), snapshot(20.0, 1.0));
        assert_eq!(ServiceSnapshot::of(None), snapshot(0.0, 0.0));
    }

    #[test]
    fn line_update_resnapshots_then_applies_overrides() {
        let current = snapshot(20.0, 1.0);
        let other = sample_service(40.0, 2.0);

        let reselected = AppointmentLineUpdate {
            service_id: Some(ServiceId::new(2).unwrap()),
            ..Default::default()
        };
        assert_eq!(reselected.apply(current, Some(&other)), snapshot(40.0, 2.0));

        let overridden = AppointmentLineUpdate {
            service_id: Some(ServiceId::new(2).unwrap()),
            price: Some(Price::new(30.0).unwrap()),
            duration_hours: None,
        };
        assert_eq!(overridden.apply(current, Some(&other)), snapshot(30.0, 2.0));

        let price_only = AppointmentLineUpdate {
            price: Some(Price::new(5.0).unwrap()),
            ..Default::default()
        };
        assert_eq!(price_only.apply(current, None), snapshot(5.0, 1.0));
    }

    #[test]
    fn half_open_slots_overlap_only_when_intersecting() {
        let booked = TimeSlot::new(at(10, 0), at(11, 0));
        assert!(booked.overlaps(&TimeSlot::new(at(10, 30), at(11, 30))));
        assert!(booked.overlaps(&TimeSlot::new(at(9, 0), at(12, 0))));
        assert!(!booked.overlaps(&TimeSlot::new(at(11, 0), at(12, 0))));
        assert!(!booked.overlaps(&TimeSlot::new(at(9, 0), at(10, 0))));
    }

    #[test]
    fn find_overlap_returns_first_conflict() {
        let slot = TimeSlot::new(at(10, 30), at(11, 30));
        let others = [
            TimeSlot::new(at(8, 0), at(9, 0)),
            TimeSlot::new(at(10, 0), at(11, 0)),
        ];
        assert_eq!(find_overlap(&slot, others), Some(others[1]));
        assert_eq!(find_overlap(&slot, [others[0]]), None);
    }

    #[test]
    fn cancelling_a_draft_is_rejected() {
        assert_eq!(
            StateTransition::Cancel.apply(AppointmentState::Draft),
            Err(SchedulingError::CancelDraft)
        );
        assert_eq!(
            SchedulingError::CancelDraft.to_string(),
            "cannot cancel a draft appointment"
        );
    }

    #[test]
    fn transitions_follow_the_lifecycle() {
        use AppointmentState::*;
        assert_eq!(StateTransition::Confirm.apply(Draft), Ok(Confirmed));
        assert_eq!(StateTransition::Finalize.apply(Confirmed), Ok(Done));
        assert_eq!(StateTransition::Finalize.apply(Draft), Ok(Done));
        assert_eq!(StateTransition::Cancel.apply(Confirmed), Ok(Cancelled));
        assert_eq!(StateTransition::Cancel.apply(Done), Ok(Cancelled));
        // Terminal states are not guarded.
        assert_eq!(StateTransition::Confirm.apply(Cancelled), Ok(Confirmed));
        assert_eq!(StateTransition::Finalize.apply(Cancelled), Ok(Done));
    }

    #[test]
    fn booking_in_the_past_is_rejected() {
        let err = NewAppointment::new(
            ClientId::new(1).unwrap(),
            StylistId::new(1).unwrap(),
            at(9, 0),
            vec![],
            at(9, 30),
        )
        .unwrap_err();
        assert_eq!(err, SchedulingError::StartInPast);

        let update = AppointmentUpdate::new(None, None, Some(at(9, 0)), at(9, 30));
        assert_eq!(update.unwrap_err(), SchedulingError::StartInPast);

        let untouched_start = AppointmentUpdate::new(None, None, None, at(9, 30)).unwrap();
        assert!(untouched_start.is_empty());
    }

    #[test]
    fn duplicate_services_are_rejected_on_booking() {
        let service = ServiceId::new(3).unwrap();
        let err = NewAppointment::new(
            ClientId::new(1).unwrap(),
            StylistId::new(1).unwrap(),
            at(12, 0),
            vec![service, service],
            at(9, 0),
        )
        .unwrap_err();
        assert_eq!(err, SchedulingError::DuplicateService);
    }

    #[test]
    fn booking_start_is_truncated_to_whole_seconds() {
        let start = at(12, 0) + TimeDelta::milliseconds(750);
        let booking = NewAppointment::new(
            ClientId::new(1).unwrap(),
            StylistId::new(1).unwrap(),
            start,
            vec![],
            at(9, 0),
        )
        .unwrap();
        assert_eq!(booking.start_at, at(12, 0));
    }

    #[test]
    fn assemble_derives_presentation_fields() {
        let appointment = Appointment::assemble(
            sample_header(AppointmentState::Confirmed),
            &sample_client(&["vip"]),
            StylistName::new("Lucía").unwrap(),
            vec![sample_line(1, 20.0, 1.0), sample_line(2, 15.0, 0.5)],
        )
        .unwrap();

        assert_eq!(appointment.total_price, 35.0);
        assert!(appointment.is_vip);
        assert_eq!(appointment.display_name, "⭐ Ana - Lucía");
        assert_eq!(appointment.calendar_color, 4);
    }

    #[test]
    fn regular_clients_have_no_marker() {
        let appointment = Appointment::assemble(
            sample_header(AppointmentState::Done),
            &sample_client(&["Regular"]),
            StylistName::new("Lucía").unwrap(),
            vec![],
        )
        .unwrap();

        assert!(!appointment.is_vip);
        assert_eq!(appointment.display_name, "Ana - Lucía");
        assert_eq!(appointment.calendar_color, 10);
    }
}
