use chrono::{NaiveDateTime, Utc};
use pushkind_common::pagination::{DEFAULT_ITEMS_PER_PAGE, Paginated};
use serde::Deserialize;

use crate::domain::appointment::{Appointment, SchedulingError, StateTransition};
use crate::domain::types::{
    AppointmentId, AppointmentLineId, AppointmentState, ClientId, StylistId,
};
use crate::forms::appointments::{
    AddLineFormPayload, BookAppointmentFormPayload, UpdateAppointmentFormPayload,
    UpdateLineFormPayload,
};
use crate::repository::{AppointmentListQuery, AppointmentReader, AppointmentWriter};

use super::{ServiceError, ServiceResult, page_count, repository_failure};

fn now() -> NaiveDateTime {
    Utc::now().naive_utc()
}

fn rejected(action: &str, err: SchedulingError) -> ServiceError {
    log::warn!("Cannot {action}: {err}");
    err.into()
}

fn parse_appointment_id(id: i32) -> ServiceResult<AppointmentId> {
    AppointmentId::new(id).map_err(|_| ServiceError::NotFound)
}

/// Query parameters accepted by the appointment listing.
#[derive(Deserialize, Debug, Default)]
pub struct AppointmentListParams {
    pub stylist_id: Option<i32>,
    pub client_id: Option<i32>,
    pub state: Option<String>,
    pub from: Option<NaiveDateTime>,
    pub until: Option<NaiveDateTime>,
    pub page: Option<usize>,
}

pub fn list_appointments<R>(
    params: AppointmentListParams,
    repo: &R,
) -> ServiceResult<Paginated<Appointment>>
where
    R: AppointmentReader,
{
    let page = params.page.unwrap_or(1);
    let mut query = AppointmentListQuery::default().paginate(page, DEFAULT_ITEMS_PER_PAGE);

    if let Some(stylist_id) = params.stylist_id {
        query = query.stylist(StylistId::new(stylist_id)?);
    }
    if let Some(client_id) = params.client_id {
        query = query.client(ClientId::new(client_id)?);
    }
    if let Some(state) = params.state {
        query = query.state(AppointmentState::try_from(state)?);
    }
    query.from = params.from;
    query.until = params.until;

    match repo.list_appointments(query) {
        Ok((total, appointments)) => Ok(Paginated::new(
            appointments,
            page,
            page_count(total, DEFAULT_ITEMS_PER_PAGE),
        )),
        Err(e) => Err(repository_failure("list appointments", e)),
    }
}

pub fn get_appointment<R>(appointment_id: i32, repo: &R) -> ServiceResult<Appointment>
where
    R: AppointmentReader,
{
    let id = parse_appointment_id(appointment_id)?;
    match repo.get_appointment_by_id(id) {
        Ok(Some(appointment)) => Ok(appointment),
        Ok(None) => Err(ServiceError::NotFound),
        Err(e) => Err(repository_failure("get appointment", e)),
    }
}

/// Book a new draft appointment with one line per requested service.
pub fn book_appointment<R>(payload: BookAppointmentFormPayload, repo: &R) -> ServiceResult<Appointment>
where
    R: AppointmentWriter,
{
    let booking = payload
        .into_new_appointment(now())
        .map_err(|e| rejected("book appointment", e))?;

    repo.create_appointment(&booking)
        .map_err(|e| repository_failure("book appointment", e))
}

pub fn update_appointment<R>(
    appointment_id: i32,
    payload: UpdateAppointmentFormPayload,
    repo: &R,
) -> ServiceResult<Appointment>
where
    R: AppointmentReader + AppointmentWriter,
{
    let id = parse_appointment_id(appointment_id)?;
    let update = payload
        .into_update(now())
        .map_err(|e| rejected("update appointment", e))?;

    if update.is_empty() {
        return get_appointment(appointment_id, repo);
    }

    repo.update_appointment(id, &update)
        .map_err(|e| repository_failure("update appointment", e))
}

fn transition_appointment<R>(
    appointment_id: i32,
    transition: StateTransition,
    repo: &R,
) -> ServiceResult<Appointment>
where
    R: AppointmentWriter,
{
    let id = parse_appointment_id(appointment_id)?;
    repo.transition_appointment(id, transition)
        .map_err(|e| repository_failure("change appointment state", e))
}

pub fn confirm_appointment<R>(appointment_id: i32, repo: &R) -> ServiceResult<Appointment>
where
    R: AppointmentWriter,
{
    transition_appointment(appointment_id, StateTransition::Confirm, repo)
}

pub fn finalize_appointment<R>(appointment_id: i32, repo: &R) -> ServiceResult<Appointment>
where
    R: AppointmentWriter,
{
    transition_appointment(appointment_id, StateTransition::Finalize, repo)
}

/// Cancel an appointment. Drafts cannot be cancelled.
pub fn cancel_appointment<R>(appointment_id: i32, repo: &R) -> ServiceResult<Appointment>
where
    R: AppointmentWriter,
{
    transition_appointment(appointment_id, StateTransition::Cancel, repo)
}

pub fn delete_appointment<R>(appointment_id: i32, repo: &R) -> ServiceResult<()>
where
    R: AppointmentWriter,
{
    let id = parse_appointment_id(appointment_id)?;
    match repo.delete_appointment(id) {
        Ok(0) => Err(ServiceError::NotFound),
        Ok(_) => Ok(()),
        Err(e) => Err(repository_failure("delete appointment", e)),
    }
}

pub fn add_line<R>(
    appointment_id: i32,
    payload: AddLineFormPayload,
    repo: &R,
) -> ServiceResult<Appointment>
where
    R: AppointmentWriter,
{
    let id = parse_appointment_id(appointment_id)?;
    repo.add_appointment_line(id, payload.service_id)
        .map_err(|e| repository_failure("add appointment line", e))
}

pub fn update_line<R>(
    line_id: i32,
    payload: UpdateLineFormPayload,
    repo: &R,
) -> ServiceResult<Appointment>
where
    R: AppointmentWriter,
{
    let line_id = AppointmentLineId::new(line_id).map_err(|_| ServiceError::NotFound)?;
    repo.update_appointment_line(line_id, &payload.update)
        .map_err(|e| repository_failure("update appointment line", e))
}

pub fn remove_line<R>(line_id: i32, repo: &R) -> ServiceResult<Appointment>
where
    R: AppointmentWriter,
{
    let line_id = AppointmentLineId::new(line_id).map_err(|_| ServiceError::NotFound)?;
    repo.remove_appointment_line(line_id)
        .map_err(|e| repository_failure("remove appointment line", e))
}
