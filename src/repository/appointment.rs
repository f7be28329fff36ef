use std::collections::HashMap;

use chrono::{NaiveDateTime, Utc};
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;

use crate::domain::appointment::{
    Appointment, AppointmentHeader, AppointmentLineUpdate, AppointmentUpdate, NewAppointment,
    SchedulingError, ServiceSnapshot, StateTransition, TimeSlot, compute_end_at,
    compute_total_price, ensure_unique_services, find_overlap,
};
use crate::domain::client::{LoyaltyAction, NewTag, VIP_TAG_NAME, loyalty_action};
use crate::domain::service::Service;
use crate::domain::types::{
    AppointmentId, AppointmentLineId, AppointmentState, ClientId, ServiceId, StylistName,
};
use crate::models::appointment::{
    Appointment as DbAppointment, AppointmentLine as DbAppointmentLine,
    NewAppointment as DbNewAppointment, NewAppointmentLine as DbNewAppointmentLine,
};
use crate::models::service::Service as DbService;
use crate::repository::client::{
    attach_tag, detach_tag, find_tag, load_client, load_clients, upsert_tag,
};
use crate::repository::{
    AppointmentListQuery, AppointmentReader, AppointmentWriter, DieselRepository, RepositoryError,
    RepositoryResult, page_window,
};

fn now() -> NaiveDateTime {
    Utc::now().naive_utc()
}

fn load_row(conn: &mut SqliteConnection, id: i32) -> RepositoryResult<DbAppointment> {
    use crate::schema::appointments;

    appointments::table
        .find(id)
        .first::<DbAppointment>(conn)
        .optional()?
        .ok_or(RepositoryError::NotFound)
}

fn load_service(conn: &mut SqliteConnection, id: i32) -> RepositoryResult<Service> {
    use crate::schema::services;

    let service = services::table
        .find(id)
        .first::<DbService>(conn)
        .optional()?
        .ok_or(RepositoryError::NotFound)?;
    Ok(service.try_into()?)
}

fn stylist_name(conn: &mut SqliteConnection, id: i32) -> RepositoryResult<StylistName> {
    use crate::schema::stylists;

    let name = stylists::table
        .find(id)
        .select(stylists::name)
        .first::<String>(conn)
        .optional()?
        .ok_or(RepositoryError::NotFound)?;
    Ok(StylistName::new(name)?)
}

fn line_rows(
    conn: &mut SqliteConnection,
    appointment_id: i32,
) -> RepositoryResult<Vec<DbAppointmentLine>> {
    use crate::schema::appointment_lines;

    Ok(appointment_lines::table
        .filter(appointment_lines::appointment_id.eq(appointment_id))
        .order(appointment_lines::id.asc())
        .load::<DbAppointmentLine>(conn)?)
}

/// Turn appointment rows into full appointments with lines, client and stylist.
fn assemble(
    conn: &mut SqliteConnection,
    rows: Vec<DbAppointment>,
) -> RepositoryResult<Vec<Appointment>> {
    use crate::schema::{appointment_lines, services, stylists};

    if rows.is_empty() {
        return Ok(vec![]);
    }

    let ids: Vec<i32> = rows.iter().map(|row| row.id).collect();
    let client_ids: Vec<i32> = rows.iter().map(|row| row.client_id).collect();
    let stylist_ids: Vec<i32> = rows.iter().map(|row| row.stylist_id).collect();

    let mut lines_by_appointment: HashMap<i32, Vec<(DbAppointmentLine, String)>> =
        HashMap::new();
    let lines = appointment_lines::table
        .inner_join(services::table)
        .filter(appointment_lines::appointment_id.eq_any(&ids))
        .order(appointment_lines::id.asc())
        .select((DbAppointmentLine::as_select(), services::name))
        .load::<(DbAppointmentLine, String)>(conn)?;
    for (line, service_name) in lines {
        lines_by_appointment
            .entry(line.appointment_id)
            .or_default()
            .push((line, service_name));
    }

    let clients = load_clients(conn, &client_ids)?;
    let stylist_names: HashMap<i32, String> = stylists::table
        .filter(stylists::id.eq_any(&stylist_ids))
        .select((stylists::id, stylists::name))
        .load::<(i32, String)>(conn)?
        .into_iter()
        .collect();

    rows.into_iter()
        .map(|row| -> RepositoryResult<Appointment> {
            let lines = lines_by_appointment
                .remove(&row.id)
                .unwrap_or_default()
                .into_iter()
                .map(|(line, service_name)| line.into_domain(service_name))
                .collect::<Result<Vec<_>, _>>()?;
            let client = clients.get(&row.client_id).ok_or(RepositoryError::NotFound)?;
            let stylist_name = stylist_names
                .get(&row.stylist_id)
                .cloned()
                .ok_or(RepositoryError::NotFound)?;
            let header = AppointmentHeader::try_from(row)?;
            Ok(Appointment::assemble(
                header,
                client,
                StylistName::new(stylist_name)?,
                lines,
            )?)
        })
        .collect()
}

fn load_appointment(conn: &mut SqliteConnection, id: i32) -> RepositoryResult<Appointment> {
    let row = load_row(conn, id)?;
    assemble(conn, vec![row])?
        .pop()
        .ok_or(RepositoryError::NotFound)
}

/// Reject `slot` if another non-cancelled appointment of the stylist overlaps it.
fn ensure_stylist_available(
    conn: &mut SqliteConnection,
    appointment_id: Option<i32>,
    stylist_id: i32,
    slot: TimeSlot,
) -> RepositoryResult<()> {
    use crate::schema::appointments;

    let mut candidates = appointments::table
        .select((appointments::start_at, appointments::end_at))
        .filter(appointments::stylist_id.eq(stylist_id))
        .filter(appointments::state.ne(AppointmentState::Cancelled.as_str()))
        .filter(appointments::start_at.lt(slot.end))
        .filter(appointments::end_at.gt(slot.start))
        .into_boxed::<diesel::sqlite::Sqlite>();
    if let Some(id) = appointment_id {
        candidates = candidates.filter(appointments::id.ne(id));
    }

    let others = candidates
        .load::<(NaiveDateTime, NaiveDateTime)>(conn)?
        .into_iter()
        .map(|(start, end)| TimeSlot::new(start, end));

    if find_overlap(&slot, others).is_some() {
        let name = stylist_name(conn, stylist_id)?;
        return Err(SchedulingError::StylistUnavailable(name.into_inner()).into());
    }
    Ok(())
}

/// Recompute the end time from the current lines and re-run the overlap check.
fn reschedule(conn: &mut SqliteConnection, row: &DbAppointment) -> RepositoryResult<()> {
    use crate::schema::appointments;

    let snapshots = line_rows(conn, row.id)?
        .iter()
        .map(DbAppointmentLine::snapshot)
        .collect::<Result<Vec<ServiceSnapshot>, _>>()?;
    compute_total_price(snapshots.iter().copied())?;
    let end_at = compute_end_at(row.start_at, snapshots.iter().copied())?;

    ensure_stylist_available(
        conn,
        Some(row.id),
        row.stylist_id,
        TimeSlot::new(row.start_at, end_at),
    )?;

    diesel::update(appointments::table.find(row.id))
        .set((
            appointments::end_at.eq(end_at),
            appointments::updated_at.eq(now()),
        ))
        .execute(conn)?;
    Ok(())
}

fn refresh_stylist_count(conn: &mut SqliteConnection, stylist_id: i32) -> RepositoryResult<()> {
    use crate::schema::{appointments, stylists};

    let total = appointments::table
        .filter(appointments::stylist_id.eq(stylist_id))
        .count()
        .get_result::<i64>(conn)?;

    diesel::update(stylists::table.find(stylist_id))
        .set(stylists::total_appointments.eq(total as i32))
        .execute(conn)?;
    Ok(())
}

fn count_done(conn: &mut SqliteConnection, client_id: i32) -> RepositoryResult<usize> {
    use crate::schema::appointments;

    let done = appointments::table
        .filter(appointments::client_id.eq(client_id))
        .filter(appointments::state.eq(AppointmentState::Done.as_str()))
        .count()
        .get_result::<i64>(conn)?;
    Ok(done as usize)
}

/// Grant or revoke the loyalty tag according to the client's done appointments.
fn sync_loyalty_tag(conn: &mut SqliteConnection, client_id: i32) -> RepositoryResult<()> {
    use crate::schema::client_tags;

    let done = count_done(conn, client_id)?;
    let existing = find_tag(conn, VIP_TAG_NAME)?;
    let holds_tag = match &existing {
        Some(tag) => {
            client_tags::table
                .filter(client_tags::client_id.eq(client_id))
                .filter(client_tags::tag_id.eq(tag.id))
                .count()
                .get_result::<i64>(conn)?
                > 0
        }
        None => false,
    };

    match (loyalty_action(done, holds_tag), existing) {
        (LoyaltyAction::Grant, _) => {
            let tag = upsert_tag(conn, &NewTag::vip()?)?;
            attach_tag(conn, client_id, tag.id)?;
            log::info!("Client {client_id} reached {done} done appointments, granted VIP tag");
        }
        (LoyaltyAction::Revoke, Some(tag)) => {
            detach_tag(conn, client_id, tag.id)?;
            log::info!("Client {client_id} dropped to {done} done appointments, revoked VIP tag");
        }
        _ => {}
    }
    Ok(())
}

/// Appointments may only be booked for individual clients.
fn ensure_individual_client(conn: &mut SqliteConnection, client_id: i32) -> RepositoryResult<()> {
    let client = load_client(conn, client_id)?;
    if client.is_company {
        return Err(SchedulingError::CompanyClient.into());
    }
    Ok(())
}

fn ensure_service_not_booked(
    conn: &mut SqliteConnection,
    appointment_id: i32,
    service_id: i32,
    except_line: Option<i32>,
) -> RepositoryResult<()> {
    let duplicate = line_rows(conn, appointment_id)?
        .iter()
        .any(|line| line.service_id == service_id && Some(line.id) != except_line);
    if duplicate {
        return Err(SchedulingError::DuplicateService.into());
    }
    Ok(())
}

impl AppointmentReader for DieselRepository {
    fn get_appointment_by_id(&self, id: AppointmentId) -> RepositoryResult<Option<Appointment>> {
        let mut conn = self.conn()?;
        match load_appointment(&mut conn, id.get()) {
            Ok(appointment) => Ok(Some(appointment)),
            Err(RepositoryError::NotFound) => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn list_appointments(
        &self,
        query: AppointmentListQuery,
    ) -> RepositoryResult<(usize, Vec<Appointment>)> {
        use crate::schema::appointments;

        let mut conn = self.conn()?;

        let query_builder = || {
            let mut items = appointments::table.into_boxed::<diesel::sqlite::Sqlite>();
            if let Some(stylist_id) = query.stylist_id {
                items = items.filter(appointments::stylist_id.eq(stylist_id.get()));
            }
            if let Some(client_id) = query.client_id {
                items = items.filter(appointments::client_id.eq(client_id.get()));
            }
            if let Some(state) = query.state {
                items = items.filter(appointments::state.eq(state.as_str()));
            }
            if let Some(from) = query.from {
                items = items.filter(appointments::end_at.gt(from));
            }
            if let Some(until) = query.until {
                items = items.filter(appointments::start_at.lt(until));
            }
            items
        };

        let total = query_builder().count().get_result::<i64>(&mut conn)? as usize;

        let mut items = query_builder();
        if let Some(pagination) = &query.pagination {
            let (offset, limit) = page_window(pagination);
            items = items.offset(offset).limit(limit);
        }

        let rows = items
            .order((appointments::start_at.desc(), appointments::id.desc()))
            .load::<DbAppointment>(&mut conn)?;

        Ok((total, assemble(&mut conn, rows)?))
    }

    fn count_done_appointments(&self, client_id: ClientId) -> RepositoryResult<usize> {
        let mut conn = self.conn()?;
        count_done(&mut conn, client_id.get())
    }
}

impl AppointmentWriter for DieselRepository {
    fn create_appointment(&self, appointment: &NewAppointment) -> RepositoryResult<Appointment> {
        use crate::schema::{appointment_lines, appointments};

        let mut conn = self.conn()?;

        conn.immediate_transaction(|conn| {
            ensure_unique_services(&appointment.service_ids)?;
            ensure_individual_client(conn, appointment.client_id.get())?;
            stylist_name(conn, appointment.stylist_id.get())?;

            let services = appointment
                .service_ids
                .iter()
                .map(|id| load_service(conn, id.get()))
                .collect::<RepositoryResult<Vec<Service>>>()?;
            let snapshots: Vec<ServiceSnapshot> = services
                .iter()
                .map(|service| ServiceSnapshot::of(Some(service)))
                .collect();

            compute_total_price(snapshots.iter().copied())?;
            let end_at = compute_end_at(appointment.start_at, snapshots.iter().copied())?;
            ensure_stylist_available(
                conn,
                None,
                appointment.stylist_id.get(),
                TimeSlot::new(appointment.start_at, end_at),
            )?;

            let now = now();
            let row = diesel::insert_into(appointments::table)
                .values(DbNewAppointment {
                    client_id: appointment.client_id.get(),
                    stylist_id: appointment.stylist_id.get(),
                    start_at: appointment.start_at,
                    end_at,
                    state: AppointmentState::Draft.as_str().to_string(),
                    created_at: now,
                    updated_at: now,
                })
                .get_result::<DbAppointment>(conn)?;

            let lines = services
                .iter()
                .zip(snapshots)
                .map(|(service, snapshot)| {
                    DbNewAppointmentLine::new(row.id, service.id.get(), snapshot, now)
                })
                .collect::<Vec<_>>();
            if !lines.is_empty() {
                diesel::insert_into(appointment_lines::table)
                    .values(&lines)
                    .execute(conn)?;
            }

            refresh_stylist_count(conn, row.stylist_id)?;
            sync_loyalty_tag(conn, row.client_id)?;

            load_appointment(conn, row.id)
        })
    }

    fn update_appointment(
        &self,
        id: AppointmentId,
        update: &AppointmentUpdate,
    ) -> RepositoryResult<Appointment> {
        use crate::schema::appointments;

        let mut conn = self.conn()?;

        conn.immediate_transaction(|conn| {
            let previous = load_row(conn, id.get())?;

            let client_id = update.client_id.map_or(previous.client_id, |id| id.get());
            let stylist_id = update.stylist_id.map_or(previous.stylist_id, |id| id.get());
            let start_at = update.start_at.unwrap_or(previous.start_at);

            let client_changed = client_id != previous.client_id;
            let stylist_changed = stylist_id != previous.stylist_id;
            let start_changed = start_at != previous.start_at;

            if client_changed {
                ensure_individual_client(conn, client_id)?;
            }
            if stylist_changed {
                stylist_name(conn, stylist_id)?;
            }

            let row = diesel::update(appointments::table.find(previous.id))
                .set((
                    appointments::client_id.eq(client_id),
                    appointments::stylist_id.eq(stylist_id),
                    appointments::start_at.eq(start_at),
                    appointments::updated_at.eq(now()),
                ))
                .get_result::<DbAppointment>(conn)?;

            if start_changed || stylist_changed {
                reschedule(conn, &row)?;
            }
            if stylist_changed {
                refresh_stylist_count(conn, previous.stylist_id)?;
                refresh_stylist_count(conn, row.stylist_id)?;
            }
            if client_changed {
                sync_loyalty_tag(conn, previous.client_id)?;
                sync_loyalty_tag(conn, row.client_id)?;
            }

            load_appointment(conn, row.id)
        })
    }

    fn transition_appointment(
        &self,
        id: AppointmentId,
        transition: StateTransition,
    ) -> RepositoryResult<Appointment> {
        use crate::schema::appointments;

        let mut conn = self.conn()?;

        conn.immediate_transaction(|conn| {
            let row = load_row(conn, id.get())?;
            let current = AppointmentState::try_from(row.state.as_str())?;
            let next = transition.apply(current)?;

            diesel::update(appointments::table.find(row.id))
                .set((
                    appointments::state.eq(next.as_str()),
                    appointments::updated_at.eq(now()),
                ))
                .execute(conn)?;

            sync_loyalty_tag(conn, row.client_id)?;

            load_appointment(conn, row.id)
        })
    }

    fn delete_appointment(&self, id: AppointmentId) -> RepositoryResult<usize> {
        use crate::schema::{appointment_lines, appointments};

        let mut conn = self.conn()?;

        conn.immediate_transaction(|conn| {
            let row = load_row(conn, id.get())?;

            diesel::delete(
                appointment_lines::table.filter(appointment_lines::appointment_id.eq(row.id)),
            )
            .execute(conn)?;
            let affected = diesel::delete(appointments::table.find(row.id)).execute(conn)?;

            refresh_stylist_count(conn, row.stylist_id)?;
            sync_loyalty_tag(conn, row.client_id)?;

            Ok(affected)
        })
    }

    fn add_appointment_line(
        &self,
        id: AppointmentId,
        service_id: ServiceId,
    ) -> RepositoryResult<Appointment> {
        use crate::schema::appointment_lines;

        let mut conn = self.conn()?;

        conn.immediate_transaction(|conn| {
            let row = load_row(conn, id.get())?;
            let service = load_service(conn, service_id.get())?;
            ensure_service_not_booked(conn, row.id, service.id.get(), None)?;

            diesel::insert_into(appointment_lines::table)
                .values(DbNewAppointmentLine::new(
                    row.id,
                    service.id.get(),
                    ServiceSnapshot::of(Some(&service)),
                    now(),
                ))
                .execute(conn)?;

            reschedule(conn, &row)?;
            load_appointment(conn, row.id)
        })
    }

    fn update_appointment_line(
        &self,
        line_id: AppointmentLineId,
        update: &AppointmentLineUpdate,
    ) -> RepositoryResult<Appointment> {
        use crate::schema::appointment_lines;

        let mut conn = self.conn()?;

        conn.immediate_transaction(|conn| {
            let line = appointment_lines::table
                .find(line_id.get())
                .first::<DbAppointmentLine>(conn)
                .optional()?
                .ok_or(RepositoryError::NotFound)?;
            let row = load_row(conn, line.appointment_id)?;

            let selected = match update.service_id {
                Some(service_id) => {
                    let service = load_service(conn, service_id.get())?;
                    ensure_service_not_booked(conn, row.id, service.id.get(), Some(line.id))?;
                    Some(service)
                }
                None => None,
            };
            let values = update.apply(line.snapshot()?, selected.as_ref());
            let service_id = selected
                .as_ref()
                .map_or(line.service_id, |service| service.id.get());

            diesel::update(appointment_lines::table.find(line.id))
                .set((
                    appointment_lines::service_id.eq(service_id),
                    appointment_lines::price.eq(values.price.get()),
                    appointment_lines::duration_hours.eq(values.duration_hours.get()),
                    appointment_lines::updated_at.eq(now()),
                ))
                .execute(conn)?;

            reschedule(conn, &row)?;
            load_appointment(conn, row.id)
        })
    }

    fn remove_appointment_line(
        &self,
        line_id: AppointmentLineId,
    ) -> RepositoryResult<Appointment> {
        use crate::schema::appointment_lines;

        let mut conn = self.conn()?;

        conn.immediate_transaction(|conn| {
            let line = appointment_lines::table
                .find(line_id.get())
                .first::<DbAppointmentLine>(conn)
                .optional()?
                .ok_or(RepositoryError::NotFound)?;
            let row = load_row(conn, line.appointment_id)?;

            diesel::delete(appointment_lines::table.find(line.id)).execute(conn)?;

            reschedule(conn, &row)?;
            load_appointment(conn, row.id)
        })
    }
}
