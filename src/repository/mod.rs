use chrono::NaiveDateTime;

use pushkind_common::pagination::Pagination;

use crate::db::{DbConnection, DbPool, apply_pragmas};
use crate::domain::appointment::{
    Appointment, AppointmentLineUpdate, AppointmentUpdate, NewAppointment, StateTransition,
};
use crate::domain::client::{Client, NewClient, NewTag, Tag};
use crate::domain::service::{NewService, Service};
use crate::domain::stylist::{NewStylist, Stylist};
use crate::domain::types::{
    AppointmentId, AppointmentLineId, AppointmentState, ClientId, ServiceId, StylistId, TagName,
};

pub mod appointment;
pub mod client;
pub mod service;
pub mod stylist;

pub use pushkind_common::repository::errors::{RepositoryError, RepositoryResult};

/// Repository implementation backed by Diesel and SQLite.
///
/// The underlying `r2d2::Pool` is cheap to clone, allowing the repository to
/// be passed around freely between handlers.
#[derive(Clone)]
pub struct DieselRepository {
    pool: DbPool, // r2d2::Pool is cheap to clone
}

impl DieselRepository {
    /// Create a new repository from an established database pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Get a pooled database connection.
    fn conn(&self) -> RepositoryResult<DbConnection> {
        let mut conn = self.pool.get()?;
        apply_pragmas(&mut conn)?;
        Ok(conn)
    }
}

/// SQL `OFFSET`/`LIMIT` pair for a 1-based page.
///
/// Page numbers come straight from query strings, so the arithmetic saturates
/// instead of overflowing.
pub(crate) fn page_window(pagination: &Pagination) -> (i64, i64) {
    let limit = i64::try_from(pagination.per_page).unwrap_or(i64::MAX);
    let offset = pagination
        .page
        .max(1)
        .saturating_sub(1)
        .saturating_mul(pagination.per_page);
    (i64::try_from(offset).unwrap_or(i64::MAX), limit)
}

/// Query parameters used when listing catalog services.
#[derive(Debug, Clone, Default)]
pub struct ServiceListQuery {
    /// Case-insensitive substring of the service name.
    pub search: Option<String>,
    pub pagination: Option<Pagination>,
}

impl ServiceListQuery {
    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }
    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}

/// Query parameters used when listing stylists.
#[derive(Debug, Clone, Default)]
pub struct StylistListQuery {
    /// Restrict to stylists currently on staff.
    pub active_only: bool,
    pub pagination: Option<Pagination>,
}

impl StylistListQuery {
    pub fn active_only(mut self) -> Self {
        self.active_only = true;
        self
    }
    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}

/// Query parameters used when listing appointments.
///
/// Results are ordered by start time, latest first.
#[derive(Debug, Clone, Default)]
pub struct AppointmentListQuery {
    pub stylist_id: Option<StylistId>,
    pub client_id: Option<ClientId>,
    pub state: Option<AppointmentState>,
    /// Only appointments ending after this instant.
    pub from: Option<NaiveDateTime>,
    /// Only appointments starting before this instant.
    pub until: Option<NaiveDateTime>,
    pub pagination: Option<Pagination>,
}

impl AppointmentListQuery {
    pub fn stylist(mut self, stylist_id: StylistId) -> Self {
        self.stylist_id = Some(stylist_id);
        self
    }
    pub fn client(mut self, client_id: ClientId) -> Self {
        self.client_id = Some(client_id);
        self
    }
    pub fn state(mut self, state: AppointmentState) -> Self {
        self.state = Some(state);
        self
    }
    pub fn between(mut self, from: NaiveDateTime, until: NaiveDateTime) -> Self {
        self.from = Some(from);
        self.until = Some(until);
        self
    }
    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}

/// Read-only operations for catalog services.
pub trait ServiceReader {
    /// List services ordered by name.
    fn list_services(&self, query: ServiceListQuery) -> RepositoryResult<(usize, Vec<Service>)>;
    fn get_service_by_id(&self, id: ServiceId) -> RepositoryResult<Option<Service>>;
}

/// Write operations for catalog services.
pub trait ServiceWriter {
    fn create_service(&self, service: &NewService) -> RepositoryResult<Service>;
    /// Overwrite a service. Lines that already snapshotted it keep their values.
    fn update_service(&self, id: ServiceId, service: &NewService) -> RepositoryResult<Service>;
}

/// Read-only operations for stylists.
pub trait StylistReader {
    fn list_stylists(&self, query: StylistListQuery) -> RepositoryResult<(usize, Vec<Stylist>)>;
    fn get_stylist_by_id(&self, id: StylistId) -> RepositoryResult<Option<Stylist>>;
}

/// Write operations for stylists.
pub trait StylistWriter {
    fn create_stylist(&self, stylist: &NewStylist) -> RepositoryResult<Stylist>;
    fn update_stylist(&self, id: StylistId, stylist: &NewStylist) -> RepositoryResult<Stylist>;
}

/// Read-only operations for clients and the tag registry.
pub trait ClientReader {
    fn get_client_by_id(&self, id: ClientId) -> RepositoryResult<Option<Client>>;
    fn get_tag_by_name(&self, name: &TagName) -> RepositoryResult<Option<Tag>>;
}

/// Write operations for clients and the tag registry.
pub trait ClientWriter {
    fn create_client(&self, client: &NewClient) -> RepositoryResult<Client>;
    /// Return the tag with this name, creating it if it does not exist.
    fn ensure_tag(&self, tag: &NewTag) -> RepositoryResult<Tag>;
    /// Attach a tag by name, creating the tag with `color` if needed.
    fn add_client_tag(&self, id: ClientId, tag: &NewTag) -> RepositoryResult<Client>;
    /// Detach a tag by name. Missing tags are ignored.
    fn remove_client_tag(&self, id: ClientId, name: &TagName) -> RepositoryResult<Client>;
}

/// Read-only operations for appointments.
pub trait AppointmentReader {
    fn get_appointment_by_id(&self, id: AppointmentId) -> RepositoryResult<Option<Appointment>>;
    fn list_appointments(
        &self,
        query: AppointmentListQuery,
    ) -> RepositoryResult<(usize, Vec<Appointment>)>;
    /// Number of appointments of `client_id` in the done state.
    fn count_done_appointments(&self, client_id: ClientId) -> RepositoryResult<usize>;
}

/// Write operations for appointments and their lines.
///
/// Every method runs in a single immediate transaction covering the
/// validation reads, the write, the recomputation of derived values and the
/// loyalty tag synchronisation.
pub trait AppointmentWriter {
    fn create_appointment(&self, appointment: &NewAppointment) -> RepositoryResult<Appointment>;
    fn update_appointment(
        &self,
        id: AppointmentId,
        update: &AppointmentUpdate,
    ) -> RepositoryResult<Appointment>;
    fn transition_appointment(
        &self,
        id: AppointmentId,
        transition: StateTransition,
    ) -> RepositoryResult<Appointment>;
    /// Delete an appointment together with its lines.
    fn delete_appointment(&self, id: AppointmentId) -> RepositoryResult<usize>;
    fn add_appointment_line(
        &self,
        id: AppointmentId,
        service_id: ServiceId,
    ) -> RepositoryResult<Appointment>;
    fn update_appointment_line(
        &self,
        line_id: AppointmentLineId,
        update: &AppointmentLineUpdate,
    ) -> RepositoryResult<Appointment>;
    fn remove_appointment_line(&self, line_id: AppointmentLineId)
    -> RepositoryResult<Appointment>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_window_skips_previous_pages() {
        let first = Pagination {
            page: 0,
            per_page: 20,
        };
        assert_eq!(page_window(&first), (0, 20));

        let third = Pagination {
            page: 3,
            per_page: 20,
        };
        assert_eq!(page_window(&third), (40, 20));
    }

    #[test]
    fn page_window_saturates_on_huge_pages() {
        let pagination = Pagination {
            page: usize::MAX,
            per_page: 20,
        };
        assert_eq!(page_window(&pagination), (i64::MAX, 20));
    }
}
