use pushkind_common::pagination::{DEFAULT_ITEMS_PER_PAGE, Paginated};
use serde::Deserialize;

use crate::domain::appointment::Appointment;
use crate::domain::stylist::Stylist;
use crate::domain::types::StylistId;
use crate::forms::stylists::StylistFormPayload;
use crate::repository::{
    AppointmentListQuery, AppointmentReader, StylistListQuery, StylistReader, StylistWriter,
};

use super::{ServiceError, ServiceResult, page_count, repository_failure};

/// Query parameters accepted by the stylist listing.
#[derive(Deserialize, Debug, Default)]
pub struct StylistListParams {
    #[serde(default)]
    pub active_only: bool,
    pub page: Option<usize>,
}

pub fn list_stylists<R>(params: StylistListParams, repo: &R) -> ServiceResult<Paginated<Stylist>>
where
    R: StylistReader,
{
    let page = params.page.unwrap_or(1);
    let mut query = StylistListQuery::default().paginate(page, DEFAULT_ITEMS_PER_PAGE);
    if params.active_only {
        query = query.active_only();
    }

    match repo.list_stylists(query) {
        Ok((total, stylists)) => Ok(Paginated::new(
            stylists,
            page,
            page_count(total, DEFAULT_ITEMS_PER_PAGE),
        )),
        Err(e) => Err(repository_failure("list stylists", e)),
    }
}

pub fn create_stylist<R>(payload: StylistFormPayload, repo: &R) -> ServiceResult<Stylist>
where
    R: StylistWriter,
{
    repo.create_stylist(&payload.into_new_stylist())
        .map_err(|e| repository_failure("create stylist", e))
}

pub fn update_stylist<R>(
    stylist_id: i32,
    payload: StylistFormPayload,
    repo: &R,
) -> ServiceResult<Stylist>
where
    R: StylistWriter,
{
    let stylist_id = StylistId::new(stylist_id).map_err(|_| ServiceError::NotFound)?;
    repo.update_stylist(stylist_id, &payload.into_new_stylist())
        .map_err(|e| repository_failure("update stylist", e))
}

/// All appointments booked with a stylist, latest first.
pub fn show_stylist_appointments<R>(
    stylist_id: i32,
    page: Option<usize>,
    repo: &R,
) -> ServiceResult<Paginated<Appointment>>
where
    R: StylistReader + AppointmentReader,
{
    let stylist_id = StylistId::new(stylist_id).map_err(|_| ServiceError::NotFound)?;

    let stylist = match repo.get_stylist_by_id(stylist_id) {
        Ok(Some(stylist)) => stylist,
        Ok(None) => return Err(ServiceError::NotFound),
        Err(e) => return Err(repository_failure("get stylist", e)),
    };

    let page = page.unwrap_or(1);
    let query = AppointmentListQuery::default()
        .stylist(stylist.id)
        .paginate(page, DEFAULT_ITEMS_PER_PAGE);

    match repo.list_appointments(query) {
        Ok((total, appointments)) => Ok(Paginated::new(
            appointments,
            page,
            page_count(total, DEFAULT_ITEMS_PER_PAGE),
        )),
        Err(e) => Err(repository_failure("list stylist appointments", e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::StylistName;
    use crate::repository::test::{TestRepository, sample_stylist};

    #[test]
    fn active_only_hides_former_staff() {
        let mut former = sample_stylist(2, "Marta");
        former.active = false;
        let repo = TestRepository::new(vec![], vec![sample_stylist(1, "Lucía"), former], vec![]);

        let params = StylistListParams {
            active_only: true,
            page: None,
        };
        let page = serde_json::to_value(list_stylists(params, &repo).unwrap()).unwrap();

        assert_eq!(page["items"].as_array().unwrap().len(), 1);
        assert_eq!(page["items"][0]["name"], "Lucía");
    }

    #[test]
    fn created_stylist_starts_without_appointments() {
        let repo = TestRepository::new(vec![], vec![], vec![]);
        let payload = StylistFormPayload {
            name: StylistName::new("Ana").unwrap(),
            active: true,
            phone: None,
            email: None,
            notes: None,
        };

        let stylist = create_stylist(payload, &repo).unwrap();

        assert_eq!(stylist.total_appointments, 0);
    }

    #[test]
    fn appointments_of_unknown_stylist_are_not_found() {
        let repo = TestRepository::new(vec![], vec![], vec![]);
        let result = show_stylist_appointments(3, None, &repo);
        assert_eq!(result.unwrap_err(), ServiceError::NotFound);
    }
}
