use pushkind_common::pagination::{DEFAULT_ITEMS_PER_PAGE, Paginated};
use serde::Deserialize;

use crate::domain::service::Service;
use crate::domain::types::ServiceId;
use crate::forms::services::ServiceFormPayload;
use crate::repository::{ServiceListQuery, ServiceReader, ServiceWriter};

use super::{ServiceError, ServiceResult, page_count, repository_failure};

/// Query parameters accepted by the service catalog listing.
#[derive(Deserialize, Debug, Default)]
pub struct ServiceListParams {
    pub search: Option<String>,
    pub page: Option<usize>,
}

pub fn list_services<R>(params: ServiceListParams, repo: &R) -> ServiceResult<Paginated<Service>>
where
    R: ServiceReader,
{
    let page = params.page.unwrap_or(1);
    let mut query = ServiceListQuery::default().paginate(page, DEFAULT_ITEMS_PER_PAGE);
    if let Some(search) = params.search.filter(|search| !search.trim().is_empty()) {
        query = query.search(search.trim());
    }

    match repo.list_services(query) {
        Ok((total, services)) => Ok(Paginated::new(
            services,
            page,
            page_count(total, DEFAULT_ITEMS_PER_PAGE),
        )),
        Err(e) => Err(repository_failure("list services", e)),
    }
}

pub fn create_service<R>(payload: ServiceFormPayload, repo: &R) -> ServiceResult<Service>
where
    R: ServiceWriter,
{
    let service = payload.into_new_service();
    repo.create_service(&service)
        .map_err(|e| repository_failure("create service", e))
}

/// Overwrite the catalog entry. Lines booked earlier keep their snapshot.
pub fn update_service<R>(
    service_id: i32,
    payload: ServiceFormPayload,
    repo: &R,
) -> ServiceResult<Service>
where
    R: ServiceReader + ServiceWriter,
{
    let service_id = ServiceId::new(service_id).map_err(|_| ServiceError::NotFound)?;

    match repo.get_service_by_id(service_id) {
        Ok(Some(_)) => {}
        Ok(None) => return Err(ServiceError::NotFound),
        Err(e) => return Err(repository_failure("get service", e)),
    }

    repo.update_service(service_id, &payload.into_new_service())
        .map_err(|e| repository_failure("update service", e))
}
