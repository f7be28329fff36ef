use chrono::Utc;
use diesel::prelude::*;

use crate::domain::service::{NewService, Service};
use crate::domain::types::ServiceId;
use crate::models::service::{NewService as DbNewService, Service as DbService};
use crate::repository::{
    DieselRepository, RepositoryError, RepositoryResult, ServiceListQuery, ServiceReader,
    ServiceWriter, page_window,
};

impl ServiceReader for DieselRepository {
    fn list_services(&self, query: ServiceListQuery) -> RepositoryResult<(usize, Vec<Service>)> {
        use crate::schema::services;

        let mut conn = self.conn()?;

        let query_builder = || {
            let mut items = services::table.into_boxed::<diesel::sqlite::Sqlite>();
            if let Some(search) = &query.search {
                items = items.filter(services::name.like(format!("%{search}%")));
            }
            items
        };

        let total = query_builder().count().get_result::<i64>(&mut conn)? as usize;

        let mut items = query_builder();
        if let Some(pagination) = &query.pagination {
            let (offset, limit) = page_window(pagination);
            items = items.offset(offset).limit(limit);
        }

        let items = items
            .order((services::name.asc(), services::id.asc()))
            .load::<DbService>(&mut conn)?
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<Service>, _>>()?;

        Ok((total, items))
    }

    fn get_service_by_id(&self, id: ServiceId) -> RepositoryResult<Option<Service>> {
        use crate::schema::services;

        let mut conn = self.conn()?;

        let service = services::table
            .find(id.get())
            .first::<DbService>(&mut conn)
            .optional()?;

        let service = service.map(TryInto::try_into).transpose()?;
        Ok(service)
    }
}

impl ServiceWriter for DieselRepository {
    fn create_service(&self, service: &NewService) -> RepositoryResult<Service> {
        use crate::schema::services;

        let mut conn = self.conn()?;
        let db_service = DbNewService::from_domain(service, Utc::now().naive_utc());

        let created = diesel::insert_into(services::table)
            .values(&db_service)
            .get_result::<DbService>(&mut conn)?;

        Ok(created.try_into()?)
    }

    fn update_service(&self, id: ServiceId, service: &NewService) -> RepositoryResult<Service> {
        use crate::schema::services;

        let mut conn = self.conn()?;
        let db_service = DbNewService::from_domain(service, Utc::now().naive_utc());

        let updated = diesel::update(services::table.find(id.get()))
            .set(&db_service)
            .get_result::<DbService>(&mut conn)
            .optional()?
            .ok_or(RepositoryError::NotFound)?;

        Ok(updated.try_into()?)
    }
}
