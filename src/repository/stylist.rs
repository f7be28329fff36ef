use chrono::Utc;
use diesel::prelude::*;

use crate::domain::stylist::{NewStylist, Stylist};
use crate::domain::types::StylistId;
use crate::models::stylist::{NewStylist as DbNewStylist, Stylist as DbStylist};
use crate::repository::{
    DieselRepository, RepositoryError, RepositoryResult, StylistListQuery, StylistReader,
    StylistWriter, page_window,
};

impl StylistReader for DieselRepository {
    fn list_stylists(&self, query: StylistListQuery) -> RepositoryResult<(usize, Vec<Stylist>)> {
        use crate::schema::stylists;

        let mut conn = self.conn()?;

        let query_builder = || {
            let mut items = stylists::table.into_boxed::<diesel::sqlite::Sqlite>();
            if query.active_only {
                items = items.filter(stylists::active.eq(true));
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
            .order((stylists::name.asc(), stylists::id.asc()))
            .load::<DbStylist>(&mut conn)?
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<Stylist>, _>>()?;

        Ok((total, items))
    }

    fn get_stylist_by_id(&self, id: StylistId) -> RepositoryResult<Option<Stylist>> {
        use crate::schema::stylists;

        let mut conn = self.conn()?;

        let stylist = stylists::table
            .find(id.get())
            .first::<DbStylist>(&mut conn)
            .optional()?;

        let stylist = stylist.map(TryInto::try_into).transpose()?;
        Ok(stylist)
    }
}

impl StylistWriter for DieselRepository {
    fn create_stylist(&self, stylist: &NewStylist) -> RepositoryResult<Stylist> {
        use crate::schema::stylists;

        let mut conn = self.conn()?;
        let db_stylist = DbNewStylist::from_domain(stylist, Utc::now().naive_utc());

        let created = diesel::insert_into(stylists::table)
            .values(&db_stylist)
            .get_result::<DbStylist>(&mut conn)?;

        Ok(created.try_into()?)
    }

    fn update_stylist(&self, id: StylistId, stylist: &NewStylist) -> RepositoryResult<Stylist> {
        use crate::schema::stylists;

        let mut conn = self.conn()?;
        let db_stylist = DbNewStylist::from_domain(stylist, Utc::now().naive_utc());

        let updated = diesel::update(stylists::table.find(id.get()))
            .set(&db_stylist)
            .get_result::<DbStylist>(&mut conn)
            .optional()?
            .ok_or(RepositoryError::NotFound)?;

        Ok(updated.try_into()?)
    }
}
