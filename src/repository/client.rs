use std::collections::HashMap;

use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;

use crate::domain::client::{Client, NewClient, NewTag, Tag};
use crate::domain::types::{ClientId, TagName};
use crate::models::client::{
    Client as DbClient, ClientTag as DbClientTag, NewClient as DbNewClient, NewTag as DbNewTag,
    Tag as DbTag,
};
use crate::repository::{
    ClientReader, ClientWriter, DieselRepository, RepositoryError, RepositoryResult,
};

/// Load clients with their tags, keyed by client id.
pub(crate) fn load_clients(
    conn: &mut SqliteConnection,
    ids: &[i32],
) -> RepositoryResult<HashMap<i32, Client>> {
    use crate::schema::{client_tags, clients, tags};

    let rows = clients::table
        .filter(clients::id.eq_any(ids))
        .load::<DbClient>(conn)?;

    let mut tags_by_client: HashMap<i32, Vec<DbTag>> = HashMap::new();
    let memberships = client_tags::table
        .inner_join(tags::table)
        .filter(client_tags::client_id.eq_any(ids))
        .order(tags::name.asc())
        .select((client_tags::client_id, DbTag::as_select()))
        .load::<(i32, DbTag)>(conn)?;
    for (client_id, tag) in memberships {
        tags_by_client.entry(client_id).or_default().push(tag);
    }

    rows.into_iter()
        .map(|row| -> RepositoryResult<(i32, Client)> {
            let id = row.id;
            let tags = tags_by_client.remove(&id).unwrap_or_default();
            Ok((id, row.into_domain(tags)?))
        })
        .collect()
}

pub(crate) fn load_client(conn: &mut SqliteConnection, id: i32) -> RepositoryResult<Client> {
    load_clients(conn, &[id])?
        .remove(&id)
        .ok_or(RepositoryError::NotFound)
}

pub(crate) fn find_tag(
    conn: &mut SqliteConnection,
    name: &str,
) -> RepositoryResult<Option<DbTag>> {
    use crate::schema::tags;

    Ok(tags::table
        .filter(tags::name.eq(name))
        .first::<DbTag>(conn)
        .optional()?)
}

/// Create-if-absent on the unique tag name, then read the row back.
pub(crate) fn upsert_tag(conn: &mut SqliteConnection, tag: &NewTag) -> RepositoryResult<DbTag> {
    use crate::schema::tags;

    diesel::insert_into(tags::table)
        .values(DbNewTag::from(tag))
        .on_conflict(tags::name)
        .do_nothing()
        .execute(conn)?;

    find_tag(conn, tag.name.as_str())?.ok_or(RepositoryError::NotFound)
}

pub(crate) fn attach_tag(
    conn: &mut SqliteConnection,
    client_id: i32,
    tag_id: i32,
) -> RepositoryResult<usize> {
    use crate::schema::client_tags;

    Ok(diesel::insert_into(client_tags::table)
        .values(DbClientTag { client_id, tag_id })
        .on_conflict_do_nothing()
        .execute(conn)?)
}

pub(crate) fn detach_tag(
    conn: &mut SqliteConnection,
    client_id: i32,
    tag_id: i32,
) -> RepositoryResult<usize> {
    use crate::schema::client_tags;

    Ok(diesel::delete(
        client_tags::table
            .filter(client_tags::client_id.eq(client_id))
            .filter(client_tags::tag_id.eq(tag_id)),
    )
    .execute(conn)?)
}

impl ClientReader for DieselRepository {
    fn get_client_by_id(&self, id: ClientId) -> RepositoryResult<Option<Client>> {
        let mut conn = self.conn()?;
        Ok(load_clients(&mut conn, &[id.get()])?.remove(&id.get()))
    }

    fn get_tag_by_name(&self, name: &TagName) -> RepositoryResult<Option<Tag>> {
        let mut conn = self.conn()?;
        let tag = find_tag(&mut conn, name.as_str())?;
        Ok(tag.map(TryInto::try_into).transpose()?)
    }
}

impl ClientWriter for DieselRepository {
    fn create_client(&self, client: &NewClient) -> RepositoryResult<Client> {
        use crate::schema::clients;

        let mut conn = self.conn()?;

        let created = diesel::insert_into(clients::table)
            .values(DbNewClient::from(client))
            .get_result::<DbClient>(&mut conn)?;

        Ok(created.into_domain(vec![])?)
    }

    fn ensure_tag(&self, tag: &NewTag) -> RepositoryResult<Tag> {
        let mut conn = self.conn()?;
        let tag = conn.immediate_transaction(|conn| upsert_tag(conn, tag))?;
        Ok(tag.try_into()?)
    }

    fn add_client_tag(&self, id: ClientId, tag: &NewTag) -> RepositoryResult<Client> {
        let mut conn = self.conn()?;

        conn.immediate_transaction(|conn| {
            let client = load_client(conn, id.get())?;
            let tag = upsert_tag(conn, tag)?;
            attach_tag(conn, client.id.get(), tag.id)?;
            load_client(conn, id.get())
        })
    }

    fn remove_client_tag(&self, id: ClientId, name: &TagName) -> RepositoryResult<Client> {
        let mut conn = self.conn()?;

        conn.immediate_transaction(|conn| {
            let client = load_client(conn, id.get())?;
            if let Some(tag) = find_tag(conn, name.as_str())? {
                detach_tag(conn, client.id.get(), tag.id)?;
            }
            load_client(conn, id.get())
        })
    }
}
