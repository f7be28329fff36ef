use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::client::{
    Client as DomainClient, NewClient as DomainNewClient, NewTag as DomainNewTag,
    Tag as DomainTag,
};
use crate::domain::types::{ClientName, TagName, TypeConstraintError};

/// Diesel model representing the `clients` table.
#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::clients)]
pub struct Client {
    pub id: i32,
    pub name: String,
    pub is_company: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::clients)]
pub struct NewClient {
    pub name: String,
    pub is_company: bool,
}

/// Diesel model representing the `tags` table.
#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::tags)]
pub struct Tag {
    pub id: i32,
    pub name: String,
    pub color: i32,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::tags)]
pub struct NewTag {
    pub name: String,
    pub color: i32,
}

/// Membership row of the `client_tags` join table.
#[derive(Debug, Clone, Copy, Insertable, Queryable)]
#[diesel(table_name = crate::schema::client_tags)]
pub struct ClientTag {
    pub client_id: i32,
    pub tag_id: i32,
}

impl TryFrom<Tag> for DomainTag {
    type Error = TypeConstraintError;

    fn try_from(tag: Tag) -> Result<Self, Self::Error> {
        Ok(Self {
            id: tag.id.try_into()?,
            name: TagName::new(tag.name)?,
            color: tag.color,
        })
    }
}

impl Client {
    /// Convert into the domain client carrying the supplied tags.
    pub fn into_domain(self, tags: Vec<Tag>) -> Result<DomainClient, TypeConstraintError> {
        Ok(DomainClient {
            id: self.id.try_into()?,
            name: ClientName::new(self.name)?,
            is_company: self.is_company,
            tags: tags
                .into_iter()
                .map(TryInto::try_into)
                .collect::<Result<Vec<_>, _>>()?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl From<&DomainNewClient> for NewClient {
    fn from(client: &DomainNewClient) -> Self {
        Self {
            name: client.name.as_str().to_string(),
            is_company: client.is_company,
        }
    }
}

impl From<&DomainNewTag> for NewTag {
    fn from(tag: &DomainNewTag) -> Self {
        Self {
            name: tag.name.as_str().to_string(),
            color: tag.color,
        }
    }
}
