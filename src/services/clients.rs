use crate::domain::client::Client;
use crate::domain::types::{ClientId, TagName};
use crate::forms::clients::{AddClientFormPayload, ClientTagFormPayload};
use crate::repository::ClientWriter;

use super::{ServiceError, ServiceResult, repository_failure};

pub fn create_client<R>(payload: AddClientFormPayload, repo: &R) -> ServiceResult<Client>
where
    R: ClientWriter,
{
    repo.create_client(&payload.into_new_client())
        .map_err(|e| repository_failure("create client", e))
}

/// Attach a tag to a client, registering the tag first if it is new.
pub fn add_client_tag<R>(
    client_id: i32,
    payload: ClientTagFormPayload,
    repo: &R,
) -> ServiceResult<Client>
where
    R: ClientWriter,
{
    let client_id = ClientId::new(client_id).map_err(|_| ServiceError::NotFound)?;
    repo.add_client_tag(client_id, &payload.tag)
        .map_err(|e| repository_failure("tag client", e))
}

pub fn remove_client_tag<R>(client_id: i32, name: &str, repo: &R) -> ServiceResult<Client>
where
    R: ClientWriter,
{
    let client_id = ClientId::new(client_id).map_err(|_| ServiceError::NotFound)?;
    let name = TagName::new(name)?;
    repo.remove_client_tag(client_id, &name)
        .map_err(|e| repository_failure("untag client", e))
}
