use actix_web::{HttpResponse, Responder, delete, post, web};

use crate::forms::clients::{
    AddClientForm, AddClientFormPayload, ClientTagForm, ClientTagFormPayload,
};
use crate::repository::DieselRepository;
use crate::routes::error_response;
use crate::services::ServiceError;
use crate::services::clients::{
    add_client_tag as add_client_tag_service, create_client as create_client_service,
    remove_client_tag as remove_client_tag_service,
};

#[post("/v1/clients")]
pub async fn create_client(
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<AddClientForm>,
) -> impl Responder {
    let payload: AddClientFormPayload = match form.try_into() {
        Ok(payload) => payload,
        Err(e) => return error_response(ServiceError::from(e)),
    };

    match create_client_service(payload, repo.get_ref()) {
        Ok(client) => HttpResponse::Created().json(client),
        Err(err) => error_response(err),
    }
}

#[post("/v1/clients/{client_id}/tags")]
pub async fn add_client_tag(
    client_id: web::Path<i32>,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<ClientTagForm>,
) -> impl Responder {
    let payload: ClientTagFormPayload = match form.try_into() {
        Ok(payload) => payload,
        Err(e) => return error_response(ServiceError::from(e)),
    };

    match add_client_tag_service(client_id.into_inner(), payload, repo.get_ref()) {
        Ok(client) => HttpResponse::Ok().json(client),
        Err(err) => error_response(err),
    }
}

#[delete("/v1/clients/{client_id}/tags/{name}")]
pub async fn remove_client_tag(
    path: web::Path<(i32, String)>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let (client_id, name) = path.into_inner();
    match remove_client_tag_service(client_id, &name, repo.get_ref()) {
        Ok(client) => HttpResponse::Ok().json(client),
        Err(err) => error_response(err),
    }
}
