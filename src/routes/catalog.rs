use actix_web::{HttpResponse, Responder, get, post, put, web};

use crate::forms::services::{ServiceForm, ServiceFormPayload};
use crate::repository::DieselRepository;
use crate::routes::error_response;
use crate::services::ServiceError;
use crate::services::catalog::{
    ServiceListParams, create_service as create_service_service,
    list_services as list_services_service, update_service as update_service_service,
};

#[get("/v1/services")]
pub async fn list_services(
    params: web::Query<ServiceListParams>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match list_services_service(params.into_inner(), repo.get_ref()) {
        Ok(services) => HttpResponse::Ok().json(services),
        Err(err) => error_response(err),
    }
}

#[post("/v1/services")]
pub async fn create_service(
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<ServiceForm>,
) -> impl Responder {
    let payload: ServiceFormPayload = match form.try_into() {
        Ok(payload) => payload,
        Err(e) => return error_response(ServiceError::from(e)),
    };

    match create_service_service(payload, repo.get_ref()) {
        Ok(service) => HttpResponse::Created().json(service),
        Err(err) => error_response(err),
    }
}

#[put("/v1/services/{service_id}")]
pub async fn update_service(
    service_id: web::Path<i32>,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<ServiceForm>,
) -> impl Responder {
    let payload: ServiceFormPayload = match form.try_into() {
        Ok(payload) => payload,
        Err(e) => return error_response(ServiceError::from(e)),
    };

    match update_service_service(service_id.into_inner(), payload, repo.get_ref()) {
        Ok(service) => HttpResponse::Ok().json(service),
        Err(err) => error_response(err),
    }
}
