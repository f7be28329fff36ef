use actix_web::{HttpResponse, Responder, get, post, put, web};
use serde::Deserialize;

use crate::forms::stylists::{StylistForm, StylistFormPayload};
use crate::repository::DieselRepository;
use crate::routes::error_response;
use crate::services::ServiceError;
use crate::services::stylists::{
    StylistListParams, create_stylist as create_stylist_service,
    list_stylists as list_stylists_service,
    show_stylist_appointments as show_stylist_appointments_service,
    update_stylist as update_stylist_service,
};

#[derive(Deserialize, Debug)]
pub struct PageParams {
    pub page: Option<usize>,
}

#[get("/v1/stylists")]
pub async fn list_stylists(
    params: web::Query<StylistListParams>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match list_stylists_service(params.into_inner(), repo.get_ref()) {
        Ok(stylists) => HttpResponse::Ok().json(stylists),
        Err(err) => error_response(err),
    }
}

#[post("/v1/stylists")]
pub async fn create_stylist(
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<StylistForm>,
) -> impl Responder {
    let payload: StylistFormPayload = match form.try_into() {
        Ok(payload) => payload,
        Err(e) => return error_response(ServiceError::from(e)),
    };

    match create_stylist_service(payload, repo.get_ref()) {
        Ok(stylist) => HttpResponse::Created().json(stylist),
        Err(err) => error_response(err),
    }
}

#[put("/v1/stylists/{stylist_id}")]
pub async fn update_stylist(
    stylist_id: web::Path<i32>,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<StylistForm>,
) -> impl Responder {
    let payload: StylistFormPayload = match form.try_into() {
        Ok(payload) => payload,
        Err(e) => return error_response(ServiceError::from(e)),
    };

    match update_stylist_service(stylist_id.into_inner(), payload, repo.get_ref()) {
        Ok(stylist) => HttpResponse::Ok().json(stylist),
        Err(err) => error_response(err),
    }
}

#[get("/v1/stylists/{stylist_id}/appointments")]
pub async fn show_stylist_appointments(
    stylist_id: web::Path<i32>,
    params: web::Query<PageParams>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match show_stylist_appointments_service(stylist_id.into_inner(), params.page, repo.get_ref())
    {
        Ok(appointments) => HttpResponse::Ok().json(appointments),
        Err(err) => error_response(err),
    }
}
