use actix_web::{HttpResponse, Responder, delete, get, post, put, web};

use crate::forms::appointments::{
    AddLineForm, AddLineFormPayload, BookAppointmentForm, BookAppointmentFormPayload,
    UpdateAppointmentForm, UpdateAppointmentFormPayload, UpdateLineForm, UpdateLineFormPayload,
};
use crate::repository::DieselRepository;
use crate::routes::error_response;
use crate::services::ServiceError;
use crate::services::appointments::{
    AppointmentListParams, add_line as add_line_service,
    book_appointment as book_appointment_service, cancel_appointment as cancel_service,
    confirm_appointment as confirm_service, delete_appointment as delete_appointment_service,
    finalize_appointment as finalize_service, get_appointment as get_appointment_service,
    list_appointments as list_appointments_service, remove_line as remove_line_service,
    update_appointment as update_appointment_service, update_line as update_line_service,
};

#[get("/v1/appointments")]
pub async fn list_appointments(
    params: web::Query<AppointmentListParams>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match list_appointments_service(params.into_inner(), repo.get_ref()) {
        Ok(appointments) => HttpResponse::Ok().json(appointments),
        Err(err) => error_response(err),
    }
}

#[post("/v1/appointments")]
pub async fn book_appointment(
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<BookAppointmentForm>,
) -> impl Responder {
    let payload: BookAppointmentFormPayload = match form.try_into() {
        Ok(payload) => payload,
        Err(e) => return error_response(ServiceError::from(e)),
    };

    match book_appointment_service(payload, repo.get_ref()) {
        Ok(appointment) => HttpResponse::Created().json(appointment),
        Err(err) => error_response(err),
    }
}

#[get("/v1/appointments/{appointment_id}")]
pub async fn show_appointment(
    appointment_id: web::Path<i32>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match get_appointment_service(appointment_id.into_inner(), repo.get_ref()) {
        Ok(appointment) => HttpResponse::Ok().json(appointment),
        Err(err) => error_response(err),
    }
}

#[put("/v1/appointments/{appointment_id}")]
pub async fn update_appointment(
    appointment_id: web::Path<i32>,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<UpdateAppointmentForm>,
) -> impl Responder {
    let payload: UpdateAppointmentFormPayload = match form.try_into() {
        Ok(payload) => payload,
        Err(e) => return error_response(ServiceError::from(e)),
    };

    match update_appointment_service(appointment_id.into_inner(), payload, repo.get_ref()) {
        Ok(appointment) => HttpResponse::Ok().json(appointment),
        Err(err) => error_response(err),
    }
}

#[delete("/v1/appointments/{appointment_id}")]
pub async fn delete_appointment(
    appointment_id: web::Path<i32>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match delete_appointment_service(appointment_id.into_inner(), repo.get_ref()) {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(err) => error_response(err),
    }
}

#[post("/v1/appointments/{appointment_id}/confirm")]
pub async fn confirm_appointment(
    appointment_id: web::Path<i32>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match confirm_service(appointment_id.into_inner(), repo.get_ref()) {
        Ok(appointment) => HttpResponse::Ok().json(appointment),
        Err(err) => error_response(err),
    }
}

#[post("/v1/appointments/{appointment_id}/finalize")]
pub async fn finalize_appointment(
    appointment_id: web::Path<i32>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match finalize_service(appointment_id.into_inner(), repo.get_ref()) {
        Ok(appointment) => HttpResponse::Ok().json(appointment),
        Err(err) => error_response(err),
    }
}

#[post("/v1/appointments/{appointment_id}/cancel")]
pub async fn cancel_appointment(
    appointment_id: web::Path<i32>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match cancel_service(appointment_id.into_inner(), repo.get_ref()) {
        Ok(appointment) => HttpResponse::Ok().json(appointment),
        Err(err) => error_response(err),
    }
}

#[post("/v1/appointments/{appointment_id}/lines")]
pub async fn add_line(
    appointment_id: web::Path<i32>,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<AddLineForm>,
) -> impl Responder {
    let payload: AddLineFormPayload = match form.try_into() {
        Ok(payload) => payload,
        Err(e) => return error_response(ServiceError::from(e)),
    };

    match add_line_service(appointment_id.into_inner(), payload, repo.get_ref()) {
        Ok(appointment) => HttpResponse::Created().json(appointment),
        Err(err) => error_response(err),
    }
}

#[put("/v1/appointment-lines/{line_id}")]
pub async fn update_line(
    line_id: web::Path<i32>,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<UpdateLineForm>,
) -> impl Responder {
    let payload: UpdateLineFormPayload = match form.try_into() {
        Ok(payload) => payload,
        Err(e) => return error_response(ServiceError::from(e)),
    };

    match update_line_service(line_id.into_inner(), payload, repo.get_ref()) {
        Ok(appointment) => HttpResponse::Ok().json(appointment),
        Err(err) => error_response(err),
    }
}

#[delete("/v1/appointment-lines/{line_id}")]
pub async fn remove_line(
    line_id: web::Path<i32>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match remove_line_service(line_id.into_inner(), repo.get_ref()) {
        Ok(appointment) => HttpResponse::Ok().json(appointment),
        Err(err) => error_response(err),
    }
}
