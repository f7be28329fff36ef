//! JSON HTTP endpoints.
//!
//! Handlers stay thin: they parse the request into a form payload, call the
//! matching service function and translate [`ServiceError`] into a status code.

use actix_web::{HttpResponse, error, web};
use serde::Serialize;

use crate::services::ServiceError;

pub mod appointments;
pub mod catalog;
pub mod clients;
pub mod stylists;

/// Body returned with every error status.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

pub fn error_response(err: ServiceError) -> HttpResponse {
    let body = ErrorBody {
        error: err.to_string(),
    };
    match err {
        ServiceError::NotFound => HttpResponse::NotFound().json(body),
        ServiceError::Form(_) | ServiceError::TypeConstraint(_) | ServiceError::Validation(_) => {
            HttpResponse::UnprocessableEntity().json(body)
        }
        ServiceError::Conflict(_) => HttpResponse::Conflict().json(body),
        ServiceError::Internal => HttpResponse::InternalServerError().json(body),
    }
}

/// Malformed JSON bodies are reported like any other validation failure.
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        let response = HttpResponse::UnprocessableEntity().json(ErrorBody {
            error: err.to_string(),
        });
        error::InternalError::from_response(err, response).into()
    })
}

/// Register every endpoint of the salon API.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .service(catalog::list_services)
        .service(catalog::create_service)
        .service(catalog::update_service)
        .service(stylists::list_stylists)
        .service(stylists::create_stylist)
        .service(stylists::update_stylist)
        .service(stylists::show_stylist_appointments)
        .service(clients::create_client)
        .service(clients::add_client_tag)
        .service(clients::remove_client_tag)
        .service(appointments::list_appointments)
        .service(appointments::book_appointment)
        .service(appointments::show_appointment)
        .service(appointments::update_appointment)
        .service(appointments::delete_appointment)
        .service(appointments::confirm_appointment)
        .service(appointments::finalize_appointment)
        .service(appointments::cancel_appointment)
        .service(appointments::add_line)
        .service(appointments::update_line)
        .service(appointments::remove_line);
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;

    use super::*;

    #[test]
    fn maps_service_errors_to_statuses() {
        let cases = [
            (ServiceError::NotFound, StatusCode::NOT_FOUND),
            (
                ServiceError::Validation("cannot cancel a draft appointment".into()),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                ServiceError::Form("Booking form validation failed".into()),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                ServiceError::Conflict("duplicate".into()),
                StatusCode::CONFLICT,
            ),
            (ServiceError::Internal, StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (err, status) in cases {
            assert_eq!(error_response(err).status(), status);
        }
    }
}
