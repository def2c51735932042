use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use domain_certification::exception::CertificationException;
use serde::Serialize;

pub type ApiResult<T> = Result<T, ApiError>;

/// Service outcome → transport mapping: not-found 404, duplicate ticket 409,
/// exhausted tickets 422, malformed input 400, everything else 500 with the
/// machine-readable code in the body.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    code: &'static str,
    message: String,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    code: &'a str,
    message: &'a str,
}

impl ApiError {
    pub fn bad_request(message: String) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            code: "validation_error",
            message,
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl From<CertificationException> for ApiError {
    fn from(e: CertificationException) -> Self {
        let status = match &e {
            CertificationException::TicketNotFound { .. }
            | CertificationException::OrderNotFound { .. } => StatusCode::NOT_FOUND,
            CertificationException::DuplicateTicket { .. } => StatusCode::CONFLICT,
            CertificationException::NoTicketsAvailable => StatusCode::UNPROCESSABLE_ENTITY,
            CertificationException::WriteTimeout { .. }
            | CertificationException::StoreUnavailable { .. }
            | CertificationException::SheetNotFound { .. }
            | CertificationException::RowIndexInvalid { .. }
            | CertificationException::InternalError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("{e}");
        }
        Self {
            status,
            code: e.code(),
            message: e.to_string(),
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        self.status
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status).json(ErrorBody {
            code: self.code,
            message: &self.message,
        })
    }
}
