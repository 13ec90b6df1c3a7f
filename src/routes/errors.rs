//! Translation of failures into HTTP responses.
//!
//! Every handler returns [`ApiError`] on failure. The [`translate_errors`]
//! middleware renders it into an [`ErrorBody`] carrying the request path, so
//! handlers never build error responses themselves.

use actix_web::{
    HttpResponse, ResponseError,
    body::{BoxBody, MessageBody},
    dev::{ServiceRequest, ServiceResponse},
    error::{BlockingError, JsonPayloadError, PathError},
    http::StatusCode,
    middleware::Next,
};
use chrono::Utc;
use thiserror::Error;
use validator::ValidationErrors;

use crate::dto::client::REQUIRED_MESSAGE;
use crate::dto::errors::{ErrorBody, FieldMessage, field_messages};
use crate::services::ServiceError;

pub const VALIDATION_ERROR_MESSAGE: &str = "Dados inválidos";
pub const INTERNAL_ERROR_MESSAGE: &str = "Erro interno do servidor";
pub const INVALID_JSON_MESSAGE: &str = "JSON inválido";
pub const INVALID_CONTENT_TYPE_MESSAGE: &str = "Content-Type deve ser application/json";
pub const INVALID_BODY_MESSAGE: &str = "Corpo da requisição inválido";
pub const INVALID_ID_MESSAGE: &str = "Identificador inválido";
pub const INVALID_PARAMETERS_MESSAGE: &str = "Parâmetros inválidos";

#[derive(Debug, Error, PartialEq)]
pub enum ApiError {
    /// Input fields failed their declared constraints.
    #[error("validation failed")]
    Validation(Vec<FieldMessage>),

    /// The request could not be decoded at all.
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    IntegrityViolation(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Message placed in the `error` field of the response body.
    fn public_message(&self) -> String {
        match self {
            ApiError::Validation(_) => VALIDATION_ERROR_MESSAGE.to_string(),
            ApiError::Internal(_) => INTERNAL_ERROR_MESSAGE.to_string(),
            ApiError::BadRequest(message)
            | ApiError::NotFound(message)
            | ApiError::IntegrityViolation(message) => message.clone(),
        }
    }

    pub fn body(&self, path: &str) -> ErrorBody {
        let errors = match self {
            ApiError::Validation(fields) => Some(fields.clone()),
            _ => None,
        };

        ErrorBody {
            timestamp: Utc::now(),
            status: self.status_code().as_u16(),
            error: self.public_message(),
            path: path.to_string(),
            errors,
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::BadRequest(_) | ApiError::IntegrityViolation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Body without a path; [`translate_errors`] replaces it with the full one.
    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(self.body(""))
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::NotFound(message) => ApiError::NotFound(message),
            ServiceError::IntegrityViolation(message) => ApiError::IntegrityViolation(message),
            ServiceError::Internal(detail) => ApiError::Internal(detail),
        }
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        ApiError::Validation(field_messages(&errors))
    }
}

impl From<BlockingError> for ApiError {
    fn from(err: BlockingError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

/// Extracts `name` out of serde's "missing field `name`" message.
fn missing_field(message: &str) -> Option<&str> {
    let rest = message.strip_prefix("missing field `")?;
    rest.split('`').next().filter(|field| !field.is_empty())
}

impl From<JsonPayloadError> for ApiError {
    fn from(err: JsonPayloadError) -> Self {
        match err {
            JsonPayloadError::Deserialize(e) => {
                let message = e.to_string();
                match missing_field(&message) {
                    Some(field) => {
                        ApiError::Validation(vec![FieldMessage::new(field, REQUIRED_MESSAGE)])
                    }
                    None => {
                        log::warn!("Rejected JSON body: {message}");
                        ApiError::BadRequest(INVALID_JSON_MESSAGE.to_string())
                    }
                }
            }
            JsonPayloadError::ContentType => {
                ApiError::BadRequest(INVALID_CONTENT_TYPE_MESSAGE.to_string())
            }
            other => {
                log::warn!("Rejected request body: {other}");
                ApiError::BadRequest(INVALID_BODY_MESSAGE.to_string())
            }
        }
    }
}

impl From<PathError> for ApiError {
    fn from(err: PathError) -> Self {
        log::warn!("Rejected path: {err}");
        ApiError::BadRequest(INVALID_ID_MESSAGE.to_string())
    }
}

/// Rewrites every response produced from an [`ApiError`] into the uniform
/// error body, filling in the request path.
pub async fn translate_errors(
    req: ServiceRequest,
    next: Next<impl MessageBody + 'static>,
) -> Result<ServiceResponse<BoxBody>, actix_web::Error> {
    let res = next.call(req).await?;

    let translated = res
        .response()
        .error()
        .and_then(|err| err.as_error::<ApiError>())
        .map(|err| {
            let path = res.request().path();
            if let ApiError::Internal(detail) = err {
                log::error!("{} {path} failed: {detail}", res.request().method());
            }
            (err.status_code(), err.body(path))
        });

    match translated {
        Some((status, body)) => Ok(res.into_response(HttpResponse::build(status).json(body))),
        None => Ok(res.map_into_boxed_body()),
    }
}
