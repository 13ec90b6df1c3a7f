//! HTTP boundary of the service.

use actix_web::{HttpResponse, web};

use crate::routes::client::{create_client, delete_client, list_clients, show_client, update_client};
use crate::routes::errors::ApiError;
use crate::services::errors::NOT_FOUND_MESSAGE;

pub mod client;
pub mod errors;

/// Registers the client endpoints and the extractor configuration that routes
/// decoding failures through [`ApiError`].
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| ApiError::from(err).into()))
        .app_data(web::PathConfig::default().error_handler(|err, _req| ApiError::from(err).into()))
        .service(list_clients)
        .service(show_client)
        .service(create_client)
        .service(update_client)
        .service(delete_client);
}

/// Fallback for requests that match no route.
pub async fn route_not_found() -> Result<HttpResponse, ApiError> {
    Err(ApiError::NotFound(NOT_FOUND_MESSAGE.to_string()))
}
