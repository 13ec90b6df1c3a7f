use actix_web::{HttpRequest, HttpResponse, delete, get, http::header, post, put, web};
use validator::Validate;

use crate::domain::types::ClientId;
use crate::dto::client::{ClientDto, ClientsQuery};
use crate::repository::DieselRepository;
use crate::routes::errors::{ApiError, INVALID_PARAMETERS_MESSAGE};
use crate::services::client as client_service;
use crate::services::errors::{NOT_FOUND_BY_ID_MESSAGE, NOT_FOUND_MESSAGE};

/// Ids outside the storable range cannot name a client, so they are reported
/// as missing rather than malformed.
fn existing_id(raw: i64, not_found: &str) -> Result<ClientId, ApiError> {
    i32::try_from(raw)
        .ok()
        .and_then(|id| ClientId::new(id).ok())
        .ok_or_else(|| ApiError::NotFound(not_found.to_string()))
}

#[get("/clients")]
pub async fn list_clients(
    req: HttpRequest,
    repo: web::Data<DieselRepository>,
) -> Result<HttpResponse, ApiError> {
    let params: ClientsQuery = serde_html_form::from_str(req.query_string())
        .map_err(|e| {
            log::warn!("Rejected query string {:?}: {e}", req.query_string());
            ApiError::BadRequest(INVALID_PARAMETERS_MESSAGE.to_string())
        })?;
    let query = params.into_list_query().map_err(ApiError::Validation)?;

    let page = web::block(move || client_service::list_clients(repo.get_ref(), query)).await??;

    Ok(HttpResponse::Ok().json(page))
}

#[get("/clients/{id}")]
pub async fn show_client(
    client_id: web::Path<i64>,
    repo: web::Data<DieselRepository>,
) -> Result<HttpResponse, ApiError> {
    let client_id = existing_id(client_id.into_inner(), NOT_FOUND_BY_ID_MESSAGE)?;

    let client = web::block(move || client_service::get_client(repo.get_ref(), client_id)).await??;

    Ok(HttpResponse::Ok().json(client))
}

#[post("/clients")]
pub async fn create_client(
    repo: web::Data<DieselRepository>,
    web::Json(dto): web::Json<ClientDto>,
) -> Result<HttpResponse, ApiError> {
    dto.validate()?;

    let created = web::block(move || client_service::create_client(repo.get_ref(), dto)).await??;

    let mut response = HttpResponse::Created();
    if let Some(id) = created.id {
        response.insert_header((header::LOCATION, format!("/clients/{id}")));
    }
    Ok(response.json(created))
}

#[put("/clients/{id}")]
pub async fn update_client(
    client_id: web::Path<i64>,
    repo: web::Data<DieselRepository>,
    web::Json(dto): web::Json<ClientDto>,
) -> Result<HttpResponse, ApiError> {
    dto.validate()?;
    let client_id = existing_id(client_id.into_inner(), NOT_FOUND_MESSAGE)?;

    let updated =
        web::block(move || client_service::update_client(repo.get_ref(), client_id, dto))
            .await??;

    Ok(HttpResponse::Ok().json(updated))
}

#[delete("/clients/{id}")]
pub async fn delete_client(
    client_id: web::Path<i64>,
    repo: web::Data<DieselRepository>,
) -> Result<HttpResponse, ApiError> {
    let client_id = existing_id(client_id.into_inner(), NOT_FOUND_MESSAGE)?;

    web::block(move || client_service::delete_client(repo.get_ref(), client_id)).await??;

    Ok(HttpResponse::NoContent().finish())
}
