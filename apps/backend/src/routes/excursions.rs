//! Excursion HTTP routes.
//!
//! Every response uses the `{ error, data, message }` envelope. The two
//! mutating ownership paths (create, delete) hand the raw bearer token to the
//! synchronizer, which performs verification, identity resolution, and the
//! ordered store writes itself.

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use uuid::Uuid;

use crate::extractors::auth_token::AuthToken;
use crate::http::envelope::Envelope;
use crate::services::excursions::ExcursionService;
use crate::state::app_state::AppState;
use crate::AppError;

#[derive(Debug, Deserialize)]
pub struct ExcursionBody {
    pub name: String,
}

/// GET /api/excursions/all
///
/// Public listing of every excursion record; no token required.
async fn list_all(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let excursions = app_state.store.list_all_excursions().await?;
    Ok(HttpResponse::Ok().json(Envelope::success(
        excursions,
        "Successfully retrieved all excursion data.",
    )))
}

/// GET /api/excursions
///
/// The authenticated caller's profile with owned excursions expanded.
async fn get_user_view(
    token: AuthToken,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let view = ExcursionService::from_state(&app_state)
        .user_view(&token.token)
        .await?;
    Ok(HttpResponse::Ok().json(Envelope::success(
        view,
        "Successfully retrieved user's excursions.",
    )))
}

/// GET /api/excursions/{id}
async fn get_one(
    path: web::Path<Uuid>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let excursion = app_state
        .store
        .get_excursion(id)
        .await?
        .ok_or_else(|| {
            AppError::not_found("EXCURSION_NOT_FOUND", format!("No excursion with id {id}"))
        })?;
    Ok(HttpResponse::Ok().json(Envelope::success(
        excursion,
        "Successfully retrieved excursion data.",
    )))
}

/// POST /api/excursions
///
/// Create an excursion owned by the token's subject. Returns 201 with the
/// owner's refreshed view.
async fn create(
    token: AuthToken,
    body: web::Json<ExcursionBody>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let view = ExcursionService::from_state(&app_state)
        .create_excursion(&token.token, &body.name)
        .await?;
    Ok(HttpResponse::Created().json(Envelope::success(
        view,
        "Successfully added new excursion.",
    )))
}

/// PUT /api/excursions/{id}
///
/// Rename an excursion. Touches only the excursion collection, so it cannot
/// break the ownership link; a valid token is still required.
async fn rename(
    token: AuthToken,
    path: web::Path<Uuid>,
    body: web::Json<ExcursionBody>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let excursion = ExcursionService::from_state(&app_state)
        .rename_excursion(&token.token, path.into_inner(), &body.name)
        .await?;
    Ok(HttpResponse::Ok().json(Envelope::success(
        excursion,
        "Successfully updated excursion data.",
    )))
}

/// DELETE /api/excursions/{id}
///
/// Delete an excursion and detach it from the token's subject. Returns the
/// owner's refreshed view.
async fn delete_one(
    token: AuthToken,
    path: web::Path<Uuid>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let view = ExcursionService::from_state(&app_state)
        .delete_excursion(&token.token, path.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(Envelope::success(
        view,
        "Successfully deleted excursion data.",
    )))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    // "/all" must be registered ahead of "/{id}" so it is not captured as an id.
    cfg.service(web::resource("/all").route(web::get().to(list_all)));
    cfg.service(
        web::resource("")
            .route(web::get().to(get_user_view))
            .route(web::post().to(create)),
    );
    cfg.service(
        web::resource("/{id}")
            .route(web::get().to(get_one))
            .route(web::put().to(rename))
            .route(web::delete().to(delete_one)),
    );
}
