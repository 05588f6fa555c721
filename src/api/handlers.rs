// Request handlers for API endpoints

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, error, info, warn};

use crate::api::middleware::{request_id, route_context};
use crate::api::responses::{ApiError, HealthResponse};
use crate::api::AppState;
use crate::auth::audit_logger::ClientInfo;
use crate::auth::password::Password;
use crate::auth::token_issuer::IssuedToken;
use crate::core::constants::{messages, session};
use crate::core::errors::CampError;
use crate::core::models::{Camp, CampModel, CredentialModel, SpeakerModel, TalkModel};
use crate::mapping::url::RouteLinker;
use crate::mapping::{apply_update, from_view, EntityProjector};

/// Resolver for links in this request's responses
fn linker(app_state: &AppState, headers: &HeaderMap) -> RouteLinker {
    RouteLinker::new(
        app_state.route_table.clone(),
        route_context(headers, app_state.config.public_base_url.as_ref()),
    )
}

/// Log by severity and convert to an HTTP error
fn fail(err: CampError, request_id: &str) -> ApiError {
    if err.status_code() >= 500 {
        error!(error = %err, request_id = %request_id, "Request failed");
    } else {
        debug!(error = %err, request_id = %request_id, "Request rejected");
    }
    ApiError::from_camp_error_with_id(err, request_id)
}

fn camp_not_found(camp_id: i32) -> CampError {
    CampError::NotFound(format!("Camp {} was not found.", camp_id))
}

fn camp_missing_for_write(camp_id: i32) -> CampError {
    CampError::NotFound(format!("Could not find a camp with an ID of {}", camp_id))
}

/// POST /api/auth/token
///
/// Every failure is reported as the same 400 so callers cannot tell an
/// unknown user from a wrong password.
pub async fn create_token_handler(
    State(app_state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<CredentialModel>, JsonRejection>,
) -> Result<Json<IssuedToken>, ApiError> {
    let Json(credentials) = body.map_err(|rejection| {
        debug!(error = %rejection, "Unreadable token request body");
        ApiError::bad_request(messages::TOKEN_FAILED)
    })?;
    let client = ClientInfo::from_headers(&headers);
    let password = Password::new(&credentials.password);

    app_state
        .token_issuer
        .issue_for_credentials(&credentials.user_name, &password, &client)
        .await
        .map(Json)
        .map_err(|_| ApiError::bad_request(messages::TOKEN_FAILED))
}

/// POST /api/auth/login
pub async fn login_handler(
    State(app_state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<CredentialModel>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(credentials) = body.map_err(|rejection| {
        debug!(error = %rejection, "Unreadable login request body");
        ApiError::bad_request(messages::LOGIN_FAILED)
    })?;
    let client = ClientInfo::from_headers(&headers);
    let password = Password::new(&credentials.password);

    let ticket = app_state
        .sessions
        .sign_in(&credentials.user_name, &password, &client)
        .await
        .map_err(|_| ApiError::bad_request(messages::LOGIN_FAILED))?;

    Ok((StatusCode::OK, [(session::SESSION_HEADER, ticket.session_id)]).into_response())
}

/// GET /api/camps
pub async fn list_camps_handler(
    State(app_state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<CampModel>>, ApiError> {
    let request_id = request_id(&headers);

    let camps = app_state
        .repository
        .list_camps()
        .await
        .map_err(|e| fail(e, &request_id))?;

    let linker = linker(&app_state, &headers);
    let views = EntityProjector::new(&linker)
        .to_views(&camps)
        .map_err(|e| fail(e, &request_id))?;

    Ok(Json(views))
}

/// Query string of `GET /api/camps/:camp_id`
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CampQuery {
    pub include_speakers: bool,
}

/// GET /api/camps/:camp_id[?includeSpeakers=true]
pub async fn get_camp_handler(
    State(app_state): State<AppState>,
    Path(camp_id): Path<i32>,
    Query(query): Query<CampQuery>,
    headers: HeaderMap,
) -> Result<Json<CampModel>, ApiError> {
    let request_id = request_id(&headers);
    let repository = &app_state.repository;

    let (camp, speakers) = if query.include_speakers {
        repository
            .get_camp_with_speakers(camp_id)
            .await
            .map_err(|e| fail(e, &request_id))?
            .ok_or_else(|| fail(camp_not_found(camp_id), &request_id))?
    } else {
        let camp = repository
            .get_camp(camp_id)
            .await
            .map_err(|e| fail(e, &request_id))?
            .ok_or_else(|| fail(camp_not_found(camp_id), &request_id))?;
        (camp, Vec::new())
    };

    let linker = linker(&app_state, &headers);
    let projector = EntityProjector::new(&linker);
    let mut view = projector.to_view(&camp).map_err(|e| fail(e, &request_id))?;
    view.speakers = projector
        .to_views(&speakers)
        .map_err(|e| fail(e, &request_id))?;

    Ok(Json(view))
}

/// POST /api/camps
///
/// Responds 201 with a `Location` header pointing at the new camp.
pub async fn create_camp_handler(
    State(app_state): State<AppState>,
    headers: HeaderMap,
    Json(model): Json<CampModel>,
) -> Result<Response, ApiError> {
    let request_id = request_id(&headers);
    let linker = linker(&app_state, &headers);
    linker.origin().map_err(|e| fail(e, &request_id))?;

    let camp = from_view(&model, Camp::default()).map_err(|e| fail(e, &request_id))?;

    let stored = app_state
        .repository
        .add_camp(camp)
        .await
        .map_err(|e| fail(e, &request_id))?;

    info!(camp_id = stored.id, request_id = %request_id, "Camp created");

    let view = EntityProjector::new(&linker)
        .to_view(&stored)
        .map_err(|e| fail(e, &request_id))?;

    Ok((StatusCode::CREATED, [(header::LOCATION, view.url.clone())], Json(view)).into_response())
}

/// PUT /api/camps/:camp_id
///
/// Partial update: omitted or empty fields keep their stored values.
pub async fn update_camp_handler(
    State(app_state): State<AppState>,
    Path(camp_id): Path<i32>,
    headers: HeaderMap,
    Json(model): Json<CampModel>,
) -> Result<Json<CampModel>, ApiError> {
    let request_id = request_id(&headers);
    let linker = linker(&app_state, &headers);
    linker.origin().map_err(|e| fail(e, &request_id))?;

    let mut camp = app_state
        .repository
        .get_camp(camp_id)
        .await
        .map_err(|e| fail(e, &request_id))?
        .ok_or_else(|| fail(camp_missing_for_write(camp_id), &request_id))?;

    apply_update(&model, &mut camp).map_err(|e| fail(e, &request_id))?;

    app_state
        .repository
        .update_camp(camp.clone())
        .await
        .map_err(|e| fail(e, &request_id))?;

    info!(camp_id = camp_id, request_id = %request_id, "Camp updated");

    let view = EntityProjector::new(&linker)
        .to_view(&camp)
        .map_err(|e| fail(e, &request_id))?;

    Ok(Json(view))
}

/// DELETE /api/camps/:camp_id
pub async fn delete_camp_handler(
    State(app_state): State<AppState>,
    Path(camp_id): Path<i32>,
    headers: HeaderMap,
) -> Result<StatusCode, ApiError> {
    let request_id = request_id(&headers);

    let deleted = app_state
        .repository
        .delete_camp(camp_id)
        .await
        .map_err(|e| fail(e, &request_id))?;

    if !deleted {
        return Err(fail(camp_missing_for_write(camp_id), &request_id));
    }

    info!(camp_id = camp_id, request_id = %request_id, "Camp deleted");
    Ok(StatusCode::OK)
}

/// GET /api/camps/:camp_id/speakers
pub async fn list_speakers_handler(
    State(app_state): State<AppState>,
    Path(camp_id): Path<i32>,
    headers: HeaderMap,
) -> Result<Json<Vec<SpeakerModel>>, ApiError> {
    let request_id = request_id(&headers);
    let repository = &app_state.repository;

    if repository
        .get_camp(camp_id)
        .await
        .map_err(|e| fail(e, &request_id))?
        .is_none()
    {
        return Err(fail(camp_not_found(camp_id), &request_id));
    }

    let speakers = repository
        .list_speakers(camp_id)
        .await
        .map_err(|e| fail(e, &request_id))?;

    let linker = linker(&app_state, &headers);
    let views = EntityProjector::new(&linker)
        .to_views(&speakers)
        .map_err(|e| fail(e, &request_id))?;

    Ok(Json(views))
}

/// GET /api/camps/:camp_id/speakers/:speaker_id
pub async fn get_speaker_handler(
    State(app_state): State<AppState>,
    Path((camp_id, speaker_id)): Path<(i32, i32)>,
    headers: HeaderMap,
) -> Result<Json<SpeakerModel>, ApiError> {
    let request_id = request_id(&headers);

    let speaker = app_state
        .repository
        .get_speaker(camp_id, speaker_id)
        .await
        .map_err(|e| fail(e, &request_id))?
        .ok_or_else(|| {
            fail(
                CampError::NotFound(format!("Speaker {} was not found.", speaker_id)),
                &request_id,
            )
        })?;

    let linker = linker(&app_state, &headers);
    let view = EntityProjector::new(&linker)
        .to_view(&speaker)
        .map_err(|e| fail(e, &request_id))?;

    Ok(Json(view))
}

/// GET /api/camps/:camp_id/speakers/:speaker_id/talks
pub async fn list_talks_handler(
    State(app_state): State<AppState>,
    Path((camp_id, speaker_id)): Path<(i32, i32)>,
    headers: HeaderMap,
) -> Result<Json<Vec<TalkModel>>, ApiError> {
    let request_id = request_id(&headers);
    let repository = &app_state.repository;

    if repository
        .get_speaker(camp_id, speaker_id)
        .await
        .map_err(|e| fail(e, &request_id))?
        .is_none()
    {
        return Err(fail(
            CampError::NotFound(format!("Speaker {} was not found.", speaker_id)),
            &request_id,
        ));
    }

    let talks = repository
        .list_talks(camp_id, speaker_id)
        .await
        .map_err(|e| fail(e, &request_id))?;

    let linker = linker(&app_state, &headers);
    let views = EntityProjector::new(&linker)
        .to_views(&talks)
        .map_err(|e| fail(e, &request_id))?;

    Ok(Json(views))
}

/// GET /api/camps/:camp_id/speakers/:speaker_id/talks/:talk_id
pub async fn get_talk_handler(
    State(app_state): State<AppState>,
    Path((camp_id, speaker_id, talk_id)): Path<(i32, i32, i32)>,
    headers: HeaderMap,
) -> Result<Json<TalkModel>, ApiError> {
    let request_id = request_id(&headers);

    let talk = app_state
        .repository
        .get_talk(camp_id, speaker_id, talk_id)
        .await
        .map_err(|e| fail(e, &request_id))?
        .ok_or_else(|| {
            fail(
                CampError::NotFound(format!("Talk {} was not found.", talk_id)),
                &request_id,
            )
        })?;

    let linker = linker(&app_state, &headers);
    let view = EntityProjector::new(&linker)
        .to_view(&talk)
        .map_err(|e| fail(e, &request_id))?;

    Ok(Json(view))
}

/// GET /health
///
/// Always 200 while the process is serving; the store check is informational.
pub async fn health_handler(State(app_state): State<AppState>) -> Json<HealthResponse> {
    let store = match tokio::time::timeout(
        Duration::from_millis(500),
        app_state.repository.list_camps(),
    )
    .await
    {
        Ok(Ok(_)) => "ok".to_string(),
        Ok(Err(e)) => {
            warn!(error = %e, "Store check failed");
            "unavailable".to_string()
        }
        Err(_) => {
            debug!("Store check timed out in health check");
            "slow: timeout".to_string()
        }
    };

    Json(HealthResponse {
        status: "healthy".to_string(),
        store,
    })
}
