use axum::{Json, extract::State, extract::rejection::JsonRejection};

use crate::audit_log;
use crate::core::ServerState;
use crate::db::repository::homepage;
use crate::utils::AppResult;
use crate::utils::validation::{MAX_DESCRIPTION_LEN, MAX_NAME_LEN, validate_optional_text};
use shared::models::{Homepage, HomepageUpdate};

/// GET /api/homepage
pub async fn get(State(state): State<ServerState>) -> AppResult<Json<Homepage>> {
    let homepage = homepage::find(state.pool()).await?.unwrap_or_default();
    Ok(Json(homepage))
}

/// PUT /api/homepage
pub async fn update(
    State(state): State<ServerState>,
    payload: Result<Json<HomepageUpdate>, JsonRejection>,
) -> AppResult<Json<Homepage>> {
    let Json(data) = payload?;
    validate_optional_text(&data.title, "title", MAX_NAME_LEN)?;
    validate_optional_text(&data.description, "description", MAX_DESCRIPTION_LEN)?;

    let homepage = homepage::upsert(state.pool(), &data).await?;

    audit_log!("update", "homepage:1", &homepage.title);
    Ok(Json(homepage))
}
