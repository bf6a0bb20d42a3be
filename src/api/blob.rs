//! Remote blob store endpoints.
//!
//! One document per user, addressed by the `userId` query parameter and
//! overwritten wholesale on every save. The payload is opaque JSON: the
//! server never validates the document shape.

use axum::{extract::Query, extract::State, http::StatusCode, response::IntoResponse, Json};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::models::blob::{ActiveModel, Entity as UserBlobEntity};

#[derive(Debug, Deserialize)]
pub struct BlobParams {
    #[serde(rename = "userId")]
    pub user_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SaveBlobRequest {
    #[serde(default)]
    pub data: Value,
}

fn missing_user_id() -> (StatusCode, Json<Value>) {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({"error": "userId is required"})),
    )
}

#[utoipa::path(
    get,
    path = "/api/blob",
    params(("userId" = String, Query, description = "Opaque user identifier")),
    responses(
        (status = 200, description = "The stored document, or null"),
        (status = 400, description = "Missing userId")
    )
)]
pub async fn get_blob(
    State(db): State<DatabaseConnection>,
    Query(params): Query<BlobParams>,
) -> impl IntoResponse {
    let Some(user_id) = params.user_id else {
        return missing_user_id().into_response();
    };

    match UserBlobEntity::find_by_id(user_id).one(&db).await {
        Ok(Some(row)) => match serde_json::from_str::<Value>(&row.data) {
            Ok(data) => (StatusCode::OK, Json(json!({"data": data}))).into_response(),
            Err(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": format!("Stored document is unreadable: {}", e)})),
            )
                .into_response(),
        },
        Ok(None) => (StatusCode::OK, Json(json!({"data": null}))).into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"error": e.to_string()})),
        )
            .into_response(),
    }
}

#[utoipa::path(
    post,
    path = "/api/blob",
    params(("userId" = String, Query, description = "Opaque user identifier")),
    responses(
        (status = 200, description = "Document stored"),
        (status = 400, description = "Missing userId")
    )
)]
pub async fn save_blob(
    State(db): State<DatabaseConnection>,
    Query(params): Query<BlobParams>,
    Json(req): Json<SaveBlobRequest>,
) -> impl IntoResponse {
    let Some(user_id) = params.user_id else {
        return missing_user_id().into_response();
    };

    let data = match serde_json::to_string(&req.data) {
        Ok(data) => data,
        Err(e) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": e.to_string()})),
            )
                .into_response();
        }
    };
    let now = chrono::Utc::now().to_rfc3339();

    let existing = match UserBlobEntity::find_by_id(user_id.clone()).one(&db).await {
        Ok(existing) => existing,
        Err(e) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": e.to_string()})),
            )
                .into_response();
        }
    };

    let result = if let Some(row) = existing {
        let mut active: ActiveModel = row.into();
        active.data = Set(data);
        active.updated_at = Set(now);
        active.update(&db).await.map(|_| ())
    } else {
        let row = ActiveModel {
            user_id: Set(user_id),
            data: Set(data),
            created_at: Set(now.clone()),
            updated_at: Set(now),
        };
        row.insert(&db).await.map(|_| ())
    };

    match result {
        Ok(()) => (StatusCode::OK, Json(json!({"success": true}))).into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"error": e.to_string()})),
        )
            .into_response(),
    }
}

#[utoipa::path(
    delete,
    path = "/api/blob",
    params(("userId" = String, Query, description = "Opaque user identifier")),
    responses(
        (status = 200, description = "Document removed"),
        (status = 400, description = "Missing userId")
    )
)]
pub async fn delete_blob(
    State(db): State<DatabaseConnection>,
    Query(params): Query<BlobParams>,
) -> impl IntoResponse {
    let Some(user_id) = params.user_id else {
        return missing_user_id().into_response();
    };

    match UserBlobEntity::delete_by_id(user_id).exec(&db).await {
        Ok(_) => (StatusCode::OK, Json(json!({"success": true}))).into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"error": e.to_string()})),
        )
            .into_response(),
    }
}
