pub mod blob;
pub mod health;

use axum::{routing::get, Router};
use sea_orm::DatabaseConnection;

pub fn api_router(db: DatabaseConnection) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Per-user document blobs
        .route(
            "/blob",
            get(blob::get_blob)
                .post(blob::save_blob)
                .delete(blob::delete_blob),
        )
        .with_state(db)
}
