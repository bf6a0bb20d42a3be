use crate::api;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        api::health::health_check,
        api::blob::get_blob,
        api::blob::save_blob,
        api::blob::delete_blob,
    ),
    tags(
        (name = "intentional-week", description = "Intentional Week document store API")
    )
)]
pub struct ApiDoc;
