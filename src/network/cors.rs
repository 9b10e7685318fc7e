use axum::http::HeaderValue;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};

use crate::config::{CorsConfiguration, CorsPolicy};
use crate::error::AppError;

/// Builds the cross-origin layer, or `None` when cross-origin access is off.
pub fn cors_layer(cors: &CorsConfiguration) -> Result<Option<CorsLayer>, AppError> {
    let origin = match cors.policy {
        CorsPolicy::Disabled => return Ok(None),
        CorsPolicy::Permissive => AllowOrigin::mirror_request(),
        CorsPolicy::AllowList => {
            let origins = cors
                .allowed_origins
                .iter()
                .map(|origin| {
                    HeaderValue::from_str(origin).map_err(|_| {
                        AppError::InvalidConfig(format!("invalid CORS origin '{origin}'"))
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
            AllowOrigin::list(origins)
        }
    };

    Ok(Some(
        CorsLayer::new()
            .allow_origin(origin)
            .allow_methods(AllowMethods::mirror_request())
            .allow_headers(AllowHeaders::mirror_request())
            .allow_credentials(true),
    ))
}
