use axum::http::{HeaderName, Method};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

const ALLOWED_METHODS: [Method; 4] = [Method::GET, Method::POST, Method::DELETE, Method::OPTIONS];

/// CORS layer for the browser front end. The admin key header is allowed
/// so the admin panel can call across origins.
pub fn create_cors_layer(allowed_origins: &[String], admin_key_header: &str) -> CorsLayer {
    let mut allowed_headers = vec![
        HeaderName::from_static("content-type"),
        HeaderName::from_static("x-requested-with"),
    ];
    match HeaderName::try_from(admin_key_header.to_ascii_lowercase()) {
        Ok(name) => allowed_headers.push(name),
        Err(e) => tracing::warn!("CORS: invalid admin key header '{}': {}", admin_key_header, e),
    }

    if allowed_origins.is_empty() || allowed_origins.iter().any(|o| o == "*") {
        // Mirror the request origin so credentialed requests still work
        tracing::debug!("CORS: Allowing all origins (development mode)");
        return CorsLayer::new()
            .allow_origin(AllowOrigin::mirror_request())
            .allow_methods(ALLOWED_METHODS)
            .allow_headers(allowed_headers)
            .allow_credentials(true);
    }

    let origins: Vec<_> = allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(parsed) => {
                tracing::debug!("CORS: Allowing origin: {}", origin);
                Some(parsed)
            }
            Err(e) => {
                tracing::warn!("CORS: Invalid origin '{}': {}", origin, e);
                None
            }
        })
        .collect();

    if origins.is_empty() {
        tracing::warn!("CORS: No valid origins configured, falling back to permissive mode");
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(ALLOWED_METHODS)
            .allow_headers(allowed_headers)
            .allow_credentials(false)
    } else {
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(ALLOWED_METHODS)
            .allow_headers(allowed_headers)
            .allow_credentials(true)
    }
}
