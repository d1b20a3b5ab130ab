//! Cross-origin policy for the browser client

use axum::http::HeaderValue;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tracing::warn;

use crate::config::CorsConfig;

/// Build the CORS layer from configuration.
///
/// Methods and request headers are mirrored from the preflight because the
/// `*` wildcard cannot be combined with credentialed requests.
pub fn create_cors_layer(config: &CorsConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(config.allow_credentials)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{header, Method, Request, StatusCode},
        routing::post,
        Router,
    };
    use tower::ServiceExt;

    fn app() -> Router {
        Router::new()
            .route("/api/chat", post(|| async { "ok" }))
            .layer(create_cors_layer(&CorsConfig::default()))
    }

    fn preflight(origin: &str) -> Request<Body> {
        Request::builder()
            .method(Method::OPTIONS)
            .uri("/api/chat")
            .header(header::ORIGIN, origin)
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type,x-custom")
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn test_preflight_from_allowed_origin() {
        for origin in ["http://localhost:3000", "http://127.0.0.1:3000"] {
            let response = app().oneshot(preflight(origin)).await.unwrap();
            let headers = response.headers();

            assert_eq!(response.status(), StatusCode::OK);
            assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], origin);
            assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_CREDENTIALS], "true");
            assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_METHODS], "POST");
            assert_eq!(
                headers[header::ACCESS_CONTROL_ALLOW_HEADERS],
                "content-type,x-custom"
            );
        }
    }

    #[tokio::test]
    async fn test_preflight_from_unknown_origin() {
        let response = app()
            .oneshot(preflight("http://evil.example.com"))
            .await
            .unwrap();

        assert!(response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .is_none());
    }

    #[test]
    fn test_invalid_origins_are_skipped() {
        let config = CorsConfig {
            allowed_origins: vec!["http://localhost:3000".to_string(), "bad\norigin".to_string()],
            allow_credentials: true,
        };

        // Building must not panic on an unparsable entry
        let _layer = create_cors_layer(&config);
    }
}
