//! API route configuration.

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers;
use crate::state::AppState;

/// Creates the API router with all routes configured.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Lookup
        .route("/", post(handlers::temperature))
        .route("/temperature", post(handlers::temperature))

        // Introspection
        .route("/health", get(handlers::health_check))
        .route("/cache/stats", get(handlers::cache_stats))

        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use axum::response::Response;
    use cepclima_lookup::testing::{FakeLocations, FakeWeather, LocationBehavior, WeatherBehavior};
    use serde_json::{json, Value};
    use test_case::test_case;
    use tower::ServiceExt;

    use crate::state::ApiConfig;

    struct TestApp {
        router: Router,
        state: Arc<AppState>,
        locations: Arc<FakeLocations>,
        weather: Arc<FakeWeather>,
    }

    fn test_app_with(locations: FakeLocations, weather: FakeWeather) -> TestApp {
        let locations = Arc::new(locations);
        let weather = Arc::new(weather);
        let state = Arc::new(AppState::with_collaborators(
            ApiConfig::default(),
            locations.clone(),
            weather.clone(),
        ));
        TestApp {
            router: create_router(state.clone()),
            state,
            locations,
            weather,
        }
    }

    fn test_app() -> TestApp {
        test_app_with(FakeLocations::found("São Paulo", "SP"), FakeWeather::reading(25.0))
    }

    fn post_json(uri: &str, body: impl Into<Body>) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(body.into())
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn body_json(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test_case("/" ; "root")]
    #[test_case("/temperature" ; "temperature")]
    #[tokio::test]
    async fn test_lookup_success(uri: &str) {
        let app = test_app();

        let response = app
            .router
            .oneshot(post_json(uri, json!({"cep": "01310-100"}).to_string()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await,
            json!({"city": "São Paulo", "temp_C": 25.0, "temp_F": 77.0, "temp_K": 298.0})
        );
    }

    #[tokio::test]
    async fn test_second_request_hits_cache() {
        let app = test_app();

        let first = app
            .router
            .clone()
            .oneshot(post_json("/", json!({"cep": "01310100"}).to_string()))
            .await
            .unwrap();
        let first = axum::body::to_bytes(first.into_body(), usize::MAX).await.unwrap();

        let second = app
            .router
            .oneshot(post_json("/", json!({"cep": "01310100"}).to_string()))
            .await
            .unwrap();
        let second = axum::body::to_bytes(second.into_body(), usize::MAX).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(app.locations.calls(), 1);
        assert_eq!(app.weather.calls(), 1);
    }

    #[test_case("{not json" ; "malformed")]
    #[test_case("{}" ; "missing field")]
    #[test_case(r#"{"cep": 1310100}"# ; "wrong type")]
    #[tokio::test]
    async fn test_bad_body_is_400(body: &'static str) {
        let app = test_app();

        let response = app.router.oneshot(post_json("/", body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await, json!({"message": "invalid zipcode"}));
        assert_eq!(app.locations.calls(), 0);
    }

    #[test_case("1234567" ; "too short")]
    #[test_case("123456789" ; "too long")]
    #[test_case("abcdefgh" ; "letters")]
    #[test_case("" ; "empty")]
    #[tokio::test]
    async fn test_invalid_cep_is_422(cep: &str) {
        let app = test_app();

        let response = app
            .router
            .oneshot(post_json("/", json!({"cep": cep}).to_string()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body_json(response).await, json!({"message": "invalid zipcode"}));
        assert_eq!(app.locations.calls(), 0);
    }

    #[tokio::test]
    async fn test_unknown_cep_is_404() {
        let app = test_app_with(
            FakeLocations::new(LocationBehavior::NotFound),
            FakeWeather::reading(25.0),
        );

        let response = app
            .router
            .oneshot(post_json("/", json!({"cep": "00000000"}).to_string()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await, json!({"message": "can not find zipcode"}));
    }

    #[tokio::test]
    async fn test_upstream_failure_is_opaque_500() {
        let app = test_app_with(
            FakeLocations::found("São Paulo", "SP"),
            FakeWeather::new(WeatherBehavior::Auth),
        );

        let response = app
            .router
            .oneshot(post_json("/", json!({"cep": "01310100"}).to_string()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(response).await, json!({"message": "internal server error"}));
    }

    #[tokio::test]
    async fn test_health_check() {
        let app = test_app();

        let response = app.router.oneshot(get("/health")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["service"], "cepclima");
        assert!(body["timestamp"].as_str().unwrap().ends_with('Z'));
        assert_eq!(body["cache_stats"]["total_items"], 0);
        assert_eq!(body["cache_stats"]["capacity"], 10_000);
    }

    #[tokio::test]
    async fn test_cache_stats_after_lookup() {
        let app = test_app();

        app.router
            .clone()
            .oneshot(post_json("/temperature", json!({"cep": "01310100"}).to_string()))
            .await
            .unwrap();
        let response = app.router.oneshot(get("/cache/stats")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["total_items"], 3);
        assert_eq!(body["per_namespace"], json!({"location": 1, "result": 1, "weather": 1}));
        assert_eq!(app.state.cache().len(), 3);
    }

    #[tokio::test]
    async fn test_get_on_lookup_route_is_405() {
        let app = test_app();

        let response = app.router.oneshot(get("/temperature")).await.unwrap();

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }
}
