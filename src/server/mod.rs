//! Development backend for the tablekeep REST API.

mod auth;
mod collections;
mod config;
mod routes;

pub use collections::Collections;
pub use config::{ApiKeyStore, Config};

use axum::{middleware, routing::get, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub api_keys: Arc<ApiKeyStore>,
    pub collections: Arc<Collections>,
}

impl AppState {
    pub fn new(api_keys: ApiKeyStore, collections: Collections) -> Self {
        Self {
            api_keys: Arc::new(api_keys),
            collections: Arc::new(collections),
        }
    }
}

pub fn router(state: AppState) -> Router {
    // Public routes (no auth)
    let public_routes = Router::new().route("/health", get(routes::health));

    let protected_routes = Router::new()
        .route("/{collection}", get(routes::list).post(routes::create))
        .route(
            "/{collection}/{id}",
            get(routes::get_one)
                .put(routes::replace)
                .delete(routes::delete),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::auth_middleware,
        ));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use tablekeep_core::{
        check_server, is_temp_id, seed, CatalogKind, CatalogResolver, CatalogSnapshot,
        HttpRemote, InventoryItem, InventoryPatch, LoadOutcome, MemoryStorage, Resource,
        SyncError,
    };
    use tower::ServiceExt;

    fn app(keys: ApiKeyStore) -> Router {
        router(AppState::new(keys, Collections::seeded()))
    }

    async fn send(
        app: &Router,
        method: &str,
        uri: &str,
        body: Option<Value>,
        key: Option<&str>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(key) = key {
            builder = builder.header("Authorization", format!("Bearer {}", key));
        }
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    #[tokio::test]
    async fn test_health_is_public() {
        let app = app(ApiKeyStore::default().with_key("secret", "test"));
        let (status, body) = send(&app, "GET", "/health", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_collections_require_key_when_configured() {
        let app = app(ApiKeyStore::default().with_key("secret", "test"));

        let (status, body) = send(&app, "GET", "/inventory", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "missing_auth");

        let (status, body) = send(&app, "GET", "/inventory", None, Some("wrong")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "invalid_key");

        let (status, _) = send(&app, "GET", "/inventory", None, Some("secret")).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_open_when_no_keys() {
        let app = app(ApiKeyStore::default());
        let (status, body) = send(&app, "GET", "/restaurants", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), seed::restaurants().len());
    }

    #[tokio::test]
    async fn test_crud_cycle() {
        let app = app(ApiKeyStore::default());

        let (status, created) = send(
            &app,
            "POST",
            "/suppliers",
            Some(json!({"name": "Fish Market", "ingredientIds": ["i1"]})),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let id = created["id"].as_str().unwrap().to_string();

        let (status, fetched) = send(&app, "GET", &format!("/suppliers/{}", id), None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched, created);

        let (status, updated) = send(
            &app,
            "PUT",
            &format!("/suppliers/{}", id),
            Some(json!({"name": "Fish Market Ltd"})),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated, json!({"id": id, "name": "Fish Market Ltd"}));

        let (status, _) = send(&app, "DELETE", &format!("/suppliers/{}", id), None, None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, body) = send(&app, "DELETE", &format!("/suppliers/{}", id), None, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "not_found");
    }

    #[tokio::test]
    async fn test_unknown_and_read_only_collections() {
        let app = app(ApiKeyStore::default());

        let (status, _) = send(&app, "GET", "/spices", None, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, body) = send(&app, "POST", "/units", Some(json!({"code": "oz"})), None).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(body["error"], "read_only");
    }

    #[tokio::test]
    async fn test_core_client_against_server() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());
        let app = app(ApiKeyStore::default().with_key("secret", "test"));
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        assert!(check_server(&url).await);
        let remote = Arc::new(HttpRemote::new(url).with_api_key("secret"));

        let resource: Resource<InventoryItem, HttpRemote> =
            Resource::new(Arc::new(MemoryStorage::new()), remote.clone());
        resource.boot(Vec::new(), &CatalogSnapshot::new());
        let outcome = resource.spawn_refresh().await.unwrap();
        assert_eq!(
            outcome,
            LoadOutcome::Remote(seed::inventory_items().len())
        );

        let engine = resource.engine();
        let created = engine
            .create(
                InventoryPatch::new()
                    .with_restaurant("r1")
                    .with_ingredient("i2")
                    .with_unit("u1")
                    .with_quantity(12.0),
            )
            .await
            .unwrap();
        assert!(!is_temp_id(&created.id));
        assert_eq!(resource.store().snapshot()[0], created);

        let updated = engine
            .update(&created.id, InventoryPatch::new().with_quantity(3.0))
            .await
            .unwrap();
        assert_eq!(updated.quantity, 3.0);
        assert_eq!(updated.ingredient_id, "i2");

        engine.delete(&created.id).await.unwrap();
        assert_eq!(engine.refresh(&created.id).await, Err(SyncError::NotFound));

        let catalogs = CatalogResolver::new(remote);
        let units = catalogs.get(CatalogKind::Units).await;
        assert_eq!(units[0].short_label(), "kg");
        assert!(catalogs.is_loaded(CatalogKind::Units));
    }
}
