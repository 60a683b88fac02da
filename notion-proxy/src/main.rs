mod config;
mod error;
mod notion;

use axum::{extract::State, routing::get, Json, Router};
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use config::Config;
use error::ProxyError;
use notion::NotionApi;

async fn health_check() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn list_recruits(State(api): State<NotionApi>) -> Result<Json<Value>, ProxyError> {
    let results = api.list_all().await?;
    tracing::debug!(count = results.len(), "recruits listed");
    Ok(Json(json!({ "results": results })))
}

fn router(api: NotionApi) -> Router {
    Router::new()
        .route("/", get(health_check))
        .route("/health", get(health_check))
        .route("/api/recruits", get(list_recruits))
        .with_state(api)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("notion_proxy=info,tower_http=info")),
        )
        .init();

    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            tracing::error!("{e}");
            std::process::exit(1);
        }
    };

    let api = NotionApi::new(reqwest::Client::new(), &config);
    let app = router(api);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {addr}: {e}"));

    tracing::info!("notion-proxy listening on {addr}");
    axum::serve(listener, app)
        .await
        .expect("server error");
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    fn test_config() -> Config {
        Config {
            notion_token: "secret".to_string(),
            database_id: "db1".to_string(),
            order_property: "순서".to_string(),
            port: 0,
        }
    }

    async fn body_json(res: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    /// Serves a two-page Notion query on an ephemeral port.
    async fn fake_notion() -> String {
        async fn query(Json(body): Json<Value>) -> Json<Value> {
            match body.get("start_cursor").and_then(|c| c.as_str()) {
                None => Json(json!({
                    "results": [{"id": "p1"}, {"id": "p2"}],
                    "has_more": true,
                    "next_cursor": "c2"
                })),
                Some(_) => Json(json!({
                    "results": [{"id": "p3"}],
                    "has_more": false,
                    "next_cursor": null
                })),
            }
        }

        let app = Router::new().route("/v1/databases/db1/query", axum::routing::post(query));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}/v1")
    }

    #[tokio::test]
    async fn test_health_routes() {
        let api = NotionApi::new(reqwest::Client::new(), &test_config());
        for uri in ["/", "/health"] {
            let res = router(api.clone())
                .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
                .await
                .unwrap();
            assert_eq!(res.status(), StatusCode::OK);
            assert_eq!(body_json(res).await["status"], "ok");
        }
    }

    #[tokio::test]
    async fn test_recruits_follow_pagination() {
        let base = fake_notion().await;
        let api = NotionApi::with_base_url(reqwest::Client::new(), &test_config(), &base);
        let res = router(api)
            .oneshot(Request::builder().uri("/api/recruits").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);

        let body = body_json(res).await;
        let ids: Vec<&str> = body["results"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|r| r["id"].as_str())
            .collect();
        assert_eq!(ids, vec!["p1", "p2", "p3"]);
    }

    #[tokio::test]
    async fn test_page_cap_is_bad_gateway_not_partial_list() {
        let base = fake_notion().await;
        let api = NotionApi::with_base_url(reqwest::Client::new(), &test_config(), &base)
            .with_max_pages(1);
        let res = router(api)
            .oneshot(Request::builder().uri("/api/recruits").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_GATEWAY);

        let body = body_json(res).await;
        assert!(body.get("results").is_none());
        assert_eq!(body["error"], "notion query still had more results after 1 pages");
    }

    #[tokio::test]
    async fn test_unreachable_notion_is_bad_gateway() {
        let api = NotionApi::with_base_url(
            reqwest::Client::new(),
            &test_config(),
            "http://127.0.0.1:9/v1",
        );
        let res = router(api)
            .oneshot(Request::builder().uri("/api/recruits").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_GATEWAY);
        assert!(body_json(res).await["error"].is_string());
    }
}
