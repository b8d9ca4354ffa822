use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{HeaderMap, Request, StatusCode},
    routing::post,
    Json, Router,
};
use learnpath::config::{Config, LlmProviderKind};
use learnpath::server::{build_router, ServeHealth, ServeState};
use learnpath::build_path_service;
use path_core::{PathService, StaticGenerator, StaticResolver, TreeEnricher};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tower::ServiceExt;

const MODEL_OUTPUT: &str = r#"Aquí tienes tu ruta:
```json
{
  "nodo_raiz": {
    "titulo": "Rust",
    "es_hub": true,
    "sub_nodos": [
      {
        "titulo": "Fundamentos",
        "es_hub": false,
        "descripcion": "Sintaxis y ownership",
        "recursos": {
          "recurso_principal": {"titulo": "The Rust Book"},
          "libro_recomendado": "Programming Rust",
          "curso_profundizacion": "Curso inexistente",
          "desafio_practico": "Escribe un grep"
        }
      }
    ]
  }
}
```"#;

async fn spawn(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    format!("http://{addr}")
}

async fn fake_gemini() -> String {
    let app = Router::new().route(
        "/v1beta/models/:target",
        post(|| async {
            Json(json!({
                "candidates": [{"content": {"parts": [{"text": MODEL_OUTPUT}]}}]
            }))
        }),
    );
    spawn(app).await
}

async fn fake_serper() -> String {
    async fn search(headers: HeaderMap, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
        if headers.get("x-api-key").and_then(|v| v.to_str().ok()) != Some("serper-key") {
            return (StatusCode::FORBIDDEN, Json(json!({"message": "bad key"})));
        }
        let organic = match body["q"].as_str().unwrap_or_default() {
            "The Rust Book" => json!([{
                "title": "The Rust Programming Language",
                "link": "https://doc.rust-lang.org/book/"
            }]),
            "Programming Rust libro" => json!([{
                "title": "Programming Rust, 2nd Edition",
                "link": "https://www.oreilly.com/library/view/programming-rust-2nd/9781492052586/"
            }]),
            _ => json!([]),
        };
        (StatusCode::OK, Json(json!({ "organic": organic })))
    }
    spawn(Router::new().route("/search", post(search))).await
}

fn offline_app(response: &str) -> Router {
    let enricher = TreeEnricher::new(Arc::new(StaticResolver::new()));
    let service = PathService::new(Arc::new(StaticGenerator::new(response)), enricher);
    let state = ServeState::new(Arc::new(service));
    build_router().with_state(state)
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    serde_json::from_slice(&bytes).expect("json body")
}

fn generate_request(body: Value) -> Request<Body> {
    Request::post("/generate-path")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

#[tokio::test]
async fn generate_path_returns_enriched_tree() {
    let mut config = Config::default();
    config.llm.provider = LlmProviderKind::Gemini;
    config.llm.api_base = Some(fake_gemini().await);
    config.llm.api_keys = vec!["google-key".into()];
    config.search.api_base = fake_serper().await;
    config.search.api_key = Some("serper-key".into());

    let service = build_path_service(&config).expect("service");
    let app = build_router().with_state(ServeState::new(Arc::new(service)));

    let response = app
        .oneshot(generate_request(json!({"goal": "Rust", "level": "principiante"})))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));

    let body = body_json(response).await;
    let root = &body["nodo_raiz"];
    assert_eq!(root["titulo"], "Rust");
    let resources = &root["sub_nodos"][0]["recursos"];
    assert_eq!(
        resources["recurso_principal"],
        json!({
            "titulo": "The Rust Programming Language",
            "url": "https://doc.rust-lang.org/book/"
        })
    );
    assert_eq!(resources["libro_recomendado"]["titulo"], "Programming Rust");
    assert!(resources["libro_recomendado"]["url"]
        .as_str()
        .unwrap()
        .starts_with("https://www.oreilly.com/"));
    assert!(resources.get("curso_profundizacion").is_none());
    assert_eq!(resources["desafio_practico"], "Escribe un grep");
}

#[tokio::test]
async fn missing_goal_is_rejected() {
    let response = offline_app("{}")
        .oneshot(generate_request(json!({"level": "avanzado"})))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await["error"],
        "El objetivo y el nivel son requeridos."
    );
}

#[tokio::test]
async fn generator_failure_maps_to_server_error() {
    let response = offline_app("")
        .oneshot(generate_request(json!({"goal": "Rust", "level": "avanzado"})))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let message = body_json(response).await["error"]
        .as_str()
        .unwrap()
        .to_string();
    assert!(message.starts_with("Ocurrió un error en el servidor:"));
}

#[tokio::test]
async fn index_page_is_served() {
    let response = offline_app("{}")
        .oneshot(Request::get("/").body(Body::empty()).unwrap())
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let html = String::from_utf8_lossy(&bytes);
    assert!(html.contains("/generate-path"));
}

#[tokio::test]
async fn readiness_follows_health_state() {
    let enricher = TreeEnricher::new(Arc::new(StaticResolver::new()));
    let service = PathService::new(Arc::new(StaticGenerator::new("{}")), enricher);
    let health = Arc::new(ServeHealth::new());
    let app = build_router().with_state(ServeState::with_health(
        Arc::new(service),
        Arc::clone(&health),
    ));

    let status = |app: Router, path: &'static str| async move {
        app.oneshot(Request::get(path).body(Body::empty()).unwrap())
            .await
            .expect("response")
            .status()
    };

    assert_eq!(
        status(app.clone(), "/readyz").await,
        StatusCode::SERVICE_UNAVAILABLE
    );
    health.mark_live();
    health.mark_ready();
    assert_eq!(status(app.clone(), "/livez").await, StatusCode::OK);
    assert_eq!(status(app.clone(), "/readyz").await, StatusCode::OK);

    health.mark_unready("shutting down");
    assert_eq!(
        status(app.clone(), "/readyz").await,
        StatusCode::SERVICE_UNAVAILABLE
    );

    let response = app
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .expect("response");
    let body = body_json(response).await;
    assert_eq!(body["generator"], "static");
    assert_eq!(body["last_error"], "shutting down");
}

#[tokio::test]
async fn metrics_endpoint_exposes_request_counter() {
    let app = offline_app("{}");
    let _ = app
        .clone()
        .oneshot(generate_request(json!({"goal": "", "level": ""})))
        .await
        .expect("response");
    let response = app
        .oneshot(Request::get("/metrics").body(Body::empty()).unwrap())
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert!(String::from_utf8_lossy(&bytes).contains("learnpath_requests_total"));
}

#[tokio::test]
async fn cors_preflight_is_allowed() {
    let response = offline_app("{}")
        .oneshot(
            Request::builder()
                .method("OPTIONS")
                .uri("/generate-path")
                .header("origin", "http://example.com")
                .header("access-control-request-method", "POST")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .expect("response");
    assert!(response.status().is_success());
    assert_eq!(
        response
            .headers()
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some("*")
    );
}
