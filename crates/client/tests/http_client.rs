//! End-to-end tests for the reqwest-backed ports.
//!
//! `EcoletaClient` talks to the real API router served on an ephemeral port;
//! `IbgeGeography` talks to a small stand-in for the localities service.

use std::net::SocketAddr;
use std::sync::Arc;

use assert_matches::assert_matches;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;
use sqlx::PgPool;

use ecoleta_api::config::ServerConfig;
use ecoleta_api::router::build_app_router;
use ecoleta_api::state::AppState;
use ecoleta_client::api::NewPoint;
use ecoleta_client::{ClientError, EcoletaClient, GeographyPort, IbgeGeography, PointsApi};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Serve `app` on 127.0.0.1 with an OS-assigned port.
async fn serve(app: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

async fn api_client(pool: PgPool) -> EcoletaClient {
    let config = ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:3000".to_string()],
        request_timeout_secs: 30,
        uploads_base_url: "http://localhost:3333/uploads".to_string(),
    };
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
    };
    let addr = serve(build_app_router(state, &config)).await;
    EcoletaClient::new(reqwest::Client::new(), format!("http://{addr}/"))
}

fn new_point(items: Vec<i64>) -> NewPoint {
    NewPoint {
        name: "Ecoponto Boa Vista".into(),
        email: "contato@ecoponto.org".into(),
        whatsapp: "81999990000".into(),
        latitude: -8.0476,
        longitude: -34.877,
        city: "Recife".into(),
        uf: "PE".into(),
        items,
    }
}

// ---------------------------------------------------------------------------
// EcoletaClient
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_items_returns_catalog(pool: PgPool) {
    let client = api_client(pool).await;

    let items = client.list_items().await.unwrap();
    assert_eq!(items.len(), 5);
    assert_eq!(items[0].title, "Lâmpadas");
    assert_eq!(
        items[0].image_url,
        "http://localhost:3333/uploads/lampadas.svg"
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_filter_and_get_round_trip(pool: PgPool) {
    let client = api_client(pool).await;

    let created = client.create_point(&new_point(vec![1, 2])).await.unwrap();
    assert_eq!(created.name, "Ecoponto Boa Vista");

    let found = client.filter_points("Recife", "PE", &[2, 5]).await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, created.id);

    let details = client.get_point(created.id).await.unwrap().unwrap();
    let titles: Vec<&str> = details.items.iter().map(|i| i.title.as_str()).collect();
    assert_eq!(titles, vec!["Lâmpadas", "Pilhas e Baterias"]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_get_unknown_point_is_none(pool: PgPool) {
    let client = api_client(pool).await;
    assert!(client.get_point(424_242).await.unwrap().is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_rejected_create_carries_server_message(pool: PgPool) {
    let client = api_client(pool).await;

    let err = client.create_point(&new_point(vec![])).await.unwrap_err();
    assert_matches!(err, ClientError::Api { status: 400, ref message } if message.contains("items"));
}

// ---------------------------------------------------------------------------
// IbgeGeography
// ---------------------------------------------------------------------------

async fn localities_stub() -> SocketAddr {
    let app = Router::new()
        .route(
            "/estados",
            get(|| async { Json(json!([{ "sigla": "SP" }, { "sigla": "AC" }, { "sigla": "PE" }])) }),
        )
        .route(
            "/estados/PE/municipios",
            get(|| async { Json(json!([{ "nome": "Recife" }, { "nome": "Olinda" }])) }),
        );
    serve(app).await
}

#[tokio::test]
async fn test_geography_sorts_states_and_cities() {
    let addr = localities_stub().await;
    let geography = IbgeGeography::with_base_url(reqwest::Client::new(), format!("http://{addr}"));

    assert_eq!(geography.list_ufs().await.unwrap(), vec!["AC", "PE", "SP"]);
    assert_eq!(
        geography.list_cities("PE").await.unwrap(),
        vec!["Olinda", "Recife"]
    );
}

#[tokio::test]
async fn test_geography_error_status_is_network_error() {
    let addr = localities_stub().await;
    let geography = IbgeGeography::with_base_url(reqwest::Client::new(), format!("http://{addr}"));

    let err = geography.list_cities("XX").await.unwrap_err();
    assert_matches!(err, ClientError::Network(_));
}
