// 🌐 HTTP API (axum)
//
// Routes carry both the English paths and the German ones the original
// frontend calls. Request bodies accept that frontend's field names
// (betrag, kategorie); responses always use the English names
// (kind/amount/category, total_income/total_expenses/balance).
// Every response gets permissive CORS headers and any OPTIONS request is
// answered with an empty 200.

use crate::ledger::{Kind, NewTransaction, Transaction};
use crate::store::{LedgerStore, StoreError};
use crate::summary::{summarize, Summary};
use axum::{
    extract::{rejection::JsonRejection, Query, Request, State},
    http::{Method, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use thiserror::Error;
use tower_http::cors::CorsLayer;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn LedgerStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn LedgerStore>) -> Self {
        Self { store }
    }
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid input: {0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("storage failure: {0}")]
    Storage(StoreError),
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(_) => ApiError::NotFound(err.to_string()),
            other => ApiError::Storage(other),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Storage(e) => {
                tracing::error!(error = %e, "ledger store failed");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        (status, self.to_string()).into_response()
    }
}

// ============================================================================
// Request types
// ============================================================================

/// Body of POST /income and POST /expense
#[derive(Debug, Deserialize)]
pub struct EntryRequest {
    #[serde(alias = "betrag")]
    pub amount: f64,
    #[serde(default, alias = "kategorie")]
    pub category: String,
}

#[derive(Debug, Deserialize)]
pub struct DeleteParams {
    pub id: Option<String>,
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /health
async fn health_check() -> &'static str {
    "OK"
}

/// POST /income
async fn add_income(
    State(state): State<AppState>,
    payload: Result<Json<EntryRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Transaction>), ApiError> {
    record(&state, Kind::Income, payload)
}

/// POST /expense
async fn add_expense(
    State(state): State<AppState>,
    payload: Result<Json<EntryRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Transaction>), ApiError> {
    record(&state, Kind::Expense, payload)
}

fn record(
    state: &AppState,
    kind: Kind,
    payload: Result<Json<EntryRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Transaction>), ApiError> {
    let Json(body) = payload.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;

    let entry = NewTransaction::new(kind, body.amount, body.category)
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let tx = state.store.append(entry)?;
    tracing::debug!(id = tx.id, kind = %tx.kind, amount = tx.amount, "transaction recorded");

    Ok((StatusCode::CREATED, Json(tx)))
}

/// GET /summary
async fn get_summary(State(state): State<AppState>) -> Result<Json<Summary>, ApiError> {
    let transactions = state.store.list_all()?;
    Ok(Json(summarize(&transactions)))
}

/// GET /transactions
async fn get_transactions(
    State(state): State<AppState>,
) -> Result<Json<Vec<Transaction>>, ApiError> {
    Ok(Json(state.store.list_all()?))
}

/// DELETE /transactions/delete?id=<id>
async fn delete_transaction(
    State(state): State<AppState>,
    Query(params): Query<DeleteParams>,
) -> Result<StatusCode, ApiError> {
    let raw = params
        .id
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| ApiError::BadRequest("id is required".to_string()))?;

    let id: i64 = raw
        .trim()
        .parse()
        .map_err(|_| ApiError::BadRequest(format!("id must be an integer (got {:?})", raw)))?;

    state.store.delete(id)?;
    tracing::debug!(id, "transaction deleted");

    Ok(StatusCode::OK)
}

/// Answer every OPTIONS request before method routing sees it
async fn short_circuit_options(request: Request, next: Next) -> Response {
    if request.method() == Method::OPTIONS {
        return StatusCode::OK.into_response();
    }

    next.run(request).await
}

// ============================================================================
// Router
// ============================================================================

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/income", post(add_income))
        .route("/einnahmen", post(add_income))
        .route("/expense", post(add_expense))
        .route("/ausgaben", post(add_expense))
        .route("/summary", get(get_summary))
        .route("/zusammenfassung", get(get_summary))
        .route("/transactions", get(get_transactions))
        .route("/transaktionen", get(get_transactions))
        .route("/transactions/delete", delete(delete_transaction))
        .route("/transaktionen/delete", delete(delete_transaction))
        .with_state(state)
        .layer(middleware::from_fn(short_circuit_options))
        .layer(CorsLayer::permissive())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::SqliteStore;
    use crate::store::MemoryStore;
    use axum::body::Body;
    use axum::http::{header, Request};
    use tower::ServiceExt;

    fn memory_app() -> (Router, Arc<dyn LedgerStore>) {
        let store: Arc<dyn LedgerStore> = Arc::new(MemoryStore::new());
        (router(AppState::new(Arc::clone(&store))), store)
    }

    async fn send(app: &Router, method: Method, uri: &str, body: Option<&str>) -> (StatusCode, String) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = app
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_summary_starts_at_zero() {
        let (app, _) = memory_app();

        let (status, body) = send(&app, Method::GET, "/summary", None).await;
        assert_eq!(status, StatusCode::OK);

        let summary: Summary = serde_json::from_str(&body).unwrap();
        assert_eq!(summary, Summary::default());
    }

    #[tokio::test]
    async fn test_german_frontend_body_is_accepted() {
        let (app, store) = memory_app();

        let (status, body) = send(
            &app,
            Method::POST,
            "/einnahmen",
            Some(r#"{"typ": "Einnahme", "betrag": 12.5, "kategorie": "Lohn"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let created: Transaction = serde_json::from_str(&body).unwrap();
        assert_eq!(created.kind, Kind::Income);
        assert_eq!(created.amount, 12.5);
        assert_eq!(created.category, "Lohn");

        // Kind comes from the route, not from "typ"
        let (status, _) = send(
            &app,
            Method::POST,
            "/ausgaben",
            Some(r#"{"typ": "Einnahme", "betrag": 4, "kategorie": "Brot"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let kinds: Vec<Kind> = store.list_all().unwrap().iter().map(|tx| tx.kind).collect();
        assert_eq!(kinds, vec![Kind::Income, Kind::Expense]);
    }

    #[tokio::test]
    async fn test_income_and_expense_feed_summary() {
        let (app, _) = memory_app();

        let (status, body) = send(
            &app,
            Method::POST,
            "/income",
            Some(r#"{"amount": 100, "category": "Salary"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let created: Transaction = serde_json::from_str(&body).unwrap();
        assert_eq!(created.kind, Kind::Income);
        assert_eq!(created.category, "Salary");

        let (status, _) = send(
            &app,
            Method::POST,
            "/ausgaben",
            Some(r#"{"amount": 40, "category": "Rent"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, _) = send(&app, Method::POST, "/income", Some(r#"{"amount": 25}"#)).await;
        assert_eq!(status, StatusCode::CREATED);

        let (_, body) = send(&app, Method::GET, "/zusammenfassung", None).await;
        let summary: Summary = serde_json::from_str(&body).unwrap();
        assert_eq!(summary.total_income, 125.0);
        assert_eq!(summary.total_expenses, 40.0);
        assert_eq!(summary.balance, 85.0);
    }

    #[tokio::test]
    async fn test_non_numeric_amount_is_rejected() {
        let (app, store) = memory_app();

        let (status, _) = send(
            &app,
            Method::POST,
            "/income",
            Some(r#"{"amount": "lots", "category": "Salary"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(&app, Method::POST, "/expense", Some("{not json")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        assert!(store.list_all().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_negative_amount_is_rejected() {
        let (app, store) = memory_app();

        let (status, body) = send(&app, Method::POST, "/expense", Some(r#"{"amount": -5}"#)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.contains("non-negative"));
        assert!(store.list_all().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_wrong_method_is_405() {
        let (app, _) = memory_app();

        let (status, _) = send(&app, Method::GET, "/income", None).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);

        let (status, _) = send(&app, Method::POST, "/summary", Some("{}")).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn test_delete_then_list() {
        let store: Arc<dyn LedgerStore> = Arc::new(SqliteStore::open_in_memory().unwrap());
        let app = router(AppState::new(Arc::clone(&store)));

        let (_, body) = send(&app, Method::POST, "/income", Some(r#"{"amount": 10, "category": "Gift"}"#)).await;
        let keep: Transaction = serde_json::from_str(&body).unwrap();
        let (_, body) = send(&app, Method::POST, "/expense", Some(r#"{"amount": 3, "category": "Tea"}"#)).await;
        let gone: Transaction = serde_json::from_str(&body).unwrap();

        let uri = format!("/transactions/delete?id={}", gone.id);
        let (status, _) = send(&app, Method::DELETE, &uri, None).await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = send(&app, Method::GET, "/transactions", None).await;
        assert_eq!(status, StatusCode::OK);
        let listed: Vec<Transaction> = serde_json::from_str(&body).unwrap();
        assert_eq!(listed, vec![keep]);

        // Already gone
        let (status, _) = send(&app, Method::DELETE, &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_delete_requires_integer_id() {
        let (app, _) = memory_app();

        let (status, _) = send(&app, Method::DELETE, "/transactions/delete", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(&app, Method::DELETE, "/transactions/delete?id=", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(&app, Method::DELETE, "/transaktionen/delete?id=abc", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_options_short_circuits_with_cors() {
        let (app, store) = memory_app();

        let request = Request::builder()
            .method(Method::OPTIONS)
            .uri("/income")
            .header(header::ORIGIN, "http://localhost:3000")
            .body(Body::empty())
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response
            .headers()
            .contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert!(bytes.is_empty());
        assert!(store.list_all().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_responses_carry_cors_headers() {
        let (app, _) = memory_app();

        let request = Request::builder()
            .method(Method::GET)
            .uri("/summary")
            .header(header::ORIGIN, "http://example.com")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "*"
        );
    }
}
