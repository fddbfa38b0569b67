//! Integration tests for cursor pagination against a mock Axum server.

use std::{
    collections::HashMap,
    net::SocketAddr,
    sync::{Arc, Mutex},
};

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use bitgo_auth::AccessToken;
use bitgo_rest::{BitgoRestClient, ClientConfig, HttpStatus, OrderQuery, RestError, TradeQuery};
use futures::StreamExt;
use serde_json::{json, Value};

const TOKEN: &str = "v2x-mock-token";

#[derive(Clone, Default)]
struct ServerState {
    queries: Arc<Mutex<Vec<HashMap<String, String>>>>,
    auth_headers: Arc<Mutex<Vec<String>>>,
}

impl ServerState {
    fn record(&self, params: HashMap<String, String>, headers: &HeaderMap) {
        self.queries.lock().unwrap().push(params);
        let auth = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        self.auth_headers.lock().unwrap().push(auth);
    }

    fn prev_ids(&self) -> Vec<Option<String>> {
        self.queries
            .lock()
            .unwrap()
            .iter()
            .map(|q| q.get("prevId").cloned())
            .collect()
    }
}

fn order_json(id: &str) -> Value {
    json!({
        "id": id,
        "accountId": "acct1",
        "clientOrderId": null,
        "time": "2024-03-01T10:00:00.000Z",
        "creationDate": "2024-03-01T09:59:58.000Z",
        "type": "limit",
        "fundingType": "funded",
        "status": "completed",
        "product": "BTC-USD",
        "side": "buy",
        "quantity": "0.5",
        "quantityCurrency": "BTC",
        "filledQuantity": "0.5",
        "averagePrice": "64000.00"
    })
}

fn trade_json(id: &str) -> Value {
    json!({
        "id": id,
        "orderId": "o-1",
        "time": "2024-03-01T10:00:00.000Z",
        "product": "ETH-USD",
        "side": "sell",
        "price": "3100.5",
        "quantity": "2",
        "settled": false
    })
}

// Three pages: no cursor -> "c1" -> "c2" -> end
async fn mock_orders(
    State(state): State<ServerState>,
    Path(account_id): Path<String>,
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    let prev_id = params.get("prevId").cloned();
    state.record(params, &headers);

    if account_id != "acct1" {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "account not found" })),
        )
            .into_response();
    }

    let body = match prev_id.as_deref() {
        None => json!({
            "data": [order_json("o-1"), order_json("o-2")],
            "nextBatchPrevId": "c1"
        }),
        Some("c1") => json!({
            "data": [order_json("o-3")],
            "nextBatchPrevId": "c2"
        }),
        Some("c2") => json!({ "data": [order_json("o-4")] }),
        Some(other) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "message": format!("unknown cursor {other}") })),
            )
                .into_response()
        }
    };
    Json(body).into_response()
}

// Cursor never advances
async fn mock_trades(
    State(state): State<ServerState>,
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    state.record(params, &headers);
    Json(json!({
        "data": [trade_json("t-1")],
        "nextBatchPrevId": "stuck"
    }))
    .into_response()
}

async fn start_mock_server() -> (SocketAddr, ServerState) {
    let state = ServerState::default();
    let app = Router::new()
        .route("/api/accounts/{account_id}/orders", get(mock_orders))
        .route("/api/accounts/{account_id}/trades", get(mock_trades))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (addr, state)
}

fn client_for(addr: SocketAddr) -> BitgoRestClient {
    let config = ClientConfig::new().with_base_url(format!("http://{addr}/api"));
    BitgoRestClient::with_config(AccessToken::new(TOKEN).unwrap(), config).unwrap()
}

#[tokio::test]
async fn test_orders_follow_cursor_chain() {
    let (addr, state) = start_mock_server().await;
    let client = client_for(addr);

    let mut pages = client
        .list_orders("acct1", &OrderQuery::new().with_limit(2))
        .unwrap();

    let first = pages.next_page().await.unwrap().unwrap();
    assert_eq!(first.data.len(), 2);
    assert_eq!(first.next_batch_prev_id.as_deref(), Some("c1"));

    let second = pages.next_page().await.unwrap().unwrap();
    assert_eq!(second.data[0].id, "o-3");

    let third = pages.next_page().await.unwrap().unwrap();
    assert_eq!(third.data[0].id, "o-4");
    assert!(!third.has_more());

    assert!(pages.next_page().await.is_none());
    assert!(pages.is_finished());

    assert_eq!(
        state.prev_ids(),
        vec![None, Some("c1".to_string()), Some("c2".to_string())]
    );
}

#[tokio::test]
async fn test_query_params_sent_on_every_page() {
    let (addr, state) = start_mock_server().await;
    let client = client_for(addr);

    let orders = client
        .list_orders("acct1", &OrderQuery::new().with_limit(2).with_offset(0))
        .unwrap()
        .collect_all()
        .await
        .unwrap();
    let ids: Vec<_> = orders.iter().map(|order| order.id.as_str()).collect();
    assert_eq!(ids, vec!["o-1", "o-2", "o-3", "o-4"]);

    let queries = state.queries.lock().unwrap();
    assert_eq!(queries.len(), 3);
    for query in queries.iter() {
        assert_eq!(query.get("limit").map(String::as_str), Some("2"));
        assert_eq!(query.get("offset").map(String::as_str), Some("0"));
    }
}

#[tokio::test]
async fn test_bearer_token_on_every_request() {
    let (addr, state) = start_mock_server().await;
    let client = client_for(addr);

    client
        .list_orders("acct1", &OrderQuery::new())
        .unwrap()
        .collect_all()
        .await
        .unwrap();

    let headers = state.auth_headers.lock().unwrap();
    assert_eq!(headers.len(), 3);
    assert!(headers.iter().all(|h| h == &format!("Bearer {TOKEN}")));
}

#[tokio::test]
async fn test_nothing_requested_before_first_pull() {
    let (addr, state) = start_mock_server().await;
    let client = client_for(addr);

    let pages = client.list_orders("acct1", &OrderQuery::new()).unwrap();
    tokio::task::yield_now().await;
    assert!(state.queries.lock().unwrap().is_empty());

    drop(pages);
    assert!(state.queries.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_item_stream_flattens_pages() {
    let (addr, _state) = start_mock_server().await;
    let client = client_for(addr);

    let ids: Vec<String> = client
        .list_orders("acct1", &OrderQuery::new())
        .unwrap()
        .into_items()
        .map(|order| order.unwrap().id)
        .collect()
        .await;

    assert_eq!(ids, vec!["o-1", "o-2", "o-3", "o-4"]);
}

#[tokio::test]
async fn test_api_error_ends_sequence() {
    let (addr, state) = start_mock_server().await;
    let client = client_for(addr);

    let mut pages = client.list_orders("unknown", &OrderQuery::new()).unwrap();

    match pages.next_page().await {
        Some(Err(RestError::Api { status, message })) => {
            assert_eq!(status, HttpStatus::NotFound);
            assert_eq!(message, "account not found");
        }
        other => panic!("expected API error, got {other:?}"),
    }
    assert!(pages.next_page().await.is_none());
    assert_eq!(state.queries.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_stuck_cursor_is_reported() {
    let (addr, state) = start_mock_server().await;
    let client = client_for(addr);

    let mut pages = client.list_trades("acct1", &TradeQuery::new()).unwrap();

    let first = pages.next_page().await.unwrap().unwrap();
    assert_eq!(first.data[0].id, "t-1");

    let second = pages.next_page().await.unwrap().unwrap();
    assert_eq!(second.next_batch_prev_id.as_deref(), Some("stuck"));

    match pages.next_page().await {
        Some(Err(RestError::RepeatedCursor { cursor })) => assert_eq!(cursor, "stuck"),
        other => panic!("expected repeated cursor error, got {other:?}"),
    }
    assert!(pages.next_page().await.is_none());
    assert_eq!(
        state.prev_ids(),
        vec![None, Some("stuck".to_string())]
    );
}

#[tokio::test]
async fn test_invalid_account_id_rejected_before_request() {
    let (addr, state) = start_mock_server().await;
    let client = client_for(addr);

    let result = client.list_orders("acct1/../other", &OrderQuery::new());
    assert!(matches!(result, Err(RestError::InvalidParameter(_))));
    assert!(state.queries.lock().unwrap().is_empty());
}
