//! Integration tests for the HeartLedger HTTP endpoints.

#![cfg(feature = "api")]

use axum::body::Bytes;
use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;

use heartledger::api::{
    build_api_router, Node, ReplaceResponse, MAX_REQUEST_BODY_SIZE, REQUEST_TIMEOUT,
};
use heartledger::blockchain::{Block, Blockchain};
use heartledger::ledger::Ledger;

fn test_server(ledger: Ledger) -> TestServer {
    let node = Arc::new(Node::new(ledger));
    TestServer::new(build_api_router(node)).expect("Failed to create test server")
}

fn fork_of_length(len: usize) -> Vec<Block> {
    let mut chain = Blockchain::with_genesis(Block::genesis("F0"));
    for i in 1..len {
        let block = Block::next_at(chain.last(), 100 + i as i64, format!("F{}", i))
            .expect("valid block");
        chain.append(block).expect("valid append");
    }
    chain.blocks().to_vec()
}

#[tokio::test]
async fn test_get_returns_genesis_chain() {
    let server = test_server(Ledger::new());

    let response = server.get("/").await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let json: Value = response.json();
    let blocks = json.as_array().expect("chain is an array");
    assert_eq!(blocks.len(), 1);
    assert_eq!(blocks[0]["Index"], 0);
    assert_eq!(blocks[0]["BPM"], 0);
    assert_eq!(blocks[0]["Hash"], "");
    assert_eq!(blocks[0]["PrevHash"], "");
    assert!(blocks[0]["Timestamp"].is_string());
}

#[tokio::test]
async fn test_post_appends_block() {
    let ledger = Ledger::new();
    let server = test_server(ledger.clone());

    let response = server.post("/").json(&json!({ "BPM": 80 })).await;
    assert_eq!(response.status_code(), StatusCode::CREATED);

    let block: Block = response.json();
    assert_eq!(block.index, 1);
    assert_eq!(block.payload, 80);
    assert_eq!(block.prev_hash, "");
    assert_eq!(block.calculate_hash().unwrap(), block.hash);
    assert_eq!(ledger.tip(), block);

    let chain: Vec<Block> = server.get("/").await.json();
    assert_eq!(chain.len(), 2);
    assert_eq!(chain[1], block);
}

#[tokio::test]
async fn test_successive_posts_stay_linked() {
    let server = test_server(Ledger::new());

    for bpm in [61, 72, 95] {
        let response = server.post("/").json(&json!({ "BPM": bpm })).await;
        assert_eq!(response.status_code(), StatusCode::CREATED);
    }

    let chain: Vec<Block> = server.get("/").await.json();
    assert_eq!(chain.len(), 4);
    for pair in chain.windows(2) {
        assert_eq!(pair[1].prev_hash, pair[0].hash);
        assert_eq!(pair[1].index, pair[0].index + 1);
    }
}

#[tokio::test]
async fn test_post_rejects_non_positive_payload() {
    let ledger = Ledger::new();
    let server = test_server(ledger.clone());

    for bpm in [0, -5] {
        let response = server.post("/").json(&json!({ "BPM": bpm })).await;
        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
        let json: Value = response.json();
        assert!(json["error"].is_string());
    }
    assert_eq!(ledger.len(), 1);
}

#[tokio::test]
async fn test_post_rejects_malformed_body() {
    let ledger = Ledger::new();
    let server = test_server(ledger.clone());

    let response = server.post("/").json(&json!({ "heart_rate": 80 })).await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let json: Value = response.json();
    assert!(json["error"].is_string());

    let response = server.post("/").json(&json!({ "BPM": "eighty" })).await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

    let response = server
        .post("/")
        .bytes(Bytes::from_static(b"{not json"))
        .content_type("application/json")
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let json: Value = response.json();
    assert!(json["error"].is_string());

    assert_eq!(ledger.len(), 1);
}

#[tokio::test]
async fn test_replace_rejects_malformed_body() {
    let ledger = Ledger::new();
    let server = test_server(ledger.clone());

    let response = server.post("/replace").json(&json!({ "BPM": 80 })).await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

    let response = server
        .post("/replace")
        .bytes(Bytes::from_static(b"[{"))
        .content_type("application/json")
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

    assert_eq!(ledger.len(), 1);
}

#[tokio::test]
async fn test_post_rejects_oversized_body() {
    let ledger = Ledger::new();
    let server = test_server(ledger.clone());

    let padding = "x".repeat(MAX_REQUEST_BODY_SIZE * 2);
    let response = server
        .post("/")
        .json(&json!({ "BPM": 80, "padding": padding }))
        .await;
    assert_eq!(response.status_code(), StatusCode::PAYLOAD_TOO_LARGE);
    let json: Value = response.json();
    assert!(json["error"].is_string());
    assert_eq!(ledger.len(), 1);
}

#[test]
fn test_transport_limits() {
    assert_eq!(REQUEST_TIMEOUT, Duration::from_secs(10));
    assert_eq!(MAX_REQUEST_BODY_SIZE, 1024 * 1024);
}

#[tokio::test]
async fn test_replace_with_equal_length_keeps_chain() {
    let ledger = Ledger::new();
    ledger.append_payload(70).unwrap();
    ledger.append_payload(71).unwrap();
    let before = ledger.snapshot();
    let server = test_server(ledger.clone());

    let response = server.post("/replace").json(&fork_of_length(3)).await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: ReplaceResponse = response.json();
    assert!(!body.adopted);
    assert_eq!(body.length, 3);
    assert_eq!(ledger.snapshot(), before);
}

#[tokio::test]
async fn test_replace_with_longer_chain_adopts_it() {
    let ledger = Ledger::new();
    ledger.append_payload(70).unwrap();
    ledger.append_payload(71).unwrap();
    let server = test_server(ledger.clone());
    let fork = fork_of_length(4);

    let response = server.post("/replace").json(&fork).await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: ReplaceResponse = response.json();
    assert!(body.adopted);
    assert_eq!(body.length, 4);

    let chain: Vec<Block> = server.get("/").await.json();
    assert_eq!(chain, fork);
}

#[tokio::test]
async fn test_replace_with_corrupt_longer_chain_is_rejected() {
    let ledger = Ledger::new();
    let before = ledger.snapshot();
    let server = test_server(ledger.clone());

    let mut fork = fork_of_length(4);
    fork[2].payload = 1;

    let response = server.post("/replace").json(&fork).await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let json: Value = response.json();
    assert!(json["error"].is_string());
    assert_eq!(ledger.snapshot(), before);
}

#[tokio::test]
async fn test_replace_rejects_forged_genesis() {
    let ledger = Ledger::new();
    let before = ledger.snapshot();
    let server = test_server(ledger.clone());

    let mut genesis = Block::genesis("F0");
    genesis.payload = 999;
    genesis.hash = "forged".to_string();
    let next = Block::next_at(&genesis, 5, "Y").expect("valid block");

    let response = server.post("/replace").json(&vec![genesis, next]).await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let json: Value = response.json();
    assert!(json["error"].is_string());
    assert_eq!(ledger.snapshot(), before);

    let mut genesis = Block::genesis("F0");
    genesis.payload = 999;
    let next = Block::next_at(&genesis, 5, "Y").expect("valid block");

    let response = server.post("/replace").json(&vec![genesis, next]).await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(ledger.snapshot(), before);
}

#[tokio::test]
async fn test_health() {
    let server = test_server(Ledger::new());

    let response = server.get("/health").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let json: Value = response.json();
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["height"], 1);
    assert!(json["timestamp"].is_string());
}
