// api surface tests - validation and configuration paths only, nothing
// here talks to the real anthropic api

use nevin::Server;
use serde_json::{Value, json};

async fn spawn(api_key: Option<String>) -> String {
    let app = Server::router(api_key);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

#[tokio::test]
async fn health_reports_missing_key() {
    let base = spawn(None).await;

    let body: Value = reqwest::get(format!("{base}/api/health"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "Nevin AI Backend");
    assert_eq!(body["api_configured"], false);
}

#[tokio::test]
async fn health_reports_configured_key() {
    let base = spawn(Some("test-key".into())).await;

    let body: Value = reqwest::get(format!("{base}/api/health"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["api_configured"], true);
}

#[tokio::test]
async fn chat_without_key_is_500() {
    let base = spawn(None).await;

    let res = reqwest::Client::new()
        .post(format!("{base}/api/nevin/chat"))
        .json(&json!({ "message": "hola" }))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 500);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Servicio no configurado correctamente");
}

#[tokio::test]
async fn commentary_without_key_is_500() {
    let base = spawn(None).await;

    let res = reqwest::Client::new()
        .post(format!("{base}/api/nevin/verse-commentary"))
        .json(&json!({ "book": "Juan", "chapter": 3, "verse": 16 }))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 500);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn chat_empty_message_is_400() {
    let base = spawn(Some("test-key".into())).await;

    let res = reqwest::Client::new()
        .post(format!("{base}/api/nevin/chat"))
        .json(&json!({ "message": "" }))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 400);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "No message provided");
}

#[tokio::test]
async fn chat_missing_message_is_400() {
    let base = spawn(Some("test-key".into())).await;

    let res = reqwest::Client::new()
        .post(format!("{base}/api/nevin/chat"))
        .json(&json!({}))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 400);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["success"], false);
}
