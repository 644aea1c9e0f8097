use std::sync::Arc;

use reqwest::StatusCode;
use serde_json::{json, Value};

use cadastro_api::app::services::AppServices;
use cadastro_infra::InMemoryUsuarioStore;

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        // Same router as prod, backed by the in-memory store double and
        // bound to an ephemeral port.
        let services = Arc::new(AppServices::new(Arc::new(InMemoryUsuarioStore::new())));
        let app = cadastro_api::app::build_app(services);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn post_usuario(
    client: &reqwest::Client,
    base_url: &str,
    body: Value,
) -> reqwest::Response {
    client
        .post(format!("{}/usuarios", base_url))
        .json(&body)
        .send()
        .await
        .unwrap()
}

#[tokio::test]
async fn health_check_reports_availability() {
    let srv = TestServer::spawn().await;

    let client = reqwest::Client::new();
    let res = client.get(&srv.base_url).send().await.unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    assert!(!res.text().await.unwrap().is_empty());
}

#[tokio::test]
async fn create_returns_created_record_with_location() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = post_usuario(
        &client,
        &srv.base_url,
        json!({"nome": "Ana", "email": "ana@x.com"}),
    )
    .await;

    assert_eq!(res.status(), StatusCode::CREATED);
    assert_eq!(
        res.headers().get("location").unwrap().to_str().unwrap(),
        "/usuarios/1"
    );

    let body: Value = res.json().await.unwrap();
    assert_eq!(
        body,
        json!({
            "id": 1,
            "nome": "Ana",
            "email": "ana@x.com",
            "altura": null,
            "peso": null,
        })
    );
}

#[tokio::test]
async fn create_then_get_returns_equal_record() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let created: Value = post_usuario(
        &client,
        &srv.base_url,
        json!({"nome": "Ana", "email": "ana@x.com", "altura": 1.70, "peso": 62.5}),
    )
    .await
    .json()
    .await
    .unwrap();

    let res = client
        .get(format!("{}/usuarios/{}", srv.base_url, created["id"]))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let fetched: Value = res.json().await.unwrap();
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn create_missing_required_fields_is_rejected_with_400() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    for body in [
        json!({"nome": "Bob"}),
        json!({"email": "bob@x.com"}),
        json!({"nome": "", "email": "bob@x.com"}),
        json!({"nome": "Bob", "email": ""}),
        json!({}),
    ] {
        let res = post_usuario(&client, &srv.base_url, body).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let info: Value = res.json().await.unwrap();
        assert_eq!(info, json!({"info": "required fields missing"}));
    }

    // Nothing reached the store.
    let rows: Value = client
        .get(format!("{}/usuarios", srv.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(rows, json!([]));
}

#[tokio::test]
async fn absent_id_returns_404_on_get_update_delete() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/usuarios/999", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let info: Value = res.json().await.unwrap();
    assert_eq!(info, json!({"info": "not found"}));

    let res = client
        .put(format!("{}/usuarios/999", srv.base_url))
        .json(&json!({"nome": "Ghost", "email": "ghost@x.com"}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = client
        .delete(format!("{}/usuarios/999", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn non_integer_id_returns_404() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/usuarios/abc", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn duplicate_email_on_create_conflicts_and_keeps_one_row() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = post_usuario(
        &client,
        &srv.base_url,
        json!({"nome": "Ana", "email": "ana@x.com"}),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CREATED);

    let res = post_usuario(
        &client,
        &srv.base_url,
        json!({"nome": "Outra Ana", "email": "ana@x.com"}),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CONFLICT);
    let info: Value = res.json().await.unwrap();
    assert_eq!(info, json!({"info": "email already registered"}));

    let rows: Vec<Value> = client
        .get(format!("{}/usuarios", srv.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let with_email: Vec<&Value> = rows
        .iter()
        .filter(|r| r["email"] == "ana@x.com")
        .collect();
    assert_eq!(with_email.len(), 1);
    assert_eq!(with_email[0]["nome"], "Ana");
}

#[tokio::test]
async fn list_is_ordered_by_id_regardless_of_history() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    for (nome, email) in [("A", "a@x.com"), ("B", "b@x.com"), ("C", "c@x.com")] {
        post_usuario(&client, &srv.base_url, json!({"nome": nome, "email": email})).await;
    }

    // Delete the middle row, then add another.
    let res = client
        .delete(format!("{}/usuarios/2", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    post_usuario(&client, &srv.base_url, json!({"nome": "D", "email": "d@x.com"})).await;

    let rows: Vec<Value> = client
        .get(format!("{}/usuarios", srv.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let ids: Vec<i64> = rows.iter().map(|r| r["id"].as_i64().unwrap()).collect();
    let mut sorted = ids.clone();
    sorted.sort_unstable();
    assert_eq!(ids, sorted);
    assert_eq!(ids, vec![1, 3, 4]);
}

#[tokio::test]
async fn delete_then_get_then_delete_again_returns_404_not_500() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let created: Value = post_usuario(
        &client,
        &srv.base_url,
        json!({"nome": "Ana", "email": "ana@x.com"}),
    )
    .await
    .json()
    .await
    .unwrap();
    let id = created["id"].as_i64().unwrap();

    let res = client
        .delete(format!("{}/usuarios/{}", srv.base_url, id))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let info: Value = res.json().await.unwrap();
    assert!(info["info"].as_str().unwrap().contains(&id.to_string()));

    let res = client
        .get(format!("{}/usuarios/{}", srv.base_url, id))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = client
        .delete(format!("{}/usuarios/{}", srv.base_url, id))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn update_replaces_all_fields_and_returns_the_record() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    post_usuario(
        &client,
        &srv.base_url,
        json!({"nome": "Ana", "email": "ana@x.com", "altura": 1.70, "peso": 62.5}),
    )
    .await;

    let res = client
        .put(format!("{}/usuarios/1", srv.base_url))
        .json(&json!({"nome": "Ana Maria", "email": "ana.maria@x.com", "altura": 1.71}))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(
        body,
        json!({
            "id": 1,
            "nome": "Ana Maria",
            "email": "ana.maria@x.com",
            "altura": 1.71,
            // Full replacement: omitted optional field becomes null.
            "peso": null,
        })
    );

    let fetched: Value = client
        .get(format!("{}/usuarios/1", srv.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(fetched, body);
}

#[tokio::test]
async fn update_to_existing_email_conflicts_and_leaves_both_rows_unchanged() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let ana: Value = post_usuario(
        &client,
        &srv.base_url,
        json!({"nome": "Ana", "email": "ana@x.com"}),
    )
    .await
    .json()
    .await
    .unwrap();
    let bob: Value = post_usuario(
        &client,
        &srv.base_url,
        json!({"nome": "Bob", "email": "bob@x.com"}),
    )
    .await
    .json()
    .await
    .unwrap();

    let res = client
        .put(format!("{}/usuarios/{}", srv.base_url, bob["id"]))
        .json(&json!({"nome": "Bob", "email": "ana@x.com"}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);
    let info: Value = res.json().await.unwrap();
    assert_eq!(info, json!({"info": "email already registered to another user"}));

    for expected in [&ana, &bob] {
        let fetched: Value = client
            .get(format!("{}/usuarios/{}", srv.base_url, expected["id"]))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(&fetched, expected);
    }
}

#[tokio::test]
async fn update_without_required_columns_is_a_store_fault() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    post_usuario(
        &client,
        &srv.base_url,
        json!({"nome": "Ana", "email": "ana@x.com"}),
    )
    .await;

    // PUT performs no body validation; the NOT NULL constraint fails at the
    // store and surfaces as a generic 500.
    let res = client
        .put(format!("{}/usuarios/1", srv.base_url))
        .json(&json!({}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let info: Value = res.json().await.unwrap();
    assert_eq!(info, json!({"info": "internal server error"}));

    // The failed request corrupted nothing; the service keeps serving.
    let res = client
        .get(format!("{}/usuarios/1", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}
